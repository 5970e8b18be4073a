// XML command/response codec
//
// Commands are a single element whose tag is the operation name and whose
// attributes are the parameter map; configuration writes nest their items
// inside an `inConfig` child. Responses are parsed into a plain element
// tree. Any response root carrying `errorCode` is a protocol error.

use std::str;

use indexmap::IndexMap;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use serde::Serialize;

use crate::error::Error;
use crate::mo::ManagedObject;

/// Ordered attribute map. Order follows the document (or insertion order
/// for commands); equality ignores order.
pub type Attributes = IndexMap<String, String>;

/// Attribute names whose values never reach the logs.
const SECRET_ATTRIBUTES: &[&str] = &["cookie", "inCookie", "inPassword", "pwd", "outCookie"];

/// Wrapper element for configuration items in `configConfMo`.
pub const IN_CONFIG: &str = "inConfig";
/// Wrapper element for resolve results.
pub const OUT_CONFIGS: &str = "outConfigs";
/// Wrapper element for the single echoed object in `configConfMo` results.
pub const OUT_CONFIG: &str = "outConfig";

// ── Element tree ────────────────────────────────────────────────────

/// One XML element: tag, attributes, and child elements. Text is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Element {
    pub tag: String,
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    /// Builder: set an attribute (replacing an existing value in place).
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Builder: append a child element.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// First direct child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// First descendant (depth-first, document order) with the given tag.
    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.children
            .iter()
            .find_map(|c| if c.tag == tag { Some(c) } else { c.find(tag) })
    }

    /// All descendants with the given tag, in document order.
    pub fn descendants(&self, tag: &str) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_descendants(tag, &mut out);
        out
    }

    fn collect_descendants<'a>(&'a self, tag: &str, out: &mut Vec<&'a Element>) {
        for child in &self.children {
            if child.tag == tag {
                out.push(child);
            }
            child.collect_descendants(tag, out);
        }
    }

    /// Serialize to a compact XML string.
    pub fn to_xml(&self) -> Result<String, Error> {
        let mut writer = Writer::new(Vec::new());
        write_element(&mut writer, self)?;
        String::from_utf8(writer.into_inner()).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Parse an XML document into its root element.
    pub fn parse(xml: &str) -> Result<Self, Error> {
        parse_document(xml).map_err(|message| Error::MalformedResponse {
            message,
            status: None,
            body: xml.to_owned(),
        })
    }

    /// Copy of this tree with secret attribute values masked.
    fn redacted(&self) -> Self {
        Self {
            tag: self.tag.clone(),
            attributes: self
                .attributes
                .iter()
                .map(|(k, v)| {
                    let value = if SECRET_ATTRIBUTES.contains(&k.as_str()) {
                        "****".to_owned()
                    } else {
                        v.clone()
                    };
                    (k.clone(), value)
                })
                .collect(),
            children: self.children.iter().map(Self::redacted).collect(),
        }
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), Error> {
    let mut start = BytesStart::new(element.tag.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| Error::Serialization(e.to_string()));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| Error::Serialization(e.to_string()))?;
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.tag.as_str())))
        .map_err(|e| Error::Serialization(e.to_string()))
}

fn parse_document(xml: &str) -> Result<Element, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if root.is_some() {
                    return Err("multiple root elements".into());
                }
                stack.push(element_from_start(e)?);
            }
            Ok(Event::Empty(ref e)) => {
                if root.is_some() {
                    return Err("multiple root elements".into());
                }
                let element = element_from_start(e)?;
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::End(_)) => {
                let element = stack.pop().ok_or("unexpected closing tag")?;
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "XML error at position {}: {e}",
                    reader.buffer_position()
                ));
            }
            // Declarations, comments, text, CDATA: not part of the attribute tree.
            Ok(_) => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(format!("unclosed element <{}>", open.tag));
    }
    root.ok_or_else(|| "empty document".into())
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn element_from_start(e: &BytesStart<'_>) -> Result<Element, String> {
    let name = e.name();
    let tag = str::from_utf8(name.as_ref()).map_err(|_| "invalid UTF-8 in tag name")?;
    let mut element = Element::new(tag);

    for attr in e.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = str::from_utf8(attr.key.as_ref()).map_err(|_| "invalid UTF-8 in attribute name")?;
        let value = attr.unescape_value().map_err(|e| e.to_string())?;
        element.attributes.insert(key.to_owned(), value.into_owned());
    }
    Ok(element)
}

// ── Commands ────────────────────────────────────────────────────────

/// One management command: operation name, parameter map, and optional
/// `inConfig` items. One command is one request/response cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: String,
    params: Attributes,
    in_config: Vec<Element>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Attributes::new(),
            in_config: Vec::new(),
        }
    }

    /// Builder: add a parameter (rendered as an attribute on the root).
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Builder: add an item to the `inConfig` wrapper.
    pub fn config_item(mut self, item: Element) -> Self {
        self.in_config.push(item);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &Attributes {
        &self.params
    }

    pub fn in_config(&self) -> &[Element] {
        &self.in_config
    }

    /// Copy of this command with `cookie` as the first parameter.
    pub fn with_cookie(&self, cookie: &str) -> Self {
        let mut params = Attributes::with_capacity(self.params.len() + 1);
        params.insert("cookie".into(), cookie.into());
        for (key, value) in &self.params {
            if key != "cookie" {
                params.insert(key.clone(), value.clone());
            }
        }
        Self {
            name: self.name.clone(),
            params,
            in_config: self.in_config.clone(),
        }
    }

    pub fn to_element(&self) -> Element {
        let mut root = Element {
            tag: self.name.clone(),
            attributes: self.params.clone(),
            children: Vec::new(),
        };
        if !self.in_config.is_empty() {
            root.children.push(Element {
                tag: IN_CONFIG.into(),
                attributes: Attributes::new(),
                children: self.in_config.clone(),
            });
        }
        root
    }

    pub fn to_xml(&self) -> Result<String, Error> {
        self.to_element().to_xml()
    }

    /// Rendering for logs: secret attribute values are masked.
    pub fn redacted_xml(&self) -> String {
        self.to_element()
            .redacted()
            .to_xml()
            .unwrap_or_else(|e| format!("<{} unserializable: {e}>", self.name))
    }

    /// Parse a command back from its XML form.
    pub fn from_xml(xml: &str) -> Result<Self, Error> {
        let root = Element::parse(xml)?;
        let in_config = root
            .child(IN_CONFIG)
            .map(|wrapper| wrapper.children.clone())
            .unwrap_or_default();
        Ok(Self {
            name: root.tag,
            params: root.attributes,
            in_config,
        })
    }
}

// ── Responses ───────────────────────────────────────────────────────

/// A successfully classified response (no `errorCode` on the root).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    root: Element,
}

impl Response {
    /// Parse and classify a response body.
    pub fn parse(body: &str) -> Result<Self, Error> {
        Self::classify(Element::parse(body)?)
    }

    /// Parse a body received with the given HTTP status. The status only
    /// annotates malformed bodies; `errorCode` decides protocol failure.
    pub(crate) fn from_http(status: u16, body: String) -> Result<Self, Error> {
        match parse_document(&body) {
            Ok(root) => Self::classify(root),
            Err(message) => Err(Error::MalformedResponse {
                message,
                status: (!(200..300).contains(&status)).then_some(status),
                body,
            }),
        }
    }

    fn classify(root: Element) -> Result<Self, Error> {
        if let Some(code) = root.get("errorCode") {
            return Err(Error::Protocol {
                code: code.to_owned(),
                description: root.get("errorDescr").unwrap_or_default().to_owned(),
            });
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Operation name echoed by the device.
    pub fn name(&self) -> &str {
        &self.root.tag
    }

    /// Top-level result attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.root.attributes
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.root.get(key)
    }

    /// The resolve payload: children of `outConfigs` (empty if absent).
    pub fn out_configs(&self) -> &[Element] {
        self.root
            .child(OUT_CONFIGS)
            .map_or(&[], |wrapper| wrapper.children.as_slice())
    }

    /// The object echoed under `outConfig` by `configConfMo`.
    pub fn out_config(&self) -> Option<&Element> {
        self.root.child(OUT_CONFIG).and_then(|w| w.children.first())
    }

    /// `outConfigs` children as flat managed objects.
    pub fn managed_objects(&self) -> Vec<ManagedObject> {
        self.out_configs().iter().map(ManagedObject::from).collect()
    }
}
