// ── Inventory composition ──
//
// The device answers class queries with flat lists. These functions rebuild
// the hierarchy from dn structure alone: an object belongs to an adapter
// when the third segment of its dn names that adapter. Pure, no I/O.

use std::collections::BTreeMap;

use cimcly_api::ManagedObject;
use tracing::{debug, warn};

use crate::model::{Adapter, AdapterPort};

/// Owning adapter identity of an object, if its dn carries one.
fn adapter_key(mo: &ManagedObject) -> Option<String> {
    mo.dn().and_then(|dn| dn.adapter().map(str::to_owned))
}

/// Join adapters, ports and vNICs into the adapter tree.
///
/// Each adapter gets every port under the same adapter identity; each such
/// port gets every vNIC under the same adapter identity whose `uplinkPort`
/// equals the port's `portId`. Adapters and ports keep device order.
/// Objects without an adapter identity are listed but never join.
pub fn compose_adapters(
    adapters: &[ManagedObject],
    ports: &[ManagedObject],
    vnics: &[ManagedObject],
) -> Vec<Adapter> {
    let ports: Vec<(Option<String>, &ManagedObject)> =
        ports.iter().map(|p| (adapter_key(p), p)).collect();
    let vnics: Vec<(Option<String>, &ManagedObject)> =
        vnics.iter().map(|v| (adapter_key(v), v)).collect();

    adapters
        .iter()
        .map(|adapter| {
            let key = adapter_key(adapter);
            if key.is_none() {
                debug!(dn = adapter.get("dn"), "adapter without adapter identity");
            }

            let port = ports
                .iter()
                .filter(|(port_key, _)| key.is_some() && *port_key == key)
                .map(|(_, port)| AdapterPort {
                    attributes: port.attributes().clone(),
                    vnic: port
                        .get("portId")
                        .map(|port_id| {
                            vnics
                                .iter()
                                .filter(|(vnic_key, vnic)| {
                                    *vnic_key == key && vnic.get("uplinkPort") == Some(port_id)
                                })
                                .map(|(_, vnic)| (*vnic).clone())
                                .collect::<Vec<_>>()
                        })
                        .unwrap_or_default(),
                })
                .collect();

            Adapter {
                attributes: adapter.attributes().clone(),
                port,
            }
        })
        .collect()
}

/// Boot device types ordered by their numeric `order`.
///
/// Entries without a `type`, or whose `order` is not a number, are skipped.
/// When two entries share an order the later one wins.
pub fn boot_order(entries: &[ManagedObject]) -> Vec<String> {
    let mut by_order: BTreeMap<u32, String> = BTreeMap::new();

    for entry in entries {
        let Some(kind) = entry.get("type").filter(|t| !t.is_empty()) else {
            debug!(dn = entry.get("dn"), "skipping boot entry without type");
            continue;
        };
        let Some(order) = entry.get("order").and_then(|o| o.trim().parse::<u32>().ok()) else {
            warn!(
                dn = entry.get("dn"),
                order = entry.get("order"),
                "skipping boot entry with non-numeric order"
            );
            continue;
        };
        by_order.insert(order, kind.to_owned());
    }

    by_order.into_values().collect()
}
