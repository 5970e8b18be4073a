#![allow(clippy::unwrap_used)]
// Integration tests for `Server` using wiremock.

use std::time::Duration;

use secrecy::SecretString;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cimcly_api::{CimcClient, Timeouts};
use cimcly_core::{
    CoreError, InventoryCategory, PowerState, Server, SessionState, UserPrivilege, UserRequest,
};

// ── Helpers ─────────────────────────────────────────────────────────

const LOGIN_OK: &str = r#"<aaaLogin cookie="" response="yes" outCookie="1394044707/abc" outRefreshPeriod="600" outPriv="admin" outVersion="4.1(2f)"/>"#;
const LOGOUT_OK: &str = r#"<aaaLogout cookie="" response="yes" outStatus="success"/>"#;

async fn setup() -> (MockServer, Server) {
    let mock = MockServer::start().await;
    let client = CimcClient::with_client(
        reqwest::Client::new(),
        &mock.uri(),
        "admin",
        SecretString::from("password"),
        Timeouts {
            login: Duration::from_millis(500),
            request: Duration::from_millis(500),
            long_running: Duration::from_secs(1),
        },
    )
    .unwrap();
    (mock, Server::with_client(client))
}

async fn mount_reply(mock: &MockServer, needle: &str, body: &str) {
    Mock::given(method("POST"))
        .and(path("/nuova"))
        .and(body_string_contains(needle))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(mock)
        .await;
}

async fn mount_session(mock: &MockServer, logouts: u64) {
    mount_reply(mock, "<aaaLogin", LOGIN_OK).await;
    Mock::given(method("POST"))
        .and(path("/nuova"))
        .and(body_string_contains("<aaaLogout"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGOUT_OK))
        .expect(logouts)
        .mount(mock)
        .await;
}

fn resolve_reply(class_id: &str, objects: &str) -> String {
    format!(
        r#"<configResolveClass cookie="1394044707/abc" response="yes" classId="{class_id}"><outConfigs>{objects}</outConfigs></configResolveClass>"#
    )
}

// ── Scoped session tests ────────────────────────────────────────────

#[tokio::test]
async fn test_scoped_logs_out_after_failure() {
    let (mock, server) = setup().await;
    mount_session(&mock, 1).await;

    let result: Result<(), CoreError> = server
        .within_session(async |_server| {
            Err(CoreError::Validation {
                message: "body failed".into(),
            })
        })
        .await;

    assert!(matches!(result, Err(CoreError::Validation { .. })));
}

#[tokio::test]
async fn test_scoped_skips_logout_when_login_fails() {
    let (mock, server) = setup().await;
    mount_reply(
        &mock,
        "<aaaLogin",
        r#"<aaaLogin response="yes" errorCode="551" errorDescr="Authentication failed"/>"#,
    )
    .await;
    Mock::given(method("POST"))
        .and(body_string_contains("<aaaLogout"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGOUT_OK))
        .expect(0)
        .mount(&mock)
        .await;

    let result = server.within_session(async |_server| Ok(())).await;

    let err = result.unwrap_err();
    assert!(err.is_authentication(), "expected auth failure, got {err:?}");
}

#[tokio::test]
async fn test_scoped_surfaces_logout_error_after_success() {
    let (mock, server) = setup().await;
    mount_reply(&mock, "<aaaLogin", LOGIN_OK).await;
    mount_reply(
        &mock,
        "<aaaLogout",
        r#"<aaaLogout response="yes" errorCode="555" errorDescr="Session not found"/>"#,
    )
    .await;

    let result = server
        .within_session(async |server| {
            assert_eq!(server.state(), SessionState::Authenticated);
            Ok(42)
        })
        .await;

    assert!(
        matches!(&result, Err(CoreError::Protocol { operation, code, .. }) if operation == "logout" && code == "555"),
        "expected logout protocol error, got {result:?}"
    );
}

// ── Inventory tests ─────────────────────────────────────────────────

#[tokio::test]
async fn test_adapter_tree_from_three_queries() {
    let (mock, server) = setup().await;
    mount_session(&mock, 1).await;

    mount_reply(
        &mock,
        r#"classId="adaptorUnit""#,
        &resolve_reply(
            "adaptorUnit",
            r#"<adaptorUnit dn="sys/rack-unit-1/adaptor-2" pciSlot="2" model="UCSC-PCIE-CSC-02" id="2"/>
               <adaptorUnit dn="sys/rack-unit-1/adaptor-5" pciSlot="5" model="UCSC-PCIE-CSC-02" id="5"/>"#,
        ),
    )
    .await;
    mount_reply(
        &mock,
        r#"classId="adaptorExtEthIf""#,
        &resolve_reply(
            "adaptorExtEthIf",
            r#"<adaptorExtEthIf dn="sys/rack-unit-1/adaptor-2/ext-eth-0" portId="0" adminSpeed="10Gbps" linkState="up"/>
               <adaptorExtEthIf dn="sys/rack-unit-1/adaptor-5/ext-eth-0" portId="0" adminSpeed="10Gbps" linkState="down"/>"#,
        ),
    )
    .await;
    mount_reply(
        &mock,
        r#"classId="adaptorHostEthIf""#,
        &resolve_reply(
            "adaptorHostEthIf",
            r#"<adaptorHostEthIf dn="sys/rack-unit-1/adaptor-2/host-eth-eth0" name="eth0" mac="00:25:B5:00:00:01" uplinkPort="0"/>
               <adaptorHostEthIf dn="sys/rack-unit-1/adaptor-5/host-eth-eth0" name="eth0" mac="00:25:B5:00:00:02" uplinkPort="0"/>
               <adaptorHostEthIf dn="sys/rack-unit-1/adaptor-5/host-eth-eth1" name="eth1" mac="00:25:B5:00:00:03" uplinkPort="1"/>"#,
        ),
    )
    .await;

    let adapters = Server::within_session(server, async |server| server.adapters().await)
        .await
        .unwrap();

    assert_eq!(adapters.len(), 2);
    assert_eq!(adapters[0].pci_slot(), "2");
    assert_eq!(adapters[0].port[0].vnic.len(), 1);
    assert_eq!(
        adapters[0].port[0].vnic[0].get("mac"),
        Some("00:25:B5:00:00:01")
    );
    assert_eq!(adapters[1].port[0].vnic.len(), 1);
    assert_eq!(
        adapters[1].port[0].vnic[0].get("mac"),
        Some("00:25:B5:00:00:02")
    );
}

#[tokio::test]
async fn test_inventory_selected_categories() {
    let (mock, server) = setup().await;
    mount_session(&mock, 1).await;

    mount_reply(
        &mock,
        r#"inDn="sys/rack-unit-1/boot-policy""#,
        r#"<configResolveChildren response="yes"><outConfigs>
            <lsbootVirtualMedia dn="sys/rack-unit-1/boot-policy/vm-read-only" order="1" type="virtual-media"/>
            <lsbootStorage dn="sys/rack-unit-1/boot-policy/storage-read-write" order="3" type="storage"/>
            <lsbootLan dn="sys/rack-unit-1/boot-policy/lan-read-only" order="2" type="lan"/>
            <lsbootBootSecurity dn="sys/rack-unit-1/boot-policy/boot-security" secureBoot="disabled"/>
        </outConfigs></configResolveChildren>"#,
    )
    .await;
    mount_reply(
        &mock,
        r#"classId="firmwareRunning""#,
        &resolve_reply(
            "firmwareRunning",
            r#"<firmwareRunning dn="sys/rack-unit-1/bios/fw-boot-loader" version="1.0"/>
               <firmwareRunning dn="sys/rack-unit-1/bios/fw-system" version="C220M3.1.5.4"/>
               <firmwareRunning dn="sys/rack-unit-1/mgmt/fw-system" version="1.5(4)"/>"#,
        ),
    )
    .await;

    let inventory = server
        .within_session(async |server| {
            server
                .inventory(&[
                    InventoryCategory::BootOrder,
                    InventoryCategory::Firmware,
                    InventoryCategory::BootOrder,
                ])
                .await
        })
        .await
        .unwrap();

    assert_eq!(
        inventory.boot_order.as_deref(),
        Some(&["virtual-media".to_owned(), "lan".into(), "storage".into()][..])
    );
    let fw = inventory.firmware.unwrap();
    assert_eq!(fw.len(), 2);
    assert_eq!(fw["sys/rack-unit-1/mgmt/fw-system"], "1.5(4)");
    assert!(inventory.psu.is_none());
    assert!(inventory.adapters.is_none());
}

// ── Lookup tests ────────────────────────────────────────────────────

const USERS: &str = r#"<aaaUser id="1" name="admin" priv="admin" accountStatus="active" dn="sys/user-ext/user-1"/>
    <aaaUser id="2" name="ops" priv="read-only" accountStatus="active" dn="sys/user-ext/user-2"/>
    <aaaUser id="3" name="" priv="" accountStatus="inactive" dn="sys/user-ext/user-3"/>
    <aaaUser id="4" name="" priv="" accountStatus="inactive" dn="sys/user-ext/user-4"/>"#;

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let (mock, server) = setup().await;
    mount_session(&mock, 1).await;
    mount_reply(&mock, r#"classId="aaaUser""#, &resolve_reply("aaaUser", USERS)).await;
    Mock::given(method("POST"))
        .and(body_string_contains("<configConfMo"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock)
        .await;

    let result = server
        .within_session(async |server| {
            server
                .set_password("nobody", &SecretString::from("n3w-pass"))
                .await
        })
        .await;

    assert!(
        matches!(&result, Err(CoreError::NotFound { entity_type, identifier }) if entity_type == "user" && identifier == "nobody"),
        "expected NotFound, got {result:?}"
    );
}

#[tokio::test]
async fn test_create_user_fills_first_free_slot() {
    let (mock, server) = setup().await;
    mount_session(&mock, 1).await;
    mount_reply(&mock, r#"classId="aaaUser""#, &resolve_reply("aaaUser", USERS)).await;
    Mock::given(method("POST"))
        .and(body_string_contains(r#"<configConfMo cookie="1394044707/abc" dn="sys/user-ext/user-3""#))
        .and(body_string_contains(r#"name="deploy""#))
        .and(body_string_contains(r#"priv="read-only""#))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<configConfMo dn="sys/user-ext/user-3" response="yes"><outConfig><aaaUser id="3" name="deploy" dn="sys/user-ext/user-3"/></outConfig></configConfMo>"#,
        ))
        .expect(1)
        .mount(&mock)
        .await;

    let request = UserRequest {
        name: "deploy".into(),
        password: SecretString::from("s3cret!"),
        privilege: UserPrivilege::ReadOnly,
        account_status: cimcly_core::AccountStatus::Active,
    };
    server
        .within_session(async |server| server.create_user(&request).await)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_unknown_drive_is_not_found() {
    let (mock, server) = setup().await;
    mount_session(&mock, 1).await;
    mount_reply(
        &mock,
        r#"classId="storageLocalDisk""#,
        &resolve_reply(
            "storageLocalDisk",
            r#"<storageLocalDisk id="1" pdStatus="Online" dn="sys/rack-unit-1/board/storage-SAS-SLOT-4/pd-1"/>"#,
        ),
    )
    .await;
    mount_reply(
        &mock,
        r#"classId="storageVirtualDrive""#,
        &resolve_reply("storageVirtualDrive", ""),
    )
    .await;

    let result = server
        .within_session(async |server| server.set_drive_unconfigured_good("8").await)
        .await;

    assert!(matches!(result, Err(CoreError::NotFound { .. })));
}

#[tokio::test]
async fn test_power_state_write() {
    let (mock, server) = setup().await;
    mount_session(&mock, 1).await;
    Mock::given(method("POST"))
        .and(body_string_contains(
            r#"<inConfig><computeRackUnit dn="sys/rack-unit-1" adminPower="cycle-immediate"/></inConfig>"#,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<configConfMo dn="sys/rack-unit-1" response="yes"/>"#,
        ))
        .expect(1)
        .mount(&mock)
        .await;

    server
        .within_session(async |server| server.set_power_state(PowerState::CycleImmediate).await)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_timeout_outcome_unknown() {
    let (mock, server) = setup().await;
    mount_session(&mock, 1).await;
    Mock::given(method("POST"))
        .and(body_string_contains("<configConfMo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<configConfMo response="yes"/>"#)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock)
        .await;

    let err = server
        .within_session(async |server| server.set_power_state(PowerState::Down).await)
        .await
        .unwrap_err();

    assert!(err.outcome_unknown(), "expected timeout, got {err:?}");
}
