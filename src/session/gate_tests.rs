use super::*;
use crate::identity::{AccountRecord, DisplayIdentity, SessionArtifact};
use serde_json::json;

fn gate_over(store: &MemorySessionStore) -> SessionGate<&MemorySessionStore> {
    SessionGate::new(store, NavigationTargets::default())
}

fn store_json(store: &MemorySessionStore, v: serde_json::Value) {
    store.set(SESSION_KEY, v.to_string().as_bytes());
}

#[test]
fn absent_artifact_redirects_to_login() {
    let store = MemorySessionStore::new();
    let gate = gate_over(&store);
    assert_eq!(gate.evaluate(), Err(NoSession::new(NoSessionReason::Absent)));
    assert_eq!(gate.activate(), GateDecision::Redirect(Navigation::Internal("/login".into())));
    assert_eq!(gate.state(), SessionState::Unauthenticated);
}

#[test]
fn malformed_artifacts_fail_closed() {
    let cases: Vec<(&[u8], NoSessionReason)> = vec![
        (&b"not json"[..], NoSessionReason::Malformed),
        (&b""[..], NoSessionReason::Malformed),
        (&b"[1,2]"[..], NoSessionReason::Malformed),
        (&b"\"faceAuth\""[..], NoSessionReason::Malformed),
        (&b"{}"[..], NoSessionReason::MissingAccount),
        (&br#"{"account":null}"#[..], NoSessionReason::MissingAccount),
        (&br#"{"account":"Ada"}"#[..], NoSessionReason::MissingAccount),
        (&br#"{"user":{"fullName":"Ada"}}"#[..], NoSessionReason::MissingAccount),
    ];
    for (raw, reason) in cases {
        let store = MemorySessionStore::new();
        store.set(SESSION_KEY, raw);
        let gate = gate_over(&store);
        assert_eq!(gate.evaluate(), Err(NoSession::new(reason)), "raw={:?}", String::from_utf8_lossy(raw));
        assert_eq!(gate.activate(), GateDecision::Redirect(Navigation::Internal("/login".into())));
    }
}

#[test]
fn custom_account_picture_is_not_prefixed() {
    let store = MemorySessionStore::new();
    store_json(&store, json!({"account": {"fullName": "Ada", "picture": "data:image/png;base64,AAA", "type": "CUSTOM"}}));
    let id = gate_over(&store).evaluate().unwrap();
    assert_eq!(id.resolved_picture_source, "data:image/png;base64,AAA");
}

#[test]
fn non_custom_account_picture_resolves_under_asset_dir() {
    for tag in [json!("DEFAULT"), json!("TEMPLATE"), json!("custom"), json!(null)] {
        let store = MemorySessionStore::new();
        store_json(&store, json!({"account": {"fullName": "Ada", "picture": "ada.png", "type": tag}}));
        let id = gate_over(&store).evaluate().unwrap();
        assert_eq!(id.resolved_picture_source, "/temp-accounts/ada.png");
    }
}

#[test]
fn logout_without_session_still_lands_on_public_page() {
    let store = MemorySessionStore::new();
    let gate = gate_over(&store);
    assert_eq!(gate.logout(), Navigation::Internal("/".into()));
    assert!(store.is_empty());
}

#[test]
fn logout_then_evaluate_yields_no_session() {
    let store = MemorySessionStore::new();
    store_json(&store, json!({"account": {"fullName": "Ada", "picture": "ada.png", "type": "CUSTOM"}}));
    let gate = gate_over(&store);
    assert!(gate.evaluate().is_ok());
    gate.logout();
    assert_eq!(gate.evaluate(), Err(NoSession::new(NoSessionReason::Absent)));
    // a fresh activation sees the same thing
    assert_eq!(gate_over(&store).state(), SessionState::Unauthenticated);
}

#[test]
fn identity_is_stable_within_an_activation() {
    let store = MemorySessionStore::new();
    store_json(&store, json!({"account": {"fullName": "Ada", "picture": "ada.png"}}));
    let gate = gate_over(&store);
    let first = gate.evaluate().unwrap();
    assert_eq!(gate.evaluate().unwrap(), first);

    // mutation outside the gate does not change what this activation shows
    store_json(&store, json!({"account": {"fullName": "Someone Else", "picture": "x.png"}}));
    assert_eq!(gate.evaluate().unwrap(), first);
    assert_eq!(gate_over(&store).evaluate().unwrap().full_name, "Someone Else");
}

#[test]
fn grace_hopper_scenario() {
    let store = MemorySessionStore::new();
    let art = SessionArtifact { account: AccountRecord::new("Grace Hopper", "grace.jpg", Some("TEMPLATE")) };
    store.put_artifact(&art).unwrap();

    let gate = gate_over(&store);
    assert_eq!(
        gate.activate(),
        GateDecision::Render(DisplayIdentity {
            full_name: "Grace Hopper".into(),
            resolved_picture_source: "/temp-accounts/grace.jpg".into(),
        })
    );
    assert_eq!(gate.logout(), Navigation::Internal("/".into()));
    assert_eq!(store.get(SESSION_KEY), None);
    assert!(matches!(gate_over(&store).activate(), GateDecision::Redirect(_)));
}

#[test]
fn explore_learning_is_ungated_and_external() {
    let store = MemorySessionStore::new();
    let gate = gate_over(&store);
    let nav = gate.explore_learning();
    assert!(nav.is_external());
    assert_eq!(nav.target(), LEARNING_PORTAL_URL);
    assert!(store.is_empty());
}

#[test]
fn configured_login_entry_is_used_for_redirects() {
    let store = MemorySessionStore::new();
    let targets = NavigationTargets { login_entry: Navigation::to("https://login.example.test/"), ..Default::default() };
    let gate = SessionGate::new(&store, targets);
    assert_eq!(gate.activate(), GateDecision::Redirect(Navigation::External("https://login.example.test/".into())));
}

#[test]
fn cookie_store_round_trip_through_gate() {
    use axum::http::{header::COOKIE, HeaderMap, HeaderValue};
    let raw = json!({"account": {"fullName": "Ada", "picture": "ada.png", "type": "CUSTOM"}}).to_string();
    let mut headers = HeaderMap::new();
    let cookie = format!("faceAuth={}", urlencoding::encode(&raw));
    headers.insert(COOKIE, HeaderValue::from_str(&cookie).unwrap());

    let gate = SessionGate::new(CookieSessionStore::from_headers(&headers, false), NavigationTargets::default());
    assert_eq!(gate.evaluate().unwrap().resolved_picture_source, "ada.png");
    gate.logout();
    assert_eq!(gate.state(), SessionState::Unauthenticated);
    let set = gate.store().take_set_cookies();
    assert_eq!(set.len(), 1);
    assert!(set[0].starts_with("faceAuth=deleted;"));
}
