use std::fmt::{Display, Formatter};

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::identity::{DisplayIdentity, SessionArtifact};
use crate::tprintln;

use super::navigation::{Navigation, NavigationTargets};
use super::store::SessionStore;
use super::SESSION_KEY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoSessionReason {
    /// Nothing stored under the session key.
    Absent,
    /// Stored value is not a JSON object.
    Malformed,
    /// JSON object without a usable `account` object.
    MissingAccount,
}

impl NoSessionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoSessionReason::Absent => "absent",
            NoSessionReason::Malformed => "malformed",
            NoSessionReason::MissingAccount => "missing_account",
        }
    }
}

impl Display for NoSessionReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The gate's only failure: there is no session it can trust.
///
/// Every reason is handled the same way (redirect to login); the reason exists for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no valid session ({reason})")]
pub struct NoSession {
    pub reason: NoSessionReason,
}

impl NoSession {
    pub fn new(reason: NoSessionReason) -> Self { Self { reason } }
}

/// Parse a raw stored value into a session artifact, failing closed on any bad shape.
pub fn parse_artifact(raw: Option<&[u8]>) -> Result<SessionArtifact, NoSession> {
    let raw = raw.ok_or(NoSession::new(NoSessionReason::Absent))?;
    let value: JsonValue = serde_json::from_slice(raw).map_err(|_| NoSession::new(NoSessionReason::Malformed))?;
    let JsonValue::Object(mut map) = value else {
        return Err(NoSession::new(NoSessionReason::Malformed));
    };
    let account = match map.remove("account") {
        Some(account @ JsonValue::Object(_)) => account,
        _ => return Err(NoSession::new(NoSessionReason::MissingAccount)),
    };
    let account = serde_json::from_value(account).map_err(|_| NoSession::new(NoSessionReason::Malformed))?;
    Ok(SessionArtifact { account })
}

/// Resolve the display identity from a raw stored value. Pure; no navigation happens here.
pub fn evaluate_artifact(raw: Option<&[u8]>) -> Result<DisplayIdentity, NoSession> {
    let artifact = parse_artifact(raw)?;
    Ok(DisplayIdentity::from(&artifact.account))
}

/// Outcome of a protected-page activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Render(DisplayIdentity),
    Redirect(Navigation),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

/// One activation of a protected page over a session store.
///
/// The first identity resolved is kept for the rest of the activation; only
/// [`SessionGate::logout`] drops it.
pub struct SessionGate<S: SessionStore> {
    store: S,
    targets: NavigationTargets,
    resolved: Mutex<Option<DisplayIdentity>>,
}

impl<S: SessionStore> SessionGate<S> {
    pub fn new(store: S, targets: NavigationTargets) -> Self {
        Self { store, targets, resolved: Mutex::new(None) }
    }

    pub fn store(&self) -> &S { &self.store }

    pub fn targets(&self) -> &NavigationTargets { &self.targets }

    pub fn evaluate(&self) -> Result<DisplayIdentity, NoSession> {
        let mut resolved = self.resolved.lock();
        if let Some(identity) = resolved.as_ref() {
            return Ok(identity.clone());
        }
        let raw = self.store.get(SESSION_KEY);
        match evaluate_artifact(raw.as_deref()) {
            Ok(identity) => {
                tprintln!("gate.evaluate ok name={}", identity.full_name);
                *resolved = Some(identity.clone());
                Ok(identity)
            }
            Err(e) => {
                debug!(target: "gate", reason = %e.reason, "no session; protected content withheld");
                Err(e)
            }
        }
    }

    /// Render-or-redirect decision for the protected page.
    pub fn activate(&self) -> GateDecision {
        match self.evaluate() {
            Ok(identity) => GateDecision::Render(identity),
            Err(_) => GateDecision::Redirect(self.targets.login_entry.clone()),
        }
    }

    pub fn state(&self) -> SessionState {
        match self.evaluate() {
            Ok(_) => SessionState::Authenticated,
            Err(_) => SessionState::Unauthenticated,
        }
    }

    /// Clear the artifact and head back to the public landing page. Safe without a session.
    pub fn logout(&self) -> Navigation {
        let previous = self.resolved.lock().take();
        self.store.delete(SESSION_KEY);
        info!(target: "gate", had_identity = previous.is_some(), "logout");
        self.targets.landing.clone()
    }

    pub fn explore_learning(&self) -> Navigation {
        self.targets.learning_portal.clone()
    }
}
