//! Session gate for the protected pages.
//!
//! The login/enrollment flow leaves a `faceAuth` artifact in the visitor's storage.
//! Over HTTP that storage is a process-wide map keyed by a small session id cookie,
//! since a custom account's data-URL picture does not fit in a browser cookie.
//! On every protected-page activation the gate reads it through a [`SessionStore`],
//! resolves a [`crate::identity::DisplayIdentity`] or sends the visitor to the login
//! entry point. Apart from storing a handed-over artifact, logout is the only mutation
//! this side performs.

mod store;
mod cookie_store;
mod sid_store;
mod navigation;
mod gate;

pub use store::{MemorySessionStore, SessionStore};
pub use cookie_store::CookieSessionStore;
pub use sid_store::{SidSessionStore, SID_COOKIE};
pub use navigation::{
    Navigation, NavigationTargets, CREDENTIAL_LOGIN_URL, DEFAULT_LOGIN_ENTRY, IMAGE_LOGIN_ROUTE, LANDING_ROUTE,
    LEARNING_PORTAL_URL,
};
pub use gate::{evaluate_artifact, parse_artifact, GateDecision, NoSession, NoSessionReason, SessionGate, SessionState};

/// Storage key the login flow writes the artifact under.
pub const SESSION_KEY: &str = "faceAuth";

#[cfg(test)]
mod gate_tests;
