//! Account identity carried by the session artifact and the display identity derived from it.
//! Keep the public surface thin and split implementation across sub-modules.

mod account;
mod display;

pub use account::{AccountProvenance, AccountRecord, SessionArtifact, CUSTOM_ACCOUNT_TYPE, TEMPLATE_ASSET_DIR};
pub use display::{resolve_picture_source, DisplayIdentity};
