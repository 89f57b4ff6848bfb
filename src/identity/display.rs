use serde::Serialize;

use super::account::{AccountProvenance, AccountRecord, TEMPLATE_ASSET_DIR};

/// What the protected page renders for the signed-in account. Never persisted.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct DisplayIdentity {
    #[serde(rename = "fullName")]
    pub full_name: String,
    #[serde(rename = "resolvedPictureSource")]
    pub resolved_picture_source: String,
}

impl From<&AccountRecord> for DisplayIdentity {
    fn from(account: &AccountRecord) -> Self {
        Self {
            full_name: account.full_name.clone(),
            resolved_picture_source: resolve_picture_source(&account.provenance()),
        }
    }
}

/// Turn an account's picture reference into something an `<img src>` can load.
pub fn resolve_picture_source(provenance: &AccountProvenance) -> String {
    match provenance {
        AccountProvenance::Custom { source } => source.clone(),
        AccountProvenance::Template { filename } => join_asset_path(TEMPLATE_ASSET_DIR, filename),
    }
}

fn join_asset_path(dir: &str, filename: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), filename.trim_start_matches('/'))
}
