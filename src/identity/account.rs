use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

/// Account type tag for accounts enrolled with their own picture.
pub const CUSTOM_ACCOUNT_TYPE: &str = "CUSTOM";

/// Bundled directory holding the pictures of the predefined accounts.
pub const TEMPLATE_ASSET_DIR: &str = "/temp-accounts";

/// The persisted authentication result, as written by the login/enrollment flow.
///
/// Only `account` is read; anything else the writer stored alongside it is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionArtifact {
    pub account: AccountRecord,
}

/// Account payload embedded in the session artifact.
///
/// `fullName` and `picture` are display-only and never rejected: strings pass
/// through as-is, a missing or null value becomes empty, anything else keeps its
/// compact JSON text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountRecord {
    #[serde(rename = "fullName", default, deserialize_with = "lenient_string")]
    pub full_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub picture: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_tag")]
    pub account_type: Option<String>,
}

/// Where an account's picture comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountProvenance {
    /// Enrolled by the user; `picture` is a direct source (data URL, absolute URL).
    Custom { source: String },
    /// Predefined demo account; `picture` is a file name under [`TEMPLATE_ASSET_DIR`].
    Template { filename: String },
}

impl AccountRecord {
    pub fn new<S: Into<String>>(full_name: S, picture: S, account_type: Option<&str>) -> Self {
        Self {
            full_name: full_name.into(),
            picture: picture.into(),
            account_type: account_type.map(|t| t.to_string()),
        }
    }

    pub fn is_custom(&self) -> bool {
        self.account_type.as_deref() == Some(CUSTOM_ACCOUNT_TYPE)
    }

    pub fn provenance(&self) -> AccountProvenance {
        if self.is_custom() {
            AccountProvenance::Custom { source: self.picture.clone() }
        } else {
            AccountProvenance::Template { filename: self.picture.clone() }
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s,
        other => other.to_string(),
    })
}

fn lenient_tag<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}
