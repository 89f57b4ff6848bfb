use serde::Serialize;

/// Public landing route.
pub const LANDING_ROUTE: &str = "/";
/// Login entry point unauthenticated visitors are sent to.
pub const DEFAULT_LOGIN_ENTRY: &str = "/login";
/// External login with account details.
pub const CREDENTIAL_LOGIN_URL: &str = "https://frontend-authentication-21-01-2025-g2rd.vercel.app/";
/// Internal login by uploading a face image.
pub const IMAGE_LOGIN_ROUTE: &str = "/user-select";
/// Learning portal behind the dashboard's "Explore Learning" action.
pub const LEARNING_PORTAL_URL: &str = "https://student-portal-beta-gold.vercel.app/";

/// Where the visitor goes next. Navigation always ends the current render path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum Navigation {
    /// A route inside this application.
    Internal(String),
    /// A full navigation away from the application.
    External(String),
}

impl Navigation {
    /// Classify a configured target: anything with a scheme or a network path is external.
    pub fn to<S: Into<String>>(target: S) -> Self {
        let target = target.into();
        let lower = target.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") || target.starts_with("//") {
            Navigation::External(target)
        } else {
            Navigation::Internal(target)
        }
    }

    pub fn target(&self) -> &str {
        match self {
            Navigation::Internal(t) | Navigation::External(t) => t.as_str(),
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Navigation::External(_))
    }
}

/// Destinations the gate can send a visitor to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTargets {
    pub login_entry: Navigation,
    pub landing: Navigation,
    pub learning_portal: Navigation,
}

impl Default for NavigationTargets {
    fn default() -> Self {
        Self {
            login_entry: Navigation::to(DEFAULT_LOGIN_ENTRY),
            landing: Navigation::to(LANDING_ROUTE),
            learning_portal: Navigation::to(LEARNING_PORTAL_URL),
        }
    }
}
