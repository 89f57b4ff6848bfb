use serde::Serialize;

use crate::session::{Navigation, LANDING_ROUTE};

/// One route offered by the login dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginEntry {
    pub label: &'static str,
    pub href: String,
}

/// The landing page's login dropdown. Open/closed is its only state.
#[derive(Debug, Clone)]
pub struct LoginMenu {
    open: bool,
    credential_login: Navigation,
    image_login: Navigation,
}

#[derive(Serialize)]
pub(super) struct MenuView {
    open: bool,
    toggle_href: String,
    entries: Vec<LoginEntry>,
}

impl LoginMenu {
    pub fn new(credential_login: Navigation, image_login: Navigation) -> Self {
        Self { open: false, credential_login, image_login }
    }

    pub fn with_open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    pub fn is_open(&self) -> bool { self.open }

    pub fn toggle(&mut self) { self.open = !self.open; }

    /// Routes shown while the menu is open; nothing while closed.
    pub fn entries(&self) -> Vec<LoginEntry> {
        if !self.open {
            return Vec::new();
        }
        vec![
            LoginEntry {
                label: "Login with Details",
                href: self.credential_login.target().to_string(),
            },
            LoginEntry {
                label: "Login via Image Upload",
                href: self.image_login.target().to_string(),
            },
        ]
    }

    /// Link that flips the menu on the next render.
    pub fn toggle_href(&self) -> String {
        let next = if self.open { "closed" } else { "open" };
        format!("{}?login={}", LANDING_ROUTE, next)
    }

    pub(super) fn view(&self) -> MenuView {
        MenuView { open: self.open, toggle_href: self.toggle_href(), entries: self.entries() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{CREDENTIAL_LOGIN_URL, IMAGE_LOGIN_ROUTE};

    fn default_menu() -> LoginMenu {
        LoginMenu::new(Navigation::to(CREDENTIAL_LOGIN_URL), Navigation::to(IMAGE_LOGIN_ROUTE))
    }

    #[test]
    fn starts_closed_with_no_entries() {
        let m = default_menu();
        assert!(!m.is_open());
        assert!(m.entries().is_empty());
        assert_eq!(m.toggle_href(), "/?login=open");
    }

    #[test]
    fn toggle_flips_state() {
        let mut m = default_menu();
        m.toggle();
        assert!(m.is_open());
        assert_eq!(m.toggle_href(), "/?login=closed");
        m.toggle();
        assert!(!m.is_open());
    }

    #[test]
    fn open_menu_offers_both_routes() {
        let entries = default_menu().with_open(true).entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].href, CREDENTIAL_LOGIN_URL);
        assert_eq!(entries[1].href, "/user-select");
    }
}
