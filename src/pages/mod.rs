//! Server-rendered pages: the public landing page and the session-gated dashboard.
//! Templates are compiled into the binary; HTML autoescaping applies to every value.

mod landing;

pub use landing::{LoginEntry, LoginMenu};

use minijinja::{context, Environment};

use crate::error::AppResult;
use crate::identity::DisplayIdentity;

/// Product name shown in the landing header.
pub const BRAND: &str = "Student Empowerment";
pub const BADGE: &str = "LBCE";
pub const LOGO_URL: &str = "https://i.postimg.cc/j5Rd9QRs/DALL-E-2025-02-12-15-33-01-A-modern-and-minimalistic-logo-for-Student-Empowerment-The-design-sh.webp";
pub const HERO_URL: &str = "https://www.nec.com/en/global/solutions/biometrics/img/face/face_header_sd.jpg";

pub const LOGOUT_ACTION: &str = "/logout";
pub const EXPLORE_ACTION: &str = "/explore-learning";

const LANDING_TEMPLATE: &str = "landing.html";
const DASHBOARD_TEMPLATE: &str = "dashboard.html";

pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> AppResult<Self> {
        let mut env = Environment::new();
        env.add_template(LANDING_TEMPLATE, include_str!("../../templates/landing.html"))?;
        env.add_template(DASHBOARD_TEMPLATE, include_str!("../../templates/dashboard.html"))?;
        Ok(Self { env })
    }

    pub fn landing(&self, menu: &LoginMenu) -> AppResult<String> {
        let tmpl = self.env.get_template(LANDING_TEMPLATE)?;
        Ok(tmpl.render(context! {
            brand => BRAND,
            badge => BADGE,
            logo_url => LOGO_URL,
            hero_url => HERO_URL,
            menu => menu.view(),
        })?)
    }

    /// Protected content. Only call with an identity the session gate produced.
    pub fn dashboard(&self, identity: &DisplayIdentity) -> AppResult<String> {
        let tmpl = self.env.get_template(DASHBOARD_TEMPLATE)?;
        Ok(tmpl.render(context! {
            identity => identity,
            logo_url => LOGO_URL,
            logout_action => LOGOUT_ACTION,
            explore_action => EXPLORE_ACTION,
        })?)
    }
}
