//!
//! Portal configuration
//! --------------------
//! Built from defaults, then environment variables, then command-line flags
//! (flags win). Parsing is forgiving: an unparsable value falls through to the
//! next source instead of aborting startup.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::session::{
    Navigation, NavigationTargets, CREDENTIAL_LOGIN_URL, DEFAULT_LOGIN_ENTRY, IMAGE_LOGIN_ROUTE, LANDING_ROUTE,
    LEARNING_PORTAL_URL,
};

pub const DEFAULT_HTTP_PORT: u16 = 8080;

pub const USAGE: &str = "faceauth portal\n\nUSAGE:\n  faceauth_portal [--host ADDR] [--http-port N] [--login-url URL] [--credential-login-url URL]\n                  [--image-login-route PATH] [--learning-url URL] [--secure-cookies|--insecure-cookies]\n\nOPTIONS:\n  --host ADDR                  Bind address (env: FACEAUTH_HOST, default 0.0.0.0)\n  --http-port N                HTTP port (env: FACEAUTH_HTTP_PORT, default 8080)\n  --login-url URL              Where unauthenticated visitors are sent (env: FACEAUTH_LOGIN_URL, default /login)\n  --credential-login-url URL   Login with details (env: FACEAUTH_CREDENTIAL_LOGIN_URL)\n  --image-login-route PATH     Login via image upload (env: FACEAUTH_IMAGE_LOGIN_ROUTE, default /user-select)\n  --learning-url URL           Explore Learning destination (env: FACEAUTH_LEARNING_URL)\n  --secure-cookies             Mark session cookies Secure (env: FACEAUTH_SECURE_COOKIES)\n  --insecure-cookies           Do not mark session cookies Secure\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    pub host: IpAddr,
    pub http_port: u16,
    pub login_url: String,
    pub credential_login_url: String,
    pub image_login_route: String,
    pub learning_url: String,
    pub secure_cookies: bool,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            http_port: DEFAULT_HTTP_PORT,
            login_url: DEFAULT_LOGIN_ENTRY.to_string(),
            credential_login_url: CREDENTIAL_LOGIN_URL.to_string(),
            image_login_route: IMAGE_LOGIN_ROUTE.to_string(),
            learning_url: LEARNING_PORTAL_URL.to_string(),
            secure_cookies: false,
        }
    }
}

impl PortalConfig {
    /// Resolve from the process environment and the given argv.
    pub fn from_env_and_args(args: &[String]) -> Self {
        Self::resolve(|name| std::env::var(name).ok(), args)
    }

    /// Resolve with an explicit environment lookup.
    pub fn resolve<F>(env: F, args: &[String]) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        let host = parse_arg(args, "--host").and_then(|v| v.parse::<IpAddr>().ok())
            .or_else(|| env("FACEAUTH_HOST").and_then(|v| v.parse::<IpAddr>().ok()))
            .unwrap_or(d.host);
        let http_port = parse_arg(args, "--http-port").and_then(|v| v.parse::<u16>().ok())
            .or_else(|| env("FACEAUTH_HTTP_PORT").and_then(|v| v.parse::<u16>().ok()))
            .unwrap_or(d.http_port);
        let string_setting = |flag: &str, var: &str, default: String| -> String {
            parse_arg(args, flag)
                .or_else(|| env(var))
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(default)
        };
        let login_url = string_setting("--login-url", "FACEAUTH_LOGIN_URL", d.login_url);
        let credential_login_url = string_setting("--credential-login-url", "FACEAUTH_CREDENTIAL_LOGIN_URL", d.credential_login_url);
        let image_login_route = string_setting("--image-login-route", "FACEAUTH_IMAGE_LOGIN_ROUTE", d.image_login_route);
        let learning_url = string_setting("--learning-url", "FACEAUTH_LEARNING_URL", d.learning_url);
        let secure_cookies = parse_secure_arg(args)
            .or_else(|| env("FACEAUTH_SECURE_COOKIES").and_then(|v| parse_bool(&v)))
            .unwrap_or(d.secure_cookies);
        Self { host, http_port, login_url, credential_login_url, image_login_route, learning_url, secure_cookies }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.http_port)
    }

    pub fn navigation_targets(&self) -> NavigationTargets {
        NavigationTargets {
            login_entry: Navigation::to(self.login_url.clone()),
            landing: Navigation::to(LANDING_ROUTE),
            learning_portal: Navigation::to(self.learning_url.clone()),
        }
    }
}

pub fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn parse_arg(args: &[String], flag: &str) -> Option<String> {
    let mut i = 0;
    while i < args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
        i += 1;
    }
    None
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// last one wins if both are given
fn parse_secure_arg(args: &[String]) -> Option<bool> {
    args.iter().rev().find_map(|a| match a.as_str() {
        "--secure-cookies" => Some(true),
        "--insecure-cookies" => Some(false),
        _ => None,
    })
}
