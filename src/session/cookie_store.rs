use std::collections::HashMap;

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use parking_lot::Mutex;

use super::store::SessionStore;

/// Per-request view of the visitor's cookies as a [`SessionStore`].
///
/// Values are percent-encoded on the wire. Writes and deletes update the view
/// immediately and queue a `Set-Cookie` header for the response.
pub struct CookieSessionStore {
    cookies: Mutex<HashMap<String, String>>,
    pending: Mutex<Vec<String>>,
    secure: bool,
}

impl CookieSessionStore {
    pub fn from_headers(headers: &HeaderMap, secure: bool) -> Self {
        let mut cookies = HashMap::new();
        for value in headers.get_all(COOKIE).iter() {
            let Ok(s) = value.to_str() else { continue; };
            for part in s.split(';') {
                let p = part.trim();
                if let Some(eq) = p.find('=') {
                    let (k, v) = p.split_at(eq);
                    // first occurrence wins; browsers send the most specific path first
                    cookies.entry(k.trim().to_string()).or_insert_with(|| v[1..].trim().to_string());
                }
            }
        }
        Self { cookies: Mutex::new(cookies), pending: Mutex::new(Vec::new()), secure }
    }

    /// Drain queued `Set-Cookie` values.
    pub fn take_set_cookies(&self) -> Vec<String> {
        std::mem::take(&mut *self.pending.lock())
    }

    /// Move queued `Set-Cookie` values into a response header map.
    pub fn apply_to(&self, headers: &mut HeaderMap) {
        for cookie in self.take_set_cookies() {
            match HeaderValue::from_str(&cookie) {
                Ok(v) => { headers.append(SET_COOKIE, v); }
                Err(e) => tracing::warn!(target: "http", "dropping unencodable Set-Cookie: {e}"),
            }
        }
    }

    /// Queue an unencoded `HttpOnly` cookie, for values page scripts never read.
    pub fn set_http_only(&self, key: &str, value: &str) {
        self.pending.lock().push(format!("{}={}; HttpOnly; {}", key, value, self.attributes()));
        self.cookies.lock().insert(key.to_string(), value.to_string());
    }

    fn attributes(&self) -> &'static str {
        if self.secure { "Path=/; SameSite=Lax; Secure" } else { "Path=/; SameSite=Lax" }
    }
}

impl SessionStore for CookieSessionStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        let cookies = self.cookies.lock();
        let raw = cookies.get(key)?;
        Some(urlencoding::decode_binary(raw.as_bytes()).into_owned())
    }

    fn set(&self, key: &str, value: &[u8]) {
        let encoded = urlencoding::encode_binary(value).into_owned();
        self.pending.lock().push(format!("{}={}; {}", key, encoded, self.attributes()));
        self.cookies.lock().insert(key.to_string(), encoded);
    }

    fn delete(&self, key: &str) {
        self.cookies.lock().remove(key);
        self.pending.lock().push(format!(
            "{}=deleted; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0; {}",
            key,
            self.attributes()
        ));
    }
}
