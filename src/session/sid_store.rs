use std::fmt::Write as _;

use anyhow::anyhow;
use axum::http::HeaderMap;
use parking_lot::Mutex;

use super::cookie_store::CookieSessionStore;
use super::store::{MemorySessionStore, SessionStore};
use super::SESSION_KEY;

/// Cookie carrying the opaque session id.
pub const SID_COOKIE: &str = "faceAuth_sid";

const SID_HEX_LEN: usize = 32;

/// Per-request view of the process-wide [`MemorySessionStore`], scoped by the
/// visitor's session id cookie.
///
/// Values live on the server under `"{sid}:{key}"`; the browser only holds the
/// id. Reads fall back to the raw cookie of the same name, which still works
/// for artifacts small enough to fit in one cookie.
pub struct SidSessionStore {
    sessions: MemorySessionStore,
    cookies: CookieSessionStore,
    sid: Mutex<Option<String>>,
}

impl SidSessionStore {
    pub fn new(sessions: MemorySessionStore, cookies: CookieSessionStore) -> Self {
        let sid = cookies
            .get(SID_COOKIE)
            .and_then(|raw| String::from_utf8(raw).ok())
            .filter(|s| is_sid(s));
        Self { sessions, cookies, sid: Mutex::new(sid) }
    }

    /// The session id in effect for this request, if any.
    pub fn sid(&self) -> Option<String> {
        self.sid.lock().clone()
    }

    pub fn apply_to(&self, headers: &mut HeaderMap) {
        self.cookies.apply_to(headers);
    }

    fn ensure_sid(&self) -> anyhow::Result<String> {
        let mut slot = self.sid.lock();
        if let Some(sid) = slot.as_ref() {
            return Ok(sid.clone());
        }
        let sid = new_sid()?;
        self.cookies.set_http_only(SID_COOKIE, &sid);
        *slot = Some(sid.clone());
        Ok(sid)
    }
}

impl SessionStore for SidSessionStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        if let Some(sid) = self.sid.lock().as_deref() {
            if let Some(v) = self.sessions.get(&scoped_key(sid, key)) {
                return Some(v);
            }
        }
        self.cookies.get(key)
    }

    fn set(&self, key: &str, value: &[u8]) {
        match self.ensure_sid() {
            Ok(sid) => self.sessions.set(&scoped_key(&sid, key), value),
            Err(e) => {
                tracing::warn!(target: "session", "no session id available, writing cookie instead: {e}");
                self.cookies.set(key, value);
            }
        }
    }

    fn delete(&self, key: &str) {
        self.cookies.delete(key);
        if key != SESSION_KEY {
            if let Some(sid) = self.sid.lock().as_deref() {
                self.sessions.delete(&scoped_key(sid, key));
            }
            return;
        }
        // the id only exists to carry the artifact
        if let Some(sid) = self.sid.lock().take() {
            self.sessions.delete(&scoped_key(&sid, key));
            self.cookies.delete(SID_COOKIE);
        }
    }
}

fn scoped_key(sid: &str, key: &str) -> String {
    format!("{}:{}", sid, key)
}

fn is_sid(s: &str) -> bool {
    s.len() == SID_HEX_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
}

fn new_sid() -> anyhow::Result<String> {
    let mut bytes = [0u8; SID_HEX_LEN / 2];
    getrandom::getrandom(&mut bytes).map_err(|e| anyhow!(e.to_string()))?;
    let mut sid = String::with_capacity(SID_HEX_LEN);
    for b in &bytes {
        let _ = write!(&mut sid, "{:02x}", b);
    }
    Ok(sid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::{COOKIE, SET_COOKIE};
    use axum::http::HeaderValue;

    fn view(shared: &MemorySessionStore, cookie: Option<&str>) -> SidSessionStore {
        let mut h = HeaderMap::new();
        if let Some(c) = cookie {
            h.insert(COOKIE, HeaderValue::from_str(c).unwrap());
        }
        SidSessionStore::new(shared.clone(), CookieSessionStore::from_headers(&h, false))
    }

    fn set_cookies(store: &SidSessionStore) -> Vec<String> {
        let mut out = HeaderMap::new();
        store.apply_to(&mut out);
        out.get_all(SET_COOKIE).iter().map(|v| v.to_str().unwrap().to_string()).collect()
    }

    #[test]
    fn set_issues_sid_and_keeps_value_server_side() {
        let shared = MemorySessionStore::new();
        let first = view(&shared, None);
        let big = vec![b'x'; 64 * 1024];
        first.set(SESSION_KEY, &big);

        let sid = first.sid().unwrap();
        assert!(is_sid(&sid));
        let cookies = set_cookies(&first);
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].starts_with(&format!("{}={};", SID_COOKIE, sid)));
        assert!(cookies[0].contains("HttpOnly"));
        assert!(cookies[0].len() < 4096);

        let next = view(&shared, Some(&format!("{}={}", SID_COOKIE, sid)));
        assert_eq!(next.get(SESSION_KEY).map(|v| v.len()), Some(big.len()));
    }

    #[test]
    fn reuses_existing_sid() {
        let shared = MemorySessionStore::new();
        let sid = "0123456789abcdef0123456789abcdef";
        let store = view(&shared, Some(&format!("{}={}", SID_COOKIE, sid)));
        store.set(SESSION_KEY, b"{}");
        assert!(set_cookies(&store).is_empty());
        assert_eq!(shared.get(&scoped_key(sid, SESSION_KEY)).as_deref(), Some(&b"{}"[..]));
    }

    #[test]
    fn falls_back_to_raw_cookie() {
        let shared = MemorySessionStore::new();
        let store = view(&shared, Some("faceAuth=%7B%7D"));
        assert_eq!(store.sid(), None);
        assert_eq!(store.get(SESSION_KEY).as_deref(), Some(&b"{}"[..]));
    }

    #[test]
    fn malformed_sid_is_ignored() {
        let shared = MemorySessionStore::new();
        shared.set("../etc:faceAuth", b"{}");
        let store = view(&shared, Some(&format!("{}=../etc", SID_COOKIE)));
        assert_eq!(store.sid(), None);
        assert_eq!(store.get(SESSION_KEY), None);
    }

    #[test]
    fn delete_retires_sid_and_clears_both_cookies() {
        let shared = MemorySessionStore::new();
        let sid = "fedcba9876543210fedcba9876543210";
        shared.set(&scoped_key(sid, SESSION_KEY), b"{}");
        let store = view(&shared, Some(&format!("{}={}", SID_COOKIE, sid)));
        store.delete(SESSION_KEY);

        assert!(shared.is_empty());
        assert_eq!(store.sid(), None);
        let cookies = set_cookies(&store);
        assert_eq!(cookies.len(), 2);
        assert!(cookies[0].starts_with("faceAuth=deleted;"));
        assert!(cookies[1].starts_with(&format!("{}=deleted;", SID_COOKIE)));
    }
}
