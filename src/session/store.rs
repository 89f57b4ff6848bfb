use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::identity::SessionArtifact;

use super::SESSION_KEY;

/// Key/value storage the session artifact lives in.
///
/// Implementations must be safe to share; the gate only ever reads and deletes.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Vec<u8>>;
    fn set(&self, key: &str, value: &[u8]);
    fn delete(&self, key: &str);

    /// Serialize and store an artifact under [`SESSION_KEY`], the way the login flow does.
    fn put_artifact(&self, artifact: &SessionArtifact) -> anyhow::Result<()> {
        let bytes = serde_json::to_vec(artifact)?;
        self.set(SESSION_KEY, &bytes);
        Ok(())
    }
}

impl<T: SessionStore + ?Sized> SessionStore for &T {
    fn get(&self, key: &str) -> Option<Vec<u8>> { (**self).get(key) }
    fn set(&self, key: &str, value: &[u8]) { (**self).set(key, value) }
    fn delete(&self, key: &str) { (**self).delete(key) }
}

impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    fn get(&self, key: &str) -> Option<Vec<u8>> { (**self).get(key) }
    fn set(&self, key: &str, value: &[u8]) { (**self).set(key, value) }
    fn delete(&self, key: &str) { (**self).delete(key) }
}

/// Process-wide in-memory store. Clones share the same map.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    map: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.map.read().len() }

    pub fn is_empty(&self) -> bool { self.map.read().is_empty() }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.map.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &[u8]) {
        self.map.write().insert(key.to_string(), value.to_vec());
    }

    fn delete(&self, key: &str) {
        self.map.write().remove(key);
    }
}
