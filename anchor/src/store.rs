use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};

use crate::{Anchor, AnchorError};

/// Persistence for session anchors.
///
/// One anchor per session. `replace` must swap the whole record in a single
/// step so readers never observe a mix of old and new layers.
pub trait AnchorStore: Send + Sync {
    /// The anchor of `session_id`, if the session was anchored.
    fn load(&self, session_id: &str) -> Result<Option<Anchor>, AnchorError>;
    /// Store `anchor`, returning the anchor it replaced.
    fn replace(&self, anchor: Anchor) -> Result<Option<Anchor>, AnchorError>;
    /// Drop the anchor of `session_id`, returning it.
    fn remove(&self, session_id: &str) -> Result<Option<Anchor>, AnchorError>;
}

impl<S: AnchorStore + ?Sized> AnchorStore for Arc<S> {
    fn load(&self, session_id: &str) -> Result<Option<Anchor>, AnchorError> {
        (**self).load(session_id)
    }

    fn replace(&self, anchor: Anchor) -> Result<Option<Anchor>, AnchorError> {
        (**self).replace(anchor)
    }

    fn remove(&self, session_id: &str) -> Result<Option<Anchor>, AnchorError> {
        (**self).remove(session_id)
    }
}

/// In-memory anchor store keeping bincode-encoded records.
///
/// Useful for tests and single-process deployments.
#[derive(Debug, Default)]
pub struct MemAnchorStore(RwLock<BTreeMap<String, Vec<u8>>>);

impl MemAnchorStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of anchored sessions.
    pub fn len(&self) -> Result<usize, AnchorError> {
        Ok(self.read()?.len())
    }

    /// True if no session is anchored.
    pub fn is_empty(&self) -> Result<bool, AnchorError> {
        Ok(self.read()?.is_empty())
    }

    /// Anchored session ids in ascending order.
    pub fn session_ids(&self) -> Result<Vec<String>, AnchorError> {
        Ok(self.read()?.keys().cloned().collect())
    }

    fn read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, BTreeMap<String, Vec<u8>>>, AnchorError> {
        self.0
            .read()
            .map_err(|_| AnchorError::StoreError("anchor store lock poisoned".into()))
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, BTreeMap<String, Vec<u8>>>, AnchorError> {
        self.0
            .write()
            .map_err(|_| AnchorError::StoreError("anchor store lock poisoned".into()))
    }
}

impl AnchorStore for MemAnchorStore {
    fn load(&self, session_id: &str) -> Result<Option<Anchor>, AnchorError> {
        self.read()?
            .get(session_id)
            .map(|bytes| Anchor::decode_from_slice(bytes))
            .transpose()
    }

    fn replace(&self, anchor: Anchor) -> Result<Option<Anchor>, AnchorError> {
        let bytes = anchor.encode_to_vec()?;
        let previous = self.write()?.insert(anchor.session_id, bytes);
        previous
            .map(|bytes| Anchor::decode_from_slice(&bytes))
            .transpose()
    }

    fn remove(&self, session_id: &str) -> Result<Option<Anchor>, AnchorError> {
        let removed = self.write()?.remove(session_id);
        removed
            .map(|bytes| Anchor::decode_from_slice(&bytes))
            .transpose()
    }
}
