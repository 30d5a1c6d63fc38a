//! Core types for the generation history store.

use std::fmt;
use std::sync::Arc;

/// NodeId: position of a node in the store's creation order. Never reused.
pub type NodeId = u64;

/// Opaque snapshot payload (an encoded image, a data URL, ...).
///
/// Cloning shares the underlying buffer; the store never copies or decodes it.
#[derive(Clone, PartialEq, Eq)]
pub struct Snapshot(Arc<[u8]>);

impl Snapshot {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Snapshot(Arc::from(bytes.into()))
    }

    pub fn from_text(text: &str) -> Self {
        Snapshot(Arc::from(text.as_bytes()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether two snapshots share the same buffer.
    pub fn ptr_eq(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Number of live handles to this payload.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl fmt::Debug for Snapshot {
    // Payloads are large; print only the size.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Snapshot({} bytes)", self.0.len())
    }
}

impl From<&str> for Snapshot {
    fn from(text: &str) -> Self {
        Snapshot::from_text(text)
    }
}

impl From<Vec<u8>> for Snapshot {
    fn from(bytes: Vec<u8>) -> Self {
        Snapshot::from_bytes(bytes)
    }
}
