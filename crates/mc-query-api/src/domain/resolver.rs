//! Snapshot resolution for object subscriptions.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared_types::ids::ObjectId;
use tracing::warn;

use crate::ports::ObjectStore;

/// State of one object as read at broadcast time.
///
/// `Absent` covers both ids that never existed and objects removed by
/// the batch being broadcast; subscribers cannot tell the two apart and
/// do not need to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "object", rename_all = "snake_case")]
pub enum ObjectSnapshot {
    Present(serde_json::Value),
    Absent,
}

impl ObjectSnapshot {
    #[must_use]
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }
}

/// Reads current object state from the store and serializes it for
/// delivery.
///
/// Snapshots are taken when a broadcast actually runs, not when blocks
/// commit. A subscriber whose object changed three times while a
/// broadcast was in flight gets one notification carrying the latest
/// state, which is the state it would read back anyway.
#[derive(Clone)]
pub struct SnapshotResolver {
    store: Arc<dyn ObjectStore>,
}

impl SnapshotResolver {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Resolve `id` to its current serialized state.
    ///
    /// Serialization failures degrade to `Absent` rather than poisoning
    /// the broadcast; the object is logged and the rest of the batch
    /// goes out.
    #[must_use]
    pub fn resolve(&self, id: ObjectId) -> ObjectSnapshot {
        match self.store.get(id) {
            Some(object) => match serde_json::to_value(&object) {
                Ok(value) => ObjectSnapshot::Present(value),
                Err(error) => {
                    warn!(object_id = %id, %error, "Failed to serialize object for delivery");
                    ObjectSnapshot::Absent
                }
            },
            None => ObjectSnapshot::Absent,
        }
    }
}

impl std::fmt::Debug for SnapshotResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotResolver").finish_non_exhaustive()
    }
}
