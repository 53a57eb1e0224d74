//! Single-slot draft storage.
//!
//! Each [`DraftKind`] owns exactly one slot holding a JSON object. Writes merge
//! key by key and are skipped when nothing would change, so a form that mirrors
//! every keystroke does not produce redundant updates.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::error::{AdminError, AdminResult};

/// Entity whose create flow keeps a draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftKind {
    Problem,
    Contest,
}

/// Storage seam injected into form controllers
pub trait DraftRepository: Send + Sync {
    /// Current draft, if one was started
    fn get(&self, kind: DraftKind) -> Option<Map<String, Value>>;

    /// Shallow-merge `partial` into the draft. Returns whether anything changed.
    fn set(&self, kind: DraftKind, partial: Map<String, Value>) -> bool;

    /// Reset the slot to empty
    fn clear(&self, kind: DraftKind);

    /// Number of effective writes since the slot was created
    fn revision(&self, kind: DraftKind) -> u64;
}

#[derive(Debug, Default)]
struct DraftSlot {
    values: Map<String, Value>,
    revision: u64,
}

/// Process-wide in-memory draft store
#[derive(Debug, Default)]
pub struct DraftStore {
    slots: Mutex<HashMap<DraftKind, DraftSlot>>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_slots<R>(&self, f: impl FnOnce(&mut HashMap<DraftKind, DraftSlot>) -> R) -> R {
        let mut slots = self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut slots)
    }
}

impl DraftRepository for DraftStore {
    fn get(&self, kind: DraftKind) -> Option<Map<String, Value>> {
        self.with_slots(|slots| {
            slots
                .get(&kind)
                .filter(|slot| !slot.values.is_empty())
                .map(|slot| slot.values.clone())
        })
    }

    fn set(&self, kind: DraftKind, partial: Map<String, Value>) -> bool {
        self.with_slots(|slots| {
            let slot = slots.entry(kind).or_default();
            let mut changed = false;

            for (key, value) in partial {
                if slot.values.get(&key) != Some(&value) {
                    slot.values.insert(key, value);
                    changed = true;
                }
            }

            if changed {
                slot.revision += 1;
                tracing::trace!(?kind, revision = slot.revision, "draft updated");
            }
            changed
        })
    }

    fn clear(&self, kind: DraftKind) {
        self.with_slots(|slots| {
            if let Some(slot) = slots.get_mut(&kind) {
                if !slot.values.is_empty() {
                    slot.values.clear();
                    slot.revision += 1;
                }
            }
        });
        tracing::debug!(?kind, "draft cleared");
    }

    fn revision(&self, kind: DraftKind) -> u64 {
        self.with_slots(|slots| slots.get(&kind).map(|slot| slot.revision).unwrap_or(0))
    }
}

/// Read a typed draft. A stored draft that no longer matches `T` is discarded.
pub fn load_draft<T, R>(repo: &R, kind: DraftKind) -> Option<T>
where
    T: DeserializeOwned,
    R: DraftRepository + ?Sized,
{
    let values = repo.get(kind)?;
    match serde_json::from_value(Value::Object(values)) {
        Ok(draft) => Some(draft),
        Err(e) => {
            tracing::warn!(?kind, "discarding unreadable draft: {}", e);
            repo.clear(kind);
            None
        }
    }
}

/// Mirror a typed value into its draft slot. Fields marked `#[serde(skip)]`
/// (such as picked files) never reach the store.
pub fn save_draft<T, R>(repo: &R, kind: DraftKind, values: &T) -> AdminResult<bool>
where
    T: Serialize,
    R: DraftRepository + ?Sized,
{
    match serde_json::to_value(values).map_err(|e| AdminError::Internal(e.into()))? {
        Value::Object(map) => Ok(repo.set(kind, map)),
        other => Err(AdminError::Internal(anyhow::anyhow!(
            "draft for {:?} must serialize to an object, got {}",
            kind,
            other
        ))),
    }
}
