//! Scoped binding between an in-memory value and a named store key.
//!
//! # Invariants
//! - `load` never writes; an absent key leaves the store untouched.
//! - A stored value that fails to decode is treated as absent.
//! - `set` replaces the in-memory value before writing, so a failed write
//!   leaves the new value current and retryable via `flush`.
//! - `revision` increases by one on every committed value.
//! - `(instance, revision)` identifies one slot state for the process
//!   lifetime; clones get a new `instance`.

use crate::storage::{KeyValueStore, StorageError, StorageResult};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

fn next_instance() -> u64 {
    NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed)
}

/// Value of type `T` persisted as JSON text under a fixed key.
#[derive(Debug)]
pub struct PersistentSlot<T> {
    key: String,
    value: T,
    instance: u64,
    revision: u64,
}

impl<T: Clone> Clone for PersistentSlot<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            value: self.value.clone(),
            instance: next_instance(),
            revision: self.revision,
        }
    }
}

impl<T> PersistentSlot<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Loads the value at `key`, or uses `fallback` if absent or corrupt.
    pub fn load<S>(store: &S, key: impl Into<String>, fallback: T) -> StorageResult<Self>
    where
        S: KeyValueStore + ?Sized,
    {
        Self::load_with(store, key, || fallback)
    }

    /// Like `load`, but only builds the fallback when it is needed.
    pub fn load_with<S, F>(store: &S, key: impl Into<String>, fallback: F) -> StorageResult<Self>
    where
        S: KeyValueStore + ?Sized,
        F: FnOnce() -> T,
    {
        let key = key.into();
        let value = match store.get(&key)? {
            None => {
                debug!("event=slot_load module=repo status=ok key={key} source=fallback reason=absent");
                fallback()
            }
            Some(raw) => match decode::<T>(&raw) {
                Ok(value) => {
                    debug!(
                        "event=slot_load module=repo status=ok key={key} source=store bytes={}",
                        raw.len()
                    );
                    value
                }
                Err(err) => {
                    warn!(
                        "event=slot_load module=repo status=fallback key={key} reason=decode_failed error={err}"
                    );
                    fallback()
                }
            },
        };

        Ok(Self {
            key,
            value,
            instance: next_instance(),
            revision: 0,
        })
    }

    /// Makes `next` current and writes it to the store.
    pub fn set<S>(&mut self, store: &mut S, next: T) -> StorageResult<()>
    where
        S: KeyValueStore + ?Sized,
    {
        self.value = next;
        self.revision += 1;
        self.flush(store)
    }

    /// Writes the current value to the store again.
    pub fn flush<S>(&self, store: &mut S) -> StorageResult<()>
    where
        S: KeyValueStore + ?Sized,
    {
        let encoded = encode(&self.value).map_err(|source| StorageError::Encode {
            key: self.key.clone(),
            source,
        })?;
        store.set(&self.key, &encoded)?;
        debug!(
            "event=slot_write module=repo status=ok key={} revision={} bytes={}",
            self.key,
            self.revision,
            encoded.len()
        );
        Ok(())
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Number of values committed since the slot was loaded.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Process-unique identity of this loaded slot and its current value.
    pub fn version(&self) -> SlotVersion {
        SlotVersion {
            instance: self.instance,
            revision: self.revision,
        }
    }
}

/// Identity of one slot state; equal versions imply equal values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotVersion {
    instance: u64,
    revision: u64,
}

/// Serializes a slot value to its stored text form.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string(value)
}

/// Parses stored text back into a slot value.
pub fn decode<T: DeserializeOwned>(raw: &str) -> serde_json::Result<T> {
    serde_json::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::{decode, encode, PersistentSlot};
    use crate::storage::MemoryKvStore;
    use std::collections::BTreeMap;

    #[test]
    fn absent_key_uses_fallback_without_writing() {
        let store = MemoryKvStore::new();
        let slot = PersistentSlot::load(&store, "NOTES", vec![1_u32, 2]).unwrap();
        assert_eq!(slot.get(), &vec![1, 2]);
        assert_eq!(slot.revision(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn fallback_producer_is_not_called_when_value_present() {
        let store = MemoryKvStore::from_entries([("K", "[3]")]);
        let slot: PersistentSlot<Vec<u32>> =
            PersistentSlot::load_with(&store, "K", || panic!("fallback must not run")).unwrap();
        assert_eq!(slot.get(), &vec![3]);
    }

    #[test]
    fn corrupt_value_falls_back() {
        let store = MemoryKvStore::from_entries([("K", "{not json")]);
        let slot: PersistentSlot<Vec<String>> = PersistentSlot::load(&store, "K", vec![]).unwrap();
        assert!(slot.get().is_empty());
        assert_eq!(store.raw("K"), Some("{not json"));
    }

    #[test]
    fn set_writes_and_bumps_revision() {
        let mut store = MemoryKvStore::new();
        let mut slot = PersistentSlot::load(&store, "K", Vec::<String>::new()).unwrap();
        slot.set(&mut store, vec!["a".to_string()]).unwrap();
        assert_eq!(slot.revision(), 1);
        assert_eq!(store.raw("K"), Some(r#"["a"]"#));
    }

    #[test]
    fn separately_loaded_slots_have_distinct_versions() {
        let store = MemoryKvStore::new();
        let first = PersistentSlot::load(&store, "K", vec![1_u32]).unwrap();
        let second = PersistentSlot::load(&store, "K", vec![1_u32]).unwrap();
        assert_eq!(first.revision(), second.revision());
        assert_ne!(first.version(), second.version());
        assert_ne!(first.clone().version(), first.version());
    }

    #[test]
    fn nested_values_roundtrip() {
        let mut value = BTreeMap::new();
        value.insert("flags".to_string(), vec![(true, 1.5_f64, "x".to_string())]);
        let raw = encode(&value).unwrap();
        let back: BTreeMap<String, Vec<(bool, f64, String)>> = decode(&raw).unwrap();
        assert_eq!(back, value);
    }
}
