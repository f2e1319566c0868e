//! Snapshot persistence for state containers.
//!
//! Containers stay pure; persistence is a separate step. [`encode_snapshot`]
//! and [`decode_snapshot`] convert a container to and from its stored text,
//! and [`Persisted`] is the thin adapter that rehydrates a container from a
//! [`KeyValueStorage`] and writes the full snapshot back after every
//! mutation.
//!
//! # Snapshot format
//!
//! ```json
//! {"state": {"items": [ ... ]}, "version": 0}
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;
use crate::wishlist::Wishlist;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 0;

/// Errors raised while reading or writing persisted state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The storage backend failed to read or write.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A snapshot could not be encoded or decoded.
    #[error("snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A snapshot was written by an incompatible version.
    #[error("snapshot version {found} is not supported (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },
}

/// A string key-value store, the shape of browser local storage.
///
/// Methods take `&self`; implementations use interior mutability so one
/// storage can back several persisted containers.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// A state container that can be stored under a fixed key.
pub trait Persistable: Serialize + DeserializeOwned + Default {
    /// Storage key; each container type has its own.
    const STORAGE_KEY: &'static str;
}

impl Persistable for Cart {
    const STORAGE_KEY: &'static str = "cart-storage";
}

impl Persistable for Wishlist {
    const STORAGE_KEY: &'static str = "wishlist-storage";
}

#[derive(Serialize)]
struct SnapshotRef<'a, S> {
    state: &'a S,
    version: u32,
}

#[derive(Deserialize)]
struct Snapshot<S> {
    state: S,
    #[serde(default)]
    version: u32,
}

/// Encode a container as a versioned snapshot.
///
/// # Errors
///
/// Returns an error if the container cannot be serialized.
pub fn encode_snapshot<S: Serialize>(state: &S) -> Result<String, StorageError> {
    Ok(serde_json::to_string(&SnapshotRef {
        state,
        version: SNAPSHOT_VERSION,
    })?)
}

/// Decode a versioned snapshot.
///
/// # Errors
///
/// Returns an error if the text is not a snapshot of `S` or was written by
/// another snapshot version.
pub fn decode_snapshot<S: DeserializeOwned>(raw: &str) -> Result<S, StorageError> {
    let snapshot: Snapshot<S> = serde_json::from_str(raw)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(StorageError::VersionMismatch {
            found: snapshot.version,
            expected: SNAPSHOT_VERSION,
        });
    }
    Ok(snapshot.state)
}

/// A container bound to the storage it is persisted in.
///
/// Reads go straight to the in-memory state. Every [`Persisted::update`]
/// writes the full snapshot back synchronously.
pub struct Persisted<S> {
    state: S,
    storage: Arc<dyn KeyValueStorage>,
}

impl<S: Persistable> Persisted<S> {
    /// Rehydrate from storage. A missing key yields an empty container.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored snapshot cannot be read or decoded.
    /// Use [`Persisted::empty`] to start over in that case.
    pub fn load(storage: Arc<dyn KeyValueStorage>) -> Result<Self, StorageError> {
        let state = match storage.get(S::STORAGE_KEY)? {
            Some(raw) => decode_snapshot(&raw)?,
            None => S::default(),
        };
        Ok(Self { state, storage })
    }

    /// Start with an empty container without reading storage.
    ///
    /// Nothing is written until the first update.
    #[must_use]
    pub fn empty(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            state: S::default(),
            storage,
        }
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> &S {
        &self.state
    }

    /// Apply a mutation and persist the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written. The in-memory
    /// mutation has already happened and is kept.
    pub fn update<R>(&mut self, mutate: impl FnOnce(&mut S) -> R) -> Result<R, StorageError> {
        let result = mutate(&mut self.state);
        self.save()?;
        Ok(result)
    }

    /// Write the current snapshot to storage.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the storage write fails.
    pub fn save(&self) -> Result<(), StorageError> {
        let raw = encode_snapshot(&self.state)?;
        self.storage.set(S::STORAGE_KEY, &raw)
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for Persisted<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persisted")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::product::tests::product;
    use crate::types::{CartItem, ProductId};

    fn line(id: &str, quantity: u32) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            name: "Silk Dress".to_string(),
            price: Decimal::new(39_999, 2),
            image: "https://img.example/8.jpg".to_string(),
            quantity,
        }
    }

    /// Storage whose writes always fail, like a full quota.
    struct FullStorage;

    impl KeyValueStorage for FullStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("quota exceeded")))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_snapshot_envelope_shape() {
        let mut cart = Cart::new();
        cart.add_item(line("8", 1));
        let raw = encode_snapshot(&cart).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value["version"], 0);
        assert_eq!(value["state"]["items"][0]["id"], "8");
        assert_eq!(value["state"]["items"][0]["quantity"], 1);
    }

    #[test]
    fn test_decode_rejects_other_versions() {
        let raw = r#"{"state":{"items":[]},"version":3}"#;
        let err = decode_snapshot::<Cart>(raw).unwrap_err();
        assert!(matches!(
            err,
            StorageError::VersionMismatch {
                found: 3,
                expected: 0
            }
        ));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_snapshot::<Cart>("not json"),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn test_missing_key_loads_empty() {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        let cart = Persisted::<Cart>::load(storage).unwrap();
        assert!(cart.state().is_empty());
    }

    #[test]
    fn test_every_update_is_written_back() {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        let mut cart = Persisted::<Cart>::load(Arc::clone(&storage)).unwrap();
        cart.update(|c| c.add_item(line("8", 2))).unwrap();

        let reloaded = Persisted::<Cart>::load(Arc::clone(&storage)).unwrap();
        assert_eq!(reloaded.state(), cart.state());

        cart.update(Cart::clear).unwrap();
        let reloaded = Persisted::<Cart>::load(storage).unwrap();
        assert!(reloaded.state().is_empty());
    }

    #[test]
    fn test_cart_and_wishlist_use_independent_keys() {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        let mut cart = Persisted::<Cart>::load(Arc::clone(&storage)).unwrap();
        let mut wishlist = Persisted::<Wishlist>::load(Arc::clone(&storage)).unwrap();

        cart.update(|c| c.add_item(line("1", 1))).unwrap();
        wishlist
            .update(|w| w.add(product("2", Decimal::ONE, 0)))
            .unwrap();

        assert!(storage.get("cart-storage").unwrap().is_some());
        assert!(storage.get("wishlist-storage").unwrap().is_some());

        let wishlist = Persisted::<Wishlist>::load(storage).unwrap();
        assert!(wishlist.state().contains(&ProductId::new("2")));
        assert!(!wishlist.state().contains(&ProductId::new("1")));
    }

    #[test]
    fn test_failed_write_keeps_in_memory_state() {
        let mut cart = Persisted::<Cart>::load(Arc::new(FullStorage)).unwrap();
        let result = cart.update(|c| c.add_item(line("1", 1)));

        assert!(matches!(result, Err(StorageError::Io(_))));
        assert_eq!(cart.state().len(), 1);
    }

    #[test]
    fn test_memory_storage_remove() {
        let storage = MemoryStorage::new();
        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
        storage.remove("k").unwrap();
        storage.remove("k").unwrap();
        assert_eq!(storage.get("k").unwrap(), None);
    }
}
