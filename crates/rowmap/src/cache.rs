use std::{
    any::Any,
    collections::HashMap,
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

/// Last known version of every record read or written, keyed by table and
/// `Id`.
///
/// Entries are only trusted after their hash has been compared with the
/// `Hash` column currently stored for the key. The cache can be shared by
/// several [`Db`](crate::Db) handles.
#[derive(Default)]
pub struct IdentityCache {
    entries: RwLock<HashMap<Key, Entry>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Key {
    table: String,
    id: i64,
}

struct Entry {
    hash: String,
    record: Arc<dyn Any + Send + Sync>,
}

impl Key {
    fn new(table: &str, id: i64) -> Key {
        Key {
            table: table.to_string(),
            id,
        }
    }
}

impl IdentityCache {
    pub fn new() -> IdentityCache {
        IdentityCache::default()
    }

    /// Returns a copy of the cached record. `None` if absent or if the entry
    /// holds a different type.
    pub fn get<M: Any + Clone>(&self, table: &str, id: i64) -> Option<M> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(&Key::new(table, id))
            .and_then(|entry| entry.record.downcast_ref::<M>())
            .cloned()
    }

    pub fn get_hash(&self, table: &str, id: i64) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(&Key::new(table, id))
            .map(|entry| entry.hash.clone())
    }

    /// Inserts or replaces an entry.
    pub fn put<M: Any + Send + Sync>(&self, table: &str, id: i64, hash: impl Into<String>, record: M) {
        let entry = Entry {
            hash: hash.into(),
            record: Arc::new(record),
        };

        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(Key::new(table, id), entry);
    }

    /// Removes an entry. Returns `true` if there was one.
    pub fn invalidate(&self, table: &str, id: i64) -> bool {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&Key::new(table, id))
            .is_some()
    }

    pub fn invalidate_table(&self, table: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|key, _| key.table != table);
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for IdentityCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityCache")
            .field("len", &self.len())
            .finish()
    }
}
