//! In-memory Q-table repository for testing.
//!
//! Pure in-memory implementation of the repository port, enabling fast
//! tests without any file system I/O.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::{
    Result, error::Error, identifiers::UserId, ports::QTableRepository, q_learning::QTable,
};

/// In-memory repository keyed by user id.
///
/// Thread-safe; clones share the same underlying storage. Records are held
/// as serialized bytes so the round trip exercises the same encoding path
/// as the file-backed repository.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<UserId, Vec<u8>>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            storage: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of Q-tables currently stored.
    pub fn count(&self) -> usize {
        self.storage.lock().unwrap().len()
    }

    /// Check whether a record exists for `user_id`.
    pub fn contains(&self, user_id: &UserId) -> bool {
        self.storage.lock().unwrap().contains_key(user_id)
    }

    /// Remove all stored records.
    pub fn clear(&self) {
        self.storage.lock().unwrap().clear();
    }
}

impl QTableRepository for InMemoryRepository {
    fn save(&self, user_id: &UserId, q_table: &QTable) -> Result<()> {
        let bytes = rmp_serde::to_vec(q_table).map_err(|e| Error::SerializationContext {
            operation: "serialize Q-table for in-memory storage".to_string(),
            message: e.to_string(),
        })?;

        self.storage.lock().unwrap().insert(user_id.clone(), bytes);
        Ok(())
    }

    fn load(&self, user_id: &UserId) -> Result<QTable> {
        let storage = self.storage.lock().unwrap();
        let bytes = storage.get(user_id).ok_or_else(|| Error::UserNotFound {
            user_id: user_id.to_string(),
        })?;

        rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
            operation: "deserialize Q-table from in-memory storage".to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{action::Action, state::StateKey, track::Track};

    fn sample_table() -> QTable {
        let mut table = QTable::new(0.1, 0.9);
        let track = Track {
            melody: vec![],
            percussion: vec![],
        };
        table.set(StateKey::encode(&track), Action::LowerPitch(3), -0.25);
        table
    }

    #[test]
    fn test_in_memory_save_and_load() {
        let repo = InMemoryRepository::new();
        let user = UserId::new("000000");

        assert_eq!(repo.count(), 0);
        assert!(!repo.contains(&user));

        let table = sample_table();
        repo.save(&user, &table).unwrap();
        assert_eq!(repo.count(), 1);
        assert!(repo.contains(&user));

        let loaded = repo.load(&user).unwrap();
        assert_eq!(table, loaded);
    }

    #[test]
    fn test_load_unknown_user_is_not_found() {
        let repo = InMemoryRepository::new();
        let result = repo.load(&UserId::new("nobody"));
        assert!(matches!(result, Err(Error::UserNotFound { .. })));
    }

    #[test]
    fn test_clone_shares_storage() {
        let repo1 = InMemoryRepository::new();
        let repo2 = repo1.clone();
        let user = UserId::new("shared");

        repo1.save(&user, &sample_table()).unwrap();
        assert!(repo2.contains(&user));
        assert_eq!(repo2.count(), 1);
    }
}
