//! MessagePack implementation of the Q-table repository.
//!
//! Stores one file per user id under a base directory, serialized with
//! rmp_serde for compact binary storage.

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::PathBuf,
};

use crate::{
    Result, error::Error, identifiers::UserId, ports::QTableRepository, q_learning::QTable,
};

/// MessagePack-based Q-table repository.
///
/// # Examples
///
/// ```no_run
/// use melodiq::adapters::MsgPackRepository;
/// use melodiq::identifiers::UserId;
/// use melodiq::ports::QTableRepository;
/// use melodiq::q_learning::QTable;
///
/// let repo = MsgPackRepository::new("q_tables");
/// let user = UserId::new("000000");
/// repo.save(&user, &QTable::new(0.1, 0.9))?;
/// let loaded = repo.load(&user)?;
/// # Ok::<(), melodiq::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct MsgPackRepository {
    base_dir: PathBuf,
}

impl MsgPackRepository {
    /// Create a repository rooted at `base_dir`.
    ///
    /// The directory is created lazily on the first save.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn record_path(&self, user_id: &UserId) -> PathBuf {
        self.base_dir.join(format!("q_table_{user_id}.msgpack"))
    }
}

impl QTableRepository for MsgPackRepository {
    fn save(&self, user_id: &UserId, q_table: &QTable) -> Result<()> {
        std::fs::create_dir_all(&self.base_dir).map_err(|source| Error::Io {
            operation: format!("create directory {:?}", self.base_dir),
            source,
        })?;

        let path = self.record_path(user_id);
        let file = File::create(&path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, q_table).map_err(|e| {
            Error::SerializationContext {
                operation: "serialize Q-table to MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(())
    }

    fn load(&self, user_id: &UserId) -> Result<QTable> {
        let path = self.record_path(user_id);
        if !path.exists() {
            return Err(Error::UserNotFound {
                user_id: user_id.to_string(),
            });
        }

        let file = File::open(&path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;
        let reader = BufReader::new(file);

        rmp_serde::decode::from_read(reader).map_err(|e| Error::SerializationContext {
            operation: "deserialize Q-table from MessagePack".to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{action::Action, state::StateKey, track::Track};

    fn sample_table() -> QTable {
        let mut table = QTable::new(0.1, 0.9);
        let track = Track {
            melody: vec![],
            percussion: vec![],
        };
        table.set(StateKey::encode(&track), Action::RaisePitch(0), 2.57);
        table
    }

    #[test]
    fn test_msgpack_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = MsgPackRepository::new(temp_dir.path());
        let user = UserId::new("000000");

        let table = sample_table();
        repo.save(&user, &table).expect("Failed to save");
        let loaded = repo.load(&user).expect("Failed to load");

        assert_eq!(table, loaded);
    }

    #[test]
    fn test_load_unknown_user_is_not_found() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = MsgPackRepository::new(temp_dir.path());

        let result = repo.load(&UserId::new("nobody"));
        assert!(matches!(result, Err(Error::UserNotFound { .. })));
    }

    #[test]
    fn test_save_to_invalid_path_returns_error() {
        let repo = MsgPackRepository::new("/proc/invalid_dir_12345");
        let result = repo.save(&UserId::new("000000"), &sample_table());
        assert!(result.is_err());
    }
}
