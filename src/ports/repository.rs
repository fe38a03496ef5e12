//! Repository port for Q-table persistence.
//!
//! One stored record per user identifier, holding that user's learned
//! Q-table as an opaque serialized blob.

use crate::{Result, identifiers::UserId, q_learning::QTable};

/// Port for persisting and loading Q-tables keyed by user id.
///
/// This trait abstracts the storage mechanism, allowing different
/// implementations (MessagePack files, in-memory maps, databases) without
/// coupling the learning core to a serialization format.
pub trait QTableRepository {
    /// Save a user's Q-table, replacing any previous record.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the store cannot be
    /// written.
    fn save(&self, user_id: &UserId, q_table: &QTable) -> Result<()>;

    /// Load a user's Q-table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UserNotFound`](crate::Error::UserNotFound) if no
    /// record exists for `user_id`; other errors indicate a corrupted or
    /// unreadable record.
    fn load(&self, user_id: &UserId) -> Result<QTable>;
}
