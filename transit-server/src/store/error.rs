//! Errors from the backing stores.

/// Error from a database-backed store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The database rejected or failed the query.
    #[error("database query failed: {0}")]
    Database(#[from] sqlx::Error),
}
