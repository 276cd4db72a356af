//! Repository Module
//!
//! Query access to the SurrealDB tables, one repository per aggregate.
//! Raw SurrealQL with bound parameters; no string-built queries.

pub mod catalog;
pub mod exchange_rate;
pub mod order;
pub mod revenue;
pub mod sharing;

// Re-exports
pub use catalog::CatalogRepository;
pub use exchange_rate::ExchangeRateRepository;
pub use order::OrderRepository;
pub use revenue::RevenueRepository;
pub use sharing::SharingRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let message = err.to_string();
        // A CREATE on an existing record id surfaces as a plain database
        // error; classify it so callers can treat it as "lost the race"
        if message.contains("already exists") {
            RepoError::Duplicate(message)
        } else {
            RepoError::Database(message)
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
