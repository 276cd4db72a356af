//! Exchange Rate Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::ExchangeRate;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "exchange_rate";

#[derive(Clone)]
pub struct ExchangeRateRepository {
    base: BaseRepository,
}

impl ExchangeRateRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Newest cached quote dated inside `[start, end]` (unix millis)
    pub async fn find_in_window(&self, start: i64, end: i64) -> RepoResult<Option<ExchangeRate>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM exchange_rate WHERE date >= $start AND date <= $end ORDER BY date DESC LIMIT 1",
            )
            .bind(("start", start))
            .bind(("end", end))
            .await?;
        let rates: Vec<ExchangeRate> = result.take(0)?;
        Ok(rates.into_iter().next())
    }

    /// Cache a freshly fetched quote
    pub async fn insert(&self, eur: f64, gbp: f64, date: i64) -> RepoResult<ExchangeRate> {
        let row = ExchangeRate {
            id: None,
            eur,
            gbp,
            date,
        };
        let created: Option<ExchangeRate> = self.base.db().create(TABLE).content(row).await?;
        created.ok_or_else(|| RepoError::Database("Failed to cache exchange rate".to_string()))
    }
}
