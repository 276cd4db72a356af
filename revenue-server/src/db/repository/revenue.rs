//! Revenue Repository
//!
//! Persistence of the computed snapshots. `order_revenue` rows are keyed by
//! the order's record key: a concurrent duplicate CREATE fails inside the
//! transaction and rolls the category rows back with it, so at most one
//! snapshot per order can ever exist.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{CategoryRevenue, OrderRevenue};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "order_revenue";

#[derive(Clone)]
pub struct RevenueRepository {
    base: BaseRepository,
}

impl RevenueRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Existing snapshot for an order, if any
    pub async fn find_by_order(&self, order: &RecordId) -> RepoResult<Option<OrderRevenue>> {
        let revenue: Option<OrderRevenue> = self
            .base
            .db()
            .select((TABLE, order.key().to_string()))
            .await?;
        Ok(revenue)
    }

    /// Category breakdown of an order's snapshot
    pub async fn categories_for_order(
        &self,
        order: &RecordId,
    ) -> RepoResult<Vec<CategoryRevenue>> {
        // `order` needs escaping: it is a keyword in SurrealQL clauses
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM category_revenue WHERE `order` = $order")
            .bind(("order", order.clone()))
            .await?;
        let categories: Vec<CategoryRevenue> = result.take(0)?;
        Ok(categories)
    }

    /// Persist the order snapshot and its category rows in one transaction.
    ///
    /// The order row is created under `order_revenue:<order key>`; if that
    /// record already exists the whole transaction fails and the error is
    /// classified as [`RepoError::Duplicate`], leaving no category rows
    /// behind.
    pub async fn create_snapshot(
        &self,
        order: &RecordId,
        revenue: OrderRevenue,
        categories: Vec<CategoryRevenue>,
    ) -> RepoResult<OrderRevenue> {
        let result = self
            .base
            .db()
            .query(
                r#"
                BEGIN TRANSACTION;
                CREATE type::thing($table, $key) CONTENT $revenue;
                INSERT INTO category_revenue $categories;
                COMMIT TRANSACTION;
                "#,
            )
            .bind(("table", TABLE))
            .bind(("key", order.key().to_string()))
            .bind(("revenue", revenue))
            .bind(("categories", categories))
            .await?;

        // Surface any per-statement error (including the duplicate CREATE)
        result.check()?;

        self.find_by_order(order)
            .await?
            .ok_or_else(|| RepoError::Database("Snapshot missing after insert".to_string()))
    }
}
