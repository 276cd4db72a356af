//! Catalog Repository
//!
//! Cost map lookups for products and variations. Projections deserialize
//! through `CountryAmounts`, so string-encoded or missing maps come back
//! empty rather than failing the computation.

use super::{BaseRepository, RepoResult};
use serde::Deserialize;
use shared::CountryAmounts;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Debug, Deserialize)]
struct CostRow {
    #[serde(default)]
    cost: CountryAmounts,
}

#[derive(Clone)]
pub struct CatalogRepository {
    base: BaseRepository,
}

impl CatalogRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// A product's own cost map (empty when the product is missing)
    pub async fn product_cost(&self, product: &RecordId) -> RepoResult<CountryAmounts> {
        let mut result = self
            .base
            .db()
            .query("SELECT cost FROM product WHERE id = $id")
            .bind(("id", product.clone()))
            .await?;
        let rows: Vec<CostRow> = result.take(0)?;
        Ok(rows.into_iter().next().map(|r| r.cost).unwrap_or_default())
    }

    /// A variation's own cost map (empty when the variation is missing)
    pub async fn variation_cost(&self, variation: &RecordId) -> RepoResult<CountryAmounts> {
        let mut result = self
            .base
            .db()
            .query("SELECT cost FROM product_variation WHERE id = $id")
            .bind(("id", variation.clone()))
            .await?;
        let rows: Vec<CostRow> = result.take(0)?;
        Ok(rows.into_iter().next().map(|r| r.cost).unwrap_or_default())
    }
}
