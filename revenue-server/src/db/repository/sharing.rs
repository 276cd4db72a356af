//! Sharing Repository
//!
//! Lookups across the product-sharing graph: is a product a shared clone,
//! which source variation does a clone variation map to, and what
//! product-level cost did the supplier list for the share link.

use super::{BaseRepository, RepoResult};
use crate::db::models::{SharedProduct, SharedProductMapping, SharedVariationMapping};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct SharingRepository {
    base: BaseRepository,
}

impl SharingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Is this product the target of a share mapping?
    pub async fn find_product_mapping(
        &self,
        target_product: &RecordId,
    ) -> RepoResult<Option<SharedProductMapping>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM shared_product_mapping WHERE target_product = $target LIMIT 1")
            .bind(("target", target_product.clone()))
            .await?;
        let mappings: Vec<SharedProductMapping> = result.take(0)?;
        Ok(mappings.into_iter().next())
    }

    /// Resolve a clone's variation to the corresponding source variation
    pub async fn find_variation_mapping(
        &self,
        mapping: &SharedProductMapping,
        target_variation: &RecordId,
    ) -> RepoResult<Option<SharedVariationMapping>> {
        let mut result = self
            .base
            .db()
            .query(
                r#"
                SELECT * FROM shared_variation_mapping
                WHERE share_link = $link
                    AND source_product = $source
                    AND target_product = $target
                    AND target_variation = $variation
                LIMIT 1
                "#,
            )
            .bind(("link", mapping.share_link.clone()))
            .bind(("source", mapping.source_product.clone()))
            .bind(("target", mapping.target_product.clone()))
            .bind(("variation", target_variation.clone()))
            .await?;
        let mappings: Vec<SharedVariationMapping> = result.take(0)?;
        Ok(mappings.into_iter().next())
    }

    /// Supplier-listed product-level cost for a share link / source product
    pub async fn find_shared_product(
        &self,
        share_link: &str,
        source_product: &RecordId,
    ) -> RepoResult<Option<SharedProduct>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM shared_product WHERE share_link = $link AND source_product = $source LIMIT 1",
            )
            .bind(("link", share_link.to_string()))
            .bind(("source", source_product.clone()))
            .await?;
        let products: Vec<SharedProduct> = result.take(0)?;
        Ok(products.into_iter().next())
    }
}
