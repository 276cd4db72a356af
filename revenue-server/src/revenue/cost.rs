//! Effective unit cost resolution
//!
//! A dropshipper's own `cost` field is the markup price charged to the end
//! customer, not what the goods cost them. When the product being sold is a
//! shared clone, the authoritative cost comes from the supplier's catalog,
//! one hop across the sharing link: the mapped source variation's cost when
//! the sale is variation-specific, else the product-level cost recorded on
//! the shared listing. Ordinary products use their own variation/product
//! cost maps. Missing cost data resolves to 0, never an error.
//!
//! Lookups are memoized for the lifetime of one revenue computation; the
//! resolver is constructed per computation and discarded afterwards.

use crate::db::models::SharedProductMapping;
use crate::db::repository::{CatalogRepository, RepoResult, SharingRepository};
use std::collections::HashMap;
use surrealdb::RecordId;

pub struct CostResolver {
    catalog: CatalogRepository,
    sharing: SharingRepository,
    /// Per-product share-mapping lookups (a product's sharing relationship
    /// does not change mid-computation)
    mapping_cache: HashMap<String, Option<SharedProductMapping>>,
    /// Per-(product, variation, country) resolved costs
    cost_cache: HashMap<String, f64>,
}

impl CostResolver {
    pub fn new(catalog: CatalogRepository, sharing: SharingRepository) -> Self {
        Self {
            catalog,
            sharing,
            mapping_cache: HashMap::new(),
            cost_cache: HashMap::new(),
        }
    }

    /// Effective unit cost of a product (optionally a specific variation)
    /// for a country
    pub async fn effective_unit_cost(
        &mut self,
        product: &RecordId,
        variation: Option<&RecordId>,
        country: &str,
    ) -> RepoResult<f64> {
        let key = format!(
            "{}|{}|{}",
            product,
            variation.map(|v| v.to_string()).unwrap_or_default(),
            country
        );
        if let Some(cost) = self.cost_cache.get(&key) {
            return Ok(*cost);
        }

        let cost = self.resolve(product, variation, country).await?;
        self.cost_cache.insert(key, cost);
        Ok(cost)
    }

    async fn resolve(
        &mut self,
        product: &RecordId,
        variation: Option<&RecordId>,
        country: &str,
    ) -> RepoResult<f64> {
        if let Some(mapping) = self.mapping_for(product).await? {
            // Shared clone: variation-level mapping is most specific
            if let Some(variation) = variation
                && let Some(var_mapping) = self
                    .sharing
                    .find_variation_mapping(&mapping, variation)
                    .await?
            {
                let cost_map = self
                    .catalog
                    .variation_cost(&var_mapping.source_variation)
                    .await?;
                if let Some(cost) = cost_map.amount_for(country)
                    && cost != 0.0
                {
                    return Ok(cost);
                }
            }

            // Product-level cost recorded on the shared listing
            let listing = self
                .sharing
                .find_shared_product(&mapping.share_link, &mapping.source_product)
                .await?;
            return Ok(listing
                .and_then(|l| l.cost.amount_for(country))
                .unwrap_or(0.0));
        }

        // Ordinary product: its own variation cost wins when non-zero
        if let Some(variation) = variation {
            let cost_map = self.catalog.variation_cost(variation).await?;
            if let Some(cost) = cost_map.amount_for(country)
                && cost != 0.0
            {
                return Ok(cost);
            }
        }

        let cost_map = self.catalog.product_cost(product).await?;
        Ok(cost_map.amount_for(country).unwrap_or(0.0))
    }

    async fn mapping_for(
        &mut self,
        product: &RecordId,
    ) -> RepoResult<Option<SharedProductMapping>> {
        let key = product.to_string();
        if let Some(cached) = self.mapping_cache.get(&key) {
            return Ok(cached.clone());
        }

        let mapping = self.sharing.find_product_mapping(product).await?;
        self.mapping_cache.insert(key, mapping.clone());
        Ok(mapping)
    }
}
