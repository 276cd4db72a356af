//! Catalog Models
//!
//! Products and variations carry country-keyed `regular_price`/`cost` maps.
//! For dropshipped clones the clone's own `cost` field is the dropshipper's
//! markup, not the supplier cost; see the sharing models.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::CountryAmounts;
use surrealdb::RecordId;

/// Product model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    /// Record links to category
    #[serde(default)]
    pub categories: Vec<RecordId>,
    #[serde(default)]
    pub regular_price: CountryAmounts,
    #[serde(default)]
    pub cost: CountryAmounts,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Affiliate ("points") product model
///
/// Affiliate products are not shareable, so their own cost map is always
/// authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffiliateProduct {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub cost: CountryAmounts,
}

/// Product variation model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductVariation {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    /// Record link to the parent product
    pub product: RecordId,
    pub name: String,
    #[serde(default)]
    pub regular_price: CountryAmounts,
    #[serde(default)]
    pub cost: CountryAmounts,
}
