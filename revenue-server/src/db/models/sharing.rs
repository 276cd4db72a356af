//! Product Sharing Models
//!
//! A cross-organization share link lets a dropshipper list a clone of a
//! supplier's product. The clone's own cost field is the dropshipper's
//! markup; the supplier's true cost lives on the sharing side and is
//! authoritative. Resolution walks the sharing graph exactly one hop.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::CountryAmounts;
use surrealdb::RecordId;

/// Marks `target_product` as a shared clone of `source_product`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedProductMapping {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub share_link: String,
    pub source_product: RecordId,
    pub target_product: RecordId,
}

/// Maps a clone's variation to the corresponding source variation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedVariationMapping {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub share_link: String,
    pub source_product: RecordId,
    pub target_product: RecordId,
    pub target_variation: RecordId,
    pub source_variation: RecordId,
}

/// Supplier-listed product-level cost for a share link
///
/// Fallback when no variation-level cost resolves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedProduct {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub share_link: String,
    pub source_product: RecordId,
    #[serde(default)]
    pub cost: CountryAmounts,
}
