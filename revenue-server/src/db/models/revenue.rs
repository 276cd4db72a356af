//! Revenue Snapshot Models
//!
//! The computed artifacts. `order_revenue` rows are keyed by the order's
//! record key, which is what makes the computation insert-once: a second
//! CREATE for the same order fails instead of duplicating the snapshot.
//! All monetary fields are rounded to 2 decimal places at persistence.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Order-level revenue snapshot (one per order, immutable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRevenue {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub order: RecordId,
    pub organization: RecordId,
    pub usd_total: f64,
    pub gbp_total: f64,
    pub eur_total: f64,
    pub usd_discount: f64,
    pub gbp_discount: f64,
    pub eur_discount: f64,
    pub usd_shipping: f64,
    pub gbp_shipping: f64,
    pub eur_shipping: f64,
    pub usd_cost: f64,
    pub gbp_cost: f64,
    pub eur_cost: f64,
    pub computed_at: i64,
}

/// Category-level revenue snapshot (one per distinct category touched by the
/// order's lines, written in the same transaction as the order row)
///
/// Discounts and shipping are order-level figures and are not allocated per
/// category, so category rows carry totals and costs only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRevenue {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub order: RecordId,
    pub organization: RecordId,
    pub category: RecordId,
    pub usd_total: f64,
    pub gbp_total: f64,
    pub eur_total: f64,
    pub usd_cost: f64,
    pub gbp_cost: f64,
    pub eur_cost: f64,
    pub computed_at: i64,
}
