//! Exchange Rate Cache Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Cached USD-pivot FX snapshot
///
/// Created lazily the first time a pricing window misses the cache;
/// read-only afterwards. `eur`/`gbp` are the USD→EUR and USD→GBP rates,
/// `date` is the unix-millis instant the quote was recorded for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRate {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub eur: f64,
    pub gbp: f64,
    pub date: i64,
}
