//! Shared domain types for the revenue reconciliation service
//!
//! Types used by the server and by its callers (payment-webhook handlers,
//! back-office jobs): settlement currency classification, crypto asset
//! ticker normalization, and country-keyed amount maps with tolerant
//! JSON decoding.

pub mod asset;
pub mod cost_map;
pub mod currency;

// Re-exports
pub use asset::canonical_asset_id;
pub use cost_map::CountryAmounts;
pub use currency::{EUROZONE_COUNTRIES, SettlementCurrency};
