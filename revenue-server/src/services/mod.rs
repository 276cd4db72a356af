//! External Provider Services
//!
//! Integrations with the FX and crypto market-data providers. Each provider
//! sits behind an async trait so tests can substitute deterministic
//! implementations; the live clients share one `reqwest` client with an
//! explicit timeout.

pub mod quotes;
pub mod spot_price;

// Re-exports
pub use quotes::{FxQuoteProvider, LiveFxClient, LiveQuotes, QuoteService, UsdRates};
pub use spot_price::{LiveMarketClient, MarketDataProvider, SpotPriceService};

use crate::db::repository::RepoError;
use thiserror::Error;

/// Errors from the external pricing providers
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Unsupported settlement asset: {0}")]
    UnsupportedAsset(String),

    #[error("Pricing data unavailable: {0}")]
    Unavailable(String),

    #[error("Provider request failed: {0}")]
    Http(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Http(err.to_string())
    }
}

impl From<RepoError> for ProviderError {
    fn from(err: RepoError) -> Self {
        ProviderError::Database(err.to_string())
    }
}
