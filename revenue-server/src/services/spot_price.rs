//! Crypto Spot Price Lookup
//!
//! Values a crypto settlement in USD at (roughly) the time money arrived.
//! The gateway ticker is normalized to the market-data provider's canonical
//! asset id; an unknown ticker is a hard stop, because mispricing a
//! settlement is worse than failing loudly.

use super::ProviderError;
use async_trait::async_trait;
use serde::Deserialize;
use shared::canonical_asset_id;

/// Historical price source; points are `(unix millis, price USD)`
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn usd_price_range(
        &self,
        asset_id: &str,
        from: i64,
        to: i64,
    ) -> Result<Vec<(i64, f64)>, ProviderError>;
}

/// Client for a coingecko-style `market_chart/range` endpoint
pub struct LiveMarketClient {
    client: reqwest::Client,
    base_url: String,
}

impl LiveMarketClient {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[derive(Debug, Deserialize)]
struct RangeResponse {
    #[serde(default)]
    prices: Vec<(f64, f64)>,
}

#[async_trait]
impl MarketDataProvider for LiveMarketClient {
    async fn usd_price_range(
        &self,
        asset_id: &str,
        from: i64,
        to: i64,
    ) -> Result<Vec<(i64, f64)>, ProviderError> {
        let url = format!(
            "{}/coins/{}/market_chart/range",
            self.base_url.trim_end_matches('/'),
            asset_id
        );
        // The range endpoint takes unix seconds
        let from_s = (from / 1000).to_string();
        let to_s = (to / 1000).to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("vs_currency", "usd"),
                ("from", from_s.as_str()),
                ("to", to_s.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: RangeResponse = response.json().await?;
        Ok(body
            .prices
            .into_iter()
            .map(|(ts, price)| (ts as i64, price))
            .collect())
    }
}

/// Spot price lookup over a market-data provider
pub struct SpotPriceService {
    provider: std::sync::Arc<dyn MarketDataProvider>,
}

impl SpotPriceService {
    pub fn new(provider: std::sync::Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    /// USD spot price for a gateway ticker within a pricing window.
    ///
    /// Takes the first point the provider returns for the window, not the
    /// point nearest the settlement instant.
    pub async fn price_usd(
        &self,
        ticker: &str,
        start: i64,
        end: i64,
    ) -> Result<f64, ProviderError> {
        let asset_id = canonical_asset_id(ticker)
            .ok_or_else(|| ProviderError::UnsupportedAsset(ticker.to_string()))?;

        let points = self.provider.usd_price_range(asset_id, start, end).await?;
        let (_, price) = points.first().copied().ok_or_else(|| {
            ProviderError::Unavailable(format!("no {asset_id} price points in window"))
        })?;

        if !price.is_finite() || price <= 0.0 {
            return Err(ProviderError::Unavailable(format!(
                "invalid {asset_id} spot price: {price}"
            )));
        }

        tracing::debug!(ticker = %ticker, asset = %asset_id, price = price, "Resolved spot price");
        Ok(price)
    }
}
