//! FX Quote Cache
//!
//! Serves USD→EUR/GBP rates for a pricing window. Cached rows win; on a
//! miss the live endpoint is called once and the result is cached under the
//! window's reference instant. Concurrent misses for overlapping windows
//! are serialized by a fill lock so the provider is hit once, not once per
//! caller.

use super::ProviderError;
use crate::db::repository::ExchangeRateRepository;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::Mutex;

/// USD-pivot rates for one pricing window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsdRates {
    /// USD→EUR
    pub eur: f64,
    /// USD→GBP
    pub gbp: f64,
}

/// Raw quotes from the live endpoint; either side may be missing
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveQuotes {
    pub usd_eur: Option<f64>,
    pub usd_gbp: Option<f64>,
}

/// Live FX quote source
#[async_trait]
pub trait FxQuoteProvider: Send + Sync {
    async fn live_usd_quotes(&self) -> Result<LiveQuotes, ProviderError>;
}

/// Client for a currencylayer-style `/live` endpoint
pub struct LiveFxClient {
    client: reqwest::Client,
    base_url: String,
    access_key: String,
}

impl LiveFxClient {
    pub fn new(client: reqwest::Client, base_url: String, access_key: String) -> Self {
        Self {
            client,
            base_url,
            access_key,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LiveResponse {
    #[serde(default)]
    quotes: HashMap<String, f64>,
}

#[async_trait]
impl FxQuoteProvider for LiveFxClient {
    async fn live_usd_quotes(&self) -> Result<LiveQuotes, ProviderError> {
        let url = format!("{}/live", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .query(&[
                ("access_key", self.access_key.as_str()),
                ("source", "USD"),
                ("currencies", "EUR,GBP"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: LiveResponse = response.json().await?;
        Ok(LiveQuotes {
            usd_eur: body.quotes.get("USDEUR").copied(),
            usd_gbp: body.quotes.get("USDGBP").copied(),
        })
    }
}

/// Quote cache over the `exchange_rate` table
pub struct QuoteService {
    repo: ExchangeRateRepository,
    provider: Arc<dyn FxQuoteProvider>,
    /// Serializes cache fills so concurrent misses fetch once
    fill_lock: Mutex<()>,
}

impl QuoteService {
    pub fn new(db: Surreal<Db>, provider: Arc<dyn FxQuoteProvider>) -> Self {
        Self {
            repo: ExchangeRateRepository::new(db),
            provider,
            fill_lock: Mutex::new(()),
        }
    }

    /// Rates for a pricing window (`start`..`end`, unix millis).
    ///
    /// A cached quote dated inside the window is returned verbatim. On a
    /// miss, the live endpoint supplies both quotes (a response missing
    /// either one is `Unavailable`) and the result is cached dated
    /// `reference`.
    pub async fn rates_for_window(
        &self,
        start: i64,
        end: i64,
        reference: i64,
    ) -> Result<UsdRates, ProviderError> {
        if let Some(cached) = self.repo.find_in_window(start, end).await? {
            return validated(cached.eur, cached.gbp);
        }

        let _fill = self.fill_lock.lock().await;

        // Another task may have filled the cache while we waited
        if let Some(cached) = self.repo.find_in_window(start, end).await? {
            return validated(cached.eur, cached.gbp);
        }

        let live = self.provider.live_usd_quotes().await?;
        let (Some(eur), Some(gbp)) = (live.usd_eur, live.usd_gbp) else {
            return Err(ProviderError::Unavailable(
                "live FX response missing USDEUR/USDGBP quotes".to_string(),
            ));
        };

        let rates = validated(eur, gbp)?;
        let cached = self.repo.insert(eur, gbp, reference).await?;
        tracing::info!(
            eur = cached.eur,
            gbp = cached.gbp,
            date = cached.date,
            "Cached fresh FX quotes"
        );
        Ok(rates)
    }
}

/// Rates must be positive; conversion divides by them
fn validated(eur: f64, gbp: f64) -> Result<UsdRates, ProviderError> {
    if eur > 0.0 && gbp > 0.0 && eur.is_finite() && gbp.is_finite() {
        Ok(UsdRates { eur, gbp })
    } else {
        Err(ProviderError::Unavailable(format!(
            "non-positive FX quotes (eur={eur}, gbp={gbp})"
        )))
    }
}
