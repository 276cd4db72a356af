//! Server state
//!
//! `ServerState` holds the shared service singletons: the embedded database
//! handle and the revenue computation service (which owns the provider
//! clients). Cloning is shallow (`Arc` internals).

use std::sync::Arc;
use std::time::Duration;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::Config;
use crate::db::DbService;
use crate::revenue::RevenueService;
use crate::services::{LiveFxClient, LiveMarketClient, QuoteService, SpotPriceService};

#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// Revenue computation service
    pub revenue: Arc<RevenueService>,
}

impl ServerState {
    pub fn new(config: Config, db: Surreal<Db>, revenue: Arc<RevenueService>) -> Self {
        Self {
            config,
            db,
            revenue,
        }
    }

    /// Initialize the server state
    ///
    /// Opens the database under `work_dir/database/revenue.db` and wires the
    /// live FX/market-data clients into the revenue service.
    ///
    /// # Panics
    ///
    /// Panics when the working directory or database cannot be initialized;
    /// the process cannot run without them.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("revenue.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");
        let db = db_service.db;

        // One HTTP client with an explicit timeout for both providers: an
        // order-status transition must never hang on a third-party API
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.provider_timeout_ms))
            .build()
            .expect("Failed to build HTTP client");

        let fx = Arc::new(LiveFxClient::new(
            http_client.clone(),
            config.fx_api_url.clone(),
            config.fx_access_key.clone(),
        ));
        let market = Arc::new(LiveMarketClient::new(
            http_client,
            config.market_api_url.clone(),
        ));

        let quotes = QuoteService::new(db.clone(), fx);
        let spot = SpotPriceService::new(market);
        let revenue = Arc::new(RevenueService::new(db.clone(), quotes, spot));

        Self::new(config.clone(), db, revenue)
    }

    /// Database handle
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// Revenue service
    pub fn revenue_service(&self) -> &Arc<RevenueService> {
        &self.revenue
    }
}
