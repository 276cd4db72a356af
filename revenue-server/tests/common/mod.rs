//! Shared fixtures: in-memory database, deterministic providers, seeders.
#![allow(dead_code)]

use async_trait::async_trait;
use revenue_server::db::DbService;
use revenue_server::db::models::{
    AffiliateProduct, CartProduct, Order, OrderMetaEvent, OrderStatus, Product,
};
use revenue_server::revenue::RevenueService;
use revenue_server::services::{
    FxQuoteProvider, LiveQuotes, MarketDataProvider, ProviderError, QuoteService, SpotPriceService,
};
use shared::CountryAmounts;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

/// Reference paid instant used by the fixtures (unix millis)
pub const PAID_AT: i64 = 1_700_000_000_000;
pub const HOUR_MS: i64 = 3_600_000;

pub struct MockFx {
    pub usd_eur: f64,
    pub usd_gbp: f64,
    pub calls: AtomicUsize,
}

impl MockFx {
    pub fn new(usd_eur: f64, usd_gbp: f64) -> Arc<Self> {
        Arc::new(Self {
            usd_eur,
            usd_gbp,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl FxQuoteProvider for MockFx {
    async fn live_usd_quotes(&self) -> Result<LiveQuotes, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(LiveQuotes {
            usd_eur: Some(self.usd_eur),
            usd_gbp: Some(self.usd_gbp),
        })
    }
}

pub struct MockMarket {
    pub points: Vec<(i64, f64)>,
    /// Recorded (asset_id, from, to) requests
    pub requests: Mutex<Vec<(String, i64, i64)>>,
}

impl MockMarket {
    pub fn new(points: Vec<(i64, f64)>) -> Arc<Self> {
        Arc::new(Self {
            points,
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl MarketDataProvider for MockMarket {
    async fn usd_price_range(
        &self,
        asset_id: &str,
        from: i64,
        to: i64,
    ) -> Result<Vec<(i64, f64)>, ProviderError> {
        self.requests
            .lock()
            .unwrap()
            .push((asset_id.to_string(), from, to));
        Ok(self.points.clone())
    }
}

pub async fn mem_db() -> Surreal<Db> {
    DbService::memory().await.unwrap().db
}

pub fn service(
    db: &Surreal<Db>,
    fx: Arc<MockFx>,
    market: Arc<MockMarket>,
) -> RevenueService {
    RevenueService::new(
        db.clone(),
        QuoteService::new(db.clone(), fx),
        SpotPriceService::new(market),
    )
}

pub fn rid(table: &str, key: &str) -> RecordId {
    RecordId::from_table_key(table, key)
}

pub fn amounts(pairs: &[(&str, f64)]) -> CountryAmounts {
    pairs.iter().map(|(c, a)| (c.to_string(), *a)).collect()
}

/// A conventional, already-paid order; tests tweak fields as needed
pub fn paid_order(cart_key: &str, country: &str) -> Order {
    Order {
        id: None,
        organization: rid("organization", "acme"),
        cart: rid("cart", cart_key),
        country: country.to_string(),
        payment_method: "card".to_string(),
        total_amount: 100.0,
        discount_total: 0.0,
        shipping_total: 0.0,
        status: OrderStatus::Paid,
        date_paid: Some(PAID_AT),
        date_created: PAID_AT - 2 * HOUR_MS,
        meta: Vec::new(),
    }
}

pub async fn insert_order(db: &Surreal<Db>, key: &str, order: Order) {
    let _: Option<Order> = db.create(("order", key)).content(order).await.unwrap();
}

pub async fn seed_product(
    db: &Surreal<Db>,
    key: &str,
    categories: &[&str],
    regular_price: &[(&str, f64)],
    cost: &[(&str, f64)],
) {
    let product = Product {
        id: None,
        name: format!("product {key}"),
        categories: categories.iter().map(|c| rid("category", c)).collect(),
        regular_price: amounts(regular_price),
        cost: amounts(cost),
        is_active: true,
    };
    let _: Option<Product> = db.create(("product", key)).content(product).await.unwrap();
}

pub async fn seed_line(
    db: &Surreal<Db>,
    key: &str,
    cart_key: &str,
    product_key: Option<&str>,
    variation_key: Option<&str>,
    quantity: i32,
    unit_price: Option<f64>,
) {
    let line = CartProduct {
        id: None,
        cart: rid("cart", cart_key),
        product: product_key.map(|p| rid("product", p)),
        variation: variation_key.map(|v| rid("product_variation", v)),
        affiliate_product: None,
        quantity,
        unit_price,
    };
    let _: Option<CartProduct> = db
        .create(("cart_product", key))
        .content(line)
        .await
        .unwrap();
}

pub async fn seed_affiliate_product(db: &Surreal<Db>, key: &str, cost: &[(&str, f64)]) {
    let product = AffiliateProduct {
        id: None,
        name: format!("affiliate {key}"),
        cost: amounts(cost),
    };
    let _: Option<AffiliateProduct> = db
        .create(("affiliate_product", key))
        .content(product)
        .await
        .unwrap();
}

pub async fn seed_affiliate_line(
    db: &Surreal<Db>,
    key: &str,
    cart_key: &str,
    affiliate_key: &str,
    quantity: i32,
) {
    let line = CartProduct {
        id: None,
        cart: rid("cart", cart_key),
        product: None,
        variation: None,
        affiliate_product: Some(rid("affiliate_product", affiliate_key)),
        quantity,
        unit_price: None,
    };
    let _: Option<CartProduct> = db
        .create(("cart_product", key))
        .content(line)
        .await
        .unwrap();
}

/// Settlement-bearing meta event
pub fn settlement_event(name: &str, asset: &str, amount: f64, timestamp: i64) -> OrderMetaEvent {
    use revenue_server::db::models::CryptoSettlement;
    OrderMetaEvent {
        name: name.to_string(),
        timestamp,
        settlement: Some(CryptoSettlement {
            asset: asset.to_string(),
            amount,
            received: Some(amount),
            expected: Some(amount),
        }),
    }
}
