//! End-to-end revenue computation against an in-memory database with
//! deterministic providers.

mod common;

use common::*;
use revenue_server::RevenueError;
use revenue_server::db::models::{CategoryRevenue, OrderRevenue};
use std::sync::atomic::Ordering;

#[tokio::test]
async fn test_end_to_end_conventional_usd_order() {
    let db = mem_db().await;
    let fx = MockFx::new(0.92, 0.79);
    let market = MockMarket::new(vec![]);
    let service = service(&db, fx, market);

    seed_product(&db, "p1", &["cat1"], &[("US", 100.0)], &[("US", 40.0)]).await;
    seed_line(&db, "l1", "c1", Some("p1"), None, 1, Some(100.0)).await;

    let mut order = paid_order("c1", "US");
    order.discount_total = 10.0;
    order.shipping_total = 5.0;
    insert_order(&db, "o1", order).await;

    let row = service.compute_revenue("o1", "acme").await.unwrap();

    assert_eq!(row.usd_total, 100.0);
    assert_eq!(row.eur_total, 92.0);
    assert_eq!(row.gbp_total, 79.0);
    assert_eq!(row.usd_cost, 40.0);
    assert_eq!(row.eur_cost, 36.8);
    assert_eq!(row.gbp_cost, 31.6);
    assert_eq!(row.usd_discount, 10.0);
    assert_eq!(row.eur_discount, 9.2);
    assert_eq!(row.gbp_discount, 7.9);
    assert_eq!(row.usd_shipping, 5.0);
    assert_eq!(row.eur_shipping, 4.6);
    assert_eq!(row.gbp_shipping, 3.95);

    // One category row, scoped to cat1, totals/costs only
    let categories: Vec<CategoryRevenue> = db.select("category_revenue").await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].category.to_string(), "category:cat1");
    assert_eq!(categories[0].usd_total, 100.0);
    assert_eq!(categories[0].usd_cost, 40.0);
    assert_eq!(categories[0].eur_total, 92.0);
}

#[tokio::test]
async fn test_idempotent_recompute_returns_same_row() {
    let db = mem_db().await;
    let fx = MockFx::new(0.92, 0.79);
    let market = MockMarket::new(vec![]);
    let service = service(&db, fx, market);

    seed_product(&db, "p1", &["cat1"], &[("US", 100.0)], &[("US", 40.0)]).await;
    seed_line(&db, "l1", "c1", Some("p1"), None, 1, Some(100.0)).await;
    insert_order(&db, "o1", paid_order("c1", "US")).await;

    let first = service.compute_revenue("o1", "acme").await.unwrap();
    let second = service.compute_revenue("o1", "acme").await.unwrap();

    assert_eq!(first.usd_total, second.usd_total);
    assert_eq!(first.computed_at, second.computed_at);

    let rows: Vec<OrderRevenue> = db.select("order_revenue").await.unwrap();
    assert_eq!(rows.len(), 1);
    let categories: Vec<CategoryRevenue> = db.select("category_revenue").await.unwrap();
    assert_eq!(categories.len(), 1);
}

#[tokio::test]
async fn test_concurrent_compute_produces_one_row() {
    let db = mem_db().await;
    let fx = MockFx::new(0.92, 0.79);
    let market = MockMarket::new(vec![]);
    let service = std::sync::Arc::new(service(&db, fx, market));

    seed_product(&db, "p1", &["cat1"], &[("US", 100.0)], &[("US", 40.0)]).await;
    seed_line(&db, "l1", "c1", Some("p1"), None, 1, Some(100.0)).await;
    insert_order(&db, "o1", paid_order("c1", "US")).await;

    let a = {
        let service = service.clone();
        tokio::spawn(async move { service.compute_revenue("o1", "acme").await })
    };
    let b = {
        let service = service.clone();
        tokio::spawn(async move { service.compute_revenue("o1", "acme").await })
    };

    let (a, b) = (a.await.unwrap().unwrap(), b.await.unwrap().unwrap());
    assert_eq!(a.usd_total, b.usd_total);

    let rows: Vec<OrderRevenue> = db.select("order_revenue").await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_crypto_settlement_overrides_invoiced_total() {
    let db = mem_db().await;
    let fx = MockFx::new(0.92, 0.79);
    let market = MockMarket::new(vec![(PAID_AT - HOUR_MS + 60_000, 50_000.0)]);
    let service = service(&db, fx, market.clone());

    seed_product(&db, "p1", &["cat1"], &[("US", 999.0)], &[("US", 40.0)]).await;
    seed_line(&db, "l1", "c1", Some("p1"), None, 1, Some(999.0)).await;

    let mut order = paid_order("c1", "US");
    order.payment_method = "NiftiPay".to_string();
    order.total_amount = 999.0; // invoiced figure is NOT what settles
    order.meta = vec![settlement_event("paid", "BTC", 0.01, PAID_AT)];
    insert_order(&db, "o1", order).await;

    let row = service.compute_revenue("o1", "acme").await.unwrap();

    // 0.01 BTC × 50 000 USD, regardless of total_amount
    assert_eq!(row.usd_total, 500.0);
    assert_eq!(row.eur_total, 460.0);
    assert_eq!(row.gbp_total, 395.0);
    // Cost stays native (from the cart lines)
    assert_eq!(row.usd_cost, 40.0);

    // The spot lookup covered the one-hour window ending at date_paid
    let requests = market.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0], ("bitcoin".to_string(), PAID_AT - HOUR_MS, PAID_AT));
}

#[tokio::test]
async fn test_crypto_gb_order_keeps_native_discount() {
    let db = mem_db().await;
    let fx = MockFx::new(0.92, 0.79);
    let market = MockMarket::new(vec![(PAID_AT - HOUR_MS, 50_000.0)]);
    let service = service(&db, fx, market);

    seed_product(&db, "p1", &[], &[("GB", 500.0)], &[("GB", 100.0)]).await;
    seed_line(&db, "l1", "c1", Some("p1"), None, 1, Some(500.0)).await;

    let mut order = paid_order("c1", "GB");
    order.payment_method = "niftipay".to_string();
    order.discount_total = 7.9; // GBP
    order.meta = vec![settlement_event("paid", "ETH", 0.25, PAID_AT)];
    insert_order(&db, "o1", order).await;

    let row = service.compute_revenue("o1", "acme").await.unwrap();

    // Settlement: 0.25 × 50 000 = 12 500 USD, spread from USD
    assert_eq!(row.usd_total, 12_500.0);
    assert_eq!(row.gbp_total, 9_875.0);
    // Discount was paid in GBP and converts through the pivot
    assert_eq!(row.gbp_discount, 7.9);
    assert_eq!(row.usd_discount, 10.0);
}

#[tokio::test]
async fn test_pending_payment_event_prices_underpaid_order() {
    let db = mem_db().await;
    let fx = MockFx::new(0.92, 0.79);
    let market = MockMarket::new(vec![(PAID_AT - HOUR_MS, 2_000.0)]);
    let service = service(&db, fx, market);

    seed_line(&db, "l1", "c1", Some("p_missing"), None, 1, Some(50.0)).await;

    let mut order = paid_order("c1", "US");
    order.payment_method = "niftipay".to_string();
    order.status = revenue_server::db::models::OrderStatus::PendingPayment;
    order.date_paid = None;
    order.date_created = PAID_AT;
    order.meta = vec![settlement_event("pending_payment", "ETH", 0.02, PAID_AT)];
    insert_order(&db, "o1", order).await;

    let row = service.compute_revenue("o1", "acme").await.unwrap();
    assert_eq!(row.usd_total, 40.0);
}

#[tokio::test]
async fn test_unsupported_asset_fails_closed() {
    let db = mem_db().await;
    let fx = MockFx::new(0.92, 0.79);
    let market = MockMarket::new(vec![(PAID_AT - HOUR_MS, 1.0)]);
    let service = service(&db, fx, market);

    seed_product(&db, "p1", &["cat1"], &[("US", 100.0)], &[("US", 40.0)]).await;
    seed_line(&db, "l1", "c1", Some("p1"), None, 1, Some(100.0)).await;

    let mut order = paid_order("c1", "US");
    order.payment_method = "niftipay".to_string();
    order.meta = vec![settlement_event("paid", "FAKE", 1.0, PAID_AT)];
    insert_order(&db, "o1", order).await;

    let err = service.compute_revenue("o1", "acme").await.unwrap_err();
    assert!(matches!(err, RevenueError::UnsupportedAsset(t) if t == "FAKE"));

    // Nothing was persisted
    let rows: Vec<OrderRevenue> = db.select("order_revenue").await.unwrap();
    assert!(rows.is_empty());
    let categories: Vec<CategoryRevenue> = db.select("category_revenue").await.unwrap();
    assert!(categories.is_empty());
}

#[tokio::test]
async fn test_order_not_found() {
    let db = mem_db().await;
    let fx = MockFx::new(0.92, 0.79);
    let market = MockMarket::new(vec![]);
    let service = service(&db, fx, market);

    let err = service.compute_revenue("nope", "acme").await.unwrap_err();
    assert!(matches!(err, RevenueError::OrderNotFound(_)));
}

#[tokio::test]
async fn test_order_scoped_by_organization() {
    let db = mem_db().await;
    let fx = MockFx::new(0.92, 0.79);
    let market = MockMarket::new(vec![]);
    let service = service(&db, fx, market);

    seed_line(&db, "l1", "c1", Some("p1"), None, 1, Some(10.0)).await;
    insert_order(&db, "o1", paid_order("c1", "US")).await;

    let err = service
        .compute_revenue("o1", "someone-else")
        .await
        .unwrap_err();
    assert!(matches!(err, RevenueError::OrderNotFound(_)));
}

#[tokio::test]
async fn test_gbp_round_trip_consistency() {
    let db = mem_db().await;
    let fx = MockFx::new(0.92, 0.79);
    let market = MockMarket::new(vec![]);
    let service = service(&db, fx, market);

    seed_line(&db, "l1", "c1", Some("p1"), None, 1, Some(100.0)).await;
    insert_order(&db, "o1", paid_order("c1", "GB")).await;

    let row = service.compute_revenue("o1", "acme").await.unwrap();

    assert_eq!(row.gbp_total, 100.0);
    // USD total × USDGBP recovers the GBP total within rounding
    assert!((row.usd_total * 0.79 - row.gbp_total).abs() < 0.01);
    // EUR total × USDGBP/USDEUR recovers the GBP total within rounding
    assert!((row.eur_total * 0.79 / 0.92 - row.gbp_total).abs() < 0.01);
}

#[tokio::test]
async fn test_eurozone_round_trip_consistency() {
    let db = mem_db().await;
    let fx = MockFx::new(0.92, 0.79);
    let market = MockMarket::new(vec![]);
    let service = service(&db, fx, market);

    seed_line(&db, "l1", "c1", Some("p1"), None, 1, Some(92.0)).await;
    let mut order = paid_order("c1", "DE");
    order.total_amount = 92.0;
    insert_order(&db, "o1", order).await;

    let row = service.compute_revenue("o1", "acme").await.unwrap();

    assert_eq!(row.eur_total, 92.0);
    assert!((row.usd_total * 0.92 - row.eur_total).abs() < 0.01);
    assert_eq!(row.usd_total, 100.0);
    assert_eq!(row.gbp_total, 79.0);
}

#[tokio::test]
async fn test_category_aggregation_collapses_per_category() {
    let db = mem_db().await;
    let fx = MockFx::new(0.92, 0.79);
    let market = MockMarket::new(vec![]);
    let service = service(&db, fx, market);

    // Same product in two lines with different checkout prices
    seed_product(&db, "p1", &["cat1"], &[("US", 10.0)], &[("US", 4.0)]).await;
    seed_line(&db, "l1", "c1", Some("p1"), None, 2, Some(10.0)).await;
    seed_line(&db, "l2", "c1", Some("p1"), None, 3, Some(12.0)).await;

    let mut order = paid_order("c1", "US");
    order.total_amount = 56.0;
    insert_order(&db, "o1", order).await;

    service.compute_revenue("o1", "acme").await.unwrap();

    let categories: Vec<CategoryRevenue> = db.select("category_revenue").await.unwrap();
    assert_eq!(categories.len(), 1);
    // 2×10 + 3×12 = 56
    assert_eq!(categories[0].usd_total, 56.0);
    // 5 units at cost 4
    assert_eq!(categories[0].usd_cost, 20.0);
}

#[tokio::test]
async fn test_product_in_two_categories_contributes_to_both() {
    let db = mem_db().await;
    let fx = MockFx::new(0.92, 0.79);
    let market = MockMarket::new(vec![]);
    let service = service(&db, fx, market);

    seed_product(&db, "p1", &["cat1", "cat2"], &[("US", 10.0)], &[("US", 4.0)]).await;
    seed_line(&db, "l1", "c1", Some("p1"), None, 2, Some(10.0)).await;
    insert_order(&db, "o1", paid_order("c1", "US")).await;

    service.compute_revenue("o1", "acme").await.unwrap();

    let mut categories: Vec<CategoryRevenue> = db.select("category_revenue").await.unwrap();
    categories.sort_by_key(|c| c.category.to_string());
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].usd_total, 20.0);
    assert_eq!(categories[1].usd_total, 20.0);
}

#[tokio::test]
async fn test_affiliate_lines_costed_but_not_totalled() {
    let db = mem_db().await;
    let fx = MockFx::new(0.92, 0.79);
    let market = MockMarket::new(vec![]);
    let service = service(&db, fx, market);

    seed_product(&db, "p1", &["cat1"], &[("US", 100.0)], &[("US", 40.0)]).await;
    seed_line(&db, "l1", "c1", Some("p1"), None, 1, Some(100.0)).await;
    seed_affiliate_product(&db, "a1", &[("US", 2.0)]).await;
    seed_affiliate_line(&db, "l2", "c1", "a1", 3).await;

    insert_order(&db, "o1", paid_order("c1", "US")).await;

    let row = service.compute_revenue("o1", "acme").await.unwrap();

    // 40 from the first-party line + 3 × 2 from the affiliate line
    assert_eq!(row.usd_cost, 46.0);
    // Affiliate lines never appear in the category breakdown
    let categories: Vec<CategoryRevenue> = db.select("category_revenue").await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].usd_cost, 40.0);
}

#[tokio::test]
async fn test_catalog_price_fallback_when_checkout_price_missing() {
    let db = mem_db().await;
    let fx = MockFx::new(0.92, 0.79);
    let market = MockMarket::new(vec![]);
    let service = service(&db, fx, market);

    seed_product(&db, "p1", &["cat1"], &[("US", 25.0)], &[("US", 10.0)]).await;
    seed_line(&db, "l1", "c1", Some("p1"), None, 2, None).await;
    insert_order(&db, "o1", paid_order("c1", "US")).await;

    service.compute_revenue("o1", "acme").await.unwrap();

    let categories: Vec<CategoryRevenue> = db.select("category_revenue").await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].usd_total, 50.0);
}

#[tokio::test]
async fn test_existing_snapshot_short_circuits_before_order_load() {
    let db = mem_db().await;
    let fx = MockFx::new(0.92, 0.79);
    let market = MockMarket::new(vec![]);
    let service = service(&db, fx, market.clone());

    // A snapshot exists for an order that is not even in the database
    let existing = OrderRevenue {
        id: None,
        order: rid("order", "ghost"),
        organization: rid("organization", "acme"),
        usd_total: 77.0,
        gbp_total: 60.83,
        eur_total: 70.84,
        usd_discount: 0.0,
        gbp_discount: 0.0,
        eur_discount: 0.0,
        usd_shipping: 0.0,
        gbp_shipping: 0.0,
        eur_shipping: 0.0,
        usd_cost: 0.0,
        gbp_cost: 0.0,
        eur_cost: 0.0,
        computed_at: PAID_AT,
    };
    let _: Option<OrderRevenue> = db
        .create(("order_revenue", "ghost"))
        .content(existing)
        .await
        .unwrap();

    let row = service.compute_revenue("ghost", "acme").await.unwrap();
    assert_eq!(row.usd_total, 77.0);
    // No provider traffic for an already-computed order
    assert!(market.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_quote_cache_hit_across_orders_in_same_window() {
    let db = mem_db().await;
    let fx = MockFx::new(0.92, 0.79);
    let market = MockMarket::new(vec![]);
    let service = service(&db, fx.clone(), market);

    seed_line(&db, "l1", "c1", Some("p1"), None, 1, Some(10.0)).await;
    seed_line(&db, "l2", "c2", Some("p1"), None, 1, Some(10.0)).await;
    insert_order(&db, "o1", paid_order("c1", "US")).await;
    insert_order(&db, "o2", paid_order("c2", "US")).await;

    service.compute_revenue("o1", "acme").await.unwrap();
    service.compute_revenue("o2", "acme").await.unwrap();

    // Same pricing window: the second computation reads the cached quote
    assert_eq!(fx.calls.load(Ordering::SeqCst), 1);
}
