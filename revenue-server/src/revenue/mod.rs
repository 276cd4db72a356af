//! Order Revenue Reconciliation
//!
//! Computes, exactly once per order, a snapshot of revenue, cost, discount
//! and shipping in USD, GBP and EUR. Two payment paths converge here: a
//! conventional checkout is converted from the order's native currency,
//! while a crypto settlement is valued in USD from the historically priced
//! settled amount, which overrides the invoiced total. Per-line cost flows
//! through the sharing-aware cost resolver; rates come from the FX quote
//! cache for a one-hour pricing window ending at the paid-like instant.

pub mod cost;

pub use cost::CostResolver;

use crate::db::models::{CartLine, CategoryRevenue, Order, OrderRevenue};
use crate::db::repository::{
    CatalogRepository, OrderRepository, RepoError, RevenueRepository, SharingRepository,
};
use crate::money::{UsdPivotRates, to_decimal, to_f64};
use crate::services::{ProviderError, QuoteService, SpotPriceService};
use chrono::Utc;
use dashmap::DashMap;
use rust_decimal::Decimal;
use shared::SettlementCurrency;
use std::collections::BTreeMap;
use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;
use tokio::sync::Mutex;

/// Pricing window length: one hour ending at the paid-like instant
const PRICING_WINDOW_MS: i64 = 3_600_000;

/// Revenue computation errors
#[derive(Debug, Error)]
pub enum RevenueError {
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Unsupported settlement asset: {0}")]
    UnsupportedAsset(String),

    #[error("Required pricing data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Provider request failed: {0}")]
    Provider(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<RepoError> for RevenueError {
    fn from(err: RepoError) -> Self {
        RevenueError::Database(err.to_string())
    }
}

impl From<ProviderError> for RevenueError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::UnsupportedAsset(ticker) => RevenueError::UnsupportedAsset(ticker),
            ProviderError::Unavailable(msg) => RevenueError::DataUnavailable(msg),
            ProviderError::Http(msg) => RevenueError::Provider(msg),
            ProviderError::Database(msg) => RevenueError::Database(msg),
        }
    }
}

pub type RevenueResult<T> = Result<T, RevenueError>;

/// Per-category accumulator (native currency, full precision)
struct CategoryAcc {
    category: surrealdb::RecordId,
    total: Decimal,
    cost: Decimal,
}

/// Revenue computation service
///
/// One instance per process; per-invocation state (cost memoization) lives
/// in a [`CostResolver`] constructed per computation.
pub struct RevenueService {
    order_repo: OrderRepository,
    revenue_repo: RevenueRepository,
    catalog_repo: CatalogRepository,
    sharing_repo: SharingRepository,
    quotes: QuoteService,
    spot: SpotPriceService,
    /// Serializes concurrent computations per order so provider calls are
    /// not duplicated; the record-id-keyed insert is the hard guarantee
    order_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl RevenueService {
    pub fn new(db: Surreal<Db>, quotes: QuoteService, spot: SpotPriceService) -> Self {
        Self {
            order_repo: OrderRepository::new(db.clone()),
            revenue_repo: RevenueRepository::new(db.clone()),
            catalog_repo: CatalogRepository::new(db.clone()),
            sharing_repo: SharingRepository::new(db),
            quotes,
            spot,
            order_locks: DashMap::new(),
        }
    }

    /// Read an existing snapshot with its category breakdown
    pub async fn find_snapshot(
        &self,
        order_id: &str,
    ) -> RevenueResult<Option<(OrderRevenue, Vec<CategoryRevenue>)>> {
        let order = record_id("order", order_id);
        let Some(revenue) = self.revenue_repo.find_by_order(&order).await? else {
            return Ok(None);
        };
        let categories = self.revenue_repo.categories_for_order(&order).await?;
        Ok(Some((revenue, categories)))
    }

    /// Compute (or return the already-computed) revenue snapshot for an
    /// order
    pub async fn compute_revenue(
        &self,
        order_id: &str,
        organization_id: &str,
    ) -> RevenueResult<OrderRevenue> {
        let order_rid = record_id("order", order_id);
        let org_rid = record_id("organization", organization_id);

        let lock = self
            .order_locks
            .entry(order_rid.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        // Idempotency guard: a snapshot is computed at most once
        if let Some(existing) = self.revenue_repo.find_by_order(&order_rid).await? {
            tracing::debug!(order = %order_rid, "Revenue already computed, returning existing snapshot");
            return Ok(existing);
        }

        let order = self
            .order_repo
            .find_scoped(&order_rid, &org_rid)
            .await?
            .ok_or_else(|| RevenueError::OrderNotFound(order_rid.to_string()))?;

        let paid_instant = paid_like_instant(&order, Utc::now().timestamp_millis());
        let window_start = paid_instant - PRICING_WINDOW_MS;

        let lines = self.order_repo.cart_lines(&order.cart).await?;
        let country = order.country.as_str();
        let native = SettlementCurrency::for_country(country);

        let mut resolver = CostResolver::new(self.catalog_repo.clone(), self.sharing_repo.clone());
        let (total_cost, categories) = self
            .accumulate_lines(&lines, country, &mut resolver)
            .await?;

        // A crypto settlement's USD valuation overrides the invoiced total;
        // discount/shipping/cost were never paid in crypto and stay native
        let (total_amount, total_currency) = if order.is_crypto() {
            let amount = self
                .crypto_settlement_usd(&order, window_start, paid_instant)
                .await?;
            (amount, SettlementCurrency::Usd)
        } else {
            (to_decimal(order.total_amount), native)
        };

        let raw_rates = self
            .quotes
            .rates_for_window(window_start, paid_instant, paid_instant)
            .await?;
        let rates = UsdPivotRates::new(raw_rates.eur, raw_rates.gbp);

        let total = rates.spread(total_amount, total_currency);
        let discount = rates.spread(to_decimal(order.discount_total), native);
        let shipping = rates.spread(to_decimal(order.shipping_total), native);
        let cost = rates.spread(total_cost, native);

        let computed_at = Utc::now().timestamp_millis();
        let revenue = OrderRevenue {
            id: None,
            order: order_rid.clone(),
            organization: org_rid.clone(),
            usd_total: to_f64(total.usd),
            gbp_total: to_f64(total.gbp),
            eur_total: to_f64(total.eur),
            usd_discount: to_f64(discount.usd),
            gbp_discount: to_f64(discount.gbp),
            eur_discount: to_f64(discount.eur),
            usd_shipping: to_f64(shipping.usd),
            gbp_shipping: to_f64(shipping.gbp),
            eur_shipping: to_f64(shipping.eur),
            usd_cost: to_f64(cost.usd),
            gbp_cost: to_f64(cost.gbp),
            eur_cost: to_f64(cost.eur),
            computed_at,
        };

        let category_rows: Vec<CategoryRevenue> = categories
            .into_values()
            .map(|acc| {
                let total = rates.spread(acc.total, native);
                let cost = rates.spread(acc.cost, native);
                CategoryRevenue {
                    id: None,
                    order: order_rid.clone(),
                    organization: org_rid.clone(),
                    category: acc.category,
                    usd_total: to_f64(total.usd),
                    gbp_total: to_f64(total.gbp),
                    eur_total: to_f64(total.eur),
                    usd_cost: to_f64(cost.usd),
                    gbp_cost: to_f64(cost.gbp),
                    eur_cost: to_f64(cost.eur),
                    computed_at,
                }
            })
            .collect();

        match self
            .revenue_repo
            .create_snapshot(&order_rid, revenue, category_rows)
            .await
        {
            Ok(row) => {
                tracing::info!(
                    order = %order_rid,
                    usd_total = row.usd_total,
                    "Order revenue computed"
                );
                Ok(row)
            }
            // A concurrent computation won the insert; its snapshot is
            // authoritative
            Err(RepoError::Duplicate(_)) => self
                .revenue_repo
                .find_by_order(&order_rid)
                .await?
                .ok_or_else(|| {
                    RevenueError::Database("Snapshot missing after duplicate insert".to_string())
                }),
            Err(err) => Err(err.into()),
        }
    }

    /// Accumulate order-level cost and per-category totals/costs from the
    /// cart lines, all in the order's native currency
    async fn accumulate_lines(
        &self,
        lines: &[CartLine],
        country: &str,
        resolver: &mut CostResolver,
    ) -> RevenueResult<(Decimal, BTreeMap<String, CategoryAcc>)> {
        let mut total_cost = Decimal::ZERO;
        let mut categories: BTreeMap<String, CategoryAcc> = BTreeMap::new();

        for line in lines {
            let quantity = Decimal::from(line.quantity.max(0));

            // Points items: costed from the affiliate product's own map,
            // excluded from monetary totals and category rows
            if line.affiliate_product.is_some() {
                let unit_cost = line.affiliate_cost.amount_for(country).unwrap_or(0.0);
                total_cost += to_decimal(unit_cost) * quantity;
                continue;
            }

            let Some(product) = &line.product else {
                continue;
            };

            let unit_cost = to_decimal(
                resolver
                    .effective_unit_cost(product, line.variation.as_ref(), country)
                    .await?,
            );
            total_cost += unit_cost * quantity;

            // Checkout-time price is authoritative; catalog price is the
            // fallback (a zero checkout price falls back too)
            let unit_price = line
                .unit_price
                .filter(|p| *p != 0.0)
                .or_else(|| line.regular_price.amount_for(country))
                .unwrap_or(0.0);
            let line_total = to_decimal(unit_price) * quantity;
            let line_cost = unit_cost * quantity;

            for category in line.categories.iter().flatten() {
                let acc = categories
                    .entry(category.to_string())
                    .or_insert_with(|| CategoryAcc {
                        category: category.clone(),
                        total: Decimal::ZERO,
                        cost: Decimal::ZERO,
                    });
                acc.total += line_total;
                acc.cost += line_cost;
            }
        }

        Ok((total_cost, categories))
    }

    /// USD valuation of a crypto settlement: settled amount × spot price at
    /// the pricing window
    async fn crypto_settlement_usd(
        &self,
        order: &Order,
        window_start: i64,
        window_end: i64,
    ) -> RevenueResult<Decimal> {
        let event = order.latest_settlement_event().ok_or_else(|| {
            RevenueError::DataUnavailable(
                "crypto order has no paid/pending_payment meta event".to_string(),
            )
        })?;
        let settlement = event.settlement.as_ref().ok_or_else(|| {
            RevenueError::DataUnavailable(format!(
                "meta event '{}' carries no settlement details",
                event.name
            ))
        })?;

        let spot = self
            .spot
            .price_usd(&settlement.asset, window_start, window_end)
            .await?;

        Ok(to_decimal(settlement.amount) * to_decimal(spot))
    }
}

/// The instant the order's money (provisionally) arrived: `date_paid` when
/// set, `date_created` for paid-like statuses, else the current instant
fn paid_like_instant(order: &Order, now: i64) -> i64 {
    if let Some(paid) = order.date_paid {
        return paid;
    }
    if order.status.is_paid_like() {
        return order.date_created;
    }
    now
}

/// Parse a caller-supplied id, accepting both `table:key` and bare keys
fn record_id(table: &str, raw: &str) -> surrealdb::RecordId {
    if raw.contains(':')
        && let Ok(id) = raw.parse::<surrealdb::RecordId>()
    {
        return id;
    }
    surrealdb::RecordId::from_table_key(table, raw)
}
