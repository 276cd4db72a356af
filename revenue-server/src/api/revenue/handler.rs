//! Revenue API handlers
//!
//! Thin layer over [`RevenueService`]: parse/validate the request, run the
//! computation, convert record ids to strings for the response.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{CategoryRevenue, OrderRevenue};
use crate::utils::{AppError, AppResponse, AppResult, ok};

#[derive(Debug, Deserialize, Validate)]
pub struct ComputeRevenueRequest {
    #[validate(length(min = 1, message = "order_id is required"))]
    pub order_id: String,
    #[validate(length(min = 1, message = "organization_id is required"))]
    pub organization_id: String,
}

/// Order snapshot response shape
#[derive(Debug, Serialize)]
pub struct OrderRevenueView {
    pub order: String,
    pub organization: String,
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

impl From<OrderRevenue> for OrderRevenueView {
    fn from(row: OrderRevenue) -> Self {
        Self {
            order: row.order.to_string(),
            organization: row.organization.to_string(),
            usd_total: row.usd_total,
            gbp_total: row.gbp_total,
            eur_total: row.eur_total,
            usd_discount: row.usd_discount,
            gbp_discount: row.gbp_discount,
            eur_discount: row.eur_discount,
            usd_shipping: row.usd_shipping,
            gbp_shipping: row.gbp_shipping,
            eur_shipping: row.eur_shipping,
            usd_cost: row.usd_cost,
            gbp_cost: row.gbp_cost,
            eur_cost: row.eur_cost,
            computed_at: row.computed_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryRevenueView {
    pub category: String,
    pub usd_total: f64,
    pub gbp_total: f64,
    pub eur_total: f64,
    pub usd_cost: f64,
    pub gbp_cost: f64,
    pub eur_cost: f64,
}

impl From<CategoryRevenue> for CategoryRevenueView {
    fn from(row: CategoryRevenue) -> Self {
        Self {
            category: row.category.to_string(),
            usd_total: row.usd_total,
            gbp_total: row.gbp_total,
            eur_total: row.eur_total,
            usd_cost: row.usd_cost,
            gbp_cost: row.gbp_cost,
            eur_cost: row.eur_cost,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub revenue: OrderRevenueView,
    pub categories: Vec<CategoryRevenueView>,
}

/// POST /api/revenue/compute
pub async fn compute(
    State(state): State<ServerState>,
    Json(req): Json<ComputeRevenueRequest>,
) -> AppResult<Json<AppResponse<OrderRevenueView>>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let row = state
        .revenue
        .compute_revenue(&req.order_id, &req.organization_id)
        .await?;

    Ok(ok(OrderRevenueView::from(row)))
}

/// GET /api/revenue/orders/{order_id}
pub async fn get_snapshot(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<AppResponse<SnapshotResponse>>> {
    let (revenue, categories) = state
        .revenue
        .find_snapshot(&order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No revenue snapshot for {order_id}")))?;

    Ok(ok(SnapshotResponse {
        revenue: revenue.into(),
        categories: categories.into_iter().map(Into::into).collect(),
    }))
}
