//! Order Repository
//!
//! Read-only access to orders and cart lines. Orders are written by the
//! checkout/webhook collaborators; revenue computation never mutates them.

use super::{BaseRepository, RepoResult};
use crate::db::models::{CartLine, Order};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find an order scoped by organization
    pub async fn find_scoped(
        &self,
        order: &RecordId,
        organization: &RecordId,
    ) -> RepoResult<Option<Order>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE id = $id AND organization = $org LIMIT 1")
            .bind(("id", order.clone()))
            .bind(("org", organization.clone()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Load all lines of a cart, joined with the product's categories and
    /// catalog maps (and the affiliate product's cost map) in one query
    pub async fn cart_lines(&self, cart: &RecordId) -> RepoResult<Vec<CartLine>> {
        let mut result = self
            .base
            .db()
            .query(
                r#"
                SELECT
                    product,
                    variation,
                    affiliate_product,
                    quantity,
                    unit_price,
                    product.categories AS categories,
                    product.regular_price AS regular_price,
                    product.cost AS cost,
                    affiliate_product.cost AS affiliate_cost
                FROM cart_product
                WHERE cart = $cart
                "#,
            )
            .bind(("cart", cart.clone()))
            .await?;
        let lines: Vec<CartLine> = result.take(0)?;
        Ok(lines)
    }
}
