//! Revenue routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /revenue/compute | POST | compute (or return existing) snapshot |
//! | /revenue/orders/{order_id} | GET | read a snapshot with category breakdown |

pub mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/revenue/compute", post(handler::compute))
        .route("/revenue/orders/{order_id}", get(handler::get_snapshot))
}
