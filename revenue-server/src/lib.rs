//! Revenue Server - multi-currency order revenue reconciliation
//!
//! # Architecture overview
//!
//! This service computes, exactly once per order, a snapshot of revenue,
//! cost, discount and shipping in USD, GBP and EUR. It is invoked by order
//! lifecycle transitions (payment webhooks) and exposes a thin HTTP surface
//! for that trigger plus snapshot reads.
//!
//! # Module structure
//!
//! ```text
//! revenue-server/src/
//! ├── core/      # configuration, state, HTTP bootstrap
//! ├── api/       # axum routes and handlers
//! ├── db/        # embedded SurrealDB: models and repositories
//! ├── services/  # FX quote cache, crypto spot price lookup
//! ├── money/     # decimal helpers and three-currency conversion
//! ├── revenue/   # cost resolver and the revenue computer
//! └── utils/     # error envelope, logging
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod money;
pub mod revenue;
pub mod services;
pub mod utils;

// Re-export public types
pub use crate::core::{Config, Server, ServerState};
pub use db::DbService;
pub use revenue::{RevenueError, RevenueService};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
