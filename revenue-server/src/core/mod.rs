//! Core Module
//!
//! Configuration, server state and HTTP bootstrap.

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::Server;
pub use state::ServerState;
