//! Database Models

pub mod catalog;
pub mod exchange_rate;
pub mod order;
pub mod revenue;
pub mod serde_helpers;
pub mod sharing;

// Re-exports
pub use catalog::{AffiliateProduct, Product, ProductVariation};
pub use exchange_rate::ExchangeRate;
pub use order::{
    CRYPTO_PAYMENT_METHOD, CartLine, CartProduct, CryptoSettlement, Order, OrderMetaEvent,
    OrderStatus,
};
pub use revenue::{CategoryRevenue, OrderRevenue};
pub use sharing::{SharedProduct, SharedProductMapping, SharedVariationMapping};
