//! Order Model
//!
//! Orders are written by the checkout/webhook collaborators; this service
//! only reads them. Monetary fields are in the order's native currency,
//! which is implied by `country`. All instants are unix milliseconds.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::CountryAmounts;
use surrealdb::RecordId;

/// Payment method string the gateway writes on crypto-settled orders
pub const CRYPTO_PAYMENT_METHOD: &str = "niftipay";

/// Meta event recorded when a settlement is confirmed
pub const META_EVENT_PAID: &str = "paid";
/// Meta event recorded when a settlement arrived underpaid (provisional)
pub const META_EVENT_PENDING_PAYMENT: &str = "pending_payment";

/// Order status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    PendingPayment,
    Paid,
    Completed,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    /// Statuses under which money has arrived (or provisionally arrived),
    /// making `date_created` an acceptable stand-in for the payment instant
    pub fn is_paid_like(&self) -> bool {
        matches!(
            self,
            OrderStatus::Paid | OrderStatus::PendingPayment | OrderStatus::Completed
        )
    }
}

/// Crypto settlement details embedded in a meta event by the gateway webhook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptoSettlement {
    /// Gateway asset ticker, possibly chain-suffixed (e.g. `USDC.ERC20`)
    pub asset: String,
    /// Settled amount in asset units
    pub amount: f64,
    #[serde(default)]
    pub received: Option<f64>,
    #[serde(default)]
    pub expected: Option<f64>,
}

/// One entry of the append-only order lifecycle log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderMetaEvent {
    pub name: String,
    pub timestamp: i64,
    #[serde(default)]
    pub settlement: Option<CryptoSettlement>,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub organization: RecordId,
    pub cart: RecordId,
    /// ISO-2 checkout country; implies the native currency
    pub country: String,
    /// Free text; `"niftipay"` (case-insensitive) marks a crypto settlement
    pub payment_method: String,
    pub total_amount: f64,
    #[serde(default)]
    pub discount_total: f64,
    #[serde(default)]
    pub shipping_total: f64,
    pub status: OrderStatus,
    #[serde(default)]
    pub date_paid: Option<i64>,
    pub date_created: i64,
    #[serde(default)]
    pub meta: Vec<OrderMetaEvent>,
}

impl Order {
    pub fn is_crypto(&self) -> bool {
        self.payment_method.eq_ignore_ascii_case(CRYPTO_PAYMENT_METHOD)
    }

    /// Most recent settlement-bearing meta event.
    ///
    /// A `paid` event wins; an underpaid order that never reached `paid`
    /// falls back to its most recent `pending_payment` event.
    pub fn latest_settlement_event(&self) -> Option<&OrderMetaEvent> {
        self.meta
            .iter()
            .rev()
            .find(|e| e.name == META_EVENT_PAID)
            .or_else(|| {
                self.meta
                    .iter()
                    .rev()
                    .find(|e| e.name == META_EVENT_PENDING_PAYMENT)
            })
    }
}

/// Cart line entity (one per product/variation placed in the cart)
///
/// `unit_price` is the price actually charged at checkout and is
/// authoritative over the catalog price. Affiliate ("points") lines carry
/// `affiliate_product` instead of `product` and are excluded from monetary
/// revenue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartProduct {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub cart: RecordId,
    #[serde(default)]
    pub product: Option<RecordId>,
    #[serde(default)]
    pub variation: Option<RecordId>,
    #[serde(default)]
    pub affiliate_product: Option<RecordId>,
    pub quantity: i32,
    #[serde(default)]
    pub unit_price: Option<f64>,
}

/// Cart line projection used by the revenue computation.
///
/// Joined with the product's categories and catalog maps in one query so the
/// computation never goes back to the catalog per line.
#[derive(Debug, Clone, Deserialize)]
pub struct CartLine {
    #[serde(default)]
    pub product: Option<RecordId>,
    #[serde(default)]
    pub variation: Option<RecordId>,
    #[serde(default)]
    pub affiliate_product: Option<RecordId>,
    pub quantity: i32,
    #[serde(default)]
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub categories: Option<Vec<RecordId>>,
    /// Catalog price fallback when `unit_price` is absent
    #[serde(default)]
    pub regular_price: CountryAmounts,
    #[serde(default)]
    pub cost: CountryAmounts,
    /// Affiliate product's own cost map (affiliate lines only)
    #[serde(default)]
    pub affiliate_cost: CountryAmounts,
}
