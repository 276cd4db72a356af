//! Money calculation utilities using rust_decimal for precision
//!
//! All revenue arithmetic is done using `Decimal` internally, then converted
//! to `f64` for storage/serialization. Rounding to 2 decimal places happens
//! only at the storage boundary; intermediate accumulation keeps full
//! precision.

use rust_decimal::prelude::*;
use shared::SettlementCurrency;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Convert f64 to Decimal for calculation
///
/// Input values come from validated storage; if NaN/Infinity somehow reaches
/// here, logs an error and returns ZERO to avoid silent data corruption in
/// financial calculations.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        // SAFETY: a Decimal rounded to 2dp is always within f64 range
        .expect("Decimal rounded to 2dp is always representable as f64")
}

/// Compare two monetary values for equality (within 0.01 tolerance)
pub fn money_eq(a: f64, b: f64) -> bool {
    let diff = (to_decimal(a) - to_decimal(b)).abs();
    diff < MONEY_TOLERANCE
}

/// One amount expressed in all three settlement currencies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriCurrency {
    pub usd: Decimal,
    pub gbp: Decimal,
    pub eur: Decimal,
}

impl TriCurrency {
    pub const ZERO: TriCurrency = TriCurrency {
        usd: Decimal::ZERO,
        gbp: Decimal::ZERO,
        eur: Decimal::ZERO,
    };
}

/// USD-pivot conversion rates (USD→EUR, USD→GBP)
///
/// Rates are validated positive at the quote-cache boundary; conversion
/// divides by them.
#[derive(Debug, Clone, Copy)]
pub struct UsdPivotRates {
    pub usd_eur: Decimal,
    pub usd_gbp: Decimal,
}

impl UsdPivotRates {
    pub fn new(usd_eur: f64, usd_gbp: f64) -> Self {
        Self {
            usd_eur: to_decimal(usd_eur),
            usd_gbp: to_decimal(usd_gbp),
        }
    }

    /// Express a native-currency amount in all three settlement currencies,
    /// cross-multiplying through USD as the pivot
    pub fn spread(&self, amount: Decimal, native: SettlementCurrency) -> TriCurrency {
        match native {
            SettlementCurrency::Gbp => TriCurrency {
                usd: amount / self.usd_gbp,
                gbp: amount,
                eur: amount * (self.usd_eur / self.usd_gbp),
            },
            SettlementCurrency::Eur => TriCurrency {
                usd: amount / self.usd_eur,
                gbp: amount * (self.usd_gbp / self.usd_eur),
                eur: amount,
            },
            SettlementCurrency::Usd => TriCurrency {
                usd: amount,
                gbp: amount * self.usd_gbp,
                eur: amount * self.usd_eur,
            },
        }
    }
}

#[cfg(test)]
mod tests;
