use super::*;

#[test]
fn test_to_decimal_precision() {
    // Classic floating point problem: 0.1 + 0.2 != 0.3
    let a = 0.1_f64;
    let b = 0.2_f64;
    let sum_f64 = a + b;

    // f64 fails
    assert_ne!(sum_f64, 0.3);

    // Decimal succeeds
    let sum_dec = to_decimal(a) + to_decimal(b);
    assert_eq!(to_f64(sum_dec), 0.3);
}

#[test]
fn test_accumulation_precision() {
    // Sum 0.01 one thousand times
    let mut total = Decimal::ZERO;
    for _ in 0..1000 {
        total += to_decimal(0.01);
    }
    assert_eq!(to_f64(total), 10.0);
}

#[test]
fn test_rounding_half_up() {
    // 0.005 should round up to 0.01
    let value = Decimal::new(5, 3); // 0.005
    assert_eq!(to_f64(value), 0.01);

    // 0.004 should round down to 0.00
    let value2 = Decimal::new(4, 3); // 0.004
    assert_eq!(to_f64(value2), 0.0);
}

#[test]
fn test_money_eq() {
    assert!(money_eq(100.0, 100.0));
    assert!(money_eq(100.004, 100.006));
    assert!(!money_eq(100.0, 100.02));
}

#[test]
fn test_spread_from_usd() {
    let rates = UsdPivotRates::new(0.92, 0.79);
    let tri = rates.spread(to_decimal(100.0), SettlementCurrency::Usd);
    assert_eq!(to_f64(tri.usd), 100.0);
    assert_eq!(to_f64(tri.eur), 92.0);
    assert_eq!(to_f64(tri.gbp), 79.0);
}

#[test]
fn test_spread_from_gbp_round_trips() {
    let rates = UsdPivotRates::new(0.92, 0.79);
    let tri = rates.spread(to_decimal(79.0), SettlementCurrency::Gbp);

    assert_eq!(to_f64(tri.gbp), 79.0);
    // USD × USDGBP must recover the GBP figure within rounding
    assert!(money_eq(to_f64(tri.usd * rates.usd_gbp), to_f64(tri.gbp)));
    // EUR = GBP × (USDEUR / USDGBP)
    assert!(money_eq(to_f64(tri.eur), 92.0));
}

#[test]
fn test_spread_from_eur_round_trips() {
    let rates = UsdPivotRates::new(0.92, 0.79);
    let tri = rates.spread(to_decimal(92.0), SettlementCurrency::Eur);

    assert_eq!(to_f64(tri.eur), 92.0);
    assert!(money_eq(to_f64(tri.usd), 100.0));
    assert!(money_eq(to_f64(tri.gbp), 79.0));
}

#[test]
fn test_spread_zero_amount() {
    let rates = UsdPivotRates::new(0.92, 0.79);
    let tri = rates.spread(Decimal::ZERO, SettlementCurrency::Gbp);
    assert_eq!(tri, TriCurrency::ZERO);
}

#[test]
fn test_intermediate_precision_survives_spread() {
    // 3 × 3.33 in GBP converted through USD and back stays consistent
    let rates = UsdPivotRates::new(0.92, 0.79);
    let native = to_decimal(3.33) * Decimal::from(3);
    let tri = rates.spread(native, SettlementCurrency::Gbp);
    assert_eq!(to_f64(tri.gbp), 9.99);
    assert!(money_eq(to_f64(tri.usd * rates.usd_gbp), 9.99));
}
