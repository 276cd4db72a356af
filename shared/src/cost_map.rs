//! Country-keyed amount maps
//!
//! Catalog price and cost fields are maps from ISO-2 country code to an
//! amount (`{"US": 10.0, "GB": 8.5}`). Depending on the write path they
//! arrive either as a JSON object or as a JSON-encoded *string*, and some
//! legacy rows carry amounts as numeric strings. All of that ambiguity is
//! absorbed here at the deserialization boundary: parse-if-string,
//! identity-if-object, empty-on-failure. A missing or unparseable map is
//! "no data," never an error.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Map from uppercase ISO-2 country code to an amount
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CountryAmounts(BTreeMap<String, f64>);

impl CountryAmounts {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Amount for a country (case-insensitive), `None` when absent
    pub fn amount_for(&self, country: &str) -> Option<f64> {
        self.0.get(&country.trim().to_ascii_uppercase()).copied()
    }

    pub fn insert(&mut self, country: &str, amount: f64) {
        self.0.insert(country.trim().to_ascii_uppercase(), amount);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => {
                let mut amounts = Self::new();
                for (country, raw) in map {
                    if let Some(amount) = numeric_value(&raw) {
                        amounts.insert(&country, amount);
                    }
                }
                amounts
            }
            // Serialized JSON text: parse once, then re-dispatch
            Value::String(text) => serde_json::from_str::<Value>(&text)
                .map(Self::from_value)
                .unwrap_or_default(),
            _ => Self::new(),
        }
    }
}

/// Accept a JSON number or a numeric string, reject everything else
fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

impl FromIterator<(String, f64)> for CountryAmounts {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut amounts = Self::new();
        for (country, amount) in iter {
            amounts.insert(&country, amount);
        }
        amounts
    }
}

impl<'de> Deserialize<'de> for CountryAmounts {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(Self::from_value(value.unwrap_or(Value::Null)))
    }
}
