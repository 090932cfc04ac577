//! Lenient deserializers for loosely typed API payloads.
//!
//! The storefront API is backed by a dynamically typed server that sometimes
//! encodes numbers as strings (`"2"`, `"4.5"`) and sends `""` for absent
//! values. These helpers accept both forms.

use std::fmt::Display;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::Deserialize;

/// Deserialize a value that may arrive as itself or as a numeric string.
pub fn number_or_string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Deserialize<'de>,
    T::Err: Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<T> {
        Value(T),
        Text(String),
    }

    match Raw::<T>::deserialize(deserializer)? {
        Raw::Value(value) => Ok(value),
        Raw::Text(text) => text.trim().parse().map_err(de::Error::custom),
    }
}

/// Deserialize an optional number; `null` and blank strings become `None`.
pub fn optional_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Deserialize<'de>,
    T::Err: Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<T> {
        Value(T),
        Text(String),
    }

    match Option::<Raw<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Value(value)) => Ok(Some(value)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s.trim().parse().map(Some).map_err(de::Error::custom),
    }
}

/// Deserialize an optional string; blank strings become `None`.
pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "number_or_string")]
        quantity: u32,
        #[serde(default, deserialize_with = "optional_number")]
        rating: Option<f64>,
        #[serde(default, deserialize_with = "optional_number")]
        sale_price: Option<Decimal>,
        #[serde(default, deserialize_with = "blank_as_none")]
        size: Option<String>,
    }

    #[test]
    fn test_numbers_and_strings() {
        let a: Sample = serde_json::from_str(r#"{"quantity": 2, "rating": 4.5, "size": "M"}"#).unwrap();
        let b: Sample =
            serde_json::from_str(r#"{"quantity": "2", "rating": "4.5", "size": "M"}"#).unwrap();
        assert_eq!(a.quantity, b.quantity);
        assert_eq!(a.rating, b.rating);
        assert_eq!(b.size.as_deref(), Some("M"));
    }

    #[test]
    fn test_blank_and_missing_values() {
        let s: Sample = serde_json::from_str(
            r#"{"quantity": 1, "rating": "", "size": "", "sale_price": ""}"#,
        )
        .unwrap();
        assert_eq!(s.rating, None);
        assert_eq!(s.size, None);
        assert_eq!(s.sale_price, None);

        let s: Sample = serde_json::from_str(r#"{"quantity": 1}"#).unwrap();
        assert_eq!(s.rating, None);
        assert_eq!(s.size, None);
    }

    #[test]
    fn test_decimal_as_number_or_string() {
        let a: Sample = serde_json::from_str(r#"{"quantity": 1, "sale_price": "49.00"}"#).unwrap();
        let b: Sample = serde_json::from_str(r#"{"quantity": 1, "sale_price": 49}"#).unwrap();
        assert_eq!(a.sale_price, Some(Decimal::new(4900, 2)));
        assert_eq!(a.sale_price, b.sale_price);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(serde_json::from_str::<Sample>(r#"{"quantity": "lots"}"#).is_err());
        assert!(serde_json::from_str::<Sample>(r#"{"quantity": 1, "sale_price": "cheap"}"#).is_err());
    }
}
