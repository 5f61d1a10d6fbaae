use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use super::error::AppError;

/// Per-field validation messages, keyed by the JSON field name.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` for `field` unless `ok` holds. The first failure per field wins.
    pub fn check(&mut self, field: &str, ok: bool, message: &str) -> &mut Self {
        if !ok && !self.0.contains_key(field) {
            self.0.insert(field.to_string(), message.to_string());
        }
        self
    }

    pub fn require(&mut self, field: &str, value: &str, message: &str) -> &mut Self {
        self.check(field, !value.trim().is_empty(), message)
    }

    pub fn require_positive(&mut self, field: &str, value: Option<f64>, label: &str) -> &mut Self {
        match value {
            None => self.check(field, false, &format!("{} is required", label)),
            Some(v) => self.check(field, v > 0.0, &format!("{} must be a positive number", label)),
        }
    }

    pub fn require_phone(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(field, is_valid_phone(value), "Phone number must be at least 10 digits long")
    }

    pub fn require_email(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(field, is_valid_email(value), "Valid email is required")
    }

    #[cfg(test)]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

pub trait Validate {
    fn validate(&self) -> FieldErrors;
}

pub fn is_valid_phone(phone: &str) -> bool {
    let phone = phone.trim();
    phone.len() >= 10 && phone.chars().all(|c| c.is_ascii_digit())
}

pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
        None => false,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Accepts `12.5`, `"12.5"` or `""` (as missing). Form posts send every value as text.
/// `inf` and `NaN` are rejected: they cannot be written back as JSON numbers.
pub fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = match Option::<NumberOrText>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(NumberOrText::Number(n)) => n,
        Some(NumberOrText::Text(s)) if s.trim().is_empty() => return Ok(None),
        Some(NumberOrText::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("'{}' is not a number", s)))?,
    };

    if value.is_finite() {
        Ok(Some(value))
    } else {
        Err(serde::de::Error::custom(format!("'{}' is not a finite number", value)))
    }
}

pub fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match lenient_f64(deserializer)? {
        None => Ok(None),
        Some(n) if n.fract() == 0.0 => Ok(Some(n as i64)),
        Some(n) => Err(serde::de::Error::custom(format!("{} is not a whole number", n))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "lenient_f64")]
        price: Option<f64>,
        #[serde(default, deserialize_with = "lenient_i64")]
        quantity: Option<i64>,
    }

    #[test]
    fn test_phone_rules() {
        assert!(is_valid_phone("0771234567"));
        assert!(!is_valid_phone("077123456"));
        assert!(!is_valid_phone("077-123-4567"));
        assert!(!is_valid_phone(""));
    }

    #[test]
    fn test_email_rules() {
        assert!(is_valid_email("jane@example.com"));
        assert!(!is_valid_email("jane.example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_first_error_per_field_is_kept() {
        let mut errors = FieldErrors::new();
        errors
            .require("name", "", "Name is required")
            .check("name", false, "Other message");
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_require_positive() {
        let mut errors = FieldErrors::new();
        errors
            .require_positive("price", None, "Price")
            .require_positive("stockQuantity", Some(-1.0), "Stock quantity")
            .require_positive("amount", Some(3.0), "Amount");
        assert_eq!(errors.get("price"), Some("Price is required"));
        assert_eq!(errors.get("stockQuantity"), Some("Stock quantity must be a positive number"));
        assert_eq!(errors.get("amount"), None);
    }

    #[test]
    fn test_lenient_numbers() {
        let s: Sample = serde_json::from_str(r#"{"price": "19.99", "quantity": "3"}"#).unwrap();
        assert_eq!(s.price, Some(19.99));
        assert_eq!(s.quantity, Some(3));

        let s: Sample = serde_json::from_str(r#"{"price": 5, "quantity": ""}"#).unwrap();
        assert_eq!(s.price, Some(5.0));
        assert_eq!(s.quantity, None);

        let s: Sample = serde_json::from_str("{}").unwrap();
        assert_eq!(s.price, None);

        assert!(serde_json::from_str::<Sample>(r#"{"price": "abc"}"#).is_err());
        assert!(serde_json::from_str::<Sample>(r#"{"quantity": 1.5}"#).is_err());
    }

    #[test]
    fn test_non_finite_numbers_rejected() {
        for raw in ["inf", "-inf", "infinity", "NaN"] {
            let body = format!(r#"{{"price": "{}"}}"#, raw);
            assert!(serde_json::from_str::<Sample>(&body).is_err(), "{} accepted", raw);
        }
        assert!(serde_json::from_str::<Sample>(r#"{"quantity": "inf"}"#).is_err());
    }
}
