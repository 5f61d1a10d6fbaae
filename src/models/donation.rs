use serde::{Deserialize, Serialize};

use super::resource::{Editable, RecordMeta, Resource};
use crate::utils::{lenient_f64, FieldErrors, Validate};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub donor_name: String,
    pub email: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub anonymous: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DonationInput {
    pub donor_name: String,
    pub email: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub amount: Option<f64>,
    pub message: String,
    pub anonymous: bool,
}

impl Validate for DonationInput {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors
            .require("donorName", &self.donor_name, "Donor name is required")
            .require_email("email", &self.email)
            .require_positive("amount", self.amount, "Amount");
        errors
    }
}

impl Resource for Donation {
    const COLLECTION: &'static str = "donations";
    const LABEL: &'static str = "Donation";
    const FILTERS: &'static [&'static str] = &["email"];

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn search_text(&self) -> Option<&str> {
        Some(&self.donor_name)
    }
}

impl Editable for Donation {
    type Input = DonationInput;

    fn from_input(input: DonationInput, meta: RecordMeta) -> Self {
        let message = input.message.trim();
        Donation {
            meta,
            donor_name: input.donor_name.trim().to_string(),
            email: input.email.trim().to_string(),
            amount: input.amount.unwrap_or_default(),
            message: (!message.is_empty()).then(|| message.to_string()),
            anonymous: input.anonymous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_donation_amount_accepts_text() {
        let input: DonationInput = serde_json::from_value(serde_json::json!({
            "donorName": "Ann",
            "email": "ann@example.com",
            "amount": "1500",
            "message": ""
        }))
        .unwrap();
        assert!(input.validate().is_empty());

        let donation = Donation::from_input(input, RecordMeta::new());
        assert_eq!(donation.amount, 1500.0);
        assert_eq!(donation.message, None);
        assert!(!donation.anonymous);
    }

    #[test]
    fn test_donation_requires_positive_amount() {
        let input = DonationInput {
            donor_name: "Ann".into(),
            email: "ann@example.com".into(),
            amount: Some(-5.0),
            ..Default::default()
        };
        assert_eq!(input.validate().get("amount"), Some("Amount must be a positive number"));
    }
}
