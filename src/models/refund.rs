use serde::{Deserialize, Serialize};

use super::resource::{status_enum, Editable, RecordMeta, Resource};
use crate::utils::{lenient_f64, FieldErrors, UploadKind, Validate};

status_enum! {
    /// Review state shared by refunds and product returns.
    ReviewStatus {
        Pending => "Pending",
        Approved => "Approved",
        Rejected => "Rejected",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Refund {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub purchase_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub reason: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: ReviewStatus,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RefundInput {
    pub purchase_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub reason: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub amount: Option<f64>,
    pub status: String,
}

impl Validate for RefundInput {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors
            .require("purchaseId", &self.purchase_id, "Order reference is required")
            .require("name", &self.name, "Name is required")
            .require_email("email", &self.email)
            .require_phone("phone", &self.phone)
            .require("reason", &self.reason, "Reason is required")
            .require_positive("amount", self.amount, "Amount")
            .check(
                "status",
                ReviewStatus::parse_or_default(&self.status).is_some(),
                "Unknown refund status",
            );
        errors
    }
}

impl Resource for Refund {
    const COLLECTION: &'static str = "refunds";
    const LABEL: &'static str = "Refund";
    const FILTERS: &'static [&'static str] = &["email", "status"];
    const UPLOAD: Option<UploadKind> = Some(UploadKind::Receipt);

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn search_text(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn attachment(&self) -> Option<&str> {
        self.receipt.as_deref()
    }

    fn set_attachment(&mut self, path: String) {
        self.receipt = Some(path);
    }
}

impl Editable for Refund {
    type Input = RefundInput;

    fn from_input(input: RefundInput, meta: RecordMeta) -> Self {
        Refund {
            meta,
            purchase_id: input.purchase_id.trim().to_string(),
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            phone: input.phone.trim().to_string(),
            reason: input.reason,
            amount: input.amount.unwrap_or_default(),
            receipt: None,
            status: ReviewStatus::parse_or_default(&input.status).unwrap_or_default(),
        }
    }
}

/// Request to send a purchased product back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductReturn {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub purchase_id: String,
    pub product_name: String,
    pub name: String,
    pub email: String,
    pub reason: String,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub status: ReviewStatus,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductReturnInput {
    pub purchase_id: String,
    pub product_name: String,
    pub name: String,
    pub email: String,
    pub reason: String,
    pub condition: String,
    pub status: String,
}

impl Validate for ProductReturnInput {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors
            .require("purchaseId", &self.purchase_id, "Order reference is required")
            .require("productName", &self.product_name, "Product name is required")
            .require("name", &self.name, "Name is required")
            .require_email("email", &self.email)
            .require("reason", &self.reason, "Reason is required")
            .check(
                "status",
                ReviewStatus::parse_or_default(&self.status).is_some(),
                "Unknown return status",
            );
        errors
    }
}

impl Resource for ProductReturn {
    const COLLECTION: &'static str = "returns";
    const LABEL: &'static str = "Return";
    const FILTERS: &'static [&'static str] = &["email", "status"];

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn search_text(&self) -> Option<&str> {
        Some(&self.product_name)
    }
}

impl Editable for ProductReturn {
    type Input = ProductReturnInput;

    fn from_input(input: ProductReturnInput, meta: RecordMeta) -> Self {
        ProductReturn {
            meta,
            purchase_id: input.purchase_id.trim().to_string(),
            product_name: input.product_name.trim().to_string(),
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            reason: input.reason,
            condition: input.condition.trim().to_string(),
            status: ReviewStatus::parse_or_default(&input.status).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refund_rules() {
        let input = RefundInput {
            purchase_id: "abc".into(),
            name: "Ann".into(),
            email: "ann@example.com".into(),
            phone: "0771234567".into(),
            reason: "Wrong size".into(),
            amount: Some(0.0),
            status: "approved".into(),
        };
        let errors = input.validate();
        assert_eq!(errors.get("amount"), Some("Amount must be a positive number"));
        assert_eq!(errors.get("status"), None);
    }

    #[test]
    fn test_return_status_parsed_case_insensitively() {
        let input = ProductReturnInput {
            purchase_id: "abc".into(),
            product_name: "Hoodie".into(),
            name: "Ann".into(),
            email: "ann@example.com".into(),
            reason: "Damaged".into(),
            condition: "Torn seam".into(),
            status: "REJECTED".into(),
        };
        assert!(input.validate().is_empty());
        let record = ProductReturn::from_input(input, RecordMeta::new());
        assert_eq!(record.status, ReviewStatus::Rejected);
    }

    #[test]
    fn test_unknown_status_rejected() {
        let input = ProductReturnInput { status: "Lost".into(), ..Default::default() };
        assert_eq!(input.validate().get("status"), Some("Unknown return status"));
    }
}
