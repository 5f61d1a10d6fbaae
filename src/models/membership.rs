use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::resource::{status_enum, string_enum, Editable, RecordMeta, Resource};
use crate::utils::{FieldErrors, Validate};

string_enum! {
    MembershipTier {
        Basic => "Basic",
        Silver => "Silver",
        Gold => "Gold",
        Platinum => "Platinum",
    }
}

status_enum! {
    MembershipStatus {
        Active => "Active",
        Expired => "Expired",
        Cancelled => "Cancelled",
    }
}

string_enum! {
    SubscriptionPlan {
        Monthly => "Monthly",
        Quarterly => "Quarterly",
        Yearly => "Yearly",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub tier: MembershipTier,
    pub start_date: String,
    #[serde(default)]
    pub status: MembershipStatus,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MembershipInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub tier: String,
    /// Empty means today.
    pub start_date: String,
    pub status: String,
}

impl Validate for MembershipInput {
    fn validate(&self) -> FieldErrors {
        let start = self.start_date.trim();
        let mut errors = FieldErrors::new();
        errors
            .require("name", &self.name, "Name is required")
            .require_email("email", &self.email)
            .require_phone("phone", &self.phone)
            .require("tier", &self.tier, "Membership tier is required")
            .check("tier", MembershipTier::parse(&self.tier).is_some(), "Unknown membership tier")
            .check(
                "startDate",
                start.is_empty() || NaiveDate::parse_from_str(start, "%Y-%m-%d").is_ok(),
                "Start date must be formatted as YYYY-MM-DD",
            )
            .check(
                "status",
                MembershipStatus::parse_or_default(&self.status).is_some(),
                "Unknown membership status",
            );
        errors
    }
}

impl Resource for Membership {
    const COLLECTION: &'static str = "memberships";
    const LABEL: &'static str = "Membership";
    const FILTERS: &'static [&'static str] = &["tier", "status"];

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn search_text(&self) -> Option<&str> {
        Some(&self.name)
    }
}

impl Editable for Membership {
    type Input = MembershipInput;

    fn from_input(input: MembershipInput, meta: RecordMeta) -> Self {
        let start = input.start_date.trim();
        let start_date = if start.is_empty() {
            Utc::now().date_naive().format("%Y-%m-%d").to_string()
        } else {
            start.to_string()
        };

        Membership {
            meta,
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            phone: input.phone.trim().to_string(),
            tier: MembershipTier::parse(&input.tier).unwrap_or_default(),
            start_date,
            status: MembershipStatus::parse_or_default(&input.status).unwrap_or_default(),
        }
    }
}

/// Newsletter / supporter subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub name: String,
    pub email: String,
    pub plan: SubscriptionPlan,
    pub active: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubscriptionInput {
    pub name: String,
    pub email: String,
    pub plan: String,
    pub active: Option<bool>,
}

impl Validate for SubscriptionInput {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors
            .require("name", &self.name, "Name is required")
            .require_email("email", &self.email)
            .require("plan", &self.plan, "Plan is required")
            .check("plan", SubscriptionPlan::parse(&self.plan).is_some(), "Unknown subscription plan");
        errors
    }
}

impl Resource for Subscription {
    const COLLECTION: &'static str = "subscriptions";
    const LABEL: &'static str = "Subscription";
    const FILTERS: &'static [&'static str] = &["plan"];

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn search_text(&self) -> Option<&str> {
        Some(&self.email)
    }
}

impl Editable for Subscription {
    type Input = SubscriptionInput;

    fn from_input(input: SubscriptionInput, meta: RecordMeta) -> Self {
        Subscription {
            meta,
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            plan: SubscriptionPlan::parse(&input.plan).unwrap_or_default(),
            active: input.active.unwrap_or(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_start_date_defaults_to_today() {
        let input = MembershipInput {
            name: "Ann".into(),
            email: "ann@example.com".into(),
            phone: "0771234567".into(),
            tier: "gold".into(),
            ..Default::default()
        };
        assert!(input.validate().is_empty());

        let membership = Membership::from_input(input, RecordMeta::new());
        assert_eq!(membership.tier, MembershipTier::Gold);
        assert_eq!(membership.status, MembershipStatus::Active);
        assert!(NaiveDate::parse_from_str(&membership.start_date, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn test_membership_rejects_unknown_tier() {
        let input = MembershipInput { tier: "Diamond".into(), ..Default::default() };
        assert_eq!(input.validate().get("tier"), Some("Unknown membership tier"));
    }

    #[test]
    fn test_subscription_active_by_default() {
        let input = SubscriptionInput {
            name: "Ann".into(),
            email: "ann@example.com".into(),
            plan: "Yearly".into(),
            active: None,
        };
        assert!(input.validate().is_empty());
        let subscription = Subscription::from_input(input, RecordMeta::new());
        assert!(subscription.active);
        assert_eq!(subscription.plan, SubscriptionPlan::Yearly);
    }
}
