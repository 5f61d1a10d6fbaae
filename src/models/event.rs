use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::resource::{Editable, RecordMeta, Resource};
use crate::utils::{lenient_f64, lenient_i64, FieldErrors, UploadKind, Validate};

/// Organization event shown on the storefront.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub name: String,
    pub description: String,
    /// ISO date, `YYYY-MM-DD`.
    pub date: String,
    #[serde(default)]
    pub time: String,
    pub venue: String,
    pub price: f64,
    pub capacity: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventInput {
    pub name: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub venue: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
    #[serde(deserialize_with = "lenient_i64")]
    pub capacity: Option<i64>,
}

impl Validate for EventInput {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors
            .require("name", &self.name, "Event name is required")
            .require("description", &self.description, "Description is required")
            .require("date", &self.date, "Date is required")
            .check(
                "date",
                NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").is_ok(),
                "Date must be formatted as YYYY-MM-DD",
            )
            .require("venue", &self.venue, "Venue is required");

        match self.price {
            None => errors.check("price", false, "Price is required"),
            Some(p) => errors.check("price", p >= 0.0, "Price cannot be negative"),
        };
        errors.require_positive("capacity", self.capacity.map(|c| c as f64), "Capacity");
        errors
    }
}

impl Resource for Event {
    const COLLECTION: &'static str = "events";
    const LABEL: &'static str = "Event";

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn search_text(&self) -> Option<&str> {
        Some(&self.name)
    }
}

impl Editable for Event {
    type Input = EventInput;

    fn from_input(input: EventInput, meta: RecordMeta) -> Self {
        Event {
            meta,
            name: input.name.trim().to_string(),
            description: input.description,
            date: input.date.trim().to_string(),
            time: input.time.trim().to_string(),
            venue: input.venue.trim().to_string(),
            price: input.price.unwrap_or_default(),
            capacity: input.capacity.unwrap_or_default(),
        }
    }
}

/// A booking for an event, with an optional uploaded payment slip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventParticipant {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub event_id: String,
    #[serde(default)]
    pub event_name: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub ticket_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_slip: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventParticipantInput {
    pub event_id: String,
    pub event_name: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub ticket_count: Option<i64>,
}

impl Validate for EventParticipantInput {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors
            .require("eventId", &self.event_id, "Event is required")
            .require("name", &self.name, "Name is required")
            .require_email("email", &self.email)
            .require_phone("phone", &self.phone)
            .require_positive("ticketCount", self.ticket_count.map(|c| c as f64), "Ticket count");
        errors
    }
}

impl Resource for EventParticipant {
    const COLLECTION: &'static str = "eventparticipants";
    const LABEL: &'static str = "Event participant";
    const FILTERS: &'static [&'static str] = &["eventId", "email"];
    const UPLOAD: Option<UploadKind> = Some(UploadKind::EventPayment);

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn search_text(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn attachment(&self) -> Option<&str> {
        self.payment_slip.as_deref()
    }

    fn set_attachment(&mut self, path: String) {
        self.payment_slip = Some(path);
    }
}

impl Editable for EventParticipant {
    type Input = EventParticipantInput;

    fn from_input(input: EventParticipantInput, meta: RecordMeta) -> Self {
        EventParticipant {
            meta,
            event_id: input.event_id.trim().to_string(),
            event_name: input.event_name.trim().to_string(),
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            phone: input.phone.trim().to_string(),
            ticket_count: input.ticket_count.unwrap_or_default(),
            payment_slip: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_validation() {
        let input = EventInput {
            name: "Beach cleanup".into(),
            description: "Bring gloves".into(),
            date: "2024-13-01".into(),
            venue: "North beach".into(),
            price: Some(-1.0),
            capacity: Some(0),
            ..Default::default()
        };
        let errors = input.validate();
        assert_eq!(errors.get("date"), Some("Date must be formatted as YYYY-MM-DD"));
        assert_eq!(errors.get("price"), Some("Price cannot be negative"));
        assert_eq!(errors.get("capacity"), Some("Capacity must be a positive number"));
        assert_eq!(errors.get("name"), None);
    }

    #[test]
    fn test_free_event_is_valid() {
        let input = EventInput {
            name: "Open day".into(),
            description: "Tour".into(),
            date: "2024-06-01".into(),
            venue: "HQ".into(),
            price: Some(0.0),
            capacity: Some(50),
            ..Default::default()
        };
        assert!(input.validate().is_empty());
    }

    #[test]
    fn test_participant_requires_contact_details() {
        let errors = EventParticipantInput::default().validate();
        assert!(errors.get("eventId").is_some());
        assert!(errors.get("email").is_some());
        assert!(errors.get("phone").is_some());
        assert_eq!(errors.get("ticketCount"), Some("Ticket count is required"));
    }
}
