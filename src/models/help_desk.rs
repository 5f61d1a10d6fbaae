use serde::{Deserialize, Serialize};

use super::resource::{status_enum, Editable, RecordMeta, Resource};
use crate::utils::{FieldErrors, Validate};

status_enum! {
    TicketStatus {
        Open => "Open",
        InProgress => "In Progress",
        Resolved => "Resolved",
        Closed => "Closed",
    }
}

/// Help-desk ticket raised by a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub topic: String,
    pub description: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub status: TicketStatus,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TicketInput {
    pub topic: String,
    pub description: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub status: String,
}

impl Validate for TicketInput {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors
            .require("topic", &self.topic, "Topic is required.")
            .require("description", &self.description, "Description is required.")
            .require("name", &self.name, "Name is required.")
            .require_phone("phone", &self.phone)
            .require_email("email", &self.email)
            .check(
                "status",
                TicketStatus::parse_or_default(&self.status).is_some(),
                "Unknown ticket status",
            );
        errors
    }
}

impl Resource for Ticket {
    const COLLECTION: &'static str = "tickets";
    const LABEL: &'static str = "Ticket";
    const FILTERS: &'static [&'static str] = &["status", "email"];

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn search_text(&self) -> Option<&str> {
        Some(&self.topic)
    }
}

impl Editable for Ticket {
    type Input = TicketInput;

    fn from_input(input: TicketInput, meta: RecordMeta) -> Self {
        Ticket {
            meta,
            topic: input.topic.trim().to_string(),
            description: input.description,
            name: input.name.trim().to_string(),
            phone: input.phone.trim().to_string(),
            email: input.email.trim().to_string(),
            status: TicketStatus::parse_or_default(&input.status).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faq {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FaqInput {
    pub question: String,
    pub answer: String,
}

impl Validate for FaqInput {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors
            .require("question", &self.question, "Question is required")
            .require("answer", &self.answer, "Answer is required");
        errors
    }
}

impl Resource for Faq {
    const COLLECTION: &'static str = "faqs";
    const LABEL: &'static str = "FAQ";

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn search_text(&self) -> Option<&str> {
        Some(&self.question)
    }
}

impl Editable for Faq {
    type Input = FaqInput;

    fn from_input(input: FaqInput, meta: RecordMeta) -> Self {
        Faq {
            meta,
            question: input.question.trim().to_string(),
            answer: input.answer,
        }
    }
}
