use serde::{de::DeserializeOwned, Deserialize};

use crate::utils::{lenient_f64, lenient_i64, FieldErrors, Validate};

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// A transactional confirmation: who receives it and which details it prints.
pub trait Confirmation: DeserializeOwned + Validate + 'static {
    /// Short name used in logs ("booking", "refund").
    const KIND: &'static str;

    fn recipient(&self) -> &str;
    fn recipient_name(&self) -> &str;
    fn subject(&self) -> String;
    fn intro(&self) -> String;
    fn details(&self) -> Vec<(&'static str, String)>;
}

pub fn render<C: Confirmation>(confirmation: &C, organization: &str) -> OutgoingEmail {
    let name = confirmation.recipient_name().trim();
    let intro = confirmation.intro();
    let details = confirmation.details();

    let mut text = format!("Dear {},\n\n{}\n\n", name, intro);
    for (label, value) in &details {
        text.push_str(&format!("{}: {}\n", label, value));
    }
    text.push_str(&format!("\nThank you,\n{}\n", organization));

    let rows: String = details
        .iter()
        .map(|(label, value)| {
            format!(
                "<tr><td style=\"padding:4px 12px 4px 0\"><strong>{}</strong></td><td>{}</td></tr>",
                escape_html(label),
                escape_html(value)
            )
        })
        .collect();
    let html = format!(
        "<p>Dear {},</p><p>{}</p><table>{}</table><p>Thank you,<br/>{}</p>",
        escape_html(name),
        escape_html(&intro),
        rows,
        escape_html(organization)
    );

    OutgoingEmail {
        to: confirmation.recipient().trim().to_string(),
        subject: confirmation.subject(),
        text,
        html,
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn money(amount: Option<f64>) -> String {
    format!("{:.2}", amount.unwrap_or_default())
}

fn contact_errors(email: &str, name: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors
        .require_email("email", email)
        .require("name", name, "Name is required");
    errors
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookingEmail {
    pub email: String,
    pub name: String,
    pub event_name: String,
    pub event_date: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub ticket_count: Option<i64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub total_amount: Option<f64>,
}

impl Validate for BookingEmail {
    fn validate(&self) -> FieldErrors {
        let mut errors = contact_errors(&self.email, &self.name);
        errors.require("eventName", &self.event_name, "Event name is required");
        errors
    }
}

impl Confirmation for BookingEmail {
    const KIND: &'static str = "booking";

    fn recipient(&self) -> &str {
        &self.email
    }

    fn recipient_name(&self) -> &str {
        &self.name
    }

    fn subject(&self) -> String {
        format!("Booking confirmed: {}", self.event_name.trim())
    }

    fn intro(&self) -> String {
        "Your event booking has been received. Here are the details:".to_string()
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        let mut details = vec![("Event", self.event_name.trim().to_string())];
        if !self.event_date.trim().is_empty() {
            details.push(("Date", self.event_date.trim().to_string()));
        }
        details.push(("Tickets", self.ticket_count.unwrap_or(1).to_string()));
        if self.total_amount.is_some() {
            details.push(("Total", money(self.total_amount)));
        }
        details
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PurchaseEmail {
    pub email: String,
    pub name: String,
    pub order_id: String,
    pub product_name: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub quantity: Option<i64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub total_price: Option<f64>,
}

impl Validate for PurchaseEmail {
    fn validate(&self) -> FieldErrors {
        let mut errors = contact_errors(&self.email, &self.name);
        errors
            .require("productName", &self.product_name, "Product name is required")
            .require_positive("totalPrice", self.total_price, "Total price");
        errors
    }
}

impl Confirmation for PurchaseEmail {
    const KIND: &'static str = "purchase";

    fn recipient(&self) -> &str {
        &self.email
    }

    fn recipient_name(&self) -> &str {
        &self.name
    }

    fn subject(&self) -> String {
        "Your order has been received".to_string()
    }

    fn intro(&self) -> String {
        "Thank you for your purchase. We will ship it once the payment is verified.".to_string()
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        let mut details = Vec::new();
        if !self.order_id.trim().is_empty() {
            details.push(("Order", self.order_id.trim().to_string()));
        }
        details.push(("Product", self.product_name.trim().to_string()));
        details.push(("Quantity", self.quantity.unwrap_or(1).to_string()));
        details.push(("Total", money(self.total_price)));
        details
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RefundEmail {
    pub email: String,
    pub name: String,
    pub purchase_id: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub amount: Option<f64>,
    pub status: String,
}

impl Validate for RefundEmail {
    fn validate(&self) -> FieldErrors {
        let mut errors = contact_errors(&self.email, &self.name);
        errors.require_positive("amount", self.amount, "Amount");
        errors
    }
}

impl Confirmation for RefundEmail {
    const KIND: &'static str = "refund";

    fn recipient(&self) -> &str {
        &self.email
    }

    fn recipient_name(&self) -> &str {
        &self.name
    }

    fn subject(&self) -> String {
        match self.status.trim() {
            "" => "Refund request received".to_string(),
            status => format!("Refund request {}", status.to_lowercase()),
        }
    }

    fn intro(&self) -> String {
        "We have an update on your refund request.".to_string()
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        let mut details = Vec::new();
        if !self.purchase_id.trim().is_empty() {
            details.push(("Order", self.purchase_id.trim().to_string()));
        }
        details.push(("Amount", money(self.amount)));
        let status = self.status.trim();
        details.push(("Status", if status.is_empty() { "Pending" } else { status }.to_string()));
        details
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DonationEmail {
    pub email: String,
    pub name: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub amount: Option<f64>,
}

impl Validate for DonationEmail {
    fn validate(&self) -> FieldErrors {
        let mut errors = contact_errors(&self.email, &self.name);
        errors.require_positive("amount", self.amount, "Amount");
        errors
    }
}

impl Confirmation for DonationEmail {
    const KIND: &'static str = "donation";

    fn recipient(&self) -> &str {
        &self.email
    }

    fn recipient_name(&self) -> &str {
        &self.name
    }

    fn subject(&self) -> String {
        "Thank you for your donation".to_string()
    }

    fn intro(&self) -> String {
        "Your generosity keeps our work going. This e-mail confirms your donation.".to_string()
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![("Amount", money(self.amount))]
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReturnEmail {
    pub email: String,
    pub name: String,
    pub product_name: String,
    pub purchase_id: String,
    pub status: String,
}

impl Validate for ReturnEmail {
    fn validate(&self) -> FieldErrors {
        let mut errors = contact_errors(&self.email, &self.name);
        errors.require("productName", &self.product_name, "Product name is required");
        errors
    }
}

impl Confirmation for ReturnEmail {
    const KIND: &'static str = "return";

    fn recipient(&self) -> &str {
        &self.email
    }

    fn recipient_name(&self) -> &str {
        &self.name
    }

    fn subject(&self) -> String {
        format!("Return request for {}", self.product_name.trim())
    }

    fn intro(&self) -> String {
        "We have an update on your product return.".to_string()
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        let mut details = vec![("Product", self.product_name.trim().to_string())];
        if !self.purchase_id.trim().is_empty() {
            details.push(("Order", self.purchase_id.trim().to_string()));
        }
        let status = self.status.trim();
        details.push(("Status", if status.is_empty() { "Pending" } else { status }.to_string()));
        details
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubscriptionEmail {
    pub email: String,
    pub name: String,
    pub plan: String,
}

impl Validate for SubscriptionEmail {
    fn validate(&self) -> FieldErrors {
        contact_errors(&self.email, &self.name)
    }
}

impl Confirmation for SubscriptionEmail {
    const KIND: &'static str = "subscription";

    fn recipient(&self) -> &str {
        &self.email
    }

    fn recipient_name(&self) -> &str {
        &self.name
    }

    fn subject(&self) -> String {
        "Subscription confirmed".to_string()
    }

    fn intro(&self) -> String {
        "You are now subscribed. Welcome aboard!".to_string()
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        let plan = self.plan.trim();
        vec![("Plan", if plan.is_empty() { "Monthly" } else { plan }.to_string())]
    }
}
