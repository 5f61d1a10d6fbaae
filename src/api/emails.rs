use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::models::email::{self, Confirmation};
use crate::state::AppState;
use crate::utils::AppError;

#[derive(Serialize, utoipa::ToSchema)]
pub struct MailSentResponse {
    pub success: bool,
    pub message: String,
}

/// Validates, renders and sends one confirmation. Mounted once per confirmation type.
pub async fn send<C: Confirmation>(
    state: web::Data<AppState>,
    body: web::Json<C>,
) -> Result<HttpResponse, AppError> {
    let confirmation = body.into_inner();
    confirmation.validate().into_result()?;

    let message = email::render(&confirmation, &state.organization);
    let recipient = message.to.clone();
    if let Err(e) = state.mailer.send(message).await {
        log::error!("❌ Failed to send {} mail to {}: {}", C::KIND, recipient, e);
        return Err(e);
    }

    log::info!("📧 {} confirmation sent to {}", C::KIND, recipient);
    Ok(HttpResponse::Ok().json(MailSentResponse {
        success: true,
        message: "Email sent successfully".to_string(),
    }))
}
