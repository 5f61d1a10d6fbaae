use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Back Office Service API",
        version = "1.0.0",
        description = "Back-office and storefront API.\n\n**Authentication:** `/admin` management routes require a JWT Bearer token from `/admin/login`.\n\n**Resources:** events, event bookings, products, purchases, refunds, returns, tickets, FAQ, donations, memberships and subscriptions share one CRUD contract: `GET /<prefix>`, `POST /<prefix>`, `GET|PUT|DELETE /<prefix>/{id}`. Bookings, products, purchases and refunds take multipart forms with one file field.\n\n**Mail:** `/sendEmail`, `/sendPurchaseEmail`, `/sendRefundEmail`, `/sendDonationEmail`, `/returnProductsendEmail` and `/sendSubEmail` send transactional confirmations."
    ),
    paths(
        // Health
        crate::api::health::root,
        crate::api::health::health_check,

        // Admin
        crate::api::admin::register,
        crate::api::admin::login,
        crate::api::admin::me,
        crate::api::admin::list,
        crate::api::admin::delete,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::api::emails::MailSentResponse,
            crate::models::AdminInfo,
            crate::models::RegisterRequest,
            crate::models::LoginRequest,
            crate::models::LoginResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and health endpoints."),
        (name = "Admin", description = "Admin registration, login and account management."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by /admin/login"))
                        .build()
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_admin_routes() {
        let json = ApiDoc::openapi().to_json().unwrap();
        assert!(json.contains("/admin/login"));
        assert!(json.contains("bearer_auth"));
    }

    #[test]
    fn test_every_tag_has_an_operation() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().unwrap();
        for tag in doc.tags.unwrap_or_default() {
            assert!(
                json.contains(&format!("\"tags\":[\"{}\"]", tag.name)),
                "tag {} has no operation",
                tag.name
            );
        }
    }
}
