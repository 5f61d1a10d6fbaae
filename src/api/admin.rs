use actix_web::{web, HttpResponse};

use crate::models::{AdminInfo, LoginRequest, LoginResponse, RegisterRequest};
use crate::services::auth_service::{self, Claims};
use crate::state::AppState;
use crate::utils::AppError;

#[utoipa::path(
    post,
    path = "/admin/register",
    tag = "Admin",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Admin registered", body = AdminInfo),
        (status = 400, description = "Invalid input or username/e-mail already taken")
    )
)]
pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /admin/register - username: {}", request.username);
    let admin = auth_service::register(state.store.as_ref(), &state.auth, &request).await?;
    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "message": "Admin registered successfully",
        "admin": admin
    })))
}

#[utoipa::path(
    post,
    path = "/admin/login",
    tag = "Admin",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔐 POST /admin/login - username: {}", request.username);

    match auth_service::login(state.store.as_ref(), &state.auth, &request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", response.admin.username);
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", request.username, e);
            Err(e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/admin/me",
    tag = "Admin",
    responses(
        (status = 200, description = "The authenticated admin", body = AdminInfo),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(
    state: web::Data<AppState>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let admin = auth_service::get_admin(state.store.as_ref(), &claims.sub).await?;
    Ok(HttpResponse::Ok().json(admin))
}

#[utoipa::path(
    get,
    path = "/admin",
    tag = "Admin",
    responses(
        (status = 200, description = "All admins"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let admins = auth_service::list_admins(state.store.as_ref()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "count": admins.len(),
        "data": admins
    })))
}

#[utoipa::path(
    delete,
    path = "/admin/{id}",
    tag = "Admin",
    params(("id" = String, Path, description = "Admin id")),
    responses(
        (status = 200, description = "Admin deleted"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Admin not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete(
    state: web::Data<AppState>,
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    if claims.sub == path.as_str() {
        return Err(AppError::InvalidRequest("You cannot delete your own account".to_string()));
    }

    auth_service::delete_admin(state.store.as_ref(), &path).await?;
    log::info!("🗑️  Admin {} removed by {}", path.as_str(), claims.username);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Admin deleted successfully"
    })))
}
