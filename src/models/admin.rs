use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::resource::{RecordMeta, Resource};
use crate::utils::{FieldErrors, Validate};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Back-office account. `password` holds the bcrypt hash and never leaves the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Resource for Admin {
    const COLLECTION: &'static str = "admins";
    const LABEL: &'static str = "Admin";

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminInfo {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Admin> for AdminInfo {
    fn from(admin: &Admin) -> Self {
        AdminInfo {
            id: admin.meta.id.clone(),
            username: admin.username.clone(),
            email: admin.email.clone(),
            created_at: admin.meta.created_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors
            .require("username", &self.username, "Username is required")
            .require_email("email", &self.email)
            .check(
                "password",
                self.password.chars().count() >= MIN_PASSWORD_LEN,
                "Password must be at least 6 characters",
            );
        errors
    }
}

/// `username` may also be the account e-mail.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors
            .require("username", &self.username, "Username is required")
            .require("password", &self.password, "Password is required");
        errors
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub admin: AdminInfo,
}
