use std::sync::Arc;

use crate::database::DocumentStore;
use crate::services::auth_service::AuthSettings;
use crate::services::mail_service::Mailer;
use crate::utils::UploadStore;

/// Shared handles every handler receives through `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub mailer: Arc<dyn Mailer>,
    pub uploads: UploadStore,
    pub auth: AuthSettings,
    pub organization: String,
}
