use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::doc;
use serde::{Deserialize, Serialize};

use crate::database::DocumentStore;
use crate::models::{Admin, AdminInfo, ListQuery, LoginRequest, LoginResponse, RecordMeta, RegisterRequest};
use crate::services::repository::Repository;
use crate::utils::{AppError, Validate};

const AUDIENCE: &str = "backoffice-admin";
const BAD_CREDENTIALS: &str = "Invalid username or password";

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // admin id
    pub username: String,
    pub iat: usize,
    pub exp: usize,
    pub aud: String,
    pub iss: String,
}

#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub secret: String,
    pub issuer: String,
    pub ttl_hours: i64,
    pub bcrypt_cost: u32,
}

pub fn generate_jwt(settings: &AuthSettings, admin: &Admin) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: admin.meta.id.clone(),
        username: admin.username.clone(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(settings.ttl_hours)).timestamp() as usize,
        aud: AUDIENCE.to_string(),
        iss: settings.issuer.clone(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalError(format!("Failed to generate token: {}", e)))
}

pub fn verify_token(settings: &AuthSettings, token: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[AUDIENCE]);
    validation.set_issuer(&[settings.issuer.as_str()]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

pub async fn register(
    store: &dyn DocumentStore,
    settings: &AuthSettings,
    request: &RegisterRequest,
) -> Result<AdminInfo, AppError> {
    request.validate().into_result()?;

    let username = request.username.trim();
    let email = request.email.trim().to_lowercase();
    let repo = Repository::<Admin>::new(store);

    if repo.find_one(doc! { "username": username }).await?.is_some() {
        return Err(AppError::InvalidRequest("Username is already taken".to_string()));
    }
    if repo.find_one(doc! { "email": &email }).await?.is_some() {
        return Err(AppError::InvalidRequest("Email is already registered".to_string()));
    }

    let password = hash(&request.password, settings.bcrypt_cost)
        .map_err(|e| AppError::InternalError(format!("Failed to hash password: {}", e)))?;

    let admin = Admin {
        meta: RecordMeta::new(),
        username: username.to_string(),
        email,
        password,
    };
    // the unique indexes still catch a concurrent registration that passed the checks above
    repo.insert(&admin).await.map_err(|e| match e {
        AppError::Duplicate(_) => {
            AppError::InvalidRequest("Username or email is already registered".to_string())
        }
        other => other,
    })?;

    log::info!("✅ Admin registered: {}", admin.username);
    Ok(AdminInfo::from(&admin))
}

pub async fn login(
    store: &dyn DocumentStore,
    settings: &AuthSettings,
    request: &LoginRequest,
) -> Result<LoginResponse, AppError> {
    request.validate().into_result()?;

    let repo = Repository::<Admin>::new(store);
    let login = request.username.trim();

    let mut admin = repo.find_one(doc! { "username": login }).await?;
    if admin.is_none() && login.contains('@') {
        admin = repo.find_one(doc! { "email": login.to_lowercase() }).await?;
    }
    let admin = admin.ok_or_else(|| AppError::Unauthorized(BAD_CREDENTIALS.to_string()))?;

    let valid = verify(&request.password, &admin.password)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {}", e)))?;
    if !valid {
        return Err(AppError::Unauthorized(BAD_CREDENTIALS.to_string()));
    }

    let token = generate_jwt(settings, &admin)?;

    Ok(LoginResponse {
        success: true,
        token,
        admin: AdminInfo::from(&admin),
    })
}

pub async fn get_admin(store: &dyn DocumentStore, id: &str) -> Result<AdminInfo, AppError> {
    let admin = Repository::<Admin>::new(store).get(id).await?;
    Ok(AdminInfo::from(&admin))
}

pub async fn list_admins(store: &dyn DocumentStore) -> Result<Vec<AdminInfo>, AppError> {
    let admins = Repository::<Admin>::new(store).list(&ListQuery::default()).await?;
    Ok(admins.iter().map(AdminInfo::from).collect())
}

pub async fn delete_admin(store: &dyn DocumentStore, id: &str) -> Result<AdminInfo, AppError> {
    let admin = Repository::<Admin>::new(store).delete(id).await?;
    log::info!("🗑️  Admin deleted: {}", admin.username);
    Ok(AdminInfo::from(&admin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use mongodb::bson::Document;

    fn settings() -> AuthSettings {
        AuthSettings {
            secret: "test-secret".into(),
            issuer: "backoffice-service".into(),
            ttl_hours: 1,
            bcrypt_cost: 4,
        }
    }

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            username: "root".into(),
            email: "Root@Example.com".into(),
            password: "secret123".into(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let store = MemoryStore::new();
        let settings = settings();

        let info = register(&store, &settings, &register_request()).await.unwrap();
        assert_eq!(info.email, "root@example.com");

        let response = login(
            &store,
            &settings,
            &LoginRequest { username: "root".into(), password: "secret123".into() },
        )
        .await
        .unwrap();
        let claims = verify_token(&settings, &response.token).unwrap();
        assert_eq!(claims.sub, info.id);
        assert_eq!(claims.username, "root");

        // stored hash, not the plain password
        let admin = Repository::<Admin>::new(&store).get(&info.id).await.unwrap();
        assert_ne!(admin.password, "secret123");
    }

    #[tokio::test]
    async fn test_login_by_email() {
        let store = MemoryStore::new();
        let settings = settings();
        register(&store, &settings, &register_request()).await.unwrap();

        let response = login(
            &store,
            &settings,
            &LoginRequest { username: "root@example.com".into(), password: "secret123".into() },
        )
        .await;
        assert!(response.is_ok());
    }

    #[tokio::test]
    async fn test_bad_credentials_share_one_message() {
        let store = MemoryStore::new();
        let settings = settings();
        register(&store, &settings, &register_request()).await.unwrap();

        let wrong_password = login(
            &store,
            &settings,
            &LoginRequest { username: "root".into(), password: "nope-nope".into() },
        )
        .await
        .unwrap_err();
        let unknown_user = login(
            &store,
            &settings,
            &LoginRequest { username: "ghost".into(), password: "secret123".into() },
        )
        .await
        .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
        assert!(matches!(wrong_password, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_duplicate_registration_rejected() {
        let store = MemoryStore::new();
        let settings = settings();
        register(&store, &settings, &register_request()).await.unwrap();

        let mut again = register_request();
        again.email = "other@example.com".into();
        assert!(matches!(
            register(&store, &settings, &again).await,
            Err(AppError::InvalidRequest(_))
        ));

        let mut same_email = register_request();
        same_email.username = "other".into();
        assert!(matches!(
            register(&store, &settings, &same_email).await,
            Err(AppError::InvalidRequest(_))
        ));
    }

    /// Lookups see nothing, as when a concurrent registration lands between the checks and
    /// the insert; inserts enforce unique usernames like the Mongo index does.
    struct LateUniqueIndex(MemoryStore);

    #[async_trait::async_trait]
    impl DocumentStore for LateUniqueIndex {
        async fn insert(&self, collection: &str, document: Document) -> Result<(), AppError> {
            let username = document.get_str("username").unwrap_or_default().to_string();
            if !self.0.find(collection, doc! { "username": &username }).await?.is_empty() {
                return Err(AppError::Duplicate(format!("username {}", username)));
            }
            self.0.insert(collection, document).await
        }
        async fn find(&self, _: &str, _: Document) -> Result<Vec<Document>, AppError> {
            Ok(Vec::new())
        }
        async fn find_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError> {
            self.0.find_by_id(collection, id).await
        }
        async fn replace(
            &self,
            collection: &str,
            id: &str,
            document: Document,
        ) -> Result<Option<Document>, AppError> {
            self.0.replace(collection, id, document).await
        }
        async fn delete(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError> {
            self.0.delete(collection, id).await
        }
        async fn ping(&self) -> Result<(), AppError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_concurrent_registration_is_bad_request() {
        let store = LateUniqueIndex(MemoryStore::new());
        let settings = settings();
        register(&store, &settings, &register_request()).await.unwrap();

        let err = register(&store, &settings, &register_request()).await.unwrap_err();
        match err {
            AppError::InvalidRequest(msg) => assert_eq!(msg, "Username or email is already registered"),
            other => panic!("expected InvalidRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_token_from_other_issuer_rejected() {
        let settings = settings();
        let admin = Admin {
            meta: RecordMeta::new(),
            username: "root".into(),
            email: "root@example.com".into(),
            password: String::new(),
        };
        let token = generate_jwt(&settings, &admin).unwrap();

        let mut other = settings.clone();
        other.issuer = "someone-else".into();
        assert!(verify_token(&other, &token).is_err());

        let mut wrong_key = settings;
        wrong_key.secret = "other-secret".into();
        assert!(verify_token(&wrong_key, &token).is_err());
    }
}
