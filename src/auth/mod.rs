/*!
 * # Authentication and Authorization Module
 *
 * JWT bearer authentication plus role-based authorization. A token is
 * issued at login with the user's role and resolved permission grants;
 * the middleware verifies it and attaches an `AuthUser` actor to the
 * request. Lifecycle commands consult `policy::authorize` with that
 * actor.
 */

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, SaltString};
use argon2::{Argon2, PasswordVerifier};
use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub mod permissions;
pub mod policy;
pub mod rbac;

pub use permissions::{consts, format_permission, Permission, PermissionCatalog};
pub use policy::{
    authorize, authorize_owner_or, can_cancel_request, can_edit_request, can_review_request,
};
pub use rbac::{permission_matches, Role, RoleRegistry};

use crate::db::DbPool;
use crate::entities::user;
use crate::errors::ErrorResponse;

/// Claim structure for JWT tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,              // Subject (user ID)
    pub name: String,             // User's name
    pub email: String,            // User's email
    pub role: String,             // User's role
    pub permissions: Vec<String>, // Resolved permission grants
    pub jti: String,              // JWT ID
    pub iat: i64,                 // Issued at
    pub exp: i64,                 // Expiration
    pub iss: String,              // Issuer
    pub aud: String,              // Audience
}

/// The acting principal, as extracted from a verified token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub permissions: Vec<String>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authentication")]
    MissingAuth,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account disabled")]
    AccountDisabled,

    #[error("Internal auth error: {0}")]
    Internal(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::MissingAuth
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::AccountDisabled => StatusCode::FORBIDDEN,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = match &self {
            AuthError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        let body = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message,
            details: None,
            timestamp: Utc::now().to_rfc3339(),
        };
        (status, Json(body)).into_response()
    }
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub issuer: String,
    pub audience: String,
    pub token_lifetime: Duration,
}

impl AuthConfig {
    pub fn new(
        jwt_secret: String,
        issuer: String,
        audience: String,
        token_lifetime: Duration,
    ) -> Self {
        Self {
            jwt_secret,
            issuer,
            audience,
            token_lifetime,
        }
    }
}

/// Issues and verifies tokens, resolving role grants through the registry.
#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
    db: Arc<DbPool>,
    roles: Arc<RoleRegistry>,
}

impl AuthService {
    pub fn new(config: AuthConfig, db: Arc<DbPool>, roles: Arc<RoleRegistry>) -> Self {
        Self { config, db, roles }
    }

    pub fn roles(&self) -> &RoleRegistry {
        &self.roles
    }

    /// Validate credentials and issue a token pair for the user.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, AuthError> {
        let record = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;

        if !record.active {
            return Err(AuthError::AccountDisabled);
        }

        verify_password(password, &record.password_hash)?;

        self.generate_token(&record)
    }

    /// Issue a signed token carrying the user's resolved permissions.
    pub fn generate_token(&self, record: &user::Model) -> Result<TokenResponse, AuthError> {
        let now = Utc::now();
        let expires_in = self.config.token_lifetime.as_secs() as i64;
        let claims = Claims {
            sub: record.id.to_string(),
            name: record.name.clone(),
            email: record.email.clone(),
            role: record.role.clone(),
            permissions: self.roles.role_permissions(&record.role),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: now.timestamp() + expires_in,
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(TokenResponse {
            access_token: token,
            token_type: "Bearer".to_string(),
            expires_in,
        })
    }

    /// Verify a bearer token and reconstruct the actor.
    pub fn verify_token(&self, token: &str) -> Result<AuthUser, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.config.issuer.clone()]);
        validation.set_audience(&[self.config.audience.clone()]);

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        })?;

        let id = Uuid::parse_str(&data.claims.sub).map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthUser {
            id,
            name: data.claims.name,
            email: data.claims.email,
            role: data.claims.role,
            permissions: data.claims.permissions,
        })
    }
}

/// Hash a password for storage.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Internal(e.to_string()))
}

/// Verify a password against its stored hash.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| AuthError::Internal(e.to_string()))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Middleware verifying the bearer token and attaching the actor.
pub async fn auth_middleware(
    State(auth_service): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or(AuthError::MissingAuth)?;

    let actor = auth_service.verify_token(token)?;
    debug!(actor = %actor.id, role = %actor.role, "authenticated request");
    request.extensions_mut().insert(actor);

    Ok(next.run(request).await)
}

#[async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::MissingAuth)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Login handler
pub async fn login_handler(
    State(auth_service): State<Arc<AuthService>>,
    Json(credentials): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    credentials
        .validate()
        .map_err(|_| AuthError::InvalidCredentials)?;

    let tokens = auth_service
        .login(&credentials.email, &credentials.password)
        .await?;

    Ok(Json(tokens))
}

/// Authentication routes
pub fn auth_routes() -> axum::Router<Arc<AuthService>> {
    axum::Router::new().route("/login", axum::routing::post(login_handler))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> user::Model {
        user::Model {
            id: Uuid::new_v4(),
            name: "Grace Hopper".to_string(),
            email: "grace@example.com".to_string(),
            password_hash: hash_password("correct horse").unwrap(),
            role: "asset_manager".to_string(),
            active: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn service() -> AuthService {
        let config = AuthConfig::new(
            "test_secret_key_for_testing_purposes_only_32chars".to_string(),
            "custodia-api".to_string(),
            "custodia".to_string(),
            Duration::from_secs(3600),
        );
        // The DB is unused by generate/verify paths.
        let db = Arc::new(sea_orm::DatabaseConnection::Disconnected);
        AuthService::new(config, db, Arc::new(RoleRegistry::builtin()))
    }

    #[test]
    fn password_round_trip() {
        let hash = hash_password("secret").unwrap();
        assert!(verify_password("secret", &hash).is_ok());
        assert!(verify_password("wrong", &hash).is_err());
    }

    #[test]
    fn token_round_trip_resolves_role_permissions() {
        let svc = service();
        let user = sample_user();

        let tokens = svc.generate_token(&user).unwrap();
        let actor = svc.verify_token(&tokens.access_token).unwrap();

        assert_eq!(actor.id, user.id);
        assert_eq!(actor.role, "asset_manager");
        assert!(actor.has_permission("items:create"));
        assert!(!actor.has_permission("disposals:execute"));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let svc = service();
        let tokens = svc.generate_token(&sample_user()).unwrap();
        let mut tampered = tokens.access_token.clone();
        tampered.push('x');
        assert!(svc.verify_token(&tampered).is_err());
    }
}
