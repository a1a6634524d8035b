pub mod password;

use async_trait::async_trait;
use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use chrono::{Duration, Utc};
use crates::domain::value_objects::enums::user_roles::UserRole;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    axum_http::error_responses::{AppError, ErrorResponse},
    config::{config_loader, config_model::JwtSecret},
};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn require_client(&self) -> Result<(), AppError> {
        match self.role {
            UserRole::Client => Ok(()),
            UserRole::Admin => Err(AppError::Forbidden("Access denied".to_string())),
        }
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Access denied".to_string()))
        }
    }

    /// List filter owner: clients only see their own rows, admins see all.
    pub fn owner_scope(&self) -> Option<Uuid> {
        if self.is_admin() { None } else { Some(self.user_id) }
    }
}

#[derive(Debug)]
pub struct AuthError(anyhow::Error);

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError(err)
    }
}

impl axum::response::IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(ErrorResponse {
            code: StatusCode::UNAUTHORIZED.as_u16(),
            message: format!("Unauthorized: {}", self.0),
        });

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

pub fn issue_token(user_id: Uuid, role: UserRole, jwt: &JwtSecret) -> anyhow::Result<String> {
    let ttl = i64::try_from(jwt.ttl_seconds)
        .map_err(|_| anyhow::anyhow!("JWT ttl_seconds is too large"))?;

    let now = Utc::now();
    let exp = now
        .checked_add_signed(Duration::seconds(ttl))
        .ok_or_else(|| anyhow::anyhow!("Failed to compute token expiration"))?;

    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        iat: now.timestamp() as usize,
        exp: exp.timestamp() as usize,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt.secret.as_bytes()),
    )?;

    Ok(token)
}

pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| anyhow::anyhow!("JWT validation failed: {}", e))?;

    Ok(token_data.claims)
}

fn auth_user_from_header(header: Option<&str>, secret: &str) -> Result<AuthUser, AuthError> {
    let header = header.ok_or_else(|| anyhow::anyhow!("Missing Authorization header"))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| anyhow::anyhow!("Invalid Authorization header format"))?;

    let claims = validate_token(token.trim(), secret)?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| anyhow::anyhow!("Invalid user ID in token"))?;

    Ok(AuthUser {
        user_id,
        role: UserRole::from_str(&claims.role),
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jwt = config_loader::get_jwt_secret()?;

        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .map(|value| value.to_str())
            .transpose()
            .map_err(|_| anyhow::anyhow!("Invalid Authorization header"))?;

        auth_user_from_header(header, &jwt.secret)
    }
}
