use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;
use crate::error::ApiError;

/// The fixed set of principal kinds gating route access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Abogado,
    Asistente,
    Cliente,
}

impl Role {
    pub const NAMES: &'static [&'static str] = &["abogado", "asistente", "cliente"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Abogado => "abogado",
            Role::Asistente => "asistente",
            Role::Cliente => "cliente",
        }
    }
}

/// Token claims, copied from the user record at login and never refreshed.
/// A profile edit after login is not visible until the next login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "numeroIdentificacion")]
    pub numero_identificacion: String,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub telefono: String,
    pub nombre_rol: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(
        numero_identificacion: String,
        nombre: String,
        apellido: String,
        email: String,
        telefono: String,
        nombre_rol: String,
        expiry_hours: u64,
    ) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            numero_identificacion,
            nombre,
            apellido,
            email,
            telefono,
            nombre_rol,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authentication token")]
    MissingToken,

    #[error("Invalid authentication token: {0}")]
    InvalidToken(String),

    #[error("JWT secret not configured")]
    InvalidSecret,

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => ApiError::MissingToken,
            AuthError::InvalidToken(_) => ApiError::InvalidToken,
            other => {
                tracing::error!("Token error: {}", other);
                ApiError::internal_server_error(other.to_string())
            }
        }
    }
}

pub fn generate_jwt(claims: &Claims, security: &SecurityConfig) -> Result<String, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key).map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// Checks signature and expiry; any failure is `InvalidToken`.
pub fn validate_jwt(token: &str, security: &SecurityConfig) -> Result<Claims, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

/// Membership test of the caller's role name in an allow-list. An empty
/// list admits any authenticated principal.
pub fn authorize(claims: &Claims, allowed: &[Role]) -> bool {
    allowed.is_empty() || allowed.iter().any(|role| role.as_str() == claims.nombre_rol)
}

pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, cost)
}

pub fn verify_password(password: &str, hashed: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(password, hashed)
}
