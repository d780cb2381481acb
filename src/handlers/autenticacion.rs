// handlers/autenticacion.rs - POST /api/autenticacion, GET /api/autenticacion/perfil

use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::auth::{generate_jwt, verify_password, Claims};
use crate::error::ApiError;
use crate::filter::FilterData;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::{Rol, Usuario};
use crate::validation::{Field, Rule, Schema, ValidJson, Validated};

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Only presence is checked; a malformed email is simply an unknown user.
impl Validated for LoginInput {
    const SCHEMA: &'static Schema = &Schema::new(&[
        Field::required("email", Rule::STRING),
        Field::required("password", Rule::STRING),
    ]);
}

/// POST /api/autenticacion - exchange email + password for a token
///
/// The token carries a snapshot of the user's profile and role name. Later
/// profile edits are not reflected until the next login.
pub async fn login(State(state): State<AppState>, ValidJson(input): ValidJson<LoginInput>) -> ApiResult<Value> {
    let usuario = state
        .repo::<Usuario>()
        .select_one(FilterData::eq("email", input.email.as_str()))
        .await?
        .ok_or_else(|| {
            tracing::warn!("Login failed: unknown email {}", input.email);
            ApiError::not_found("User not found")
        })?;

    if !verify_password(&input.password, &usuario.password)? {
        tracing::warn!("Login failed: wrong password for {}", usuario.numero_identificacion);
        return Err(ApiError::unauthorized("Invalid password"));
    }

    let rol = state
        .repo::<Rol>()
        .select_one(FilterData::eq("id_rol", usuario.id_rol))
        .await?
        .ok_or_else(|| ApiError::not_found("Role not found"))?;

    let claims = Claims::new(
        usuario.numero_identificacion,
        usuario.nombres,
        usuario.apellidos,
        usuario.email,
        usuario.telefono,
        rol.nombre.as_str().to_string(),
        state.security.jwt_expiry_hours,
    );
    let token = generate_jwt(&claims, &state.security)?;

    tracing::info!("User {} logged in as {}", claims.numero_identificacion, claims.nombre_rol);
    Ok(ApiResponse::success(json!({ "token": token })))
}

/// GET /api/autenticacion/perfil - the caller's token claims
pub async fn perfil(AuthUser(claims): AuthUser) -> ApiResult<Claims> {
    Ok(ApiResponse::success(claims))
}
