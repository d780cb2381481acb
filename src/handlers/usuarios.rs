// handlers/usuarios.rs - /api/usuarios handlers

use std::collections::HashMap;

use axum::extract::State;
use serde::Deserialize;
use serde_json::Value;

use crate::app::AppState;
use crate::auth::hash_password;
use crate::error::ApiError;
use crate::filter::FilterData;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Abogado, Asistente, Cliente, Rol, Timestamps, Usuario, UsuarioView};
use crate::validation::{Field, Rule, Schema, ValidJson, ValidPath, Validated};

#[derive(Debug, Deserialize)]
pub struct UsuarioPath {
    #[serde(rename = "numeroIdentificacion")]
    pub numero_identificacion: String,
}

impl Validated for UsuarioPath {
    const SCHEMA: &'static Schema = &Schema::new(&[Field::required("numeroIdentificacion", Rule::STRING)]);
}

#[derive(Debug, Deserialize)]
pub struct CreateUsuario {
    #[serde(rename = "numeroIdentificacion")]
    pub numero_identificacion: String,
    pub nombres: String,
    pub apellidos: String,
    pub telefono: String,
    pub email: String,
    pub password: String,
    pub id_rol: i64,
}

impl Validated for CreateUsuario {
    const SCHEMA: &'static Schema = &Schema::new(&[
        Field::required("numeroIdentificacion", Rule::IDENTITY),
        Field::required("nombres", Rule::min(3)),
        Field::required("apellidos", Rule::min(3)),
        Field::required("telefono", Rule::PHONE),
        Field::required("email", Rule::EMAIL),
        Field::required("password", Rule::min(6)),
        Field::required("id_rol", Rule::Number),
    ]);
}

/// Present fields overwrite; `id_rol` is always required. The identity
/// number is accepted for compatibility but never changed here.
#[derive(Debug, Deserialize)]
pub struct UpdateUsuario {
    pub nombres: Option<String>,
    pub apellidos: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub id_rol: i64,
}

impl Validated for UpdateUsuario {
    const SCHEMA: &'static Schema = &Schema::new(&[
        Field::optional("numeroIdentificacion", Rule::IDENTITY),
        Field::optional("nombres", Rule::min(3)),
        Field::optional("apellidos", Rule::min(3)),
        Field::optional("telefono", Rule::PHONE),
        Field::optional("email", Rule::EMAIL),
        Field::optional("password", Rule::min(6)),
        Field::required("id_rol", Rule::Number),
    ]);
}

async fn rol_nombre(state: &AppState, id_rol: i64) -> Result<Option<String>, ApiError> {
    let rol = state.repo::<Rol>().select_one(FilterData::eq("id_rol", id_rol)).await?;
    Ok(rol.map(|r| r.nombre.as_str().to_string()))
}

async fn require_rol(state: &AppState, id_rol: i64) -> Result<String, ApiError> {
    rol_nombre(state, id_rol)
        .await?
        .ok_or_else(|| ApiError::invalid_reference("Role not found"))
}

/// POST /api/usuarios - register a user with a hashed password
pub async fn create(State(state): State<AppState>, ValidJson(input): ValidJson<CreateUsuario>) -> ApiResult<UsuarioView> {
    let rol = require_rol(&state, input.id_rol).await?;

    let repo = state.repo::<Usuario>();
    for (field, value) in [
        ("numeroIdentificacion", &input.numero_identificacion),
        ("email", &input.email),
        ("telefono", &input.telefono),
    ] {
        if repo.exists(FilterData::eq(field, value.as_str())).await? {
            return Err(ApiError::duplicate(
                "A user with this identity number, email or phone already exists",
            ));
        }
    }

    let usuario = Usuario {
        numero_identificacion: input.numero_identificacion,
        nombres: input.nombres,
        apellidos: input.apellidos,
        telefono: input.telefono,
        email: input.email,
        password: hash_password(&input.password, state.security.bcrypt_cost)?,
        id_rol: input.id_rol,
        timestamps: Timestamps::default(),
    };
    let stored = repo.insert(&usuario).await?;

    tracing::info!("Created user {} with role {}", stored.numero_identificacion, rol);
    Ok(ApiResponse::created(UsuarioView::new(stored, Some(rol))))
}

/// GET /api/usuarios - every user with its role name
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<UsuarioView>> {
    let usuarios = state.repo::<Usuario>().select_any(FilterData::all()).await?;

    let mut ids: Vec<Value> = usuarios.iter().map(|u| Value::from(u.id_rol)).collect();
    ids.sort_by_key(|v| v.as_i64());
    ids.dedup();
    let roles: HashMap<i64, String> = state
        .repo::<Rol>()
        .select_in("id_rol", ids)
        .await?
        .into_iter()
        .map(|r| (r.id_rol, r.nombre.as_str().to_string()))
        .collect();

    let views = usuarios
        .into_iter()
        .map(|u| {
            let rol = roles.get(&u.id_rol).cloned();
            UsuarioView::new(u, rol)
        })
        .collect();
    Ok(ApiResponse::success(views))
}

/// GET /api/usuarios/:numeroIdentificacion
pub async fn get(State(state): State<AppState>, ValidPath(path): ValidPath<UsuarioPath>) -> ApiResult<UsuarioView> {
    let usuario = state
        .repo::<Usuario>()
        .select_404(FilterData::eq("numeroIdentificacion", path.numero_identificacion.as_str()))
        .await?;
    let rol = rol_nombre(&state, usuario.id_rol).await?;
    Ok(ApiResponse::success(UsuarioView::new(usuario, rol)))
}

/// PUT /api/usuarios/:numeroIdentificacion
pub async fn update(
    State(state): State<AppState>,
    ValidPath(path): ValidPath<UsuarioPath>,
    ValidJson(input): ValidJson<UpdateUsuario>,
) -> ApiResult<UsuarioView> {
    let repo = state.repo::<Usuario>();
    let filter = || FilterData::eq("numeroIdentificacion", path.numero_identificacion.as_str());
    let mut usuario = repo.select_404(filter()).await?;
    let rol = require_rol(&state, input.id_rol).await?;

    if let Some(nombres) = input.nombres {
        usuario.nombres = nombres;
    }
    if let Some(apellidos) = input.apellidos {
        usuario.apellidos = apellidos;
    }
    if let Some(telefono) = input.telefono {
        usuario.telefono = telefono;
    }
    if let Some(email) = input.email {
        usuario.email = email;
    }
    if let Some(password) = input.password {
        usuario.password = hash_password(&password, state.security.bcrypt_cost)?;
    }
    usuario.id_rol = input.id_rol;

    let stored = repo.replace(filter(), &usuario).await?;
    Ok(ApiResponse::success(UsuarioView::new(stored, Some(rol))))
}

/// DELETE /api/usuarios/:numeroIdentificacion - removes the user and any
/// lawyer, assistant and client record sharing the identity number
pub async fn delete(State(state): State<AppState>, ValidPath(path): ValidPath<UsuarioPath>) -> ApiResult<UsuarioView> {
    let id = path.numero_identificacion.as_str();
    let usuario = state
        .repo::<Usuario>()
        .select_404(FilterData::eq("numeroIdentificacion", id))
        .await?;

    let abogado = state.repo::<Abogado>().delete(FilterData::eq("numeroIdentificacion", id)).await?;
    let asistente = state.repo::<Asistente>().delete(FilterData::eq("numeroIdentificacion", id)).await?;
    let cliente = state.repo::<Cliente>().delete(FilterData::eq("numeroIdentificacion", id)).await?;
    state.repo::<Usuario>().delete(FilterData::eq("numeroIdentificacion", id)).await?;

    tracing::info!(
        "Deleted user {} (abogado: {}, asistente: {}, cliente: {})",
        id,
        abogado,
        asistente,
        cliente
    );
    let rol = rol_nombre(&state, usuario.id_rol).await?;
    Ok(ApiResponse::success(UsuarioView::new(usuario, rol)))
}
