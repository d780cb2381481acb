// handlers/roles.rs - /api/rols handlers

use axum::extract::State;
use serde::Deserialize;

use crate::app::AppState;
use crate::auth::Role;
use crate::error::ApiError;
use crate::filter::FilterData;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::Rol;
use crate::validation::{Field, Rule, Schema, ValidJson, ValidPath, Validated};

#[derive(Debug, Deserialize)]
pub struct RolPath {
    pub id_rol: i64,
}

impl Validated for RolPath {
    const SCHEMA: &'static Schema = &Schema::new(&[Field::required("id_rol", Rule::Number)]);
}

#[derive(Debug, Deserialize)]
pub struct CreateRol {
    pub id_rol: i64,
    pub nombre: Role,
}

impl Validated for CreateRol {
    const SCHEMA: &'static Schema = &Schema::new(&[
        Field::required("id_rol", Rule::Number),
        Field::required("nombre", Rule::OneOf(Role::NAMES)),
    ]);
}

#[derive(Debug, Deserialize)]
pub struct UpdateRol {
    pub nombre: Role,
}

impl Validated for UpdateRol {
    const SCHEMA: &'static Schema = &Schema::new(&[Field::required("nombre", Rule::OneOf(Role::NAMES))]);
}

/// POST /api/rols
pub async fn create(State(state): State<AppState>, ValidJson(input): ValidJson<CreateRol>) -> ApiResult<Rol> {
    let repo = state.repo::<Rol>();
    if repo.exists(FilterData::eq("id_rol", input.id_rol)).await? {
        return Err(ApiError::duplicate("A role with this id already exists"));
    }
    if repo.exists(FilterData::eq("nombre", input.nombre.as_str())).await? {
        return Err(ApiError::duplicate("A role with this name already exists"));
    }

    let rol = Rol {
        id_rol: input.id_rol,
        nombre: input.nombre,
    };
    Ok(ApiResponse::created(repo.insert(&rol).await?))
}

/// GET /api/rols
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Rol>> {
    let roles = state
        .repo::<Rol>()
        .select_any(FilterData::all().order_by("id_rol"))
        .await?;
    Ok(ApiResponse::success(roles))
}

/// GET /api/rols/:id_rol
pub async fn get(State(state): State<AppState>, ValidPath(path): ValidPath<RolPath>) -> ApiResult<Rol> {
    let rol = state.repo::<Rol>().select_404(FilterData::eq("id_rol", path.id_rol)).await?;
    Ok(ApiResponse::success(rol))
}

/// PUT /api/rols/:id_rol - rename a role
pub async fn update(
    State(state): State<AppState>,
    ValidPath(path): ValidPath<RolPath>,
    ValidJson(input): ValidJson<UpdateRol>,
) -> ApiResult<Rol> {
    let repo = state.repo::<Rol>();
    let mut rol = repo.select_404(FilterData::eq("id_rol", path.id_rol)).await?;
    rol.nombre = input.nombre;
    Ok(ApiResponse::success(repo.replace(FilterData::eq("id_rol", path.id_rol), &rol).await?))
}

/// DELETE /api/rols/:id_rol
pub async fn delete(State(state): State<AppState>, ValidPath(path): ValidPath<RolPath>) -> ApiResult<Rol> {
    let repo = state.repo::<Rol>();
    let rol = repo.select_404(FilterData::eq("id_rol", path.id_rol)).await?;
    repo.delete(FilterData::eq("id_rol", path.id_rol)).await?;
    Ok(ApiResponse::success(rol))
}
