// handlers/subprocesos.rs - /api/subprocesos handlers

use axum::extract::State;
use serde::Deserialize;
use serde_json::json;

use crate::app::AppState;
use crate::error::ApiError;
use crate::filter::FilterData;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{SubProceso, Timestamps, TipoProceso};
use crate::validation::{Field, Rule, Schema, ValidJson, ValidPath, Validated};

#[derive(Debug, Deserialize)]
pub struct SubProcesoPath {
    pub id_subproceso: i64,
}

impl Validated for SubProcesoPath {
    const SCHEMA: &'static Schema = &Schema::new(&[Field::required("id_subproceso", Rule::Number)]);
}

#[derive(Debug, Deserialize)]
pub struct TipoPath {
    pub id_tipo: i64,
}

impl Validated for TipoPath {
    const SCHEMA: &'static Schema = &Schema::new(&[Field::required("id_tipo", Rule::Number)]);
}

#[derive(Debug, Deserialize)]
pub struct CreateSubProceso {
    pub id_subproceso: i64,
    pub id_tipo: i64,
    pub nombre: String,
}

impl Validated for CreateSubProceso {
    const SCHEMA: &'static Schema = &Schema::new(&[
        Field::required("id_subproceso", Rule::Number),
        Field::required("id_tipo", Rule::Number),
        Field::required("nombre", Rule::STRING),
    ]);
}

/// POST /api/subprocesos - the process type must exist; names are unique per type
pub async fn create(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreateSubProceso>,
) -> ApiResult<SubProceso> {
    if !state.repo::<TipoProceso>().exists(FilterData::eq("id_tipo", input.id_tipo)).await? {
        return Err(ApiError::invalid_reference("Process type not found"));
    }

    let repo = state.repo::<SubProceso>();
    let same_name = FilterData::where_clause(json!({ "id_tipo": input.id_tipo, "nombre": input.nombre }));
    if repo.exists(same_name).await? {
        return Err(ApiError::duplicate("This sub-process already exists for the process type"));
    }
    if repo.exists(FilterData::eq("id_subproceso", input.id_subproceso)).await? {
        return Err(ApiError::duplicate("A sub-process with this id already exists"));
    }

    let subproceso = SubProceso {
        id_subproceso: input.id_subproceso,
        id_tipo: input.id_tipo,
        nombre: input.nombre,
        timestamps: Timestamps::default(),
    };
    Ok(ApiResponse::created(repo.insert(&subproceso).await?))
}

/// GET /api/subprocesos
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<SubProceso>> {
    let subprocesos = state
        .repo::<SubProceso>()
        .select_any(FilterData::all().order_by("id_subproceso"))
        .await?;
    Ok(ApiResponse::success(subprocesos))
}

/// GET /api/subprocesos/tipo/:id_tipo
pub async fn list_by_tipo(State(state): State<AppState>, ValidPath(path): ValidPath<TipoPath>) -> ApiResult<Vec<SubProceso>> {
    let subprocesos = state
        .repo::<SubProceso>()
        .select_any(FilterData::eq("id_tipo", path.id_tipo).order_by("id_subproceso"))
        .await?;
    Ok(ApiResponse::success(subprocesos))
}

/// GET /api/subprocesos/:id_subproceso
pub async fn get(State(state): State<AppState>, ValidPath(path): ValidPath<SubProcesoPath>) -> ApiResult<SubProceso> {
    let subproceso = state
        .repo::<SubProceso>()
        .select_404(FilterData::eq("id_subproceso", path.id_subproceso))
        .await?;
    Ok(ApiResponse::success(subproceso))
}

/// DELETE /api/subprocesos/:id_subproceso
pub async fn delete(State(state): State<AppState>, ValidPath(path): ValidPath<SubProcesoPath>) -> ApiResult<SubProceso> {
    let repo = state.repo::<SubProceso>();
    let subproceso = repo.select_404(FilterData::eq("id_subproceso", path.id_subproceso)).await?;
    repo.delete(FilterData::eq("id_subproceso", path.id_subproceso)).await?;
    Ok(ApiResponse::success(subproceso))
}
