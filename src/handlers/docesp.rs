// handlers/docesp.rs - /api/docesp handlers

use axum::extract::State;
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::filter::FilterData;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{DocEsp, SubProceso, Timestamps};
use crate::validation::{Field, Rule, Schema, ValidJson, ValidPath, Validated};

#[derive(Debug, Deserialize)]
pub struct DocEspPath {
    pub id_docesp: i64,
}

impl Validated for DocEspPath {
    const SCHEMA: &'static Schema = &Schema::new(&[Field::required("id_docesp", Rule::Number)]);
}

#[derive(Debug, Deserialize)]
pub struct SubProcesoPath {
    pub id_subproceso: i64,
}

impl Validated for SubProcesoPath {
    const SCHEMA: &'static Schema = &Schema::new(&[Field::required("id_subproceso", Rule::Number)]);
}

#[derive(Debug, Deserialize)]
pub struct CreateDocEsp {
    pub id_docesp: i64,
    pub id_subproceso: i64,
    pub nombre: Vec<String>,
}

impl Validated for CreateDocEsp {
    const SCHEMA: &'static Schema = &Schema::new(&[
        Field::required("id_docesp", Rule::Number),
        Field::required("id_subproceso", Rule::Number),
        Field::required("nombre", Rule::StringArray),
    ]);
}

/// POST /api/docesp - the sub-process must exist
pub async fn create(State(state): State<AppState>, ValidJson(input): ValidJson<CreateDocEsp>) -> ApiResult<DocEsp> {
    if !state
        .repo::<SubProceso>()
        .exists(FilterData::eq("id_subproceso", input.id_subproceso))
        .await?
    {
        return Err(ApiError::invalid_reference("Sub-process not found"));
    }

    let repo = state.repo::<DocEsp>();
    if repo.exists(FilterData::eq("id_docesp", input.id_docesp)).await? {
        return Err(ApiError::duplicate("A special document with this id already exists"));
    }

    let docesp = DocEsp {
        id_docesp: input.id_docesp,
        id_subproceso: input.id_subproceso,
        nombre: input.nombre,
        timestamps: Timestamps::default(),
    };
    Ok(ApiResponse::created(repo.insert(&docesp).await?))
}

/// GET /api/docesp
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<DocEsp>> {
    let docs = state
        .repo::<DocEsp>()
        .select_any(FilterData::all().order_by("id_docesp"))
        .await?;
    Ok(ApiResponse::success(docs))
}

/// GET /api/docesp/subproceso/:id_subproceso
pub async fn list_by_subproceso(
    State(state): State<AppState>,
    ValidPath(path): ValidPath<SubProcesoPath>,
) -> ApiResult<Vec<DocEsp>> {
    let docs = state
        .repo::<DocEsp>()
        .select_any(FilterData::eq("id_subproceso", path.id_subproceso).order_by("id_docesp"))
        .await?;
    Ok(ApiResponse::success(docs))
}

/// GET /api/docesp/:id_docesp
pub async fn get(State(state): State<AppState>, ValidPath(path): ValidPath<DocEspPath>) -> ApiResult<DocEsp> {
    let doc = state
        .repo::<DocEsp>()
        .select_404(FilterData::eq("id_docesp", path.id_docesp))
        .await?;
    Ok(ApiResponse::success(doc))
}

/// DELETE /api/docesp/:id_docesp
pub async fn delete(State(state): State<AppState>, ValidPath(path): ValidPath<DocEspPath>) -> ApiResult<DocEsp> {
    let repo = state.repo::<DocEsp>();
    let doc = repo.select_404(FilterData::eq("id_docesp", path.id_docesp)).await?;
    repo.delete(FilterData::eq("id_docesp", path.id_docesp)).await?;
    Ok(ApiResponse::success(doc))
}
