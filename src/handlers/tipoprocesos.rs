// handlers/tipoprocesos.rs - /api/tipoprocesos handlers

use axum::extract::State;
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::filter::FilterData;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{NombreTipo, Timestamps, TipoProceso};
use crate::validation::{Field, Rule, Schema, ValidJson, ValidPath, Validated};

#[derive(Debug, Deserialize)]
pub struct TipoPath {
    pub id_tipo: i64,
}

impl Validated for TipoPath {
    const SCHEMA: &'static Schema = &Schema::new(&[Field::required("id_tipo", Rule::Number)]);
}

#[derive(Debug, Deserialize)]
pub struct CreateTipoProceso {
    pub id_tipo: i64,
    pub nombre: NombreTipo,
}

impl Validated for CreateTipoProceso {
    const SCHEMA: &'static Schema = &Schema::new(&[
        Field::required("id_tipo", Rule::Number),
        Field::required("nombre", Rule::OneOf(NombreTipo::NAMES)),
    ]);
}

/// POST /api/tipoprocesos
pub async fn create(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreateTipoProceso>,
) -> ApiResult<TipoProceso> {
    let repo = state.repo::<TipoProceso>();
    if repo.exists(FilterData::eq("id_tipo", input.id_tipo)).await? {
        return Err(ApiError::duplicate("A process type with this id already exists"));
    }

    let tipo = TipoProceso {
        id_tipo: input.id_tipo,
        nombre: input.nombre,
        timestamps: Timestamps::default(),
    };
    Ok(ApiResponse::created(repo.insert(&tipo).await?))
}

/// GET /api/tipoprocesos
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<TipoProceso>> {
    let tipos = state
        .repo::<TipoProceso>()
        .select_any(FilterData::all().order_by("id_tipo"))
        .await?;
    Ok(ApiResponse::success(tipos))
}

/// GET /api/tipoprocesos/:id_tipo
pub async fn get(State(state): State<AppState>, ValidPath(path): ValidPath<TipoPath>) -> ApiResult<TipoProceso> {
    let tipo = state
        .repo::<TipoProceso>()
        .select_404(FilterData::eq("id_tipo", path.id_tipo))
        .await?;
    Ok(ApiResponse::success(tipo))
}

/// DELETE /api/tipoprocesos/:id_tipo
pub async fn delete(State(state): State<AppState>, ValidPath(path): ValidPath<TipoPath>) -> ApiResult<TipoProceso> {
    let repo = state.repo::<TipoProceso>();
    let tipo = repo.select_404(FilterData::eq("id_tipo", path.id_tipo)).await?;
    repo.delete(FilterData::eq("id_tipo", path.id_tipo)).await?;
    Ok(ApiResponse::success(tipo))
}
