// handlers/procesoabogados.rs - /api/procesoabogados handlers

use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::procesos::Contacto;
use super::{assign_truthy, param, query_filter};
use crate::app::AppState;
use crate::error::ApiError;
use crate::filter::FilterData;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Proceso, ProcesoAbogado, Timestamps, Usuario};
use crate::validation::{Field, Rule, Schema, ValidJson, ValidPath, ValidQuery, Validated};

#[derive(Debug, Serialize)]
pub struct ProcesoAbogadoDetalle {
    pub relacion: ProcesoAbogado,
    pub proceso: Option<Proceso>,
    pub abogado: Option<Contacto>,
}

#[derive(Debug, Deserialize)]
pub struct ProcesoAbogadoPath {
    pub id_procesoabogado: i64,
}

impl Validated for ProcesoAbogadoPath {
    const SCHEMA: &'static Schema = &Schema::new(&[Field::required("id_procesoabogado", Rule::Number)]);
}

#[derive(Debug, Deserialize)]
pub struct ProcesoAbogadosQuery {
    pub id_proceso: Option<i64>,
}

impl Validated for ProcesoAbogadosQuery {
    const SCHEMA: &'static Schema = &Schema::new(&[Field::optional("id_proceso", Rule::Number)]).allow_unknown();
}

#[derive(Debug, Deserialize)]
pub struct CreateProcesoAbogado {
    pub id_procesoabogado: i64,
    #[serde(rename = "numeroIdentificacion")]
    pub numero_identificacion: String,
    pub id_proceso: i64,
}

impl Validated for CreateProcesoAbogado {
    const SCHEMA: &'static Schema = &Schema::new(&[
        Field::required("id_procesoabogado", Rule::Number),
        Field::required("numeroIdentificacion", Rule::IdentityNumber),
        Field::required("id_proceso", Rule::Number),
    ]);
}

#[derive(Debug, Deserialize)]
pub struct UpdateProcesoAbogado {
    #[serde(rename = "numeroIdentificacion")]
    pub numero_identificacion: Option<String>,
    pub id_proceso: Option<i64>,
}

impl Validated for UpdateProcesoAbogado {
    const SCHEMA: &'static Schema = &Schema::new(&[
        Field::optional("id_procesoabogado", Rule::Number),
        Field::optional("numeroIdentificacion", Rule::IdentityNumber),
        Field::optional("id_proceso", Rule::Number),
    ]);
}

/// POST /api/procesoabogados - links an extra lawyer to a process
pub async fn create(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreateProcesoAbogado>,
) -> ApiResult<ProcesoAbogado> {
    if !state.repo::<Proceso>().exists(FilterData::eq("id_proceso", input.id_proceso)).await? {
        return Err(ApiError::reference_not_found("Process not found"));
    }
    let usuario = FilterData::eq("numeroIdentificacion", input.numero_identificacion.as_str());
    if !state.repo::<Usuario>().exists(usuario).await? {
        return Err(ApiError::reference_not_found("Lawyer not found"));
    }

    let repo = state.repo::<ProcesoAbogado>();
    let pair = FilterData::where_clause(json!({
        "numeroIdentificacion": input.numero_identificacion,
        "id_proceso": input.id_proceso,
    }));
    if repo.exists(pair).await? {
        return Err(ApiError::duplicate("This lawyer is already linked to the process"));
    }
    if repo.exists(FilterData::eq("id_procesoabogado", input.id_procesoabogado)).await? {
        return Err(ApiError::duplicate("A lawyer-process link with this id already exists"));
    }

    let relacion = ProcesoAbogado {
        id_procesoabogado: input.id_procesoabogado,
        numero_identificacion: input.numero_identificacion,
        id_proceso: input.id_proceso,
        timestamps: Timestamps::default(),
    };
    Ok(ApiResponse::created(repo.insert(&relacion).await?))
}

/// GET /api/procesoabogados?id_proceso
pub async fn list(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<ProcesoAbogadosQuery>,
) -> ApiResult<Vec<ProcesoAbogado>> {
    let filter = query_filter(vec![("id_proceso", param(query.id_proceso))]);
    let relaciones = state
        .repo::<ProcesoAbogado>()
        .select_any(filter.order_by("id_procesoabogado"))
        .await?;
    Ok(ApiResponse::success(relaciones))
}

/// GET /api/procesoabogados/:id_procesoabogado
pub async fn get(
    State(state): State<AppState>,
    ValidPath(path): ValidPath<ProcesoAbogadoPath>,
) -> ApiResult<ProcesoAbogadoDetalle> {
    let relacion = state
        .repo::<ProcesoAbogado>()
        .select_404(FilterData::eq("id_procesoabogado", path.id_procesoabogado))
        .await?;

    let proceso = state
        .repo::<Proceso>()
        .select_one(FilterData::eq("id_proceso", relacion.id_proceso))
        .await?;
    let abogado = state
        .repo::<Usuario>()
        .select_one(FilterData::eq("numeroIdentificacion", relacion.numero_identificacion.as_str()))
        .await?;

    Ok(ApiResponse::success(ProcesoAbogadoDetalle {
        relacion,
        proceso,
        abogado: abogado.as_ref().map(Contacto::from),
    }))
}

/// PUT /api/procesoabogados/:id_procesoabogado
pub async fn update(
    State(state): State<AppState>,
    ValidPath(path): ValidPath<ProcesoAbogadoPath>,
    ValidJson(input): ValidJson<UpdateProcesoAbogado>,
) -> ApiResult<ProcesoAbogado> {
    let repo = state.repo::<ProcesoAbogado>();
    let filter = || FilterData::eq("id_procesoabogado", path.id_procesoabogado);
    let mut relacion = repo.select_404(filter()).await?;

    assign_truthy(&mut relacion.numero_identificacion, input.numero_identificacion);
    assign_truthy(&mut relacion.id_proceso, input.id_proceso);

    Ok(ApiResponse::success(repo.replace(filter(), &relacion).await?))
}

/// DELETE /api/procesoabogados/:id_procesoabogado
pub async fn delete(
    State(state): State<AppState>,
    ValidPath(path): ValidPath<ProcesoAbogadoPath>,
) -> ApiResult<ProcesoAbogado> {
    let repo = state.repo::<ProcesoAbogado>();
    let relacion = repo.select_404(FilterData::eq("id_procesoabogado", path.id_procesoabogado)).await?;
    repo.delete(FilterData::eq("id_procesoabogado", path.id_procesoabogado)).await?;
    Ok(ApiResponse::success(relacion))
}
