// handlers/agendas.rs - /api/agendas handlers
//
// New agendas take `max(id_agenda) + 1`. The read and the insert are separate
// store calls, so two concurrent creates can compute the same id; the unique
// index on `id_agenda` then rejects the second insert with a 500.

use std::collections::{BTreeSet, HashMap};

use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{assign_truthy, param, query_filter};
use crate::app::AppState;
use crate::error::ApiError;
use crate::filter::FilterData;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Agenda, EstadoAgenda, Proceso, ProcesoResumen, Timestamps};
use crate::validation::{Field, Rule, Schema, ValidJson, ValidPath, ValidQuery, Validated};

/// An agenda entry with the description and parties of its process.
#[derive(Debug, Serialize)]
pub struct AgendaView {
    #[serde(flatten)]
    pub agenda: Agenda,
    #[serde(rename = "procesoDescripcion")]
    pub proceso_descripcion: Option<String>,
    #[serde(rename = "numeroIdentificacionCliente")]
    pub numero_identificacion_cliente: Option<String>,
    #[serde(rename = "numeroIdentificacionAbogado")]
    pub numero_identificacion_abogado: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AgendaDetalle {
    pub agenda: Agenda,
    pub proceso: ProcesoResumen,
}

#[derive(Debug, Deserialize)]
pub struct AgendaPath {
    pub id_agenda: i64,
}

impl Validated for AgendaPath {
    const SCHEMA: &'static Schema = &Schema::new(&[Field::required("id_agenda", Rule::Number)]);
}

#[derive(Debug, Deserialize)]
pub struct AbogadoPath {
    #[serde(rename = "numeroIdentificacionAbogado")]
    pub numero_identificacion_abogado: String,
}

impl Validated for AbogadoPath {
    const SCHEMA: &'static Schema =
        &Schema::new(&[Field::required("numeroIdentificacionAbogado", Rule::STRING)]);
}

#[derive(Debug, Deserialize)]
pub struct AgendasQuery {
    pub estado: Option<EstadoAgenda>,
    pub id_proceso: Option<i64>,
}

impl Validated for AgendasQuery {
    const SCHEMA: &'static Schema = &Schema::new(&[
        Field::optional("estado", Rule::OneOf(EstadoAgenda::NAMES)),
        Field::optional("id_proceso", Rule::Number),
    ])
    .allow_unknown();
}

#[derive(Debug, Deserialize)]
pub struct CreateAgenda {
    pub fecha: DateTime<Utc>,
    pub hora: String,
    pub descripcion: String,
    pub estado: EstadoAgenda,
    pub id_proceso: i64,
}

impl Validated for CreateAgenda {
    const SCHEMA: &'static Schema = &Schema::new(&[
        Field::required("fecha", Rule::Date),
        Field::required("hora", Rule::TIME),
        Field::required("descripcion", Rule::min(3)),
        Field::required("estado", Rule::OneOf(EstadoAgenda::NAMES)),
        Field::required("id_proceso", Rule::Number),
    ]);
}

#[derive(Debug, Deserialize)]
pub struct UpdateAgenda {
    pub fecha: Option<DateTime<Utc>>,
    pub hora: Option<String>,
    pub descripcion: Option<String>,
    pub estado: Option<EstadoAgenda>,
    pub id_proceso: Option<i64>,
}

impl Validated for UpdateAgenda {
    const SCHEMA: &'static Schema = &Schema::new(&[
        Field::optional("fecha", Rule::Date),
        Field::optional("hora", Rule::STRING),
        Field::optional("descripcion", Rule::STRING),
        Field::optional("estado", Rule::OneOf(EstadoAgenda::NAMES)),
        Field::optional("id_proceso", Rule::Number),
    ]);
}

/// Decorates agendas with their process, loading all processes in one query.
async fn with_proceso(state: &AppState, agendas: Vec<Agenda>) -> ApiResult<Vec<AgendaView>> {
    let ids: Vec<Value> = agendas
        .iter()
        .map(|a| a.id_proceso)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(Value::from)
        .collect();
    let procesos: HashMap<i64, Proceso> = state
        .repo::<Proceso>()
        .select_in("id_proceso", ids)
        .await?
        .into_iter()
        .map(|p| (p.id_proceso, p))
        .collect();

    let views = agendas
        .into_iter()
        .map(|agenda| {
            let proceso = procesos.get(&agenda.id_proceso);
            AgendaView {
                proceso_descripcion: proceso.map(|p| p.descripcion.clone()),
                numero_identificacion_cliente: proceso.map(|p| p.numero_identificacion_cliente.clone()),
                numero_identificacion_abogado: proceso.map(|p| p.numero_identificacion_abogado.clone()),
                agenda,
            }
        })
        .collect();
    Ok(ApiResponse::success(views))
}

/// POST /api/agendas - `id_agenda` is assigned here
pub async fn create(State(state): State<AppState>, ValidJson(input): ValidJson<CreateAgenda>) -> ApiResult<Agenda> {
    state
        .repo::<Proceso>()
        .select_404(FilterData::eq("id_proceso", input.id_proceso))
        .await?;

    let repo = state.repo::<Agenda>();
    let id_agenda = repo.max_key("id_agenda").await?.unwrap_or(0) + 1;
    tracing::debug!("Next agenda id {}", id_agenda);

    let agenda = Agenda {
        id_agenda,
        fecha: input.fecha,
        hora: input.hora,
        descripcion: input.descripcion,
        estado: input.estado,
        id_proceso: input.id_proceso,
        timestamps: Timestamps::default(),
    };
    Ok(ApiResponse::created(repo.insert(&agenda).await?))
}

/// GET /api/agendas?estado&id_proceso
pub async fn list(State(state): State<AppState>, ValidQuery(query): ValidQuery<AgendasQuery>) -> ApiResult<Vec<AgendaView>> {
    let filter = query_filter(vec![("estado", param(query.estado)), ("id_proceso", param(query.id_proceso))]);
    let agendas = state
        .repo::<Agenda>()
        .select_any(filter.order_by("id_agenda"))
        .await?;
    with_proceso(&state, agendas).await
}

/// GET /api/agendas/abogado/:numeroIdentificacionAbogado - agendas of every
/// process the lawyer leads
pub async fn list_by_abogado(
    State(state): State<AppState>,
    ValidPath(path): ValidPath<AbogadoPath>,
) -> ApiResult<Vec<AgendaView>> {
    let abogado = path.numero_identificacion_abogado.trim();
    if abogado.is_empty() {
        return Err(ApiError::invalid_field(
            "numeroIdentificacionAbogado",
            "Lawyer identification number is required",
        ));
    }

    let procesos = state
        .repo::<Proceso>()
        .select_any(FilterData::eq("numeroIdentificacionAbogado", abogado))
        .await?;
    let ids: Vec<Value> = procesos.iter().map(|p| Value::from(p.id_proceso)).collect();

    let agendas = state.repo::<Agenda>().select_in("id_proceso", ids).await?;
    with_proceso(&state, agendas).await
}

/// GET /api/agendas/:id_agenda - an agenda whose process is gone is reported as missing
pub async fn get(State(state): State<AppState>, ValidPath(path): ValidPath<AgendaPath>) -> ApiResult<AgendaDetalle> {
    let agenda = state
        .repo::<Agenda>()
        .select_404(FilterData::eq("id_agenda", path.id_agenda))
        .await?;
    let proceso = state
        .repo::<Proceso>()
        .select_404(FilterData::eq("id_proceso", agenda.id_proceso))
        .await?;

    Ok(ApiResponse::success(AgendaDetalle {
        proceso: ProcesoResumen::from(&proceso),
        agenda,
    }))
}

/// PUT /api/agendas/:id_agenda
pub async fn update(
    State(state): State<AppState>,
    ValidPath(path): ValidPath<AgendaPath>,
    ValidJson(input): ValidJson<UpdateAgenda>,
) -> ApiResult<Agenda> {
    let repo = state.repo::<Agenda>();
    let filter = || FilterData::eq("id_agenda", path.id_agenda);
    let mut agenda = repo.select_404(filter()).await?;

    assign_truthy(&mut agenda.fecha, input.fecha);
    assign_truthy(&mut agenda.hora, input.hora);
    assign_truthy(&mut agenda.descripcion, input.descripcion);
    assign_truthy(&mut agenda.estado, input.estado);
    assign_truthy(&mut agenda.id_proceso, input.id_proceso);

    Ok(ApiResponse::success(repo.replace(filter(), &agenda).await?))
}

/// DELETE /api/agendas/:id_agenda
pub async fn delete(State(state): State<AppState>, ValidPath(path): ValidPath<AgendaPath>) -> ApiResult<Agenda> {
    let repo = state.repo::<Agenda>();
    let agenda = repo.select_404(FilterData::eq("id_agenda", path.id_agenda)).await?;
    repo.delete(FilterData::eq("id_agenda", path.id_agenda)).await?;
    Ok(ApiResponse::success(agenda))
}
