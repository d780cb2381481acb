// handlers/tareas.rs - /api/tareas handlers

use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{param, query_filter, Truthy};
use crate::app::AppState;
use crate::error::ApiError;
use crate::filter::FilterData;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{EstadoTarea, Proceso, ProcesoResumen, Tarea, Timestamps};
use crate::validation::{DefaultValue, Field, Rule, Schema, ValidJson, ValidPath, ValidQuery, Validated};

#[derive(Debug, Serialize)]
pub struct TareaDetalle {
    pub tarea: Tarea,
    pub proceso: Option<ProcesoResumen>,
}

#[derive(Debug, Deserialize)]
pub struct TareaPath {
    pub id_tarea: i64,
}

impl Validated for TareaPath {
    const SCHEMA: &'static Schema = &Schema::new(&[Field::required("id_tarea", Rule::Number)]);
}

#[derive(Debug, Deserialize)]
pub struct TareasQuery {
    pub estado: Option<EstadoTarea>,
    pub id_proceso: Option<i64>,
    pub asignado_a: Option<String>,
}

impl Validated for TareasQuery {
    const SCHEMA: &'static Schema = &Schema::new(&[
        Field::optional("estado", Rule::OneOf(EstadoTarea::NAMES)),
        Field::optional("id_proceso", Rule::Number),
        Field::optional("asignado_a", Rule::STRING),
    ])
    .allow_unknown();
}

#[derive(Debug, Deserialize)]
pub struct CreateTarea {
    pub id_tarea: i64,
    pub titulo: String,
    pub descripcion: String,
    pub fecha: DateTime<Utc>,
    pub hora_inicio: String,
    pub hora_fin: String,
    pub estado: EstadoTarea,
    pub todo_el_dia: bool,
    pub vincular_expediente: bool,
    pub asociar_directorios: bool,
    pub asignado_a: Option<String>,
    pub id_proceso: Option<i64>,
    pub creado_por: String,
}

impl Validated for CreateTarea {
    const SCHEMA: &'static Schema = &Schema::new(&[
        Field::required("id_tarea", Rule::Number),
        Field::required("titulo", Rule::min(3)),
        Field::required("descripcion", Rule::STRING),
        Field::required("fecha", Rule::Date),
        Field::required("hora_inicio", Rule::TIME),
        Field::required("hora_fin", Rule::TIME),
        Field::required("estado", Rule::OneOf(EstadoTarea::NAMES)),
        Field::optional("todo_el_dia", Rule::Bool).or(DefaultValue::Bool(false)),
        Field::optional("vincular_expediente", Rule::Bool).or(DefaultValue::Bool(false)),
        Field::optional("asociar_directorios", Rule::Bool).or(DefaultValue::Bool(false)),
        Field::optional("asignado_a", Rule::STRING),
        Field::optional("id_proceso", Rule::Number),
        Field::optional("creado_por", Rule::STRING).or(DefaultValue::Str("Sistema")),
    ]);
}

/// Every supplied field is applied, including `false`.
#[derive(Debug, Deserialize)]
pub struct UpdateTarea {
    pub titulo: Option<String>,
    pub descripcion: Option<String>,
    pub fecha: Option<DateTime<Utc>>,
    pub hora_inicio: Option<String>,
    pub hora_fin: Option<String>,
    pub estado: Option<EstadoTarea>,
    pub todo_el_dia: Option<bool>,
    pub vincular_expediente: Option<bool>,
    pub asociar_directorios: Option<bool>,
    pub asignado_a: Option<String>,
    pub id_proceso: Option<i64>,
}

impl Validated for UpdateTarea {
    const SCHEMA: &'static Schema = &Schema::new(&[
        Field::optional("titulo", Rule::min(3)),
        Field::optional("descripcion", Rule::STRING),
        Field::optional("fecha", Rule::Date),
        Field::optional("hora_inicio", Rule::TIME),
        Field::optional("hora_fin", Rule::TIME),
        Field::optional("estado", Rule::OneOf(EstadoTarea::NAMES)),
        Field::optional("todo_el_dia", Rule::Bool),
        Field::optional("vincular_expediente", Rule::Bool),
        Field::optional("asociar_directorios", Rule::Bool),
        Field::optional("asignado_a", Rule::STRING),
        Field::optional("id_proceso", Rule::Number),
    ]);
}

/// POST /api/tareas - `creado_por` defaults to "Sistema"
pub async fn create(State(state): State<AppState>, ValidJson(input): ValidJson<CreateTarea>) -> ApiResult<Tarea> {
    let repo = state.repo::<Tarea>();
    if repo.exists(FilterData::eq("id_tarea", input.id_tarea)).await? {
        return Err(ApiError::duplicate("A task with this id already exists"));
    }

    if let Some(id_proceso) = input.id_proceso.filter(Truthy::is_truthy) {
        state
            .repo::<Proceso>()
            .select_404(FilterData::eq("id_proceso", id_proceso))
            .await?;
    }

    let tarea = Tarea {
        id_tarea: input.id_tarea,
        titulo: input.titulo,
        descripcion: input.descripcion,
        fecha: input.fecha,
        hora_inicio: input.hora_inicio,
        hora_fin: input.hora_fin,
        estado: input.estado,
        todo_el_dia: input.todo_el_dia,
        vincular_expediente: input.vincular_expediente,
        asociar_directorios: input.asociar_directorios,
        asignado_a: input.asignado_a,
        id_proceso: input.id_proceso,
        creado_por: input.creado_por,
        timestamps: Timestamps::default(),
    };
    Ok(ApiResponse::created(repo.insert(&tarea).await?))
}

/// GET /api/tareas?estado&id_proceso&asignado_a - ordered by date, then start time
pub async fn list(State(state): State<AppState>, ValidQuery(query): ValidQuery<TareasQuery>) -> ApiResult<Vec<Tarea>> {
    let filter = query_filter(vec![
        ("estado", param(query.estado)),
        ("id_proceso", param(query.id_proceso)),
        ("asignado_a", param(query.asignado_a)),
    ]);
    let tareas = state
        .repo::<Tarea>()
        .select_any(filter.order_by("fecha asc, hora_inicio asc"))
        .await?;
    Ok(ApiResponse::success(tareas))
}

/// GET /api/tareas/:id_tarea - `proceso` is null when unlinked or gone
pub async fn get(State(state): State<AppState>, ValidPath(path): ValidPath<TareaPath>) -> ApiResult<TareaDetalle> {
    let tarea = state
        .repo::<Tarea>()
        .select_404(FilterData::eq("id_tarea", path.id_tarea))
        .await?;

    let proceso = match tarea.id_proceso {
        Some(id) => state
            .repo::<Proceso>()
            .select_one(FilterData::eq("id_proceso", id))
            .await?
            .as_ref()
            .map(ProcesoResumen::from),
        None => None,
    };

    Ok(ApiResponse::success(TareaDetalle { tarea, proceso }))
}

/// PUT /api/tareas/:id_tarea
pub async fn update(
    State(state): State<AppState>,
    ValidPath(path): ValidPath<TareaPath>,
    ValidJson(input): ValidJson<UpdateTarea>,
) -> ApiResult<Tarea> {
    let repo = state.repo::<Tarea>();
    let filter = || FilterData::eq("id_tarea", path.id_tarea);
    let mut tarea = repo.select_404(filter()).await?;

    if let Some(titulo) = input.titulo {
        tarea.titulo = titulo;
    }
    if let Some(descripcion) = input.descripcion {
        tarea.descripcion = descripcion;
    }
    if let Some(fecha) = input.fecha {
        tarea.fecha = fecha;
    }
    if let Some(hora_inicio) = input.hora_inicio {
        tarea.hora_inicio = hora_inicio;
    }
    if let Some(hora_fin) = input.hora_fin {
        tarea.hora_fin = hora_fin;
    }
    if let Some(estado) = input.estado {
        tarea.estado = estado;
    }
    if let Some(todo_el_dia) = input.todo_el_dia {
        tarea.todo_el_dia = todo_el_dia;
    }
    if let Some(vincular_expediente) = input.vincular_expediente {
        tarea.vincular_expediente = vincular_expediente;
    }
    if let Some(asociar_directorios) = input.asociar_directorios {
        tarea.asociar_directorios = asociar_directorios;
    }
    if input.asignado_a.is_some() {
        tarea.asignado_a = input.asignado_a;
    }
    if input.id_proceso.is_some() {
        tarea.id_proceso = input.id_proceso;
    }

    Ok(ApiResponse::success(repo.replace(filter(), &tarea).await?))
}

/// DELETE /api/tareas/:id_tarea
pub async fn delete(State(state): State<AppState>, ValidPath(path): ValidPath<TareaPath>) -> ApiResult<Tarea> {
    let repo = state.repo::<Tarea>();
    let tarea = repo.select_404(FilterData::eq("id_tarea", path.id_tarea)).await?;
    repo.delete(FilterData::eq("id_tarea", path.id_tarea)).await?;
    Ok(ApiResponse::success(tarea))
}
