// handlers/procesos.rs - /api/procesos handlers
//
// Lists and details decorate each process with the names of its type,
// sub-process and special document. Names are resolved with one `$in`
// query per referenced collection; a dangling reference yields `null`.

use std::collections::{BTreeSet, HashMap};

use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{param, query_filter, usuarios_by_identity};
use crate::app::AppState;
use crate::error::ApiError;
use crate::filter::FilterData;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{
    Abogado, Cliente, DocEsp, EstadoProceso, NombreTipo, Proceso, SubProceso, Timestamps, TipoProceso, Usuario,
};
use crate::validation::{Field, Rule, Schema, ValidJson, ValidPath, ValidQuery, Validated};

/// A process with the names of its classification.
#[derive(Debug, Serialize)]
pub struct ProcesoConNombres {
    #[serde(flatten)]
    pub proceso: Proceso,
    pub tipo: Option<NombreTipo>,
    pub subproceso: Option<String>,
    pub documento: Option<Vec<String>>,
}

/// Contact card of the client or lawyer behind a process.
#[derive(Debug, Serialize)]
pub struct Contacto {
    #[serde(rename = "numeroIdentificacion")]
    pub numero_identificacion: String,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub telefono: String,
}

impl From<&Usuario> for Contacto {
    fn from(usuario: &Usuario) -> Self {
        Self {
            numero_identificacion: usuario.numero_identificacion.clone(),
            nombre: usuario.nombres.clone(),
            apellido: usuario.apellidos.clone(),
            email: usuario.email.clone(),
            telefono: usuario.telefono.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProcesoDetalle {
    #[serde(flatten)]
    pub proceso: ProcesoConNombres,
    pub cliente: Option<Contacto>,
    pub abogado: Option<Contacto>,
}

#[derive(Debug, Deserialize)]
pub struct ProcesoPath {
    pub id_proceso: i64,
}

impl Validated for ProcesoPath {
    const SCHEMA: &'static Schema = &Schema::new(&[Field::required("id_proceso", Rule::Number)]);
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
pub struct ProcesosQuery {
    pub estado: Option<EstadoProceso>,
    pub id_tipo: Option<i64>,
}

impl Validated for ProcesosQuery {
    const SCHEMA: &'static Schema = &Schema::new(&[
        Field::optional("estado", Rule::OneOf(EstadoProceso::NAMES)),
        Field::optional("id_tipo", Rule::Number),
    ])
    .allow_unknown();
}

#[derive(Debug, Deserialize)]
pub struct CreateProceso {
    pub id_proceso: i64,
    pub descripcion: String,
    pub fecha_inicio: DateTime<Utc>,
    pub estado: EstadoProceso,
    #[serde(rename = "numeroIdentificacionCliente")]
    pub numero_identificacion_cliente: String,
    #[serde(rename = "numeroIdentificacionAbogado")]
    pub numero_identificacion_abogado: String,
    pub id_tipo: i64,
    pub id_subproceso: Option<i64>,
    pub id_docesp: Option<i64>,
}

impl Validated for CreateProceso {
    const SCHEMA: &'static Schema = &Schema::new(&[
        Field::required("id_proceso", Rule::Number),
        Field::required("descripcion", Rule::min(3)),
        Field::required("fecha_inicio", Rule::Date),
        Field::required("estado", Rule::OneOf(EstadoProceso::NAMES)),
        Field::required("numeroIdentificacionCliente", Rule::IDENTITY),
        Field::required("numeroIdentificacionAbogado", Rule::IDENTITY),
        Field::required("id_tipo", Rule::Number),
        Field::optional("id_subproceso", Rule::Number),
        Field::optional("id_docesp", Rule::Number),
    ]);
}

/// Partial update: supplied fields replace, the rest are kept.
#[derive(Debug, Deserialize)]
pub struct UpdateProceso {
    pub descripcion: Option<String>,
    pub fecha_inicio: Option<DateTime<Utc>>,
    pub estado: Option<EstadoProceso>,
    #[serde(rename = "numeroIdentificacionCliente")]
    pub numero_identificacion_cliente: Option<String>,
    #[serde(rename = "numeroIdentificacionAbogado")]
    pub numero_identificacion_abogado: Option<String>,
    pub id_tipo: Option<i64>,
    pub id_subproceso: Option<i64>,
    pub id_docesp: Option<i64>,
}

impl Validated for UpdateProceso {
    const SCHEMA: &'static Schema = &Schema::new(&[
        Field::optional("descripcion", Rule::min(3)),
        Field::optional("fecha_inicio", Rule::Date),
        Field::optional("estado", Rule::OneOf(EstadoProceso::NAMES)),
        Field::optional("numeroIdentificacionCliente", Rule::IDENTITY),
        Field::optional("numeroIdentificacionAbogado", Rule::IDENTITY),
        Field::optional("id_tipo", Rule::Number),
        Field::optional("id_subproceso", Rule::Number),
        Field::optional("id_docesp", Rule::Number),
    ]);
}

/// Client, lawyer, type and the optional sub-process/document must exist.
async fn check_references(state: &AppState, proceso: &Proceso) -> Result<(), ApiError> {
    let cliente = FilterData::eq("numeroIdentificacion", proceso.numero_identificacion_cliente.as_str());
    if !state.repo::<Cliente>().exists(cliente).await? {
        return Err(ApiError::reference_not_found("No client with this identity number"));
    }

    let abogado = FilterData::eq("numeroIdentificacion", proceso.numero_identificacion_abogado.as_str());
    if !state.repo::<Abogado>().exists(abogado).await? {
        return Err(ApiError::reference_not_found("No lawyer with this identity number"));
    }

    if !state.repo::<TipoProceso>().exists(FilterData::eq("id_tipo", proceso.id_tipo)).await? {
        return Err(ApiError::invalid_reference("Process type not found"));
    }

    if let Some(id) = proceso.id_subproceso {
        if !state.repo::<SubProceso>().exists(FilterData::eq("id_subproceso", id)).await? {
            return Err(ApiError::reference_not_found("Sub-process not found"));
        }
    }

    if let Some(id) = proceso.id_docesp {
        if !state.repo::<DocEsp>().exists(FilterData::eq("id_docesp", id)).await? {
            return Err(ApiError::reference_not_found("Special document not found"));
        }
    }

    Ok(())
}

fn distinct<I: Iterator<Item = i64>>(ids: I) -> Vec<Value> {
    ids.collect::<BTreeSet<_>>().into_iter().map(Value::from).collect()
}

/// Attaches type, sub-process and document names in three batched lookups.
pub(crate) async fn with_names(state: &AppState, procesos: Vec<Proceso>) -> Result<Vec<ProcesoConNombres>, ApiError> {
    let tipos: HashMap<i64, NombreTipo> = state
        .repo::<TipoProceso>()
        .select_in("id_tipo", distinct(procesos.iter().map(|p| p.id_tipo)))
        .await?
        .into_iter()
        .map(|t| (t.id_tipo, t.nombre))
        .collect();

    let subprocesos: HashMap<i64, String> = state
        .repo::<SubProceso>()
        .select_in("id_subproceso", distinct(procesos.iter().filter_map(|p| p.id_subproceso)))
        .await?
        .into_iter()
        .map(|s| (s.id_subproceso, s.nombre))
        .collect();

    let documentos: HashMap<i64, Vec<String>> = state
        .repo::<DocEsp>()
        .select_in("id_docesp", distinct(procesos.iter().filter_map(|p| p.id_docesp)))
        .await?
        .into_iter()
        .map(|d| (d.id_docesp, d.nombre))
        .collect();

    Ok(procesos
        .into_iter()
        .map(|proceso| ProcesoConNombres {
            tipo: tipos.get(&proceso.id_tipo).copied(),
            subproceso: proceso.id_subproceso.and_then(|id| subprocesos.get(&id).cloned()),
            documento: proceso.id_docesp.and_then(|id| documentos.get(&id).cloned()),
            proceso,
        })
        .collect())
}

/// POST /api/procesos
pub async fn create(State(state): State<AppState>, ValidJson(input): ValidJson<CreateProceso>) -> ApiResult<Proceso> {
    let proceso = Proceso {
        id_proceso: input.id_proceso,
        descripcion: input.descripcion,
        fecha_inicio: input.fecha_inicio,
        estado: input.estado,
        numero_identificacion_cliente: input.numero_identificacion_cliente,
        numero_identificacion_abogado: input.numero_identificacion_abogado,
        id_tipo: input.id_tipo,
        id_subproceso: input.id_subproceso,
        id_docesp: input.id_docesp,
        timestamps: Timestamps::default(),
    };
    check_references(&state, &proceso).await?;

    let repo = state.repo::<Proceso>();
    if repo.exists(FilterData::eq("id_proceso", proceso.id_proceso)).await? {
        return Err(ApiError::duplicate("A process with this id already exists"));
    }

    let stored = repo.insert(&proceso).await?;
    tracing::info!("Created process {}", stored.id_proceso);
    Ok(ApiResponse::created(stored))
}

/// GET /api/procesos?estado&id_tipo
pub async fn list(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<ProcesosQuery>,
) -> ApiResult<Vec<ProcesoConNombres>> {
    let filter = query_filter(vec![("estado", param(query.estado)), ("id_tipo", param(query.id_tipo))]);
    let procesos = state
        .repo::<Proceso>()
        .select_any(filter.order_by("id_proceso"))
        .await?;
    Ok(ApiResponse::success(with_names(&state, procesos).await?))
}

/// GET /api/procesos/abogado/:numeroIdentificacionAbogado
pub async fn list_by_abogado(
    State(state): State<AppState>,
    ValidPath(path): ValidPath<AbogadoPath>,
) -> ApiResult<Vec<ProcesoConNombres>> {
    let filter = FilterData::eq("numeroIdentificacionAbogado", path.numero_identificacion_abogado.trim());
    let procesos = state
        .repo::<Proceso>()
        .select_any(filter.order_by("id_proceso"))
        .await?;
    Ok(ApiResponse::success(with_names(&state, procesos).await?))
}

/// GET /api/procesos/:id_proceso - names plus client and lawyer contact cards
pub async fn get(State(state): State<AppState>, ValidPath(path): ValidPath<ProcesoPath>) -> ApiResult<ProcesoDetalle> {
    let proceso = state
        .repo::<Proceso>()
        .select_404(FilterData::eq("id_proceso", path.id_proceso))
        .await?;

    let usuarios = usuarios_by_identity(
        &state,
        [&proceso.numero_identificacion_cliente, &proceso.numero_identificacion_abogado],
    )
    .await?;
    let cliente = usuarios.get(&proceso.numero_identificacion_cliente).map(Contacto::from);
    let abogado = usuarios.get(&proceso.numero_identificacion_abogado).map(Contacto::from);

    let proceso = with_names(&state, vec![proceso])
        .await?
        .pop()
        .ok_or_else(|| ApiError::internal_server_error("Process lookup returned no rows"))?;

    Ok(ApiResponse::success(ProcesoDetalle {
        proceso,
        cliente,
        abogado,
    }))
}

/// PUT /api/procesos/:id_proceso
pub async fn update(
    State(state): State<AppState>,
    ValidPath(path): ValidPath<ProcesoPath>,
    ValidJson(input): ValidJson<UpdateProceso>,
) -> ApiResult<Proceso> {
    let repo = state.repo::<Proceso>();
    let mut proceso = repo.select_404(FilterData::eq("id_proceso", path.id_proceso)).await?;

    if let Some(descripcion) = input.descripcion {
        proceso.descripcion = descripcion;
    }
    if let Some(fecha_inicio) = input.fecha_inicio {
        proceso.fecha_inicio = fecha_inicio;
    }
    if let Some(estado) = input.estado {
        proceso.estado = estado;
    }
    if let Some(cliente) = input.numero_identificacion_cliente {
        proceso.numero_identificacion_cliente = cliente;
    }
    if let Some(abogado) = input.numero_identificacion_abogado {
        proceso.numero_identificacion_abogado = abogado;
    }
    if let Some(id_tipo) = input.id_tipo {
        proceso.id_tipo = id_tipo;
    }
    if input.id_subproceso.is_some() {
        proceso.id_subproceso = input.id_subproceso;
    }
    if input.id_docesp.is_some() {
        proceso.id_docesp = input.id_docesp;
    }
    check_references(&state, &proceso).await?;

    let stored = repo.replace(FilterData::eq("id_proceso", path.id_proceso), &proceso).await?;
    Ok(ApiResponse::success(stored))
}

/// DELETE /api/procesos/:id_proceso
pub async fn delete(State(state): State<AppState>, ValidPath(path): ValidPath<ProcesoPath>) -> ApiResult<Proceso> {
    let repo = state.repo::<Proceso>();
    let proceso = repo.select_404(FilterData::eq("id_proceso", path.id_proceso)).await?;
    repo.delete(FilterData::eq("id_proceso", path.id_proceso)).await?;
    tracing::info!("Deleted process {}", proceso.id_proceso);
    Ok(ApiResponse::success(proceso))
}
