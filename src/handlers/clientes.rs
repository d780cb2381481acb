// handlers/clientes.rs - /api/clientes handlers

use axum::extract::State;
use serde::{Deserialize, Serialize};

use super::{assign_truthy, usuario_nombre, usuarios_by_identity};
use crate::app::AppState;
use crate::error::ApiError;
use crate::filter::FilterData;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Cliente, Estado, EstadoCliente, Timestamps, Usuario, UsuarioNombre};
use crate::validation::{DefaultValue, Field, Rule, Schema, ValidJson, ValidPath, Validated};

#[derive(Debug, Serialize)]
pub struct ClienteView {
    #[serde(flatten)]
    pub cliente: Cliente,
    pub usuario: Option<UsuarioNombre>,
}

#[derive(Debug, Deserialize)]
pub struct ClientePath {
    #[serde(rename = "numeroIdentificacion")]
    pub numero_identificacion: String,
}

impl Validated for ClientePath {
    const SCHEMA: &'static Schema = &Schema::new(&[Field::required("numeroIdentificacion", Rule::STRING)]);
}

#[derive(Debug, Deserialize)]
pub struct CreateCliente {
    #[serde(rename = "numeroIdentificacion")]
    pub numero_identificacion: String,
    pub direccion: String,
    pub estado: Estado,
    pub estado_cliente: EstadoCliente,
}

impl Validated for CreateCliente {
    const SCHEMA: &'static Schema = &Schema::new(&[
        Field::required("numeroIdentificacion", Rule::IDENTITY),
        Field::required("direccion", Rule::STRING),
        Field::optional("estado", Rule::OneOf(Estado::NAMES)).or(DefaultValue::Str("activo")),
        Field::optional("estado_cliente", Rule::OneOf(EstadoCliente::NAMES)).or(DefaultValue::Str("potencial")),
    ]);
}

#[derive(Debug, Deserialize)]
pub struct UpdateCliente {
    pub direccion: Option<String>,
    pub estado: Option<Estado>,
    pub estado_cliente: Option<EstadoCliente>,
}

impl Validated for UpdateCliente {
    const SCHEMA: &'static Schema = &Schema::new(&[
        Field::optional("numeroIdentificacion", Rule::IDENTITY),
        Field::optional("direccion", Rule::STRING),
        Field::optional("estado", Rule::OneOf(Estado::NAMES)),
        Field::optional("estado_cliente", Rule::OneOf(EstadoCliente::NAMES)),
    ]);
}

/// POST /api/clientes - the user must already exist
pub async fn create(State(state): State<AppState>, ValidJson(input): ValidJson<CreateCliente>) -> ApiResult<Cliente> {
    let id = input.numero_identificacion.as_str();
    if !state.repo::<Usuario>().exists(FilterData::eq("numeroIdentificacion", id)).await? {
        return Err(ApiError::reference_not_found("No user with this identity number"));
    }

    let repo = state.repo::<Cliente>();
    if repo.exists(FilterData::eq("numeroIdentificacion", id)).await? {
        return Err(ApiError::duplicate("This user is already registered as a client"));
    }

    let cliente = Cliente {
        numero_identificacion: input.numero_identificacion,
        direccion: input.direccion,
        estado: input.estado,
        estado_cliente: input.estado_cliente,
        timestamps: Timestamps::default(),
    };
    Ok(ApiResponse::created(repo.insert(&cliente).await?))
}

/// GET /api/clientes
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<ClienteView>> {
    let clientes = state.repo::<Cliente>().select_any(FilterData::all()).await?;
    let usuarios = usuarios_by_identity(&state, clientes.iter().map(|c| &c.numero_identificacion)).await?;

    let views = clientes
        .into_iter()
        .map(|cliente| ClienteView {
            usuario: usuarios.get(&cliente.numero_identificacion).map(UsuarioNombre::from),
            cliente,
        })
        .collect();
    Ok(ApiResponse::success(views))
}

/// GET /api/clientes/:numeroIdentificacion
pub async fn get(State(state): State<AppState>, ValidPath(path): ValidPath<ClientePath>) -> ApiResult<ClienteView> {
    let cliente = state
        .repo::<Cliente>()
        .select_404(FilterData::eq("numeroIdentificacion", path.numero_identificacion.as_str()))
        .await?;
    let usuario = usuario_nombre(&state, &cliente.numero_identificacion).await?;
    Ok(ApiResponse::success(ClienteView { cliente, usuario }))
}

/// PUT /api/clientes/:numeroIdentificacion
pub async fn update(
    State(state): State<AppState>,
    ValidPath(path): ValidPath<ClientePath>,
    ValidJson(input): ValidJson<UpdateCliente>,
) -> ApiResult<Cliente> {
    let repo = state.repo::<Cliente>();
    let filter = || FilterData::eq("numeroIdentificacion", path.numero_identificacion.as_str());
    let mut cliente = repo.select_404(filter()).await?;

    assign_truthy(&mut cliente.direccion, input.direccion);
    assign_truthy(&mut cliente.estado, input.estado);
    assign_truthy(&mut cliente.estado_cliente, input.estado_cliente);

    Ok(ApiResponse::success(repo.replace(filter(), &cliente).await?))
}
