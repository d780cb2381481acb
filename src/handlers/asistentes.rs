// handlers/asistentes.rs - /api/asistentes handlers

use axum::extract::State;
use serde::{Deserialize, Serialize};

use super::usuario_nombre;
use crate::app::AppState;
use crate::error::ApiError;
use crate::filter::FilterData;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Asistente, Timestamps, Usuario, UsuarioNombre};
use crate::validation::{Field, Rule, Schema, ValidJson, ValidPath, Validated};

#[derive(Debug, Serialize)]
pub struct AsistenteView {
    #[serde(flatten)]
    pub asistente: Asistente,
    pub usuario: Option<UsuarioNombre>,
}

#[derive(Debug, Deserialize)]
pub struct AsistentePath {
    #[serde(rename = "numeroIdentificacion")]
    pub numero_identificacion: String,
}

impl Validated for AsistentePath {
    const SCHEMA: &'static Schema = &Schema::new(&[Field::required("numeroIdentificacion", Rule::STRING)]);
}

#[derive(Debug, Deserialize)]
pub struct CreateAsistente {
    #[serde(rename = "numeroIdentificacion")]
    pub numero_identificacion: String,
}

impl Validated for CreateAsistente {
    const SCHEMA: &'static Schema = &Schema::new(&[Field::required("numeroIdentificacion", Rule::IDENTITY)]);
}

#[derive(Debug, Deserialize)]
pub struct UpdateAsistente {
    #[serde(rename = "nuevoNumeroIdentificacion")]
    pub nuevo_numero_identificacion: Option<String>,
}

impl Validated for UpdateAsistente {
    const SCHEMA: &'static Schema =
        &Schema::new(&[Field::optional("nuevoNumeroIdentificacion", Rule::IDENTITY)]);
}

/// POST /api/asistentes - the user must already exist
pub async fn create(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreateAsistente>,
) -> ApiResult<Asistente> {
    let id = input.numero_identificacion.as_str();
    if !state.repo::<Usuario>().exists(FilterData::eq("numeroIdentificacion", id)).await? {
        return Err(ApiError::reference_not_found("No user with this identity number"));
    }

    let repo = state.repo::<Asistente>();
    if repo.exists(FilterData::eq("numeroIdentificacion", id)).await? {
        return Err(ApiError::duplicate("This user is already registered as an assistant"));
    }

    let asistente = Asistente {
        numero_identificacion: input.numero_identificacion,
        timestamps: Timestamps::default(),
    };
    Ok(ApiResponse::created(repo.insert(&asistente).await?))
}

/// GET /api/asistentes/:numeroIdentificacion
pub async fn get(
    State(state): State<AppState>,
    ValidPath(path): ValidPath<AsistentePath>,
) -> ApiResult<AsistenteView> {
    let asistente = state
        .repo::<Asistente>()
        .select_404(FilterData::eq("numeroIdentificacion", path.numero_identificacion.as_str()))
        .await?;
    let usuario = usuario_nombre(&state, &asistente.numero_identificacion).await?;
    Ok(ApiResponse::success(AsistenteView { asistente, usuario }))
}

/// PUT /api/asistentes/:numeroIdentificacion - moves the record to a new
/// identity number when `nuevoNumeroIdentificacion` is given
pub async fn update(
    State(state): State<AppState>,
    ValidPath(path): ValidPath<AsistentePath>,
    ValidJson(input): ValidJson<UpdateAsistente>,
) -> ApiResult<Asistente> {
    let repo = state.repo::<Asistente>();
    let filter = || FilterData::eq("numeroIdentificacion", path.numero_identificacion.as_str());
    let mut asistente = repo.select_404(filter()).await?;

    if let Some(nuevo) = input.nuevo_numero_identificacion {
        if repo.exists(FilterData::eq("numeroIdentificacion", nuevo.as_str())).await? {
            return Err(ApiError::duplicate(
                "This identity number already belongs to another assistant",
            ));
        }
        asistente.numero_identificacion = nuevo;
    }

    Ok(ApiResponse::success(repo.replace(filter(), &asistente).await?))
}
