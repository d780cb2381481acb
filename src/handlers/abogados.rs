// handlers/abogados.rs - /api/abogados handlers

use axum::extract::State;
use serde::{Deserialize, Serialize};

use super::{assign_truthy, usuario_nombre, usuarios_by_identity};
use crate::app::AppState;
use crate::error::ApiError;
use crate::filter::FilterData;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Abogado, Timestamps, Usuario, UsuarioNombre};
use crate::validation::{Field, Rule, Schema, ValidJson, ValidPath, Validated};

/// A lawyer with the names of the user behind it.
#[derive(Debug, Serialize)]
pub struct AbogadoView {
    #[serde(flatten)]
    pub abogado: Abogado,
    pub usuario: Option<UsuarioNombre>,
}

#[derive(Debug, Deserialize)]
pub struct AbogadoPath {
    #[serde(rename = "numeroIdentificacion")]
    pub numero_identificacion: String,
}

impl Validated for AbogadoPath {
    const SCHEMA: &'static Schema = &Schema::new(&[Field::required("numeroIdentificacion", Rule::STRING)]);
}

#[derive(Debug, Deserialize)]
pub struct CreateAbogado {
    #[serde(rename = "numeroIdentificacion")]
    pub numero_identificacion: String,
    pub especialidad: String,
    pub area_juridica: String,
    pub experiencia: String,
}

impl Validated for CreateAbogado {
    const SCHEMA: &'static Schema = &Schema::new(&[
        Field::required("numeroIdentificacion", Rule::IDENTITY),
        Field::required("especialidad", Rule::min(3)),
        Field::required("area_juridica", Rule::min(3)),
        Field::required("experiencia", Rule::min(3)),
    ]);
}

#[derive(Debug, Deserialize)]
pub struct UpdateAbogado {
    pub especialidad: Option<String>,
    pub area_juridica: Option<String>,
    pub experiencia: Option<String>,
}

impl Validated for UpdateAbogado {
    const SCHEMA: &'static Schema = &Schema::new(&[
        Field::optional("numeroIdentificacion", Rule::IDENTITY),
        Field::optional("especialidad", Rule::min(3)),
        Field::optional("area_juridica", Rule::min(3)),
        Field::optional("experiencia", Rule::min(3)),
    ]);
}

/// POST /api/abogados - the user must already exist
pub async fn create(State(state): State<AppState>, ValidJson(input): ValidJson<CreateAbogado>) -> ApiResult<Abogado> {
    let id = input.numero_identificacion.as_str();
    if !state.repo::<Usuario>().exists(FilterData::eq("numeroIdentificacion", id)).await? {
        return Err(ApiError::reference_not_found("No user with this identity number"));
    }

    let repo = state.repo::<Abogado>();
    if repo.exists(FilterData::eq("numeroIdentificacion", id)).await? {
        return Err(ApiError::duplicate("This user is already registered as a lawyer"));
    }

    let abogado = Abogado {
        numero_identificacion: input.numero_identificacion,
        especialidad: input.especialidad,
        area_juridica: input.area_juridica,
        experiencia: input.experiencia,
        timestamps: Timestamps::default(),
    };
    Ok(ApiResponse::created(repo.insert(&abogado).await?))
}

/// GET /api/abogados
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<AbogadoView>> {
    let abogados = state.repo::<Abogado>().select_any(FilterData::all()).await?;
    let usuarios = usuarios_by_identity(&state, abogados.iter().map(|a| &a.numero_identificacion)).await?;

    let views = abogados
        .into_iter()
        .map(|abogado| AbogadoView {
            usuario: usuarios.get(&abogado.numero_identificacion).map(UsuarioNombre::from),
            abogado,
        })
        .collect();
    Ok(ApiResponse::success(views))
}

/// GET /api/abogados/:numeroIdentificacion
pub async fn get(State(state): State<AppState>, ValidPath(path): ValidPath<AbogadoPath>) -> ApiResult<AbogadoView> {
    let abogado = state
        .repo::<Abogado>()
        .select_404(FilterData::eq("numeroIdentificacion", path.numero_identificacion.as_str()))
        .await?;
    let usuario = usuario_nombre(&state, &abogado.numero_identificacion).await?;
    Ok(ApiResponse::success(AbogadoView { abogado, usuario }))
}

/// PUT /api/abogados/:numeroIdentificacion - empty values keep the stored ones
pub async fn update(
    State(state): State<AppState>,
    ValidPath(path): ValidPath<AbogadoPath>,
    ValidJson(input): ValidJson<UpdateAbogado>,
) -> ApiResult<Abogado> {
    let repo = state.repo::<Abogado>();
    let filter = || FilterData::eq("numeroIdentificacion", path.numero_identificacion.as_str());
    let mut abogado = repo.select_404(filter()).await?;

    assign_truthy(&mut abogado.especialidad, input.especialidad);
    assign_truthy(&mut abogado.area_juridica, input.area_juridica);
    assign_truthy(&mut abogado.experiencia, input.experiencia);

    Ok(ApiResponse::success(repo.replace(filter(), &abogado).await?))
}
