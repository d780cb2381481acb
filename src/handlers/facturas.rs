// handlers/facturas.rs - /api/facturas handlers

use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{assign_truthy, param, query_filter};
use crate::app::AppState;
use crate::error::ApiError;
use crate::filter::FilterData;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{EstadoFactura, Factura, MetodoPago, Proceso, ProcesoResumen, Timestamps};
use crate::validation::{Field, Rule, Schema, ValidJson, ValidPath, ValidQuery, Validated};

#[derive(Debug, Serialize)]
pub struct FacturaDetalle {
    pub factura: Factura,
    pub proceso: ProcesoResumen,
}

#[derive(Debug, Deserialize)]
pub struct FacturaPath {
    pub id_factura: i64,
}

impl Validated for FacturaPath {
    const SCHEMA: &'static Schema = &Schema::new(&[Field::required("id_factura", Rule::Number)]);
}

#[derive(Debug, Deserialize)]
pub struct FacturasQuery {
    pub estado: Option<EstadoFactura>,
    pub id_proceso: Option<i64>,
    pub metodo_pago: Option<MetodoPago>,
}

impl Validated for FacturasQuery {
    const SCHEMA: &'static Schema = &Schema::new(&[
        Field::optional("estado", Rule::OneOf(EstadoFactura::NAMES)),
        Field::optional("id_proceso", Rule::Number),
        Field::optional("metodo_pago", Rule::OneOf(MetodoPago::NAMES)),
    ])
    .allow_unknown();
}

#[derive(Debug, Deserialize)]
pub struct CreateFactura {
    pub id_factura: i64,
    pub monto: String,
    pub fecha_emision: DateTime<Utc>,
    pub fecha_vencimiento: DateTime<Utc>,
    pub estado: EstadoFactura,
    pub metodo_pago: MetodoPago,
    pub id_proceso: i64,
}

impl Validated for CreateFactura {
    const SCHEMA: &'static Schema = &Schema::new(&[
        Field::required("id_factura", Rule::Number),
        Field::required("monto", Rule::STRING),
        Field::required("fecha_emision", Rule::Date),
        Field::required("fecha_vencimiento", Rule::Date),
        Field::required("estado", Rule::OneOf(EstadoFactura::NAMES)),
        Field::required("metodo_pago", Rule::OneOf(MetodoPago::NAMES)),
        Field::required("id_proceso", Rule::Number),
    ]);
}

#[derive(Debug, Deserialize)]
pub struct UpdateFactura {
    pub monto: Option<String>,
    pub fecha_emision: Option<DateTime<Utc>>,
    pub fecha_vencimiento: Option<DateTime<Utc>>,
    pub estado: Option<EstadoFactura>,
    pub metodo_pago: Option<MetodoPago>,
    pub id_proceso: Option<i64>,
}

impl Validated for UpdateFactura {
    const SCHEMA: &'static Schema = &Schema::new(&[
        Field::optional("monto", Rule::STRING),
        Field::optional("fecha_emision", Rule::Date),
        Field::optional("fecha_vencimiento", Rule::Date),
        Field::optional("estado", Rule::OneOf(EstadoFactura::NAMES)),
        Field::optional("metodo_pago", Rule::OneOf(MetodoPago::NAMES)),
        Field::optional("id_proceso", Rule::Number),
    ]);
}

/// POST /api/facturas
pub async fn create(State(state): State<AppState>, ValidJson(input): ValidJson<CreateFactura>) -> ApiResult<Factura> {
    if !state.repo::<Proceso>().exists(FilterData::eq("id_proceso", input.id_proceso)).await? {
        return Err(ApiError::reference_not_found("Process not found"));
    }

    let repo = state.repo::<Factura>();
    if repo.exists(FilterData::eq("id_factura", input.id_factura)).await? {
        return Err(ApiError::duplicate("An invoice with this id already exists"));
    }

    let factura = Factura {
        id_factura: input.id_factura,
        monto: input.monto,
        fecha_emision: input.fecha_emision,
        fecha_vencimiento: input.fecha_vencimiento,
        estado: input.estado,
        metodo_pago: input.metodo_pago,
        id_proceso: input.id_proceso,
        timestamps: Timestamps::default(),
    };
    Ok(ApiResponse::created(repo.insert(&factura).await?))
}

/// GET /api/facturas?estado&id_proceso&metodo_pago
pub async fn list(State(state): State<AppState>, ValidQuery(query): ValidQuery<FacturasQuery>) -> ApiResult<Vec<Factura>> {
    let filter = query_filter(vec![
        ("estado", param(query.estado)),
        ("id_proceso", param(query.id_proceso)),
        ("metodo_pago", param(query.metodo_pago)),
    ]);
    let facturas = state
        .repo::<Factura>()
        .select_any(filter.order_by("id_factura"))
        .await?;
    Ok(ApiResponse::success(facturas))
}

/// GET /api/facturas/:id_factura - an invoice whose process is gone is reported as missing
pub async fn get(State(state): State<AppState>, ValidPath(path): ValidPath<FacturaPath>) -> ApiResult<FacturaDetalle> {
    let factura = state
        .repo::<Factura>()
        .select_404(FilterData::eq("id_factura", path.id_factura))
        .await?;
    let proceso = state
        .repo::<Proceso>()
        .select_404(FilterData::eq("id_proceso", factura.id_proceso))
        .await?;

    Ok(ApiResponse::success(FacturaDetalle {
        proceso: ProcesoResumen::from(&proceso),
        factura,
    }))
}

/// PUT /api/facturas/:id_factura
pub async fn update(
    State(state): State<AppState>,
    ValidPath(path): ValidPath<FacturaPath>,
    ValidJson(input): ValidJson<UpdateFactura>,
) -> ApiResult<Factura> {
    let repo = state.repo::<Factura>();
    let filter = || FilterData::eq("id_factura", path.id_factura);
    let mut factura = repo.select_404(filter()).await?;

    assign_truthy(&mut factura.monto, input.monto);
    assign_truthy(&mut factura.fecha_emision, input.fecha_emision);
    assign_truthy(&mut factura.fecha_vencimiento, input.fecha_vencimiento);
    assign_truthy(&mut factura.estado, input.estado);
    assign_truthy(&mut factura.metodo_pago, input.metodo_pago);
    assign_truthy(&mut factura.id_proceso, input.id_proceso);

    Ok(ApiResponse::success(repo.replace(filter(), &factura).await?))
}

/// DELETE /api/facturas/:id_factura
pub async fn delete(State(state): State<AppState>, ValidPath(path): ValidPath<FacturaPath>) -> ApiResult<Factura> {
    let repo = state.repo::<Factura>();
    let factura = repo.select_404(FilterData::eq("id_factura", path.id_factura)).await?;
    repo.delete(FilterData::eq("id_factura", path.id_factura)).await?;
    Ok(ApiResponse::success(factura))
}
