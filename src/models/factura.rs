use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Timestamps;
use crate::database::{Collection, Document};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstadoFactura {
    #[serde(rename = "sin cancelar")]
    SinCancelar,
    #[serde(rename = "cancelada")]
    Cancelada,
}

impl EstadoFactura {
    pub const NAMES: &'static [&'static str] = &["sin cancelar", "cancelada"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetodoPago {
    Efectivo,
    Credito,
    Transferencia,
}

impl MetodoPago {
    pub const NAMES: &'static [&'static str] = &["efectivo", "credito", "transferencia"];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Factura {
    pub id_factura: i64,
    pub monto: String,
    pub fecha_emision: DateTime<Utc>,
    pub fecha_vencimiento: DateTime<Utc>,
    pub estado: EstadoFactura,
    pub metodo_pago: MetodoPago,
    pub id_proceso: i64,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Document for Factura {
    const COLLECTION: Collection = Collection::Facturas;
    const LABEL: &'static str = "Invoice";
}
