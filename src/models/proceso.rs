use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Estado, Timestamps};
use crate::database::{Collection, Document};

pub type EstadoProceso = Estado;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proceso {
    pub id_proceso: i64,
    pub descripcion: String,
    pub fecha_inicio: DateTime<Utc>,
    pub estado: EstadoProceso,
    #[serde(rename = "numeroIdentificacionCliente")]
    pub numero_identificacion_cliente: String,
    #[serde(rename = "numeroIdentificacionAbogado")]
    pub numero_identificacion_abogado: String,
    pub id_tipo: i64,
    #[serde(default)]
    pub id_subproceso: Option<i64>,
    #[serde(default)]
    pub id_docesp: Option<i64>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Document for Proceso {
    const COLLECTION: Collection = Collection::Procesos;
    const LABEL: &'static str = "Process";
}

/// Short process summary embedded in invoice, agenda and task details.
#[derive(Debug, Clone, Serialize)]
pub struct ProcesoResumen {
    pub id_proceso: i64,
    pub descripcion: String,
    pub fecha_inicio: DateTime<Utc>,
    pub estado: EstadoProceso,
}

impl From<&Proceso> for ProcesoResumen {
    fn from(proceso: &Proceso) -> Self {
        Self {
            id_proceso: proceso.id_proceso,
            descripcion: proceso.descripcion.clone(),
            fecha_inicio: proceso.fecha_inicio,
            estado: proceso.estado,
        }
    }
}
