use serde::{Deserialize, Serialize};

use super::Timestamps;
use crate::database::{Collection, Document};

/// Additional lawyer assigned to a process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcesoAbogado {
    pub id_procesoabogado: i64,
    #[serde(rename = "numeroIdentificacion")]
    pub numero_identificacion: String,
    pub id_proceso: i64,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Document for ProcesoAbogado {
    const COLLECTION: Collection = Collection::ProcesoAbogados;
    const LABEL: &'static str = "Lawyer-process link";
}
