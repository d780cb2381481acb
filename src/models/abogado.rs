use serde::{Deserialize, Serialize};

use super::Timestamps;
use crate::database::{Collection, Document};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Abogado {
    #[serde(rename = "numeroIdentificacion")]
    pub numero_identificacion: String,
    pub especialidad: String,
    pub area_juridica: String,
    pub experiencia: String,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Document for Abogado {
    const COLLECTION: Collection = Collection::Abogados;
    const LABEL: &'static str = "Lawyer";
}
