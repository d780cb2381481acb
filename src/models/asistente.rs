use serde::{Deserialize, Serialize};

use super::Timestamps;
use crate::database::{Collection, Document};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asistente {
    #[serde(rename = "numeroIdentificacion")]
    pub numero_identificacion: String,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Document for Asistente {
    const COLLECTION: Collection = Collection::Asistentes;
    const LABEL: &'static str = "Assistant";
}
