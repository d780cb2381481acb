use serde::{Deserialize, Serialize};

use super::Timestamps;
use crate::database::{Collection, Document};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NombreTipo {
    Notariales,
    Juzgados,
    #[serde(rename = "Curadurías")]
    Curadurias,
}

impl NombreTipo {
    pub const NAMES: &'static [&'static str] = &["Notariales", "Juzgados", "Curadurías"];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TipoProceso {
    pub id_tipo: i64,
    pub nombre: NombreTipo,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Document for TipoProceso {
    const COLLECTION: Collection = Collection::TipoProcesos;
    const LABEL: &'static str = "Process type";
}
