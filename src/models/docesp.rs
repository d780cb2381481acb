use serde::{Deserialize, Serialize};

use super::Timestamps;
use crate::database::{Collection, Document};

/// Special document attached to a sub-process; `nombre` lists the document names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocEsp {
    pub id_docesp: i64,
    pub id_subproceso: i64,
    pub nombre: Vec<String>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Document for DocEsp {
    const COLLECTION: Collection = Collection::DocEsp;
    const LABEL: &'static str = "Special document";
}
