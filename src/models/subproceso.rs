use serde::{Deserialize, Serialize};

use super::Timestamps;
use crate::database::{Collection, Document};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubProceso {
    pub id_subproceso: i64,
    pub id_tipo: i64,
    pub nombre: String,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Document for SubProceso {
    const COLLECTION: Collection = Collection::SubProcesos;
    const LABEL: &'static str = "Sub-process";
}
