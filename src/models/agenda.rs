use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Timestamps;
use crate::database::{Collection, Document};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstadoAgenda {
    Programada,
    Cancelada,
}

impl EstadoAgenda {
    pub const NAMES: &'static [&'static str] = &["programada", "cancelada"];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agenda {
    pub id_agenda: i64,
    pub fecha: DateTime<Utc>,
    pub hora: String,
    pub descripcion: String,
    pub estado: EstadoAgenda,
    pub id_proceso: i64,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Document for Agenda {
    const COLLECTION: Collection = Collection::Agendas;
    const LABEL: &'static str = "Agenda";
}
