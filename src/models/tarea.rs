use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Timestamps;
use crate::database::{Collection, Document};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstadoTarea {
    Pendiente,
    #[serde(rename = "En progreso")]
    EnProgreso,
    Resultado,
    #[serde(rename = "En revisión")]
    EnRevision,
}

impl EstadoTarea {
    pub const NAMES: &'static [&'static str] = &["Pendiente", "En progreso", "Resultado", "En revisión"];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tarea {
    pub id_tarea: i64,
    pub titulo: String,
    pub descripcion: String,
    pub fecha: DateTime<Utc>,
    pub hora_inicio: String,
    pub hora_fin: String,
    pub estado: EstadoTarea,
    #[serde(default)]
    pub todo_el_dia: bool,
    #[serde(default)]
    pub vincular_expediente: bool,
    #[serde(default)]
    pub asociar_directorios: bool,
    #[serde(default)]
    pub asignado_a: Option<String>,
    #[serde(default)]
    pub id_proceso: Option<i64>,
    pub creado_por: String,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Document for Tarea {
    const COLLECTION: Collection = Collection::Tareas;
    const LABEL: &'static str = "Task";
}
