use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::filter::{FilterData, FilterError};

/// Errors raised by a document store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate key in {collection}: {field} already exists")]
    DuplicateKey { collection: &'static str, field: String },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Every collection the API persists, with the natural keys the store enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Usuarios,
    Roles,
    Abogados,
    Asistentes,
    Clientes,
    TipoProcesos,
    SubProcesos,
    DocEsp,
    Procesos,
    ProcesoAbogados,
    Facturas,
    Agendas,
    Tareas,
}

impl Collection {
    pub const ALL: [Collection; 13] = [
        Collection::Usuarios,
        Collection::Roles,
        Collection::Abogados,
        Collection::Asistentes,
        Collection::Clientes,
        Collection::TipoProcesos,
        Collection::SubProcesos,
        Collection::DocEsp,
        Collection::Procesos,
        Collection::ProcesoAbogados,
        Collection::Facturas,
        Collection::Agendas,
        Collection::Tareas,
    ];

    pub fn table_name(&self) -> &'static str {
        match self {
            Collection::Usuarios => "usuarios",
            Collection::Roles => "roles",
            Collection::Abogados => "abogados",
            Collection::Asistentes => "asistentes",
            Collection::Clientes => "clientes",
            Collection::TipoProcesos => "tipoprocesos",
            Collection::SubProcesos => "subprocesos",
            Collection::DocEsp => "docesp",
            Collection::Procesos => "procesos",
            Collection::ProcesoAbogados => "procesoabogados",
            Collection::Facturas => "facturas",
            Collection::Agendas => "agendas",
            Collection::Tareas => "tareas",
        }
    }

    pub fn unique_fields(&self) -> &'static [&'static str] {
        match self {
            Collection::Usuarios => &["numeroIdentificacion", "telefono", "email"],
            Collection::Roles => &["id_rol", "nombre"],
            Collection::Abogados | Collection::Asistentes | Collection::Clientes => &["numeroIdentificacion"],
            Collection::TipoProcesos => &["id_tipo"],
            Collection::SubProcesos => &["id_subproceso"],
            Collection::DocEsp => &["id_docesp"],
            Collection::Procesos => &["id_proceso"],
            Collection::ProcesoAbogados => &["id_procesoabogado"],
            Collection::Facturas => &["id_factura"],
            Collection::Agendas => &["id_agenda"],
            Collection::Tareas => &["id_tarea"],
        }
    }
}

/// Minimal document-store contract the handlers are written against.
///
/// Documents are JSON objects; `replace_one` and `delete_one` act on the
/// first document matching the filter in insertion order. No operation
/// spans more than one call, so check-then-write sequences in handlers are
/// not atomic and the unique natural keys are the only backstop.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: Collection, filter: FilterData) -> Result<Vec<Value>, StoreError>;

    async fn find_one(&self, collection: Collection, filter: FilterData) -> Result<Option<Value>, StoreError>;

    async fn insert(&self, collection: Collection, document: Value) -> Result<(), StoreError>;

    /// Returns false when nothing matched.
    async fn replace_one(&self, collection: Collection, filter: FilterData, document: Value) -> Result<bool, StoreError>;

    /// Returns false when nothing matched.
    async fn delete_one(&self, collection: Collection, filter: FilterData) -> Result<bool, StoreError>;

    /// Largest integer stored under `field`, if any.
    async fn max_i64(&self, collection: Collection, field: &str) -> Result<Option<i64>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
