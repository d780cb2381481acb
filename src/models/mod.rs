//! Stored records, one per collection.
//!
//! Wire and storage field names keep the Spanish names existing clients use.

pub mod abogado;
pub mod agenda;
pub mod asistente;
pub mod cliente;
pub mod docesp;
pub mod factura;
pub mod proceso;
pub mod proceso_abogado;
pub mod rol;
pub mod subproceso;
pub mod tarea;
pub mod tipo_proceso;
pub mod usuario;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use abogado::Abogado;
pub use agenda::{Agenda, EstadoAgenda};
pub use asistente::Asistente;
pub use cliente::{Cliente, EstadoCliente};
pub use docesp::DocEsp;
pub use factura::{EstadoFactura, Factura, MetodoPago};
pub use proceso::{EstadoProceso, Proceso, ProcesoResumen};
pub use proceso_abogado::ProcesoAbogado;
pub use rol::Rol;
pub use subproceso::SubProceso;
pub use tarea::{EstadoTarea, Tarea};
pub use tipo_proceso::{NombreTipo, TipoProceso};
pub use usuario::{Usuario, UsuarioView};

/// Record timestamps, stamped by the repository on insert and replace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timestamps {
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Active/inactive flag shared by clients and processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Estado {
    Activo,
    Inactivo,
}

impl Estado {
    pub const NAMES: &'static [&'static str] = &["activo", "inactivo"];
}

/// `{ nombres, apellidos }` of the user behind a lawyer, assistant or client.
#[derive(Debug, Clone, Serialize)]
pub struct UsuarioNombre {
    pub nombres: String,
    pub apellidos: String,
}

impl From<&Usuario> for UsuarioNombre {
    fn from(usuario: &Usuario) -> Self {
        Self {
            nombres: usuario.nombres.clone(),
            apellidos: usuario.apellidos.clone(),
        }
    }
}
