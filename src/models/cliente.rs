use serde::{Deserialize, Serialize};

use super::{Estado, Timestamps};
use crate::database::{Collection, Document};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstadoCliente {
    Potencial,
    Cliente,
}

impl EstadoCliente {
    pub const NAMES: &'static [&'static str] = &["potencial", "cliente"];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cliente {
    #[serde(rename = "numeroIdentificacion")]
    pub numero_identificacion: String,
    pub direccion: String,
    pub estado: Estado,
    pub estado_cliente: EstadoCliente,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Document for Cliente {
    const COLLECTION: Collection = Collection::Clientes;
    const LABEL: &'static str = "Client";
}
