use serde::{Deserialize, Serialize};

use super::Timestamps;
use crate::database::{Collection, Document};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usuario {
    #[serde(rename = "numeroIdentificacion")]
    pub numero_identificacion: String,
    pub nombres: String,
    pub apellidos: String,
    pub telefono: String,
    pub email: String,
    /// bcrypt hash, never returned to clients.
    pub password: String,
    pub id_rol: i64,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Document for Usuario {
    const COLLECTION: Collection = Collection::Usuarios;
    const LABEL: &'static str = "User";
}

/// Client-facing user: no password, role name joined in.
#[derive(Debug, Clone, Serialize)]
pub struct UsuarioView {
    #[serde(rename = "numeroIdentificacion")]
    pub numero_identificacion: String,
    pub nombres: String,
    pub apellidos: String,
    pub telefono: String,
    pub email: String,
    pub id_rol: i64,
    pub rol: Option<String>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl UsuarioView {
    pub fn new(usuario: Usuario, rol: Option<String>) -> Self {
        Self {
            numero_identificacion: usuario.numero_identificacion,
            nombres: usuario.nombres,
            apellidos: usuario.apellidos,
            telefono: usuario.telefono,
            email: usuario.email,
            id_rol: usuario.id_rol,
            rol,
            timestamps: usuario.timestamps,
        }
    }
}
