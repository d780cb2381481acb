use serde::{Deserialize, Serialize};

use crate::auth::Role;
use crate::database::{Collection, Document};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rol {
    pub id_rol: i64,
    pub nombre: Role,
}

impl Document for Rol {
    const COLLECTION: Collection = Collection::Roles;
    const LABEL: &'static str = "Role";
}
