// handlers/mod.rs - one module per entity controller
//
// Handlers receive validated input through the `ValidJson`/`ValidQuery`/`ValidPath`
// extractors, talk to the store through `AppState::repo`, and answer with the
// `{ success, data }` envelope. Access policies live in `crate::app`.

pub mod abogados;
pub mod agendas;
pub mod asistentes;
pub mod autenticacion;
pub mod clientes;
pub mod docesp;
pub mod facturas;
pub mod procesoabogados;
pub mod procesos;
pub mod roles;
pub mod subprocesos;
pub mod tareas;
pub mod tipoprocesos;
pub mod usuarios;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::app::AppState;
use crate::database::StoreError;
use crate::filter::FilterData;
use crate::models::{Usuario, UsuarioNombre};

/// Values that count as "provided" in a truthy-fallback update.
///
/// Several controllers apply `field = new || old`: an empty string, a zero
/// or `false` keeps the stored value. [`assign_truthy`] reproduces that.
pub trait Truthy {
    fn is_truthy(&self) -> bool;
}

impl Truthy for String {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for i64 {
    fn is_truthy(&self) -> bool {
        *self != 0
    }
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl Truthy for DateTime<Utc> {
    fn is_truthy(&self) -> bool {
        true
    }
}

macro_rules! always_truthy {
    ($($t:ty),*) => {
        $(impl Truthy for $t {
            fn is_truthy(&self) -> bool {
                true
            }
        })*
    };
}

always_truthy!(
    crate::models::Estado,
    crate::models::EstadoCliente,
    crate::models::EstadoFactura,
    crate::models::MetodoPago,
    crate::models::EstadoAgenda
);

pub fn assign_truthy<T: Truthy>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        if value.is_truthy() {
            *target = value;
        }
    }
}

/// Equality filter over whichever optional query parameters were given.
pub(crate) fn query_filter(pairs: Vec<(&str, Option<Value>)>) -> FilterData {
    let where_clause: Map<String, Value> = pairs
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field.to_string(), v)))
        .collect();

    if where_clause.is_empty() {
        FilterData::all()
    } else {
        FilterData::where_clause(Value::Object(where_clause))
    }
}

pub(crate) fn param<T: serde::Serialize>(value: Option<T>) -> Option<Value> {
    value.and_then(|v| serde_json::to_value(v).ok())
}

/// Users keyed by identity number, loaded in one query.
pub(crate) async fn usuarios_by_identity(
    state: &AppState,
    identities: impl IntoIterator<Item = &String>,
) -> Result<HashMap<String, Usuario>, StoreError> {
    let values: Vec<Value> = identities.into_iter().map(|id| Value::String(id.clone())).collect();
    let usuarios = state
        .repo::<Usuario>()
        .select_in("numeroIdentificacion", values)
        .await?;

    Ok(usuarios
        .into_iter()
        .map(|u| (u.numero_identificacion.clone(), u))
        .collect())
}

/// `{ nombres, apellidos }` for one identity, or `None` when the user is gone.
pub(crate) async fn usuario_nombre(state: &AppState, identity: &str) -> Result<Option<UsuarioNombre>, StoreError> {
    let usuario = state
        .repo::<Usuario>()
        .select_one(FilterData::eq("numeroIdentificacion", identity))
        .await?;
    Ok(usuario.as_ref().map(UsuarioNombre::from))
}
