//! Per-route access policies.
//!
//! Every route in [`crate::app`] is wrapped with [`guard`] and one of the
//! constants below, so the full access table reads from the router alone.

use axum::middleware::from_fn_with_state;
use axum::routing::MethodRouter;

use crate::app::AppState;
use crate::auth::Role;
use crate::middleware::{jwt_auth_middleware, require_roles};

#[derive(Debug, Clone, Copy)]
pub enum Policy {
    /// No token required.
    Public,
    /// Any valid token.
    Authenticated,
    /// Valid token whose role is in the list.
    Roles(&'static [Role]),
}

impl Policy {
    pub const PUBLIC: Policy = Policy::Public;
    pub const AUTHENTICATED: Policy = Policy::Authenticated;
    pub const ASISTENTE: Policy = Policy::Roles(&[Role::Asistente]);
    pub const ASISTENTE_ABOGADO: Policy = Policy::Roles(&[Role::Asistente, Role::Abogado]);
    pub const ASISTENTE_CLIENTE: Policy = Policy::Roles(&[Role::Asistente, Role::Cliente]);
}

/// Attaches authentication and authorization layers for `policy`.
/// Authentication is the outer layer so roles are checked on verified claims.
pub fn guard(route: MethodRouter<AppState>, state: &AppState, policy: Policy) -> MethodRouter<AppState> {
    match policy {
        Policy::Public => route,
        Policy::Authenticated => route.layer(from_fn_with_state(state.clone(), jwt_auth_middleware)),
        Policy::Roles(_) => route
            .layer(from_fn_with_state(policy, require_roles))
            .layer(from_fn_with_state(state.clone(), jwt_auth_middleware)),
    }
}
