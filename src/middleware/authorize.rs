use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::auth::AuthUser;
use crate::auth::authorize;
use crate::error::ApiError;
use crate::policy::Policy;

/// Authorization middleware: checks the caller's role against the route's policy.
/// Must run inside `jwt_auth_middleware`.
pub async fn require_roles(
    State(policy): State<Policy>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Policy::Roles(allowed) = policy {
        let user = request
            .extensions()
            .get::<AuthUser>()
            .ok_or(ApiError::MissingToken)?;

        if !authorize(&user.0, allowed) {
            tracing::warn!(
                "Role '{}' denied for {} {}",
                user.0.nombre_rol,
                request.method(),
                request.uri().path()
            );
            return Err(ApiError::forbidden("Access denied"));
        }
    }

    Ok(next.run(request).await)
}
