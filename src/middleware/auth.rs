use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::{validate_jwt, AuthError, Claims};
use crate::error::ApiError;

/// Authenticated caller, as recorded in the token at login.
#[derive(Clone, Debug)]
pub struct AuthUser(pub Claims);

/// JWT authentication middleware that validates tokens and attaches the claims
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers)?;

    let claims = validate_jwt(&token, &state.security).map_err(|err| {
        tracing::warn!("Rejected token: {}", err);
        ApiError::from(err)
    })?;

    tracing::debug!("Authenticated {} as {}", claims.numero_identificacion, claims.nombre_rol);
    request.extensions_mut().insert(AuthUser(claims));

    Ok(next.run(request).await)
}

/// The raw `Authorization` header value is the token. A `Bearer ` prefix is
/// tolerated for clients that send one.
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, AuthError> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid Authorization header format".to_string()))?;

    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str).trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token.to_string())
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(ApiError::MissingToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn header_token_with_or_without_bearer() {
        let mut headers = HeaderMap::new();
        assert!(matches!(extract_jwt_from_headers(&headers), Err(AuthError::MissingToken)));

        headers.insert("authorization", HeaderValue::from_static("abc.def.ghi"));
        assert_eq!(extract_jwt_from_headers(&headers).unwrap(), "abc.def.ghi");

        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_jwt_from_headers(&headers).unwrap(), "abc.def.ghi");

        headers.insert("authorization", HeaderValue::from_static("Bearer "));
        assert!(matches!(extract_jwt_from_headers(&headers), Err(AuthError::MissingToken)));
    }
}
