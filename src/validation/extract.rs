use std::collections::HashMap;

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{validate, Schema};
use crate::error::ApiError;

/// A request input with a declared schema.
pub trait Validated: DeserializeOwned {
    const SCHEMA: &'static Schema;
}

/// JSON body validated against `T::SCHEMA`.
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

/// Query string validated against `T::SCHEMA`.
#[derive(Debug)]
pub struct ValidQuery<T>(pub T);

/// Path parameters validated against `T::SCHEMA`.
#[derive(Debug)]
pub struct ValidPath<T>(pub T);

fn parse<T: Validated>(payload: &Value) -> Result<T, ApiError> {
    let normalized = validate(T::SCHEMA, payload)?;
    serde_json::from_value(normalized).map_err(|e| ApiError::validation_error(e.to_string(), None))
}

fn strings_to_object(pairs: HashMap<String, String>) -> Value {
    Value::Object(pairs.into_iter().map(|(k, v)| (k, Value::String(v))).collect())
}

#[axum::async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: Validated,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::validation_error(rejection.body_text(), None))?;
        Ok(ValidJson(parse(&payload)?))
    }
}

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: Validated,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::validation_error(rejection.body_text(), None))?;
        Ok(ValidQuery(parse(&strings_to_object(pairs))?))
    }
}

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    S: Send + Sync,
    T: Validated,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(pairs) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::validation_error(rejection.body_text(), None))?;
        Ok(ValidPath(parse(&strings_to_object(pairs))?))
    }
}
