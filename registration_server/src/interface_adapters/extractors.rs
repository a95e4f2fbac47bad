// Extractors that reject with the JSON error envelope instead of axum's
// plain-text rejections.

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request,
    },
    http::{request::Parts, StatusCode},
    Json,
};
use serde::de::DeserializeOwned;

use crate::domain::errors::FieldError;
use crate::interface_adapters::handlers::{error_response_with_fields, ApiError};

// JSON request body.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        Ok(Self(value))
    }
}

// Query string parameters.
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(query_rejection)?;
        Ok(Self(value))
    }
}

// Path parameters.
pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(path_rejection)?;
        Ok(Self(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    // Well-formed JSON of the wrong shape is still a validation failure.
    let status = match &rejection {
        JsonRejection::JsonDataError(_) => StatusCode::BAD_REQUEST,
        other => other.status(),
    };
    tracing::debug!(error = %rejection, "rejected request body");
    error_response_with_fields(
        status,
        "invalid request body",
        vec![rejection_field_error(&rejection.body_text(), "body")],
    )
}

fn query_rejection(rejection: QueryRejection) -> ApiError {
    tracing::debug!(error = %rejection, "rejected query string");
    error_response_with_fields(
        StatusCode::BAD_REQUEST,
        "invalid query string",
        vec![rejection_field_error(&rejection.body_text(), "query")],
    )
}

fn path_rejection(rejection: PathRejection) -> ApiError {
    tracing::debug!(error = %rejection, "rejected path parameters");
    error_response_with_fields(
        StatusCode::BAD_REQUEST,
        "invalid path parameter",
        vec![rejection_field_error(&rejection.body_text(), "path")],
    )
}

pub(crate) fn multipart_rejection(rejection: MultipartRejection) -> ApiError {
    tracing::debug!(error = %rejection, "rejected multipart request");
    error_response_with_fields(
        rejection.status(),
        "invalid multipart payload",
        vec![FieldError::new("document", rejection.body_text())],
    )
}

// Pulls a field path out of a deserializer message such as
// "Failed to deserialize the JSON body into the target type: guests[0]: missing field `last_name` at line 1 column 30".
fn rejection_field_error(text: &str, fallback: &str) -> FieldError {
    let detail = if text.starts_with("Failed to") {
        text.split_once(": ").map_or(text, |(_, rest)| rest)
    } else {
        text
    };

    let (path, message) = match detail.split_once(": ") {
        Some((path, message)) if !path.is_empty() && !path.contains(char::is_whitespace) => {
            (Some(path), message)
        }
        _ => (None, detail),
    };
    let missing = message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split_once('`'))
        .map(|(name, _)| name);

    let field = match (path, missing) {
        (Some(path), Some(name)) => format!("{path}.{name}"),
        (Some(path), None) => path.to_string(),
        (None, Some(name)) => name.to_string(),
        (None, None) => fallback.to_string(),
    };
    FieldError::new(field, message)
}
