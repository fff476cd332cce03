//! Request extractors whose rejections use the API error envelope

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use shared::error::{AppError, ErrorCode};

/// JSON body extractor
///
/// Same as [`axum::Json`] but a malformed or missing body becomes a 400
/// [`AppError`] instead of axum's plain-text rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::with_message(
                ErrorCode::InvalidRequest,
                format!("Invalid JSON body: {}", rejection.body_text()),
            )),
        }
    }
}

/// Parse an optional query-string id, naming the field on failure
pub fn parse_id_param(value: Option<&str>, field: &str) -> Result<i64, AppError> {
    let raw = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::required(field))?;
    raw.parse::<i64>().map_err(|_| {
        AppError::with_message(ErrorCode::InvalidFormat, format!("{field} must be an integer"))
            .with_detail("field", field)
    })
}
