use axum::{
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, Request},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;

/// JSON body extractor whose rejections use the `ApiResponse` error envelope
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| Self(value))
            .map_err(AppJsonRejection)
    }
}

pub struct AppJsonRejection(JsonRejection);

impl AppJsonRejection {
    fn message(&self) -> String {
        match &self.0 {
            JsonRejection::JsonDataError(err) => format!("Invalid request body: {}", err.body_text()),
            JsonRejection::JsonSyntaxError(err) => format!("Malformed JSON: {}", err.body_text()),
            JsonRejection::MissingJsonContentType(_) => {
                "Expected request with `Content-Type: application/json`".to_string()
            }
            _ => "Failed to read request body".to_string(),
        }
    }
}

impl IntoResponse for AppJsonRejection {
    fn into_response(self) -> Response {
        let message = self.message();
        tracing::debug!("Rejected JSON body: {}", message);
        AppError::BadRequest(message).into_response()
    }
}
