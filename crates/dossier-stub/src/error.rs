//! Handler errors, rendered as `{"error": "..."}` JSON bodies.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
  /// No stored profile, resume or thread under `id`.
  #[error("{resource} {id} not found")]
  NotFound { resource: &'static str, id: String },

  #[error("{0}")]
  Invalid(String),
}

impl ApiError {
  pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
    Self::NotFound { resource, id: id.into() }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      Self::NotFound { .. } => StatusCode::NOT_FOUND,
      Self::Invalid(_) => StatusCode::BAD_REQUEST,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
  }
}
