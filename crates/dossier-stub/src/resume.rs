//! Handlers for `/api/opportunities/{github_id}/resume`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use dossier_core::form::Payload;

use crate::{ApiError, StubState, lock};

/// `GET /api/opportunities/{github_id}/resume`
pub async fn get_one(
  State(state): State<Arc<StubState>>,
  Path(github_id): Path<String>,
) -> Result<Json<Payload>, ApiError> {
  lock(&state.resumes)
    .get(&github_id)
    .cloned()
    .map(Json)
    .ok_or_else(|| ApiError::not_found("resume", github_id))
}

/// `PUT /api/opportunities/{github_id}/resume` — stores the body and returns
/// the canonical resume (course ids sorted and de-duplicated).
pub async fn save(
  State(state): State<Arc<StubState>>,
  Path(github_id): Path<String>,
  Json(mut body): Json<Payload>,
) -> Result<Json<Payload>, ApiError> {
  if body.fields.get("name").is_none_or(|n| n.trim().is_empty()) {
    return Err(ApiError::Invalid("name is required".into()));
  }
  body.visible_courses.sort_unstable();
  body.visible_courses.dedup();

  lock(&state.resumes).insert(github_id, body.clone());
  Ok(Json(body))
}
