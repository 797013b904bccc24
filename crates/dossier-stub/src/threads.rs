//! Handlers for review-thread messages.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
};
use chrono::Utc;
use dossier_core::thread::{MARKDOWN_LABEL, Message, NewMessage, Role, Thread};
use serde::Deserialize;

use crate::{ApiError, StubState, lock};

#[derive(Debug, Deserialize)]
pub struct RoleParam {
  pub role: Role,
}

/// `GET /api/sessions/{session_id}/tasks/{task_id}/messages?role=<role>`
///
/// Unknown threads read as empty.
pub async fn list(
  State(state): State<Arc<StubState>>,
  Path((session_id, task_id)): Path<(u64, u64)>,
  Query(RoleParam { role }): Query<RoleParam>,
) -> Json<Thread> {
  let threads = lock(&state.threads);
  let thread = threads
    .get(&(session_id, task_id))
    .map(|t| Thread {
      messages:     t.messages.clone(),
      last_read_at: t.last_read.get(&role).copied(),
    })
    .unwrap_or_default();
  Json(thread)
}

/// `POST /api/sessions/{session_id}/tasks/{task_id}/messages`
pub async fn post(
  State(state): State<Arc<StubState>>,
  Path((session_id, task_id)): Path<(u64, u64)>,
  Json(body): Json<NewMessage>,
) -> Result<StatusCode, ApiError> {
  let text = body.content.strip_prefix(MARKDOWN_LABEL).unwrap_or(&body.content);
  if text.trim().is_empty() {
    return Err(ApiError::Invalid("message is empty".into()));
  }

  let now = Utc::now();
  let mut threads = lock(&state.threads);
  let thread = threads.entry((session_id, task_id)).or_default();
  thread.messages.push(Message {
    content:   body.content,
    role:      body.role,
    timestamp: now,
  });
  // Writing to a thread implies having read it.
  thread.last_read.insert(body.role, now);
  Ok(StatusCode::CREATED)
}

/// `PATCH /api/sessions/{session_id}/tasks/{task_id}/messages` — body `{"role":..}`.
pub async fn acknowledge(
  State(state): State<Arc<StubState>>,
  Path((session_id, task_id)): Path<(u64, u64)>,
  Json(RoleParam { role }): Json<RoleParam>,
) -> Result<StatusCode, ApiError> {
  let mut threads = lock(&state.threads);
  let thread = threads
    .get_mut(&(session_id, task_id))
    .ok_or_else(|| ApiError::not_found("thread", format!("{session_id}/{task_id}")))?;
  thread.last_read.insert(role, Utc::now());
  Ok(StatusCode::NO_CONTENT)
}
