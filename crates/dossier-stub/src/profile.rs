//! Handlers for `/api/profile` endpoints.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use chrono::Utc;
use dossier_core::{
  contacts::{
    ConnectionValue, ContactKey, Connections, UpdateProfileInfoDto, contact_rules,
    contacts_record,
  },
  record::Record,
};
use serde_json::{Value, json};

use crate::{ApiError, StubState, lock};

fn unknown(github_id: &str) -> ApiError {
  ApiError::not_found("profile", github_id)
}

/// `GET /api/profile/{github_id}/contacts`
pub async fn contacts(
  State(state): State<Arc<StubState>>,
  Path(github_id): Path<String>,
) -> Result<Json<Record>, ApiError> {
  let profiles = lock(&state.profiles);
  let record = profiles.get(&github_id).ok_or_else(|| unknown(&github_id))?;
  Ok(Json(contacts_record(record)))
}

/// `PATCH /api/profile/{github_id}` — answers `{"updated": bool}`.
///
/// An update whose contacts fail the card's rules is refused with
/// `updated: false` rather than an error status.
pub async fn update(
  State(state): State<Arc<StubState>>,
  Path(github_id): Path<String>,
  Json(body): Json<UpdateProfileInfoDto>,
) -> Result<Json<Value>, ApiError> {
  let mut profiles = lock(&state.profiles);
  let stored = profiles.get_mut(&github_id).ok_or_else(|| unknown(&github_id))?;

  let mut candidate = contacts_record(stored);
  body.apply_to(&mut candidate);
  let rules = contact_rules().map_err(|e| ApiError::Invalid(e.to_string()))?;
  if !rules.validate(&candidate).is_empty() {
    tracing::debug!(%github_id, "profile update refused");
    return Ok(Json(json!({ "updated": false })));
  }

  *stored = candidate;
  Ok(Json(json!({ "updated": true })))
}

/// `GET /api/profile/{github_id}/connections`
pub async fn connections(
  State(state): State<Arc<StubState>>,
  Path(github_id): Path<String>,
) -> Result<Json<Connections>, ApiError> {
  if !lock(&state.profiles).contains_key(&github_id) {
    return Err(unknown(&github_id));
  }
  let connections = lock(&state.connections)
    .get(&github_id)
    .cloned()
    .unwrap_or_default();
  Ok(Json(connections))
}

/// `POST /api/profile/{github_id}/email-confirmation`
///
/// Points the e-mail channel at the profile's current address and stamps the
/// link time. The channel stays disabled until the link is followed.
pub async fn send_confirmation(
  State(state): State<Arc<StubState>>,
  Path(github_id): Path<String>,
) -> Result<StatusCode, ApiError> {
  let email = lock(&state.profiles)
    .get(&github_id)
    .ok_or_else(|| unknown(&github_id))?
    .get(ContactKey::Email.as_ref())
    .unwrap_or_default()
    .to_owned();
  if email.trim().is_empty() {
    return Err(ApiError::Invalid("profile has no e-mail address".into()));
  }

  let mut connections = lock(&state.connections);
  let channel = connections
    .entry(github_id)
    .or_default()
    .entry("email".to_owned())
    .or_insert_with(ConnectionValue::default);
  if channel.value != email {
    channel.enabled = false;
  }
  channel.value = email;
  channel.last_link_sent_at = Some(Utc::now());
  Ok(StatusCode::ACCEPTED)
}
