//! In-memory stand-in for the remote dossier API.
//!
//! Serves the profile, resume and review-thread endpoints the client talks to,
//! backed by a [`StubState`] held in memory. Used by client tests and for
//! local runs of the CLI without a real backend.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/api/profile/{github_id}/contacts` | 404 for unknown profiles |
//! | `PATCH` | `/api/profile/{github_id}` | `{"updated":false}` when a contact fails validation |
//! | `GET`   | `/api/profile/{github_id}/connections` | empty map when none are set up |
//! | `POST`  | `/api/profile/{github_id}/email-confirmation` | 202; records the link on the e-mail channel |
//! | `GET`   | `/api/opportunities/{github_id}/resume` | |
//! | `PUT`   | `/api/opportunities/{github_id}/resume` | returns the canonical resume |
//! | `GET`   | `/api/sessions/{session_id}/tasks/{task_id}/messages` | `?role=` required |
//! | `POST`  | `/api/sessions/{session_id}/tasks/{task_id}/messages` | 201 |
//! | `PATCH` | `/api/sessions/{session_id}/tasks/{task_id}/messages` | body `{"role":..}`; 204 |

pub mod error;
pub mod profile;
pub mod resume;
pub mod threads;

use std::{
  collections::HashMap,
  sync::{Arc, Mutex},
};

use axum::{
  Router,
  routing::{get, patch, post},
};
use chrono::{DateTime, Utc};
use dossier_core::{
  contacts::Connections,
  form::Payload,
  record::Record,
  thread::{Message, Role},
};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

// ─── State ───────────────────────────────────────────────────────────────────

/// One review thread and each role's last acknowledgement.
#[derive(Debug, Clone, Default)]
pub struct StoredThread {
  pub messages:  Vec<Message>,
  pub last_read: HashMap<Role, DateTime<Utc>>,
}

/// Everything the stub knows. Share it behind an [`Arc`].
#[derive(Debug, Default)]
pub struct StubState {
  pub profiles:      Mutex<HashMap<String, Record>>,
  pub connections:   Mutex<HashMap<String, Connections>>,
  pub resumes:       Mutex<HashMap<String, Payload>>,
  pub threads:       Mutex<HashMap<(u64, u64), StoredThread>>,
}

impl StubState {
  pub fn with_profile(self, github_id: &str, contacts: Record) -> Self {
    lock(&self.profiles).insert(github_id.to_owned(), contacts);
    self
  }

  pub fn with_connections(self, github_id: &str, connections: Connections) -> Self {
    lock(&self.connections).insert(github_id.to_owned(), connections);
    self
  }

  pub fn with_resume(self, github_id: &str, resume: Payload) -> Self {
    lock(&self.resumes).insert(github_id.to_owned(), resume);
    self
  }

  pub fn with_thread(self, session_id: u64, task_id: u64, thread: StoredThread) -> Self {
    lock(&self.threads).insert((session_id, task_id), thread);
    self
  }
}

/// Handlers never panic while holding a lock, so a poisoned mutex still holds
/// consistent data.
pub(crate) fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
  m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the stub API router over `state`.
pub fn router(state: Arc<StubState>) -> Router<()> {
  Router::new()
    // Profile
    .route("/api/profile/{github_id}", patch(profile::update))
    .route("/api/profile/{github_id}/contacts", get(profile::contacts))
    .route("/api/profile/{github_id}/connections", get(profile::connections))
    .route(
      "/api/profile/{github_id}/email-confirmation",
      post(profile::send_confirmation),
    )
    // Resume
    .route(
      "/api/opportunities/{github_id}/resume",
      get(resume::get_one).put(resume::save),
    )
    // Review threads
    .route(
      "/api/sessions/{session_id}/tasks/{task_id}/messages",
      get(threads::list).post(threads::post).patch(threads::acknowledge),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
