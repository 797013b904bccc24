//! Collaborator traits for the remote API and the notification sink.
//!
//! Every controller receives its collaborators explicitly and is bound to one
//! resource id (a GitHub id, or a session/task pair). Implementations live in
//! `dossier-client` (HTTP) and in tests (in-memory fakes).
//!
//! All methods return `Send` futures so controllers can be driven from a
//! multi-threaded tokio runtime.

use std::{future::Future, sync::Arc};

use crate::{
  Result,
  contacts::{Connections, UpdateProfileInfoDto},
  form::Payload,
  record::Record,
  thread::{NewMessage, Role, Thread},
};

// ─── Record persistence ──────────────────────────────────────────────────────

/// Persists the draft of an [`EditableRecordController`] and returns the
/// canonical record the server now holds.
///
/// [`EditableRecordController`]: crate::editable::EditableRecordController
pub trait RecordRemote: Send + Sync {
  fn save_record<'a>(
    &'a self,
    draft: &'a Record,
  ) -> impl Future<Output = Result<Record>> + Send + 'a;
}

// ─── Profile ─────────────────────────────────────────────────────────────────

pub trait ProfileService: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Current contacts of the profile, keyed by [`ContactKey`] wire names.
  ///
  /// [`ContactKey`]: crate::contacts::ContactKey
  fn get_contacts<'a>(
    &'a self,
    github_id: &'a str,
  ) -> impl Future<Output = Result<Record, Self::Error>> + Send + 'a;

  /// Apply a partial profile update. Ordinary validation failures on the
  /// server come back as `Ok(false)` rather than an error.
  fn update_profile<'a>(
    &'a self,
    github_id: &'a str,
    update: &'a UpdateProfileInfoDto,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Notification channels of the profile (e-mail, telegram, ...).
  fn get_connections<'a>(
    &'a self,
    github_id: &'a str,
  ) -> impl Future<Output = Result<Connections, Self::Error>> + Send + 'a;

  fn send_confirmation_email<'a>(
    &'a self,
    github_id: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

// ─── Resume ──────────────────────────────────────────────────────────────────

pub trait ResumeService: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn get_resume<'a>(
    &'a self,
    github_id: &'a str,
  ) -> impl Future<Output = Result<Payload, Self::Error>> + Send + 'a;

  /// Store `data` and return the canonical resume. Rejects on any failure.
  fn save_resume<'a>(
    &'a self,
    github_id: &'a str,
    data: &'a Payload,
  ) -> impl Future<Output = Result<Payload, Self::Error>> + Send + 'a;
}

// ─── Review messages ─────────────────────────────────────────────────────────

pub trait MessagingService: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Messages of one review thread plus the viewer's last acknowledgement.
  fn get_thread(
    &self,
    session_id: u64,
    course_task_id: u64,
    role: Role,
  ) -> impl Future<Output = Result<Thread, Self::Error>> + Send + '_;

  fn post_message<'a>(
    &'a self,
    session_id: u64,
    course_task_id: u64,
    message: &'a NewMessage,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Mark every message in the thread as read for `role`.
  fn acknowledge_read(
    &self,
    session_id: u64,
    course_task_id: u64,
    role: Role,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Notification sink ───────────────────────────────────────────────────────

/// Receives user-visible transient messages. Passive: nothing it does feeds
/// back into controller state.
pub trait Notifier: Send + Sync {
  fn info(&self, message: &str);
  fn success(&self, message: &str);
  fn error(&self, message: &str);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
  fn info(&self, message: &str) { (**self).info(message) }

  fn success(&self, message: &str) { (**self).success(message) }

  fn error(&self, message: &str) { (**self).error(message) }
}

