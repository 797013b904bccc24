//! Cross-check review threads: unread counting and the one-shot
//! "you have unread messages" effect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, warn};

use crate::remote::{MessagingService, Notifier};

/// Prefix marking a message body as markdown.
pub const MARKDOWN_LABEL: &str = "[markdown]\n";

pub const MESSAGE_SENT: &str = "The message has been sent.";
pub const REMOTE_FAILURE: &str = "An error occurred. Please try later.";

// ─── Messages ────────────────────────────────────────────────────────────────

/// Who wrote a message, or who is viewing the thread.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
  Student,
  Reviewer,
  Mentor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
  pub content:   String,
  pub role:      Role,
  pub timestamp: DateTime<Utc>,
}

/// Body of a new message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
  pub content: String,
  pub role:    Role,
}

/// A review thread as seen by one role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
  pub messages:     Vec<Message>,
  /// When the viewing role last acknowledged the thread, if ever.
  pub last_read_at: Option<DateTime<Utc>>,
}

/// Messages written by someone other than `viewer` after `last_read_at`.
pub fn count_unread(
  messages: &[Message],
  viewer: Role,
  last_read_at: Option<DateTime<Utc>>,
) -> usize {
  messages
    .iter()
    .filter(|m| m.role != viewer)
    .filter(|m| last_read_at.is_none_or(|at| m.timestamp > at))
    .count()
}

pub fn unread_text(amount: usize) -> String {
  match amount {
    1 => "You have 1 unread message".to_owned(),
    n => format!("You have {n} unread messages"),
  }
}

// ─── Notifier ────────────────────────────────────────────────────────────────

/// What [`UnreadMessageNotifier::activate`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
  /// No task id, or nothing unread.
  Skipped,
  /// Same `(task, unread)` key as the previous activation.
  Unchanged,
  /// Notification shown; `acknowledged` reports whether the read mark stuck.
  Notified { acknowledged: bool },
}

/// Fires the unread-messages notification and read acknowledgement for one
/// review session, at most once per distinct `(course_task_id, unread)` key.
pub struct UnreadMessageNotifier<M, N> {
  session_id: u64,
  role:       Role,
  messaging:  M,
  notifier:   N,
  last_key:   Option<(Option<u64>, usize)>,
}

impl<M: MessagingService, N: Notifier> UnreadMessageNotifier<M, N> {
  pub fn new(session_id: u64, role: Role, messaging: M, notifier: N) -> Self {
    Self {
      session_id,
      role,
      messaging,
      notifier,
      last_key: None,
    }
  }

  pub fn messaging(&self) -> &M { &self.messaging }

  /// Run the effect for the current view state.
  ///
  /// Re-running with the same `(course_task_id, unread)` key does nothing.
  /// A failed acknowledgement is reported through the notifier and not
  /// retried; it never hides the messages.
  pub async fn activate(
    &mut self,
    course_task_id: Option<u64>,
    thread: &Thread,
  ) -> Activation {
    let unread = count_unread(&thread.messages, self.role, thread.last_read_at);
    let key = (course_task_id, unread);
    if self.last_key == Some(key) {
      return Activation::Unchanged;
    }
    self.last_key = Some(key);

    let Some(course_task_id) = course_task_id else {
      return Activation::Skipped;
    };
    if unread == 0 {
      return Activation::Skipped;
    }

    self.notifier.info(&unread_text(unread));

    let acknowledged = match self
      .messaging
      .acknowledge_read(self.session_id, course_task_id, self.role)
      .await
    {
      Ok(()) => true,
      Err(e) => {
        warn!(
          session = self.session_id,
          task = course_task_id,
          error = %e,
          "acknowledging messages failed"
        );
        self.notifier.error(REMOTE_FAILURE);
        false
      }
    };
    Activation::Notified { acknowledged }
  }

  /// Post `content` to the thread as markdown. Returns `true` once the
  /// message is stored so the caller can clear its input. Without a task id
  /// this is a no-op.
  pub async fn send_message(&self, course_task_id: Option<u64>, content: &str) -> bool {
    let Some(course_task_id) = course_task_id else {
      return false;
    };
    let message = NewMessage {
      content: format!("{MARKDOWN_LABEL}{content}"),
      role:    self.role,
    };
    match self
      .messaging
      .post_message(self.session_id, course_task_id, &message)
      .await
    {
      Ok(()) => {
        debug!(session = self.session_id, task = course_task_id, "message sent");
        self.notifier.success(MESSAGE_SENT);
        true
      }
      Err(e) => {
        warn!(session = self.session_id, error = %e, "sending message failed");
        self.notifier.error(REMOTE_FAILURE);
        false
      }
    }
  }
}
