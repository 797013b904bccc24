//! [`EditableRecordController`] — snapshot/draft tracking for one editable
//! record, with save and cancel.
//!
//! The controller holds two copies of the record: `saved`, the last state the
//! server confirmed, and `draft`, the in-progress edits. `saved` is only ever
//! replaced wholesale by a successful save. `draft` always has the same key
//! set as `saved`.

use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  record::Record,
  remote::RecordRemote,
  rules::{FieldError, FieldRules},
};

/// `true` iff `draft` differs from `saved` field by field and no validation
/// error is active.
pub fn can_save(draft: &Record, saved: &Record, has_validation_error: bool) -> bool {
  draft != saved && !has_validation_error
}

pub struct EditableRecordController<R> {
  remote:           R,
  rules:            FieldRules,
  saved:            Record,
  draft:            Record,
  editing:          bool,
  validation_error: bool,
}

impl<R: RecordRemote> EditableRecordController<R> {
  /// Start from the record loaded from the server.
  pub fn new(saved: Record, remote: R) -> Self {
    Self {
      remote,
      rules: FieldRules::default(),
      draft: saved.clone(),
      saved,
      editing: false,
      validation_error: false,
    }
  }

  pub fn with_rules(mut self, rules: FieldRules) -> Self {
    self.rules = rules;
    self
  }

  pub fn saved(&self) -> &Record { &self.saved }

  pub fn draft(&self) -> &Record { &self.draft }

  pub fn is_editing(&self) -> bool { self.editing }

  pub fn has_validation_error(&self) -> bool { self.validation_error }

  pub fn remote(&self) -> &R { &self.remote }

  /// Enter edit mode with a fresh copy of `saved`. No-op while editing.
  pub fn begin_edit(&mut self) {
    if self.editing {
      return;
    }
    self.draft = self.saved.clone();
    self.editing = true;
    debug!(fields = self.draft.len(), "editing started");
  }

  /// Write one draft field. `saved` is never touched.
  pub fn set_field(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
    if !self.editing {
      return Err(Error::NotEditing);
    }
    self.draft.set(key, value)
  }

  /// Set by the form-validation collaborator.
  pub fn set_validation_error(&mut self, active: bool) {
    self.validation_error = active;
  }

  /// Run the configured rules over the draft and update the validation flag.
  pub fn validate(&mut self) -> Vec<FieldError> {
    let errors = self.rules.validate(&self.draft);
    self.validation_error = !errors.is_empty();
    errors
  }

  pub fn can_save(&self) -> bool {
    can_save(&self.draft, &self.saved, self.validation_error)
  }

  /// Send the draft to the remote collaborator.
  ///
  /// On success the server's canonical record becomes `saved`, the draft is
  /// reset to it and edit mode ends. On failure draft and edit mode are left
  /// as they were. There is no retry.
  ///
  /// Taking `&mut self` means a second save cannot start on the same
  /// controller while one is in flight.
  pub async fn save(&mut self) -> Result<Record> {
    if !self.editing {
      return Err(Error::NotEditing);
    }
    if !self.can_save() {
      return Err(Error::NothingToSave);
    }

    match self.remote.save_record(&self.draft).await {
      Ok(canonical) => {
        info!(fields = canonical.len(), "record saved");
        self.saved = canonical;
        self.draft = self.saved.clone();
        self.editing = false;
        Ok(self.saved.clone())
      }
      Err(e) => {
        warn!(error = %e, "saving record failed");
        Err(e)
      }
    }
  }

  /// Drop the draft, clear the validation flag and leave edit mode.
  pub fn cancel(&mut self) {
    self.draft = self.saved.clone();
    self.validation_error = false;
    self.editing = false;
  }
}
