//! Error types for `dossier-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("field {0:?} is not part of this record")]
  UnknownField(String),

  #[error("record is not in edit mode")]
  NotEditing,

  #[error("no valid changes to save")]
  NothingToSave,

  #[error("validation failed with {0} error(s)")]
  Validation(usize),

  #[error("key {0:?} is claimed by more than one sub-form")]
  OverlappingKeys(String),

  #[error("course id {0:?} is not an integer")]
  InvalidCourseId(String),

  #[error("invalid field pattern: {0}")]
  Pattern(#[from] regex::Error),

  #[error("the server rejected the update")]
  Rejected,

  #[error("remote error: {0}")]
  Remote(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a collaborator error.
  pub fn remote(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Remote(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
