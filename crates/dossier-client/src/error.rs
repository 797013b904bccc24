//! Error type for `dossier-client`.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("{method} {path} → {status}: {message}")]
  Status {
    method:  &'static str,
    path:    String,
    status:  StatusCode,
    message: String,
  },
}

impl Error {
  pub fn status(&self) -> Option<StatusCode> {
    match self {
      Self::Http(e) => e.status(),
      Self::Status { status, .. } => Some(*status),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
