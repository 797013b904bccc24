//! HTTP implementation of the dossier remote collaborators.
//!
//! [`ApiClient`] implements [`ProfileService`], [`ResumeService`] and
//! [`MessagingService`] over the JSON API.
//!
//! [`ProfileService`]: dossier_core::remote::ProfileService
//! [`ResumeService`]: dossier_core::remote::ResumeService
//! [`MessagingService`]: dossier_core::remote::MessagingService

mod client;

pub mod error;

pub use client::{ApiClient, ApiConfig};
pub use error::{Error, Result};
