//! Core types and collaborator traits for dossier.
//!
//! This crate holds the client-side editing state behind the profile, CV and
//! cross-check review views: draft/snapshot tracking for editable records,
//! multi-form aggregation for CV submission, and the unread-message
//! notification effect. Remote services are reached through the traits in
//! [`remote`]; nothing here speaks HTTP.

// Native `async fn` in traits; the `Send` bounds are spelled out where needed.
#![allow(async_fn_in_trait)]

pub mod contacts;
pub mod cv;
pub mod editable;
pub mod error;
pub mod form;
pub mod record;
pub mod remote;
pub mod rules;
pub mod thread;

pub use error::{Error, Result};

#[cfg(test)]
mod tests;
