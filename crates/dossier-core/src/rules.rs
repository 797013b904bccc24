//! Per-field validation rules.
//!
//! Validation is pure and synchronous. An empty value only fails
//! [`FieldRule::Required`]; every other rule treats an empty field as
//! "not filled in" and lets it pass.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::Serialize;

use crate::{Result, record::Record};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static e-mail pattern")
});

/// A single check applied to a field value.
#[derive(Debug, Clone)]
pub enum FieldRule {
  Required { message: String },
  Email { message: String },
  Pattern { pattern: Regex, message: String },
  MaxLength { max: usize, message: String },
}

impl FieldRule {
  pub fn required(message: impl Into<String>) -> Self {
    Self::Required { message: message.into() }
  }

  pub fn email(message: impl Into<String>) -> Self {
    Self::Email { message: message.into() }
  }

  pub fn pattern(pattern: &str, message: impl Into<String>) -> Result<Self> {
    Ok(Self::Pattern {
      pattern: Regex::new(pattern)?,
      message: message.into(),
    })
  }

  pub fn max_length(max: usize, message: impl Into<String>) -> Self {
    Self::MaxLength { max, message: message.into() }
  }

  /// Returns the failure message, or `None` if `value` passes.
  ///
  /// Values are checked with surrounding whitespace removed, matching the
  /// trim applied before submission.
  pub fn check(&self, value: &str) -> Option<&str> {
    let value = value.trim();
    let passes = match self {
      Self::Required { .. } => !value.is_empty(),
      _ if value.is_empty() => true,
      Self::Email { .. } => EMAIL.is_match(value),
      Self::Pattern { pattern, .. } => pattern.is_match(value),
      Self::MaxLength { max, .. } => value.chars().count() <= *max,
    };
    (!passes).then(|| self.message())
  }

  pub fn message(&self) -> &str {
    match self {
      Self::Required { message }
      | Self::Email { message }
      | Self::Pattern { message, .. }
      | Self::MaxLength { message, .. } => message,
    }
  }
}

/// A failed rule for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub key:     String,
  pub message: String,
}

impl fmt::Display for FieldError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.key, self.message)
  }
}

/// Ordered field-key → rules table.
#[derive(Debug, Clone, Default)]
pub struct FieldRules {
  fields: Vec<(String, Vec<FieldRule>)>,
}

impl FieldRules {
  pub fn new() -> Self { Self::default() }

  /// Append `rule` to the rules for `key`.
  pub fn with(mut self, key: impl Into<String>, rule: FieldRule) -> Self {
    let key = key.into();
    match self.fields.iter_mut().find(|(k, _)| *k == key) {
      Some((_, rules)) => rules.push(rule),
      None => self.fields.push((key, vec![rule])),
    }
    self
  }

  pub fn is_empty(&self) -> bool { self.fields.is_empty() }

  /// Check one value against the rules registered for `key`.
  pub fn validate_field(&self, key: &str, value: &str) -> Vec<FieldError> {
    self
      .fields
      .iter()
      .filter(|(k, _)| k == key)
      .flat_map(|(_, rules)| rules)
      .filter_map(|rule| rule.check(value))
      .map(|message| FieldError {
        key:     key.to_owned(),
        message: message.to_owned(),
      })
      .collect()
  }

  /// Every failure across `record`, in rule declaration order. Keys missing
  /// from the record are validated as empty.
  pub fn validate(&self, record: &Record) -> Vec<FieldError> {
    self
      .fields
      .iter()
      .flat_map(|(key, _)| {
        self.validate_field(key, record.get(key).unwrap_or_default())
      })
      .collect()
  }
}
