//! [`Record`] — a flat field-key → string mapping for one editable entity.
//!
//! Records are compared structurally: two records are equal when they hold the
//! same keys with the same values, regardless of the order in which the keys
//! were inserted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// A structured key-value entity being edited (contacts, CV fields).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
  try_from = "BTreeMap<String, Value>",
  into = "BTreeMap<String, String>"
)]
pub struct Record(BTreeMap<String, String>);

impl Record {
  pub fn new() -> Self { Self::default() }

  /// A record with every key in `keys` set to the empty string.
  pub fn blank<I, K>(keys: I) -> Self
  where
    I: IntoIterator<Item = K>,
    K: Into<String>,
  {
    Self(
      keys
        .into_iter()
        .map(|k| (k.into(), String::new()))
        .collect(),
    )
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.0.get(key).map(String::as_str)
  }

  /// Insert or overwrite a key. Used when building records; may change the
  /// record's shape.
  pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
    self.0.insert(key.into(), value.into());
  }

  /// Overwrite the value of an existing key. Never changes the shape.
  pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
    match self.0.get_mut(key) {
      Some(slot) => {
        *slot = value.into();
        Ok(())
      }
      None => Err(Error::UnknownField(key.to_owned())),
    }
  }

  pub fn contains_key(&self, key: &str) -> bool { self.0.contains_key(key) }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  /// `true` when both records hold exactly the same key set.
  pub fn same_shape(&self, other: &Record) -> bool {
    self.0.len() == other.0.len() && self.0.keys().all(|k| other.0.contains_key(k))
  }

  /// Split out the sub-record for `keys`. Keys absent from `self` come back
  /// blank so the result always has exactly the requested shape.
  pub fn project<I, K>(&self, keys: I) -> Record
  where
    I: IntoIterator<Item = K>,
    K: AsRef<str>,
  {
    Self(
      keys
        .into_iter()
        .map(|k| {
          let k = k.as_ref();
          (k.to_owned(), self.get(k).unwrap_or_default().to_owned())
        })
        .collect(),
    )
  }

  /// Key-union merge; values from `other` win on a shared key.
  pub fn merge(&mut self, other: Record) { self.0.extend(other.0); }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
  fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
    Self(
      iter
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect(),
    )
  }
}

impl From<Record> for BTreeMap<String, String> {
  fn from(record: Record) -> Self { record.0 }
}

/// Accepts the scalar JSON the API sends back: `null` reads as empty, booleans
/// and numbers read as their textual form.
impl TryFrom<BTreeMap<String, Value>> for Record {
  type Error = String;

  fn try_from(raw: BTreeMap<String, Value>) -> Result<Self, Self::Error> {
    raw
      .into_iter()
      .map(|(k, v)| {
        let text = match v {
          Value::Null => String::new(),
          Value::Bool(b) => b.to_string(),
          Value::Number(n) => n.to_string(),
          Value::String(s) => s,
          Value::Array(_) | Value::Object(_) => {
            return Err(format!("field {k:?} is not a scalar value"));
          }
        };
        Ok((k, text))
      })
      .collect::<Result<BTreeMap<_, _>, _>>()
      .map(Self)
  }
}
