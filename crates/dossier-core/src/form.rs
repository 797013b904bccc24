//! Multi-form aggregation for the CV editor.
//!
//! A CV is edited through several independent sub-forms (general info,
//! contacts, visible courses). Each validates on its own; the
//! [`MultiFormAggregator`] checks all of them, merges their values into one
//! [`Payload`], submits it and redistributes the server's canonical answer back
//! into the sub-forms along the same key partition.

use std::{
  collections::{BTreeMap, BTreeSet},
  time::Duration,
};

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{info, warn};

use crate::{
  Error, Result,
  record::Record,
  remote::{Notifier, ResumeService},
  rules::{FieldError, FieldRules},
};

/// How long the "validation failed" alert stays up.
pub const VALIDATION_ALERT_HOLD: Duration = Duration::from_millis(2000);

pub const VALIDATION_ALERT: &str = "All required fields must be filled first";
pub const SUBMIT_SUCCESS: &str = "CV successfully updated";
pub const COURSE_ID_INVALID: &str = "Course id must be an integer";

// ─── Payload ─────────────────────────────────────────────────────────────────

/// The merged submission: flat scalar fields plus the ids of courses shown on
/// the CV.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
  #[serde(flatten)]
  pub fields:          Record,
  #[serde(default)]
  pub visible_courses: Vec<i64>,
}

// ─── Sub-forms ───────────────────────────────────────────────────────────────

/// What a sub-form contributes to the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubFormValues {
  /// Flat scalar fields, merged by key.
  Fields(Record),
  /// Course id → visible flag; only the `true` entries reach the payload.
  Selection(BTreeMap<String, bool>),
}

/// An independently validated region of the CV form.
pub trait SubForm: Send + Sync {
  fn label(&self) -> &str;

  /// Flat payload keys this form owns. Must be disjoint from every other
  /// form's keys.
  fn keys(&self) -> Vec<String>;

  fn values(&self) -> SubFormValues;

  /// Empty when the form is valid.
  fn errors(&self) -> Vec<FieldError>;

  fn set(&mut self, key: &str, value: &str) -> Result<()>;

  /// Replace the backing state with this form's share of `canonical`.
  fn load(&mut self, canonical: &Payload);
}

/// A sub-form over a fixed set of flat fields.
#[derive(Debug, Clone)]
pub struct FieldForm {
  label:  String,
  values: Record,
  rules:  FieldRules,
}

impl FieldForm {
  pub fn new<I, K>(label: impl Into<String>, keys: I) -> Self
  where
    I: IntoIterator<Item = K>,
    K: Into<String>,
  {
    Self {
      label:  label.into(),
      values: Record::blank(keys),
      rules:  FieldRules::default(),
    }
  }

  pub fn with_rules(mut self, rules: FieldRules) -> Self {
    self.rules = rules;
    self
  }

  /// Seed values from a full payload.
  pub fn loaded(mut self, payload: &Payload) -> Self {
    self.load(payload);
    self
  }
}

impl SubForm for FieldForm {
  fn label(&self) -> &str { &self.label }

  fn keys(&self) -> Vec<String> { self.values.keys().map(str::to_owned).collect() }

  fn values(&self) -> SubFormValues { SubFormValues::Fields(self.values.clone()) }

  fn errors(&self) -> Vec<FieldError> { self.rules.validate(&self.values) }

  fn set(&mut self, key: &str, value: &str) -> Result<()> { self.values.set(key, value) }

  fn load(&mut self, canonical: &Payload) {
    self.values = canonical.fields.project(self.keys());
  }
}

/// Checkbox list of courses that may be shown on the CV.
#[derive(Debug, Clone)]
pub struct CourseSelectionForm {
  label:     String,
  selection: BTreeMap<String, bool>,
}

impl CourseSelectionForm {
  /// `courses` lists every selectable course; those in `visible` start
  /// checked.
  pub fn new(
    label: impl Into<String>,
    courses: impl IntoIterator<Item = i64>,
    visible: &[i64],
  ) -> Self {
    let mut selection: BTreeMap<String, bool> = courses
      .into_iter()
      .map(|id| (id.to_string(), visible.contains(&id)))
      .collect();
    for id in visible {
      selection.insert(id.to_string(), true);
    }
    Self { label: label.into(), selection }
  }
}

impl SubForm for CourseSelectionForm {
  fn label(&self) -> &str { &self.label }

  fn keys(&self) -> Vec<String> { Vec::new() }

  fn values(&self) -> SubFormValues { SubFormValues::Selection(self.selection.clone()) }

  /// Checked entries whose id is not an integer.
  fn errors(&self) -> Vec<FieldError> {
    self
      .selection
      .iter()
      .filter(|(id, visible)| **visible && id.trim().parse::<i64>().is_err())
      .map(|(id, _)| FieldError {
        key:     id.clone(),
        message: COURSE_ID_INVALID.to_owned(),
      })
      .collect()
  }

  fn set(&mut self, key: &str, value: &str) -> Result<()> {
    let visible = matches!(value, "true" | "1" | "yes" | "on");
    self.selection.insert(key.to_owned(), visible);
    Ok(())
  }

  fn load(&mut self, canonical: &Payload) {
    for visible in self.selection.values_mut() {
      *visible = false;
    }
    for id in &canonical.visible_courses {
      self.selection.insert(id.to_string(), true);
    }
  }
}

/// Ids of the checked courses, ascending. Order carries no meaning.
pub fn visible_courses(selection: &BTreeMap<String, bool>) -> Result<Vec<i64>> {
  let ids: BTreeSet<i64> = selection
    .iter()
    .filter(|(_, visible)| **visible)
    .map(|(id, _)| {
      id.trim()
        .parse::<i64>()
        .map_err(|_| Error::InvalidCourseId(id.clone()))
    })
    .collect::<Result<_>>()?;
  Ok(ids.into_iter().collect())
}

// ─── Transient flag ──────────────────────────────────────────────────────────

/// A UI flag that reads `true` for a fixed hold after being raised, then
/// clears by itself. Measured on tokio's clock.
#[derive(Debug, Clone)]
pub struct TransientFlag {
  hold:      Duration,
  raised_at: Option<Instant>,
}

impl TransientFlag {
  pub fn new(hold: Duration) -> Self { Self { hold, raised_at: None } }

  pub fn raise(&mut self) { self.raised_at = Some(Instant::now()); }

  pub fn is_raised(&self) -> bool {
    self.raised_at.is_some_and(|at| at.elapsed() < self.hold)
  }
}

// ─── Aggregator ──────────────────────────────────────────────────────────────

/// Outcome of [`MultiFormAggregator::validate_all`].
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
  /// `(sub-form label, error)` for every failure across every sub-form.
  pub errors: Vec<(String, FieldError)>,
}

impl ValidationReport {
  pub fn is_valid(&self) -> bool { self.errors.is_empty() }
}

/// Composes the CV sub-forms for one resume and submits them as a unit.
pub struct MultiFormAggregator<R, N> {
  resume_id:         String,
  remote:            R,
  notifier:          N,
  forms:             Vec<Box<dyn SubForm>>,
  validation_failed: TransientFlag,
}

impl<R: ResumeService, N: Notifier> MultiFormAggregator<R, N> {
  pub fn new(resume_id: impl Into<String>, remote: R, notifier: N) -> Self {
    Self {
      resume_id: resume_id.into(),
      remote,
      notifier,
      forms: Vec::new(),
      validation_failed: TransientFlag::new(VALIDATION_ALERT_HOLD),
    }
  }

  /// Register a sub-form. Fails if any of its keys is already owned by a
  /// registered form.
  pub fn add_form(&mut self, form: impl SubForm + 'static) -> Result<()> {
    for key in form.keys() {
      if self.forms.iter().any(|f| f.keys().contains(&key)) {
        return Err(Error::OverlappingKeys(key));
      }
    }
    self.forms.push(Box::new(form));
    Ok(())
  }

  pub fn remote(&self) -> &R { &self.remote }

  pub fn form_mut(&mut self, label: &str) -> Option<&mut (dyn SubForm + 'static)> {
    self
      .forms
      .iter_mut()
      .find(|f| f.label() == label)
      .map(|f| &mut **f)
  }

  /// Route a field write to whichever sub-form owns `key`.
  pub fn set_field(&mut self, key: &str, value: &str) -> Result<()> {
    let form = self
      .forms
      .iter_mut()
      .find(|f| f.keys().iter().any(|k| k == key))
      .ok_or_else(|| Error::UnknownField(key.to_owned()))?;
    form.set(key, value)
  }

  /// Check every sub-form; nothing short-circuits. A failure raises the
  /// transient alert flag.
  pub fn validate_all(&mut self) -> ValidationReport {
    let errors: Vec<_> = self
      .forms
      .iter()
      .flat_map(|form| {
        let label = form.label().to_owned();
        form.errors().into_iter().map(move |e| (label.clone(), e))
      })
      .collect();

    if !errors.is_empty() {
      warn!(errors = errors.len(), "cv validation failed");
      self.validation_failed.raise();
    }
    ValidationReport { errors }
  }

  pub fn validation_failed(&self) -> bool { self.validation_failed.is_raised() }

  /// The alert text while the validation flag is up.
  pub fn validation_alert(&self) -> Option<&'static str> {
    self.validation_failed().then_some(VALIDATION_ALERT)
  }

  /// Merge every sub-form into one payload.
  pub fn collect_payload(&self) -> Result<Payload> {
    let mut payload = Payload::default();
    let mut courses = BTreeSet::new();
    for form in &self.forms {
      match form.values() {
        SubFormValues::Fields(record) => payload.fields.merge(record),
        SubFormValues::Selection(selection) => {
          courses.extend(visible_courses(&selection)?);
        }
      }
    }
    payload.visible_courses = courses.into_iter().collect();
    Ok(payload)
  }

  /// Validate, merge, map through `transform`, send, then redistribute the
  /// canonical response into the sub-forms.
  ///
  /// Nothing is sent when validation fails. A remote failure propagates
  /// unchanged and leaves every sub-form as it was.
  pub async fn submit<F>(&mut self, transform: F) -> Result<Payload>
  where
    F: FnOnce(Payload) -> Payload,
  {
    let report = self.validate_all();
    if !report.is_valid() {
      return Err(Error::Validation(report.errors.len()));
    }

    let payload = transform(self.collect_payload()?);
    let canonical = self
      .remote
      .save_resume(&self.resume_id, &payload)
      .await
      .map_err(|e| {
        warn!(resume = %self.resume_id, error = %e, "saving resume failed");
        Error::remote(e)
      })?;

    for form in &mut self.forms {
      form.load(&canonical);
    }
    info!(resume = %self.resume_id, "resume saved");
    self.notifier.success(SUBMIT_SUCCESS);
    Ok(canonical)
  }
}
