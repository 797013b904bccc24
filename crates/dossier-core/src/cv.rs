//! CV editor layout: the key partition across sub-forms, default rules, and
//! the field transform applied before submission.

use crate::{
  Result,
  form::{CourseSelectionForm, FieldForm, MultiFormAggregator, Payload},
  record::Record,
  remote::{Notifier, ResumeService},
  rules::{FieldRule, FieldRules},
};

pub const GENERAL_INFO: &str = "general";
pub const CONTACTS: &str = "contacts";
pub const VISIBLE_COURSES: &str = "visibleCourses";

pub const GENERAL_INFO_KEYS: [&str; 10] = [
  "avatarLink",
  "name",
  "desiredPosition",
  "selfIntroLink",
  "startFrom",
  "fullTime",
  "militaryService",
  "englishLevel",
  "notes",
  "locations",
];

pub const CONTACT_KEYS: [&str; 7] = [
  "phone",
  "email",
  "skype",
  "telegram",
  "linkedin",
  "githubUsername",
  "website",
];

const NOTES_MAX: usize = 1500;

pub fn general_info_rules() -> FieldRules {
  FieldRules::new()
    .with("name", FieldRule::required("Please enter your name"))
    .with("desiredPosition", FieldRule::required("Please enter desired position"))
    .with("notes", FieldRule::max_length(NOTES_MAX, "Notes are too long"))
}

pub fn contact_rules() -> FieldRules {
  FieldRules::new().with("email", FieldRule::email("Email is not valid"))
}

/// A resume split along the sub-form partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CvParts {
  pub general:         Record,
  pub contacts:        Record,
  pub visible_courses: Vec<i64>,
}

pub fn split_for_forms(payload: &Payload) -> CvParts {
  let mut visible_courses = payload.visible_courses.clone();
  visible_courses.sort_unstable();
  visible_courses.dedup();
  CvParts {
    general: payload.fields.project(GENERAL_INFO_KEYS),
    contacts: payload.fields.project(CONTACT_KEYS),
    visible_courses,
  }
}

/// Trim every value before it goes over the wire.
pub fn transform_fields(payload: Payload) -> Payload {
  Payload {
    fields:          payload
      .fields
      .iter()
      .map(|(k, v)| (k, v.trim()))
      .collect(),
    visible_courses: payload.visible_courses,
  }
}

/// Build the CV aggregator for `github_id`, seeded from `loaded`. `courses`
/// lists every course the student may show.
pub fn cv_aggregator<R: ResumeService, N: Notifier>(
  github_id: &str,
  remote: R,
  notifier: N,
  loaded: &Payload,
  courses: &[i64],
) -> Result<MultiFormAggregator<R, N>> {
  let mut aggregator = MultiFormAggregator::new(github_id, remote, notifier);
  aggregator.add_form(
    FieldForm::new(GENERAL_INFO, GENERAL_INFO_KEYS)
      .with_rules(general_info_rules())
      .loaded(loaded),
  )?;
  aggregator.add_form(
    FieldForm::new(CONTACTS, CONTACT_KEYS)
      .with_rules(contact_rules())
      .loaded(loaded),
  )?;
  aggregator.add_form(CourseSelectionForm::new(
    VISIBLE_COURSES,
    courses.iter().copied(),
    &loaded.visible_courses,
  ))?;
  Ok(aggregator)
}
