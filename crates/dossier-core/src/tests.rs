//! Scenario tests for the controllers against in-memory collaborators.

use std::{
  collections::BTreeMap,
  sync::{
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
  },
  time::Duration,
};

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use crate::{
  Error,
  contacts::{
    ConnectionValue, Connections, UpdateProfileInfoDto, load_contacts_controller,
    needs_email_confirmation,
  },
  cv::{self, CvParts},
  editable::{EditableRecordController, can_save},
  form::{
    COURSE_ID_INVALID, CourseSelectionForm, FieldForm, MultiFormAggregator, Payload,
    SubForm, visible_courses,
  },
  record::Record,
  remote::{MessagingService, Notifier, ProfileService, RecordRemote, ResumeService},
  rules::{FieldRule, FieldRules},
  thread::{Activation, Message, NewMessage, Role, Thread, UnreadMessageNotifier, count_unread},
};

// ─── Fakes ───────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("fake remote failure")]
struct FakeError;

fn record(pairs: &[(&str, &str)]) -> Record { pairs.iter().copied().collect() }

/// Echoes the draft back, or fails when `fail` is set.
#[derive(Default)]
struct EchoRemote {
  fail:  AtomicBool,
  calls: AtomicUsize,
}

impl RecordRemote for EchoRemote {
  async fn save_record(&self, draft: &Record) -> crate::Result<Record> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    if self.fail.load(Ordering::SeqCst) {
      return Err(Error::remote(FakeError));
    }
    Ok(draft.clone())
  }
}

struct FakeProfile {
  contacts:    Mutex<Record>,
  connections: Connections,
  accept:      bool,
}

impl FakeProfile {
  fn new(contacts: Record, accept: bool) -> Self {
    Self { contacts: Mutex::new(contacts), connections: Connections::new(), accept }
  }
}

impl ProfileService for FakeProfile {
  type Error = FakeError;

  async fn get_contacts(&self, _github_id: &str) -> Result<Record, FakeError> {
    Ok(self.contacts.lock().unwrap().clone())
  }

  async fn update_profile(
    &self,
    _github_id: &str,
    update: &UpdateProfileInfoDto,
  ) -> Result<bool, FakeError> {
    if self.accept {
      update.apply_to(&mut self.contacts.lock().unwrap());
    }
    Ok(self.accept)
  }

  async fn get_connections(&self, _github_id: &str) -> Result<Connections, FakeError> {
    Ok(self.connections.clone())
  }

  async fn send_confirmation_email(&self, _github_id: &str) -> Result<(), FakeError> {
    Ok(())
  }
}

#[derive(Default)]
struct FakeResume {
  fail:  bool,
  saved: Mutex<Vec<Payload>>,
}

impl ResumeService for FakeResume {
  type Error = FakeError;

  async fn get_resume(&self, _github_id: &str) -> Result<Payload, FakeError> {
    Ok(Payload::default())
  }

  async fn save_resume(&self, _github_id: &str, data: &Payload) -> Result<Payload, FakeError> {
    if self.fail {
      return Err(FakeError);
    }
    self.saved.lock().unwrap().push(data.clone());
    // The server normalises names to upper case.
    let mut canonical = data.clone();
    if let Some(name) = data.fields.get("name") {
      canonical.fields.insert("name", name.to_uppercase());
    }
    Ok(canonical)
  }
}

#[derive(Default)]
struct FakeMessaging {
  fail_ack: bool,
  acks:     AtomicUsize,
  posted:   Mutex<Vec<NewMessage>>,
}

impl MessagingService for FakeMessaging {
  type Error = FakeError;

  async fn get_thread(&self, _: u64, _: u64, _: Role) -> Result<Thread, FakeError> {
    Ok(Thread::default())
  }

  async fn post_message(&self, _: u64, _: u64, message: &NewMessage) -> Result<(), FakeError> {
    self.posted.lock().unwrap().push(message.clone());
    Ok(())
  }

  async fn acknowledge_read(&self, _: u64, _: u64, _: Role) -> Result<(), FakeError> {
    self.acks.fetch_add(1, Ordering::SeqCst);
    if self.fail_ack { Err(FakeError) } else { Ok(()) }
  }
}

#[derive(Default)]
struct RecordingNotifier {
  seen: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingNotifier {
  fn seen(&self) -> Vec<(&'static str, String)> { self.seen.lock().unwrap().clone() }
}

impl Notifier for RecordingNotifier {
  fn info(&self, message: &str) { self.seen.lock().unwrap().push(("info", message.into())) }

  fn success(&self, message: &str) {
    self.seen.lock().unwrap().push(("success", message.into()))
  }

  fn error(&self, message: &str) { self.seen.lock().unwrap().push(("error", message.into())) }
}

// ─── EditableRecordController ────────────────────────────────────────────────

fn contacts_controller() -> EditableRecordController<EchoRemote> {
  EditableRecordController::new(
    record(&[("telegram", ""), ("email", "")]),
    EchoRemote::default(),
  )
}

#[test]
fn edit_enables_save_and_cancel_restores() {
  let mut c = contacts_controller();
  c.begin_edit();
  c.set_field("email", "a@b.com").unwrap();
  assert_eq!(c.draft(), &record(&[("telegram", ""), ("email", "a@b.com")]));
  assert!(c.can_save());

  c.cancel();
  assert_eq!(c.draft(), c.saved());
  assert!(!c.can_save());
  assert!(!c.is_editing());
}

#[test]
fn cancel_is_idempotent() {
  let mut once = contacts_controller();
  once.begin_edit();
  once.set_field("telegram", "@ann").unwrap();
  once.set_validation_error(true);
  once.cancel();

  let mut twice = contacts_controller();
  twice.begin_edit();
  twice.set_field("telegram", "@ann").unwrap();
  twice.set_validation_error(true);
  twice.cancel();
  twice.cancel();

  assert_eq!(once.draft(), twice.draft());
  assert_eq!(once.saved(), twice.saved());
  assert_eq!(once.is_editing(), twice.is_editing());
  assert_eq!(once.has_validation_error(), twice.has_validation_error());
}

#[test]
fn typing_then_reverting_does_not_enable_save() {
  let mut c = contacts_controller();
  c.begin_edit();
  c.set_field("telegram", "@a").unwrap();
  assert!(c.can_save());
  c.set_field("telegram", "").unwrap();
  assert!(!c.can_save());
}

#[test]
fn validation_error_blocks_save() {
  let mut c = contacts_controller();
  c.begin_edit();
  c.set_field("email", "a@b.com").unwrap();
  c.set_validation_error(true);
  assert!(!c.can_save());
  c.set_validation_error(false);
  assert!(c.can_save());
}

#[test]
fn begin_edit_while_editing_keeps_draft() {
  let mut c = contacts_controller();
  c.begin_edit();
  c.set_field("email", "a@b.com").unwrap();
  c.begin_edit();
  assert_eq!(c.draft().get("email"), Some("a@b.com"));
}

#[test]
fn writes_need_edit_mode_and_known_keys() {
  let mut c = contacts_controller();
  assert!(matches!(c.set_field("email", "x"), Err(Error::NotEditing)));
  c.begin_edit();
  assert!(matches!(c.set_field("fax", "x"), Err(Error::UnknownField(_))));
  assert!(c.draft().same_shape(c.saved()));
}

#[tokio::test]
async fn save_replaces_snapshot_and_leaves_edit_mode() {
  let mut c = contacts_controller();
  c.begin_edit();
  c.set_field("telegram", "@ann").unwrap();

  let saved = c.save().await.unwrap();
  assert_eq!(saved.get("telegram"), Some("@ann"));
  assert_eq!(c.saved(), &saved);
  assert_eq!(c.draft(), &saved);
  assert!(!c.is_editing());
  assert!(!c.can_save());
}

#[tokio::test]
async fn failed_save_keeps_draft_and_edit_mode() {
  let mut c = contacts_controller();
  c.remote().fail.store(true, Ordering::SeqCst);
  c.begin_edit();
  c.set_field("telegram", "@ann").unwrap();

  assert!(matches!(c.save().await, Err(Error::Remote(_))));
  assert!(c.is_editing());
  assert_eq!(c.draft().get("telegram"), Some("@ann"));
  assert_eq!(c.saved().get("telegram"), Some(""));
  assert_eq!(c.remote().calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn save_without_changes_never_calls_remote() {
  let mut c = contacts_controller();
  c.begin_edit();
  assert!(matches!(c.save().await, Err(Error::NothingToSave)));
  assert_eq!(c.remote().calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn contacts_card_validates_and_saves_through_profile() {
  let profile = FakeProfile::new(record(&[("telegram", "@ann")]), true);
  let mut c = load_contacts_controller(profile, "ann").await.unwrap();
  assert_eq!(c.saved().len(), 8);

  c.begin_edit();
  c.set_field("epamEmail", "ann@gmail.com").unwrap();
  let errors = c.validate();
  assert_eq!(errors.len(), 1);
  assert!(c.has_validation_error());
  assert!(!c.can_save());

  c.set_field("epamEmail", "ann@epam.com").unwrap();
  assert!(c.validate().is_empty());
  c.save().await.unwrap();

  assert_eq!(c.saved().get("epamEmail"), Some("ann@epam.com"));
  let remote = c.remote();
  assert_eq!(remote.github_id(), "ann");
  let stored = remote.profile().contacts.lock().unwrap().clone();
  assert_eq!(stored.get("epamEmail"), Some("ann@epam.com"));
}

#[tokio::test]
async fn rejected_profile_update_keeps_draft() {
  let profile = FakeProfile::new(Record::new(), false);
  let mut c = load_contacts_controller(profile, "ann").await.unwrap();
  c.begin_edit();
  c.set_field("phone", "123").unwrap();

  assert!(matches!(c.save().await, Err(Error::Rejected)));
  assert!(c.is_editing());
  assert_eq!(c.draft().get("phone"), Some("123"));
  assert_eq!(c.saved().get("phone"), Some(""));
}

#[tokio::test]
async fn email_confirmation_offered_until_channel_enabled() {
  let unconfirmed = FakeProfile::new(record(&[("email", "ann@example.com")]), true);
  let mut card = load_contacts_controller(unconfirmed, "ann").await.unwrap();
  let connections = card.remote().connections().await.unwrap();
  assert!(!needs_email_confirmation(&connections, card.is_editing()));
  card.begin_edit();
  assert!(needs_email_confirmation(&connections, card.is_editing()));

  let mut confirmed = FakeProfile::new(record(&[("email", "ann@example.com")]), true);
  confirmed.connections.insert("email".into(), ConnectionValue {
    value:             "ann@example.com".into(),
    enabled:           true,
    last_link_sent_at: None,
  });
  let mut card = load_contacts_controller(confirmed, "ann").await.unwrap();
  card.begin_edit();
  let connections = card.remote().connections().await.unwrap();
  assert!(!needs_email_confirmation(&connections, card.is_editing()));
}

type Pairs = Vec<(String, String)>;

/// A key set in sorted order alongside the same pairs shuffled.
fn saved_and_shuffled() -> impl Strategy<Value = (Pairs, Pairs)> {
  prop::collection::btree_map("[a-z]{1,8}", "[a-z0-9@.]{0,6}", 1..8).prop_flat_map(|fields| {
    let pairs: Pairs = fields.into_iter().collect();
    (Just(pairs.clone()), Just(pairs).prop_shuffle())
  })
}

proptest! {
  #[test]
  fn can_save_ignores_key_order(
    (saved, shuffled) in saved_and_shuffled(),
    changed in any::<bool>(),
    extra in prop::option::of("[A-Z]{1,4}"),
    has_error in any::<bool>(),
  ) {
    let saved: Record = saved.into_iter().collect();
    let mut draft: Record = shuffled.into_iter().collect();
    prop_assert_eq!(&draft, &saved);

    if changed {
      let key = draft.keys().next().unwrap().to_owned();
      let value = format!("{}!", draft.get(&key).unwrap());
      draft.set(&key, value).unwrap();
    }
    // Upper-case keys never collide with the generated ones.
    if let Some(key) = &extra {
      draft.insert(key.as_str(), "");
    }
    prop_assert_eq!(draft.same_shape(&saved), extra.is_none());
    prop_assert_eq!(
      can_save(&draft, &saved, has_error),
      (changed || extra.is_some()) && !has_error
    );
  }

  #[test]
  fn collected_payload_splits_back_into_its_forms(
    general in prop::collection::vec("[ -~]{0,12}", cv::GENERAL_INFO_KEYS.len()),
    contacts in prop::collection::vec("[ -~]{0,12}", cv::CONTACT_KEYS.len()),
    courses in prop::collection::btree_map(0i64..50, any::<bool>(), 0..10),
  ) {
    let ids: Vec<i64> = courses.keys().copied().collect();
    let mut editor = cv::cv_aggregator(
      "ann",
      FakeResume::default(),
      RecordingNotifier::default(),
      &Payload::default(),
      &ids,
    )
    .unwrap();

    for (key, value) in cv::GENERAL_INFO_KEYS.iter().zip(&general) {
      editor.set_field(key, value).unwrap();
    }
    for (key, value) in cv::CONTACT_KEYS.iter().zip(&contacts) {
      editor.set_field(key, value).unwrap();
    }
    let selection = editor.form_mut(cv::VISIBLE_COURSES).unwrap();
    for (id, visible) in &courses {
      selection.set(&id.to_string(), if *visible { "true" } else { "false" }).unwrap();
    }

    let parts = cv::split_for_forms(&editor.collect_payload().unwrap());
    let expected_general: Record =
      cv::GENERAL_INFO_KEYS.iter().copied().zip(general.iter().map(String::as_str)).collect();
    let expected_contacts: Record =
      cv::CONTACT_KEYS.iter().copied().zip(contacts.iter().map(String::as_str)).collect();
    let checked: Vec<i64> =
      courses.iter().filter(|(_, visible)| **visible).map(|(id, _)| *id).collect();
    prop_assert_eq!(parts.general, expected_general);
    prop_assert_eq!(parts.contacts, expected_contacts);
    prop_assert_eq!(parts.visible_courses, checked);
  }
}

// ─── MultiFormAggregator ─────────────────────────────────────────────────────

fn loaded_cv() -> Payload {
  Payload {
    fields:          record(&[
      ("name", "Ann"),
      ("desiredPosition", "Backend developer"),
      ("email", "ann@example.com"),
      ("telegram", "@ann"),
    ]),
    visible_courses: vec![3, 1],
  }
}

#[tokio::test(start_paused = true)]
async fn submit_with_invalid_form_sends_nothing_and_flags_for_two_seconds() {
  let remote = FakeResume::default();
  let notifier = RecordingNotifier::default();
  let mut editor = cv::cv_aggregator("ann", remote, notifier, &loaded_cv(), &[1, 2, 3]).unwrap();
  editor.set_field("email", "not-an-email").unwrap();

  let res = editor.submit(cv::transform_fields).await;
  assert!(matches!(res, Err(Error::Validation(1))));
  assert!(editor.remote().saved.lock().unwrap().is_empty());
  assert!(editor.validation_failed());
  assert_eq!(editor.validation_alert(), Some(crate::form::VALIDATION_ALERT));

  tokio::time::advance(Duration::from_millis(1999)).await;
  assert!(editor.validation_failed());
  tokio::time::advance(Duration::from_millis(1)).await;
  assert!(!editor.validation_failed());
}

#[tokio::test]
async fn validate_all_reports_every_failing_form() {
  let remote = FakeResume::default();
  let mut editor = MultiFormAggregator::new("ann", remote, RecordingNotifier::default());
  let name_rules = FieldRules::new().with("name", FieldRule::required("Name"));
  let email_rules = FieldRules::new().with("email", FieldRule::required("Email"));
  editor.add_form(FieldForm::new("a", ["name"]).with_rules(name_rules)).unwrap();
  editor.add_form(FieldForm::new("b", ["email"]).with_rules(email_rules)).unwrap();

  let report = editor.validate_all();
  let labels: Vec<_> = report.errors.iter().map(|(label, _)| label.as_str()).collect();
  assert_eq!(labels, ["a", "b"]);
  assert!(matches!(editor.submit(|p| p).await, Err(Error::Validation(2))));
  assert!(editor.remote().saved.lock().unwrap().is_empty());
}

#[tokio::test]
async fn padded_values_pass_validation_and_are_sent_trimmed() {
  let mut editor = cv::cv_aggregator(
    "ann",
    FakeResume::default(),
    RecordingNotifier::default(),
    &loaded_cv(),
    &[1, 3],
  )
  .unwrap();
  editor.set_field("email", "  ann@example.com ").unwrap();
  editor.set_field("desiredPosition", " Backend developer ").unwrap();

  let canonical = editor.submit(cv::transform_fields).await.unwrap();
  let sent = editor.remote().saved.lock().unwrap().clone();
  assert_eq!(sent.len(), 1);
  assert_eq!(sent[0].fields.get("email"), Some("ann@example.com"));
  assert_eq!(sent[0].fields.get("desiredPosition"), Some("Backend developer"));
  assert_eq!(canonical.fields.get("email"), Some("ann@example.com"));
}

#[tokio::test]
async fn non_integer_course_blocks_submit_locally() {
  let mut editor =
    MultiFormAggregator::new("ann", FakeResume::default(), RecordingNotifier::default());
  editor.add_form(CourseSelectionForm::new(cv::VISIBLE_COURSES, [1, 2], &[1])).unwrap();
  let selection = editor.form_mut(cv::VISIBLE_COURSES).unwrap();
  selection.set("intro", "true").unwrap();
  selection.set("draft", "false").unwrap();

  let errors = selection.errors();
  assert_eq!(errors.len(), 1);
  assert_eq!(errors[0].key, "intro");
  assert_eq!(errors[0].message, COURSE_ID_INVALID);

  assert!(matches!(editor.submit(|p| p).await, Err(Error::Validation(1))));
  assert!(editor.remote().saved.lock().unwrap().is_empty());
}

#[test]
fn course_selection_keeps_only_checked_ids() {
  let selection: BTreeMap<String, bool> = [("1", true), ("2", false), ("3", true)]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), v))
    .collect();
  let mut ids = visible_courses(&selection).unwrap();
  ids.sort();
  assert_eq!(ids, [1, 3]);

  let bad: BTreeMap<String, bool> = [("one".to_owned(), true)].into_iter().collect();
  assert!(matches!(visible_courses(&bad), Err(Error::InvalidCourseId(id)) if id == "one"));
}

#[test]
fn payload_round_trips_through_the_form_partition() {
  let editor = cv::cv_aggregator(
    "ann",
    FakeResume::default(),
    RecordingNotifier::default(),
    &loaded_cv(),
    &[1, 2, 3],
  )
  .unwrap();

  let payload = editor.collect_payload().unwrap();
  assert_eq!(payload.visible_courses, [1, 3]);

  let CvParts { general, contacts, visible_courses } = cv::split_for_forms(&payload);
  let originals = cv::split_for_forms(&loaded_cv());
  assert_eq!(general, originals.general);
  assert_eq!(contacts, originals.contacts);
  assert_eq!(visible_courses, originals.visible_courses);
}

#[test]
fn overlapping_partitions_are_rejected() {
  let mut editor =
    MultiFormAggregator::new("ann", FakeResume::default(), RecordingNotifier::default());
  editor.add_form(FieldForm::new("general", ["name", "email"])).unwrap();
  let res = editor.add_form(FieldForm::new("contacts", ["email"]));
  assert!(matches!(res, Err(Error::OverlappingKeys(k)) if k == "email"));
}

#[tokio::test]
async fn submit_redistributes_canonical_record() {
  let mut editor =
    MultiFormAggregator::new("ann", FakeResume::default(), RecordingNotifier::default());
  let general = FieldForm::new(cv::GENERAL_INFO, ["name"]).loaded(&loaded_cv());
  editor.add_form(general).unwrap();
  editor.add_form(CourseSelectionForm::new(cv::VISIBLE_COURSES, [1, 2, 3], &[1])).unwrap();
  editor.form_mut(cv::VISIBLE_COURSES).unwrap().set("2", "true").unwrap();
  editor.set_field("name", "  ann  ").unwrap();

  let canonical = editor.submit(cv::transform_fields).await.unwrap();
  let sent = editor.remote().saved.lock().unwrap().clone();
  assert_eq!(sent[0].fields.get("name"), Some("ann"));
  assert_eq!(canonical.fields.get("name"), Some("ANN"));
  assert_eq!(canonical.visible_courses, [1, 2]);

  let payload = editor.collect_payload().unwrap();
  assert_eq!(payload.fields.get("name"), Some("ANN"));
  assert_eq!(payload.visible_courses, [1, 2]);
  assert!(!editor.validation_failed());
}

#[tokio::test]
async fn failed_submit_leaves_forms_untouched() {
  let remote = FakeResume { fail: true, ..Default::default() };
  let mut editor =
    cv::cv_aggregator("ann", remote, RecordingNotifier::default(), &loaded_cv(), &[1, 3]).unwrap();
  editor.set_field("name", "Anna").unwrap();

  assert!(matches!(editor.submit(cv::transform_fields).await, Err(Error::Remote(_))));
  let payload = editor.collect_payload().unwrap();
  assert_eq!(payload.fields.get("name"), Some("Anna"));
}

// ─── UnreadMessageNotifier ───────────────────────────────────────────────────

fn message(role: Role, minute: u32) -> Message {
  Message {
    content:   format!("{role} at {minute}"),
    role,
    timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap(),
  }
}

#[test]
fn count_unread_only_counts_newer_messages_from_others() {
  let messages = [message(Role::Student, 10), message(Role::Mentor, 20)];
  let last_ack = Utc.with_ymd_and_hms(2024, 5, 1, 12, 5, 0).unwrap();
  assert_eq!(count_unread(&messages, Role::Mentor, Some(last_ack)), 1);

  let later_ack = Utc.with_ymd_and_hms(2024, 5, 1, 12, 15, 0).unwrap();
  assert_eq!(count_unread(&messages, Role::Mentor, Some(later_ack)), 0);
  assert_eq!(count_unread(&messages, Role::Student, None), 1);
}

#[tokio::test]
async fn activation_fires_once_per_key() {
  let notifier = std::sync::Arc::new(RecordingNotifier::default());
  let mut unread =
    UnreadMessageNotifier::new(7, Role::Student, FakeMessaging::default(), notifier.clone());
  let thread = Thread {
    messages:     vec![message(Role::Reviewer, 1), message(Role::Reviewer, 2)],
    last_read_at: None,
  };

  assert_eq!(
    unread.activate(Some(42), &thread).await,
    Activation::Notified { acknowledged: true }
  );
  assert_eq!(unread.activate(Some(42), &thread).await, Activation::Unchanged);
  assert_eq!(unread.messaging().acks.load(Ordering::SeqCst), 1);
  assert_eq!(notifier.seen(), [("info", "You have 2 unread messages".to_owned())]);
}

#[tokio::test]
async fn missing_task_or_nothing_unread_is_a_silent_no_op() {
  let notifier = std::sync::Arc::new(RecordingNotifier::default());
  let mut unread =
    UnreadMessageNotifier::new(7, Role::Student, FakeMessaging::default(), notifier.clone());
  let thread = Thread {
    messages:     vec![message(Role::Reviewer, 1)],
    last_read_at: None,
  };
  assert_eq!(unread.activate(None, &thread).await, Activation::Skipped);
  assert_eq!(unread.activate(Some(1), &Thread::default()).await, Activation::Skipped);
  assert_eq!(unread.messaging().acks.load(Ordering::SeqCst), 0);
  assert!(notifier.seen().is_empty());
}

#[tokio::test]
async fn failed_acknowledgement_is_reported_not_retried() {
  let notifier = std::sync::Arc::new(RecordingNotifier::default());
  let messaging = FakeMessaging { fail_ack: true, ..Default::default() };
  let mut unread = UnreadMessageNotifier::new(7, Role::Reviewer, messaging, notifier.clone());
  let thread = Thread {
    messages:     vec![message(Role::Student, 1)],
    last_read_at: None,
  };

  assert_eq!(
    unread.activate(Some(3), &thread).await,
    Activation::Notified { acknowledged: false }
  );
  assert_eq!(unread.activate(Some(3), &thread).await, Activation::Unchanged);
  assert_eq!(unread.messaging().acks.load(Ordering::SeqCst), 1);
  assert_eq!(
    notifier.seen(),
    [
      ("info", "You have 1 unread message".to_owned()),
      ("error", crate::thread::REMOTE_FAILURE.to_owned()),
    ]
  );
}

#[tokio::test]
async fn send_message_prefixes_markdown_label() {
  let notifier = std::sync::Arc::new(RecordingNotifier::default());
  let unread =
    UnreadMessageNotifier::new(7, Role::Student, FakeMessaging::default(), notifier.clone());

  assert!(!unread.send_message(None, "hi").await);
  assert!(unread.send_message(Some(3), "hi").await);

  let posted = unread.messaging().posted.lock().unwrap().clone();
  assert_eq!(posted, [NewMessage {
    content: "[markdown]\nhi".into(),
    role:    Role::Student,
  }]);
  assert_eq!(notifier.seen(), [("success", crate::thread::MESSAGE_SENT.to_owned())]);
}
