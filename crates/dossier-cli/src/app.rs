//! Command implementations. Each one loads state through the client, drives a
//! core controller and prints the outcome.

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use dossier_client::ApiClient;
use dossier_core::{
  Error,
  contacts::{
    ContactsRemote, filled_contacts, load_contacts_controller, needs_email_confirmation,
  },
  cv,
  form::{Payload, VALIDATION_ALERT},
  remote::{MessagingService, ResumeService},
  thread::{MARKDOWN_LABEL, Role, Thread, UnreadMessageNotifier, count_unread},
};
use serde::Deserialize;

use crate::console::ConsoleNotifier;

/// Split `key=value` arguments.
pub fn parse_assignments(raw: &[String]) -> Result<Vec<(String, String)>> {
  raw
    .iter()
    .map(|item| {
      let (key, value) = item
        .split_once('=')
        .with_context(|| format!("expected KEY=VALUE, got {item:?}"))?;
      Ok((key.trim().to_owned(), value.to_owned()))
    })
    .collect()
}

// ─── Contacts ────────────────────────────────────────────────────────────────

pub async fn show_contacts(client: ApiClient, github_id: &str) -> Result<()> {
  let card = load_contacts_controller(client, github_id).await?;
  let entries = filled_contacts(card.saved());
  if entries.is_empty() {
    println!("No contacts filled in.");
  }
  for entry in entries {
    println!("{:<12} {}", entry.name, entry.value);
  }
  Ok(())
}

pub async fn edit_contacts(
  client: ApiClient,
  github_id: &str,
  edits: &[(String, String)],
) -> Result<()> {
  let mut card = load_contacts_controller(client, github_id).await?;
  card.begin_edit();
  for (key, value) in edits {
    card.set_field(key, value.as_str())?;
  }

  let errors = card.validate();
  if !errors.is_empty() {
    for error in &errors {
      eprintln!("{error}");
    }
    bail!("contacts not saved: {} invalid field(s)", errors.len());
  }

  let connections = card.remote().connections().await?;
  let offer_confirmation = needs_email_confirmation(&connections, card.is_editing());

  let outcome = match card.save().await {
    Ok(_) => {
      println!("Contacts saved.");
      Ok(())
    }
    Err(Error::NothingToSave) => {
      println!("Nothing changed.");
      Ok(())
    }
    Err(Error::Rejected) => bail!("the server refused the update"),
    Err(e) => Err(e.into()),
  };
  if offer_confirmation {
    println!(
      "E-mail is not confirmed. Run `dossier contacts confirm-email {github_id}` to get a link."
    );
  }
  outcome
}

pub async fn confirm_email(client: ApiClient, github_id: &str) -> Result<()> {
  ContactsRemote::new(client, github_id)
    .send_confirmation_email()
    .await?;
  println!("Confirmation e-mail sent.");
  Ok(())
}

// ─── CV ──────────────────────────────────────────────────────────────────────

/// Edits file for `dossier cv save`.
///
/// ```toml
/// [fields]
/// name = "Ann"
///
/// [courses]
/// "3" = true
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct CvEdits {
  #[serde(default)]
  pub fields:  BTreeMap<String, String>,
  #[serde(default)]
  pub courses: BTreeMap<String, bool>,
}

fn print_payload(payload: &Payload) {
  for (key, value) in payload.fields.iter().filter(|(_, v)| !v.is_empty()) {
    println!("{key:<16} {value}");
  }
  let courses: Vec<_> = payload.visible_courses.iter().map(i64::to_string).collect();
  println!("{:<16} {}", "visibleCourses", courses.join(", "));
}

pub async fn show_cv(client: ApiClient, github_id: &str) -> Result<()> {
  let payload = client.get_resume(github_id).await?;
  print_payload(&payload);
  Ok(())
}

pub async fn save_cv(client: ApiClient, github_id: &str, edits: CvEdits) -> Result<()> {
  let loaded = client.get_resume(github_id).await?;

  // Offer every course already visible plus any the edits mention.
  let mut courses = loaded.visible_courses.clone();
  for id in edits.courses.keys() {
    let id = id
      .trim()
      .parse::<i64>()
      .with_context(|| format!("course id {id:?} is not an integer"))?;
    courses.push(id);
  }
  courses.sort_unstable();
  courses.dedup();

  let mut editor = cv::cv_aggregator(github_id, client, ConsoleNotifier, &loaded, &courses)?;
  for (key, value) in &edits.fields {
    editor.set_field(key, value)?;
  }
  if let Some(selection) = editor.form_mut(cv::VISIBLE_COURSES) {
    for (id, visible) in &edits.courses {
      selection.set(id, if *visible { "true" } else { "false" })?;
    }
  }

  match editor.submit(cv::transform_fields).await {
    Ok(canonical) => {
      print_payload(&canonical);
      Ok(())
    }
    Err(Error::Validation(count)) => {
      for (label, error) in editor.validate_all().errors {
        eprintln!("[{label}] {error}");
      }
      bail!("{VALIDATION_ALERT} ({count} invalid field(s))")
    }
    Err(e) => Err(e.into()),
  }
}

// ─── Review threads ──────────────────────────────────────────────────────────

fn print_thread(thread: &Thread, viewer: Role) {
  let unread = count_unread(&thread.messages, viewer, thread.last_read_at);
  for message in &thread.messages {
    let content = message
      .content
      .strip_prefix(MARKDOWN_LABEL)
      .unwrap_or(&message.content);
    println!(
      "{} [{}] {}",
      message.timestamp.format("%Y-%m-%d %H:%M"),
      message.role,
      content
    );
  }
  if thread.messages.is_empty() {
    println!("No messages yet.");
  } else {
    println!("({} message(s), {unread} unread)", thread.messages.len());
  }
}

pub async fn open_review(
  client: ApiClient,
  session_id: u64,
  course_task_id: Option<u64>,
  role: Role,
) -> Result<()> {
  let Some(task) = course_task_id else {
    println!("Select a task with --task to open its thread.");
    return Ok(());
  };
  let thread = client.get_thread(session_id, task, role).await?;
  print_thread(&thread, role);

  let mut unread = UnreadMessageNotifier::new(session_id, role, client, ConsoleNotifier);
  unread.activate(course_task_id, &thread).await;
  Ok(())
}

pub async fn send_review_message(
  client: ApiClient,
  session_id: u64,
  course_task_id: Option<u64>,
  role: Role,
  content: &str,
) -> Result<()> {
  if course_task_id.is_none() {
    bail!("select a task with --task before sending");
  }
  if content.trim().is_empty() {
    bail!("message is empty");
  }
  let unread = UnreadMessageNotifier::new(session_id, role, client, ConsoleNotifier);
  if !unread.send_message(course_task_id, content).await {
    bail!("message not sent");
  }
  Ok(())
}
