//! Async HTTP client wrapping the dossier JSON API.

use std::time::Duration;

use dossier_core::{
  contacts::{Connections, UpdateProfileInfoDto},
  form::Payload,
  record::Record,
  remote::{MessagingService, ProfileService, ResumeService},
  thread::{NewMessage, Role, Thread},
};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::{Error, Result};

/// Connection settings for the dossier API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  pub base_url:     String,
  /// Per-request timeout in seconds.
  #[serde(default = "default_timeout")]
  pub timeout_secs: u64,
}

fn default_timeout() -> u64 { 30 }

impl ApiConfig {
  pub fn new(base_url: impl Into<String>) -> Self {
    Self { base_url: base_url.into(), timeout_secs: default_timeout() }
  }
}

/// Async HTTP client for the dossier JSON API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

#[derive(Deserialize)]
struct UpdateResponse {
  updated: bool,
}

#[derive(Serialize)]
struct RoleBody {
  role: Role,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn request(&self, method: Method, path: &str) -> RequestBuilder {
    self.client.request(method, self.url(path))
  }

  /// Send `req` and fail on any non-success status, keeping the server's
  /// error text.
  async fn send(&self, method: &'static str, path: &str, req: RequestBuilder) -> Result<Response> {
    debug!(%method, %path, "request");
    let resp = req.send().await?;
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let message = resp.text().await.unwrap_or_default();
    Err(Error::Status { method, path: path.to_owned(), status, message })
  }

  async fn json<T: DeserializeOwned>(
    &self,
    method: &'static str,
    path: &str,
    req: RequestBuilder,
  ) -> Result<T> {
    Ok(self.send(method, path, req).await?.json().await?)
  }

  fn thread_path(session_id: u64, course_task_id: u64) -> String {
    format!("/sessions/{session_id}/tasks/{course_task_id}/messages")
  }
}

// ── Profile ─────────────────────────────────────────────────────────────────

impl ProfileService for ApiClient {
  type Error = Error;

  /// `GET /api/profile/{github_id}/contacts`
  async fn get_contacts(&self, github_id: &str) -> Result<Record> {
    let path = format!("/profile/{github_id}/contacts");
    self.json("GET", &path, self.request(Method::GET, &path)).await
  }

  /// `PATCH /api/profile/{github_id}`
  async fn update_profile(&self, github_id: &str, update: &UpdateProfileInfoDto) -> Result<bool> {
    let path = format!("/profile/{github_id}");
    let resp: UpdateResponse = self
      .json("PATCH", &path, self.request(Method::PATCH, &path).json(update))
      .await?;
    Ok(resp.updated)
  }

  /// `GET /api/profile/{github_id}/connections`
  async fn get_connections(&self, github_id: &str) -> Result<Connections> {
    let path = format!("/profile/{github_id}/connections");
    self.json("GET", &path, self.request(Method::GET, &path)).await
  }

  /// `POST /api/profile/{github_id}/email-confirmation`
  async fn send_confirmation_email(&self, github_id: &str) -> Result<()> {
    let path = format!("/profile/{github_id}/email-confirmation");
    self.send("POST", &path, self.request(Method::POST, &path)).await?;
    Ok(())
  }
}

// ── Resume ──────────────────────────────────────────────────────────────────

impl ResumeService for ApiClient {
  type Error = Error;

  /// `GET /api/opportunities/{github_id}/resume`
  async fn get_resume(&self, github_id: &str) -> Result<Payload> {
    let path = format!("/opportunities/{github_id}/resume");
    self.json("GET", &path, self.request(Method::GET, &path)).await
  }

  /// `PUT /api/opportunities/{github_id}/resume`
  async fn save_resume(&self, github_id: &str, data: &Payload) -> Result<Payload> {
    let path = format!("/opportunities/{github_id}/resume");
    self
      .json("PUT", &path, self.request(Method::PUT, &path).json(data))
      .await
  }
}

// ── Review messages ─────────────────────────────────────────────────────────

impl MessagingService for ApiClient {
  type Error = Error;

  /// `GET /api/sessions/{id}/tasks/{id}/messages?role=<role>`
  async fn get_thread(&self, session_id: u64, course_task_id: u64, role: Role) -> Result<Thread> {
    let path = Self::thread_path(session_id, course_task_id);
    let req = self
      .request(Method::GET, &path)
      .query(&[("role", role.to_string())]);
    self.json("GET", &path, req).await
  }

  /// `POST /api/sessions/{id}/tasks/{id}/messages`
  async fn post_message(
    &self,
    session_id: u64,
    course_task_id: u64,
    message: &NewMessage,
  ) -> Result<()> {
    let path = Self::thread_path(session_id, course_task_id);
    self
      .send("POST", &path, self.request(Method::POST, &path).json(message))
      .await?;
    Ok(())
  }

  /// `PATCH /api/sessions/{id}/tasks/{id}/messages`
  async fn acknowledge_read(&self, session_id: u64, course_task_id: u64, role: Role) -> Result<()> {
    let path = Self::thread_path(session_id, course_task_id);
    self
      .send("PATCH", &path, self.request(Method::PATCH, &path).json(&RoleBody { role }))
      .await?;
    Ok(())
  }
}
