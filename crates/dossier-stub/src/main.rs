//! Serves the in-memory dossier API stub over HTTP.
//!
//! ```text
//! dossier-stub --port 8088 --demo
//! ```

use std::sync::Arc;

use anyhow::Context as _;
use chrono::{Duration, Utc};
use clap::Parser;
use dossier_core::{
  form::Payload,
  record::Record,
  thread::{Message, Role},
};
use dossier_stub::{StoredThread, StubState};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "In-memory dossier API stub")]
struct Cli {
  #[arg(long, default_value = "127.0.0.1", env = "DOSSIER_STUB_HOST")]
  host: String,

  #[arg(short, long, default_value_t = 8088, env = "DOSSIER_STUB_PORT")]
  port: u16,

  /// Seed a `demo` profile, resume and review thread (session 1, task 1).
  #[arg(long)]
  demo: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let state = if cli.demo { demo_state() } else { StubState::default() };

  let app = dossier_stub::router(Arc::new(state));
  let address = format!("{}:{}", cli.host, cli.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

fn demo_state() -> StubState {
  let contacts: Record = [("email", "demo@example.com"), ("telegram", "@demo")]
    .into_iter()
    .collect();
  let resume = Payload {
    fields:          [
      ("name", "Demo Student"),
      ("desiredPosition", "Junior developer"),
      ("email", "demo@example.com"),
    ]
    .into_iter()
    .collect(),
    visible_courses: vec![1],
  };
  let now = Utc::now();
  let thread = StoredThread {
    messages:  vec![
      Message {
        content:   "Please add tests.".into(),
        role:      Role::Reviewer,
        timestamp: now - Duration::minutes(30),
      },
      Message {
        content:   "Also check the README.".into(),
        role:      Role::Reviewer,
        timestamp: now - Duration::minutes(5),
      },
    ],
    last_read: Default::default(),
  };

  StubState::default()
    .with_profile("demo", contacts)
    .with_resume("demo", resume)
    .with_thread(1, 1, thread)
}
