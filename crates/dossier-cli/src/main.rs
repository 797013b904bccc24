//! Profile, CV and review-thread editing from the terminal.
//!
//! # Usage
//!
//! ```text
//! dossier --url http://localhost:8088 contacts show demo
//! dossier contacts edit demo --set telegram=@demo --set email=demo@example.com
//! dossier cv save demo --file edits.toml
//! dossier review open --session 1 --task 1 --role student
//! ```

mod app;
mod console;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dossier_client::{ApiClient, ApiConfig};
use dossier_core::thread::Role;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "dossier", version, about = "Profile, CV and review editing client")]
struct Args {
  /// Path to a TOML config file (url, timeout_secs).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the API (default: http://localhost:8088).
  #[arg(long)]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Profile contacts card.
  #[command(subcommand)]
  Contacts(ContactsCommand),
  /// CV editor.
  #[command(subcommand)]
  Cv(CvCommand),
  /// Cross-check review threads.
  #[command(subcommand)]
  Review(ReviewCommand),
}

#[derive(Subcommand, Debug)]
enum ContactsCommand {
  /// Print the filled-in contacts.
  Show { github_id: String },
  /// Change contacts and save them.
  Edit {
    github_id: String,
    /// `key=value`, repeatable. Keys: epamEmail, email, telegram, phone,
    /// skype, whatsApp, notes, linkedIn.
    #[arg(long = "set", value_name = "KEY=VALUE", required = true)]
    set: Vec<String>,
  },
  /// Resend the e-mail confirmation link.
  ConfirmEmail { github_id: String },
}

#[derive(Subcommand, Debug)]
enum CvCommand {
  /// Print the stored CV.
  Show { github_id: String },
  /// Apply edits from a TOML file (`[fields]`, `[courses]`) and submit.
  Save {
    github_id: String,
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
  },
}

#[derive(Subcommand, Debug)]
enum ReviewCommand {
  /// Show a review thread and acknowledge unread messages.
  Open {
    #[command(flatten)]
    thread: ThreadArgs,
  },
  /// Post a message to a review thread.
  Send {
    #[command(flatten)]
    thread: ThreadArgs,
    content: String,
  },
}

#[derive(clap::Args, Debug)]
struct ThreadArgs {
  #[arg(long)]
  session: u64,
  /// Course task id; without it nothing is acknowledged or sent.
  #[arg(long)]
  task: Option<u64>,
  /// Viewing role: student, reviewer or mentor.
  #[arg(long, default_value = "student")]
  role: Role,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional config file and `DOSSIER_*` environment.
#[derive(Deserialize, Default)]
struct ConfigFile {
  url:          Option<String>,
  timeout_secs: Option<u64>,
}

fn load_config(path: Option<&PathBuf>) -> Result<ConfigFile> {
  let mut builder = config::Config::builder();
  if let Some(path) = path {
    builder = builder.add_source(config::File::from(path.as_path()).required(true));
  }
  builder
    .add_source(config::Environment::with_prefix("DOSSIER"))
    .build()
    .context("reading configuration")?
    .try_deserialize()
    .context("parsing configuration")
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();
  let file_cfg = load_config(args.config.as_ref())?;

  // CLI flags override config file and environment, which override defaults.
  let mut api_config = ApiConfig::new(
    args
      .url
      .or(file_cfg.url)
      .unwrap_or_else(|| "http://localhost:8088".to_string()),
  );
  if let Some(secs) = file_cfg.timeout_secs {
    api_config.timeout_secs = secs;
  }

  let client = ApiClient::new(api_config).context("building HTTP client")?;

  match args.command {
    Command::Contacts(ContactsCommand::Show { github_id }) => {
      app::show_contacts(client, &github_id).await
    }
    Command::Contacts(ContactsCommand::Edit { github_id, set }) => {
      let edits = app::parse_assignments(&set)?;
      app::edit_contacts(client, &github_id, &edits).await
    }
    Command::Contacts(ContactsCommand::ConfirmEmail { github_id }) => {
      app::confirm_email(client, &github_id).await
    }
    Command::Cv(CvCommand::Show { github_id }) => app::show_cv(client, &github_id).await,
    Command::Cv(CvCommand::Save { github_id, file }) => {
      let raw = std::fs::read_to_string(&file)
        .with_context(|| format!("reading {}", file.display()))?;
      let edits: app::CvEdits = toml::from_str(&raw).context("parsing CV edits")?;
      app::save_cv(client, &github_id, edits).await
    }
    Command::Review(ReviewCommand::Open { thread }) => {
      app::open_review(client, thread.session, thread.task, thread.role).await
    }
    Command::Review(ReviewCommand::Send { thread, content }) => {
      app::send_review_message(client, thread.session, thread.task, thread.role, &content)
        .await
    }
  }
}
