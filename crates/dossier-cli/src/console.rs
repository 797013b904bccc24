use dossier_core::remote::Notifier;

/// Prints user-facing notices to the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
  fn info(&self, message: &str) { println!("{message}") }

  fn success(&self, message: &str) { println!("✓ {message}") }

  fn error(&self, message: &str) { eprintln!("error: {message}") }
}
