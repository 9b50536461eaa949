use std::{io, path::PathBuf};

use console::{style, Term};
use friend_reminder_core::platform::{
	Confirm, FilePicker, Notification, NotificationLevel, Notifier, Outcome, PlatformError,
};

/// Alerts go to stderr so `list --json` output stays clean.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
	fn notify(&self, notification: Notification) {
		let title = match notification.level {
			NotificationLevel::Info => style(notification.title).cyan().bold(),
			NotificationLevel::Error => style(notification.title).red().bold(),
		};
		let _ = Term::stderr().write_line(&format!("{title}\n{}", notification.message));
	}
}

/// y/N prompt on the terminal. `assume_yes` answers for the user.
pub struct TerminalConfirm {
	pub assume_yes: bool,
}

impl Confirm for TerminalConfirm {
	async fn confirm(&self, title: &str, message: &str) -> Result<Outcome<()>, PlatformError> {
		let term = Term::stderr();
		term.write_line(&format!("{}\n{message}", style(title).bold()))
			.map_err(|e| PlatformError::Dialog(e.to_string()))?;

		if self.assume_yes {
			return Ok(Outcome::Ok(()));
		}

		let answer = prompt("[y/N] ")
			.await
			.map_err(|e| PlatformError::Dialog(e.to_string()))?;
		match answer.trim().to_ascii_lowercase().as_str() {
			"y" | "yes" => Ok(Outcome::Ok(())),
			_ => Ok(Outcome::Cancelled),
		}
	}
}

/// Uses the path given on the command line, or asks for one.
/// An empty answer cancels.
pub struct TerminalPicker {
	pub preset: Option<PathBuf>,
}

impl FilePicker for TerminalPicker {
	async fn pick_file(&self) -> Result<Outcome<PathBuf>, PlatformError> {
		if let Some(path) = &self.preset {
			return Ok(Outcome::Ok(path.clone()));
		}

		let answer = prompt("Backup file to import (empty to cancel): ")
			.await
			.map_err(|e| PlatformError::Picker(e.to_string()))?;
		let answer = answer.trim();
		if answer.is_empty() {
			return Ok(Outcome::Cancelled);
		}
		Ok(Outcome::Ok(PathBuf::from(answer)))
	}
}

/// Native open dialog.
#[cfg(feature = "desktop")]
pub struct DialogPicker;

#[cfg(feature = "desktop")]
impl FilePicker for DialogPicker {
	async fn pick_file(&self) -> Result<Outcome<PathBuf>, PlatformError> {
		let picked = rfd::AsyncFileDialog::new()
			.set_title("Choose a Friend Reminder backup")
			.add_filter("JSON", &["json"])
			.pick_file()
			.await;

		Ok(match picked {
			Some(handle) => Outcome::Ok(handle.path().to_path_buf()),
			None => Outcome::Cancelled,
		})
	}
}

/// Blocking terminal read, kept off the runtime's worker.
async fn prompt(question: &str) -> io::Result<String> {
	let question = question.to_string();
	tokio::task::spawn_blocking(move || {
		let term = Term::stderr();
		term.write_str(&question)?;
		term.read_line()
	})
	.await
	.map_err(io::Error::other)?
}
