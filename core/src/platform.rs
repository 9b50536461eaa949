//! External capabilities the backup flows suspend on: a file picker, a share
//! sheet, a confirmation dialog and user-facing alerts. Each front end brings
//! its own implementations.

use std::{
	path::{Path, PathBuf},
	sync::Mutex,
};

use thiserror::Error;

/// Result of a user-driven prompt. `Cancelled` is a voluntary abort, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
	Ok(T),
	Cancelled,
}

impl<T> Outcome<T> {
	pub fn is_cancelled(&self) -> bool {
		matches!(self, Outcome::Cancelled)
	}
}

#[derive(Debug, Error)]
pub enum PlatformError {
	#[error("file picker failed: {0}")]
	Picker(String),

	#[error("share failed: {0}")]
	Share(String),

	#[error("dialog failed: {0}")]
	Dialog(String),
}

pub trait FilePicker {
	async fn pick_file(&self) -> Result<Outcome<PathBuf>, PlatformError>;
}

pub trait ShareSheet {
	async fn is_available(&self) -> bool;

	async fn share(&self, path: &Path) -> Result<(), PlatformError>;
}

/// Ask the user to approve a destructive step. `Ok(())` means approved.
pub trait Confirm {
	async fn confirm(&self, title: &str, message: &str) -> Result<Outcome<()>, PlatformError>;
}

pub trait Notifier {
	fn notify(&self, notification: Notification);
}

/// A platform with nowhere to share files to.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShareSheet;

impl ShareSheet for NoShareSheet {
	async fn is_available(&self) -> bool {
		false
	}

	async fn share(&self, path: &Path) -> Result<(), PlatformError> {
		Err(PlatformError::Share(format!("sharing unavailable for {}", path.display())))
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
	Info,
	Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
	pub level: NotificationLevel,
	pub title: String,
	pub message: String,
}

impl Notification {
	pub fn new(level: NotificationLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			level,
			title: title.into(),
			message: message.into(),
		}
	}

	pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
		Self::new(NotificationLevel::Info, title, message)
	}

	pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
		Self::new(NotificationLevel::Error, title, message)
	}
}

/// Keeps every notification in order, with a running id.
#[derive(Debug, Default)]
pub struct NotificationLog {
	entries: Mutex<Vec<(u32, Notification)>>,
}

impl NotificationLog {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn snapshot(&self) -> Vec<Notification> {
		self.lock().iter().map(|(_, n)| n.clone()).collect()
	}

	pub fn titles(&self) -> Vec<String> {
		self.lock().iter().map(|(_, n)| n.title.clone()).collect()
	}

	pub fn last(&self) -> Option<Notification> {
		self.lock().last().map(|(_, n)| n.clone())
	}

	fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(u32, Notification)>> {
		self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
	}
}

impl Notifier for NotificationLog {
	fn notify(&self, notification: Notification) {
		let mut entries = self.lock();
		let id = entries.last().map(|(id, _)| id + 1).unwrap_or(0);
		entries.push((id, notification));
	}
}
