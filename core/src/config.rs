use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const APP_DIR_NAME: &str = "friend-reminder";

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("failed to read config {path}: {reason}")]
	Read { path: String, reason: String },

	#[error("failed to parse config {path}: {reason}")]
	Parse { path: String, reason: String },
}

/// Where things live on disk. Every field is optional in the TOML file.
///
/// ```toml
/// data_dir = "/home/me/.local/share/friend-reminder"
/// backup_dir = "/home/me/Documents/friend-backups"
/// log_level = "debug"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
	/// Key-value store directory.
	pub data_dir: PathBuf,
	/// App-private directory export files are written to.
	pub backup_dir: PathBuf,
	pub log_dir: PathBuf,
	pub log_level: String,
}

impl Default for Config {
	fn default() -> Self {
		Self::rooted_at(default_root())
	}
}

impl Config {
	/// All directories under `root`.
	pub fn rooted_at(root: impl AsRef<Path>) -> Self {
		let root = root.as_ref();
		Self {
			data_dir: root.join("data"),
			backup_dir: root.join("backups"),
			log_dir: root.join("logs"),
			log_level: default_log_level(),
		}
	}

	/// Defaults when `path` is `None`, otherwise the file on top of defaults.
	pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
		let Some(path) = path else {
			return Ok(Self::default());
		};

		let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
			path: path.display().to_string(),
			reason: e.to_string(),
		})?;
		Self::from_toml(&text).map_err(|reason| ConfigError::Parse {
			path: path.display().to_string(),
			reason,
		})
	}

	pub fn from_toml(text: &str) -> Result<Self, String> {
		toml::from_str(text).map_err(|e| e.to_string())
	}
}

fn default_root() -> PathBuf {
	dirs::data_dir()
		.unwrap_or_else(|| PathBuf::from("."))
		.join(APP_DIR_NAME)
}

fn default_log_level() -> String {
	"info".to_string()
}
