use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Friend;

/// Schema revision written into every exported file.
pub const BACKUP_VERSION: &str = "1.0.0";

/// Versioned snapshot of the whole friend list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackupDocument {
	pub version: String,
	pub timestamp: DateTime<Utc>,
	pub friends: Vec<Friend>,
}

impl BackupDocument {
	pub fn new(friends: Vec<Friend>, timestamp: DateTime<Utc>) -> Self {
		Self {
			version: BACKUP_VERSION.to_string(),
			timestamp,
			friends,
		}
	}
}

/// Summary shown next to the backup/restore actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupInfo {
	pub friends_count: usize,
	/// Not tracked yet; always `None`.
	pub last_backup_date: Option<DateTime<Utc>>,
}
