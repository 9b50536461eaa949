use std::collections::HashSet;

use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};

use super::{map_io_error, BackupError};
use crate::{
	db::KeyValueStore,
	models::{parse_iso_date, BackupDocument, StoredFriend, BACKUP_VERSION},
	platform::{Confirm, FilePicker, Notification, Notifier, Outcome},
	store::{migrate, FriendStore, StoreError},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
	#[error("backup must be a JSON object")]
	NotAnObject,

	#[error("missing or empty field: {0}")]
	MissingField(&'static str),

	#[error("timestamp is not an ISO-8601 date: {0}")]
	BadTimestamp(String),

	#[error("friend #{index}: {reason}")]
	InvalidFriend { index: usize, reason: String },

	#[error("duplicate friend id: {0}")]
	DuplicateId(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
	/// The picker was dismissed.
	Cancelled,
	/// The file was valid but the user said no.
	Declined,
	/// The stored list now holds exactly the backup's friends.
	Imported { count: usize },
}

/// Check the shape of a parsed backup and decode it.
///
/// Nothing is imported unless every friend passes: a present `id`, `name`,
/// `contactMethod` and `lastContactDate`, a numeric `frequencyDays`. Decoding
/// then requires string fields, parseable dates, a positive whole frequency
/// and unique ids. Friends without `firstContactDate` are migrated.
pub fn validate_backup(value: &Value) -> Result<BackupDocument, ValidationError> {
	let Value::Object(root) = value else {
		return Err(ValidationError::NotAnObject);
	};

	let version = match root.get("version") {
		Some(Value::String(v)) if !v.is_empty() => v.clone(),
		_ => return Err(ValidationError::MissingField("version")),
	};
	let timestamp = match root.get("timestamp") {
		Some(Value::String(t)) if !t.is_empty() => {
			parse_iso_date(t).ok_or_else(|| ValidationError::BadTimestamp(t.clone()))?
		}
		_ => return Err(ValidationError::MissingField("timestamp")),
	};
	let Some(Value::Array(entries)) = root.get("friends") else {
		return Err(ValidationError::MissingField("friends"));
	};

	let mut stored = Vec::with_capacity(entries.len());
	let mut seen = HashSet::new();
	for (index, entry) in entries.iter().enumerate() {
		let invalid = |reason: String| ValidationError::InvalidFriend { index, reason };

		for field in ["id", "name", "contactMethod", "lastContactDate"] {
			if !is_truthy(entry.get(field)) {
				return Err(invalid(format!("missing {field}")));
			}
		}
		if !entry.get("frequencyDays").is_some_and(Value::is_number) {
			return Err(invalid("frequencyDays is not a number".into()));
		}

		let friend: StoredFriend = serde_json::from_value(entry.clone()).map_err(|e| invalid(e.to_string()))?;
		if friend.frequency_days == 0 {
			return Err(invalid("frequencyDays must be greater than 0".into()));
		}
		if !seen.insert(friend.id.clone()) {
			return Err(ValidationError::DuplicateId(friend.id));
		}
		stored.push(friend);
	}

	if version != BACKUP_VERSION {
		warn!("backup version {version} differs from {BACKUP_VERSION}; reading it anyway");
	}

	Ok(BackupDocument {
		version,
		timestamp,
		friends: migrate(stored),
	})
}

/// JavaScript-style truthiness; backups have been written by loosely typed
/// front ends.
fn is_truthy(value: Option<&Value>) -> bool {
	match value {
		None | Some(Value::Null) => false,
		Some(Value::Bool(b)) => *b,
		Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
		Some(Value::String(s)) => !s.is_empty(),
		Some(Value::Array(_)) | Some(Value::Object(_)) => true,
	}
}

pub fn confirmation_message(document: &BackupDocument) -> String {
	format!(
		"This backup contains {} friends and was created on {}.\n\nImporting will replace all current data. Continue?",
		document.friends.len(),
		document.timestamp.format("%Y-%m-%d"),
	)
}

/// Replace the stored list with the document's friends. No merge.
pub async fn import_document<S: KeyValueStore>(
	store: &FriendStore<S>,
	document: &BackupDocument,
) -> Result<usize, StoreError> {
	store.save(&document.friends).await?;
	info!("imported {} friends from backup of {}", document.friends.len(), document.timestamp);
	Ok(document.friends.len())
}

/// Pick a file, validate it, confirm with the user, then replace the list.
///
/// Nothing is written before the confirmation, and a failed write leaves the
/// previous list in place.
pub async fn import_backup<S, P, C, N>(
	store: &FriendStore<S>,
	picker: &P,
	confirm: &C,
	notifier: &N,
) -> Result<ImportOutcome, BackupError>
where
	S: KeyValueStore,
	P: FilePicker,
	C: Confirm,
	N: Notifier,
{
	let document = match read_backup(picker).await {
		Ok(Outcome::Ok(document)) => document,
		Ok(Outcome::Cancelled) => return Ok(ImportOutcome::Cancelled),
		Err(BackupError::Invalid(e)) => {
			warn!("rejected backup file: {e}");
			notifier.notify(Notification::error(
				"Invalid Backup File",
				"The selected file is not a valid Friend Reminder backup.",
			));
			return Err(BackupError::Invalid(e));
		}
		Err(e) => {
			error!("error importing data: {e}");
			notifier.notify(Notification::error(
				"Import Failed",
				"Failed to read backup file. Please ensure the file is valid.",
			));
			return Err(e);
		}
	};

	match confirm.confirm("Import Backup", &confirmation_message(&document)).await? {
		Outcome::Ok(()) => {}
		Outcome::Cancelled => {
			info!("import declined");
			return Ok(ImportOutcome::Declined);
		}
	}

	match import_document(store, &document).await {
		Ok(count) => {
			notifier.notify(Notification::info(
				"Import Successful",
				format!("Successfully imported {count} friends."),
			));
			Ok(ImportOutcome::Imported { count })
		}
		Err(e) => {
			error!("error importing data: {e}");
			notifier.notify(Notification::error(
				"Import Failed",
				"Failed to import backup data. Please try again.",
			));
			Err(e.into())
		}
	}
}

async fn read_backup<P: FilePicker>(picker: &P) -> Result<Outcome<BackupDocument>, BackupError> {
	let path = match picker.pick_file().await? {
		Outcome::Ok(path) => path,
		Outcome::Cancelled => {
			info!("import cancelled at file picker");
			return Ok(Outcome::Cancelled);
		}
	};

	let content = tokio::fs::read_to_string(&path)
		.await
		.map_err(|e| map_io_error(e, &path))?;
	let value: Value = serde_json::from_str(&content).map_err(|e| BackupError::Parse(e.to_string()))?;

	Ok(Outcome::Ok(validate_backup(&value)?))
}
