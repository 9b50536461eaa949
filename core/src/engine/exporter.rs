use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{error, info};

use super::{map_io_error, BackupError};
use crate::{
	db::KeyValueStore,
	models::{BackupDocument, Friend},
	platform::{Notification, Notifier, ShareSheet},
	store::FriendStore,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
	/// The list is empty; nothing was written.
	NothingToExport,
	/// Written and handed to the share sheet.
	Shared(PathBuf),
	/// Written; no share sheet, so the location was shown instead.
	Saved(PathBuf),
}

/// `friend-reminder-backup-2024-06-15T12-00-00-000Z.json`
pub fn backup_file_name(now: DateTime<Utc>) -> String {
	let stamp = now
		.to_rfc3339_opts(SecondsFormat::Millis, true)
		.replace([':', '.'], "-");
	format!("friend-reminder-backup-{stamp}.json")
}

/// Snapshot the friend list into `backup_dir` and offer it for sharing.
///
/// Read-only with respect to the store. Failures are reported through
/// `notifier` as well as returned.
pub async fn export_backup<S, Sh, N>(
	store: &FriendStore<S>,
	backup_dir: &Path,
	share: &Sh,
	notifier: &N,
	now: DateTime<Utc>,
) -> Result<ExportOutcome, BackupError>
where
	S: KeyValueStore,
	Sh: ShareSheet,
	N: Notifier,
{
	let friends = store.load().await;
	if friends.is_empty() {
		notifier.notify(Notification::info(
			"No Data to Export",
			"You don't have any friends added yet. Add some friends first before creating a backup.",
		));
		return Ok(ExportOutcome::NothingToExport);
	}

	match write_and_share(friends, backup_dir, share, notifier, now).await {
		Ok(outcome) => Ok(outcome),
		Err(e) => {
			error!("error exporting data: {e}");
			notifier.notify(Notification::error(
				"Export Failed",
				"Failed to create backup. Please try again.",
			));
			Err(e)
		}
	}
}

async fn write_and_share<Sh: ShareSheet, N: Notifier>(
	friends: Vec<Friend>,
	backup_dir: &Path,
	share: &Sh,
	notifier: &N,
	now: DateTime<Utc>,
) -> Result<ExportOutcome, BackupError> {
	let count = friends.len();
	let path = write_backup(BackupDocument::new(friends, now), backup_dir).await?;
	info!("exported {count} friends to {}", path.display());

	if share.is_available().await {
		share.share(&path).await?;
		return Ok(ExportOutcome::Shared(path));
	}

	notifier.notify(Notification::info(
		"Backup Created",
		format!(
			"Backup saved to: {}\n\nNote: Sharing is not available on this device.",
			path.display()
		),
	));
	Ok(ExportOutcome::Saved(path))
}

/// Pretty-print `document` to a fresh timestamped file in `backup_dir`.
pub async fn write_backup(document: BackupDocument, backup_dir: &Path) -> Result<PathBuf, BackupError> {
	let json = serde_json::to_string_pretty(&document).map_err(|e| BackupError::Serialize(e.to_string()))?;

	tokio::fs::create_dir_all(backup_dir)
		.await
		.map_err(|e| map_io_error(e, backup_dir))?;

	let path = backup_dir.join(backup_file_name(document.timestamp));
	tokio::fs::write(&path, json)
		.await
		.map_err(|e| map_io_error(e, &path))?;

	Ok(path)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		db::MemoryKvStore,
		platform::{NoShareSheet, NotificationLevel, NotificationLog},
	};

	fn now() -> DateTime<Utc> {
		"2024-06-15T12:34:56.789Z".parse().unwrap()
	}

	fn friend(id: &str) -> Friend {
		Friend {
			id: id.into(),
			name: "Ada".into(),
			contact_method: "Email".into(),
			frequency_days: 14,
			first_contact_date: now(),
			last_contact_date: now(),
		}
	}

	#[test]
	fn file_name_has_no_colons_or_dots_in_stamp() {
		assert_eq!(
			backup_file_name(now()),
			"friend-reminder-backup-2024-06-15T12-34-56-789Z.json"
		);
	}

	#[tokio::test]
	async fn empty_list_writes_nothing() {
		let tmp = tempfile::tempdir().unwrap();
		let backup_dir = tmp.path().join("backups");
		let store = FriendStore::new(MemoryKvStore::new());
		let log = NotificationLog::new();

		let outcome = export_backup(&store, &backup_dir, &NoShareSheet, &log, now()).await.unwrap();

		assert_eq!(outcome, ExportOutcome::NothingToExport);
		assert!(!backup_dir.exists());
		assert_eq!(log.titles(), vec!["No Data to Export"]);
	}

	#[tokio::test]
	async fn without_share_sheet_shows_location() {
		let tmp = tempfile::tempdir().unwrap();
		let store = FriendStore::new(MemoryKvStore::new());
		store.save(&[friend("a")]).await.unwrap();
		let log = NotificationLog::new();

		let outcome = export_backup(&store, tmp.path(), &NoShareSheet, &log, now()).await.unwrap();

		let ExportOutcome::Saved(path) = &outcome else {
			panic!("expected Saved, got {outcome:?}");
		};
		assert!(path.starts_with(tmp.path()));
		let note = log.last().unwrap();
		assert_eq!(note.level, NotificationLevel::Info);
		assert!(note.message.contains(&path.display().to_string()));
	}

	#[tokio::test]
	async fn file_is_pretty_printed_document() {
		let tmp = tempfile::tempdir().unwrap();
		let path = write_backup(BackupDocument::new(vec![friend("a")], now()), tmp.path())
			.await
			.unwrap();

		let text = std::fs::read_to_string(&path).unwrap();
		assert!(text.contains("\n  \"version\": \"1.0.0\""));

		let value: serde_json::Value = serde_json::from_str(&text).unwrap();
		assert_eq!(value["friends"][0]["id"], "a");
		assert_eq!(value["friends"][0]["frequencyDays"], 14);
		let stamp: DateTime<Utc> = value["timestamp"].as_str().unwrap().parse().unwrap();
		assert_eq!(stamp, now());
	}

	#[tokio::test]
	async fn unwritable_dir_fails_and_notifies() {
		let tmp = tempfile::tempdir().unwrap();
		let blocker = tmp.path().join("not-a-dir");
		std::fs::write(&blocker, "x").unwrap();

		let store = FriendStore::new(MemoryKvStore::new());
		store.save(&[friend("a")]).await.unwrap();
		let log = NotificationLog::new();

		let err = export_backup(&store, &blocker, &NoShareSheet, &log, now()).await.unwrap_err();

		assert!(matches!(err, BackupError::IoError(_)));
		assert_eq!(log.titles(), vec!["Export Failed"]);
		assert_eq!(store.load().await, vec![friend("a")]);
	}
}
