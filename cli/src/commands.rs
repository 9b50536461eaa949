use std::process::ExitCode;

use anyhow::Context;
use chrono::Utc;
use console::{style, StyledObject};
use friend_reminder_core::{
	config::Config,
	db::FileKvStore,
	engine::{
		exporter::{export_backup, ExportOutcome},
		importer::{import_backup, ImportOutcome},
		roster::{FriendEdit, NewFriend, Roster},
		staleness::{sort_by_urgency, ReminderRow, Urgency},
	},
	models::frequency_label,
	platform::{Confirm, FilePicker, NoShareSheet},
	store::FriendStore,
};
use tracing::info;

use crate::{
	terminal::{TerminalConfirm, TerminalNotifier, TerminalPicker},
	Command,
};

const REPLACE_WARNING: &str = "Importing a backup will replace all your current friend data. \
This action cannot be undone.\n\nDo you want to continue?";

pub(crate) async fn run(command: Command, config: &Config) -> anyhow::Result<ExitCode> {
	let kv = FileKvStore::open(&config.data_dir)
		.await
		.with_context(|| format!("opening data dir {}", config.data_dir.display()))?;
	let store = FriendStore::new(kv);

	match command {
		Command::List { json } => list(&store, json).await?,
		Command::Add { name, method, every } => {
			let mut roster = Roster::open(&store).await;
			let new = NewFriend {
				name,
				contact_method: method.label().to_string(),
				frequency_days: every,
			};
			let friend = roster.add(new, Utc::now()).await?;
			println!("Added {} ({})", friend.name, style(&friend.id).dim());
		}
		Command::Edit { id, name, method, every } => {
			let mut roster = Roster::open(&store).await;
			let edit = FriendEdit {
				name,
				contact_method: method.map(|m| m.label().to_string()),
				frequency_days: every,
			};
			let friend = roster.edit(&id, edit).await?;
			println!(
				"Updated {}: {} · {}",
				friend.name,
				friend.contact_method,
				frequency_label(friend.frequency_days)
			);
		}
		Command::Done { id } => {
			let mut roster = Roster::open(&store).await;
			let friend = roster.mark_contacted(&id, Utc::now()).await?;
			println!("Marked {} as contacted", friend.name);
		}
		Command::Delete { id, yes } => {
			return delete(&store, &id, &TerminalConfirm { assume_yes: yes }).await;
		}
		Command::Export => {
			let outcome =
				export_backup(&store, &config.backup_dir, &NoShareSheet, &TerminalNotifier, Utc::now()).await;
			return Ok(match outcome {
				Ok(ExportOutcome::Shared(path)) | Ok(ExportOutcome::Saved(path)) => {
					info!("backup written to {}", path.display());
					ExitCode::SUCCESS
				}
				Ok(ExportOutcome::NothingToExport) => ExitCode::SUCCESS,
				// Already reported through the notifier.
				Err(_) => ExitCode::FAILURE,
			});
		}
		Command::Import { file, yes } => {
			let confirm = TerminalConfirm { assume_yes: yes };
			return match file {
				Some(path) => import(&store, &TerminalPicker { preset: Some(path) }, &confirm, false).await,
				#[cfg(feature = "desktop")]
				None => import(&store, &crate::terminal::DialogPicker, &confirm, true).await,
				#[cfg(not(feature = "desktop"))]
				None => import(&store, &TerminalPicker { preset: None }, &confirm, true).await,
			};
		}
		Command::Info => {
			let info = store.backup_info().await;
			println!("Friends: {}", info.friends_count);
			match info.last_backup_date {
				Some(date) => println!("Last backup: {}", date.format("%Y-%m-%d")),
				None => println!("Last backup: unknown"),
			}
		}
	}

	Ok(ExitCode::SUCCESS)
}

async fn list(store: &FriendStore<FileKvStore>, json: bool) -> anyhow::Result<()> {
	let friends = store.load().await;
	let rows = sort_by_urgency(&friends, Utc::now());

	if json {
		println!("{}", serde_json::to_string_pretty(&rows)?);
		return Ok(());
	}

	if rows.is_empty() {
		println!("No friends yet. Add one with `friend-reminder add <name>`.");
		return Ok(());
	}

	let width = rows.iter().map(|r| r.text.len()).max().unwrap_or(0);
	for row in &rows {
		println!(
			"{}  {}  {} · {}  {}",
			colorize(row, format!("{:<width$}", row.text)),
			style(&row.friend.name).bold(),
			row.friend.contact_method,
			frequency_label(row.friend.frequency_days),
			style(&row.friend.id).dim(),
		);
	}
	Ok(())
}

fn colorize(row: &ReminderRow, text: String) -> StyledObject<String> {
	match row.urgency {
		Urgency::Urgent => style(text).red().bold(),
		Urgency::Due => style(text).color256(208),
		Urgency::Warning => style(text).yellow(),
		Urgency::OnTrack => style(text).green(),
	}
}

async fn delete<C: Confirm>(store: &FriendStore<FileKvStore>, id: &str, confirm: &C) -> anyhow::Result<ExitCode> {
	let mut roster = Roster::open(store).await;
	let name = roster
		.get(id)
		.map(|f| f.name.clone())
		.with_context(|| format!("friend not found: {id}"))?;

	let question = format!("Are you sure you want to remove {name} from your list?");
	if confirm.confirm("Delete Friend", &question).await?.is_cancelled() {
		println!("Nothing deleted.");
		return Ok(ExitCode::SUCCESS);
	}

	roster.delete(id).await?;
	println!("Deleted {name}");
	Ok(ExitCode::SUCCESS)
}

/// `warn_first` puts the replace-everything warning in front of the picker,
/// for when no file was named up front.
async fn import<P: FilePicker, C: Confirm>(
	store: &FriendStore<FileKvStore>,
	picker: &P,
	confirm: &C,
	warn_first: bool,
) -> anyhow::Result<ExitCode> {
	if warn_first && confirm.confirm("Import Backup", REPLACE_WARNING).await?.is_cancelled() {
		println!("Nothing imported.");
		return Ok(ExitCode::SUCCESS);
	}

	Ok(match import_backup(store, picker, confirm, &TerminalNotifier).await {
		Ok(ImportOutcome::Imported { .. }) => ExitCode::SUCCESS,
		Ok(ImportOutcome::Cancelled) => {
			println!("Import cancelled.");
			ExitCode::SUCCESS
		}
		Ok(ImportOutcome::Declined) => {
			println!("Nothing imported.");
			ExitCode::SUCCESS
		}
		Err(_) => ExitCode::FAILURE,
	})
}

#[cfg(test)]
mod tests {
	use std::{cell::Cell, path::PathBuf};

	use friend_reminder_core::platform::{Outcome, PlatformError};

	use super::*;

	struct CountingPicker {
		path: Option<PathBuf>,
		calls: Cell<usize>,
	}

	impl CountingPicker {
		fn new(path: Option<PathBuf>) -> Self {
			Self { path, calls: Cell::new(0) }
		}
	}

	impl FilePicker for CountingPicker {
		async fn pick_file(&self) -> Result<Outcome<PathBuf>, PlatformError> {
			self.calls.set(self.calls.get() + 1);
			Ok(match &self.path {
				Some(path) => Outcome::Ok(path.clone()),
				None => Outcome::Cancelled,
			})
		}
	}

	struct Answer(bool);

	impl Confirm for Answer {
		async fn confirm(&self, _title: &str, _message: &str) -> Result<Outcome<()>, PlatformError> {
			Ok(if self.0 { Outcome::Ok(()) } else { Outcome::Cancelled })
		}
	}

	async fn store_with_one(dir: &std::path::Path) -> (FriendStore<FileKvStore>, String) {
		let store = FriendStore::new(FileKvStore::open(dir).await.unwrap());
		let mut roster = Roster::open(&store).await;
		let friend = roster.add(NewFriend::new("Ada"), Utc::now()).await.unwrap();
		(store, friend.id)
	}

	#[tokio::test]
	async fn declined_delete_keeps_friend() {
		let tmp = tempfile::tempdir().unwrap();
		let (store, id) = store_with_one(tmp.path()).await;

		delete(&store, &id, &Answer(false)).await.unwrap();

		assert_eq!(store.load().await.len(), 1);
	}

	#[tokio::test]
	async fn confirmed_delete_removes_friend() {
		let tmp = tempfile::tempdir().unwrap();
		let (store, id) = store_with_one(tmp.path()).await;

		delete(&store, &id, &Answer(true)).await.unwrap();

		assert!(store.load().await.is_empty());
	}

	#[tokio::test]
	async fn delete_unknown_id_errors() {
		let tmp = tempfile::tempdir().unwrap();
		let (store, _) = store_with_one(tmp.path()).await;

		assert!(delete(&store, "missing", &Answer(true)).await.is_err());
		assert_eq!(store.load().await.len(), 1);
	}

	#[tokio::test]
	async fn declined_warning_never_opens_picker() {
		let tmp = tempfile::tempdir().unwrap();
		let (store, _) = store_with_one(tmp.path()).await;
		let picker = CountingPicker::new(None);

		import(&store, &picker, &Answer(false), true).await.unwrap();

		assert_eq!(picker.calls.get(), 0);
		assert_eq!(store.load().await.len(), 1);
	}

	#[tokio::test]
	async fn accepted_warning_goes_on_to_import() {
		let tmp = tempfile::tempdir().unwrap();
		let (store, _) = store_with_one(&tmp.path().join("data")).await;
		let backup = tmp.path().join("empty.json");
		std::fs::write(&backup, r#"{"version":"1.0.0","timestamp":"2024-06-15","friends":[]}"#).unwrap();
		let picker = CountingPicker::new(Some(backup));

		import(&store, &picker, &Answer(true), true).await.unwrap();

		assert_eq!(picker.calls.get(), 1);
		assert!(store.load().await.is_empty());
	}
}
