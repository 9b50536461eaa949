use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
	db::{KeyValueStore, KvError},
	models::{BackupInfo, Friend, StoredFriend},
};

/// The single key the whole friend list lives under.
pub const STORAGE_KEY: &str = "friends";

#[derive(Debug, Error)]
pub enum StoreError {
	#[error("storage error: {0}")]
	Kv(#[from] KvError),

	#[error("stored friend list is not valid JSON: {0}")]
	Parse(String),

	#[error("failed to serialize friend list: {0}")]
	Serialize(String),
}

/// Owns the persisted friend list. Every write replaces the whole list.
#[derive(Debug)]
pub struct FriendStore<S> {
	kv: S,
}

impl<S: KeyValueStore> FriendStore<S> {
	pub fn new(kv: S) -> Self {
		Self { kv }
	}

	/// Load the list, migrating old records. Any failure is logged and reads
	/// as an empty list.
	pub async fn load(&self) -> Vec<Friend> {
		match self.try_load().await {
			Ok(friends) => friends,
			Err(e) => {
				error!("error loading friends: {e}");
				Vec::new()
			}
		}
	}

	pub async fn try_load(&self) -> Result<Vec<Friend>, StoreError> {
		let Some(raw) = self.kv.get(STORAGE_KEY).await? else {
			return Ok(Vec::new());
		};

		let stored: Vec<StoredFriend> =
			serde_json::from_str(&raw).map_err(|e| StoreError::Parse(e.to_string()))?;
		let friends = migrate(stored);

		info!("loaded {} friends", friends.len());
		Ok(friends)
	}

	/// Full-replace write of `friends`.
	pub async fn save(&self, friends: &[Friend]) -> Result<(), StoreError> {
		let raw = serde_json::to_string(friends).map_err(|e| StoreError::Serialize(e.to_string()))?;
		self.kv.set(STORAGE_KEY, &raw).await?;

		info!("saved {} friends", friends.len());
		Ok(())
	}

	pub async fn backup_info(&self) -> BackupInfo {
		BackupInfo {
			friends_count: self.load().await.len(),
			last_backup_date: None,
		}
	}
}

/// Bring records written before `firstContactDate` existed up to date.
pub fn migrate(stored: Vec<StoredFriend>) -> Vec<Friend> {
	let outdated = stored.iter().filter(|f| f.needs_migration()).count();
	if outdated > 0 {
		warn!("migrating {outdated} friends without firstContactDate");
	}
	stored.into_iter().map(StoredFriend::migrate).collect()
}

#[cfg(test)]
mod tests {
	use chrono::{DateTime, Utc};

	use super::*;
	use crate::db::MemoryKvStore;

	struct ReadOnlyKv(MemoryKvStore);

	impl KeyValueStore for ReadOnlyKv {
		async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
			self.0.get(key).await
		}

		async fn set(&self, _key: &str, _value: &str) -> Result<(), KvError> {
			Err(KvError::IoError("read-only".into()))
		}

		async fn remove(&self, _key: &str) -> Result<(), KvError> {
			Err(KvError::IoError("read-only".into()))
		}
	}

	fn ts(s: &str) -> DateTime<Utc> {
		s.parse().unwrap()
	}

	fn friend(id: &str) -> Friend {
		Friend {
			id: id.into(),
			name: format!("friend {id}"),
			contact_method: "Email".into(),
			frequency_days: 7,
			first_contact_date: ts("2024-01-01T00:00:00Z"),
			last_contact_date: ts("2024-02-01T00:00:00Z"),
		}
	}

	#[tokio::test]
	async fn empty_store_loads_nothing() {
		let store = FriendStore::new(MemoryKvStore::new());
		assert!(store.load().await.is_empty());
		assert_eq!(store.backup_info().await.friends_count, 0);
	}

	#[tokio::test]
	async fn save_then_load() {
		let store = FriendStore::new(MemoryKvStore::new());
		let friends = vec![friend("a"), friend("b")];

		store.save(&friends).await.unwrap();

		assert_eq!(store.load().await, friends);
		assert_eq!(store.backup_info().await.friends_count, 2);
	}

	#[tokio::test]
	async fn save_replaces_previous_list() {
		let store = FriendStore::new(MemoryKvStore::new());
		store.save(&[friend("a"), friend("b")]).await.unwrap();
		store.save(&[friend("c")]).await.unwrap();

		let ids: Vec<String> = store.load().await.into_iter().map(|f| f.id).collect();
		assert_eq!(ids, vec!["c"]);
	}

	#[tokio::test]
	async fn corrupt_blob_reads_as_empty() {
		let kv = MemoryKvStore::new();
		kv.set(STORAGE_KEY, "{not json").await.unwrap();
		let store = FriendStore::new(kv);

		assert!(store.load().await.is_empty());
		assert!(matches!(store.try_load().await, Err(StoreError::Parse(_))));
	}

	#[tokio::test]
	async fn load_migrates_records_without_first_contact() {
		let kv = MemoryKvStore::new();
		kv.set(
			STORAGE_KEY,
			r#"[{"id":"1","name":"Old","contactMethod":"Email","frequencyDays":3,"lastContactDate":"2024-05-01T08:00:00.000Z"}]"#,
		)
		.await
		.unwrap();
		let store = FriendStore::new(kv);

		let friends = store.load().await;
		assert_eq!(friends.len(), 1);
		assert_eq!(friends[0].first_contact_date, ts("2024-05-01T08:00:00Z"));
		assert_eq!(friends[0].last_contact_date, ts("2024-05-01T08:00:00Z"));
	}

	#[tokio::test]
	async fn failed_save_keeps_old_list() {
		let kv = MemoryKvStore::new();
		let before = vec![friend("a")];
		kv.set(STORAGE_KEY, &serde_json::to_string(&before).unwrap()).await.unwrap();
		let store = FriendStore::new(ReadOnlyKv(kv));

		let err = store.save(&[friend("b")]).await.unwrap_err();
		assert!(matches!(err, StoreError::Kv(_)));
		assert_eq!(store.load().await, before);
	}
}
