use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;
use ulid::Ulid;

use crate::{
	db::KeyValueStore,
	models::{ContactMethod, Friend, DEFAULT_FREQUENCY_DAYS},
	store::{FriendStore, StoreError},
};

#[derive(Debug, Error)]
pub enum RosterError {
	#[error("please enter a friend's name")]
	EmptyName,

	#[error("frequency must be greater than 0 days")]
	InvalidFrequency,

	#[error("friend not found: {0}")]
	NotFound(String),

	#[error(transparent)]
	Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct NewFriend {
	pub name: String,
	pub contact_method: String,
	pub frequency_days: u32,
}

impl NewFriend {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			contact_method: ContactMethod::default().label().to_string(),
			frequency_days: DEFAULT_FREQUENCY_DAYS,
		}
	}
}

/// Fields the edit form may change. `None` leaves the field alone.
#[derive(Debug, Clone, Default)]
pub struct FriendEdit {
	pub name: Option<String>,
	pub contact_method: Option<String>,
	pub frequency_days: Option<u32>,
}

/// Cached copy of the friend list. Each mutation is applied to a copy, saved,
/// and only then becomes the cached list.
pub struct Roster<'a, S> {
	store: &'a FriendStore<S>,
	friends: Vec<Friend>,
}

impl<'a, S: KeyValueStore> Roster<'a, S> {
	pub async fn open(store: &'a FriendStore<S>) -> Self {
		let friends = store.load().await;
		Self { store, friends }
	}

	pub fn friends(&self) -> &[Friend] {
		&self.friends
	}

	pub fn get(&self, id: &str) -> Option<&Friend> {
		self.friends.iter().find(|f| f.id == id)
	}

	pub async fn add(&mut self, new: NewFriend, now: DateTime<Utc>) -> Result<Friend, RosterError> {
		let name = validate_name(&new.name)?;
		validate_frequency(new.frequency_days)?;

		let friend = Friend {
			id: unique_id(&self.friends),
			name,
			contact_method: new.contact_method,
			frequency_days: new.frequency_days,
			first_contact_date: now,
			last_contact_date: now,
		};

		let mut next = self.friends.clone();
		next.push(friend.clone());
		self.commit(next).await?;

		info!("added friend {} ({})", friend.name, friend.id);
		Ok(friend)
	}

	/// Change name, method or frequency. Dates and id stay as they are.
	pub async fn edit(&mut self, id: &str, edit: FriendEdit) -> Result<Friend, RosterError> {
		let name = edit.name.as_deref().map(validate_name).transpose()?;
		if let Some(days) = edit.frequency_days {
			validate_frequency(days)?;
		}

		let updated = self.update(id, |friend| {
			if let Some(name) = name {
				friend.name = name;
			}
			if let Some(method) = edit.contact_method {
				friend.contact_method = method;
			}
			if let Some(days) = edit.frequency_days {
				friend.frequency_days = days;
			}
		})
		.await?;

		info!("edited friend {}", updated.id);
		Ok(updated)
	}

	/// Only `last_contact_date` moves.
	pub async fn mark_contacted(&mut self, id: &str, now: DateTime<Utc>) -> Result<Friend, RosterError> {
		let updated = self.update(id, |friend| friend.last_contact_date = now).await?;

		info!("marked {} as contacted", updated.id);
		Ok(updated)
	}

	pub async fn delete(&mut self, id: &str) -> Result<Friend, RosterError> {
		let idx = self.position(id)?;
		let mut next = self.friends.clone();
		let removed = next.remove(idx);
		self.commit(next).await?;

		info!("deleted friend {}", removed.id);
		Ok(removed)
	}

	async fn update(&mut self, id: &str, apply: impl FnOnce(&mut Friend)) -> Result<Friend, RosterError> {
		let idx = self.position(id)?;
		let mut next = self.friends.clone();
		apply(&mut next[idx]);
		let updated = next[idx].clone();
		self.commit(next).await?;
		Ok(updated)
	}

	fn position(&self, id: &str) -> Result<usize, RosterError> {
		self.friends
			.iter()
			.position(|f| f.id == id)
			.ok_or_else(|| RosterError::NotFound(id.to_string()))
	}

	async fn commit(&mut self, next: Vec<Friend>) -> Result<(), RosterError> {
		self.store.save(&next).await?;
		self.friends = next;
		Ok(())
	}
}

fn validate_name(name: &str) -> Result<String, RosterError> {
	let trimmed = name.trim();
	if trimmed.is_empty() {
		return Err(RosterError::EmptyName);
	}
	Ok(trimmed.to_string())
}

fn validate_frequency(days: u32) -> Result<(), RosterError> {
	if days == 0 {
		return Err(RosterError::InvalidFrequency);
	}
	Ok(())
}

/// ULIDs lead with the creation timestamp; the random tail keeps them apart
/// within the same millisecond.
fn unique_id(existing: &[Friend]) -> String {
	loop {
		let id = Ulid::new().to_string();
		if !existing.iter().any(|f| f.id == id) {
			return id;
		}
	}
}
