#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Duration, Utc};
use friend_reminder_core::{
    db::{KeyValueStore, KvError, MemoryKvStore},
    models::Friend,
    platform::{Confirm, FilePicker, Outcome, PlatformError, ShareSheet},
};

pub fn now() -> DateTime<Utc> {
    "2024-06-15T12:00:00.000Z".parse().unwrap()
}

pub fn friend(id: &str, name: &str, frequency_days: u32, days_ago: i64) -> Friend {
    let last = now() - Duration::days(days_ago);
    Friend {
        id: id.into(),
        name: name.into(),
        contact_method: "Phone call".into(),
        frequency_days,
        first_contact_date: last - Duration::days(100),
        last_contact_date: last,
    }
}

/// Hands back a fixed path, or cancels.
pub struct ScriptedPicker(pub Option<PathBuf>);

impl FilePicker for ScriptedPicker {
    async fn pick_file(&self) -> Result<Outcome<PathBuf>, PlatformError> {
        Ok(match &self.0 {
            Some(path) => Outcome::Ok(path.clone()),
            None => Outcome::Cancelled,
        })
    }
}

/// Answers every prompt the same way and remembers what it was asked.
pub struct ScriptedConfirm {
    pub accept: bool,
    pub asked: RefCell<Vec<String>>,
}

impl ScriptedConfirm {
    pub fn accepting() -> Self {
        Self { accept: true, asked: RefCell::new(Vec::new()) }
    }

    pub fn declining() -> Self {
        Self { accept: false, asked: RefCell::new(Vec::new()) }
    }
}

impl Confirm for ScriptedConfirm {
    async fn confirm(&self, _title: &str, message: &str) -> Result<Outcome<()>, PlatformError> {
        self.asked.borrow_mut().push(message.to_string());
        Ok(if self.accept { Outcome::Ok(()) } else { Outcome::Cancelled })
    }
}

/// A share sheet that records the files it was handed.
#[derive(Default)]
pub struct RecordingShareSheet {
    pub shared: RefCell<Vec<PathBuf>>,
    pub calls: Cell<usize>,
}

impl ShareSheet for RecordingShareSheet {
    async fn is_available(&self) -> bool {
        true
    }

    async fn share(&self, path: &Path) -> Result<(), PlatformError> {
        self.calls.set(self.calls.get() + 1);
        self.shared.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

/// Reads work, every write fails like a full disk.
pub struct FullDisk(pub MemoryKvStore);

impl KeyValueStore for FullDisk {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        self.0.get(key).await
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), KvError> {
        Err(KvError::IoError("no space left on device".into()))
    }

    async fn remove(&self, _key: &str) -> Result<(), KvError> {
        Err(KvError::IoError("no space left on device".into()))
    }
}
