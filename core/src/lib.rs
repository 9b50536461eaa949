//! Friend reminder core: the persisted friend list, staleness arithmetic and
//! JSON backup/restore. Front ends drive it through the capability traits in
//! [`platform`].

pub mod config;
pub mod db;
pub mod engine;
pub mod models;
pub mod platform;
pub mod store;

pub use db::{FileKvStore, KeyValueStore, MemoryKvStore};
pub use models::{BackupDocument, BackupInfo, ContactMethod, Friend};
pub use store::FriendStore;
