pub mod exporter;
pub mod importer;
pub mod roster;
pub mod staleness;

use std::io;

use thiserror::Error;

use crate::{engine::importer::ValidationError, platform::PlatformError, store::StoreError};

/// Failure of an export or import run. Cancellation is not an error; see the
/// outcome enums of each flow.
#[derive(Debug, Error)]
pub enum BackupError {
	#[error("I/O error: {0}")]
	IoError(String),

	#[error("failed to serialize backup: {0}")]
	Serialize(String),

	#[error("backup file is not valid JSON: {0}")]
	Parse(String),

	#[error("invalid backup file: {0}")]
	Invalid(#[from] ValidationError),

	#[error(transparent)]
	Store(#[from] StoreError),

	#[error(transparent)]
	Platform(#[from] PlatformError),
}

fn map_io_error(err: io::Error, path: &std::path::Path) -> BackupError {
	BackupError::IoError(format!("{}: {err}", path.display()))
}
