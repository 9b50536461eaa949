pub mod backup;
pub mod friend;

pub use backup::{BackupDocument, BackupInfo, BACKUP_VERSION};
pub use friend::{
	frequency_label, parse_iso_date, ContactMethod, FrequencyOption, Friend, StoredFriend, DEFAULT_FREQUENCY_DAYS,
	FREQUENCY_OPTIONS,
};
