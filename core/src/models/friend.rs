use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Someone the user wants to stay in touch with.
/// `frequency_days` is the desired gap between two contacts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
	pub id: String,
	pub name: String,
	pub contact_method: String,
	pub frequency_days: u32,
	/// Set once when the friend is added, never touched afterwards.
	pub first_contact_date: DateTime<Utc>,
	pub last_contact_date: DateTime<Utc>,
}

/// A friend as read from storage or a backup file.
///
/// Records written before `firstContactDate` existed don't carry it;
/// [`StoredFriend::migrate`] turns them into the current shape.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredFriend {
	pub id: String,
	pub name: String,
	pub contact_method: String,
	pub frequency_days: u32,
	#[serde(default, deserialize_with = "iso_date::deserialize_option")]
	pub first_contact_date: Option<DateTime<Utc>>,
	#[serde(deserialize_with = "iso_date::deserialize")]
	pub last_contact_date: DateTime<Utc>,
}

impl StoredFriend {
	pub fn needs_migration(&self) -> bool {
		self.first_contact_date.is_none()
	}

	/// Missing `first_contact_date` defaults to `last_contact_date`.
	pub fn migrate(self) -> Friend {
		Friend {
			first_contact_date: self.first_contact_date.unwrap_or(self.last_contact_date),
			id: self.id,
			name: self.name,
			contact_method: self.contact_method,
			frequency_days: self.frequency_days,
			last_contact_date: self.last_contact_date,
		}
	}
}

/// Read an ISO-8601 date the way a browser's `Date` would: RFC 3339 with an
/// offset, or a date-time or bare date without one, taken as UTC.
pub fn parse_iso_date(raw: &str) -> Option<DateTime<Utc>> {
	let raw = raw.trim();
	if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
		return Some(date.with_timezone(&Utc));
	}
	if let Ok(date) = raw.parse::<DateTime<Utc>>() {
		return Some(date);
	}
	for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
		if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
			return Some(naive.and_utc());
		}
	}
	NaiveDate::parse_from_str(raw, "%Y-%m-%d")
		.ok()
		.and_then(|day| day.and_hms_opt(0, 0, 0))
		.map(|naive| naive.and_utc())
}

/// Lenient date fields for records that come from outside.
mod iso_date {
	use chrono::{DateTime, Utc};
	use serde::{Deserialize, Deserializer};

	pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;
		super::parse_iso_date(&raw)
			.ok_or_else(|| serde::de::Error::custom(format!("not an ISO-8601 date: {raw}")))
	}

	pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
	where
		D: Deserializer<'de>,
	{
		match Option::<String>::deserialize(deserializer)? {
			Some(raw) => super::parse_iso_date(&raw)
				.map(Some)
				.ok_or_else(|| serde::de::Error::custom(format!("not an ISO-8601 date: {raw}"))),
			None => Ok(None),
		}
	}
}

/// The channels the front end offers. Stored as their label, so the record
/// field stays a plain string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactMethod {
	TextMessage,
	PhoneCall,
	Email,
	InPerson,
	VideoCall,
}

impl ContactMethod {
	pub const ALL: [ContactMethod; 5] = [
		ContactMethod::TextMessage,
		ContactMethod::PhoneCall,
		ContactMethod::Email,
		ContactMethod::InPerson,
		ContactMethod::VideoCall,
	];

	pub fn label(self) -> &'static str {
		match self {
			ContactMethod::TextMessage => "Text message",
			ContactMethod::PhoneCall => "Phone call",
			ContactMethod::Email => "Email",
			ContactMethod::InPerson => "In person",
			ContactMethod::VideoCall => "Video call",
		}
	}

	fn short_name(self) -> &'static str {
		match self {
			ContactMethod::TextMessage => "message",
			ContactMethod::PhoneCall => "call",
			ContactMethod::Email => "email",
			ContactMethod::InPerson => "in-person",
			ContactMethod::VideoCall => "video-call",
		}
	}
}

impl Default for ContactMethod {
	fn default() -> Self {
		ContactMethod::TextMessage
	}
}

impl fmt::Display for ContactMethod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownContactMethod(pub String);

impl fmt::Display for UnknownContactMethod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let names: Vec<&str> = ContactMethod::ALL.iter().map(|m| m.short_name()).collect();
		write!(f, "unknown contact method '{}' (expected one of: {})", self.0, names.join(", "))
	}
}

impl std::error::Error for UnknownContactMethod {}

impl FromStr for ContactMethod {
	type Err = UnknownContactMethod;

	/// Accepts either the short name (`in-person`) or the label (`In person`).
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let needle = s.trim();
		ContactMethod::ALL
			.into_iter()
			.find(|m| m.short_name().eq_ignore_ascii_case(needle) || m.label().eq_ignore_ascii_case(needle))
			.ok_or_else(|| UnknownContactMethod(s.to_string()))
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyOption {
	pub label: &'static str,
	pub days: u32,
}

pub const FREQUENCY_OPTIONS: [FrequencyOption; 8] = [
	FrequencyOption { label: "Every day", days: 1 },
	FrequencyOption { label: "Every 3 days", days: 3 },
	FrequencyOption { label: "Every week", days: 7 },
	FrequencyOption { label: "Every 2 weeks", days: 14 },
	FrequencyOption { label: "Every month", days: 30 },
	FrequencyOption { label: "Every 3 months", days: 90 },
	FrequencyOption { label: "Every 6 months", days: 180 },
	FrequencyOption { label: "Every year", days: 365 },
];

/// Weekly.
pub const DEFAULT_FREQUENCY_DAYS: u32 = 7;

/// Predefined label for `days`, or "Every N days" for a custom interval.
pub fn frequency_label(days: u32) -> String {
	FREQUENCY_OPTIONS
		.iter()
		.find(|opt| opt.days == days)
		.map(|opt| opt.label.to_string())
		.unwrap_or_else(|| format!("Every {days} days"))
}
