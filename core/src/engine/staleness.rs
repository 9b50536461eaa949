use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::models::Friend;

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Days until `friend` should be contacted again, rounded up.
/// Negative: overdue by that many days. Zero: due today.
///
/// A next-contact date past the end of the calendar saturates at
/// `DateTime::<Utc>::MAX_UTC`.
pub fn days_until_contact(friend: &Friend, now: DateTime<Utc>) -> i64 {
	let next_contact = friend
		.last_contact_date
		.checked_add_signed(Duration::days(i64::from(friend.frequency_days)))
		.unwrap_or(DateTime::<Utc>::MAX_UTC);
	let diff_ms = (next_contact - now).num_milliseconds();
	ceil_div(diff_ms, MS_PER_DAY)
}

fn ceil_div(n: i64, d: i64) -> i64 {
	let q = n.div_euclid(d);
	if n.rem_euclid(d) == 0 { q } else { q + 1 }
}

pub fn days_text(days: i64) -> String {
	match days {
		d if d < 0 => format!("{} days overdue", d.unsigned_abs()),
		0 => "Contact today!".to_string(),
		d => format!("{d} days left"),
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
	Urgent,
	Due,
	Warning,
	#[serde(rename = "ok")]
	OnTrack,
}

impl Urgency {
	pub fn from_days(days: i64) -> Self {
		match days {
			d if d < 0 => Urgency::Urgent,
			0 => Urgency::Due,
			1..=3 => Urgency::Warning,
			_ => Urgency::OnTrack,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Urgency::Urgent => "urgent",
			Urgency::Due => "due",
			Urgency::Warning => "warning",
			Urgency::OnTrack => "ok",
		}
	}

	pub fn hex_color(self) -> &'static str {
		match self {
			Urgency::Urgent => "#FF4444",
			Urgency::Due => "#FF8800",
			Urgency::Warning => "#FFAA00",
			Urgency::OnTrack => "#44AA44",
		}
	}
}

/// A friend with its staleness worked out, ready to display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReminderRow {
	pub friend: Friend,
	pub days: i64,
	pub text: String,
	pub urgency: Urgency,
}

impl ReminderRow {
	pub fn new(friend: Friend, now: DateTime<Utc>) -> Self {
		let days = days_until_contact(&friend, now);
		Self {
			text: days_text(days),
			urgency: Urgency::from_days(days),
			friend,
			days,
		}
	}
}

/// Most overdue first. Equal days keep their stored order.
pub fn sort_by_urgency(friends: &[Friend], now: DateTime<Utc>) -> Vec<ReminderRow> {
	let mut rows: Vec<ReminderRow> = friends.iter().cloned().map(|f| ReminderRow::new(f, now)).collect();
	rows.sort_by_key(|row| row.days);
	rows
}
