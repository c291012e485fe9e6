//! Turning persisted days back into live weekly entries.
//!
//! A stored salary that is a valid number is trusted over a recomputation,
//! since the rate may have changed since it was saved. Anything missing or
//! corrupt is recomputed from the stored clock times.

use indexmap::IndexMap;

use crate::entry::{format_amount, parse_number, Day, TimeEntry, HOURS_BLANK};
use crate::schema::WeeklyRecord;
use crate::time::AmPm;

/// A persisted day, whichever collaborator it came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredDay {
    pub in_time: String,
    pub out_time: String,
    pub in_am_pm: Option<AmPm>,
    pub out_am_pm: Option<AmPm>,
    pub hours: Option<String>,
    pub salary: Option<String>,
    pub leave: bool,
}

impl From<&WeeklyRecord> for StoredDay {
    fn from(record: &WeeklyRecord) -> Self {
        StoredDay {
            in_time: record.in_time.clone(),
            out_time: record.out_time.clone(),
            in_am_pm: record.in_am_pm,
            out_am_pm: record.out_am_pm,
            hours: record.total_hours.map(|h| h.to_string()),
            salary: record.salary.map(|s| s.to_string()),
            leave: record.leave,
        }
    }
}

impl From<&TimeEntry> for StoredDay {
    fn from(entry: &TimeEntry) -> Self {
        let present = |s: &str| Some(s.to_string()).filter(|s| !s.is_empty());
        StoredDay {
            in_time: entry.in_time.clone(),
            out_time: entry.out_time.clone(),
            in_am_pm: Some(entry.in_am_pm),
            out_am_pm: Some(entry.out_am_pm),
            hours: present(&entry.hours),
            salary: present(&entry.salary),
            leave: entry.is_leave,
        }
    }
}

pub type StoredWeek = IndexMap<Day, StoredDay>;

/// Index remote records by day. A later record for the same day replaces an
/// earlier one.
pub fn days_from_records(records: &[WeeklyRecord]) -> StoredWeek {
    let mut days = StoredWeek::new();
    for record in records {
        days.insert(record.day, StoredDay::from(record));
    }
    days
}

/// Local entries are positional, Sunday first. Extra slots are ignored.
pub fn days_from_entries(entries: &[TimeEntry]) -> StoredWeek {
    Day::ALL
        .iter()
        .zip(entries.iter())
        .map(|(day, entry)| (*day, StoredDay::from(entry)))
        .collect()
}

/// The first positive rate found among the records, in its display form.
pub fn rate_from_records(records: &[WeeklyRecord]) -> Option<String> {
    records
        .iter()
        .filter_map(|r| r.rate)
        .find(|rate| rate.is_finite() && *rate > 0.0)
        .map(|rate| rate.to_string())
}

pub fn infer_in_am_pm(raw: &str) -> AmPm {
    if raw.to_uppercase().contains("PM") {
        AmPm::Pm
    } else {
        AmPm::Am
    }
}

/// Out-times lean toward evening: without an explicit "AM" they are PM.
pub fn infer_out_am_pm(raw: &str) -> AmPm {
    if raw.to_uppercase().contains("AM") {
        AmPm::Am
    } else {
        AmPm::Pm
    }
}

/// Drop a trailing `AM`/`PM` that was saved as part of the time text. Any
/// other text is kept so the parser can reject it.
fn strip_designator(raw: &str) -> String {
    let text = raw.trim();
    let upper = text.to_ascii_uppercase();
    let time = if upper.ends_with("AM") || upper.ends_with("PM") {
        &text[..text.len() - 2]
    } else {
        text
    };
    time.trim_end().to_string()
}

/// Split typed clock text such as `"9.30 pm"` into the time and designator
/// an in-time would get on load.
pub fn in_clock(raw: &str) -> (String, AmPm) {
    (strip_designator(raw), infer_in_am_pm(raw))
}

/// As [`in_clock`], with the out-time's PM default.
pub fn out_clock(raw: &str) -> (String, AmPm) {
    (strip_designator(raw), infer_out_am_pm(raw))
}

fn trusted_salary(stored: &StoredDay) -> Option<f64> {
    if stored.leave {
        return None;
    }
    stored.salary.as_deref().and_then(parse_number)
}

pub fn reconcile_day(stored: Option<&StoredDay>, rate: &str) -> TimeEntry {
    let stored = match stored {
        Some(stored) => stored,
        None => return TimeEntry::default(),
    };

    let mut entry = TimeEntry {
        in_time: strip_designator(&stored.in_time),
        in_am_pm: stored
            .in_am_pm
            .unwrap_or_else(|| infer_in_am_pm(&stored.in_time)),
        out_time: strip_designator(&stored.out_time),
        out_am_pm: stored
            .out_am_pm
            .unwrap_or_else(|| infer_out_am_pm(&stored.out_time)),
        ..TimeEntry::default()
    };

    match trusted_salary(stored) {
        Some(salary) => {
            entry.salary = format_amount(salary);
            entry.hours = stored
                .hours
                .as_deref()
                .and_then(parse_number)
                .map(format_amount)
                .unwrap_or_else(|| HOURS_BLANK.to_string());
            entry.is_leave = false;
        }
        None => entry.recalculate(rate),
    }

    entry
}

pub fn reconcile_week(days: &StoredWeek, rate: &str) -> [TimeEntry; 7] {
    let mut week: [TimeEntry; 7] = Default::default();
    for (slot, day) in week.iter_mut().zip(Day::ALL.iter()) {
        *slot = reconcile_day(days.get(day), rate);
    }
    week
}
