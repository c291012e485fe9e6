use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::time::{parse_time, worked_hours, AmPm};

pub const HOURS_BLANK: &str = "-";
pub const LEAVE: &str = "Leave";
pub const INVALID: &str = "Invalid";
pub const INTIME_REQUIRED: &str = "Intime Required";
pub const OUTTIME_REQUIRED: &str = "Outtime Required";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(test, derive(fake::Dummy))]
pub enum Day {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

lazy_static! {
    static ref DAY_NAMES: HashMap<String, Day> = Day::ALL
        .iter()
        .flat_map(|day| {
            vec![
                (day.name().to_lowercase(), *day),
                (day.short_name().to_lowercase(), *day),
            ]
        })
        .collect();
}

impl Day {
    /// Week order used by every seven-slot view, Sunday first.
    pub const ALL: [Day; 7] = [
        Day::Sunday,
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Day::Sunday => "Sunday",
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
        }
    }

    pub fn short_name(self) -> &'static str {
        &self.name()[..3]
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Day {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DAY_NAMES
            .get(&s.trim().to_lowercase())
            .copied()
            .ok_or_else(|| Error::Validation(format!("Unknown day: {:?}", s)))
    }
}

impl From<chrono::Weekday> for Day {
    fn from(weekday: chrono::Weekday) -> Self {
        Day::ALL[weekday.num_days_from_sunday() as usize]
    }
}

/// Formats a money or hours figure the way every view displays it.
pub fn format_amount(value: f64) -> String {
    // Adding 0.0 folds a negative zero into positive zero.
    format!("{:.2}", value + 0.0)
}

/// Parse a numeric field; only finite values count.
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// The shared hourly rate, if it is usable for a salary computation.
pub fn parse_rate(rate: &str) -> Option<f64> {
    parse_number(rate).filter(|r| *r >= 0.0).map(|r| r + 0.0)
}

/// Outcome of deriving hours and salary from one day's inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Leave,
    IntimeRequired,
    OuttimeRequired,
    Invalid,
    Computed { hours: f64, salary: f64 },
}

impl Classification {
    pub fn hours_label(&self) -> String {
        match self {
            Classification::Leave => LEAVE.to_string(),
            Classification::IntimeRequired => INTIME_REQUIRED.to_string(),
            Classification::OuttimeRequired => OUTTIME_REQUIRED.to_string(),
            Classification::Invalid => INVALID.to_string(),
            Classification::Computed { hours, .. } => format_amount(*hours),
        }
    }

    pub fn salary_label(&self) -> String {
        match self {
            Classification::Leave => String::new(),
            Classification::Computed { salary, .. } => format_amount(*salary),
            _ => INVALID.to_string(),
        }
    }

    pub fn is_leave(&self) -> bool {
        !matches!(self, Classification::Computed { .. })
    }
}

/// One weekday row of the weekly view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeEntry {
    pub in_time: String,
    pub in_am_pm: AmPm,
    pub out_time: String,
    pub out_am_pm: AmPm,
    pub hours: String,
    pub salary: String,
    pub is_leave: bool,
}

impl Default for TimeEntry {
    fn default() -> Self {
        TimeEntry {
            in_time: String::new(),
            in_am_pm: AmPm::Am,
            out_time: String::new(),
            out_am_pm: AmPm::Pm,
            hours: HOURS_BLANK.to_string(),
            salary: String::new(),
            is_leave: true,
        }
    }
}

impl TimeEntry {
    pub fn new(in_time: &str, in_am_pm: AmPm, out_time: &str, out_am_pm: AmPm) -> Self {
        TimeEntry {
            in_time: in_time.to_string(),
            in_am_pm,
            out_time: out_time.to_string(),
            out_am_pm,
            ..TimeEntry::default()
        }
    }

    /// Evaluated in priority order: blank day, missing in-time, missing
    /// out-time, unparseable input, computed shift.
    pub fn classify(&self, rate: &str) -> Classification {
        let in_time = self.in_time.trim();
        let out_time = self.out_time.trim();

        match (in_time.is_empty(), out_time.is_empty()) {
            (true, true) => Classification::Leave,
            (true, false) => Classification::IntimeRequired,
            (false, true) => Classification::OuttimeRequired,
            (false, false) => {
                let start = parse_time(in_time, self.in_am_pm);
                let stop = parse_time(out_time, self.out_am_pm);
                match (start, stop, parse_rate(rate)) {
                    (Ok(start), Ok(stop), Some(rate)) => {
                        let hours = worked_hours(start, stop);
                        Classification::Computed {
                            hours,
                            salary: hours * rate,
                        }
                    }
                    _ => Classification::Invalid,
                }
            }
        }
    }

    /// Re-derive `hours`, `salary` and `is_leave` from the time inputs.
    pub fn recalculate(&mut self, rate: &str) {
        let class = self.classify(rate);
        self.hours = class.hours_label();
        self.salary = class.salary_label();
        self.is_leave = class.is_leave();
    }

    pub fn recalculated(mut self, rate: &str) -> Self {
        self.recalculate(rate);
        self
    }

    /// Hours and salary if this day counts toward totals.
    pub fn worked(&self) -> Option<(f64, f64)> {
        if self.is_leave {
            return None;
        }
        Some((parse_number(&self.hours)?, parse_number(&self.salary)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_shift() {
        let entry = TimeEntry::new("9", AmPm::Am, "5", AmPm::Pm).recalculated("10");
        assert_eq!(entry.hours, "8.00");
        assert_eq!(entry.salary, "80.00");
        assert!(!entry.is_leave);
    }

    #[test]
    fn test_overnight_shift() {
        let entry = TimeEntry::new("10", AmPm::Pm, "6", AmPm::Am).recalculated("12");
        assert_eq!(entry.hours, "8.00");
        assert_eq!(entry.salary, "96.00");
        assert!(!entry.is_leave);
    }

    #[test]
    fn test_blank_day_is_leave_for_any_rate() {
        for rate in ["10", "", "abc", "-4"] {
            let entry = TimeEntry::default().recalculated(rate);
            assert_eq!(entry.hours, LEAVE);
            assert_eq!(entry.salary, "");
            assert!(entry.is_leave);
        }
    }

    #[test]
    fn test_missing_times() {
        let entry = TimeEntry::new("", AmPm::Am, "5", AmPm::Pm).recalculated("10");
        assert_eq!(entry.hours, INTIME_REQUIRED);
        assert_eq!(entry.salary, INVALID);
        assert!(entry.is_leave);

        let mut entry = TimeEntry::new("9", AmPm::Am, "5", AmPm::Pm).recalculated("10");
        entry.out_time.clear();
        entry.recalculate("10");
        assert_eq!(entry.hours, OUTTIME_REQUIRED);
        assert_eq!(entry.salary, INVALID);
        assert!(entry.is_leave);
    }

    #[test]
    fn test_invalid_time_or_rate() {
        let entry = TimeEntry::new("13", AmPm::Am, "5", AmPm::Pm).recalculated("10");
        assert_eq!(entry.classify("10"), Classification::Invalid);
        assert_eq!(entry.hours, INVALID);
        assert_eq!(entry.salary, INVALID);

        let entry = TimeEntry::new("9", AmPm::Am, "5", AmPm::Pm).recalculated("");
        assert_eq!(entry.hours, INVALID);
        assert!(entry.is_leave);
    }

    #[test]
    fn test_equal_times_are_zero_hours() {
        let entry = TimeEntry::new("9", AmPm::Am, "9", AmPm::Am).recalculated("10");
        assert_eq!(entry.hours, "0.00");
        assert_eq!(entry.salary, "0.00");
    }

    #[test]
    fn test_worked_skips_leave_and_labels() {
        assert_eq!(TimeEntry::default().worked(), None);
        let entry = TimeEntry::new("9.30", AmPm::Am, "1", AmPm::Pm).recalculated("20");
        assert_eq!(entry.worked(), Some((3.5, 70.0)));
    }

    #[test]
    fn test_day_lookup() {
        assert_eq!("Mon".parse::<Day>().unwrap(), Day::Monday);
        assert_eq!("saturday".parse::<Day>().unwrap(), Day::Saturday);
        assert!("Funday".parse::<Day>().is_err());
        assert_eq!(Day::from(chrono::Weekday::Sun), Day::Sunday);
        assert_eq!(Day::Wednesday.index(), 3);
    }

    #[test]
    fn test_local_json_shape() {
        let json = serde_json::to_value(TimeEntry::default()).unwrap();
        assert_eq!(json["inAmPm"], "AM");
        assert_eq!(json["outAmPm"], "PM");
        assert_eq!(json["isLeave"], true);

        let entry: TimeEntry = serde_json::from_str(r#"{"inTime":"9"}"#).unwrap();
        assert_eq!(entry.in_time, "9");
        assert_eq!(entry.out_am_pm, AmPm::Pm);
    }
}
