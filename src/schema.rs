use serde::{Deserialize, Serialize};

use crate::entry::{parse_number, parse_rate, Day, TimeEntry};
use crate::time::AmPm;

/// One day of the weekly-entries resource as it travels over the wire.
///
/// Everything but `day` is optional on the way in; older saves may lack the
/// AM/PM fields or carry the designator inside the time text instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(test, derive(fake::Dummy))]
#[serde(rename_all = "camelCase")]
pub struct WeeklyRecord {
    pub day: Day,
    #[serde(default)]
    pub in_time: String,
    #[serde(default)]
    pub out_time: String,
    #[serde(default)]
    pub in_am_pm: Option<AmPm>,
    #[serde(default)]
    pub out_am_pm: Option<AmPm>,
    #[serde(default)]
    pub total_hours: Option<f64>,
    #[serde(default)]
    pub salary: Option<f64>,
    #[serde(default)]
    pub leave: bool,
    #[serde(default)]
    pub rate: Option<f64>,
}

impl WeeklyRecord {
    /// Numbers that do not parse are sent as zero; the rate is always the
    /// shared weekly rate.
    pub fn from_entry(day: Day, entry: &TimeEntry, rate: &str) -> Self {
        WeeklyRecord {
            day,
            in_time: entry.in_time.clone(),
            out_time: entry.out_time.clone(),
            in_am_pm: Some(entry.in_am_pm),
            out_am_pm: Some(entry.out_am_pm),
            total_hours: Some(parse_number(&entry.hours).unwrap_or(0.0)),
            salary: Some(parse_number(&entry.salary).unwrap_or(0.0)),
            leave: entry.is_leave,
            rate: Some(parse_rate(rate).unwrap_or(0.0)),
        }
    }
}

/// Build the seven records saved for a week, Sunday first.
pub fn week_records(entries: &[TimeEntry; 7], rate: &str) -> Vec<WeeklyRecord> {
    Day::ALL
        .iter()
        .zip(entries.iter())
        .map(|(day, entry)| WeeklyRecord::from_entry(*day, entry, rate))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_from_computed_entry() {
        let entry = TimeEntry::new("9", AmPm::Am, "5", AmPm::Pm).recalculated("10");
        let record = WeeklyRecord::from_entry(Day::Monday, &entry, "10");

        assert_eq!(record.total_hours, Some(8.0));
        assert_eq!(record.salary, Some(80.0));
        assert_eq!(record.rate, Some(10.0));
        assert!(!record.leave);
    }

    #[test]
    fn test_record_from_leave_entry_sends_zeros() {
        let entry = TimeEntry::new("", AmPm::Am, "5", AmPm::Pm).recalculated("abc");
        let record = WeeklyRecord::from_entry(Day::Friday, &entry, "abc");

        assert_eq!(record.total_hours, Some(0.0));
        assert_eq!(record.salary, Some(0.0));
        assert_eq!(record.rate, Some(0.0));
        assert!(record.leave);
    }

    #[test]
    fn test_wire_shape() {
        let entry = TimeEntry::new("10", AmPm::Pm, "6", AmPm::Am).recalculated("12");
        let json = serde_json::to_value(WeeklyRecord::from_entry(Day::Sunday, &entry, "12")).unwrap();

        assert_eq!(json["day"], "Sunday");
        assert_eq!(json["inTime"], "10");
        assert_eq!(json["inAmPm"], "PM");
        assert_eq!(json["outAmPm"], "AM");
        assert_eq!(json["totalHours"], 8.0);
        assert_eq!(json["salary"], 96.0);
        assert_eq!(json["leave"], false);
    }

    #[test]
    fn test_sparse_record_deserializes() {
        let record: WeeklyRecord =
            serde_json::from_str(r#"{"day":"Tuesday","inTime":"9 AM","outTime":"5"}"#).unwrap();
        assert_eq!(record.day, Day::Tuesday);
        assert_eq!(record.in_am_pm, None);
        assert_eq!(record.salary, None);
        assert!(!record.leave);
    }

    #[test]
    fn test_week_records_in_day_order() {
        let entries: [TimeEntry; 7] = Default::default();
        let records = week_records(&entries, "10");
        let days: Vec<Day> = records.iter().map(|r| r.day).collect();
        assert_eq!(days, Day::ALL.to_vec());
    }
}
