use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Half-day designator attached to every clock-in and clock-out time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(fake::Dummy))]
pub enum AmPm {
    #[serde(rename = "AM", alias = "am")]
    Am,
    #[serde(rename = "PM", alias = "pm")]
    Pm,
}

impl AmPm {
    pub fn toggle(self) -> Self {
        match self {
            AmPm::Am => AmPm::Pm,
            AmPm::Pm => AmPm::Am,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AmPm::Am => "AM",
            AmPm::Pm => "PM",
        }
    }
}

impl fmt::Display for AmPm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AmPm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AM" => Ok(AmPm::Am),
            "PM" => Ok(AmPm::Pm),
            _ => Err(Error::Validation(format!("Expected AM or PM, got {:?}", s))),
        }
    }
}

fn is_short_number(s: &str) -> bool {
    (1..=2).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}

/// Parse an `hour[.minute]` clock time on the 12-hour dial into decimal hours
/// since midnight.
///
/// The fractional part is minutes, not a fraction of an hour: `"9.30"` is
/// half past nine. A single minute digit is read as tens (`"9.3"` == `"9.30"`).
/// Hour `0` is not a 12-hour clock reading and is rejected.
pub fn parse_time(time_str: &str, am_pm: AmPm) -> Result<f64> {
    let invalid = || Error::InvalidTimeFormat(time_str.to_string());

    let (hour_str, minute_str) = match time_str.split_once('.') {
        Some((hour, minute)) => (hour, Some(minute)),
        None => (time_str, None),
    };

    if !is_short_number(hour_str) {
        return Err(invalid());
    }
    let hour: u32 = hour_str.parse().map_err(|_| invalid())?;

    let minute: u32 = match minute_str {
        Some(m) if is_short_number(m) => format!("{:0<2}", m).parse().map_err(|_| invalid())?,
        Some(_) => return Err(invalid()),
        None => 0,
    };

    if hour == 0 || hour > 12 || minute >= 60 {
        return Err(invalid());
    }

    let mut time = f64::from(hour) + f64::from(minute) / 60.0;
    match am_pm {
        AmPm::Pm if hour != 12 => time += 12.0,
        AmPm::Am if hour == 12 => time -= 12.0,
        _ => {}
    }

    Ok(time)
}

/// Hours between two decimal clock times, wrapping past midnight when the
/// out-time is earlier than the in-time. Equal times yield zero, never 24.
pub fn worked_hours(in_time: f64, out_time: f64) -> f64 {
    if out_time >= in_time {
        out_time - in_time
    } else {
        24.0 - in_time + out_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_am_pm_adjustment() {
        assert_eq!(parse_time("9.30", AmPm::Pm).unwrap(), 21.5);
        assert_eq!(parse_time("9.30", AmPm::Am).unwrap(), 9.5);
        assert_eq!(parse_time("12.00", AmPm::Am).unwrap(), 0.0);
        assert_eq!(parse_time("12.00", AmPm::Pm).unwrap(), 12.0);
        assert_eq!(parse_time("12", AmPm::Am).unwrap(), 0.0);
        assert_eq!(parse_time("5", AmPm::Pm).unwrap(), 17.0);
    }

    #[test]
    fn test_parse_time_matches_24_hour_clock() {
        for hour in 1..=12u32 {
            for minute in 0..60u32 {
                for am_pm in [AmPm::Am, AmPm::Pm] {
                    let text = format!("{}.{:02}", hour, minute);
                    let hour24 = match (am_pm, hour) {
                        (AmPm::Am, 12) => 0,
                        (AmPm::Am, h) => h,
                        (AmPm::Pm, 12) => 12,
                        (AmPm::Pm, h) => h + 12,
                    };
                    let expected = f64::from(hour24) + f64::from(minute) / 60.0;
                    let parsed = parse_time(&text, am_pm).unwrap();
                    assert!((parsed - expected).abs() < 1e-9, "{} {}", text, am_pm);
                    assert!((0.0..24.0).contains(&parsed));
                }
            }
        }
    }

    #[test]
    fn test_single_minute_digit_is_tens() {
        assert_eq!(parse_time("9.3", AmPm::Am).unwrap(), 9.5);
    }

    #[test]
    fn test_parse_time_rejects_bad_input() {
        for bad in ["", "13", "0", "9.60", "9.", ".30", "123", "9.300", "9:30", "nine", "-1", "9.3a"] {
            assert!(parse_time(bad, AmPm::Am).is_err(), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_worked_hours() {
        assert_eq!(worked_hours(9.0, 17.0), 8.0);
        assert_eq!(worked_hours(22.0, 6.0), 8.0);
        assert_eq!(worked_hours(10.0, 10.0), 0.0);
        assert_eq!(worked_hours(23.5, 0.0), 0.5);
    }

    #[test]
    fn test_am_pm_toggle_and_parse() {
        assert_eq!(AmPm::Am.toggle(), AmPm::Pm);
        assert_eq!(AmPm::Pm.toggle(), AmPm::Am);
        assert_eq!("pm".parse::<AmPm>().unwrap(), AmPm::Pm);
        assert!("noon".parse::<AmPm>().is_err());
    }
}
