use crate::entry::{format_amount, parse_number, TimeEntry};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklySummary {
    pub days_worked: usize,
    pub total_hours: f64,
    pub total_salary: f64,
}

impl WeeklySummary {
    pub fn total_hours_label(&self) -> String {
        format_amount(self.total_hours)
    }

    pub fn total_salary_label(&self) -> String {
        format_amount(self.total_salary)
    }
}

/// Sum the worked days of a week. `None` when no day has a valid
/// computation, which the views report as an empty result.
pub fn weekly_summary(entries: &[TimeEntry]) -> Option<WeeklySummary> {
    let worked: Vec<(f64, f64)> = entries.iter().filter_map(TimeEntry::worked).collect();
    if worked.is_empty() {
        return None;
    }

    Some(WeeklySummary {
        days_worked: worked.len(),
        total_hours: worked.iter().map(|(hours, _)| hours).sum(),
        total_salary: worked.iter().map(|(_, salary)| salary).sum(),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    pub days: u32,
    pub hour_part: u32,
    pub minute_part: u32,
    pub total_hours_per_day: f64,
    pub total_hours: f64,
    pub total_salary: f64,
}

impl MonthlySummary {
    pub fn daily_hours_label(&self) -> String {
        format!("{}h {}m", self.hour_part, self.minute_part)
    }
}

/// `hours[.minutes]`, with the minutes taken as written: `"8.3"` is 8h 3m.
fn split_daily_hours(daily_hours: &str) -> Option<(u32, u32)> {
    let (hours, minutes) = match daily_hours.trim().split_once('.') {
        Some((hours, minutes)) => (hours, minutes),
        None => (daily_hours.trim(), ""),
    };

    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !digits(hours) || !digits(minutes) {
        return None;
    }

    let part = |s: &str| if s.is_empty() { Some(0) } else { s.parse::<u32>().ok() };
    Some((part(hours)?, part(minutes)?))
}

/// Monthly gross: `(hours + minutes / 60) * working days * rate`, where the
/// daily hours are written `hours[.minutes]`.
pub fn monthly_summary(rate: &str, working_days: &str, daily_hours: &str) -> Result<MonthlySummary> {
    if rate.trim().is_empty() || working_days.trim().is_empty() || daily_hours.trim().is_empty() {
        return Err(Error::Validation("Please fill all fields.".to_string()));
    }

    let rate_value = parse_number(rate).filter(|r| *r > 0.0);
    let days = working_days.trim().parse::<u32>().ok().filter(|d| *d > 0);
    let (rate_value, days) = match (rate_value, days) {
        (Some(rate), Some(days)) => (rate, days),
        _ => {
            return Err(Error::Validation(
                "Enter valid hourly rate and working days.".to_string(),
            ))
        }
    };

    let (hour_part, minute_part) = split_daily_hours(daily_hours)
        .ok_or_else(|| Error::Validation("Enter valid daily hours.".to_string()))?;
    if minute_part >= 60 {
        return Err(Error::Validation("Minutes must be less than 60.".to_string()));
    }

    let total_hours_per_day = f64::from(hour_part) + f64::from(minute_part) / 60.0;
    let total_hours = total_hours_per_day * f64::from(days);

    Ok(MonthlySummary {
        days,
        hour_part,
        minute_part,
        total_hours_per_day,
        total_hours,
        total_salary: total_hours * rate_value,
    })
}
