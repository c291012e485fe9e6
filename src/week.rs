//! State of the weekly view and the transitions that change it.
//!
//! Every user edit and every collaborator response is an [`Action`] folded
//! into [`WeekState::apply`]. Requests to a collaborator are stamped with a
//! [`Ticket`]; a response is only applied while its ticket is still the
//! newest one issued and no edit has landed since.

use tracing::warn;

use crate::entry::{Day, TimeEntry};
use crate::reconcile::{reconcile_week, StoredWeek};
use crate::schema::{week_records, WeeklyRecord};
use crate::time::AmPm;
use crate::totals::{weekly_summary, WeeklySummary};

pub const DEFAULT_RATE: &str = "10";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Save,
    DeleteAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
    revision: u64,
    operation: Operation,
}

impl Ticket {
    pub fn operation(&self) -> Operation {
        self.operation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    In,
    Out,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetRate(String),
    SetTime { day: Day, field: Field, value: String },
    SetAmPm { day: Day, field: Field, am_pm: AmPm },
    ToggleAmPm { day: Day, field: Field },
    Calculate,
    Reset,
    DismissNotice,
    Loaded {
        ticket: Ticket,
        days: StoredWeek,
        rate: Option<String>,
    },
    Saved { ticket: Ticket },
    DeletedAll { ticket: Ticket },
    Failed { ticket: Ticket, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekState {
    pub rate: String,
    pub entries: [TimeEntry; 7],
    pub summary: Option<WeeklySummary>,
    pub notice: Option<Notice>,
    revision: u64,
    last_seq: u64,
}

impl Default for WeekState {
    fn default() -> Self {
        WeekState {
            rate: DEFAULT_RATE.to_string(),
            entries: Default::default(),
            summary: None,
            notice: None,
            revision: 0,
            last_seq: 0,
        }
    }
}

/// Keystroke filter: up to `int_digits` digits, optionally `.` and up to
/// two more digits. Partial input such as `"9."` passes.
fn accepts_input(text: &str, int_digits: usize) -> bool {
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (text, ""),
    };
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    whole.len() <= int_digits && fraction.len() <= 2 && digits(whole) && digits(fraction)
}

/// Whether [`Action::SetTime`] would take `text`.
pub fn accepts_time(text: &str) -> bool {
    accepts_input(text, 2)
}

/// Whether [`Action::SetRate`] would take `text`.
pub fn accepts_rate(text: &str) -> bool {
    accepts_input(text, 3)
}

impl WeekState {
    pub fn entry(&self, day: Day) -> &TimeEntry {
        &self.entries[day.index()]
    }

    /// The seven records a save sends to the remote store.
    pub fn records(&self) -> Vec<WeeklyRecord> {
        week_records(&self.entries, &self.rate)
    }

    /// Stamp a new request. Any ticket issued earlier becomes stale.
    pub fn begin(&mut self, operation: Operation) -> Ticket {
        self.last_seq += 1;
        Ticket {
            seq: self.last_seq,
            revision: self.revision,
            operation,
        }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.seq == self.last_seq && ticket.revision == self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.summary = None;
    }

    fn recalculate_all(&mut self) {
        for entry in self.entries.iter_mut() {
            entry.recalculate(&self.rate);
        }
    }

    fn clear(&mut self) {
        self.rate = DEFAULT_RATE.to_string();
        self.entries = Default::default();
        self.touch();
    }

    pub fn apply(mut self, action: Action) -> Self {
        match action {
            Action::SetRate(rate) => {
                if accepts_rate(&rate) {
                    self.rate = rate;
                    self.recalculate_all();
                    self.touch();
                }
            }
            Action::SetTime { day, field, value } => {
                if accepts_time(&value) {
                    let entry = &mut self.entries[day.index()];
                    match field {
                        Field::In => entry.in_time = value,
                        Field::Out => entry.out_time = value,
                    }
                    entry.recalculate(&self.rate);
                    self.touch();
                }
            }
            Action::SetAmPm { day, field, am_pm } => {
                let entry = &mut self.entries[day.index()];
                match field {
                    Field::In => entry.in_am_pm = am_pm,
                    Field::Out => entry.out_am_pm = am_pm,
                }
                entry.recalculate(&self.rate);
                self.touch();
            }
            Action::ToggleAmPm { day, field } => {
                let entry = self.entry(day);
                let am_pm = match field {
                    Field::In => entry.in_am_pm,
                    Field::Out => entry.out_am_pm,
                };
                return self.apply(Action::SetAmPm {
                    day,
                    field,
                    am_pm: am_pm.toggle(),
                });
            }
            Action::Calculate => match weekly_summary(&self.entries) {
                Some(summary) => self.summary = Some(summary),
                None => {
                    self.summary = None;
                    self.notice = Some(Notice::Error(
                        "No valid entries: please ensure valid time inputs are filled.".to_string(),
                    ));
                }
            },
            Action::Reset => {
                self.clear();
                self.notice = None;
            }
            Action::DismissNotice => self.notice = None,
            Action::Loaded { ticket, days, rate } => {
                if self.accept(&ticket) {
                    if let Some(rate) = rate {
                        self.rate = rate;
                    }
                    self.entries = reconcile_week(&days, &self.rate);
                    self.touch();
                }
            }
            Action::Saved { ticket } => {
                if self.accept(&ticket) {
                    self.notice = Some(Notice::Success(
                        "Weekly entries saved successfully.".to_string(),
                    ));
                }
            }
            Action::DeletedAll { ticket } => {
                if self.accept(&ticket) {
                    self.clear();
                    self.notice = Some(Notice::Success("All entries have been reset.".to_string()));
                }
            }
            // A failed save or delete is always reported; only a superseded
            // load failure is dropped.
            Action::Failed { ticket, message } => {
                if ticket.operation != Operation::Load || self.accept(&ticket) {
                    let what = match ticket.operation {
                        Operation::Load => "Failed to load entries",
                        Operation::Save => "Failed to save entries",
                        Operation::DeleteAll => "Failed to delete entries",
                    };
                    self.notice = Some(Notice::Error(format!("{}: {}", what, message)));
                }
            }
        }
        self
    }

    fn accept(&self, ticket: &Ticket) -> bool {
        let current = self.is_current(ticket);
        if !current {
            warn!(
                operation = ?ticket.operation,
                seq = ticket.seq,
                latest = self.last_seq,
                "Discarding stale response"
            );
        }
        current
    }
}
