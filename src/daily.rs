//! Multi-project income for a single day.

use crate::entry::parse_number;
use crate::error::{Error, Result};

/// Identity of a project row. Ids are handed out by the sheet from a
/// counter and never reused, even across resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRow {
    pub id: RowId,
    pub wage: String,
    pub hours: String,
}

impl ProjectRow {
    fn blank(id: RowId) -> Self {
        ProjectRow {
            id,
            wage: String::new(),
            hours: String::new(),
        }
    }

    fn amounts(&self) -> Option<(f64, f64)> {
        let wage = parse_number(&self.wage).filter(|w| *w > 0.0)?;
        let hours = parse_number(&self.hours).filter(|h| *h > 0.0)?;
        Some((wage, hours))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectAction {
    Add,
    Update {
        id: RowId,
        wage: Option<String>,
        hours: Option<String>,
    },
    Remove(RowId),
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectSheet {
    rows: Vec<ProjectRow>,
    next_id: u64,
}

impl Default for ProjectSheet {
    fn default() -> Self {
        ProjectSheet::new()
    }
}

impl ProjectSheet {
    /// A sheet always starts with one blank row.
    pub fn new() -> Self {
        ProjectSheet {
            rows: vec![ProjectRow::blank(RowId(0))],
            next_id: 1,
        }
    }

    pub fn rows(&self) -> &[ProjectRow] {
        &self.rows
    }

    pub fn last_id(&self) -> Option<RowId> {
        self.rows.last().map(|row| row.id)
    }

    fn allocate(&mut self) -> RowId {
        let id = RowId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn apply(mut self, action: ProjectAction) -> Self {
        match action {
            ProjectAction::Add => {
                let id = self.allocate();
                self.rows.push(ProjectRow::blank(id));
            }
            ProjectAction::Update { id, wage, hours } => {
                if let Some(row) = self.rows.iter_mut().find(|row| row.id == id) {
                    if let Some(wage) = wage {
                        row.wage = wage;
                    }
                    if let Some(hours) = hours {
                        row.hours = hours;
                    }
                }
            }
            // The last row stays.
            ProjectAction::Remove(id) => {
                if self.rows.len() > 1 {
                    self.rows.retain(|row| row.id != id);
                }
            }
            ProjectAction::Reset => {
                let id = self.allocate();
                self.rows = vec![ProjectRow::blank(id)];
            }
        }
        self
    }

    /// Gross income across every row. One bad row invalidates the whole
    /// sheet; there is no partial total.
    pub fn total(&self) -> Result<f64> {
        self.rows
            .iter()
            .map(|row| row.amounts().map(|(wage, hours)| wage * hours))
            .sum::<Option<f64>>()
            .ok_or_else(|| {
                Error::Validation("Please enter valid numbers for all projects.".to_string())
            })
    }
}
