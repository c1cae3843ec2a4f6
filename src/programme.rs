use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One card of the wedding weekend's schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgrammeEvent {
    pub title: String,
    pub date: NaiveDate,
    pub description: String,
}

impl ProgrammeEvent {
    pub fn new(title: impl Into<String>, date: NaiveDate, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date,
            description: description.into(),
        }
    }

    /// "Friday 10 October 2025"
    pub fn day_label(&self) -> String {
        self.date.format("%A %-d %B %Y").to_string()
    }

    /// True once the whole day (UTC) is over.
    pub fn is_over_at(&self, now: DateTime<Utc>) -> bool {
        now.date_naive() > self.date
    }
}
