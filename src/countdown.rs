use std::fmt;

use chrono::{DateTime, TimeZone};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Countdown {
    /// Time left until `event`, or `None` once it has started.
    pub fn until<A: TimeZone, B: TimeZone>(event: &DateTime<A>, now: &DateTime<B>) -> Option<Self> {
        let left = event.clone().signed_duration_since(now.clone());
        let total = left.num_seconds();
        if left.num_milliseconds() <= 0 {
            return None;
        }
        Some(Self {
            days: total / 86_400,
            hours: (total / 3_600) % 24,
            minutes: (total / 60) % 60,
            seconds: total % 60,
        })
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} days {:02}:{:02}:{:02}",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}
