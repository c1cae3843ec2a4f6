use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Closes the RSVP form once the configured date has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineGate {
    date: NaiveDate,
}

impl DeadlineGate {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The cut-off instant: midnight UTC at the start of the deadline date.
    pub fn instant(&self) -> DateTime<Utc> {
        self.date.and_time(NaiveTime::MIN).and_utc()
    }

    pub fn is_past_deadline_at(&self, now: DateTime<Utc>) -> bool {
        now > self.instant()
    }

    pub fn is_past_deadline(&self) -> bool {
        self.is_past_deadline_at(Utc::now())
    }

    /// Whole days left to answer, rounded up and never negative.
    pub fn days_remaining_at(&self, now: DateTime<Utc>) -> i64 {
        let left = self.instant() - now;
        if left <= TimeDelta::zero() {
            return 0;
        }
        let millis = left.num_milliseconds();
        (millis + DAY_MILLIS - 1) / DAY_MILLIS
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn gate() -> DeadlineGate {
        DeadlineGate::new(NaiveDate::from_ymd_opt(2025, 10, 1).unwrap())
    }

    #[test]
    fn gate_closes_strictly_after_midnight_utc() {
        let gate = gate();
        let midnight = Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap();
        assert!(!gate.is_past_deadline_at(midnight - TimeDelta::seconds(1)));
        assert!(!gate.is_past_deadline_at(midnight));
        assert!(gate.is_past_deadline_at(midnight + TimeDelta::seconds(1)));
        assert!(gate.is_past_deadline_at(Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()));
    }

    #[test]
    fn days_remaining_rounds_up() {
        let gate = gate();
        let now = Utc.with_ymd_and_hms(2025, 9, 29, 0, 0, 0).unwrap();
        assert_eq!(gate.days_remaining_at(now), 2);
        assert_eq!(gate.days_remaining_at(now + TimeDelta::hours(1)), 2);
        assert_eq!(gate.days_remaining_at(now + TimeDelta::hours(36)), 1);
        assert_eq!(gate.days_remaining_at(gate.instant()), 0);
        assert_eq!(gate.days_remaining_at(gate.instant() + TimeDelta::days(3)), 0);
    }
}
