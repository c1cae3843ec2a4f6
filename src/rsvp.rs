use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::constants::{MAX_PARTY_SIZE, MIN_PARTY_SIZE, RSVP_COLLECTION};
use crate::deadline::DeadlineGate;
use crate::error::{RsvpError, StoreError};
use crate::store::{DocumentId, DocumentStore};

pub const SEND_FAILED_MESSAGE: &str = "Something went wrong while sending your RSVP. Please try again.";

/// A guest's answer as typed into the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsvpRecord {
    pub name: String,
    pub email: String,
    pub party_size: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RsvpRecord {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        party_size: u8,
        message: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            party_size,
            message,
        }
    }

    /// Checks the record and returns it trimmed, with a blank message dropped.
    pub fn validate(self) -> Result<Self, RsvpError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(RsvpError::MissingName);
        }
        let email = self.email.trim().to_string();
        if !is_plausible_email(&email) {
            return Err(RsvpError::InvalidEmail);
        }
        if !(MIN_PARTY_SIZE..=MAX_PARTY_SIZE).contains(&self.party_size) {
            return Err(RsvpError::PartySize(self.party_size));
        }
        let message = self
            .message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());

        Ok(Self {
            name,
            email,
            party_size: self.party_size,
            message,
        })
    }
}

fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

/// What actually lands in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsvpDocument {
    #[serde(flatten)]
    pub record: RsvpRecord,
    pub deadline: NaiveDate,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    Open,
    Submitted { id: DocumentId },
    Closed,
    Failed { message: String },
}

/// The RSVP form: validates, checks the deadline, then hands the document
/// to the store exactly once. No retries; the guest resubmits.
pub struct RsvpForm<S> {
    gate: DeadlineGate,
    store: S,
    state: FormState,
}

impl<S: DocumentStore> RsvpForm<S> {
    pub fn new(gate: DeadlineGate, store: S) -> Self {
        Self {
            gate,
            store,
            state: FormState::Open,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn gate(&self) -> &DeadlineGate {
        &self.gate
    }

    pub fn days_remaining_at(&self, now: DateTime<Utc>) -> i64 {
        self.gate.days_remaining_at(now)
    }

    /// Re-evaluates the deadline; a form past it shows as closed.
    pub fn refresh(&mut self, now: DateTime<Utc>) -> &FormState {
        if self.gate.is_past_deadline_at(now) {
            self.state = FormState::Closed;
        }
        &self.state
    }

    pub fn submit(&mut self, record: RsvpRecord, now: DateTime<Utc>) -> Result<DocumentId, RsvpError> {
        if self.gate.is_past_deadline_at(now) {
            self.state = FormState::Closed;
            return Err(RsvpError::DeadlinePassed(self.gate.date()));
        }
        let record = record.validate()?;

        let document = RsvpDocument {
            record,
            deadline: self.gate.date(),
            submitted_at: now,
        };
        let result = serde_json::to_value(&document)
            .map_err(StoreError::from)
            .and_then(|value| self.store.submit(RSVP_COLLECTION, value));

        match result {
            Ok(id) => {
                info!(%id, party_size = document.record.party_size, "RSVP recorded");
                self.state = FormState::Submitted { id: id.clone() };
                Ok(id)
            }
            Err(e) => {
                error!(error = %e, "failed to record RSVP");
                self.state = FormState::Failed {
                    message: SEND_FAILED_MESSAGE.to_string(),
                };
                Err(e.into())
            }
        }
    }

    /// Back to an empty form, e.g. to send another answer.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.state = FormState::Open;
        self.refresh(now);
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::Value;

    use super::*;
    use crate::store::{MemoryStore, StoredDocument};

    struct DownStore;

    impl DocumentStore for DownStore {
        fn submit(&mut self, _: &str, _: Value) -> Result<DocumentId, StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }

        fn query(&self, _: &str) -> Result<Vec<StoredDocument>, StoreError> {
            Ok(Vec::new())
        }
    }

    fn gate() -> DeadlineGate {
        DeadlineGate::new(NaiveDate::from_ymd_opt(2025, 10, 1).unwrap())
    }

    fn before() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 20, 12, 0, 0).unwrap()
    }

    fn after() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 2, 0, 0, 0).unwrap()
    }

    fn guest() -> RsvpRecord {
        RsvpRecord::new("  Ana Souza ", "ana@example.com", 2, Some("   ".to_string()))
    }

    #[test]
    fn validation_trims_and_drops_blank_message() {
        let record = guest().validate().unwrap();
        assert_eq!(record.name, "Ana Souza");
        assert_eq!(record.message, None);
    }

    #[test]
    fn validation_rejects_bad_fields() {
        let mut r = guest();
        r.name = "   ".into();
        assert!(matches!(r.validate(), Err(RsvpError::MissingName)));

        for email in ["", "ana", "@example.com", "ana@", "ana @example.com", "a@b@c"] {
            let mut r = guest();
            r.email = email.into();
            assert!(matches!(r.validate(), Err(RsvpError::InvalidEmail)), "{email}");
        }

        for size in [0, 7] {
            let mut r = guest();
            r.party_size = size;
            assert!(matches!(r.validate(), Err(RsvpError::PartySize(s)) if s == size));
        }
    }

    #[test]
    fn submission_stores_record_with_deadline() {
        let mut form = RsvpForm::new(gate(), MemoryStore::new());
        let id = form.submit(guest(), before()).unwrap();
        assert_eq!(form.state(), &FormState::Submitted { id: id.clone() });

        let docs = form.store().query(RSVP_COLLECTION).unwrap();
        assert_eq!(docs.len(), 1);
        let stored: RsvpDocument = serde_json::from_value(docs[0].data.clone()).unwrap();
        assert_eq!(stored.record.name, "Ana Souza");
        assert_eq!(stored.deadline, gate().date());
        assert_eq!(stored.submitted_at, before());
        assert_eq!(docs[0].data["deadline"], "2025-10-01");
        assert!(docs[0].data.get("message").is_none());

        form.reset(before());
        assert_eq!(form.state(), &FormState::Open);
    }

    #[test]
    fn closed_after_deadline_without_touching_the_store() {
        let mut form = RsvpForm::new(gate(), MemoryStore::new());
        let err = form.submit(guest(), after()).unwrap_err();
        assert!(matches!(err, RsvpError::DeadlinePassed(_)));
        assert_eq!(err.to_string(), "the RSVP deadline (1 October 2025) has passed");
        assert_eq!(form.state(), &FormState::Closed);
        assert!(form.store().query(RSVP_COLLECTION).unwrap().is_empty());

        form.reset(after());
        assert_eq!(form.state(), &FormState::Closed);
    }

    #[test]
    fn store_failure_surfaces_one_message() {
        let mut form = RsvpForm::new(gate(), DownStore);
        let err = form.submit(guest(), before()).unwrap_err();
        assert!(matches!(err, RsvpError::Store(StoreError::Unavailable(_))));
        assert_eq!(
            form.state(),
            &FormState::Failed { message: SEND_FAILED_MESSAGE.to_string() }
        );
    }

    #[test]
    fn refresh_closes_an_open_form() {
        let mut form = RsvpForm::new(gate(), MemoryStore::new());
        assert_eq!(form.refresh(before()), &FormState::Open);
        assert_eq!(form.days_remaining_at(before()), 11);
        assert_eq!(form.refresh(after()), &FormState::Closed);
    }
}
