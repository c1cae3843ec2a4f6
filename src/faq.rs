use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

impl FaqEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Questions that open and close independently, all closed at first.
#[derive(Debug, Clone)]
pub struct Accordion {
    entries: Vec<FaqEntry>,
    open: Vec<bool>,
}

impl Accordion {
    pub fn new(entries: Vec<FaqEntry>) -> Self {
        let open = vec![false; entries.len()];
        Self { entries, open }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flips entry `index`. Out-of-range indexes are ignored.
    pub fn toggle(&mut self, index: usize) {
        if let Some(open) = self.open.get_mut(index) {
            *open = !*open;
        }
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open.get(index).copied().unwrap_or(false)
    }

    /// Entries with their open flag, in order.
    pub fn iter(&self) -> impl Iterator<Item = (&FaqEntry, bool)> {
        self.entries.iter().zip(self.open.iter().copied())
    }
}
