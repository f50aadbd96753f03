use serde::{Deserialize, Serialize};

pub const HISTORY_LIMIT: usize = 10;

/// Recent searches, most recent first, without duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchHistory(Vec<String>);

impl SearchHistory {
    /// Move `name` to the front, inserting it if new, and keep at most [`HISTORY_LIMIT`] entries.
    pub fn add(&mut self, name: &str) {
        self.0.retain(|entry| entry != name);
        self.0.insert(0, name.to_string());
        self.0.truncate(HISTORY_LIMIT);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn entries(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Restores the uniqueness and length invariants on data read from storage.
    pub(crate) fn sanitized(self) -> Self {
        let mut clean = Vec::with_capacity(self.0.len().min(HISTORY_LIMIT));
        for entry in self.0 {
            if !clean.contains(&entry) {
                clean.push(entry);
            }
        }
        clean.truncate(HISTORY_LIMIT);
        Self(clean)
    }
}
