use crate::error::{Result, StoreError};
use crate::ids::SessionId;
use phoneclean_core::{CleaningMetrics, CleaningOutcome, Table};
use std::collections::HashMap;
use std::path::Path;

const EXPORT_SUFFIX: &str = "_cleaned.csv";
const DEFAULT_EXPORT_STEM: &str = "cleaned_contacts";

#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub filename: String,
    pub created_at: i64,
    pub original: Table,
    pub cleaned: Option<Table>,
    pub metrics: Option<CleaningMetrics>,
    pub cleaned_columns: Vec<String>,
}

impl Session {
    pub fn export_filename(&self) -> String {
        let stem = Path::new(&self.filename)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty());
        match stem {
            Some(stem) => format!("{stem}{EXPORT_SUFFIX}"),
            None => format!("{DEFAULT_EXPORT_STEM}.csv"),
        }
    }

    pub fn cleaned_table(&self) -> Result<&Table> {
        self.cleaned
            .as_ref()
            .ok_or_else(|| StoreError::NotCleaned(self.id.to_string()))
    }

    pub fn cleaned_metrics(&self) -> Result<CleaningMetrics> {
        self.metrics
            .ok_or_else(|| StoreError::NotCleaned(self.id.to_string()))
    }
}

/// Sessions live only as long as the store; callers decide when to evict.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<SessionId, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, filename: impl Into<String>, table: Table, now_utc: i64) -> SessionId {
        let id = SessionId::new();
        self.sessions.insert(
            id,
            Session {
                id,
                filename: filename.into(),
                created_at: now_utc,
                original: table,
                cleaned: None,
                metrics: None,
                cleaned_columns: Vec::new(),
            },
        );
        id
    }

    pub fn get(&self, id: SessionId) -> Result<&Session> {
        self.sessions
            .get(&id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    pub fn record_cleaning(&mut self, id: SessionId, outcome: CleaningOutcome) -> Result<&Session> {
        let session = self
            .sessions
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        session.cleaned = Some(outcome.table);
        session.metrics = Some(outcome.metrics);
        session.cleaned_columns = outcome.cleaned_columns;
        Ok(session)
    }

    pub fn evict(&mut self, id: SessionId) -> Result<Session> {
        self.sessions
            .remove(&id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Drops sessions created before `cutoff`, returning how many were removed.
    pub fn evict_older_than(&mut self, cutoff: i64) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| session.created_at >= cutoff);
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::SessionStore;
    use phoneclean_core::Table;

    #[test]
    fn export_filename_uses_original_stem() {
        let mut store = SessionStore::new();
        let id = store.create("Leads March.xlsx", Table::default(), 0);
        let session = store.get(id).expect("session");
        assert_eq!(session.export_filename(), "Leads March_cleaned.csv");
    }

    #[test]
    fn export_filename_falls_back_without_stem() {
        let mut store = SessionStore::new();
        let id = store.create("", Table::default(), 0);
        let session = store.get(id).expect("session");
        assert_eq!(session.export_filename(), "cleaned_contacts.csv");
    }
}
