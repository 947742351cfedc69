pub mod backend;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};

use crate::models::{ContactReport, NewReport};
use crate::utils::Result;

/// Repository of community contact reports.
///
/// Holds the full list in memory (newest first) and rewrites the backing
/// slot on every mutation. There is no update or delete path and no size
/// cap; reports are append-only.
pub struct ReportStore {
    backend: Box<dyn StorageBackend>,
    reports: Vec<ContactReport>,
}

impl ReportStore {
    /// Load the store from a backend. Never fails: an unreadable or
    /// malformed slot is logged and treated as an empty list.
    pub fn open(backend: Box<dyn StorageBackend>) -> Self {
        let reports = match backend.read() {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<ContactReport>>(&raw) {
                Ok(reports) => reports,
                Err(e) => {
                    tracing::warn!("Malformed report data, starting empty: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read report slot, starting empty: {}", e);
                Vec::new()
            }
        };

        tracing::debug!("Loaded {} reports", reports.len());

        Self { backend, reports }
    }

    /// All reports, newest first.
    pub fn reports(&self) -> &[ContactReport] {
        &self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Assign an id and timestamp, prepend, and persist the whole list.
    pub fn add(&mut self, new: NewReport) -> Result<ContactReport> {
        let report = new.into_report();
        self.reports.insert(0, report.clone());
        self.persist()?;

        tracing::info!(
            "Recorded report {} for {} ({} total)",
            report.id,
            report.contact,
            self.reports.len()
        );

        Ok(report)
    }

    /// Case-insensitive exact match against stored contacts. First match in
    /// list order wins when a contact was reported more than once.
    pub fn find_match(&self, query: &str) -> Option<&ContactReport> {
        let query = query.to_lowercase();
        self.reports
            .iter()
            .find(|r| r.contact.to_lowercase() == query)
    }

    fn persist(&self) -> Result<()> {
        let payload = serde_json::to_string_pretty(&self.reports)?;
        self.backend.write(&payload)
    }
}
