pub mod core;
pub mod enrichment;
pub mod models;
pub mod store;
pub mod utils;

pub use core::{ContactLookup, RiskProvider};
pub use models::{ContactReport, ContactType, EnrichmentData, NewReport, SecurityStatus};
pub use store::{FileBackend, MemoryBackend, ReportStore, StorageBackend};
pub use utils::{Result, TrackerError};
