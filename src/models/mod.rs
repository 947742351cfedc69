pub mod enrichment;
pub mod report;

pub use enrichment::{EnrichmentData, EnrichmentDetails, SecurityStatus};
pub use report::{ContactReport, ContactType, NewReport};
