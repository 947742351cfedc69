use crate::models::{ContactType, EnrichmentData};
use crate::utils::Result;
use async_trait::async_trait;

/// Core abstraction: anything that can assess a contact's risk.
///
/// The production implementation delegates to a hosted model; tests use a
/// deterministic mock. Callers must not assume the returned data is
/// validated beyond the `EnrichmentData` shape itself.
#[async_trait]
pub trait RiskProvider: Send + Sync {
    /// Unique identifier for this provider
    fn name(&self) -> &'static str;

    /// Assess one contact and return its enrichment data
    async fn lookup(&self, contact: &str, contact_type: ContactType) -> Result<EnrichmentData>;
}
