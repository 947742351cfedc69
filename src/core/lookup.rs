use crate::core::RiskProvider;
use crate::models::{ContactType, EnrichmentData};
use crate::store::ReportStore;
use crate::utils::Result;
use std::sync::Arc;

/// Orchestrates a contact lookup: community reports first, external
/// enrichment only on a miss.
pub struct ContactLookup {
    provider: Arc<dyn RiskProvider>,
}

impl ContactLookup {
    pub fn new(provider: Arc<dyn RiskProvider>) -> Self {
        Self { provider }
    }

    /// Look up a contact.
    ///
    /// A case-insensitive exact match against a stored report wins outright
    /// and is answered locally (FLAGGED, risk score 95) without touching the
    /// provider. Otherwise the provider is called exactly once with the
    /// declared type, or the detected one when none was declared. Provider
    /// errors propagate unchanged; there is no retry.
    pub async fn search(
        &self,
        store: &ReportStore,
        query: &str,
        declared_type: Option<ContactType>,
    ) -> Result<EnrichmentData> {
        let contact_type = declared_type.unwrap_or_else(|| ContactType::detect(query));

        if let Some(report) = store.find_match(query) {
            tracing::info!(
                "Local report match for {} (reported {})",
                report.contact,
                report.flagged_date()
            );
            return Ok(EnrichmentData::from_report(report));
        }

        tracing::info!(
            "No local report for {}, consulting {}",
            query,
            self.provider.name()
        );

        self.provider.lookup(query, contact_type).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EnrichmentDetails, NewReport, SecurityStatus};
    use crate::store::MemoryBackend;
    use crate::utils::TrackerError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Deterministic provider that records how it was called.
    struct MockProvider {
        calls: AtomicUsize,
        last_type: Mutex<Option<ContactType>>,
        fail: bool,
    }

    impl MockProvider {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                last_type: Mutex::new(None),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self { fail: true, ..Self::new() }
        }
    }

    #[async_trait]
    impl RiskProvider for MockProvider {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn lookup(
            &self,
            contact: &str,
            contact_type: ContactType,
        ) -> Result<EnrichmentData> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_type.lock().unwrap() = Some(contact_type);

            if self.fail {
                return Err(TrackerError::ApiError("mock failure".to_string()));
            }

            Ok(EnrichmentData {
                contact: contact.to_string(),
                contact_type,
                status: SecurityStatus::Safe,
                risk_score: 5,
                details: EnrichmentDetails {
                    carrier: None,
                    location: None,
                    profile_name: None,
                    domain_info: None,
                    is_spam_likely: false,
                    last_flagged: None,
                    summary: "No risk signals found.".to_string(),
                },
            })
        }
    }

    fn store_with_report(contact: &str) -> ReportStore {
        let mut store = ReportStore::open(Box::new(MemoryBackend::new()));
        store
            .add(NewReport {
                contact: contact.to_string(),
                contact_type: ContactType::detect(contact),
                reason: "spam calls".to_string(),
                reporter_name: None,
            })
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_local_match_skips_provider() {
        let provider = Arc::new(MockProvider::new());
        let lookup = ContactLookup::new(provider.clone());
        let store = store_with_report("+15550000000");

        let result = lookup.search(&store, "+15550000000", None).await.unwrap();

        assert_eq!(result.status, SecurityStatus::Flagged);
        assert_eq!(result.risk_score, 95);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_local_match_is_case_insensitive() {
        let provider = Arc::new(MockProvider::new());
        let lookup = ContactLookup::new(provider.clone());
        let store = store_with_report("Scam@Example.com");

        let result = lookup.search(&store, "scam@example.com", None).await.unwrap();

        assert_eq!(result.status, SecurityStatus::Flagged);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_miss_delegates_once_with_detected_type() {
        let provider = Arc::new(MockProvider::new());
        let lookup = ContactLookup::new(provider.clone());
        let store = ReportStore::open(Box::new(MemoryBackend::new()));

        let result = lookup.search(&store, "fresh@example.com", None).await.unwrap();

        assert_eq!(result.status, SecurityStatus::Safe);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            *provider.last_type.lock().unwrap(),
            Some(ContactType::Email)
        );
    }

    #[tokio::test]
    async fn test_declared_type_overrides_detection() {
        let provider = Arc::new(MockProvider::new());
        let lookup = ContactLookup::new(provider.clone());
        let store = ReportStore::open(Box::new(MemoryBackend::new()));

        lookup
            .search(&store, "12345", Some(ContactType::Email))
            .await
            .unwrap();

        assert_eq!(
            *provider.last_type.lock().unwrap(),
            Some(ContactType::Email)
        );
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let provider = Arc::new(MockProvider::failing());
        let lookup = ContactLookup::new(provider.clone());
        let store = ReportStore::open(Box::new(MemoryBackend::new()));

        let err = lookup.search(&store, "+15550000000", None).await.unwrap_err();
        assert!(matches!(err, TrackerError::ApiError(_)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }
}
