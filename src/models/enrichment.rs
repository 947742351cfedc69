use super::report::{ContactReport, ContactType};
use serde::{Deserialize, Serialize};

/// Overall verdict for a looked-up contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SecurityStatus {
    Safe,
    Flagged,
    Unknown,
}

impl SecurityStatus {
    pub fn emoji(&self) -> &'static str {
        match self {
            SecurityStatus::Safe => "🟢",
            SecurityStatus::Flagged => "🔴",
            SecurityStatus::Unknown => "🟡",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SecurityStatus::Safe => "APPEARS SAFE",
            SecurityStatus::Flagged => "FLAGGED",
            SecurityStatus::Unknown => "UNKNOWN",
        }
    }
}

/// Per-contact enrichment details. Phone lookups populate carrier/location,
/// email lookups populate profile/domain info; either may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_info: Option<String>,
    pub is_spam_likely: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_flagged: Option<String>,
    pub summary: String,
}

/// Risk assessment for a single contact. Transient: produced per search and
/// replaced by the next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentData {
    pub contact: String,
    #[serde(rename = "type")]
    pub contact_type: ContactType,
    pub status: SecurityStatus,
    /// 0-100, higher is more likely unauthorized/malicious.
    pub risk_score: u8,
    pub details: EnrichmentDetails,
}

impl EnrichmentData {
    /// Synthesize a result from a community report, without consulting any
    /// external provider. Fixed policy: FLAGGED with a risk score of 95.
    pub fn from_report(report: &ContactReport) -> Self {
        Self {
            contact: report.contact.clone(),
            contact_type: report.contact_type,
            status: SecurityStatus::Flagged,
            risk_score: 95,
            details: EnrichmentDetails {
                carrier: None,
                location: None,
                profile_name: None,
                domain_info: None,
                is_spam_likely: true,
                last_flagged: Some(report.flagged_date()),
                summary: format!(
                    "This contact was manually reported by our users. Reason: {}",
                    report.reason
                ),
            },
        }
    }
}

impl std::fmt::Display for EnrichmentData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "═══════════════════════════════════════════════════════════")?;
        writeln!(f, "              CONTACT SECURITY REPORT")?;
        writeln!(f, "═══════════════════════════════════════════════════════════")?;
        writeln!(f)?;
        writeln!(f, "Contact: {} ({})", self.contact, self.contact_type)?;
        writeln!(f)?;
        writeln!(f, "═══ VERDICT ═══")?;
        writeln!(f, "{} {}", self.status.emoji(), self.status.label())?;
        writeln!(f, "Risk Score: {}/100", self.risk_score)?;
        writeln!(f, "Spam Likely: {}", if self.details.is_spam_likely { "yes" } else { "no" })?;

        if let Some(carrier) = &self.details.carrier {
            writeln!(f, "Carrier: {}", carrier)?;
        }
        if let Some(location) = &self.details.location {
            writeln!(f, "Location: {}", location)?;
        }
        if let Some(profile) = &self.details.profile_name {
            writeln!(f, "Profile: {}", profile)?;
        }
        if let Some(domain) = &self.details.domain_info {
            writeln!(f, "Domain: {}", domain)?;
        }
        if let Some(flagged) = &self.details.last_flagged {
            writeln!(f, "Last Flagged: {}", flagged)?;
        }

        writeln!(f)?;
        writeln!(f, "═══ SUMMARY ═══")?;
        writeln!(f, "{}", self.details.summary)?;
        writeln!(f)?;
        writeln!(f, "═══════════════════════════════════════════════════════════")?;

        Ok(())
    }
}
