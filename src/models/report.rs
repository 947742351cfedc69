use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Kind of contact being checked or reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContactType {
    Phone,
    Email,
}

impl ContactType {
    /// Classify a raw query string. Anything containing `@` is treated as an
    /// email address, everything else as a phone number. No syntax validation.
    pub fn detect(raw: &str) -> Self {
        if raw.contains('@') {
            ContactType::Email
        } else {
            ContactType::Phone
        }
    }
}

impl std::fmt::Display for ContactType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContactType::Phone => write!(f, "PHONE"),
            ContactType::Email => write!(f, "EMAIL"),
        }
    }
}

impl FromStr for ContactType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "phone" => Ok(ContactType::Phone),
            "email" => Ok(ContactType::Email),
            other => Err(format!("unknown contact type: {other} (expected phone or email)")),
        }
    }
}

/// A user-submitted report flagging a contact as unauthorized/spam.
///
/// Field names on the wire are pinned to the persisted slot schema
/// (camelCase, `type` for the kind), so existing stored data loads
/// unchanged. Reports are immutable once created and never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactReport {
    pub id: String,
    pub contact: String,
    #[serde(rename = "type")]
    pub contact_type: ContactType,
    pub reason: String,
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter_name: Option<String>,
}

impl ContactReport {
    /// Matched-report date, used as `lastFlagged` in synthesized results.
    pub fn flagged_date(&self) -> String {
        chrono::DateTime::from_timestamp_millis(self.timestamp)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// Report as submitted by the user, before the store assigns an id and
/// timestamp.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub contact: String,
    pub contact_type: ContactType,
    pub reason: String,
    pub reporter_name: Option<String>,
}

impl NewReport {
    pub fn into_report(self) -> ContactReport {
        ContactReport {
            id: Uuid::new_v4().to_string(),
            contact: self.contact,
            contact_type: self.contact_type,
            reason: self.reason,
            timestamp: Utc::now().timestamp_millis(),
            reporter_name: self.reporter_name,
        }
    }
}
