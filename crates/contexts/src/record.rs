use chrono::{SecondsFormat, Utc};
use grantdesk_criteria::{default_criteria, CriteriaConfig};
use serde::{Deserialize, Serialize};

/// One named company context: background text plus the grant-matching
/// criteria used to judge grant suitability for that company.
///
/// Every field defaults on deserialization so imports of structurally sparse
/// documents (down to `{"company_name": "X"}`) still produce a fully shaped
/// record with empty criteria lists rather than missing fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ContextRecord {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub company_context: String,
    #[serde(default)]
    pub preferred_grant_criteria: CriteriaConfig,
    /// RFC 3339, stamped once when the record first exists.
    #[serde(default)]
    pub created: String,
    /// RFC 3339, refreshed on every save.
    #[serde(default)]
    pub last_updated: String,
}

impl ContextRecord {
    /// Blank record seeded with the given criteria. Both timestamps are set
    /// to now. This is the seam for callers that resolve their default
    /// criteria elsewhere, such as an external defaults document.
    #[must_use]
    pub fn with_criteria(preferred_grant_criteria: CriteriaConfig) -> Self {
        let now = now_rfc3339();
        Self {
            company_name: String::new(),
            company_context: String::new(),
            preferred_grant_criteria,
            created: now.clone(),
            last_updated: now,
        }
    }

    /// Blank record seeded with a fresh copy of the built-in default
    /// criteria.
    #[must_use]
    pub fn new_default() -> Self {
        Self::with_criteria(default_criteria())
    }
}

/// Current UTC time in a fixed-width RFC 3339 form, so persisted timestamps
/// compare chronologically as plain strings.
#[must_use]
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_record_carries_builtin_criteria() {
        let record = ContextRecord::new_default();
        assert_eq!(record.company_name, "");
        assert_eq!(record.company_context, "");
        assert_eq!(record.preferred_grant_criteria, default_criteria());
        assert_eq!(record.created, record.last_updated);
        assert!(!record.created.is_empty());
    }

    #[test]
    fn default_records_do_not_share_criteria() {
        let mut first = ContextRecord::new_default();
        first.preferred_grant_criteria.strong_yes.clear();

        let second = ContextRecord::new_default();
        assert!(!second.preferred_grant_criteria.strong_yes.is_empty());
        assert_eq!(second.preferred_grant_criteria, default_criteria());
    }

    #[test]
    fn with_criteria_keeps_the_caller_supplied_lists() {
        let criteria = CriteriaConfig {
            strong_yes: vec!["ARPA-E".into()],
            ..Default::default()
        };

        let record = ContextRecord::with_criteria(criteria);
        assert_eq!(record.preferred_grant_criteria.strong_yes, vec!["ARPA-E"]);
        assert_eq!(record.preferred_grant_criteria.strong_no, Vec::<String>::new());
        assert_eq!(record.created, record.last_updated);
    }

    #[test]
    fn sparse_document_deserializes_with_empty_criteria() {
        let record: ContextRecord =
            serde_json::from_str(r#"{"company_name": "X"}"#).expect("parse");
        assert_eq!(record.company_name, "X");
        assert_eq!(record.preferred_grant_criteria.strong_yes, Vec::<String>::new());
        assert_eq!(record.created, "");
    }
}
