//! # Grantdesk Criteria
//!
//! Grant-suitability criteria configuration: the structured keyword lists a
//! company context carries to steer suitability guidance (strong yes/no plus
//! conditional-yes categories), and the built-in defaults used to seed new
//! records.

use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CriteriaError>;

#[derive(Error, Debug)]
pub enum CriteriaError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Keyword lists that only count in favor of a grant when a category matches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ConditionalYes {
    #[serde(default)]
    pub technical_systems: Vec<String>,
    #[serde(default)]
    pub sociotech_modeling: Vec<String>,
}

/// Grant-matching criteria attached to a company context.
///
/// Every field defaults to an empty list on deserialization, so documents
/// written by older or sparser producers never surface `null` sub-fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CriteriaConfig {
    #[serde(default)]
    pub strong_yes: Vec<String>,
    #[serde(default)]
    pub strong_no: Vec<String>,
    #[serde(default)]
    pub conditional_yes: ConditionalYes,
}

fn keywords(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Built-in default criteria.
///
/// Returns a freshly constructed value on every call: callers own their copy
/// outright and may mutate it without affecting any other record's criteria.
#[must_use]
pub fn default_criteria() -> CriteriaConfig {
    CriteriaConfig {
        strong_yes: keywords(&[
            "SBIR",
            "STTR",
            "early-stage",
            "Phase I",
            "Phase II",
            "emerging technology",
            "small business innovation",
            "commercialization pathway",
            "technology de-risking",
            "startup-friendly",
            "NSF",
            "pilot project",
            "dual-use",
        ]),
        strong_no: keywords(&[
            "urban planning",
            "transportation modeling",
            "community behavior analytics",
            "infrastructure investment",
            "socioeconomic planning",
        ]),
        conditional_yes: ConditionalYes {
            technical_systems: keywords(&[
                "resilient systems",
                "zero-trust",
                "autonomous",
                "decision-making",
                "secure data workflows",
                "operational AI",
            ]),
            sociotech_modeling: keywords(&[
                "human decision-making",
                "data-informed decisions",
                "mission planning",
                "workflow augmentation",
                "data visualization",
            ]),
        },
    }
}

/// Two-tier defaults lookup: an external criteria document when one exists,
/// otherwise the built-in set.
///
/// A missing file or a file that does not parse as a criteria document falls
/// back to [`default_criteria`] (the parse failure is logged). Any other I/O
/// error class, such as a permission failure, propagates to the caller rather
/// than being masked by the fallback.
pub fn load_default_criteria(path: &Path) -> Result<CriteriaConfig> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(default_criteria()),
        Err(e) => return Err(e.into()),
    };
    match serde_json::from_str(&raw) {
        Ok(config) => Ok(config),
        Err(e) => {
            log::warn!(
                "criteria defaults at {} are not valid JSON ({e}); using built-in defaults",
                path.display()
            );
            Ok(default_criteria())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_criteria_returns_independent_copies() {
        let mut first = default_criteria();
        first.strong_yes.clear();
        first.conditional_yes.technical_systems.push("quantum".into());

        let second = default_criteria();
        assert!(!second.strong_yes.is_empty());
        assert!(!second
            .conditional_yes
            .technical_systems
            .contains(&"quantum".to_string()));
    }

    #[test]
    fn missing_subfields_deserialize_to_empty_lists() {
        let config: CriteriaConfig = serde_json::from_str("{}").expect("parse");
        assert_eq!(config.strong_yes, Vec::<String>::new());
        assert_eq!(config.strong_no, Vec::<String>::new());
        assert_eq!(config.conditional_yes.technical_systems, Vec::<String>::new());
        assert_eq!(config.conditional_yes.sociotech_modeling, Vec::<String>::new());
    }

    #[test]
    fn partial_conditional_yes_keeps_other_category_empty() {
        let config: CriteriaConfig = serde_json::from_str(
            r#"{"conditional_yes": {"technical_systems": ["zero-trust"]}}"#,
        )
        .expect("parse");
        assert_eq!(config.conditional_yes.technical_systems, vec!["zero-trust"]);
        assert_eq!(config.conditional_yes.sociotech_modeling, Vec::<String>::new());
    }

    #[test]
    fn external_defaults_win_when_present() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("criteria.json");
        std::fs::write(&path, r#"{"strong_yes": ["ARPA-E"]}"#).expect("write");

        let config = load_default_criteria(&path).expect("load");
        assert_eq!(config.strong_yes, vec!["ARPA-E"]);
        assert_eq!(config.strong_no, Vec::<String>::new());
    }

    #[test]
    fn absent_external_file_falls_back_to_builtin() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let config = load_default_criteria(&dir.path().join("missing.json")).expect("load");
        assert_eq!(config, default_criteria());
    }

    #[test]
    fn invalid_external_file_falls_back_to_builtin() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("criteria.json");
        std::fs::write(&path, "not valid json").expect("write");

        let config = load_default_criteria(&path).expect("load");
        assert_eq!(config, default_criteria());
    }
}
