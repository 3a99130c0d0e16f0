//! Output format specifications.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Supported output formats for the operator CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned plain text for terminals
    #[default]
    Human,

    /// Pretty-printed JSON document
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Human => write!(f, "human"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl OutputFormat {
    /// Whether this format is meant for machine consumption.
    pub fn is_machine(self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_value_names() {
        for format in OutputFormat::value_variants() {
            let value = format.to_possible_value().expect("no skipped variants");
            assert_eq!(value.get_name(), format.to_string());
        }
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&OutputFormat::Json).unwrap(), "\"json\"");
        assert_eq!(
            serde_json::from_str::<OutputFormat>("\"human\"").unwrap(),
            OutputFormat::Human
        );
    }

    #[test]
    fn test_is_machine() {
        assert!(OutputFormat::Json.is_machine());
        assert!(!OutputFormat::Human.is_machine());
    }
}
