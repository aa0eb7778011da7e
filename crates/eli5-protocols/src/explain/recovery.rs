//! Outcome of a best-effort recovery attempt.

use std::fmt;

use serde_json::Value;

/// Recovery techniques, in the order they are attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStrategy {
    BraceExtraction,
    BracketExtraction,
    PropertyReconstruction,
    FieldScrape,
}

impl fmt::Display for RecoveryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BraceExtraction => "brace_extraction",
            Self::BracketExtraction => "bracket_extraction",
            Self::PropertyReconstruction => "property_reconstruction",
            Self::FieldScrape => "field_scrape",
        };
        f.write_str(name)
    }
}

/// What a recovery strategy (or the whole chain) produced.
#[derive(Debug, Clone, PartialEq)]
pub enum RecoveryOutcome {
    Recovered {
        strategy: RecoveryStrategy,
        data: Value,
    },
    Failed,
}

impl RecoveryOutcome {
    pub fn recovered(strategy: RecoveryStrategy, data: Value) -> Self {
        Self::Recovered { strategy, data }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Recovered { .. })
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Recovered { data, .. } => Some(data),
            Self::Failed => None,
        }
    }

    pub fn into_data(self) -> Option<Value> {
        match self {
            Self::Recovered { data, .. } => Some(data),
            Self::Failed => None,
        }
    }

    pub fn strategy(&self) -> Option<RecoveryStrategy> {
        match self {
            Self::Recovered { strategy, .. } => Some(*strategy),
            Self::Failed => None,
        }
    }
}
