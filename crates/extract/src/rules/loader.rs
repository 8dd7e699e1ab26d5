// ABOUTME: Loader for extraction rule sets from embedded JSON data or user-supplied files.
// ABOUTME: Provides load_builtin_rules() for the default OFD rule set and Rules::from_path for overrides.

//! Rule set loading.
//!
//! The builtin rule set is tuned for one family of OFD receipt pages. Callers
//! who track a different family (or a changed one) load their own JSON file
//! with the same shape; missing fields default to empty lists.

use std::fs;
use std::path::Path;

use crate::error::ExtractError;
use crate::rules::{CompiledRules, Rules};

/// Embedded JSON containing the builtin OFD rule set.
const BUILTIN_RULES_JSON: &str = include_str!("../../data/rules.json");

/// Parses the embedded builtin rule set without compiling it.
///
/// # Panics
///
/// Panics if the embedded JSON is malformed or cannot be deserialized.
pub fn builtin_rules() -> Rules {
    serde_json::from_str(BUILTIN_RULES_JSON).expect("failed to parse builtin rules")
}

/// Loads and compiles the builtin rule set.
///
/// # Panics
///
/// Panics if the embedded rules contain an invalid selector or pattern.
pub fn load_builtin_rules() -> CompiledRules {
    builtin_rules()
        .compile()
        .expect("failed to compile builtin rules")
}

impl Rules {
    /// Parses a rule set from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ExtractError> {
        serde_json::from_str(json).map_err(|e| {
            ExtractError::config("ParseRules", "invalid rules JSON", Some(anyhow::Error::new(e)))
        })
    }

    /// Reads and parses a rule set from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ExtractError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| ExtractError::io("ReadRules", path.display().to_string(), e))?;
        Self::from_json(&json)
    }
}
