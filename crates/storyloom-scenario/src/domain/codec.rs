//! JSON load/save for scenario documents.
//!
//! Load is parse, then validate the raw value, then convert to the typed
//! model. Save writes the typed model back in the same shape with key order
//! intact.

use serde_json::Value;
use sha2::{Digest, Sha256};
use storyloom_core::error::DomainError;

use super::document::ScenarioDocument;
use super::validation::validate_value;

/// Parses and validates a scenario from JSON text.
///
/// # Errors
///
/// Returns `DomainError::Parse` for malformed JSON and
/// `DomainError::InvalidScenario` with every problem found otherwise.
pub fn parse_scenario(input: &str) -> Result<ScenarioDocument, DomainError> {
    let value: Value = serde_json::from_str(input).map_err(|e| DomainError::Parse(e.to_string()))?;
    scenario_from_value(value)
}

/// Validates and converts an already-parsed JSON value.
///
/// # Errors
///
/// Returns `DomainError::InvalidScenario` with every problem found.
pub fn scenario_from_value(value: Value) -> Result<ScenarioDocument, DomainError> {
    validate_value(&value).map_err(DomainError::InvalidScenario)?;
    serde_json::from_value(value).map_err(|e| DomainError::Parse(e.to_string()))
}

/// Serializes a document as pretty-printed JSON.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if serialization fails.
pub fn to_json(document: &ScenarioDocument) -> Result<String, DomainError> {
    serde_json::to_string_pretty(document)
        .map_err(|e| DomainError::Infrastructure(format!("scenario serialization failed: {e}")))
}

/// Hex SHA-256 of the serialized document. Identical documents hash the
/// same, so sessions can record exactly which revision they played.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if serialization fails.
pub fn version_hash(document: &ScenarioDocument) -> Result<String, DomainError> {
    let json = to_json(document)?;
    Ok(format!("{:x}", Sha256::digest(json.as_bytes())))
}
