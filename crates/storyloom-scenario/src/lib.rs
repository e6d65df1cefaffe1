//! Storyloom — scenario document model, validation and authoring.
//!
//! Owns the typed representation of a branching narrative, the validator
//! that gates every consumer, the JSON codec, and the authoring operations
//! that edit a stored scenario.

pub mod application;
pub mod domain;
pub mod memory;
