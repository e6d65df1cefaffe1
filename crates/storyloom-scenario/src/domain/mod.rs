//! Domain layer for the scenario context.

pub mod codec;
pub mod commands;
pub mod document;
pub mod repository;
pub mod validation;
