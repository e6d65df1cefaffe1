//! Domain layer for graph projection.

pub mod dot;
pub mod projection;
