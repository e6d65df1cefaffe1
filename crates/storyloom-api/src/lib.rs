//! Storyloom API — HTTP surface for authoring, playback and visualization.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
