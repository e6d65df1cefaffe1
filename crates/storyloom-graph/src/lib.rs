//! Storyloom Graph — turns a scenario into nodes and labelled edges for a
//! visualizer. Layout and drawing belong to the consumer.

pub mod application;
pub mod domain;
