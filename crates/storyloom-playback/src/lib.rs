//! Storyloom Playback — plays a validated scenario one choice at a time.
//!
//! Sessions are event-sourced aggregates. Each session snapshots the scenario
//! it was started from and owns its character state, so any number of
//! sessions can run over the same scenario without sharing attributes.

pub mod application;
pub mod domain;
