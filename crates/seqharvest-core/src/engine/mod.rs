//! # Engine Module
//!
//! Run-level plumbing shared by the workflows: the validated [`config::HarvestConfig`]
//! and its builder, the [`error::EngineError`] umbrella over parser, exporter and
//! configuration failures, and [`progress`] reporting through an optional callback.

pub mod config;
pub mod error;
pub mod progress;
