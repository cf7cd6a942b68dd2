//! # Workflows Module
//!
//! Top-level entry points that tie the [`core`](crate::core) parser and exporters to a
//! validated [`HarvestConfig`](crate::engine::config::HarvestConfig).
//!
//! - **Harvest Workflow** ([`harvest`]) - One forward pass over a silent file, followed by
//!   the JSON aggregate and the ranked CSV shortlist.

pub mod harvest;
