//! # SeqHarvest Core Library
//!
//! Post-processing for structure-prediction silent files produced by sequence design runs:
//! every sampled model is reduced to the residues at the design positions of the master
//! sequence, models are grouped by that variant, and the grouped scores are exported as a
//! full JSON aggregate plus a ranked CSV shortlist.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Sequence handling, the score table, the streaming
//!   silent-file parser and the exporters.
//!
//! - **[`engine`]: Configuration and Plumbing.** The validated run configuration, the
//!   error type shared by workflows, and progress reporting.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures that read an input file and
//!   write both artifacts.

pub mod core;
pub mod engine;
pub mod workflows;
