//! # Core Module
//!
//! Stateless building blocks for harvesting design variants from silent files.
//!
//! ## Architecture
//!
//! - **Sequences** ([`sequence`]) - Annotation stripping, design-position grouping and
//!   variant extraction from a master sequence
//! - **Data Models** ([`models`]) - The sequence-variant key and the score table that
//!   aggregates observations per key
//! - **File I/O** ([`io`]) - The line-driven silent-file parser and the JSON / CSV exporters
//!
//! ## Data Flow
//!
//! The master sequence is grouped into variable regions once per file. Each model record
//! is then stripped, checked against the master length, reduced to a variant key and,
//! if complete, appended to the score table. Exporters consume the finished table.

pub mod io;
pub mod models;
pub mod sequence;
