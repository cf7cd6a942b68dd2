//! Provides input/output for silent files and the artifacts derived from them.
//!
//! [`silent`] reads the line-oriented model records and aggregates their scores;
//! [`export`] writes the aggregate as JSON and as a ranked CSV shortlist through the
//! [`traits::TableExporter`] interface.

pub mod export;
pub mod silent;
pub mod traits;
