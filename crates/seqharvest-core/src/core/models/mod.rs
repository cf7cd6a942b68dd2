//! Data structures shared by the parser and the exporters: the sequence-variant key
//! and the score table that aggregates observations per key.

pub mod table;
pub mod variant;
