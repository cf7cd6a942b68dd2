//! Sequence handling: turning annotated per-model sequences into bare residue strings
//! and reading design variants off them using the master sequence's variable regions.

pub mod annotation;
pub mod regions;
