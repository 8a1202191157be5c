//! attrsync: product attribute description sync
//!
//! Exports attribute terms that have no description to CSV, and applies the
//! descriptions generated for them back to the catalog.

pub mod cli;
pub mod core;
