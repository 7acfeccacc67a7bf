//! Mirrors Google Tasks into a Notion database.
//!
//! The [`sync`] module holds the reconciliation core. [`connectors`] holds the
//! clients for both remote stores, and [`scheduler`] repeats passes on a fixed
//! interval.

pub mod config;
pub mod connectors;
pub mod scheduler;
pub mod sync;
