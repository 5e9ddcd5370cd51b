//! Fantasy XV: budget-constrained rugby fantasy squad selector
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod scoring;
pub mod selection;
pub mod report;
pub mod storage;
pub mod runner;
