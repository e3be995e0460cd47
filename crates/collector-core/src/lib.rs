//! Core types and trait definitions for the collector records store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod collector;
pub mod dates;
pub mod error;
pub mod export;
pub mod report;
pub mod status;
pub mod store;
pub mod validate;

pub use error::{Error, Result};
