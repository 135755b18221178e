//! # deedlead Common Library
//!
//! Shared code for the deedlead lead tracker:
//! - Database initialization, models and queries
//! - CSV lead import pipeline (tokenizer, header mapping, row conversion, gate)
//! - Configuration loading
//! - Common error type

pub mod config;
pub mod db;
pub mod error;
pub mod import;

pub use error::{Error, Result};
