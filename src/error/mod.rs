//! Error handling module for the query guesser.
//!
//! This module provides error handling with:
//! - A crate-wide [`Result`] alias over [`GuesserError`]
//! - Specific kinds for prediction, validation, grammar, schema and configuration failures
//!
//! # Example
//!
//! ```rust,no_run
//! use scql_guesser::error::{GuesserError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(GuesserError::Generic("not today".to_string()))
//! }
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{
    ConfigError, GrammarError, GuessError, GuesserError, Result, SchemaError, ValidationError,
};
