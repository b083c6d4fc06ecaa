//! SCQL Query Guesser Library
//!
//! Autocompletion for SCQL record queries. Given the text a user has typed so
//! far, the guesser commits complete tokens, classifies where the query
//! stands, predicts which token types may come next and turns them into
//! keyword and attribute-path suggestions.
//!
//! # Modules
//!
//! - `cli`: Command-line interface and argument parsing
//! - `completion`: The guesser engine and its pipeline stages
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `formatter`: Output formatting and display
//! - `parser`: Grammar, tokenizer and validator
//! - `schema`: Record types and their attribute tables
//!
//! # Example
//!
//! ```no_run
//! use scql_guesser::QueryGuesser;
//!
//! let mut guesser = QueryGuesser::builder().build().unwrap();
//! guesser.set_current_text("age = 4 AN").unwrap();
//! assert_eq!(guesser.guesses(), &["AND"]);
//! assert_eq!(guesser.full_text(), "age = 4 AN");
//! ```

pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod formatter;
pub mod parser;
pub mod schema;

// Re-export commonly used types
pub use completion::{QueryGuesser, Snapshot};
pub use config::Config;
pub use error::{GuesserError, Result};
pub use formatter::Formatter;
pub use parser::{Grammar, Token, TokenType};
pub use schema::{SchemaProvider, SchemaRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
pub fn version() -> &'static str {
    VERSION
}
