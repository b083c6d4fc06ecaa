//! Completion system for SCQL query fields
//!
//! This module turns keystrokes into committed tokens and a ranked list of
//! suggestions. It is a small state machine over grammar metadata plus a
//! path search over the record schema, and it works on incomplete input.
//!
//! # Architecture
//!
//! - **Position**: Classifies the slot after the last committed token
//! - **Predictor**: Lists the token types admissible in that slot
//! - **Parens**: Tracks open groups for `CLOSE_PAREN` and the full text
//! - **Attribute**: Resolves dotted property paths against a schema
//! - **Engine**: Owns the text and token stack and runs the pipeline
//! - **Snapshot**: The settled result of one mutation
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use scql_guesser::completion::QueryGuesser;
//! use scql_guesser::schema::{Attribute, AttributeTable, SchemaRegistry};
//!
//! let registry = SchemaRegistry::new();
//! let mut attributes = AttributeTable::new();
//! attributes.insert("age".to_string(), Attribute::scalar("Number"));
//! registry.define("Person", attributes);
//!
//! let mut guesser = QueryGuesser::builder()
//!     .schema(Arc::new(registry))
//!     .root_type("Person")
//!     .build()
//!     .unwrap();
//!
//! guesser.set_current_text("a").unwrap();
//! assert_eq!(guesser.guesses(), &["age"]);
//! ```

mod attribute;
mod engine;
mod parens;
mod position;
mod predictor;
mod snapshot;

pub use attribute::{AttributeGuesser, ResolvedPath};
pub use engine::{GuesserOptions, Observer, QueryGuesser, QueryGuesserBuilder, default_excluded};
pub use parens::{closing_paren_count, has_unclosed_group};
pub use position::QueryPosition;
pub use predictor::{predict_next_token, predict_next_token_types};
pub use snapshot::{Snapshot, full_text};
