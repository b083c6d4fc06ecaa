//! SCQL grammar, tokenizer and validator
//!
//! This module holds the query-language side of the guesser: what the
//! symbols are, how raw text becomes tokens, and whether a token sequence is
//! a complete query.
//!
//! # Architecture
//!
//! - `grammar`: Token types and their descriptors ([`Grammar::scql`] is the default language)
//! - `token`: Token instances and their literal text
//! - `lexer`: The [`Tokenizer`] seam and its grammar-driven default, [`ScqlLexer`]
//! - `validator`: The [`QueryValidator`] seam and its default, [`TreeValidator`]
//!
//! # Examples
//!
//! ```no_run
//! use scql_guesser::parser::{Grammar, QueryValidator, ScqlLexer, Tokenizer, TreeValidator};
//!
//! let grammar = Grammar::scql();
//! let tokens = ScqlLexer.tokenize("age >= 21 AND name BEGINS_WITH 'J'", &grammar);
//! assert!(TreeValidator.validate(&tokens, &grammar).is_ok());
//! ```

mod grammar;
mod lexer;
mod token;
mod validator;

// Re-export public API
pub use grammar::{
    CharClass, Delimiter, Grammar, GrammarBuilder, Lexeme, TokenDescriptor, TokenType, ValueType,
};
pub use lexer::{ScqlLexer, Tokenizer};
pub use token::Token;
pub use validator::{QueryValidator, TokenTree, TreeValidator};
