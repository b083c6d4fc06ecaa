//! Settled engine state
//!
//! A [`Snapshot`] is built once per mutation, after every derived value has
//! been recomputed, and is what observers receive.

use serde::Serialize;

use super::position::QueryPosition;
use crate::parser::{Token, TokenType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub current_text: String,
    pub tokens: Vec<Token>,
    /// `None` when the position could not be classified
    pub position: Option<QueryPosition>,
    pub predictions: Vec<TokenType>,
    pub guesses: Vec<String>,
    pub is_valid_query: bool,
    pub closing_paren_count: usize,
    pub full_text: String,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            current_text: String::new(),
            tokens: Vec::new(),
            position: Some(QueryPosition::Beginning),
            predictions: Vec::new(),
            guesses: Vec::new(),
            is_valid_query: true,
            closing_paren_count: 0,
            full_text: String::new(),
        }
    }
}

/// Reconstruct the query as typed, closing any open groups
///
/// Token literals and the current text are joined by single spaces, then
/// `" )"` is appended once per open group.
pub fn full_text(tokens: &[Token], current_text: &str, closing_paren_count: usize) -> String {
    let mut parts: Vec<String> = tokens.iter().map(Token::literal).collect();
    if !current_text.is_empty() {
        parts.push(current_text.to_string());
    }

    let mut text = parts.join(" ");
    text.push_str(&" )".repeat(closing_paren_count));
    text
}
