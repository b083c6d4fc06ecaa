//! Parenthesis balance over a token stack

use crate::parser::{Token, TokenType};

fn weight(token: &Token) -> i64 {
    match token.token_type {
        TokenType::OpenParen => 1,
        TokenType::CloseParen => -1,
        _ => 0,
    }
}

/// Number of groups still open across the whole stack
///
/// A stack with more closers than openers counts as zero.
pub fn closing_paren_count(tokens: &[Token]) -> usize {
    let balance: i64 = tokens.iter().map(weight).sum();
    usize::try_from(balance).unwrap_or(0)
}

/// Whether the end of the stack sits inside an unclosed group
///
/// Scans from the last token backward and stops at the first point where
/// openers outnumber closers.
pub fn has_unclosed_group(tokens: &[Token]) -> bool {
    let mut balance = 0i64;
    for token in tokens.iter().rev() {
        balance += weight(token);
        if balance > 0 {
            return true;
        }
    }
    false
}
