//! Next-token predictor
//!
//! Turns a [`QueryPosition`] into the token types that may legally come
//! next. The result is a list of types, not text; the engine materializes
//! it into suggestions.

use super::parens::has_unclosed_group;
use super::position::QueryPosition;
use crate::error::GuessError;
use crate::parser::{Grammar, Token, TokenType, ValueType};

/// Admissible next token types at `position`, in grammar order
///
/// `has_unclosed_group` decides whether `CLOSE_PAREN` is offered after a
/// complete expression.
pub fn predict_next_token_types(
    position: QueryPosition,
    grammar: &Grammar,
    has_unclosed_group: bool,
) -> Vec<TokenType> {
    let matching = |keep: fn(TokenType, Option<ValueType>, Option<ValueType>) -> bool| {
        grammar
            .iter()
            .filter(move |(t, d)| keep(*t, d.eval_type, d.left_type))
            .map(|(t, _)| t)
    };

    match position {
        QueryPosition::Beginning => {
            let mut types = vec![TokenType::OpenParen, TokenType::Property];
            types.extend(matching(|_, eval, left| {
                eval == Some(ValueType::Boolean) && left.is_none()
            }));
            types
        }
        QueryPosition::Middle => matching(|_, eval, left| {
            eval == Some(ValueType::Boolean) && left == Some(ValueType::Primitive)
        })
        .collect(),
        QueryPosition::End => matching(|t, eval, _| {
            t != TokenType::Property && eval == Some(ValueType::Primitive)
        })
        .collect(),
        QueryPosition::After => {
            let mut types = Vec::new();
            if has_unclosed_group {
                types.push(TokenType::CloseParen);
            }
            types.extend(matching(|_, eval, left| {
                eval == Some(ValueType::Boolean) && left == Some(ValueType::Boolean)
            }));
            types
        }
        QueryPosition::Unknown => Vec::new(),
    }
}

/// Classify, track parens and predict for a whole committed stack
pub fn predict_next_token(tokens: &[Token], grammar: &Grammar) -> Result<Vec<TokenType>, GuessError> {
    let position = QueryPosition::classify(tokens.last(), grammar)?;
    Ok(predict_next_token_types(
        position,
        grammar,
        has_unclosed_group(tokens),
    ))
}
