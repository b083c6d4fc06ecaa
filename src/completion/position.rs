//! Position classifier
//!
//! Maps the last committed token to the grammatical slot the next token
//! will fill. Only the prior token matters; the classifier never looks
//! further back than that.

use std::fmt;

use serde::Serialize;

use crate::error::GuessError;
use crate::parser::{Grammar, Token, TokenType, ValueType};

/// Grammatical slot implied by the committed tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryPosition {
    /// Start of an expression: a property, an open group or a prefix operator
    Beginning,
    /// After a property: an operator consuming it
    Middle,
    /// After a comparison: a literal value
    End,
    /// After a complete expression: a connective or a closing paren
    After,
    /// After text the tokenizer could not read; nothing is predicted
    Unknown,
}

impl QueryPosition {
    /// Classify the position following `last`
    ///
    /// Rules are tried in order and the first match wins. A prior token that
    /// matches none of them means the grammar and the rules disagree, which is
    /// reported as [`GuessError::UnclassifiablePosition`].
    pub fn classify(last: Option<&Token>, grammar: &Grammar) -> Result<Self, GuessError> {
        let Some(token) = last else {
            return Ok(QueryPosition::Beginning);
        };
        let token_type = token.token_type;

        match token_type {
            TokenType::Unknown => return Ok(QueryPosition::Unknown),
            TokenType::OpenParen => return Ok(QueryPosition::Beginning),
            _ => {}
        }

        let unclassifiable = GuessError::UnclassifiablePosition { token_type };
        let Some(descriptor) = grammar.get(token_type) else {
            return match token_type {
                TokenType::CloseParen => Ok(QueryPosition::After),
                _ => Err(unclassifiable),
            };
        };

        let position = match (descriptor.eval_type, descriptor.right_type) {
            (Some(ValueType::Boolean), Some(ValueType::Boolean)) => QueryPosition::Beginning,
            _ if token_type == TokenType::Property => QueryPosition::Middle,
            (Some(ValueType::Boolean), Some(ValueType::Primitive)) => QueryPosition::End,
            (Some(ValueType::Primitive), _) => QueryPosition::After,
            (Some(ValueType::Boolean), None) => QueryPosition::After,
            _ if token_type == TokenType::CloseParen => QueryPosition::After,
            _ => return Err(unclassifiable),
        };
        Ok(position)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryPosition::Beginning => "BEGINNING",
            QueryPosition::Middle => "MIDDLE",
            QueryPosition::End => "END",
            QueryPosition::After => "AFTER",
            QueryPosition::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for QueryPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::TokenDescriptor;
    use rstest::rstest;

    fn classify(token_type: TokenType) -> Result<QueryPosition, GuessError> {
        let token = Token::new(token_type, token_type.as_str());
        QueryPosition::classify(Some(&token), &Grammar::scql())
    }

    #[test]
    fn test_empty_stack_is_beginning() {
        assert_eq!(
            QueryPosition::classify(None, &Grammar::scql()),
            Ok(QueryPosition::Beginning)
        );
    }

    #[rstest]
    #[case(TokenType::Unknown, QueryPosition::Unknown)]
    #[case(TokenType::OpenParen, QueryPosition::Beginning)]
    #[case(TokenType::And, QueryPosition::Beginning)]
    #[case(TokenType::Or, QueryPosition::Beginning)]
    #[case(TokenType::Not, QueryPosition::Beginning)]
    #[case(TokenType::Property, QueryPosition::Middle)]
    #[case(TokenType::Eq, QueryPosition::End)]
    #[case(TokenType::BeginsWith, QueryPosition::End)]
    #[case(TokenType::TypeIs, QueryPosition::End)]
    #[case(TokenType::Number, QueryPosition::After)]
    #[case(TokenType::String, QueryPosition::After)]
    #[case(TokenType::Parameter, QueryPosition::After)]
    #[case(TokenType::True, QueryPosition::After)]
    #[case(TokenType::CloseParen, QueryPosition::After)]
    fn test_scql_positions(#[case] prior: TokenType, #[case] expected: QueryPosition) {
        assert_eq!(classify(prior), Ok(expected));
    }

    #[test]
    fn test_postfix_operator_is_after() {
        let grammar = Grammar::builder()
            .token(
                TokenType::Matches,
                TokenDescriptor::operator(Some(ValueType::Primitive), None),
            )
            .build();
        let token = Token::new(TokenType::Matches, "MATCHES");
        assert_eq!(
            QueryPosition::classify(Some(&token), &grammar),
            Ok(QueryPosition::After)
        );
    }

    #[test]
    fn test_structural_token_without_rule_fails() {
        let grammar = Grammar::builder()
            .token(TokenType::Placeholder, TokenDescriptor::structural())
            .build();
        let token = Token::new(TokenType::Placeholder, "%@");
        assert_eq!(
            QueryPosition::classify(Some(&token), &grammar),
            Err(GuessError::UnclassifiablePosition {
                token_type: TokenType::Placeholder
            })
        );
    }

    #[test]
    fn test_token_missing_from_grammar_fails() {
        let grammar = Grammar::builder()
            .token(TokenType::Property, TokenDescriptor::primitive())
            .build();
        let token = Token::new(TokenType::Number, "4");
        assert_eq!(
            QueryPosition::classify(Some(&token), &grammar),
            Err(GuessError::UnclassifiablePosition {
                token_type: TokenType::Number
            })
        );
        let close = Token::new(TokenType::CloseParen, ")");
        assert_eq!(
            QueryPosition::classify(Some(&close), &grammar),
            Ok(QueryPosition::After)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(QueryPosition::Middle.to_string(), "MIDDLE");
    }
}
