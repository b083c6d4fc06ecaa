//! Token-tree validation
//!
//! [`TreeValidator`] decides whether a committed token sequence forms a
//! complete expression. It is a small precedence-climbing parser that knows
//! nothing about particular operators: every decision comes from the grammar
//! descriptors.
//!
//! - Connectives (`left_type = BOOLEAN`) bind looser than comparisons
//!   (`left_type = PRIMITIVE`); both are left-associative.
//! - A prefix operator requiring a BOOLEAN takes a comparison as its operand
//!   (`NOT age = 4` is `NOT (age = 4)`); one requiring a PRIMITIVE takes a
//!   single atom.
//! - Operand types must match the operator's declared side types.

use serde::Serialize;

use super::grammar::{Grammar, TokenDescriptor, TokenType, ValueType};
use super::token::Token;
use crate::error::ValidationError;

/// Reports whether a token sequence parses to a complete expression tree
pub trait QueryValidator {
    /// Build the expression tree for `tokens`. An empty sequence yields `None`.
    fn validate(
        &self,
        tokens: &[Token],
        grammar: &Grammar,
    ) -> Result<Option<TokenTree>, ValidationError>;
}

/// Parsed expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TokenTree {
    Leaf {
        token: Token,
    },
    Group {
        inner: Box<TokenTree>,
    },
    Prefix {
        operator: Token,
        operand: Box<TokenTree>,
    },
    Infix {
        operator: Token,
        left: Box<TokenTree>,
        right: Box<TokenTree>,
    },
    Postfix {
        operator: Token,
        operand: Box<TokenTree>,
    },
}

/// Default validator
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeValidator;

impl QueryValidator for TreeValidator {
    fn validate(
        &self,
        tokens: &[Token],
        grammar: &Grammar,
    ) -> Result<Option<TokenTree>, ValidationError> {
        if tokens.is_empty() {
            return Ok(None);
        }

        let mut parser = TreeParser {
            tokens,
            grammar,
            pos: 0,
        };
        let (tree, _) = parser.parse_expression(LOWEST)?;

        match parser.peek() {
            None => Ok(Some(tree)),
            Some(token) => Err(parser.stray_token_error(token)),
        }
    }
}

const LOWEST: u8 = 0;
const CONNECTIVE: u8 = 1;
const COMPARISON: u8 = 2;
const ATOM: u8 = 3;

/// How tightly an operator holds the operand on its left
fn binding_power(left_type: ValueType) -> u8 {
    match left_type {
        ValueType::Boolean => CONNECTIVE,
        ValueType::Primitive => COMPARISON,
    }
}

/// Minimum binding power for a prefix operator's operand
fn operand_power(required: ValueType) -> u8 {
    match required {
        ValueType::Boolean => COMPARISON,
        ValueType::Primitive => ATOM,
    }
}

struct TreeParser<'a> {
    tokens: &'a [Token],
    grammar: &'a Grammar,
    pos: usize,
}

impl<'a> TreeParser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn descriptor(&self, token: &Token) -> Option<&'a TokenDescriptor> {
        self.grammar.get(token.token_type)
    }

    /// Error for a token found where the expression should have ended
    fn stray_token_error(&self, token: &Token) -> ValidationError {
        match token.token_type {
            TokenType::Unknown => ValidationError::UnknownToken {
                position: self.pos,
                value: token.token_value.clone(),
            },
            TokenType::CloseParen => {
                ValidationError::UnmatchedCloseParenthesis { position: self.pos }
            }
            _ => ValidationError::TrailingTokens { position: self.pos },
        }
    }

    fn parse_expression(&mut self, min_power: u8) -> Result<(TokenTree, ValueType), ValidationError> {
        let (mut left, mut left_type) = self.parse_atom()?;

        while let Some(token) = self.peek() {
            let Some(descriptor) = self.descriptor(token) else {
                break;
            };
            let (Some(required_left), Some(eval_type)) = (descriptor.left_type, descriptor.eval_type)
            else {
                break;
            };
            let power = binding_power(required_left);
            if power < min_power {
                break;
            }

            let position = self.pos;
            self.pos += 1;
            expect_type(position, token.token_type, required_left, left_type)?;

            left = match descriptor.right_type {
                Some(required_right) => {
                    let (right, right_type) = self.parse_expression(power + 1)?;
                    expect_type(position, token.token_type, required_right, right_type)?;
                    TokenTree::Infix {
                        operator: token.clone(),
                        left: Box::new(left),
                        right: Box::new(right),
                    }
                }
                None => TokenTree::Postfix {
                    operator: token.clone(),
                    operand: Box::new(left),
                },
            };
            left_type = eval_type;
        }

        Ok((left, left_type))
    }

    fn parse_atom(&mut self) -> Result<(TokenTree, ValueType), ValidationError> {
        let position = self.pos;
        let Some(token) = self.advance() else {
            // Only reachable after at least one token was consumed
            let after = self
                .tokens
                .last()
                .map(|t| t.token_type)
                .unwrap_or(TokenType::Unknown);
            return Err(ValidationError::EmptyOperand { after });
        };

        match token.token_type {
            TokenType::Unknown => Err(ValidationError::UnknownToken {
                position,
                value: token.token_value.clone(),
            }),
            TokenType::OpenParen => {
                let (inner, inner_type) = self.parse_expression(LOWEST)?;
                match self.peek() {
                    Some(close) if close.token_type == TokenType::CloseParen => {
                        self.pos += 1;
                        Ok((
                            TokenTree::Group {
                                inner: Box::new(inner),
                            },
                            inner_type,
                        ))
                    }
                    Some(other) => Err(self.stray_token_error(other)),
                    None => Err(ValidationError::UnclosedParenthesis { position }),
                }
            }
            TokenType::CloseParen => Err(ValidationError::UnmatchedCloseParenthesis { position }),
            found => {
                let descriptor = self
                    .descriptor(token)
                    .ok_or(ValidationError::UnexpectedToken { position, found })?;

                match (descriptor.eval_type, descriptor.right_type) {
                    (Some(eval_type), Some(required)) if descriptor.is_prefix_operator() => {
                        let (operand, operand_type) =
                            self.parse_expression(operand_power(required))?;
                        expect_type(position, found, required, operand_type)?;
                        Ok((
                            TokenTree::Prefix {
                                operator: token.clone(),
                                operand: Box::new(operand),
                            },
                            eval_type,
                        ))
                    }
                    (Some(eval_type), None) if descriptor.is_leaf() => Ok((
                        TokenTree::Leaf {
                            token: token.clone(),
                        },
                        eval_type,
                    )),
                    _ => Err(ValidationError::UnexpectedToken { position, found }),
                }
            }
        }
    }
}

fn expect_type(
    position: usize,
    operator: TokenType,
    expected: ValueType,
    found: ValueType,
) -> Result<(), ValidationError> {
    if expected == found {
        Ok(())
    } else {
        Err(ValidationError::TypeMismatch {
            position,
            operator,
            expected,
            found,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ScqlLexer, Tokenizer};

    fn validate(text: &str) -> Result<Option<TokenTree>, ValidationError> {
        let grammar = Grammar::scql();
        let tokens = ScqlLexer.tokenize(text, &grammar);
        TreeValidator.validate(&tokens, &grammar)
    }

    #[test]
    fn test_empty_is_valid() {
        assert_eq!(validate(""), Ok(None));
    }

    #[test]
    fn test_simple_comparison() {
        let tree = validate("age = 4").unwrap().unwrap();
        assert!(matches!(tree, TokenTree::Infix { ref operator, .. } if operator.token_type == TokenType::Eq));
    }

    #[test]
    fn test_connectives_bind_looser_than_comparisons() {
        let tree = validate("a = 1 AND b = 2 OR c = 3").unwrap().unwrap();
        // ((a = 1 AND b = 2) OR c = 3)
        let TokenTree::Infix { operator, left, .. } = tree else {
            panic!("expected infix root");
        };
        assert_eq!(operator.token_type, TokenType::Or);
        assert!(matches!(*left, TokenTree::Infix { ref operator, .. } if operator.token_type == TokenType::And));
    }

    #[test]
    fn test_not_takes_a_comparison() {
        let tree = validate("NOT age = 4").unwrap().unwrap();
        assert!(matches!(tree, TokenTree::Prefix { ref operator, .. } if operator.token_type == TokenType::Not));
    }

    #[test]
    fn test_groups_and_strings() {
        assert!(validate("age = 4 AND (name BEGINS_WITH \"a\" OR name = 'b')").is_ok());
        assert!(validate("TYPE_IS 'Person' AND NOT (age < 18)").is_ok());
    }

    #[test]
    fn test_lone_literal_is_a_complete_tree() {
        assert!(validate("true").is_ok());
        assert!(validate("isActive").is_ok());
    }

    #[test]
    fn test_missing_operand() {
        assert_eq!(
            validate("age ="),
            Err(ValidationError::EmptyOperand { after: TokenType::Eq })
        );
    }

    #[test]
    fn test_leading_connective() {
        assert_eq!(
            validate("AND age"),
            Err(ValidationError::UnexpectedToken {
                position: 0,
                found: TokenType::And
            })
        );
    }

    #[test]
    fn test_type_mismatch() {
        assert_eq!(
            validate("age AND b = 1"),
            Err(ValidationError::TypeMismatch {
                position: 1,
                operator: TokenType::And,
                expected: ValueType::Boolean,
                found: ValueType::Primitive,
            })
        );
    }

    #[test]
    fn test_parenthesis_errors() {
        assert_eq!(
            validate("( age = 4"),
            Err(ValidationError::UnclosedParenthesis { position: 0 })
        );
        assert_eq!(
            validate("age = 4 )"),
            Err(ValidationError::UnmatchedCloseParenthesis { position: 3 })
        );
    }

    #[test]
    fn test_trailing_and_unknown_tokens() {
        assert_eq!(
            validate("age = 4 name"),
            Err(ValidationError::TrailingTokens { position: 3 })
        );
        assert!(matches!(
            validate("age = @@"),
            Err(ValidationError::UnknownToken { position: 2, .. })
        ));
    }
}
