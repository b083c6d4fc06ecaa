//! Grammar-driven SCQL lexer
//!
//! The lexer is tolerant of incomplete input, which is what live completion
//! needs: it never fails and always returns every token it can see.
//!
//! # Design Principles
//!
//! - **Never panic** - always return a token list, possibly empty
//! - **Grammar-driven** - which characters start and end a token comes from
//!   the grammar's lexical metadata, not from this file
//! - **Unterminated is still a token** - `"foo` yields a `STRING` so the
//!   caller can keep it pending while the user finishes typing
//! - **Don't detect syntax errors** - that's the validator's job

use super::grammar::{Delimiter, Grammar, Lexeme, TokenType};
use super::token::Token;

/// Splits raw query text into tokens
pub trait Tokenizer {
    /// Tokenize `text` against `grammar`. Must be deterministic and pure.
    fn tokenize(&self, text: &str, grammar: &Grammar) -> Vec<Token>;
}

/// Default tokenizer for SCQL-shaped grammars
#[derive(Debug, Clone, Copy, Default)]
pub struct ScqlLexer;

impl Tokenizer for ScqlLexer {
    fn tokenize(&self, text: &str, grammar: &Grammar) -> Vec<Token> {
        Scanner::new(text, grammar).run()
    }
}

/// Token currently being read
struct Pending {
    token_type: TokenType,
    lexeme: Lexeme,
    value: String,
    /// Character that ends a delimited token
    closing: Option<char>,
}

struct Scanner<'a> {
    grammar: &'a Grammar,
    input: Vec<char>,
    tokens: Vec<Token>,
    current: Option<Pending>,
}

impl<'a> Scanner<'a> {
    fn new(input: &str, grammar: &'a Grammar) -> Self {
        Self {
            grammar,
            input: input.chars().collect(),
            tokens: Vec::new(),
            current: None,
        }
    }

    fn run(mut self) -> Vec<Token> {
        let last = self.input.len().saturating_sub(1);

        for pos in 0..self.input.len() {
            let c = self.input[pos];
            let end_of_input = pos == last;
            let mut skip = false;

            if let Some(mut pending) = self.current.take() {
                let end_of_token = match pending.closing {
                    Some(closing) => c == closing,
                    None => (pending.lexeme.not_allowed)(c),
                };
                if !end_of_token {
                    pending.value.push(c);
                }

                if end_of_token || end_of_input {
                    // The closing delimiter belongs to the token
                    skip = pending.closing.is_some() || !end_of_token;
                    self.emit(pending);
                } else {
                    self.current = Some(pending);
                }
            }

            if self.current.is_none() && !skip {
                self.start(c, end_of_input);
            }
        }

        if let Some(pending) = self.current.take() {
            self.emit(pending);
        }

        self.tokens
    }

    /// Begin a token at `c` if any grammar entry starts on it
    fn start(&mut self, c: char, end_of_input: bool) {
        // Later entries win when several match
        let Some((token_type, lexeme, single_character)) = self
            .grammar
            .iter()
            .filter_map(|(t, d)| d.lexeme.map(|l| (t, l, d.single_character)))
            .filter(|(_, l, _)| (l.first_character)(c))
            .last()
        else {
            return;
        };

        let pending = match lexeme.delimiter {
            Some(delimiter) => Pending {
                token_type,
                lexeme,
                value: String::new(),
                closing: Some(match delimiter {
                    Delimiter::Matching => c,
                    Delimiter::Closing(closing) => closing,
                }),
            },
            None => Pending {
                token_type,
                lexeme,
                value: c.to_string(),
                closing: None,
            },
        };

        if single_character || end_of_input {
            self.emit(pending);
        } else {
            self.current = Some(pending);
        }
    }

    fn emit(&mut self, pending: Pending) {
        let mut token_type = pending.token_type;

        if let Some(format) = pending.lexeme.format {
            if !format(&pending.value) {
                token_type = TokenType::Unknown;
            }
        }

        if pending.closing.is_none() {
            if let Some(reserved) = self.grammar.reserved_word(&pending.value) {
                token_type = reserved;
            }
        }

        let quote = match pending.lexeme.delimiter {
            Some(Delimiter::Matching) => pending.closing,
            _ => None,
        };
        self.tokens.push(Token {
            token_type,
            token_value: pending.value,
            quote,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(text: &str) -> Vec<(TokenType, String)> {
        ScqlLexer
            .tokenize(text, &Grammar::scql())
            .into_iter()
            .map(|t| (t.token_type, t.token_value))
            .collect()
    }

    fn tok(token_type: TokenType, value: &str) -> (TokenType, String) {
        (token_type, value.to_string())
    }

    #[test]
    fn test_empty_input() {
        assert!(lex("").is_empty());
        assert!(lex("   ").is_empty());
    }

    #[test]
    fn test_simple_comparison() {
        assert_eq!(
            lex("age = 4"),
            vec![
                tok(TokenType::Property, "age"),
                tok(TokenType::Eq, "="),
                tok(TokenType::Number, "4"),
            ]
        );
    }

    #[test]
    fn test_operator_without_spaces() {
        assert_eq!(
            lex("age>=21"),
            vec![
                tok(TokenType::Property, "age"),
                tok(TokenType::Ge, ">="),
                tok(TokenType::Number, "21"),
            ]
        );
    }

    #[test]
    fn test_dotted_property_is_one_token() {
        assert_eq!(lex("dog.waterBowl"), vec![tok(TokenType::Property, "dog.waterBowl")]);
    }

    #[test]
    fn test_reserved_words_are_case_sensitive() {
        assert_eq!(lex("AND"), vec![tok(TokenType::And, "AND")]);
        assert_eq!(lex("and"), vec![tok(TokenType::Property, "and")]);
        assert_eq!(lex("true"), vec![tok(TokenType::True, "true")]);
    }

    #[test]
    fn test_strings_with_either_quote() {
        assert_eq!(
            lex("\"foo bar\" 'baz'"),
            vec![tok(TokenType::String, "foo bar"), tok(TokenType::String, "baz")]
        );
    }

    #[test]
    fn test_unterminated_string_is_emitted() {
        assert_eq!(lex("\"foo"), vec![tok(TokenType::String, "foo")]);
        assert_eq!(lex("\""), vec![tok(TokenType::String, "")]);
    }

    #[test]
    fn test_quote_inside_other_quote_style() {
        assert_eq!(lex("\"it's\""), vec![tok(TokenType::String, "it's")]);
    }

    #[test]
    fn test_strings_record_their_quote() {
        let tokens = ScqlLexer.tokenize("'say \"hi\"' \"x\" {p}", &Grammar::scql());
        let quotes: Vec<Option<char>> = tokens.iter().map(|t| t.quote).collect();
        assert_eq!(quotes, vec![Some('\''), Some('"'), None]);
        assert_eq!(tokens[0].literal(), "'say \"hi\"'");
    }

    #[test]
    fn test_parentheses_are_single_characters() {
        assert_eq!(
            lex("((a"),
            vec![
                tok(TokenType::OpenParen, "("),
                tok(TokenType::OpenParen, "("),
                tok(TokenType::Property, "a"),
            ]
        );
        assert_eq!(
            lex("4)"),
            vec![tok(TokenType::Number, "4"), tok(TokenType::CloseParen, ")")]
        );
    }

    #[test]
    fn test_negative_and_bad_numbers() {
        assert_eq!(lex("-4.5"), vec![tok(TokenType::Number, "-4.5")]);
        assert_eq!(lex("1.2.3"), vec![tok(TokenType::Unknown, "1.2.3")]);
    }

    #[test]
    fn test_parameter_and_placeholder() {
        assert_eq!(lex("{limit}"), vec![tok(TokenType::Parameter, "limit")]);
        assert_eq!(lex("%@"), vec![tok(TokenType::Placeholder, "%@")]);
    }

    #[test]
    fn test_unknown_symbols() {
        assert_eq!(lex("@@"), vec![tok(TokenType::Unknown, "@@")]);
    }

    #[test]
    fn test_custom_grammar_without_lexemes_yields_nothing() {
        let grammar = Grammar::builder()
            .token(TokenType::Property, Default::default())
            .build();
        assert!(ScqlLexer.tokenize("age", &grammar).is_empty());
    }
}
