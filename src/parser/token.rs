//! Token instances produced by a tokenizer

use serde::Serialize;

use super::grammar::TokenType;

/// A token extracted from query text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub token_type: TokenType,
    /// Token text. Delimited tokens (strings, parameters) carry their body only.
    pub token_value: String,
    /// Quote character a string was typed with
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<char>,
}

impl Token {
    /// Create a new token
    pub fn new(token_type: TokenType, token_value: impl Into<String>) -> Self {
        Self {
            token_type,
            token_value: token_value.into(),
            quote: None,
        }
    }

    /// Create a string token that remembers its quote character
    pub fn quoted(token_value: impl Into<String>, quote: char) -> Self {
        Self {
            token_type: TokenType::String,
            token_value: token_value.into(),
            quote: Some(quote),
        }
    }

    /// Text form of the token as it would be typed
    ///
    /// Strings keep the quote they were typed with. Without one, `"` is used
    /// unless the value itself contains a `"`.
    pub fn literal(&self) -> String {
        match self.token_type {
            TokenType::String => {
                let quote = self.quote.unwrap_or(if self.token_value.contains('"') {
                    '\''
                } else {
                    '"'
                });
                format!("{quote}{}{quote}", self.token_value)
            }
            TokenType::Parameter => format!("{{{}}}", self.token_value),
            _ => self.token_value.clone(),
        }
    }

    /// Every text form the token may have been typed as
    ///
    /// A string with no recorded quote accepts either style.
    pub fn literal_forms(&self) -> Vec<String> {
        match self.token_type {
            TokenType::String if self.quote.is_none() => vec![
                format!("\"{}\"", self.token_value),
                format!("'{}'", self.token_value),
            ],
            _ => vec![self.literal()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_requotes_strings() {
        let token = Token::new(TokenType::String, "foo bar");
        assert_eq!(token.literal(), "\"foo bar\"");
        assert_eq!(token.literal_forms(), vec!["\"foo bar\"", "'foo bar'"]);
    }

    #[test]
    fn test_literal_keeps_typed_quote() {
        let token = Token::quoted("say \"hi\"", '\'');
        assert_eq!(token.literal(), "'say \"hi\"'");
        assert_eq!(token.literal_forms(), vec!["'say \"hi\"'"]);

        let token = Token::quoted("Jo", '"');
        assert_eq!(token.literal_forms(), vec!["\"Jo\""]);
    }

    #[test]
    fn test_literal_avoids_clashing_quote() {
        let token = Token::new(TokenType::String, "say \"hi\"");
        assert_eq!(token.literal(), "'say \"hi\"'");
    }

    #[test]
    fn test_literal_rewraps_parameters() {
        let token = Token::new(TokenType::Parameter, "name");
        assert_eq!(token.literal(), "{name}");
    }

    #[test]
    fn test_literal_plain() {
        assert_eq!(Token::new(TokenType::And, "AND").literal(), "AND");
        assert_eq!(Token::new(TokenType::Number, "-4.5").literal(), "-4.5");
    }
}
