//! Output formatting for the scql command-line tool
//!
//! This module renders engine results either as aligned text sections or as
//! pretty-printed JSON:
//! - Settled guesser snapshots
//! - Token lists from the tokenizer
//! - Validation reports

use serde::Serialize;

use crate::completion::Snapshot;
use crate::config::{DisplayConfig, OutputFormat};
use crate::error::{Result, ValidationError};
use crate::parser::{Token, TokenTree};

/// Outcome of validating a token sequence
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<TokenTree>,
}

impl ValidationReport {
    pub fn from_result(result: std::result::Result<Option<TokenTree>, ValidationError>) -> Self {
        match result {
            Ok(tree) => Self {
                valid: true,
                error: None,
                tree,
            },
            Err(err) => Self {
                valid: false,
                error: Some(err.to_string()),
                tree: None,
            },
        }
    }
}

/// Main formatter for command output
pub struct Formatter {
    /// Output format type
    format_type: OutputFormat,
}

/// Width of the label column in text output
const LABEL_WIDTH: usize = 12;

impl Formatter {
    pub fn new(format_type: OutputFormat) -> Self {
        Self { format_type }
    }

    pub fn from_config(config: &DisplayConfig) -> Self {
        Self::new(config.format)
    }

    /// Format a settled guesser snapshot
    pub fn format_snapshot(&self, snapshot: &Snapshot) -> Result<String> {
        if self.format_type.is_json() {
            return Ok(serde_json::to_string_pretty(snapshot)?);
        }

        let position = snapshot
            .position
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        let predictions: Vec<&str> = snapshot.predictions.iter().map(|t| t.as_str()).collect();

        let lines = [
            line("Tokens", &tokens_inline(&snapshot.tokens)),
            line("Current", &format!("{:?}", snapshot.current_text)),
            line("Position", &position),
            line("Predicted", &predictions.join(", ")),
            line("Guesses", &snapshot.guesses.join(", ")),
            line("Valid", if snapshot.is_valid_query { "yes" } else { "no" }),
            line("Full text", &snapshot.full_text),
        ];
        Ok(lines.join("\n"))
    }

    /// Format tokenizer output, one token per line
    pub fn format_tokens(&self, tokens: &[Token]) -> Result<String> {
        if self.format_type.is_json() {
            return Ok(serde_json::to_string_pretty(tokens)?);
        }

        if tokens.is_empty() {
            return Ok("(no tokens)".to_string());
        }
        Ok(tokens
            .iter()
            .map(|t| format!("{:<LABEL_WIDTH$} {}", t.token_type.as_str(), t.literal()))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Format a validation report
    pub fn format_validation(&self, report: &ValidationReport) -> Result<String> {
        if self.format_type.is_json() {
            return Ok(serde_json::to_string_pretty(report)?);
        }

        Ok(match &report.error {
            None => "valid".to_string(),
            Some(err) => format!("invalid: {err}"),
        })
    }
}

fn line(label: &str, value: &str) -> String {
    format!("{:<LABEL_WIDTH$} {}", format!("{label}:"), value)
}

fn tokens_inline(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| match t.token_type.as_str() {
            name if name == t.token_value => name.to_string(),
            name => format!("{name}({})", t.literal()),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::QueryGuesser;
    use crate::parser::TokenType;

    fn snapshot(text: &str) -> Snapshot {
        let mut guesser = QueryGuesser::builder().build().unwrap();
        guesser.set_current_text(text).unwrap();
        guesser.snapshot().clone()
    }

    #[test]
    fn test_text_snapshot() {
        let output = Formatter::new(OutputFormat::Text)
            .format_snapshot(&snapshot("age = 4 AN"))
            .unwrap();
        assert!(output.contains("Tokens:      PROPERTY(age) = NUMBER(4)"));
        assert!(output.contains("Current:     \"AN\""));
        assert!(output.contains("Position:    AFTER"));
        assert!(output.contains("Guesses:     AND"));
        assert!(output.contains("Full text:   age = 4 AN"));
    }

    #[test]
    fn test_json_snapshot() {
        let output = Formatter::new(OutputFormat::Json)
            .format_snapshot(&snapshot("( age "))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["position"], "MIDDLE");
        assert_eq!(value["closing_paren_count"], 1);
        assert_eq!(value["tokens"][1]["token_type"], "PROPERTY");
        assert_eq!(value["full_text"], "( age )");
    }

    #[test]
    fn test_tokens() {
        let tokens = vec![
            Token::new(TokenType::Property, "name"),
            Token::new(TokenType::String, "Jo"),
        ];
        let output = Formatter::new(OutputFormat::Text).format_tokens(&tokens).unwrap();
        assert_eq!(output, "PROPERTY     name\nSTRING       \"Jo\"");
        assert_eq!(
            Formatter::new(OutputFormat::Text).format_tokens(&[]).unwrap(),
            "(no tokens)"
        );
    }

    #[test]
    fn test_validation_report() {
        let report = ValidationReport::from_result(Err(ValidationError::EmptyOperand {
            after: TokenType::Eq,
        }));
        assert!(!report.valid);
        assert_eq!(
            Formatter::new(OutputFormat::Text)
                .format_validation(&report)
                .unwrap(),
            "invalid: expected an operand after '='"
        );

        let report = ValidationReport::from_result(Ok(None));
        let json = Formatter::new(OutputFormat::Json)
            .format_validation(&report)
            .unwrap();
        assert_eq!(json, "{\n  \"valid\": true\n}");
    }
}
