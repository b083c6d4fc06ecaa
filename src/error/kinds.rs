use std::{fmt, io};

use crate::parser::{TokenType, ValueType};

/// Crate-wide `Result` type using [`GuesserError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, GuesserError>;

/// Top-level error type for scql-guesser operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum GuesserError {
    /// Errors raised while computing guesses.
    Guess(GuessError),

    /// Token sequence does not form a complete query.
    Validation(ValidationError),

    /// Grammar definition errors.
    Grammar(GrammarError),

    /// Schema registry errors.
    Schema(SchemaError),

    /// Configuration errors.
    Config(ConfigError),

    /// I/O errors.
    Io(io::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Errors raised by a prediction cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessError {
    /// The last committed token fits none of the position rules.
    ///
    /// Unreachable with a well-formed grammar; surfacing it points at a
    /// grammar or engine bug.
    UnclassifiablePosition { token_type: TokenType },
}

/// Reasons a token sequence fails to parse into a complete expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Tokenizer could not make sense of part of the input.
    UnknownToken { position: usize, value: String },

    /// Token cannot appear where it was found.
    UnexpectedToken { position: usize, found: TokenType },

    /// Input ended while an operand was still required.
    EmptyOperand { after: TokenType },

    /// Operand type does not match the operator's requirement.
    TypeMismatch {
        position: usize,
        operator: TokenType,
        expected: ValueType,
        found: ValueType,
    },

    /// An opening parenthesis was never closed.
    UnclosedParenthesis { position: usize },

    /// A closing parenthesis has no opening partner.
    UnmatchedCloseParenthesis { position: usize },

    /// Tokens remain after a complete expression.
    TrailingTokens { position: usize },
}

/// Grammar definition errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// A token type the rules rely on is not in the grammar.
    MissingTokenType(TokenType),

    /// A name does not denote any token type.
    UnknownTokenName(String),
}

/// Schema registry errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Record type is not registered.
    UnknownRecordType(String),

    /// Parent named by a record type is not registered.
    UnknownParent { record_type: String, parent: String },

    /// Inheritance chain loops back onto itself.
    InheritanceCycle(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for GuesserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuesserError::Guess(e) => write!(f, "Guess error: {e}"),
            GuesserError::Validation(e) => write!(f, "Invalid query: {e}"),
            GuesserError::Grammar(e) => write!(f, "Grammar error: {e}"),
            GuesserError::Schema(e) => write!(f, "Schema error: {e}"),
            GuesserError::Config(e) => write!(f, "Configuration error: {e}"),
            GuesserError::Io(e) => write!(f, "I/O error: {e}"),
            GuesserError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for GuessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuessError::UnclassifiablePosition { token_type } => write!(
                f,
                "unable to determine the query position after token '{token_type}'"
            ),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnknownToken { position, value } => {
                write!(f, "unknown token '{value}' at position {position}")
            }
            ValidationError::UnexpectedToken { position, found } => {
                write!(f, "unexpected '{found}' at position {position}")
            }
            ValidationError::EmptyOperand { after } => {
                write!(f, "expected an operand after '{after}'")
            }
            ValidationError::TypeMismatch {
                position,
                operator,
                expected,
                found,
            } => write!(
                f,
                "'{operator}' at position {position} expects {expected}, found {found}"
            ),
            ValidationError::UnclosedParenthesis { position } => {
                write!(f, "parenthesis at position {position} is never closed")
            }
            ValidationError::UnmatchedCloseParenthesis { position } => {
                write!(f, "closing parenthesis at position {position} has no opening one")
            }
            ValidationError::TrailingTokens { position } => {
                write!(f, "query did not resolve to a single tree (extra token at position {position})")
            }
        }
    }
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::MissingTokenType(token_type) => {
                write!(f, "grammar has no entry for '{token_type}'")
            }
            GrammarError::UnknownTokenName(name) => write!(f, "unknown token type: {name}"),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::UnknownRecordType(name) => write!(f, "unknown record type: {name}"),
            SchemaError::UnknownParent {
                record_type,
                parent,
            } => write!(f, "record type '{record_type}' extends unknown type '{parent}'"),
            SchemaError::InheritanceCycle(name) => {
                write!(f, "record type '{name}' inherits from itself")
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl std::error::Error for GuesserError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GuesserError::Guess(e) => Some(e),
            GuesserError::Validation(e) => Some(e),
            GuesserError::Grammar(e) => Some(e),
            GuesserError::Schema(e) => Some(e),
            GuesserError::Config(e) => Some(e),
            GuesserError::Io(e) => Some(e),
            GuesserError::Generic(_) => None,
        }
    }
}

impl std::error::Error for GuessError {}
impl std::error::Error for ValidationError {}
impl std::error::Error for GrammarError {}
impl std::error::Error for SchemaError {}
impl std::error::Error for ConfigError {}

/* ========================= Conversions to GuesserError ========================= */

impl From<io::Error> for GuesserError {
    fn from(err: io::Error) -> Self {
        GuesserError::Io(err)
    }
}

impl From<GuessError> for GuesserError {
    fn from(err: GuessError) -> Self {
        GuesserError::Guess(err)
    }
}

impl From<ValidationError> for GuesserError {
    fn from(err: ValidationError) -> Self {
        GuesserError::Validation(err)
    }
}

impl From<GrammarError> for GuesserError {
    fn from(err: GrammarError) -> Self {
        GuesserError::Grammar(err)
    }
}

impl From<SchemaError> for GuesserError {
    fn from(err: SchemaError) -> Self {
        GuesserError::Schema(err)
    }
}

impl From<ConfigError> for GuesserError {
    fn from(err: ConfigError) -> Self {
        GuesserError::Config(err)
    }
}

impl From<toml::de::Error> for GuesserError {
    fn from(err: toml::de::Error) -> Self {
        GuesserError::Config(ConfigError::InvalidFormat(err.to_string()))
    }
}

impl From<toml::ser::Error> for GuesserError {
    fn from(err: toml::ser::Error) -> Self {
        GuesserError::Config(ConfigError::InvalidFormat(err.to_string()))
    }
}

impl From<serde_json::Error> for GuesserError {
    fn from(err: serde_json::Error) -> Self {
        GuesserError::Generic(format!("JSON error: {err}"))
    }
}

impl From<String> for GuesserError {
    fn from(msg: String) -> Self {
        GuesserError::Generic(msg)
    }
}

impl From<&str> for GuesserError {
    fn from(msg: &str) -> Self {
        GuesserError::Generic(msg.to_owned())
    }
}
