//! SCQL grammar model
//!
//! The grammar is a closed, ordered mapping from [`TokenType`] to a
//! [`TokenDescriptor`]. Descriptors carry the combination rules the predictor
//! and validator work from (`eval_type`, `left_type`, `right_type`) plus the
//! lexical metadata the default tokenizer scans with.
//!
//! Iteration order is significant: predictions are listed in grammar order,
//! and when several token types can start on the same character the lexer
//! picks the last one.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::error::GrammarError;

/// Identifier of a grammar symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenType {
    /// Text the tokenizer could not make sense of
    Unknown,
    /// Record attribute reference, possibly a dotted path
    Property,
    Number,
    String,
    /// Named parameter in braces, e.g. `{name}`
    Parameter,
    /// Positional format placeholder `%@`
    Placeholder,
    OpenParen,
    CloseParen,
    And,
    Or,
    Not,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    BeginsWith,
    EndsWith,
    Contains,
    Any,
    Matches,
    TypeIs,
    Null,
    Undefined,
    False,
    True,
    No,
    Yes,
}

impl TokenType {
    /// Every token type, in SCQL grammar order
    pub const ALL: [TokenType; 29] = [
        TokenType::Unknown,
        TokenType::Property,
        TokenType::Number,
        TokenType::String,
        TokenType::Parameter,
        TokenType::Placeholder,
        TokenType::OpenParen,
        TokenType::CloseParen,
        TokenType::And,
        TokenType::Or,
        TokenType::Not,
        TokenType::Eq,
        TokenType::Ne,
        TokenType::Lt,
        TokenType::Le,
        TokenType::Gt,
        TokenType::Ge,
        TokenType::BeginsWith,
        TokenType::EndsWith,
        TokenType::Contains,
        TokenType::Any,
        TokenType::Matches,
        TokenType::TypeIs,
        TokenType::Null,
        TokenType::Undefined,
        TokenType::False,
        TokenType::True,
        TokenType::No,
        TokenType::Yes,
    ];

    /// Canonical SCQL name. For reserved words this is also the literal text.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Unknown => "UNKNOWN",
            TokenType::Property => "PROPERTY",
            TokenType::Number => "NUMBER",
            TokenType::String => "STRING",
            TokenType::Parameter => "PARAMETER",
            TokenType::Placeholder => "%@",
            TokenType::OpenParen => "OPEN_PAREN",
            TokenType::CloseParen => "CLOSE_PAREN",
            TokenType::And => "AND",
            TokenType::Or => "OR",
            TokenType::Not => "NOT",
            TokenType::Eq => "=",
            TokenType::Ne => "!=",
            TokenType::Lt => "<",
            TokenType::Le => "<=",
            TokenType::Gt => ">",
            TokenType::Ge => ">=",
            TokenType::BeginsWith => "BEGINS_WITH",
            TokenType::EndsWith => "ENDS_WITH",
            TokenType::Contains => "CONTAINS",
            TokenType::Any => "ANY",
            TokenType::Matches => "MATCHES",
            TokenType::TypeIs => "TYPE_IS",
            TokenType::Null => "null",
            TokenType::Undefined => "undefined",
            TokenType::False => "false",
            TokenType::True => "true",
            TokenType::No => "NO",
            TokenType::Yes => "YES",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenType {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TokenType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| GrammarError::UnknownTokenName(s.to_string()))
    }
}

impl Serialize for TokenType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Kind of value a symbol evaluates to or requires as an operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Boolean,
    Primitive,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Boolean => f.write_str("BOOLEAN"),
            ValueType::Primitive => f.write_str("PRIMITIVE"),
        }
    }
}

/// Character predicate used by lexical metadata
pub type CharClass = fn(char) -> bool;

/// How a delimited token ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// Ends at the same character that opened it (quotes)
    Matching,
    /// Ends at a fixed closing character
    Closing(char),
}

/// Lexical metadata for the default tokenizer
#[derive(Debug, Clone, Copy)]
pub struct Lexeme {
    /// Characters that start this token
    pub first_character: CharClass,
    /// Characters that end a non-delimited token
    pub not_allowed: CharClass,
    /// Present when the token body sits between delimiters
    pub delimiter: Option<Delimiter>,
    /// Whole-value check; failing values become `UNKNOWN`
    pub format: Option<fn(&str) -> bool>,
}

impl Lexeme {
    /// Token running from a start character until a disallowed character
    pub fn run(first_character: CharClass, not_allowed: CharClass) -> Self {
        Self {
            first_character,
            not_allowed,
            delimiter: None,
            format: None,
        }
    }

    /// Token whose body sits between delimiters
    pub fn delimited(first_character: CharClass, delimiter: Delimiter) -> Self {
        Self {
            first_character,
            not_allowed: |_| false,
            delimiter: Some(delimiter),
            format: None,
        }
    }

    /// Attach a whole-value format check
    pub fn with_format(mut self, format: fn(&str) -> bool) -> Self {
        self.format = Some(format);
        self
    }
}

/// Grammar entry for one token type
#[derive(Debug, Clone, Default)]
pub struct TokenDescriptor {
    pub eval_type: Option<ValueType>,
    pub left_type: Option<ValueType>,
    pub right_type: Option<ValueType>,
    /// Literal keyword or symbol, offered verbatim as a guess
    pub reserved_word: bool,
    /// Commit as soon as recognized, without waiting for whitespace
    pub single_character: bool,
    pub lexeme: Option<Lexeme>,
}

impl TokenDescriptor {
    /// Descriptor with no value semantics (parentheses, unknown text)
    pub fn structural() -> Self {
        Self::default()
    }

    /// Literal value evaluating to a primitive
    pub fn primitive() -> Self {
        Self {
            eval_type: Some(ValueType::Primitive),
            ..Self::default()
        }
    }

    /// Boolean-valued operator with the given operand requirements
    pub fn operator(left_type: Option<ValueType>, right_type: Option<ValueType>) -> Self {
        Self {
            eval_type: Some(ValueType::Boolean),
            left_type,
            right_type,
            ..Self::default()
        }
    }

    /// Mark as a reserved word
    pub fn reserved(mut self) -> Self {
        self.reserved_word = true;
        self
    }

    /// Mark as committing immediately
    pub fn single_character(mut self) -> Self {
        self.single_character = true;
        self
    }

    /// Attach lexical metadata
    pub fn with_lexeme(mut self, lexeme: Lexeme) -> Self {
        self.lexeme = Some(lexeme);
        self
    }

    /// No left operand, one right operand (e.g. `NOT`)
    pub fn is_prefix_operator(&self) -> bool {
        self.eval_type.is_some() && self.left_type.is_none() && self.right_type.is_some()
    }

    /// Operands on both sides (e.g. `=`, `AND`)
    pub fn is_infix_operator(&self) -> bool {
        self.eval_type.is_some() && self.left_type.is_some() && self.right_type.is_some()
    }

    /// Left operand only
    pub fn is_postfix_operator(&self) -> bool {
        self.eval_type.is_some() && self.left_type.is_some() && self.right_type.is_none()
    }

    /// Complete value on its own
    pub fn is_leaf(&self) -> bool {
        self.eval_type.is_some() && self.left_type.is_none() && self.right_type.is_none()
    }
}

/// Ordered, closed mapping from token type to descriptor
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    entries: IndexMap<TokenType, TokenDescriptor>,
}

impl Grammar {
    /// Start building a custom grammar
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::default()
    }

    /// Look up the descriptor for a token type
    pub fn get(&self, token_type: TokenType) -> Option<&TokenDescriptor> {
        self.entries.get(&token_type)
    }

    pub fn contains(&self, token_type: TokenType) -> bool {
        self.entries.contains_key(&token_type)
    }

    /// Iterate over entries in grammar order
    pub fn iter(&self) -> impl Iterator<Item = (TokenType, &TokenDescriptor)> {
        self.entries.iter().map(|(t, d)| (*t, d))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reserved word whose literal text equals `text` exactly
    pub fn reserved_word(&self, text: &str) -> Option<TokenType> {
        self.iter()
            .filter(|(t, d)| d.reserved_word && t.as_str() == text)
            .map(|(t, _)| t)
            .last()
    }

    /// Check that the structural token types the engine relies on are present
    pub fn validate_closed(&self) -> Result<(), GrammarError> {
        for required in [TokenType::Property, TokenType::OpenParen, TokenType::CloseParen] {
            if !self.contains(required) {
                return Err(GrammarError::MissingTokenType(required));
            }
        }
        Ok(())
    }

    /// The SCQL query language
    pub fn scql() -> Self {
        use ValueType::{Boolean, Primitive};

        let comparison = || TokenDescriptor::operator(Some(Primitive), Some(Primitive)).reserved();
        let literal = || TokenDescriptor::primitive().reserved();

        Grammar::builder()
            .token(
                TokenType::Unknown,
                TokenDescriptor::structural()
                    .with_lexeme(Lexeme::run(is_unknown_start, is_unknown_end)),
            )
            .token(
                TokenType::Property,
                TokenDescriptor::primitive()
                    .with_lexeme(Lexeme::run(is_property_start, is_property_end)),
            )
            .token(
                TokenType::Number,
                TokenDescriptor::primitive().with_lexeme(
                    Lexeme::run(is_number_start, is_number_end).with_format(is_number_format),
                ),
            )
            .token(
                TokenType::String,
                TokenDescriptor::primitive()
                    .with_lexeme(Lexeme::delimited(is_quote, Delimiter::Matching)),
            )
            .token(
                TokenType::Parameter,
                TokenDescriptor::primitive().with_lexeme(Lexeme::delimited(
                    |c| c == '{',
                    Delimiter::Closing('}'),
                )),
            )
            .token(TokenType::Placeholder, literal())
            .token(
                TokenType::OpenParen,
                TokenDescriptor::structural()
                    .single_character()
                    .with_lexeme(Lexeme::run(|c| c == '(', |_| true)),
            )
            .token(
                TokenType::CloseParen,
                TokenDescriptor::structural()
                    .single_character()
                    .with_lexeme(Lexeme::run(|c| c == ')', |_| true)),
            )
            .token(
                TokenType::And,
                TokenDescriptor::operator(Some(Boolean), Some(Boolean)).reserved(),
            )
            .token(
                TokenType::Or,
                TokenDescriptor::operator(Some(Boolean), Some(Boolean)).reserved(),
            )
            .token(
                TokenType::Not,
                TokenDescriptor::operator(None, Some(Boolean)).reserved(),
            )
            .token(TokenType::Eq, comparison())
            .token(TokenType::Ne, comparison())
            .token(TokenType::Lt, comparison())
            .token(TokenType::Le, comparison())
            .token(TokenType::Gt, comparison())
            .token(TokenType::Ge, comparison())
            .token(TokenType::BeginsWith, comparison())
            .token(TokenType::EndsWith, comparison())
            .token(TokenType::Contains, comparison())
            .token(TokenType::Any, comparison())
            .token(TokenType::Matches, comparison())
            .token(
                TokenType::TypeIs,
                TokenDescriptor::operator(None, Some(Primitive)).reserved(),
            )
            .token(TokenType::Null, literal())
            .token(TokenType::Undefined, literal())
            .token(TokenType::False, literal())
            .token(TokenType::True, literal())
            .token(TokenType::No, literal())
            .token(TokenType::Yes, literal())
            .build()
    }
}

/// Builder for [`Grammar`]; entries keep insertion order
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    entries: IndexMap<TokenType, TokenDescriptor>,
}

impl GrammarBuilder {
    /// Add or replace an entry
    pub fn token(mut self, token_type: TokenType, descriptor: TokenDescriptor) -> Self {
        self.entries.insert(token_type, descriptor);
        self
    }

    pub fn build(self) -> Grammar {
        Grammar {
            entries: self.entries,
        }
    }
}

/* ========================= SCQL character classes ========================= */

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_quote(c: char) -> bool {
    c == '\'' || c == '"'
}

fn is_grouping(c: char) -> bool {
    matches!(c, '(' | ')' | '{' | '}')
}

fn is_unknown_start(c: char) -> bool {
    !(c.is_whitespace() || is_quote(c) || is_word_char(c) || is_grouping(c))
}

fn is_unknown_end(c: char) -> bool {
    c == '-' || c.is_whitespace() || is_quote(c) || is_word_char(c) || is_grouping(c)
}

fn is_property_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_property_end(c: char) -> bool {
    !(is_word_char(c) || c == '.')
}

fn is_number_start(c: char) -> bool {
    c.is_ascii_digit() || c == '-'
}

fn is_number_end(c: char) -> bool {
    !(c.is_ascii_digit() || c == '-' || c == '.')
}

/// `-?\d+` or `-?\d+\.\d+`
fn is_number_format(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    match digits.split_once('.') {
        Some((whole, fraction)) => all_digits(whole) && all_digits(fraction),
        None => all_digits(digits),
    }
}
