//! Query guesser - the incremental commit engine
//!
//! [`QueryGuesser`] owns the only mutable state: the uncommitted current text
//! and the stack of committed tokens. Every mutation runs the same pipeline:
//!
//! 1. Tokenize the current text and move finished tokens onto the stack
//! 2. Classify the position after the last committed token
//! 3. Predict admissible token types and materialize them into guesses
//! 4. Validate the stack and rebuild the full query text
//! 5. Store one [`Snapshot`] and hand it to every observer
//!
//! Nothing is exposed between steps, so observers never see a stack that has
//! grown while its guesses are stale.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::attribute::AttributeGuesser;
use super::parens::{closing_paren_count, has_unclosed_group};
use super::position::QueryPosition;
use super::predictor::predict_next_token_types;
use super::snapshot::{Snapshot, full_text};
use crate::error::{GuessError, GuesserError};
use crate::parser::{
    Grammar, QueryValidator, ScqlLexer, Token, TokenType, Tokenizer, TreeValidator,
};
use crate::schema::SchemaProvider;

/// Callback receiving each settled snapshot
pub type Observer = Box<dyn FnMut(&Snapshot) + Send>;

/// Tunables for guess materialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuesserOptions {
    /// Prefix attribute guesses with the walked relation path
    pub qualified_attributes: bool,
    /// Reserved words never offered as guesses. Replaces the defaults entirely.
    pub excluded: Vec<TokenType>,
}

impl Default for GuesserOptions {
    fn default() -> Self {
        Self {
            qualified_attributes: false,
            excluded: default_excluded(),
        }
    }
}

/// Format placeholder and the boolean keyword aliases
pub fn default_excluded() -> Vec<TokenType> {
    vec![TokenType::Placeholder, TokenType::Yes, TokenType::No]
}

/// Live autocompletion engine for one query field
pub struct QueryGuesser {
    grammar: Arc<Grammar>,
    tokenizer: Box<dyn Tokenizer + Send>,
    validator: Box<dyn QueryValidator + Send>,
    schema: Option<Arc<dyn SchemaProvider + Send + Sync>>,
    root_type: Option<String>,
    options: GuesserOptions,

    current_text: String,
    token_stack: Vec<Token>,

    snapshot: Snapshot,
    failure: Option<GuessError>,
    observers: Vec<Observer>,
}

impl QueryGuesser {
    /// Start configuring a guesser. Unset collaborators default to the SCQL
    /// grammar, [`ScqlLexer`] and [`TreeValidator`].
    pub fn builder() -> QueryGuesserBuilder {
        QueryGuesserBuilder::default()
    }

    /* ========================= Mutators ========================= */

    /// Replace the current text and reprocess it
    ///
    /// Setting the text it already holds changes nothing.
    pub fn set_current_text(&mut self, text: impl Into<String>) -> Result<&Snapshot, GuessError> {
        let text = text.into();
        if text == self.current_text {
            return self.settled();
        }

        self.current_text = text;
        self.process(false);
        self.settle()
    }

    /// Commit the pending token even without trailing whitespace
    pub fn force_commit(&mut self) -> Result<&Snapshot, GuessError> {
        self.process(true);
        self.settle()
    }

    /// Undo the last commit, as if the user backspaced into it
    ///
    /// The popped token's literal, less its last character, becomes the
    /// current text. With nothing committed the current text is cleared.
    pub fn pop_token_into_current_text(&mut self) -> Result<&Snapshot, GuessError> {
        match self.token_stack.pop() {
            Some(token) => {
                let mut literal = token.literal();
                literal.pop();
                debug!("Popped {} token back into text: {:?}", token.token_type, literal);
                self.current_text = literal;
                self.process(false);
            }
            None => {
                debug!("Nothing to pop, clearing current text");
                self.current_text.clear();
            }
        }
        self.settle()
    }

    /// Empty the current text and the stack
    pub fn clear(&mut self) -> Result<&Snapshot, GuessError> {
        debug!("Clearing {} committed token(s)", self.token_stack.len());
        self.current_text.clear();
        self.token_stack.clear();
        self.settle()
    }

    /// Change the record type attribute guesses start from
    pub fn set_root_type(&mut self, root_type: Option<String>) -> Result<&Snapshot, GuessError> {
        self.root_type = root_type;
        self.settle()
    }

    /// Register a callback for every settled mutation
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&Snapshot) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /* ========================= Reads ========================= */

    pub fn current_text(&self) -> &str {
        &self.current_text
    }

    pub fn token_stack(&self) -> &[Token] {
        &self.token_stack
    }

    pub fn guesses(&self) -> &[String] {
        &self.snapshot.guesses
    }

    /// `None` if the last mutation failed to classify
    pub fn position(&self) -> Option<QueryPosition> {
        self.snapshot.position
    }

    pub fn predicted_token_types(&self) -> &[TokenType] {
        &self.snapshot.predictions
    }

    pub fn is_valid_query(&self) -> bool {
        self.snapshot.is_valid_query
    }

    pub fn closing_paren_count(&self) -> usize {
        self.snapshot.closing_paren_count
    }

    pub fn full_text(&self) -> &str {
        &self.snapshot.full_text
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn root_type(&self) -> Option<&str> {
        self.root_type.as_deref()
    }

    pub fn options(&self) -> &GuesserOptions {
        &self.options
    }

    /* ========================= Commit protocol ========================= */

    /// Run passes until the current text stops changing
    ///
    /// Only the first pass may force. Every pass that changes the text
    /// shortens it, so this terminates.
    fn process(&mut self, force: bool) {
        let mut force = force;
        loop {
            let before = self.current_text.clone();
            self.process_pass(force);
            if self.current_text == before {
                break;
            }
            force = false;
        }
    }

    fn process_pass(&mut self, force: bool) {
        let text = self.current_text.clone();
        let mut tokens = self.tokenizer.tokenize(&text, &self.grammar);
        trace!("Tokenized {:?} into {} token(s)", text, tokens.len());

        let Some(last) = tokens.pop() else {
            return;
        };
        for token in tokens {
            self.shift(token);
        }

        let single_character = self
            .grammar
            .get(last.token_type)
            .is_some_and(|d| d.single_character);
        if force || single_character || text.ends_with(char::is_whitespace) {
            self.shift(last);
        }
    }

    /// Move `token` from the front of the current text onto the stack
    ///
    /// The token's literal must prefix the trimmed text, ignoring case.
    /// Otherwise nothing changes. Whitespace left at the front of the
    /// remainder is dropped.
    fn shift(&mut self, token: Token) {
        let trimmed = self.current_text.trim();
        let Some(rest) = token
            .literal_forms()
            .iter()
            .find_map(|literal| strip_prefix_ignore_case(trimmed, literal))
        else {
            trace!(
                "Skipping shift: {} {:?} does not start {:?}",
                token.token_type, token.token_value, trimmed
            );
            return;
        };

        self.current_text = rest.trim_start().to_string();
        debug!("Committed {} token {:?}", token.token_type, token.token_value);
        self.token_stack.push(token);
    }

    /* ========================= Recomputation ========================= */

    /// Result of the last settled mutation
    fn settled(&self) -> Result<&Snapshot, GuessError> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(&self.snapshot),
        }
    }

    /// Recompute derived state and notify observers
    fn settle(&mut self) -> Result<&Snapshot, GuessError> {
        match self.recompute() {
            Ok(snapshot) => {
                self.snapshot = snapshot;
                self.failure = None;
                for observer in &mut self.observers {
                    observer(&self.snapshot);
                }
                Ok(&self.snapshot)
            }
            Err((snapshot, err)) => {
                warn!("{}", err);
                self.snapshot = snapshot;
                self.failure = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Build the snapshot for the current stack and text
    ///
    /// On classification failure the partial snapshot (no predictions, no
    /// guesses) comes back with the error.
    fn recompute(&self) -> Result<Snapshot, (Snapshot, GuessError)> {
        let closing = closing_paren_count(&self.token_stack);
        let mut snapshot = Snapshot {
            current_text: self.current_text.clone(),
            tokens: self.token_stack.clone(),
            position: None,
            predictions: Vec::new(),
            guesses: Vec::new(),
            is_valid_query: self
                .validator
                .validate(&self.token_stack, &self.grammar)
                .is_ok(),
            closing_paren_count: closing,
            full_text: full_text(&self.token_stack, &self.current_text, closing),
        };

        let position = match QueryPosition::classify(self.token_stack.last(), &self.grammar) {
            Ok(position) => position,
            Err(err) => return Err((snapshot, err)),
        };
        let predictions = predict_next_token_types(
            position,
            &self.grammar,
            has_unclosed_group(&self.token_stack),
        );
        trace!("Position {} predicts {} token type(s)", position, predictions.len());

        snapshot.guesses = self.materialize(&predictions);
        snapshot.position = Some(position);
        snapshot.predictions = predictions;
        Ok(snapshot)
    }

    /// Turn predicted token types into suggestion strings
    fn materialize(&self, predictions: &[TokenType]) -> Vec<String> {
        let text = self.current_text.to_lowercase();
        let mut guesses = Vec::new();

        for &token_type in predictions {
            let reserved = self
                .grammar
                .get(token_type)
                .is_some_and(|d| d.reserved_word);

            match token_type {
                TokenType::Property => guesses.extend(self.attribute_guesses(&text)),
                _ if reserved => {
                    let literal = token_type.as_str();
                    if literal.to_lowercase().starts_with(&text)
                        && !self.options.excluded.contains(&token_type)
                    {
                        guesses.push(literal.to_string());
                    }
                }
                TokenType::OpenParen if text.is_empty() || text == "(" => {
                    guesses.push("(".to_string())
                }
                TokenType::CloseParen if text.is_empty() || text == ")" => {
                    guesses.push(")".to_string())
                }
                _ => {}
            }
        }
        guesses
    }

    fn attribute_guesses(&self, text: &str) -> Vec<String> {
        match (&self.schema, &self.root_type) {
            (Some(schema), Some(root_type)) => AttributeGuesser::new(schema.as_ref(), root_type)
                .qualified(self.options.qualified_attributes)
                .guesses(text),
            _ => Vec::new(),
        }
    }
}

impl fmt::Debug for QueryGuesser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryGuesser")
            .field("current_text", &self.current_text)
            .field("token_stack", &self.token_stack)
            .field("root_type", &self.root_type)
            .field("options", &self.options)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

/// `text` with `prefix` removed from its front, comparing case-insensitively
fn strip_prefix_ignore_case<'t>(text: &'t str, prefix: &str) -> Option<&'t str> {
    let len = prefix.chars().count();
    let split = match text.char_indices().nth(len) {
        Some((at, _)) => at,
        None if text.chars().count() == len => text.len(),
        None => return None,
    };

    let (head, rest) = text.split_at(split);
    head.chars()
        .flat_map(char::to_lowercase)
        .eq(prefix.chars().flat_map(char::to_lowercase))
        .then_some(rest)
}

/// Builder for [`QueryGuesser`]
#[derive(Default)]
pub struct QueryGuesserBuilder {
    grammar: Option<Arc<Grammar>>,
    tokenizer: Option<Box<dyn Tokenizer + Send>>,
    validator: Option<Box<dyn QueryValidator + Send>>,
    schema: Option<Arc<dyn SchemaProvider + Send + Sync>>,
    root_type: Option<String>,
    options: GuesserOptions,
}

impl QueryGuesserBuilder {
    pub fn grammar(mut self, grammar: Arc<Grammar>) -> Self {
        self.grammar = Some(grammar);
        self
    }

    pub fn tokenizer(mut self, tokenizer: impl Tokenizer + Send + 'static) -> Self {
        self.tokenizer = Some(Box::new(tokenizer));
        self
    }

    pub fn validator(mut self, validator: impl QueryValidator + Send + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Schema consulted for `PROPERTY` guesses
    pub fn schema(mut self, schema: Arc<dyn SchemaProvider + Send + Sync>) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Record type attribute paths start from
    pub fn root_type(mut self, root_type: impl Into<String>) -> Self {
        self.root_type = Some(root_type.into());
        self
    }

    pub fn options(mut self, options: GuesserOptions) -> Self {
        self.options = options;
        self
    }

    pub fn qualified_attributes(mut self, qualified: bool) -> Self {
        self.options.qualified_attributes = qualified;
        self
    }

    pub fn excluded(mut self, excluded: Vec<TokenType>) -> Self {
        self.options.excluded = excluded;
        self
    }

    /// Check the grammar and compute the initial (empty) snapshot
    pub fn build(self) -> Result<QueryGuesser, GuesserError> {
        let grammar = self.grammar.unwrap_or_else(|| Arc::new(Grammar::scql()));
        grammar.validate_closed()?;

        let mut guesser = QueryGuesser {
            grammar,
            tokenizer: self.tokenizer.unwrap_or_else(|| Box::new(ScqlLexer)),
            validator: self.validator.unwrap_or_else(|| Box::new(TreeValidator)),
            schema: self.schema,
            root_type: self.root_type,
            options: self.options,
            current_text: String::new(),
            token_stack: Vec::new(),
            snapshot: Snapshot::default(),
            failure: None,
            observers: Vec::new(),
        };
        guesser.settle()?;
        Ok(guesser)
    }
}

impl fmt::Debug for QueryGuesserBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryGuesserBuilder")
            .field("root_type", &self.root_type)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::parser::{TokenDescriptor, TokenTree};
    use crate::schema::{Attribute, SchemaRegistry};
    use std::sync::Mutex;

    fn guesser() -> QueryGuesser {
        QueryGuesser::builder().build().unwrap()
    }

    fn types(guesser: &QueryGuesser) -> Vec<TokenType> {
        guesser.token_stack().iter().map(|t| t.token_type).collect()
    }

    fn schema() -> Arc<SchemaRegistry> {
        let registry = SchemaRegistry::new();
        registry.define(
            "Person",
            [
                ("age", Attribute::scalar("Number")),
                ("name", Attribute::scalar("String")),
                ("dog", Attribute::to_one("Dog")),
            ]
            .into_iter()
            .map(|(n, a)| (n.to_string(), a))
            .collect(),
        );
        registry.define(
            "Dog",
            [
                ("master", Attribute::to_one("Person")),
                ("waterBowl", Attribute::scalar("String")),
            ]
            .into_iter()
            .map(|(n, a)| (n.to_string(), a))
            .collect(),
        );
        Arc::new(registry)
    }

    #[test]
    fn test_strip_prefix_ignore_case() {
        assert_eq!(strip_prefix_ignore_case("AND age", "and"), Some(" age"));
        assert_eq!(strip_prefix_ignore_case("an", "and"), None);
        assert_eq!(strip_prefix_ignore_case("and", "and"), Some(""));
        assert_eq!(strip_prefix_ignore_case("Über", "ü"), Some("ber"));
        assert_eq!(strip_prefix_ignore_case("age", "x"), None);
    }

    #[test]
    fn test_initial_state() {
        let guesser = guesser();
        assert_eq!(guesser.current_text(), "");
        assert!(guesser.token_stack().is_empty());
        assert_eq!(guesser.position(), Some(QueryPosition::Beginning));
        assert_eq!(guesser.guesses(), &["(", "NOT", "TYPE_IS"]);
        assert!(guesser.is_valid_query());
    }

    #[test]
    fn test_pending_token_stays_in_text() {
        let mut guesser = guesser();
        guesser.set_current_text("age").unwrap();
        assert_eq!(guesser.current_text(), "age");
        assert!(guesser.token_stack().is_empty());
    }

    #[test]
    fn test_trailing_space_commits() {
        let mut guesser = guesser();
        guesser.set_current_text("age ").unwrap();
        assert_eq!(guesser.current_text(), "");
        assert_eq!(types(&guesser), vec![TokenType::Property]);
        assert_eq!(guesser.position(), Some(QueryPosition::Middle));
    }

    #[test]
    fn test_leading_tokens_commit_and_last_stays_pending() {
        let mut guesser = guesser();
        guesser.set_current_text("age = 4").unwrap();
        assert_eq!(types(&guesser), vec![TokenType::Property, TokenType::Eq]);
        assert_eq!(guesser.current_text(), "4");
        assert!(!guesser.is_valid_query());

        guesser.force_commit().unwrap();
        assert_eq!(guesser.current_text(), "");
        assert!(guesser.is_valid_query());
        assert_eq!(guesser.guesses(), &["AND", "OR"]);
    }

    #[test]
    fn test_open_paren_commits_immediately() {
        let mut guesser = guesser();
        guesser.set_current_text("(").unwrap();
        assert_eq!(types(&guesser), vec![TokenType::OpenParen]);
        assert_eq!(guesser.current_text(), "");
        assert_eq!(guesser.closing_paren_count(), 1);
        assert_eq!(guesser.full_text(), "( )");
    }

    #[test]
    fn test_unterminated_string_waits() {
        let mut guesser = guesser();
        guesser.set_current_text("name = \"Jo").unwrap();
        assert_eq!(guesser.current_text(), "\"Jo");

        guesser.set_current_text("\"Jo\" ").unwrap();
        assert_eq!(
            guesser.token_stack().last(),
            Some(&Token::quoted("Jo", '"'))
        );
        assert_eq!(guesser.full_text(), "name = \"Jo\"");
    }

    #[test]
    fn test_single_quoted_string_commits() {
        let mut guesser = guesser();
        guesser.set_current_text("name = 'Jo' ").unwrap();
        assert_eq!(guesser.current_text(), "");
        assert_eq!(guesser.token_stack().len(), 3);
    }

    #[test]
    fn test_pop_round_trip() {
        let mut guesser = guesser();
        guesser.set_current_text("age = 4 AND ").unwrap();
        assert_eq!(guesser.token_stack().len(), 4);

        guesser.pop_token_into_current_text().unwrap();
        assert_eq!(guesser.current_text(), "AN");
        assert_eq!(guesser.token_stack().len(), 3);
    }

    #[test]
    fn test_pop_string_requotes() {
        let mut guesser = guesser();
        guesser.set_current_text("name = \"Jo\" ").unwrap();
        guesser.pop_token_into_current_text().unwrap();
        assert_eq!(guesser.current_text(), "\"Jo");
    }

    #[test]
    fn test_pop_keeps_single_quotes() {
        let mut guesser = guesser();
        guesser.set_current_text("name = 'say \"hi\"' ").unwrap();
        assert_eq!(guesser.token_stack().len(), 3);
        assert_eq!(guesser.full_text(), "name = 'say \"hi\"'");

        guesser.pop_token_into_current_text().unwrap();
        assert_eq!(guesser.current_text(), "'say \"hi\"");
        assert_eq!(guesser.token_stack().len(), 2);
        assert_eq!(guesser.full_text(), "name = 'say \"hi\"");
    }

    #[test]
    fn test_pop_on_empty_stack_clears_text() {
        let mut guesser = guesser();
        guesser.set_current_text("ag").unwrap();
        guesser.pop_token_into_current_text().unwrap();
        assert_eq!(guesser.current_text(), "");
    }

    #[test]
    fn test_clear() {
        let mut guesser = guesser();
        guesser.set_current_text("( age = 4 AND ").unwrap();
        guesser.clear().unwrap();
        assert_eq!(guesser.current_text(), "");
        assert!(guesser.token_stack().is_empty());
        assert_eq!(guesser.full_text(), "");
    }

    #[test]
    fn test_reserved_word_guesses_are_prefix_filtered() {
        let mut guesser = guesser();
        guesser.set_current_text("age ").unwrap();
        guesser.set_current_text("<").unwrap();
        assert_eq!(guesser.guesses(), &["<", "<="]);

        guesser.set_current_text("b").unwrap();
        assert_eq!(guesser.guesses(), &["BEGINS_WITH"]);
    }

    #[test]
    fn test_excluded_words_are_not_offered() {
        let mut guesser = guesser();
        guesser.set_current_text("done = ").unwrap();
        assert!(guesser.guesses().contains(&"true".to_string()));
        assert!(!guesser.guesses().contains(&"YES".to_string()));
        assert!(!guesser.guesses().contains(&"%@".to_string()));

        let mut guesser = QueryGuesser::builder().excluded(Vec::new()).build().unwrap();
        guesser.set_current_text("done = ").unwrap();
        assert!(guesser.guesses().contains(&"YES".to_string()));
    }

    #[test]
    fn test_property_guesses_from_schema() {
        let mut guesser = QueryGuesser::builder()
            .schema(schema())
            .root_type("Person")
            .build()
            .unwrap();
        assert_eq!(guesser.guesses(), &["(", "age", "name", "dog", "NOT", "TYPE_IS"]);

        guesser.set_current_text("dog.w").unwrap();
        assert_eq!(guesser.guesses(), &["waterBowl"]);

        guesser.set_root_type(None).unwrap();
        assert!(guesser.guesses().is_empty());
    }

    #[test]
    fn test_idempotent_text() {
        let mut guesser = guesser();
        guesser.set_current_text("age = ").unwrap();
        let before = guesser.snapshot().clone();
        guesser.set_current_text("").unwrap();
        assert_eq!(guesser.snapshot(), &before);
    }

    #[test]
    fn test_observers_see_each_settled_cycle() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut guesser = guesser();
        guesser.subscribe(move |snapshot| {
            sink.lock().unwrap().push(snapshot.tokens.len());
        });

        guesser.set_current_text("age = 4 ").unwrap();
        guesser.set_current_text("").unwrap();
        guesser.pop_token_into_current_text().unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![3, 2]);
    }

    #[test]
    fn test_classification_failure_is_reported() {
        let grammar = Grammar::builder()
            .token(TokenType::Property, TokenDescriptor::primitive())
            .token(TokenType::OpenParen, TokenDescriptor::structural())
            .token(TokenType::CloseParen, TokenDescriptor::structural())
            .token(
                TokenType::Placeholder,
                TokenDescriptor::structural().single_character(),
            )
            .build();
        let mut guesser = QueryGuesser::builder()
            .grammar(Arc::new(grammar))
            .tokenizer(FixedTokenizer(vec![Token::new(TokenType::Placeholder, "%@")]))
            .build()
            .unwrap();

        let notified = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&notified);
        guesser.subscribe(move |_| *counter.lock().unwrap() += 1);

        let err = guesser.set_current_text("%@").unwrap_err();
        assert_eq!(
            err,
            GuessError::UnclassifiablePosition {
                token_type: TokenType::Placeholder
            }
        );
        assert_eq!(guesser.token_stack().len(), 1);
        assert_eq!(guesser.position(), None);
        assert!(guesser.guesses().is_empty());
        assert_eq!(*notified.lock().unwrap(), 0);

        guesser.clear().unwrap();
        assert_eq!(*notified.lock().unwrap(), 1);
    }

    #[test]
    fn test_grammar_must_be_closed() {
        let grammar = Grammar::builder()
            .token(TokenType::Property, TokenDescriptor::primitive())
            .build();
        assert!(QueryGuesser::builder().grammar(Arc::new(grammar)).build().is_err());
    }

    #[test]
    fn test_custom_validator() {
        struct Never;
        impl QueryValidator for Never {
            fn validate(
                &self,
                _tokens: &[Token],
                _grammar: &Grammar,
            ) -> Result<Option<TokenTree>, ValidationError> {
                Err(ValidationError::EmptyOperand {
                    after: TokenType::Unknown,
                })
            }
        }

        let guesser = QueryGuesser::builder().validator(Never).build().unwrap();
        assert!(!guesser.is_valid_query());
    }

    /// Always yields the same tokens
    struct FixedTokenizer(Vec<Token>);

    impl Tokenizer for FixedTokenizer {
        fn tokenize(&self, text: &str, _grammar: &Grammar) -> Vec<Token> {
            if text.is_empty() { Vec::new() } else { self.0.clone() }
        }
    }
}
