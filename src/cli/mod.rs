//! Command-line interface for scql
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//! - Building a guesser from the configured schema
//! - Subcommand dispatch (guess, tokenize, validate, config, completion)

mod completion;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::completion::QueryGuesser;
use crate::config::{Config, LogLevel, OutputFormat};
use crate::error::Result;
use crate::formatter::{Formatter, ValidationReport};
use crate::parser::{Grammar, QueryValidator, ScqlLexer, Tokenizer, TreeValidator};

pub use completion::generate_completion;

/// SCQL query guesser
#[derive(Parser, Debug)]
#[command(
    name = "scql",
    version,
    about = "Autocompletion for SCQL record queries",
    long_about = "Tokenizes partially typed SCQL queries, predicts the next token and
suggests keywords and attribute paths from a configured record schema."
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Record type that property paths start from
    #[arg(long, value_name = "TYPE", global = true)]
    pub root_type: Option<String>,

    /// Suggest full dotted paths instead of the last segment
    #[arg(long, global = true)]
    pub qualified: bool,

    /// Output format
    #[arg(long, value_name = "FORMAT", value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose mode (debug logging)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv", global = true)]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands for scql
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Feed text to the guesser and print the resulting state
    Guess {
        /// Query text as typed so far
        #[arg(value_name = "TEXT")]
        text: String,

        /// Commit the trailing text as a token
        #[arg(long)]
        force: bool,

        /// Feed the text one character at a time
        #[arg(long)]
        keystrokes: bool,

        /// Apply this many backspaces after typing
        #[arg(long, value_name = "N", default_value_t = 0)]
        backspace: usize,
    },

    /// Print the tokens of a query
    Tokenize {
        #[arg(value_name = "TEXT")]
        text: String,
    },

    /// Check whether a query is complete (exit code 1 when it is not)
    Validate {
        #[arg(value_name = "TEXT")]
        text: String,
    },

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,

        /// List schema record types, one per line
        #[arg(long)]
        list_types: bool,
    },

    /// Generate shell completion script
    Completion {
        /// Shell type (bash, zsh, fish)
        #[arg(value_name = "SHELL")]
        shell: String,
    },
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface from the process arguments
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Create a CLI interface from already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load_from_file(args.config_file.as_deref())?;

        if let Err(e) = config.validate() {
            eprintln!("Warning: Configuration validation failed: {}", e);
            eprintln!("Using default configuration instead.");
            config = Config::default();
        }

        Self::apply_args_to_config(&mut config, args);

        Ok(config)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the CLI arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Overrides configuration values with CLI arguments where provided
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        Self::apply_guesser_args(config, args);
        Self::apply_display_args(config, args);
        Self::apply_logging_args(config, args);
    }

    fn apply_guesser_args(config: &mut Config, args: &CliArgs) {
        if let Some(root_type) = &args.root_type {
            config.guesser.root_type = Some(root_type.clone());
        }
        if args.qualified {
            config.guesser.qualified_attributes = true;
        }
    }

    fn apply_display_args(config: &mut Config, args: &CliArgs) {
        if let Some(format) = args.format {
            config.display.format = format;
        }
    }

    fn apply_logging_args(config: &mut Config, args: &CliArgs) {
        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else {
            config.logging.level
        };
    }

    /// Build a guesser wired to the configured schema and options
    pub fn build_guesser(&self) -> Result<QueryGuesser> {
        let registry = self.config.build_registry()?;
        let mut builder = QueryGuesser::builder()
            .schema(Arc::new(registry))
            .options(self.config.guesser_options()?);
        if let Some(root_type) = &self.config.guesser.root_type {
            builder = builder.root_type(root_type.clone());
        }
        builder.build()
    }

    /// Run the selected subcommand
    ///
    /// # Returns
    /// * `Result<i32>` - Process exit code
    pub fn run(&self) -> Result<i32> {
        match &self.args.command {
            Some(Commands::Guess {
                text,
                force,
                keystrokes,
                backspace,
            }) => {
                let output = self.guess(text, *force, *keystrokes, *backspace)?;
                println!("{}", output);
                Ok(0)
            }
            Some(Commands::Tokenize { text }) => {
                let grammar = Grammar::scql();
                let tokens = ScqlLexer.tokenize(text, &grammar);
                println!("{}", self.formatter().format_tokens(&tokens)?);
                Ok(0)
            }
            Some(Commands::Validate { text }) => {
                let report = Self::validate(text);
                println!("{}", self.formatter().format_validation(&report)?);
                Ok(if report.valid { 0 } else { 1 })
            }
            Some(Commands::Config {
                show,
                validate,
                list_types,
            }) => {
                self.handle_config_command(*show, *validate, *list_types)?;
                Ok(0)
            }
            Some(Commands::Completion { shell }) => {
                generate_completion(shell)?;
                Ok(0)
            }
            None => {
                CliArgs::command().print_help()?;
                println!();
                Ok(0)
            }
        }
    }

    /// Replay typing into a fresh guesser and render the settled snapshot
    pub fn guess(
        &self,
        text: &str,
        force: bool,
        keystrokes: bool,
        backspace: usize,
    ) -> Result<String> {
        let mut guesser = self.build_guesser()?;

        if keystrokes {
            for ch in text.chars() {
                let mut typed = guesser.current_text().to_string();
                typed.push(ch);
                guesser.set_current_text(typed)?;
            }
        } else {
            guesser.set_current_text(text)?;
        }

        for _ in 0..backspace {
            Self::backspace(&mut guesser)?;
        }

        if force {
            guesser.force_commit()?;
        }

        debug!(
            "Guessed {} suggestion(s) for {:?}",
            guesser.guesses().len(),
            text
        );
        self.formatter().format_snapshot(guesser.snapshot())
    }

    /// Delete one character, reopening the last token when the text is empty
    fn backspace(guesser: &mut QueryGuesser) -> Result<()> {
        let mut text = guesser.current_text().to_string();
        if text.pop().is_some() {
            guesser.set_current_text(text)?;
        } else if !guesser.token_stack().is_empty() {
            guesser.pop_token_into_current_text()?;
        }
        Ok(())
    }

    fn validate(text: &str) -> ValidationReport {
        let grammar = Grammar::scql();
        let tokens = ScqlLexer.tokenize(text, &grammar);
        ValidationReport::from_result(TreeValidator.validate(&tokens, &grammar))
    }

    fn formatter(&self) -> Formatter {
        Formatter::from_config(&self.config.display)
    }

    /// Handle config subcommand
    fn handle_config_command(&self, show: bool, validate: bool, list_types: bool) -> Result<()> {
        if list_types {
            for name in self.config.schema.keys() {
                println!("{}", name);
            }
            return Ok(());
        }

        if validate {
            self.validate_config_file();
        }

        if show {
            self.show_config()?;
        }

        Ok(())
    }

    /// Validate configuration file
    fn validate_config_file(&self) {
        let path = self.get_config_path();
        println!("Validating configuration file: {}", path.display());

        if !path.exists() {
            println!("Configuration file does not exist");
            return;
        }

        match Config::load_from_file(Some(&path)) {
            Ok(config) => match config.validate() {
                Ok(_) => println!("Configuration is valid"),
                Err(e) => println!("Configuration validation failed: {}", e),
            },
            Err(e) => println!("Failed to load configuration: {}", e),
        }
    }

    /// Show effective configuration
    fn show_config(&self) -> Result<()> {
        let path = self.get_config_path();
        println!("Configuration file: {}", path.display());
        println!();
        println!("=== Effective Configuration ===");
        println!();
        println!("{}", self.config.to_toml()?);
        Ok(())
    }

    /// Get configuration file path (from args or default)
    fn get_config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_path)
    }
}
