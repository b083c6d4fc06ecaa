//! scql - SCQL query guesser
//!
//! Command-line front end to the guesser: feed it partially typed queries
//! and inspect the committed tokens, predictions and suggestions.
//!
//! # Usage
//!
//! ```bash
//! scql guess "age = 4 AN"
//! scql --root-type Person guess "dog.b" --format json
//! scql validate "age >= 21 AND name BEGINS_WITH 'J'"
//! ```

use tracing::Level;

use scql_guesser::cli::CliInterface;
use scql_guesser::error::Result;

/// Application entry point
fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Parse arguments, load configuration, initialize logging and dispatch
fn run() -> Result<i32> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);

    cli.run()
}

/// Initialize logging system based on verbosity level
fn initialize_logging(cli: &CliInterface) {
    let level = if cli.args().very_verbose {
        Level::TRACE
    } else if cli.args().verbose {
        Level::DEBUG
    } else {
        cli.config().logging.level.to_tracing_level()
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
