//! Command-line interface (CLI) for the narsese-terms factory.
//!
//! This binary wraps a [`TermFactory`] and exposes a small command-line
//! interface for canonicalizing terms. It reads a JSON array of term
//! descriptions (every shape [`TermSpec`] accepts), interns each one and
//! prints its canonical name and complexity, optionally followed by the
//! factory counters as JSON.
//!
//! [`TermFactory`]: narsese_terms::TermFactory
//! [`TermSpec`]: narsese_terms::TermSpec

mod error;

use clap::{Parser as ClapParser, Subcommand};
use error::CliError;
use narsese_terms::{FactoryConfig, LogEvents, Term, TermFactory};
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::mem;

#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Command
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Canonicalizes terms
    Create {
        /// Input file with a JSON array of terms
        #[arg(short, long)]
        terms: String,
        /// Capacity of the interning cache
        #[arg(short = 'c', long)]
        max_cache_size: Option<usize>,
        /// Maximum number of rewrite steps per term
        #[arg(short = 'r', long)]
        max_rewrite_steps: Option<usize>,
        /// Print factory statistics as JSON
        #[arg(short, long)]
        stats: bool,
    },
    /// Prints sizes
    Sizes {},
}

fn main() -> Result<(), CliError> {
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Create {
            terms: terms_path,
            max_cache_size,
            max_rewrite_steps,
            stats,
        } => {
            let mut config = FactoryConfig::default();
            if let Some(n) = max_cache_size {
                config = config.with_max_cache_size(n);
            }
            if let Some(n) = max_rewrite_steps {
                config = config.with_max_rewrite_steps(n);
            }
            let factory = TermFactory::with_config(config).with_events(LogEvents);

            let input: Value = serde_json::from_reader(BufReader::new(File::open(&terms_path)?))?;
            let Value::Array(items) = input else {
                return Err(CliError::NotAnArray);
            };
            log::info!("canonicalizing {} terms from {}", items.len(), terms_path);

            for (index, item) in items.iter().enumerate() {
                let term = factory
                    .create_json(item)
                    .map_err(|source| CliError::Term { index, source })?;
                println!("{}\t{}", term, factory.complexity(&term));
            }

            if stats {
                println!("{}", serde_json::to_string_pretty(&factory.stats())?);
            }
        }
        Commands::Sizes {} => {
            println!("Size of Term: {}", mem::size_of::<Term>());
            println!("Size of Option<Term>: {}", mem::size_of::<Option<Term>>());
            println!(
                "Size of String: {}",
                mem::size_of::<smartstring::alias::String>()
            );
            println!(
                "Size of std::string::String: {}",
                mem::size_of::<std::string::String>()
            );
            println!("Size of TermFactory: {}", mem::size_of::<TermFactory>());
        }
    }

    Ok(())
}
