//! # Command Line
//!
//! ## Usage
//! ```bash
//! # Print the discount rule table
//! forno-quote rules
//!
//! # List problems in a discount input (exit 1 if any)
//! forno-quote check input.json
//!
//! # Evaluate a discount input read from stdin
//! echo '{"basePrice": 10.33, ...}' | forno-quote evaluate -
//!
//! # Quote an order against the configured menu
//! forno-quote --config ./quote.toml order order.json
//! ```

use std::path::PathBuf;

use crate::error::{QuoteError, QuoteResult};

/// Input source meaning "read standard input".
pub const STDIN: &str = "-";

pub const USAGE: &str = "\
Forno Quote

Usage: forno-quote [OPTIONS] <COMMAND>

Commands:
  rules              Print the discount rule table
  check <FILE|->     List problems in a discount input document
  evaluate <FILE|->  Evaluate a discount input document
  order <FILE|->     Price an order against the configured menu

Options:
  -c, --config <PATH>  Config file (default: platform config dir, quote.toml)
  -h, --help           Show this help message";

/// What to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Rules,
    Check(String),
    Evaluate(String),
    Order(String),
    Help,
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cli {
    pub command: Command,
    pub config_path: Option<PathBuf>,
}

impl Cli {
    /// Parses arguments, skipping the program name in `args[0]`.
    pub fn parse(args: &[String]) -> QuoteResult<Self> {
        let mut config_path = None;
        let mut words: Vec<&str> = Vec::new();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--config" | "-c" => {
                    let path = args
                        .get(i + 1)
                        .ok_or_else(|| QuoteError::Usage("--config needs a path".into()))?;
                    config_path = Some(PathBuf::from(path));
                    i += 1;
                }
                "--help" | "-h" => {
                    return Ok(Cli {
                        command: Command::Help,
                        config_path,
                    });
                }
                flag if flag.starts_with("--") => {
                    return Err(QuoteError::Usage(format!("unknown option '{}'", flag)));
                }
                word => words.push(word),
            }
            i += 1;
        }

        let command = match words.as_slice() {
            [] => Command::Help,
            ["rules"] => Command::Rules,
            ["check", source] => Command::Check(source.to_string()),
            ["evaluate", source] => Command::Evaluate(source.to_string()),
            ["order", source] => Command::Order(source.to_string()),
            ["check" | "evaluate" | "order"] => {
                return Err(QuoteError::Usage(format!(
                    "'{}' needs an input file, or '-' for stdin",
                    words[0]
                )));
            }
            [name, ..] => {
                return Err(QuoteError::Usage(format!(
                    "unexpected arguments starting at '{}'",
                    name
                )));
            }
        };

        Ok(Cli {
            command,
            config_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> QuoteResult<Cli> {
        let args: Vec<String> = std::iter::once("forno-quote")
            .chain(line.split_whitespace())
            .map(String::from)
            .collect();
        Cli::parse(&args)
    }

    #[test]
    fn test_commands() {
        assert_eq!(parse("rules").unwrap().command, Command::Rules);
        assert_eq!(
            parse("check input.json").unwrap().command,
            Command::Check("input.json".into())
        );
        assert_eq!(
            parse("evaluate -").unwrap().command,
            Command::Evaluate(STDIN.into())
        );
        assert_eq!(
            parse("order order.json").unwrap().command,
            Command::Order("order.json".into())
        );
    }

    #[test]
    fn test_no_arguments_shows_help() {
        assert_eq!(parse("").unwrap().command, Command::Help);
        assert_eq!(parse("order --help").unwrap().command, Command::Help);
    }

    #[test]
    fn test_config_flag_anywhere() {
        let cli = parse("--config ./quote.toml order o.json").unwrap();
        assert_eq!(cli.config_path, Some(PathBuf::from("./quote.toml")));
        assert_eq!(cli.command, Command::Order("o.json".into()));

        let cli = parse("rules -c other.toml").unwrap();
        assert_eq!(cli.config_path, Some(PathBuf::from("other.toml")));
    }

    #[test]
    fn test_usage_errors() {
        assert!(matches!(parse("order"), Err(QuoteError::Usage(_))));
        assert!(matches!(parse("--config"), Err(QuoteError::Usage(_))));
        assert!(matches!(parse("--verbose rules"), Err(QuoteError::Usage(_))));
        assert!(matches!(parse("bake pizza"), Err(QuoteError::Usage(_))));
        assert!(matches!(parse("rules extra"), Err(QuoteError::Usage(_))));
    }
}
