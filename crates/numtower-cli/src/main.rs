use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::debug;
use numtower_builtins::{NumberList, Outcome, TowerError, Value};
use numtower_logging::{init_logging, LoggingOptions};
use numtower_runtime::Engine;
use std::path::PathBuf;
use std::process::ExitCode;

mod config;

use config::{ConfigLoader, LogLevel, LoggingConfig, NumtowerConfig};

#[derive(Parser)]
#[command(
    name = "numtower",
    version = env!("CARGO_PKG_VERSION"),
    about = "Evaluate operators, functions and statistics over the numeric tower",
    long_about = r#"
Evaluates one operation over canonical literals and prints the canonical rendering of
the result.

Literals:
  3  -2.5  1e-7            integers and reals
  3-2i  1+2i+3j+4k         complex numbers and quaternions
  <1,2,3>                  vectors
  [[1,2],[3,4]]            matrices (row-major)
  {1,2,3}                  lists

Examples:
  numtower op + 3-2i 1+0i+0j+0k
  numtower unary normalize '<3,4>'
  numtower fn log 1000 10
  numtower stat percentileIn --extra 25 1 2 3 4
"#,
    after_help = r#"
Exit status: 0 for a value, 2 when no rule exists for the operand kinds, 1 on error.

Environment Variables:
  NUMTOWER_CONFIG=<path>      Path to configuration file
  NUMTOWER_TOLERANCE=<x>      Equality tolerance
  NUMTOWER_ZERO_SNAP=<x>      Zero-snap threshold after transcendental functions
  NUMTOWER_LOG_LEVEL=debug    Set log level (error, warn, info, debug, trace)
  NUMTOWER_DEBUG=1            Enable debug logging
  NUMTOWER_LOG / RUST_LOG     Filter directives (override the log level)
"#
)]
struct Cli {
    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Set log level
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Print a sample configuration file and exit
    #[arg(long)]
    generate_config: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum Commands {
    /// Binary operator: + - * / // ** ==
    Op {
        #[arg(allow_hyphen_values = true)]
        symbol: String,
        #[arg(allow_hyphen_values = true)]
        left: String,
        #[arg(allow_hyphen_values = true)]
        right: String,
    },
    /// Unary operator: neg, conj, abs, normalize
    Unary {
        op: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Named function with an optional second operand
    #[command(name = "fn")]
    Function {
        name: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
        #[arg(allow_hyphen_values = true)]
        extra: Option<String>,
    },
    /// Statistic over a collection of scalars
    Stat {
        name: String,
        /// Value for percentileOf, percent for percentileIn
        #[arg(long, allow_hyphen_values = true)]
        extra: Option<String>,
        #[arg(allow_hyphen_values = true)]
        values: Vec<String>,
    },
}

fn literal(text: &str) -> Result<Value, TowerError> {
    text.parse()
}

fn evaluate(engine: &Engine, command: &Commands) -> Result<Outcome<Value>, TowerError> {
    match command {
        Commands::Op {
            symbol,
            left,
            right,
        } => engine.binary(symbol.parse()?, &literal(left)?, &literal(right)?),
        Commands::Unary { op, value } => engine.unary(op.parse()?, &literal(value)?),
        Commands::Function { name, value, extra } => {
            let extra = extra.as_deref().map(literal).transpose()?;
            engine.function(name.parse()?, &literal(value)?, extra.as_ref())
        }
        Commands::Stat {
            name,
            extra,
            values,
        } => {
            let stat = name.parse()?;
            let extra = extra.as_deref().map(literal).transpose()?;
            let values = values
                .iter()
                .map(|v| literal(v))
                .collect::<Result<Vec<_>, _>>()?;
            let list = NumberList::new(values)?;
            engine
                .statistic(stat, &list, extra.as_ref())
                .map(Outcome::Defined)
        }
    }
}

fn load_configuration(cli: &Cli) -> Result<NumtowerConfig> {
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load_with_path(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => ConfigLoader::load()?,
    };
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if cli.debug {
        config.logging.debug = true;
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<ExitCode> {
    if cli.generate_config {
        println!("{}", ConfigLoader::generate_sample_config());
        return Ok(ExitCode::SUCCESS);
    }

    // Start at the flag level so configuration loading is logged, then apply the merged level.
    let flag_logging = LoggingConfig {
        level: cli.log_level.unwrap_or_default(),
        debug: cli.debug,
    };
    let logging = init_logging(LoggingOptions {
        default_level: flag_logging.directive().to_string(),
        stderr: true,
    });
    let config = load_configuration(&cli)?;
    logging.set_default_level(config.logging.directive());
    debug!("Configuration loaded: {config:?}");

    let Some(command) = cli.command else {
        anyhow::bail!("no command given (try --help)");
    };

    let engine = Engine::new(config.engine);
    let code = match evaluate(&engine, &command) {
        Ok(Outcome::Defined(value)) => {
            println!("{value}");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Undefined) => {
            println!("undefined");
            ExitCode::from(2)
        }
        Err(err) => {
            println!("error: {err}");
            ExitCode::from(1)
        }
    };
    Ok(code)
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Commands {
        let mut argv = vec!["numtower"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().command.unwrap()
    }

    #[test]
    fn negative_literals_are_positionals() {
        assert_eq!(
            parse(&["op", "-", "-3", "-2.5"]),
            Commands::Op {
                symbol: "-".into(),
                left: "-3".into(),
                right: "-2.5".into(),
            }
        );
    }

    #[test]
    fn stat_takes_extra_flag() {
        assert_eq!(
            parse(&["stat", "percentileIn", "--extra", "25", "1", "2"]),
            Commands::Stat {
                name: "percentileIn".into(),
                extra: Some("25".into()),
                values: vec!["1".into(), "2".into()],
            }
        );
    }

    #[test]
    fn evaluates_each_command_kind() {
        let engine = Engine::default();
        let render = |args: &[&str]| evaluate(&engine, &parse(args)).map(|o| o.map(|v| v.to_string()));

        assert_eq!(render(&["op", "+", "1", "2i"]), Ok(Outcome::Defined("1+2i".into())));
        assert_eq!(render(&["unary", "abs", "<3,4>"]), Ok(Outcome::Defined("5".into())));
        assert_eq!(render(&["fn", "sqrt", "-4"]), Ok(Outcome::Defined("2i".into())));
        assert_eq!(render(&["stat", "mode", "1", "1", "2"]), Ok(Outcome::Defined("{1}".into())));
        assert_eq!(render(&["op", "*", "<1,2>", "<3,4>"]), Ok(Outcome::Undefined));
        assert_eq!(
            render(&["fn", "gamma", "1"]),
            Err(TowerError::UnknownFunction("gamma".into()))
        );
    }

    #[test]
    fn bad_literal_is_a_parse_error() {
        let r = evaluate(&Engine::default(), &parse(&["unary", "neg", "<1,"]));
        assert!(matches!(r, Err(TowerError::Parse(_))));
    }
}
