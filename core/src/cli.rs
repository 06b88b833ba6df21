use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::benchmark::{self, BenchmarkParams};
use crate::config::Config;
use crate::engine::TypeTag;
use crate::repl::Repl;
use crate::session::{ExecOutcome, Session, SessionOptions};
use crate::value::GlobalValue;

#[derive(Parser)]
#[command(name = "luax")]
#[command(about = "luax - an embedded Lua session with typed globals", long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default search)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Do not load the standard libraries (overrides config file and env vars)
    #[arg(long, global = true)]
    pub no_libs: bool,

    /// Print outcomes and values as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one line of code
    Eval {
        /// Source text
        code: String,
    },

    /// Run a script file
    Run {
        /// Path to the script
        file: PathBuf,
    },

    /// Bind an input string, run a script, print the output global
    Exec {
        /// Script source (or a path with --file)
        script: String,

        /// Treat SCRIPT as a file path
        #[arg(short = 'f', long = "file")]
        file: bool,

        /// Value bound to the input global
        #[arg(short = 'i', long = "input", default_value = "")]
        input: String,

        /// Name of the input global
        #[arg(long = "input-name", default_value = "input")]
        input_name: String,

        /// Name of the global printed afterwards
        #[arg(long = "output-name", default_value = "output")]
        output_name: String,
    },

    /// Print the type and value of globals
    Get {
        /// Global names
        #[arg(required = true)]
        names: Vec<String>,

        /// Code to run first
        #[arg(short = 'b', long = "before")]
        before: Option<String>,
    },

    /// Interactive session
    Repl,

    /// Run the set/get churn benchmark
    Bench {
        /// Number of set/get rounds
        #[arg(long, default_value = "10000")]
        iterations: usize,

        /// Number of distinct global names
        #[arg(long, default_value = "16")]
        names: usize,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Serialize)]
struct GlobalReport<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    type_tag: TypeTag,
    value: GlobalValue,
}

#[derive(Serialize)]
struct ExecReport<'a> {
    #[serde(flatten)]
    outcome: &'a ExecOutcome,
    output: Option<GlobalValue>,
}

/// Main CLI entry point - parses from std::env::args()
pub fn run_cli() -> Result<ExitCode> {
    let cli = Cli::parse();
    run_cli_with_args(cli)
}

/// CLI entry point with custom args (for embedding in other tools)
pub fn run_cli_from_args(args: Vec<String>) -> Result<ExitCode> {
    let cli = Cli::parse_from(args);
    run_cli_with_args(cli)
}

fn run_cli_with_args(cli: Cli) -> Result<ExitCode> {
    // Load configuration before any command so bad config fails up front
    let config = Config::builder()
        .config_path(cli.config.as_ref().map(PathBuf::from))
        .open_libs(cli.no_libs.then_some(false))
        .build()?;

    init_tracing(&config);

    let json = cli.json;
    match cli.command {
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Eval { code } => {
            let mut session = open_session(&config)?;
            let outcome = session.parse_line(&code)?;
            Ok(report_outcome(&outcome, json)?)
        }
        Commands::Run { file } => {
            let mut session = open_session(&config)?;
            let outcome = session.parse_file(&file)?;
            Ok(report_outcome(&outcome, json)?)
        }
        Commands::Exec {
            script,
            file,
            input,
            input_name,
            output_name,
        } => {
            let mut session = open_session(&config)?;
            session.set_string(&input_name, &input)?;

            let outcome = if file {
                session.parse_file(&script)?
            } else {
                session.parse_line(&script)?
            };
            let output = if outcome.ok {
                Some(session.get_value(&output_name)?)
            } else {
                None
            };

            if json {
                let report = ExecReport {
                    outcome: &outcome,
                    output,
                };
                println!("{}", serde_json::to_string(&report)?);
            } else if let Some(value) = output {
                println!("{}", value);
            } else {
                eprintln!("{}", outcome.message);
            }
            Ok(exit_code(outcome.ok))
        }
        Commands::Get { names, before } => {
            let mut session = open_session(&config)?;
            if let Some(code) = before {
                let outcome = session.parse_line(&code)?;
                if !outcome.ok {
                    return report_outcome(&outcome, json);
                }
            }

            let mut reports = Vec::with_capacity(names.len());
            for name in &names {
                reports.push(GlobalReport {
                    name,
                    type_tag: session.get_type(name)?,
                    value: session.get_value(name)?,
                });
            }

            if json {
                println!("{}", serde_json::to_string(&reports)?);
            } else {
                for report in &reports {
                    println!("{} ({}) = {}", report.name, report.type_tag, report.value);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Repl => {
            let session = open_session(&config)?;
            let mut repl = Repl::new(session);
            repl.run()?;
            repl.into_session().close();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Bench { iterations, names } => {
            let params = BenchmarkParams {
                iterations,
                names,
                options: SessionOptions::from(&config),
            };

            if json {
                let mut session = Session::with_options(params.options.clone())?;
                let metrics = benchmark::run_churn(&mut session, &params)?;
                println!("{}", serde_json::to_string(&metrics)?);
                metrics.verify()?;
            } else {
                benchmark::run_benchmark(params)?;
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));

    // A host embedding the CLI may already have a subscriber installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn open_session(config: &Config) -> Result<Session> {
    Session::with_options(SessionOptions::from(config)).context("Failed to create Lua session")
}

fn report_outcome(outcome: &ExecOutcome, json: bool) -> Result<ExitCode> {
    if json {
        println!("{}", serde_json::to_string(outcome)?);
    } else if !outcome.ok {
        eprintln!("{}", outcome.message);
    }
    Ok(exit_code(outcome.ok))
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_exec_defaults() {
        let cli = Cli::parse_from(["luax", "exec", "output = input"]);
        match cli.command {
            Commands::Exec {
                script,
                file,
                input,
                input_name,
                output_name,
            } => {
                assert_eq!(script, "output = input");
                assert!(!file);
                assert_eq!(input, "");
                assert_eq!(input_name, "input");
                assert_eq!(output_name, "output");
            }
            _ => panic!("expected exec"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["luax", "get", "x", "y", "--json", "--no-libs"]);
        assert!(cli.json);
        assert!(cli.no_libs);
        assert!(matches!(cli.command, Commands::Get { ref names, .. } if names.len() == 2));
    }

    #[test]
    fn test_get_requires_a_name() {
        assert!(Cli::try_parse_from(["luax", "get"]).is_err());
    }
}
