//! vdb-sql CLI
//!
//! Command-line tool for parsing, canonicalizing and classifying SQL.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;

use vdb_sql_core::ast::visit::collect_groups;
use vdb_sql_core::{get_command_type, parse_command, to_canonical_string, ParseInfo};

/// Parser and canonical unparser for data-virtualization SQL.
#[derive(Parser)]
#[command(name = "vdb-sql")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Accept double-quoted names for procedure variables.
    #[arg(long, global = true, env = "VDB_SQL_ALLOW_DOUBLE_QUOTED_VARIABLE")]
    allow_double_quoted_variable: bool,

    /// Maximum nesting depth before a parse fails.
    #[arg(long, global = true, env = "VDB_SQL_MAX_DEPTH")]
    max_depth: Option<usize>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a command and print its canonical text.
    Canonical(Source),

    /// Print the command type without a full parse.
    Classify(Source),

    /// Print the parsed AST as JSON.
    Dump {
        #[command(flatten)]
        source: Source,

        /// Pretty-print the JSON.
        #[arg(short, long)]
        pretty: bool,
    },

    /// List the groups a command references.
    Groups(Source),

    /// Parse every file (or stdin) and report failures.
    Check {
        /// Files holding one command each (stdin if none given).
        #[arg(short, long = "file")]
        files: Vec<PathBuf>,
    },
}

/// Where the SQL text comes from: the argument, else `--file`, else stdin.
#[derive(Args)]
struct Source {
    /// SQL text.
    sql: Option<String>,

    /// Read the SQL from a file.
    #[arg(short, long, conflicts_with = "sql")]
    file: Option<PathBuf>,
}

impl Source {
    fn read(&self) -> anyhow::Result<String> {
        if let Some(sql) = &self.sql {
            return Ok(sql.clone());
        }
        match &self.file {
            Some(path) => read_file(path),
            None => read_stdin(),
        }
    }
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn read_stdin() -> anyhow::Result<String> {
    let mut sql = String::new();
    io::stdin()
        .read_to_string(&mut sql)
        .context("Failed to read stdin")?;
    Ok(sql)
}

impl Cli {
    fn parse_info(&self) -> ParseInfo {
        let info = ParseInfo::default()
            .with_allow_double_quoted_variable(self.allow_double_quoted_variable);
        match self.max_depth {
            Some(max_depth) => info.with_max_depth(max_depth),
            None => info,
        }
    }
}

fn canonical(sql: &str, info: &ParseInfo) -> anyhow::Result<String> {
    let command = parse_command(sql, info)?;
    Ok(to_canonical_string(&command))
}

fn dump(sql: &str, info: &ParseInfo, pretty: bool) -> anyhow::Result<String> {
    let command = parse_command(sql, info)?;
    let json = if pretty {
        serde_json::to_string_pretty(&command)?
    } else {
        serde_json::to_string(&command)?
    };
    Ok(json)
}

fn groups(sql: &str, info: &ParseInfo) -> anyhow::Result<Vec<String>> {
    let command = parse_command(sql, info)?;
    Ok(collect_groups(&command))
}

/// Parses each input, logging the outcome. Returns the number of failures.
fn check(inputs: &[(String, String)], info: &ParseInfo) -> usize {
    let mut failures = 0;
    for (name, sql) in inputs {
        match parse_command(sql.as_str(), info) {
            Ok(command) => info!("{name}: ok ({})", command.command_type()),
            Err(e) => {
                error!("{name}: {e}");
                failures += 1;
            }
        }
    }
    failures
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let info = cli.parse_info();
    debug!(?info, "Parser configuration");

    match &cli.command {
        Commands::Canonical(source) => {
            println!("{}", canonical(&source.read()?, &info)?);
        }

        Commands::Classify(source) => {
            println!("{}", get_command_type(source.read()?.as_str()));
        }

        Commands::Dump { source, pretty } => {
            println!("{}", dump(&source.read()?, &info, *pretty)?);
        }

        Commands::Groups(source) => {
            for group in groups(&source.read()?, &info)? {
                println!("{group}");
            }
        }

        Commands::Check { files } => {
            let inputs = if files.is_empty() {
                vec![("<stdin>".to_string(), read_stdin()?)]
            } else {
                files
                    .iter()
                    .map(|path| Ok((path.display().to_string(), read_file(path)?)))
                    .collect::<anyhow::Result<Vec<_>>>()?
            };
            let failures = check(&inputs, &info);
            if failures > 0 {
                bail!("{failures} of {} inputs failed to parse", inputs.len());
            }
            info!("All {} inputs parsed.", inputs.len());
        }
    }

    Ok(())
}
