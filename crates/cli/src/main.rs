mod commands;
mod config;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tl_core::{IdentityCheck, TlError};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// How declared signatures are checked against computed identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum IdentityCheckArg {
    Strict,
    Warn,
    Off,
}

impl From<IdentityCheckArg> for IdentityCheck {
    fn from(arg: IdentityCheckArg) -> Self {
        match arg {
            IdentityCheckArg::Strict => IdentityCheck::Strict,
            IdentityCheckArg::Warn => IdentityCheck::Warn,
            IdentityCheckArg::Off => IdentityCheck::Off,
        }
    }
}

/// TL schema toolchain.
#[derive(Parser)]
#[command(name = "tl", version, about = "TL schema toolchain")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Path to a TOML config file (default: ./tl.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the token stream of a .tl file
    Scan {
        /// Path to the .tl source file, or - for stdin
        file: PathBuf,
    },

    /// Parse a .tl file and print its declarations with their identities
    Parse {
        /// Path to the .tl source file, or - for stdin
        file: PathBuf,
        /// How declared signatures are checked (overrides the config file)
        #[arg(long, value_enum)]
        identity_check: Option<IdentityCheckArg>,
        /// Keep parsing after an error, skipping to the next ';'
        #[arg(long)]
        recover: bool,
        /// Stop after this many errors in recovering mode
        #[arg(long)]
        max_errors: Option<usize>,
        /// Parse each non-empty line as a separate document
        #[arg(long)]
        lines: bool,
    },

    /// Compute the identity of a single declaration
    Identity {
        /// Declaration text, e.g. "user id:int name:string = User"
        declaration: String,
    },

    /// Run static analysis checks on a .tl file
    Check {
        /// Path to the .tl source file, or - for stdin
        file: PathBuf,
        /// Comma-separated list of analyses to run (references,identities,conditionals). Default: all.
        #[arg(long)]
        analysis: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(msg) => {
            report_error(&msg, cli.output, cli.quiet);
            process::exit(1);
        }
    };

    match cli.command {
        Commands::Scan { file } => {
            commands::scan::cmd_scan(&file, cli.output, cli.quiet);
        }
        Commands::Parse {
            file,
            identity_check,
            recover,
            max_errors,
            lines,
        } => {
            let mut options = config.parse;
            if let Some(check) = identity_check {
                options.identity_check = check.into();
            }
            if recover {
                options.recover = true;
            }
            if let Some(max) = max_errors {
                options.max_errors = max;
            }
            commands::parse::cmd_parse(&file, &options, lines, cli.output, cli.quiet);
        }
        Commands::Identity { declaration } => {
            commands::identity::cmd_identity(&declaration, cli.output, cli.quiet);
        }
        Commands::Check { file, analysis } => {
            let selected: Option<Vec<String>> = match analysis {
                Some(a) => Some(a.split(',').map(|s| s.trim().to_string()).collect()),
                None => config.check.analyses,
            };
            commands::check::cmd_check(
                &file,
                &config.parse,
                selected.as_deref(),
                cli.output,
                cli.quiet,
            );
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{{\"error\": \"{}\"}}", msg.replace('"', "\\\""));
        }
    }
}

/// Print a parse error: structured JSON or a one-line message.
pub(crate) fn report_tl_error(e: &TlError, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => {
            let err_json = serde_json::to_string_pretty(&e.to_json_value())
                .unwrap_or_else(|_| format!("{{\"error\": \"{:?}\"}}", e));
            eprintln!("{}", err_json);
        }
        OutputFormat::Text => eprintln!("error: {}", e),
    }
}
