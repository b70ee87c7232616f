mod vars;

use std::{
    collections::HashMap,
    fs,
    io::{self, Read},
    path::PathBuf,
    process::exit,
};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use diagnostics::{get_diagnostics, render};
use errors::TokenError;
use scanner::{property_scanner, Markers, MissingProperty, PropertyHandler};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use vars::{load_vars_file, parse_key_val};

/// Scan templates for delimited expressions
#[derive(Parser, Debug)]
#[command(name = "tokenscan", author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replace expressions with values
    Render {
        #[command(flatten)]
        input: Input,

        /// Pass a value to resolve with
        #[arg(long = "var", value_parser = parse_key_val::<String, String>)]
        vars: Vec<(String, String)>,

        /// TOML file of values to resolve with
        #[arg(long = "vars")]
        vars_file: Option<PathBuf>,

        /// Separator between a name and its default value
        #[arg(long)]
        default_separator: Option<String>,

        /// Fail on expressions without a value
        #[arg(long)]
        strict: bool,
    },
    /// Print the segments of a template as JSON
    Segments {
        #[command(flatten)]
        input: Input,
    },
    /// Check a template for unterminated or empty expressions
    Check {
        #[command(flatten)]
        input: Input,

        /// Format to report problems in
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
}

#[derive(clap::Args, Debug)]
struct Input {
    /// Path to template, or - to read stdin
    path: String,

    /// Token opening an expression
    #[arg(long, default_value = "${")]
    open: String,

    /// Token closing an expression
    #[arg(long, default_value = "}")]
    close: String,
}

impl Input {
    fn read(&self) -> anyhow::Result<String> {
        if self.path == "-" {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("Unable to read template from stdin")?;
            return Ok(source);
        }

        fs::read_to_string(&self.path)
            .with_context(|| format!("Unable to read template {}", self.path))
    }

    fn markers(&self) -> Result<Markers, TokenError> {
        Ok(Markers::new(self.open.as_str(), self.close.as_str())?)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
enum Format {
    Json,
    Text,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if let Err(err) = run(args) {
        eprintln!("{err:#}");
        exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    match args.command {
        Commands::Render {
            input,
            vars,
            vars_file,
            default_separator,
            strict,
        } => {
            let markers = input.markers()?;
            let source = input.read()?;

            let mut values: HashMap<String, String> = match vars_file {
                Some(path) => load_vars_file(&path)?,
                None => HashMap::new(),
            };
            values.extend(vars);

            debug!(count = values.len(), "resolving with values");

            let mut handler = PropertyHandler::new(values).with_markers(markers);

            if let Some(separator) = default_separator {
                handler = handler.with_default_separator(separator);
            }

            if strict {
                handler = handler.with_missing(MissingProperty::Reject);
            }

            let output = property_scanner(handler)
                .parse(&source)
                .map_err(TokenError::from)?;

            print!("{output}");
        }
        Commands::Segments { input } => {
            let markers = input.markers()?;
            let source = input.read()?;

            let segments = markers.scan(&source);

            println!("{}", serde_json::to_string_pretty(&segments)?);
        }
        Commands::Check { input, format } => {
            let markers = input.markers()?;
            let source = input.read()?;

            if let Err(errs) = markers.check(&source) {
                match format {
                    Format::Json => {
                        let diagnostics = get_diagnostics(&errs, &source);
                        println!("{}", serde_json::to_string_pretty(&diagnostics)?);
                    }
                    Format::Text => print!("{}", render(&input.path, &source, &errs)?),
                }

                eprintln!("Invalid template");
                exit(1);
            }
        }
    }

    Ok(())
}
