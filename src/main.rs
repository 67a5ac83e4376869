use clap::{Args, Parser as ClapParser, Subcommand};
use datalisp::cli::{self, CheckOptions, CliError};
use std::fs;
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "datalisp")]
#[command(about = "DataLisp - An S-expression notation for structured configuration data")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Source file (reads --input or stdin if not provided)
    file: Option<String>,

    /// Source text given inline
    #[arg(short, long, conflicts_with = "file")]
    input: Option<String>,

    /// Start without the standard library expressions
    #[arg(long)]
    no_stdlib: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and build a source, reporting errors and warnings
    Check {
        #[command(flatten)]
        source: SourceArgs,

        /// Only validate syntax, don't build
        #[arg(long)]
        syntax_only: bool,
    },

    /// Build a source and print it back in normalized form
    Generate {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Print the parsed syntax tree
    Dump {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Build a source and convert it to JSON
    ToJson {
        #[command(flatten)]
        source: SourceArgs,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Convert a JSON object to DataLisp source
    FromJson {
        /// JSON file (reads --input or stdin if not provided)
        file: Option<String>,

        /// JSON given inline
        #[arg(short, long, conflicts_with = "file")]
        input: Option<String>,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            source,
            syntax_only,
        } => run_check(source, syntax_only),
        Commands::Generate { source } => options(source)
            .and_then(|o| cli::execute_generate(&o))
            .map(|text| print!("{text}")),
        Commands::Dump { source } => options(source)
            .and_then(|o| cli::execute_dump(&o))
            .map(|text| print!("{text}")),
        Commands::ToJson { source, pretty } => options(source)
            .and_then(|o| cli::execute_to_json(&o, pretty))
            .map(|text| println!("{text}")),
        Commands::FromJson { file, input } => read_input(file, input)
            .and_then(|text| cli::execute_from_json(&text))
            .map(|text| print!("{text}")),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr, filtered by `RUST_LOG` (default `info`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn read_input(file: Option<String>, input: Option<String>) -> Result<String, CliError> {
    match (file, input) {
        (Some(path), _) => Ok(fs::read_to_string(path)?),
        (None, Some(text)) => Ok(text),
        (None, None) if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
        (None, None) => Err(CliError::NoInput),
    }
}

fn options(args: SourceArgs) -> Result<CheckOptions, CliError> {
    Ok(CheckOptions {
        source: read_input(args.file, args.input)?,
        syntax_only: false,
        no_stdlib: args.no_stdlib,
    })
}

fn run_check(args: SourceArgs, syntax_only: bool) -> Result<(), CliError> {
    let mut options = options(args)?;
    options.syntax_only = syntax_only;

    let result = cli::execute_check(&options)?;
    if syntax_only {
        println!("Syntax checked");
    } else {
        println!("Built {} top-level group(s)", result.container.len());
    }
    println!(
        "{} error(s), {} warning(s)",
        result.errors, result.warnings
    );

    result.into_container().map(|_| ())
}
