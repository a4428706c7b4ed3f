use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use miette::Report;
use tracing_subscriber::EnvFilter;

use themevars::config::{DEFAULT_OUTPUT_DIR, DEFAULT_OUTPUT_FILE, DEFAULT_SOURCE_DIR};
use themevars::error::error_chain;
use themevars::{export, generate, BuildConfig};

/// Generate Sass variables from YAML design tokens
#[derive(Parser, Debug)]
#[command(name = "themevars")]
#[command(author, version)]
#[command(after_help = "EXAMPLES:
    # Build sass/variables.scss from the documents in src/
    themevars

    # Build from another directory
    themevars build --source tokens --output dist/sass

    # Print one resolved document as YAML
    themevars export src/theme.yml
")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress log output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(flatten)]
    build: BuildArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve all source documents and write the Sass variables file (default)
    Build,

    /// Resolve a single document and print it as YAML
    Export {
        /// Source document to export
        document: PathBuf,
    },
}

// Global so they are accepted with or without the `build` subcommand.
#[derive(Args, Debug)]
struct BuildArgs {
    /// Directory containing the .yml/.yaml source documents
    #[arg(long, global = true, env = "THEMEVARS_SOURCE", default_value = DEFAULT_SOURCE_DIR)]
    source: PathBuf,

    /// Directory to clear and write the generated file into
    #[arg(long, global = true, env = "THEMEVARS_OUTPUT", default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Name of the generated file
    #[arg(long, global = true, default_value = DEFAULT_OUTPUT_FILE)]
    file: String,
}

impl From<BuildArgs> for BuildConfig {
    fn from(args: BuildArgs) -> Self {
        BuildConfig::new(args.source, args.output).with_output_file(args.file)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if !cli.quiet {
        setup_tracing(cli.verbose);
    }

    match cli.command {
        Some(Commands::Export { document }) => run_export(&document),
        Some(Commands::Build) | None => run_build(&cli.build.into()),
    }
}

fn run_build(config: &BuildConfig) -> ExitCode {
    match generate(config) {
        Ok(path) => {
            log::info!("Wrote {}", path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{:?}", Report::new(err));
            ExitCode::FAILURE
        }
    }
}

fn run_export(document: &Path) -> ExitCode {
    let exported = match export(document) {
        Ok(exported) => exported,
        Err(err) => {
            for link in error_chain(&err) {
                eprintln!("{}", link.message);
                if let Some(excerpt) = link.excerpt {
                    eprintln!("{excerpt}\n");
                }
            }
            return ExitCode::FAILURE;
        }
    };

    match exported.to_yaml() {
        Ok(yaml) => {
            println!("{yaml}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Failed to render {} as YAML: {err}", exported.name);
            ExitCode::FAILURE
        }
    }
}

/// Set up logging based on verbosity level; `RUST_LOG` takes precedence.
fn setup_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(io::stderr)
        .init();
}
