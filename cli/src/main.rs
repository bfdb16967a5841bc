use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use miette::{Diagnostic, Result};
use sprig::{Engine, EngineOptions, ExecutionOptions, render_error};
use thiserror::Error;

/// Sprig - run JavaScript-like scripts
#[derive(Parser, Debug)]
#[command(name = "sprig")]
#[command(about = "Run Sprig scripts", long_about = None)]
struct Args {
    /// Trace everything reachable from the global object after the run
    #[arg(long)]
    dump: bool,

    /// Print the JSON form of a dotted path after the run (e.g. `result.items`)
    #[arg(long, value_name = "PATH")]
    json: Option<String>,

    /// Run this code instead of a file
    #[arg(short = 'e', long = "eval", value_name = "CODE", conflicts_with = "file")]
    code: Option<String>,

    /// Maximum nesting of function calls
    #[arg(long, default_value_t = ExecutionOptions::default().max_depth)]
    max_depth: usize,

    /// Abort any loop running more than this many iterations
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Script to run (if neither this nor -e is given, reads from stdin)
    file: Option<PathBuf>,
}

#[derive(Debug, Error, Diagnostic)]
enum CliError {
    #[error("could not read {}", path.display())]
    #[diagnostic(code(sprig::cli::read))]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read the script from stdin")]
    #[diagnostic(code(sprig::cli::stdin))]
    ReadStdin(#[source] std::io::Error),

    #[error("no value at `{0}`")]
    #[diagnostic(help("paths are dotted names from the global object, like `config.items.0`"))]
    MissingPath(String),
}

fn read_script(args: &Args) -> Result<String, CliError> {
    if let Some(code) = &args.code {
        return Ok(code.clone());
    }
    match &args.file {
        Some(path) => std::fs::read_to_string(path).map_err(|source| CliError::ReadFile {
            path: path.clone(),
            source,
        }),
        None => {
            let mut script = String::new();
            std::io::stdin()
                .read_to_string(&mut script)
                .map_err(CliError::ReadStdin)?;
            Ok(script)
        }
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    use tracing_subscriber::{EnvFilter, fmt};

    // RUST_LOG controls the log level, WARN if not set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let script = read_script(&args)?;

    let mut engine = Engine::new(EngineOptions {
        execution: ExecutionOptions {
            max_depth: args.max_depth,
            max_iterations: args.max_iterations,
        },
        ..Default::default()
    });

    let status = match engine.execute(&script) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            render_error(&e);
            ExitCode::FAILURE
        }
    };

    if args.dump {
        let trace = engine.trace();
        tracing::info!("{}", trace);
        print!("{}", trace);
    }

    if let Some(path) = &args.json {
        let id = engine
            .lookup(path)
            .ok_or_else(|| CliError::MissingPath(path.clone()))?;
        println!("{}", engine.to_json(id));
    }

    Ok(status)
}
