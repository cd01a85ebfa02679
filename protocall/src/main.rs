//! Protocall interpreter CLI

use clap::{Parser, Subcommand};
use protocall::error::report_error;
use protocall::{Block, CompileError, Config, Interpreter};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "protocall", version, about = "Protocall - tree-walking interpreter")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the maximum user function call depth
    #[arg(long, global = true)]
    max_call_depth: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Execute a program
    Run {
        /// Source file, or a JSON tree with --tree
        file: PathBuf,
        /// Read the file as a JSON-encoded tree instead of source text
        #[arg(long)]
        tree: bool,
    },
    /// Parse a source file and dump its tree as JSON
    Dump {
        /// Source file to parse
        file: PathBuf,
    },
    /// Tokenize and dump tokens (debug)
    Tokens {
        /// Source file to tokenize
        file: PathBuf,
    },
    /// Start an interactive session
    Repl,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = load_config(cli.config.as_deref(), cli.max_call_depth).and_then(|config| match cli.command {
        Command::Run { file, tree } => run_file(&file, tree, config),
        Command::Dump { file } => dump_file(&file),
        Command::Tokens { file } => tokenize_file(&file),
        Command::Repl => start_repl(config),
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Install a subscriber only when RUST_LOG asks for one
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        let filter = EnvFilter::from_default_env();
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_level(true))
            .with(filter)
            .init();
    }
}

fn load_config(path: Option<&Path>, max_call_depth: Option<usize>) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(depth) = max_call_depth {
        config.max_call_depth = depth;
    }
    Ok(config)
}

/// Read and parse a program, rendering front-end errors with ariadne
fn load_program(path: &Path, tree: bool) -> Result<Block, Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;
    let filename = path.display().to_string();

    let parsed = if tree {
        protocall::parse_tree(&source)
    } else {
        protocall::parse_source(&filename, &source)
    };
    parsed.map_err(|e| report(&filename, &source, e))
}

fn report(filename: &str, source: &str, error: CompileError) -> Box<dyn std::error::Error> {
    if report_error(filename, source, &error).is_err() {
        return error.into();
    }
    format!("could not load {filename}").into()
}

fn run_file(path: &Path, tree: bool, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let program = load_program(path, tree)?;

    let mut interpreter = Interpreter::with_config(config);
    if let Some(value) = interpreter.run(&program)? {
        println!("{value}");
    }
    Ok(())
}

fn dump_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let program = load_program(path, false)?;
    println!("{}", protocall::dump_tree(&program)?);
    Ok(())
}

fn tokenize_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;
    let filename = path.display().to_string();

    let tokens = protocall::lexer::tokenize(&source).map_err(|e| report(&filename, &source, e))?;
    for (tok, span) in &tokens {
        println!("{:?} @ {}..{}", tok, span.start, span.end);
    }

    Ok(())
}

fn start_repl(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut repl = protocall::repl::Repl::with_config(config)?;
    repl.run()?;
    Ok(())
}
