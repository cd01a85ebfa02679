//! Protocall interpreter library
//!
//! A tree-walking interpreter for a small imperative language whose programs
//! arrive as a structured syntax tree, either parsed from concrete syntax or
//! deserialized from JSON.

pub mod ast;
pub mod config;
pub mod error;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod repl;

pub use ast::{Block, Span};
pub use config::Config;
pub use error::{CompileError, Result};
pub use interp::{ErrorKind, Interpreter, OutputSink, RuntimeError, Value};

/// Tokenize and parse a program
pub fn parse_source(filename: &str, source: &str) -> Result<Block> {
    let tokens = lexer::tokenize(source)?;
    parser::parse(filename, source, tokens)
}

/// Load a program from its JSON tree encoding
pub fn parse_tree(json: &str) -> Result<Block> {
    Ok(serde_json::from_str(json)?)
}

/// Encode a program as pretty-printed JSON
pub fn dump_tree(block: &Block) -> Result<String> {
    Ok(serde_json::to_string_pretty(block)?)
}
