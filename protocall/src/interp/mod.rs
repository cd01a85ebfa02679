//! Tree-walking interpreter
//!
//! Executes a [`Block`](crate::ast::Block) directly: the executor runs
//! statements, the evaluator computes expression values, and the call
//! dispatcher routes calls to builtins or user-defined functions. The
//! [`SymbolTable`] is threaded explicitly through every step.

mod builtins;
mod call;
mod error;
mod eval;
mod exec;
mod output;
mod record;
mod scope;
mod value;

pub use builtins::Builtin;
pub use error::{ErrorKind, InterpResult, RuntimeError};
pub use eval::Interpreter;
pub use exec::Flow;
pub use output::{Buffer, OutputSink};
pub use record::{is_valid_type_name, Record};
pub use scope::{Frame, SymbolTable};
pub use value::{ArrayRef, RecordRef, Value};
