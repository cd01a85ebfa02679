//! Abstract Syntax Tree definitions
//!
//! Programs arrive as this tree, either from the textual front-end or
//! deserialized from a structured message (JSON). Every node category is a
//! closed sum type, so a node never carries more than one populated variant.

mod expr;
mod span;
mod stmt;

pub use expr::*;
pub use span::*;
pub use stmt::*;
