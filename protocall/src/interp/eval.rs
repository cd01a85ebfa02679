//! Expression evaluator

use super::error::{InterpResult, RuntimeError};
use super::exec::Flow;
use super::output::OutputSink;
use super::record;
use super::scope::SymbolTable;
use super::value::Value;
use crate::ast::{ArithmeticOp, Atom, Block, ComparisonOp, Expression, FieldPath, Literal, Projection};
use crate::config::Config;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

/// The interpreter
///
/// Owns the persistent global frame (inside its [`SymbolTable`]), the table
/// of user-defined functions and the output sink. The global frame and the
/// function table survive across [`Interpreter::run`] calls, which is what
/// the REPL builds on.
#[derive(Debug)]
pub struct Interpreter {
    /// Global frame plus call frames
    symbols: SymbolTable,
    /// User-defined functions registered by `define`
    pub(super) functions: HashMap<String, Rc<Block>>,
    /// Destination of `print_` and `print_symbols`
    pub(super) output: OutputSink,
    /// Recursion and stack limits
    pub(super) config: Config,
}

impl Interpreter {
    /// Create a new interpreter writing to stdout
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Interpreter {
            symbols: SymbolTable::new(),
            functions: HashMap::new(),
            output: OutputSink::default(),
            config,
        }
    }

    /// Replace the output sink
    pub fn with_output(mut self, output: OutputSink) -> Self {
        self.output = output;
        self
    }

    pub fn set_output(&mut self, output: OutputSink) {
        self.output = output;
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The symbol table between runs
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }

    /// Names of the user-defined functions, sorted
    pub fn function_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.functions.keys().cloned().collect();
        names.sort();
        names
    }

    /// Execute a top-level block against the persistent global frame.
    ///
    /// Returns the value of the first `return` reached, or `None` when the
    /// block runs to completion without returning or returns a call that
    /// produced nothing.
    pub fn run(&mut self, block: &Block) -> InterpResult<Option<Value>> {
        let result = self.with_symbols(|interp, symbols| interp.exec_block(block, symbols));
        match result {
            Ok(Flow::Returned(value)) => Ok(value),
            Ok(Flow::Continue) => Ok(None),
            Err(e) => {
                debug!(kind = %e.kind, error = %e.message, "execution aborted");
                Err(e)
            }
        }
    }

    /// Evaluate a single expression in the global frame
    pub fn evaluate(&mut self, expr: &Expression) -> InterpResult<Value> {
        self.with_symbols(|interp, symbols| interp.eval(expr, symbols))
    }

    /// Call a function by name with already-evaluated arguments
    pub fn call_function(&mut self, name: &str, args: Vec<(String, Value)>) -> InterpResult<Option<Value>> {
        self.with_symbols(|interp, symbols| interp.invoke(name, args, symbols))
    }

    /// Lend the symbol table out so it can be passed explicitly alongside
    /// `&mut self`, then put it back.
    pub(super) fn with_symbols<T>(&mut self, f: impl FnOnce(&mut Self, &mut SymbolTable) -> T) -> T {
        let mut symbols = std::mem::take(&mut self.symbols);
        let result = f(self, &mut symbols);
        self.symbols = symbols;
        result
    }

    /// Evaluate with automatic stack growth
    pub(super) fn eval(&mut self, expr: &Expression, symbols: &mut SymbolTable) -> InterpResult<Value> {
        let (red_zone, grow) = (self.config.stack_red_zone, self.config.stack_grow_size);
        stacker::maybe_grow(red_zone, grow, || self.eval_inner(expr, symbols))
    }

    fn eval_inner(&mut self, expr: &Expression, symbols: &mut SymbolTable) -> InterpResult<Value> {
        match expr {
            Expression::Atom(atom) => self.eval_atom(atom, symbols),

            Expression::Arithmetic { left, op, right } => {
                let left = self.eval(left, symbols)?;
                let right = self.eval(right, symbols)?;
                eval_arithmetic(*op, &left, &right)
            }

            Expression::Comparison { left, op, right } => {
                let left = self.eval(left, symbols)?;
                let right = self.eval(right, symbols)?;
                eval_comparison(*op, &left, &right)
            }

            Expression::Call(call) => self
                .dispatch(call, symbols)?
                .ok_or_else(|| RuntimeError::no_value(&call.target)),
        }
    }

    fn eval_atom(&mut self, atom: &Atom, symbols: &mut SymbolTable) -> InterpResult<Value> {
        match atom {
            Atom::Literal(literal) => self.eval_literal(literal, symbols),
            Atom::FieldPath(path) => self.resolve_path(path, symbols),
            Atom::Nested(inner) => self.eval(inner, symbols),
        }
    }

    fn eval_literal(&mut self, literal: &Literal, symbols: &mut SymbolTable) -> InterpResult<Value> {
        match literal {
            Literal::Integer(n) => Ok(Value::Integer(*n)),
            Literal::String(s) => Ok(Value::string(s.as_str())),
            Literal::Boolean(b) => Ok(Value::Boolean(*b)),
            Literal::Array(elements) => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.eval(element, symbols)?);
                }
                Ok(Value::array(values))
            }
            Literal::Record(literal) => self.construct_record(literal, symbols),
        }
    }

    /// Look up the root of `path`, then apply each projection in turn
    pub(super) fn resolve_path(&mut self, path: &FieldPath, symbols: &mut SymbolTable) -> InterpResult<Value> {
        let mut current = symbols.get(&path.root)?;
        if path.is_bare_name() {
            return Ok(current);
        }
        let shown = path.to_string();
        for projection in &path.projections {
            current = self.project(&current, projection, &shown, symbols)?;
        }
        Ok(current)
    }

    /// Apply one projection to `value`
    pub(super) fn project(
        &mut self,
        value: &Value,
        projection: &Projection,
        shown: &str,
        symbols: &mut SymbolTable,
    ) -> InterpResult<Value> {
        match projection {
            Projection::Field(name) => record::read_field(value, name, shown),
            Projection::Index(index) => {
                let index = self.eval_index(index, symbols)?;
                read_element(value, index, shown)
            }
        }
    }

    pub(super) fn eval_index(&mut self, index: &Expression, symbols: &mut SymbolTable) -> InterpResult<i64> {
        let value = self.eval(index, symbols)?;
        value
            .as_int()
            .ok_or_else(|| RuntimeError::type_error("integer index", value.type_name()))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Checked 64-bit integer arithmetic
pub(super) fn eval_arithmetic(op: ArithmeticOp, left: &Value, right: &Value) -> InterpResult<Value> {
    let (a, b) = match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => (*a, *b),
        _ => {
            return Err(RuntimeError::operand_mismatch(
                &op.to_string(),
                left.type_name(),
                right.type_name(),
            ));
        }
    };
    let result = match op {
        ArithmeticOp::Plus => a.checked_add(b),
        ArithmeticOp::Minus => a.checked_sub(b),
        ArithmeticOp::Multiply => a.checked_mul(b),
        ArithmeticOp::Divide => a.checked_div(b),
    };
    result
        .map(Value::Integer)
        .ok_or_else(|| RuntimeError::overflow(&op.to_string(), a, b))
}

/// Comparison producing a canonical boolean.
///
/// Ordering needs two integers; equality also accepts two strings or two
/// booleans. Every other pairing is a type error.
pub(super) fn eval_comparison(op: ComparisonOp, left: &Value, right: &Value) -> InterpResult<Value> {
    let result = match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => match op {
            ComparisonOp::LessThan => a < b,
            ComparisonOp::LessEqual => a <= b,
            ComparisonOp::GreaterThan => a > b,
            ComparisonOp::GreaterEqual => a >= b,
            ComparisonOp::Equals => a == b,
            ComparisonOp::NotEquals => a != b,
        },
        (Value::String(a), Value::String(b)) if !op.is_ordering() => equality(op, a == b),
        (Value::Boolean(a), Value::Boolean(b)) if !op.is_ordering() => equality(op, a == b),
        _ => {
            return Err(RuntimeError::operand_mismatch(
                &op.to_string(),
                left.type_name(),
                right.type_name(),
            ));
        }
    };
    Ok(Value::Boolean(result))
}

fn equality(op: ComparisonOp, equal: bool) -> bool {
    match op {
        ComparisonOp::NotEquals => !equal,
        _ => equal,
    }
}

fn checked_index(index: i64, len: usize) -> InterpResult<usize> {
    usize::try_from(index)
        .ok()
        .filter(|i| *i < len)
        .ok_or_else(|| RuntimeError::index_out_of_bounds(index, len))
}

/// `value[index]` on a value that must be an array
pub(super) fn read_element(value: &Value, index: i64, shown: &str) -> InterpResult<Value> {
    let array = value
        .as_array()
        .ok_or_else(|| RuntimeError::not_an_array(shown, value.type_name()))?;
    let elements = array.borrow();
    let i = checked_index(index, elements.len())?;
    Ok(elements[i].clone())
}

/// `value[index] = new_value`, in place
pub(super) fn write_element(value: &Value, index: i64, new_value: Value, shown: &str) -> InterpResult<()> {
    let array = value
        .as_array()
        .ok_or_else(|| RuntimeError::not_an_array(shown, value.type_name()))?;
    let mut elements = array.borrow_mut();
    let i = checked_index(index, elements.len())?;
    elements[i] = new_value;
    Ok(())
}
