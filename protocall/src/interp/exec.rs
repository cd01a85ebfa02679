//! Statement executor

use super::builtins::Builtin;
use super::error::{InterpResult, RuntimeError};
use super::eval::{write_element, Interpreter};
use super::record;
use super::scope::SymbolTable;
use super::value::Value;
use crate::ast::{Block, Conditional, Expression, FieldPath, Projection, Statement};
use std::rc::Rc;
use tracing::debug;

/// Outcome of executing a statement or block
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Run the next statement
    Continue,
    /// A `return` was reached; unwinds to the enclosing call or program.
    /// `None` when the returned expression was a call that produced nothing.
    Returned(Option<Value>),
}

impl Interpreter {
    /// Run statements in order, stopping at the first `Returned`
    pub(super) fn exec_block(&mut self, block: &Block, symbols: &mut SymbolTable) -> InterpResult<Flow> {
        for stmt in &block.statements {
            if let Flow::Returned(value) = self.exec_statement(stmt, symbols)? {
                return Ok(Flow::Returned(value));
            }
        }
        Ok(Flow::Continue)
    }

    fn exec_statement(&mut self, stmt: &Statement, symbols: &mut SymbolTable) -> InterpResult<Flow> {
        let (red_zone, grow) = (self.config.stack_red_zone, self.config.stack_grow_size);
        stacker::maybe_grow(red_zone, grow, || self.exec_statement_inner(stmt, symbols))
    }

    fn exec_statement_inner(&mut self, stmt: &Statement, symbols: &mut SymbolTable) -> InterpResult<Flow> {
        match stmt {
            Statement::Assignment { target, expression } => {
                self.assign(target, expression, symbols)?;
                Ok(Flow::Continue)
            }

            Statement::Return(Expression::Call(call)) => Ok(Flow::Returned(self.dispatch(call, symbols)?)),
            Statement::Return(expr) => Ok(Flow::Returned(Some(self.eval(expr, symbols)?))),

            Statement::Call(call) => {
                self.dispatch(call, symbols)?;
                Ok(Flow::Continue)
            }

            Statement::Conditional(conditional) => self.exec_conditional(conditional, symbols),

            Statement::While { condition, body } => {
                while self.eval_condition(condition, symbols)? {
                    if let Flow::Returned(value) = self.exec_block(body, symbols)? {
                        return Ok(Flow::Returned(value));
                    }
                }
                Ok(Flow::Continue)
            }

            Statement::Define { name, body } => {
                self.define(name, body)?;
                Ok(Flow::Continue)
            }
        }
    }

    /// `path = expr`
    ///
    /// The right-hand side is evaluated first. A bare name goes through the
    /// nearest-frame rule; a longer path resolves everything but its last
    /// projection and then writes in place.
    fn assign(&mut self, target: &FieldPath, expression: &Expression, symbols: &mut SymbolTable) -> InterpResult<()> {
        let value = self.eval(expression, symbols)?;

        let Some((last, init)) = target.projections.split_last() else {
            symbols.set(&target.root, value);
            return Ok(());
        };

        let shown = target.to_string();
        let mut container = symbols.get(&target.root)?;
        for projection in init {
            container = self.project(&container, projection, &shown, symbols)?;
        }

        match last {
            Projection::Field(name) => record::write_field(&container, name, value, &shown),
            Projection::Index(index) => {
                let index = self.eval_index(index, symbols)?;
                write_element(&container, index, value, &shown)
            }
        }
    }

    fn exec_conditional(&mut self, conditional: &Conditional, symbols: &mut SymbolTable) -> InterpResult<Flow> {
        let branches = std::iter::once(&conditional.if_branch).chain(&conditional.elif_branches);
        for branch in branches {
            if self.eval_condition(&branch.condition, symbols)? {
                return self.exec_block(&branch.body, symbols);
            }
        }
        match &conditional.else_body {
            Some(body) => self.exec_block(body, symbols),
            None => Ok(Flow::Continue),
        }
    }

    fn eval_condition(&mut self, condition: &Expression, symbols: &mut SymbolTable) -> InterpResult<bool> {
        let value = self.eval(condition, symbols)?;
        value
            .as_bool()
            .ok_or_else(|| RuntimeError::type_error("boolean condition", value.type_name()))
    }

    /// Register a user function, replacing any earlier definition
    fn define(&mut self, name: &str, body: &Block) -> InterpResult<()> {
        if Builtin::from_name(name).is_some() {
            return Err(RuntimeError::builtin_redefined(name));
        }
        let replaced = self
            .functions
            .insert(name.to_string(), Rc::new(body.clone()))
            .is_some();
        debug!(function = name, statements = body.statements.len(), replaced, "defined function");
        Ok(())
    }
}
