//! Call dispatch: builtins first, then user-defined functions

use super::builtins::Builtin;
use super::error::{InterpResult, RuntimeError};
use super::eval::Interpreter;
use super::exec::Flow;
use super::scope::{Frame, SymbolTable};
use super::value::Value;
use crate::ast::{Argument, Call};
use std::collections::HashSet;
use tracing::trace;

impl Interpreter {
    /// Run a call expression in the global frame, allowing it to produce no
    /// value
    pub fn call(&mut self, call: &Call) -> InterpResult<Option<Value>> {
        self.with_symbols(|interp, symbols| interp.dispatch(call, symbols))
    }

    /// Route a call to its target.
    ///
    /// Returns `None` when the callee finished without producing a value.
    pub(super) fn dispatch(&mut self, call: &Call, symbols: &mut SymbolTable) -> InterpResult<Option<Value>> {
        check_unique_names(call)?;

        if let Some(builtin) = Builtin::from_name(&call.target) {
            return self.call_builtin(builtin, &call.arguments, symbols);
        }

        let args = self.eval_arguments(&call.arguments, symbols)?;
        self.invoke(&call.target, args, symbols)
    }

    /// Call a user-defined function with evaluated arguments
    pub(super) fn invoke(
        &mut self,
        name: &str,
        args: Vec<(String, Value)>,
        symbols: &mut SymbolTable,
    ) -> InterpResult<Option<Value>> {
        let body = self
            .functions
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::undefined_function(name))?;

        if symbols.depth() >= self.config.max_call_depth {
            return Err(RuntimeError::recursion_limit(self.config.max_call_depth));
        }

        trace!(function = name, depth = symbols.depth() + 1, "call");
        let frame: Frame = args.into_iter().collect();
        symbols.push_call_frame(frame);
        let (red_zone, grow) = (self.config.stack_red_zone, self.config.stack_grow_size);
        let result = stacker::maybe_grow(red_zone, grow, || self.exec_block(&body, symbols));
        symbols.pop_call_frame();
        trace!(function = name, depth = symbols.depth(), ok = result.is_ok(), "return");

        match result? {
            Flow::Returned(value) => Ok(value),
            Flow::Continue => Ok(None),
        }
    }

    /// Evaluate arguments in the caller's scope, in order
    pub(super) fn eval_arguments(
        &mut self,
        arguments: &[Argument],
        symbols: &mut SymbolTable,
    ) -> InterpResult<Vec<(String, Value)>> {
        let mut values = Vec::with_capacity(arguments.len());
        for arg in arguments {
            values.push((arg.name.clone(), self.eval(&arg.value, symbols)?));
        }
        Ok(values)
    }
}

fn check_unique_names(call: &Call) -> InterpResult<()> {
    let mut seen = HashSet::new();
    for arg in &call.arguments {
        if !seen.insert(arg.name.as_str()) {
            return Err(RuntimeError::duplicate_argument(&call.target, &arg.name));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ArithmeticOp, Block, Expression, Statement};
    use crate::config::Config;
    use crate::interp::error::ErrorKind;
    use crate::interp::output::OutputSink;

    fn int(n: i64) -> Expression {
        Expression::integer(n)
    }

    fn define(name: &str, body: Vec<Statement>) -> Statement {
        Statement::Define {
            name: name.to_string(),
            body: body.into(),
        }
    }

    fn call(target: &str, args: Vec<(&str, Expression)>) -> Expression {
        Expression::Call(Call::new(
            target,
            args.into_iter().map(|(n, e)| Argument::new(n, e)).collect(),
        ))
    }

    fn double() -> Statement {
        define(
            "f",
            vec![Statement::Return(Expression::arithmetic(
                Expression::name("x"),
                ArithmeticOp::Multiply,
                int(2),
            ))],
        )
    }

    #[test]
    fn test_call_binds_named_arguments() {
        let block = Block::new(vec![double(), Statement::Return(call("f", vec![("x", int(4))]))]);
        let mut interp = Interpreter::new();
        assert_eq!(interp.run(&block).unwrap(), Some(Value::Integer(8)));
        assert_eq!(interp.symbols().depth(), 0);
    }

    #[test]
    fn test_callee_cannot_see_caller_locals() {
        // g binds x locally and calls f without passing it
        let block = Block::new(vec![
            double(),
            define(
                "g",
                vec![
                    Statement::assign_name("x", int(3)),
                    Statement::Return(call("f", vec![])),
                ],
            ),
            Statement::Return(call("g", vec![])),
        ]);
        let err = Interpreter::new().run(&block).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NameError);
        assert!(err.message.contains('x'));
    }

    #[test]
    fn test_callee_sees_globals() {
        let block = Block::new(vec![
            Statement::assign_name("x", int(21)),
            double(),
            Statement::Return(call("f", vec![])),
        ]);
        assert_eq!(Interpreter::new().run(&block).unwrap(), Some(Value::Integer(42)));
    }

    #[test]
    fn test_arguments_evaluated_in_caller_scope() {
        let block = Block::new(vec![
            Statement::assign_name("y", int(5)),
            double(),
            Statement::Return(call("f", vec![("x", Expression::name("y"))])),
        ]);
        assert_eq!(Interpreter::new().run(&block).unwrap(), Some(Value::Integer(10)));
    }

    #[test]
    fn test_unknown_function_is_name_error() {
        let block = Block::new(vec![Statement::Return(call("missing", vec![]))]);
        assert_eq!(Interpreter::new().run(&block).unwrap_err().kind, ErrorKind::NameError);
    }

    #[test]
    fn test_duplicate_argument_is_arity_error() {
        let block = Block::new(vec![
            double(),
            Statement::Return(call("f", vec![("x", int(1)), ("x", int(2))])),
        ]);
        assert_eq!(Interpreter::new().run(&block).unwrap_err().kind, ErrorKind::ArityError);
    }

    #[test]
    fn test_unbounded_recursion_hits_limit() {
        let config = Config {
            max_call_depth: 50,
            ..Config::default()
        };
        let block = Block::new(vec![
            define("loop_forever", vec![Statement::Return(call("loop_forever", vec![]))]),
            Statement::Return(call("loop_forever", vec![])),
        ]);
        let mut interp = Interpreter::with_config(config).with_output(OutputSink::Silent);
        let err = interp.run(&block).unwrap_err();
        assert_eq!(err.kind, ErrorKind::RecursionError);
        assert_eq!(interp.symbols().depth(), 0);
    }

    #[test]
    fn test_call_function_from_host() {
        let mut interp = Interpreter::new();
        interp.run(&Block::new(vec![double()])).unwrap();
        let result = interp
            .call_function("f", vec![("x".to_string(), Value::Integer(6))])
            .unwrap();
        assert_eq!(result, Some(Value::Integer(12)));
        assert_eq!(
            interp.call_function("nope", vec![]).unwrap_err().kind,
            ErrorKind::NameError
        );
    }
}
