//! Builtin functions
//!
//! The builtin set is closed and resolved before the user function table, so
//! a builtin name can never be shadowed by `define`. Builtins receive their
//! arguments unevaluated because `setq` names its target rather than
//! reading it.

use super::error::{InterpResult, RuntimeError};
use super::eval::Interpreter;
use super::scope::{Frame, SymbolTable};
use super::value::Value;
use crate::ast::{Argument, Atom, Expression};

/// Native callables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// `print_(name = value, ...)`: one `name = value` line per argument
    Print,
    /// `print_symbols()`: dump the visible bindings
    PrintSymbols,
    /// `setq(name, value)`: bind in the global frame from any depth
    Setq,
    /// `append(array, value)`: push onto a shared array in place
    Append,
}

impl Builtin {
    pub const ALL: [Builtin; 4] = [Builtin::Print, Builtin::PrintSymbols, Builtin::Setq, Builtin::Append];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "print_" => Some(Builtin::Print),
            "print_symbols" => Some(Builtin::PrintSymbols),
            "setq" => Some(Builtin::Setq),
            "append" => Some(Builtin::Append),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Print => "print_",
            Builtin::PrintSymbols => "print_symbols",
            Builtin::Setq => "setq",
            Builtin::Append => "append",
        }
    }
}

impl std::fmt::Display for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Interpreter {
    /// Run a builtin. None of them produce a value.
    pub(super) fn call_builtin(
        &mut self,
        builtin: Builtin,
        args: &[Argument],
        symbols: &mut SymbolTable,
    ) -> InterpResult<Option<Value>> {
        match builtin {
            Builtin::Print => self.builtin_print(args, symbols)?,
            Builtin::PrintSymbols => self.builtin_print_symbols(args, symbols)?,
            Builtin::Setq => self.builtin_setq(args, symbols)?,
            Builtin::Append => self.builtin_append(args, symbols)?,
        }
        Ok(None)
    }

    fn builtin_print(&mut self, args: &[Argument], symbols: &mut SymbolTable) -> InterpResult<()> {
        let values = self.eval_arguments(args, symbols)?;
        if values.is_empty() {
            self.output.println("")?;
        }
        for (name, value) in values {
            self.output.println(&format!("{name} = {value}"))?;
        }
        Ok(())
    }

    fn builtin_print_symbols(&mut self, args: &[Argument], symbols: &mut SymbolTable) -> InterpResult<()> {
        expect_arity(Builtin::PrintSymbols, args, 0)?;
        if let Some(frame) = symbols.current_frame() {
            self.output.println("[locals]")?;
            for line in frame_lines(frame) {
                self.output.println(&line)?;
            }
        }
        self.output.println("[globals]")?;
        for line in frame_lines(symbols.globals()) {
            self.output.println(&line)?;
        }
        Ok(())
    }

    fn builtin_setq(&mut self, args: &[Argument], symbols: &mut SymbolTable) -> InterpResult<()> {
        expect_arity(Builtin::Setq, args, 2)?;
        let name = match &args[0].value {
            Expression::Atom(Atom::FieldPath(path)) if path.is_bare_name() => path.root.clone(),
            _ => {
                return Err(RuntimeError::bad_argument(
                    Builtin::Setq.name(),
                    "first argument must be a plain name",
                ));
            }
        };
        let value = self.eval(&args[1].value, symbols)?;
        symbols.globals_mut().insert(name, value);
        Ok(())
    }

    fn builtin_append(&mut self, args: &[Argument], symbols: &mut SymbolTable) -> InterpResult<()> {
        expect_arity(Builtin::Append, args, 2)?;
        let target = self.eval(&args[0].value, symbols)?;
        let array = target
            .as_array()
            .ok_or_else(|| RuntimeError::type_error("array", target.type_name()))?;
        let value = self.eval(&args[1].value, symbols)?;
        array.borrow_mut().push(value);
        Ok(())
    }
}

fn expect_arity(builtin: Builtin, args: &[Argument], expected: usize) -> InterpResult<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(RuntimeError::arity_mismatch(builtin.name(), expected, args.len()))
    }
}

/// `  name = value` lines sorted by name
fn frame_lines(frame: &Frame) -> Vec<String> {
    let mut names: Vec<_> = frame.keys().collect();
    names.sort();
    names
        .into_iter()
        .map(|name| format!("  {name} = {}", frame[name]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Block, Call, FieldPath, Statement};
    use crate::interp::error::ErrorKind;
    use crate::interp::output::OutputSink;

    fn int(n: i64) -> Expression {
        Expression::integer(n)
    }

    fn call(target: &str, args: Vec<(&str, Expression)>) -> Statement {
        Statement::Call(Call::new(
            target,
            args.into_iter().map(|(n, e)| Argument::new(n, e)).collect(),
        ))
    }

    fn run_captured(statements: Vec<Statement>) -> (InterpResult<Option<Value>>, String) {
        let (sink, buffer) = OutputSink::buffer();
        let mut interp = Interpreter::new().with_output(sink);
        let result = interp.run(&Block::new(statements));
        (result, buffer.contents())
    }

    #[test]
    fn test_builtin_names() {
        for builtin in Builtin::ALL {
            assert_eq!(Builtin::from_name(builtin.name()), Some(builtin));
        }
        assert_eq!(Builtin::from_name("print"), None);
    }

    #[test]
    fn test_print_each_argument() {
        let (result, out) = run_captured(vec![call(
            "print_",
            vec![("x", int(5)), ("s", Expression::string("Start"))],
        )]);
        assert_eq!(result.unwrap(), None);
        assert_eq!(out, "x = 5\ns = Start\n");
    }

    #[test]
    fn test_print_without_arguments() {
        let (_, out) = run_captured(vec![call("print_", vec![])]);
        assert_eq!(out, "\n");
    }

    #[test]
    fn test_print_symbols_sections() {
        let (result, out) = run_captured(vec![
            Statement::assign_name("b", int(2)),
            Statement::assign_name("a", int(1)),
            Statement::Define {
                name: "show".to_string(),
                body: vec![call("print_symbols", vec![])].into(),
            },
            Statement::Call(Call::new("show", vec![Argument::new("p", int(9))])),
        ]);
        result.unwrap();
        assert_eq!(out, "[locals]\n  p = 9\n[globals]\n  a = 1\n  b = 2\n");
    }

    #[test]
    fn test_print_symbols_rejects_arguments() {
        let (result, _) = run_captured(vec![call("print_symbols", vec![("x", int(1))])]);
        assert_eq!(result.unwrap_err().kind, ErrorKind::ArityError);
    }

    #[test]
    fn test_setq_writes_global_from_call_frame() {
        let (sink, _) = OutputSink::buffer();
        let mut interp = Interpreter::new().with_output(sink);
        let block = Block::new(vec![
            Statement::Define {
                name: "g".to_string(),
                body: vec![
                    Statement::assign_name("x", int(1)),
                    call("setq", vec![("arg0", Expression::name("x")), ("arg1", int(5))]),
                    Statement::Return(Expression::name("x")),
                ]
                .into(),
            },
            Statement::Return(Expression::Call(Call::new("g", vec![]))),
        ]);
        // the local x still shadows inside g
        assert_eq!(interp.run(&block).unwrap(), Some(Value::Integer(1)));
        assert_eq!(interp.symbols().globals().get("x"), Some(&Value::Integer(5)));
    }

    #[test]
    fn test_setq_shape_errors() {
        let (result, _) = run_captured(vec![call("setq", vec![("arg0", Expression::name("x"))])]);
        assert_eq!(result.unwrap_err().kind, ErrorKind::ArityError);

        let (result, _) = run_captured(vec![call("setq", vec![("arg0", int(1)), ("arg1", int(2))])]);
        assert_eq!(result.unwrap_err().kind, ErrorKind::ArityError);
    }

    #[test]
    fn test_append_visible_through_alias() {
        let (result, _) = run_captured(vec![
            Statement::assign_name(
                "a",
                Expression::Atom(Atom::Literal(crate::ast::Literal::Array(vec![int(5), int(6), int(7)]))),
            ),
            Statement::assign_name("b", Expression::name("a")),
            call("append", vec![("arg0", Expression::name("b")), ("arg1", int(5))]),
            Statement::Return(Expression::path(FieldPath::name("a").index(int(3)))),
        ]);
        assert_eq!(result.unwrap(), Some(Value::Integer(5)));
    }

    #[test]
    fn test_append_to_non_array() {
        let (result, _) = run_captured(vec![
            Statement::assign_name("n", int(1)),
            call("append", vec![("arg0", Expression::name("n")), ("arg1", int(5))]),
        ]);
        assert_eq!(result.unwrap_err().kind, ErrorKind::TypeError);
    }

    #[test]
    fn test_builtin_result_is_no_value() {
        let (result, _) = run_captured(vec![Statement::Return(Expression::Call(Call::new("print_", vec![])))]);
        let err = result.unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeError);
        assert!(err.message.contains("print_"));
    }
}
