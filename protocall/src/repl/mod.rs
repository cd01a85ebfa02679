//! REPL (Read-Eval-Print Loop) for Protocall
//!
//! One interpreter lives for the whole session, so globals and functions
//! defined by earlier inputs stay visible to later ones.

use crate::ast::Expression;
use crate::config::Config;
use crate::interp::{Interpreter, Value};
use crate::lexer::tokenize;
use crate::parser::{parse, parse_expression};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;

const PROMPT: &str = "> ";
const CONTINUATION_PROMPT: &str = ". ";

/// REPL state
pub struct Repl {
    editor: DefaultEditor,
    interpreter: Interpreter,
    history_path: Option<PathBuf>,
}

impl Repl {
    /// Create a new REPL
    pub fn new() -> RlResult<Self> {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> RlResult<Self> {
        let editor = DefaultEditor::new()?;
        let history_path = dirs_home().map(|h| h.join(&config.history_file));
        let interpreter = Interpreter::with_config(config);

        let mut repl = Repl {
            editor,
            interpreter,
            history_path,
        };

        if let Some(ref path) = repl.history_path {
            let _ = repl.editor.load_history(path);
        }

        Ok(repl)
    }

    /// Run the REPL
    pub fn run(&mut self) -> RlResult<()> {
        println!("Protocall REPL v{}", env!("CARGO_PKG_VERSION"));
        println!("Type :help for help, :quit to exit.\n");

        let mut pending = String::new();
        loop {
            let prompt = if pending.is_empty() { PROMPT } else { CONTINUATION_PROMPT };
            match self.editor.readline(prompt) {
                Ok(line) => {
                    let line = line.trim();

                    if pending.is_empty() {
                        if line.is_empty() {
                            continue;
                        }
                        if line.starts_with(':') {
                            let _ = self.editor.add_history_entry(line);
                            if self.handle_command(line) {
                                break;
                            }
                            continue;
                        }
                    }

                    pending.push_str(line);
                    pending.push('\n');
                    if open_braces(&pending) > 0 {
                        continue;
                    }

                    let input = std::mem::take(&mut pending);
                    let _ = self.editor.add_history_entry(input.trim());
                    match self.eval_input(&input) {
                        Ok(Some(value)) => println!("{value}"),
                        Ok(None) => {}
                        Err(message) => eprintln!("{message}"),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    pending.clear();
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Goodbye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {err}");
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_path {
            let _ = self.editor.save_history(path);
        }

        Ok(())
    }

    /// Handle REPL commands (starting with :)
    fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            ":quit" | ":q" | ":exit" => {
                println!("Goodbye!");
                true
            }
            ":help" | ":h" | ":?" => {
                self.print_help();
                false
            }
            ":clear" => {
                print!("\x1B[2J\x1B[1;1H");
                false
            }
            ":functions" => {
                for name in self.interpreter.function_names() {
                    println!("{name}");
                }
                false
            }
            ":reset" => {
                let config = self.interpreter.config().clone();
                self.interpreter = Interpreter::with_config(config);
                false
            }
            _ => {
                println!("Unknown command: {cmd}");
                println!("Type :help for help.");
                false
            }
        }
    }

    /// Print help message
    fn print_help(&self) {
        println!("Protocall REPL Commands:");
        println!("  :help, :h, :?   Show this help");
        println!("  :quit, :q       Exit the REPL");
        println!("  :clear          Clear the screen");
        println!("  :functions      List defined functions");
        println!("  :reset          Forget all globals and functions");
        println!();
        println!("You can enter:");
        println!("  - Statements: x = 5;  if (x > 1) {{ print_(x = x); }}");
        println!("  - Definitions: define f {{ return x * 2; }}");
        println!("  - Expressions: f(x = 4)");
        println!();
        println!("Built-in functions:");
        println!("  print_(name = v, ...)   Print each argument as name = value");
        println!("  print_symbols()         Dump visible bindings");
        println!("  setq(name, v)           Bind name in the global frame");
        println!("  append(array, v)        Append to an array in place");
    }

    /// Run one complete input.
    ///
    /// Input that parses as statements runs as a program; otherwise it is
    /// evaluated as a single expression and its value is returned.
    fn eval_input(&mut self, input: &str) -> Result<Option<Value>, String> {
        let tokens = tokenize(input).map_err(|e| format!("Lexer error: {}", e.message()))?;

        let statement_error = match parse("<repl>", input, tokens.clone()) {
            Ok(block) => {
                return self
                    .interpreter
                    .run(&block)
                    .map_err(|err| format!("Runtime error: {err}"));
            }
            Err(err) => err,
        };

        let result = match parse_expression(tokens) {
            // a bare call may legitimately produce nothing
            Ok(Expression::Call(call)) => self.interpreter.call(&call),
            Ok(expr) => self.interpreter.evaluate(&expr).map(Some),
            Err(_) => return Err(format!("Parse error: {}", statement_error.message())),
        };
        result.map_err(|err| format!("Runtime error: {err}"))
    }
}

/// Unclosed `{` count, used to keep reading multi-line blocks
fn open_braces(input: &str) -> i64 {
    let mut depth = 0;
    let mut in_string = false;
    let mut escaped = false;
    for c in input.chars() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => depth -= 1,
            _ => {}
        }
    }
    depth
}

/// Get home directory
fn dirs_home() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE").ok().map(PathBuf::from)
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME").ok().map(PathBuf::from)
    }
}
