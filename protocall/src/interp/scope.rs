//! Symbol table: one persistent global frame plus a stack of call frames
//!
//! Resolution is two-level, not a chain: a name is looked up in the current
//! call frame and then in the global frame. Frames of callers further down
//! the stack are never visible. Conditional and loop bodies do not push
//! frames; only user function calls do.

use super::error::{InterpResult, RuntimeError};
use super::Value;
use std::collections::HashMap;

/// One binding level
pub type Frame = HashMap<String, Value>;

/// Global frame plus call frames
#[derive(Debug, Default)]
pub struct SymbolTable {
    globals: Frame,
    calls: Vec<Frame>,
}

impl SymbolTable {
    /// Create a symbol table with an empty global frame
    pub fn new() -> Self {
        SymbolTable {
            globals: Frame::new(),
            calls: Vec::new(),
        }
    }

    /// Create a symbol table whose global frame starts with `bindings`
    pub fn with_globals(bindings: Frame) -> Self {
        SymbolTable {
            globals: bindings,
            calls: Vec::new(),
        }
    }

    /// Push a frame for a user function call
    pub fn push_call_frame(&mut self, bindings: Frame) {
        self.calls.push(bindings);
    }

    /// Pop the innermost call frame.
    ///
    /// The global frame is never popped; popping with no active call frame
    /// returns `None`.
    pub fn pop_call_frame(&mut self) -> Option<Frame> {
        self.calls.pop()
    }

    /// Number of active call frames
    pub fn depth(&self) -> usize {
        self.calls.len()
    }

    /// Look up `name` in the current call frame, then the global frame
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.calls
            .last()
            .and_then(|frame| frame.get(name))
            .or_else(|| self.globals.get(name))
    }

    /// Look up `name`, failing with a `NameError`
    pub fn get(&self, name: &str) -> InterpResult<Value> {
        self.lookup(name)
            .cloned()
            .ok_or_else(|| RuntimeError::undefined_variable(name))
    }

    /// Bind `name` in the nearest frame that already holds it, else create it
    /// in the current frame (the call frame if one is active, otherwise the
    /// global frame).
    pub fn set(&mut self, name: &str, value: Value) {
        if let Some(frame) = self.calls.last_mut() {
            if let Some(slot) = frame.get_mut(name) {
                *slot = value;
                return;
            }
            if let Some(slot) = self.globals.get_mut(name) {
                *slot = value;
                return;
            }
            frame.insert(name.to_string(), value);
        } else {
            self.globals.insert(name.to_string(), value);
        }
    }

    /// Check if `name` resolves from the current position
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// The persistent global frame
    pub fn globals(&self) -> &Frame {
        &self.globals
    }

    /// Direct write access to the global frame, bypassing the nearest-frame
    /// rule of [`SymbolTable::set`]. Used by `setq`.
    pub fn globals_mut(&mut self) -> &mut Frame {
        &mut self.globals
    }

    /// The innermost call frame, if a user function is executing
    pub fn current_frame(&self) -> Option<&Frame> {
        self.calls.last()
    }
}
