//! Dynamic records: runtime-typed, named aggregates of ordered fields
//!
//! A record has a type name fixed at construction and an ordered set of
//! fields. There is no schema beyond the name being a well-formed identifier:
//! the fields a record has are exactly the ones its literal listed.

use super::error::{InterpResult, RuntimeError};
use super::eval::Interpreter;
use super::scope::SymbolTable;
use super::value::{RecordRef, Value};
use crate::ast::RecordLiteral;

/// Record storage, shared through [`RecordRef`]
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    type_name: String,
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new(type_name: impl Into<String>) -> Self {
        Record {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Construct after checking the type name
    pub fn checked(type_name: &str) -> InterpResult<Self> {
        if is_valid_type_name(type_name) {
            Ok(Record::new(type_name))
        } else {
            Err(RuntimeError::bad_type_name(type_name))
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Add or overwrite a field. An existing field keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Overwrite an existing field; returns false when the record lacks it
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => {
                slot.1 = value;
                true
            }
            None => false,
        }
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_valid_type_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Read `field` from a value that must be a record.
///
/// `path` names the value for error messages.
pub fn read_field(value: &Value, field: &str, path: &str) -> InterpResult<Value> {
    let record = expect_record(value, path)?;
    let record = record.borrow();
    record
        .get(field)
        .cloned()
        .ok_or_else(|| RuntimeError::missing_field(record.type_name(), field))
}

/// Overwrite `field` in place on a value that must be a record.
///
/// The write lands in the shared storage, so every alias observes it.
pub fn write_field(value: &Value, field: &str, new_value: Value, path: &str) -> InterpResult<()> {
    let record = expect_record(value, path)?;
    let mut record = record.borrow_mut();
    if record.set(field, new_value) {
        Ok(())
    } else {
        Err(RuntimeError::missing_field(record.type_name(), field))
    }
}

impl Interpreter {
    /// Evaluate a record literal's fields in order into a fresh record.
    ///
    /// A field listed twice keeps its first position and its last value.
    pub(super) fn construct_record(
        &mut self,
        literal: &RecordLiteral,
        symbols: &mut SymbolTable,
    ) -> InterpResult<Value> {
        let mut record = Record::checked(&literal.type_name)?;
        for field in &literal.fields {
            let value = self.eval(&field.value, symbols)?;
            record.insert(field.name.as_str(), value);
        }
        Ok(Value::record(record))
    }
}

fn expect_record<'a>(value: &'a Value, path: &str) -> InterpResult<&'a RecordRef> {
    value
        .as_record()
        .ok_or_else(|| RuntimeError::not_a_record(path, value.type_name()))
}
