//! Runtime values for the interpreter

use super::record::Record;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared, mutable array storage
pub type ArrayRef = Rc<RefCell<Vec<Value>>>;

/// Shared, mutable record storage
pub type RecordRef = Rc<RefCell<Record>>;

/// Runtime value
///
/// Scalars are copied on assignment. Arrays and records are handles: cloning
/// a `Value::Array` or `Value::Record` yields another alias of the same
/// storage, so a mutation through one binding is seen through all of them.
#[derive(Debug, Clone)]
pub enum Value {
    /// 64-bit signed integer
    Integer(i64),
    /// Text
    String(Rc<str>),
    /// Boolean
    Boolean(bool),
    /// Ordered, shared sequence
    Array(ArrayRef),
    /// Named, shared aggregate of fields
    Record(RecordRef),
}

impl Value {
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::String(s.into())
    }

    /// Allocate fresh array storage
    pub fn array(elements: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    /// Allocate fresh record storage
    pub fn record(record: Record) -> Self {
        Value::Record(Rc::new(RefCell::new(record)))
    }

    /// Get type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::String(_) => "string",
            Value::Boolean(_) => "boolean",
            Value::Array(_) => "array",
            Value::Record(_) => "record",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordRef> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// True when both values are handles to the same composite storage
    pub fn same_storage(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Record(a), Value::Record(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    fn storage_ptr(&self) -> Option<*const ()> {
        match self {
            Value::Array(a) => Some(Rc::as_ptr(a) as *const ()),
            Value::Record(r) => Some(Rc::as_ptr(r) as *const ()),
            _ => None,
        }
    }

    /// Display with cycle detection: a composite reached again while it is
    /// still being printed shows as `...`.
    fn write_to(&self, f: &mut fmt::Formatter<'_>, open: &mut Vec<*const ()>) -> fmt::Result {
        if let Some(ptr) = self.storage_ptr() {
            if open.contains(&ptr) {
                return write!(f, "...");
            }
            open.push(ptr);
        }
        let result = match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Array(elements) => {
                write!(f, "{{")?;
                for (i, element) in elements.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    element.write_to(f, open)?;
                }
                write!(f, "}}")
            }
            Value::Record(record) => {
                let record = record.borrow();
                write!(f, "{}<", record.type_name())?;
                for (i, (name, value)) in record.fields().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: ")?;
                    value.write_to(f, open)?;
                }
                write!(f, ">")
            }
        };
        if self.storage_ptr().is_some() {
            open.pop();
        }
        result
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f, &mut Vec::new())
    }
}

/// Structural equality, used by tests and by `==` on scalars.
///
/// Composites compare by content. A pair of composites reached again while
/// it is still being compared counts as equal, so cyclic values terminate.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.eq_in(other, &mut Vec::new())
    }
}

impl Value {
    fn eq_in(&self, other: &Value, open: &mut Vec<(*const (), *const ())>) -> bool {
        if self.same_storage(other) {
            return true;
        }
        let pair = match (self.storage_ptr(), other.storage_ptr()) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        };
        if let Some(pair) = pair {
            if open.contains(&pair) {
                return true;
            }
            open.push(pair);
        }
        let result = match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.eq_in(y, open))
            }
            (Value::Record(a), Value::Record(b)) => {
                let (a, b) = (a.borrow(), b.borrow());
                a.type_name() == b.type_name()
                    && a.len() == b.len()
                    && a.fields()
                        .zip(b.fields())
                        .all(|((na, va), (nb, vb))| na == nb && va.eq_in(vb, open))
            }
            _ => false,
        };
        if pair.is_some() {
            open.pop();
        }
        result
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}
