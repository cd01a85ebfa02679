//! Expression AST nodes

use serde::{Deserialize, Serialize};

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Literal, field path or parenthesized sub-expression
    Atom(Atom),

    /// Integer arithmetic
    Arithmetic {
        left: Box<Expression>,
        op: ArithmeticOp,
        right: Box<Expression>,
    },

    /// Integer/scalar comparison producing a boolean
    Comparison {
        left: Box<Expression>,
        op: ComparisonOp,
        right: Box<Expression>,
    },

    /// Call used for its value
    Call(Call),
}

impl Expression {
    pub fn integer(n: i64) -> Self {
        Expression::Atom(Atom::Literal(Literal::Integer(n)))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Expression::Atom(Atom::Literal(Literal::String(s.into())))
    }

    pub fn boolean(b: bool) -> Self {
        Expression::Atom(Atom::Literal(Literal::Boolean(b)))
    }

    /// Bare name reference
    pub fn name(name: impl Into<String>) -> Self {
        Expression::Atom(Atom::FieldPath(FieldPath::name(name)))
    }

    pub fn path(path: FieldPath) -> Self {
        Expression::Atom(Atom::FieldPath(path))
    }

    pub fn nested(inner: Expression) -> Self {
        Expression::Atom(Atom::Nested(Box::new(inner)))
    }

    pub fn arithmetic(left: Expression, op: ArithmeticOp, right: Expression) -> Self {
        Expression::Arithmetic {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn comparison(left: Expression, op: ComparisonOp, right: Expression) -> Self {
        Expression::Comparison {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }
}

/// The evaluated unit of an expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Atom {
    Literal(Literal),
    FieldPath(FieldPath),
    /// Parenthesized expression
    Nested(Box<Expression>),
}

/// Literal values, including composite constructors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Integer(i64),
    String(String),
    Boolean(bool),
    /// `{ e1, e2, ... }`
    Array(Vec<Expression>),
    /// `TypeName<field: expr, ...>`
    Record(RecordLiteral),
}

/// Dynamic record constructor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordLiteral {
    pub type_name: String,
    pub fields: Vec<FieldInit>,
}

/// One `field: expr` pair of a record literal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInit {
    pub name: String,
    pub value: Expression,
}

/// `root.field[index].field ...`
///
/// The root is looked up in scope; every projection after it is applied to
/// the value produced so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPath {
    pub root: String,
    pub projections: Vec<Projection>,
}

impl FieldPath {
    pub fn name(root: impl Into<String>) -> Self {
        FieldPath {
            root: root.into(),
            projections: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.projections.push(Projection::Field(name.into()));
        self
    }

    pub fn index(mut self, index: Expression) -> Self {
        self.projections.push(Projection::Index(Box::new(index)));
        self
    }

    /// Number of components including the root
    pub fn len(&self) -> usize {
        self.projections.len() + 1
    }

    /// A path is never empty: it always has a root
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn is_bare_name(&self) -> bool {
        self.projections.is_empty()
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.root)?;
        for projection in &self.projections {
            match projection {
                Projection::Field(name) => write!(f, ".{name}")?,
                Projection::Index(_) => write!(f, "[..]")?,
            }
        }
        Ok(())
    }
}

/// One step of a field path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Projection {
    /// `.name` on a record
    Field(String),
    /// `[expr]` on an array
    Index(Box<Expression>),
}

/// Call target plus named arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub target: String,
    pub arguments: Vec<Argument>,
}

impl Call {
    pub fn new(target: impl Into<String>, arguments: Vec<Argument>) -> Self {
        Call {
            target: target.into(),
            arguments,
        }
    }

    /// Build a call from parsed arguments, naming positional ones `arg{i}`
    /// after their position in the argument list.
    pub fn from_parsed(target: String, parsed: Vec<(Option<String>, Expression)>) -> Self {
        let arguments = parsed
            .into_iter()
            .enumerate()
            .map(|(i, (name, value))| Argument {
                name: name.unwrap_or_else(|| format!("arg{i}")),
                value,
            })
            .collect();
        Call { target, arguments }
    }
}

/// `name = expr` inside a call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,
    pub value: Expression,
}

impl Argument {
    pub fn new(name: impl Into<String>, value: Expression) -> Self {
        Argument {
            name: name.into(),
            value,
        }
    }
}

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArithmeticOp {
    Plus,
    Minus,
    Multiply,
    Divide,
}

impl std::fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ArithmeticOp::Plus => "+",
            ArithmeticOp::Minus => "-",
            ArithmeticOp::Multiply => "*",
            ArithmeticOp::Divide => "/",
        };
        write!(f, "{s}")
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOp {
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    Equals,
    NotEquals,
}

impl ComparisonOp {
    /// Ordering operators are only defined on integers
    pub fn is_ordering(&self) -> bool {
        !matches!(self, ComparisonOp::Equals | ComparisonOp::NotEquals)
    }
}

impl std::fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ComparisonOp::LessThan => "<",
            ComparisonOp::LessEqual => "<=",
            ComparisonOp::GreaterThan => ">",
            ComparisonOp::GreaterEqual => ">=",
            ComparisonOp::Equals => "==",
            ComparisonOp::NotEquals => "!=",
        };
        write!(f, "{s}")
    }
}
