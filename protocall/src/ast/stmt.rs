//! Statement AST nodes

use super::{Call, Expression, FieldPath};
use serde::{Deserialize, Serialize};

/// Ordered sequence of statements: a program or a function body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Statement>,
}

impl Block {
    pub fn new(statements: Vec<Statement>) -> Self {
        Block { statements }
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl From<Vec<Statement>> for Block {
    fn from(statements: Vec<Statement>) -> Self {
        Block::new(statements)
    }
}

/// Statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// `path = expr;`
    Assignment {
        target: FieldPath,
        expression: Expression,
    },

    /// `return expr;`
    Return(Expression),

    /// `name(args);` with the result discarded
    Call(Call),

    /// `if (c) { } elif (c) { } else { }`
    Conditional(Conditional),

    /// `while (c) { }`
    While { condition: Expression, body: Block },

    /// `define name { }`
    Define { name: String, body: Block },
}

impl Statement {
    pub fn assign(target: FieldPath, expression: Expression) -> Self {
        Statement::Assignment { target, expression }
    }

    pub fn assign_name(name: impl Into<String>, expression: Expression) -> Self {
        Statement::Assignment {
            target: FieldPath::name(name),
            expression,
        }
    }
}

/// One guarded branch of a conditional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub condition: Expression,
    pub body: Block,
}

impl Branch {
    pub fn new(condition: Expression, body: impl Into<Block>) -> Self {
        Branch {
            condition,
            body: body.into(),
        }
    }
}

/// If/elif/else chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conditional {
    pub if_branch: Branch,
    pub elif_branches: Vec<Branch>,
    pub else_body: Option<Block>,
}
