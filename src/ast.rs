//! AST contract consumed by the analyzer
//!
//! The lexer/parser that produces this tree lives elsewhere; this module
//! only fixes the shape the analyzer depends on. Nodes are a tagged enum
//! rather than a trait-object visitor hierarchy.
//!
//! `serde` derives let a whole program arrive as a single JSON document
//! (see `src/main.rs`), which is how an external parser hands the
//! analyzer its input in this crate's CLI and test suite.

use serde::{Deserialize, Serialize};

/// 1-based source location, attached to every node that can produce a
/// diagnostic or appear in the symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Primitive tag on a constant literal, mirroring `types::Primitive` but
/// restricted to the four literal-bearing kinds the grammar can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstantKind {
    Integer,
    Real,
    Boolean,
    String,
}

/// A whole program: a name, a flat list of top-level declarations, a flat
/// list of functions, and a body (itself a compound statement).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    pub name: String,
    pub location: Location,
    pub declarations: Vec<VariableDecl>,
    pub functions: Vec<Function>,
    pub body: CompoundStatement,
}

/// One `var` declaration. `type_text` is the raw declared type, e.g.
/// `"integer"` or `"integer [3][4]"`; an initializer, if present, makes
/// this a constant declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableDecl {
    pub name: String,
    pub type_text: String,
    pub location: Location,
    pub initializer: Option<Expr>,
}

/// A function (or a `void`-returning procedure). `return_type` and
/// `parameters` together form its prototype.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub return_type: String,
    pub parameters: Vec<VariableDecl>,
    pub location: Location,
    pub body: CompoundStatement,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundStatement {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Statement {
    Print {
        expr: Expr,
    },
    Read {
        target: VariableRef,
    },
    Assignment {
        location: Location,
        target: VariableRef,
        value: Expr,
    },
    If {
        condition: Expr,
        then_branch: CompoundStatement,
        else_branch: Option<CompoundStatement>,
    },
    While {
        condition: Expr,
        body: CompoundStatement,
    },
    For {
        location: Location,
        loop_var: VariableDecl,
        lower_assign: Expr,
        upper_bound: Expr,
        body: CompoundStatement,
    },
    Return {
        location: Location,
        expr: Expr,
    },
    Compound(CompoundStatement),
}

/// A reference to a declared name, optionally subscripted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableRef {
    pub name: String,
    pub location: Location,
    pub subscripts: Vec<Expr>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Expr {
    Constant {
        value_type: ConstantKind,
        literal: String,
        location: Location,
    },
    VariableRef(VariableRef),
    Binary {
        op: String,
        location: Location,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: String,
        location: Location,
        operand: Box<Expr>,
    },
    Call {
        name: String,
        location: Location,
        arguments: Vec<Expr>,
    },
}

impl Expr {
    pub fn location(&self) -> Location {
        match self {
            Expr::Constant { location, .. }
            | Expr::Binary { location, .. }
            | Expr::Unary { location, .. }
            | Expr::Call { location, .. } => *location,
            Expr::VariableRef(v) => v.location,
        }
    }
}
