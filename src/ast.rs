//! Syntax tree produced by the parser.
//!
//! Every node owns its children outright; the tree is built once and then
//! only read by the code generator. Statements and expressions are closed
//! enums so each traversal is forced to handle every kind.

use std::fmt;

use crate::tokenizer::TokenKind;

/// Binary operators recognised by the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
  Add,
  Sub,
  Mul,
  Lt,
  Gt,
  Le,
  Ge,
  Eq,
  Ne,
}

impl BinaryOp {
  pub fn from_token(kind: TokenKind) -> Option<Self> {
    let op = match kind {
      TokenKind::Plus => BinaryOp::Add,
      TokenKind::Minus => BinaryOp::Sub,
      TokenKind::Asterisk => BinaryOp::Mul,
      TokenKind::Lt => BinaryOp::Lt,
      TokenKind::Gt => BinaryOp::Gt,
      TokenKind::LtEq => BinaryOp::Le,
      TokenKind::GtEq => BinaryOp::Ge,
      TokenKind::Eq => BinaryOp::Eq,
      TokenKind::NotEq => BinaryOp::Ne,
      _ => return None,
    };
    Some(op)
  }

  pub fn is_comparison(self) -> bool {
    !matches!(self, BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul)
  }

  pub fn as_str(self) -> &'static str {
    match self {
      BinaryOp::Add => "+",
      BinaryOp::Sub => "-",
      BinaryOp::Mul => "*",
      BinaryOp::Lt => "<",
      BinaryOp::Gt => ">",
      BinaryOp::Le => "<=",
      BinaryOp::Ge => ">=",
      BinaryOp::Eq => "==",
      BinaryOp::Ne => "!=",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
  Binary {
    left: Box<Expr>,
    op: BinaryOp,
    right: Box<Expr>,
  },
  Identifier(String),
  /// Digits exactly as written; range checking happens during lowering.
  IntegerLiteral(String),
  StringLiteral(String),
  Call {
    name: String,
    args: Vec<Expr>,
  },
}

impl Expr {
  pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
    Self::Binary {
      left: Box::new(left),
      op,
      right: Box::new(right),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
  pub name: String,
  pub params: Vec<String>,
  pub body: Vec<Stmt>,
}

impl FunctionDef {
  /// True when a `return` appears directly in the body, not nested in a block.
  pub fn has_direct_return(&self) -> bool {
    self.body.iter().any(|stmt| matches!(stmt, Stmt::Return { .. }))
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
  FunctionDefinition(FunctionDef),
  If {
    condition: Expr,
    consequence: Vec<Stmt>,
    alternative: Option<Vec<Stmt>>,
  },
  While {
    condition: Expr,
    body: Vec<Stmt>,
  },
  Assignment {
    name: String,
    value: Expr,
  },
  Print {
    value: Expr,
  },
  Return {
    value: Expr,
  },
  Expression(Expr),
}

/// Root of the tree: top-level statements in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
  pub statements: Vec<Stmt>,
}

impl Program {
  pub fn is_empty(&self) -> bool {
    self.statements.is_empty()
  }
}

impl fmt::Display for Expr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Expr::Binary { left, op, right } => write!(f, "({left} {} {right})", op.as_str()),
      Expr::Identifier(name) => f.write_str(name),
      Expr::IntegerLiteral(text) | Expr::StringLiteral(text) => f.write_str(text),
      Expr::Call { name, args } => {
        write!(f, "{name}(")?;
        write_joined(f, args)?;
        f.write_str(")")
      }
    }
  }
}

impl fmt::Display for Stmt {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Stmt::FunctionDefinition(def) => {
        write!(f, "def {}(", def.name)?;
        write_joined(f, &def.params)?;
        f.write_str(")")
      }
      Stmt::If { condition, .. } => write!(f, "if {condition}"),
      Stmt::While { condition, .. } => write!(f, "while {condition}"),
      Stmt::Assignment { name, value } => write!(f, "{name} = {value}"),
      Stmt::Print { value } => write!(f, "print({value})"),
      Stmt::Return { value } => write!(f, "return {value}"),
      Stmt::Expression(expr) => write!(f, "{expr}"),
    }
  }
}

impl fmt::Display for Program {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for stmt in &self.statements {
      writeln!(f, "{stmt}")?;
    }
    Ok(())
  }
}

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
  for (i, item) in items.iter().enumerate() {
    if i > 0 {
      f.write_str(", ")?;
    }
    write!(f, "{item}")?;
  }
  Ok(())
}
