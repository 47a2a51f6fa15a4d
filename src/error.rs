//! Shared error types used across the compilation pipeline.
//!
//! Parse diagnostics read `line N: message` and can be rendered against the
//! source with a caret under the offending column, in the style of chibicc.
//! Code generator irregularities are a closed set of `CodegenIssue`s.

use snafu::Snafu;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Snafu)]
#[snafu(context(suffix(Ctx)))]
pub enum CompileError {
  #[snafu(display("{}", join_lines(errors)))]
  Parse { errors: Vec<ParseError> },

  #[snafu(display("code generation failed: {source}"))]
  Codegen { source: CodegenIssue },
}

impl CompileError {
  /// User-facing report; parse errors get a source excerpt with a caret.
  pub fn render(&self, source: &str) -> String {
    match self {
      CompileError::Parse { errors } => errors
        .iter()
        .map(|err| err.render(source))
        .collect::<Vec<_>>()
        .join("\n"),
      CompileError::Codegen { .. } => self.to_string(),
    }
  }
}

fn join_lines(errors: &[ParseError]) -> String {
  errors
    .iter()
    .map(ToString::to_string)
    .collect::<Vec<_>>()
    .join("\n")
}

/// A syntax error anchored at a token position.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(display("line {line}: {message}"))]
pub struct ParseError {
  pub line: usize,
  pub column: usize,
  pub message: String,
}

impl ParseError {
  pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
    ParseSnafu {
      line,
      column,
      message,
    }
    .build()
  }

  pub fn render(&self, source: &str) -> String {
    let text = source
      .split('\n')
      .nth(self.line.saturating_sub(1))
      .unwrap_or("");
    // Reuse tabs from the source line so the caret lines up under tab indentation.
    let marker: String = text
      .chars()
      .take(self.column.saturating_sub(1))
      .map(|c| if c == '\t' { '\t' } else { ' ' })
      .chain(std::iter::once('^'))
      .collect();
    format!("{self}\n    {text}\n    {marker}")
  }
}

/// Irregularities the code generator tolerates by omitting the construct.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CodegenIssue {
  #[snafu(display("unresolved identifier '{name}'"))]
  UnresolvedIdentifier { name: String },

  #[snafu(display("'{name}' is a function, not a variable"))]
  NotAVariable { name: String },

  #[snafu(display("call to undefined function '{name}'"))]
  UnknownFunction { name: String },

  #[snafu(display("call to '{function}' passes {count} arguments, only the first 4 are passed"))]
  TooManyArguments { function: String, count: usize },

  #[snafu(display("function '{function}' declares {count} parameters, only the first 4 are received"))]
  TooManyParameters { function: String, count: usize },

  #[snafu(display("'return' outside of a function"))]
  ReturnOutsideFunction,

  #[snafu(display("integer literal '{text}' does not fit in 32 bits"))]
  InvalidInteger { text: String },

  #[snafu(display("function '{name}' is defined more than once"))]
  DuplicateFunction { name: String },
}
