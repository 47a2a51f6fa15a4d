//! Crate root: wires together the compilation pipeline.
//!
//! - `tokenizer` turns tab-indented source into tokens with INDENT/DEDENT.
//! - `parser` builds the `ast` and stops at the first syntax error.
//! - `symbol` holds the scope arena consulted during code generation.
//! - `codegen` lowers the tree into MIPS32 assembly in two passes.
//! - `error` holds the diagnostics shared by the other modules.

pub mod ast;
pub mod codegen;
pub mod error;
pub mod parser;
pub mod symbol;
pub mod tokenizer;

pub use codegen::Generator;
pub use error::{CodegenIssue, CompileError, CompileResult, ParseError};
pub use parser::Parser;

/// Knobs for a compilation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
  /// Fail on the first code generation issue instead of omitting the
  /// construct.
  pub strict: bool,
}

/// Parse `source` into a program, or every syntax error found.
pub fn parse(source: &str) -> CompileResult<ast::Program> {
  let mut parser = Parser::from_source(source);
  let program = parser.parse_program();
  if !parser.errors().is_empty() {
    return Err(CompileError::Parse {
      errors: parser.errors().to_vec(),
    });
  }
  Ok(program)
}

/// Compile a source string into MIPS32 assembly with default options.
pub fn generate_assembly(source: &str) -> CompileResult<String> {
  generate_assembly_with(source, CompileOptions::default())
}

pub fn generate_assembly_with(source: &str, options: CompileOptions) -> CompileResult<String> {
  let program = parse(source)?;
  let mut generator = Generator::new();
  let asm = generator.generate(&program);
  if options.strict
    && let Some(issue) = generator.issues().first()
  {
    return Err(CompileError::Codegen {
      source: issue.clone(),
    });
  }
  Ok(asm)
}
