//! Code generation: lower the parsed program into MIPS32 assembly.
//!
//! Generation runs in two passes over the tree. The first pass records every
//! global variable and function in the symbol table and pools the string
//! literals; the second pass writes the `.data` section from what was
//! collected and then lowers the statements into `.text`. Expression values
//! live in the temporaries `$t0`..`$t9`; the pool is cleared after every
//! statement so nothing survives a statement boundary.
//!
//! Irregularities such as unresolved names are reported as `CodegenIssue`s
//! and the offending construct is left out of the output.

mod control;
mod function;
mod registers;

use std::collections::{HashMap, HashSet};
use std::mem;

use tracing::{debug, warn};

use crate::ast::{BinaryOp, Expr, FunctionDef, Program, Stmt};
use crate::error::{
  CodegenIssue, DuplicateFunctionSnafu, InvalidIntegerSnafu, NotAVariableSnafu,
  ReturnOutsideFunctionSnafu, UnresolvedIdentifierSnafu,
};
use crate::symbol::{ScopeId, ScopeKind, Symbol, SymbolTable, SymbolType};

use self::function::Frame;
use self::registers::{Reg, RegisterPool};

/// Label of the shared `"\n"` constant used after every print.
pub const NEWLINE_LABEL: &str = "newline";

const SYSCALL_PRINT_INT: u8 = 1;
const SYSCALL_PRINT_STRING: u8 = 4;
const SYSCALL_EXIT: u8 = 10;

/// String literals deduplicated by text, labelled `str_0`, `str_1`, ...
#[derive(Debug, Default)]
struct StringPool {
  entries: Vec<String>,
  index: HashMap<String, usize>,
}

impl StringPool {
  fn intern(&mut self, text: &str) -> String {
    let slot = match self.index.get(text) {
      Some(&slot) => slot,
      None => {
        self.entries.push(text.to_string());
        self.index.insert(text.to_string(), self.entries.len() - 1);
        self.entries.len() - 1
      }
    };
    string_label(slot)
  }

  fn iter(&self) -> impl Iterator<Item = (String, &str)> + '_ {
    self
      .entries
      .iter()
      .enumerate()
      .map(|(slot, text)| (string_label(slot), text.as_str()))
  }
}

fn string_label(slot: usize) -> String {
  format!("str_{slot}")
}

#[derive(Debug)]
pub struct Generator {
  symbols: SymbolTable,
  scope: ScopeId,
  registers: RegisterPool,
  strings: StringPool,
  labels: usize,
  frame: Option<Frame>,
  issues: Vec<CodegenIssue>,
  out: String,
}

impl Default for Generator {
  fn default() -> Self {
    Self::new()
  }
}

impl Generator {
  pub fn new() -> Self {
    let symbols = SymbolTable::new();
    let scope = symbols.global();
    Self {
      symbols,
      scope,
      registers: RegisterPool::default(),
      strings: StringPool::default(),
      labels: 0,
      frame: None,
      issues: Vec::new(),
      out: String::new(),
    }
  }

  /// Emit the complete assembly listing for `program`. All state from a
  /// previous run is discarded first.
  pub fn generate(&mut self, program: &Program) -> String {
    self.reset();
    self.collect_symbols(program);
    self.emit_data_section();

    self.out.push_str("\n.text\n");
    self.out.push_str(".globl main\n");
    self.out.push_str("main:\n");
    self.emit_statements(&program.statements);
    self.out.push_str(&format!("    li $v0, {SYSCALL_EXIT}\n"));
    self.out.push_str("    syscall\n");

    let mut definitions = Vec::new();
    gather_functions(&program.statements, &mut definitions);
    let mut emitted = HashSet::new();
    for def in definitions {
      if !emitted.insert(def.name.as_str()) {
        self.report(DuplicateFunctionSnafu { name: &def.name }.build());
        continue;
      }
      self.out.push('\n');
      self.emit_function(def);
    }

    debug!(
      functions = emitted.len(),
      issues = self.issues.len(),
      "generated assembly"
    );
    mem::take(&mut self.out)
  }

  /// First pass: define the globals and functions `program` uses and pool
  /// its string literals. Running it again over the same tree changes
  /// nothing.
  ///
  /// A variable is a String once any assignment stores a string into it,
  /// wherever that assignment sits in the source. Types only ever move from
  /// Integer to String, so the walk repeats until no variable changes.
  pub fn collect_symbols(&mut self, program: &Program) {
    self.register_functions(&program.statements);
    loop {
      let strings_before = self.string_variables();
      self.collect_block(&program.statements, &[]);
      if self.string_variables() == strings_before {
        break;
      }
    }
    debug!(
      globals = self.globals().count(),
      strings = self.strings.entries.len(),
      "collected symbols"
    );
  }

  /// Irregularities recorded by the last run, in the order they were found.
  pub fn issues(&self) -> &[CodegenIssue] {
    &self.issues
  }

  pub fn symbols(&self) -> &SymbolTable {
    &self.symbols
  }

  /// Global variables that get a `.word` slot, in definition order.
  pub fn globals(&self) -> impl Iterator<Item = &Symbol> + '_ {
    self
      .symbols
      .symbols(self.symbols.global())
      .iter()
      .filter(|symbol| symbol.is_global && !symbol.is_temp && symbol.ty.is_value())
  }

  /// Pooled string literals as `(label, text)`.
  pub fn string_literals(&self) -> impl Iterator<Item = (String, &str)> + '_ {
    self.strings.iter()
  }

  fn reset(&mut self) {
    *self = Self::new();
  }

  fn register_functions(&mut self, statements: &[Stmt]) {
    let mut definitions = Vec::new();
    gather_functions(statements, &mut definitions);
    let global = self.symbols.global();
    for def in definitions {
      let known = self
        .symbols
        .lookup(global, &def.name)
        .is_some_and(|symbol| symbol.ty == SymbolType::Function && !symbol.is_builtin_print);
      // The first definition of a name is the one that gets emitted.
      if !known {
        self
          .symbols
          .define_function(global, &def.name, def.params.clone());
      }
    }
  }

  fn collect_block(&mut self, statements: &[Stmt], params: &[String]) {
    for stmt in statements {
      self.collect_stmt(stmt, params);
    }
  }

  fn collect_stmt(&mut self, stmt: &Stmt, params: &[String]) {
    match stmt {
      Stmt::FunctionDefinition(def) => self.collect_block(&def.body, &def.params),
      Stmt::If {
        condition,
        consequence,
        alternative,
      } => {
        self.collect_expr(condition, params);
        self.collect_block(consequence, params);
        if let Some(alternative) = alternative {
          self.collect_block(alternative, params);
        }
      }
      Stmt::While { condition, body } => {
        self.collect_expr(condition, params);
        self.collect_block(body, params);
      }
      Stmt::Assignment { name, value } => {
        self.collect_expr(value, params);
        if params.contains(name) || self.is_function(name) {
          return;
        }
        let ty = self.static_type(value, params);
        let global = self.symbols.global();
        let current = self.symbols.lookup(global, name).map(|symbol| symbol.ty);
        let settled = current == Some(SymbolType::String) || current == Some(ty);
        if !settled {
          self.symbols.define(global, name, ty);
        }
      }
      Stmt::Print { value } | Stmt::Return { value } | Stmt::Expression(value) => {
        self.collect_expr(value, params);
      }
    }
  }

  fn collect_expr(&mut self, expr: &Expr, params: &[String]) {
    match expr {
      Expr::Binary { left, right, .. } => {
        self.collect_expr(left, params);
        self.collect_expr(right, params);
      }
      Expr::Identifier(name) => {
        let global = self.symbols.global();
        if !params.contains(name) && self.symbols.lookup(global, name).is_none() {
          self.symbols.define(global, name, SymbolType::Integer);
        }
      }
      Expr::IntegerLiteral(_) => {}
      Expr::StringLiteral(text) => {
        self.strings.intern(text);
      }
      Expr::Call { args, .. } => {
        for arg in args {
          self.collect_expr(arg, params);
        }
      }
    }
  }

  /// Type a variable takes on when assigned `value`.
  fn static_type(&self, value: &Expr, params: &[String]) -> SymbolType {
    match value {
      Expr::StringLiteral(_) => SymbolType::String,
      Expr::Identifier(name) if !params.contains(name) => self
        .symbols
        .lookup(self.symbols.global(), name)
        .filter(|symbol| symbol.ty == SymbolType::String)
        .map_or(SymbolType::Integer, |symbol| symbol.ty),
      _ => SymbolType::Integer,
    }
  }

  fn string_variables(&self) -> usize {
    self
      .globals()
      .filter(|symbol| symbol.ty == SymbolType::String)
      .count()
  }

  fn is_function(&self, name: &str) -> bool {
    self
      .symbols
      .lookup(self.symbols.global(), name)
      .is_some_and(|symbol| symbol.ty == SymbolType::Function)
  }

  fn emit_data_section(&mut self) {
    let mut data = String::from(".data\n");
    for symbol in self.globals() {
      data.push_str(&format!("{}: .word 0\n", symbol.name));
    }
    for (label, text) in self.strings.iter() {
      data.push_str(&format!("{label}: .asciiz \"{text}\"\n"));
    }
    data.push_str(&format!("{NEWLINE_LABEL}: .asciiz \"\\n\"\n"));
    self.out.push_str(&data);
  }

  /// Lower a statement list, releasing every register after each statement.
  fn emit_statements(&mut self, statements: &[Stmt]) {
    for stmt in statements {
      self.emit_stmt(stmt);
      self.registers.clear();
    }
  }

  /// Lower `statements` inside a fresh child scope of the current one.
  fn emit_block(&mut self, statements: &[Stmt], kind: ScopeKind) {
    let outer = self.scope;
    self.scope = self.symbols.enter_scope(outer, kind);
    self.emit_statements(statements);
    self.scope = outer;
  }

  fn emit_stmt(&mut self, stmt: &Stmt) {
    match stmt {
      // Function bodies are emitted after `main`.
      Stmt::FunctionDefinition(_) => {}
      Stmt::If {
        condition,
        consequence,
        alternative,
      } => self.emit_if(condition, consequence, alternative.as_deref()),
      Stmt::While { condition, body } => self.emit_while(condition, body),
      Stmt::Assignment { name, value } => self.emit_assignment(name, value),
      Stmt::Print { value } => self.emit_print(value),
      Stmt::Return { value } => self.emit_return(value),
      Stmt::Expression(expr) => {
        if let Some(reg) = self.emit_expr(expr) {
          self.registers.free(reg);
        }
      }
    }
  }

  fn emit_assignment(&mut self, name: &str, value: &Expr) {
    let Some(location) = self.variable(name) else {
      return;
    };
    if let Some(reg) = self.emit_expr(value) {
      self.out.push_str(&format!("    sw {reg}, {location}\n"));
      self.registers.free(reg);
    }
  }

  fn emit_print(&mut self, value: &Expr) {
    if let Expr::StringLiteral(text) = value {
      let label = self.strings.intern(text);
      self.out.push_str(&format!("    la $a0, {label}\n"));
      self.out.push_str(&format!("    li $v0, {SYSCALL_PRINT_STRING}\n"));
    } else {
      let is_string = self.is_string(value);
      let Some(reg) = self.emit_expr(value) else {
        return;
      };
      let code = if is_string {
        SYSCALL_PRINT_STRING
      } else {
        SYSCALL_PRINT_INT
      };
      self.out.push_str(&format!("    move $a0, {reg}\n"));
      self.out.push_str(&format!("    li $v0, {code}\n"));
      self.registers.free(reg);
    }
    self.out.push_str("    syscall\n");
    self.out.push_str(&format!("    la $a0, {NEWLINE_LABEL}\n"));
    self.out.push_str(&format!("    li $v0, {SYSCALL_PRINT_STRING}\n"));
    self.out.push_str("    syscall\n");
  }

  fn emit_return(&mut self, value: &Expr) {
    let Some(frame) = self.frame else {
      self.report(ReturnOutsideFunctionSnafu.build());
      return;
    };
    if let Some(reg) = self.emit_expr(value) {
      self.out.push_str(&format!("    move $v0, {reg}\n"));
      self.registers.free(reg);
    }
    self.emit_epilogue(frame);
  }

  /// Lower `expr` into a freshly allocated register.
  fn emit_expr(&mut self, expr: &Expr) -> Option<Reg> {
    match expr {
      Expr::IntegerLiteral(text) => {
        let Ok(value) = text.parse::<i32>() else {
          self.report(InvalidIntegerSnafu { text }.build());
          return None;
        };
        let reg = self.registers.allocate();
        self.out.push_str(&format!("    li {reg}, {value}\n"));
        Some(reg)
      }
      Expr::StringLiteral(text) => {
        let label = self.strings.intern(text);
        let reg = self.registers.allocate();
        self.out.push_str(&format!("    la {reg}, {label}\n"));
        Some(reg)
      }
      Expr::Identifier(name) => {
        let location = self.variable(name)?;
        let reg = self.registers.allocate();
        self.out.push_str(&format!("    lw {reg}, {location}\n"));
        Some(reg)
      }
      Expr::Binary { left, op, right } => {
        let (left, right) = self.emit_operands(left, right)?;
        let dest = self.registers.allocate();
        self.emit_binary(*op, dest, left, right);
        self.registers.free(left);
        self.registers.free(right);
        Some(dest)
      }
      Expr::Call { name, args } => self.emit_call(name, args),
    }
  }

  /// Lower both operands, left first. If either fails, neither is kept.
  fn emit_operands(&mut self, left: &Expr, right: &Expr) -> Option<(Reg, Reg)> {
    let left = self.emit_expr(left)?;
    let Some(right) = self.emit_expr(right) else {
      self.registers.free(left);
      return None;
    };
    Some((left, right))
  }

  /// Value-producing form of every operator; comparisons yield 0 or 1.
  fn emit_binary(&mut self, op: BinaryOp, dest: Reg, left: Reg, right: Reg) {
    let asm = &mut self.out;
    match op {
      BinaryOp::Add => asm.push_str(&format!("    add {dest}, {left}, {right}\n")),
      BinaryOp::Sub => asm.push_str(&format!("    sub {dest}, {left}, {right}\n")),
      BinaryOp::Mul => asm.push_str(&format!("    mul {dest}, {left}, {right}\n")),
      BinaryOp::Lt => asm.push_str(&format!("    slt {dest}, {left}, {right}\n")),
      BinaryOp::Gt => asm.push_str(&format!("    slt {dest}, {right}, {left}\n")),
      BinaryOp::Le => {
        asm.push_str(&format!("    slt {dest}, {right}, {left}\n"));
        asm.push_str(&format!("    xori {dest}, {dest}, 1\n"));
      }
      BinaryOp::Ge => {
        asm.push_str(&format!("    slt {dest}, {left}, {right}\n"));
        asm.push_str(&format!("    xori {dest}, {dest}, 1\n"));
      }
      BinaryOp::Eq => {
        asm.push_str(&format!("    sub {dest}, {left}, {right}\n"));
        asm.push_str(&format!("    sltiu {dest}, {dest}, 1\n"));
      }
      BinaryOp::Ne => {
        asm.push_str(&format!("    sub {dest}, {left}, {right}\n"));
        asm.push_str(&format!("    sltu {dest}, $zero, {dest}\n"));
      }
    }
  }

  /// Storage operand for a variable: its label for globals, a frame slot
  /// for parameters.
  fn variable(&mut self, name: &str) -> Option<String> {
    let resolved = match self.symbols.lookup(self.scope, name) {
      Some(symbol) if symbol.ty.is_value() => Ok(location(symbol)),
      Some(_) => Err(NotAVariableSnafu { name }.build()),
      None => Err(UnresolvedIdentifierSnafu { name }.build()),
    };
    match resolved {
      Ok(location) => Some(location),
      Err(issue) => {
        self.report(issue);
        None
      }
    }
  }

  fn is_string(&self, expr: &Expr) -> bool {
    match expr {
      Expr::StringLiteral(_) => true,
      Expr::Identifier(name) => self
        .symbols
        .lookup(self.scope, name)
        .is_some_and(|symbol| symbol.ty == SymbolType::String),
      _ => false,
    }
  }

  fn report(&mut self, issue: CodegenIssue) {
    warn!(%issue, "omitting construct");
    self.issues.push(issue);
  }
}

fn location(symbol: &Symbol) -> String {
  if symbol.is_global {
    symbol.name.clone()
  } else {
    format!("{}($fp)", function::parameter_offset(symbol.offset))
  }
}

/// Every function definition in the tree, outermost first, in source order.
fn gather_functions<'p>(statements: &'p [Stmt], out: &mut Vec<&'p FunctionDef>) {
  for stmt in statements {
    match stmt {
      Stmt::FunctionDefinition(def) => {
        out.push(def);
        gather_functions(&def.body, out);
      }
      Stmt::If {
        consequence,
        alternative,
        ..
      } => {
        gather_functions(consequence, out);
        if let Some(alternative) = alternative {
          gather_functions(alternative, out);
        }
      }
      Stmt::While { body, .. } => gather_functions(body, out),
      Stmt::Assignment { .. } | Stmt::Print { .. } | Stmt::Return { .. } | Stmt::Expression(_) => {}
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::parser::Parser;

  fn program(source: &str) -> Program {
    let mut parser = Parser::from_source(source);
    let program = parser.parse_program();
    assert!(parser.errors().is_empty(), "{:?}", parser.errors());
    program
  }

  fn compile(source: &str) -> (String, Vec<CodegenIssue>) {
    let mut generator = Generator::new();
    let asm = generator.generate(&program(source));
    (asm, generator.issues().to_vec())
  }

  fn lines(asm: &str) -> Vec<&str> {
    asm.lines().map(str::trim).filter(|line| !line.is_empty()).collect()
  }

  fn text_section(asm: &str) -> Vec<&str> {
    lines(asm)
      .into_iter()
      .skip_while(|line| *line != "main:")
      .skip(1)
      .collect()
  }

  #[test]
  fn data_section_layout() {
    let (asm, issues) = compile("x = 5 + 3\nname = \"hi\"\nprint(name)\n");
    assert!(issues.is_empty());
    assert!(asm.starts_with(
      ".data\nx: .word 0\nname: .word 0\nstr_0: .asciiz \"hi\"\nnewline: .asciiz \"\\n\"\n\n.text\n.globl main\nmain:\n"
    ));
  }

  #[test]
  fn arithmetic_assignment() {
    let (asm, _) = compile("x = 5 + 3");
    assert_eq!(
      text_section(&asm),
      vec![
        "li $t0, 5",
        "li $t1, 3",
        "add $t2, $t0, $t1",
        "sw $t2, x",
        "li $v0, 10",
        "syscall"
      ]
    );
  }

  #[test]
  fn value_comparisons_produce_booleans() {
    let (asm, _) = compile("a = x <= y\nb = x == y\nc = x != y\nd = x >= y\n");
    let text = text_section(&asm);
    assert!(text.contains(&"slt $t2, $t1, $t0"));
    assert!(text.contains(&"xori $t2, $t2, 1"));
    assert!(text.contains(&"sltiu $t2, $t2, 1"));
    assert!(text.contains(&"sltu $t2, $zero, $t2"));
    assert!(text.contains(&"slt $t2, $t0, $t1"));
  }

  #[test]
  fn print_dispatches_on_static_type() {
    let (asm, _) = compile("n = 1\ns = \"a\"\nt = s\nprint(n)\nprint(t)\nprint(\"b\")\n");
    let text = text_section(&asm);
    let print_int = ["lw $t0, n", "move $a0, $t0", "li $v0, 1", "syscall"];
    let print_copy = ["lw $t0, t", "move $a0, $t0", "li $v0, 4", "syscall"];
    let print_literal = ["la $a0, str_1", "li $v0, 4", "syscall"];
    for expected in [&print_int[..], &print_copy[..], &print_literal[..]] {
      assert!(
        text.windows(expected.len()).any(|window| window == expected),
        "{expected:?} missing from {text:#?}"
      );
    }
    assert_eq!(text.iter().filter(|line| **line == "la $a0, newline").count(), 3);
  }

  #[test]
  fn unresolved_names_are_reported_and_skipped() {
    let (asm, issues) = compile("print(undefined_call(1))\nreturn 5\n");
    assert_eq!(
      issues,
      vec![
        CodegenIssue::UnknownFunction {
          name: "undefined_call".into()
        },
        CodegenIssue::ReturnOutsideFunction,
      ]
    );
    assert!(!asm.contains("jal"));
    assert!(!asm.contains("$a0, newline"));
  }

  #[test]
  fn functions_are_not_variables() {
    let (_, issues) = compile("def f():\n\treturn 1\nx = f\n");
    assert_eq!(issues, vec![CodegenIssue::NotAVariable { name: "f".into() }]);
  }

  #[test]
  fn oversized_integers_are_reported() {
    let (asm, issues) = compile("x = 99999999999\n");
    assert_eq!(
      issues,
      vec![CodegenIssue::InvalidInteger {
        text: "99999999999".into()
      }]
    );
    assert!(!asm.contains("sw"));
  }

  #[test]
  fn duplicate_function_is_emitted_once() {
    let (asm, issues) = compile("def f():\n\treturn 1\ndef f():\n\treturn 2\n");
    assert_eq!(issues, vec![CodegenIssue::DuplicateFunction { name: "f".into() }]);
    assert_eq!(asm.matches("\nf:\n").count(), 1);
    assert!(asm.contains("li $t0, 1"));
    assert!(!asm.contains("li $t0, 2"));
  }

  #[test]
  fn collection_is_idempotent() {
    let tree = program("s = \"a\"\nt = \"b\"\nu = \"a\"\nprint(x)\n");
    let mut generator = Generator::new();
    generator.collect_symbols(&tree);
    let snapshot = |g: &Generator| {
      let globals: Vec<_> = g.globals().map(|s| (s.name.clone(), s.ty)).collect();
      let strings: Vec<_> = g
        .string_literals()
        .map(|(label, text)| (label, text.to_string()))
        .collect();
      (globals, strings)
    };
    let first = snapshot(&generator);
    generator.collect_symbols(&tree);
    assert_eq!(snapshot(&generator), first);
    assert_eq!(first.1.len(), 2);
    assert_eq!(first.0.len(), 4);
  }

  #[test]
  fn generate_resets_state_between_runs() {
    let tree = program("if x > 0:\n\ty = 1\n");
    let mut generator = Generator::new();
    let first = generator.generate(&tree);
    let second = generator.generate(&tree);
    assert_eq!(first, second);
    assert!(second.contains("if_true_1:"));
  }

  #[test]
  fn parameters_shadow_globals() {
    let (asm, issues) = compile("a = 1\ndef f(a):\n\treturn a\nprint(f(a))\n");
    assert!(issues.is_empty(), "{issues:?}");
    assert!(asm.contains("lw $t0, -20($fp)"));
    assert!(asm.contains("lw $t0, a"));
  }

  fn global_types(generator: &Generator) -> Vec<(String, SymbolType)> {
    generator
      .globals()
      .map(|symbol| (symbol.name.clone(), symbol.ty))
      .collect()
  }

  #[test]
  fn copy_before_the_literal_assignment_is_a_string() {
    let tree = program("t = s\ns = \"a\"\n");
    let mut generator = Generator::new();
    generator.collect_symbols(&tree);
    let first = global_types(&generator);
    assert_eq!(
      first,
      vec![
        ("s".to_string(), SymbolType::String),
        ("t".to_string(), SymbolType::String)
      ]
    );
    generator.collect_symbols(&tree);
    assert_eq!(global_types(&generator), first);
  }

  #[test]
  fn string_type_flows_through_copy_chains() {
    let tree = program("u = t\nt = s\ns = \"a\"\nn = 1\n");
    let mut generator = Generator::new();
    generator.collect_symbols(&tree);
    let strings: Vec<_> = global_types(&generator)
      .into_iter()
      .filter(|(_, ty)| *ty == SymbolType::String)
      .map(|(name, _)| name)
      .collect();
    assert_eq!(strings, vec!["t", "u", "s"]);
  }

  #[test]
  fn loop_prints_forward_copied_string_as_string() {
    let (asm, issues) = compile("while i < 2:\n\tif i > 0:\n\t\tprint(t)\n\tt = s\n\ts = \"hi\"\n");
    assert!(issues.is_empty(), "{issues:?}");
    let text = text_section(&asm);
    let expected = ["lw $t0, t", "move $a0, $t0", "li $v0, 4", "syscall"];
    assert!(
      text.windows(expected.len()).any(|window| window == expected),
      "{text:#?}"
    );
  }

  #[test]
  fn functions_are_recorded_in_the_global_scope() {
    let mut generator = Generator::new();
    generator.collect_symbols(&program("def add(a, b):\n\treturn a + b\nx = add(1, 2)\n"));
    let table = generator.symbols();
    let add = table.lookup(table.global(), "add");
    assert_eq!(
      add.map(|symbol| (symbol.ty, symbol.params.clone())),
      Some((SymbolType::Function, vec!["a".to_string(), "b".to_string()]))
    );
    assert!(table.lookup(table.global(), "a").is_none());
    assert_eq!(generator.globals().count(), 1);
  }
}
