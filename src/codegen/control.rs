//! `if`/`while` lowering and branch selection for conditions.
//!
//! Every construct takes three labels from the generator's counter. A
//! condition branches to the false (or end) label when it does not hold and
//! otherwise falls through into the body.

use crate::ast::{BinaryOp, Expr, Stmt};
use crate::symbol::ScopeKind;

use super::Generator;

/// How a comparison jumps away when it is false: whether `slt` takes the
/// operands swapped, and the branch that tests the result against zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Test {
  SetLess { swap: bool, branch: Branch },
  Difference { branch: Branch },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
  IfZero,
  IfNonZero,
}

impl Branch {
  fn mnemonic(self) -> &'static str {
    match self {
      Branch::IfZero => "beq",
      Branch::IfNonZero => "bne",
    }
  }
}

fn branch_test(op: BinaryOp) -> Option<Test> {
  let test = match op {
    BinaryOp::Lt => Test::SetLess {
      swap: false,
      branch: Branch::IfZero,
    },
    BinaryOp::Gt => Test::SetLess {
      swap: true,
      branch: Branch::IfZero,
    },
    BinaryOp::Le => Test::SetLess {
      swap: true,
      branch: Branch::IfNonZero,
    },
    BinaryOp::Ge => Test::SetLess {
      swap: false,
      branch: Branch::IfNonZero,
    },
    BinaryOp::Eq => Test::Difference {
      branch: Branch::IfNonZero,
    },
    BinaryOp::Ne => Test::Difference {
      branch: Branch::IfZero,
    },
    BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul => return None,
  };
  Some(test)
}

impl Generator {
  pub(super) fn next_label(&mut self, prefix: &str) -> String {
    self.labels += 1;
    format!("{prefix}_{}", self.labels)
  }

  pub(super) fn emit_if(
    &mut self,
    condition: &Expr,
    consequence: &[Stmt],
    alternative: Option<&[Stmt]>,
  ) {
    let if_true = self.next_label("if_true");
    let if_false = self.next_label("if_false");
    let if_end = self.next_label("if_end");

    self.emit_condition(condition, &if_false);
    self.out.push_str(&format!("{if_true}:\n"));
    self.emit_block(consequence, ScopeKind::If);
    self.out.push_str(&format!("    j {if_end}\n"));

    self.out.push_str(&format!("{if_false}:\n"));
    if let Some(alternative) = alternative {
      self.emit_block(alternative, ScopeKind::If);
    }
    self.out.push_str(&format!("{if_end}:\n"));
    self.registers.clear();
  }

  pub(super) fn emit_while(&mut self, condition: &Expr, body: &[Stmt]) {
    let start = self.next_label("while_start");
    let body_label = self.next_label("while_body");
    let end = self.next_label("while_end");

    self.out.push_str(&format!("{start}:\n"));
    self.emit_condition(condition, &end);
    self.out.push_str(&format!("{body_label}:\n"));
    self.emit_block(body, ScopeKind::While);
    self.out.push_str(&format!("    j {start}\n"));
    self.out.push_str(&format!("{end}:\n"));
    self.registers.clear();
  }

  /// Jump to `false_label` unless `condition` holds. A condition that cannot
  /// be lowered always jumps.
  fn emit_condition(&mut self, condition: &Expr, false_label: &str) {
    if let Expr::Binary { left, op, right } = condition
      && let Some(test) = branch_test(*op)
    {
      let Some((left, right)) = self.emit_operands(left, right) else {
        self.out.push_str(&format!("    j {false_label}\n"));
        return;
      };
      let result = self.registers.allocate();
      let branch = match test {
        Test::SetLess { swap, branch } => {
          let (a, b) = if swap { (right, left) } else { (left, right) };
          self.out.push_str(&format!("    slt {result}, {a}, {b}\n"));
          branch
        }
        Test::Difference { branch } => {
          self.out.push_str(&format!("    sub {result}, {left}, {right}\n"));
          branch
        }
      };
      self.out.push_str(&format!(
        "    {} {result}, $zero, {false_label}\n",
        branch.mnemonic()
      ));
      for reg in [left, right, result] {
        self.registers.free(reg);
      }
      return;
    }

    match self.emit_expr(condition) {
      Some(reg) => {
        self
          .out
          .push_str(&format!("    beq {reg}, $zero, {false_label}\n"));
        self.registers.free(reg);
      }
      None => self.out.push_str(&format!("    j {false_label}\n")),
    }
  }
}

#[cfg(test)]
mod tests {
  use crate::codegen::Generator;
  use crate::parser::Parser;

  fn text(source: &str) -> Vec<String> {
    let mut parser = Parser::from_source(source);
    let program = parser.parse_program();
    assert!(parser.errors().is_empty(), "{:?}", parser.errors());
    let asm = Generator::new().generate(&program);
    asm
      .lines()
      .map(str::trim)
      .skip_while(|line| *line != "main:")
      .skip(1)
      .filter(|line| !line.is_empty())
      .map(str::to_string)
      .collect()
  }

  #[test]
  fn if_else_uses_three_distinct_labels() {
    assert_eq!(
      text("if x > 0: y = 1 else: y = 2"),
      vec![
        "lw $t0, x",
        "li $t1, 0",
        "slt $t2, $t1, $t0",
        "beq $t2, $zero, if_false_2",
        "if_true_1:",
        "li $t0, 1",
        "sw $t0, y",
        "j if_end_3",
        "if_false_2:",
        "li $t0, 2",
        "sw $t0, y",
        "if_end_3:",
        "li $v0, 10",
        "syscall",
      ]
    );
  }

  #[test]
  fn while_loop_branches_to_end() {
    assert_eq!(
      text("while i < 5: i = i + 1"),
      vec![
        "while_start_1:",
        "lw $t0, i",
        "li $t1, 5",
        "slt $t2, $t0, $t1",
        "beq $t2, $zero, while_end_3",
        "while_body_2:",
        "lw $t0, i",
        "li $t1, 1",
        "add $t2, $t0, $t1",
        "sw $t2, i",
        "j while_start_1",
        "while_end_3:",
        "li $v0, 10",
        "syscall",
      ]
    );
  }

  #[test]
  fn ordered_comparisons_swap_operands() {
    let cases = [
      ("if a < b: x = 1", "slt $t2, $t0, $t1", "beq"),
      ("if a > b: x = 1", "slt $t2, $t1, $t0", "beq"),
      ("if a <= b: x = 1", "slt $t2, $t1, $t0", "bne"),
      ("if a >= b: x = 1", "slt $t2, $t0, $t1", "bne"),
      ("if a == b: x = 1", "sub $t2, $t0, $t1", "bne"),
      ("if a != b: x = 1", "sub $t2, $t0, $t1", "beq"),
    ];
    for (source, compare, branch) in cases {
      let lines = text(source);
      assert_eq!(lines[2], compare, "{source}");
      assert_eq!(lines[3], format!("{branch} $t2, $zero, if_false_2"), "{source}");
    }
  }

  #[test]
  fn bare_values_are_tested_against_zero() {
    let lines = text("if flag: x = 1");
    assert_eq!(lines[..2], ["lw $t0, flag", "beq $t0, $zero, if_false_2"]);
  }

  #[test]
  fn unlowerable_condition_jumps_to_false() {
    let lines = text("while missing(1) < 2: x = 1");
    assert_eq!(lines[1], "j while_end_3");
  }

  #[test]
  fn labels_keep_counting_across_constructs() {
    let lines = text("if a: b = 1\nwhile c: d = 1\nif e: f = 1\n");
    for label in ["if_end_3:", "while_start_4:", "while_end_6:", "if_true_7:"] {
      assert!(lines.iter().any(|line| line == label), "{label} in {lines:#?}");
    }
  }
}
