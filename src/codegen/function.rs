//! Stack frames and the call convention.
//!
//! Frame layout, relative to `$fp` (which points just past the frame):
//!
//! ```text
//!   -4   saved $ra
//!   -8   saved $fp
//!   -12  saved $s0
//!   -16  saved $s1
//!   -20  parameter 0, then one word lower per parameter
//! ```
//!
//! Arguments travel in `$a0`..`$a3`, the result in `$v0`. The caller pushes
//! any temporaries it still holds before the call and pops them afterwards.

use tracing::debug;

use crate::ast::{Expr, FunctionDef};
use crate::error::{TooManyArgumentsSnafu, TooManyParametersSnafu, UnknownFunctionSnafu};
use crate::symbol::{ScopeKind, SymbolType, WORD};

use super::Generator;
use super::registers::Reg;

/// Number of values passed in argument registers.
pub const MAX_ARGS: usize = 4;

const SAVED_AREA: i32 = 16;

/// Frame-pointer offset of the parameter stored at symbol offset `offset`.
pub(super) fn parameter_offset(offset: i32) -> i32 {
  -(SAVED_AREA + WORD + offset)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Frame {
  size: i32,
}

impl Frame {
  /// Saved registers plus one word per parameter, rounded up to 8 bytes.
  pub(super) fn new(params: usize) -> Self {
    let params = i32::try_from(params).unwrap_or(i32::MAX / WORD);
    Self {
      size: (SAVED_AREA + WORD * params + 7) & !7,
    }
  }

  pub(super) fn size(self) -> i32 {
    self.size
  }
}

impl Generator {
  pub(super) fn emit_function(&mut self, def: &FunctionDef) {
    if def.params.len() > MAX_ARGS {
      self.report(
        TooManyParametersSnafu {
          function: &def.name,
          count: def.params.len(),
        }
        .build(),
      );
    }
    // Every declared parameter gets a slot; only the first four arrive in registers.
    let frame = Frame::new(def.params.len());
    let params = &def.params[..def.params.len().min(MAX_ARGS)];
    let size = frame.size();
    debug!(function = %def.name, frame = size, "emitting function");

    let asm = &mut self.out;
    asm.push_str(&format!("{}:\n", def.name));
    asm.push_str(&format!("    addiu $sp, $sp, -{size}\n"));
    asm.push_str(&format!("    sw $ra, {}($sp)\n", size - 4));
    asm.push_str(&format!("    sw $fp, {}($sp)\n", size - 8));
    asm.push_str(&format!("    sw $s0, {}($sp)\n", size - 12));
    asm.push_str(&format!("    sw $s1, {}($sp)\n", size - 16));
    asm.push_str(&format!("    addiu $fp, $sp, {size}\n"));

    let scope = self
      .symbols
      .enter_scope(self.symbols.global(), ScopeKind::Function);
    for (i, param) in params.iter().enumerate() {
      let offset = self.symbols.define(scope, param, SymbolType::Integer).offset;
      self.out.push_str(&format!(
        "    sw $a{i}, {}($fp)\n",
        parameter_offset(offset)
      ));
    }

    let outer = (self.scope, self.frame);
    self.scope = scope;
    self.frame = Some(frame);
    self.emit_statements(&def.body);
    if !def.has_direct_return() {
      self.emit_epilogue(frame);
    }
    (self.scope, self.frame) = outer;
  }

  /// Restore the saved registers, pop the frame, and return to the caller.
  pub(super) fn emit_epilogue(&mut self, frame: Frame) {
    let asm = &mut self.out;
    asm.push_str("    lw $ra, -4($fp)\n");
    asm.push_str("    lw $s0, -12($fp)\n");
    asm.push_str("    lw $s1, -16($fp)\n");
    asm.push_str("    lw $fp, -8($fp)\n");
    asm.push_str(&format!("    addiu $sp, $sp, {}\n", frame.size()));
    asm.push_str("    jr $ra\n");
  }

  /// Returns the register holding the call's result.
  pub(super) fn emit_call(&mut self, name: &str, args: &[Expr]) -> Option<Reg> {
    let callable = self
      .symbols
      .lookup(self.scope, name)
      .is_some_and(|symbol| symbol.ty == SymbolType::Function && !symbol.is_builtin_print);
    if !callable {
      self.report(UnknownFunctionSnafu { name }.build());
      return None;
    }
    if args.len() > MAX_ARGS {
      self.report(
        TooManyArgumentsSnafu {
          function: name,
          count: args.len(),
        }
        .build(),
      );
    }

    let saved = self.registers.live();
    for &reg in &saved {
      self.push(reg);
    }

    let mut values = Vec::with_capacity(MAX_ARGS);
    for arg in args.iter().take(MAX_ARGS) {
      match self.emit_expr(arg) {
        Some(reg) => values.push(reg),
        None => {
          for reg in values {
            self.registers.free(reg);
          }
          self.restore(&saved);
          return None;
        }
      }
    }

    for (i, reg) in values.into_iter().enumerate() {
      self.out.push_str(&format!("    move $a{i}, {reg}\n"));
      self.registers.free(reg);
    }
    self.out.push_str(&format!("    jal {name}\n"));
    self.restore(&saved);

    let dest = self.registers.allocate();
    self.out.push_str(&format!("    move {dest}, $v0\n"));
    Some(dest)
  }

  fn restore(&mut self, saved: &[Reg]) {
    for &reg in saved.iter().rev() {
      self.pop(reg);
    }
  }

  fn push(&mut self, reg: Reg) {
    self.out.push_str(&format!("    addiu $sp, $sp, -{WORD}\n"));
    self.out.push_str(&format!("    sw {reg}, 0($sp)\n"));
  }

  fn pop(&mut self, reg: Reg) {
    self.out.push_str(&format!("    lw {reg}, 0($sp)\n"));
    self.out.push_str(&format!("    addiu $sp, $sp, {WORD}\n"));
  }
}
