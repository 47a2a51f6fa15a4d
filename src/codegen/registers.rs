//! Bitmap allocator over the ten caller-saved temporaries `$t0`..`$t9`.

use std::fmt;

use tracing::warn;

pub const TEMP_REGISTERS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Reg(u8);

impl Reg {
  pub fn index(self) -> usize {
    usize::from(self.0)
  }
}

impl fmt::Display for Reg {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "$t{}", self.0)
  }
}

/// No spilling: once every register is taken, `allocate` hands out `$t9`
/// again.
#[derive(Debug, Default)]
pub struct RegisterPool {
  used: [bool; TEMP_REGISTERS],
}

impl RegisterPool {
  pub fn allocate(&mut self) -> Reg {
    match self.used.iter().position(|used| !used) {
      Some(slot) => {
        self.used[slot] = true;
        reg(slot)
      }
      None => {
        let last = reg(TEMP_REGISTERS - 1);
        warn!(register = %last, "temporary registers exhausted, reusing");
        last
      }
    }
  }

  pub fn free(&mut self, reg: Reg) {
    if let Some(used) = self.used.get_mut(reg.index()) {
      *used = false;
    }
  }

  pub fn clear(&mut self) {
    self.used = [false; TEMP_REGISTERS];
  }

  /// Registers currently holding a value, lowest first.
  pub fn live(&self) -> Vec<Reg> {
    self
      .used
      .iter()
      .enumerate()
      .filter(|(_, used)| **used)
      .map(|(slot, _)| reg(slot))
      .collect()
  }
}

fn reg(slot: usize) -> Reg {
  // Slots are bounded by TEMP_REGISTERS.
  Reg(slot as u8)
}
