//! The arithmetic and logic unit.

use std::cmp::Ordering;

use crate::cpu::{Cpu, Flags};
use crate::error::Error;
use crate::instr::AluOp;

/// Executes an ALU operation on registers `a` and `b`.
///
/// Arithmetic wraps around on overflow. Comparisons only ever touch the flags register, and
/// arithmetic never does.
pub fn execute(op: AluOp, cpu: &mut Cpu, a: u8, b: u8) -> Result<(), Error> {
    let lhs = cpu.registers.get(a)?;
    let rhs = cpu.registers.get(b)?;

    match op {
        AluOp::Add => cpu.registers.set(a, lhs.wrapping_add(rhs))?,
        AluOp::Mul => cpu.registers.set(a, lhs.wrapping_mul(rhs))?,
        AluOp::Cmp => cpu.flags = compare(lhs, rhs),
    }

    Ok(())
}

/// Returns the flags describing how `lhs` relates to `rhs`.
#[inline]
pub fn compare(lhs: u8, rhs: u8) -> Flags {
    match lhs.cmp(&rhs) {
        Ordering::Equal => Flags::EQUAL,
        Ordering::Less => Flags::LESS,
        Ordering::Greater => Flags::GREATER,
    }
}
