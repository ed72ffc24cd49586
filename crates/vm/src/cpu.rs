//! Defines the [`Cpu`] type, responsible for describing the state of the CPU.
//!
//! More information in the documentation for [`Cpu`].

use std::fmt;

use bitflags::bitflags;

use crate::error::Error;

/// The number of general purpose registers.
pub const REGISTER_COUNT: usize = 8;

/// The index of the register holding the **Stack Pointer**.
pub const SP: u8 = 7;

/// The initial value of the **Stack Pointer**.
///
/// The stack grows downward, so the first pushed value lands at `STACK_TOP - 1`.
pub const STACK_TOP: u8 = 0xF4;

/// The Central Processing Unit (CPU) responsible for executing LS-8 instructions.
///
/// By itself, a [`Cpu`] is not enough to execute a program. In order to do anything useful, it
/// has to be connected to a [`Memory`](crate::memory::Memory).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cpu {
    /// The Program Counter of the CPU, pointing to the next instruction to be fetched from
    /// memory.
    ///
    /// The Program Counter is wider than the addressable memory: an instruction at the very end
    /// of memory may move it past the last cell. The next fetch then fails with
    /// [`Error::ProgramCounterLost`].
    pub pc: usize,
    /// The general purpose registers.
    pub registers: Registers,
    /// The condition flags, as set by the last comparison.
    pub flags: Flags,
}

impl Default for Cpu {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// Creates a new [`Cpu`] in its power-on state.
    pub const fn new() -> Self {
        Self {
            pc: 0,
            registers: Registers::new(),
            flags: Flags::empty(),
        }
    }
}

/// The register file of the CPU.
///
/// Register `R7` is reserved for the **Stack Pointer** and starts at [`STACK_TOP`]. All other
/// registers start zeroed.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Registers([u8; REGISTER_COUNT]);

impl Default for Registers {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    /// Creates a new register file in its power-on state.
    pub const fn new() -> Self {
        let mut regs = [0; REGISTER_COUNT];
        regs[SP as usize] = STACK_TOP;
        Self(regs)
    }

    /// Returns the value of register `index`.
    #[inline]
    pub fn get(&self, index: u8) -> Result<u8, Error> {
        self.0
            .get(index as usize)
            .copied()
            .ok_or(Error::InvalidRegister { index })
    }

    /// Sets the value of register `index`.
    #[inline]
    pub fn set(&mut self, index: u8, value: u8) -> Result<(), Error> {
        let reg = self
            .0
            .get_mut(index as usize)
            .ok_or(Error::InvalidRegister { index })?;
        *reg = value;
        Ok(())
    }

    /// Returns the current value of the **Stack Pointer**.
    #[inline(always)]
    pub const fn sp(&self) -> u8 {
        self.0[SP as usize]
    }

    /// Sets the value of the **Stack Pointer**.
    #[inline(always)]
    pub fn set_sp(&mut self, value: u8) {
        self.0[SP as usize] = value;
    }

    /// Returns the raw values of all registers.
    #[inline(always)]
    pub const fn as_array(&self) -> &[u8; REGISTER_COUNT] {
        &self.0
    }
}

impl fmt::Debug for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

bitflags! {
    /// The condition flags of the CPU.
    ///
    /// Only the comparison instruction writes to this register, and it always sets exactly one
    /// of the three bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flags: u8 {
        /// The two compared values were equal.
        const EQUAL = 1 << 0;
        /// The first compared value was greater than the second.
        const GREATER = 1 << 1;
        /// The first compared value was less than the second.
        const LESS = 1 << 2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_on_state() {
        let cpu = Cpu::new();
        assert_eq!(cpu.pc, 0);
        assert_eq!(cpu.flags, Flags::empty());
        assert_eq!(cpu.registers.as_array(), &[0, 0, 0, 0, 0, 0, 0, 0xF4]);
        assert_eq!(cpu.registers.sp(), STACK_TOP);
    }

    #[test]
    fn register_bounds() {
        let mut regs = Registers::new();
        regs.set(3, 99).unwrap();
        assert_eq!(regs.get(3).unwrap(), 99);
        assert!(matches!(regs.get(8), Err(Error::InvalidRegister { index: 8 })));
        assert!(matches!(regs.set(255, 1), Err(Error::InvalidRegister { index: 255 })));
    }

    #[test]
    fn flag_bits() {
        assert_eq!(Flags::EQUAL.bits(), 0b001);
        assert_eq!(Flags::GREATER.bits(), 0b010);
        assert_eq!(Flags::LESS.bits(), 0b100);
    }
}
