//! Defines the [`Memory`] type, responsible for representing the memory of an LS-8 virtual
//! machine.
//!
//! # Layout
//!
//! The memory is a flat array of [`MEMORY_SIZE`] bytes. Programs are installed starting at
//! address `0`, and the stack grows downward from [`STACK_TOP`](crate::cpu::STACK_TOP).
//!
//! Unlike the registers, addresses are not truncated to eight bits by the memory itself. Any
//! access outside of `0..MEMORY_SIZE` is reported as an error instead of silently wrapping.

use std::fmt;

use crate::error::Error;

/// The number of bytes addressable by the virtual machine.
pub const MEMORY_SIZE: usize = 256;

/// Represents the memory of the LS-8 virtual machine.
///
/// More information on memory can be found in [module-level documentation](self).
#[derive(Clone, PartialEq, Eq)]
pub struct Memory {
    /// The cells of the memory. They all start zeroed.
    cells: [u8; MEMORY_SIZE],
}

impl Default for Memory {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Creates a new zeroed [`Memory`].
    pub const fn new() -> Self {
        Self {
            cells: [0; MEMORY_SIZE],
        }
    }

    /// Returns the byte at `address`, or `None` if the address is outside of memory.
    #[inline(always)]
    pub fn get(&self, address: usize) -> Option<u8> {
        self.cells.get(address).copied()
    }

    /// Reads the byte at `address`.
    ///
    /// This is the *memory address register* / *memory data register* pair of the machine: the
    /// address goes in, the data comes out.
    #[inline]
    pub fn read(&self, address: usize) -> Result<u8, Error> {
        self.get(address).ok_or(Error::AddressOutOfBounds { address })
    }

    /// Writes `value` at `address`.
    #[inline]
    pub fn write(&mut self, address: usize, value: u8) -> Result<(), Error> {
        let cell = self
            .cells
            .get_mut(address)
            .ok_or(Error::AddressOutOfBounds { address })?;
        *cell = value;
        Ok(())
    }

    /// Copies `bytes` into memory, starting at address `0`.
    ///
    /// Fails without modifying anything if `bytes` does not fit in memory.
    pub fn install(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let region = self
            .cells
            .get_mut(..bytes.len())
            .ok_or(Error::AddressOutOfBounds {
                address: MEMORY_SIZE,
            })?;
        region.copy_from_slice(bytes);
        Ok(())
    }

    /// Returns the whole content of the memory.
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8; MEMORY_SIZE] {
        &self.cells
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let used = self.cells.iter().filter(|&&b| b != 0).count();
        f.debug_struct("Memory")
            .field("non_zero_cells", &used)
            .finish_non_exhaustive()
    }
}
