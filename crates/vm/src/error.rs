//! Defines the [`Error`] type of the crate.

use std::io;

use thiserror::Error;

use crate::program::LoadError;

/// An error that might occur when executing an LS-8 program.
///
/// Every error is fatal: the virtual machine has no way to recover from any of them and the
/// state it is left in should only be used for diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    /// The program could not be loaded into memory.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The **Program Counter** points outside of memory.
    ///
    /// This happens when execution advances past the last cell of memory.
    #[error("program counter lost at {pc:#04x}: outside of memory")]
    ProgramCounterLost {
        /// The offending value of the **Program Counter**.
        pc: usize,
    },
    /// A memory access referenced an address outside of memory.
    #[error("memory address {address:#04x} is out of bounds")]
    AddressOutOfBounds {
        /// The address that was accessed.
        address: usize,
    },
    /// An operand referenced a register that does not exist.
    #[error("register index {index} is out of bounds")]
    InvalidRegister {
        /// The index of the register that was accessed.
        index: u8,
    },

    // Decoding errors.
    //
    /// The fetched byte does not match any instruction known by the virtual machine.
    #[error("unknown opcode {opcode:#010b} at {pc:#04x}")]
    UnknownOpcode {
        /// The byte that was fetched.
        opcode: u8,
        /// The address the byte was fetched from.
        pc: usize,
    },
    /// The fetched byte is marked as an ALU operation, but the ALU does not support it.
    #[error("unsupported ALU operation {opcode:#010b} at {pc:#04x}")]
    UnsupportedAluOperation {
        /// The byte that was fetched.
        opcode: u8,
        /// The address the byte was fetched from.
        pc: usize,
    },

    /// The output sink or the trace writer failed.
    #[error("failed to write program output")]
    Output(#[from] io::Error),
    /// The program executed the maximum number of allowed instructions without halting.
    #[error("step limit of {limit} instructions reached before halting")]
    StepLimitExceeded {
        /// The configured limit.
        limit: u64,
    },
}
