//! Defines the [`Instruction`] type, responsible for representing the opcode byte of a single
//! LS-8 instruction.
//!
//! # Encoding
//!
//! An instruction is one opcode byte followed by zero, one or two operand bytes. The opcode byte
//! describes itself through fixed bit positions:
//!
//! ```text
//! AABCDDDD
//! ||||└┴┴┴── instruction identifier
//! |||└────── the instruction sets the program counter
//! ||└─────── the instruction is handled by the ALU
//! └┴──────── number of operands
//! ```

use std::fmt;

/// An operation carried out by the ALU.
///
/// Both operands of an ALU operation are register indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AluOp {
    /// `reg[a] = reg[a] + reg[b]`, wrapping.
    Add = 0b1010_0000,
    /// `reg[a] = reg[a] * reg[b]`, wrapping.
    Mul = 0b1010_0010,
    /// Compares `reg[a]` with `reg[b]` and sets the flags accordingly.
    Cmp = 0b1010_0111,
}

impl AluOp {
    /// Returns the assembly mnemonic of the operation.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Mul => "MUL",
            Self::Cmp => "CMP",
        }
    }
}

impl TryFrom<u8> for AluOp {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0b1010_0000 => Ok(Self::Add),
            0b1010_0010 => Ok(Self::Mul),
            0b1010_0111 => Ok(Self::Cmp),
            _ => Err(value),
        }
    }
}

/// An instruction carried out by a dedicated handler rather than by the ALU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Halts the CPU.
    Hlt = 0b0000_0001,
    /// Loads the immediate `b` into register `a`.
    Ldi = 0b1000_0010,
    /// Prints the value of register `a` in decimal.
    Prn = 0b0100_0111,
    /// Pushes the value of register `a` on the stack.
    Push = 0b0100_0101,
    /// Pops the top of the stack into register `a`.
    Pop = 0b0100_0110,
    /// Jumps to the address stored in register `a`.
    Jmp = 0b0101_0100,
    /// Jumps to the address stored in register `a` if the equal flag is set.
    Jeq = 0b0101_0101,
    /// Jumps to the address stored in register `a` if the equal flag is clear.
    Jne = 0b0101_0110,
}

impl Opcode {
    /// Returns the assembly mnemonic of the instruction.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Hlt => "HLT",
            Self::Ldi => "LDI",
            Self::Prn => "PRN",
            Self::Push => "PUSH",
            Self::Pop => "POP",
            Self::Jmp => "JMP",
            Self::Jeq => "JEQ",
            Self::Jne => "JNE",
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0b0000_0001 => Ok(Self::Hlt),
            0b1000_0010 => Ok(Self::Ldi),
            0b0100_0111 => Ok(Self::Prn),
            0b0100_0101 => Ok(Self::Push),
            0b0100_0110 => Ok(Self::Pop),
            0b0101_0100 => Ok(Self::Jmp),
            0b0101_0101 => Ok(Self::Jeq),
            0b0101_0110 => Ok(Self::Jne),
            _ => Err(value),
        }
    }
}

/// The operation an opcode byte decodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// The instruction is carried out by the ALU.
    Alu(AluOp),
    /// The instruction is carried out by a dedicated handler.
    Handler(Opcode),
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alu(op) => f.write_str(op.mnemonic()),
            Self::Handler(op) => f.write_str(op.mnemonic()),
        }
    }
}

/// The opcode byte of a single LS-8 instruction.
///
/// The properties exposed by this type are read straight from the bits of the byte, whether or
/// not the byte is a known instruction.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction(pub u8);

impl Instruction {
    /// Returns the number of operand bytes following the opcode.
    #[inline(always)]
    pub const fn operand_count(&self) -> usize {
        (self.0 >> 6) as usize
    }

    /// Returns the total size of the instruction in memory, opcode included.
    #[inline(always)]
    pub const fn size(&self) -> usize {
        1 + self.operand_count()
    }

    /// Returns whether the instruction is handled by the ALU.
    #[inline(always)]
    pub const fn is_alu(&self) -> bool {
        (self.0 >> 5) & 1 == 1
    }

    /// Returns whether the instruction is marked as setting the program counter.
    ///
    /// The execution loop does not rely on this bit: jump handlers write the program counter
    /// directly.
    #[inline(always)]
    pub const fn sets_pc(&self) -> bool {
        (self.0 >> 4) & 1 == 1
    }

    /// Returns the instruction identifier, stored in the low nibble.
    #[inline(always)]
    pub const fn identifier(&self) -> u8 {
        self.0 & 0x0F
    }

    /// Decodes the operation of the instruction.
    ///
    /// Returns `None` if the byte is not a known instruction of its category.
    pub fn operation(&self) -> Option<Operation> {
        if self.is_alu() {
            AluOp::try_from(self.0).ok().map(Operation::Alu)
        } else {
            Opcode::try_from(self.0).ok().map(Operation::Handler)
        }
    }
}

impl From<Opcode> for Instruction {
    #[inline(always)]
    fn from(value: Opcode) -> Self {
        Self(value as u8)
    }
}

impl From<AluOp> for Instruction {
    #[inline(always)]
    fn from(value: AluOp) -> Self {
        Self(value as u8)
    }
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instruction")
            .field("operand_count", &self.operand_count())
            .field("is_alu", &self.is_alu())
            .field("sets_pc", &self.sets_pc())
            .field("identifier", &self.identifier())
            .field("operation", &self.operation())
            .finish()
    }
}
