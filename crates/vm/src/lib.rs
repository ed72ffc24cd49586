//! # LS-8
//!
//! An interpreter for the LS-8, an eight-bit virtual CPU with eight registers, 256 bytes of
//! memory and a handful of instructions.
//!
//! # Usage
//!
//! ```
//! use ls8_vm::program::Program;
//! use ls8_vm::trace::NoopTrace;
//! use ls8_vm::Vm;
//!
//! let program = Program::parse(
//!     "10000010 # LDI R0,8\n00000000\n00001000\n01000111 # PRN R0\n00000000\n00000001 # HLT\n",
//! )?;
//!
//! let mut vm = Vm::new();
//! vm.load(&program)?;
//!
//! let mut out = Vec::new();
//! vm.run(&mut out, &mut NoopTrace)?;
//! assert_eq!(out, b"8\n");
//! # Ok::<(), ls8_vm::error::Error>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

use std::io::Write;

use cpu::{Cpu, Flags};
use error::Error;
use instr::{Instruction, Opcode, Operation};
use memory::Memory;
use program::Program;
use trace::Trace;

pub mod alu;
pub mod cpu;
pub mod error;
pub mod instr;
pub mod memory;
pub mod program;
pub mod trace;

/// Contains the full state of an LS-8 virtual machine.
///
/// # Components
///
/// The [`Vm`] is composed of two main components:
///
/// - [`Cpu`]: The central processing unit of the virtual machine, holding the program counter,
///   the registers and the flags.
///
/// - [`Memory`]: The memory associated with the virtual machine. Instructions and the stack
///   are stored here.
///
/// # States
///
/// A freshly created [`Vm`] is running. It stays so until it executes a `HLT` instruction, after
/// which it never fetches anything again. Errors are fatal but leave the machine in the state it
/// was in when the error happened, for inspection.
#[derive(Debug, Clone)]
pub struct Vm {
    /// The central processing unit of the virtual machine.
    cpu: Cpu,
    /// The memory associated with the virtual machine.
    memory: Memory,
    /// Whether the machine still fetches instructions.
    running: bool,
    /// The maximum number of instructions [`Vm::run`] may execute.
    step_limit: Option<u64>,
}

impl Default for Vm {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl Vm {
    /// Creates a new [`Vm`] with zeroed memory and registers in their power-on state.
    pub const fn new() -> Self {
        Self {
            cpu: Cpu::new(),
            memory: Memory::new(),
            running: true,
            step_limit: None,
        }
    }

    /// Returns the current state of the [`Cpu`].
    #[inline(always)]
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// Returns the current state of the [`Memory`].
    #[inline(always)]
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Returns whether the machine has not halted yet.
    #[inline(always)]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Limits the number of instructions a single call to [`Vm::run`] may execute.
    ///
    /// `None` removes the limit.
    pub fn set_step_limit(&mut self, limit: Option<u64>) {
        self.step_limit = limit;
    }

    /// Installs `program` in memory, starting at address `0`.
    pub fn load(&mut self, program: &Program) -> Result<(), Error> {
        self.memory.install(program.as_bytes())?;
        tracing::debug!(len = program.len(), "program loaded");
        Ok(())
    }

    /// Runs the machine until it halts.
    ///
    /// Printed values are written to `out`. Returns the number of executed instructions.
    pub fn run<W, T>(&mut self, out: &mut W, trace: &mut T) -> Result<u64, Error>
    where
        W: ?Sized + Write,
        T: ?Sized + Trace,
    {
        let mut executed = 0u64;

        while self.running {
            if let Some(limit) = self.step_limit {
                if executed >= limit {
                    return Err(Error::StepLimitExceeded { limit });
                }
            }

            self.step(out, trace)?;
            executed += 1;
        }

        tracing::debug!(executed, pc = self.cpu.pc, "halted");
        Ok(executed)
    }

    /// Advances the virtual machine by a single instruction, tracing events using the provided
    /// [`Trace`] implementation.
    ///
    /// Does nothing if the machine has halted.
    pub fn step<W, T>(&mut self, out: &mut W, trace: &mut T) -> Result<(), Error>
    where
        W: ?Sized + Write,
        T: ?Sized + Trace,
    {
        if !self.running {
            return Ok(());
        }

        trace.step(&self.cpu, &self.memory)?;

        let pc = self.cpu.pc;
        let (instruction, [a, b]) = fetch_instruction(&self.cpu, &self.memory)?;

        // The program counter moves past the instruction before it executes. Jumps overwrite
        // it afterwards.
        self.cpu.pc = pc + instruction.size();

        let operation = decode(instruction, pc)?;
        tracing::trace!(
            pc,
            %operation,
            a,
            b,
            sets_pc = instruction.sets_pc(),
            "execute"
        );

        match operation {
            Operation::Alu(op) => alu::execute(op, &mut self.cpu, a, b),
            Operation::Handler(op) => self.handle(op, a, b, out),
        }
    }

    /// Executes a non-ALU instruction.
    fn handle<W>(&mut self, op: Opcode, a: u8, b: u8, out: &mut W) -> Result<(), Error>
    where
        W: ?Sized + Write,
    {
        match op {
            Opcode::Hlt => self.running = false,
            Opcode::Ldi => self.cpu.registers.set(a, b)?,
            Opcode::Prn => writeln!(out, "{}", self.cpu.registers.get(a)?)?,
            Opcode::Push => push(&mut self.cpu, &mut self.memory, a)?,
            Opcode::Pop => pop(&mut self.cpu, &self.memory, a)?,
            Opcode::Jmp => jump_if(&mut self.cpu, a, true)?,
            Opcode::Jeq => {
                let equal = self.cpu.flags.contains(Flags::EQUAL);
                jump_if(&mut self.cpu, a, equal)?;
            }
            Opcode::Jne => {
                let equal = self.cpu.flags.contains(Flags::EQUAL);
                jump_if(&mut self.cpu, a, !equal)?;
            }
        }

        Ok(())
    }
}

/// Fetches the instruction referenced by the **Program Counter** of the [`Cpu`], along with the
/// two bytes that follow it.
///
/// Both following bytes are always fetched, regardless of how many operands the instruction
/// declares; instructions simply ignore the ones they don't use. Undeclared operands that would
/// lie past the end of memory read as zero. Declared ones are an error.
#[inline]
fn fetch_instruction(cpu: &Cpu, memory: &Memory) -> Result<(Instruction, [u8; 2]), Error> {
    let instruction = memory
        .get(cpu.pc)
        .map(Instruction)
        .ok_or(Error::ProgramCounterLost { pc: cpu.pc })?;

    let mut operands = [0u8; 2];
    for (i, operand) in operands.iter_mut().enumerate() {
        let address = cpu.pc + 1 + i;
        *operand = match memory.get(address) {
            Some(byte) => byte,
            None if i < instruction.operand_count() => {
                return Err(Error::AddressOutOfBounds { address });
            }
            None => 0,
        };
    }

    Ok((instruction, operands))
}

/// Determines which operation an instruction fetched at `pc` carries out.
#[inline]
fn decode(instruction: Instruction, pc: usize) -> Result<Operation, Error> {
    match instruction.operation() {
        Some(operation) => Ok(operation),
        None if instruction.is_alu() => Err(Error::UnsupportedAluOperation {
            opcode: instruction.0,
            pc,
        }),
        None => Err(Error::UnknownOpcode {
            opcode: instruction.0,
            pc,
        }),
    }
}

/// Decrements the **Stack Pointer**, then stores register `reg` at its new location.
///
/// `reg` is read after the decrement, so pushing the stack pointer stores its new value.
fn push(cpu: &mut Cpu, memory: &mut Memory, reg: u8) -> Result<(), Error> {
    cpu.registers.get(reg)?;

    let sp = cpu.registers.sp().wrapping_sub(1);
    cpu.registers.set_sp(sp);

    let value = cpu.registers.get(reg)?;
    memory.write(sp as usize, value)
}

/// Loads the value at the **Stack Pointer** into register `reg`, then increments the
/// **Stack Pointer**.
fn pop(cpu: &mut Cpu, memory: &Memory, reg: u8) -> Result<(), Error> {
    let sp = cpu.registers.sp();
    let value = memory.read(sp as usize)?;
    cpu.registers.set(reg, value)?;

    // Popping into the stack pointer itself increments the popped value.
    let sp = cpu.registers.sp().wrapping_add(1);
    cpu.registers.set_sp(sp);
    Ok(())
}

/// Sets the **Program Counter** to the address held in register `reg` if `condition` holds.
fn jump_if(cpu: &mut Cpu, reg: u8, condition: bool) -> Result<(), Error> {
    let target = cpu.registers.get(reg)?;
    if condition {
        cpu.pc = target as usize;
    }
    Ok(())
}
