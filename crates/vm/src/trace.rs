//! Defines the [`Trace`] trait, used to gather information about the execution of an LS-8
//! program within the virtual machine.

use std::io::{self, Write};

use crate::cpu::Cpu;
use crate::memory::Memory;

/// A collection of callbacks to be called during the execution of an LS-8 program.
#[allow(unused_variables)]
pub trait Trace {
    /// Called before every instruction fetch, with the state the instruction will execute in.
    fn step(&mut self, cpu: &Cpu, memory: &Memory) -> io::Result<()> {
        Ok(())
    }
}

/// An implementation of [`Trace`] that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTrace;
impl Trace for NoopTrace {}

/// An implementation of [`Trace`] that dumps the state of the machine to a writer before each
/// instruction.
///
/// Each line has the following shape, all numbers in hexadecimal:
///
/// ```text
/// TRACE: 03 | 47 00 01 | 08 00 00 00 00 00 00 F4
///        PC | memory at PC.. | R0 .. R7
/// ```
///
/// Memory cells past the end of memory are displayed as `00`.
#[derive(Debug)]
pub struct WriterTrace<W> {
    writer: W,
}

impl<W: Write> WriterTrace<W> {
    /// Creates a new [`WriterTrace`] writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Trace for WriterTrace<W> {
    fn step(&mut self, cpu: &Cpu, memory: &Memory) -> io::Result<()> {
        let byte = |offset: usize| memory.get(cpu.pc.wrapping_add(offset)).unwrap_or(0);

        write!(
            self.writer,
            "TRACE: {:02X} | {:02X} {:02X} {:02X} |",
            cpu.pc,
            byte(0),
            byte(1),
            byte(2),
        )?;

        for reg in cpu.registers.as_array() {
            write!(self.writer, " {reg:02X}")?;
        }

        writeln!(self.writer)
    }
}
