//! Defines the [`Program`] type, the raw bytes of an LS-8 program ready to be installed in
//! memory.
//!
//! # Source Format
//!
//! Programs are stored as text, one byte per line, written as a binary literal. A `#` starts a
//! comment running to the end of the line. Blank lines and comment-only lines are skipped.
//!
//! ```text
//! # Print the number 8
//! 10000010 # LDI R0,8
//! 00000000
//! 00001000
//! 01000111 # PRN R0
//! 00000000
//! 00000001 # HLT
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::memory::MEMORY_SIZE;

/// An error that might occur when loading a [`Program`].
#[derive(Debug, Error)]
pub enum LoadError {
    /// The program file could not be read.
    #[error("failed to read program `{}`", .path.display())]
    Io {
        /// The path of the program file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// A line did not contain a binary byte literal.
    #[error("line {line}: `{text}` is not a binary byte literal")]
    InvalidLine {
        /// The 1-based number of the offending line.
        line: usize,
        /// The content of the line, comment stripped.
        text: String,
    },
    /// The program does not fit in memory.
    #[error("program is {len} bytes long but memory only holds {}", MEMORY_SIZE)]
    TooLarge {
        /// The size of the program, in bytes.
        len: usize,
    },
}

/// The bytes of an LS-8 program.
///
/// A [`Program`] is always small enough to fit in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    bytes: Vec<u8>,
}

impl Program {
    /// Creates a [`Program`] from raw bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, LoadError> {
        let bytes = bytes.into();

        if bytes.len() > MEMORY_SIZE {
            return Err(LoadError::TooLarge { len: bytes.len() });
        }

        Ok(Self { bytes })
    }

    /// Parses a [`Program`] from its text source.
    ///
    /// More information on the format in the [module-level documentation](self).
    pub fn parse(source: &str) -> Result<Self, LoadError> {
        let mut bytes = Vec::new();

        for (index, line) in source.lines().enumerate() {
            let code = match line.find('#') {
                Some(comment) => &line[..comment],
                None => line,
            };
            let code = code.trim();

            if code.is_empty() {
                continue;
            }

            let byte = u8::from_str_radix(code, 2).map_err(|_| LoadError::InvalidLine {
                line: index + 1,
                text: code.to_owned(),
            })?;
            bytes.push(byte);
        }

        Self::from_bytes(bytes)
    }

    /// Reads and parses the program stored at `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_owned(),
            source,
        })?;

        let program = Self::parse(&source)?;
        tracing::debug!(path = %path.display(), len = program.len(), "parsed program");
        Ok(program)
    }

    /// Returns the bytes of the program.
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the size of the program, in bytes.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns whether the program is empty.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const PRINT8: &str = "\
# print8.ls8: Print the number 8 on the screen

10000010 # LDI R0,8
00000000
00001000
01000111 # PRN R0
00000000
00000001 # HLT
";

    #[test]
    fn parse_with_comments() {
        let program = Program::parse(PRINT8).unwrap();
        assert_eq!(
            program.as_bytes(),
            &[0b1000_0010, 0, 8, 0b0100_0111, 0, 0b0000_0001]
        );
    }

    #[test]
    fn skips_blank_and_indented_lines() {
        let program = Program::parse("\n   \n  00000001   \n\t# nothing\n").unwrap();
        assert_eq!(program.as_bytes(), &[1]);
    }

    #[test]
    fn empty_source() {
        let program = Program::parse("# only a comment\n").unwrap();
        assert!(program.is_empty());
    }

    #[test]
    fn invalid_line() {
        let err = Program::parse("00000001\n00000002 # not binary\n").unwrap_err();
        match err {
            LoadError::InvalidLine { line, text } => {
                assert_eq!(line, 2);
                assert_eq!(text, "00000002");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn literal_wider_than_a_byte() {
        assert!(matches!(
            Program::parse("100000000"),
            Err(LoadError::InvalidLine { line: 1, .. })
        ));
    }

    #[test]
    fn too_large() {
        let source = "00000000\n".repeat(MEMORY_SIZE + 1);
        assert!(matches!(
            Program::parse(&source),
            Err(LoadError::TooLarge { len: 257 })
        ));
        assert!(Program::from_bytes(vec![0; MEMORY_SIZE]).is_ok());
    }

    #[test]
    fn missing_file() {
        let err = Program::from_file("/definitely/not/a/program.ls8").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/a/program.ls8"));
    }
}
