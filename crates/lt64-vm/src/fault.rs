//! Fatal execution faults and their process exit codes.

use std::fmt;

/// A structural error caught at the dispatch boundary.
///
/// Each variant carries the offending register so the diagnostic can
/// name it. Semantic errors inside a program (bad addresses, division
/// by zero) are not represented here; the VM does not catch them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Data stack pointer climbed past `END_STACK`.
    DataOverflow { dsp: u16 },
    /// Data stack pointer wrapped below zero.
    DataUnderflow { dsp: u16 },
    /// Return stack pointer climbed past `END_RETURN`.
    ReturnOverflow { rsp: u16 },
    /// Return stack pointer wrapped below zero.
    ReturnUnderflow { rsp: u16 },
    /// Program counter left the program region.
    PcOutOfBounds { pc: u16, bfp: u16 },
    /// The low byte at the program counter is not an opcode.
    UnknownOp { op: u8 },
}

impl Fault {
    /// Process exit code for this fault.
    #[must_use]
    pub fn exit_code(self) -> u8 {
        match self {
            Self::DataOverflow { .. } => 4,
            Self::DataUnderflow { .. } => 5,
            Self::PcOutOfBounds { .. } => 6,
            Self::UnknownOp { .. } => 7,
            Self::ReturnOverflow { .. } => 10,
            Self::ReturnUnderflow { .. } => 11,
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataOverflow { dsp } => write!(f, "stack overflow, dsp: {dsp:04x}"),
            Self::DataUnderflow { dsp } => write!(f, "stack underflow, dsp: {dsp:04x}"),
            Self::ReturnOverflow { rsp } => {
                write!(f, "return stack overflow, rsp: {rsp:04x}")
            }
            Self::ReturnUnderflow { rsp } => {
                write!(f, "return stack underflow, rsp: {rsp:04x}")
            }
            Self::PcOutOfBounds { pc, bfp } => {
                write!(f, "program counter out of bounds, pc: {pc:04x}, bfp: {bfp:04x}")
            }
            Self::UnknownOp { op } => write!(f, "unknown op code: 0x{op:02x}"),
        }
    }
}

impl std::error::Error for Fault {}

/// A rejected program image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadError {
    /// Zero-length image.
    Empty,
    /// Image too large to leave room for the buffer and free memory.
    TooLarge(usize),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "program length is 0"),
            Self::TooLarge(words) => {
                write!(f, "program of {words} words is too large to fit in memory")
            }
        }
    }
}

impl std::error::Error for LoadError {}
