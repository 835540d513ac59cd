//! LT64 stack machine interpreter.
//!
//! A 16-bit word VM. The loaded program image, a scratch buffer, and a
//! free data region share one 64K-word memory; a data stack and a return
//! stack drive a one-word instruction set with word, double-word, and
//! fixed-point arithmetic, packed-character strings, and line-oriented
//! host I/O. [`Lt64::run`] dispatches one instruction at a time until a
//! `HALT` or a structural fault.

mod console;
mod debug;
mod execute;
mod fault;
mod machine;
mod opcode;
mod packing;

pub use console::{BufferConsole, Console, StdConsole};
pub use fault::{Fault, LoadError};
pub use machine::{
    BUFFER_SIZE, DEFAULT_SCALE, END_MEMORY, END_RETURN, END_STACK, Lt64, Options, SCALES,
};
pub use opcode::Opcode;
pub use packing::{get_dword, high_byte, low_byte, pack, set_dword, string_length};
