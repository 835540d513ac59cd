//! Host console seam.
//!
//! The interpreter reaches the outside world only through this trait,
//! the way the CPU cores reach memory through a bus. Input is a byte
//! stream with one byte of lookahead so the token readers can stop
//! before a delimiter and leave it for the next read, which is what the
//! line-oriented opcodes depend on.

use std::collections::VecDeque;
use std::io::{self, Read, Write};

/// Program-visible input and output.
pub trait Console {
    /// Consume and return the next input byte, or `None` at end of
    /// input.
    fn read_byte(&mut self) -> Option<u8>;

    /// Return the next input byte without consuming it.
    fn peek_byte(&mut self) -> Option<u8>;

    /// Write text to program output.
    fn print(&mut self, text: &str);

    /// Flush program output.
    fn flush(&mut self);
}

/// Console over the process's stdin and stdout.
#[derive(Debug, Default)]
pub struct StdConsole {
    pending: Option<u8>,
}

impl StdConsole {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_byte() -> Option<u8> {
        let mut buf = [0u8; 1];
        match io::stdin().read(&mut buf) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(buf[0]),
        }
    }
}

impl Console for StdConsole {
    fn read_byte(&mut self) -> Option<u8> {
        self.pending.take().or_else(Self::next_byte)
    }

    fn peek_byte(&mut self) -> Option<u8> {
        if self.pending.is_none() {
            self.pending = Self::next_byte();
        }
        self.pending
    }

    fn print(&mut self, text: &str) {
        print!("{text}");
    }

    fn flush(&mut self) {
        io::stdout().flush().ok();
    }
}

/// In-memory console for driving programs from tests.
#[derive(Debug, Default)]
pub struct BufferConsole {
    input: VecDeque<u8>,
    output: String,
}

impl BufferConsole {
    /// Console whose program will read `input` and then see end of
    /// input.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            input: input.bytes().collect(),
            output: String::new(),
        }
    }

    /// Everything the program has printed so far.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }
}

impl Console for BufferConsole {
    fn read_byte(&mut self) -> Option<u8> {
        self.input.pop_front()
    }

    fn peek_byte(&mut self) -> Option<u8> {
        self.input.front().copied()
    }

    fn print(&mut self, text: &str) {
        self.output.push_str(text);
    }

    fn flush(&mut self) {}
}

/// Consume one pending newline, if any. The debug channel calls this
/// after formatted reads so the line terminator cannot leak into the
/// single-step prompt.
pub(crate) fn drain_newline(console: &mut impl Console) {
    if console.peek_byte() == Some(b'\n') {
        console.read_byte();
    }
}

fn skip_whitespace(console: &mut impl Console) {
    while matches!(console.peek_byte(), Some(b) if b.is_ascii_whitespace()) {
        console.read_byte();
    }
}

/// Read a signed decimal integer the way `scanf("%d")` would: skip
/// whitespace, optional sign, digits, stopping before the first
/// non-digit. `None` means end of input; a token that never produces a
/// digit reads as zero.
pub(crate) fn read_int(console: &mut impl Console) -> Option<i64> {
    skip_whitespace(console);
    console.peek_byte()?;

    let mut negative = false;
    if let Some(sign @ (b'+' | b'-')) = console.peek_byte() {
        console.read_byte();
        negative = sign == b'-';
    }

    let mut value: i64 = 0;
    let mut digits = 0;
    while let Some(b @ b'0'..=b'9') = console.peek_byte() {
        console.read_byte();
        value = value.wrapping_mul(10).wrapping_add(i64::from(b - b'0'));
        digits += 1;
    }
    if digits == 0 {
        return Some(0);
    }
    Some(if negative { value.wrapping_neg() } else { value })
}

/// Read a decimal floating-point number the way `scanf("%lf")` would.
/// `None` means end of input; an unparseable token reads as zero.
pub(crate) fn read_float(console: &mut impl Console) -> Option<f64> {
    skip_whitespace(console);
    console.peek_byte()?;

    let mut text = String::new();
    if let Some(sign @ (b'+' | b'-')) = console.peek_byte() {
        console.read_byte();
        text.push(sign as char);
    }
    if console.peek_byte() == Some(b'.') {
        text.push('0');
    }
    while let Some(b @ b'0'..=b'9') = console.peek_byte() {
        console.read_byte();
        text.push(b as char);
    }
    if console.peek_byte() == Some(b'.') {
        console.read_byte();
        text.push('.');
        while let Some(b @ b'0'..=b'9') = console.peek_byte() {
            console.read_byte();
            text.push(b as char);
        }
    }
    if matches!(console.peek_byte(), Some(b'e' | b'E')) {
        console.read_byte();
        text.push('e');
        if let Some(sign @ (b'+' | b'-')) = console.peek_byte() {
            console.read_byte();
            text.push(sign as char);
        }
        while let Some(b @ b'0'..=b'9') = console.peek_byte() {
            console.read_byte();
            text.push(b as char);
        }
    }

    Some(text.parse().unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_int_skips_whitespace_and_stops_at_delimiter() {
        let mut console = BufferConsole::new("  \n\t-42xyz");
        assert_eq!(read_int(&mut console), Some(-42));
        assert_eq!(console.peek_byte(), Some(b'x'));
    }

    #[test]
    fn read_int_at_end_of_input() {
        let mut console = BufferConsole::new("");
        assert_eq!(read_int(&mut console), None);
        let mut console = BufferConsole::new("   \n");
        assert_eq!(read_int(&mut console), None);
    }

    #[test]
    fn read_int_mismatch_reads_zero() {
        let mut console = BufferConsole::new("abc");
        assert_eq!(read_int(&mut console), Some(0));
        assert_eq!(console.peek_byte(), Some(b'a'));
    }

    #[test]
    fn read_float_accepts_fraction_and_exponent() {
        let mut console = BufferConsole::new("2.5 -0.125 3e2 .5");
        assert_eq!(read_float(&mut console), Some(2.5));
        assert_eq!(read_float(&mut console), Some(-0.125));
        assert_eq!(read_float(&mut console), Some(300.0));
        assert_eq!(read_float(&mut console), Some(0.5));
        assert_eq!(read_float(&mut console), None);
    }

    #[test]
    fn drain_newline_only_eats_newlines() {
        let mut console = BufferConsole::new("\nx");
        drain_newline(&mut console);
        assert_eq!(console.peek_byte(), Some(b'x'));
        drain_newline(&mut console);
        assert_eq!(console.peek_byte(), Some(b'x'));
    }

    #[test]
    fn buffer_console_collects_output() {
        let mut console = BufferConsole::new("");
        console.print("12");
        console.print("3");
        assert_eq!(console.output(), "123");
    }
}
