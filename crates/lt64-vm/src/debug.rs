//! Interactive single-step channel.
//!
//! Enabled by [`Options::debugging`](crate::Options). Before each
//! dispatch the machine dumps both stacks, the program counter, and the
//! next mnemonic to stderr, then waits at a prompt. An empty line steps
//! one instruction; any other input skips ahead until a `BRKPNT`
//! opcode re-enables the prompt.

use crate::console::Console;
use crate::machine::Lt64;
use crate::opcode::Opcode;
use crate::packing;

impl Lt64 {
    pub(crate) fn debug_step(&mut self, console: &mut impl Console) {
        // Program output first, so the trace lines up with it.
        console.flush();

        eprintln!("data: {}", trailing_cells(&self.data_stack, self.dsp));
        eprintln!("rtn:  {}", trailing_cells(&self.return_stack, self.rsp));

        let word = self.mem(self.pc);
        let op = packing::low_byte(word);
        let mnemonic = Opcode::from_byte(op).map_or("???", Opcode::mnemonic);
        eprintln!("pc: {:04x}  op: {:02x} {}", self.pc, op, mnemonic);
        eprint!("> ");

        let mut typed = false;
        loop {
            match console.read_byte() {
                None | Some(b'\n') => break,
                Some(_) => typed = true,
            }
        }
        if typed {
            self.skip_to_break = true;
        }
    }
}

/// Up to eight cells below the stack top, oldest first, with a leading
/// ellipsis when the stack is deeper than that.
fn trailing_cells(cells: &[i16], top: u16) -> String {
    let n = usize::from(top);
    if n == 0 || n >= cells.len() {
        return String::new();
    }
    let first = n.saturating_sub(7).max(1);
    let mut out = String::new();
    if first > 1 {
        out.push_str("… ");
    }
    for cell in &cells[first..=n] {
        out.push_str(&format!("{:04x} ", *cell as u16));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_cells_of_empty_stack() {
        let cells = [0i16; 8];
        assert_eq!(trailing_cells(&cells, 0), "");
    }

    #[test]
    fn trailing_cells_of_shallow_stack() {
        let mut cells = [0i16; 16];
        cells[1] = 0x0a;
        cells[2] = 0x0b;
        assert_eq!(trailing_cells(&cells, 2), "000a 000b ");
    }

    #[test]
    fn trailing_cells_elides_deep_stack() {
        let mut cells = [0i16; 16];
        for (i, cell) in cells.iter_mut().enumerate() {
            *cell = i as i16;
        }
        let shown = trailing_cells(&cells, 10);
        assert!(shown.starts_with("… 0003 "));
        assert!(shown.ends_with("000a "));
    }

    #[test]
    fn trailing_cells_of_wrapped_pointer() {
        let cells = [0i16; 8];
        assert_eq!(trailing_cells(&cells, 0xffff), "");
    }
}
