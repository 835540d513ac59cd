//! Opcode dispatch: the interpreter loop.
//!
//! Each iteration validates the stack pointers and program counter,
//! decodes the word at `pc` (low byte opcode, high byte immediate
//! flag), executes it, and advances `pc` unless the instruction was a
//! control transfer. Structural faults end the run; semantic errors
//! inside the program's own memory are its problem.

use crate::console::{self, Console};
use crate::fault::Fault;
use crate::machine::{DEFAULT_SCALE, END_MEMORY, END_RETURN, END_STACK, Lt64, SCALES};
use crate::opcode::Opcode;
use crate::packing;

/// Clamp a stack word to a usable scale table index.
fn scale_index(w: i16) -> usize {
    if (1..10).contains(&w) {
        w as usize
    } else {
        usize::from(DEFAULT_SCALE)
    }
}

impl Lt64 {
    /// Run the loaded program to completion.
    ///
    /// Returns on `HALT`; in testing mode the final data stack is then
    /// dumped to program output, words `1..=dsp` in hex. A structural
    /// fault prints its diagnostic to stderr and is returned.
    pub fn run(&mut self, console: &mut impl Console) -> Result<(), Fault> {
        loop {
            if self.options.debugging && !self.skip_to_break {
                self.debug_step(console);
            }

            if let Err(fault) = self.check_bounds() {
                eprintln!("Error: {fault}");
                return Err(fault);
            }

            let word = self.mem(self.pc) as u16;
            let flag = (word >> 8) as u8;
            let Some(op) = Opcode::from_byte((word & 0xff) as u8) else {
                let fault = Fault::UnknownOp {
                    op: (word & 0xff) as u8,
                };
                eprintln!("Error: {fault}");
                return Err(fault);
            };

            match op {
                Opcode::Halt => break,

                // Stack manipulation
                Opcode::Push => {
                    self.pc = self.pc.wrapping_add(1);
                    let v = self.mem(self.pc);
                    self.push(v);
                }
                Opcode::Pop => {
                    self.dsp = self.dsp.wrapping_sub(1);
                }
                Opcode::Load => {
                    let addr = self.resolve(flag, self.ds(self.dsp) as u16);
                    let v = self.mem(addr);
                    self.ds_set(self.dsp, v);
                }
                Opcode::Store => {
                    let addr = self.resolve(flag, self.ds(self.dsp) as u16);
                    let v = self.ds(self.dsp.wrapping_sub(1));
                    self.mem_set(addr, v);
                    self.dsp = self.dsp.wrapping_sub(2);
                }
                Opcode::Fst => {
                    let v = self.ds(self.dsp);
                    self.push(v);
                }
                Opcode::Sec => {
                    let v = self.ds(self.dsp.wrapping_sub(1));
                    self.push(v);
                }
                Opcode::Nth => {
                    let n = self.ds(self.dsp) as u16;
                    let v = self.ds(self.dsp.wrapping_sub(n).wrapping_sub(1));
                    self.ds_set(self.dsp, v);
                }
                Opcode::Swap => {
                    let a = self.ds(self.dsp.wrapping_sub(1));
                    let b = self.ds(self.dsp);
                    self.ds_set(self.dsp.wrapping_sub(1), b);
                    self.ds_set(self.dsp, a);
                }
                Opcode::Rot => {
                    let a = self.ds(self.dsp.wrapping_sub(2));
                    let b = self.ds(self.dsp.wrapping_sub(1));
                    let c = self.ds(self.dsp);
                    self.ds_set(self.dsp.wrapping_sub(2), b);
                    self.ds_set(self.dsp.wrapping_sub(1), c);
                    self.ds_set(self.dsp, a);
                }
                Opcode::Rpush => {
                    let v = self.pop();
                    self.rpush(v);
                }
                Opcode::Rpop => {
                    let v = self.rpop();
                    self.push(v);
                }
                Opcode::Rgrab => {
                    let v = self.rs(self.rsp);
                    self.push(v);
                }

                // Double-word stack manipulation
                Opcode::Dpush => {
                    self.pc = self.pc.wrapping_add(1);
                    let hi = self.mem(self.pc);
                    self.pc = self.pc.wrapping_add(1);
                    let lo = self.mem(self.pc);
                    self.push(hi);
                    self.push(lo);
                }
                Opcode::Dpop => {
                    self.dsp = self.dsp.wrapping_sub(2);
                }
                Opcode::Dload => {
                    let popped = self.pop() as u16;
                    let addr = self.resolve(flag, popped);
                    let hi = self.mem(addr);
                    let lo = self.mem(addr.wrapping_add(1));
                    self.push(hi);
                    self.push(lo);
                }
                Opcode::Dstore => {
                    let popped = self.pop() as u16;
                    let addr = self.resolve(flag, popped);
                    let hi = self.ds(self.dsp.wrapping_sub(1));
                    let lo = self.ds(self.dsp);
                    self.mem_set(addr, hi);
                    self.mem_set(addr.wrapping_add(1), lo);
                    self.dsp = self.dsp.wrapping_sub(2);
                }
                Opcode::Dfst => {
                    let hi = self.ds(self.dsp.wrapping_sub(1));
                    let lo = self.ds(self.dsp);
                    self.push(hi);
                    self.push(lo);
                }
                Opcode::Dsec => {
                    let hi = self.ds(self.dsp.wrapping_sub(3));
                    let lo = self.ds(self.dsp.wrapping_sub(2));
                    self.push(hi);
                    self.push(lo);
                }
                Opcode::Dnth => {
                    let n = (self.pop() as u16).wrapping_mul(2);
                    let d = self.dsp;
                    let hi = self.ds(d.wrapping_sub(n).wrapping_sub(1));
                    let lo = self.ds(d.wrapping_sub(n));
                    self.push(hi);
                    self.push(lo);
                }
                Opcode::Dswap => {
                    for off in [0, 1] {
                        let near = self.dsp.wrapping_sub(off);
                        let far = self.dsp.wrapping_sub(off + 2);
                        let a = self.ds(near);
                        let b = self.ds(far);
                        self.ds_set(near, b);
                        self.ds_set(far, a);
                    }
                }
                Opcode::Drot => {
                    for off in [1, 0] {
                        let bottom = self.dsp.wrapping_sub(off).wrapping_sub(4);
                        let middle = self.dsp.wrapping_sub(off).wrapping_sub(2);
                        let top = self.dsp.wrapping_sub(off);
                        let a = self.ds(bottom);
                        let b = self.ds(middle);
                        let c = self.ds(top);
                        self.ds_set(bottom, b);
                        self.ds_set(middle, c);
                        self.ds_set(top, a);
                    }
                }
                Opcode::Drpush => {
                    let hi = self.ds(self.dsp.wrapping_sub(1));
                    let lo = self.ds(self.dsp);
                    self.rpush(hi);
                    self.rpush(lo);
                    self.dsp = self.dsp.wrapping_sub(2);
                }
                Opcode::Drpop => {
                    let hi = self.rs(self.rsp.wrapping_sub(1));
                    let lo = self.rs(self.rsp);
                    self.push(hi);
                    self.push(lo);
                    self.rsp = self.rsp.wrapping_sub(2);
                }
                Opcode::Drgrab => {
                    let hi = self.rs(self.rsp.wrapping_sub(1));
                    let lo = self.rs(self.rsp);
                    self.push(hi);
                    self.push(lo);
                }

                // Word arithmetic
                Opcode::Add => self.binop(|a, b| a.wrapping_add(b)),
                Opcode::Sub => self.binop(|a, b| a.wrapping_sub(b)),
                Opcode::Mult => self.binop(|a, b| a.wrapping_mul(b)),
                Opcode::Div => self.binop(i16::wrapping_div),
                Opcode::Mod => self.binop(i16::wrapping_rem),

                // Signed comparison
                Opcode::Eq => self.binop(|a, b| i16::from(a == b)),
                Opcode::Lt => self.binop(|a, b| i16::from(a < b)),
                Opcode::Gt => self.binop(|a, b| i16::from(a > b)),

                // Unsigned arithmetic and comparison
                Opcode::Multu => {
                    let a = u32::from(self.ds(self.dsp.wrapping_sub(1)) as u16);
                    let b = u32::from(self.ds(self.dsp) as u16);
                    let product = a * b;
                    self.ds_set(self.dsp.wrapping_sub(1), (product >> 16) as i16);
                    self.ds_set(self.dsp, product as i16);
                }
                Opcode::Divu => self.binop(|a, b| (a as u16).wrapping_div(b as u16) as i16),
                Opcode::Modu => self.binop(|a, b| (a as u16).wrapping_rem(b as u16) as i16),
                Opcode::Ltu => self.binop(|a, b| i16::from((a as u16) < (b as u16))),
                Opcode::Gtu => self.binop(|a, b| i16::from((a as u16) > (b as u16))),

                // Word bitwise
                Opcode::Sl => {
                    let n = self.pop();
                    let v = self.ds(self.dsp);
                    self.ds_set(self.dsp, v.wrapping_shl(u32::from(n as u16)));
                }
                Opcode::Sr => {
                    let n = self.pop();
                    let v = self.ds(self.dsp);
                    self.ds_set(self.dsp, v.wrapping_shr(u32::from(n as u16)));
                }
                Opcode::And => self.binop(|a, b| a & b),
                Opcode::Or => self.binop(|a, b| a | b),
                Opcode::Not => {
                    let v = self.ds(self.dsp);
                    self.ds_set(self.dsp, !v);
                }

                // Double-word arithmetic and comparison
                Opcode::Dadd => self.dbinop(|a, b| a.wrapping_add(b)),
                Opcode::Dsub => self.dbinop(|a, b| a.wrapping_sub(b)),
                Opcode::Dmult => self.dbinop(|a, b| a.wrapping_mul(b)),
                Opcode::Ddiv => self.dbinop(i32::wrapping_div),
                Opcode::Dmod => self.dbinop(i32::wrapping_rem),
                Opcode::Deq => self.dbinop(|a, b| i32::from(a == b)),
                Opcode::Dlt => self.dbinop(|a, b| i32::from(a < b)),
                Opcode::Dgt => self.dbinop(|a, b| i32::from(a > b)),
                Opcode::Ddivu => {
                    self.dbinop(|a, b| (a as u32).wrapping_div(b as u32) as i32);
                }
                Opcode::Dmodu => {
                    self.dbinop(|a, b| (a as u32).wrapping_rem(b as u32) as i32);
                }
                Opcode::Dltu => self.dbinop(|a, b| i32::from((a as u32) < (b as u32))),
                Opcode::Dgtu => self.dbinop(|a, b| i32::from((a as u32) > (b as u32))),

                // Double-word bitwise
                Opcode::Dsl => {
                    let n = self.pop();
                    let pos = self.dsp.wrapping_sub(1);
                    let v = packing::get_dword(&self.data_stack, pos);
                    packing::set_dword(
                        &mut self.data_stack,
                        pos,
                        v.wrapping_shl(u32::from(n as u16)),
                    );
                }
                Opcode::Dsr => {
                    let n = self.pop();
                    let pos = self.dsp.wrapping_sub(1);
                    let v = packing::get_dword(&self.data_stack, pos);
                    packing::set_dword(
                        &mut self.data_stack,
                        pos,
                        v.wrapping_shr(u32::from(n as u16)),
                    );
                }
                Opcode::Dand => self.dbinop(|a, b| a & b),
                Opcode::Dor => self.dbinop(|a, b| a | b),
                Opcode::Dnot => {
                    let pos = self.dsp.wrapping_sub(1);
                    let v = packing::get_dword(&self.data_stack, pos);
                    packing::set_dword(&mut self.data_stack, pos, !v);
                }

                // Control transfer: no post-step increment
                Opcode::Jump => {
                    self.pc = self.pop() as u16;
                    continue;
                }
                Opcode::Branch => {
                    let target = self.pop() as u16;
                    let cond = self.pop();
                    if cond != 0 {
                        self.pc = target;
                        continue;
                    }
                }
                Opcode::Call => {
                    let ret = self.pc.wrapping_add(1);
                    self.rpush(ret as i16);
                    self.pc = self.pop() as u16;
                    continue;
                }
                Opcode::Ret => {
                    self.pc = self.rpop() as u16;
                    continue;
                }

                // Register introspection
                Opcode::Dsp => {
                    let v = self.dsp;
                    self.push(v as i16);
                }
                Opcode::Pc => {
                    let v = self.pc;
                    self.push(v as i16);
                }
                Opcode::Bfp => {
                    let v = self.bfp;
                    self.push(v as i16);
                }
                Opcode::Fmp => {
                    let v = self.fmp;
                    self.push(v as i16);
                }

                // Number printing
                Opcode::Wprn => {
                    let v = self.pop();
                    console.print(&v.to_string());
                }
                Opcode::Dprn => {
                    let v = self.pop_dword_operand();
                    console.print(&v.to_string());
                }
                Opcode::Wprnu => {
                    let v = self.pop() as u16;
                    console.print(&v.to_string());
                }
                Opcode::Dprnu => {
                    let v = self.pop_dword_operand() as u32;
                    console.print(&v.to_string());
                }
                Opcode::Fprn => {
                    let v = self.pop_dword_operand();
                    let sc = usize::from(DEFAULT_SCALE);
                    console.print(&format!("{:.*}", sc, f64::from(v) / SCALES[sc] as f64));
                }
                Opcode::Fprnsc => {
                    let sc = scale_index(self.pop());
                    let v = self.pop_dword_operand();
                    console.print(&format!("{:.*}", sc, f64::from(v) / SCALES[sc] as f64));
                }

                // Char and string printing
                Opcode::Prnch => {
                    let v = self.pop();
                    console.print(&(packing::low_byte(v) as char).to_string());
                }
                Opcode::Prnpk => {
                    let v = self.pop();
                    let mut pair = String::new();
                    pair.push(packing::low_byte(v) as char);
                    pair.push(packing::high_byte(v) as char);
                    console.print(&pair);
                }
                Opcode::Prn => {
                    self.print_packed(console, self.bfp, self.fmp);
                }
                Opcode::Prnln => {
                    self.print_packed(console, self.bfp, self.fmp);
                    console.print("\n");
                }
                Opcode::Prnmem => {
                    let popped = self.pop() as u16;
                    let start = self.resolve(flag, popped);
                    self.print_packed(console, start, END_MEMORY);
                }

                // Reading
                Opcode::Wread => {
                    let value = console::read_int(console);
                    self.drain_debug_newline(console);
                    match value {
                        Some(v) => self.push(v as i16),
                        None => {
                            self.eof = true;
                            self.push(0);
                        }
                    }
                }
                Opcode::Dread => {
                    let value = console::read_int(console);
                    self.drain_debug_newline(console);
                    match value {
                        Some(v) => self.push_dword(v as i32),
                        None => {
                            self.eof = true;
                            self.push_dword(0);
                        }
                    }
                }
                Opcode::Fread => {
                    let value = console::read_float(console);
                    self.drain_debug_newline(console);
                    let sc = usize::from(DEFAULT_SCALE);
                    match value {
                        Some(x) => self.push_dword((x * SCALES[sc] as f64) as i32),
                        None => {
                            self.eof = true;
                            self.push_dword(0);
                        }
                    }
                }
                Opcode::Freadsc => {
                    let sc = scale_index(self.pop());
                    let value = console::read_float(console);
                    self.drain_debug_newline(console);
                    match value {
                        Some(x) => self.push_dword((x * SCALES[sc] as f64) as i32),
                        None => {
                            self.eof = true;
                            self.push_dword(0);
                        }
                    }
                }
                Opcode::Readch => match console.read_byte() {
                    Some(b) => self.push(i16::from(b)),
                    None => {
                        self.eof = true;
                        self.push(0);
                    }
                },
                Opcode::Readln => self.read_line(console),

                // Buffer and characters
                Opcode::Bfstore => {
                    let i = self.pop() as u16;
                    let v = self.pop();
                    self.mem_set(self.bfp.wrapping_add(i), v);
                }
                Opcode::Bfload => {
                    let i = self.ds(self.dsp) as u16;
                    let v = self.mem(self.bfp.wrapping_add(i));
                    self.ds_set(self.dsp, v);
                }
                Opcode::High => {
                    let v = self.ds(self.dsp);
                    self.push(i16::from(packing::high_byte(v)));
                }
                Opcode::Low => {
                    let v = self.ds(self.dsp);
                    self.push(i16::from(packing::low_byte(v)));
                }
                Opcode::Unpack => {
                    let v = self.pop();
                    self.push(i16::from(packing::low_byte(v)));
                    self.push(i16::from(packing::high_byte(v)));
                }
                Opcode::Pack => {
                    let high = self.pop();
                    let low = self.ds(self.dsp);
                    self.ds_set(
                        self.dsp,
                        packing::pack(packing::low_byte(high), packing::low_byte(low)),
                    );
                }
                Opcode::ReadchBf => {
                    let i = self.pop() as u16;
                    let b = match console.read_byte() {
                        Some(b) => b,
                        None => {
                            self.eof = true;
                            0
                        }
                    };
                    let addr = self.bfp.wrapping_add(i / 2);
                    if i % 2 == 0 {
                        self.mem_set(addr, i16::from(b));
                    } else {
                        let low = packing::low_byte(self.mem(addr));
                        self.mem_set(addr, packing::pack(b, low));
                        self.mem_set(addr.wrapping_add(1), 0);
                    }
                }

                // Bulk copies between free memory and the buffer
                Opcode::Memcopy => {
                    let n = self.pop() as u16;
                    let addr = self.fmp.wrapping_add(self.pop() as u16);
                    let (src, dst) = if flag & 1 == 0 {
                        (addr, self.bfp)
                    } else {
                        (self.bfp, addr)
                    };
                    self.copy_words(src, dst, n);
                }
                Opcode::Strcopy => {
                    let addr = self.fmp.wrapping_add(self.pop() as u16);
                    let (src, dst) = if flag & 1 == 0 {
                        (addr, self.bfp)
                    } else {
                        (self.bfp, addr)
                    };
                    let n = packing::string_length(&self.memory, src);
                    self.copy_words(src, dst, n);
                }

                // String and memory comparison
                Opcode::Streq => {
                    let popped = self.pop() as u16;
                    let b = self.resolve(flag, popped);
                    let a = self.resolve(flag, self.ds(self.dsp) as u16);
                    let equal = packing::strings_equal(&self.memory, a, b);
                    self.ds_set(self.dsp, i16::from(equal));
                }
                Opcode::Memeq => {
                    let n = self.pop() as u16;
                    let popped_a = self.pop() as u16;
                    let a = self.resolve(flag, popped_a);
                    let popped_b = self.pop() as u16;
                    let b = self.resolve(flag, popped_b);
                    let mut equal = true;
                    for k in 0..n {
                        if self.mem(a.wrapping_add(k)) != self.mem(b.wrapping_add(k)) {
                            equal = false;
                            break;
                        }
                    }
                    self.ds_set(self.dsp, i16::from(equal));
                }

                // Fixed-point arithmetic
                Opcode::Fmult => {
                    let sc = usize::from(DEFAULT_SCALE);
                    self.fixed_mult(SCALES[sc]);
                }
                Opcode::Fdiv => {
                    let sc = usize::from(DEFAULT_SCALE);
                    self.fixed_div(SCALES[sc]);
                }
                Opcode::Fmultsc => {
                    let sc = scale_index(self.pop());
                    self.fixed_mult(SCALES[sc]);
                }
                Opcode::Fdivsc => {
                    let sc = scale_index(self.pop());
                    self.fixed_div(SCALES[sc]);
                }

                // EOF tracking and the breakpoint gate
                Opcode::IsEof => {
                    let v = i16::from(self.eof);
                    self.push(v);
                }
                Opcode::ResetEof => self.eof = false,
                Opcode::Brkpnt => self.skip_to_break = false,
            }

            self.pc = self.pc.wrapping_add(1);
        }

        if self.options.testing {
            self.dump_stack(console);
        }
        console.flush();
        Ok(())
    }

    fn check_bounds(&self) -> Result<(), Fault> {
        if self.pc >= self.bfp {
            return Err(Fault::PcOutOfBounds {
                pc: self.pc,
                bfp: self.bfp,
            });
        }
        if self.dsp > 0x8000 {
            return Err(Fault::DataUnderflow { dsp: self.dsp });
        }
        if self.dsp > END_STACK {
            return Err(Fault::DataOverflow { dsp: self.dsp });
        }
        if self.rsp > 0x8000 {
            return Err(Fault::ReturnUnderflow { rsp: self.rsp });
        }
        if self.rsp > END_RETURN {
            return Err(Fault::ReturnOverflow { rsp: self.rsp });
        }
        Ok(())
    }

    /// Absolute address when immediate-flag bit 0 is set, free-memory
    /// relative otherwise.
    fn resolve(&self, flag: u8, addr: u16) -> u16 {
        if flag & 1 == 1 {
            addr
        } else {
            self.fmp.wrapping_add(addr)
        }
    }

    /// Replace the top two words with `f(below, top)`.
    fn binop(&mut self, f: impl FnOnce(i16, i16) -> i16) {
        let b = self.ds(self.dsp);
        let a = self.ds(self.dsp.wrapping_sub(1));
        self.ds_set(self.dsp.wrapping_sub(1), f(a, b));
        self.dsp = self.dsp.wrapping_sub(1);
    }

    /// Replace the top two double words with `f(below, top)`.
    fn dbinop(&mut self, f: impl FnOnce(i32, i32) -> i32) {
        let b = packing::get_dword(&self.data_stack, self.dsp.wrapping_sub(1));
        let a = packing::get_dword(&self.data_stack, self.dsp.wrapping_sub(3));
        packing::set_dword(&mut self.data_stack, self.dsp.wrapping_sub(3), f(a, b));
        self.dsp = self.dsp.wrapping_sub(2);
    }

    /// Pop a double word used as a print operand.
    fn pop_dword_operand(&mut self) -> i32 {
        let v = packing::get_dword(&self.data_stack, self.dsp.wrapping_sub(1));
        self.dsp = self.dsp.wrapping_sub(2);
        v
    }

    /// `(a * b) / scale` with a 64-bit intermediate product.
    fn fixed_mult(&mut self, scale: i64) {
        let b = packing::get_dword(&self.data_stack, self.dsp.wrapping_sub(1));
        let a = packing::get_dword(&self.data_stack, self.dsp.wrapping_sub(3));
        self.dsp = self.dsp.wrapping_sub(2);
        let scaled = (i64::from(a) * i64::from(b)) / scale;
        packing::set_dword(
            &mut self.data_stack,
            self.dsp.wrapping_sub(1),
            scaled as i32,
        );
    }

    /// `(a / b) * scale` through a floating-point intermediate.
    fn fixed_div(&mut self, scale: i64) {
        let b = packing::get_dword(&self.data_stack, self.dsp.wrapping_sub(1));
        let a = packing::get_dword(&self.data_stack, self.dsp.wrapping_sub(3));
        self.dsp = self.dsp.wrapping_sub(2);
        let scaled = (f64::from(a) / f64::from(b)) * scale as f64;
        packing::set_dword(
            &mut self.data_stack,
            self.dsp.wrapping_sub(1),
            scaled as i32,
        );
    }

    fn copy_words(&mut self, src: u16, dst: u16, n: u16) {
        for k in 0..n {
            let v = self.mem(src.wrapping_add(k));
            self.mem_set(dst.wrapping_add(k), v);
        }
    }

    /// Print the packed string at `start`, stopping at the first zero
    /// byte or at `max`.
    fn print_packed(&self, console: &mut impl Console, start: u16, max: u16) {
        let mut text = String::new();
        let mut addr = start;
        while addr < max {
            let w = self.mem(addr);
            let low = packing::low_byte(w);
            if low == 0 {
                break;
            }
            text.push(low as char);
            let high = packing::high_byte(w);
            if high == 0 {
                break;
            }
            text.push(high as char);
            addr = addr.wrapping_add(1);
        }
        console.print(&text);
    }

    /// `READLN`: read one line into the buffer as a packed string.
    ///
    /// Pushes 1 after a newline, 0 when the buffer fills first. End of
    /// input sets the sticky flag and pushes nothing; callers that need
    /// a fixed stack delta branch on `IS_EOF`.
    fn read_line(&mut self, console: &mut impl Console) {
        let mut addr = self.bfp;
        let last = self.fmp.wrapping_sub(1);
        let mut pending: Option<u8> = None;
        loop {
            if addr >= last {
                match pending {
                    Some(b) => self.mem_set(addr, i16::from(b)),
                    None => self.mem_set(addr, 0),
                }
                self.push(0);
                return;
            }
            match console.read_byte() {
                None => {
                    match pending {
                        Some(b) => {
                            self.mem_set(addr, i16::from(b));
                            self.mem_set(addr.wrapping_add(1), 0);
                        }
                        None => self.mem_set(addr, 0),
                    }
                    self.eof = true;
                    return;
                }
                Some(b'\n') => {
                    match pending {
                        Some(b) => {
                            self.mem_set(addr, i16::from(b));
                            self.mem_set(addr.wrapping_add(1), 0);
                        }
                        None => self.mem_set(addr, 0),
                    }
                    self.push(1);
                    return;
                }
                Some(ch) => match pending.take() {
                    None => pending = Some(ch),
                    Some(first) => {
                        self.mem_set(addr, packing::pack(ch, first));
                        addr = addr.wrapping_add(1);
                    }
                },
            }
        }
    }

    /// Under debugging, formatted reads absorb one trailing newline so
    /// it cannot reach the single-step prompt.
    fn drain_debug_newline(&self, console: &mut impl Console) {
        if self.options.debugging {
            console::drain_newline(console);
        }
    }

    fn dump_stack(&self, console: &mut impl Console) {
        let mut text = String::new();
        for i in 1..=self.dsp {
            text.push_str(&format!("{:04x} ", self.ds(i) as u16));
        }
        text.push('\n');
        console.print(&text);
    }
}
