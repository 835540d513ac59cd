//! The LT64 instruction set: opcode numbering and mnemonics.
//!
//! The low byte of an instruction word selects the opcode. The high
//! byte is an immediate flag: bit 0 picks absolute over free-memory
//! relative addressing for the load/store family, and the whole byte is
//! the direction for the bulk copies. Operands otherwise come from the
//! data stack.

/// One opcode of the LT64 instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    Halt = 0x00,

    // Stack manipulation
    Push = 0x01,
    Pop = 0x02,
    Load = 0x03,
    Store = 0x04,
    Fst = 0x05,
    Sec = 0x06,
    Nth = 0x07,
    Swap = 0x08,
    Rot = 0x09,
    Rpush = 0x0a,
    Rpop = 0x0b,
    Rgrab = 0x0c,

    // Double-word stack manipulation
    Dpush = 0x0d,
    Dpop = 0x0e,
    Dload = 0x0f,
    Dstore = 0x10,
    Dfst = 0x11,
    Dsec = 0x12,
    Dnth = 0x13,
    Dswap = 0x14,
    Drot = 0x15,
    Drpush = 0x16,
    Drpop = 0x17,
    Drgrab = 0x18,

    // Word arithmetic and comparison
    Add = 0x19,
    Sub = 0x1a,
    Mult = 0x1b,
    Div = 0x1c,
    Mod = 0x1d,
    Eq = 0x1e,
    Lt = 0x1f,
    Gt = 0x20,
    Multu = 0x21,
    Divu = 0x22,
    Modu = 0x23,
    Ltu = 0x24,
    Gtu = 0x25,

    // Word bitwise
    Sl = 0x26,
    Sr = 0x27,
    And = 0x28,
    Or = 0x29,
    Not = 0x2a,

    // Double-word arithmetic and comparison (0x33 is a retired slot)
    Dadd = 0x2b,
    Dsub = 0x2c,
    Dmult = 0x2d,
    Ddiv = 0x2e,
    Dmod = 0x2f,
    Deq = 0x30,
    Dlt = 0x31,
    Dgt = 0x32,
    Ddivu = 0x34,
    Dmodu = 0x35,
    Dltu = 0x36,
    Dgtu = 0x37,

    // Double-word bitwise
    Dsl = 0x38,
    Dsr = 0x39,
    Dand = 0x3a,
    Dor = 0x3b,
    Dnot = 0x3c,

    // Control transfer
    Jump = 0x40,
    Branch = 0x41,
    Call = 0x42,
    Ret = 0x43,

    // Register introspection
    Dsp = 0x44,
    Pc = 0x45,
    Bfp = 0x46,
    Fmp = 0x47,

    // Number printing
    Wprn = 0x48,
    Dprn = 0x49,
    Wprnu = 0x4a,
    Dprnu = 0x4b,
    Fprn = 0x4c,
    Fprnsc = 0x4d,

    // Char and string printing
    Prnch = 0x4e,
    Prn = 0x4f,
    Prnln = 0x50,
    Prnmem = 0x51,

    // Reading
    Wread = 0x52,
    Dread = 0x53,
    Fread = 0x54,
    Freadsc = 0x55,
    Readch = 0x56,
    Readln = 0x57,

    // Buffer and characters
    Bfstore = 0x58,
    Bfload = 0x59,
    High = 0x5a,
    Low = 0x5b,
    Unpack = 0x5c,
    Pack = 0x5d,

    // Bulk copies
    Memcopy = 0x5e,
    Strcopy = 0x5f,

    // Fixed-point arithmetic
    Fmult = 0x60,
    Fdiv = 0x61,
    Fmultsc = 0x62,
    Fdivsc = 0x63,

    // String and EOF extensions
    Prnpk = 0x64,
    ReadchBf = 0x65,
    Streq = 0x66,
    Memeq = 0x67,
    IsEof = 0x68,
    ResetEof = 0x69,
    Brkpnt = 0x6a,
}

impl Opcode {
    /// Decode an instruction's low byte. Unassigned bytes are `None`
    /// and fault as unknown at dispatch.
    #[must_use]
    pub fn from_byte(byte: u8) -> Option<Self> {
        let op = match byte {
            0x00 => Self::Halt,
            0x01 => Self::Push,
            0x02 => Self::Pop,
            0x03 => Self::Load,
            0x04 => Self::Store,
            0x05 => Self::Fst,
            0x06 => Self::Sec,
            0x07 => Self::Nth,
            0x08 => Self::Swap,
            0x09 => Self::Rot,
            0x0a => Self::Rpush,
            0x0b => Self::Rpop,
            0x0c => Self::Rgrab,
            0x0d => Self::Dpush,
            0x0e => Self::Dpop,
            0x0f => Self::Dload,
            0x10 => Self::Dstore,
            0x11 => Self::Dfst,
            0x12 => Self::Dsec,
            0x13 => Self::Dnth,
            0x14 => Self::Dswap,
            0x15 => Self::Drot,
            0x16 => Self::Drpush,
            0x17 => Self::Drpop,
            0x18 => Self::Drgrab,
            0x19 => Self::Add,
            0x1a => Self::Sub,
            0x1b => Self::Mult,
            0x1c => Self::Div,
            0x1d => Self::Mod,
            0x1e => Self::Eq,
            0x1f => Self::Lt,
            0x20 => Self::Gt,
            0x21 => Self::Multu,
            0x22 => Self::Divu,
            0x23 => Self::Modu,
            0x24 => Self::Ltu,
            0x25 => Self::Gtu,
            0x26 => Self::Sl,
            0x27 => Self::Sr,
            0x28 => Self::And,
            0x29 => Self::Or,
            0x2a => Self::Not,
            0x2b => Self::Dadd,
            0x2c => Self::Dsub,
            0x2d => Self::Dmult,
            0x2e => Self::Ddiv,
            0x2f => Self::Dmod,
            0x30 => Self::Deq,
            0x31 => Self::Dlt,
            0x32 => Self::Dgt,
            0x34 => Self::Ddivu,
            0x35 => Self::Dmodu,
            0x36 => Self::Dltu,
            0x37 => Self::Dgtu,
            0x38 => Self::Dsl,
            0x39 => Self::Dsr,
            0x3a => Self::Dand,
            0x3b => Self::Dor,
            0x3c => Self::Dnot,
            0x40 => Self::Jump,
            0x41 => Self::Branch,
            0x42 => Self::Call,
            0x43 => Self::Ret,
            0x44 => Self::Dsp,
            0x45 => Self::Pc,
            0x46 => Self::Bfp,
            0x47 => Self::Fmp,
            0x48 => Self::Wprn,
            0x49 => Self::Dprn,
            0x4a => Self::Wprnu,
            0x4b => Self::Dprnu,
            0x4c => Self::Fprn,
            0x4d => Self::Fprnsc,
            0x4e => Self::Prnch,
            0x4f => Self::Prn,
            0x50 => Self::Prnln,
            0x51 => Self::Prnmem,
            0x52 => Self::Wread,
            0x53 => Self::Dread,
            0x54 => Self::Fread,
            0x55 => Self::Freadsc,
            0x56 => Self::Readch,
            0x57 => Self::Readln,
            0x58 => Self::Bfstore,
            0x59 => Self::Bfload,
            0x5a => Self::High,
            0x5b => Self::Low,
            0x5c => Self::Unpack,
            0x5d => Self::Pack,
            0x5e => Self::Memcopy,
            0x5f => Self::Strcopy,
            0x60 => Self::Fmult,
            0x61 => Self::Fdiv,
            0x62 => Self::Fmultsc,
            0x63 => Self::Fdivsc,
            0x64 => Self::Prnpk,
            0x65 => Self::ReadchBf,
            0x66 => Self::Streq,
            0x67 => Self::Memeq,
            0x68 => Self::IsEof,
            0x69 => Self::ResetEof,
            0x6a => Self::Brkpnt,
            _ => return None,
        };
        Some(op)
    }

    /// Assembly mnemonic, as shown by the debug channel.
    #[must_use]
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Halt => "HALT",
            Self::Push => "PUSH",
            Self::Pop => "POP",
            Self::Load => "LOAD",
            Self::Store => "STORE",
            Self::Fst => "FST",
            Self::Sec => "SEC",
            Self::Nth => "NTH",
            Self::Swap => "SWAP",
            Self::Rot => "ROT",
            Self::Rpush => "RPUSH",
            Self::Rpop => "RPOP",
            Self::Rgrab => "RGRAB",
            Self::Dpush => "DPUSH",
            Self::Dpop => "DPOP",
            Self::Dload => "DLOAD",
            Self::Dstore => "DSTORE",
            Self::Dfst => "DFST",
            Self::Dsec => "DSEC",
            Self::Dnth => "DNTH",
            Self::Dswap => "DSWAP",
            Self::Drot => "DROT",
            Self::Drpush => "DRPUSH",
            Self::Drpop => "DRPOP",
            Self::Drgrab => "DRGRAB",
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mult => "MULT",
            Self::Div => "DIV",
            Self::Mod => "MOD",
            Self::Eq => "EQ",
            Self::Lt => "LT",
            Self::Gt => "GT",
            Self::Multu => "MULTU",
            Self::Divu => "DIVU",
            Self::Modu => "MODU",
            Self::Ltu => "LTU",
            Self::Gtu => "GTU",
            Self::Sl => "SL",
            Self::Sr => "SR",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Dadd => "DADD",
            Self::Dsub => "DSUB",
            Self::Dmult => "DMULT",
            Self::Ddiv => "DDIV",
            Self::Dmod => "DMOD",
            Self::Deq => "DEQ",
            Self::Dlt => "DLT",
            Self::Dgt => "DGT",
            Self::Ddivu => "DDIVU",
            Self::Dmodu => "DMODU",
            Self::Dltu => "DLTU",
            Self::Dgtu => "DGTU",
            Self::Dsl => "DSL",
            Self::Dsr => "DSR",
            Self::Dand => "DAND",
            Self::Dor => "DOR",
            Self::Dnot => "DNOT",
            Self::Jump => "JUMP",
            Self::Branch => "BRANCH",
            Self::Call => "CALL",
            Self::Ret => "RET",
            Self::Dsp => "DSP",
            Self::Pc => "PC",
            Self::Bfp => "BFP",
            Self::Fmp => "FMP",
            Self::Wprn => "WPRN",
            Self::Dprn => "DPRN",
            Self::Wprnu => "WPRNU",
            Self::Dprnu => "DPRNU",
            Self::Fprn => "FPRN",
            Self::Fprnsc => "FPRNSC",
            Self::Prnch => "PRNCH",
            Self::Prn => "PRN",
            Self::Prnln => "PRNLN",
            Self::Prnmem => "PRNMEM",
            Self::Wread => "WREAD",
            Self::Dread => "DREAD",
            Self::Fread => "FREAD",
            Self::Freadsc => "FREADSC",
            Self::Readch => "READCH",
            Self::Readln => "READLN",
            Self::Bfstore => "BFSTORE",
            Self::Bfload => "BFLOAD",
            Self::High => "HIGH",
            Self::Low => "LOW",
            Self::Unpack => "UNPACK",
            Self::Pack => "PACK",
            Self::Memcopy => "MEMCOPY",
            Self::Strcopy => "STRCOPY",
            Self::Fmult => "FMULT",
            Self::Fdiv => "FDIV",
            Self::Fmultsc => "FMULTSC",
            Self::Fdivsc => "FDIVSC",
            Self::Prnpk => "PRNPK",
            Self::ReadchBf => "READCH_BF",
            Self::Streq => "STREQ",
            Self::Memeq => "MEMEQ",
            Self::IsEof => "IS_EOF",
            Self::ResetEof => "RESET_EOF",
            Self::Brkpnt => "BRKPNT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_round_trips_every_opcode() {
        let mut decoded = 0;
        for byte in 0x00..=0xff_u8 {
            if let Some(op) = Opcode::from_byte(byte) {
                assert_eq!(op as u8, byte);
                assert!(!op.mnemonic().is_empty());
                decoded += 1;
            }
        }
        // 0x6b inclusive opcodes minus the retired 0x33 and 0x3d-0x3f.
        assert_eq!(decoded, 0x6b - 4);
    }

    #[test]
    fn reserved_bytes_do_not_decode() {
        for byte in [0x33, 0x3d, 0x3e, 0x3f, 0x6b, 0x80, 0xff] {
            assert_eq!(Opcode::from_byte(byte), None);
        }
    }

    #[test]
    fn pinned_control_opcodes() {
        assert_eq!(Opcode::Halt as u8, 0x00);
        assert_eq!(Opcode::Jump as u8, 0x40);
        assert_eq!(Opcode::Branch as u8, 0x41);
        assert_eq!(Opcode::Call as u8, 0x42);
        assert_eq!(Opcode::Ret as u8, 0x43);
        assert_eq!(Opcode::Brkpnt as u8, 0x6a);
    }
}
