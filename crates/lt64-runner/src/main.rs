//! Headless LT64 runner.
//!
//! Loads a program image and executes it. An image file is a sequence
//! of 16-bit little-endian words: low byte opcode, high byte immediate
//! flag. Faults map to the documented process exit codes.

use lt64_vm::{Lt64, Options, StdConsole};
use std::fs;
use std::process;

/// Process exit codes owned by the host side.
mod exit {
    /// Image has an invalid length.
    pub const LEN: i32 = 2;
    /// Image file could not be read.
    pub const FILE: i32 = 3;
    /// Bad command line.
    pub const ARGS: i32 = 9;
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let debugging = args.iter().any(|a| a == "-d" || a == "--debug");
    let testing = args.iter().any(|a| a == "-t" || a == "--test");
    let paths: Vec<&str> = args
        .iter()
        .filter(|a| !a.starts_with('-'))
        .map(String::as_str)
        .collect();

    let &[path] = paths.as_slice() else {
        eprintln!("Usage: lt64-runner [-d|--debug] [-t|--test] <image.lt64>");
        eprintln!("       -d, --debug  Single-step with a stderr trace");
        eprintln!("       -t, --test   Dump the final data stack to stdout");
        process::exit(exit::ARGS);
    };

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("Error: could not read {path}: {err}");
            process::exit(exit::FILE);
        }
    };
    if bytes.len() % 2 != 0 {
        eprintln!(
            "Error: image {path} is {} bytes, not a whole number of words",
            bytes.len()
        );
        process::exit(exit::LEN);
    }
    let image: Vec<i16> = bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    let mut vm = Lt64::with_options(Options { testing, debugging });
    if let Err(err) = vm.load(&image) {
        eprintln!("Error: {err}");
        process::exit(exit::LEN);
    }

    let mut console = StdConsole::new();
    match vm.run(&mut console) {
        Ok(()) => {}
        Err(fault) => process::exit(i32::from(fault.exit_code())),
    }
}
