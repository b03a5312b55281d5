use std::fs::read_to_string;
use std::path::Path;

use hex::FromHex;

use clvmr::serde::node_from_bytes;
use clvmr::NodePtr;

use crate::common::types::{AllocEncoder, Error, IntoErr, Program, Puzzle};

pub fn hex_to_sexp(allocator: &mut AllocEncoder, hex_data: &str) -> Result<NodePtr, Error> {
    let trimmed = hex_data.trim();
    let hex_stream = Vec::<u8>::from_hex(trimmed.strip_prefix("0x").unwrap_or(trimmed)).into_gen()?;
    node_from_bytes(allocator.allocator(), &hex_stream).into_gen()
}

/// Read a program stored as hex text, checking that it decodes as clvm.
pub fn read_hex_program(name: &Path) -> Result<Program, Error> {
    let hex_data = read_to_string(name)
        .map_err(|e| Error::StrErr(format!("Couldn't read filename {}: {e}", name.display())))?;
    let mut allocator = AllocEncoder::new();
    let node = hex_to_sexp(&mut allocator, &hex_data)?;
    Program::from_nodeptr(&mut allocator, node)
}

pub fn puzzle_from_static_hex(allocator: &mut AllocEncoder, hex_data: &str) -> Result<Puzzle, Error> {
    let hex_sexp = hex_to_sexp(allocator, hex_data)?;
    Puzzle::from_nodeptr(allocator, hex_sexp)
}
