//! Script decompilation
//!
//! Splits raw script bytes into opcodes and data pushes.

use std::fmt;

use super::opcodes::{
    opcode_name, OP_PUSHBYTES_75, OP_PUSHDATA1, OP_PUSHDATA2, OP_PUSHDATA4,
};
use super::ScriptError;

/// A single decompiled script element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Non-push opcode (small integers included)
    Op(u8),
    /// Data push
    Push(Vec<u8>),
}

impl Instruction {
    /// Pushed bytes, if this is a data push
    pub fn push_bytes(&self) -> Option<&[u8]> {
        match self {
            Instruction::Push(data) => Some(data),
            Instruction::Op(_) => None,
        }
    }

    /// Opcode, if this is not a data push
    pub fn opcode(&self) -> Option<u8> {
        match self {
            Instruction::Op(op) => Some(*op),
            Instruction::Push(_) => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Op(op) => f.write_str(&opcode_name(*op)),
            Instruction::Push(data) => f.write_str(&hex::encode(data)),
        }
    }
}

/// Decompile script bytes into a list of instructions
///
/// # Errors
/// Returns [`ScriptError::Truncated`] if a push runs past the end of the script.
pub fn decompile(script: &[u8]) -> Result<Vec<Instruction>, ScriptError> {
    let mut instructions = Vec::new();
    let mut pos = 0;

    while pos < script.len() {
        let opcode = script[pos];
        pos += 1;

        let len = match opcode {
            1..=OP_PUSHBYTES_75 => opcode as usize,
            OP_PUSHDATA1 => read_len(script, &mut pos, 1)?,
            OP_PUSHDATA2 => read_len(script, &mut pos, 2)?,
            OP_PUSHDATA4 => read_len(script, &mut pos, 4)?,
            _ => {
                instructions.push(Instruction::Op(opcode));
                continue;
            }
        };

        let end = pos.checked_add(len).ok_or(ScriptError::Truncated(pos))?;
        let data = script.get(pos..end).ok_or(ScriptError::Truncated(pos))?;
        instructions.push(Instruction::Push(data.to_vec()));
        pos = end;
    }

    Ok(instructions)
}

/// Read a little-endian length prefix of `width` bytes
fn read_len(script: &[u8], pos: &mut usize, width: usize) -> Result<usize, ScriptError> {
    let bytes = script
        .get(*pos..*pos + width)
        .ok_or(ScriptError::Truncated(*pos))?;
    *pos += width;

    Ok(bytes
        .iter()
        .rev()
        .fold(0usize, |acc, byte| (acc << 8) | *byte as usize))
}
