//! Script opcodes used by multisig redeem scripts

/// Push an empty byte vector (numeric zero)
pub const OP_0: u8 = 0x00;

/// Largest opcode that pushes its own value as a byte count
pub const OP_PUSHBYTES_75: u8 = 0x4b;

/// Push of a 33-byte compressed public key
pub const OP_PUSHBYTES_33: u8 = 0x21;

/// Next byte holds the push length
pub const OP_PUSHDATA1: u8 = 0x4c;

/// Next two bytes (little-endian) hold the push length
pub const OP_PUSHDATA2: u8 = 0x4d;

/// Next four bytes (little-endian) hold the push length
pub const OP_PUSHDATA4: u8 = 0x4e;

/// Push the number -1
pub const OP_1NEGATE: u8 = 0x4f;

/// Push the number 1
pub const OP_1: u8 = 0x51;

/// Push the number 16
pub const OP_16: u8 = 0x60;

/// Verify signatures against a set of public keys
pub const OP_CHECKMULTISIG: u8 = 0xae;

/// Minimal opcode pushing a small integer in `0..=16`
pub fn small_int_opcode(value: u8) -> Option<u8> {
    match value {
        0 => Some(OP_0),
        1..=16 => Some(OP_1 - 1 + value),
        _ => None,
    }
}

/// Value pushed by a small-integer opcode
pub fn small_int_value(opcode: u8) -> Option<u8> {
    match opcode {
        OP_0 => Some(0),
        OP_1..=OP_16 => Some(opcode - (OP_1 - 1)),
        _ => None,
    }
}

/// Assembly name of an opcode, as far as multisig scripts need it
pub fn opcode_name(opcode: u8) -> String {
    match opcode {
        OP_0 => "OP_0".to_string(),
        OP_1NEGATE => "OP_1NEGATE".to_string(),
        OP_1..=OP_16 => format!("OP_{}", opcode - (OP_1 - 1)),
        OP_CHECKMULTISIG => "OP_CHECKMULTISIG".to_string(),
        other => format!("OP_UNKNOWN_{:#04x}", other),
    }
}
