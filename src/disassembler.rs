//! 8080 Disassembler Module
//!
//! Converts binary machine code into Intel-syntax assembly text. Decoding goes
//! through the same [`OPCODE_TABLE`](crate::OPCODE_TABLE) the executor uses, so
//! the listing always agrees with what [`CPU::step`](crate::CPU::step) would do.

pub mod decoder;
pub mod formatter;

pub use decoder::decode_instruction;
pub use formatter::{format_instruction, format_listing};

use crate::addressing::AddressingMode;
use crate::opcodes::Operation;

/// Mnemonic used for bytes that do not form a complete instruction.
pub const DATA_BYTE: &str = "DB";

/// A single disassembled instruction with full metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// Memory address where this instruction starts
    pub address: u16,

    /// The opcode byte value (0x00-0xFF)
    pub opcode: u8,

    /// Decoded operation, `None` for a `DB` data byte
    pub operation: Option<Operation>,

    /// Canonical mnemonic (e.g., "MOV", "JNZ", "DB")
    pub mnemonic: &'static str,

    /// Addressing mode used by this instruction
    pub addressing_mode: AddressingMode,

    /// Immediate bytes following the opcode (0-2)
    pub operand_bytes: Vec<u8>,

    /// Total size in bytes (1-3 bytes: opcode + operands)
    pub size_bytes: u8,

    /// Nominal state count
    pub states: u8,

    /// False for undocumented alias encodings
    pub documented: bool,
}

impl Instruction {
    /// Builds a one-byte `DB` entry for a byte that cannot be decoded in place.
    pub fn data_byte(address: u16, byte: u8) -> Self {
        Self {
            address,
            opcode: byte,
            operation: None,
            mnemonic: DATA_BYTE,
            addressing_mode: AddressingMode::Implied,
            operand_bytes: vec![byte],
            size_bytes: 1,
            states: 0,
            documented: true,
        }
    }

    /// The 8-bit immediate operand, if any.
    pub fn byte_operand(&self) -> Option<u8> {
        self.operand_bytes.first().copied()
    }

    /// The 16-bit little-endian immediate operand, if any.
    pub fn word_operand(&self) -> Option<u16> {
        match self.operand_bytes.as_slice() {
            [lo, hi] => Some(u16::from_le_bytes([*lo, *hi])),
            _ => None,
        }
    }
}

/// Options controlling disassembly output
#[derive(Debug, Clone, Copy, Default)]
pub struct DisassemblyOptions {
    /// Address of the first byte (affects address display)
    pub start_address: u16,

    /// Whether [`format_listing`] includes the raw instruction bytes
    pub hex_dump: bool,
}

/// Disassemble a byte slice into a vector of instructions
///
/// Bytes at the end of the slice that do not hold a complete instruction are
/// emitted as individual `DB` entries.
///
/// # Examples
///
/// ```
/// use lib8080::{disassemble, format_instruction, DisassemblyOptions};
///
/// let program = [0x3E, 0x05, 0xC6, 0x03, 0x76];
/// let listing: Vec<String> = disassemble(&program, DisassemblyOptions::default())
///     .iter()
///     .map(format_instruction)
///     .collect();
///
/// assert_eq!(listing, ["MVI A,05h", "ADI 03h", "HLT"]);
/// ```
pub fn disassemble(bytes: &[u8], options: DisassemblyOptions) -> Vec<Instruction> {
    let mut instructions = Vec::new();
    let mut offset = 0;
    let mut address = options.start_address;

    while offset < bytes.len() {
        let Some(instr) = decode_instruction(&bytes[offset..], address) else {
            // Truncated tail: every remaining byte is data
            for &byte in &bytes[offset..] {
                instructions.push(Instruction::data_byte(address, byte));
                address = address.wrapping_add(1);
            }
            break;
        };

        offset += instr.size_bytes as usize;
        address = address.wrapping_add(instr.size_bytes as u16);
        instructions.push(instr);
    }

    instructions
}
