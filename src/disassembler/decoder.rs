//! Instruction decoder for the 8080 disassembler

use crate::disassembler::Instruction;
use crate::opcodes::OPCODE_TABLE;

/// Decode a single instruction from a byte slice
///
/// # Arguments
///
/// * `bytes` - The byte slice starting at the instruction to decode
/// * `address` - The memory address of this instruction
///
/// # Returns
///
/// `None` if the slice is empty or too short for the instruction's immediates.
/// Every opcode byte decodes, undocumented aliases included.
pub fn decode_instruction(bytes: &[u8], address: u16) -> Option<Instruction> {
    let (&opcode, rest) = bytes.split_first()?;
    let metadata = &OPCODE_TABLE[opcode as usize];

    let operand_len = metadata.size_bytes as usize - 1;
    let operand_bytes = rest.get(..operand_len)?.to_vec();

    Some(Instruction {
        address,
        opcode,
        operation: Some(metadata.operation),
        mnemonic: metadata.mnemonic,
        addressing_mode: metadata.addressing_mode,
        operand_bytes,
        size_bytes: metadata.size_bytes,
        states: metadata.states,
        documented: metadata.documented,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addressing::AddressingMode;
    use crate::opcodes::Operation;
    use crate::registers::{Reg, RegPair};

    #[test]
    fn test_decode_mvi() {
        let instr = decode_instruction(&[0x3E, 0x42], 0x8000).unwrap();

        assert_eq!(instr.address, 0x8000);
        assert_eq!(instr.opcode, 0x3E);
        assert_eq!(instr.operation, Some(Operation::Mvi(Reg::A)));
        assert_eq!(instr.mnemonic, "MVI");
        assert_eq!(instr.addressing_mode, AddressingMode::Immediate);
        assert_eq!(instr.operand_bytes, vec![0x42]);
        assert_eq!(instr.size_bytes, 2);
    }

    #[test]
    fn test_decode_lxi() {
        let instr = decode_instruction(&[0x21, 0x00, 0x24], 0x0000).unwrap();

        assert_eq!(instr.operation, Some(Operation::Lxi(RegPair::HL)));
        assert_eq!(instr.addressing_mode, AddressingMode::ImmediateWord);
        assert_eq!(instr.operand_bytes, vec![0x00, 0x24]);
        assert_eq!(instr.size_bytes, 3);
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let instr = decode_instruction(&[0x00, 0xFF, 0xFF], 0x1000).unwrap();

        assert_eq!(instr.mnemonic, "NOP");
        assert!(instr.operand_bytes.is_empty());
        assert_eq!(instr.size_bytes, 1);
    }

    #[test]
    fn test_decode_truncated() {
        assert!(decode_instruction(&[], 0).is_none());
        assert!(decode_instruction(&[0xC3, 0x00], 0).is_none());
        assert!(decode_instruction(&[0xD3], 0).is_none());
    }

    #[test]
    fn test_decode_undocumented_alias() {
        let instr = decode_instruction(&[0xDD, 0x00, 0x10], 0).unwrap();

        assert_eq!(instr.operation, Some(Operation::Call));
        assert!(!instr.documented);
    }
}
