//! # Addressing Modes
//!
//! The 8080 instruction set uses a handful of ways to locate operands. The mode
//! fixes how many bytes follow the opcode.

/// 8080 addressing mode enumeration.
///
/// # Operand Sizes
///
/// - **0 bytes**: Implied, Register, RegisterIndirect
/// - **1 byte**: Immediate, Port
/// - **2 bytes**: ImmediateWord, Direct
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    /// No operand, or the operand is fixed by the opcode.
    ///
    /// Examples: NOP, RLC, RST 3
    Implied,

    /// Operands are registers named in the opcode.
    ///
    /// Examples: MOV B,C, ADD E, INX H
    Register,

    /// Memory addressed by a register pair (M = HL, or BC/DE for STAX/LDAX).
    ///
    /// Examples: MOV A,M, LDAX D
    RegisterIndirect,

    /// 8-bit constant following the opcode.
    ///
    /// Example: MVI A,05h
    Immediate,

    /// 16-bit constant following the opcode, low byte first.
    ///
    /// Example: LXI H,2400h
    ImmediateWord,

    /// 16-bit memory or jump address following the opcode, low byte first.
    ///
    /// Examples: STA 2000h, JMP 0100h, CALL 1234h
    Direct,

    /// 8-bit I/O port number following the opcode.
    ///
    /// Examples: IN 01h, OUT 06h
    Port,
}

impl AddressingMode {
    /// Total instruction length in bytes (opcode + operands).
    pub const fn size_bytes(self) -> u8 {
        match self {
            AddressingMode::Implied
            | AddressingMode::Register
            | AddressingMode::RegisterIndirect => 1,
            AddressingMode::Immediate | AddressingMode::Port => 2,
            AddressingMode::ImmediateWord | AddressingMode::Direct => 3,
        }
    }
}
