//! # Opcode Decoding and Metadata
//!
//! This module is the single source of truth for the 8080 encoding.
//!
//! [`decode`] maps an opcode byte to an [`Operation`], the value the executor
//! dispatches on. [`OPCODE_TABLE`] is computed from the same decoder at compile
//! time, so mnemonic, length and nominal state counts cannot drift away from the
//! behaviour the executor implements.
//!
//! The table covers:
//! - **244 documented opcodes**
//! - **12 undocumented encodings** that alias NOP, JMP, RET or CALL

use crate::addressing::AddressingMode;
use crate::registers::{Condition, Reg, RegPair};

/// Accumulator operation selected by bits 3-5 of the ALU groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbb,
    Ana,
    Xra,
    Ora,
    Cmp,
}

impl AluOp {
    pub const fn from_bits(bits: u8) -> AluOp {
        match bits & 0x07 {
            0 => AluOp::Add,
            1 => AluOp::Adc,
            2 => AluOp::Sub,
            3 => AluOp::Sbb,
            4 => AluOp::Ana,
            5 => AluOp::Xra,
            6 => AluOp::Ora,
            _ => AluOp::Cmp,
        }
    }

    /// Mnemonic of the register/memory form.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            AluOp::Add => "ADD",
            AluOp::Adc => "ADC",
            AluOp::Sub => "SUB",
            AluOp::Sbb => "SBB",
            AluOp::Ana => "ANA",
            AluOp::Xra => "XRA",
            AluOp::Ora => "ORA",
            AluOp::Cmp => "CMP",
        }
    }

    /// Mnemonic of the immediate form.
    pub const fn immediate_mnemonic(self) -> &'static str {
        match self {
            AluOp::Add => "ADI",
            AluOp::Adc => "ACI",
            AluOp::Sub => "SUI",
            AluOp::Sbb => "SBI",
            AluOp::Ana => "ANI",
            AluOp::Xra => "XRI",
            AluOp::Ora => "ORI",
            AluOp::Cmp => "CPI",
        }
    }
}

/// A decoded instruction, without its immediate bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Nop,
    Hlt,

    // Data transfer
    Mov(Reg, Reg),
    Mvi(Reg),
    Lxi(RegPair),
    Stax(RegPair),
    Ldax(RegPair),
    Sta,
    Lda,
    Shld,
    Lhld,
    Xchg,
    Xthl,
    Sphl,

    // Arithmetic
    Alu(AluOp, Reg),
    AluImmediate(AluOp),
    Inr(Reg),
    Dcr(Reg),
    Inx(RegPair),
    Dcx(RegPair),
    Dad(RegPair),
    Daa,

    // Logical / carry
    Cma,
    Stc,
    Cmc,

    // Rotate
    Rlc,
    Rrc,
    Ral,
    Rar,

    // Stack and control transfer
    Push(RegPair),
    Pop(RegPair),
    Jmp,
    JmpIf(Condition),
    Call,
    CallIf(Condition),
    Ret,
    RetIf(Condition),
    Rst(u8),
    Pchl,

    // I/O and interrupts
    In,
    Out,
    Ei,
    Di,
}

impl Operation {
    /// Instruction mnemonic, without operands.
    pub const fn mnemonic(self) -> &'static str {
        use Operation::*;
        match self {
            Nop => "NOP",
            Hlt => "HLT",
            Mov(..) => "MOV",
            Mvi(_) => "MVI",
            Lxi(_) => "LXI",
            Stax(_) => "STAX",
            Ldax(_) => "LDAX",
            Sta => "STA",
            Lda => "LDA",
            Shld => "SHLD",
            Lhld => "LHLD",
            Xchg => "XCHG",
            Xthl => "XTHL",
            Sphl => "SPHL",
            Alu(op, _) => op.mnemonic(),
            AluImmediate(op) => op.immediate_mnemonic(),
            Inr(_) => "INR",
            Dcr(_) => "DCR",
            Inx(_) => "INX",
            Dcx(_) => "DCX",
            Dad(_) => "DAD",
            Daa => "DAA",
            Cma => "CMA",
            Stc => "STC",
            Cmc => "CMC",
            Rlc => "RLC",
            Rrc => "RRC",
            Ral => "RAL",
            Rar => "RAR",
            Push(_) => "PUSH",
            Pop(_) => "POP",
            Jmp => "JMP",
            JmpIf(cond) => match cond {
                Condition::NotZero => "JNZ",
                Condition::Zero => "JZ",
                Condition::NoCarry => "JNC",
                Condition::Carry => "JC",
                Condition::ParityOdd => "JPO",
                Condition::ParityEven => "JPE",
                Condition::Plus => "JP",
                Condition::Minus => "JM",
            },
            Call => "CALL",
            CallIf(cond) => match cond {
                Condition::NotZero => "CNZ",
                Condition::Zero => "CZ",
                Condition::NoCarry => "CNC",
                Condition::Carry => "CC",
                Condition::ParityOdd => "CPO",
                Condition::ParityEven => "CPE",
                Condition::Plus => "CP",
                Condition::Minus => "CM",
            },
            Ret => "RET",
            RetIf(cond) => match cond {
                Condition::NotZero => "RNZ",
                Condition::Zero => "RZ",
                Condition::NoCarry => "RNC",
                Condition::Carry => "RC",
                Condition::ParityOdd => "RPO",
                Condition::ParityEven => "RPE",
                Condition::Plus => "RP",
                Condition::Minus => "RM",
            },
            Rst(_) => "RST",
            Pchl => "PCHL",
            In => "IN",
            Out => "OUT",
            Ei => "EI",
            Di => "DI",
        }
    }

    /// How the operands are located.
    pub const fn addressing_mode(self) -> AddressingMode {
        use Operation::*;
        match self {
            Mov(Reg::M, _) | Mov(_, Reg::M) => AddressingMode::RegisterIndirect,
            Alu(_, Reg::M) | Inr(Reg::M) | Dcr(Reg::M) => AddressingMode::RegisterIndirect,
            Stax(_) | Ldax(_) => AddressingMode::RegisterIndirect,
            Mov(..) | Alu(..) | Inr(_) | Dcr(_) => AddressingMode::Register,
            Inx(_) | Dcx(_) | Dad(_) | Push(_) | Pop(_) => AddressingMode::Register,
            Mvi(_) | AluImmediate(_) => AddressingMode::Immediate,
            Lxi(_) => AddressingMode::ImmediateWord,
            Sta | Lda | Shld | Lhld | Jmp | JmpIf(_) | Call | CallIf(_) => AddressingMode::Direct,
            In | Out => AddressingMode::Port,
            Nop | Hlt | Xchg | Xthl | Sphl | Daa | Cma | Stc | Cmc | Rlc | Rrc | Ral | Rar
            | Ret | RetIf(_) | Rst(_) | Pchl | Ei | Di => AddressingMode::Implied,
        }
    }

    /// Nominal state count from the 8080 data sheet, branch not taken.
    ///
    /// Informational only; the executor does not model timing.
    pub const fn states(self) -> u8 {
        use Operation::*;
        match self {
            Mov(Reg::M, _) | Mov(_, Reg::M) => 7,
            Mov(..) => 5,
            Mvi(Reg::M) => 10,
            Mvi(_) => 7,
            Lxi(_) => 10,
            Stax(_) | Ldax(_) => 7,
            Sta | Lda => 13,
            Shld | Lhld => 16,
            Xchg => 4,
            Xthl => 18,
            Sphl => 5,
            Alu(_, Reg::M) => 7,
            Alu(..) => 4,
            AluImmediate(_) => 7,
            Inr(Reg::M) | Dcr(Reg::M) => 10,
            Inr(_) | Dcr(_) => 5,
            Inx(_) | Dcx(_) => 5,
            Dad(_) => 10,
            Nop | Daa | Cma | Stc | Cmc | Rlc | Rrc | Ral | Rar | Ei | Di => 4,
            Hlt => 7,
            Push(_) => 11,
            Pop(_) => 10,
            Jmp | JmpIf(_) => 10,
            Call => 17,
            CallIf(_) => 11,
            Ret => 10,
            RetIf(_) => 5,
            Rst(_) => 11,
            Pchl => 5,
            In | Out => 10,
        }
    }
}

/// Decodes an opcode byte.
///
/// Every one of the 256 encodings maps to an operation; undocumented encodings
/// decode to the operation they alias (see [`is_undocumented`]).
///
/// # Examples
///
/// ```
/// use lib8080::opcodes::{decode, Operation};
/// use lib8080::registers::Reg;
///
/// assert_eq!(decode(0x78), Operation::Mov(Reg::A, Reg::B));
/// assert_eq!(decode(0xCB), Operation::Jmp);
/// ```
pub const fn decode(opcode: u8) -> Operation {
    use Operation::*;

    let dst = Reg::from_bits(opcode >> 3);
    let src = Reg::from_bits(opcode);
    let pair = RegPair::from_bits(opcode >> 4);
    let cond = Condition::from_bits(opcode >> 3);

    match opcode {
        0x76 => Hlt,
        0x40..=0x7F => Mov(dst, src),
        0x80..=0xBF => Alu(AluOp::from_bits(opcode >> 3), src),
        0x00..=0x3F => match opcode & 0x07 {
            0 => Nop,
            1 if opcode & 0x08 == 0 => Lxi(pair),
            1 => Dad(pair),
            2 => match opcode {
                0x02 | 0x12 => Stax(pair),
                0x0A | 0x1A => Ldax(pair),
                0x22 => Shld,
                0x2A => Lhld,
                0x32 => Sta,
                _ => Lda,
            },
            3 if opcode & 0x08 == 0 => Inx(pair),
            3 => Dcx(pair),
            4 => Inr(dst),
            5 => Dcr(dst),
            6 => Mvi(dst),
            _ => match opcode {
                0x07 => Rlc,
                0x0F => Rrc,
                0x17 => Ral,
                0x1F => Rar,
                0x27 => Daa,
                0x2F => Cma,
                0x37 => Stc,
                _ => Cmc,
            },
        },
        _ => match opcode & 0x07 {
            0 => RetIf(cond),
            1 if opcode & 0x08 == 0 => Pop(RegPair::from_stack_bits(opcode >> 4)),
            1 => match opcode {
                0xC9 | 0xD9 => Ret,
                0xE9 => Pchl,
                _ => Sphl,
            },
            2 => JmpIf(cond),
            3 => match opcode {
                0xC3 | 0xCB => Jmp,
                0xD3 => Out,
                0xDB => In,
                0xE3 => Xthl,
                0xEB => Xchg,
                0xF3 => Di,
                _ => Ei,
            },
            4 => CallIf(cond),
            5 if opcode & 0x08 == 0 => Push(RegPair::from_stack_bits(opcode >> 4)),
            5 => Call,
            6 => AluImmediate(AluOp::from_bits(opcode >> 3)),
            _ => Rst((opcode >> 3) & 0x07),
        },
    }
}

/// Returns true for the 12 encodings absent from the Intel documentation.
pub const fn is_undocumented(opcode: u8) -> bool {
    matches!(
        opcode,
        0x08 | 0x10 | 0x18 | 0x20 | 0x28 | 0x30 | 0x38 | 0xCB | 0xD9 | 0xDD | 0xED | 0xFD
    )
}

/// Metadata for a single 8080 opcode.
///
/// # Examples
///
/// ```
/// use lib8080::{AddressingMode, OPCODE_TABLE};
///
/// // MVI A,d8 (opcode 0x3E)
/// let mvi = &OPCODE_TABLE[0x3E];
/// assert_eq!(mvi.mnemonic, "MVI");
/// assert_eq!(mvi.addressing_mode, AddressingMode::Immediate);
/// assert_eq!(mvi.size_bytes, 2);
/// assert!(mvi.documented);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeMetadata {
    /// Decoded operation.
    pub operation: Operation,

    /// Instruction mnemonic (e.g., "MOV", "LXI", "RNZ").
    pub mnemonic: &'static str,

    /// Addressing mode for this instruction.
    pub addressing_mode: AddressingMode,

    /// Nominal state count (branch not taken).
    pub states: u8,

    /// Total instruction size in bytes (opcode + operands, 1-3).
    pub size_bytes: u8,

    /// False for the 12 undocumented alias encodings.
    pub documented: bool,
}

const fn describe(opcode: u8) -> OpcodeMetadata {
    let operation = decode(opcode);
    let addressing_mode = operation.addressing_mode();
    OpcodeMetadata {
        operation,
        mnemonic: operation.mnemonic(),
        addressing_mode,
        states: operation.states(),
        size_bytes: addressing_mode.size_bytes(),
        documented: !is_undocumented(opcode),
    }
}

const fn build_table() -> [OpcodeMetadata; 256] {
    let mut table = [describe(0x00); 256];
    let mut opcode = 0;
    while opcode < 256 {
        table[opcode] = describe(opcode as u8);
        opcode += 1;
    }
    table
}

/// Complete 256-entry opcode metadata table indexed by opcode byte value.
pub const OPCODE_TABLE: [OpcodeMetadata; 256] = build_table();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_count() {
        let documented = OPCODE_TABLE.iter().filter(|m| m.documented).count();
        assert_eq!(documented, 244);
    }

    #[test]
    fn test_hlt_sits_in_mov_block() {
        assert_eq!(decode(0x76), Operation::Hlt);
        assert_eq!(decode(0x77), Operation::Mov(Reg::M, Reg::A));
        assert_eq!(decode(0x7E), Operation::Mov(Reg::A, Reg::M));
    }

    #[test]
    fn test_pair_fields() {
        assert_eq!(decode(0x31), Operation::Lxi(RegPair::SP));
        assert_eq!(decode(0x39), Operation::Dad(RegPair::SP));
        assert_eq!(decode(0xF5), Operation::Push(RegPair::PSW));
        assert_eq!(decode(0xF1), Operation::Pop(RegPair::PSW));
        assert_eq!(decode(0x1A), Operation::Ldax(RegPair::DE));
    }

    #[test]
    fn test_undocumented_aliases() {
        for opcode in [0x08, 0x10, 0x18, 0x20, 0x28, 0x30, 0x38] {
            assert_eq!(decode(opcode), Operation::Nop);
        }
        assert_eq!(decode(0xCB), Operation::Jmp);
        assert_eq!(decode(0xD9), Operation::Ret);
        for opcode in [0xDD, 0xED, 0xFD] {
            assert_eq!(decode(opcode), Operation::Call);
        }
    }

    #[test]
    fn test_condition_and_rst_fields() {
        assert_eq!(decode(0xC2), Operation::JmpIf(Condition::NotZero));
        assert_eq!(decode(0xFC), Operation::CallIf(Condition::Minus));
        assert_eq!(decode(0xE8), Operation::RetIf(Condition::ParityEven));
        assert_eq!(decode(0xFF), Operation::Rst(7));
        assert_eq!(OPCODE_TABLE[0xFE].mnemonic, "CPI");
    }
}
