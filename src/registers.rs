//! # Register File
//!
//! The 8080 has seven 8-bit registers. B/C, D/E and H/L are also addressable as
//! 16-bit pairs; the pair accessors here are views over the same storage, so a
//! pair write updates both halves in one assignment.
//!
//! This module also defines the operand encodings used by the decoder
//! ([`Reg`], [`RegPair`], [`Condition`]) and the host-facing [`CpuSnapshot`].

use std::fmt;

use crate::flags::Flags;

/// 8-bit register operand, numbered as in the 3-bit opcode fields.
///
/// `M` is the memory byte addressed by HL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg {
    B,
    C,
    D,
    E,
    H,
    L,
    M,
    A,
}

impl Reg {
    /// Decodes a 3-bit register field (000 = B ... 111 = A).
    pub const fn from_bits(bits: u8) -> Reg {
        match bits & 0x07 {
            0 => Reg::B,
            1 => Reg::C,
            2 => Reg::D,
            3 => Reg::E,
            4 => Reg::H,
            5 => Reg::L,
            6 => Reg::M,
            _ => Reg::A,
        }
    }

    /// Assembler name of the register.
    pub const fn name(self) -> &'static str {
        match self {
            Reg::B => "B",
            Reg::C => "C",
            Reg::D => "D",
            Reg::E => "E",
            Reg::H => "H",
            Reg::L => "L",
            Reg::M => "M",
            Reg::A => "A",
        }
    }
}

/// 16-bit register pair operand.
///
/// Bits 4-5 of LXI/INX/DCX/DAD select BC, DE, HL or SP; the same bits on
/// PUSH/POP select BC, DE, HL or PSW.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegPair {
    BC,
    DE,
    HL,
    SP,
    PSW,
}

impl RegPair {
    /// Decodes the pair field of LXI, INX, DCX and DAD.
    pub const fn from_bits(bits: u8) -> RegPair {
        match bits & 0x03 {
            0 => RegPair::BC,
            1 => RegPair::DE,
            2 => RegPair::HL,
            _ => RegPair::SP,
        }
    }

    /// Decodes the pair field of PUSH and POP.
    pub const fn from_stack_bits(bits: u8) -> RegPair {
        match bits & 0x03 {
            0 => RegPair::BC,
            1 => RegPair::DE,
            2 => RegPair::HL,
            _ => RegPair::PSW,
        }
    }

    /// Assembler name of the pair (`B` for BC, `D` for DE, ...).
    pub const fn name(self) -> &'static str {
        match self {
            RegPair::BC => "B",
            RegPair::DE => "D",
            RegPair::HL => "H",
            RegPair::SP => "SP",
            RegPair::PSW => "PSW",
        }
    }
}

/// Branch condition, encoded in bits 3-5 of Jcc/Ccc/Rcc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    NotZero,
    Zero,
    NoCarry,
    Carry,
    ParityOdd,
    ParityEven,
    Plus,
    Minus,
}

impl Condition {
    pub const fn from_bits(bits: u8) -> Condition {
        match bits & 0x07 {
            0 => Condition::NotZero,
            1 => Condition::Zero,
            2 => Condition::NoCarry,
            3 => Condition::Carry,
            4 => Condition::ParityOdd,
            5 => Condition::ParityEven,
            6 => Condition::Plus,
            _ => Condition::Minus,
        }
    }

    /// Mnemonic suffix (`NZ`, `Z`, `NC`, ...).
    pub const fn suffix(self) -> &'static str {
        match self {
            Condition::NotZero => "NZ",
            Condition::Zero => "Z",
            Condition::NoCarry => "NC",
            Condition::Carry => "C",
            Condition::ParityOdd => "PO",
            Condition::ParityEven => "PE",
            Condition::Plus => "P",
            Condition::Minus => "M",
        }
    }

    /// Tests exactly one flag bit.
    pub fn holds(self, flags: Flags) -> bool {
        match self {
            Condition::NotZero => !flags.contains(Flags::ZERO),
            Condition::Zero => flags.contains(Flags::ZERO),
            Condition::NoCarry => !flags.contains(Flags::CARRY),
            Condition::Carry => flags.contains(Flags::CARRY),
            Condition::ParityOdd => !flags.contains(Flags::PARITY),
            Condition::ParityEven => flags.contains(Flags::PARITY),
            Condition::Plus => !flags.contains(Flags::SIGN),
            Condition::Minus => flags.contains(Flags::SIGN),
        }
    }
}

/// The seven general-purpose registers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
}

impl Registers {
    pub fn bc(&self) -> u16 {
        u16::from_be_bytes([self.b, self.c])
    }

    pub fn de(&self) -> u16 {
        u16::from_be_bytes([self.d, self.e])
    }

    pub fn hl(&self) -> u16 {
        u16::from_be_bytes([self.h, self.l])
    }

    pub fn set_bc(&mut self, value: u16) {
        [self.b, self.c] = value.to_be_bytes();
    }

    pub fn set_de(&mut self, value: u16) {
        [self.d, self.e] = value.to_be_bytes();
    }

    pub fn set_hl(&mut self, value: u16) {
        [self.h, self.l] = value.to_be_bytes();
    }

    /// Reads an 8-bit register. Returns `None` for [`Reg::M`], which lives in memory.
    pub fn get(&self, reg: Reg) -> Option<u8> {
        match reg {
            Reg::B => Some(self.b),
            Reg::C => Some(self.c),
            Reg::D => Some(self.d),
            Reg::E => Some(self.e),
            Reg::H => Some(self.h),
            Reg::L => Some(self.l),
            Reg::M => None,
            Reg::A => Some(self.a),
        }
    }

    /// Writes an 8-bit register. Returns `false` for [`Reg::M`].
    pub fn set(&mut self, reg: Reg, value: u8) -> bool {
        let slot = match reg {
            Reg::B => &mut self.b,
            Reg::C => &mut self.c,
            Reg::D => &mut self.d,
            Reg::E => &mut self.e,
            Reg::H => &mut self.h,
            Reg::L => &mut self.l,
            Reg::M => return false,
            Reg::A => &mut self.a,
        };
        *slot = value;
        true
    }
}

/// Execution state of the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunState {
    #[default]
    Running,
    Halted,
}

/// Point-in-time copy of the CPU state, for hosts and debuggers.
///
/// The `Display` form is a single trace line:
///
/// ```text
/// 0003) A=08, BC=0000, DE=0000, HL=0000, pc=0004, sp=0000, flags=.....
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CpuSnapshot {
    pub a: u8,
    pub bc: u16,
    pub de: u16,
    pub hl: u16,
    pub pc: u16,
    pub sp: u16,
    pub flags: Flags,
    pub interrupts_enabled: bool,
    pub state: RunState,
    pub instructions: u64,
}

impl fmt::Display for CpuSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = |flag: Flags, c: char| if self.flags.contains(flag) { c } else { '.' };
        write!(
            f,
            "{:04}) A={:02x}, BC={:04x}, DE={:04x}, HL={:04x}, pc={:04x}, sp={:04x}, flags={}{}{}{}{}",
            self.instructions,
            self.a,
            self.bc,
            self.de,
            self.hl,
            self.pc,
            self.sp,
            mark(Flags::ZERO, 'Z'),
            mark(Flags::SIGN, 'S'),
            mark(Flags::PARITY, 'P'),
            mark(Flags::CARRY, 'C'),
            mark(Flags::AUX_CARRY, 'A'),
        )
    }
}
