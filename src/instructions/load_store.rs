//! # Load and Store Instructions
//!
//! This module implements the data transfer group:
//! - MOV: Register/memory to register/memory
//! - MVI: Move immediate
//! - LXI: Load register pair immediate
//! - STA / LDA: Store/load accumulator direct
//! - STAX / LDAX: Store/load accumulator through BC or DE
//! - SHLD / LHLD: Store/load HL direct
//!
//! None of these affect the flags. `M` as an operand is the byte at HL.

use super::Flow;
use crate::io::PortBus;
use crate::memory::MemoryBus;
use crate::registers::{Reg, RegPair};
use crate::{ExecutionError, CPU};

/// Executes MOV dst,src.
///
/// The register-to-itself forms (MOV B,B etc.) are plain no-ops.
pub(crate) fn execute_mov<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
    dst: Reg,
    src: Reg,
) -> Result<Flow, ExecutionError> {
    let value = cpu.reg(src)?;
    cpu.set_reg(dst, value)?;
    Ok(Flow::Next)
}

/// Executes MVI r,d8.
pub(crate) fn execute_mvi<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
    reg: Reg,
) -> Result<Flow, ExecutionError> {
    let value = cpu.fetch_byte()?;
    cpu.set_reg(reg, value)?;
    Ok(Flow::Next)
}

/// Executes LXI rp,d16. Byte 2 goes to the high register, byte 1 to the low.
pub(crate) fn execute_lxi<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
    pair: RegPair,
) -> Result<Flow, ExecutionError> {
    let value = cpu.fetch_word()?;
    cpu.set_pair(pair, value);
    Ok(Flow::Next)
}

/// Executes STAX B / STAX D.
pub(crate) fn execute_stax<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
    pair: RegPair,
) -> Result<Flow, ExecutionError> {
    let addr = cpu.pair(pair);
    cpu.write_byte(addr, cpu.regs.a)?;
    Ok(Flow::Next)
}

/// Executes LDAX B / LDAX D.
pub(crate) fn execute_ldax<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
    pair: RegPair,
) -> Result<Flow, ExecutionError> {
    let addr = cpu.pair(pair);
    cpu.regs.a = cpu.read_byte(addr)?;
    Ok(Flow::Next)
}

/// Executes STA a16.
pub(crate) fn execute_sta<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
) -> Result<Flow, ExecutionError> {
    let addr = cpu.fetch_word()?;
    cpu.write_byte(addr, cpu.regs.a)?;
    Ok(Flow::Next)
}

/// Executes LDA a16.
pub(crate) fn execute_lda<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
) -> Result<Flow, ExecutionError> {
    let addr = cpu.fetch_word()?;
    cpu.regs.a = cpu.read_byte(addr)?;
    Ok(Flow::Next)
}

/// Executes SHLD a16: L to (a16), H to (a16 + 1).
pub(crate) fn execute_shld<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
) -> Result<Flow, ExecutionError> {
    let addr = cpu.fetch_word()?;
    cpu.write_word(addr, cpu.regs.hl())?;
    Ok(Flow::Next)
}

/// Executes LHLD a16: L from (a16), H from (a16 + 1).
pub(crate) fn execute_lhld<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
) -> Result<Flow, ExecutionError> {
    let addr = cpu.fetch_word()?;
    let value = cpu.read_word(addr)?;
    cpu.regs.set_hl(value);
    Ok(Flow::Next)
}
