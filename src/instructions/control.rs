//! # Control Flow Instructions
//!
//! This module implements control transfer:
//! - JMP / Jcc: Jump, unconditionally or on a flag
//! - CALL / Ccc: Push the return address and jump
//! - RET / Rcc: Pop PC
//! - RST n: One-byte call to n * 8
//!
//! The return address pushed by CALL and RST is the address of the next
//! instruction, so RET resumes right after the call. Conditional forms test a
//! single flag: a taken branch loads PC, an untaken one falls through to the next
//! instruction.

use super::Flow;
use crate::io::PortBus;
use crate::memory::MemoryBus;
use crate::registers::Condition;
use crate::{ExecutionError, CPU, OPCODE_TABLE};

fn taken<M: MemoryBus, P: PortBus>(cpu: &CPU<M, P>, condition: Option<Condition>) -> bool {
    condition.map_or(true, |cond| cond.holds(cpu.flags))
}

/// Address of the instruction after the one at PC.
fn return_address<M: MemoryBus, P: PortBus>(
    cpu: &CPU<M, P>,
    size_bytes: u8,
) -> Result<u16, ExecutionError> {
    cpu.operand_address(size_bytes as u16)
}

/// Executes JMP a16 / Jcc a16.
pub(crate) fn execute_jmp<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
    condition: Option<Condition>,
) -> Result<Flow, ExecutionError> {
    let target = cpu.fetch_word()?;

    if taken(cpu, condition) {
        cpu.pc = target;
        Ok(Flow::Jump)
    } else {
        Ok(Flow::Next)
    }
}

/// Executes CALL a16 / Ccc a16.
///
/// Pushes PC+3, the address of the instruction following the call.
pub(crate) fn execute_call<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
    condition: Option<Condition>,
) -> Result<Flow, ExecutionError> {
    let target = cpu.fetch_word()?;

    if !taken(cpu, condition) {
        return Ok(Flow::Next);
    }

    let ret = return_address(cpu, OPCODE_TABLE[0xCD].size_bytes)?;
    cpu.push_word(ret)?;
    cpu.pc = target;
    Ok(Flow::Jump)
}

/// Executes RET / Rcc.
pub(crate) fn execute_ret<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
    condition: Option<Condition>,
) -> Result<Flow, ExecutionError> {
    if !taken(cpu, condition) {
        return Ok(Flow::Next);
    }

    cpu.pc = cpu.pop_word()?;
    Ok(Flow::Jump)
}

/// Executes RST n: pushes PC+1 and jumps to n * 8.
pub(crate) fn execute_rst<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
    vector: u8,
) -> Result<Flow, ExecutionError> {
    let ret = return_address(cpu, OPCODE_TABLE[0xC7].size_bytes)?;
    restart(cpu, ret, vector)?;
    Ok(Flow::Jump)
}

/// Pushes `return_to` and loads PC with `vector * 8`.
///
/// Shared by RST and by interrupt delivery, which pushes the current PC instead.
pub(crate) fn restart<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
    return_to: u16,
    vector: u8,
) -> Result<(), ExecutionError> {
    cpu.push_word(return_to)?;
    cpu.pc = (vector as u16 & 0x07) * 8;
    Ok(())
}
