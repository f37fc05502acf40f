//! # ALU (Arithmetic Logic Unit) Instructions
//!
//! This module implements the accumulator operations:
//! - ADD / ADC / SUB / SBB and their immediate forms ADI / ACI / SUI / SBI
//! - ANA / XRA / ORA and ANI / XRI / ORI
//! - CMP / CPI: subtract for flags only
//! - DAA: Decimal adjust
//! - CMA: Complement accumulator (no flags)
//! - STC / CMC: Set / complement carry
//!
//! Flag computation lives in [`crate::flags`]; this module only routes operands
//! and results.

use super::Flow;
use crate::flags::{self, Flags};
use crate::io::PortBus;
use crate::memory::MemoryBus;
use crate::opcodes::AluOp;
use crate::{ExecutionError, CPU};

/// Executes one of the eight accumulator operations against `value`.
///
/// `value` is already resolved from a register, from M, or from the immediate
/// byte, so the register and immediate forms share this path.
pub(crate) fn execute_alu<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
    op: AluOp,
    value: u8,
) -> Result<Flow, ExecutionError> {
    let a = cpu.regs.a;
    let carry = cpu.flags.contains(Flags::CARRY);

    let (result, new_flags) = match op {
        AluOp::Add => flags::add(a, value, false),
        AluOp::Adc => flags::add(a, value, carry),
        AluOp::Sub | AluOp::Cmp => flags::sub(a, value, false),
        AluOp::Sbb => flags::sub(a, value, carry),
        AluOp::Ana => flags::and(a, value),
        AluOp::Xra => flags::xor(a, value),
        AluOp::Ora => flags::or(a, value),
    };

    cpu.flags = new_flags;
    if op != AluOp::Cmp {
        cpu.regs.a = result;
    }

    Ok(Flow::Next)
}

/// Executes DAA.
pub(crate) fn execute_daa<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
) -> Result<Flow, ExecutionError> {
    let (result, new_flags) = flags::daa(cpu.regs.a, cpu.flags);
    cpu.regs.a = result;
    cpu.flags = new_flags;
    Ok(Flow::Next)
}

/// Executes CMA. No flags are affected.
pub(crate) fn execute_cma<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
) -> Result<Flow, ExecutionError> {
    cpu.regs.a = !cpu.regs.a;
    Ok(Flow::Next)
}

/// Executes STC.
pub(crate) fn execute_stc<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
) -> Result<Flow, ExecutionError> {
    cpu.flags.insert(Flags::CARRY);
    Ok(Flow::Next)
}

/// Executes CMC.
pub(crate) fn execute_cmc<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
) -> Result<Flow, ExecutionError> {
    cpu.flags.toggle(Flags::CARRY);
    Ok(Flow::Next)
}
