//! # Increment and Decrement Instructions
//!
//! - INR / DCR: 8-bit increment/decrement of a register or M. Carry is preserved.
//! - INX / DCX: 16-bit increment/decrement of a pair. No flags.
//! - DAD: Add a pair to HL. Only Carry changes.

use super::Flow;
use crate::flags;
use crate::io::PortBus;
use crate::memory::MemoryBus;
use crate::registers::{Reg, RegPair};
use crate::{ExecutionError, CPU};

/// Executes INR r / INR M.
pub(crate) fn execute_inr<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
    reg: Reg,
) -> Result<Flow, ExecutionError> {
    let (result, new_flags) = flags::inr(cpu.reg(reg)?, cpu.flags);
    cpu.set_reg(reg, result)?;
    cpu.flags = new_flags;
    Ok(Flow::Next)
}

/// Executes DCR r / DCR M.
pub(crate) fn execute_dcr<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
    reg: Reg,
) -> Result<Flow, ExecutionError> {
    let (result, new_flags) = flags::dcr(cpu.reg(reg)?, cpu.flags);
    cpu.set_reg(reg, result)?;
    cpu.flags = new_flags;
    Ok(Flow::Next)
}

/// Executes INX rp.
pub(crate) fn execute_inx<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
    pair: RegPair,
) -> Result<Flow, ExecutionError> {
    let value = cpu.pair(pair).wrapping_add(1);
    cpu.set_pair(pair, value);
    Ok(Flow::Next)
}

/// Executes DCX rp.
pub(crate) fn execute_dcx<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
    pair: RegPair,
) -> Result<Flow, ExecutionError> {
    let value = cpu.pair(pair).wrapping_sub(1);
    cpu.set_pair(pair, value);
    Ok(Flow::Next)
}

/// Executes DAD rp.
pub(crate) fn execute_dad<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
    pair: RegPair,
) -> Result<Flow, ExecutionError> {
    let (result, new_flags) = flags::dad(cpu.regs.hl(), cpu.pair(pair), cpu.flags);
    cpu.regs.set_hl(result);
    cpu.flags = new_flags;
    Ok(Flow::Next)
}
