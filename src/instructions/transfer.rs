//! # Register Pair Transfers
//!
//! - XCHG: Exchange HL with DE
//! - XTHL: Exchange HL with the word on top of the stack
//! - SPHL: Load SP from HL
//! - PCHL: Load PC from HL (jump through HL)

use super::Flow;
use crate::io::PortBus;
use crate::memory::MemoryBus;
use crate::{ExecutionError, CPU};

/// Executes XCHG. Both pairs swap in one step; applying it twice is a no-op.
pub(crate) fn execute_xchg<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
) -> Result<Flow, ExecutionError> {
    let regs = &mut cpu.regs;
    std::mem::swap(&mut regs.h, &mut regs.d);
    std::mem::swap(&mut regs.l, &mut regs.e);
    Ok(Flow::Next)
}

/// Executes XTHL: L <-> (SP), H <-> (SP + 1). SP is unchanged.
pub(crate) fn execute_xthl<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
) -> Result<Flow, ExecutionError> {
    let sp = cpu.sp;
    let top = cpu.read_word(sp)?;
    cpu.write_word(sp, cpu.regs.hl())?;
    cpu.regs.set_hl(top);
    Ok(Flow::Next)
}

/// Executes SPHL.
pub(crate) fn execute_sphl<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
) -> Result<Flow, ExecutionError> {
    cpu.sp = cpu.regs.hl();
    Ok(Flow::Next)
}

/// Executes PCHL.
pub(crate) fn execute_pchl<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
) -> Result<Flow, ExecutionError> {
    cpu.pc = cpu.regs.hl();
    Ok(Flow::Jump)
}
