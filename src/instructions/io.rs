//! # I/O and Machine Control Instructions
//!
//! - IN port: A <- input snapshot for `port`
//! - OUT port: deliver (port, A) to the port bus
//! - EI / DI: Set / clear the interrupt enable latch
//! - HLT: Enter the Halted state
//!
//! None of these affect the condition flags.

use tracing::trace;

use super::Flow;
use crate::io::PortBus;
use crate::memory::MemoryBus;
use crate::registers::RunState;
use crate::{ExecutionError, CPU};

/// Executes IN d8.
pub(crate) fn execute_in<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
) -> Result<Flow, ExecutionError> {
    let port = cpu.fetch_byte()?;
    cpu.regs.a = cpu.ports.input(port);
    Ok(Flow::Next)
}

/// Executes OUT d8.
pub(crate) fn execute_out<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
) -> Result<Flow, ExecutionError> {
    let port = cpu.fetch_byte()?;
    let value = cpu.regs.a;
    trace!(port, value, "port output");
    cpu.ports.output(port, value);
    Ok(Flow::Next)
}

/// Executes EI.
pub(crate) fn execute_ei<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
) -> Result<Flow, ExecutionError> {
    cpu.interrupts_enabled = true;
    Ok(Flow::Next)
}

/// Executes DI.
pub(crate) fn execute_di<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
) -> Result<Flow, ExecutionError> {
    cpu.interrupts_enabled = false;
    Ok(Flow::Next)
}

/// Executes HLT. PC still advances past the opcode, so an interrupt that wakes
/// the CPU returns to the instruction after HLT.
pub(crate) fn execute_hlt<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
) -> Result<Flow, ExecutionError> {
    cpu.state = RunState::Halted;
    Ok(Flow::Next)
}
