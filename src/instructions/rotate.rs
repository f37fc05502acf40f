//! # Rotate Instructions
//!
//! This module implements the accumulator rotates:
//! - RLC: Rotate left, bit 7 to bit 0 and to Carry
//! - RRC: Rotate right, bit 0 to bit 7 and to Carry
//! - RAL: Rotate left through Carry
//! - RAR: Rotate right through Carry
//!
//! Only Carry is affected.

use super::Flow;
use crate::flags::Flags;
use crate::io::PortBus;
use crate::memory::MemoryBus;
use crate::{ExecutionError, CPU};

/// Executes RLC.
pub(crate) fn execute_rlc<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
) -> Result<Flow, ExecutionError> {
    let a = cpu.regs.a;
    cpu.regs.a = a.rotate_left(1);
    cpu.flags.set(Flags::CARRY, a & 0x80 != 0);
    Ok(Flow::Next)
}

/// Executes RRC.
pub(crate) fn execute_rrc<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
) -> Result<Flow, ExecutionError> {
    let a = cpu.regs.a;
    cpu.regs.a = a.rotate_right(1);
    cpu.flags.set(Flags::CARRY, a & 0x01 != 0);
    Ok(Flow::Next)
}

/// Executes RAL: the old Carry enters bit 0, bit 7 becomes the new Carry.
pub(crate) fn execute_ral<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
) -> Result<Flow, ExecutionError> {
    let a = cpu.regs.a;
    let carry_in = cpu.flags.contains(Flags::CARRY) as u8;
    cpu.regs.a = (a << 1) | carry_in;
    cpu.flags.set(Flags::CARRY, a & 0x80 != 0);
    Ok(Flow::Next)
}

/// Executes RAR: the old Carry enters bit 7, bit 0 becomes the new Carry.
pub(crate) fn execute_rar<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
) -> Result<Flow, ExecutionError> {
    let a = cpu.regs.a;
    let carry_in = cpu.flags.contains(Flags::CARRY) as u8;
    cpu.regs.a = (a >> 1) | (carry_in << 7);
    cpu.flags.set(Flags::CARRY, a & 0x01 != 0);
    Ok(Flow::Next)
}
