//! # Stack Operations
//!
//! This module implements PUSH and POP for BC, DE, HL and PSW.
//!
//! The stack lives in main memory and grows downward. PUSH stores the high byte
//! at SP-1 and the low byte at SP-2, then sets SP to SP-2; POP reverses it.
//! PSW is the accumulator (high) plus the packed flag byte (low).

use super::Flow;
use crate::io::PortBus;
use crate::memory::MemoryBus;
use crate::registers::RegPair;
use crate::{ExecutionError, CPU};

/// Executes PUSH rp.
///
/// Flags affected: None
pub(crate) fn execute_push<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
    pair: RegPair,
) -> Result<Flow, ExecutionError> {
    let value = cpu.pair(pair);
    cpu.push_word(value)?;
    Ok(Flow::Next)
}

/// Executes POP rp.
///
/// Flags affected: all five for POP PSW, none otherwise
pub(crate) fn execute_pop<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
    pair: RegPair,
) -> Result<Flow, ExecutionError> {
    let value = cpu.pop_word()?;
    cpu.set_pair(pair, value);
    Ok(Flow::Next)
}
