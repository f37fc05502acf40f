//! Vectored interrupt delivery.
//!
//! The 8080 samples its interrupt line between instructions. When interrupts are
//! enabled, the interrupting device jams an `RST n` onto the data bus: the CPU
//! pushes PC and continues at `n * 8`, with further interrupts disabled until the
//! handler executes EI.
//!
//! This core models that with [`CPU::request_interrupt`], which the host calls
//! between [`CPU::step`] invocations. There is no pending-interrupt latch: a
//! request made while interrupts are disabled is dropped.
//!
//! # Example
//!
//! ```rust
//! use lib8080::{CPU, CpuConfig, InterruptOutcome, MemoryImage};
//!
//! let config = CpuConfig::default().with_entry_pc(0x0100).with_entry_sp(0x2400);
//! let mut cpu = CPU::with_config(MemoryImage::new(), config);
//!
//! // Interrupts start disabled: the request is dropped
//! assert_eq!(cpu.request_interrupt(2), Ok(InterruptOutcome::Ignored));
//!
//! cpu.set_interrupts_enabled(true);
//! assert_eq!(cpu.request_interrupt(2), Ok(InterruptOutcome::Serviced));
//! assert_eq!(cpu.pc(), 0x0010);
//! assert_eq!(cpu.sp(), 0x23FE);
//! assert!(!cpu.interrupts_enabled());
//! ```

use thiserror::Error;
use tracing::trace;

use crate::instructions::control;
use crate::io::PortBus;
use crate::memory::MemoryBus;
use crate::registers::RunState;
use crate::{ExecutionError, CPU};

/// Highest RST vector number.
pub const MAX_VECTOR: u8 = 7;

/// What happened to an interrupt request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptOutcome {
    /// Interrupts were disabled; nothing changed.
    Ignored,
    /// PC was pushed and the CPU now executes the handler.
    Serviced,
}

/// Errors from [`CPU::request_interrupt`]. No state changes on error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterruptError {
    /// Vector outside 0..=7.
    #[error("interrupt vector {0} is out of range (0-7)")]
    InvalidVector(u8),

    /// Pushing the return address fell outside memory.
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl<M: MemoryBus, P: PortBus> CPU<M, P> {
    /// Requests a vectored interrupt (`RST vector`).
    ///
    /// Must only be called between instructions. If interrupts are enabled this
    /// clears the enable latch, pushes the current PC exactly as CALL would, sets
    /// `pc = vector * 8`, and wakes a halted CPU.
    ///
    /// # Returns
    ///
    /// - `Ok(InterruptOutcome::Ignored)` if interrupts are disabled
    /// - `Ok(InterruptOutcome::Serviced)` if the interrupt was taken
    /// - `Err(InterruptError::InvalidVector)` if `vector > 7`
    pub fn request_interrupt(&mut self, vector: u8) -> Result<InterruptOutcome, InterruptError> {
        if vector > MAX_VECTOR {
            return Err(InterruptError::InvalidVector(vector));
        }

        if !self.interrupts_enabled {
            trace!(vector, "interrupt ignored, interrupts disabled");
            return Ok(InterruptOutcome::Ignored);
        }

        let return_to = self.pc;
        control::restart(self, return_to, vector)?;
        self.interrupts_enabled = false;
        self.state = RunState::Running;

        trace!(vector, return_to, pc = self.pc, "interrupt serviced");
        Ok(InterruptOutcome::Serviced)
    }
}
