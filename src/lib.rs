//! # 8080 CPU Emulator Core
//!
//! An instruction-level Intel 8080 emulator designed for embedding: the host owns
//! program loading, display and input, and drives the CPU one instruction at a
//! time.
//!
//! ## Quick Start
//!
//! ```rust
//! use lib8080::{CPU, MemoryImage, RunState};
//!
//! // MVI A,05h; ADI 03h; HLT
//! let mut memory = MemoryImage::new();
//! memory.load(0x0000, &[0x3E, 0x05, 0xC6, 0x03, 0x76]).unwrap();
//!
//! let mut cpu = CPU::new(memory);
//! let summary = cpu.run(100).unwrap();
//!
//! assert_eq!(summary.state, RunState::Halted);
//! assert_eq!(cpu.a(), 0x08);
//! assert_eq!(cpu.instructions(), 3);
//! ```
//!
//! ## Architecture
//!
//! - **Modularity**: memory and I/O ports sit behind the `MemoryBus` and `PortBus` traits
//! - **Owned state**: every operation goes through an explicit `CPU` value, no globals
//! - **Table-driven decode**: one decoder produces both dispatch and opcode metadata
//! - **Errors as values**: faults come back as `Result`s for the host to act on
//!
//! ## Modules
//!
//! - `flags` - Flag unit: condition code computation and PSW packing
//! - `registers` - Register file, operand encodings and CPU snapshots
//! - `memory` - MemoryBus trait and the bounds-checked `MemoryImage`
//! - `io` - PortBus trait and the `IoPorts` input table / output callback
//! - `opcodes` - Decoder and opcode metadata table
//! - `cpu` - CPU state and the fetch-decode-execute loop
//! - `interrupts` - Vectored interrupt delivery
//! - `disassembler` - Intel-syntax disassembly for traces and debuggers
//! - `wasm` - JavaScript bindings (behind the `wasm` feature)

pub mod addressing;
pub mod config;
pub mod cpu;
pub mod disassembler;
pub mod flags;
pub mod interrupts;
pub mod io;
pub mod memory;
pub mod opcodes;
pub mod registers;

// Internal instruction implementations (not part of public API)
mod instructions;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export public API
pub use addressing::AddressingMode;
pub use config::{CpuConfig, UndocumentedPolicy};
pub use cpu::{RunSummary, CPU};
pub use disassembler::{
    decode_instruction, disassemble, format_instruction, format_listing, DisassemblyOptions,
    Instruction,
};
pub use flags::Flags;
pub use interrupts::{InterruptError, InterruptOutcome};
pub use io::{IoPorts, PortBus};
pub use memory::{MemoryBus, MemoryImage, OutOfBounds};
pub use opcodes::{OpcodeMetadata, Operation, OPCODE_TABLE};
pub use registers::{CpuSnapshot, RunState};

use thiserror::Error;

/// Errors that can occur during CPU execution.
///
/// Each error is scoped to the `step` call that produced it. The host decides
/// whether to stop, log and continue, or fail a test.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// The opcode has no behaviour under the current configuration.
    ///
    /// The CPU is left `Halted` with `pc` still pointing at the opcode.
    #[error("opcode 0x{opcode:02X} at 0x{pc:04X} is not implemented")]
    UnimplementedOpcode { pc: u16, opcode: u8 },

    /// An instruction fetch, operand, stack or data access fell outside memory.
    ///
    /// The instruction is abandoned before any state is written. `addr` is the
    /// first byte that could not be reached; an access or fall-through running
    /// past 0xFFFF reports 0x10000.
    #[error("instruction at 0x{pc:04X} accessed 0x{addr:04X} outside the {size}-byte memory image")]
    OutOfBoundsAccess { pc: u16, addr: u32, size: usize },
}
