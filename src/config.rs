//! CPU configuration supplied by the host before the run starts.

use crate::memory::ADDRESS_SPACE;

/// What the executor does with the 12 undocumented encodings.
///
/// The 8080 decodes 0x08/0x10/0x18/0x20/0x28/0x30/0x38 as NOP, 0xCB as JMP,
/// 0xD9 as RET and 0xDD/0xED/0xFD as CALL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UndocumentedPolicy {
    /// Execute the documented instruction the encoding aliases.
    #[default]
    Alias,
    /// Halt with `ExecutionError::UnimplementedOpcode`.
    Reject,
}

/// Entry state and execution policy for a [`CPU`](crate::CPU).
///
/// # Examples
///
/// ```
/// use lib8080::{CpuConfig, UndocumentedPolicy};
///
/// let config = CpuConfig::default()
///     .with_entry_pc(0x0100)
///     .with_entry_sp(0xF000)
///     .with_undocumented(UndocumentedPolicy::Reject);
///
/// assert_eq!(config.entry_pc, 0x0100);
/// assert_eq!(config.memory_size, 0x10000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CpuConfig {
    /// Program counter after creation and after `reset()`
    pub entry_pc: u16,
    /// Stack pointer after creation and after `reset()`
    pub entry_sp: u16,
    /// Size of the image `CPU::from_config` allocates
    pub memory_size: usize,
    /// Handling of undocumented opcodes
    pub undocumented: UndocumentedPolicy,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            entry_pc: 0x0000,
            entry_sp: 0x0000,
            memory_size: ADDRESS_SPACE,
            undocumented: UndocumentedPolicy::Alias,
        }
    }
}

impl CpuConfig {
    pub fn with_entry_pc(mut self, pc: u16) -> Self {
        self.entry_pc = pc;
        self
    }

    pub fn with_entry_sp(mut self, sp: u16) -> Self {
        self.entry_sp = sp;
        self
    }

    pub fn with_memory_size(mut self, size: usize) -> Self {
        self.memory_size = size;
        self
    }

    pub fn with_undocumented(mut self, policy: UndocumentedPolicy) -> Self {
        self.undocumented = policy;
        self
    }
}
