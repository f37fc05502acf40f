//! # CPU State and Execution
//!
//! This module contains the CPU struct representing the 8080 processor state and
//! the fetch-decode-execute loop.
//!
//! ## CPU State
//!
//! The CPU maintains:
//! - **Registers**: Accumulator (A) and B, C, D, E, H, L, paired as BC/DE/HL
//! - **Flags**: Z, S, P, CY, AC (see [`Flags`])
//! - **Program counter** (PC) and **stack pointer** (SP), both 16-bit
//! - **Interrupt enable** latch and the Running/Halted state
//! - **Instruction counter**: u64, +1 per executed opcode
//!
//! ## Execution Model
//!
//! The CPU executes instructions via:
//! - `step()`: Execute one instruction
//! - `run()`: Execute until halted, an error occurs, or a budget runs out
//!
//! Interrupts are delivered between steps with `request_interrupt()`.

use tracing::{debug, trace, warn};

use crate::config::{CpuConfig, UndocumentedPolicy};
use crate::flags::Flags;
use crate::instructions::{self, Flow};
use crate::io::{IoPorts, PortBus};
use crate::memory::{MemoryBus, MemoryImage, OutOfBounds, ADDRESS_SPACE};
use crate::opcodes::Operation;
use crate::registers::{CpuSnapshot, Reg, RegPair, Registers, RunState};
use crate::{ExecutionError, OPCODE_TABLE};

/// 8080 CPU state and execution context.
///
/// The CPU owns its memory and I/O ports. It is generic over both via the
/// `MemoryBus` and `PortBus` traits; `IoPorts` is the default port type.
///
/// # Type Parameters
///
/// * `M` - Memory bus implementation
/// * `P` - Port bus implementation
///
/// # Examples
///
/// ```
/// use lib8080::{CPU, CpuConfig, MemoryBus, MemoryImage};
///
/// let mut memory = MemoryImage::new();
/// memory.write(0x0100, 0x00).unwrap(); // NOP
///
/// let config = CpuConfig::default().with_entry_pc(0x0100).with_entry_sp(0x2400);
/// let mut cpu = CPU::with_config(memory, config);
///
/// assert_eq!(cpu.pc(), 0x0100);
/// assert_eq!(cpu.sp(), 0x2400);
///
/// cpu.step().unwrap();
/// assert_eq!(cpu.pc(), 0x0101);
/// assert_eq!(cpu.instructions(), 1);
/// ```
pub struct CPU<M: MemoryBus, P: PortBus = IoPorts> {
    /// General-purpose registers and accumulator
    pub(crate) regs: Registers,

    /// Condition flags
    pub(crate) flags: Flags,

    /// Stack pointer (grows downward)
    pub(crate) sp: u16,

    /// Program counter (address of next instruction)
    pub(crate) pc: u16,

    /// Interrupt enable latch, toggled by EI/DI
    pub(crate) interrupts_enabled: bool,

    /// Running or Halted
    pub(crate) state: RunState,

    /// Total instructions executed
    pub(crate) instructions: u64,

    pub(crate) config: CpuConfig,

    /// Memory bus implementation
    pub(crate) memory: M,

    /// I/O port implementation
    pub(crate) ports: P,
}

/// Outcome of a [`CPU::run`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Instructions executed during this call
    pub executed: u64,
    /// State when the call returned
    pub state: RunState,
}

impl<M: MemoryBus> CPU<M, IoPorts> {
    /// Creates a CPU in the default entry state: every register zero, `pc = 0`,
    /// `sp = 0`, interrupts disabled, Running.
    pub fn new(memory: M) -> Self {
        Self::with_config(memory, CpuConfig::default())
    }

    /// Creates a CPU whose entry `pc`/`sp` and opcode policy come from `config`.
    pub fn with_config(memory: M, config: CpuConfig) -> Self {
        Self::with_ports(memory, IoPorts::new(), config)
    }
}

impl CPU<MemoryImage, IoPorts> {
    /// Creates a CPU with a fresh zeroed image of `config.memory_size` bytes.
    pub fn from_config(config: CpuConfig) -> Self {
        Self::with_config(MemoryImage::with_size(config.memory_size), config)
    }
}

impl<M: MemoryBus, P: PortBus> CPU<M, P> {
    /// Creates a CPU with a custom port implementation.
    pub fn with_ports(memory: M, ports: P, config: CpuConfig) -> Self {
        Self {
            regs: Registers::default(),
            flags: Flags::empty(),
            sp: config.entry_sp,
            pc: config.entry_pc,
            interrupts_enabled: false,
            state: RunState::Running,
            instructions: 0,
            config,
            memory,
            ports,
        }
    }

    /// Returns the CPU to its configured entry state. Memory is left untouched.
    ///
    /// This is the only way out of `Halted` other than a serviced interrupt.
    pub fn reset(&mut self) {
        self.regs = Registers::default();
        self.flags = Flags::empty();
        self.sp = self.config.entry_sp;
        self.pc = self.config.entry_pc;
        self.interrupts_enabled = false;
        self.state = RunState::Running;
        self.instructions = 0;
    }

    /// Executes one instruction and advances the CPU state.
    ///
    /// Performs the fetch-decode-execute cycle:
    /// 1. Fetch the opcode byte at PC
    /// 2. Look up its operation in the opcode table
    /// 3. Execute it, reading any immediate bytes that follow
    /// 4. Advance PC by the instruction length unless the instruction jumped
    /// 5. Increment the instruction counter
    ///
    /// A halted CPU does nothing and reports `Halted`.
    ///
    /// # Returns
    ///
    /// - `Ok(state)` with the state after the instruction
    /// - `Err(ExecutionError::UnimplementedOpcode)` for an undocumented opcode under
    ///   `UndocumentedPolicy::Reject`; the CPU is then halted
    /// - `Err(ExecutionError::OutOfBoundsAccess)` if the instruction touched memory
    ///   outside the image; no state is changed
    ///
    /// # Examples
    ///
    /// ```
    /// use lib8080::{CPU, MemoryBus, MemoryImage, RunState};
    ///
    /// let mut mem = MemoryImage::new();
    /// mem.write(0x0000, 0x76).unwrap(); // HLT
    ///
    /// let mut cpu = CPU::new(mem);
    /// assert_eq!(cpu.step(), Ok(RunState::Halted));
    /// assert_eq!(cpu.pc(), 0x0001);
    /// ```
    pub fn step(&mut self) -> Result<RunState, ExecutionError> {
        if self.state == RunState::Halted {
            return Ok(RunState::Halted);
        }

        let pc = self.pc;
        let opcode = self.read_byte(pc)?;
        let metadata = &OPCODE_TABLE[opcode as usize];

        if !metadata.documented && self.config.undocumented == UndocumentedPolicy::Reject {
            self.instructions += 1;
            self.state = RunState::Halted;
            warn!(pc, opcode, "undocumented opcode rejected, halting");
            return Err(ExecutionError::UnimplementedOpcode { pc, opcode });
        }

        // The fall-through address must exist before anything is written.
        let next_pc = match metadata.operation {
            Operation::Jmp | Operation::Ret | Operation::Pchl => pc,
            _ => self.operand_address(metadata.size_bytes as u16)?,
        };

        trace!(pc, opcode, mnemonic = metadata.mnemonic, "execute");

        let flow = instructions::execute(self, metadata.operation).map_err(|err| {
            warn!(pc, opcode, %err, "instruction faulted");
            err
        })?;

        if flow == Flow::Next {
            self.pc = next_pc;
        }
        self.instructions += 1;

        if self.state == RunState::Halted {
            debug!(pc, instructions = self.instructions, "cpu halted");
        }

        Ok(self.state)
    }

    /// Runs until the CPU halts, an instruction fails, or `max_instructions`
    /// instructions have executed.
    ///
    /// # Examples
    ///
    /// ```
    /// use lib8080::{CPU, MemoryImage, RunState};
    ///
    /// let mut mem = MemoryImage::new();
    /// mem.load(0x0000, &[0xC3, 0x00, 0x00]).unwrap(); // JMP 0000h
    ///
    /// let mut cpu = CPU::new(mem);
    /// let summary = cpu.run(1000).unwrap();
    /// assert_eq!(summary.executed, 1000);
    /// assert_eq!(summary.state, RunState::Running);
    /// ```
    pub fn run(&mut self, max_instructions: u64) -> Result<RunSummary, ExecutionError> {
        let start = self.instructions;

        while self.instructions - start < max_instructions {
            if self.step()? == RunState::Halted {
                break;
            }
        }

        let summary = RunSummary {
            executed: self.instructions - start,
            state: self.state,
        };
        debug!(
            executed = summary.executed,
            state = ?summary.state,
            "run finished"
        );
        Ok(summary)
    }

    // ========== Memory and Stack Helpers ==========

    fn out_of_bounds(&self, err: OutOfBounds) -> ExecutionError {
        ExecutionError::OutOfBoundsAccess {
            pc: self.pc,
            addr: err.addr,
            size: err.size,
        }
    }

    pub(crate) fn read_byte(&self, addr: u16) -> Result<u8, ExecutionError> {
        self.memory.read(addr).map_err(|e| self.out_of_bounds(e))
    }

    pub(crate) fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), ExecutionError> {
        self.memory
            .write(addr, value)
            .map_err(|e| self.out_of_bounds(e))
    }

    pub(crate) fn read_word(&self, addr: u16) -> Result<u16, ExecutionError> {
        self.memory.read_word(addr).map_err(|e| self.out_of_bounds(e))
    }

    pub(crate) fn write_word(&mut self, addr: u16, value: u16) -> Result<(), ExecutionError> {
        self.memory
            .write_word(addr, value)
            .map_err(|e| self.out_of_bounds(e))
    }

    /// Address `offset` bytes past the opcode.
    ///
    /// Running past 0xFFFF faults at 0x10000, the first unreachable byte.
    pub(crate) fn operand_address(&self, offset: u16) -> Result<u16, ExecutionError> {
        self.pc
            .checked_add(offset)
            .ok_or(ExecutionError::OutOfBoundsAccess {
                pc: self.pc,
                addr: ADDRESS_SPACE as u32,
                size: self.memory.size(),
            })
    }

    /// Reads the 8-bit immediate following the opcode.
    pub(crate) fn fetch_byte(&self) -> Result<u8, ExecutionError> {
        self.read_byte(self.operand_address(1)?)
    }

    /// Reads the 16-bit immediate following the opcode.
    pub(crate) fn fetch_word(&self) -> Result<u16, ExecutionError> {
        self.read_word(self.operand_address(1)?)
    }

    /// Pushes a word: high byte to SP-1, low byte to SP-2.
    pub(crate) fn push_word(&mut self, value: u16) -> Result<(), ExecutionError> {
        let sp = self.sp.wrapping_sub(2);
        self.write_word(sp, value)?;
        self.sp = sp;
        Ok(())
    }

    pub(crate) fn pop_word(&mut self) -> Result<u16, ExecutionError> {
        let value = self.read_word(self.sp)?;
        self.sp = self.sp.wrapping_add(2);
        Ok(value)
    }

    /// Reads an 8-bit operand; `M` reads memory at HL.
    pub(crate) fn reg(&self, reg: Reg) -> Result<u8, ExecutionError> {
        match self.regs.get(reg) {
            Some(value) => Ok(value),
            None => self.read_byte(self.regs.hl()),
        }
    }

    /// Writes an 8-bit operand; `M` writes memory at HL.
    pub(crate) fn set_reg(&mut self, reg: Reg, value: u8) -> Result<(), ExecutionError> {
        if self.regs.set(reg, value) {
            Ok(())
        } else {
            self.write_byte(self.regs.hl(), value)
        }
    }

    /// Reads a register pair. PSW is A in the high byte and the flag byte low.
    pub fn pair(&self, pair: RegPair) -> u16 {
        match pair {
            RegPair::BC => self.regs.bc(),
            RegPair::DE => self.regs.de(),
            RegPair::HL => self.regs.hl(),
            RegPair::SP => self.sp,
            RegPair::PSW => u16::from_be_bytes([self.regs.a, self.flags.to_psw_byte()]),
        }
    }

    /// Writes a register pair; both halves change together.
    pub fn set_pair(&mut self, pair: RegPair, value: u16) {
        match pair {
            RegPair::BC => self.regs.set_bc(value),
            RegPair::DE => self.regs.set_de(value),
            RegPair::HL => self.regs.set_hl(value),
            RegPair::SP => self.sp = value,
            RegPair::PSW => {
                let [a, flags] = value.to_be_bytes();
                self.regs.a = a;
                self.flags = Flags::from_psw_byte(flags);
            }
        }
    }

    // ========== Register Getters ==========

    /// Returns the accumulator register value.
    pub fn a(&self) -> u8 {
        self.regs.a
    }

    pub fn b(&self) -> u8 {
        self.regs.b
    }

    pub fn c(&self) -> u8 {
        self.regs.c
    }

    pub fn d(&self) -> u8 {
        self.regs.d
    }

    pub fn e(&self) -> u8 {
        self.regs.e
    }

    pub fn h(&self) -> u8 {
        self.regs.h
    }

    pub fn l(&self) -> u8 {
        self.regs.l
    }

    pub fn bc(&self) -> u16 {
        self.regs.bc()
    }

    pub fn de(&self) -> u16 {
        self.regs.de()
    }

    pub fn hl(&self) -> u16 {
        self.regs.hl()
    }

    /// Returns the full register file.
    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    /// Returns the program counter value.
    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Returns the stack pointer value.
    pub fn sp(&self) -> u16 {
        self.sp
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Returns the flag byte as `PUSH PSW` would store it.
    pub fn psw_byte(&self) -> u8 {
        self.flags.to_psw_byte()
    }

    pub fn flag_z(&self) -> bool {
        self.flags.contains(Flags::ZERO)
    }

    pub fn flag_s(&self) -> bool {
        self.flags.contains(Flags::SIGN)
    }

    pub fn flag_p(&self) -> bool {
        self.flags.contains(Flags::PARITY)
    }

    pub fn flag_cy(&self) -> bool {
        self.flags.contains(Flags::CARRY)
    }

    pub fn flag_ac(&self) -> bool {
        self.flags.contains(Flags::AUX_CARRY)
    }

    /// Returns true if EI has enabled interrupts.
    pub fn interrupts_enabled(&self) -> bool {
        self.interrupts_enabled
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_halted(&self) -> bool {
        self.state == RunState::Halted
    }

    /// Returns the number of instructions executed since creation or reset.
    pub fn instructions(&self) -> u64 {
        self.instructions
    }

    pub fn config(&self) -> &CpuConfig {
        &self.config
    }

    /// Copies the current state out for display or comparison.
    pub fn snapshot(&self) -> CpuSnapshot {
        CpuSnapshot {
            a: self.regs.a,
            bc: self.regs.bc(),
            de: self.regs.de(),
            hl: self.regs.hl(),
            pc: self.pc,
            sp: self.sp,
            flags: self.flags,
            interrupts_enabled: self.interrupts_enabled,
            state: self.state,
            instructions: self.instructions,
        }
    }

    // ========== Setters ==========

    pub fn set_a(&mut self, value: u8) {
        self.regs.a = value;
    }

    pub fn set_b(&mut self, value: u8) {
        self.regs.b = value;
    }

    pub fn set_c(&mut self, value: u8) {
        self.regs.c = value;
    }

    pub fn set_d(&mut self, value: u8) {
        self.regs.d = value;
    }

    pub fn set_e(&mut self, value: u8) {
        self.regs.e = value;
    }

    pub fn set_h(&mut self, value: u8) {
        self.regs.h = value;
    }

    pub fn set_l(&mut self, value: u8) {
        self.regs.l = value;
    }

    pub fn set_bc(&mut self, value: u16) {
        self.regs.set_bc(value);
    }

    pub fn set_de(&mut self, value: u16) {
        self.regs.set_de(value);
    }

    pub fn set_hl(&mut self, value: u16) {
        self.regs.set_hl(value);
    }

    pub fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    pub fn set_sp(&mut self, value: u16) {
        self.sp = value;
    }

    pub fn set_flags(&mut self, flags: Flags) {
        self.flags = flags;
    }

    pub fn set_flag(&mut self, flag: Flags, value: bool) {
        self.flags.set(flag, value);
    }

    pub fn set_interrupts_enabled(&mut self, enabled: bool) {
        self.interrupts_enabled = enabled;
    }

    // ========== Memory and Port Access ==========

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    pub fn ports(&self) -> &P {
        &self.ports
    }

    pub fn ports_mut(&mut self) -> &mut P {
        &mut self.ports
    }

    /// Consumes the CPU and returns its memory and ports.
    pub fn into_parts(self) -> (M, P) {
        (self.memory, self.ports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cpu_with(program: &[u8]) -> CPU<MemoryImage> {
        let mut mem = MemoryImage::new();
        mem.load(0x0000, program).unwrap();
        CPU::new(mem)
    }

    #[test]
    fn test_cpu_initialization() {
        let cpu = CPU::new(MemoryImage::new());

        assert_eq!(cpu.pc(), 0x0000);
        assert_eq!(cpu.sp(), 0x0000);
        assert_eq!(cpu.a(), 0x00);
        assert_eq!(cpu.bc(), 0x0000);
        assert_eq!(cpu.de(), 0x0000);
        assert_eq!(cpu.hl(), 0x0000);
        assert_eq!(cpu.flags(), Flags::empty());
        assert_eq!(cpu.instructions(), 0);
        assert!(!cpu.interrupts_enabled());
        assert_eq!(cpu.state(), RunState::Running);
    }

    #[test]
    fn test_psw_pair_packing() {
        let mut cpu = CPU::new(MemoryImage::new());
        cpu.set_pair(RegPair::PSW, 0x42FF);

        assert_eq!(cpu.a(), 0x42);
        assert_eq!(cpu.flags(), Flags::all());
        // Constant bits come back as 1/0/0 regardless of what was written
        assert_eq!(cpu.pair(RegPair::PSW), 0x42D7);
    }

    #[test]
    fn test_step_on_halted_cpu_is_inert() {
        let mut cpu = cpu_with(&[0x76, 0x00]);
        assert_eq!(cpu.step(), Ok(RunState::Halted));
        assert_eq!(cpu.step(), Ok(RunState::Halted));
        assert_eq!(cpu.pc(), 0x0001);
        assert_eq!(cpu.instructions(), 1);
    }

    #[test]
    fn test_reset_leaves_memory() {
        let mut cpu = cpu_with(&[0x3E, 0x07, 0x76]);
        cpu.run(10).unwrap();
        assert!(cpu.is_halted());

        cpu.reset();
        assert_eq!(cpu.a(), 0);
        assert_eq!(cpu.pc(), 0);
        assert_eq!(cpu.state(), RunState::Running);
        assert_eq!(cpu.memory().read(0x0001), Ok(0x07));
    }

    #[test]
    fn test_fetch_past_image_end() {
        let mut cpu = CPU::with_config(
            MemoryImage::with_size(0x10),
            CpuConfig::default().with_entry_pc(0x10),
        );

        assert_eq!(
            cpu.step(),
            Err(ExecutionError::OutOfBoundsAccess {
                pc: 0x10,
                addr: 0x10,
                size: 0x10
            })
        );
        assert_eq!(cpu.pc(), 0x10);
        assert_eq!(cpu.instructions(), 0);
    }

    #[test]
    fn test_pc_does_not_wrap_past_top_of_memory() {
        let mut memory = MemoryImage::new();
        memory.write(0xFFFF, 0x3C).unwrap(); // INR A
        let mut cpu = CPU::with_config(memory, CpuConfig::default().with_entry_pc(0xFFFF));

        assert_eq!(
            cpu.step(),
            Err(ExecutionError::OutOfBoundsAccess {
                pc: 0xFFFF,
                addr: 0x1_0000,
                size: 0x1_0000
            })
        );
        assert_eq!(cpu.a(), 0x00);
        assert_eq!(cpu.pc(), 0xFFFF);
        assert_eq!(cpu.instructions(), 0);
    }

    #[test]
    fn test_jump_at_top_of_memory_needs_no_fall_through() {
        let mut memory = MemoryImage::new();
        memory.load(0xFFFD, &[0xC3, 0x00, 0x10]).unwrap(); // JMP 1000h
        let mut cpu = CPU::with_config(memory, CpuConfig::default().with_entry_pc(0xFFFD));

        cpu.step().unwrap();

        assert_eq!(cpu.pc(), 0x1000);
    }

    #[test]
    fn test_operand_past_top_of_memory() {
        let mut memory = MemoryImage::new();
        memory.load(0xFFFE, &[0x01, 0x34]).unwrap(); // LXI B, one operand byte short
        let mut cpu = CPU::with_config(memory, CpuConfig::default().with_entry_pc(0xFFFE));

        assert!(matches!(
            cpu.step(),
            Err(ExecutionError::OutOfBoundsAccess { addr: 0x1_0000, .. })
        ));
        assert_eq!(cpu.bc(), 0x0000);
    }

    #[test]
    fn test_run_stops_on_budget() {
        // Endless NOPs
        let mut cpu = CPU::new(MemoryImage::new());
        let summary = cpu.run(5).unwrap();
        assert_eq!(summary.executed, 5);
        assert_eq!(cpu.pc(), 5);
    }
}
