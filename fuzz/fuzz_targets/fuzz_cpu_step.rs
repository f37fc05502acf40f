//! Fuzz target for CPU execution.
//!
//! Builds an arbitrary register file, a small memory image and a short program,
//! then runs a bounded number of instructions with interrupts injected in
//! between. Errors are expected; panics are bugs.

#![no_main]

use arbitrary::Arbitrary;
use lib8080::{
    CpuConfig, ExecutionError, Flags, MemoryBus, MemoryImage, RunState, UndocumentedPolicy, CPU,
};
use libfuzzer_sys::fuzz_target;

/// Arbitrary CPU initial state for fuzzing
#[derive(Debug, Arbitrary)]
struct FuzzCpuState {
    a: u8,
    bc: u16,
    de: u16,
    hl: u16,
    sp: u16,
    pc: u16,
    /// Raw PSW flag byte
    flags: u8,
    interrupts_enabled: bool,
    reject_undocumented: bool,
}

/// Complete fuzz input
#[derive(Debug, Arbitrary)]
struct FuzzInput {
    cpu_state: FuzzCpuState,
    /// Image size; small sizes exercise the bounds checks
    memory_size: u16,
    /// Bytes loaded at address 0
    program: Vec<u8>,
    /// Interrupt vectors requested between steps (values above 7 are invalid)
    interrupts: Vec<u8>,
    steps: u8,
}

fuzz_target!(|input: FuzzInput| {
    let size = input.memory_size as usize + 1;
    let mut memory = MemoryImage::with_size(size);
    let program_len = input.program.len().min(size);
    if memory.load(0, &input.program[..program_len]).is_err() {
        return;
    }

    let policy = if input.cpu_state.reject_undocumented {
        UndocumentedPolicy::Reject
    } else {
        UndocumentedPolicy::Alias
    };
    let config = CpuConfig::default()
        .with_entry_pc(input.cpu_state.pc)
        .with_entry_sp(input.cpu_state.sp)
        .with_undocumented(policy);
    let mut cpu = CPU::with_config(memory, config);

    cpu.set_a(input.cpu_state.a);
    cpu.set_bc(input.cpu_state.bc);
    cpu.set_de(input.cpu_state.de);
    cpu.set_hl(input.cpu_state.hl);
    cpu.set_flags(Flags::from_psw_byte(input.cpu_state.flags));
    cpu.set_interrupts_enabled(input.cpu_state.interrupts_enabled);

    let mut interrupts = input.interrupts.iter();
    for _ in 0..input.steps {
        let before = cpu.snapshot();

        match cpu.step() {
            // A halted CPU stays put until an interrupt arrives
            Ok(_) if before.state == RunState::Halted => assert_eq!(cpu.snapshot(), before),
            Ok(_) => assert_eq!(cpu.instructions(), before.instructions + 1),
            Err(ExecutionError::OutOfBoundsAccess { .. }) => {
                // Faulting instructions change nothing
                assert_eq!(cpu.snapshot(), before);
                break;
            }
            Err(_) => {
                assert!(cpu.is_halted());
                break;
            }
        }

        // PSW constant bits never leak into the flag set
        assert_eq!(cpu.psw_byte() & 0b0010_1010, 0b0000_0010);

        if let Some(&vector) = interrupts.next() {
            let _ = cpu.request_interrupt(vector);
        }
    }

    assert_eq!(cpu.memory().size(), size);
});
