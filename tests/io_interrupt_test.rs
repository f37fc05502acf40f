//! Tests for port I/O, the interrupt latch and vectored interrupts.
//!
//! Tests cover:
//! - IN reads the host's input snapshot for the port
//! - OUT invokes the output callback synchronously with (port, A)
//! - A custom PortBus implementation plugged into the CPU
//! - EI/DI toggle only the interrupt enable latch
//! - request_interrupt: ignored when disabled, serviced when enabled,
//!   invalid vectors rejected, and wake-up from HLT

use std::cell::RefCell;
use std::rc::Rc;

use lib8080::{
    CpuConfig, InterruptError, InterruptOutcome, MemoryBus, MemoryImage, PortBus, RunState, CPU,
};

/// Helper function to create a CPU with `program` loaded at 0x0100
fn setup_cpu(program: &[u8]) -> CPU<MemoryImage> {
    let mut memory = MemoryImage::new();
    memory.load(0x0100, program).unwrap();
    let config = CpuConfig::default()
        .with_entry_pc(0x0100)
        .with_entry_sp(0x2400);
    CPU::with_config(memory, config)
}

// ========== IN / OUT Tests ==========

#[test]
fn test_in_reads_input_snapshot() {
    // IN 01h
    let mut cpu = setup_cpu(&[0xDB, 0x01]);
    cpu.ports_mut().set_input(0x01, 0x08);

    cpu.step().unwrap();

    assert_eq!(cpu.a(), 0x08);
    assert_eq!(cpu.pc(), 0x0102);
}

#[test]
fn test_in_unset_port_reads_zero() {
    // IN 0FFh
    let mut cpu = setup_cpu(&[0xDB, 0xFF]);
    cpu.set_a(0x55);

    cpu.step().unwrap();

    assert_eq!(cpu.a(), 0x00);
}

#[test]
fn test_out_invokes_callback() {
    // MVI A,0AAh; OUT 03h; MVI A,01h; OUT 06h
    let mut cpu = setup_cpu(&[0x3E, 0xAA, 0xD3, 0x03, 0x3E, 0x01, 0xD3, 0x06]);

    let written = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&written);
    cpu.ports_mut()
        .set_output_callback(move |port, value| sink.borrow_mut().push((port, value)));

    cpu.run(4).unwrap();

    assert_eq!(*written.borrow(), vec![(0x03, 0xAA), (0x06, 0x01)]);
    assert_eq!(cpu.pc(), 0x0108);
}

#[test]
fn test_out_without_callback_is_harmless() {
    // OUT 05h
    let mut cpu = setup_cpu(&[0xD3, 0x05]);

    cpu.step().unwrap();

    assert_eq!(cpu.pc(), 0x0102);
}

/// Port device that echoes the last written value back on its port.
struct LatchPorts {
    latch: [u8; 256],
}

impl Default for LatchPorts {
    fn default() -> Self {
        Self { latch: [0; 256] }
    }
}

impl PortBus for LatchPorts {
    fn input(&mut self, port: u8) -> u8 {
        self.latch[port as usize]
    }

    fn output(&mut self, port: u8, value: u8) {
        self.latch[port as usize] = value;
    }
}

#[test]
fn test_custom_port_bus() {
    // MVI A,5Ah; OUT 10h; MVI A,00h; IN 10h
    let mut memory = MemoryImage::new();
    memory
        .load(0x0000, &[0x3E, 0x5A, 0xD3, 0x10, 0x3E, 0x00, 0xDB, 0x10])
        .unwrap();
    let mut cpu = CPU::with_ports(memory, LatchPorts::default(), CpuConfig::default());

    cpu.run(4).unwrap();

    assert_eq!(cpu.a(), 0x5A);
    assert_eq!(cpu.ports().latch[0x10], 0x5A);
}

// ========== EI / DI Tests ==========

#[test]
fn test_ei_di_toggle_latch() {
    // EI; DI
    let mut cpu = setup_cpu(&[0xFB, 0xF3]);
    assert!(!cpu.interrupts_enabled());

    cpu.step().unwrap();
    assert!(cpu.interrupts_enabled());

    cpu.step().unwrap();
    assert!(!cpu.interrupts_enabled());
    assert_eq!(cpu.psw_byte(), 0x02);
}

// ========== request_interrupt Tests ==========

#[test]
fn test_interrupt_ignored_when_disabled() {
    let mut cpu = setup_cpu(&[0x00]);

    assert_eq!(cpu.request_interrupt(2), Ok(InterruptOutcome::Ignored));
    assert_eq!(cpu.pc(), 0x0100);
    assert_eq!(cpu.sp(), 0x2400);
}

#[test]
fn test_interrupt_serviced_when_enabled() {
    // EI; NOP
    let mut cpu = setup_cpu(&[0xFB, 0x00]);
    cpu.step().unwrap();

    assert_eq!(cpu.request_interrupt(2), Ok(InterruptOutcome::Serviced));

    assert_eq!(cpu.pc(), 0x0010);
    assert_eq!(cpu.sp(), 0x23FE);
    assert_eq!(cpu.memory().read_word(0x23FE), Ok(0x0101));
    assert!(!cpu.interrupts_enabled());
}

#[test]
fn test_second_interrupt_needs_ei() {
    let mut cpu = setup_cpu(&[0x00]);
    cpu.set_interrupts_enabled(true);

    assert_eq!(cpu.request_interrupt(1), Ok(InterruptOutcome::Serviced));
    assert_eq!(cpu.request_interrupt(2), Ok(InterruptOutcome::Ignored));
    assert_eq!(cpu.pc(), 0x0008);
}

#[test]
fn test_invalid_vector_rejected() {
    let mut cpu = setup_cpu(&[0x00]);
    cpu.set_interrupts_enabled(true);

    assert_eq!(
        cpu.request_interrupt(9),
        Err(InterruptError::InvalidVector(9))
    );
    assert_eq!(cpu.pc(), 0x0100);
    assert!(cpu.interrupts_enabled());
}

#[test]
fn test_interrupt_wakes_halted_cpu() {
    // 0100: EI; HLT; MVI B,01h
    // 0008: EI; RET
    let mut cpu = setup_cpu(&[0xFB, 0x76, 0x06, 0x01]);
    cpu.memory_mut().write(0x0008, 0xFB).unwrap();
    cpu.memory_mut().write(0x0009, 0xC9).unwrap();

    assert_eq!(cpu.run(10).unwrap().state, RunState::Halted);
    assert_eq!(cpu.pc(), 0x0102);

    assert_eq!(cpu.request_interrupt(1), Ok(InterruptOutcome::Serviced));
    assert_eq!(cpu.state(), RunState::Running);

    // Handler re-enables and returns past the HLT
    cpu.run(3).unwrap();

    assert_eq!(cpu.b(), 0x01);
    assert_eq!(cpu.pc(), 0x0104);
    assert!(cpu.interrupts_enabled());
    assert_eq!(cpu.sp(), 0x2400);
}

#[test]
fn test_frame_loop_with_two_vectors() {
    // Main loop spins on JMP; the handlers count into B and C.
    // 0008: INR B; EI; RET
    // 0010: INR C; EI; RET
    // 0100: EI; JMP 0101h
    let mut cpu = setup_cpu(&[0xFB, 0xC3, 0x01, 0x01]);
    cpu.memory_mut().load(0x0008, &[0x04, 0xFB, 0xC9]).unwrap();
    cpu.memory_mut().load(0x0010, &[0x0C, 0xFB, 0xC9]).unwrap();

    cpu.run(5).unwrap();
    for _ in 0..3 {
        assert_eq!(cpu.request_interrupt(1), Ok(InterruptOutcome::Serviced));
        cpu.run(10).unwrap();
        assert_eq!(cpu.request_interrupt(2), Ok(InterruptOutcome::Serviced));
        cpu.run(10).unwrap();
    }

    assert_eq!(cpu.b(), 3);
    assert_eq!(cpu.c(), 3);
    assert_eq!(cpu.sp(), 0x2400);
}
