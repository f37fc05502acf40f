//! Tests for the arithmetic family.
//!
//! Tests cover:
//! - ADD/ADC/SUB/SBB and their immediate forms against the flag truth table
//!   (0x00+0x00, 0xFF+0x01, 0x7F+0x01, 0x80-0x01)
//! - Aux Carry on add, subtract, INR and DCR
//! - CMP/CPI set flags without storing the result
//! - INR/DCR preserve Carry; INX/DCX touch no flags
//! - DAD sets only Carry
//! - DAA producing packed BCD

use lib8080::{CpuConfig, Flags, MemoryBus, MemoryImage, CPU};

/// Helper function to create a CPU with `program` loaded at 0x0100
fn setup_cpu(program: &[u8]) -> CPU<MemoryImage> {
    let mut memory = MemoryImage::new();
    memory.load(0x0100, program).unwrap();
    let config = CpuConfig::default()
        .with_entry_pc(0x0100)
        .with_entry_sp(0x2400);
    CPU::with_config(memory, config)
}

/// Runs `ADD B` with the given operands and returns the CPU afterwards.
fn add(a: u8, b: u8) -> CPU<MemoryImage> {
    let mut cpu = setup_cpu(&[0x80]);
    cpu.set_a(a);
    cpu.set_b(b);
    cpu.step().unwrap();
    cpu
}

/// Runs `SUB B` with the given operands and returns the CPU afterwards.
fn sub(a: u8, b: u8) -> CPU<MemoryImage> {
    let mut cpu = setup_cpu(&[0x90]);
    cpu.set_a(a);
    cpu.set_b(b);
    cpu.step().unwrap();
    cpu
}

// ========== ADD Truth Table ==========

#[test]
fn test_add_zero_plus_zero() {
    let cpu = add(0x00, 0x00);

    assert_eq!(cpu.a(), 0x00);
    assert!(cpu.flag_z());
    assert!(!cpu.flag_s());
    assert!(cpu.flag_p());
    assert!(!cpu.flag_cy());
    assert!(!cpu.flag_ac());
}

#[test]
fn test_add_ff_plus_one() {
    let cpu = add(0xFF, 0x01);

    assert_eq!(cpu.a(), 0x00);
    assert!(cpu.flag_z());
    assert!(!cpu.flag_s());
    assert!(cpu.flag_p());
    assert!(cpu.flag_cy());
    assert!(cpu.flag_ac());
}

#[test]
fn test_add_7f_plus_one() {
    let cpu = add(0x7F, 0x01);

    assert_eq!(cpu.a(), 0x80);
    assert!(!cpu.flag_z());
    assert!(cpu.flag_s());
    assert!(!cpu.flag_p());
    assert!(!cpu.flag_cy());
    assert!(cpu.flag_ac());
}

#[test]
fn test_adc_uses_carry_in() {
    // ADC C
    let mut cpu = setup_cpu(&[0x89]);
    cpu.set_a(0x0F);
    cpu.set_c(0x00);
    cpu.set_flag(Flags::CARRY, true);

    cpu.step().unwrap();

    assert_eq!(cpu.a(), 0x10);
    assert!(cpu.flag_ac());
    assert!(!cpu.flag_cy());
}

#[test]
fn test_adi_and_aci() {
    // ADI 0F0h; ACI 0Fh
    let mut cpu = setup_cpu(&[0xC6, 0xF0, 0xCE, 0x0F]);
    cpu.set_a(0x20);

    cpu.step().unwrap();
    assert_eq!(cpu.a(), 0x10);
    assert!(cpu.flag_cy());

    cpu.step().unwrap();
    assert_eq!(cpu.a(), 0x20);
    assert!(!cpu.flag_cy());
    assert_eq!(cpu.pc(), 0x0104);
}

#[test]
fn test_add_m() {
    // ADD M
    let mut cpu = setup_cpu(&[0x86]);
    cpu.memory_mut().write(0x2000, 0x05).unwrap();
    cpu.set_hl(0x2000);
    cpu.set_a(0x03);

    cpu.step().unwrap();

    assert_eq!(cpu.a(), 0x08);
}

// ========== SUB Truth Table ==========

#[test]
fn test_sub_80_minus_one() {
    let cpu = sub(0x80, 0x01);

    assert_eq!(cpu.a(), 0x7F);
    assert!(!cpu.flag_z());
    assert!(!cpu.flag_s());
    assert!(!cpu.flag_p());
    assert!(!cpu.flag_cy());
    assert!(!cpu.flag_ac());
}

#[test]
fn test_sub_borrow() {
    let cpu = sub(0x00, 0x01);

    assert_eq!(cpu.a(), 0xFF);
    assert!(cpu.flag_s());
    assert!(cpu.flag_p());
    assert!(cpu.flag_cy());
}

#[test]
fn test_sub_self_clears_accumulator() {
    // SUB A
    let mut cpu = setup_cpu(&[0x97]);
    cpu.set_a(0x3E);

    cpu.step().unwrap();

    assert_eq!(cpu.a(), 0x00);
    assert!(cpu.flag_z());
    assert!(!cpu.flag_cy());
    assert!(cpu.flag_ac());
}

#[test]
fn test_sbb_and_sbi_use_borrow_in() {
    // SBB B; SBI 01h
    let mut cpu = setup_cpu(&[0x98, 0xDE, 0x01]);
    cpu.set_a(0x10);
    cpu.set_b(0x05);
    cpu.set_flag(Flags::CARRY, true);

    cpu.step().unwrap();
    assert_eq!(cpu.a(), 0x0A);
    assert!(!cpu.flag_cy());

    cpu.step().unwrap();
    assert_eq!(cpu.a(), 0x09);
}

#[test]
fn test_sui() {
    // SUI 10h
    let mut cpu = setup_cpu(&[0xD6, 0x10]);
    cpu.set_a(0x08);

    cpu.step().unwrap();

    assert_eq!(cpu.a(), 0xF8);
    assert!(cpu.flag_cy());
    assert!(cpu.flag_s());
}

// ========== Compare Tests ==========

#[test]
fn test_cmp_leaves_accumulator() {
    // CMP B
    let mut cpu = setup_cpu(&[0xB8]);
    cpu.set_a(0x10);
    cpu.set_b(0x20);

    cpu.step().unwrap();

    assert_eq!(cpu.a(), 0x10);
    assert!(cpu.flag_cy());
    assert!(!cpu.flag_z());
}

#[test]
fn test_cpi_equal() {
    // CPI 42h
    let mut cpu = setup_cpu(&[0xFE, 0x42]);
    cpu.set_a(0x42);

    cpu.step().unwrap();

    assert_eq!(cpu.a(), 0x42);
    assert!(cpu.flag_z());
    assert!(!cpu.flag_cy());
    assert_eq!(cpu.pc(), 0x0102);
}

// ========== INR / DCR Tests ==========

#[test]
fn test_inr_sets_aux_carry_on_nibble_rollover() {
    // INR B
    let mut cpu = setup_cpu(&[0x04]);
    cpu.set_b(0x0F);

    cpu.step().unwrap();

    assert_eq!(cpu.b(), 0x10);
    assert!(cpu.flag_ac());
    assert!(!cpu.flag_z());
}

#[test]
fn test_inr_wraps_and_preserves_carry() {
    // INR A
    let mut cpu = setup_cpu(&[0x3C]);
    cpu.set_a(0xFF);
    cpu.set_flag(Flags::CARRY, false);

    cpu.step().unwrap();

    assert_eq!(cpu.a(), 0x00);
    assert!(cpu.flag_z());
    assert!(!cpu.flag_cy());
}

#[test]
fn test_dcr_aux_carry() {
    // DCR C; DCR C
    let mut cpu = setup_cpu(&[0x0D, 0x0D]);
    cpu.set_c(0x11);
    cpu.set_flag(Flags::CARRY, true);

    cpu.step().unwrap();
    assert_eq!(cpu.c(), 0x10);
    assert!(cpu.flag_ac());

    cpu.step().unwrap();
    assert_eq!(cpu.c(), 0x0F);
    assert!(!cpu.flag_ac());
    assert!(cpu.flag_cy());
}

#[test]
fn test_dcr_m() {
    // DCR M
    let mut cpu = setup_cpu(&[0x35]);
    cpu.memory_mut().write(0x2000, 0x01).unwrap();
    cpu.set_hl(0x2000);

    cpu.step().unwrap();

    assert_eq!(cpu.memory().read(0x2000), Ok(0x00));
    assert!(cpu.flag_z());
}

// ========== 16-bit Tests ==========

#[test]
fn test_inx_dcx_wrap_without_flags() {
    // INX D; DCX B
    let mut cpu = setup_cpu(&[0x13, 0x0B]);
    cpu.set_de(0xFFFF);
    cpu.set_bc(0x0000);

    cpu.run(2).unwrap();

    assert_eq!(cpu.de(), 0x0000);
    assert_eq!(cpu.bc(), 0xFFFF);
    assert_eq!(cpu.flags(), Flags::empty());
}

#[test]
fn test_inx_sp() {
    // INX SP
    let mut cpu = setup_cpu(&[0x33]);

    cpu.step().unwrap();

    assert_eq!(cpu.sp(), 0x2401);
}

#[test]
fn test_dad_sets_only_carry() {
    // DAD B
    let mut cpu = setup_cpu(&[0x09]);
    cpu.set_hl(0xF000);
    cpu.set_bc(0x2000);
    cpu.set_flags(Flags::ZERO);

    cpu.step().unwrap();

    assert_eq!(cpu.hl(), 0x1000);
    assert_eq!(cpu.flags(), Flags::ZERO | Flags::CARRY);
}

#[test]
fn test_dad_h_doubles_hl() {
    // DAD H
    let mut cpu = setup_cpu(&[0x29]);
    cpu.set_hl(0x1234);
    cpu.set_flag(Flags::CARRY, true);

    cpu.step().unwrap();

    assert_eq!(cpu.hl(), 0x2468);
    assert!(!cpu.flag_cy());
}

// ========== DAA Tests ==========

#[test]
fn test_daa_intel_manual_example() {
    // DAA with A=9Bh
    let mut cpu = setup_cpu(&[0x27]);
    cpu.set_a(0x9B);

    cpu.step().unwrap();

    assert_eq!(cpu.a(), 0x01);
    assert!(cpu.flag_cy());
    assert!(cpu.flag_ac());
}

#[test]
fn test_daa_after_bcd_add() {
    // MVI A,38h; ADI 45h; DAA
    let mut cpu = setup_cpu(&[0x3E, 0x38, 0xC6, 0x45, 0x27]);

    cpu.run(3).unwrap();

    assert_eq!(cpu.a(), 0x83);
    assert!(!cpu.flag_cy());
}

#[test]
fn test_daa_uses_aux_carry() {
    // MVI A,19h; ADI 28h; DAA
    let mut cpu = setup_cpu(&[0x3E, 0x19, 0xC6, 0x28, 0x27]);

    cpu.run(2).unwrap();
    assert_eq!(cpu.a(), 0x41);
    assert!(cpu.flag_ac());

    cpu.step().unwrap();
    assert_eq!(cpu.a(), 0x47);
}

#[test]
fn test_daa_decimal_carry_out() {
    // MVI A,99h; ADI 01h; DAA
    let mut cpu = setup_cpu(&[0x3E, 0x99, 0xC6, 0x01, 0x27]);

    cpu.run(3).unwrap();

    assert_eq!(cpu.a(), 0x00);
    assert!(cpu.flag_cy());
    assert!(cpu.flag_z());
}
