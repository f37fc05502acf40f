//! # 8080 Instruction Implementations
//!
//! This module contains the implementations of all 8080 instructions, organized by category.
//! [`execute`] is the single dispatch point: every decoded [`Operation`] maps to exactly
//! one function here.
//!
//! ## Categories
//!
//! - **load_store**: Data transfer (MOV, MVI, LXI, STA, LDA, STAX, LDAX, SHLD, LHLD)
//! - **transfer**: Register pair exchanges (XCHG, XTHL, SPHL, PCHL)
//! - **alu**: Accumulator arithmetic and logic (ADD..CMP, ADI..CPI, DAA, CMA, STC, CMC)
//! - **inc_dec**: Increment, decrement and pair add (INR, DCR, INX, DCX, DAD)
//! - **rotate**: Accumulator rotates (RLC, RRC, RAL, RAR)
//! - **stack**: PUSH and POP
//! - **control**: Jumps, calls, returns and restarts, conditional and not
//! - **io**: IN, OUT, EI, DI, HLT
//!
//! Each function applies its effect and reports whether it set PC itself. The step
//! loop advances PC by the encoded length otherwise.

pub mod alu;
pub mod control;
pub mod inc_dec;
pub mod io;
pub mod load_store;
pub mod rotate;
pub mod stack;
pub mod transfer;

use crate::io::PortBus;
use crate::memory::MemoryBus;
use crate::opcodes::Operation;
use crate::{ExecutionError, CPU};

/// How PC moves after an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    /// Advance past the instruction.
    Next,
    /// The instruction loaded PC.
    Jump,
}

pub(crate) fn execute<M: MemoryBus, P: PortBus>(
    cpu: &mut CPU<M, P>,
    operation: Operation,
) -> Result<Flow, ExecutionError> {
    use Operation::*;

    match operation {
        Nop => Ok(Flow::Next),
        Hlt => io::execute_hlt(cpu),

        Mov(dst, src) => load_store::execute_mov(cpu, dst, src),
        Mvi(reg) => load_store::execute_mvi(cpu, reg),
        Lxi(pair) => load_store::execute_lxi(cpu, pair),
        Stax(pair) => load_store::execute_stax(cpu, pair),
        Ldax(pair) => load_store::execute_ldax(cpu, pair),
        Sta => load_store::execute_sta(cpu),
        Lda => load_store::execute_lda(cpu),
        Shld => load_store::execute_shld(cpu),
        Lhld => load_store::execute_lhld(cpu),

        Xchg => transfer::execute_xchg(cpu),
        Xthl => transfer::execute_xthl(cpu),
        Sphl => transfer::execute_sphl(cpu),
        Pchl => transfer::execute_pchl(cpu),

        Alu(op, reg) => {
            let value = cpu.reg(reg)?;
            alu::execute_alu(cpu, op, value)
        }
        AluImmediate(op) => {
            let value = cpu.fetch_byte()?;
            alu::execute_alu(cpu, op, value)
        }
        Daa => alu::execute_daa(cpu),
        Cma => alu::execute_cma(cpu),
        Stc => alu::execute_stc(cpu),
        Cmc => alu::execute_cmc(cpu),

        Inr(reg) => inc_dec::execute_inr(cpu, reg),
        Dcr(reg) => inc_dec::execute_dcr(cpu, reg),
        Inx(pair) => inc_dec::execute_inx(cpu, pair),
        Dcx(pair) => inc_dec::execute_dcx(cpu, pair),
        Dad(pair) => inc_dec::execute_dad(cpu, pair),

        Rlc => rotate::execute_rlc(cpu),
        Rrc => rotate::execute_rrc(cpu),
        Ral => rotate::execute_ral(cpu),
        Rar => rotate::execute_rar(cpu),

        Push(pair) => stack::execute_push(cpu, pair),
        Pop(pair) => stack::execute_pop(cpu, pair),

        Jmp => control::execute_jmp(cpu, None),
        JmpIf(cond) => control::execute_jmp(cpu, Some(cond)),
        Call => control::execute_call(cpu, None),
        CallIf(cond) => control::execute_call(cpu, Some(cond)),
        Ret => control::execute_ret(cpu, None),
        RetIf(cond) => control::execute_ret(cpu, Some(cond)),
        Rst(n) => control::execute_rst(cpu, n),

        In => io::execute_in(cpu),
        Out => io::execute_out(cpu),
        Ei => io::execute_ei(cpu),
        Di => io::execute_di(cpu),
    }
}
