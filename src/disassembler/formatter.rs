//! Formatting functions for disassembled instructions
//!
//! Output follows Intel assembler conventions: operands separated by a comma,
//! hex constants suffixed with `h` and given a leading `0` when they would
//! otherwise start with a letter (`0FFh`).

use std::fmt::Write;

use crate::disassembler::{DisassemblyOptions, Instruction};
use crate::opcodes::Operation;

/// Format a single instruction as assembly text
///
/// Undocumented encodings render as their canonical mnemonic followed by `*`.
///
/// # Examples
///
/// ```
/// use lib8080::disassembler::{decode_instruction, format_instruction};
///
/// let instr = decode_instruction(&[0x21, 0x00, 0x24], 0).unwrap();
/// assert_eq!(format_instruction(&instr), "LXI H,2400h");
/// ```
pub fn format_instruction(instr: &Instruction) -> String {
    let marker = if instr.documented { "" } else { "*" };
    let operand = format_operand(instr);

    if operand.is_empty() {
        format!("{}{}", instr.mnemonic, marker)
    } else {
        format!("{}{} {}", instr.mnemonic, marker, operand)
    }
}

/// Format a sequence of instructions, one per line
///
/// Each line starts with the four-digit address. With `hex_dump` set the raw
/// instruction bytes follow in a fixed-width column.
pub fn format_listing(instructions: &[Instruction], options: DisassemblyOptions) -> String {
    let mut out = String::new();

    for instr in instructions {
        let _ = write!(out, "{:04X}  ", instr.address);

        if options.hex_dump {
            let mut bytes = format!("{:02X}", instr.opcode);
            if instr.operation.is_some() {
                for b in &instr.operand_bytes {
                    let _ = write!(bytes, " {:02X}", b);
                }
            }
            let _ = write!(out, "{:<10}", bytes);
        }

        out.push_str(&format_instruction(instr));
        out.push('\n');
    }

    out
}

/// Renders `value` as an Intel hex constant of `digits` width.
fn hex(value: u16, digits: usize) -> String {
    let text = format!("{:0width$X}", value, width = digits);
    if text.starts_with(|c: char| c.is_ascii_alphabetic()) {
        format!("0{}h", text)
    } else {
        format!("{}h", text)
    }
}

fn byte_operand(instr: &Instruction) -> String {
    instr
        .byte_operand()
        .map(|b| hex(b as u16, 2))
        .unwrap_or_else(|| "??h".to_string())
}

fn word_operand(instr: &Instruction) -> String {
    instr
        .word_operand()
        .map(|w| hex(w, 4))
        .unwrap_or_else(|| "????h".to_string())
}

/// Format the operand field based on the decoded operation
fn format_operand(instr: &Instruction) -> String {
    use Operation::*;

    let Some(operation) = instr.operation else {
        return hex(instr.opcode as u16, 2);
    };

    match operation {
        Mov(dst, src) => format!("{},{}", dst.name(), src.name()),
        Mvi(reg) => format!("{},{}", reg.name(), byte_operand(instr)),
        Lxi(pair) => format!("{},{}", pair.name(), word_operand(instr)),

        Stax(pair) | Ldax(pair) | Inx(pair) | Dcx(pair) | Dad(pair) | Push(pair)
        | Pop(pair) => pair.name().to_string(),

        Alu(_, reg) | Inr(reg) | Dcr(reg) => reg.name().to_string(),
        AluImmediate(_) | In | Out => byte_operand(instr),

        Sta | Lda | Shld | Lhld | Jmp | JmpIf(_) | Call | CallIf(_) => word_operand(instr),

        Rst(n) => n.to_string(),

        Nop | Hlt | Xchg | Xthl | Sphl | Daa | Cma | Stc | Cmc | Rlc | Rrc | Ral | Rar
        | Ret | RetIf(_) | Pchl | Ei | Di => String::new(),
    }
}
