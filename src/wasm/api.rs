//! WASM API for the 8080 interpreter.
//!
//! Provides JavaScript-callable interfaces for CPU control, port I/O, interrupt
//! delivery, state inspection and disassembly.

use crate::{
    disassemble, format_instruction, CpuConfig, DisassemblyOptions, InterruptOutcome, MemoryBus,
    MemoryImage, RunState, UndocumentedPolicy, CPU,
};
use wasm_bindgen::prelude::*;

/// JavaScript-compatible error wrapper
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsError {
    message: String,
}

#[wasm_bindgen]
impl JsError {
    #[wasm_bindgen(constructor)]
    pub fn new(message: &str) -> JsError {
        JsError {
            message: message.to_string(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn message(&self) -> String {
        self.message.clone()
    }
}

impl<E: std::error::Error> From<E> for JsError {
    fn from(err: E) -> Self {
        JsError::new(&err.to_string())
    }
}

/// Result of disassembly operation
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct DisassemblyLine {
    address: u16,
    bytes: Vec<u8>,
    text: String,
}

#[wasm_bindgen]
impl DisassemblyLine {
    #[wasm_bindgen(getter)]
    pub fn address(&self) -> u16 {
        self.address
    }

    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn text(&self) -> String {
        self.text.clone()
    }
}

/// Main emulator interface for JavaScript
#[wasm_bindgen]
pub struct Emulator8080 {
    cpu: CPU<MemoryImage>,
}

#[wasm_bindgen]
impl Emulator8080 {
    /// Create an interpreter with a zeroed 64 KiB image
    ///
    /// `on_output` is called as `on_output(port, value)` for every OUT.
    #[wasm_bindgen(constructor)]
    pub fn new(on_output: js_sys::Function, reject_undocumented: bool) -> Self {
        let policy = if reject_undocumented {
            UndocumentedPolicy::Reject
        } else {
            UndocumentedPolicy::Alias
        };
        let mut cpu = CPU::from_config(CpuConfig::default().with_undocumented(policy));

        cpu.ports_mut().set_output_callback(move |port, value| {
            let _ = on_output.call2(
                &JsValue::NULL,
                &JsValue::from(port),
                &JsValue::from(value),
            );
        });

        Emulator8080 { cpu }
    }

    /// Execute a single instruction; returns true once halted
    pub fn step(&mut self) -> Result<bool, JsError> {
        let state = self.cpu.step()?;
        Ok(state == RunState::Halted)
    }

    /// Execute up to `max_instructions` and return how many ran
    pub fn run(&mut self, max_instructions: u32) -> Result<u32, JsError> {
        let summary = self.cpu.run(max_instructions as u64)?;
        Ok(summary.executed as u32)
    }

    /// Request RST `vector`; returns true if the interrupt was taken
    pub fn request_interrupt(&mut self, vector: u8) -> Result<bool, JsError> {
        let outcome = self.cpu.request_interrupt(vector)?;
        Ok(outcome == InterruptOutcome::Serviced)
    }

    /// Set the byte IN `port` reads
    pub fn set_input(&mut self, port: u8, value: u8) {
        self.cpu.ports_mut().set_input(port, value);
    }

    /// Reset registers to the entry state, keeping memory
    pub fn reset(&mut self) {
        self.cpu.reset();
    }

    // Register getters
    #[wasm_bindgen(getter)]
    pub fn a(&self) -> u8 {
        self.cpu.a()
    }

    #[wasm_bindgen(getter)]
    pub fn bc(&self) -> u16 {
        self.cpu.bc()
    }

    #[wasm_bindgen(getter)]
    pub fn de(&self) -> u16 {
        self.cpu.de()
    }

    #[wasm_bindgen(getter)]
    pub fn hl(&self) -> u16 {
        self.cpu.hl()
    }

    #[wasm_bindgen(getter)]
    pub fn pc(&self) -> u16 {
        self.cpu.pc()
    }

    #[wasm_bindgen(getter)]
    pub fn sp(&self) -> u16 {
        self.cpu.sp()
    }

    #[wasm_bindgen(getter)]
    pub fn psw(&self) -> u8 {
        self.cpu.psw_byte()
    }

    #[wasm_bindgen(getter)]
    pub fn instructions(&self) -> f64 {
        self.cpu.instructions() as f64 // Convert u64 to f64 for JavaScript
    }

    #[wasm_bindgen(getter)]
    pub fn halted(&self) -> bool {
        self.cpu.is_halted()
    }

    #[wasm_bindgen(getter)]
    pub fn interrupts_enabled(&self) -> bool {
        self.cpu.interrupts_enabled()
    }

    // Flag getters
    #[wasm_bindgen(getter)]
    pub fn flag_z(&self) -> bool {
        self.cpu.flag_z()
    }

    #[wasm_bindgen(getter)]
    pub fn flag_s(&self) -> bool {
        self.cpu.flag_s()
    }

    #[wasm_bindgen(getter)]
    pub fn flag_p(&self) -> bool {
        self.cpu.flag_p()
    }

    #[wasm_bindgen(getter)]
    pub fn flag_cy(&self) -> bool {
        self.cpu.flag_cy()
    }

    #[wasm_bindgen(getter)]
    pub fn flag_ac(&self) -> bool {
        self.cpu.flag_ac()
    }

    // Register setters

    /// Set the program counter
    pub fn set_pc(&mut self, addr: u16) {
        self.cpu.set_pc(addr);
    }

    /// Set the stack pointer
    pub fn set_sp(&mut self, addr: u16) {
        self.cpu.set_sp(addr);
    }

    // Memory access methods

    /// Read a single byte from memory
    pub fn read_memory(&self, addr: u16) -> Result<u8, JsError> {
        Ok(self.cpu.memory().read(addr)?)
    }

    /// Write a single byte to memory
    pub fn write_memory(&mut self, addr: u16, value: u8) -> Result<(), JsError> {
        Ok(self.cpu.memory_mut().write(addr, value)?)
    }

    /// Copy of `len` bytes starting at `start`, e.g. a framebuffer
    pub fn get_memory_region(&self, start: u16, len: u32) -> Vec<u8> {
        memory_region(self.cpu.memory().as_slice(), start, len)
    }

    /// Load a program into memory and set PC
    pub fn load_program(&mut self, program: &[u8], start_addr: u16) -> Result<(), JsError> {
        self.cpu.memory_mut().load(start_addr, program)?;
        self.cpu.set_pc(start_addr);
        Ok(())
    }

    /// Disassemble memory starting at an address
    pub fn disassemble(&self, start_addr: u16, num_instructions: u32) -> Vec<JsValue> {
        let bytes = self
            .cpu
            .memory()
            .as_slice()
            .get(start_addr as usize..)
            .unwrap_or_default();

        let opts = DisassemblyOptions {
            start_address: start_addr,
            hex_dump: false,
        };

        disassemble(bytes, opts)
            .iter()
            .take(num_instructions as usize)
            .map(|instr| {
                let mut bytes = vec![instr.opcode];
                if instr.operation.is_some() {
                    bytes.extend_from_slice(&instr.operand_bytes);
                }

                JsValue::from(DisassemblyLine {
                    address: instr.address,
                    bytes,
                    text: format_instruction(instr),
                })
            })
            .collect()
    }
}

/// Up to `len` bytes of `image` from `start`, clipped to the end of the image.
fn memory_region(image: &[u8], start: u16, len: u32) -> Vec<u8> {
    let end = (start as usize).saturating_add(len as usize).min(image.len());
    image
        .get(start as usize..end)
        .map(<[u8]>::to_vec)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_region_clips_to_image() {
        let image = [1u8, 2, 3, 4];
        assert_eq!(memory_region(&image, 1, 2), vec![2, 3]);
        assert_eq!(memory_region(&image, 2, 100), vec![3, 4]);
        assert!(memory_region(&image, 8, 1).is_empty());
    }

    #[test]
    fn test_memory_region_huge_length() {
        let image = vec![0xAAu8; 0x1_0000];
        let region = memory_region(&image, 0xFFF0, u32::MAX);
        assert_eq!(region.len(), 0x10);
    }
}
