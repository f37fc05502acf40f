//! # I/O Port Bridge
//!
//! The 8080 reaches peripherals through 256 I/O ports with the `IN` and `OUT`
//! instructions. The CPU talks to them only through the [`PortBus`] trait.
//!
//! [`IoPorts`] is the stock implementation:
//! - **Input**: a 256-entry table of snapshot bytes. The host refreshes it out of
//!   band (for example once per rendered frame) and `IN` copies the current entry.
//! - **Output**: a callback invoked synchronously with `(port, value)` for each
//!   `OUT`. Nothing is retained.

use std::fmt;

/// Capability through which `IN`/`OUT` reach host port state.
pub trait PortBus {
    /// Returns the byte `IN port` loads into the accumulator.
    fn input(&mut self, port: u8) -> u8;

    /// Delivers the accumulator written by `OUT port`.
    fn output(&mut self, port: u8, value: u8);
}

/// Callback invoked on every `OUT` instruction.
pub type OutputCallback = Box<dyn FnMut(u8, u8)>;

/// Input snapshot table plus output callback.
///
/// # Examples
///
/// ```
/// use lib8080::{IoPorts, PortBus};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let written = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&written);
///
/// let mut ports = IoPorts::new();
/// ports.set_output_callback(move |port, value| sink.borrow_mut().push((port, value)));
/// ports.set_input(1, 0x08);
///
/// assert_eq!(ports.input(1), 0x08);
/// ports.output(3, 0xAA);
/// assert_eq!(*written.borrow(), vec![(3, 0xAA)]);
/// ```
pub struct IoPorts {
    inputs: [u8; 256],
    on_output: Option<OutputCallback>,
}

impl IoPorts {
    /// Creates a port table with every input reading 0x00 and no output callback.
    pub fn new() -> Self {
        Self {
            inputs: [0; 256],
            on_output: None,
        }
    }

    /// Sets the byte subsequent `IN port` instructions will read.
    pub fn set_input(&mut self, port: u8, value: u8) {
        self.inputs[port as usize] = value;
    }

    /// Returns the current input snapshot for `port`.
    pub fn input_value(&self, port: u8) -> u8 {
        self.inputs[port as usize]
    }

    /// Replaces the whole input table.
    pub fn set_inputs(&mut self, inputs: [u8; 256]) {
        self.inputs = inputs;
    }

    /// Installs the callback invoked for each `OUT`.
    pub fn set_output_callback<F>(&mut self, callback: F)
    where
        F: FnMut(u8, u8) + 'static,
    {
        self.on_output = Some(Box::new(callback));
    }

    /// Removes the output callback; `OUT` then has no effect.
    pub fn clear_output_callback(&mut self) {
        self.on_output = None;
    }
}

impl Default for IoPorts {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IoPorts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IoPorts")
            .field("has_output_callback", &self.on_output.is_some())
            .finish_non_exhaustive()
    }
}

impl PortBus for IoPorts {
    fn input(&mut self, port: u8) -> u8 {
        self.inputs[port as usize]
    }

    fn output(&mut self, port: u8, value: u8) {
        if let Some(callback) = self.on_output.as_mut() {
            callback(port, value);
        }
    }
}
