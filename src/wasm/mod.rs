//! WebAssembly bindings for the lib8080 interpreter.
//!
//! This module provides JavaScript-callable interfaces to the 8080 CPU, enabling
//! browser-based execution of 8080 machine code.

#[cfg(feature = "wasm")]
pub mod api;

#[cfg(feature = "wasm")]
pub use api::Emulator8080;
