//! # Memory Bus Abstraction
//!
//! This module provides the `MemoryBus` trait that decouples the CPU from the
//! storage behind its address space, and `MemoryImage`, the flat byte buffer most
//! hosts use.
//!
//! ## Design Principles
//!
//! - The image has a fixed size chosen by the host, up to the 64 KiB the 8080 can address
//! - Accesses past the end of the image are errors, never wrapped or clamped
//! - Reads are `&self` so a renderer can inspect the image between steps

use std::ops::Range;

use thiserror::Error;

/// Full 8080 address space.
pub const ADDRESS_SPACE: usize = 0x1_0000;

/// A memory access landed outside the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("address 0x{addr:04X} is outside the {size}-byte memory image")]
pub struct OutOfBounds {
    /// Address that was accessed. Accesses running past 0xFFFF report 0x10000.
    pub addr: u32,
    /// Size of the image in bytes
    pub size: usize,
}

/// Memory bus trait for the CPU to read/write bytes.
///
/// # Examples
///
/// ```
/// use lib8080::{MemoryBus, MemoryImage};
///
/// let mut mem = MemoryImage::with_size(0x100);
/// mem.write(0x42, 0x99).unwrap();
/// assert_eq!(mem.read(0x42), Ok(0x99));
/// assert!(mem.read(0x100).is_err());
/// ```
pub trait MemoryBus {
    /// Number of addressable bytes, starting from address 0.
    fn size(&self) -> usize;

    /// Reads a byte, failing if `addr` is outside the image.
    fn read(&self, addr: u16) -> Result<u8, OutOfBounds>;

    /// Writes a byte, failing if `addr` is outside the image.
    fn write(&mut self, addr: u16, value: u8) -> Result<(), OutOfBounds>;

    /// Returns true if `addr` can be accessed.
    fn contains(&self, addr: u16) -> bool {
        (addr as usize) < self.size()
    }

    /// Reads a little-endian word from `addr` and `addr + 1`.
    fn read_word(&self, addr: u16) -> Result<u16, OutOfBounds> {
        let low = self.read(addr)?;
        let high = self.read(next_address(addr, self.size())?)?;
        Ok(u16::from_le_bytes([low, high]))
    }

    /// Writes a little-endian word to `addr` and `addr + 1`.
    ///
    /// Both addresses are checked before either byte is written.
    fn write_word(&mut self, addr: u16, value: u16) -> Result<(), OutOfBounds> {
        if !self.contains(addr) {
            return Err(OutOfBounds {
                addr: u32::from(addr),
                size: self.size(),
            });
        }
        let next = next_address(addr, self.size())?;
        if !self.contains(next) {
            return Err(OutOfBounds {
                addr: u32::from(next),
                size: self.size(),
            });
        }
        let [low, high] = value.to_le_bytes();
        self.write(addr, low)?;
        self.write(next, high)
    }
}

/// `addr + 1` without wrapping from 0xFFFF back to 0x0000.
fn next_address(addr: u16, size: usize) -> Result<u16, OutOfBounds> {
    addr.checked_add(1).ok_or(OutOfBounds {
        addr: u32::from(addr) + 1,
        size,
    })
}

/// Fixed-size flat memory image.
///
/// Every address below `size()` is writable RAM initialised to 0x00. The image
/// is usually the full 64 KiB, but a host may allocate less and rely on bounds
/// errors to catch programs that stray outside it.
///
/// # Examples
///
/// ```
/// use lib8080::{CPU, MemoryBus, MemoryImage};
///
/// let mut memory = MemoryImage::new();
/// memory.load(0x0000, &[0x3E, 0x05, 0x76]).unwrap(); // MVI A,05h; HLT
///
/// let mut cpu = CPU::new(memory);
/// cpu.run(10).unwrap();
/// assert_eq!(cpu.a(), 0x05);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryImage {
    data: Vec<u8>,
}

impl MemoryImage {
    /// Creates a zeroed 64 KiB image.
    pub fn new() -> Self {
        Self::with_size(ADDRESS_SPACE)
    }

    /// Creates a zeroed image of `size` bytes, capped at 64 KiB.
    pub fn with_size(size: usize) -> Self {
        Self {
            data: vec![0; size.min(ADDRESS_SPACE)],
        }
    }

    /// Copies `bytes` into the image starting at `start`.
    ///
    /// Nothing is written if the block does not fit.
    pub fn load(&mut self, start: u16, bytes: &[u8]) -> Result<(), OutOfBounds> {
        let start_index = start as usize;
        let end = start_index + bytes.len();
        if end > self.data.len() {
            return Err(OutOfBounds {
                addr: self.data.len().max(start_index) as u32,
                size: self.data.len(),
            });
        }
        self.data[start_index..end].copy_from_slice(bytes);
        Ok(())
    }

    /// The whole image, for renderers and debuggers.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// A sub-range of the image, e.g. a framebuffer region.
    pub fn region(&self, range: Range<u16>) -> Option<&[u8]> {
        self.data.get(range.start as usize..range.end as usize)
    }
}

impl Default for MemoryImage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus for MemoryImage {
    fn size(&self) -> usize {
        self.data.len()
    }

    fn read(&self, addr: u16) -> Result<u8, OutOfBounds> {
        self.data.get(addr as usize).copied().ok_or(OutOfBounds {
            addr: u32::from(addr),
            size: self.data.len(),
        })
    }

    fn write(&mut self, addr: u16, value: u8) -> Result<(), OutOfBounds> {
        let size = self.data.len();
        match self.data.get_mut(addr as usize) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(OutOfBounds {
                addr: u32::from(addr),
                size,
            }),
        }
    }
}
