//! # Flag Unit
//!
//! Pure functions computing the 8080 condition codes from operands and results.
//!
//! The 8080 keeps five condition flags:
//! - **Zero** (Z): result is zero
//! - **Sign** (S): bit 7 of the result
//! - **Parity** (P): set when the result has an even number of one bits
//! - **Carry** (CY): carry out of bit 7 on add, borrow on subtract
//! - **Aux Carry** (AC): carry out of bit 3, consumed by DAA
//!
//! Every function here is stateless. The executor passes in the operands (and,
//! where a flag survives an operation, the current flags) and writes back what
//! it gets.

use bitflags::bitflags;

bitflags! {
    /// Condition flags, stored at their bit positions in the PSW flag byte.
    ///
    /// Bit layout (S Z 0 AC 0 P 1 CY):
    /// - Bit 7: S (Sign)
    /// - Bit 6: Z (Zero)
    /// - Bit 5: always 0
    /// - Bit 4: AC (Aux Carry)
    /// - Bit 3: always 0
    /// - Bit 2: P (Parity)
    /// - Bit 1: always 1
    /// - Bit 0: CY (Carry)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Flags: u8 {
        const CARRY = 0b0000_0001;
        const PARITY = 0b0000_0100;
        const AUX_CARRY = 0b0001_0000;
        const ZERO = 0b0100_0000;
        const SIGN = 0b1000_0000;
    }
}

/// Bit 1 of the serialized flag byte reads as 1 on real hardware.
pub const PSW_FIXED_ONE: u8 = 0b0000_0010;

impl Flags {
    /// Packs the flags into the byte pushed by `PUSH PSW`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lib8080::Flags;
    ///
    /// assert_eq!(Flags::empty().to_psw_byte(), 0x02);
    /// assert_eq!(Flags::all().to_psw_byte(), 0xD7);
    /// ```
    pub fn to_psw_byte(self) -> u8 {
        self.bits() | PSW_FIXED_ONE
    }

    /// Unpacks a byte popped by `POP PSW`. Bits 1, 3 and 5 are ignored.
    pub fn from_psw_byte(byte: u8) -> Self {
        Flags::from_bits_truncate(byte)
    }

    /// Returns a copy with the Zero, Sign and Parity flags recomputed for `result`.
    fn with_zsp(self, result: u8) -> Self {
        let mut flags = self - (Flags::ZERO | Flags::SIGN | Flags::PARITY);
        flags |= zsp(result);
        flags
    }
}

/// Returns true if `value` has an even number of set bits.
///
/// # Examples
///
/// ```
/// use lib8080::flags::parity;
///
/// assert!(parity(0x00));
/// assert!(parity(0xFF));
/// assert!(!parity(0x01));
/// ```
pub fn parity(value: u8) -> bool {
    value.count_ones() % 2 == 0
}

/// Computes Zero, Sign and Parity for a result byte.
pub fn zsp(result: u8) -> Flags {
    let mut flags = Flags::empty();
    flags.set(Flags::ZERO, result == 0);
    flags.set(Flags::SIGN, result & 0x80 != 0);
    flags.set(Flags::PARITY, parity(result));
    flags
}

/// 8-bit addition (ADD, ADC, ADI, ACI). Sets all five flags.
///
/// Carry is taken from the operands: it is set iff `a + b + carry_in > 0xFF`.
pub fn add(a: u8, b: u8, carry_in: bool) -> (u8, Flags) {
    let cin = carry_in as u16;
    let sum = a as u16 + b as u16 + cin;
    let result = sum as u8;

    let mut flags = zsp(result);
    flags.set(Flags::CARRY, sum > 0xFF);
    flags.set(
        Flags::AUX_CARRY,
        (a & 0x0F) as u16 + (b & 0x0F) as u16 + cin > 0x0F,
    );
    (result, flags)
}

/// 8-bit subtraction (SUB, SBB, SUI, SBI, CMP, CPI). Sets all five flags.
///
/// Carry is the borrow: set iff `a < b + borrow_in`. The 8080 subtracts by
/// adding the one's complement of the subtrahend, so Aux Carry is the carry out
/// of bit 3 of `a + !b + !borrow_in`.
pub fn sub(a: u8, b: u8, borrow_in: bool) -> (u8, Flags) {
    let borrow = borrow_in as u16;
    let result = a.wrapping_sub(b).wrapping_sub(borrow as u8);

    let mut flags = zsp(result);
    flags.set(Flags::CARRY, (a as u16) < b as u16 + borrow);
    flags.set(
        Flags::AUX_CARRY,
        (a & 0x0F) as u16 + (!b & 0x0F) as u16 + (1 - borrow) > 0x0F,
    );
    (result, flags)
}

/// Bitwise AND (ANA, ANI). Carry is reset.
///
/// Aux Carry follows the 8080 quirk: it takes bit 3 of the OR of both operands.
pub fn and(a: u8, b: u8) -> (u8, Flags) {
    let result = a & b;
    let mut flags = zsp(result);
    flags.set(Flags::AUX_CARRY, (a | b) & 0x08 != 0);
    (result, flags)
}

/// Bitwise exclusive OR (XRA, XRI). Carry and Aux Carry are reset.
pub fn xor(a: u8, b: u8) -> (u8, Flags) {
    let result = a ^ b;
    (result, zsp(result))
}

/// Bitwise OR (ORA, ORI). Carry and Aux Carry are reset.
pub fn or(a: u8, b: u8) -> (u8, Flags) {
    let result = a | b;
    (result, zsp(result))
}

/// Increment (INR). Carry is preserved.
pub fn inr(value: u8, flags: Flags) -> (u8, Flags) {
    let result = value.wrapping_add(1);
    let mut flags = flags.with_zsp(result);
    flags.set(Flags::AUX_CARRY, result & 0x0F == 0);
    (result, flags)
}

/// Decrement (DCR). Carry is preserved.
pub fn dcr(value: u8, flags: Flags) -> (u8, Flags) {
    let result = value.wrapping_sub(1);
    let mut flags = flags.with_zsp(result);
    flags.set(Flags::AUX_CARRY, result & 0x0F != 0x0F);
    (result, flags)
}

/// 16-bit add into HL (DAD). Only Carry changes.
pub fn dad(hl: u16, operand: u16, flags: Flags) -> (u16, Flags) {
    let (result, carry) = hl.overflowing_add(operand);
    let mut flags = flags;
    flags.set(Flags::CARRY, carry);
    (result, flags)
}

/// Decimal adjust accumulator (DAA).
///
/// Adds 0x06 when the low nibble exceeds 9 or AC is set, then 0x60 when the
/// high nibble exceeds 9 or CY is set. Carry is only ever set here, never
/// cleared.
pub fn daa(a: u8, flags: Flags) -> (u8, Flags) {
    let low = a & 0x0F;
    let high = a >> 4;
    let mut correction = 0u8;
    let mut carry = flags.contains(Flags::CARRY);

    if flags.contains(Flags::AUX_CARRY) || low > 9 {
        correction |= 0x06;
    }
    if carry || high > 9 || (high >= 9 && low > 9) {
        correction |= 0x60;
        carry = true;
    }

    let (result, mut adjusted) = add(a, correction, false);
    adjusted.set(Flags::CARRY, carry);
    (result, adjusted)
}
