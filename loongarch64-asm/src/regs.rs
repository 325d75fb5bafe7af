//! Register and condition-code index newtypes.
//!
//! These are thin wrappers around the raw 5-bit (general/FP) or 3-bit
//! (floating condition-code) indices extracted by [`crate::fields`]. Keeping
//! them as distinct types prevents an integer register index from being
//! passed where an FP register or condition-code index was meant, the same
//! discipline the teacher crate applies to its own `RegId`.

use std::fmt;

/// Index of one of the 32 general-purpose integer registers.
///
/// Index 0 is architecturally hardwired to zero; [`RegId::is_zero`] exists
/// so callers can implement the "write to r0 is a no-op" invariant without
/// re-deriving it from the raw value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegId(u8);

impl RegId {
    /// Constructs a register index from its raw 5-bit encoding.
    ///
    /// # Panics
    /// Panics if `raw` does not fit in 5 bits. Every caller derives `raw`
    /// from a field extractor that already masks to 5 bits, so this is an
    /// internal-consistency check, not user input validation.
    pub const fn new(raw: u32) -> Self {
        assert!(raw <= 0x1f, "register index out of range");
        Self(raw as u8)
    }

    /// Raw 0..31 index.
    pub const fn index(self) -> u8 {
        self.0
    }

    /// True for register 0, which reads as zero and ignores writes.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for RegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Index of one of the 32 floating-point registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FpRegId(u8);

impl FpRegId {
    pub const fn new(raw: u32) -> Self {
        assert!(raw <= 0x1f, "fp register index out of range");
        Self(raw as u8)
    }

    pub const fn index(self) -> u8 {
        self.0
    }
}

impl fmt::Display for FpRegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}", self.0)
    }
}

/// Index of one of the 8 one-byte floating condition-code registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CcId(u8);

impl CcId {
    pub const fn new(raw: u32) -> Self {
        assert!(raw <= 0x7, "condition code index out of range");
        Self(raw as u8)
    }

    pub const fn index(self) -> u8 {
        self.0
    }
}

impl fmt::Display for CcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fcc{}", self.0)
    }
}

/// Which of the four overlapping FCSR sub-register projections (§3) an
/// instruction addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FcsrSubId {
    /// The whole 32-bit word.
    Fcsr0,
    /// The Enables bitfield (plus the implementation concession bits, §3).
    Fcsr1,
    /// Flags ∥ Cause.
    Fcsr2,
    /// RoundingMode.
    Fcsr3,
}

impl FcsrSubId {
    /// Decodes the 5-bit `fcsrl`/`fcsrh` selector field into a sub-register id.
    ///
    /// Only indices 0..3 are architecturally valid; anything else is not a
    /// decode failure at this layer (the emitter is responsible for
    /// rejecting it), matching how `movfcsr2gr`/`movgr2fcsr` carry the
    /// selector in a plain register-index-shaped field.
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Fcsr0),
            1 => Some(Self::Fcsr1),
            2 => Some(Self::Fcsr2),
            3 => Some(Self::Fcsr3),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reg_zero_is_zero() {
        assert!(RegId::new(0).is_zero());
        assert!(!RegId::new(1).is_zero());
    }

    #[test]
    fn fcsr_sub_id_rejects_out_of_range() {
        assert!(FcsrSubId::from_raw(4).is_none());
        assert!(matches!(FcsrSubId::from_raw(0), Some(FcsrSubId::Fcsr0)));
    }
}
