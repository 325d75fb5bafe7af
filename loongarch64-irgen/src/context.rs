//! The explicit decode-time context.
//!
//! The original design keeps host-endianness, the current guest PC, and the
//! destination IRSB as three process-wide mutable cells, set once at the top
//! of the entry point and read by every emitter (§5, §9). That's fine for a
//! single-threaded embedding but not reentrant. Here they're bundled into one
//! context value threaded explicitly through the dispatcher and every
//! emitter, so nothing prevents decoding on multiple threads at once.

use crate::ir::{Irsb, IrExpr, IrStmt, JumpKind, Temp};
use bitflags::bitflags;

bitflags! {
    /// `arch_info.hwcaps` (§6): which optional instruction families this
    /// guest's hardware actually implements.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct HwCaps: u32 {
        /// Scalar floating point.
        const FP = 1 << 0;
        /// Large atomic memory operations (the `am*` family).
        const LAM = 1 << 1;
        /// Unaligned access.
        const UAL = 1 << 2;
        /// `cpucfg`.
        const CPUCFG = 1 << 3;
    }
}

/// Host byte order. Informational only — per §6 the decoder always emits
/// little-endian memory operations regardless of this value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

/// `abi_info` (§6): behavioural choices that are fixed per embedding rather
/// than per instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AbiInfo {
    /// Selects the software LL/SC fallback (§4.6) instead of native IR
    /// load-linked/store-conditional statements.
    pub use_fallback_llsc: bool,
}

impl Default for AbiInfo {
    fn default() -> Self {
        Self { use_fallback_llsc: false }
    }
}

/// Everything an emitter needs beyond the instruction's own operand fields:
/// where to write IR, which guest PC this instruction started at, and which
/// optional features are enabled.
pub struct DecodeContext<'irsb> {
    irsb: &'irsb mut Irsb,
    guest_pc: u64,
    host_endianness: Endianness,
    hwcaps: HwCaps,
    abi: AbiInfo,
    sigill_diag: bool,
    /// Set by an emitter that stops the block at decode time (`b`/`bl`/
    /// `jirl`, `break`, `syscall`, a feature-absent gate). `None` means the
    /// instruction falls through and the entry point appends the ordinary
    /// `PC := PC_curr + len` continuation.
    stop: Option<JumpKind>,
}

impl<'irsb> DecodeContext<'irsb> {
    pub fn new(
        irsb: &'irsb mut Irsb,
        guest_pc: u64,
        host_endianness: Endianness,
        hwcaps: HwCaps,
        abi: AbiInfo,
        sigill_diag: bool,
    ) -> Self {
        Self { irsb, guest_pc, host_endianness, hwcaps, abi, sigill_diag, stop: None }
    }

    /// Records that this instruction stops the block with `jump_kind`. An
    /// emitter that calls this must already have written PC itself (§6).
    pub fn set_stop(&mut self, jump_kind: JumpKind) {
        self.stop = Some(jump_kind);
    }

    pub fn take_stop(&mut self) -> Option<JumpKind> {
        self.stop.take()
    }

    pub fn guest_pc(&self) -> u64 {
        self.guest_pc
    }

    pub fn host_endianness(&self) -> Endianness {
        self.host_endianness
    }

    pub fn has_cap(&self, cap: HwCaps) -> bool {
        self.hwcaps.contains(cap)
    }

    pub fn use_fallback_llsc(&self) -> bool {
        self.abi.use_fallback_llsc
    }

    pub fn sigill_diag_enabled(&self) -> bool {
        self.sigill_diag
    }

    pub fn append(&mut self, stmt: IrStmt) {
        self.irsb.append(stmt);
    }

    pub fn append_if_some(&mut self, stmt: Option<IrStmt>) {
        if let Some(stmt) = stmt {
            self.irsb.append(stmt);
        }
    }

    pub fn assign(&mut self, expr: IrExpr) -> IrExpr {
        self.irsb.assign(expr)
    }

    /// Allocates a temp without binding it via `WrTmp`, for the IR
    /// statements (`LoadLinked`, `StoreConditional`, `Cas`) that bind their
    /// own destination temp directly.
    pub fn new_temp(&mut self) -> Temp {
        self.irsb.new_temp()
    }

    pub fn irsb(&self) -> &Irsb {
        self.irsb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hwcaps_contains_is_a_bitwise_check() {
        let caps = HwCaps::FP | HwCaps::UAL;
        assert!(caps.contains(HwCaps::FP));
        assert!(!caps.contains(HwCaps::LAM));
    }
}
