//! The four overlapping FCSR sub-register projections (§3).
//!
//! FCSR is one 32-bit guest-state word:
//! ```text
//! bits 0..4  : Enables        bits 5..7  : reserved-zero
//! bits 8..9  : RoundingMode   bits 10..15: reserved-zero
//! bits 16..20: Flags          bits 21..23: reserved-zero
//! bits 24..28: Cause          bits 29..31: reserved-zero
//! ```
//! `movfcsr2gr`/`movgr2fcsr` address one of four sub-views (FCSR0..FCSR3) by
//! a 5-bit selector that happens to be shaped like a register index.
//! Sub-register writes preserve the bits outside their own mask and mask
//! the incoming value to their own mask; reserved bits are always zero
//! after a write, regardless of which sub-register was targeted.

use crate::guest_state;
use crate::ir::{self, BinOp, IrExpr, IrStmt, IrWidth};
use loongarch64_asm::FcsrSubId;

const ENABLES_MASK: u32 = 0x0000_00ff; // bits 0..7: architectural Enables (0..4) plus the bit-7 concession.
const ROUNDING_MODE_MASK: u32 = 0x0000_0300; // bits 8..9
const FLAGS_CAUSE_MASK: u32 = 0x1f1f_0000; // Flags bits 16..20, Cause bits 24..28
const WHOLE_WRITABLE_MASK: u32 = ENABLES_MASK | ROUNDING_MODE_MASK | FLAGS_CAUSE_MASK;

/// The bitmask a given sub-register id reads/writes through.
///
/// FCSR1 (`Enables`) is specified as owning bits 0..4 plus, per the
/// documented implementation concession, bit 7; bits 6..7 of the
/// architectural Enables field remain writable through FCSR0 as well, so
/// FCSR0's mask is the union of everything rather than a plain "all 32 bits".
fn mask_for(id: FcsrSubId) -> u32 {
    match id {
        FcsrSubId::Fcsr0 => WHOLE_WRITABLE_MASK,
        FcsrSubId::Fcsr1 => 0x0000_00bf, // bits 0..4 and bit 7 (see module docs).
        FcsrSubId::Fcsr2 => FLAGS_CAUSE_MASK,
        FcsrSubId::Fcsr3 => ROUNDING_MODE_MASK,
    }
}

fn get_fcsr_word() -> IrExpr {
    ir::guest_get(guest_state::fcsr_offset(), IrWidth::I32)
}

fn put_fcsr_word(value: IrExpr) -> IrStmt {
    ir::put_guest(guest_state::fcsr_offset(), value)
}

/// Reads `movfcsr2gr`'s selected sub-view, zero-extended to 64 bits for the
/// destination register.
pub fn read_sub_register(id: FcsrSubId) -> IrExpr {
    let word = get_fcsr_word();
    let masked = ir::binop(BinOp::And, word, ir::const_u32(mask_for(id)));
    ir::zext(IrWidth::I32, masked)
}

/// Builds the new FCSR word for `movgr2fcsr`: bits inside the sub-register's
/// mask come from `value` (also masked, so stray high bits in the source
/// register can't leak into reserved positions), bits outside it are kept
/// from the current word.
pub fn write_sub_register(id: FcsrSubId, value: IrExpr) -> IrStmt {
    let mask = mask_for(id);
    let current = get_fcsr_word();
    let preserved = ir::binop(BinOp::And, current, ir::const_u32(!mask & WHOLE_WRITABLE_MASK));
    let incoming = ir::binop(BinOp::And, ir::narrow(IrWidth::I32, value), ir::const_u32(mask));
    let combined = ir::binop(BinOp::Or, preserved, incoming);
    put_fcsr_word(combined)
}

/// Merges a freshly computed Flags∥Cause value (as returned by the
/// `calculate_FCSR` helper) into FCSR, used after every FP-arithmetic and
/// conversion emitter's helper call.
pub fn merge_flags_cause(new_flags_cause: IrExpr) -> IrStmt {
    write_sub_register(FcsrSubId::Fcsr2, new_flags_cause)
}

/// Extracts the 2-bit architectural RoundingMode field, ready for
/// [`crate::rounding::translate_to_ir_rounding`].
pub fn read_rounding_mode_field() -> IrExpr {
    let word = get_fcsr_word();
    let shifted = ir::binop(BinOp::Shr, word, ir::const_u32(8));
    ir::binop(BinOp::And, shifted, ir::const_u32(0b11))
}

/// Reads FCSR bit 18 (overflow) or bit 20 (invalid), as used by the
/// `ftint*` saturation check (§4.5).
pub fn flag_bit_set(bit: u32) -> IrExpr {
    let word = get_fcsr_word();
    let shifted = ir::binop(BinOp::Shr, word, ir::const_u32(bit));
    ir::binop(BinOp::And, shifted, ir::const_u32(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fcsr1_mask_includes_documented_concession_bit() {
        assert_eq!(mask_for(FcsrSubId::Fcsr1) & 0x80, 0x80);
        assert_eq!(mask_for(FcsrSubId::Fcsr1) & 0x1f, 0x1f);
    }

    #[test]
    fn fcsr0_mask_is_the_union_of_every_sub_view() {
        let whole = mask_for(FcsrSubId::Fcsr0);
        assert_eq!(whole & ROUNDING_MODE_MASK, ROUNDING_MODE_MASK);
        assert_eq!(whole & FLAGS_CAUSE_MASK, FLAGS_CAUSE_MASK);
    }
}
