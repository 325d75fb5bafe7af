//! Architectural-to-IR rounding-mode translation and the `calculate_FCSR`
//! helper-call scheduling shared by every FP-arithmetic and conversion
//! emitter (§4.3 step 2-3, §9 "opcode-enumerated FP-operation kind").

use crate::context::DecodeContext;
use crate::fcsr;
use crate::ir::{self, BinOp, IrExpr, IrWidth};

/// The closed set of operation kinds `calculate_FCSR` is tagged with. Kept
/// as one flat enum (rather than per-width variants threading through a
/// separate width argument) because the helper's own source keys off the
/// combined tag, per the design note that this should mirror the helper's
/// enumeration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum FcsrOpKind {
    FADD_S,
    FADD_D,
    FSUB_S,
    FSUB_D,
    FMUL_S,
    FMUL_D,
    FDIV_S,
    FDIV_D,
    FMADD_S,
    FMADD_D,
    FMSUB_S,
    FMSUB_D,
    FNMADD_S,
    FNMADD_D,
    FNMSUB_S,
    FNMSUB_D,
    FSQRT_S,
    FSQRT_D,
    FRECIP_S,
    FRECIP_D,
    FRSQRT_S,
    FRSQRT_D,
    FSCALEB_S,
    FSCALEB_D,
    FCMP_S,
    FCMP_D,
    FCVT_S_D,
    FCVT_D_S,
    FTINT_W_S,
    FTINT_W_D,
    FTINT_L_S,
    FTINT_L_D,
    FFINT_S_W,
    FFINT_S_L,
    FFINT_D_W,
    FFINT_D_L,
    FRINT_S,
    FRINT_D,
}

/// Translates a 2-bit architectural rounding-mode code (already extracted
/// from FCSR, e.g. via [`fcsr::read_rounding_mode_field`]) into the IR
/// encoding, as an IR computation: `rm ^ ((rm << 1) & 2)`.
///
/// ```text
/// LA 00 (nearest) -> IR 00 (nearest)
/// LA 01 (zero)    -> IR 11 (zero)
/// LA 10 (+inf)    -> IR 10 (+inf)
/// LA 11 (-inf)    -> IR 01 (-inf)
/// ```
pub fn translate_to_ir_rounding(arch_rm: IrExpr) -> IrExpr {
    let shifted = ir::binop(BinOp::Shl, arch_rm.clone(), ir::const_u32(1));
    let masked = ir::binop(BinOp::And, shifted, ir::const_u32(2));
    ir::binop(BinOp::Xor, arch_rm, masked)
}

/// The same transform evaluated at the bit-pattern level, for testing the
/// truth table against the mapping table in §4.3 without building an IR
/// expression tree.
pub const fn translate_to_ir_rounding_const(rm: u8) -> u8 {
    rm ^ ((rm << 1) & 2)
}

/// Reads FCSR's current rounding mode and translates it in one call — the
/// common path every rounded FP emitter takes when it isn't using one of
/// the four explicitly named rounding modes (`rm`/`rp`/`rz`/`rne`).
pub fn current_ir_rounding_mode() -> IrExpr {
    translate_to_ir_rounding(fcsr::read_rounding_mode_field())
}

/// Resolves a `ftint{,rm,rp,rz,rne}`-style rounding selector to an IR
/// rounding-mode expression: the four named suffixes already denote the
/// direction the IR encoding itself uses (nearest=00, -inf=01, +inf=10,
/// zero=11), so they're literal constants; the unsuffixed form reads
/// FCSR's current mode and translates it like any other arithmetic op.
pub fn resolve_ir_rounding_mode(round: loongarch64_asm::opcode::RoundMode) -> IrExpr {
    use loongarch64_asm::opcode::RoundMode;
    match round {
        RoundMode::Current => current_ir_rounding_mode(),
        RoundMode::Nearest => ir::const_u32(0b00),
        RoundMode::Minus => ir::const_u32(0b01),
        RoundMode::Plus => ir::const_u32(0b10),
        RoundMode::Zero => ir::const_u32(0b11),
    }
}

/// Builds a rounded conversion expression, tagged the way the host's real
/// IR names its cast ops. The unused third Triop slot is `0`.
pub fn rounded_convert(op: &'static str, value: IrExpr, rounding_mode: IrExpr) -> IrExpr {
    ir::triop(op, value, rounding_mode, ir::const_u32(0))
}

/// Schedules the `calculate_FCSR(opKind, s1, s2, s3)` helper call and merges
/// its result into FCSR's Flags∥Cause sub-view, appending both the call's
/// temp assignment and the merge statement to `ctx`. Unused operand slots
/// must be `None` (the helper ABI treats them as null and never inspects
/// them). Every FP-arithmetic and conversion emitter calls this exactly
/// once, before emitting the expression computing its actual result.
pub fn schedule_fcsr_update(
    ctx: &mut DecodeContext<'_>,
    op: FcsrOpKind,
    s1: Option<IrExpr>,
    s2: Option<IrExpr>,
    s3: Option<IrExpr>,
) {
    let args = vec![Some(ir::const_u64(op as u64)), s1, s2, s3];
    let call = ir::helper_call("calculate_FCSR", args, IrWidth::I64);
    let result = ctx.assign(call);
    ctx.append(fcsr::merge_flags_cause(result));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_mode_truth_table_matches_the_mapping() {
        assert_eq!(translate_to_ir_rounding_const(0b00), 0b00);
        assert_eq!(translate_to_ir_rounding_const(0b01), 0b11);
        assert_eq!(translate_to_ir_rounding_const(0b10), 0b10);
        assert_eq!(translate_to_ir_rounding_const(0b11), 0b01);
    }

    #[test]
    fn named_rounding_modes_resolve_to_literal_ir_constants() {
        use loongarch64_asm::opcode::RoundMode;
        assert_eq!(resolve_ir_rounding_mode(RoundMode::Nearest), ir::const_u32(0b00));
        assert_eq!(resolve_ir_rounding_mode(RoundMode::Minus), ir::const_u32(0b01));
        assert_eq!(resolve_ir_rounding_mode(RoundMode::Plus), ir::const_u32(0b10));
        assert_eq!(resolve_ir_rounding_mode(RoundMode::Zero), ir::const_u32(0b11));
    }
}
