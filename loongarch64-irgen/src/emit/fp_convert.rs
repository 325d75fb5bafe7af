//! `fcvt.s.d`/`fcvt.d.s`, the `ftint*`/`ffint*` integer<->FP conversion
//! family, and `frint*` (§4.5).

use crate::context::{DecodeContext, HwCaps};
use crate::fault;
use crate::fcsr;
use crate::guest_state;
use crate::ir::{self, IrWidth, UnOp};
use crate::rounding::{self, FcsrOpKind};
use loongarch64_asm::opcode::{FpWidth, IntWidth, RoundMode};
use loongarch64_asm::FpRegId;

fn get(id: FpRegId, width: FpWidth) -> ir::IrExpr {
    match width {
        FpWidth::S => guest_state::get_fpr32(id),
        FpWidth::D => guest_state::get_fpr64(id),
    }
}

fn put(ctx: &mut DecodeContext<'_>, id: FpRegId, width: FpWidth, value: ir::IrExpr) {
    let stmt = match width {
        FpWidth::S => guest_state::put_fpr32(id, value),
        FpWidth::D => guest_state::put_fpr64(id, value),
    };
    ctx.append(stmt);
}

fn check_fp_cap(ctx: &mut DecodeContext<'_>) -> bool {
    if !ctx.has_cap(HwCaps::FP) {
        fault::feature_absent(ctx);
        return false;
    }
    true
}

pub fn convert(ctx: &mut DecodeContext<'_>, widen: bool, fd: FpRegId, fj: FpRegId) {
    if !check_fp_cap(ctx) {
        return;
    }
    let (from, to, op, tag) = if widen {
        (FpWidth::S, FpWidth::D, FcsrOpKind::FCVT_S_D, "F32toF64")
    } else {
        (FpWidth::D, FpWidth::S, FcsrOpKind::FCVT_D_S, "F64toF32")
    };
    let a = get(fj, from);
    rounding::schedule_fcsr_update(ctx, op, Some(a.clone()), None, None);
    let rm = rounding::current_ir_rounding_mode();
    let converted = rounding::rounded_convert(tag, a, rm);
    put(ctx, fd, to, converted);
}

fn saturation_const(width: IntWidth) -> u64 {
    match width {
        IntWidth::W => 0x7fff_ffff,
        IntWidth::L => 0x7fff_ffff_ffff_ffff,
    }
}

/// Branchless select built from the architecture's own op set — the helper
/// ABI (§6) is closed and has no general-purpose "pick one of two values"
/// entry, so the saturation substitution masks instead of calling a helper.
fn select(cond: ir::IrExpr, if_true: ir::IrExpr, if_false: ir::IrExpr) -> ir::IrExpr {
    let mask = ir::sext(IrWidth::I8, cond);
    let true_part = ir::binop(ir::BinOp::And, if_true, mask.clone());
    let false_part = ir::binop(ir::BinOp::And, if_false, ir::unop(UnOp::Not, mask));
    ir::binop(ir::BinOp::Or, true_part, false_part)
}

fn to_int_tag(fp_width: FpWidth, int_width: IntWidth) -> &'static str {
    match (fp_width, int_width) {
        (FpWidth::S, IntWidth::W) => "F32toI32S",
        (FpWidth::D, IntWidth::W) => "F64toI32S",
        (FpWidth::S, IntWidth::L) => "F32toI64S",
        (FpWidth::D, IntWidth::L) => "F64toI64S",
    }
}

fn from_int_tag(int_width: IntWidth, fp_width: FpWidth) -> &'static str {
    match (int_width, fp_width) {
        (IntWidth::W, FpWidth::S) => "I32StoF32",
        (IntWidth::W, FpWidth::D) => "I32StoF64",
        (IntWidth::L, FpWidth::S) => "I64StoF32",
        (IntWidth::L, FpWidth::D) => "I64StoF64",
    }
}

/// `ftint{,rm,rp,rz,rne}.{w,l}.{s,d}`: converts, checks overflow/invalid,
/// and substitutes the saturation constant on either flag (§4.5).
pub fn to_int(ctx: &mut DecodeContext<'_>, round: RoundMode, int_width: IntWidth, fp_width: FpWidth, fd: FpRegId, fj: FpRegId) {
    if !check_fp_cap(ctx) {
        return;
    }
    let a = get(fj, fp_width);
    let op = match (int_width, fp_width) {
        (IntWidth::W, FpWidth::S) => FcsrOpKind::FTINT_W_S,
        (IntWidth::W, FpWidth::D) => FcsrOpKind::FTINT_W_D,
        (IntWidth::L, FpWidth::S) => FcsrOpKind::FTINT_L_S,
        (IntWidth::L, FpWidth::D) => FcsrOpKind::FTINT_L_D,
    };
    rounding::schedule_fcsr_update(ctx, op, Some(a.clone()), None, None);

    let rm = rounding::resolve_ir_rounding_mode(round);
    let raw = ctx.assign(rounding::rounded_convert(to_int_tag(fp_width, int_width), a, rm));
    let overflow = fcsr::flag_bit_set(18);
    let invalid = fcsr::flag_bit_set(20);
    let faulted = ir::binop(ir::BinOp::Or, overflow, invalid);
    let saturated = ir::const_u64(saturation_const(int_width));
    let selected = select(faulted, saturated, raw);
    let reinterpreted = ir::unop(UnOp::ReinterpretFloat, selected);
    put(ctx, fd, fp_width, reinterpreted);
}

/// `ffint.{s,d}.{w,l}`: the source register holds an integer's bit pattern
/// in the FP file, so it's read via the raw-integer accessor rather than
/// [`get`] (which would reinterpret those bits as a float before this
/// emitter ever saw them).
pub fn from_int(ctx: &mut DecodeContext<'_>, int_width: IntWidth, fp_width: FpWidth, fd: FpRegId, fj: FpRegId) {
    if !check_fp_cap(ctx) {
        return;
    }
    let a = match int_width {
        IntWidth::W => guest_state::get_fpr32_as_int(fj),
        IntWidth::L => guest_state::get_fpr64_as_int(fj),
    };
    let op = match (int_width, fp_width) {
        (IntWidth::W, FpWidth::S) => FcsrOpKind::FFINT_S_W,
        (IntWidth::L, FpWidth::S) => FcsrOpKind::FFINT_S_L,
        (IntWidth::W, FpWidth::D) => FcsrOpKind::FFINT_D_W,
        (IntWidth::L, FpWidth::D) => FcsrOpKind::FFINT_D_L,
    };
    rounding::schedule_fcsr_update(ctx, op, Some(a.clone()), None, None);
    let rm = rounding::current_ir_rounding_mode();
    let converted = rounding::rounded_convert(from_int_tag(int_width, fp_width), a, rm);
    put(ctx, fd, fp_width, converted);
}

pub fn frint(ctx: &mut DecodeContext<'_>, width: FpWidth, fd: FpRegId, fj: FpRegId) {
    if !check_fp_cap(ctx) {
        return;
    }
    let a = get(fj, width);
    let op = match width {
        FpWidth::S => FcsrOpKind::FRINT_S,
        FpWidth::D => FcsrOpKind::FRINT_D,
    };
    rounding::schedule_fcsr_update(ctx, op, Some(a.clone()), None, None);
    let rm = rounding::current_ir_rounding_mode();
    let tag = match width {
        FpWidth::S => "F32RoundToInt",
        FpWidth::D => "F64RoundToInt",
    };
    let rounded = rounding::rounded_convert(tag, a, rm);
    put(ctx, fd, width, rounded);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AbiInfo, Endianness};
    use crate::ir::{IrExpr, IrStmt, Irsb};

    #[test]
    fn to_int_without_fp_cap_raises_sigill() {
        let mut irsb = Irsb::new();
        let mut ctx = DecodeContext::new(&mut irsb, 0, Endianness::Little, HwCaps::empty(), AbiInfo::default(), false);
        to_int(&mut ctx, RoundMode::Current, IntWidth::W, FpWidth::S, FpRegId::new(1), FpRegId::new(2));
        assert_eq!(irsb.stmts().len(), 1);
        assert!(matches!(irsb.stmts()[0], IrStmt::Exit { .. }));
    }

    #[test]
    fn to_int_emits_a_genuine_conversion_not_a_reinterpret() {
        let mut irsb = Irsb::new();
        let mut ctx = DecodeContext::new(&mut irsb, 0, Endianness::Little, HwCaps::FP, AbiInfo::default(), false);
        to_int(&mut ctx, RoundMode::Zero, IntWidth::W, FpWidth::S, FpRegId::new(1), FpRegId::new(2));
        let has_triop = irsb.stmts().iter().any(|s| {
            matches!(s, IrStmt::WrTmp(_, IrExpr::Triop(tag, ..)) if *tag == "F32toI32S")
        });
        assert!(has_triop, "expected an F32toI32S conversion triop, got {:?}", irsb.stmts());
    }

    #[test]
    fn from_int_reads_the_raw_bit_pattern_not_a_reinterpreted_float() {
        let mut irsb = Irsb::new();
        let mut ctx = DecodeContext::new(&mut irsb, 0, Endianness::Little, HwCaps::FP, AbiInfo::default(), false);
        from_int(&mut ctx, IntWidth::L, FpWidth::D, FpRegId::new(1), FpRegId::new(2));
        let has_triop = irsb.stmts().iter().any(|s| match s {
            IrStmt::PutGuest { value, .. } => matches!(value, IrExpr::Triop(tag, ..) if *tag == "I64StoF64"),
            _ => false,
        });
        assert!(has_triop, "expected an I64StoF64 conversion triop, got {:?}", irsb.stmts());
    }
}
