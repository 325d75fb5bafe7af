//! Scalar FP arithmetic, unary ops, fused multiply-add, and `fclass`
//! (§4.3). Every arithmetic emitter checks the FP capability, schedules the
//! `calculate_FCSR` helper, reads the translated rounding mode, then emits
//! the typed op — in that order, matching the four-step discipline the
//! component description lays out.

use crate::context::{DecodeContext, HwCaps};
use crate::fault;
use crate::guest_state;
use crate::ir::{self, BinOp, IrWidth, UnOp};
use crate::rounding::{self, FcsrOpKind};
use loongarch64_asm::opcode::{FpArithOp, FpWidth};
use loongarch64_asm::{CcId, FpRegId};

fn ir_width(width: FpWidth) -> IrWidth {
    match width {
        FpWidth::S => IrWidth::F32,
        FpWidth::D => IrWidth::F64,
    }
}

fn int_ir_width(width: FpWidth) -> IrWidth {
    match width {
        FpWidth::S => IrWidth::I32,
        FpWidth::D => IrWidth::I64,
    }
}

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

fn op_kind(op: FpArithOp, width: FpWidth) -> FcsrOpKind {
    use FpArithOp::*;
    use FpWidth::*;
    match (op, width) {
        (Add, S) => FcsrOpKind::FADD_S,
        (Add, D) => FcsrOpKind::FADD_D,
        (Sub, S) => FcsrOpKind::FSUB_S,
        (Sub, D) => FcsrOpKind::FSUB_D,
        (Mul, S) => FcsrOpKind::FMUL_S,
        (Mul, D) => FcsrOpKind::FMUL_D,
        (Div, S) => FcsrOpKind::FDIV_S,
        (Div, D) => FcsrOpKind::FDIV_D,
        (Madd, S) => FcsrOpKind::FMADD_S,
        (Madd, D) => FcsrOpKind::FMADD_D,
        (Msub, S) => FcsrOpKind::FMSUB_S,
        (Msub, D) => FcsrOpKind::FMSUB_D,
        (Nmadd, S) => FcsrOpKind::FNMADD_S,
        (Nmadd, D) => FcsrOpKind::FNMADD_D,
        (Nmsub, S) => FcsrOpKind::FNMSUB_S,
        (Nmsub, D) => FcsrOpKind::FNMSUB_D,
        (Sqrt, S) => FcsrOpKind::FSQRT_S,
        (Sqrt, D) => FcsrOpKind::FSQRT_D,
        (Recip, S) => FcsrOpKind::FRECIP_S,
        (Recip, D) => FcsrOpKind::FRECIP_D,
        (Rsqrt, S) => FcsrOpKind::FRSQRT_S,
        (Rsqrt, D) => FcsrOpKind::FRSQRT_D,
        (Scaleb, S) => FcsrOpKind::FSCALEB_S,
        (Scaleb, D) => FcsrOpKind::FSCALEB_D,
        // Max/min/maxa/mina/abs/neg/copysign/class/logb don't raise through
        // calculate_FCSR in the same way; callers of op_kind skip them.
        _ => FcsrOpKind::FADD_S,
    }
}

fn schedules_fcsr(op: FpArithOp) -> bool {
    matches!(
        op,
        FpArithOp::Add
            | FpArithOp::Sub
            | FpArithOp::Mul
            | FpArithOp::Div
            | FpArithOp::Madd
            | FpArithOp::Msub
            | FpArithOp::Nmadd
            | FpArithOp::Nmsub
            | FpArithOp::Sqrt
            | FpArithOp::Recip
            | FpArithOp::Rsqrt
            | FpArithOp::Scaleb
    )
}

pub fn arith3(ctx: &mut DecodeContext<'_>, op: FpArithOp, width: FpWidth, fd: FpRegId, fj: FpRegId, fk: FpRegId) {
    if !check_fp_cap(ctx) {
        return;
    }
    let a = get(fj, width);
    let b = get(fk, width);
    if schedules_fcsr(op) {
        rounding::schedule_fcsr_update(ctx, op_kind(op, width), Some(a.clone()), Some(b.clone()), None);
    }
    let binop = match op {
        FpArithOp::Add => BinOp::FpAdd,
        FpArithOp::Sub => BinOp::FpSub,
        FpArithOp::Mul => BinOp::FpMul,
        FpArithOp::Div => BinOp::FpDiv,
        FpArithOp::Max => BinOp::FpMax,
        FpArithOp::Min => BinOp::FpMin,
        FpArithOp::Maxa => BinOp::FpMaxA,
        FpArithOp::Mina => BinOp::FpMinA,
        FpArithOp::Scaleb => BinOp::FpScaleB,
        FpArithOp::Copysign => BinOp::FpCopysign,
        other => unreachable!("{other:?} is not a 3-operand fp arithmetic op"),
    };
    let value = ir::binop(binop, a, b);
    put(ctx, fd, width, value);
}

pub fn arith2(ctx: &mut DecodeContext<'_>, op: FpArithOp, width: FpWidth, fd: FpRegId, fj: FpRegId) {
    if !check_fp_cap(ctx) {
        return;
    }
    let a = get(fj, width);
    if schedules_fcsr(op) {
        rounding::schedule_fcsr_update(ctx, op_kind(op, width), Some(a.clone()), None, None);
    }
    let value = match op {
        FpArithOp::Abs => ir::unop(UnOp::FpAbs, a),
        FpArithOp::Neg => ir::unop(UnOp::FpNeg, a),
        FpArithOp::Sqrt => ir::unop(UnOp::FpSqrt, a),
        // frecip is specified as `1/x`: a literal division by the fp unit.
        FpArithOp::Recip => ir::binop(BinOp::FpDiv, one(width), a),
        FpArithOp::Rsqrt => ir::binop(BinOp::FpDiv, one(width), ir::unop(UnOp::FpSqrt, a)),
        FpArithOp::Logb => ir::helper_call("flogb", vec![Some(a)], IrWidth::I64),
        other => unreachable!("{other:?} is not a 2-operand fp unary op"),
    };
    put(ctx, fd, width, value);
}

fn one(width: FpWidth) -> ir::IrExpr {
    match width {
        FpWidth::S => ir::IrExpr::Const(ir::IrConst::F32(1.0)),
        FpWidth::D => ir::IrExpr::Const(ir::IrConst::F64(1.0)),
    }
}

pub fn madd4(ctx: &mut DecodeContext<'_>, op: FpArithOp, width: FpWidth, fd: FpRegId, fj: FpRegId, fk: FpRegId, fa: FpRegId) {
    if !check_fp_cap(ctx) {
        return;
    }
    let a = get(fj, width);
    let b = get(fk, width);
    let c = get(fa, width);
    rounding::schedule_fcsr_update(ctx, op_kind(op, width), Some(a.clone()), Some(b.clone()), Some(c.clone()));
    let rm = rounding::current_ir_rounding_mode();
    // Single-rounding fused multiply-add/sub via the dedicated Qop, not a
    // multiply then an add, which would round twice.
    let tag = match (op, width) {
        (FpArithOp::Madd, FpWidth::S) | (FpArithOp::Nmadd, FpWidth::S) => "MAddF32",
        (FpArithOp::Madd, FpWidth::D) | (FpArithOp::Nmadd, FpWidth::D) => "MAddF64",
        (FpArithOp::Msub, FpWidth::S) | (FpArithOp::Nmsub, FpWidth::S) => "MSubF32",
        (FpArithOp::Msub, FpWidth::D) | (FpArithOp::Nmsub, FpWidth::D) => "MSubF64",
        other => unreachable!("{other:?} is not a 4-operand fp op"),
    };
    let fused = ir::qop(tag, rm, a, b, c);
    let value = match op {
        FpArithOp::Madd | FpArithOp::Msub => fused,
        // fnmadd/fnmsub wrap fmadd/fmsub in a negation (§4.3 step 4).
        FpArithOp::Nmadd | FpArithOp::Nmsub => ir::unop(UnOp::FpNeg, fused),
        other => unreachable!("{other:?} is not a 4-operand fp op"),
    };
    put(ctx, fd, width, value);
}

pub fn fclass(ctx: &mut DecodeContext<'_>, width: FpWidth, fd: FpRegId, fj: FpRegId) {
    if !check_fp_cap(ctx) {
        return;
    }
    let a = get(fj, width);
    let name = match width {
        FpWidth::S => "fclass_s",
        FpWidth::D => "fclass_d",
    };
    let class_code = ir::helper_call(name, vec![Some(a)], IrWidth::I64);
    // Reinterpreted back to the FP register width so downstream reads see
    // the integer class code sitting in an FP bit pattern (§4.3): narrow to
    // the matching integer width first, then reinterpret its bits as float.
    let reinterpreted = ir::unop(UnOp::ReinterpretFloat, ir::narrow(int_ir_width(width), class_code));
    put(ctx, fd, width, reinterpreted);
}

/// Branchless select built from the architecture's own op set — see the
/// twin helper in `atomic.rs`: widen the 1-bit comparison to an all-ones/
/// all-zeros word and use it to blend the two raw bit patterns.
fn select(cond: ir::IrExpr, if_true: ir::IrExpr, if_false: ir::IrExpr) -> ir::IrExpr {
    let mask = ir::sext(IrWidth::I8, cond);
    let true_part = ir::binop(BinOp::And, if_true, mask.clone());
    let false_part = ir::binop(BinOp::And, if_false, ir::unop(UnOp::Not, mask));
    ir::binop(BinOp::Or, true_part, false_part)
}

/// `fsel`: always transfers the full 64-bit register regardless of the
/// surrounding context's operand width, the same whole-register concession
/// `movgr2fr.w` makes (§9 open question). `ca == 0` selects `fj`, any other
/// value selects `fk`.
pub fn fsel(ctx: &mut DecodeContext<'_>, fd: FpRegId, fj: FpRegId, fk: FpRegId, ca: CcId) {
    if !check_fp_cap(ctx) {
        return;
    }
    let cc = guest_state::get_fcc(ca.index());
    let is_zero = ir::binop(BinOp::CmpEq, cc, ir::const_u64(0));
    let fj_bits = guest_state::get_fpr64_as_int(fj);
    let fk_bits = guest_state::get_fpr64_as_int(fk);
    let bits = select(is_zero, fj_bits, fk_bits);
    let value = ir::unop(UnOp::ReinterpretFloat, bits);
    ctx.append(guest_state::put_fpr64(fd, value));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AbiInfo, Endianness};
    use crate::ir::{IrStmt, Irsb};

    #[test]
    fn arith_without_fp_cap_raises_sigill_and_emits_no_fp_op() {
        let mut irsb = Irsb::new();
        let mut ctx = DecodeContext::new(&mut irsb, 0, Endianness::Little, HwCaps::empty(), AbiInfo::default(), false);
        arith3(&mut ctx, FpArithOp::Add, FpWidth::S, FpRegId::new(1), FpRegId::new(2), FpRegId::new(3));
        assert_eq!(irsb.stmts().len(), 1);
        assert!(matches!(irsb.stmts()[0], IrStmt::Exit { .. }));
    }

    #[test]
    fn fnmadd_wraps_fmadd_in_a_negation() {
        let mut irsb = Irsb::new();
        let mut ctx = DecodeContext::new(&mut irsb, 0, Endianness::Little, HwCaps::FP, AbiInfo::default(), false);
        madd4(&mut ctx, FpArithOp::Nmadd, FpWidth::D, FpRegId::new(1), FpRegId::new(2), FpRegId::new(3), FpRegId::new(4));
        let last = irsb.stmts().last().unwrap();
        match last {
            IrStmt::PutGuest { value, .. } => assert!(matches!(value, ir::IrExpr::Unop(UnOp::FpNeg, _))),
            other => panic!("expected PutGuest, got {other:?}"),
        }
    }

    #[test]
    fn madd_emits_a_single_rounding_fused_qop_not_two_binops() {
        let mut irsb = Irsb::new();
        let mut ctx = DecodeContext::new(&mut irsb, 0, Endianness::Little, HwCaps::FP, AbiInfo::default(), false);
        madd4(&mut ctx, FpArithOp::Madd, FpWidth::S, FpRegId::new(1), FpRegId::new(2), FpRegId::new(3), FpRegId::new(4));
        let last = irsb.stmts().last().unwrap();
        match last {
            IrStmt::PutGuest { value, .. } => {
                assert!(matches!(value, ir::IrExpr::Qop(tag, ..) if *tag == "MAddF32"));
            }
            other => panic!("expected PutGuest, got {other:?}"),
        }
    }

    #[test]
    fn fsel_without_fp_cap_raises_sigill() {
        let mut irsb = Irsb::new();
        let mut ctx = DecodeContext::new(&mut irsb, 0, Endianness::Little, HwCaps::empty(), AbiInfo::default(), false);
        fsel(&mut ctx, FpRegId::new(1), FpRegId::new(2), FpRegId::new(3), CcId::new(0));
        assert_eq!(irsb.stmts().len(), 1);
        assert!(matches!(irsb.stmts()[0], IrStmt::Exit { .. }));
    }

    #[test]
    fn fsel_writes_the_whole_64_bit_register_via_reinterpret() {
        let mut irsb = Irsb::new();
        let mut ctx = DecodeContext::new(&mut irsb, 0, Endianness::Little, HwCaps::FP, AbiInfo::default(), false);
        fsel(&mut ctx, FpRegId::new(1), FpRegId::new(2), FpRegId::new(3), CcId::new(0));
        let last = irsb.stmts().last().unwrap();
        match last {
            IrStmt::PutGuest { value, .. } => assert!(matches!(value, ir::IrExpr::Unop(UnOp::ReinterpretFloat, _))),
            other => panic!("expected PutGuest, got {other:?}"),
        }
    }
}
