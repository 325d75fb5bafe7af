//! `fcmp.cond.{s,d}`: the 22-predicate floating-point comparison family
//! (§4.4). A single emitter builds every variant; the `c`/`s` prefix
//! distinction is not represented here because it only affects which
//! conditions raise invalid-operation inside the FCSR-update helper, not
//! the boolean predicate itself (§9 open question, preserved as-is).

use crate::context::{DecodeContext, HwCaps};
use crate::fault;
use crate::guest_state;
use crate::ir::{self, BinOp, IrExpr, IrWidth};
use crate::rounding::{self, FcsrOpKind};
use loongarch64_asm::opcode::{FpCond, FpWidth};
use loongarch64_asm::{CcId, FpRegId};

/// The 2-bit category `calculate_FCSR`'s FP-compare path (and, in the real
/// back end, the typed FP-compare IR op) returns.
const UN: u64 = 0x45;
const LT: u64 = 0x01;
const GT: u64 = 0x00;
const EQ: u64 = 0x40;

fn category_matches(category: IrExpr, mask: &[u64]) -> IrExpr {
    mask.iter()
        .map(|&c| ir::binop(BinOp::CmpEq, category.clone(), ir::const_u64(c)))
        .reduce(|acc, e| ir::binop(BinOp::Or, acc, e))
        .expect("predicate table never supplies an empty mask")
}

fn predicate_mask(cond: FpCond) -> &'static [u64] {
    use FpCond::*;
    match cond {
        Caf | Saf => &[],
        Clt | Slt => &[LT],
        Ceq | Seq => &[EQ],
        Cle | Sle => &[LT, EQ],
        Cun | Sun => &[UN],
        Cult | Sult => &[UN, LT],
        Cueq | Sueq => &[UN, EQ],
        Cule | Sule => &[UN, LT, EQ],
        Cne | Sne => &[GT, LT],
        Cor | Sor => &[GT, LT, EQ],
        Cune | Sune => &[UN, GT, LT],
    }
}

pub fn fcmp(ctx: &mut DecodeContext<'_>, width: FpWidth, cond: FpCond, cd: CcId, fj: FpRegId, fk: FpRegId) {
    if !ctx.has_cap(HwCaps::FP) {
        fault::feature_absent(ctx);
        return;
    }
    let a = match width {
        FpWidth::S => guest_state::get_fpr32(fj),
        FpWidth::D => guest_state::get_fpr64(fj),
    };
    let b = match width {
        FpWidth::S => guest_state::get_fpr32(fk),
        FpWidth::D => guest_state::get_fpr64(fk),
    };
    let op = match width {
        FpWidth::S => FcsrOpKind::FCMP_S,
        FpWidth::D => FcsrOpKind::FCMP_D,
    };
    rounding::schedule_fcsr_update(ctx, op, Some(a.clone()), Some(b.clone()), None);

    let category = ctx.assign(ir::binop(BinOp::FpCompare, a, b));
    let mask = predicate_mask(cond);
    let result = if mask.is_empty() {
        ir::const_u64(0)
    } else {
        category_matches(category, mask)
    };
    // Widened to 8 bits per §4.4 ("the 1-bit result is widened to 8 bits").
    let widened = ir::zext(IrWidth::I8, result);
    ctx.append(guest_state::put_fcc(cd.index(), widened));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caf_predicate_mask_is_always_false() {
        assert!(predicate_mask(FpCond::Caf).is_empty());
    }

    #[test]
    fn clt_and_cult_differ_by_the_unordered_category() {
        assert_eq!(predicate_mask(FpCond::Clt), &[LT]);
        assert_eq!(predicate_mask(FpCond::Cult), &[UN, LT]);
    }
}
