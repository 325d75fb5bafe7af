//! Register-to-register moves between the general, FP, FCSR, and condition-
//! flag register files (§4.3, §9). `movgr2fr.w` is deliberately *not*
//! distinguished from `movgr2fr.d` here: both decode to `MoveGrToFr { whole:
//! true, .. }` and this emitter writes the full 64-bit slot for either,
//! per the documented concession that the undefined upper bits left by a
//! genuine 32-bit move aren't worth modelling separately.

use crate::context::DecodeContext;
use crate::fcsr;
use crate::guest_state;
use crate::ir::{self, IrWidth};
use loongarch64_asm::{CcId, FcsrSubId, FpRegId, RegId};

pub fn gr_to_fr(ctx: &mut DecodeContext<'_>, whole: bool, fd: FpRegId, rj: RegId) {
    if whole {
        ctx.append(guest_state::put_fpr64(fd, guest_state::get_gpr(rj)));
    } else {
        let high = ir::narrow(IrWidth::I32, guest_state::get_gpr(rj));
        let current = guest_state::get_fpr64(fd);
        ctx.append(guest_state::put_fpr32_high(fd, current, high));
    }
}

pub fn fr_to_gr(ctx: &mut DecodeContext<'_>, whole: bool, rd: RegId, fj: FpRegId) {
    let value = if whole {
        guest_state::get_fpr64(fj)
    } else {
        ir::zext(IrWidth::I32, guest_state::get_fpr32_high(fj))
    };
    ctx.append_if_some(guest_state::put_gpr(rd, value));
}

pub fn fcsr_to_gr(ctx: &mut DecodeContext<'_>, rd: RegId, fcsr: FcsrSubId) {
    let value = fcsr::read_sub_register(fcsr);
    ctx.append_if_some(guest_state::put_gpr(rd, value));
}

pub fn gr_to_fcsr(ctx: &mut DecodeContext<'_>, fcsr: FcsrSubId, rj: RegId) {
    ctx.append(fcsr::write_sub_register(fcsr, guest_state::get_gpr(rj)));
}

pub fn cf_to_gr(ctx: &mut DecodeContext<'_>, rd: RegId, cj: CcId) {
    let value = ir::zext(IrWidth::I8, guest_state::get_fcc(cj.index()));
    ctx.append_if_some(guest_state::put_gpr(rd, value));
}

pub fn gr_to_cf(ctx: &mut DecodeContext<'_>, cd: CcId, rj: RegId) {
    let masked = ir::binop(ir::BinOp::And, guest_state::get_gpr(rj), ir::const_u64(1));
    let narrowed = ir::narrow(IrWidth::I8, masked);
    ctx.append(guest_state::put_fcc(cd.index(), narrowed));
}

pub fn fr_to_cf(ctx: &mut DecodeContext<'_>, cd: CcId, fj: FpRegId) {
    let bits = ir::unop(ir::UnOp::ReinterpretInt, guest_state::get_fpr64(fj));
    let masked = ir::binop(ir::BinOp::And, bits, ir::const_u64(1));
    let narrowed = ir::narrow(IrWidth::I8, masked);
    ctx.append(guest_state::put_fcc(cd.index(), narrowed));
}

pub fn cf_to_fr(ctx: &mut DecodeContext<'_>, fd: FpRegId, cj: CcId) {
    let widened = ir::zext(IrWidth::I8, guest_state::get_fcc(cj.index()));
    let as_fp = ir::unop(ir::UnOp::ReinterpretFloat, widened);
    ctx.append(guest_state::put_fpr64(fd, as_fp));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AbiInfo, Endianness, HwCaps};
    use crate::ir::{IrStmt, Irsb};

    fn ctx(irsb: &mut Irsb) -> DecodeContext<'_> {
        DecodeContext::new(irsb, 0, Endianness::Little, HwCaps::empty(), AbiInfo::default(), false)
    }

    #[test]
    fn gr_to_fr_whole_writes_the_full_register() {
        let mut irsb = Irsb::new();
        let mut c = ctx(&mut irsb);
        gr_to_fr(&mut c, true, FpRegId::new(1), RegId::new(2));
        assert_eq!(irsb.stmts().len(), 1);
        assert!(matches!(irsb.stmts()[0], IrStmt::PutGuest { .. }));
    }

    #[test]
    fn gr_to_cf_masks_to_a_single_bit() {
        let mut irsb = Irsb::new();
        let mut c = ctx(&mut irsb);
        gr_to_cf(&mut c, CcId::new(0), RegId::new(4));
        assert_eq!(irsb.stmts().len(), 1);
    }
}
