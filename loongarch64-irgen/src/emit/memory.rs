//! Loads, stores, bounded (`ldgt`/`ldle`/`stgt`/`stle`) memory ops, prefetch
//! hints, and the two memory/instruction fence instructions (§4.2).

use crate::context::{DecodeContext, HwCaps};
use crate::fault;
use crate::guest_state;
use crate::ir::{self, BinOp, IrExpr, IrStmt, IrWidth};
use loongarch64_asm::imm::{SignedImm, UnsignedImm};
use loongarch64_asm::opcode::{FpWidth, Width};
use loongarch64_asm::{FpRegId, RegId};

fn mem_width(width: Width) -> IrWidth {
    match width {
        Width::B | Width::Bu => IrWidth::I8,
        Width::H | Width::Hu => IrWidth::I16,
        Width::W | Width::Wu => IrWidth::I32,
        Width::D | Width::Du => IrWidth::I64,
    }
}

fn align_bits(width: Width) -> u32 {
    match mem_width(width) {
        IrWidth::I8 => 0,
        IrWidth::I16 => 1,
        IrWidth::I32 => 2,
        IrWidth::I64 => 3,
        _ => unreachable!("memory widths are always integer widths"),
    }
}

fn is_unsigned(width: Width) -> bool {
    matches!(width, Width::Bu | Width::Hu | Width::Wu)
}

fn guard_if_needed(ctx: &mut DecodeContext<'_>, addr: &IrExpr, width: Width) {
    if align_bits(width) > 0 && !ctx.has_cap(crate::context::HwCaps::UAL) {
        fault::guard_misaligned(ctx, addr.clone(), align_bits(width));
    }
}

fn base_plus_offset(rj: RegId, offset: i64) -> IrExpr {
    ir::binop(BinOp::Add, guest_state::get_gpr(rj), ir::const_u64(offset as u64))
}

pub fn load(ctx: &mut DecodeContext<'_>, width: Width, rd: RegId, rj: RegId, imm: SignedImm) {
    let addr = base_plus_offset(rj, imm.sext64());
    load_common(ctx, width, rd, addr);
}

pub fn load_indexed(ctx: &mut DecodeContext<'_>, width: Width, rd: RegId, rj: RegId, rk: RegId) {
    let addr = ir::binop(BinOp::Add, guest_state::get_gpr(rj), guest_state::get_gpr(rk));
    load_common(ctx, width, rd, addr);
}

fn load_common(ctx: &mut DecodeContext<'_>, width: Width, rd: RegId, addr: IrExpr) {
    guard_if_needed(ctx, &addr, width);
    let from = mem_width(width);
    let loaded = ir::load(addr, from);
    let extended = if from == IrWidth::I64 {
        loaded
    } else if is_unsigned(width) {
        ir::zext(from, loaded)
    } else {
        ir::sext(from, loaded)
    };
    ctx.append_if_some(guest_state::put_gpr(rd, extended));
}

pub fn store(ctx: &mut DecodeContext<'_>, width: Width, rd: RegId, rj: RegId, imm: SignedImm) {
    let addr = base_plus_offset(rj, imm.sext64());
    store_common(ctx, width, rd, addr);
}

pub fn store_indexed(ctx: &mut DecodeContext<'_>, width: Width, rd: RegId, rj: RegId, rk: RegId) {
    let addr = ir::binop(BinOp::Add, guest_state::get_gpr(rj), guest_state::get_gpr(rk));
    store_common(ctx, width, rd, addr);
}

fn store_common(ctx: &mut DecodeContext<'_>, width: Width, rd: RegId, addr: IrExpr) {
    guard_if_needed(ctx, &addr, width);
    let data = ir::narrow(mem_width(width), guest_state::get_gpr(rd));
    ctx.append(ir::store(addr, data));
}

/// `ldptr.{w,d}`/`stptr.{w,d}`: the 14-bit immediate is pre-shifted left by
/// 2 before it's used as a byte offset.
pub fn load_ptr(ctx: &mut DecodeContext<'_>, width: Width, rd: RegId, rj: RegId, imm: SignedImm) {
    let addr = base_plus_offset(rj, imm.sext64() << 2);
    load_common(ctx, width, rd, addr);
}

pub fn store_ptr(ctx: &mut DecodeContext<'_>, width: Width, rd: RegId, rj: RegId, imm: SignedImm) {
    let addr = base_plus_offset(rj, imm.sext64() << 2);
    store_common(ctx, width, rd, addr);
}

/// `ldgt`/`ldle`: bounded loads that raise `SigSYS` when `rj` is not
/// {greater than, less-or-equal to} `rk`.
pub fn bounded_load(ctx: &mut DecodeContext<'_>, greater_than: bool, width: Width, rd: RegId, rj: RegId, rk: RegId) {
    bounded_guard(ctx, greater_than, rj, rk);
    load_common(ctx, width, rd, guest_state::get_gpr(rj));
}

pub fn bounded_store(ctx: &mut DecodeContext<'_>, greater_than: bool, width: Width, rd: RegId, rj: RegId, rk: RegId) {
    bounded_guard(ctx, greater_than, rj, rk);
    store_common(ctx, width, rd, guest_state::get_gpr(rj));
}

fn bounded_guard(ctx: &mut DecodeContext<'_>, greater_than: bool, rj: RegId, rk: RegId) {
    let a = guest_state::get_gpr(rj);
    let b = guest_state::get_gpr(rk);
    let in_bounds = if greater_than {
        ir::binop(BinOp::CmpLt, b, a) // rj > rk  <=>  rk < rj
    } else {
        ir::unop(crate::ir::UnOp::Not, ir::binop(BinOp::CmpLt, b, a)) // rj <= rk
    };
    let failed = ir::unop(crate::ir::UnOp::Not, in_bounds);
    fault::guard_assert_failed(ctx, failed);
}

fn fp_mem_width(width: FpWidth) -> IrWidth {
    match width {
        FpWidth::S => IrWidth::I32,
        FpWidth::D => IrWidth::I64,
    }
}

fn fp_align_bits(width: FpWidth) -> u32 {
    match width {
        FpWidth::S => 2,
        FpWidth::D => 3,
    }
}

fn fp_guard_if_needed(ctx: &mut DecodeContext<'_>, addr: &IrExpr, width: FpWidth) {
    if !ctx.has_cap(HwCaps::UAL) {
        fault::guard_misaligned(ctx, addr.clone(), fp_align_bits(width));
    }
}

/// `fld.{s,d}`: loads the raw bit pattern from memory and reinterprets it as
/// a float before writing the FP register, mirroring the `get_fpr32`/
/// `put_fpr32` reinterpret round trip the FP-arithmetic emitters use.
pub fn fp_load(ctx: &mut DecodeContext<'_>, width: FpWidth, fd: FpRegId, rj: RegId, imm: SignedImm) {
    if !ctx.has_cap(HwCaps::FP) {
        fault::feature_absent(ctx);
        return;
    }
    let addr = base_plus_offset(rj, imm.sext64());
    fp_guard_if_needed(ctx, &addr, width);
    let bits = ir::load(addr, fp_mem_width(width));
    let value = ir::unop(ir::UnOp::ReinterpretFloat, bits);
    let stmt = match width {
        FpWidth::S => guest_state::put_fpr32(fd, value),
        FpWidth::D => guest_state::put_fpr64(fd, value),
    };
    ctx.append(stmt);
}

/// `fst.{s,d}`: stores the FP register's raw bit pattern, bypassing the
/// float reinterpret on the way out since a store never inspects the value.
pub fn fp_store(ctx: &mut DecodeContext<'_>, width: FpWidth, fd: FpRegId, rj: RegId, imm: SignedImm) {
    if !ctx.has_cap(HwCaps::FP) {
        fault::feature_absent(ctx);
        return;
    }
    let addr = base_plus_offset(rj, imm.sext64());
    fp_guard_if_needed(ctx, &addr, width);
    let bits = match width {
        FpWidth::S => guest_state::get_fpr32_as_int(fd),
        FpWidth::D => guest_state::get_fpr64_as_int(fd),
    };
    ctx.append(ir::store(addr, bits));
}

pub fn preld(ctx: &mut DecodeContext<'_>, hint: UnsignedImm, _rj: RegId, _imm: SignedImm) {
    tracing::trace!(hint = hint.value(), "preld: tracing only, no semantics");
    let _ = ctx;
}

pub fn preldx(ctx: &mut DecodeContext<'_>, hint: UnsignedImm, _rj: RegId, _rk: RegId) {
    tracing::trace!(hint = hint.value(), "preldx: tracing only, no semantics");
    let _ = ctx;
}

pub fn dbar(ctx: &mut DecodeContext<'_>, _hint: UnsignedImm) {
    ctx.append(IrStmt::Fence);
}

pub fn ibar(ctx: &mut DecodeContext<'_>, _hint: UnsignedImm) {
    ctx.append(IrStmt::InstrFence);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AbiInfo, Endianness};
    use crate::ir::Irsb;

    #[test]
    fn unaligned_load_without_ual_cap_emits_a_guard() {
        let mut irsb = Irsb::new();
        let mut ctx = DecodeContext::new(&mut irsb, 0, Endianness::Little, HwCaps::empty(), AbiInfo::default(), false);
        load(&mut ctx, Width::W, RegId::new(4), RegId::new(5), SignedImm::new(1, 12));
        let exits = irsb.stmts().iter().filter(|s| matches!(s, IrStmt::Exit { .. })).count();
        assert_eq!(exits, 1);
    }

    #[test]
    fn unaligned_load_with_ual_cap_emits_no_guard() {
        let mut irsb = Irsb::new();
        let mut ctx = DecodeContext::new(&mut irsb, 0, Endianness::Little, HwCaps::UAL, AbiInfo::default(), false);
        load(&mut ctx, Width::W, RegId::new(4), RegId::new(5), SignedImm::new(1, 12));
        let exits = irsb.stmts().iter().filter(|s| matches!(s, IrStmt::Exit { .. })).count();
        assert_eq!(exits, 0);
    }

    #[test]
    fn fp_load_without_fp_cap_raises_sigill_and_emits_no_load() {
        let mut irsb = Irsb::new();
        let mut ctx = DecodeContext::new(&mut irsb, 0, Endianness::Little, HwCaps::empty(), AbiInfo::default(), false);
        fp_load(&mut ctx, FpWidth::D, FpRegId::new(1), RegId::new(5), SignedImm::new(0, 12));
        assert_eq!(irsb.stmts().len(), 1);
        assert!(matches!(irsb.stmts()[0], IrStmt::Exit { .. }));
    }

    #[test]
    fn fld_d_reinterprets_the_loaded_bits_as_a_float_before_the_put() {
        let mut irsb = Irsb::new();
        let mut ctx = DecodeContext::new(&mut irsb, 0, Endianness::Little, HwCaps::FP | HwCaps::UAL, AbiInfo::default(), false);
        fp_load(&mut ctx, FpWidth::D, FpRegId::new(1), RegId::new(5), SignedImm::new(0, 12));
        let last = irsb.stmts().last().unwrap();
        match last {
            IrStmt::PutGuest { value, .. } => assert!(matches!(value, IrExpr::Unop(ir::UnOp::ReinterpretFloat, _))),
            other => panic!("expected PutGuest, got {other:?}"),
        }
    }

    #[test]
    fn fst_s_stores_the_register_s_raw_bits_without_a_float_reinterpret() {
        let mut irsb = Irsb::new();
        let mut ctx = DecodeContext::new(&mut irsb, 0, Endianness::Little, HwCaps::FP | HwCaps::UAL, AbiInfo::default(), false);
        fp_store(&mut ctx, FpWidth::S, FpRegId::new(1), RegId::new(5), SignedImm::new(0, 12));
        let last = irsb.stmts().last().unwrap();
        match last {
            IrStmt::Store { data, .. } => assert!(!matches!(data, IrExpr::Unop(ir::UnOp::ReinterpretFloat, _))),
            other => panic!("expected Store, got {other:?}"),
        }
    }

    #[test]
    fn dbar_emits_a_full_fence() {
        let mut irsb = Irsb::new();
        let mut ctx = DecodeContext::new(&mut irsb, 0, Endianness::Little, HwCaps::empty(), AbiInfo::default(), false);
        dbar(&mut ctx, UnsignedImm::new(0));
        assert!(matches!(irsb.stmts()[0], IrStmt::Fence));
    }
}
