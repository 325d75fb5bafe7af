//! The conditional/unconditional branch and call/return family (§4.7).
//!
//! Conditional branches (`Branch`/`BranchZero`/`BranchFpCc`) don't stop the
//! block: they append a guarded `Exit` to the taken target and let the
//! dispatcher's fallthrough advance PC normally when untaken. `B`/`Bl`/
//! `Jirl` always stop the block and write PC explicitly.

use crate::context::DecodeContext;
use crate::guest_state;
use crate::ir::{self, BinOp, IrExpr, JumpKind};
use loongarch64_asm::imm::{BranchOffset, SignedImm};
use loongarch64_asm::opcode::BranchCond;
use loongarch64_asm::{CcId, RegId};

fn target(ctx: &DecodeContext<'_>, offset: BranchOffset) -> IrExpr {
    ir::const_u64((ctx.guest_pc() as i64 + offset.byte_delta()) as u64)
}

fn cond_expr(cond: BranchCond, a: IrExpr, b: IrExpr) -> IrExpr {
    match cond {
        BranchCond::Eq => ir::binop(BinOp::CmpEq, a, b),
        BranchCond::Ne => ir::unop(ir::UnOp::Not, ir::binop(BinOp::CmpEq, a, b)),
        BranchCond::Lt => ir::binop(BinOp::CmpLt, a, b),
        BranchCond::Ge => ir::unop(ir::UnOp::Not, ir::binop(BinOp::CmpLt, a, b)),
        BranchCond::Ltu => ir::binop(BinOp::CmpLtU, a, b),
        BranchCond::Geu => ir::unop(ir::UnOp::Not, ir::binop(BinOp::CmpLtU, a, b)),
    }
}

/// `beq/bne/blt/bge/bltu/bgeu`: `rj` is compared against the register that
/// occupies the `rd` encoding slot (it isn't written).
pub fn branch(ctx: &mut DecodeContext<'_>, cond: BranchCond, rj: RegId, rd: RegId, offset: BranchOffset) {
    let guard = cond_expr(cond, guest_state::get_gpr(rj), guest_state::get_gpr(rd));
    let target = target(ctx, offset);
    ctx.append(ir::IrStmt::Exit { guard, target, jump_kind: JumpKind::Boring });
}

pub fn branch_zero(ctx: &mut DecodeContext<'_>, is_eq: bool, rj: RegId, offset: BranchOffset) {
    let value = guest_state::get_gpr(rj);
    let guard = if is_eq {
        ir::binop(BinOp::CmpEq, value, ir::const_u64(0))
    } else {
        ir::unop(ir::UnOp::Not, ir::binop(BinOp::CmpEq, value, ir::const_u64(0)))
    };
    let target = target(ctx, offset);
    ctx.append(ir::IrStmt::Exit { guard, target, jump_kind: JumpKind::Boring });
}

pub fn branch_fp_cc(ctx: &mut DecodeContext<'_>, is_eq: bool, cj: CcId, offset: BranchOffset) {
    let value = ir::zext(crate::ir::IrWidth::I8, guest_state::get_fcc(cj.index()));
    let guard = if is_eq {
        ir::binop(BinOp::CmpEq, value, ir::const_u64(0))
    } else {
        ir::unop(ir::UnOp::Not, ir::binop(BinOp::CmpEq, value, ir::const_u64(0)))
    };
    let target = target(ctx, offset);
    ctx.append(ir::IrStmt::Exit { guard, target, jump_kind: JumpKind::Boring });
}

pub fn b(ctx: &mut DecodeContext<'_>, offset: BranchOffset) {
    let target = target(ctx, offset);
    ctx.append(guest_state::put_pc(target.clone()));
    ctx.append(ir::IrStmt::Exit { guard: ir::const_u64(1), target, jump_kind: JumpKind::Boring });
    ctx.set_stop(JumpKind::Boring);
}

pub fn bl(ctx: &mut DecodeContext<'_>, offset: BranchOffset) {
    let link = ir::const_u64(ctx.guest_pc() + 4);
    ctx.append_if_some(guest_state::put_gpr(RegId::new(1), link));
    b(ctx, offset);
}

/// `jirl rd, rj, offset`: the 16-bit immediate is a raw field value here (not
/// pre-scaled like [`BranchOffset`]), so the `<<2` byte scale is applied in
/// this emitter. `rj` is read into a temp *before* `rd` is written, so
/// `jirl r4, r4, ...` (link register doubling as base) doesn't read back its
/// own freshly written link value (§8 scenario 6).
pub fn jirl(ctx: &mut DecodeContext<'_>, rd: RegId, rj: RegId, offset: SignedImm) {
    let base = ctx.assign(guest_state::get_gpr(rj));
    let target = ir::binop(BinOp::Add, base, ir::const_u64((offset.sext64() << 2) as u64));
    let target = ctx.assign(target);
    let link = ir::const_u64(ctx.guest_pc() + 4);
    ctx.append_if_some(guest_state::put_gpr(rd, link));
    ctx.append(guest_state::put_pc(target.clone()));
    ctx.append(ir::IrStmt::Exit { guard: ir::const_u64(1), target, jump_kind: JumpKind::Boring });
    ctx.set_stop(JumpKind::Boring);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AbiInfo, Endianness, HwCaps};
    use crate::ir::Irsb;

    fn ctx(irsb: &mut Irsb, pc: u64) -> DecodeContext<'_> {
        DecodeContext::new(irsb, pc, Endianness::Little, HwCaps::empty(), AbiInfo::default(), false)
    }

    #[test]
    fn conditional_branch_does_not_write_pc_directly() {
        let mut irsb = Irsb::new();
        let mut c = ctx(&mut irsb, 0x1000);
        branch(&mut c, BranchCond::Eq, RegId::new(4), RegId::new(5), BranchOffset::new(4, 16));
        assert!(irsb.stmts().iter().all(|s| !matches!(s, crate::ir::IrStmt::PutGuest { offset, .. } if *offset == guest_state::pc_offset())));
    }

    #[test]
    fn jirl_reads_rj_before_writing_rd() {
        let mut irsb = Irsb::new();
        let mut c = ctx(&mut irsb, 0x2000);
        jirl(&mut c, RegId::new(4), RegId::new(4), SignedImm::new(1, 16));
        // The base-register read must be assigned to a temp strictly before
        // rd (== rj here) is overwritten with the link value.
        let read_idx = irsb.stmts().iter().position(|s| matches!(s, crate::ir::IrStmt::WrTmp(_, _)));
        let write_idx = irsb.stmts().iter().position(|s| {
            matches!(s, crate::ir::IrStmt::PutGuest { offset, .. } if *offset == 4 * 8)
        });
        assert!(read_idx.unwrap() < write_idx.unwrap());
    }
}
