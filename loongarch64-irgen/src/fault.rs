//! Fault/trap emitters: conditional exits to a named trap sink (§2, §7).
//!
//! Every function here appends a guarded `Exit` statement to the context's
//! IRSB and returns nothing — by construction a fault emitter can't fail,
//! it just records "if this condition holds at run time, stop with this
//! jump kind". Whether the guard actually fires is a property of the guest
//! state the decoder never inspects.

use crate::context::DecodeContext;
use crate::guest_state;
use crate::ir::{self, BinOp, IrExpr, JumpKind};

fn exit_to_pc_plus_4(ctx: &mut DecodeContext<'_>, guard: IrExpr, jump_kind: JumpKind) {
    let target = ir::binop(BinOp::Add, ir::const_u64(ctx.guest_pc()), ir::const_u64(4));
    ctx.append(ir::IrStmt::Exit { guard, target, jump_kind });
}

/// Misaligned-access trap: fires when `addr`'s low bits (per `align_bits`,
/// 1 for halfword, 2 for word, 3 for doubleword) are nonzero. Only emitted
/// when the unaligned-access HW capability is absent (§4.2 step on loads).
pub fn guard_misaligned(ctx: &mut DecodeContext<'_>, addr: IrExpr, align_bits: u32) {
    let mask = (1u64 << align_bits) - 1;
    let low_bits = ir::binop(BinOp::And, addr, ir::const_u64(mask));
    let guard = ir::binop(BinOp::CmpEq, low_bits, ir::const_u64(0));
    // The exit fires when the condition is *violated*; `CmpEq` above tests
    // "aligned", so the guard passed to `Exit` must be its negation.
    let guard = ir::unop(crate::ir::UnOp::Not, guard);
    exit_to_pc_plus_4(ctx, guard, JumpKind::SigBus);
}

/// Unconditional-on-false bounds assert (`asrtle.d`/`asrtgt.d`, §4.8):
/// `condition` is the already-negated "assertion failed" expression.
pub fn guard_assert_failed(ctx: &mut DecodeContext<'_>, condition: IrExpr) {
    exit_to_pc_plus_4(ctx, condition, JumpKind::SigSys);
}

/// Feature-absent trap (§4.2 step 3, §7 category 2): the instruction
/// occupies its 4 bytes but emits no semantics, and the block stops with
/// `SigILL` unconditionally.
pub fn feature_absent(ctx: &mut DecodeContext<'_>) {
    exit_to_pc_plus_4(ctx, ir::const_u64(1), JumpKind::SigIll);
    ctx.set_stop(JumpKind::SigIll);
}

/// `break code` (§4.8): writes `PC_curr+4` then stops unconditionally with
/// a code-dependent jump kind.
pub fn emit_break(ctx: &mut DecodeContext<'_>, code: u32) {
    let jump_kind = match code {
        6 => JumpKind::SigFpeIntOvf,
        7 => JumpKind::SigFpeIntDiv,
        _ => JumpKind::SigTrap,
    };
    ctx.append(guest_state::put_pc(ir::const_u64(ctx.guest_pc() + 4)));
    exit_to_pc_plus_4(ctx, ir::const_u64(1), jump_kind);
    ctx.set_stop(jump_kind);
}

/// `syscall hint` (§4.8).
pub fn emit_syscall(ctx: &mut DecodeContext<'_>) {
    ctx.append(guest_state::put_pc(ir::const_u64(ctx.guest_pc() + 4)));
    exit_to_pc_plus_4(ctx, ir::const_u64(1), JumpKind::SysSyscall);
    ctx.set_stop(JumpKind::SysSyscall);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AbiInfo, Endianness, HwCaps};
    use crate::ir::Irsb;

    #[test]
    fn feature_absent_emits_one_unconditional_exit() {
        let mut irsb = Irsb::new();
        let mut ctx = DecodeContext::new(
            &mut irsb,
            0x1000,
            Endianness::Little,
            HwCaps::empty(),
            AbiInfo::default(),
            false,
        );
        feature_absent(&mut ctx);
        assert_eq!(irsb.stmts().len(), 1);
        match &irsb.stmts()[0] {
            ir::IrStmt::Exit { jump_kind, .. } => assert_eq!(*jump_kind, JumpKind::SigIll),
            other => panic!("expected Exit, got {other:?}"),
        }
    }

    #[test]
    fn break_with_code_six_raises_integer_overflow() {
        let mut irsb = Irsb::new();
        let mut ctx = DecodeContext::new(
            &mut irsb,
            0x2000,
            Endianness::Little,
            HwCaps::empty(),
            AbiInfo::default(),
            false,
        );
        emit_break(&mut ctx, 6);
        let exits: Vec<_> = irsb
            .stmts()
            .iter()
            .filter_map(|s| match s {
                ir::IrStmt::Exit { jump_kind, .. } => Some(*jump_kind),
                _ => None,
            })
            .collect();
        assert_eq!(exits, vec![JumpKind::SigFpeIntOvf]);
    }
}
