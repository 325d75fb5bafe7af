//! Traps, bounds asserts, timer reads, and `cpucfg` (§4.8).

use crate::context::{DecodeContext, HwCaps};
use crate::fault;
use crate::guest_state;
use crate::ir::{self, BinOp, IrWidth};
use loongarch64_asm::RegId;

pub fn brk(ctx: &mut DecodeContext<'_>, code: u32) {
    fault::emit_break(ctx, code);
}

pub fn syscall(ctx: &mut DecodeContext<'_>) {
    fault::emit_syscall(ctx);
}

/// `asrtle.d rj, rk`: traps unless `rj <= rk`.
pub fn assert_le(ctx: &mut DecodeContext<'_>, rj: RegId, rk: RegId) {
    let a = guest_state::get_gpr(rj);
    let b = guest_state::get_gpr(rk);
    let holds = ir::unop(ir::UnOp::Not, ir::binop(BinOp::CmpLt, b, a)); // !(b < a) == a <= b
    let failed = ir::unop(ir::UnOp::Not, holds);
    fault::guard_assert_failed(ctx, failed);
}

/// `asrtgt.d rj, rk`: traps unless `rj > rk`.
pub fn assert_gt(ctx: &mut DecodeContext<'_>, rj: RegId, rk: RegId) {
    let a = guest_state::get_gpr(rj);
    let b = guest_state::get_gpr(rk);
    let holds = ir::binop(BinOp::CmpLt, b, a); // b < a == a > b
    let failed = ir::unop(ir::UnOp::Not, holds);
    fault::guard_assert_failed(ctx, failed);
}

/// `rdtimel.w`/`rdtimeh.w`/`rdtime.d`: no wall-clock source is modelled, so
/// these emit a deterministic zero into both the counter-id and value
/// destinations rather than calling out to a nondeterministic helper.
pub fn read_time_low(ctx: &mut DecodeContext<'_>, rd: RegId, rj: RegId) {
    ctx.append_if_some(guest_state::put_gpr(rd, ir::const_u64(0)));
    ctx.append_if_some(guest_state::put_gpr(rj, ir::const_u64(0)));
}

pub fn read_time_high(ctx: &mut DecodeContext<'_>, rd: RegId, rj: RegId) {
    ctx.append_if_some(guest_state::put_gpr(rd, ir::const_u64(0)));
    ctx.append_if_some(guest_state::put_gpr(rj, ir::const_u64(0)));
}

pub fn read_time64(ctx: &mut DecodeContext<'_>, rd: RegId, rj: RegId) {
    ctx.append_if_some(guest_state::put_gpr(rd, ir::const_u64(0)));
    ctx.append_if_some(guest_state::put_gpr(rj, ir::const_u64(0)));
}

pub fn cpucfg(ctx: &mut DecodeContext<'_>, rd: RegId, rj: RegId) {
    if !ctx.has_cap(HwCaps::CPUCFG) {
        fault::feature_absent(ctx);
        return;
    }
    let selector = guest_state::get_gpr(rj);
    let value = ir::helper_call("cpucfg", vec![Some(selector)], IrWidth::I64);
    ctx.append_if_some(guest_state::put_gpr(rd, value));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AbiInfo, Endianness};
    use crate::ir::{IrStmt, Irsb, JumpKind};

    fn ctx(irsb: &mut Irsb) -> DecodeContext<'_> {
        DecodeContext::new(irsb, 0x1000, Endianness::Little, HwCaps::empty(), AbiInfo::default(), false)
    }

    #[test]
    fn break_delegates_to_fault_emit_break() {
        let mut irsb = Irsb::new();
        let mut c = ctx(&mut irsb);
        brk(&mut c, 7);
        let exits: Vec<_> = irsb
            .stmts()
            .iter()
            .filter_map(|s| match s {
                IrStmt::Exit { jump_kind, .. } => Some(*jump_kind),
                _ => None,
            })
            .collect();
        assert_eq!(exits, vec![JumpKind::SigFpeIntDiv]);
    }

    #[test]
    fn cpucfg_without_cap_raises_sigill() {
        let mut irsb = Irsb::new();
        let mut c = ctx(&mut irsb);
        cpucfg(&mut c, RegId::new(4), RegId::new(5));
        assert_eq!(irsb.stmts().len(), 1);
        assert!(matches!(irsb.stmts()[0], IrStmt::Exit { .. }));
    }
}
