//! IR emission for the four host-request pseudo-instructions recognized by
//! [`loongarch64_asm::matches_preamble`] (§4.9). Bit-pattern recognition
//! lives in the asm crate; this module only builds the IR each recognized
//! request produces.

use crate::context::DecodeContext;
use crate::guest_state;
use crate::ir::{self, IrStmt, JumpKind};
use loongarch64_asm::{HostRequest, RegId};

/// Emits one pseudo-instruction's IR and returns the jump kind the entry
/// point should report ([`None`] for "do not stop").
pub fn emit(ctx: &mut DecodeContext<'_>, request: HostRequest) -> Option<JumpKind> {
    let pc_plus_20 = ir::const_u64(ctx.guest_pc() + 20);
    match request {
        HostRequest::ClientRequest => {
            ctx.append(guest_state::put_pc(pc_plus_20));
            Some(JumpKind::ClientReq)
        }
        HostRequest::QueryNominalReturnAddr => {
            ctx.append_if_some(guest_state::put_gpr(RegId::new(11), guest_state::get_nraddr()));
            None
        }
        HostRequest::CallNoRedir => {
            // `$t8` is r20 in the standard integer ABI naming; the link
            // register per the calling convention's own `$ra` is r1.
            ctx.append_if_some(guest_state::put_gpr(RegId::new(1), pc_plus_20));
            let target = guest_state::get_gpr(RegId::new(20));
            ctx.append(guest_state::put_pc(target));
            Some(JumpKind::NoRedir)
        }
        HostRequest::IrInjection => {
            ctx.append(guest_state::put_cmstart(ir::const_u64(ctx.guest_pc())));
            ctx.append(guest_state::put_cmlen(ir::const_u64(20)));
            ctx.append(guest_state::put_pc(pc_plus_20));
            Some(JumpKind::InvalICache)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AbiInfo, Endianness, HwCaps};
    use crate::ir::Irsb;

    fn ctx(irsb: &mut Irsb) -> DecodeContext<'_> {
        DecodeContext::new(irsb, 0x4000, Endianness::Little, HwCaps::empty(), AbiInfo::default(), false)
    }

    #[test]
    fn client_request_advances_pc_by_twenty_and_stops() {
        let mut irsb = Irsb::new();
        let mut c = ctx(&mut irsb);
        let jk = emit(&mut c, HostRequest::ClientRequest);
        assert_eq!(jk, Some(JumpKind::ClientReq));
        assert!(irsb
            .stmts()
            .iter()
            .any(|s| matches!(s, IrStmt::PutGuest { offset, value } if *offset == guest_state::pc_offset() && *value == ir::const_u64(0x4014))));
    }

    #[test]
    fn query_nraddr_does_not_stop() {
        let mut irsb = Irsb::new();
        let mut c = ctx(&mut irsb);
        assert_eq!(emit(&mut c, HostRequest::QueryNominalReturnAddr), None);
    }

    #[test]
    fn ir_injection_records_cmstart_and_cmlen() {
        let mut irsb = Irsb::new();
        let mut c = ctx(&mut irsb);
        emit(&mut c, HostRequest::IrInjection);
        let has_cmlen = irsb
            .stmts()
            .iter()
            .any(|s| matches!(s, IrStmt::PutGuest { value, .. } if *value == ir::const_u64(20)));
        assert!(has_cmlen);
    }
}
