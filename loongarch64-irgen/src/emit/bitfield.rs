//! `bstrins.{w,d}` / `bstrpick.{w,d}`: bit-field insert and extract,
//! parameterised by `(msb, lsb)` (§4.2).

use crate::context::DecodeContext;
use crate::guest_state;
use crate::ir::{self, BinOp, IrWidth};
use loongarch64_asm::opcode::Width;
use loongarch64_asm::RegId;

fn width_bits(width: Width) -> u64 {
    if width == Width::W { 32 } else { 64 }
}

fn int_width(width: Width) -> IrWidth {
    if width == Width::W { IrWidth::I32 } else { IrWidth::I64 }
}

/// Replaces bits `[lsb:msb]` of `rd` with the equivalent low slice of `rj`,
/// leaving the rest of `rd` untouched. `msb == width-1 && lsb == 0`
/// degenerates to "replace all of rd with rj" (§8 boundary behaviour).
pub fn bstrins(ctx: &mut DecodeContext<'_>, width: Width, rd: RegId, rj: RegId, msb: u32, lsb: u32) {
    let bits = width_bits(width);
    let field_width = u64::from(msb) - u64::from(lsb) + 1;
    let field_mask = if field_width >= 64 { u64::MAX } else { (1u64 << field_width) - 1 };
    let hole_mask = !(field_mask << lsb);
    let hole_mask = if bits < 64 { hole_mask & ((1u64 << bits) - 1) } else { hole_mask };

    let current = guest_state::get_gpr(rd);
    let current = if int_width(width) != IrWidth::I64 { ir::narrow(int_width(width), current) } else { current };
    let preserved = ir::binop(BinOp::And, current, ir::const_u64(hole_mask));

    let source = guest_state::get_gpr(rj);
    let source = if int_width(width) != IrWidth::I64 { ir::narrow(int_width(width), source) } else { source };
    let field = ir::binop(BinOp::And, source, ir::const_u64(field_mask));
    let field_shifted = ir::binop(BinOp::Shl, field, ir::const_u64(u64::from(lsb)));

    let combined = ir::binop(BinOp::Or, preserved, field_shifted);
    let extended = if int_width(width) == IrWidth::I64 {
        combined
    } else {
        ir::sext(int_width(width), combined)
    };
    ctx.append_if_some(guest_state::put_gpr(rd, extended));
}

/// Extracts bits `[lsb:msb]` of `rj`, zero-extended into `rd`. `msb ==
/// width-1 && lsb == 0` is the identity on `rj` (§8 boundary behaviour).
pub fn bstrpick(ctx: &mut DecodeContext<'_>, width: Width, rd: RegId, rj: RegId, msb: u32, lsb: u32) {
    let from = int_width(width);
    let source = guest_state::get_gpr(rj);
    let source = if from != IrWidth::I64 { ir::narrow(from, source) } else { source };
    let shifted = ir::binop(BinOp::Shr, source, ir::const_u64(u64::from(lsb)));
    let field_width = u64::from(msb) - u64::from(lsb) + 1;
    let field_mask = if field_width >= 64 { u64::MAX } else { (1u64 << field_width) - 1 };
    let value = ir::binop(BinOp::And, shifted, ir::const_u64(field_mask));
    let extended = if from == IrWidth::I64 { value } else { ir::zext(from, value) };
    ctx.append_if_some(guest_state::put_gpr(rd, extended));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AbiInfo, Endianness, HwCaps};
    use crate::ir::Irsb;

    fn ctx(irsb: &mut Irsb) -> DecodeContext<'_> {
        DecodeContext::new(irsb, 0, Endianness::Little, HwCaps::empty(), AbiInfo::default(), false)
    }

    #[test]
    fn bstrins_full_width_replaces_whole_register() {
        let mut irsb = Irsb::new();
        let mut c = ctx(&mut irsb);
        bstrins(&mut c, Width::D, RegId::new(4), RegId::new(5), 63, 0);
        assert_eq!(irsb.stmts().len(), 1);
    }

    #[test]
    fn bstrpick_full_width_is_plain_copy() {
        let mut irsb = Irsb::new();
        let mut c = ctx(&mut irsb);
        bstrpick(&mut c, Width::D, RegId::new(4), RegId::new(5), 63, 0);
        assert_eq!(irsb.stmts().len(), 1);
    }
}
