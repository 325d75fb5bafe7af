//! Three-register/two-register-plus-immediate ALU, shift, bit-scan,
//! byte/bit-reversal, CRC, and PC-relative-constant emitters (§4.2).
//!
//! Every result lands in `rd` at 64-bit width; `.w`-suffixed ops compute at
//! 32 bits and sign-extend the IR temp holding the result before the
//! register write, `.wu` zero-extends. That rule is centralized in
//! [`finish`] so the family-specific functions below only ever build the
//! 32-or-64-bit value itself.

use crate::context::DecodeContext;
use crate::guest_state;
use crate::ir::{self, BinOp, IrExpr, IrWidth, UnOp};
use loongarch64_asm::imm::SignedImm;
use loongarch64_asm::opcode::{AluOp, BitScanOp, CrcOp, RevOp, ShiftOp, Width};
use loongarch64_asm::RegId;

fn int_width(width: Width) -> IrWidth {
    match width {
        Width::W | Width::Wu => IrWidth::I32,
        Width::D | Width::Du => IrWidth::I64,
        Width::B | Width::Bu => IrWidth::I8,
        Width::H | Width::Hu => IrWidth::I16,
    }
}

fn is_unsigned(width: Width) -> bool {
    matches!(width, Width::Wu | Width::Du | Width::Bu | Width::Hu)
}

/// Writes `value` (computed at `width`'s bit count) to `rd`, extending to 64
/// bits per the family-wide sign/zero convention, and skipping the write
/// entirely for `rd == r0`.
fn finish(ctx: &mut DecodeContext<'_>, rd: RegId, width: Width, value: IrExpr) {
    let from = int_width(width);
    let widened = if from == IrWidth::I64 {
        value
    } else if is_unsigned(width) {
        ir::zext(from, value)
    } else {
        ir::sext(from, value)
    };
    ctx.append_if_some(guest_state::put_gpr(rd, widened));
}

pub fn alu3(ctx: &mut DecodeContext<'_>, op: AluOp, width: Width, rd: RegId, rj: RegId, rk: RegId) {
    let a = guest_state::get_gpr(rj);
    let b = guest_state::get_gpr(rk);
    let (a, b) = if int_width(width) != IrWidth::I64 {
        let from = int_width(width);
        (ir::narrow(from, a), ir::narrow(from, b))
    } else {
        (a, b)
    };
    let unsigned = is_unsigned(width);
    let value = match op {
        AluOp::Add => ir::binop(BinOp::Add, a, b),
        AluOp::Sub => ir::binop(BinOp::Sub, a, b),
        AluOp::Slt => ir::binop(BinOp::CmpLt, a, b),
        AluOp::Sltu => ir::binop(BinOp::CmpLtU, a, b),
        AluOp::And => ir::binop(BinOp::And, a, b),
        AluOp::Or => ir::binop(BinOp::Or, a, b),
        AluOp::Xor => ir::binop(BinOp::Xor, a, b),
        AluOp::Nor => ir::unop(UnOp::Not, ir::binop(BinOp::Or, a, b)),
        AluOp::Andn => ir::binop(BinOp::And, a, ir::unop(UnOp::Not, b)),
        AluOp::Orn => ir::binop(BinOp::Or, a, ir::unop(UnOp::Not, b)),
        AluOp::Mul => ir::binop(if unsigned { BinOp::MulU } else { BinOp::MulS }, a, b),
        AluOp::Mulh => ir::binop(if unsigned { BinOp::MulHiU } else { BinOp::MulHiS }, a, b),
        AluOp::MulwD => {
            // 32x32 -> 64 widening multiply: operands come in narrowed to
            // 32 bits above, so widen back out before multiplying at 64.
            let ext = if unsigned { UnOp::ZeroExtend { from: IrWidth::I32 } } else { UnOp::SignExtend { from: IrWidth::I32 } };
            let a64 = ir::unop(ext, a);
            let ext = if unsigned { UnOp::ZeroExtend { from: IrWidth::I32 } } else { UnOp::SignExtend { from: IrWidth::I32 } };
            let b64 = ir::unop(ext, b);
            ir::binop(if unsigned { BinOp::MulU } else { BinOp::MulS }, a64, b64)
        }
        AluOp::Div => ir::binop(if unsigned { BinOp::DivU } else { BinOp::DivS }, a, b),
        AluOp::Mod => ir::binop(if unsigned { BinOp::RemU } else { BinOp::RemS }, a, b),
    };
    let result_width = if matches!(op, AluOp::MulwD) { Width::D } else { width };
    finish(ctx, rd, result_width, value);
}

pub fn alu_imm(ctx: &mut DecodeContext<'_>, op: AluOp, width: Width, rd: RegId, rj: RegId, imm: SignedImm) {
    let a = guest_state::get_gpr(rj);
    let a = if int_width(width) != IrWidth::I64 { ir::narrow(int_width(width), a) } else { a };
    let imm_expr = ir::const_u64(imm.sext64() as u64);
    let imm_expr = if int_width(width) != IrWidth::I64 { ir::narrow(int_width(width), imm_expr) } else { imm_expr };
    let value = match op {
        AluOp::Add => ir::binop(BinOp::Add, a, imm_expr),
        AluOp::Slt => ir::binop(BinOp::CmpLt, a, imm_expr),
        AluOp::Sltu => ir::binop(BinOp::CmpLtU, a, imm_expr),
        AluOp::And => ir::binop(BinOp::And, a, imm_expr),
        AluOp::Or => ir::binop(BinOp::Or, a, imm_expr),
        AluOp::Xor => ir::binop(BinOp::Xor, a, imm_expr),
        _ => unreachable!("alu_imm only decodes add/slt/sltu/and/or/xor"),
    };
    finish(ctx, rd, width, value);
}

/// `alsl.{w,wu,d}`: `(rj << (sa+1)) + rk`.
pub fn alsl(ctx: &mut DecodeContext<'_>, width: Width, rd: RegId, rj: RegId, rk: RegId, sa_minus_one: u32) {
    let a = guest_state::get_gpr(rj);
    let a = if int_width(width) != IrWidth::I64 { ir::narrow(int_width(width), a) } else { a };
    let shifted = ir::binop(BinOp::Shl, a, ir::const_u64(u64::from(sa_minus_one) + 1));
    let b = guest_state::get_gpr(rk);
    let b = if int_width(width) != IrWidth::I64 { ir::narrow(int_width(width), b) } else { b };
    let value = ir::binop(BinOp::Add, shifted, b);
    finish(ctx, rd, width, value);
}

pub fn lu12i_w(ctx: &mut DecodeContext<'_>, rd: RegId, imm: SignedImm) {
    let shifted = (imm.sext64() as i32) << 12;
    finish(ctx, rd, Width::W, ir::const_u32(shifted as u32));
}

/// `lu32i.d`: splice bits `[32:51]` (sign-extended through bit 51) into
/// `rd`'s current low 32 bits.
pub fn lu32i_d(ctx: &mut DecodeContext<'_>, rd: RegId, imm: SignedImm) {
    let low32 = ir::zext(IrWidth::I32, ir::narrow(IrWidth::I32, guest_state::get_gpr(rd)));
    let high = ir::sext(IrWidth::I32, ir::const_u32(imm.raw()));
    let high_shifted = ir::binop(BinOp::Shl, high, ir::const_u64(32));
    let value = ir::binop(BinOp::Or, low32, high_shifted);
    ctx.append_if_some(guest_state::put_gpr(rd, value));
}

/// `lu52i.d`: splice bits `[52:63]` above `rj`'s low 52 bits.
pub fn lu52i_d(ctx: &mut DecodeContext<'_>, rd: RegId, rj: RegId, imm: SignedImm) {
    let low52_mask = (1u64 << 52) - 1;
    let low = ir::binop(BinOp::And, guest_state::get_gpr(rj), ir::const_u64(low52_mask));
    let high = ir::const_u64((imm.sext64() as u64) << 52);
    let value = ir::binop(BinOp::Or, low, high);
    ctx.append_if_some(guest_state::put_gpr(rd, value));
}

/// `addu16i.d`: `rd = rj + sext64(imm16 << 16)`.
pub fn addu16i_d(ctx: &mut DecodeContext<'_>, rd: RegId, rj: RegId, imm: SignedImm) {
    let addend = ir::const_u64((imm.sext64() << 16) as u64);
    let value = ir::binop(BinOp::Add, guest_state::get_gpr(rj), addend);
    ctx.append_if_some(guest_state::put_gpr(rd, value));
}

fn pc_relative(ctx: &DecodeContext<'_>, base_mask_clear_bits: u32, shifted: i64) -> u64 {
    let pc = ctx.guest_pc() & !((1u64 << base_mask_clear_bits) - 1);
    pc.wrapping_add(shifted as u64)
}

pub fn pcaddi(ctx: &mut DecodeContext<'_>, rd: RegId, imm: SignedImm) {
    let value = ctx.guest_pc().wrapping_add((imm.sext64() << 2) as u64);
    ctx.append_if_some(guest_state::put_gpr(rd, ir::const_u64(value)));
}

pub fn pcalau12i(ctx: &mut DecodeContext<'_>, rd: RegId, imm: SignedImm) {
    let value = pc_relative(ctx, 12, imm.sext64() << 12);
    ctx.append_if_some(guest_state::put_gpr(rd, ir::const_u64(value)));
}

pub fn pcaddu12i(ctx: &mut DecodeContext<'_>, rd: RegId, imm: SignedImm) {
    let value = ctx.guest_pc().wrapping_add((imm.sext64() << 12) as u64);
    ctx.append_if_some(guest_state::put_gpr(rd, ir::const_u64(value)));
}

pub fn pcaddu18i(ctx: &mut DecodeContext<'_>, rd: RegId, imm: SignedImm) {
    let value = ctx.guest_pc().wrapping_add((imm.sext64() << 18) as u64);
    ctx.append_if_some(guest_state::put_gpr(rd, ir::const_u64(value)));
}

pub fn shift_reg(ctx: &mut DecodeContext<'_>, op: ShiftOp, width: Width, rd: RegId, rj: RegId, rk: RegId) {
    let amount_mask = if width == Width::W { 0x1f } else { 0x3f };
    let amount = ir::binop(BinOp::And, guest_state::get_gpr(rk), ir::const_u64(amount_mask));
    shift_common(ctx, op, width, rd, rj, amount)
}

pub fn shift_imm(ctx: &mut DecodeContext<'_>, op: ShiftOp, width: Width, rd: RegId, rj: RegId, amount: u32) {
    shift_common(ctx, op, width, rd, rj, ir::const_u64(u64::from(amount)))
}

fn shift_common(ctx: &mut DecodeContext<'_>, op: ShiftOp, width: Width, rd: RegId, rj: RegId, amount: IrExpr) {
    let from = int_width(width);
    let a = guest_state::get_gpr(rj);
    let a = if from != IrWidth::I64 { ir::narrow(from, a) } else { a };
    let value = match op {
        ShiftOp::Sll => ir::binop(BinOp::Shl, a, amount),
        ShiftOp::Srl => ir::binop(BinOp::Shr, a, amount),
        ShiftOp::Sra => ir::binop(BinOp::Sar, a, amount),
        // Rotate-right degenerates to the bare value when the amount is 0,
        // avoiding the undefined `x << width` that `(x >> 0) | (x << W)`
        // would otherwise require (§9 "negative-shift degeneracy").
        ShiftOp::Rotr => ir::binop(BinOp::Ror, a, amount),
    };
    finish(ctx, rd, width, value);
}

pub fn ext_w(ctx: &mut DecodeContext<'_>, from_byte: bool, rd: RegId, rj: RegId) {
    let from = if from_byte { IrWidth::I8 } else { IrWidth::I16 };
    let value = ir::narrow(from, guest_state::get_gpr(rj));
    finish(ctx, rd, Width::D, ir::sext(from, value));
}

pub fn bit_scan(ctx: &mut DecodeContext<'_>, op: BitScanOp, width: Width, rd: RegId, rj: RegId) {
    let from = int_width(width);
    let a = ir::narrow(from, guest_state::get_gpr(rj));
    let unop = match op {
        BitScanOp::Clo => UnOp::CountLeadingOnes,
        BitScanOp::Clz => UnOp::CountLeadingZeros,
        BitScanOp::Cto => UnOp::CountTrailingOnes,
        BitScanOp::Ctz => UnOp::CountTrailingZeros,
    };
    let value = ir::unop(unop, a);
    finish(ctx, rd, width, value);
}

pub fn rev(ctx: &mut DecodeContext<'_>, op: RevOp, rd: RegId, rj: RegId) {
    let (name, width) = match op {
        RevOp::Revb2h => ("revb_2h", Width::W),
        RevOp::Revb4h => ("revb_4h", Width::D),
        RevOp::Revb2w => ("revb_2w", Width::D),
        RevOp::RevbD => ("revb_d", Width::D),
        RevOp::Revh2w => ("revh_2w", Width::D),
        RevOp::RevhD => ("revh_d", Width::D),
        RevOp::Bitrev4b => ("bitrev_4b", Width::W),
        RevOp::Bitrev8b => ("bitrev_8b", Width::D),
        RevOp::BitrevW => ("bitrev_w", Width::W),
        RevOp::BitrevD => ("bitrev_d", Width::D),
    };
    let src = guest_state::get_gpr(rj);
    let value = ir::helper_call(name, vec![Some(src)], IrWidth::I64);
    finish(ctx, rd, width, value);
}

pub fn crc(ctx: &mut DecodeContext<'_>, op: CrcOp, width: Width, rd: RegId, rj: RegId, rk: RegId) {
    let name = match op {
        CrcOp::Crc => "crc",
        CrcOp::Crcc => "crcc",
    };
    let from = int_width(width);
    let data = ir::narrow(from, guest_state::get_gpr(rj));
    let seed = guest_state::get_gpr(rk);
    let value = ir::helper_call(name, vec![Some(data), Some(seed)], IrWidth::I64);
    finish(ctx, rd, Width::W, ir::narrow(IrWidth::I32, value));
}

/// `bytepick.{w,d}`: concatenate `{rk, rj}` and extract a window starting
/// `sa` bytes in.
pub fn byte_pick(ctx: &mut DecodeContext<'_>, width: Width, rd: RegId, rj: RegId, rk: RegId, sa: u32) {
    let from = int_width(width);
    let hi = if from == IrWidth::I64 { guest_state::get_gpr(rk) } else { ir::narrow(from, guest_state::get_gpr(rk)) };
    let lo = if from == IrWidth::I64 { guest_state::get_gpr(rj) } else { ir::narrow(from, guest_state::get_gpr(rj)) };
    let shift_bits = u64::from(sa) * 8;
    let lo_shifted = ir::binop(BinOp::Shr, lo, ir::const_u64(shift_bits));
    let bits = if width == Width::W { 32 } else { 64 };
    let hi_shifted = if shift_bits == 0 {
        ir::const_u64(0)
    } else {
        ir::binop(BinOp::Shl, hi, ir::const_u64(bits - shift_bits))
    };
    let value = ir::binop(BinOp::Or, hi_shifted, lo_shifted);
    finish(ctx, rd, width, value);
}

pub fn mask_eqz(ctx: &mut DecodeContext<'_>, rd: RegId, rj: RegId, rk: RegId) {
    mask_common(ctx, rd, rj, rk, true)
}

pub fn mask_nez(ctx: &mut DecodeContext<'_>, rd: RegId, rj: RegId, rk: RegId) {
    mask_common(ctx, rd, rj, rk, false)
}

fn mask_common(ctx: &mut DecodeContext<'_>, rd: RegId, rj: RegId, rk: RegId, gate_on_zero: bool) {
    let test = ir::binop(BinOp::CmpEq, guest_state::get_gpr(rk), ir::const_u64(0));
    let test = if gate_on_zero { test } else { ir::unop(UnOp::Not, test) };
    let gated = ir::binop(BinOp::And, guest_state::get_gpr(rj), ir::sext(IrWidth::I8, test));
    ctx.append_if_some(guest_state::put_gpr(rd, gated));
}
