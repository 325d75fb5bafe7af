//! Routes a decoded [`Instruction`] to its emitter. The only function here,
//! [`dispatch`], is an exhaustive match so a newly added `Instruction`
//! variant fails to compile until it's wired up.

use crate::context::DecodeContext;
use crate::emit::{alu, atomic, bitfield, branch, fp_arith, fp_cmp, fp_convert, fp_move, memory, special};
use loongarch64_asm::Instruction;

pub fn dispatch(ctx: &mut DecodeContext<'_>, instr: Instruction) {
    tracing::trace!(pc = ctx.guest_pc(), instruction = ?instr, "emitting instruction");
    match instr {
        Instruction::Alu3 { op, width, rd, rj, rk } => alu::alu3(ctx, op, width, rd, rj, rk),
        Instruction::AluImm { op, width, rd, rj, imm } => alu::alu_imm(ctx, op, width, rd, rj, imm),
        Instruction::Alsl { width, rd, rj, rk, sa_minus_one } => alu::alsl(ctx, width, rd, rj, rk, sa_minus_one),
        Instruction::Lu12iW { rd, imm } => alu::lu12i_w(ctx, rd, imm),
        Instruction::Lu32iD { rd, imm } => alu::lu32i_d(ctx, rd, imm),
        Instruction::Lu52iD { rd, rj, imm } => alu::lu52i_d(ctx, rd, rj, imm),
        Instruction::AddU16iD { rd, rj, imm } => alu::addu16i_d(ctx, rd, rj, imm),
        Instruction::PcAddI { rd, imm } => alu::pcaddi(ctx, rd, imm),
        Instruction::PcAlaU12I { rd, imm } => alu::pcalau12i(ctx, rd, imm),
        Instruction::PcAddU12I { rd, imm } => alu::pcaddu12i(ctx, rd, imm),
        Instruction::PcAddU18I { rd, imm } => alu::pcaddu18i(ctx, rd, imm),
        Instruction::Shift { op, width, rd, rj, rk } => alu::shift_reg(ctx, op, width, rd, rj, rk),
        Instruction::ShiftImm { op, width, rd, rj, amount } => alu::shift_imm(ctx, op, width, rd, rj, amount),
        Instruction::ExtW { from_byte, rd, rj } => alu::ext_w(ctx, from_byte, rd, rj),
        Instruction::BitScan { op, width, rd, rj } => alu::bit_scan(ctx, op, width, rd, rj),
        Instruction::Rev { op, rd, rj } => alu::rev(ctx, op, rd, rj),
        Instruction::Crc { op, width, rd, rj, rk } => alu::crc(ctx, op, width, rd, rj, rk),
        Instruction::BytePick { width, rd, rj, rk, sa } => alu::byte_pick(ctx, width, rd, rj, rk, sa),
        Instruction::BitFieldInsert { width, rd, rj, msb, lsb } => bitfield::bstrins(ctx, width, rd, rj, msb, lsb),
        Instruction::BitFieldPick { width, rd, rj, msb, lsb } => bitfield::bstrpick(ctx, width, rd, rj, msb, lsb),
        Instruction::MaskEqz { rd, rj, rk } => alu::mask_eqz(ctx, rd, rj, rk),
        Instruction::MaskNez { rd, rj, rk } => alu::mask_nez(ctx, rd, rj, rk),

        Instruction::Load { width, rd, rj, imm } => memory::load(ctx, width, rd, rj, imm),
        Instruction::Store { width, rd, rj, imm } => memory::store(ctx, width, rd, rj, imm),
        Instruction::FpLoad { width, fd, rj, imm } => memory::fp_load(ctx, width, fd, rj, imm),
        Instruction::FpStore { width, fd, rj, imm } => memory::fp_store(ctx, width, fd, rj, imm),
        Instruction::LoadIndexed { width, rd, rj, rk } => memory::load_indexed(ctx, width, rd, rj, rk),
        Instruction::StoreIndexed { width, rd, rj, rk } => memory::store_indexed(ctx, width, rd, rj, rk),
        Instruction::LoadPtr { width, rd, rj, imm } => memory::load_ptr(ctx, width, rd, rj, imm),
        Instruction::StorePtr { width, rd, rj, imm } => memory::store_ptr(ctx, width, rd, rj, imm),
        Instruction::BoundedLoad { greater_than, width, rd, rj, rk } => memory::bounded_load(ctx, greater_than, width, rd, rj, rk),
        Instruction::BoundedStore { greater_than, width, rd, rj, rk } => memory::bounded_store(ctx, greater_than, width, rd, rj, rk),
        Instruction::Preld { hint, rj, imm } => memory::preld(ctx, hint, rj, imm),
        Instruction::Preldx { hint, rj, rk } => memory::preldx(ctx, hint, rj, rk),
        Instruction::DataBarrier { hint } => memory::dbar(ctx, hint),
        Instruction::InstrBarrier { hint } => memory::ibar(ctx, hint),

        Instruction::FpArith3 { op, width, fd, fj, fk } => fp_arith::arith3(ctx, op, width, fd, fj, fk),
        Instruction::FpArith2 { op, width, fd, fj } => fp_arith::arith2(ctx, op, width, fd, fj),
        Instruction::FpMadd4 { op, width, fd, fj, fk, fa } => fp_arith::madd4(ctx, op, width, fd, fj, fk, fa),
        Instruction::FpClass { width, fd, fj } => fp_arith::fclass(ctx, width, fd, fj),
        Instruction::FpCmp { width, cond, cd, fj, fk } => fp_cmp::fcmp(ctx, width, cond, cd, fj, fk),
        Instruction::Fsel { fd, fj, fk, ca } => fp_arith::fsel(ctx, fd, fj, fk, ca),
        Instruction::FpConvert { widen, fd, fj } => fp_convert::convert(ctx, widen, fd, fj),
        Instruction::FpToInt { round, int_width, fp_width, fd, fj } => fp_convert::to_int(ctx, round, int_width, fp_width, fd, fj),
        Instruction::IntToFp { int_width, fp_width, fd, fj } => fp_convert::from_int(ctx, int_width, fp_width, fd, fj),
        Instruction::FpRound { width, fd, fj } => fp_convert::frint(ctx, width, fd, fj),

        Instruction::MoveGrToFr { whole, fd, rj } => fp_move::gr_to_fr(ctx, whole, fd, rj),
        Instruction::MoveFrToGr { whole, rd, fj } => fp_move::fr_to_gr(ctx, whole, rd, fj),
        Instruction::MoveFcsrToGr { rd, fcsr } => fp_move::fcsr_to_gr(ctx, rd, fcsr),
        Instruction::MoveGrToFcsr { fcsr, rj } => fp_move::gr_to_fcsr(ctx, fcsr, rj),
        Instruction::MoveCfToGr { rd, cj } => fp_move::cf_to_gr(ctx, rd, cj),
        Instruction::MoveGrToCf { cd, rj } => fp_move::gr_to_cf(ctx, cd, rj),
        Instruction::MoveFrToCf { cd, fj } => fp_move::fr_to_cf(ctx, cd, fj),
        Instruction::MoveCfToFr { fd, cj } => fp_move::cf_to_fr(ctx, fd, cj),

        Instruction::Amo { op, width, fenced, rd, rj, rk } => atomic::amo(ctx, op, width, fenced, rd, rj, rk),
        Instruction::LoadLinked { width, rd, rj, imm } => atomic::load_linked(ctx, width, rd, rj, imm),
        Instruction::StoreConditional { width, rd, rj, imm } => atomic::store_conditional(ctx, width, rd, rj, imm),

        Instruction::Branch { cond, rj, rd, offset } => branch::branch(ctx, cond, rj, rd, offset),
        Instruction::BranchZero { is_eq, rj, offset } => branch::branch_zero(ctx, is_eq, rj, offset),
        Instruction::BranchFpCc { is_eq, cj, offset } => branch::branch_fp_cc(ctx, is_eq, cj, offset),
        Instruction::B { offset } => branch::b(ctx, offset),
        Instruction::Bl { offset } => branch::bl(ctx, offset),
        Instruction::Jirl { rd, rj, offset } => branch::jirl(ctx, rd, rj, offset),

        Instruction::Break { code } => special::brk(ctx, code),
        Instruction::Syscall { .. } => special::syscall(ctx),
        Instruction::AssertLe { rj, rk } => special::assert_le(ctx, rj, rk),
        Instruction::AssertGt { rj, rk } => special::assert_gt(ctx, rj, rk),
        Instruction::ReadTimeLow { rd, rj } => special::read_time_low(ctx, rd, rj),
        Instruction::ReadTimeHigh { rd, rj } => special::read_time_high(ctx, rd, rj),
        Instruction::ReadTime64 { rd, rj } => special::read_time64(ctx, rd, rj),
        Instruction::CpuCfg { rd, rj } => special::cpucfg(ctx, rd, rj),
    }
}
