//! Per-instruction-family emitters. Each module owns one corner of §4 and
//! exposes plain functions taking `&mut DecodeContext` plus decoded operand
//! fields; [`crate::dispatch`] is the only caller.

pub mod alu;
pub mod atomic;
pub mod bitfield;
pub mod branch;
pub mod fp_arith;
pub mod fp_cmp;
pub mod fp_convert;
pub mod fp_move;
pub mod memory;
pub mod special;
