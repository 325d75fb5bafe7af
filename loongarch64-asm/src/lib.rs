//! Bit-exact encoding primitives for 64-bit LoongArch instructions.
//!
//! This crate owns the architectural vocabulary — register indices,
//! immediates, the instruction encoding format — and nothing else. It knows
//! nothing about IR, guest state, or translation; [`instruction::decode`] is
//! a pure function from a 32-bit word to an [`instruction::Instruction`] (or
//! `None`). Consumers that need to turn a decoded instruction into
//! semantics live one layer up.

mod fields;

pub mod imm;
pub mod instruction;
pub mod opcode;
pub mod preamble;
pub mod regs;

pub use imm::{BranchOffset, SignedImm, UnsignedImm};
pub use instruction::{decode, Instruction};
pub use preamble::{matches_preamble, HostRequest, PREAMBLE_WORDS, PSEUDO_INSTRUCTION_LENGTH};
pub use regs::{CcId, FcsrSubId, FpRegId, RegId};
