//! The top-level entry point (§6): fetches one little-endian instruction
//! word, recognizes the magic preamble if present, otherwise drives the
//! dispatcher, and folds the result into a [`DisResult`].

use crate::context::{AbiInfo, DecodeContext, Endianness, HwCaps};
use crate::dispatch;
use crate::guest_state;
use crate::ir::{self, Irsb, JumpKind};
use crate::preamble;
use loongarch64_asm::{self, HostRequest};

/// What the caller should do after this call returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WhatNext {
    Continue,
    StopHere,
}

/// The per-call result record (§6).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisResult {
    /// `0` for decode failure, `4` for an ordinary instruction, `20` for a
    /// recognized magic preamble.
    pub len: u32,
    pub what_next: WhatNext,
    pub jump_kind: JumpKind,
}

/// The only architecture this decoder accepts; checking it is a precondition
/// on the caller, not a recoverable decode failure (§6).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuestArch {
    LoongArch64,
}

fn read_word(code: &[u8], byte_offset: usize) -> u32 {
    let b = &code[byte_offset..byte_offset + 4];
    u32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

/// Decodes exactly one guest instruction (or one magic-preamble
/// pseudo-instruction) starting at `code[0..]`, appending its IR to `irsb`.
///
/// `code` must hold at least 4 readable bytes (20 if it happens to start the
/// magic preamble) — a precondition on the caller, matching the framework's
/// own contract for this entry point.
#[allow(clippy::too_many_arguments)]
pub fn decode(
    irsb: &mut Irsb,
    code: &[u8],
    guest_ip: u64,
    guest_arch: GuestArch,
    hwcaps: HwCaps,
    abi: AbiInfo,
    host_endianness: Endianness,
    sigill_diag: bool,
) -> DisResult {
    let GuestArch::LoongArch64 = guest_arch;
    assert!(code.len() >= 4, "caller must supply at least 4 readable bytes");

    if code.len() >= 20 {
        let words = [read_word(code, 0), read_word(code, 4), read_word(code, 8), read_word(code, 12)];
        if loongarch64_asm::matches_preamble(&words) {
            let selector = read_word(code, 16);
            return match HostRequest::from_selector(selector) {
                Some(request) => {
                    let mut ctx = DecodeContext::new(irsb, guest_ip, host_endianness, hwcaps, abi, sigill_diag);
                    let jump_kind = preamble::emit(&mut ctx, request);
                    match jump_kind {
                        Some(jk) => DisResult { len: 20, what_next: WhatNext::StopHere, jump_kind: jk },
                        None => {
                            ctx.append(guest_state::put_pc(ir::const_u64(guest_ip + 20)));
                            DisResult { len: 20, what_next: WhatNext::Continue, jump_kind: JumpKind::Boring }
                        }
                    }
                }
                None => no_decode(irsb, guest_ip, sigill_diag, selector),
            };
        }
    }

    let word = read_word(code, 0);
    match loongarch64_asm::decode(word) {
        Some(instruction) => {
            let mut ctx = DecodeContext::new(irsb, guest_ip, host_endianness, hwcaps, abi, sigill_diag);
            dispatch::dispatch(&mut ctx, instruction);
            // An emitter that stops the block (b/bl/jirl, break, syscall, a
            // feature-absent gate) records its jump kind via `set_stop` and
            // has already written PC itself; everything else falls through
            // and the entry point appends the ordinary continuation here,
            // per §6: "on Continue, the entry point appends PC := PC_curr +
            // len".
            match ctx.take_stop() {
                Some(jk) => DisResult { len: 4, what_next: WhatNext::StopHere, jump_kind: jk },
                None => {
                    ctx.append(guest_state::put_pc(ir::const_u64(guest_ip + 4)));
                    DisResult { len: 4, what_next: WhatNext::Continue, jump_kind: JumpKind::Boring }
                }
            }
        }
        None => no_decode(irsb, guest_ip, sigill_diag, word),
    }
}

fn no_decode(irsb: &mut Irsb, guest_ip: u64, sigill_diag: bool, raw: u32) -> DisResult {
    if sigill_diag {
        tracing::warn!(pc = guest_ip, encoding = format!("{raw:#010x}"), "no decode for this encoding");
    }
    irsb.append(guest_state::put_pc(ir::const_u64(guest_ip)));
    DisResult { len: 0, what_next: WhatNext::StopHere, jump_kind: JumpKind::NoDecode }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words_to_bytes(words: &[u32]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    #[test]
    fn unknown_encoding_is_no_decode_and_rewrites_pc() {
        let mut irsb = Irsb::new();
        let code = 0xFFFF_FFFFu32.to_le_bytes();
        let result = decode(&mut irsb, &code, 0x1000, GuestArch::LoongArch64, HwCaps::empty(), AbiInfo::default(), Endianness::Little, false);
        assert_eq!(result.len, 0);
        assert_eq!(result.what_next, WhatNext::StopHere);
        assert_eq!(result.jump_kind, JumpKind::NoDecode);
        assert!(irsb
            .stmts()
            .iter()
            .any(|s| matches!(s, ir::IrStmt::PutGuest { offset, value } if *offset == guest_state::pc_offset() && *value == ir::const_u64(0x1000))));
    }

    #[test]
    fn magic_preamble_client_request_stops_with_jk_client_req() {
        let mut irsb = Irsb::new();
        let mut words = loongarch64_asm::PREAMBLE_WORDS.to_vec();
        words.push(0x0015_35ad);
        let code = words_to_bytes(&words);
        let result = decode(&mut irsb, &code, 0x2000, GuestArch::LoongArch64, HwCaps::empty(), AbiInfo::default(), Endianness::Little, false);
        assert_eq!(result.len, 20);
        assert_eq!(result.what_next, WhatNext::StopHere);
        assert_eq!(result.jump_kind, JumpKind::ClientReq);
    }

    #[test]
    fn ordinary_instruction_decodes_to_length_four() {
        let mut irsb = Irsb::new();
        // add.w r4, r5, r6 under this crate's invented opcode assignment.
        let word: u32 = (0x0_0001 << 15) | (6 << 10) | (5 << 5) | 4;
        let code = word.to_le_bytes();
        let result = decode(&mut irsb, &code, 0x3000, GuestArch::LoongArch64, HwCaps::empty(), AbiInfo::default(), Endianness::Little, false);
        assert_eq!(result.len, 4);
        assert_eq!(result.what_next, WhatNext::Continue);
        let advanced_pc = irsb.stmts().iter().any(|s| {
            matches!(s, ir::IrStmt::PutGuest { offset, value }
                if *offset == guest_state::pc_offset() && *value == ir::const_u64(0x3004))
        });
        assert!(advanced_pc, "Continue must advance PC by the instruction length");
    }
}
