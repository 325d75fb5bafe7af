//! End-to-end decode scenarios driven entirely through the public API,
//! mirroring spec §8's worked examples rather than reaching into emitter
//! internals the way the crate's own unit tests do.

use loongarch64_irgen::{
    decode, AbiInfo, DisResult, Endianness, GuestArch, HwCaps, IrExpr, IrStmt, Irsb, JumpKind,
    WhatNext,
};

fn words_to_bytes(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

#[test]
fn magic_preamble_client_request_stops_at_twenty_bytes() {
    let mut irsb = Irsb::new();
    let words = [0x0045_0c00, 0x0045_3400, 0x0045_7400, 0x0045_4c00, 0x0015_35ad];
    let code = words_to_bytes(&words);
    let result: DisResult = decode(
        &mut irsb,
        &code,
        0x1000,
        GuestArch::LoongArch64,
        HwCaps::empty(),
        AbiInfo::default(),
        Endianness::Little,
        false,
    );
    assert_eq!(result.len, 20);
    assert_eq!(result.what_next, WhatNext::StopHere);
    assert_eq!(result.jump_kind, JumpKind::ClientReq);
    assert!(irsb.stmts().iter().any(|s| matches!(
        s,
        IrStmt::PutGuest { value, .. } if *value == IrExpr::Const(loongarch64_irgen::IrConst::U64(0x1014))
    )));
}

#[test]
fn unknown_encoding_stops_with_no_decode_and_rewrites_pc() {
    let mut irsb = Irsb::new();
    let code = 0xFFFF_FFFFu32.to_le_bytes();
    let result = decode(
        &mut irsb,
        &code,
        0x2000,
        GuestArch::LoongArch64,
        HwCaps::empty(),
        AbiInfo::default(),
        Endianness::Little,
        false,
    );
    assert_eq!(result.len, 0);
    assert_eq!(result.what_next, WhatNext::StopHere);
    assert_eq!(result.jump_kind, JumpKind::NoDecode);
    assert_eq!(irsb.stmts().len(), 1);
}

#[test]
fn addi_d_sharing_the_3r_major_nibble_round_trips_through_public_decode() {
    for (imm12, expected) in [(0x001u32, 1i64), (0x000, 0), (0x7ff, 2047), (0x800, -2048)] {
        let mut irsb = Irsb::new();
        // addi.d r4, r5, imm: opcode10 = 0x00b, rj=5, rd=4.
        let word: u32 = (0x00bu32 << 22) | (imm12 << 10) | (5 << 5) | 4;
        let code = word.to_le_bytes();
        let result = decode(
            &mut irsb,
            &code,
            0x4000,
            GuestArch::LoongArch64,
            HwCaps::empty(),
            AbiInfo::default(),
            Endianness::Little,
            false,
        );
        assert_eq!(result.len, 4);
        assert_eq!(result.what_next, WhatNext::Continue);
        assert_eq!(result.jump_kind, JumpKind::Boring);
        assert!(
            irsb.stmts().iter().any(|s| matches!(s, IrStmt::PutGuest { value: IrExpr::Binop(_, _, b), .. }
                if matches!(&**b, IrExpr::Const(loongarch64_irgen::IrConst::U64(v)) if *v == expected as u64))),
            "expected an add against the sign-extended immediate {expected} for encoding {imm12:#x}"
        );
    }
}

#[test]
fn ordinary_add_continues_and_advances_pc_by_four() {
    let mut irsb = Irsb::new();
    // add.w r4, r5, r6: opcode17 = 0x0_0001, rk=6, rj=5, rd=4.
    let word: u32 = (0x0_0001 << 15) | (6 << 10) | (5 << 5) | 4;
    let code = word.to_le_bytes();
    let result = decode(
        &mut irsb,
        &code,
        0x4000,
        GuestArch::LoongArch64,
        HwCaps::empty(),
        AbiInfo::default(),
        Endianness::Little,
        false,
    );
    assert_eq!(result.len, 4);
    assert_eq!(result.what_next, WhatNext::Continue);
    assert_eq!(result.jump_kind, JumpKind::Boring);
    assert!(irsb.stmts().iter().any(|s| matches!(
        s,
        IrStmt::PutGuest { value, .. } if *value == IrExpr::Const(loongarch64_irgen::IrConst::U64(0x4004))
    )));
}
