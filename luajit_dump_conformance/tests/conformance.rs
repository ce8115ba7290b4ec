// Copyright 2026 the LuaJIT Dump Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![allow(missing_docs, reason = "integration test crate")]

use luajit_dump::buffer::{Buffer, DumpError};
use luajit_dump::dump::{DUMP_VERSION_V1, DUMP_VERSION_V2, Dump, DumpFlags};
use luajit_dump::opcode::OPCODES_V2;
use luajit_dump::proto::{
    Instruction, Kgc, Proto, ProtoFlags, Table, TableValue, VARNAME_FOR_INDEX, Varname,
};

fn opcode_byte(name: &str) -> u8 {
    OPCODES_V2.iter().position(|o| o.name == name).unwrap() as u8
}

fn roundtrip(dump: &Dump) -> Dump {
    let encoded = dump.encode().unwrap();
    Dump::decode(&mut Buffer::from_bytes(encoded.as_slice())).unwrap()
}

#[test]
fn golden_minimal_stripped_dump_bytes() {
    let mut dump = Dump::new(DUMP_VERSION_V2);
    dump.header.flags = DumpFlags::STRIP;
    dump.protos.push(Proto::new());

    // This test is intentionally strict: it locks in the dump encoding of an
    // empty stripped prototype as a regression signal for format changes.
    let expected: &[u8] = &[
        0x1b, b'L', b'J', // magic
        0x02, // version
        0x02, // flags: strip
        0x07, // prototype size
        0x00, 0x00, 0x00, 0x00, // flags, numparams, framesize, numuv
        0x00, 0x00, 0x00, // numkgc, numknum, numins
        0x00, // terminator
    ];
    let encoded = dump.encode().unwrap();
    assert_eq!(encoded.as_slice(), expected);

    let back = Dump::decode(&mut Buffer::from_bytes(expected)).unwrap();
    assert_eq!(back, dump);
    assert_eq!(back.protos.len(), 1);
    assert!(back.protos[0].ins.is_empty());
}

#[test]
fn debug_name_survives_the_roundtrip() {
    let mut dump = Dump::new(DUMP_VERSION_V2);
    dump.header.debug_name = b"test".to_vec();
    dump.protos.push(Proto::new());

    let back = roundtrip(&dump);
    assert_eq!(back.header.debug_name, b"test");
    assert_eq!(back.header.flags, DumpFlags::NONE);
    assert_eq!(back, dump);
}

#[test]
fn prototype_with_constants_roundtrips() {
    let mut pt = Proto::new();
    pt.flags = ProtoFlags::VARARG;
    pt.numparams = 3;
    pt.framesize = 1;
    pt.numline = 260;
    pt.ins = vec![
        Instruction::ad(opcode_byte("KSTR"), 0, 0),
        Instruction::ad(opcode_byte("RET0"), 0, 0),
    ];
    pt.kgc = vec![Kgc::Str(b"test".to_vec())];
    pt.knum = vec![1.0, 3.125];
    pt.lineinfo = vec![1, 2];

    let mut dump = Dump::new(DUMP_VERSION_V2);
    dump.header.debug_name = b"test".to_vec();
    dump.protos.push(pt);

    assert_eq!(roundtrip(&dump), dump);
}

#[test]
fn unknown_version_is_rejected() {
    let mut dump = Dump::new(3);
    dump.header.flags = DumpFlags::STRIP;
    dump.protos.push(Proto::new());

    let encoded = dump.encode().unwrap();
    assert_eq!(
        Dump::decode(&mut Buffer::from_bytes(encoded.as_slice())),
        Err(DumpError::UnknownVersion { version: 3 })
    );
}

#[test]
fn reserved_dump_flag_is_rejected() {
    let mut dump = Dump::new(DUMP_VERSION_V2);
    dump.header.flags = DumpFlags::from_bits(1 << 4);
    dump.protos.push(Proto::new());

    let encoded = dump.encode().unwrap();
    assert_eq!(
        Dump::decode(&mut Buffer::from_bytes(encoded.as_slice())),
        Err(DumpError::UnknownDumpFlags { flags: 0b1_0000 })
    );
}

#[test]
fn fr2_is_version_gated() {
    let mut dump = Dump::new(DUMP_VERSION_V2);
    dump.header.flags = DumpFlags::STRIP | DumpFlags::FR2;
    dump.protos.push(Proto::new());
    assert_eq!(roundtrip(&dump), dump);

    dump.version = DUMP_VERSION_V1;
    let encoded = dump.encode().unwrap();
    assert_eq!(
        Dump::decode(&mut Buffer::from_bytes(encoded.as_slice())),
        Err(DumpError::UnknownDumpFlags { flags: 0b1010 })
    );
}

#[test]
fn reserved_prototype_flag_is_rejected() {
    let mut pt = Proto::new();
    pt.flags = ProtoFlags::from_bits(1 << 5);
    let mut dump = Dump::new(DUMP_VERSION_V2);
    dump.header.flags = DumpFlags::STRIP;
    dump.protos.push(pt);

    let encoded = dump.encode().unwrap();
    assert_eq!(
        Dump::decode(&mut Buffer::from_bytes(encoded.as_slice())),
        Err(DumpError::UnknownPrototypeFlags { flags: 0b10_0000 })
    );
}

#[test]
fn table_constant_splits_array_and_hash_parts() {
    let table: Table = [
        (TableValue::Int(0), TableValue::Str(b"test".to_vec())),
        (TableValue::Int(1), TableValue::Nil),
        (TableValue::Str(b"index".to_vec()), TableValue::Bool(false)),
    ]
    .into_iter()
    .collect();

    let mut pt = Proto::new();
    pt.kgc = vec![Kgc::Table(table)];
    let mut dump = Dump::new(DUMP_VERSION_V2);
    dump.header.flags = DumpFlags::STRIP;
    dump.protos.push(pt);

    let encoded = dump.encode().unwrap();
    // header(5) + size(1) + proto head(7) + KGC_TAB tag(1), then the table:
    // narray == 2, nhash == 1.
    assert_eq!(encoded.as_slice()[14], 2);
    assert_eq!(encoded.as_slice()[15], 1);

    assert_eq!(roundtrip(&dump), dump);
}

#[test]
fn varnames_roundtrip_including_inline_names() {
    let mut pt = Proto::new();
    pt.varnames = vec![
        Varname {
            kind: VARNAME_FOR_INDEX,
            name: Vec::new(),
            start: 0,
            end: 5,
        },
        Varname {
            kind: b't',
            name: b"est".to_vec(),
            start: 5,
            end: 10,
        },
    ];

    let mut dump = Dump::new(DUMP_VERSION_V2);
    dump.protos.push(pt);

    let back = roundtrip(&dump);
    assert_eq!(back, dump);
    assert_eq!(back.protos[0].varnames[1].kind, b't');
    assert_eq!(back.protos[0].varnames[1].name, b"est");
}

#[test]
fn nested_prototypes_keep_structural_order() {
    let mut leaf_a = Proto::new();
    leaf_a.knum = vec![1.0];
    let mut leaf_b = Proto::new();
    leaf_b.knum = vec![2.0];
    let mut main = Proto::new();
    main.flags = ProtoFlags::HAS_CHILD | ProtoFlags::VARARG;
    // Children pop in reverse order of appearance.
    main.kgc = vec![Kgc::Child(1), Kgc::Child(0)];

    let mut dump = Dump::new(DUMP_VERSION_V2);
    dump.header.flags = DumpFlags::STRIP;
    dump.protos = vec![leaf_a, leaf_b, main];

    let back = roundtrip(&dump);
    assert_eq!(back, dump);
    assert_eq!(back.root().map(|p| p.kgc.clone()),
        Some(vec![Kgc::Child(1), Kgc::Child(0)]));
}
