// Copyright 2026 the LuaJIT Dump Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The wire codec: dump driver and prototype body encode/decode.
//!
//! Dump grammar (`B` = byte, `H` = 16 bit, `W` = 32 bit, `U` = ULEB128,
//! `U0`/`U1` = tagged 33-bit ULEB128):
//!
//! ```text
//! dump   = header proto+ 0U
//! header = ESC 'L' 'J' versionB flagsU [namelenU nameB*]
//! proto  = lengthU pdata
//! pdata  = phead bcinsW* uvdataH* kgc* knum* [debugB*]
//! phead  = flagsB numparamsB framesizeB numuvB numkgcU numknU numbcU
//!          [debuglenU [firstlineU numlineU]]
//! kgc    = kgctypeU { ktab | (loU hiU) | (rloU rhiU iloU ihiU) | strB* }
//! knum   = intU0 | (loU1 hiU)
//! ktab   = narrayU nhashU karray* khash*
//! karray = ktabk
//! khash  = ktabk ktabk
//! ktabk  = ktabtypeU { intU | (loU hiU) | strB* }
//! ```
//!
//! Child prototypes precede their parent on the wire; a decode-local stack
//! of prototype indices resolves the `KGC_CHILD` references.

use alloc::vec::Vec;

use crate::buffer::{Buffer, DumpError};
use crate::dump::{DUMP_MAGIC, Dump, DumpFlags, Header};
use crate::proto::{
    Instruction, Kgc, Proto, ProtoFlags, Table, TableValue, VARNAME_END, VARNAME_MAX, Varname,
};

const KGC_CHILD: u32 = 0;
const KGC_TAB: u32 = 1;
const KGC_I64: u32 = 2;
const KGC_U64: u32 = 3;
const KGC_COMPLEX: u32 = 4;
const KGC_STR: u32 = 5;

const KTAB_NIL: u32 = 0;
const KTAB_FALSE: u32 = 1;
const KTAB_TRUE: u32 = 2;
const KTAB_INT: u32 = 3;
const KTAB_NUM: u32 = 4;
const KTAB_STR: u32 = 5;

const PROTO_FLAGS_ALLOWED: u8 = ProtoFlags::HAS_CHILD.bits()
    | ProtoFlags::VARARG.bits()
    | ProtoFlags::FFI.bits()
    | ProtoFlags::NOJIT.bits()
    | ProtoFlags::ILOOP.bits();

// ---------------------------------------------------------------------------
// Decode

pub(crate) fn read_dump(buf: &mut Buffer) -> Result<Dump, DumpError> {
    buf.reset_indices();

    let (version, header) = read_header(buf)?;
    let strip = header.flags.contains(DumpFlags::STRIP);

    let mut protos: Vec<Proto> = Vec::new();
    let mut stack: Vec<usize> = Vec::new();
    loop {
        if buf.peek_u8()? == 0 {
            buf.read_u8()?;
            break;
        }

        let size = buf.read_uleb128()?;
        if size == 0 {
            return Err(DumpError::PrototypeSizeZero);
        }

        let start = buf.iread();
        let pt = read_proto(buf, strip, &mut stack)?;
        let consumed = buf.iread() - start;
        if consumed != size as usize {
            return Err(DumpError::PrototypeSizeMismatch {
                declared: size,
                consumed: consumed as u32,
            });
        }

        stack.push(protos.len());
        protos.push(pt);
    }

    if stack.len() != 1 {
        return Err(DumpError::StackLeftover {
            remaining: stack.len(),
        });
    }
    if buf.iread() != buf.len() {
        return Err(DumpError::TrailingBytes);
    }

    buf.reset_indices();
    Ok(Dump {
        version,
        header,
        protos,
    })
}

fn read_header(buf: &mut Buffer) -> Result<(u8, Header), DumpError> {
    let magic = buf.read_bytes(DUMP_MAGIC.len())?;
    if magic != DUMP_MAGIC {
        return Err(DumpError::InvalidHeader);
    }

    let version = buf.read_u8()?;
    if version != 1 && version != 2 {
        return Err(DumpError::UnknownVersion { version });
    }

    let raw = buf.read_uleb128()?;
    if raw & !DumpFlags::allowed(version).bits() != 0 {
        return Err(DumpError::UnknownDumpFlags { flags: raw });
    }
    let flags = DumpFlags::from_bits(raw);

    let mut debug_name = Vec::new();
    if !flags.contains(DumpFlags::STRIP) {
        let len = buf.read_uleb128()?;
        debug_name = buf.read_bytes(len as usize)?.to_vec();
    }

    Ok((version, Header { flags, debug_name }))
}

fn read_proto(buf: &mut Buffer, strip: bool, stack: &mut Vec<usize>) -> Result<Proto, DumpError> {
    let flags = buf.read_u8()?;
    if flags & !PROTO_FLAGS_ALLOWED != 0 {
        return Err(DumpError::UnknownPrototypeFlags { flags });
    }

    let mut pt = Proto::new();
    pt.flags = ProtoFlags::from_bits(flags);
    pt.numparams = buf.read_u8()?;
    pt.framesize = buf.read_u8()?;
    let numuv = buf.read_u8()?;
    let numkgc = buf.read_uleb128()?;
    let numknum = buf.read_uleb128()?;
    let numins = buf.read_uleb128()?;

    let mut sizedbg = 0u32;
    if !strip {
        sizedbg = buf.read_uleb128()?;
        if sizedbg != 0 {
            pt.firstline = buf.read_uleb128()?;
            pt.numline = buf.read_uleb128()?;
        }
    }

    for _ in 0..numins {
        pt.ins.push(Instruction::from_raw(buf.read_u32()?));
    }
    pt.uv.reserve(usize::from(numuv));
    for _ in 0..numuv {
        pt.uv.push(buf.read_u16()?);
    }
    read_kgc(buf, &mut pt, numkgc, stack)?;
    read_knum(buf, &mut pt, numknum)?;

    let dbg_start = buf.iread();
    if sizedbg != 0 {
        read_lineinfo(buf, &mut pt)?;
        read_uv_names(buf, &mut pt)?;
        read_varnames(buf, &mut pt)?;
    }
    let consumed = buf.iread() - dbg_start;
    if consumed != sizedbg as usize {
        return Err(DumpError::DebugSizeMismatch {
            declared: sizedbg,
            consumed: consumed as u32,
        });
    }

    Ok(pt)
}

fn read_kgc(
    buf: &mut Buffer,
    pt: &mut Proto,
    count: u32,
    stack: &mut Vec<usize>,
) -> Result<(), DumpError> {
    for _ in 0..count {
        let tag = buf.read_uleb128()?;
        let kgc = match tag {
            KGC_CHILD => Kgc::Child(stack.pop().ok_or(DumpError::StackUnderflow)?),
            KGC_TAB => Kgc::Table(read_ktab(buf)?),
            KGC_I64 => Kgc::I64(read_u64_halves(buf)? as i64),
            KGC_U64 => Kgc::U64(read_u64_halves(buf)?),
            KGC_COMPLEX => Kgc::Complex {
                re: read_f64_halves(buf)?,
                im: read_f64_halves(buf)?,
            },
            _ => Kgc::Str(buf.read_bytes((tag - KGC_STR) as usize)?.to_vec()),
        };
        pt.kgc.push(kgc);
    }
    Ok(())
}

fn read_ktab(buf: &mut Buffer) -> Result<Table, DumpError> {
    let narray = buf.read_uleb128()?;
    let nhash = buf.read_uleb128()?;

    let mut table = Table::new();
    for i in 0..narray {
        let value = read_ktabk(buf)?;
        table.insert(TableValue::Int(i as i32), value);
    }
    for _ in 0..nhash {
        let key = read_ktabk(buf)?;
        let value = read_ktabk(buf)?;
        table.insert(key, value);
    }
    Ok(table)
}

fn read_ktabk(buf: &mut Buffer) -> Result<TableValue, DumpError> {
    let tag = buf.read_uleb128()?;
    Ok(match tag {
        KTAB_NIL => TableValue::Nil,
        KTAB_FALSE => TableValue::Bool(false),
        KTAB_TRUE => TableValue::Bool(true),
        KTAB_INT => TableValue::Int(buf.read_uleb128()? as i32),
        KTAB_NUM => TableValue::Num(read_f64_halves(buf)?),
        _ => TableValue::Str(buf.read_bytes((tag - KTAB_STR) as usize)?.to_vec()),
    })
}

fn read_knum(buf: &mut Buffer, pt: &mut Proto, count: u32) -> Result<(), DumpError> {
    for _ in 0..count {
        let is_num = buf.peek_u8()? & 1 != 0;
        let lo = buf.read_uleb128_33()?;
        let value = if is_num {
            let hi = buf.read_uleb128()?;
            f64::from_bits(u64::from(lo) | u64::from(hi) << 32)
        } else {
            f64::from(lo as i32)
        };
        pt.knum.push(value);
    }
    Ok(())
}

fn read_lineinfo(buf: &mut Buffer, pt: &mut Proto) -> Result<(), DumpError> {
    for _ in 0..pt.ins.len() {
        let delta = if pt.numline >= 1 << 16 {
            buf.read_u32()?
        } else if pt.numline >= 1 << 8 {
            u32::from(buf.read_u16()?)
        } else {
            u32::from(buf.read_u8()?)
        };
        pt.lineinfo.push(pt.firstline.wrapping_add(delta));
    }
    Ok(())
}

fn read_uv_names(buf: &mut Buffer, pt: &mut Proto) -> Result<(), DumpError> {
    for _ in 0..pt.uv.len() {
        let name = read_zero_terminated(buf)?;
        pt.uv_names.push(name);
    }
    Ok(())
}

fn read_varnames(buf: &mut Buffer, pt: &mut Proto) -> Result<(), DumpError> {
    let mut last = 0u32;
    loop {
        let kind = buf.read_u8()?;
        if kind == VARNAME_END {
            break;
        }
        let name = if kind >= VARNAME_MAX {
            read_zero_terminated(buf)?
        } else {
            Vec::new()
        };
        let start = last.wrapping_add(buf.read_uleb128()?);
        let end = start.wrapping_add(buf.read_uleb128()?);
        last = start;
        pt.varnames.push(Varname {
            kind,
            name,
            start,
            end,
        });
    }
    Ok(())
}

fn read_zero_terminated(buf: &mut Buffer) -> Result<Vec<u8>, DumpError> {
    let mut out = Vec::new();
    loop {
        let b = buf.read_u8()?;
        if b == 0 {
            break;
        }
        out.push(b);
    }
    Ok(out)
}

fn read_u64_halves(buf: &mut Buffer) -> Result<u64, DumpError> {
    let lo = buf.read_uleb128()?;
    let hi = buf.read_uleb128()?;
    Ok(u64::from(lo) | u64::from(hi) << 32)
}

fn read_f64_halves(buf: &mut Buffer) -> Result<f64, DumpError> {
    Ok(f64::from_bits(read_u64_halves(buf)?))
}

// ---------------------------------------------------------------------------
// Encode

pub(crate) fn write_dump(dump: &Dump) -> Result<Buffer, DumpError> {
    let mut buf = Buffer::new();
    write_header(&mut buf, dump);

    let strip = dump.header.flags.contains(DumpFlags::STRIP);
    for pt in &dump.protos {
        write_proto(&mut buf, pt, strip)?;
    }
    buf.write_u8(0);

    buf.reset_indices();
    Ok(buf)
}

fn write_header(buf: &mut Buffer, dump: &Dump) {
    buf.write_bytes(&DUMP_MAGIC);
    buf.write_u8(dump.version);
    buf.write_uleb128(dump.header.flags.bits());

    if !dump.header.flags.contains(DumpFlags::STRIP) {
        buf.write_uleb128(dump.header.debug_name.len() as u32);
        buf.write_bytes(&dump.header.debug_name);
    }
}

/// Encodes one prototype body into a scratch buffer, then emits its size
/// prefix and the body. The debug block is built first so its exact length
/// is known when the head is written.
fn write_proto(buf: &mut Buffer, pt: &Proto, strip: bool) -> Result<(), DumpError> {
    let mut debug = Buffer::new();
    if !strip {
        write_lineinfo(&mut debug, pt)?;
        write_uv_names(&mut debug, pt)?;
        write_varnames(&mut debug, pt);
    }

    let mut body = Buffer::new();
    body.write_u8(pt.flags.bits());
    body.write_u8(pt.numparams);
    body.write_u8(pt.framesize);
    body.write_u8(pt.uv.len() as u8);
    body.write_uleb128(pt.kgc.len() as u32);
    body.write_uleb128(pt.knum.len() as u32);
    body.write_uleb128(pt.ins.len() as u32);

    if !strip {
        let sizedbg = debug.len() as u32;
        body.write_uleb128(sizedbg);
        if sizedbg != 0 {
            body.write_uleb128(pt.firstline);
            body.write_uleb128(pt.numline);
        }
    }

    for ins in &pt.ins {
        body.write_u32(ins.raw());
    }
    for &uv in &pt.uv {
        body.write_u16(uv);
    }
    write_kgc(&mut body, pt);
    write_knum(&mut body, pt);

    if !debug.is_empty() {
        body.write_buffer(&debug);
    }

    buf.write_uleb128(body.len() as u32);
    buf.write_buffer(&body);
    Ok(())
}

fn write_kgc(buf: &mut Buffer, pt: &Proto) {
    for kgc in &pt.kgc {
        match kgc {
            Kgc::Child(_) => buf.write_uleb128(KGC_CHILD),
            Kgc::Table(table) => {
                buf.write_uleb128(KGC_TAB);
                write_ktab(buf, table);
            }
            Kgc::I64(v) => {
                buf.write_uleb128(KGC_I64);
                write_u64_halves(buf, *v as u64);
            }
            Kgc::U64(v) => {
                buf.write_uleb128(KGC_U64);
                write_u64_halves(buf, *v);
            }
            Kgc::Complex { re, im } => {
                buf.write_uleb128(KGC_COMPLEX);
                write_f64_halves(buf, *re);
                write_f64_halves(buf, *im);
            }
            Kgc::Str(s) => {
                buf.write_uleb128(KGC_STR + s.len() as u32);
                buf.write_bytes(s);
            }
        }
    }
}

fn write_ktab(buf: &mut Buffer, table: &Table) {
    let narray = table.array_len();
    let nhash = table.len() as u32 - narray;
    buf.write_uleb128(narray);
    buf.write_uleb128(nhash);

    let nil = TableValue::Nil;
    for i in 0..narray {
        write_ktabk(buf, table.get(&TableValue::Int(i as i32)).unwrap_or(&nil));
    }
    for (key, value) in table.iter() {
        let in_array = matches!(key, TableValue::Int(i) if *i >= 0 && (*i as u32) < narray);
        if in_array {
            continue;
        }
        write_ktabk(buf, key);
        write_ktabk(buf, value);
    }
}

fn write_ktabk(buf: &mut Buffer, value: &TableValue) {
    match value {
        TableValue::Nil => buf.write_uleb128(KTAB_NIL),
        TableValue::Bool(false) => buf.write_uleb128(KTAB_FALSE),
        TableValue::Bool(true) => buf.write_uleb128(KTAB_TRUE),
        TableValue::Int(v) => {
            buf.write_uleb128(KTAB_INT);
            buf.write_uleb128(*v as u32);
        }
        TableValue::Num(v) => {
            buf.write_uleb128(KTAB_NUM);
            write_f64_halves(buf, *v);
        }
        TableValue::Str(s) => {
            buf.write_uleb128(KTAB_STR + s.len() as u32);
            buf.write_bytes(s);
        }
    }
}

fn write_knum(buf: &mut Buffer, pt: &Proto) {
    for &value in &pt.knum {
        let int = value as i32;
        if f64::from(int) == value {
            buf.write_uleb128_33(int as u32, false);
        } else {
            let bits = value.to_bits();
            buf.write_uleb128_33(bits as u32, true);
            buf.write_uleb128((bits >> 32) as u32);
        }
    }
}

fn write_lineinfo(buf: &mut Buffer, pt: &Proto) -> Result<(), DumpError> {
    if pt.lineinfo.len() != pt.ins.len() {
        return Err(DumpError::LineInfoMismatch {
            lineinfo: pt.lineinfo.len(),
            ins: pt.ins.len(),
        });
    }
    for &line in &pt.lineinfo {
        let delta = line.wrapping_sub(pt.firstline);
        if pt.numline >= 1 << 16 {
            buf.write_u32(delta);
        } else if pt.numline >= 1 << 8 {
            buf.write_u16(delta as u16);
        } else {
            buf.write_u8(delta as u8);
        }
    }
    Ok(())
}

fn write_uv_names(buf: &mut Buffer, pt: &Proto) -> Result<(), DumpError> {
    if pt.uv_names.len() != pt.uv.len() {
        return Err(DumpError::UpvalueNameMismatch {
            names: pt.uv_names.len(),
            uv: pt.uv.len(),
        });
    }
    for name in &pt.uv_names {
        buf.write_bytes(name);
        buf.write_u8(0);
    }
    Ok(())
}

fn write_varnames(buf: &mut Buffer, pt: &Proto) {
    let mut last = 0u32;
    for vn in &pt.varnames {
        buf.write_u8(vn.kind);
        if vn.kind >= VARNAME_MAX {
            buf.write_bytes(&vn.name);
            buf.write_u8(0);
        }
        buf.write_uleb128(vn.start.wrapping_sub(last));
        buf.write_uleb128(vn.end.wrapping_sub(vn.start));
        last = vn.start;
    }
    buf.write_u8(VARNAME_END);
}

fn write_u64_halves(buf: &mut Buffer, value: u64) {
    buf.write_uleb128(value as u32);
    buf.write_uleb128((value >> 32) as u32);
}

fn write_f64_halves(buf: &mut Buffer, value: f64) {
    write_u64_halves(buf, value.to_bits());
}
