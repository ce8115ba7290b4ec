// Copyright 2026 the LuaJIT Dump Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static opcode reference tables for LuaJIT 2.0 (v1) and 2.1 (v2).
//!
//! The opcode byte of an [`crate::proto::Instruction`] indexes these tables.
//! They attribute operand semantics for tooling built on top of the codec;
//! the codec itself never consults them and serializes instructions as
//! opaque 32-bit words.

/// Operand mode of one instruction slot. ORDER BCMode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OperandMode {
    /// Unused slot.
    None,
    /// Destination register.
    Dst,
    /// Base register of a range.
    Base,
    /// Variable register.
    Var,
    /// Base register of a range, read/write.
    Rbase,
    /// Upvalue index (mode A must stay `<= 7`).
    Uv,
    /// Unsigned literal.
    Lit,
    /// Signed literal.
    Lits,
    /// Primitive type literal (nil/false/true).
    Pri,
    /// Numeric constant index.
    Num,
    /// String constant index.
    Str,
    /// Table constant index.
    Tab,
    /// Child prototype index.
    Func,
    /// Jump target.
    Jump,
    /// FFI cdata constant index.
    Cdata,
}

/// Name and operand modes of one opcode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OpcodeInfo {
    /// Mnemonic.
    pub name: &'static str,
    /// Mode of the `A` operand.
    pub a: OperandMode,
    /// Mode of the `B` operand (`None` for AD-format opcodes).
    pub b: OperandMode,
    /// Mode of the `C`/`D` operand.
    pub c: OperandMode,
}

const fn op(name: &'static str, a: OperandMode, b: OperandMode, c: OperandMode) -> OpcodeInfo {
    OpcodeInfo { name, a, b, c }
}

use OperandMode as M;

/// Returns the opcode table for a dump format version, if known.
#[must_use]
pub fn opcodes(version: u8) -> Option<&'static [OpcodeInfo]> {
    match version {
        1 => Some(OPCODES_V1),
        2 => Some(OPCODES_V2),
        _ => None,
    }
}

/// Opcode table of LuaJIT 2.0 bytecode (dump version 1).
pub static OPCODES_V1: &[OpcodeInfo] = &[
    // Comparison ops. ORDER OPR.
    op("ISLT", M::Var, M::None, M::Var),
    op("ISGE", M::Var, M::None, M::Var),
    op("ISLE", M::Var, M::None, M::Var),
    op("ISGT", M::Var, M::None, M::Var),
    op("ISEQV", M::Var, M::None, M::Var),
    op("ISNEV", M::Var, M::None, M::Var),
    op("ISEQS", M::Var, M::None, M::Str),
    op("ISNES", M::Var, M::None, M::Str),
    op("ISEQN", M::Var, M::None, M::Num),
    op("ISNEN", M::Var, M::None, M::Num),
    op("ISEQP", M::Var, M::None, M::Pri),
    op("ISNEP", M::Var, M::None, M::Pri),
    // Unary test and copy ops.
    op("ISTC", M::Dst, M::None, M::Var),
    op("ISFC", M::Dst, M::None, M::Var),
    op("IST", M::None, M::None, M::Var),
    op("ISF", M::None, M::None, M::Var),
    // Unary ops.
    op("MOV", M::Dst, M::None, M::Var),
    op("NOT", M::Dst, M::None, M::Var),
    op("UNM", M::Dst, M::None, M::Var),
    op("LEN", M::Dst, M::None, M::Var),
    // Binary ops. ORDER OPR. VV last, POW must be next.
    op("ADDVN", M::Dst, M::Var, M::Num),
    op("SUBVN", M::Dst, M::Var, M::Num),
    op("MULVN", M::Dst, M::Var, M::Num),
    op("DIVVN", M::Dst, M::Var, M::Num),
    op("MODVN", M::Dst, M::Var, M::Num),
    op("ADDNV", M::Dst, M::Var, M::Num),
    op("SUBNV", M::Dst, M::Var, M::Num),
    op("MULNV", M::Dst, M::Var, M::Num),
    op("DIVNV", M::Dst, M::Var, M::Num),
    op("MODNV", M::Dst, M::Var, M::Num),
    op("ADDVV", M::Dst, M::Var, M::Var),
    op("SUBVV", M::Dst, M::Var, M::Var),
    op("MULVV", M::Dst, M::Var, M::Var),
    op("DIVVV", M::Dst, M::Var, M::Var),
    op("MODVV", M::Dst, M::Var, M::Var),
    op("POW", M::Dst, M::Var, M::Var),
    op("CAT", M::Dst, M::Rbase, M::Rbase),
    // Constant ops.
    op("KSTR", M::Dst, M::None, M::Str),
    op("KCDATA", M::Dst, M::None, M::Cdata),
    op("KSHORT", M::Dst, M::None, M::Lits),
    op("KNUM", M::Dst, M::None, M::Num),
    op("KPRI", M::Dst, M::None, M::Pri),
    op("KNIL", M::Base, M::None, M::Base),
    // Upvalue and function ops.
    op("UGET", M::Dst, M::None, M::Uv),
    op("USETV", M::Uv, M::None, M::Var),
    op("USETS", M::Uv, M::None, M::Str),
    op("USETN", M::Uv, M::None, M::Num),
    op("USETP", M::Uv, M::None, M::Pri),
    op("UCLO", M::Rbase, M::None, M::Jump),
    op("FNEW", M::Dst, M::None, M::Func),
    // Table ops.
    op("TNEW", M::Dst, M::None, M::Lit),
    op("TDUP", M::Dst, M::None, M::Tab),
    op("GGET", M::Dst, M::None, M::Str),
    op("GSET", M::Var, M::None, M::Str),
    op("TGETV", M::Dst, M::Var, M::Var),
    op("TGETS", M::Dst, M::Var, M::Str),
    op("TGETB", M::Dst, M::Var, M::Lit),
    op("TSETV", M::Var, M::Var, M::Var),
    op("TSETS", M::Var, M::Var, M::Str),
    op("TSETB", M::Var, M::Var, M::Lit),
    op("TSETM", M::Base, M::None, M::Num),
    // Calls and vararg handling. T = tail call.
    op("CALLM", M::Base, M::Lit, M::Lit),
    op("CALL", M::Base, M::Lit, M::Lit),
    op("CALLMT", M::Base, M::None, M::Lit),
    op("CALLT", M::Base, M::None, M::Lit),
    op("ITERC", M::Base, M::Lit, M::Lit),
    op("ITERN", M::Base, M::Lit, M::Lit),
    op("VARG", M::Base, M::Lit, M::Lit),
    op("ISNEXT", M::Base, M::None, M::Jump),
    // Returns.
    op("RETM", M::Base, M::None, M::Lit),
    op("RET", M::Rbase, M::None, M::Lit),
    op("RET0", M::Rbase, M::None, M::Lit),
    op("RET1", M::Rbase, M::None, M::Lit),
    // Loops and branches. I/J = interp/JIT, I/C/L = init/call/loop.
    op("FORI", M::Base, M::None, M::Jump),
    op("JFORI", M::Base, M::None, M::Jump),
    op("FORL", M::Base, M::None, M::Jump),
    op("IFORL", M::Base, M::None, M::Jump),
    op("JFORL", M::Base, M::None, M::Lit),
    op("ITERL", M::Base, M::None, M::Jump),
    op("IITERL", M::Base, M::None, M::Jump),
    op("JITERL", M::Base, M::None, M::Lit),
    op("LOOP", M::Rbase, M::None, M::Jump),
    op("ILOOP", M::Rbase, M::None, M::Jump),
    op("JLOOP", M::Rbase, M::None, M::Lit),
    op("JMP", M::Rbase, M::None, M::Jump),
    // Function headers. I/J = interp/JIT, F/V/C = fixarg/vararg/C func.
    op("FUNCF", M::Rbase, M::None, M::None),
    op("IFUNCF", M::Rbase, M::None, M::None),
    op("JFUNCF", M::Rbase, M::None, M::Lit),
    op("FUNCV", M::Rbase, M::None, M::None),
    op("IFUNCV", M::Rbase, M::None, M::None),
    op("JFUNCV", M::Rbase, M::None, M::Lit),
    op("FUNCC", M::Rbase, M::None, M::None),
    op("FUNCCW", M::Rbase, M::None, M::None),
];

/// Opcode table of LuaJIT 2.1 bytecode (dump version 2).
pub static OPCODES_V2: &[OpcodeInfo] = &[
    // Comparison ops. ORDER OPR.
    op("ISLT", M::Var, M::None, M::Var),
    op("ISGE", M::Var, M::None, M::Var),
    op("ISLE", M::Var, M::None, M::Var),
    op("ISGT", M::Var, M::None, M::Var),
    op("ISEQV", M::Var, M::None, M::Var),
    op("ISNEV", M::Var, M::None, M::Var),
    op("ISEQS", M::Var, M::None, M::Str),
    op("ISNES", M::Var, M::None, M::Str),
    op("ISEQN", M::Var, M::None, M::Num),
    op("ISNEN", M::Var, M::None, M::Num),
    op("ISEQP", M::Var, M::None, M::Pri),
    op("ISNEP", M::Var, M::None, M::Pri),
    // Unary test and copy ops.
    op("ISTC", M::Dst, M::None, M::Var),
    op("ISFC", M::Dst, M::None, M::Var),
    op("IST", M::None, M::None, M::Var),
    op("ISF", M::None, M::None, M::Var),
    op("ISTYPE", M::Var, M::None, M::Lit),
    op("ISNUM", M::Var, M::None, M::Lit),
    // Unary ops.
    op("MOV", M::Dst, M::None, M::Var),
    op("NOT", M::Dst, M::None, M::Var),
    op("UNM", M::Dst, M::None, M::Var),
    op("LEN", M::Dst, M::None, M::Var),
    // Binary ops. ORDER OPR. VV last, POW must be next.
    op("ADDVN", M::Dst, M::Var, M::Num),
    op("SUBVN", M::Dst, M::Var, M::Num),
    op("MULVN", M::Dst, M::Var, M::Num),
    op("DIVVN", M::Dst, M::Var, M::Num),
    op("MODVN", M::Dst, M::Var, M::Num),
    op("ADDNV", M::Dst, M::Var, M::Num),
    op("SUBNV", M::Dst, M::Var, M::Num),
    op("MULNV", M::Dst, M::Var, M::Num),
    op("DIVNV", M::Dst, M::Var, M::Num),
    op("MODNV", M::Dst, M::Var, M::Num),
    op("ADDVV", M::Dst, M::Var, M::Var),
    op("SUBVV", M::Dst, M::Var, M::Var),
    op("MULVV", M::Dst, M::Var, M::Var),
    op("DIVVV", M::Dst, M::Var, M::Var),
    op("MODVV", M::Dst, M::Var, M::Var),
    op("POW", M::Dst, M::Var, M::Var),
    op("CAT", M::Dst, M::Rbase, M::Rbase),
    // Constant ops.
    op("KSTR", M::Dst, M::None, M::Str),
    op("KCDATA", M::Dst, M::None, M::Cdata),
    op("KSHORT", M::Dst, M::None, M::Lits),
    op("KNUM", M::Dst, M::None, M::Num),
    op("KPRI", M::Dst, M::None, M::Pri),
    op("KNIL", M::Base, M::None, M::Base),
    // Upvalue and function ops.
    op("UGET", M::Dst, M::None, M::Uv),
    op("USETV", M::Uv, M::None, M::Var),
    op("USETS", M::Uv, M::None, M::Str),
    op("USETN", M::Uv, M::None, M::Num),
    op("USETP", M::Uv, M::None, M::Pri),
    op("UCLO", M::Rbase, M::None, M::Jump),
    op("FNEW", M::Dst, M::None, M::Func),
    // Table ops.
    op("TNEW", M::Dst, M::None, M::Lit),
    op("TDUP", M::Dst, M::None, M::Tab),
    op("GGET", M::Dst, M::None, M::Str),
    op("GSET", M::Var, M::None, M::Str),
    op("TGETV", M::Dst, M::Var, M::Var),
    op("TGETS", M::Dst, M::Var, M::Str),
    op("TGETB", M::Dst, M::Var, M::Lit),
    op("TGETR", M::Dst, M::Var, M::Var),
    op("TSETV", M::Var, M::Var, M::Var),
    op("TSETS", M::Var, M::Var, M::Str),
    op("TSETB", M::Var, M::Var, M::Lit),
    op("TSETM", M::Base, M::None, M::Num),
    op("TSETR", M::Var, M::Var, M::Var),
    // Calls and vararg handling. T = tail call.
    op("CALLM", M::Base, M::Lit, M::Lit),
    op("CALL", M::Base, M::Lit, M::Lit),
    op("CALLMT", M::Base, M::None, M::Lit),
    op("CALLT", M::Base, M::None, M::Lit),
    op("ITERC", M::Base, M::Lit, M::Lit),
    op("ITERN", M::Base, M::Lit, M::Lit),
    op("VARG", M::Base, M::Lit, M::Lit),
    op("ISNEXT", M::Base, M::None, M::Jump),
    // Returns.
    op("RETM", M::Base, M::None, M::Lit),
    op("RET", M::Rbase, M::None, M::Lit),
    op("RET0", M::Rbase, M::None, M::Lit),
    op("RET1", M::Rbase, M::None, M::Lit),
    // Loops and branches. I/J = interp/JIT, I/C/L = init/call/loop.
    op("FORI", M::Base, M::None, M::Jump),
    op("JFORI", M::Base, M::None, M::Jump),
    op("FORL", M::Base, M::None, M::Jump),
    op("IFORL", M::Base, M::None, M::Jump),
    op("JFORL", M::Base, M::None, M::Lit),
    op("ITERL", M::Base, M::None, M::Jump),
    op("IITERL", M::Base, M::None, M::Jump),
    op("JITERL", M::Base, M::None, M::Lit),
    op("LOOP", M::Rbase, M::None, M::Jump),
    op("ILOOP", M::Rbase, M::None, M::Jump),
    op("JLOOP", M::Rbase, M::None, M::Lit),
    op("JMP", M::Rbase, M::None, M::Jump),
    // Function headers. I/J = interp/JIT, F/V/C = fixarg/vararg/C func.
    op("FUNCF", M::Rbase, M::None, M::None),
    op("IFUNCF", M::Rbase, M::None, M::None),
    op("JFUNCF", M::Rbase, M::None, M::Lit),
    op("FUNCV", M::Rbase, M::None, M::None),
    op("IFUNCV", M::Rbase, M::None, M::None),
    op("JFUNCV", M::Rbase, M::None, M::Lit),
    op("FUNCC", M::Rbase, M::None, M::None),
    op("FUNCCW", M::Rbase, M::None, M::None),
];
