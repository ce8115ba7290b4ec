// Copyright 2026 the LuaJIT Dump Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `luajit_dump`: a bidirectional codec for the LuaJIT bytecode dump format.
//!
//! The crate decodes a dump produced by LuaJIT 2.0 (format v1) or 2.1
//! (format v2) into an object graph of prototypes — header, flags,
//! instructions, constants, upvalues, and optional debug information —
//! which can be inspected, mutated, and re-encoded into bytes a conforming
//! VM accepts. Canonical input round-trips byte for byte.
//!
//! Out of scope: file I/O, disassembly, and any validation of what the
//! instructions do. Instructions are opaque 32-bit words to the codec; the
//! [`opcode`] tables exist for tooling built on top.
//!
//! ## Example
//!
//! ```
//! use luajit_dump::buffer::Buffer;
//! use luajit_dump::dump::{DUMP_VERSION_V2, Dump, DumpFlags};
//! use luajit_dump::proto::Proto;
//!
//! let mut dump = Dump::new(DUMP_VERSION_V2);
//! dump.header.flags = DumpFlags::STRIP;
//! dump.protos.push(Proto::new());
//!
//! let encoded = dump.encode()?;
//! let back = Dump::decode(&mut Buffer::from_bytes(encoded.as_slice()))?;
//! assert_eq!(back, dump);
//! # Ok::<(), luajit_dump::buffer::DumpError>(())
//! ```

#![no_std]

extern crate alloc;

pub mod buffer;
pub(crate) mod codec;
pub mod dump;
pub mod opcode;
pub mod proto;
