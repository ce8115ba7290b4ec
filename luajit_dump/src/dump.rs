// Copyright 2026 the LuaJIT Dump Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Top-level dump model and the decode/encode entry points.

use alloc::vec::Vec;

use crate::buffer::{Buffer, DumpError};
use crate::codec;
use crate::proto::Proto;

/// The three magic bytes opening every dump: `ESC 'L' 'J'`.
pub const DUMP_MAGIC: [u8; 3] = [0x1b, b'L', b'J'];

/// Dump format version emitted by LuaJIT 2.0.
pub const DUMP_VERSION_V1: u8 = 1;
/// Dump format version emitted by LuaJIT 2.1.
pub const DUMP_VERSION_V2: u8 = 2;

/// Dump-level compatibility flags (a ULEB128 bitset after the version byte).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DumpFlags(u32);

impl core::ops::BitOr for DumpFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign for DumpFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl DumpFlags {
    /// No flags.
    pub const NONE: Self = Self(0);
    /// Big-endian bytecode payload ordering.
    pub const BE: Self = Self(1 << 0);
    /// Debug information omitted.
    pub const STRIP: Self = Self(1 << 1);
    /// Uses LuaJIT FFI cdata constants.
    pub const FFI: Self = Self(1 << 2);
    /// Two-slot frame info (v2 only).
    pub const FR2: Self = Self(1 << 3);

    /// Builds flags from a raw word, reserved bits included.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw flag word.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if this set includes all bits in `other`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// The flag bits a conforming dump of `version` may carry.
    #[must_use]
    pub const fn allowed(version: u8) -> Self {
        let mut bits = Self::BE.0 | Self::STRIP.0 | Self::FFI.0;
        if version == DUMP_VERSION_V2 {
            bits |= Self::FR2.0;
        }
        Self(bits)
    }
}

/// Dump header: flags plus the optional debug chunk name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Header {
    /// Dump-level flags.
    pub flags: DumpFlags,
    /// Chunk name byte string; present on the wire only when
    /// [`DumpFlags::STRIP`] is unset.
    pub debug_name: Vec<u8>,
}

/// A decoded bytecode dump: one compiled Lua script.
///
/// `protos` is ordered the way the wire is: children before parents, with the
/// main chunk last.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dump {
    /// Format version byte. Conforming dumps use [`DUMP_VERSION_V1`] or
    /// [`DUMP_VERSION_V2`]; other values are encodable but rejected on decode.
    pub version: u8,
    /// Dump header.
    pub header: Header,
    /// All prototypes, children before parents.
    pub protos: Vec<Proto>,
}

impl Dump {
    /// Creates an empty dump of the given format version.
    #[must_use]
    pub fn new(version: u8) -> Self {
        Self {
            version,
            header: Header::default(),
            protos: Vec::new(),
        }
    }

    /// The root prototype (the main chunk), if any.
    #[must_use]
    pub fn root(&self) -> Option<&Proto> {
        self.protos.last()
    }

    /// Decodes a dump from `buf`.
    ///
    /// Both cursors are reset before and after; on error no partial dump is
    /// exposed.
    pub fn decode(buf: &mut Buffer) -> Result<Self, DumpError> {
        codec::read_dump(buf)
    }

    /// Encodes this dump into a fresh buffer.
    ///
    /// Fails only when the in-memory model violates a debug-info invariant
    /// ([`DumpError::LineInfoMismatch`], [`DumpError::UpvalueNameMismatch`]).
    pub fn encode(&self) -> Result<Buffer, DumpError> {
        codec::write_dump(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_flags_by_version() {
        assert!(!DumpFlags::allowed(DUMP_VERSION_V1).contains(DumpFlags::FR2));
        assert!(DumpFlags::allowed(DUMP_VERSION_V2).contains(DumpFlags::FR2));
        assert!(DumpFlags::allowed(DUMP_VERSION_V1).contains(DumpFlags::BE | DumpFlags::STRIP));
    }

    #[test]
    fn root_is_the_last_prototype() {
        let mut dump = Dump::new(DUMP_VERSION_V2);
        assert!(dump.root().is_none());
        dump.protos.push(Proto::new());
        let mut main = Proto::new();
        main.numparams = 2;
        dump.protos.push(main);
        assert_eq!(dump.root().map(|p| p.numparams), Some(2));
    }
}
