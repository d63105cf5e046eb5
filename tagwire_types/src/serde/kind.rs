use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};
use std::mem;

/// The five fixed-width encodings. The kind alone decides how many bytes a
/// value occupies, regardless of how wide the value is in memory.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum WireKind {
    Char8,
    Word16,
    Dword32,
    Qword64,
    Real64,
}

impl WireKind {
    pub const ALL: [WireKind; 5] = [
        WireKind::Char8,
        WireKind::Word16,
        WireKind::Dword32,
        WireKind::Qword64,
        WireKind::Real64,
    ];

    pub fn width(self) -> usize {
        match self {
            WireKind::Char8 => mem::size_of::<u8>(),
            WireKind::Word16 => mem::size_of::<u16>(),
            WireKind::Dword32 => mem::size_of::<u32>(),
            WireKind::Qword64 => mem::size_of::<u64>(),
            WireKind::Real64 => mem::size_of::<f64>(),
        }
    }
}

/// Width of a type opcode. The discriminant is the byte width.
///
/// Opcodes of different widths live in independent numeric spaces.
#[repr(u8)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, FromPrimitive, ToPrimitive, Debug)]
pub enum OpcodeWidth {
    Char8 = 1,
    Word16 = 2,
    Dword32 = 4,
}

impl OpcodeWidth {
    /// Narrowest first. This is the order in which a reader probes.
    pub const PROBE_ORDER: [OpcodeWidth; 3] =
        [OpcodeWidth::Char8, OpcodeWidth::Word16, OpcodeWidth::Dword32];

    pub fn from_byte_width(byte_width: u8) -> Option<Self> {
        OpcodeWidth::from_u8(byte_width)
    }

    pub fn byte_width(self) -> usize {
        self.to_usize().unwrap_or(0)
    }

    pub fn wire_kind(self) -> WireKind {
        match self {
            OpcodeWidth::Char8 => WireKind::Char8,
            OpcodeWidth::Word16 => WireKind::Word16,
            OpcodeWidth::Dword32 => WireKind::Dword32,
        }
    }

    /// Reduces `value` to the bits this width can hold.
    pub fn truncate(self, value: u32) -> u32 {
        match self {
            OpcodeWidth::Char8 => value & 0xff,
            OpcodeWidth::Word16 => value & 0xffff,
            OpcodeWidth::Dword32 => value,
        }
    }
}

#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug)]
pub enum ByteOrder {
    #[default]
    LittleEndian,
    BigEndian,
}
