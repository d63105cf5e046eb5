use tagwire_types::error::{CodecError, CodecResult};
use tagwire_types::serde::{ByteReader, ByteWriter, WireKind};
use tagwire_types::types::{DynValue, RuntimeType};
use tracing::trace;

/// Fixed-width strategies. The wire kind alone picks the width.
pub struct ScalarCodec;

impl ScalarCodec {
    /// The runtime type each wire kind reads and writes.
    pub fn natural_type(kind: WireKind) -> RuntimeType {
        match kind {
            WireKind::Char8 => RuntimeType::I8,
            WireKind::Word16 => RuntimeType::I16,
            WireKind::Dword32 => RuntimeType::I32,
            WireKind::Qword64 => RuntimeType::I64,
            WireKind::Real64 => RuntimeType::F64,
        }
    }

    /// `value` must already be of the kind's natural type, or a boolean for `Char8`.
    pub fn write(w: &mut ByteWriter, kind: WireKind, value: &DynValue) -> CodecResult<()> {
        match (kind, value) {
            (WireKind::Char8, DynValue::Bool(b)) => w.put_u8(*b as u8),
            (WireKind::Char8, DynValue::I8(i)) => w.put_u8(*i as u8),
            (WireKind::Word16, DynValue::I16(i)) => w.put_u16(*i as u16),
            (WireKind::Dword32, DynValue::I32(i)) => w.put_u32(*i as u32),
            (WireKind::Qword64, DynValue::I64(i)) => w.put_u64(*i as u64),
            (WireKind::Real64, DynValue::F64(f)) => w.put_f64(*f),
            (kind, value) => Err(CodecError::MissingCoercion {
                from: value.runtime_type(),
                to: Self::natural_type(kind),
            }),
        }
    }

    /// Reads a value of `natural` type. Only `Char8` may read as a boolean;
    /// any nonzero byte is `true`.
    pub fn read(r: &mut ByteReader, kind: WireKind, natural: RuntimeType) -> CodecResult<DynValue> {
        let value = match kind {
            WireKind::Char8 if natural == RuntimeType::Bool => DynValue::Bool(r.get_u8()? != 0),
            WireKind::Char8 => DynValue::I8(r.get_u8()? as i8),
            WireKind::Word16 => DynValue::I16(r.get_u16()? as i16),
            WireKind::Dword32 => DynValue::I32(r.get_u32()? as i32),
            WireKind::Qword64 => DynValue::I64(r.get_u64()? as i64),
            WireKind::Real64 => DynValue::F64(r.get_f64()?),
        };
        Ok(value)
    }
}

/// Element counts and text byte lengths, written with one of the fixed-width
/// strategies.
///
/// Lengths live in the non-negative 32-bit signed domain whatever the width.
/// A count too wide for its kind is rejected on write. On read, a negative
/// count or one beyond the 32-bit domain is [`CodecError::MalformedLength`].
/// `Real64` counts are truncated towards zero.
pub struct LengthPrefix;

impl LengthPrefix {
    pub fn max_len(kind: WireKind) -> u32 {
        match kind {
            WireKind::Char8 => u8::MAX as u32,
            WireKind::Word16 => u16::MAX as u32,
            WireKind::Dword32 | WireKind::Qword64 | WireKind::Real64 => i32::MAX as u32,
        }
    }

    pub fn write(w: &mut ByteWriter, kind: WireKind, len: u32) -> CodecResult<()> {
        if len > Self::max_len(kind) {
            return Err(CodecError::MalformedLength {
                kind,
                value: len as i128,
            });
        }
        trace!(?kind, len, "write length prefix");
        match kind {
            WireKind::Char8 => w.put_u8(len as u8),
            WireKind::Word16 => w.put_u16(len as u16),
            WireKind::Dword32 => w.put_u32(len),
            WireKind::Qword64 => w.put_u64(len as u64),
            WireKind::Real64 => w.put_f64(len as f64),
        }
    }

    pub fn read(r: &mut ByteReader, kind: WireKind) -> CodecResult<u32> {
        let raw: i128 = match kind {
            WireKind::Char8 => r.get_u8()? as i128,
            WireKind::Word16 => r.get_u16()? as i128,
            WireKind::Dword32 => r.get_u32()? as i32 as i128,
            WireKind::Qword64 => r.get_u64()? as i64 as i128,
            WireKind::Real64 => r.get_f64()? as i64 as i128,
        };
        trace!(?kind, ?raw, "read length prefix");
        if raw < 0 || raw > i32::MAX as i128 {
            return Err(CodecError::MalformedLength { kind, value: raw });
        }
        Ok(raw as u32)
    }
}
