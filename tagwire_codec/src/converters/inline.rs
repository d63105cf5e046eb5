use crate::converters::FieldCtx;
use crate::Codec;
use tagwire_types::error::{CodecError, CodecResult};
use tagwire_types::serde::{ByteReader, ByteWriter};
use tagwire_types::types::{DynValue, RuntimeType};

/// A nested record, encoded in place with its own schema.
///
/// The nested schema's opcode, if any, is written and consumed like at the
/// top level. No probing happens here since the field names its type.
pub struct InlineCodec;

impl InlineCodec {
    pub fn write(
        codec: &Codec,
        w: &mut ByteWriter,
        ctx: FieldCtx,
        type_name: &str,
        value: &DynValue,
    ) -> CodecResult<()> {
        let schema = codec
            .registry()
            .by_name(type_name)
            .ok_or_else(|| ctx.unsupported(format!("inline type {type_name} is not registered")))?;
        match value {
            DynValue::Record(rec) => codec.encode(rec, schema, w),
            other => Err(CodecError::MissingCoercion {
                from: other.runtime_type(),
                to: RuntimeType::Record,
            }),
        }
    }

    pub fn read(
        codec: &Codec,
        r: &mut ByteReader,
        ctx: FieldCtx,
        type_name: &str,
    ) -> CodecResult<DynValue> {
        let schema = codec
            .registry()
            .by_name(type_name)
            .ok_or_else(|| ctx.unsupported(format!("inline type {type_name} is not registered")))?;
        codec.decode(r, schema).map(DynValue::Record)
    }
}
