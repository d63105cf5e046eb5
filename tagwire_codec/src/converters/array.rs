use crate::converters::{self, FieldCtx, LengthPrefix};
use crate::Codec;
use tagwire_types::error::{CodecError, CodecResult};
use tagwire_types::serde::{ByteReader, ByteWriter};
use tagwire_types::types::{ArraySpec, DynValue, RuntimeType, ValuePlan};
use tracing::trace;

/// Element count (unless the length is fixed), then each element with the
/// element's own strategy.
pub struct ArrayCodec;

impl ArrayCodec {
    pub fn write(
        codec: &Codec,
        w: &mut ByteWriter,
        ctx: FieldCtx,
        spec: ArraySpec,
        element: &ValuePlan,
        value: &DynValue,
    ) -> CodecResult<()> {
        let items = match value {
            DynValue::List(items) => items,
            other => {
                return Err(CodecError::MissingCoercion {
                    from: other.runtime_type(),
                    to: RuntimeType::List,
                })
            }
        };

        match spec.fixed_len {
            Some(fixed_len) if items.len() != fixed_len as usize => {
                return Err(CodecError::FixedLengthMismatch {
                    type_name: ctx.type_name.to_owned(),
                    field: ctx.field.to_owned(),
                    expected: fixed_len,
                    actual: items.len(),
                });
            }
            Some(_) => {}
            None => {
                let count = u32::try_from(items.len()).map_err(|_| CodecError::MalformedLength {
                    kind: spec.size_kind,
                    value: items.len() as i128,
                })?;
                LengthPrefix::write(w, spec.size_kind, count)?;
            }
        }
        trace!(field = ctx.field, count = items.len(), "write array");

        for item in items {
            converters::write_value(codec, w, ctx, element, item)?;
        }
        Ok(())
    }

    pub fn read(
        codec: &Codec,
        r: &mut ByteReader,
        ctx: FieldCtx,
        spec: ArraySpec,
        element: &ValuePlan,
    ) -> CodecResult<DynValue> {
        let count = match spec.fixed_len {
            Some(fixed_len) => fixed_len,
            None => LengthPrefix::read(r, spec.size_kind)?,
        };
        trace!(field = ctx.field, count, "read array");

        // A corrupt count must not turn into a huge allocation up front.
        let mut items = Vec::with_capacity((count as usize).min(r.remaining()));
        for _ in 0..count {
            items.push(converters::read_value(codec, r, ctx, element)?);
        }
        Ok(DynValue::List(items))
    }
}
