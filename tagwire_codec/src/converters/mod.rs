//! The per-field strategies a [`crate::Codec`] dispatches to.
//!
//! A field resolves to exactly one of them when its schema is built:
//! arrays first, then text, then inline records, then fixed-width scalars.
//! The array protocol and the inline codec recurse back into the others.

mod array;
mod inline;
mod scalar;
mod text;

pub use array::*;
pub use inline::*;
pub use scalar::*;
pub use text::*;

use crate::Codec;
use derive_more::Constructor;
use tagwire_types::error::{CodecError, CodecResult};
use tagwire_types::serde::{ByteReader, ByteWriter};
use tagwire_types::types::{DynValue, RuntimeType, ValuePlan};

/// Which field of which type is being worked on. Used in error reports.
#[derive(Constructor, Clone, Copy, Debug)]
pub struct FieldCtx<'s> {
    pub type_name: &'s str,
    pub field: &'s str,
}

impl<'s> FieldCtx<'s> {
    pub fn unsupported(&self, reason: impl Into<String>) -> CodecError {
        CodecError::unsupported(self.type_name, self.field, reason)
    }
}

pub(crate) fn write_value(
    codec: &Codec,
    w: &mut ByteWriter,
    ctx: FieldCtx,
    plan: &ValuePlan,
    value: &DynValue,
) -> CodecResult<()> {
    match plan {
        ValuePlan::Scalar { wire, natural, .. } => {
            if value.runtime_type() == *natural {
                ScalarCodec::write(w, *wire, value)
            } else {
                let value = codec.caster().cast_to(value, *natural)?;
                ScalarCodec::write(w, *wire, &value)
            }
        }
        ValuePlan::Text(spec) => match value {
            DynValue::Text(text) => TextCodec::write(w, *spec, text),
            other => Err(CodecError::MissingCoercion {
                from: other.runtime_type(),
                to: RuntimeType::Text,
            }),
        },
        ValuePlan::Inline(type_name) => InlineCodec::write(codec, w, ctx, type_name, value),
    }
}

pub(crate) fn read_value(
    codec: &Codec,
    r: &mut ByteReader,
    ctx: FieldCtx,
    plan: &ValuePlan,
) -> CodecResult<DynValue> {
    match plan {
        ValuePlan::Scalar {
            wire,
            natural,
            storage,
        } => {
            let value = ScalarCodec::read(r, *wire, *natural)?;
            codec.caster().cast(value, *natural, *storage)
        }
        ValuePlan::Text(spec) => TextCodec::read(r, *spec).map(DynValue::Text),
        ValuePlan::Inline(type_name) => InlineCodec::read(codec, r, ctx, type_name),
    }
}
