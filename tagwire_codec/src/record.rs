use crate::converters::{self, ArrayCodec, FieldCtx};
use crate::{Caster, CodecConfig, TypeRegistry};
use std::sync::Arc;
use tagwire_types::error::{CodecError, CodecResult};
use tagwire_types::serde::{ByteReader, ByteWriter, OpcodeWidth};
use tagwire_types::types::{DynValue, FieldPlan, OpcodeEntry, Record, Schema};
use tracing::debug;

/// Encodes and decodes records field by field, according to their schemas.
///
/// A codec only reads its registry and caster, so one instance may be shared
/// by any number of concurrent calls. Cursors are per call.
#[derive(Clone)]
pub struct Codec {
    config: CodecConfig,
    registry: Arc<TypeRegistry>,
    caster: Arc<Caster>,
}

impl Codec {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self::with_config(registry, Arc::new(Caster::standard()), CodecConfig::default())
    }

    pub fn with_config(registry: Arc<TypeRegistry>, caster: Arc<Caster>, config: CodecConfig) -> Self {
        Self {
            config,
            registry,
            caster,
        }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }
    pub fn caster(&self) -> &Caster {
        &self.caster
    }

    pub fn writer<'a>(&self, buf: &'a mut [u8]) -> ByteWriter<'a> {
        ByteWriter::new(buf, self.config.byte_order)
    }
    pub fn reader<'a>(&self, buf: &'a [u8]) -> ByteReader<'a> {
        ByteReader::new(buf, self.config.byte_order)
    }

    /// Writes the schema's opcode, if any, then every non-transient field in
    /// declaration order.
    ///
    /// On failure, bytes written so far remain in the buffer.
    pub fn encode(&self, rec: &Record, schema: &Schema, w: &mut ByteWriter) -> CodecResult<()> {
        if let Some(OpcodeEntry { value, width }) = schema.opcode() {
            debug!(type_name = schema.name(), value, ?width, "write opcode");
            match width {
                OpcodeWidth::Char8 => w.put_u8(value as u8)?,
                OpcodeWidth::Word16 => w.put_u16(value as u16)?,
                OpcodeWidth::Dword32 => w.put_u32(value)?,
            }
        }

        for (desc, plan) in schema.planned_fields() {
            let ctx = FieldCtx::new(schema.name(), desc.name());
            match plan {
                FieldPlan::Transient => {
                    debug!(type_name = ctx.type_name, field = ctx.field, "skip transient field");
                }
                FieldPlan::Single(value_plan) => {
                    let value = field_value(rec, ctx)?;
                    debug!(type_name = ctx.type_name, field = ctx.field, ?plan, "encode field");
                    converters::write_value(self, w, ctx, value_plan, value)?;
                }
                FieldPlan::Array { spec, element } => {
                    let value = field_value(rec, ctx)?;
                    debug!(type_name = ctx.type_name, field = ctx.field, ?plan, "encode field");
                    ArrayCodec::write(self, w, ctx, *spec, element, value)?;
                }
            }
        }
        Ok(())
    }

    /// Decodes a record whose type is already known. The schema's opcode, if
    /// any, must be present and is consumed; no probing happens.
    pub fn decode(&self, r: &mut ByteReader, schema: &Schema) -> CodecResult<Record> {
        if let Some(OpcodeEntry { value, width }) = schema.opcode() {
            let found = match width {
                OpcodeWidth::Char8 => r.get_u8()? as u32,
                OpcodeWidth::Word16 => r.get_u16()? as u32,
                OpcodeWidth::Dword32 => r.get_u32()?,
            };
            if found != value {
                return Err(CodecError::OpcodeMismatch {
                    type_name: schema.name().to_owned(),
                    width,
                    expected: value,
                    found,
                });
            }
        }

        let mut rec = schema.zeroed();
        for (desc, plan) in schema.planned_fields() {
            let ctx = FieldCtx::new(schema.name(), desc.name());
            let value = match plan {
                FieldPlan::Transient => {
                    debug!(type_name = ctx.type_name, field = ctx.field, "skip transient field");
                    continue;
                }
                FieldPlan::Single(value_plan) => converters::read_value(self, r, ctx, value_plan)?,
                FieldPlan::Array { spec, element } => ArrayCodec::read(self, r, ctx, *spec, element)?,
            };
            debug!(type_name = ctx.type_name, field = ctx.field, ?plan, "decoded field");
            rec.set(desc.name(), value);
        }
        Ok(rec)
    }

    /// Decodes a record of whichever registered type the leading opcode names.
    pub fn decode_polymorphic(&self, r: &mut ByteReader) -> CodecResult<(String, Record)> {
        let schema = self
            .registry
            .probe(r)
            .ok_or(CodecError::UnknownType {
                position: r.position(),
            })?;
        let rec = self.decode(r, schema)?;
        Ok((schema.name().to_owned(), rec))
    }

    /// Encodes into a fresh buffer of the configured default size and returns
    /// the written prefix.
    pub fn serialize(&self, rec: &Record) -> CodecResult<Vec<u8>> {
        let schema = self
            .registry
            .by_name(rec.type_name())
            .ok_or_else(|| CodecError::UnregisteredType(rec.type_name().to_owned()))?;

        let mut buf = vec![0u8; self.config.default_buffer_size];
        let mut w = self.writer(&mut buf);
        self.encode(rec, schema, &mut w)?;
        let w_len = w.position();
        buf.truncate(w_len);
        Ok(buf)
    }

    pub fn deserialize(&self, bytes: &[u8]) -> CodecResult<Record> {
        let mut r = self.reader(bytes);
        let (_, rec) = self.decode_polymorphic(&mut r)?;
        Ok(rec)
    }
}

fn field_value<'r>(rec: &'r Record, ctx: FieldCtx) -> CodecResult<&'r DynValue> {
    rec.get(ctx.field).ok_or_else(|| CodecError::MissingField {
        type_name: ctx.type_name.to_owned(),
        field: ctx.field.to_owned(),
    })
}
