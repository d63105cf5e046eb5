use std::collections::HashMap;
use std::sync::Arc;
use tagwire_types::error::{CodecError, CodecResult};
use tagwire_types::serde::{ByteReader, OpcodeWidth};
use tagwire_types::types::{FieldPlan, OpcodeEntry, Schema, ValuePlan};
use tracing::debug;

/// Collects schemas before any codec call runs.
#[derive(Default)]
pub struct TypeRegistryBuilder {
    schemas: HashMap<String, Arc<Schema>>,
    opcodes: HashMap<OpcodeWidth, HashMap<u32, String>>,
}

impl TypeRegistryBuilder {
    pub fn register(mut self, schema: Schema) -> CodecResult<Self> {
        if self.schemas.contains_key(schema.name()) {
            return Err(CodecError::DuplicateType(schema.name().to_owned()));
        }

        if let Some(OpcodeEntry { value, width }) = schema.opcode() {
            let space = self.opcodes.entry(width).or_default();
            if let Some(existing) = space.get(&value) {
                return Err(CodecError::OpcodeCollision {
                    width,
                    value,
                    existing_type: existing.clone(),
                    new_type: schema.name().to_owned(),
                });
            }
            space.insert(value, schema.name().to_owned());
        }

        self.schemas
            .insert(schema.name().to_owned(), Arc::new(schema));
        Ok(self)
    }

    /// Seals the registry. Every inline reference must name a registered type,
    /// and no array may hold elements that encode to no bytes: their count
    /// would be the only thing on the wire, with nothing to bound it on decode.
    pub fn build(self) -> CodecResult<TypeRegistry> {
        for schema in self.schemas.values() {
            for (desc, plan) in schema.planned_fields() {
                match plan.inline_ref() {
                    Some(name) if !self.schemas.contains_key(name) => {
                        return Err(CodecError::unsupported(
                            schema.name(),
                            desc.name(),
                            format!("inline type {name} is not registered"),
                        ));
                    }
                    _ => {}
                }
            }
        }

        for schema in self.schemas.values() {
            for (desc, plan) in schema.planned_fields() {
                if let FieldPlan::Array {
                    element: ValuePlan::Inline(name),
                    ..
                } = plan
                {
                    if self.encodes_to_nothing(name, &mut vec![]) {
                        return Err(CodecError::unsupported(
                            schema.name(),
                            desc.name(),
                            format!("elements of type {name} encode to no bytes"),
                        ));
                    }
                }
            }
        }

        Ok(TypeRegistry {
            schemas: self.schemas,
            opcodes: self.opcodes,
        })
    }

    /// A type that reaches itself again through inline fields never counts as
    /// empty.
    fn encodes_to_nothing<'a>(&'a self, type_name: &'a str, visiting: &mut Vec<&'a str>) -> bool {
        let Some(schema) = self.schemas.get(type_name) else {
            return false;
        };
        if schema.opcode().is_some() || visiting.contains(&type_name) {
            return false;
        }

        visiting.push(type_name);
        let empty = schema.planned_fields().all(|(_, plan)| match plan {
            FieldPlan::Transient => true,
            FieldPlan::Single(ValuePlan::Inline(name)) => self.encodes_to_nothing(name, visiting),
            FieldPlan::Single(_) => false,
            FieldPlan::Array { spec, .. } => spec.fixed_len == Some(0),
        });
        visiting.pop();
        empty
    }
}

/// Schemas by name, and by opcode within each opcode width.
///
/// Read-only once built.
pub struct TypeRegistry {
    schemas: HashMap<String, Arc<Schema>>,
    opcodes: HashMap<OpcodeWidth, HashMap<u32, String>>,
}

impl TypeRegistry {
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::default()
    }

    pub fn by_name(&self, type_name: &str) -> Option<&Arc<Schema>> {
        self.schemas.get(type_name)
    }

    pub fn by_opcode(&self, width: OpcodeWidth, value: u32) -> Option<&Arc<Schema>> {
        let type_name = self.opcodes.get(&width)?.get(&value)?;
        self.schemas.get(type_name)
    }

    /// Looks at the leading bytes without consuming them: 1 byte first, then 2,
    /// then 4. The first width whose opcode space holds the peeked value wins,
    /// so a narrow opcode shadows any wider one sharing its leading bytes.
    /// Too few remaining bytes for a width count as no match at that width.
    pub fn probe(&self, r: &ByteReader) -> Option<&Arc<Schema>> {
        for width in OpcodeWidth::PROBE_ORDER {
            let peeked = match width {
                OpcodeWidth::Char8 => r.peek_u8().map(u32::from),
                OpcodeWidth::Word16 => r.peek_u16().map(u32::from),
                OpcodeWidth::Dword32 => r.peek_u32(),
            };
            let Some(value) = peeked else {
                continue;
            };
            if let Some(schema) = self.by_opcode(width, value) {
                debug!(
                    position = r.position(),
                    ?width,
                    value,
                    type_name = schema.name(),
                    "probe resolved"
                );
                return Some(schema);
            }
        }
        debug!(position = r.position(), "probe found no opcode");
        None
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Schema>> {
        self.schemas.values()
    }
}
