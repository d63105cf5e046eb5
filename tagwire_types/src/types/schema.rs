use crate::error::{CodecError, CodecResult};
use crate::serde::{OpcodeWidth, WireKind};
use crate::types::{DynValue, Record, RuntimeType};
use derive_more::Constructor;
use std::collections::HashSet;

/// The declared wire-level type of a field.
#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub enum SemanticKind {
    Bool,
    Char8,
    Word16,
    Dword32,
    Qword64,
    Real64,
    Text,
    /// A nested record, named by its registered type name.
    Inline(String),
    ArrayOf(Box<SemanticKind>),
}

impl SemanticKind {
    pub fn inline(type_name: &str) -> Self {
        SemanticKind::Inline(type_name.to_owned())
    }
    pub fn array_of(element: SemanticKind) -> Self {
        SemanticKind::ArrayOf(Box::new(element))
    }

    /// The wire encoding of a scalar kind. Booleans travel as `Char8`.
    pub fn wire_kind(&self) -> Option<WireKind> {
        match self {
            SemanticKind::Bool | SemanticKind::Char8 => Some(WireKind::Char8),
            SemanticKind::Word16 => Some(WireKind::Word16),
            SemanticKind::Dword32 => Some(WireKind::Dword32),
            SemanticKind::Qword64 => Some(WireKind::Qword64),
            SemanticKind::Real64 => Some(WireKind::Real64),
            SemanticKind::Text | SemanticKind::Inline(_) | SemanticKind::ArrayOf(_) => None,
        }
    }

    /// The runtime type a value of this kind has when nobody asks for another.
    pub fn natural_type(&self) -> RuntimeType {
        match self {
            SemanticKind::Bool => RuntimeType::Bool,
            SemanticKind::Char8 => RuntimeType::I8,
            SemanticKind::Word16 => RuntimeType::I16,
            SemanticKind::Dword32 => RuntimeType::I32,
            SemanticKind::Qword64 => RuntimeType::I64,
            SemanticKind::Real64 => RuntimeType::F64,
            SemanticKind::Text => RuntimeType::Text,
            SemanticKind::Inline(_) => RuntimeType::Record,
            SemanticKind::ArrayOf(_) => RuntimeType::List,
        }
    }

    /// The kind a field of storage type `rt` gets when its descriptor names none.
    pub fn natural_for(rt: RuntimeType) -> Option<SemanticKind> {
        match rt {
            RuntimeType::Bool => Some(SemanticKind::Bool),
            RuntimeType::I8 => Some(SemanticKind::Char8),
            RuntimeType::I16 | RuntimeType::Char => Some(SemanticKind::Word16),
            RuntimeType::I32 => Some(SemanticKind::Dword32),
            RuntimeType::I64 => Some(SemanticKind::Qword64),
            RuntimeType::F32 | RuntimeType::F64 => Some(SemanticKind::Real64),
            RuntimeType::Text => Some(SemanticKind::Text),
            RuntimeType::Record | RuntimeType::List => None,
        }
    }
}

impl From<WireKind> for SemanticKind {
    fn from(kind: WireKind) -> Self {
        match kind {
            WireKind::Char8 => SemanticKind::Char8,
            WireKind::Word16 => SemanticKind::Word16,
            WireKind::Dword32 => SemanticKind::Dword32,
            WireKind::Qword64 => SemanticKind::Qword64,
            WireKind::Real64 => SemanticKind::Real64,
        }
    }
}

/// How an array field states its element count.
///
/// With `fixed_len` set, no count is written and both sides trust the schema.
#[derive(Constructor, PartialEq, Eq, Clone, Copy, Debug)]
pub struct ArraySpec {
    pub size_kind: WireKind,
    pub fixed_len: Option<u32>,
}

impl ArraySpec {
    pub fn prefixed(size_kind: WireKind) -> Self {
        Self::new(size_kind, None)
    }
    pub fn fixed(len: u32) -> Self {
        Self::new(WireKind::Dword32, Some(len))
    }
}

impl Default for ArraySpec {
    fn default() -> Self {
        Self::prefixed(WireKind::Dword32)
    }
}

/// How a text field delimits itself. `len_kind` is ignored for
/// null-terminated text.
#[derive(Constructor, PartialEq, Eq, Clone, Copy, Debug)]
pub struct TextSpec {
    pub null_terminated: bool,
    pub len_kind: WireKind,
}

impl TextSpec {
    pub fn null_terminated() -> Self {
        Self::new(true, WireKind::Dword32)
    }
    pub fn prefixed(len_kind: WireKind) -> Self {
        Self::new(false, len_kind)
    }
}

impl Default for TextSpec {
    fn default() -> Self {
        Self::null_terminated()
    }
}

#[derive(Constructor, PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct OpcodeEntry {
    pub value: u32,
    pub width: OpcodeWidth,
}

#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    name: String,
    kind: Option<SemanticKind>,
    storage: Option<RuntimeType>,
    array: Option<ArraySpec>,
    text: Option<TextSpec>,
    transient: bool,
}

impl FieldDescriptor {
    pub fn new(name: &str, kind: SemanticKind) -> Self {
        Self {
            name: name.to_owned(),
            kind: Some(kind),
            storage: None,
            array: None,
            text: None,
            transient: false,
        }
    }

    /// A field whose kind follows from its storage type.
    pub fn natural(name: &str, storage: RuntimeType) -> Self {
        Self {
            name: name.to_owned(),
            kind: SemanticKind::natural_for(storage),
            storage: Some(storage),
            array: None,
            text: None,
            transient: false,
        }
    }

    /// For arrays, this is the storage type of each element.
    pub fn with_storage(mut self, storage: RuntimeType) -> Self {
        self.storage = Some(storage);
        self
    }
    pub fn with_array(mut self, spec: ArraySpec) -> Self {
        self.array = Some(spec);
        self
    }
    pub fn with_text(mut self, spec: TextSpec) -> Self {
        self.text = Some(spec);
        self
    }
    pub fn transient(mut self) -> Self {
        self.transient = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn kind(&self) -> Option<&SemanticKind> {
        self.kind.as_ref()
    }
    pub fn is_transient(&self) -> bool {
        self.transient
    }

    /// The runtime type the whole field holds.
    pub fn field_type(&self) -> RuntimeType {
        match (&self.kind, self.storage) {
            (Some(SemanticKind::ArrayOf(_)), _) => RuntimeType::List,
            (_, Some(storage)) => storage,
            (Some(kind), None) => kind.natural_type(),
            (None, None) => RuntimeType::Record,
        }
    }
}

/// The encoding of one value: a whole non-array field, or one array element.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum ValuePlan {
    Scalar {
        wire: WireKind,
        /// What the wire strategy reads and writes.
        natural: RuntimeType,
        /// What the record holds.
        storage: RuntimeType,
    },
    Text(TextSpec),
    Inline(String),
}

/// The strategy a field was resolved to when its schema was built.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum FieldPlan {
    Transient,
    Single(ValuePlan),
    Array {
        spec: ArraySpec,
        element: ValuePlan,
    },
}

impl FieldPlan {
    /// The nested type this field (or each of its elements) is encoded as.
    pub fn inline_ref(&self) -> Option<&str> {
        match self {
            FieldPlan::Single(ValuePlan::Inline(name))
            | FieldPlan::Array {
                element: ValuePlan::Inline(name),
                ..
            } => Some(name.as_str()),
            _ => None,
        }
    }
}

/// An ordered list of field descriptors, each resolved to a [`FieldPlan`],
/// plus an optional opcode identifying the record type on the wire.
#[derive(Clone, Debug)]
pub struct Schema {
    name: String,
    fields: Vec<FieldDescriptor>,
    plans: Vec<FieldPlan>,
    opcode: Option<OpcodeEntry>,
}

impl Schema {
    pub fn builder(name: &str) -> SchemaBuilder {
        SchemaBuilder {
            name: name.to_owned(),
            fields: vec![],
            opcode: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn opcode(&self) -> Option<OpcodeEntry> {
        self.opcode
    }
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }
    pub fn planned_fields(&self) -> impl Iterator<Item = (&FieldDescriptor, &FieldPlan)> {
        self.fields.iter().zip(self.plans.iter())
    }

    /// Names of the schemas this one nests.
    pub fn inline_refs(&self) -> impl Iterator<Item = &str> {
        self.plans.iter().filter_map(FieldPlan::inline_ref)
    }

    /// A record of this type with every field at its zero value.
    pub fn zeroed(&self) -> Record {
        let mut rec = Record::new(&self.name);
        for (desc, plan) in self.planned_fields() {
            let zero = match plan {
                FieldPlan::Single(ValuePlan::Inline(name)) => DynValue::Record(Record::new(name)),
                _ => DynValue::zero(desc.field_type()),
            };
            rec.set(desc.name(), zero);
        }
        rec
    }
}

pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
    opcode: Option<OpcodeEntry>,
}

impl SchemaBuilder {
    pub fn field(mut self, desc: FieldDescriptor) -> Self {
        self.fields.push(desc);
        self
    }

    pub fn opcode(mut self, value: u32, width: OpcodeWidth) -> Self {
        self.opcode = Some(OpcodeEntry::new(value, width));
        self
    }

    /// Resolves every field to exactly one strategy.
    pub fn build(self) -> CodecResult<Schema> {
        let mut seen = HashSet::new();
        let mut plans = Vec::with_capacity(self.fields.len());
        for desc in self.fields.iter() {
            if !seen.insert(desc.name()) {
                return Err(CodecError::unsupported(
                    &self.name,
                    desc.name(),
                    "declared twice",
                ));
            }
            plans.push(plan_field(&self.name, desc)?);
        }

        if let Some(OpcodeEntry { value, width }) = self.opcode {
            if width.truncate(value) != value {
                return Err(CodecError::unsupported(
                    &self.name,
                    "<opcode>",
                    format!("opcode {value} does not fit in {width:?}"),
                ));
            }
        }

        Ok(Schema {
            name: self.name,
            fields: self.fields,
            plans,
            opcode: self.opcode,
        })
    }
}

fn plan_field(type_name: &str, desc: &FieldDescriptor) -> CodecResult<FieldPlan> {
    let unsupported = |reason: String| CodecError::unsupported(type_name, desc.name(), reason);

    let kind = match (&desc.kind, desc.storage) {
        (Some(kind), _) => kind,
        (None, Some(storage)) => {
            return Err(unsupported(format!("no kind is implied by {storage:?}")))
        }
        (None, None) => return Err(unsupported(String::from("no kind"))),
    };

    if desc.transient {
        return Ok(FieldPlan::Transient);
    }

    if desc.text.is_some() && !is_text_like(kind) {
        return Err(unsupported(format!("text spec on {kind:?}")));
    }

    match kind {
        SemanticKind::ArrayOf(element) => {
            if let SemanticKind::ArrayOf(_) = **element {
                return Err(unsupported(String::from("nested arrays")));
            }
            let spec = desc.array.unwrap_or_default();
            let element = plan_value(desc, element).map_err(unsupported)?;
            Ok(FieldPlan::Array { spec, element })
        }
        _ if desc.array.is_some() => Err(unsupported(format!("array spec on {kind:?}"))),
        _ => {
            let plan = plan_value(desc, kind).map_err(unsupported)?;
            Ok(FieldPlan::Single(plan))
        }
    }
}

fn is_text_like(kind: &SemanticKind) -> bool {
    match kind {
        SemanticKind::Text => true,
        SemanticKind::ArrayOf(element) => is_text_like(element),
        _ => false,
    }
}

fn plan_value(desc: &FieldDescriptor, kind: &SemanticKind) -> Result<ValuePlan, String> {
    let storage = desc.storage.unwrap_or_else(|| kind.natural_type());
    match kind {
        SemanticKind::Text if storage == RuntimeType::Text => {
            Ok(ValuePlan::Text(desc.text.unwrap_or_default()))
        }
        SemanticKind::Inline(name) if storage == RuntimeType::Record => {
            Ok(ValuePlan::Inline(name.clone()))
        }
        SemanticKind::Text | SemanticKind::Inline(_) => {
            Err(format!("{kind:?} cannot be stored as {storage:?}"))
        }
        SemanticKind::ArrayOf(_) => Err(String::from("nested arrays")),
        _ => match kind.wire_kind() {
            Some(wire) if storage.is_scalar() => Ok(ValuePlan::Scalar {
                wire,
                natural: kind.natural_type(),
                storage,
            }),
            _ => Err(format!("{kind:?} cannot be stored as {storage:?}")),
        },
    }
}
