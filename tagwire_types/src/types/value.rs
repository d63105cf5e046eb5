use derive_more::{Deref, DerefMut, From};

/// Host-side storage type of a value, independent of how it goes on the wire.
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy, Debug)]
pub enum RuntimeType {
    Bool,
    /// One UTF-16 code unit.
    Char,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Text,
    Record,
    List,
}

impl RuntimeType {
    pub const SCALARS: [RuntimeType; 8] = [
        RuntimeType::Bool,
        RuntimeType::Char,
        RuntimeType::I8,
        RuntimeType::I16,
        RuntimeType::I32,
        RuntimeType::I64,
        RuntimeType::F32,
        RuntimeType::F64,
    ];

    pub fn is_scalar(self) -> bool {
        Self::SCALARS.contains(&self)
    }
}

/// Text as UTF-16 code units. Unpaired surrogates are kept as they are.
#[derive(From, Deref, DerefMut, PartialEq, Eq, Hash, Clone, Default, Debug)]
pub struct Utf16Text(Vec<u16>);

impl Utf16Text {
    pub fn into_units(self) -> Vec<u16> {
        self.0
    }
    pub fn to_string_lossy(&self) -> String {
        String::from_utf16_lossy(&self.0)
    }
}

impl From<&str> for Utf16Text {
    fn from(s: &str) -> Self {
        Self(s.encode_utf16().collect())
    }
}

#[derive(From, PartialEq, Clone, Debug)]
pub enum DynValue {
    Bool(bool),
    Char(u16),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Text(Utf16Text),
    Record(Record),
    List(Vec<DynValue>),
}

impl DynValue {
    pub fn runtime_type(&self) -> RuntimeType {
        match self {
            DynValue::Bool(_) => RuntimeType::Bool,
            DynValue::Char(_) => RuntimeType::Char,
            DynValue::I8(_) => RuntimeType::I8,
            DynValue::I16(_) => RuntimeType::I16,
            DynValue::I32(_) => RuntimeType::I32,
            DynValue::I64(_) => RuntimeType::I64,
            DynValue::F32(_) => RuntimeType::F32,
            DynValue::F64(_) => RuntimeType::F64,
            DynValue::Text(_) => RuntimeType::Text,
            DynValue::Record(_) => RuntimeType::Record,
            DynValue::List(_) => RuntimeType::List,
        }
    }

    /// The value a freshly constructed field of this type holds.
    /// A zero record is an anonymous record with no fields.
    pub fn zero(rt: RuntimeType) -> Self {
        match rt {
            RuntimeType::Bool => DynValue::Bool(false),
            RuntimeType::Char => DynValue::Char(0),
            RuntimeType::I8 => DynValue::I8(0),
            RuntimeType::I16 => DynValue::I16(0),
            RuntimeType::I32 => DynValue::I32(0),
            RuntimeType::I64 => DynValue::I64(0),
            RuntimeType::F32 => DynValue::F32(0.0),
            RuntimeType::F64 => DynValue::F64(0.0),
            RuntimeType::Text => DynValue::Text(Utf16Text::default()),
            RuntimeType::Record => DynValue::Record(Record::default()),
            RuntimeType::List => DynValue::List(vec![]),
        }
    }

    pub fn text(s: &str) -> Self {
        DynValue::Text(Utf16Text::from(s))
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            DynValue::Record(rec) => Some(rec),
            _ => None,
        }
    }
    pub fn as_list(&self) -> Option<&[DynValue]> {
        match self {
            DynValue::List(items) => Some(items),
            _ => None,
        }
    }
}

/// A structured value: a type name and named field values.
///
/// Records built by a decoder list their fields in schema declaration order.
/// Equality ignores field order.
#[derive(Clone, Default, Debug)]
pub struct Record {
    type_name: String,
    fields: Vec<(String, DynValue)>,
}

impl Record {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: vec![],
        }
    }

    pub fn with(mut self, name: &str, value: impl Into<DynValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<DynValue>) {
        let value = value.into();
        match self.get_mut(name) {
            Some(slot) => *slot = value,
            None => self.fields.push((name.to_owned(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&DynValue> {
        self.fields
            .iter()
            .find(|(field_name, _)| field_name == name)
            .map(|(_, value)| value)
    }
    pub fn get_mut(&mut self, name: &str) -> Option<&mut DynValue> {
        self.fields
            .iter_mut()
            .find(|(field_name, _)| field_name == name)
            .map(|(_, value)| value)
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }
    pub fn fields(&self) -> impl Iterator<Item = (&str, &DynValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
    pub fn len(&self) -> usize {
        self.fields.len()
    }
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Record) -> bool {
        self.type_name == other.type_name
            && self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .all(|(name, value)| other.get(name) == Some(value))
    }
}

impl From<&str> for DynValue {
    fn from(s: &str) -> Self {
        DynValue::text(s)
    }
}
