use itertools::Itertools;
use std::collections::HashMap;
use tagwire_types::error::{CodecError, CodecResult};
use tagwire_types::types::{DynValue, RuntimeType};

/// `None` means the value is not of the rule's source type.
pub type CastFn = fn(DynValue) -> Option<DynValue>;

/// The coercion matrix: one conversion per (source, destination) pair of
/// runtime types.
///
/// The standard rule set covers every pair of distinct scalar types with
/// two's-complement truncation and no overflow checks. Text, records and lists
/// have no rules.
pub struct Caster {
    rules: HashMap<(RuntimeType, RuntimeType), CastFn>,
}

impl Caster {
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    pub fn standard() -> Self {
        let mut caster = Self::empty();
        for (from, to) in RuntimeType::SCALARS
            .iter()
            .cartesian_product(RuntimeType::SCALARS.iter())
            .filter(|(from, to)| from != to)
        {
            if let Some(cast_fn) = scalar_target(*to) {
                caster.register(*from, *to, cast_fn);
            }
        }
        caster
    }

    pub fn register(&mut self, from: RuntimeType, to: RuntimeType, cast_fn: CastFn) {
        self.rules.insert((from, to), cast_fn);
    }

    pub fn has_rule(&self, from: RuntimeType, to: RuntimeType) -> bool {
        from == to || self.rules.contains_key(&(from, to))
    }

    /// Identical types pass through untouched.
    pub fn cast(&self, value: DynValue, from: RuntimeType, to: RuntimeType) -> CodecResult<DynValue> {
        if from == to {
            return Ok(value);
        }
        self.rules
            .get(&(from, to))
            .and_then(|cast_fn| cast_fn(value))
            .ok_or(CodecError::MissingCoercion { from, to })
    }

    /// Casts a borrowed value, cloning it only if a rule applies.
    pub fn cast_to(&self, value: &DynValue, to: RuntimeType) -> CodecResult<DynValue> {
        let from = value.runtime_type();
        if !self.has_rule(from, to) {
            return Err(CodecError::MissingCoercion { from, to });
        }
        self.cast(value.clone(), from, to)
    }
}

impl Default for Caster {
    fn default() -> Self {
        Self::standard()
    }
}

enum Num {
    Int(i64),
    Real(f64),
}

fn num(value: DynValue) -> Option<Num> {
    let num = match value {
        DynValue::Bool(b) => Num::Int(b as i64),
        DynValue::Char(c) => Num::Int(c as i64),
        DynValue::I8(i) => Num::Int(i as i64),
        DynValue::I16(i) => Num::Int(i as i64),
        DynValue::I32(i) => Num::Int(i as i64),
        DynValue::I64(i) => Num::Int(i),
        DynValue::F32(f) => Num::Real(f as f64),
        DynValue::F64(f) => Num::Real(f),
        DynValue::Text(_) | DynValue::Record(_) | DynValue::List(_) => return None,
    };
    Some(num)
}

/// Narrowing from a real goes through a 32-bit integer first.
fn int_bits(value: DynValue) -> Option<i64> {
    let bits = match num(value)? {
        Num::Int(i) => i,
        Num::Real(f) => f as i32 as i64,
    };
    Some(bits)
}

fn scalar_target(to: RuntimeType) -> Option<CastFn> {
    let cast_fn: CastFn = match to {
        RuntimeType::Bool => |v| int_bits(v).map(|i| DynValue::Bool(i != 0)),
        RuntimeType::Char => |v| int_bits(v).map(|i| DynValue::Char(i as u16)),
        RuntimeType::I8 => |v| int_bits(v).map(|i| DynValue::I8(i as i8)),
        RuntimeType::I16 => |v| int_bits(v).map(|i| DynValue::I16(i as i16)),
        RuntimeType::I32 => |v| int_bits(v).map(|i| DynValue::I32(i as i32)),
        RuntimeType::I64 => |v| {
            num(v).map(|n| match n {
                Num::Int(i) => DynValue::I64(i),
                Num::Real(f) => DynValue::I64(f as i64),
            })
        },
        RuntimeType::F32 => |v| {
            num(v).map(|n| match n {
                Num::Int(i) => DynValue::F32(i as f32),
                Num::Real(f) => DynValue::F32(f as f32),
            })
        },
        RuntimeType::F64 => |v| {
            num(v).map(|n| match n {
                Num::Int(i) => DynValue::F64(i as f64),
                Num::Real(f) => DynValue::F64(f),
            })
        },
        RuntimeType::Text | RuntimeType::Record | RuntimeType::List => return None,
    };
    Some(cast_fn)
}
