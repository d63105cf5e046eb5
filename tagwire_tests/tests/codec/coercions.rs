use super::{codec_with, round_trip};
use anyhow::Result;
use itertools::Itertools;
use tagwire_codec::Caster;
use tagwire_types::error::CodecError;
use tagwire_types::types::{DynValue, FieldDescriptor, Record, RuntimeType, Schema, SemanticKind};

#[test]
fn matrix_covers_scalar_pairs_only() {
    let caster = Caster::standard();
    for (from, to) in RuntimeType::SCALARS
        .iter()
        .cartesian_product(RuntimeType::SCALARS.iter())
    {
        assert!(caster.has_rule(*from, *to), "{from:?} -> {to:?}");
    }
    for rt in RuntimeType::SCALARS {
        assert!(!caster.has_rule(rt, RuntimeType::Text));
        assert!(!caster.has_rule(RuntimeType::Text, rt));
    }
}

#[test]
fn bool_int_char() -> Result<()> {
    let caster = Caster::standard();
    for to in [RuntimeType::I8, RuntimeType::I16, RuntimeType::I32, RuntimeType::I64] {
        let one = caster.cast(DynValue::Bool(true), RuntimeType::Bool, to)?;
        assert_eq!(DynValue::zero(to), caster.cast_to(&DynValue::Bool(false), to)?);
        assert_eq!(DynValue::Bool(true), caster.cast_to(&one, RuntimeType::Bool)?);
        assert_eq!(
            DynValue::Bool(false),
            caster.cast_to(&DynValue::zero(to), RuntimeType::Bool)?
        );
    }
    assert_eq!(
        DynValue::I32(65),
        caster.cast(DynValue::Char(u16::from(b'A')), RuntimeType::Char, RuntimeType::I32)?
    );
    assert_eq!(
        DynValue::Char(1),
        caster.cast_to(&DynValue::Bool(true), RuntimeType::Char)?
    );
    assert_eq!(
        Err(CodecError::MissingCoercion {
            from: RuntimeType::Text,
            to: RuntimeType::I32
        }),
        caster.cast_to(&DynValue::text("65"), RuntimeType::I32)
    );
    Ok(())
}

#[test]
fn values_meet_declared_kinds() -> Result<()> {
    let schema = Schema::builder("Loose")
        .field(FieldDescriptor::new("flag", SemanticKind::Bool))
        .field(FieldDescriptor::new("word", SemanticKind::Dword32))
        .field(FieldDescriptor::new("real", SemanticKind::Real64))
        .build()?;
    let codec = codec_with([schema])?;

    let rec = Record::new("Loose")
        .with("flag", 7i32)
        .with("word", 0x1_0000_0005i64)
        .with("real", 'A' as u16);
    let (bytes, decoded) = round_trip(&codec, &rec)?;

    let mut exp_bytes = vec![1, 5, 0, 0, 0];
    exp_bytes.extend_from_slice(&65f64.to_le_bytes());
    assert_eq!(exp_bytes, bytes);

    let exp = Record::new("Loose")
        .with("flag", true)
        .with("word", 5i32)
        .with("real", 65f64);
    assert_eq!(exp, decoded);
    Ok(())
}

#[test]
fn text_fields_take_text_only() -> Result<()> {
    let schema = Schema::builder("Named")
        .field(FieldDescriptor::new("name", SemanticKind::Text))
        .build()?;
    let codec = codec_with([schema])?;

    let res = codec.serialize(&Record::new("Named").with("name", 12i32));
    assert_eq!(
        Err(CodecError::MissingCoercion {
            from: RuntimeType::I32,
            to: RuntimeType::Text
        }),
        res
    );
    Ok(())
}
