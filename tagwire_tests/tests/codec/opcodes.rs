use super::{codec_with, round_trip};
use anyhow::Result;
use rand::Rng;
use tagwire_types::error::CodecError;
use tagwire_types::serde::{ByteOrder, OpcodeWidth};
use tagwire_types::types::{DynValue, FieldDescriptor, Record, Schema, SemanticKind};

fn login() -> Result<Schema> {
    let schema = Schema::builder("Login")
        .field(FieldDescriptor::new("user", SemanticKind::Text))
        .field(FieldDescriptor::new("session", SemanticKind::Qword64))
        .opcode(0x10, OpcodeWidth::Char8)
        .build()?;
    Ok(schema)
}

fn moved() -> Result<Schema> {
    let schema = Schema::builder("Moved")
        .field(FieldDescriptor::new("x", SemanticKind::Real64))
        .field(FieldDescriptor::new("y", SemanticKind::Real64))
        .opcode(0x2020, OpcodeWidth::Word16)
        .build()?;
    Ok(schema)
}

fn chat() -> Result<Schema> {
    let schema = Schema::builder("Chat")
        .field(FieldDescriptor::new("channel", SemanticKind::Char8))
        .field(FieldDescriptor::new("text", SemanticKind::Text))
        .opcode(0x3030_3030, OpcodeWidth::Dword32)
        .build()?;
    Ok(schema)
}

#[test]
fn polymorphic_stream() -> Result<()> {
    let codec = codec_with([login()?, moved()?, chat()?])?;
    let recs = [
        Record::new("Login").with("user", "neko").with("session", -1i64),
        Record::new("Moved").with("x", 1.5).with("y", -2.25),
        Record::new("Chat").with("channel", 3i8).with("text", "hello"),
        Record::new("Moved").with("x", 0.0).with("y", 0.0),
    ];

    let mut buf = vec![0u8; 1024];
    let mut w = codec.writer(&mut buf);
    for rec in recs.iter() {
        let schema = codec.registry().by_name(rec.type_name()).cloned();
        let schema = schema.ok_or_else(|| anyhow::anyhow!("{} is registered", rec.type_name()))?;
        codec.encode(rec, &schema, &mut w)?;
    }
    let w_len = w.position();

    let mut r = codec.reader(&buf[..w_len]);
    let mut decoded = vec![];
    while r.has_remaining() {
        let (type_name, rec) = codec.decode_polymorphic(&mut r)?;
        assert_eq!(type_name, rec.type_name());
        decoded.push(rec);
    }
    assert_eq!(recs.to_vec(), decoded);
    Ok(())
}

#[test]
fn opcode_widths_on_the_wire() -> Result<()> {
    let codec = codec_with([login()?, moved()?, chat()?])?;

    let bytes = codec.serialize(&Record::new("Moved").with("x", 0.0).with("y", 0.0))?;
    assert_eq!(&[0x20, 0x20], &bytes[..2]);
    assert_eq!(2 + 16, bytes.len());

    let bytes = codec.serialize(&Record::new("Chat").with("channel", 0i8).with("text", ""))?;
    assert_eq!(&[0x30, 0x30, 0x30, 0x30, 0, 0, 0], &bytes[..]);
    Ok(())
}

#[test]
fn narrow_opcode_shadows_wide() -> Result<()> {
    let narrow = Schema::builder("Narrow")
        .opcode(0x05, OpcodeWidth::Char8)
        .build()?;
    let wide = Schema::builder("Wide")
        .field(FieldDescriptor::new("v", SemanticKind::Char8))
        .opcode(0x0005, OpcodeWidth::Word16)
        .build()?;
    let codec = codec_with([narrow, wide])?;

    let bytes = codec.serialize(&Record::new("Wide").with("v", 9i8))?;
    assert_eq!(vec![0x05, 0x00, 9], bytes);

    let mut r = codec.reader(&bytes);
    let (type_name, _) = codec.decode_polymorphic(&mut r)?;
    assert_eq!("Narrow", type_name);
    assert_eq!(1, r.position());
    Ok(())
}

#[test]
fn fixed_width_determinism() -> Result<()> {
    let schema = Schema::builder("Tick")
        .field(FieldDescriptor::new("live", SemanticKind::Bool))
        .field(FieldDescriptor::new("a", SemanticKind::Char8))
        .field(FieldDescriptor::new("b", SemanticKind::Word16))
        .field(FieldDescriptor::new("c", SemanticKind::Dword32))
        .field(FieldDescriptor::new("d", SemanticKind::Qword64))
        .field(FieldDescriptor::new("e", SemanticKind::Real64))
        .opcode(0x0102_0304, OpcodeWidth::Dword32)
        .build()?;
    let codec = codec_with([schema])?;

    let mut rng = rand::thread_rng();
    for _ in 0..16 {
        let rec = Record::new("Tick")
            .with("live", rng.gen::<bool>())
            .with("a", rng.gen::<i8>())
            .with("b", rng.gen::<i16>())
            .with("c", rng.gen::<i32>())
            .with("d", rng.gen::<i64>())
            .with("e", rng.gen::<f64>());
        let (first, decoded) = round_trip(&codec, &rec)?;
        let (second, _) = round_trip(&codec, &rec)?;

        assert_eq!(4 + 1 + 1 + 2 + 4 + 8 + 8, first.len());
        assert_eq!(first, second);
        assert_eq!(rec, decoded);
    }
    Ok(())
}

#[test]
fn big_endian_codec() -> Result<()> {
    use std::sync::Arc;
    use tagwire_codec::{Caster, Codec, CodecConfig, TypeRegistry};

    let registry = TypeRegistry::builder().register(moved()?)?.build()?;
    let codec = Codec::with_config(
        Arc::new(registry),
        Arc::new(Caster::standard()),
        CodecConfig::default().with_byte_order(ByteOrder::BigEndian),
    );

    let rec = Record::new("Moved").with("x", 1.0).with("y", DynValue::F64(-1.0));
    let bytes = codec.serialize(&rec)?;
    assert_eq!(&[0x20, 0x20, 0x3f, 0xf0], &bytes[..4]);
    assert_eq!(rec, codec.deserialize(&bytes)?);

    assert!(matches!(
        codec.deserialize(&[0x20]),
        Err(CodecError::UnknownType { position: 0 })
    ));
    Ok(())
}
