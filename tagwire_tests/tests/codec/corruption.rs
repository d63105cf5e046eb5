use super::codec_with;
use anyhow::{anyhow, Result};
use tagwire_codec::Codec;
use tagwire_types::error::CodecError;
use tagwire_types::serde::WireKind;
use tagwire_types::types::{FieldDescriptor, Record, Schema, SemanticKind, TextSpec};

fn note_codec(len_kind: WireKind) -> Result<Codec> {
    let schema = Schema::builder("Note")
        .field(
            FieldDescriptor::new("body", SemanticKind::Text)
                .with_text(TextSpec::prefixed(len_kind)),
        )
        .build()?;
    codec_with([schema])
}

fn decode_note(codec: &Codec, bytes: &[u8]) -> Result<Result<Record, CodecError>> {
    let schema = codec
        .registry()
        .by_name("Note")
        .ok_or_else(|| anyhow!("Note is registered"))?;
    let mut r = codec.reader(bytes);
    Ok(codec.decode(&mut r, schema))
}

#[test]
fn negative_qword_text_length() -> Result<()> {
    let codec = note_codec(WireKind::Qword64)?;
    let mut bytes = (-4i64).to_le_bytes().to_vec();
    bytes.extend_from_slice(&[0x41, 0, 0x42, 0]);
    assert_eq!(
        Err(CodecError::MalformedLength {
            kind: WireKind::Qword64,
            value: -4
        }),
        decode_note(&codec, &bytes)?
    );
    Ok(())
}

#[test]
fn qword_text_length_beyond_32_bits() -> Result<()> {
    let codec = note_codec(WireKind::Qword64)?;
    let bytes = (u32::MAX as u64 + 3).to_le_bytes();
    assert_eq!(
        Err(CodecError::MalformedLength {
            kind: WireKind::Qword64,
            value: u32::MAX as i128 + 3
        }),
        decode_note(&codec, &bytes)?
    );
    Ok(())
}

#[test]
fn negative_dword_array_count() -> Result<()> {
    let schema = Schema::builder("Series")
        .field(FieldDescriptor::new("vals", SemanticKind::array_of(SemanticKind::Dword32)))
        .build()?;
    let codec = codec_with([schema])?;
    let schema = codec
        .registry()
        .by_name("Series")
        .ok_or_else(|| anyhow!("Series is registered"))?;

    let bytes = (-1i32).to_le_bytes();
    let mut r = codec.reader(&bytes);
    assert_eq!(
        Err(CodecError::MalformedLength {
            kind: WireKind::Dword32,
            value: -1
        }),
        codec.decode(&mut r, schema)
    );
    Ok(())
}

#[test]
fn truncated_input() -> Result<()> {
    let codec = note_codec(WireKind::Word16)?;
    let bytes = codec.serialize(&Record::new("Note").with("body", "abc"))?;
    assert_eq!(8, bytes.len());

    let res = decode_note(&codec, &bytes[..7])?;
    assert_eq!(
        Err(CodecError::UnexpectedEof {
            position: 6,
            requested: 2,
            len: 7
        }),
        res
    );
    Ok(())
}

#[test]
fn undersized_buffer() -> Result<()> {
    let codec = note_codec(WireKind::Dword32)?;
    let schema = codec
        .registry()
        .by_name("Note")
        .ok_or_else(|| anyhow!("Note is registered"))?;

    let mut buf = [0xaau8; 6];
    let mut w = codec.writer(&mut buf);
    let res = codec.encode(&Record::new("Note").with("body", "abc"), schema, &mut w);
    assert_eq!(
        Err(CodecError::CapacityExceeded {
            position: 6,
            requested: 2,
            capacity: 6
        }),
        res
    );
    assert_eq!(&[6, 0, 0, 0, 0x61, 0], w.written());
    Ok(())
}

#[test]
fn huge_count_of_opcode_only_records() -> Result<()> {
    let marker = Schema::builder("Marker")
        .opcode(0x4d, tagwire_types::serde::OpcodeWidth::Char8)
        .build()?;
    let trail = Schema::builder("Trail")
        .field(FieldDescriptor::new(
            "marks",
            SemanticKind::array_of(SemanticKind::inline("Marker")),
        ))
        .build()?;
    let codec = codec_with([marker, trail])?;
    let schema = codec
        .registry()
        .by_name("Trail")
        .ok_or_else(|| anyhow!("Trail is registered"))?;

    let mut bytes = (i32::MAX as u32).to_le_bytes().to_vec();
    bytes.extend_from_slice(&[0x4d, 0x4d]);
    let mut r = codec.reader(&bytes);
    assert_eq!(
        Err(CodecError::UnexpectedEof {
            position: 6,
            requested: 1,
            len: 6
        }),
        codec.decode(&mut r, schema)
    );
    Ok(())
}
