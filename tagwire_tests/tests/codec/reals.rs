use super::{codec_with, round_trip};
use anyhow::Result;
use rand::Rng;
use tagwire_types::serde::WireKind;
use tagwire_types::types::{ArraySpec, DynValue, FieldDescriptor, Record, Schema, SemanticKind};

/// `f64` equality hides the sign of zero and never holds for NaN.
fn bits(value: Option<&DynValue>) -> Vec<u64> {
    match value {
        Some(DynValue::F64(f)) => vec![f.to_bits()],
        Some(DynValue::List(items)) => items.iter().flat_map(|item| bits(Some(item))).collect(),
        _ => vec![],
    }
}

#[test]
fn reals_keep_their_bits() -> Result<()> {
    let schema = Schema::builder("Sample")
        .field(FieldDescriptor::new("one", SemanticKind::Real64))
        .field(
            FieldDescriptor::new("many", SemanticKind::array_of(SemanticKind::Real64))
                .with_array(ArraySpec::prefixed(WireKind::Word16)),
        )
        .build()?;
    let codec = codec_with([schema])?;

    let mut rng = rand::thread_rng();
    let payload_nan = f64::from_bits(0x7ff8_0000_0000_beef);
    let specials = [
        -0.0,
        0.0,
        payload_nan,
        -f64::NAN,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::MIN_POSITIVE / 2.0,
        rng.gen::<f64>() * -1e300,
    ];

    for one in specials {
        let many = specials.iter().map(|f| DynValue::F64(*f)).collect::<Vec<_>>();
        let rec = Record::new("Sample").with("one", one).with("many", many);
        let (bytes, decoded) = round_trip(&codec, &rec)?;

        assert_eq!(8 + 2 + 8 * specials.len(), bytes.len());
        assert_eq!(vec![one.to_bits()], bits(decoded.get("one")));
        assert_eq!(
            specials.iter().map(|f| f.to_bits()).collect::<Vec<_>>(),
            bits(decoded.get("many"))
        );
    }

    let rec = Record::new("Sample")
        .with("one", -0.0)
        .with("many", DynValue::List(vec![]));
    let bytes = codec.serialize(&rec)?;
    assert_eq!(&(-0.0f64).to_le_bytes(), &bytes[..8]);
    Ok(())
}
