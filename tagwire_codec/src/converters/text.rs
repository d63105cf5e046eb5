use crate::converters::LengthPrefix;
use std::mem;
use tagwire_types::error::{CodecError, CodecResult};
use tagwire_types::serde::{ByteReader, ByteWriter};
use tagwire_types::types::{TextSpec, Utf16Text};

/// UTF-16 code units, either followed by a `0x0000` unit or preceded by
/// their byte count.
pub struct TextCodec;

impl TextCodec {
    pub fn write(w: &mut ByteWriter, spec: TextSpec, text: &Utf16Text) -> CodecResult<()> {
        if !spec.null_terminated {
            let byte_len = u32::try_from(text.len())
                .ok()
                .and_then(|units| units.checked_mul(2))
                .ok_or(CodecError::MalformedLength {
                    kind: spec.len_kind,
                    value: text.len() as i128 * 2,
                })?;
            LengthPrefix::write(w, spec.len_kind, byte_len)?;
        }

        for unit in text.iter() {
            w.put_u16(*unit)?;
        }

        if spec.null_terminated {
            w.put_u16(0)?;
        }

        Ok(())
    }

    pub fn read(r: &mut ByteReader, spec: TextSpec) -> CodecResult<Utf16Text> {
        if spec.null_terminated {
            let mut units = vec![];
            loop {
                match r.get_u16()? {
                    0 => break,
                    unit => units.push(unit),
                }
            }
            return Ok(Utf16Text::from(units));
        }

        let byte_len = LengthPrefix::read(r, spec.len_kind)?;
        let units_ct = byte_len as usize / mem::size_of::<u16>();
        let mut units = Vec::with_capacity(units_ct.min(r.remaining() / mem::size_of::<u16>()));
        for _ in 0..units_ct {
            units.push(r.get_u16()?);
        }
        Ok(Utf16Text::from(units))
    }
}
