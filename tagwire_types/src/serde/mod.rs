//! # Wire format
//!
//! A record is encoded as its optional opcode followed by its fields, in the
//! order the schema declares them. There are no separators and no field tags;
//! the schema alone tells a reader what comes next.
//!
//! ```text
//! Record     := [Opcode]? Field*
//! Opcode     := u8 | u16 | u32          (width chosen by schema)
//! Field      := Scalar | Text | Array | Inline
//! Scalar     := u8 | u16 | u32 | u64 | f64      (per declared kind)
//! Text       := (CodeUnit* 0x0000) | (LenPrefix CodeUnit*)
//! LenPrefix  := Scalar-encoded byte-length = codeUnitCount * 2
//! Array      := [Scalar(count)]? Element*       (count omitted if fixed length)
//! Inline     := Record                          (nested, same grammar)
//! ```
//!
//! Byte order is fixed per codec instance and applies to every multi-byte
//! scalar, code unit and opcode. The default is little-endian.
//!
//! For example, a little-endian record with a 2-byte opcode `0x0102`,
//! a `Dword32` field holding 7 and a null-terminated text field holding `"hi"`:
//!
//! ```text
//! 02 01                   opcode
//! 07 00 00 00             Dword32
//! 68 00 69 00 00 00       'h' 'i' terminator
//! ```

mod cursor;
mod kind;

pub use cursor::*;
pub use kind::*;
