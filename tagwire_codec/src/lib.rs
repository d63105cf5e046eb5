//! Schema-driven binary record codec.
//!
//! A [`Codec`] encodes [`Record`]s into fixed-capacity byte regions and back,
//! one field at a time, following the [`FieldPlan`] each field was resolved to
//! when its [`Schema`] was built. Types carrying an opcode can be decoded
//! without knowing them in advance, through [`Codec::decode_polymorphic`].
//!
//! [`Record`]: tagwire_types::types::Record
//! [`FieldPlan`]: tagwire_types::types::FieldPlan
//! [`Schema`]: tagwire_types::types::Schema

mod caster;
mod config;
pub mod converters;
mod record;
mod registry;

pub use caster::*;
pub use config::*;
pub use record::*;
pub use registry::*;
