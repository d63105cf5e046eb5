mod schema;
mod value;

pub use schema::*;
pub use value::*;
