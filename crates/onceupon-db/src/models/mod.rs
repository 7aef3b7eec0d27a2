//! Database models.

mod value;

pub use value::StoredValue;
