//! Data model for column-oriented ATF datasets

mod schema;
mod table;
mod value;

pub use schema::Schema;
pub use table::Table;
pub use value::Value;
