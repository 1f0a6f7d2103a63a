//! Built-in lints for manifest validation.

mod empty_description;
mod enum_values;
mod foreign_key_naming;
mod missing_length;
mod table_naming;

pub use empty_description::EmptyDescriptionLint;
pub use enum_values::EnumValuesLint;
pub use foreign_key_naming::ForeignKeyNamingLint;
pub use missing_length::MissingLengthLint;
pub use table_naming::TableNamingLint;
