//! Column-level IR.

use serde::Serialize;
use thiserror::Error;

/// Default string column length.
pub const DEFAULT_STRING_LENGTH: u32 = 255;
/// Default decimal precision.
pub const DEFAULT_PRECISION: u32 = 10;
/// Default decimal scale.
pub const DEFAULT_SCALE: u32 = 2;

/// A lowered field with every default resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldIR {
    /// Column name.
    pub name: String,
    /// Human label for forms and tables.
    pub label: String,
    /// Semantic kind with its storage arguments.
    pub kind: FieldKind,
    pub required: bool,
    pub nullable: bool,
    pub unique: bool,
    pub unsigned: bool,
    pub index: bool,
    pub default: Option<DefaultValue>,
}

impl FieldIR {
    /// Foreign key target, when this is a foreign key column.
    pub fn foreign_key(&self) -> Option<&ForeignKeyIR> {
        match &self.kind {
            FieldKind::ForeignId(fk) => Some(fk),
            _ => None,
        }
    }

    /// Enum values, when this is an enum column.
    pub fn enum_values(&self) -> Option<&EnumValues> {
        match &self.kind {
            FieldKind::Enum(values) => Some(values),
            _ => None,
        }
    }
}

/// Closed set of semantic field kinds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "args", rename_all = "snake_case")]
pub enum FieldKind {
    String { length: u32 },
    Char { length: u32 },
    Text,
    MediumText,
    LongText,
    Integer,
    BigInteger,
    SmallInteger,
    TinyInteger,
    Decimal { precision: u32, scale: u32 },
    Float,
    Double,
    Boolean,
    Date,
    DateTime,
    Timestamp,
    Time,
    Year,
    Json,
    Enum(EnumValues),
    ForeignId(ForeignKeyIR),
    Uuid,
    File,
    Image,
    RichText,
    Email,
    Url,
    Password,
    Color,
    Slug,
}

impl FieldKind {
    /// Canonical token for the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::String { .. } => "string",
            FieldKind::Char { .. } => "char",
            FieldKind::Text => "text",
            FieldKind::MediumText => "medium_text",
            FieldKind::LongText => "long_text",
            FieldKind::Integer => "integer",
            FieldKind::BigInteger => "big_integer",
            FieldKind::SmallInteger => "small_integer",
            FieldKind::TinyInteger => "tiny_integer",
            FieldKind::Decimal { .. } => "decimal",
            FieldKind::Float => "float",
            FieldKind::Double => "double",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
            FieldKind::DateTime => "datetime",
            FieldKind::Timestamp => "timestamp",
            FieldKind::Time => "time",
            FieldKind::Year => "year",
            FieldKind::Json => "json",
            FieldKind::Enum(_) => "enum",
            FieldKind::ForeignId(_) => "foreign_id",
            FieldKind::Uuid => "uuid",
            FieldKind::File => "file",
            FieldKind::Image => "image",
            FieldKind::RichText => "rich_text",
            FieldKind::Email => "email",
            FieldKind::Url => "url",
            FieldKind::Password => "password",
            FieldKind::Color => "color",
            FieldKind::Slug => "slug",
        }
    }

    /// Whether values of this kind are whole numbers.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            FieldKind::Integer
                | FieldKind::BigInteger
                | FieldKind::SmallInteger
                | FieldKind::TinyInteger
                | FieldKind::Year
        )
    }

    /// Whether values of this kind are numbers.
    pub fn is_numeric(&self) -> bool {
        self.is_integer()
            || matches!(
                self,
                FieldKind::Decimal { .. } | FieldKind::Float | FieldKind::Double
            )
    }

    /// Maximum character length for string-backed kinds.
    pub fn max_length(&self) -> Option<u32> {
        match self {
            FieldKind::String { length } | FieldKind::Char { length } => Some(*length),
            FieldKind::Email
            | FieldKind::Url
            | FieldKind::Password
            | FieldKind::Slug
            | FieldKind::File
            | FieldKind::Image => Some(DEFAULT_STRING_LENGTH),
            FieldKind::Color => Some(7),
            _ => None,
        }
    }
}

/// A non-empty, ordered list of enum values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EnumValues(Vec<String>);

/// Raised when an enum value list cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidEnumValues {
    #[error("enum field '{field}' must declare at least one value")]
    Empty { field: String },
    #[error("enum field '{field}' has a blank value")]
    Blank { field: String },
}

impl EnumValues {
    /// Build the value list, trimming each value. Fails on an empty list
    /// or a blank value.
    pub fn new(field: &str, values: Vec<String>) -> Result<Self, InvalidEnumValues> {
        if values.is_empty() {
            return Err(InvalidEnumValues::Empty {
                field: field.to_string(),
            });
        }
        if values.iter().any(|v| v.trim().is_empty()) {
            return Err(InvalidEnumValues::Blank {
                field: field.to_string(),
            });
        }
        Ok(Self(values.into_iter().map(|v| v.trim().to_string()).collect()))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// First declared value; always present.
    pub fn first(&self) -> &str {
        &self.0[0]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// The referenced side of a foreign key column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKeyIR {
    /// Referenced table.
    pub table: String,
    /// Referenced column, normally `id`.
    pub column: String,
    pub on_delete: Option<ForeignAction>,
    pub on_update: Option<ForeignAction>,
    /// Whether the referenced table is generated in the same module.
    pub in_module: bool,
}

/// Referential action for a foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForeignAction {
    Cascade,
    Restrict,
    SetNull,
    NoAction,
}

/// A column default.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DefaultValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_values_rejects_empty() {
        let err = EnumValues::new("status", vec![]).unwrap_err();
        assert_eq!(
            err,
            InvalidEnumValues::Empty {
                field: "status".into()
            }
        );
        assert_eq!(
            EnumValues::new("status", vec!["draft".into(), "  ".into()]).unwrap_err(),
            InvalidEnumValues::Blank {
                field: "status".into()
            }
        );
    }

    #[test]
    fn test_enum_values_keeps_order() {
        let values =
            EnumValues::new("status", vec!["draft".into(), "published".into(), "archived".into()])
                .unwrap();
        assert_eq!(
            values.iter().collect::<Vec<_>>(),
            vec!["draft", "published", "archived"]
        );
        assert_eq!(values.first(), "draft");
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn test_kind_classification() {
        assert!(FieldKind::Integer.is_numeric());
        assert!(FieldKind::Decimal { precision: 10, scale: 2 }.is_numeric());
        assert!(!FieldKind::Decimal { precision: 10, scale: 2 }.is_integer());
        assert_eq!(FieldKind::String { length: 100 }.max_length(), Some(100));
        assert_eq!(FieldKind::Text.max_length(), None);
    }
}
