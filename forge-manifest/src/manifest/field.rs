//! Field declarations: `[[tables.fields]]`.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A column declaration inside a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Column name
    pub name: String,

    /// Semantic type token
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Length for string/char, precision for decimal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,

    /// Required in forms and validation; non-required columns are nullable
    /// unless `nullable` says otherwise
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub unique: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub unsigned: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub index: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<toml::Value>,

    /// Allowed values for `enum` fields, in declaration order
    #[serde(
        default,
        alias = "enum_values",
        alias = "enum_options",
        deserialize_with = "deserialize_values",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub values: Vec<String>,

    /// Referenced table for `foreign_id` fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references_column: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<ForeignAction>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_update: Option<ForeignAction>,

    /// Human label in forms and tables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Field {
    /// Create a field with only a name and type set.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            length: None,
            precision: None,
            scale: None,
            required: false,
            nullable: None,
            unique: false,
            unsigned: false,
            index: false,
            default: None,
            values: Vec::new(),
            references: None,
            references_column: None,
            on_delete: None,
            on_update: None,
            label: None,
        }
    }

    /// Whether the column accepts NULL.
    pub fn is_nullable(&self) -> bool {
        self.nullable.unwrap_or(!self.required)
    }

    /// Parse the compact `name:type[:modifier...]` form used by `add-field`.
    ///
    /// Modifiers: `required`, `nullable`, `unique`, `unsigned`, `index`,
    /// `length=N`, `precision=N`, `scale=N`, `default=V`, `values=a|b|c`,
    /// `references=table`, `on_delete=cascade`.
    pub fn parse_compact(spec: &str) -> std::result::Result<Self, String> {
        let mut parts = spec.split(':');
        let name = parts
            .next()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| format!("missing field name in '{}'", spec))?;
        let ty = parts
            .next()
            .ok_or_else(|| format!("missing field type in '{}', expected name:type", spec))?;
        let mut field = Field::new(name, ty.parse()?);

        for modifier in parts {
            let (key, value) = match modifier.split_once('=') {
                Some((k, v)) => (k, Some(v)),
                None => (modifier, None),
            };
            let number = |v: Option<&str>| -> std::result::Result<u32, String> {
                v.and_then(|v| v.parse().ok())
                    .ok_or_else(|| format!("modifier '{}' expects a number", key))
            };
            match key {
                "required" => field.required = true,
                "nullable" => field.nullable = Some(true),
                "unique" => field.unique = true,
                "unsigned" => field.unsigned = true,
                "index" => field.index = true,
                "length" => field.length = Some(number(value)?),
                "precision" => field.precision = Some(number(value)?),
                "scale" => field.scale = Some(number(value)?),
                "default" => {
                    let raw = value.ok_or("modifier 'default' expects a value")?;
                    field.default = Some(parse_scalar(raw));
                }
                "values" => {
                    let raw = value.ok_or("modifier 'values' expects a|b|c")?;
                    field.values = raw.split('|').map(|v| v.trim().to_string()).collect();
                }
                "references" => field.references = value.map(str::to_string),
                "on_delete" => {
                    field.on_delete = Some(value.ok_or("modifier 'on_delete' expects a value")?.parse()?)
                }
                other => return Err(format!("unknown field modifier '{}'", other)),
            }
        }

        Ok(field)
    }
}

fn parse_scalar(raw: &str) -> toml::Value {
    if let Ok(b) = raw.parse::<bool>() {
        toml::Value::Boolean(b)
    } else if let Ok(i) = raw.parse::<i64>() {
        toml::Value::Integer(i)
    } else if let Ok(f) = raw.parse::<f64>() {
        toml::Value::Float(f)
    } else {
        toml::Value::String(raw.to_string())
    }
}

/// Accept either `["a", "b"]` or `"a, b"`.
fn deserialize_values<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Values {
        List(Vec<String>),
        Csv(String),
    }

    Ok(match Values::deserialize(deserializer)? {
        Values::List(values) => values,
        Values::Csv(raw) => raw
            .split(',')
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect(),
    })
}

macro_rules! field_types {
    ($($variant:ident => $token:literal $(| $alias:literal)*),* $(,)?) => {
        /// Closed set of semantic field types.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum FieldType {
            $($variant,)*
        }

        impl FieldType {
            /// Every type, in documentation order.
            pub const ALL: &'static [FieldType] = &[$(FieldType::$variant,)*];

            /// Canonical snake_case token
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(FieldType::$variant => $token,)*
                }
            }
        }

        impl FromStr for FieldType {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let normalized = modforge_core::to_snake_case(s.trim());
                match normalized.as_str() {
                    $($token $(| $alias)* => Ok(FieldType::$variant),)*
                    _ => Err(format!(
                        "unknown field type '{}', expected one of: {}",
                        s,
                        FieldType::ALL
                            .iter()
                            .map(|t| t.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    )),
                }
            }
        }
    };
}

field_types! {
    String => "string" | "varchar",
    Char => "char",
    Text => "text",
    MediumText => "medium_text" | "mediumtext",
    LongText => "long_text" | "longtext",
    Integer => "integer" | "int",
    BigInteger => "big_integer" | "biginteger" | "big_int",
    SmallInteger => "small_integer" | "smallinteger",
    TinyInteger => "tiny_integer" | "tinyinteger",
    Decimal => "decimal",
    Float => "float",
    Double => "double",
    Boolean => "boolean" | "bool",
    Date => "date",
    DateTime => "datetime" | "date_time",
    Timestamp => "timestamp",
    Time => "time",
    Year => "year",
    Json => "json",
    Enum => "enum",
    ForeignId => "foreign_id" | "foreignid" | "foreign",
    Uuid => "uuid",
    File => "file",
    Image => "image",
    RichText => "rich_text" | "richtext",
    Email => "email",
    Url => "url",
    Password => "password",
    Color => "color",
    Slug => "slug",
}

impl FieldType {
    /// Types that should carry an explicit length (or precision).
    pub fn requires_length(&self) -> bool {
        matches!(self, FieldType::String | FieldType::Char | FieldType::Decimal)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldType {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Referential action for foreign keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForeignAction {
    Cascade,
    Restrict,
    #[serde(alias = "null")]
    SetNull,
    NoAction,
}

impl FromStr for ForeignAction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match modforge_core::to_snake_case(s).as_str() {
            "cascade" => Ok(ForeignAction::Cascade),
            "restrict" => Ok(ForeignAction::Restrict),
            "set_null" | "null" => Ok(ForeignAction::SetNull),
            "no_action" => Ok(ForeignAction::NoAction),
            _ => Err(format!(
                "unknown foreign key action '{}', expected cascade, restrict, set_null or no_action",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_accepts_both_spellings() {
        assert_eq!("foreignId".parse::<FieldType>().unwrap(), FieldType::ForeignId);
        assert_eq!("foreign_id".parse::<FieldType>().unwrap(), FieldType::ForeignId);
        assert_eq!("richText".parse::<FieldType>().unwrap(), FieldType::RichText);
        assert_eq!("dateTime".parse::<FieldType>().unwrap(), FieldType::DateTime);
        assert_eq!("datetime".parse::<FieldType>().unwrap(), FieldType::DateTime);
        assert_eq!("bigInteger".parse::<FieldType>().unwrap(), FieldType::BigInteger);
    }

    #[test]
    fn test_unknown_field_type_lists_valid_tokens() {
        let err = "money".parse::<FieldType>().unwrap_err();
        assert!(err.contains("unknown field type 'money'"));
        assert!(err.contains("decimal"));
        assert!(err.contains("foreign_id"));
    }

    #[test]
    fn test_values_accept_comma_string() {
        let field: Field =
            toml::from_str("name = \"status\"\ntype = \"enum\"\nenum_options = \"draft, published\"")
                .unwrap();
        assert_eq!(field.values, vec!["draft", "published"]);
    }

    #[test]
    fn test_values_accept_array_alias() {
        let field: Field = toml::from_str(
            "name = \"status\"\ntype = \"enum\"\nenum_values = [\"a\", \"b\", \"c\"]",
        )
        .unwrap();
        assert_eq!(field.values, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_nullable_follows_required() {
        let mut field = Field::new("notes", FieldType::Text);
        assert!(field.is_nullable());
        field.required = true;
        assert!(!field.is_nullable());
        field.nullable = Some(true);
        assert!(field.is_nullable());
    }

    #[test]
    fn test_parse_compact() {
        let field = Field::parse_compact("weight:decimal:precision=8:scale=3:required").unwrap();
        assert_eq!(field.name, "weight");
        assert_eq!(field.field_type, FieldType::Decimal);
        assert_eq!(field.precision, Some(8));
        assert_eq!(field.scale, Some(3));
        assert!(field.required);
    }

    #[test]
    fn test_parse_compact_enum_and_default() {
        let field = Field::parse_compact("status:enum:values=draft|live:default=draft").unwrap();
        assert_eq!(field.values, vec!["draft", "live"]);
        assert_eq!(field.default, Some(toml::Value::String("draft".into())));
    }

    #[test]
    fn test_parse_compact_errors() {
        assert!(Field::parse_compact("weight").is_err());
        assert!(Field::parse_compact("weight:money").is_err());
        assert!(Field::parse_compact("weight:decimal:bogus").is_err());
        assert!(Field::parse_compact("weight:decimal:length=x").is_err());
    }

    #[test]
    fn test_foreign_action_from_str() {
        assert_eq!("cascade".parse::<ForeignAction>().unwrap(), ForeignAction::Cascade);
        assert_eq!("setNull".parse::<ForeignAction>().unwrap(), ForeignAction::SetNull);
        assert!("explode".parse::<ForeignAction>().is_err());
    }

    #[test]
    fn test_requires_length() {
        assert!(FieldType::String.requires_length());
        assert!(FieldType::Decimal.requires_length());
        assert!(!FieldType::Text.requires_length());
    }
}
