//! Relationship declarations: `[[relationships]]`.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A typed, directed edge between two tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Table name or model name of the owning side
    pub from: String,

    /// Table name or model name of the related side
    pub to: String,

    #[serde(rename = "type")]
    pub kind: RelationType,

    /// Accessor method name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pivot_table: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morph_name: Option<String>,

    /// Intermediate table for has*Through
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub through: Option<String>,
}

impl Relationship {
    pub fn new(from: impl Into<String>, kind: RelationType, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
            name: None,
            foreign_key: None,
            local_key: None,
            pivot_table: None,
            morph_name: None,
            through: None,
        }
    }
}

/// Eloquent relationship kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationType {
    #[serde(alias = "has_one")]
    HasOne,
    #[serde(alias = "has_many")]
    HasMany,
    #[serde(alias = "belongs_to")]
    BelongsTo,
    #[serde(alias = "belongs_to_many")]
    BelongsToMany,
    #[serde(alias = "morph_one")]
    MorphOne,
    #[serde(alias = "morph_many")]
    MorphMany,
    #[serde(alias = "morph_to")]
    MorphTo,
    #[serde(alias = "morph_to_many")]
    MorphToMany,
    #[serde(alias = "morphed_by_many")]
    MorphedByMany,
    #[serde(alias = "has_one_through")]
    HasOneThrough,
    #[serde(alias = "has_many_through")]
    HasManyThrough,
}

impl RelationType {
    pub const ALL: &'static [RelationType] = &[
        RelationType::HasOne,
        RelationType::HasMany,
        RelationType::BelongsTo,
        RelationType::BelongsToMany,
        RelationType::MorphOne,
        RelationType::MorphMany,
        RelationType::MorphTo,
        RelationType::MorphToMany,
        RelationType::MorphedByMany,
        RelationType::HasOneThrough,
        RelationType::HasManyThrough,
    ];

    /// The Eloquent method name (`belongsToMany`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::HasOne => "hasOne",
            RelationType::HasMany => "hasMany",
            RelationType::BelongsTo => "belongsTo",
            RelationType::BelongsToMany => "belongsToMany",
            RelationType::MorphOne => "morphOne",
            RelationType::MorphMany => "morphMany",
            RelationType::MorphTo => "morphTo",
            RelationType::MorphToMany => "morphToMany",
            RelationType::MorphedByMany => "morphedByMany",
            RelationType::HasOneThrough => "hasOneThrough",
            RelationType::HasManyThrough => "hasManyThrough",
        }
    }

    /// Relationship kinds backed by a pivot table.
    pub fn needs_pivot(&self) -> bool {
        matches!(
            self,
            RelationType::BelongsToMany | RelationType::MorphToMany | RelationType::MorphedByMany
        )
    }

    pub fn is_morph(&self) -> bool {
        matches!(
            self,
            RelationType::MorphOne
                | RelationType::MorphMany
                | RelationType::MorphTo
                | RelationType::MorphToMany
                | RelationType::MorphedByMany
        )
    }

    pub fn needs_through(&self) -> bool {
        matches!(self, RelationType::HasOneThrough | RelationType::HasManyThrough)
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = modforge_core::to_snake_case(s);
        RelationType::ALL
            .iter()
            .copied()
            .find(|kind| modforge_core::to_snake_case(kind.as_str()) == wanted)
            .ok_or_else(|| {
                format!(
                    "unknown relationship type '{}', expected one of: {}",
                    s,
                    RelationType::ALL
                        .iter()
                        .map(|k| k.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_type_from_str() {
        assert_eq!(
            "belongsToMany".parse::<RelationType>().unwrap(),
            RelationType::BelongsToMany
        );
        assert_eq!(
            "has_many".parse::<RelationType>().unwrap(),
            RelationType::HasMany
        );
        assert!("hasSome".parse::<RelationType>().is_err());
    }

    #[test]
    fn test_relation_type_deserialize() {
        let rel: Relationship =
            toml::from_str("from = \"posts\"\nto = \"tags\"\ntype = \"belongsToMany\"").unwrap();
        assert_eq!(rel.kind, RelationType::BelongsToMany);
        assert!(rel.kind.needs_pivot());
        assert!(rel.pivot_table.is_none());
    }

    #[test]
    fn test_relation_type_round_trip_display() {
        for kind in RelationType::ALL {
            assert_eq!(kind.to_string().parse::<RelationType>().unwrap(), *kind);
        }
    }
}
