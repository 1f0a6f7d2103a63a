//! Relationship IR.

use serde::Serialize;

/// A resolved relationship accessor on the `from` model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationIR {
    /// Owning table name.
    pub from: String,
    pub kind: RelationKind,
    /// Accessor method name.
    pub method: String,
    pub target: RelationTarget,
    pub foreign_key: Option<String>,
    pub local_key: Option<String>,
    /// Pivot table for many-to-many kinds.
    pub pivot_table: Option<String>,
    pub morph_name: Option<String>,
    /// Intermediate model for has*Through kinds.
    pub through: Option<RelatedModel>,
    /// Synthesized from a foreign key column rather than declared.
    pub inferred: bool,
}

impl RelationIR {
    /// The related model when the target is part of the module.
    pub fn related(&self) -> Option<&RelatedModel> {
        match &self.target {
            RelationTarget::Resolved(model) => Some(model),
            RelationTarget::Unresolved { .. } => None,
        }
    }

    /// Pivot columns of a belongsToMany as `(foreign pivot key, related
    /// pivot key)`: `foreign_key` names the column pointing at the owning
    /// table and `local_key` the column pointing at the related table.
    pub fn pivot_keys(&self) -> Option<(String, String)> {
        if self.kind != RelationKind::BelongsToMany {
            return None;
        }
        let related = self.related()?;
        let (foreign, related_key) = crate::default_pivot_keys(&self.from, &related.table);
        Some((
            self.foreign_key.clone().unwrap_or(foreign),
            self.local_key.clone().unwrap_or(related_key),
        ))
    }

    /// Whether a many-to-many relates a table to itself.
    pub fn is_self_referencing(&self) -> bool {
        self.related().is_some_and(|r| r.table == self.from)
    }

    /// Column on the `from` table holding the key, for belongsTo.
    pub fn owner_key_column(&self) -> Option<String> {
        if self.kind != RelationKind::BelongsTo {
            return None;
        }
        self.foreign_key
            .clone()
            .or_else(|| Some(format!("{}_id", modforge_core::to_snake_case(&self.method))))
    }
}

/// What a relationship points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RelationTarget {
    Resolved(RelatedModel),
    /// Names a model outside the module; rendered as a placeholder.
    Unresolved { reference: String },
}

/// A model inside the module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedModel {
    pub table: String,
    pub model: String,
    /// Display column of the related table.
    pub display: String,
}

/// Eloquent relationship kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    HasOne,
    HasMany,
    BelongsTo,
    BelongsToMany,
    MorphOne,
    MorphMany,
    MorphTo,
    MorphToMany,
    MorphedByMany,
    HasOneThrough,
    HasManyThrough,
}

impl RelationKind {
    /// Eloquent builder method (`$this->hasMany(...)`).
    pub fn method(&self) -> &'static str {
        match self {
            RelationKind::HasOne => "hasOne",
            RelationKind::HasMany => "hasMany",
            RelationKind::BelongsTo => "belongsTo",
            RelationKind::BelongsToMany => "belongsToMany",
            RelationKind::MorphOne => "morphOne",
            RelationKind::MorphMany => "morphMany",
            RelationKind::MorphTo => "morphTo",
            RelationKind::MorphToMany => "morphToMany",
            RelationKind::MorphedByMany => "morphedByMany",
            RelationKind::HasOneThrough => "hasOneThrough",
            RelationKind::HasManyThrough => "hasManyThrough",
        }
    }

    /// Relation class name for return type hints.
    pub fn class(&self) -> &'static str {
        match self {
            RelationKind::HasOne => "HasOne",
            RelationKind::HasMany => "HasMany",
            RelationKind::BelongsTo => "BelongsTo",
            RelationKind::BelongsToMany => "BelongsToMany",
            RelationKind::MorphOne => "MorphOne",
            RelationKind::MorphMany => "MorphMany",
            RelationKind::MorphTo => "MorphTo",
            RelationKind::MorphToMany | RelationKind::MorphedByMany => "MorphToMany",
            RelationKind::HasOneThrough => "HasOneThrough",
            RelationKind::HasManyThrough => "HasManyThrough",
        }
    }

    /// Whether the accessor returns a collection.
    pub fn is_to_many(&self) -> bool {
        matches!(
            self,
            RelationKind::HasMany
                | RelationKind::BelongsToMany
                | RelationKind::MorphMany
                | RelationKind::MorphToMany
                | RelationKind::MorphedByMany
                | RelationKind::HasManyThrough
        )
    }

    pub fn needs_pivot(&self) -> bool {
        matches!(
            self,
            RelationKind::BelongsToMany | RelationKind::MorphToMany | RelationKind::MorphedByMany
        )
    }
}
