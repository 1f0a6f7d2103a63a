//! Pivot tables for many-to-many relationships.

use serde::Serialize;

/// A pivot table, created once per distinct name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PivotIR {
    pub name: String,
    pub shape: PivotShape,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum PivotShape {
    /// `product_tag` with `product_id` and `tag_id`.
    Plain { left: PivotSide, right: PivotSide },
    /// `taggables` with `tag_id` and the `taggable_id`/`taggable_type` pair.
    Morph { related: PivotSide, morph_name: String },
}

/// One foreign key column of a pivot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PivotSide {
    /// Referenced table.
    pub table: String,
    /// Column on the pivot table.
    pub column: String,
}

impl PivotSide {
    /// `categories` -> `category_id`
    pub fn for_table(table: &str) -> Self {
        Self::new(table, format!("{}_id", modforge_core::singularize(table)))
    }

    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

/// Default pivot columns of a many-to-many from `from` to `to`.
///
/// A table related to itself needs two distinct columns, so the related
/// side becomes `related_<singular>_id`.
pub fn default_pivot_keys(from: &str, to: &str) -> (String, String) {
    let key = |table: &str| format!("{}_id", modforge_core::singularize(table));
    if from == to {
        (key(from), format!("related_{}", key(to)))
    } else {
        (key(from), key(to))
    }
}

impl PivotIR {
    /// Pivot between two tables; the name is the two singular names
    /// sorted alphabetically and joined, so `A -> B` and `B -> A` agree.
    pub fn plain(a: &str, b: &str) -> Self {
        let (a_key, b_key) = default_pivot_keys(a, b);
        Self::keyed(PivotSide::new(a, a_key), PivotSide::new(b, b_key))
    }

    /// Pivot with explicit columns. Sides are stored sorted so that both
    /// declarations of one relationship compare equal.
    pub fn keyed(a: PivotSide, b: PivotSide) -> Self {
        let name = plain_pivot_name(&a.table, &b.table);
        let (left, right) = if (&a.table, &a.column) <= (&b.table, &b.column) {
            (a, b)
        } else {
            (b, a)
        };
        Self {
            name,
            shape: PivotShape::Plain { left, right },
        }
    }

    /// Polymorphic pivot keyed by the plural morph name (`taggables`).
    pub fn morph(related_table: &str, morph_name: &str) -> Self {
        Self {
            name: modforge_core::pluralize(morph_name),
            shape: PivotShape::Morph {
                related: PivotSide::for_table(related_table),
                morph_name: morph_name.to_string(),
            },
        }
    }

    /// Override the derived name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Sorted singular names joined with `_`.
pub fn plain_pivot_name(a: &str, b: &str) -> String {
    let mut names = [modforge_core::singularize(a), modforge_core::singularize(b)];
    names.sort();
    names.join("_")
}
