//! Analysis data computed from the module IR.
//!
//! [`ModuleAnalysis`] holds the facts several renderers need: the order in
//! which tables must be created, the set of pivot tables, and which columns
//! are bound to a belongsTo relationship.

use indexmap::IndexMap;
use modforge_ir::{ModuleIR, PivotIR, PivotSide, RelatedModel, RelationIR, RelationKind, TableIR};
use serde::Serialize;

/// Pre-computed data from IR analysis.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ModuleAnalysis {
    /// Table names ordered so that referenced tables come first.
    pub table_order: Vec<String>,
    /// Pivot tables, one per distinct name, in first-seen order.
    pub pivots: Vec<PivotIR>,
    /// Resolved belongsTo relationships keyed by owning table.
    pub belongs_to: IndexMap<String, Vec<BelongsToColumn>>,
}

/// A foreign key column bound to a belongsTo accessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BelongsToColumn {
    /// Column on the owning table.
    pub column: String,
    /// Accessor method on the owning model.
    pub method: String,
    pub related: RelatedModel,
}

/// Tables that reference each other through foreign keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyCycle {
    pub tables: Vec<String>,
}

impl std::fmt::Display for DependencyCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "foreign keys form a cycle between tables: {}",
            self.tables.join(", ")
        )
    }
}

impl std::error::Error for DependencyCycle {}

impl ModuleAnalysis {
    /// Compute all data from a module IR.
    pub fn from_ir(ir: &ModuleIR) -> Result<Self, DependencyCycle> {
        Ok(Self {
            table_order: dependency_order(&ir.tables)?,
            pivots: collect_pivots(ir),
            belongs_to: collect_belongs_to(ir),
        })
    }

    /// Tables in creation order.
    pub fn ordered_tables<'a>(&self, ir: &'a ModuleIR) -> Vec<&'a TableIR> {
        self.table_order
            .iter()
            .filter_map(|name| ir.tables.iter().find(|t| &t.name == name))
            .collect()
    }

    /// belongsTo columns of a table, in relationship order.
    pub fn belongs_to(&self, table: &str) -> &[BelongsToColumn] {
        self.belongs_to.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The belongsTo binding claiming `column`, if any.
    pub fn belongs_to_column(&self, table: &str, column: &str) -> Option<&BelongsToColumn> {
        self.belongs_to(table).iter().find(|b| b.column == column)
    }

    pub fn pivot(&self, name: &str) -> Option<&PivotIR> {
        self.pivots.iter().find(|p| p.name == name)
    }
}

/// Order tables so foreign key targets precede the tables referencing them.
///
/// Each step takes the first table, in declaration order, whose in-module
/// targets are already placed. Self references don't count as dependencies.
fn dependency_order(tables: &[TableIR]) -> Result<Vec<String>, DependencyCycle> {
    let dependencies = |table: &TableIR| -> Vec<String> {
        table
            .fields
            .iter()
            .filter_map(|f| f.foreign_key())
            .filter(|fk| fk.in_module && fk.table != table.name)
            .map(|fk| fk.table.clone())
            .filter(|target| tables.iter().any(|t| &t.name == target))
            .collect()
    };

    let mut placed: Vec<String> = Vec::with_capacity(tables.len());
    let mut remaining: Vec<&TableIR> = tables.iter().collect();

    while !remaining.is_empty() {
        let ready = remaining
            .iter()
            .position(|t| dependencies(t).iter().all(|d| placed.contains(d)));
        match ready {
            Some(index) => placed.push(remaining.remove(index).name.clone()),
            None => {
                return Err(DependencyCycle {
                    tables: remaining.iter().map(|t| t.name.clone()).collect(),
                });
            }
        }
    }

    Ok(placed)
}

fn collect_pivots(ir: &ModuleIR) -> Vec<PivotIR> {
    let mut pivots: Vec<PivotIR> = Vec::new();

    for pivot in ir.relations.iter().filter_map(relation_pivot) {
        if !pivots.iter().any(|p| p.name == pivot.name) {
            pivots.push(pivot);
        }
    }

    pivots
}

/// The pivot table a many-to-many relationship needs, `None` for other
/// kinds and for targets outside the module.
pub fn relation_pivot(relation: &RelationIR) -> Option<PivotIR> {
    let related = relation.related()?;
    let pivot = match relation.kind {
        RelationKind::BelongsToMany => {
            let (foreign, related_key) = relation.pivot_keys()?;
            PivotIR::keyed(
                PivotSide::new(&relation.from, foreign),
                PivotSide::new(&related.table, related_key),
            )
        }
        RelationKind::MorphToMany => PivotIR::morph(&related.table, relation.morph_name.as_ref()?),
        RelationKind::MorphedByMany => PivotIR::morph(&relation.from, relation.morph_name.as_ref()?),
        _ => return None,
    };
    Some(match &relation.pivot_table {
        Some(name) => pivot.named(name),
        None => pivot,
    })
}

fn collect_belongs_to(ir: &ModuleIR) -> IndexMap<String, Vec<BelongsToColumn>> {
    let mut index: IndexMap<String, Vec<BelongsToColumn>> = IndexMap::new();

    for relation in &ir.relations {
        if relation.kind != RelationKind::BelongsTo {
            continue;
        }
        let (Some(related), Some(column)) = (relation.related(), relation.owner_key_column())
        else {
            continue;
        };
        index
            .entry(relation.from.clone())
            .or_default()
            .push(BelongsToColumn {
                column,
                method: relation.method.clone(),
                related: related.clone(),
            });
    }

    index
}

#[cfg(test)]
mod tests {
    use modforge_ir::{
        FieldIR, FieldKind, ForeignKeyIR, PivotShape, RelationIR, RelationTarget, TableNames,
    };

    use super::*;

    fn fk(name: &str, table: &str, in_module: bool) -> FieldIR {
        FieldIR {
            name: name.into(),
            label: name.into(),
            kind: FieldKind::ForeignId(ForeignKeyIR {
                table: table.into(),
                column: "id".into(),
                on_delete: None,
                on_update: None,
                in_module,
            }),
            required: true,
            nullable: false,
            unique: false,
            unsigned: false,
            index: false,
            default: None,
        }
    }

    fn table(name: &str, model: &str, fields: Vec<FieldIR>) -> TableIR {
        TableIR {
            name: name.into(),
            names: TableNames::derive(name, model),
            display: "name".into(),
            fields,
            timestamps: true,
            soft_deletes: false,
        }
    }

    fn related(table: &str, model: &str) -> RelationTarget {
        RelationTarget::Resolved(RelatedModel {
            table: table.into(),
            model: model.into(),
            display: "name".into(),
        })
    }

    fn relation(from: &str, kind: RelationKind, method: &str, target: RelationTarget) -> RelationIR {
        RelationIR {
            from: from.into(),
            kind,
            method: method.into(),
            target,
            foreign_key: None,
            local_key: None,
            pivot_table: None,
            morph_name: None,
            through: None,
            inferred: false,
        }
    }

    fn module(tables: Vec<TableIR>, relations: Vec<RelationIR>) -> ModuleIR {
        ModuleIR {
            meta: modforge_ir::ModuleMeta {
                name: "Shop".into(),
                alias: "shop".into(),
                namespace: "Modules\\Shop".into(),
                description: String::new(),
                version: "1.0.0".into(),
                priority: 0,
                currency: "USD".into(),
            },
            features: modforge_ir::Features {
                api: true,
                web_routes: false,
                admin_panel: true,
                permissions: true,
                factories: true,
                seeders: true,
            },
            tables,
            relations,
        }
    }

    #[test]
    fn test_referenced_tables_come_first() {
        let ir = module(
            vec![
                table("order_items", "OrderItem", vec![fk("order_id", "orders", true)]),
                table("orders", "Order", vec![fk("customer_id", "customers", true)]),
                table("customers", "Customer", vec![]),
                table("notes", "Note", vec![]),
            ],
            vec![],
        );

        let analysis = ModuleAnalysis::from_ir(&ir).unwrap();
        assert_eq!(
            analysis.table_order,
            vec!["customers", "orders", "order_items", "notes"]
        );
    }

    #[test]
    fn test_self_reference_and_external_targets_are_ignored() {
        let ir = module(
            vec![table(
                "categories",
                "Category",
                vec![fk("parent_id", "categories", true), fk("user_id", "users", false)],
            )],
            vec![],
        );

        let analysis = ModuleAnalysis::from_ir(&ir).unwrap();
        assert_eq!(analysis.table_order, vec!["categories"]);
    }

    #[test]
    fn test_cycle_is_reported() {
        let ir = module(
            vec![
                table("a_items", "AItem", vec![fk("b_item_id", "b_items", true)]),
                table("b_items", "BItem", vec![fk("a_item_id", "a_items", true)]),
            ],
            vec![],
        );

        let err = ModuleAnalysis::from_ir(&ir).unwrap_err();
        assert_eq!(err.tables, vec!["a_items", "b_items"]);
    }

    #[test]
    fn test_pivot_declared_on_both_sides_is_collected_once() {
        let ir = module(
            vec![table("products", "Product", vec![]), table("tags", "Tag", vec![])],
            vec![
                relation("products", RelationKind::BelongsToMany, "tags", related("tags", "Tag")),
                relation(
                    "tags",
                    RelationKind::BelongsToMany,
                    "products",
                    related("products", "Product"),
                ),
            ],
        );

        let analysis = ModuleAnalysis::from_ir(&ir).unwrap();
        assert_eq!(analysis.pivots.len(), 1);
        assert_eq!(analysis.pivots[0].name, "product_tag");
    }

    #[test]
    fn test_pivot_columns_follow_relationship_keys() {
        let mut tags = relation("products", RelationKind::BelongsToMany, "tags", related("tags", "Tag"));
        tags.foreign_key = Some("item_id".into());
        let ir = module(
            vec![table("products", "Product", vec![]), table("tags", "Tag", vec![])],
            vec![tags],
        );

        let analysis = ModuleAnalysis::from_ir(&ir).unwrap();
        let PivotShape::Plain { left, right } = &analysis.pivots[0].shape else {
            panic!("expected plain pivot");
        };
        assert_eq!((left.table.as_str(), left.column.as_str()), ("products", "item_id"));
        assert_eq!((right.table.as_str(), right.column.as_str()), ("tags", "tag_id"));
    }

    #[test]
    fn test_morph_pivot_from_either_side() {
        let mut to_many = relation("posts", RelationKind::MorphToMany, "tags", related("tags", "Tag"));
        to_many.morph_name = Some("taggable".into());
        let mut by_many = relation(
            "tags",
            RelationKind::MorphedByMany,
            "posts",
            related("posts", "Post"),
        );
        by_many.morph_name = Some("taggable".into());

        let ir = module(
            vec![table("posts", "Post", vec![]), table("tags", "Tag", vec![])],
            vec![to_many, by_many],
        );

        let analysis = ModuleAnalysis::from_ir(&ir).unwrap();
        assert_eq!(analysis.pivots.len(), 1);
        let PivotShape::Morph { related, .. } = &analysis.pivots[0].shape else {
            panic!("expected morph pivot");
        };
        assert_eq!(related.column, "tag_id");
    }

    #[test]
    fn test_unresolved_many_to_many_has_no_pivot() {
        let ir = module(
            vec![table("products", "Product", vec![])],
            vec![relation(
                "products",
                RelationKind::BelongsToMany,
                "labels",
                RelationTarget::Unresolved {
                    reference: "Label".into(),
                },
            )],
        );

        assert!(ModuleAnalysis::from_ir(&ir).unwrap().pivots.is_empty());
    }

    #[test]
    fn test_belongs_to_index() {
        let ir = module(
            vec![
                table("categories", "Category", vec![]),
                table("products", "Product", vec![fk("category_id", "categories", true)]),
            ],
            vec![relation(
                "products",
                RelationKind::BelongsTo,
                "category",
                related("categories", "Category"),
            )],
        );

        let analysis = ModuleAnalysis::from_ir(&ir).unwrap();
        let binding = analysis
            .belongs_to_column("products", "category_id")
            .expect("category_id is bound");
        assert_eq!(binding.method, "category");
        assert!(analysis.belongs_to("categories").is_empty());
    }
}
