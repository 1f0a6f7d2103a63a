//! Module schema display formatting for `modforge info`.
//!
//! # Example
//!
//! ```ignore
//! use modforge_codegen::schema::{DisplayStyle, SchemaDisplay};
//!
//! let display = SchemaDisplay::new(&module).style(DisplayStyle::TreeBox);
//! println!("{}", display);
//! ```

use std::fmt;

use modforge_ir::{FieldIR, FieldKind, ModuleIR, RelationIR, RelationTarget, TableIR};

/// Display style for module schemas.
#[derive(Debug, Clone, Copy, Default)]
pub enum DisplayStyle {
    /// Table names with their model.
    ///
    /// ```text
    /// categories (Category)
    /// products (Product)
    /// ```
    #[default]
    Simple,

    /// Tree structure with box-drawing characters, fields and relationships.
    ///
    /// ```text
    /// ├─ categories (Category)
    /// │  └─ name: string(255)
    /// └─ products (Product)
    ///    ├─ price: decimal(10, 2)
    ///    └─ category() belongsTo Category
    /// ```
    TreeBox,
}

/// Declarative module schema display formatter.
#[derive(Debug, Clone)]
pub struct SchemaDisplay<'a> {
    module: &'a ModuleIR,
    style: DisplayStyle,
}

impl<'a> SchemaDisplay<'a> {
    pub fn new(module: &'a ModuleIR) -> Self {
        Self {
            module,
            style: DisplayStyle::default(),
        }
    }

    pub fn style(mut self, style: DisplayStyle) -> Self {
        self.style = style;
        self
    }

    pub fn render(&self) -> String {
        let mut output = String::new();
        match self.style {
            DisplayStyle::Simple => {
                for table in &self.module.tables {
                    output.push_str(&table_heading(table));
                    output.push('\n');
                }
            }
            DisplayStyle::TreeBox => self.render_tree(&mut output),
        }
        output
    }

    fn render_tree(&self, output: &mut String) {
        let count = self.module.tables.len();
        for (i, table) in self.module.tables.iter().enumerate() {
            let last_table = i + 1 == count;
            output.push_str(if last_table { "└─ " } else { "├─ " });
            output.push_str(&table_heading(table));
            output.push('\n');

            let mut children: Vec<String> = table.fields.iter().map(describe_field).collect();
            children.extend(
                self.module
                    .relations_from(&table.name)
                    .map(describe_relation),
            );

            let prefix = if last_table { "   " } else { "│  " };
            let child_count = children.len();
            for (j, child) in children.into_iter().enumerate() {
                output.push_str(prefix);
                output.push_str(if j + 1 == child_count { "└─ " } else { "├─ " });
                output.push_str(&child);
                output.push('\n');
            }
        }
    }
}

impl fmt::Display for SchemaDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn table_heading(table: &TableIR) -> String {
    format!("{} ({})", table.name, table.model())
}

fn describe_field(field: &FieldIR) -> String {
    let kind = match &field.kind {
        FieldKind::String { length } | FieldKind::Char { length } => {
            format!("{}({})", field.kind.as_str(), length)
        }
        FieldKind::Decimal { precision, scale } => format!("decimal({}, {})", precision, scale),
        FieldKind::Enum(values) => format!("enum[{}]", values.as_slice().join("|")),
        FieldKind::ForeignId(fk) => format!("foreign_id -> {}.{}", fk.table, fk.column),
        other => other.as_str().to_string(),
    };
    let mut out = format!("{}: {}", field.name, kind);
    if field.nullable {
        out.push('?');
    }
    out
}

fn describe_relation(relation: &RelationIR) -> String {
    let target = match &relation.target {
        RelationTarget::Resolved(model) => model.model.clone(),
        RelationTarget::Unresolved { reference } => format!("{} (unresolved)", reference),
    };
    format!("{}() {} {}", relation.method, relation.kind.method(), target)
}

#[cfg(test)]
mod tests {
    use modforge_manifest::Manifest;

    use super::*;
    use crate::pipeline::phases::lower_manifest;

    fn module() -> ModuleIR {
        let manifest: Manifest = r#"
            [module]
            name = "Shop"

            [[tables]]
            name = "categories"

            [[tables.fields]]
            name = "name"
            type = "string"
            required = true

            [[tables]]
            name = "products"

            [[tables.fields]]
            name = "price"
            type = "decimal"
            required = true

            [[tables.fields]]
            name = "category_id"
            type = "foreign_id"
            required = true
        "#
        .parse()
        .unwrap();
        lower_manifest(&manifest).0
    }

    #[test]
    fn test_simple_style() {
        let module = module();
        insta::assert_snapshot!(SchemaDisplay::new(&module).render(), @r"
        categories (Category)
        products (Product)
        ");
    }

    #[test]
    fn test_tree_style() {
        let module = module();
        let rendered = SchemaDisplay::new(&module)
            .style(DisplayStyle::TreeBox)
            .to_string();
        insta::assert_snapshot!(rendered, @r"
        ├─ categories (Category)
        │  └─ name: string(255)
        └─ products (Product)
           ├─ price: decimal(10, 2)
           ├─ category_id: foreign_id -> categories.id
           └─ category() belongsTo Category
        ");
    }
}
