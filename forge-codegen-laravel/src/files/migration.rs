//! Schema migrations: table creation, pivot creation and column additions.
//!
//! All three share the anonymous-class layout Laravel generates:
//!
//! ```text
//! return new class extends Migration
//! {
//!     public function up(): void { ... }
//!     public function down(): void { ... }
//! };
//! ```

use std::path::{Path, PathBuf};

use modforge_codegen::{builder::CodeBuilder, language::TypeMapper};
use modforge_core::{GeneratedFile, php_string};
use modforge_ir::{FieldIR, PivotIR, PivotShape, PivotSide, TableIR};

use crate::{PhpFile, RenderContext};

fn migration_path(base: &Path, timestamp: &str, name: &str) -> PathBuf {
    base.join("database")
        .join("migrations")
        .join(format!("{}_{}.php", timestamp, name))
}

fn migration_file<U, D>(up: U, down: D) -> String
where
    U: FnOnce(CodeBuilder) -> CodeBuilder,
    D: FnOnce(CodeBuilder) -> CodeBuilder,
{
    let body = CodeBuilder::php()
        .line("return new class extends Migration")
        .block_with_close("{", "};", |b| {
            b.brace_block("public function up(): void", up)
                .blank()
                .brace_block("public function down(): void", down)
        })
        .build();

    PhpFile::new()
        .use_classes([
            "Illuminate\\Database\\Migrations\\Migration",
            "Illuminate\\Database\\Schema\\Blueprint",
            "Illuminate\\Support\\Facades\\Schema",
        ])
        .add_code(&body)
        .render()
}

/// A `Schema::...('table', function (Blueprint $table) { ... });` block.
fn schema_block<F>(b: CodeBuilder, call: &str, table: &str, f: F) -> CodeBuilder
where
    F: FnOnce(CodeBuilder) -> CodeBuilder,
{
    b.block_with_close(
        &format!(
            "Schema::{}({}, function (Blueprint $table) {{",
            call,
            php_string(table)
        ),
        "});",
        f,
    )
}

/// `<timestamp>_create_<table>_table.php`
pub struct CreateTableMigration<'a> {
    ctx: RenderContext<'a>,
    table: &'a TableIR,
    timestamp: String,
    added_later: Vec<String>,
}

impl<'a> CreateTableMigration<'a> {
    pub fn new(ctx: RenderContext<'a>, table: &'a TableIR, timestamp: impl Into<String>) -> Self {
        Self {
            ctx,
            table,
            timestamp: timestamp.into(),
            added_later: Vec::new(),
        }
    }

    /// Leave out fields that an alteration migration adds.
    pub fn without<'f>(mut self, fields: impl IntoIterator<Item = &'f str>) -> Self {
        self.added_later.extend(fields.into_iter().map(str::to_string));
        self
    }

    /// Column statements in order: identity, fields, soft deletes, timestamps.
    pub fn columns(&self) -> Vec<String> {
        let mut columns = vec!["$table->id();".to_string()];
        columns.extend(
            self.table
                .fields
                .iter()
                .filter(|f| !self.added_later.contains(&f.name))
                .map(|f| self.ctx.mapper.column(f)),
        );
        if self.table.soft_deletes {
            columns.push("$table->softDeletes();".to_string());
        }
        if self.table.timestamps {
            columns.push("$table->timestamps();".to_string());
        }
        columns
    }
}

impl GeneratedFile for CreateTableMigration<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        migration_path(base, &self.timestamp, &self.table.names.migration)
    }

    fn render(&self) -> String {
        let columns = self.columns();
        migration_file(
            |b| schema_block(b, "create", &self.table.name, |b| b.each(&columns, |b, c| b.line(c))),
            |b| b.line(&format!("Schema::dropIfExists({});", php_string(&self.table.name))),
        )
    }
}

/// `<timestamp>_create_<pivot>_table.php`
pub struct PivotMigration<'a> {
    pivot: &'a PivotIR,
    timestamp: String,
}

impl<'a> PivotMigration<'a> {
    pub fn new(pivot: &'a PivotIR, timestamp: impl Into<String>) -> Self {
        Self {
            pivot,
            timestamp: timestamp.into(),
        }
    }

    fn foreign(side: &PivotSide) -> String {
        format!(
            "$table->foreignId({})->constrained({})->cascadeOnDelete();",
            php_string(&side.column),
            php_string(&side.table)
        )
    }

    fn columns(&self) -> (Vec<String>, Vec<String>) {
        match &self.pivot.shape {
            PivotShape::Plain { left, right } => (
                vec![Self::foreign(left), Self::foreign(right)],
                vec![left.column.clone(), right.column.clone()],
            ),
            PivotShape::Morph {
                related,
                morph_name,
            } => (
                vec![
                    Self::foreign(related),
                    format!("$table->morphs({});", php_string(morph_name)),
                ],
                vec![
                    related.column.clone(),
                    format!("{}_id", morph_name),
                    format!("{}_type", morph_name),
                ],
            ),
        }
    }
}

impl GeneratedFile for PivotMigration<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        migration_path(
            base,
            &self.timestamp,
            &format!("create_{}_table", self.pivot.name),
        )
    }

    fn render(&self) -> String {
        let (columns, unique) = self.columns();
        let unique: Vec<String> = unique.iter().map(|c| php_string(c)).collect();
        migration_file(
            |b| {
                schema_block(b, "create", &self.pivot.name, |b| {
                    b.line("$table->id();")
                        .each(&columns, |b, c| b.line(c))
                        .line("$table->timestamps();")
                        .blank()
                        .line(&format!("$table->unique([{}]);", unique.join(", ")))
                })
            },
            |b| b.line(&format!("Schema::dropIfExists({});", php_string(&self.pivot.name))),
        )
    }
}

/// `<timestamp>_add_<fields>_to_<table>_table.php`
///
/// Adds exactly `fields`; the down migration drops exactly them.
pub struct AlterTableMigration<'a> {
    ctx: RenderContext<'a>,
    table: &'a TableIR,
    fields: Vec<&'a FieldIR>,
    timestamp: String,
}

impl<'a> AlterTableMigration<'a> {
    pub fn new(
        ctx: RenderContext<'a>,
        table: &'a TableIR,
        fields: Vec<&'a FieldIR>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            ctx,
            table,
            fields,
            timestamp: timestamp.into(),
        }
    }

    /// `add_weight_and_color_to_products_table`
    pub fn name(&self) -> String {
        let names: Vec<&str> = self.fields.iter().map(|f| f.name.as_str()).collect();
        format!("add_{}_to_{}_table", names.join("_and_"), self.table.name)
    }

    fn down_statements(&self) -> Vec<String> {
        let mut statements: Vec<String> = self
            .fields
            .iter()
            .filter(|f| f.foreign_key().is_some())
            .map(|f| format!("$table->dropConstrainedForeignId({});", php_string(&f.name)))
            .collect();

        let plain: Vec<String> = self
            .fields
            .iter()
            .filter(|f| f.foreign_key().is_none())
            .map(|f| php_string(&f.name))
            .collect();
        if !plain.is_empty() {
            statements.push(format!("$table->dropColumn([{}]);", plain.join(", ")));
        }
        statements
    }
}

impl GeneratedFile for AlterTableMigration<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        migration_path(base, &self.timestamp, &self.name())
    }

    fn render(&self) -> String {
        let columns: Vec<String> = self.fields.iter().map(|f| self.ctx.mapper.column(f)).collect();
        let down = self.down_statements();
        migration_file(
            |b| schema_block(b, "table", &self.table.name, |b| b.each(&columns, |b, c| b.line(c))),
            |b| schema_block(b, "table", &self.table.name, |b| b.each(&down, |b, c| b.line(c))),
        )
    }
}
