//! Shared inputs of every renderer.

use modforge_codegen::schema::{BelongsToColumn, ModuleAnalysis};
use modforge_ir::{FieldIR, ModuleIR, ModuleMeta, TableIR};

use crate::LaravelTypeMapper;

/// The lowered module, its analysis and the type mapper.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub module: &'a ModuleIR,
    pub analysis: &'a ModuleAnalysis,
    pub mapper: &'a LaravelTypeMapper,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        module: &'a ModuleIR,
        analysis: &'a ModuleAnalysis,
        mapper: &'a LaravelTypeMapper,
    ) -> Self {
        Self {
            module,
            analysis,
            mapper,
        }
    }

    pub fn meta(&self) -> &'a ModuleMeta {
        &self.module.meta
    }

    /// `Modules\Shop\<sub>`
    pub fn ns(&self, sub: &str) -> String {
        if sub.is_empty() {
            self.module.meta.namespace.clone()
        } else {
            format!("{}\\{}", self.module.meta.namespace, sub)
        }
    }

    /// Fully qualified model class.
    pub fn model_class(&self, model: &str) -> String {
        format!("{}\\Models\\{}", self.module.meta.namespace, model)
    }

    /// belongsTo relationships whose key column exists on the table.
    pub fn belongs_to(&self, table: &TableIR) -> Vec<&'a BelongsToColumn> {
        self.analysis
            .belongs_to(&table.name)
            .iter()
            .filter(|b| table.field(&b.column).is_some())
            .collect()
    }

    /// Fields rendered as plain inputs and columns, in declaration order.
    ///
    /// Key columns bound to a belongsTo are excluded; they are rendered as
    /// relationship selects after the plain fields.
    pub fn plain_fields<'t>(&self, table: &'t TableIR) -> Vec<&'t FieldIR> {
        let bound = self.belongs_to(table);
        table
            .fields
            .iter()
            .filter(|f| !bound.iter().any(|b| b.column == f.name))
            .collect()
    }

    /// Fields assignable through the model, in declaration order.
    pub fn fillable<'t>(&self, table: &'t TableIR) -> Vec<&'t str> {
        table.fields.iter().map(|f| f.name.as_str()).collect()
    }
}
