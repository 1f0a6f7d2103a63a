//! Analyze phase - computes shared data from IR.

use eyre::{Result, bail};
use modforge_ir::RelationTarget;

use crate::{
    pipeline::{CompilationContext, Diagnostic, Phase},
    schema::{ModuleAnalysis, relation_pivot},
};

/// Phase that computes shared analysis data from the module IR.
///
/// This phase must run after `LowerPhase` as it requires the IR to be populated.
/// It orders tables by foreign key dependencies and collects pivot tables.
pub struct AnalyzePhase;

impl Phase for AnalyzePhase {
    fn name(&self) -> &'static str {
        "analyze"
    }

    fn description(&self) -> &'static str {
        "Order tables and collect pivots"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        let ir = ctx
            .ir
            .as_ref()
            .ok_or_else(|| eyre::eyre!("IR not set - AnalyzePhase must run after LowerPhase"))?;

        let mut diagnostics = Vec::new();
        for relation in ir.relations.iter().filter(|r| r.kind.needs_pivot()) {
            if let RelationTarget::Unresolved { reference } = &relation.target {
                diagnostics.push(
                    Diagnostic::warning(
                        self.name(),
                        format!(
                            "no pivot table generated for '{}.{}': '{}' is not in this module",
                            relation.from, relation.method, reference
                        ),
                    )
                    .at(format!("relationships.{}.{}", relation.from, relation.method)),
                );
            }
        }

        let analysis = ModuleAnalysis::from_ir(ir);

        // Both sides of a many-to-many share one pivot table, so they must
        // agree on its columns.
        let mut conflicts = 0;
        if let Ok(analysis) = &analysis {
            for relation in &ir.relations {
                let Some(wanted) = relation_pivot(relation) else {
                    continue;
                };
                let Some(created) = analysis.pivot(&wanted.name) else {
                    continue;
                };
                if &wanted != created {
                    conflicts += 1;
                    diagnostics.push(
                        Diagnostic::error(
                            self.name(),
                            format!(
                                "'{}.{}' expects pivot '{}' with different columns than another relationship declares; \
                                 set matching `foreign_key` and `local_key` on both sides",
                                relation.from, relation.method, wanted.name
                            ),
                        )
                        .at(format!("relationships.{}.{}", relation.from, relation.method)),
                    );
                }
            }
        }
        ctx.diagnostics.extend(diagnostics);
        if conflicts > 0 {
            bail!("{} relationship(s) disagree on their pivot columns", conflicts);
        }

        match analysis {
            Ok(analysis) => {
                ctx.analysis = Some(analysis);
                Ok(())
            }
            Err(cycle) => {
                ctx.add_error(self.name(), cycle.to_string());
                bail!("{cycle}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use modforge_manifest::Manifest;

    use super::*;
    use crate::pipeline::phases::LowerPhase;

    fn lowered(src: &str) -> CompilationContext {
        let manifest: Manifest = src.parse().expect("valid manifest");
        let mut ctx = CompilationContext::new(manifest);
        LowerPhase.run(&mut ctx).expect("lowering should succeed");
        ctx
    }

    #[test]
    fn test_analyze_phase() {
        let mut ctx = lowered(
            r#"
            [module]
            name = "Shop"

            [[tables]]
            name = "products"

            [[tables.fields]]
            name = "category_id"
            type = "foreign_id"

            [[tables]]
            name = "categories"
            "#,
        );

        AnalyzePhase.run(&mut ctx).expect("analyze should succeed");

        let analysis = ctx.analysis.as_ref().unwrap();
        assert_eq!(analysis.table_order, vec!["categories", "products"]);
        assert_eq!(analysis.belongs_to("products").len(), 1);
    }

    #[test]
    fn test_cycle_is_an_error() {
        let mut ctx = lowered(
            r#"
            [module]
            name = "Org"

            [[tables]]
            name = "teams"

            [[tables.fields]]
            name = "lead_id"
            type = "foreign_id"
            references = "members"

            [[tables]]
            name = "members"

            [[tables.fields]]
            name = "team_id"
            type = "foreign_id"
            "#,
        );

        assert!(AnalyzePhase.run(&mut ctx).is_err());
        assert!(ctx.analysis.is_none());
        assert_eq!(ctx.error_count(), 1);
    }

    #[test]
    fn test_unresolved_pivot_warns() {
        let mut ctx = lowered(
            r#"
            [module]
            name = "Shop"

            [[tables]]
            name = "products"

            [[relationships]]
            from = "products"
            to = "Tag"
            type = "belongsToMany"
            "#,
        );

        AnalyzePhase.run(&mut ctx).expect("analyze should succeed");
        assert!(ctx.analysis.as_ref().unwrap().pivots.is_empty());
        assert!(ctx.warnings().any(|w| w.message.contains("no pivot table")));
    }

    #[test]
    fn test_inverse_with_other_pivot_columns_is_an_error() {
        let mut ctx = lowered(
            r#"
            [module]
            name = "Shop"

            [[tables]]
            name = "products"

            [[tables]]
            name = "tags"

            [[relationships]]
            from = "products"
            to = "tags"
            type = "belongsToMany"
            foreign_key = "item_id"

            [[relationships]]
            from = "tags"
            to = "products"
            type = "belongsToMany"
            "#,
        );

        assert!(AnalyzePhase.run(&mut ctx).is_err());
        assert!(ctx.errors().any(|e| e.message.contains("tags.products")));
    }

    #[test]
    fn test_inverse_with_matching_keys_shares_the_pivot() {
        let mut ctx = lowered(
            r#"
            [module]
            name = "Shop"

            [[tables]]
            name = "products"

            [[tables]]
            name = "tags"

            [[relationships]]
            from = "products"
            to = "tags"
            type = "belongsToMany"
            foreign_key = "item_id"

            [[relationships]]
            from = "tags"
            to = "products"
            type = "belongsToMany"
            foreign_key = "tag_id"
            local_key = "item_id"
            "#,
        );

        AnalyzePhase.run(&mut ctx).expect("analyze should succeed");
        assert_eq!(ctx.analysis.as_ref().unwrap().pivots.len(), 1);
    }

    #[test]
    fn test_analyze_phase_requires_ir() {
        let manifest: Manifest = "[module]\nname = \"Shop\"\n".parse().unwrap();
        let mut ctx = CompilationContext::new(manifest);

        assert!(AnalyzePhase.run(&mut ctx).is_err());
    }
}
