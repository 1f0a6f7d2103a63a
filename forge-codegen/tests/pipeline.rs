use std::sync::Arc;

use modforge_codegen::pipeline::{Pipeline, Plugin, Severity, SnapshotPlugin};
use modforge_ir::RelationKind;
use modforge_manifest::Manifest;

const BLOG: &str = r#"
[module]
name = "Blog"
description = "Posts and tags"

[[tables]]
name = "posts"

[[tables.fields]]
name = "title"
type = "string"
length = 200
required = true

[[tables.fields]]
name = "status"
type = "enum"
values = ["draft", "published", "archived"]

[[tables.fields]]
name = "author_id"
type = "foreign_id"
references = "users"

[[tables]]
name = "tags"

[[tables.fields]]
name = "name"
type = "string"
length = 50

[[relationships]]
from = "posts"
to = "tags"
type = "belongsToMany"

[[relationships]]
from = "tags"
to = "posts"
type = "belongsToMany"
"#;

fn manifest() -> Manifest {
    BLOG.parse().expect("valid manifest")
}

#[test]
fn pipeline_produces_ir_and_analysis() {
    let mut ctx = Pipeline::new().run(manifest()).expect("pipeline should succeed");
    assert!(!ctx.has_errors());

    let module = ctx.take_ir().unwrap();
    let analysis = ctx.take_analysis().unwrap();

    assert_eq!(module.meta.alias, "blog");
    assert_eq!(module.relations.len(), 2);
    assert!(module.relations.iter().all(|r| r.kind == RelationKind::BelongsToMany));

    // Declared on both sides, created once.
    assert_eq!(analysis.pivots.len(), 1);
    assert_eq!(analysis.pivots[0].name, "post_tag");
    assert_eq!(analysis.table_order, vec!["posts", "tags"]);
}

#[test]
fn pipeline_reports_lint_warnings() {
    let src = BLOG.replace("length = 50\n", "");
    let ctx = Pipeline::new().run(src.parse().unwrap()).unwrap();

    let warnings: Vec<_> = ctx.warnings().map(|d| d.message.as_str()).collect();
    assert_eq!(
        warnings,
        vec!["string field 'tags.name' has no length, defaulting to 255"]
    );
}

#[test]
fn failed_run_keeps_diagnostics() {
    let src = r#"
        [module]
        name = "Shop"
        description = "Orders"

        [[tables]]
        name = "orders"

        [[tables.fields]]
        name = "customer_id"
        type = "foreign_id"
    "#;
    let mut ctx = modforge_codegen::pipeline::CompilationContext::new(src.parse().unwrap());

    assert!(Pipeline::new().run_with(&mut ctx).is_err());
    let errors: Vec<_> = ctx.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].severity, Severity::Error);
    assert_eq!(errors[0].phase, "lower");
}

struct PhaseRecorder(Arc<std::sync::Mutex<Vec<String>>>);

impl Plugin for PhaseRecorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    fn on_after_phase(
        &self,
        phase: &str,
        _ctx: &mut modforge_codegen::pipeline::CompilationContext,
    ) -> eyre::Result<()> {
        self.0.lock().unwrap().push(phase.to_string());
        Ok(())
    }
}

#[test]
fn plugins_see_every_phase() {
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    Pipeline::new()
        .plugin(PhaseRecorder(Arc::clone(&seen)))
        .run(manifest())
        .unwrap();

    assert_eq!(*seen.lock().unwrap(), vec!["validate", "lower", "analyze"]);
}

#[test]
fn snapshot_plugin_writes_json() {
    let dir = tempfile::tempdir().unwrap();
    let plugin = SnapshotPlugin::with_output_dir(dir.path());
    Pipeline::new().plugin(plugin).run(manifest()).unwrap();

    let lowered = std::fs::read_to_string(dir.path().join("lower.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&lowered).unwrap();
    assert_eq!(json["phase"], "lower");
    assert_eq!(json["ir"]["meta"]["name"], "Blog");
}
