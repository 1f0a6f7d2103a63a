//! Info operation - module information.

use std::path::Path;

use eyre::Result;
use modforge_codegen::schema::{DisplayStyle, SchemaDisplay};
use modforge_host::{ProjectStore, StatusRegistry};
use modforge_manifest::Manifest;

use super::compile;
use crate::reports::{HostInfo, InfoReport, Stats};

/// Execute the info operation.
///
/// Collects module information from the manifest and, when the host has
/// seen the module before, its project status and enabled flag.
pub fn info(manifest: &Manifest, config_path: &Path, host_root: &Path) -> Result<InfoReport> {
    let generator = compile(manifest, None)?;
    let module = generator.module();
    let analysis = generator.analysis();

    let features = module.features;
    let enabled_features = [
        ("admin panel", features.admin_panel),
        ("api", features.api),
        ("web routes", features.web_routes),
        ("permissions", features.permissions),
        ("factories", features.factories),
        ("seeders", features.seeders),
    ]
    .into_iter()
    .filter(|(_, on)| *on)
    .map(|(name, _)| name.to_string())
    .collect();

    let stats = Stats {
        tables: module.tables.len(),
        fields: module.tables.iter().map(|t| t.fields.len()).sum(),
        relationships: module.relations.iter().filter(|r| !r.inferred).count(),
        inferred: module.relations.iter().filter(|r| r.inferred).count(),
        pivots: analysis.pivots.len(),
        permissions: generator.permissions().len(),
    };

    let tree = (!module.tables.is_empty()).then(|| {
        SchemaDisplay::new(module)
            .style(DisplayStyle::TreeBox)
            .render()
    });

    Ok(InfoReport {
        name: module.meta.name.clone(),
        namespace: module.meta.namespace.clone(),
        description: module.meta.description.clone(),
        version: module.meta.version.clone(),
        config_path: std::fs::canonicalize(config_path)
            .unwrap_or_else(|_| config_path.to_path_buf()),
        features: enabled_features,
        stats,
        host: host_info(&module.meta.name, host_root),
        tree,
    })
}

/// What the host knows about the module; unreadable state is left out.
fn host_info(module: &str, host_root: &Path) -> HostInfo {
    let record = ProjectStore::open(host_root)
        .ok()
        .and_then(|store| store.get(module).cloned());
    let enabled = StatusRegistry::load(host_root).ok().and_then(|modules| {
        modules
            .into_iter()
            .find(|(name, _)| name == module)
            .map(|(_, enabled)| enabled)
    });
    HostInfo {
        status: record.as_ref().map(|r| r.status.to_string()),
        message: record.as_ref().map(|r| r.message.clone()),
        updated_at: record.map(|r| r.updated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
        enabled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_counts() {
        let manifest: Manifest = r#"
[module]
name = "Shop"

[[tables]]
name = "categories"

[[tables.fields]]
name = "name"
type = "string"
length = 80

[[tables]]
name = "products"

[[tables.fields]]
name = "title"
type = "string"
length = 200

[[tables.fields]]
name = "category_id"
type = "foreignId"
references = "categories"
"#
        .parse()
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let report = info(&manifest, Path::new("forge.toml"), dir.path()).unwrap();
        assert_eq!(report.stats.tables, 2);
        assert_eq!(report.stats.fields, 3);
        assert_eq!(report.stats.relationships, 0);
        assert_eq!(report.stats.inferred, 1);
        assert_eq!(report.stats.permissions, 22);
        assert_eq!(report.host.status, None);
        assert!(report.tree.unwrap().contains("products (Product)"));
    }
}
