use std::path::{Path, PathBuf};

use modforge_core::GeneratedFile;
use serde::Serialize;

use crate::RenderContext;

/// The nwidart `module.json` manifest.
pub struct ModuleJson<'a> {
    ctx: RenderContext<'a>,
}

#[derive(Serialize)]
struct ModuleJsonDoc<'a> {
    name: &'a str,
    alias: &'a str,
    description: &'a str,
    version: &'a str,
    keywords: Vec<&'a str>,
    priority: i32,
    providers: Vec<String>,
    files: Vec<&'a str>,
}

impl<'a> ModuleJson<'a> {
    pub fn new(ctx: RenderContext<'a>) -> Self {
        Self { ctx }
    }
}

impl GeneratedFile for ModuleJson<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join("module.json")
    }

    fn render(&self) -> String {
        let meta = self.ctx.meta();
        let doc = ModuleJsonDoc {
            name: &meta.name,
            alias: &meta.alias,
            description: &meta.description,
            version: &meta.version,
            keywords: Vec::new(),
            priority: meta.priority,
            providers: vec![super::provider_class(&self.ctx)],
            files: Vec::new(),
        };
        // Serializing a struct of strings and integers cannot fail.
        let mut json = serde_json::to_string_pretty(&doc).unwrap_or_default();
        json.push('\n');
        json
    }
}
