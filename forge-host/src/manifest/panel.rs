use std::sync::LazyLock;

use eyre::Result;
use modforge_codegen_laravel::edit::matching_close;
use modforge_core::php_string;
use regex::Regex;

use super::HostManifest;
use crate::{HostError, HostModule};

static RETURN_PANEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^([ \t]*)return\s+\$panel\b").unwrap());

const DISCOVER: &str = "->discoverResources(";

/// Resource discovery in the Filament admin panel provider.
#[derive(Debug, Clone)]
pub struct PanelDiscovery {
    /// `Modules/Shop/app/Filament/Resources`
    directory: String,
    /// `Modules\Shop\Filament\Resources`
    namespace: String,
}

impl PanelDiscovery {
    pub const FILE: &'static str = "app/Providers/Filament/AdminPanelProvider.php";

    pub fn new(module: &HostModule) -> Self {
        Self {
            directory: module.dir("app/Filament/Resources"),
            namespace: module.ns("Filament\\Resources"),
        }
    }

    fn call(&self) -> String {
        format!(
            "{}in: base_path({}), for: {})",
            DISCOVER,
            php_string(&self.directory),
            php_string(&self.namespace)
        )
    }
}

fn line_indent(source: &str, at: usize) -> &str {
    let start = source[..at].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line = &source[start..];
    &line[..line.len() - line.trim_start_matches([' ', '\t']).len()]
}

impl HostManifest for PanelDiscovery {
    fn relative_path(&self) -> &'static str {
        Self::FILE
    }

    fn entry(&self) -> String {
        self.call()
    }

    fn contains(&self, content: &str) -> Result<bool> {
        Ok(content.contains(&php_string(&self.namespace)) || content.contains(&self.directory))
    }

    /// Adds the call after the last existing `discoverResources`, or directly
    /// after `return $panel` when the panel has none.
    fn insert(&self, content: &str) -> Result<String> {
        if let Some(at) = content.rfind(DISCOVER)
            && let Some(close) = matching_close(content, at + DISCOVER.len() - 1)
        {
            let indent = line_indent(content, at);
            return Ok(format!(
                "{}\n{}{}{}",
                &content[..=close],
                indent,
                self.call(),
                &content[close + 1..]
            ));
        }

        if let Some(caps) = RETURN_PANEL.captures(content) {
            let end = caps.get(0).map(|m| m.end()).unwrap_or_default();
            let indent = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            return Ok(format!(
                "{}\n{}    {}{}",
                &content[..end],
                indent,
                self.call(),
                &content[end..]
            ));
        }

        Err(HostError::RegionNotFound {
            path: Self::FILE.into(),
            region: "the panel configuration",
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PANEL: &str = r"<?php

namespace App\Providers\Filament;

class AdminPanelProvider extends PanelProvider
{
    public function panel(Panel $panel): Panel
    {
        return $panel
            ->default()
            ->id('admin')
            ->discoverResources(in: app_path('Filament/Resources'), for: 'App\\Filament\\Resources')
            ->discoverPages(in: app_path('Filament/Pages'), for: 'App\\Filament\\Pages');
    }
}
";

    #[test]
    fn test_insert_after_existing_discovery() {
        let panel = PanelDiscovery::new(&HostModule::shop());
        assert!(!panel.contains(PANEL).unwrap());

        let updated = panel.insert(PANEL).unwrap();
        let lines: Vec<_> = updated.lines().collect();
        let at = lines
            .iter()
            .position(|l| l.contains("App\\\\Filament\\\\Resources"))
            .unwrap();
        assert_eq!(
            lines[at + 1],
            "            ->discoverResources(in: base_path('Modules/Shop/app/Filament/Resources'), for: 'Modules\\\\Shop\\\\Filament\\\\Resources')"
        );
        assert!(lines[at + 2].contains("->discoverPages("));
        assert!(panel.contains(&updated).unwrap());
    }

    #[test]
    fn test_insert_after_return_panel() {
        let source = "public function panel(Panel $panel): Panel\n{\n    return $panel\n        ->id('admin');\n}\n";
        let updated = PanelDiscovery::new(&HostModule::shop()).insert(source).unwrap();
        insta::assert_snapshot!(updated, @r"
        public function panel(Panel $panel): Panel
        {
            return $panel
                ->discoverResources(in: base_path('Modules/Shop/app/Filament/Resources'), for: 'Modules\\Shop\\Filament\\Resources')
                ->id('admin');
        }
        ");
    }

    #[test]
    fn test_insert_without_panel_is_an_error() {
        let panel = PanelDiscovery::new(&HostModule::shop());
        assert!(panel.insert("<?php\n").is_err());
    }
}
