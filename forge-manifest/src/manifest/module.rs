use modforge_core::Version;
use serde::{Deserialize, Serialize};

use super::table::default_true;

/// The `[module]` table: project identity and feature flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleConfig {
    /// Module name; directory and namespace root
    pub name: String,

    /// Root namespace, `Modules\<name>` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_version")]
    pub version: Version,

    #[serde(default = "default_true")]
    pub api: bool,

    #[serde(default)]
    pub web_routes: bool,

    #[serde(default = "default_true")]
    pub admin_panel: bool,

    #[serde(default = "default_true")]
    pub permissions: bool,

    #[serde(default = "default_true")]
    pub factories: bool,

    #[serde(default = "default_true")]
    pub seeders: bool,

    /// Currency for money-formatted table columns
    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default)]
    pub priority: i32,
}

fn default_version() -> Version {
    Version::new(1, 0, 0)
}

fn default_currency() -> String {
    "USD".to_string()
}

impl ModuleConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            description: String::new(),
            version: default_version(),
            api: true,
            web_routes: false,
            admin_panel: true,
            permissions: true,
            factories: true,
            seeders: true,
            currency: default_currency(),
            priority: 0,
        }
    }

    /// Root PHP namespace without a trailing separator.
    pub fn namespace(&self) -> String {
        self.namespace
            .as_deref()
            .map(|ns| ns.trim_end_matches('\\').to_string())
            .unwrap_or_else(|| format!("Modules\\{}", self.name))
    }
}
