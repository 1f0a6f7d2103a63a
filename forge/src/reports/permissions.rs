//! Permissions command report data structures.

use serde::Serialize;

use super::output::{Output, Report};

/// Permission names of a module.
#[derive(Debug, Serialize)]
pub struct PermissionsReport {
    pub module: String,
    pub guard: &'static str,
    /// Whether the module generates a permission seeder.
    pub enabled: bool,
    pub resources: Vec<ResourcePermissions>,
    /// Names registered in the host, when a sync ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registered: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct ResourcePermissions {
    pub model: String,
    pub permissions: Vec<String>,
}

impl Report for PermissionsReport {
    fn render(&self, out: &mut dyn Output) {
        if !self.enabled {
            out.warning(&format!(
                "module {} does not generate a permission seeder",
                self.module
            ));
        }

        out.key_value("Guard", self.guard);
        for resource in &self.resources {
            out.newline();
            out.section(&resource.model);
            for permission in &resource.permissions {
                out.list_item(permission);
            }
        }

        if let Some(registered) = &self.registered {
            out.newline();
            out.preformatted(&format!(
                "Registered {} permissions for {}",
                registered.len(),
                self.module
            ));
        }
    }
}
