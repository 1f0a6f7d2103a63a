//! The identity of a generated module as the host application sees it.

use modforge_codegen_laravel::LaravelGenerator;

/// What the host integration needs to know about a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostModule {
    /// `Shop`, the key in `modules_statuses.json`
    pub name: String,
    /// `Modules\Shop`
    pub namespace: String,
    /// Module directory relative to the host root, `/`-separated: `Modules/Shop`
    pub path: String,
    /// `Modules\Shop\Providers\ShopServiceProvider`
    pub provider: String,
    /// Whether resources should be discovered by the admin panel.
    pub admin_panel: bool,
    /// Seeder class that registers the permissions, when generated.
    pub permission_seeder: Option<String>,
    pub permissions: Vec<String>,
}

impl HostModule {
    /// Describe the module `generator` renders into `<modules_dir>/<name>`.
    pub fn from_generator(generator: &LaravelGenerator, modules_dir: &str) -> Self {
        let meta = &generator.module().meta;
        let modules_dir = modules_dir.trim_end_matches(['/', '\\']).replace('\\', "/");
        let path = if modules_dir.is_empty() || modules_dir == "." {
            meta.name.clone()
        } else {
            format!("{}/{}", modules_dir, meta.name)
        };
        Self {
            name: meta.name.clone(),
            namespace: meta.namespace.clone(),
            path,
            provider: generator.provider_class(),
            admin_panel: generator.module().features.admin_panel,
            permission_seeder: generator.permission_seeder_class(),
            permissions: generator.permissions(),
        }
    }

    /// `Modules\Shop\<sub>`
    pub fn ns(&self, sub: &str) -> String {
        format!("{}\\{}", self.namespace, sub)
    }

    /// `Modules/Shop/<sub>`
    pub fn dir(&self, sub: &str) -> String {
        format!("{}/{}", self.path, sub)
    }
}

#[cfg(test)]
impl HostModule {
    pub(crate) fn shop() -> Self {
        Self {
            name: "Shop".into(),
            namespace: "Modules\\Shop".into(),
            path: "Modules/Shop".into(),
            provider: "Modules\\Shop\\Providers\\ShopServiceProvider".into(),
            admin_panel: true,
            permission_seeder: Some("Modules\\Shop\\Database\\Seeders\\ShopPermissionSeeder".into()),
            permissions: vec!["view_any_product".into(), "view_product".into()],
        }
    }
}
