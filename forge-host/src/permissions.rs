//! Registration of a module's permissions with the host's authorization store.

use eyre::Result;

use crate::{ArtisanRunner, HostModule};

/// Where permissions end up.
pub trait PermissionStore {
    /// Register every permission of `module`, returning the names registered.
    fn register(&self, module: &HostModule) -> Result<Vec<String>>;
}

/// Registers permissions by running the module's generated permission seeder.
///
/// The seeder uses `firstOrCreate`, so registering twice is harmless.
pub struct SeederPermissionStore<'a> {
    runner: &'a dyn ArtisanRunner,
}

impl<'a> SeederPermissionStore<'a> {
    pub fn new(runner: &'a dyn ArtisanRunner) -> Self {
        Self { runner }
    }
}

impl PermissionStore for SeederPermissionStore<'_> {
    fn register(&self, module: &HostModule) -> Result<Vec<String>> {
        let Some(seeder) = &module.permission_seeder else {
            tracing::debug!(module = %module.name, "permissions disabled");
            return Ok(Vec::new());
        };
        let class = format!("--class={}", seeder);
        self.runner.artisan(&["db:seed", &class, "--force"])?;
        tracing::info!(
            module = %module.name,
            count = module.permissions.len(),
            "registered permissions"
        );
        Ok(module.permissions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DryRunner;

    #[test]
    fn test_runs_permission_seeder() {
        let runner = DryRunner::new();
        let registered = SeederPermissionStore::new(&runner)
            .register(&HostModule::shop())
            .unwrap();
        assert_eq!(registered.len(), 2);
        assert_eq!(
            runner.commands(),
            vec![
                "php artisan db:seed --class=Modules\\Shop\\Database\\Seeders\\ShopPermissionSeeder --force"
            ]
        );
    }

    #[test]
    fn test_disabled_permissions_run_nothing() {
        let runner = DryRunner::new();
        let mut module = HostModule::shop();
        module.permission_seeder = None;
        assert!(SeederPermissionStore::new(&runner).register(&module).unwrap().is_empty());
        assert!(runner.commands().is_empty());
    }
}
