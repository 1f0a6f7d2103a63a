//! Permissions operation - list a module's permissions, optionally registering them.

use eyre::{Result, WrapErr, eyre};
use modforge_codegen_laravel::{GUARD, permissions_for};
use modforge_host::{ArtisanRunner, HostModule, PermissionStore, SeederPermissionStore};
use modforge_manifest::Manifest;

use super::compile;
use crate::reports::{PermissionsReport, ResourcePermissions};

/// Execute the permissions operation.
///
/// With a runner the module's permission seeder is run in the host, which
/// must already contain the generated module.
pub fn permissions(
    manifest: &Manifest,
    modules_dir: &str,
    sync: Option<&dyn ArtisanRunner>,
) -> Result<PermissionsReport> {
    let generator = compile(manifest, None)?;
    let module = generator.module();

    let resources = module
        .tables
        .iter()
        .map(|table| ResourcePermissions {
            model: table.model().to_string(),
            permissions: permissions_for(table.model()),
        })
        .collect();

    let registered = match sync {
        Some(runner) => {
            let host_module = HostModule::from_generator(&generator, modules_dir);
            if host_module.permission_seeder.is_none() {
                return Err(eyre!(
                    "module {} does not generate permissions",
                    module.meta.name
                ));
            }
            let names = SeederPermissionStore::new(runner)
                .register(&host_module)
                .wrap_err("failed to register permissions")?;
            Some(names)
        }
        None => None,
    };

    Ok(PermissionsReport {
        module: module.meta.name.clone(),
        guard: GUARD,
        enabled: module.features.permissions,
        resources,
        registered,
    })
}

#[cfg(test)]
mod tests {
    use modforge_host::DryRunner;

    use super::*;

    fn manifest(permissions: bool) -> Manifest {
        format!(
            r#"
[module]
name = "Shop"
permissions = {permissions}

[[tables]]
name = "order_items"
"#
        )
        .parse()
        .unwrap()
    }

    #[test]
    fn test_lists_permissions_per_resource() {
        let report = permissions(&manifest(true), "Modules", None).unwrap();
        assert_eq!(report.resources.len(), 1);
        assert_eq!(report.resources[0].model, "OrderItem");
        assert_eq!(report.resources[0].permissions[0], "view_any_order_item");
        assert_eq!(report.resources[0].permissions.len(), 11);
        assert!(report.registered.is_none());
    }

    #[test]
    fn test_sync_runs_seeder() {
        let runner = DryRunner::new();
        let report = permissions(&manifest(true), "Modules", Some(&runner)).unwrap();
        assert_eq!(report.registered.map(|r| r.len()), Some(11));
        assert_eq!(runner.commands().len(), 1);
    }

    #[test]
    fn test_sync_without_permissions_fails() {
        let runner = DryRunner::new();
        assert!(permissions(&manifest(false), "Modules", Some(&runner)).is_err());
        assert!(runner.commands().is_empty());
    }
}
