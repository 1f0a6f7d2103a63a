use std::{fs, path::Path};

use modforge_codegen_laravel::LaravelGenerator;
use modforge_host::{
    Change, DryRunner, HostError, HostIntegration, HostModule, InstallOptions,
    SeederPermissionStore, StatusRegistry,
};
use modforge_manifest::Manifest;

const MANIFEST: &str = r#"
[module]
name = "Shop"

[[tables]]
name = "products"

[[tables.fields]]
name = "name"
type = "string"
length = 255
required = true
"#;

const COMPOSER: &str = r#"{
    "name": "laravel/laravel",
    "autoload": {
        "psr-4": {
            "App\\": "app/"
        }
    }
}
"#;

const PROVIDERS: &str = "<?php\n\nreturn [\n    App\\Providers\\AppServiceProvider::class,\n];\n";

const PANEL: &str = r"<?php

namespace App\Providers\Filament;

class AdminPanelProvider extends PanelProvider
{
    public function panel(Panel $panel): Panel
    {
        return $panel
            ->id('admin')
            ->discoverResources(in: app_path('Filament/Resources'), for: 'App\\Filament\\Resources');
    }
}
";

fn host() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("composer.json"), COMPOSER).unwrap();
    fs::create_dir_all(root.join("bootstrap")).unwrap();
    fs::write(root.join("bootstrap/providers.php"), PROVIDERS).unwrap();
    fs::create_dir_all(root.join("app/Providers/Filament")).unwrap();
    fs::write(root.join("app/Providers/Filament/AdminPanelProvider.php"), PANEL).unwrap();
    dir
}

fn module() -> HostModule {
    let manifest: Manifest = MANIFEST.parse().unwrap();
    let generator = LaravelGenerator::compile(manifest).unwrap();
    HostModule::from_generator(&generator, "Modules")
}

fn read(root: &Path, file: &str) -> String {
    fs::read_to_string(root.join(file)).unwrap()
}

#[test]
fn test_module_identity_from_generator() {
    let module = module();
    assert_eq!(module.path, "Modules/Shop");
    assert_eq!(module.provider, "Modules\\Shop\\Providers\\ShopServiceProvider");
    assert_eq!(
        module.permission_seeder.as_deref(),
        Some("Modules\\Shop\\Database\\Seeders\\ShopPermissionSeeder")
    );
    assert_eq!(module.permissions.len(), 11);
}

#[test]
fn test_install_registers_everything_once() {
    let dir = host();
    let root = dir.path();
    let module = module();
    let runner = DryRunner::new();
    let store = SeederPermissionStore::new(&runner);
    let host = HostIntegration::new(root, &runner);

    let report = host
        .install(&module, Some(&store), InstallOptions::default())
        .unwrap();
    assert!(report.warnings.is_empty());
    assert!(report.changes.iter().all(|c| c.change == Change::Updated));
    assert_eq!(
        report.changes.iter().map(|c| c.file).collect::<Vec<_>>(),
        vec![
            "composer.json",
            "bootstrap/providers.php",
            "app/Providers/Filament/AdminPanelProvider.php",
            "modules_statuses.json",
        ]
    );
    assert_eq!(report.permissions.len(), 11);
    assert_eq!(
        runner.commands(),
        vec![
            "composer dump-autoload",
            "php artisan migrate --force",
            "php artisan optimize:clear",
            "php artisan db:seed --class=Modules\\Shop\\Database\\Seeders\\ShopPermissionSeeder --force",
        ]
    );

    let providers = read(root, "bootstrap/providers.php");
    assert!(providers.contains("    Modules\\Shop\\Providers\\ShopServiceProvider::class,\n];"));
    assert!(read(root, "composer.json").contains("\"Modules\\\\Shop\\\\\": \"Modules/Shop/app/\""));
    assert!(read(root, "app/Providers/Filament/AdminPanelProvider.php")
        .contains("base_path('Modules/Shop/app/Filament/Resources')"));
    assert_eq!(
        StatusRegistry::load(root).unwrap(),
        vec![("Shop".to_string(), true)]
    );

    // A second install leaves every host file untouched.
    let before = read(root, "bootstrap/providers.php");
    let again = host
        .install(&module, Some(&store), InstallOptions::default())
        .unwrap();
    assert!(again.changes.iter().all(|c| c.change == Change::Unchanged));
    assert_eq!(read(root, "bootstrap/providers.php"), before);
}

#[test]
fn test_without_admin_panel_skips_discovery() {
    let dir = host();
    let mut module = module();
    module.admin_panel = false;
    let runner = DryRunner::new();
    let report = HostIntegration::new(dir.path(), &runner)
        .install(&module, None, InstallOptions::default())
        .unwrap();
    assert_eq!(report.changes.len(), 3);
    assert_eq!(read(dir.path(), "app/Providers/Filament/AdminPanelProvider.php"), PANEL);
}

#[test]
fn test_migration_failure_is_fatal() {
    let dir = host();
    let runner = DryRunner::new().failing("migrate");
    let err = HostIntegration::new(dir.path(), &runner)
        .install(&module(), None, InstallOptions::default())
        .unwrap_err();
    assert!(err.to_string().contains("migrations of module Shop failed"));
    assert!(
        err.chain()
            .any(|e| matches!(e.downcast_ref::<HostError>(), Some(HostError::CommandFailed { .. })))
    );
}

#[test]
fn test_side_effect_failures_are_warnings() {
    let dir = host();
    let runner = DryRunner::new()
        .failing("optimize:clear")
        .failing("dump-autoload")
        .failing("db:seed");
    let store = SeederPermissionStore::new(&runner);
    let report = HostIntegration::new(dir.path(), &runner)
        .install(&module(), Some(&store), InstallOptions::default())
        .unwrap();
    assert_eq!(report.warnings.len(), 3);
    assert!(report.permissions.is_empty());
}

#[test]
fn test_missing_provider_list_is_fatal() {
    let dir = host();
    fs::remove_file(dir.path().join("bootstrap/providers.php")).unwrap();
    let runner = DryRunner::new();
    let err = HostIntegration::new(dir.path(), &runner)
        .install(&module(), None, InstallOptions::default())
        .unwrap_err();
    assert!(err.to_string().contains("bootstrap/providers.php"));
    assert!(runner.commands().is_empty());
}

#[test]
fn test_enable_and_disable() {
    let dir = host();
    let runner = DryRunner::new();
    let host = HostIntegration::new(dir.path(), &runner);
    host.set_enabled("Shop", true).unwrap();
    let report = host.set_enabled("Shop", false).unwrap();
    assert_eq!(report.changes[0].change, Change::Updated);
    assert_eq!(
        StatusRegistry::load(dir.path()).unwrap(),
        vec![("Shop".to_string(), false)]
    );
}
