//! Edit flows against a generated module, with and without a snapshot.

use std::fs;

use modforge_codegen::language::LanguageCodegen;
use modforge_codegen_laravel::{EditMode, LaravelGenerator, MigrationClock, ModuleEditor, Sidecar};
use modforge_manifest::{Field, FieldType, Manifest, RelationType, Relationship};
use tempfile::TempDir;

const SHOP: &str = r#"
[module]
name = "Shop"

[[tables]]
name = "categories"

[[tables.fields]]
name = "name"
type = "string"
required = true

[[tables]]
name = "tags"

[[tables.fields]]
name = "name"
type = "string"
required = true

[[tables]]
name = "products"

[[tables.fields]]
name = "name"
type = "string"
required = true

[[tables.fields]]
name = "price"
type = "decimal"
required = true

[[tables.fields]]
name = "category_id"
type = "foreign_id"
required = true
"#;

const ALTER: &str = "database/migrations/2024_02_01_120000_add_weight_to_products_table.php";

fn manifest() -> Manifest {
    SHOP.parse().unwrap()
}

fn generate() -> TempDir {
    let dir = TempDir::new().unwrap();
    LaravelGenerator::compile(manifest())
        .unwrap()
        .clock(MigrationClock::parse("2024_01_15_093000").unwrap())
        .generate(dir.path())
        .unwrap();
    dir
}

fn editor(dir: &TempDir) -> ModuleEditor {
    ModuleEditor::open(dir.path(), manifest())
        .unwrap()
        .clock(MigrationClock::parse("2024_02_01_120000").unwrap())
}

fn read(dir: &TempDir, path: &str) -> String {
    fs::read_to_string(dir.path().join(path)).unwrap()
}

fn weight() -> Vec<Field> {
    vec![Field::new("weight", FieldType::Decimal)]
}

fn assert_alter_migration(dir: &TempDir) {
    let migration = read(dir, ALTER);
    let (up, down) = migration.split_once("public function down(): void").unwrap();
    assert!(up.contains("Schema::table('products', function (Blueprint $table) {"));
    assert!(up.contains("$table->decimal('weight', 10, 2)->nullable();"));
    assert!(!up.contains("'price'"));
    assert!(down.contains("$table->dropColumn(['weight']);"));
    assert!(!down.contains("'price'"));
}

#[test]
fn test_add_field_with_snapshot() {
    let dir = generate();
    let editor = editor(&dir);
    assert_eq!(editor.mode(), EditMode::Snapshot);

    let outcome = editor.add_fields("products", weight()).unwrap();
    assert_eq!(outcome.mode, EditMode::Snapshot);
    assert!(outcome.warnings.is_empty());
    assert!(outcome.written.contains(&ALTER.to_string()));
    assert_alter_migration(&dir);

    let model = read(&dir, "app/Models/Product.php");
    assert!(model.contains(
        "        'name',\n        'price',\n        'category_id',\n        'weight',\n    ];"
    ));
    assert!(model.contains("'weight' => 'decimal:2',"));

    let resource = read(&dir, "app/Filament/Resources/ProductResource.php");
    let price = resource.find("TextInput::make('price')").unwrap();
    let weight = resource.find("TextInput::make('weight')").unwrap();
    let category = resource.find("Select::make('category_id')").unwrap();
    assert!(price < weight && weight < category);

    let factory = read(&dir, "database/factories/ProductFactory.php");
    assert!(factory.contains("'weight' => fake()->randomFloat(2, 0, "));

    let controller = read(&dir, "app/Http/Controllers/Api/ProductController.php");
    assert!(controller.contains("'weight' => ['nullable', 'numeric'],"));

    let sidecar = Sidecar::load(dir.path()).unwrap().unwrap();
    assert!(sidecar.manifest.table("products").unwrap().field("weight").is_some());
}

#[test]
fn test_add_field_without_snapshot_patches_files() {
    let dir = generate();
    fs::remove_file(Sidecar::path(dir.path())).unwrap();
    let before = read(&dir, "app/Filament/Resources/ProductResource.php");

    let editor = editor(&dir);
    assert_eq!(editor.mode(), EditMode::Patch);
    let outcome = editor.add_fields("products", weight()).unwrap();
    assert!(outcome.warnings.is_empty(), "{:?}", outcome.warnings);
    assert_alter_migration(&dir);

    let model = read(&dir, "app/Models/Product.php");
    assert!(model.contains(
        "        'name',\n        'price',\n        'category_id',\n        'weight',\n    ];"
    ));
    assert!(model.contains("'weight' => 'decimal:2',"));

    let resource = read(&dir, "app/Filament/Resources/ProductResource.php");
    let category = resource.find("Select::make('category_id')").unwrap();
    let weight = resource.find("TextInput::make('weight')").unwrap();
    assert!(category < weight);
    assert_eq!(
        resource.matches("TextInput::make(").count(),
        before.matches("TextInput::make(").count() + 1
    );
    assert!(resource.contains("TextColumn::make('weight')"));

    let factory = read(&dir, "database/factories/ProductFactory.php");
    assert!(factory.contains("'weight' => fake()->randomFloat(2, 0, "));

    assert!(!Sidecar::path(dir.path()).exists());
}

#[test]
fn test_unrecognized_file_is_left_alone() {
    let dir = generate();
    fs::remove_file(Sidecar::path(dir.path())).unwrap();
    let hand_edited = "<?php\n\nclass Product {}\n";
    fs::write(dir.path().join("app/Models/Product.php"), hand_edited).unwrap();

    let outcome = editor(&dir).add_fields("products", weight()).unwrap();

    assert_eq!(read(&dir, "app/Models/Product.php"), hand_edited);
    assert!(
        outcome
            .warnings
            .iter()
            .any(|w| w.contains("$fillable") && w.contains("app/Models/Product.php"))
    );
    assert!(dir.path().join(ALTER).exists());
}

#[test]
fn test_add_belongs_to_many_creates_pivot() {
    let dir = generate();
    let outcome = editor(&dir)
        .add_relation(Relationship::new("products", RelationType::BelongsToMany, "tags"))
        .unwrap();

    let pivot = "database/migrations/2024_02_01_121000_create_product_tag_table.php";
    assert!(outcome.written.contains(&pivot.to_string()), "{:?}", outcome.written);

    let model = read(&dir, "app/Models/Product.php");
    assert!(model.contains("public function tags(): BelongsToMany"));
    assert!(model.contains("use Illuminate\\Database\\Eloquent\\Relations\\BelongsToMany;"));
}

#[test]
fn test_add_relation_without_snapshot_inserts_method() {
    let dir = generate();
    fs::remove_file(Sidecar::path(dir.path())).unwrap();

    let outcome = editor(&dir)
        .add_relation(Relationship::new("categories", RelationType::HasMany, "products"))
        .unwrap();
    assert_eq!(outcome.mode, EditMode::Patch);

    let model = read(&dir, "app/Models/Category.php");
    assert!(model.contains("use Illuminate\\Database\\Eloquent\\Relations\\HasMany;"));
    let method = model.find("public function products(): HasMany").unwrap();
    assert!(method > model.find("protected $fillable").unwrap());
    assert!(model.trim_end().ends_with('}'));
    assert!(model.contains("return $this->hasMany(Product::class);"));
}

fn migrations_named(dir: &TempDir, suffix: &str) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir.path().join("database/migrations"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(suffix))
        .collect();
    names.sort();
    names
}

fn regenerate(dir: &TempDir, manifest: Manifest) {
    LaravelGenerator::compile(manifest)
        .unwrap()
        .clock(MigrationClock::parse("2024_03_01_080000").unwrap())
        .generate(dir.path())
        .unwrap();
}

#[test]
fn test_regenerate_after_add_field_defines_column_once() {
    let dir = generate();
    let outcome = editor(&dir).add_fields("products", weight()).unwrap();

    regenerate(&dir, outcome.manifest);

    let creates = migrations_named(&dir, "_create_products_table.php");
    assert_eq!(creates.len(), 1, "{creates:?}");
    assert!(creates[0].starts_with("2024_01_15_"));
    let create = read(&dir, &format!("database/migrations/{}", creates[0]));
    assert!(create.contains("'price'"));
    assert!(!create.contains("'weight'"));

    assert_alter_migration(&dir);
    let sidecar = Sidecar::load(dir.path()).unwrap().unwrap();
    assert_eq!(sidecar.migrations.alterations.len(), 1);
    assert_eq!(sidecar.migrations.alterations[0].timestamp, "2024_02_01_120000");
}

#[test]
fn test_regenerate_after_add_relation_keeps_pivot_migration() {
    let dir = generate();
    let outcome = editor(&dir)
        .add_relation(Relationship::new("products", RelationType::BelongsToMany, "tags"))
        .unwrap();

    regenerate(&dir, outcome.manifest);

    assert_eq!(
        migrations_named(&dir, "_create_product_tag_table.php"),
        vec!["2024_02_01_121000_create_product_tag_table.php"]
    );
}
