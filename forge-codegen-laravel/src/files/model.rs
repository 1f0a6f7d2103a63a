use std::path::{Path, PathBuf};

use modforge_codegen::{builder::CodeBuilder, language::TypeMapper};
use modforge_core::{GeneratedFile, php_string};
use modforge_ir::{RelationIR, RelationKind, RelationTarget, TableIR};

use crate::{PhpFile, RenderContext};

/// `app/Models/<Model>.php`
pub struct Model<'a> {
    ctx: RenderContext<'a>,
    table: &'a TableIR,
}

impl<'a> Model<'a> {
    pub fn new(ctx: RenderContext<'a>, table: &'a TableIR) -> Self {
        Self { ctx, table }
    }

    /// `'price' => 'decimal:2'` pairs in field order.
    pub fn casts(&self) -> Vec<(String, String)> {
        self.table
            .fields
            .iter()
            .filter_map(|f| self.ctx.mapper.cast(f).map(|cast| (f.name.clone(), cast)))
            .collect()
    }

    fn relations(&self) -> Vec<&'a RelationIR> {
        self.ctx.module.relations_from(&self.table.name).collect()
    }
}

impl GeneratedFile for Model<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join("app")
            .join("Models")
            .join(format!("{}.php", self.table.model()))
    }

    fn render(&self) -> String {
        let model = self.table.model();
        let features = self.ctx.module.features;
        let factory = self.table.names.factory.as_str();
        let fillable = self.ctx.fillable(self.table);
        let casts = self.casts();
        let relations = self.relations();

        let body = CodeBuilder::php()
            .brace_block(&format!("class {} extends Model", model), |b| {
                b.when(features.factories, |b| b.line("use HasFactory;"))
                    .when(self.table.soft_deletes, |b| b.line("use SoftDeletes;"))
                    .when(features.factories || self.table.soft_deletes, |b| b.blank())
                    .line(&format!("protected $table = {};", php_string(&self.table.name)))
                    .when(!self.table.timestamps, |b| {
                        b.blank().line("public $timestamps = false;")
                    })
                    .blank()
                    .block_with_close("protected $fillable = [", "];", |b| {
                        b.each(&fillable, |b, name| b.line(&format!("{},", php_string(name))))
                    })
                    .blank()
                    .when(casts.is_empty(), |b| b.line("protected $casts = [];"))
                    .when(!casts.is_empty(), |b| {
                        b.block_with_close("protected $casts = [", "];", |b| {
                            b.each(&casts, |b, (name, cast)| {
                                b.line(&format!("{} => {},", php_string(name), php_string(cast)))
                            })
                        })
                    })
                    .each(&relations, |b, relation| {
                        relation_method(b.blank(), relation)
                    })
                    .when(features.factories, |b| {
                        b.blank().brace_block(
                            &format!("protected static function newFactory(): {}", factory),
                            |b| b.line(&format!("return {}::new();", factory)),
                        )
                    })
            })
            .build();

        let relation_classes = relations.iter().filter(|r| renders_accessor(r)).map(|r| {
            format!("Illuminate\\Database\\Eloquent\\Relations\\{}", r.kind.class())
        });

        PhpFile::new()
            .namespace(self.ctx.ns("Models"))
            .use_class("Illuminate\\Database\\Eloquent\\Model")
            .use_class_if(
                features.factories,
                "Illuminate\\Database\\Eloquent\\Factories\\HasFactory",
            )
            .use_class_if(
                features.factories,
                format!("{}\\{}", self.ctx.ns("Database\\Factories"), factory),
            )
            .use_class_if(
                self.table.soft_deletes,
                "Illuminate\\Database\\Eloquent\\SoftDeletes",
            )
            .use_classes(relation_classes)
            .add_code(&body)
            .render()
    }
}

/// Whether the relationship renders a real accessor rather than a placeholder.
pub fn renders_accessor(relation: &RelationIR) -> bool {
    relation.kind == RelationKind::MorphTo || relation.related().is_some()
}

/// Render one relationship accessor method.
///
/// Only explicitly set keys are passed; omitted arguments fall back to
/// Eloquent conventions. An unresolved target renders a placeholder comment.
pub fn relation_method(b: CodeBuilder, relation: &RelationIR) -> CodeBuilder {
    if !renders_accessor(relation) {
        let reference = match &relation.target {
            RelationTarget::Unresolved { reference } => reference.as_str(),
            RelationTarget::Resolved(model) => model.model.as_str(),
        };
        return b.line(&format!(
            "// {}() {} {}: model is not part of this module",
            relation.method,
            relation.kind.method(),
            reference
        ));
    }

    b.brace_block(
        &format!(
            "public function {}(): {}",
            relation.method,
            relation.kind.class()
        ),
        |b| b.line(&format!("return $this->{};", relation_call(relation))),
    )
}

/// `belongsTo(Category::class, 'parent_id')`
pub fn relation_call(relation: &RelationIR) -> String {
    let related = relation
        .related()
        .map(|r| format!("{}::class", r.model))
        .unwrap_or_default();
    let key = |k: &Option<String>| k.as_deref().map(php_string);

    let mut args: Vec<Option<String>> = vec![Some(related)];
    match relation.kind {
        RelationKind::HasOne
        | RelationKind::HasMany
        | RelationKind::BelongsTo => {
            args.push(key(&relation.foreign_key));
            args.push(key(&relation.local_key));
        }
        RelationKind::BelongsToMany => {
            // (table, foreignPivotKey, relatedPivotKey); a self reference
            // spells out both keys since the convention would repeat one.
            let keys = relation
                .pivot_keys()
                .filter(|_| relation.is_self_referencing())
                .map(|(foreign, related)| (Some(foreign), Some(related)))
                .unwrap_or_else(|| (relation.foreign_key.clone(), relation.local_key.clone()));
            args.push(key(&relation.pivot_table));
            args.push(key(&keys.0));
            args.push(key(&keys.1));
        }
        RelationKind::MorphOne | RelationKind::MorphMany => {
            args.push(key(&relation.morph_name));
        }
        RelationKind::MorphToMany | RelationKind::MorphedByMany => {
            args.push(key(&relation.morph_name));
            args.push(key(&relation.pivot_table));
        }
        RelationKind::HasOneThrough | RelationKind::HasManyThrough => {
            args.push(relation.through.as_ref().map(|t| format!("{}::class", t.model)));
            args.push(key(&relation.foreign_key));
            args.push(key(&relation.local_key));
        }
        RelationKind::MorphTo => {
            let name = relation
                .morph_name
                .as_deref()
                .filter(|m| *m != relation.method)
                .map(php_string);
            return match name {
                Some(name) => format!("morphTo({})", name),
                None => "morphTo()".to_string(),
            };
        }
    }

    while matches!(args.last(), Some(None)) {
        args.pop();
    }
    let args: Vec<String> = args
        .into_iter()
        .map(|a| a.unwrap_or_else(|| "null".to_string()))
        .collect();

    let call = format!("{}({})", relation.kind.method(), args.join(", "));
    if relation.kind == RelationKind::BelongsToMany {
        format!("{}->withTimestamps()", call)
    } else {
        call
    }
}
