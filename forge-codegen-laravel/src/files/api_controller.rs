use std::path::{Path, PathBuf};

use modforge_codegen::builder::CodeBuilder;
use modforge_core::{GeneratedFile, php_string};
use modforge_ir::{FieldIR, FieldKind, TableIR};

use crate::{PhpFile, RenderContext, type_mapper::php_list};

/// `app/Http/Controllers/Api/<Model>Controller.php`
///
/// Standard REST actions with request validation derived from the fields.
pub struct ApiController<'a> {
    ctx: RenderContext<'a>,
    table: &'a TableIR,
}

impl<'a> ApiController<'a> {
    pub fn new(ctx: RenderContext<'a>, table: &'a TableIR) -> Self {
        Self { ctx, table }
    }

    /// Validation rule list for each field, in field order.
    pub fn rules(&self) -> Vec<(String, Vec<String>)> {
        self.table
            .fields
            .iter()
            .map(|f| (f.name.clone(), validation_rules(&self.table.name, f)))
            .collect()
    }
}

impl GeneratedFile for ApiController<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join("app")
            .join("Http")
            .join("Controllers")
            .join("Api")
            .join(format!("{}.php", self.table.names.controller))
    }

    fn render(&self) -> String {
        let model = self.table.model();
        let var = format!("${}", self.table.names.variable);
        let rules = self.rules();
        let uses_rule = rules
            .iter()
            .any(|(_, r)| r.iter().any(|rule| rule.starts_with("Rule::")));

        let body = CodeBuilder::php()
            .brace_block(
                &format!("class {} extends Controller", self.table.names.controller),
                |b| {
                    b.brace_block("public function index(Request $request): JsonResponse", |b| {
                        b.line(&format!(
                            "return response()->json({}::query()->paginate($request->integer('per_page', 15)));",
                            model
                        ))
                    })
                    .blank()
                    .brace_block("public function store(Request $request): JsonResponse", |b| {
                        b.line(&format!(
                            "{} = {}::create($request->validate($this->rules()));",
                            var, model
                        ))
                        .blank()
                        .line(&format!("return response()->json({}, 201);", var))
                    })
                    .blank()
                    .brace_block(
                        &format!("public function show({} {}): JsonResponse", model, var),
                        |b| b.line(&format!("return response()->json({});", var)),
                    )
                    .blank()
                    .brace_block(
                        &format!(
                            "public function update(Request $request, {} {}): JsonResponse",
                            model, var
                        ),
                        |b| {
                            b.line(&format!(
                                "{}->update($request->validate($this->rules({})));",
                                var, var
                            ))
                            .blank()
                            .line(&format!("return response()->json({});", var))
                        },
                    )
                    .blank()
                    .brace_block(
                        &format!("public function destroy({} {}): JsonResponse", model, var),
                        |b| {
                            b.line(&format!("{}->delete();", var))
                                .blank()
                                .line("return response()->json(null, 204);")
                        },
                    )
                    .blank()
                    .doc_block(&["@return array<string, mixed>"])
                    .brace_block(
                        &format!("protected function rules(?{} $record = null): array", model),
                        |b| {
                            b.block_with_close("return [", "];", |b| {
                                b.each(&rules, |b, (name, rules)| {
                                    b.line(&format!(
                                        "{} => [{}],",
                                        php_string(name),
                                        rules.join(", ")
                                    ))
                                })
                            })
                        },
                    )
                },
            )
            .build();

        PhpFile::new()
            .namespace(self.ctx.ns("Http\\Controllers\\Api"))
            .use_classes([
                "Illuminate\\Http\\JsonResponse".to_string(),
                "Illuminate\\Http\\Request".to_string(),
                "Illuminate\\Routing\\Controller".to_string(),
                self.ctx.model_class(model),
            ])
            .use_class_if(uses_rule, "Illuminate\\Validation\\Rule")
            .add_code(&body)
            .render()
    }
}

/// Laravel validation rules for one field.
fn validation_rules(table: &str, field: &FieldIR) -> Vec<String> {
    let mut rules = vec![php_string(if field.required {
        "required"
    } else if field.nullable {
        "nullable"
    } else {
        "sometimes"
    })];

    let kind_rules: Vec<String> = match &field.kind {
        FieldKind::String { length } | FieldKind::Char { length } => {
            vec!["'string'".into(), format!("'max:{}'", length)]
        }
        FieldKind::Text
        | FieldKind::MediumText
        | FieldKind::LongText
        | FieldKind::RichText
        | FieldKind::Password => vec!["'string'".into()],
        FieldKind::Slug => vec!["'string'".into(), "'alpha_dash'".into(), "'max:255'".into()],
        FieldKind::Email => vec!["'email'".into(), "'max:255'".into()],
        FieldKind::Url => vec!["'url'".into(), "'max:255'".into()],
        FieldKind::Color => vec!["'hex_color'".into()],
        FieldKind::Integer
        | FieldKind::BigInteger
        | FieldKind::SmallInteger
        | FieldKind::TinyInteger
        | FieldKind::Year => vec!["'integer'".into()],
        FieldKind::Decimal { .. } | FieldKind::Float | FieldKind::Double => {
            vec!["'numeric'".into()]
        }
        FieldKind::Boolean => vec!["'boolean'".into()],
        FieldKind::Date | FieldKind::DateTime | FieldKind::Timestamp => vec!["'date'".into()],
        FieldKind::Time => vec!["'date_format:H:i:s'".into()],
        FieldKind::Json => vec!["'array'".into()],
        FieldKind::Enum(values) => vec![format!("Rule::in({})", php_list(values.iter()))],
        FieldKind::ForeignId(fk) => {
            vec![format!("'exists:{},{}'", fk.table, fk.column)]
        }
        FieldKind::Uuid => vec!["'uuid'".into()],
        FieldKind::File | FieldKind::Image => vec!["'string'".into(), "'max:255'".into()],
    };
    rules.extend(kind_rules);

    if field.unique {
        rules.push(format!(
            "Rule::unique({}, {})->ignore($record)",
            php_string(table),
            php_string(&field.name)
        ));
    }
    rules
}
