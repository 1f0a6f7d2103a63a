//! Laravel type mapper implementation.
//!
//! One exhaustive match per projection: migration column, Filament form
//! input, Filament table column, factory value and Eloquent cast.

use modforge_codegen::{builder::MethodChain, language::TypeMapper};
use modforge_core::{headline, php_string, singularize, to_studly_case};
use modforge_ir::{DefaultValue, FieldIR, FieldKind, ForeignAction, ForeignKeyIR};

const FORMS: &str = "Forms\\Components";
const TABLES: &str = "Tables\\Columns";

/// Laravel/Filament type mapper.
#[derive(Debug, Clone)]
pub struct LaravelTypeMapper {
    currency: String,
}

impl LaravelTypeMapper {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
        }
    }

    /// `$table->decimal('price', 10, 2)` without modifiers.
    fn column_head(&self, field: &FieldIR) -> String {
        let name = php_string(&field.name);
        let call = match &field.kind {
            FieldKind::String { length } => format!("string({}, {})", name, length),
            FieldKind::Char { length } => format!("char({}, {})", name, length),
            FieldKind::Text => format!("text({})", name),
            FieldKind::MediumText => format!("mediumText({})", name),
            FieldKind::LongText | FieldKind::RichText => format!("longText({})", name),
            FieldKind::Integer => format!("integer({})", name),
            FieldKind::BigInteger => format!("bigInteger({})", name),
            FieldKind::SmallInteger => format!("smallInteger({})", name),
            FieldKind::TinyInteger => format!("tinyInteger({})", name),
            FieldKind::Decimal { precision, scale } => {
                format!("decimal({}, {}, {})", name, precision, scale)
            }
            FieldKind::Float => format!("float({})", name),
            FieldKind::Double => format!("double({})", name),
            FieldKind::Boolean => format!("boolean({})", name),
            FieldKind::Date => format!("date({})", name),
            FieldKind::DateTime => format!("dateTime({})", name),
            FieldKind::Timestamp => format!("timestamp({})", name),
            FieldKind::Time => format!("time({})", name),
            FieldKind::Year => format!("year({})", name),
            FieldKind::Json => format!("json({})", name),
            FieldKind::Enum(values) => format!("enum({}, {})", name, php_list(values.iter())),
            FieldKind::ForeignId(_) => format!("foreignId({})", name),
            FieldKind::Uuid => format!("uuid({})", name),
            FieldKind::Color => format!("string({}, 7)", name),
            FieldKind::File
            | FieldKind::Image
            | FieldKind::Email
            | FieldKind::Url
            | FieldKind::Password
            | FieldKind::Slug => format!("string({})", name),
        };
        format!("$table->{}", call)
    }

    fn is_money(&self, field: &FieldIR) -> bool {
        matches!(field.kind, FieldKind::Decimal { .. }) && is_money_name(&field.name)
    }
}

impl Default for LaravelTypeMapper {
    fn default() -> Self {
        Self::new("USD")
    }
}

impl TypeMapper for LaravelTypeMapper {
    fn target(&self) -> &'static str {
        "laravel"
    }

    fn column(&self, field: &FieldIR) -> String {
        let unsigned = field.unsigned
            && field.kind.is_numeric()
            && !matches!(field.kind, FieldKind::ForeignId(_));

        let mut chain = MethodChain::new(self.column_head(field))
            .call_if(field.nullable, "nullable")
            .call_if(field.unique, "unique")
            .call_if(unsigned, "unsigned")
            .when(field.default.is_some(), |c| {
                let value = field.default.as_ref().map(php_default).unwrap_or_default();
                c.call_with("default", [value])
            })
            .call_if(field.index && !field.unique, "index");

        if let FieldKind::ForeignId(fk) = &field.kind {
            chain = constrained(chain, fk);
        }
        format!("{};", chain.inline())
    }

    fn form_input(&self, field: &FieldIR) -> MethodChain {
        let name = php_string(&field.name);
        let make = |class: &str| MethodChain::make(&format!("{}\\{}", FORMS, class), &name);

        let input = match &field.kind {
            FieldKind::String { .. } | FieldKind::Char { .. } | FieldKind::Slug => {
                make("TextInput")
            }
            FieldKind::Email => make("TextInput").call("email"),
            FieldKind::Url => make("TextInput").call("url"),
            FieldKind::Password => make("TextInput").call("password").call("revealable"),
            FieldKind::Uuid => make("TextInput").call("uuid"),
            FieldKind::Text | FieldKind::MediumText | FieldKind::LongText => make("Textarea")
                .call_with("rows", ["4"])
                .call("columnSpanFull"),
            FieldKind::RichText => make("RichEditor").call("columnSpanFull"),
            FieldKind::Integer
            | FieldKind::BigInteger
            | FieldKind::SmallInteger
            | FieldKind::TinyInteger => make("TextInput").call("numeric").call("integer"),
            FieldKind::Year => make("TextInput")
                .call("numeric")
                .call_with("minValue", ["1901"])
                .call_with("maxValue", ["2155"]),
            FieldKind::Decimal { scale, .. } => make("TextInput")
                .call("numeric")
                .call_with("step", [step(*scale)])
                .when(self.is_money(field), |c| {
                    c.call_with("prefix", [php_string(&self.currency)])
                }),
            FieldKind::Float | FieldKind::Double => make("TextInput").call("numeric"),
            FieldKind::Boolean => make("Toggle"),
            FieldKind::Date => make("DatePicker"),
            FieldKind::DateTime | FieldKind::Timestamp => make("DateTimePicker"),
            FieldKind::Time => make("TimePicker"),
            FieldKind::Json => make("KeyValue").call("columnSpanFull"),
            FieldKind::Enum(values) => make("Select").call_with(
                "options",
                [php_map(values.iter().map(|v| (v.to_string(), headline(v))))],
            ),
            FieldKind::ForeignId(_) => make("TextInput").call("numeric"),
            FieldKind::File => {
                make("FileUpload").call_with("directory", [php_string(&field.name)])
            }
            FieldKind::Image => make("FileUpload")
                .call("image")
                .call_with("directory", [php_string(&field.name)]),
            FieldKind::Color => make("ColorPicker"),
        };

        let max_length = match field.kind {
            FieldKind::String { .. }
            | FieldKind::Char { .. }
            | FieldKind::Slug
            | FieldKind::Email
            | FieldKind::Url
            | FieldKind::Password => field.kind.max_length(),
            _ => None,
        };

        let input = input.call_if(field.required, "required");
        let input = match max_length {
            Some(length) => input.call_with("maxLength", [length.to_string()]),
            None => input,
        };
        input
            .when(field.unique, |c| c.call_with("unique", ["ignoreRecord: true"]))
            .when(
                field.default.is_some() && !matches!(field.kind, FieldKind::Json),
                |c| {
                    let value = field.default.as_ref().map(php_default).unwrap_or_default();
                    c.call_with("default", [value])
                },
            )
    }

    fn table_column(&self, field: &FieldIR) -> Option<MethodChain> {
        let name = php_string(&field.name);
        let make = |class: &str| MethodChain::make(&format!("{}\\{}", TABLES, class), &name);

        let column = match &field.kind {
            FieldKind::String { .. }
            | FieldKind::Char { .. }
            | FieldKind::Email
            | FieldKind::Url
            | FieldKind::Slug
            | FieldKind::Uuid => make("TextColumn").call("searchable"),
            FieldKind::Text | FieldKind::MediumText | FieldKind::LongText | FieldKind::RichText => {
                make("TextColumn")
                    .call_with("limit", ["50"])
                    .call_with("toggleable", ["isToggledHiddenByDefault: true"])
            }
            FieldKind::Integer
            | FieldKind::BigInteger
            | FieldKind::SmallInteger
            | FieldKind::TinyInteger
            | FieldKind::Float
            | FieldKind::Double
            | FieldKind::ForeignId(_) => make("TextColumn").call("numeric").call("sortable"),
            FieldKind::Year => make("TextColumn").call("sortable"),
            FieldKind::Decimal { scale, .. } => {
                if self.is_money(field) {
                    make("TextColumn")
                        .call_with("money", [php_string(&self.currency)])
                        .call("sortable")
                } else {
                    make("TextColumn")
                        .call_with("numeric", [format!("decimalPlaces: {}", scale)])
                        .call("sortable")
                }
            }
            FieldKind::Boolean => make("IconColumn").call("boolean"),
            FieldKind::Date => make("TextColumn").call("date").call("sortable"),
            FieldKind::DateTime | FieldKind::Timestamp => {
                make("TextColumn").call("dateTime").call("sortable")
            }
            FieldKind::Time => make("TextColumn").call("time").call("sortable"),
            FieldKind::Enum(_) => make("TextColumn").call("badge").call("searchable"),
            FieldKind::Image => make("ImageColumn"),
            FieldKind::File | FieldKind::Json => {
                make("TextColumn").call_with("toggleable", ["isToggledHiddenByDefault: true"])
            }
            FieldKind::Color => make("ColorColumn"),
            FieldKind::Password => return None,
        };
        Some(column)
    }

    fn factory_value(&self, field: &FieldIR) -> String {
        if let Some(value) = factory_value_by_name(field) {
            return value;
        }

        let fake = |method: &str| {
            if field.unique {
                format!("fake()->unique()->{}", method)
            } else {
                format!("fake()->{}", method)
            }
        };

        match &field.kind {
            FieldKind::String { length } if *length < 20 => {
                fake(&format!("lexify('{}')", "?".repeat((*length).clamp(1, 10) as usize)))
            }
            FieldKind::String { .. } => fake("words(3, true)"),
            FieldKind::Char { length } => {
                fake(&format!("lexify('{}')", "?".repeat((*length).clamp(1, 10) as usize)))
            }
            FieldKind::Text | FieldKind::MediumText | FieldKind::LongText => fake("paragraph()"),
            FieldKind::RichText => fake("paragraphs(3, true)"),
            FieldKind::Integer | FieldKind::BigInteger | FieldKind::SmallInteger => {
                fake("numberBetween(1, 1000)")
            }
            FieldKind::TinyInteger => fake("numberBetween(0, 100)"),
            FieldKind::Year => fake("year()"),
            FieldKind::Decimal { precision, scale } => {
                fake(&format!("randomFloat({}, 0, {})", scale, decimal_max(*precision, *scale)))
            }
            FieldKind::Float | FieldKind::Double => fake("randomFloat(2, 0, 1000)"),
            FieldKind::Boolean => "fake()->boolean()".to_string(),
            FieldKind::Date => fake("date()"),
            FieldKind::DateTime | FieldKind::Timestamp => fake("dateTime()"),
            FieldKind::Time => fake("time()"),
            FieldKind::Json => "[]".to_string(),
            FieldKind::Enum(values) => {
                format!("fake()->randomElement({})", php_list(values.iter()))
            }
            FieldKind::ForeignId(fk) => foreign_factory_value(fk),
            FieldKind::Uuid => fake("uuid()"),
            FieldKind::File => format!("{} . '.pdf'", fake("uuid()")),
            FieldKind::Image => fake("imageUrl()"),
            FieldKind::Email => fake("safeEmail()"),
            FieldKind::Url => fake("url()"),
            FieldKind::Password => "bcrypt('password')".to_string(),
            FieldKind::Color => fake("hexColor()"),
            FieldKind::Slug => "fake()->unique()->slug()".to_string(),
        }
    }

    fn cast(&self, field: &FieldIR) -> Option<String> {
        let cast = match &field.kind {
            FieldKind::Boolean => "boolean".to_string(),
            FieldKind::Decimal { scale, .. } => format!("decimal:{}", scale),
            FieldKind::Float | FieldKind::Double => "float".to_string(),
            FieldKind::Integer
            | FieldKind::BigInteger
            | FieldKind::SmallInteger
            | FieldKind::TinyInteger
            | FieldKind::Year => "integer".to_string(),
            FieldKind::Date => "date".to_string(),
            FieldKind::DateTime | FieldKind::Timestamp => "datetime".to_string(),
            FieldKind::Json => "array".to_string(),
            FieldKind::Password => "hashed".to_string(),
            FieldKind::String { .. }
            | FieldKind::Char { .. }
            | FieldKind::Text
            | FieldKind::MediumText
            | FieldKind::LongText
            | FieldKind::Time
            | FieldKind::Enum(_)
            | FieldKind::ForeignId(_)
            | FieldKind::Uuid
            | FieldKind::File
            | FieldKind::Image
            | FieldKind::RichText
            | FieldKind::Email
            | FieldKind::Url
            | FieldKind::Color
            | FieldKind::Slug => return None,
        };
        Some(cast)
    }
}

/// Name heuristics checked before the type-based factory default.
fn factory_value_by_name(field: &FieldIR) -> Option<String> {
    if matches!(
        field.kind,
        FieldKind::Enum(_) | FieldKind::ForeignId(_) | FieldKind::Boolean | FieldKind::Json
    ) {
        return None;
    }

    let name = field.name.as_str();
    let unique = if field.unique { "unique()->" } else { "" };
    let value = match name {
        "name" | "full_name" => format!("fake()->{}name()", unique),
        "first_name" => "fake()->firstName()".to_string(),
        "last_name" => "fake()->lastName()".to_string(),
        "title" => format!("fake()->{}sentence(4)", unique),
        "email" => "fake()->unique()->safeEmail()".to_string(),
        "phone" | "phone_number" | "mobile" => "fake()->phoneNumber()".to_string(),
        "slug" => "fake()->unique()->slug()".to_string(),
        "description" | "summary" | "bio" => "fake()->paragraph()".to_string(),
        "content" | "body" => "fake()->paragraphs(3, true)".to_string(),
        "address" => "fake()->address()".to_string(),
        "city" => "fake()->city()".to_string(),
        "country" => "fake()->country()".to_string(),
        "zip" | "postcode" | "postal_code" => "fake()->postcode()".to_string(),
        "url" | "website" => "fake()->url()".to_string(),
        "sku" => "fake()->unique()->bothify('SKU-####-????')".to_string(),
        _ if is_money_name(name) => {
            let scale = match field.kind {
                FieldKind::Decimal { scale, .. } => scale,
                _ => 2,
            };
            format!("fake()->randomFloat({}, 1, 1000)", scale)
        }
        _ if name.ends_with("_number") || name.ends_with("_code") => {
            "fake()->unique()->bothify('??-######')".to_string()
        }
        _ => return None,
    };
    Some(value)
}

/// Money-like column names render as currency.
pub fn is_money_name(name: &str) -> bool {
    const MONEY: [&str; 10] = [
        "price", "total", "amount", "cost", "fee", "subtotal", "tax", "balance", "salary",
        "discount",
    ];
    MONEY
        .iter()
        .any(|m| name == *m || name.ends_with(&format!("_{}", m)))
}

fn foreign_factory_value(fk: &ForeignKeyIR) -> String {
    if fk.in_module {
        // Bound to the related factory by the factory renderer.
        return "null".to_string();
    }
    format!(
        "\\App\\Models\\{}::query()->inRandomOrder()->value({})",
        to_studly_case(&singularize(&fk.table)),
        php_string(&fk.column)
    )
}

fn constrained(chain: MethodChain, fk: &ForeignKeyIR) -> MethodChain {
    let args = if fk.column == "id" {
        vec![php_string(&fk.table)]
    } else {
        vec![php_string(&fk.table), php_string(&fk.column)]
    };
    let chain = chain.call_with("constrained", args);
    let chain = match fk.on_delete {
        Some(action) => chain.call(on_delete_method(action)),
        None => chain,
    };
    match fk.on_update {
        Some(action) => chain.call(on_update_method(action)),
        None => chain,
    }
}

fn on_delete_method(action: ForeignAction) -> &'static str {
    match action {
        ForeignAction::Cascade => "cascadeOnDelete",
        ForeignAction::Restrict => "restrictOnDelete",
        ForeignAction::SetNull => "nullOnDelete",
        ForeignAction::NoAction => "noActionOnDelete",
    }
}

fn on_update_method(action: ForeignAction) -> &'static str {
    match action {
        ForeignAction::Cascade => "cascadeOnUpdate",
        ForeignAction::Restrict => "restrictOnUpdate",
        ForeignAction::SetNull => "nullOnUpdate",
        ForeignAction::NoAction => "noActionOnUpdate",
    }
}

/// PHP literal for a column default.
pub fn php_default(value: &DefaultValue) -> String {
    match value {
        DefaultValue::String(s) => php_string(s),
        DefaultValue::Int(i) => i.to_string(),
        DefaultValue::Float(f) => f.to_string(),
        DefaultValue::Bool(b) => b.to_string(),
    }
}

/// `['a', 'b']`
pub fn php_list<'a>(values: impl Iterator<Item = &'a str>) -> String {
    let items: Vec<String> = values.map(php_string).collect();
    format!("[{}]", items.join(", "))
}

/// `['a' => 'A', 'b' => 'B']`
pub fn php_map(entries: impl Iterator<Item = (String, String)>) -> String {
    let items: Vec<String> = entries
        .map(|(k, v)| format!("{} => {}", php_string(&k), php_string(&v)))
        .collect();
    format!("[{}]", items.join(", "))
}

fn step(scale: u32) -> String {
    if scale == 0 {
        "1".to_string()
    } else {
        format!("0.{}1", "0".repeat(scale as usize - 1))
    }
}

fn decimal_max(precision: u32, scale: u32) -> u64 {
    let digits = precision.saturating_sub(scale).min(6);
    10u64.pow(digits).saturating_sub(1).max(1)
}
