//! Text patching of generated files for modules without a schema snapshot.
//!
//! Each patch locates a list literal by a regex anchored on its opening
//! bracket and splices entries in before the matching closing bracket.
//! A patch whose anchor is missing returns `None` and leaves the source
//! untouched.

use std::sync::LazyLock;

use regex::Regex;

/// `protected $fillable = [`
pub static FILLABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"protected\s+\$fillable\s*=\s*\[").unwrap());

/// `protected $casts = [` or a `casts(): array` method returning a list.
pub static CASTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"protected\s+\$casts\s*=\s*\[|function\s+casts\s*\(\s*\)\s*:\s*array\s*\{\s*return\s*\[",
    )
    .unwrap()
});

/// The form schema of a resource.
pub static FORM_SCHEMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"->schema\(\s*\[").unwrap());

/// The column list of a resource table.
pub static TABLE_COLUMNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"->columns\(\s*\[").unwrap());

/// The `definition()` array of a factory.
pub static FACTORY_DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"function\s+definition\s*\(\s*\)\s*:\s*array\s*\{\s*return\s*\[").unwrap()
});

/// The `rules()` array of an API controller.
pub static VALIDATION_RULES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"function\s+rules\s*\([^)]*\)\s*:\s*array\s*\{\s*return\s*\[").unwrap()
});

static USE_STATEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^use [^;]+;[ \t]*$").unwrap());

static NAMESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^namespace [^;]+;[ \t]*$").unwrap());

const INDENT: &str = "    ";

/// Index of the bracket closing the one at `open`, skipping string literals.
///
/// `open` must point at `[`, `(` or `{`.
pub fn matching_close(source: &str, open: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let (opener, closer) = match bytes.get(open)? {
        b'[' => (b'[', b']'),
        b'(' => (b'(', b')'),
        b'{' => (b'{', b'}'),
        _ => return None,
    };
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = open;
    while i < bytes.len() {
        let c = bytes[i];
        match quote {
            Some(q) => {
                if c == b'\\' {
                    i += 1;
                } else if c == q {
                    quote = None;
                }
            }
            None if c == b'\'' || c == b'"' => quote = Some(c),
            None if c == opener => depth += 1,
            None if c == closer => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            None => {}
        }
        i += 1;
    }
    None
}

fn line_start(source: &str, at: usize) -> usize {
    source[..at].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

fn leading_whitespace(line: &str) -> &str {
    let trimmed = line.trim_start_matches([' ', '\t']);
    &line[..line.len() - trimmed.len()]
}

/// Indent every line of `item` by `indent`, keeping blank lines empty.
fn indent_lines(item: &str, indent: &str) -> String {
    item.lines()
        .map(|line| {
            if line.trim().is_empty() {
                "\n".to_string()
            } else {
                format!("{}{}\n", indent, line)
            }
        })
        .collect()
}

/// Append `items` to the list opened by `anchor`.
///
/// Items are complete entries including their trailing comma and may span
/// several lines. The entries already in the list are not touched.
pub fn append_to_list(source: &str, anchor: &Regex, items: &[String]) -> Option<String> {
    let m = anchor.find(source)?;
    let open = m.end() - 1;
    let close = matching_close(source, open)?;
    if items.is_empty() {
        return Some(source.to_string());
    }

    let open_line = line_start(source, open);
    let base_indent = leading_whitespace(&source[open_line..]);
    let item_indent = format!("{}{}", base_indent, INDENT);
    let rendered: String = items.iter().map(|i| indent_lines(i, &item_indent)).collect();

    let inner = &source[open + 1..close];
    if inner.trim().is_empty() {
        return Some(format!(
            "{}[\n{}{}]{}",
            &source[..open],
            rendered,
            base_indent,
            &source[close + 1..]
        ));
    }

    let close_line = line_start(source, close);
    let before_close = &source[close_line..close];
    let needs_comma = !inner.trim_end().ends_with(',');

    if before_close.trim().is_empty() {
        // `]` on its own line: insert whole lines above it.
        let head = source[..close_line].trim_end_matches(['\n', ' ', '\t']);
        Some(format!(
            "{}{}\n{}{}",
            head,
            if needs_comma { "," } else { "" },
            rendered,
            &source[close_line..]
        ))
    } else {
        // Inline list (`['a', 'b']`): break it open before the bracket.
        let head = source[..close].trim_end();
        Some(format!(
            "{}{}\n{}{}{}",
            head,
            if needs_comma { "," } else { "" },
            rendered,
            base_indent,
            &source[close..]
        ))
    }
}

/// Insert a member before the closing brace of the last class in `source`.
pub fn insert_before_class_end(source: &str, member: &str) -> Option<String> {
    let close = source.rfind('}')?;
    let close_line = line_start(source, close);
    if !source[close_line..close].trim().is_empty() {
        return None;
    }
    let head = source[..close_line].trim_end_matches(['\n', ' ', '\t']);
    Some(format!(
        "{}\n\n{}{}",
        head,
        indent_lines(member, INDENT),
        &source[close_line..]
    ))
}

/// Add `use <class>;` unless the file already imports it.
pub fn ensure_use(source: &str, class: &str) -> String {
    let statement = format!("use {};", class);
    if source.lines().any(|l| l.trim() == statement) {
        return source.to_string();
    }
    let at = USE_STATEMENT
        .find_iter(source)
        .last()
        .or_else(|| NAMESPACE.find(source))
        .map(|m| m.end());
    match at {
        Some(at) => format!("{}\n{}{}", &source[..at], statement, &source[at..]),
        None => source.to_string(),
    }
}
