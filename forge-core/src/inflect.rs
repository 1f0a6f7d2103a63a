//! English inflection for table and model names.
//!
//! Only the last word of a compound identifier is inflected, so
//! `order_item` becomes `order_items` and `OrderItem` becomes `OrderItems`.

const UNCOUNTABLE: &[&str] = &[
    "audio",
    "data",
    "deer",
    "equipment",
    "feedback",
    "fish",
    "information",
    "metadata",
    "money",
    "news",
    "rice",
    "series",
    "sheep",
    "species",
    "staff",
];

/// (singular, plural)
const IRREGULAR: &[(&str, &str)] = &[
    ("cache", "caches"),
    ("child", "children"),
    ("echo", "echoes"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("half", "halves"),
    ("hero", "heroes"),
    ("knife", "knives"),
    ("leaf", "leaves"),
    ("life", "lives"),
    ("man", "men"),
    ("medium", "media"),
    ("mouse", "mice"),
    ("movie", "movies"),
    ("ox", "oxen"),
    ("person", "people"),
    ("potato", "potatoes"),
    ("shelf", "shelves"),
    ("shoe", "shoes"),
    ("tomato", "tomatoes"),
    ("tooth", "teeth"),
    ("wife", "wives"),
    ("wolf", "wolves"),
    ("woman", "women"),
];

/// Split an identifier into (head, last word).
fn split_last_word(s: &str) -> (&str, &str) {
    let mut start = 0;
    let mut prev_lower = false;
    for (i, c) in s.char_indices() {
        if c == '_' || c == '-' || c == ' ' {
            start = i + c.len_utf8();
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower {
            start = i;
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
    }
    s.split_at(start)
}

/// Re-apply the casing of `original` to an inflected lowercase word.
fn match_case(original: &str, inflected: &str) -> String {
    if original.chars().all(|c| !c.is_lowercase()) && original.len() > 1 {
        return inflected.to_uppercase();
    }
    match original.chars().next() {
        Some(first) if first.is_uppercase() => {
            let mut chars = inflected.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
        _ => inflected.to_string(),
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn plural_word(word: &str) -> String {
    if UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(s, p)| *s == word || *p == word) {
        return plural.to_string();
    }
    if let Some(stem) = word.strip_suffix("quiz") {
        return format!("{stem}quizzes");
    }
    if let Some(stem) = word.strip_suffix('y')
        && stem.chars().last().is_some_and(|c| !is_vowel(c))
    {
        return format!("{stem}ies");
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|s| word.ends_with(s)) {
        return format!("{word}es");
    }
    if let Some(stem) = word.strip_suffix("fe") {
        return format!("{stem}ves");
    }
    format!("{word}s")
}

fn singular_word(word: &str) -> String {
    if UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((singular, _)) = IRREGULAR.iter().find(|(s, p)| *p == word || *s == word) {
        return singular.to_string();
    }
    if let Some(stem) = word.strip_suffix("quizzes") {
        return format!("{stem}quiz");
    }
    if let Some(stem) = word.strip_suffix("ies")
        && !stem.is_empty()
    {
        return format!("{stem}y");
    }
    for suffix in ["sses", "xes", "zes", "ches", "shes", "uses"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if ["ss", "us", "is"].iter().any(|s| word.ends_with(s)) {
        return word.to_string();
    }
    match word.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => word.to_string(),
    }
}

/// Pluralize the last word of an identifier (e.g., "category" -> "categories")
pub fn pluralize(s: &str) -> String {
    let (head, last) = split_last_word(s);
    if last.is_empty() {
        return s.to_string();
    }
    let inflected = plural_word(&last.to_lowercase());
    format!("{head}{}", match_case(last, &inflected))
}

/// Singularize the last word of an identifier (e.g., "order_items" -> "order_item")
pub fn singularize(s: &str) -> String {
    let (head, last) = split_last_word(s);
    if last.is_empty() {
        return s.to_string();
    }
    let inflected = singular_word(&last.to_lowercase());
    format!("{head}{}", match_case(last, &inflected))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pluralize_regular() {
        assert_eq!(pluralize("product"), "products");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("status"), "statuses");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("branch"), "branches");
        assert_eq!(pluralize("address"), "addresses");
    }

    #[test]
    fn test_pluralize_irregular_and_uncountable() {
        assert_eq!(pluralize("person"), "people");
        assert_eq!(pluralize("child"), "children");
        assert_eq!(pluralize("equipment"), "equipment");
        assert_eq!(pluralize("people"), "people");
    }

    #[test]
    fn test_pluralize_compound() {
        assert_eq!(pluralize("order_item"), "order_items");
        assert_eq!(pluralize("OrderItem"), "OrderItems");
        assert_eq!(pluralize("ProductCategory"), "ProductCategories");
        assert_eq!(pluralize("SalesPerson"), "SalesPeople");
    }

    #[test]
    fn test_singularize_regular() {
        assert_eq!(singularize("products"), "product");
        assert_eq!(singularize("categories"), "category");
        assert_eq!(singularize("statuses"), "status");
        assert_eq!(singularize("status"), "status");
        assert_eq!(singularize("addresses"), "address");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("tags"), "tag");
    }

    #[test]
    fn test_singularize_irregular() {
        assert_eq!(singularize("people"), "person");
        assert_eq!(singularize("movies"), "movie");
        assert_eq!(singularize("caches"), "cache");
        assert_eq!(singularize("news"), "news");
    }

    #[test]
    fn test_singularize_compound() {
        assert_eq!(singularize("order_items"), "order_item");
        assert_eq!(singularize("blog_categories"), "blog_category");
        assert_eq!(singularize("OrderItems"), "OrderItem");
    }

    #[test]
    fn test_inflection_is_reversible_for_table_names() {
        for table in ["products", "categories", "order_items", "tags", "invoices"] {
            assert_eq!(pluralize(&singularize(table)), table);
        }
    }
}
