//! TOML section manipulation utilities.
//!
//! The edit flows append fields and relationships to forge.toml at the
//! section level, preserving the formatting and comments of everything else.

use super::{Field, Relationship};
use crate::{Error, Result};

/// Render a `[[tables.fields]]` block for a field.
///
/// # Examples
///
/// ```
/// use modforge_manifest::{Field, FieldType, render_field_block};
///
/// let block = render_field_block(&Field::new("weight", FieldType::Decimal)).unwrap();
/// assert_eq!(block, "[[tables.fields]]\nname = \"weight\"\ntype = \"decimal\"\n");
/// ```
pub fn render_field_block(field: &Field) -> Result<String> {
    let body = toml::to_string(field).map_err(|source| Box::new(Error::Serialize { source }))?;
    Ok(format!("[[tables.fields]]\n{}", body))
}

fn render_relationship_block(relationship: &Relationship) -> Result<String> {
    let body =
        toml::to_string(relationship).map_err(|source| Box::new(Error::Serialize { source }))?;
    Ok(format!("[[relationships]]\n{}", body))
}

/// Whether a line declares the `name` key with the given value.
fn declares_name(line: &str, name: &str) -> bool {
    let Some((key, value)) = line.split_once('=') else {
        return false;
    };
    key.trim() == "name" && value.trim().trim_matches(|c| c == '"' || c == '\'') == name
}

/// Insert a field block at the end of the `[[tables]]` entry named `table`.
///
/// Returns `None` when no such table section exists in `content`.
pub fn append_field_block(content: &str, table: &str, block: &str) -> Option<String> {
    let lines: Vec<&str> = content.lines().collect();

    // Locate the [[tables]] header whose own keys declare the table name
    let mut table_start = None;
    let mut current_table = None;
    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed == "[[tables]]" {
            current_table = Some(i);
        } else if trimmed.starts_with('[') {
            current_table = None;
        } else if let Some(start) = current_table
            && declares_name(trimmed, table)
        {
            table_start = Some(start);
            break;
        }
    }
    let start = table_start?;

    // The entry ends at the next header that is not one of its own field blocks
    let end = lines
        .iter()
        .enumerate()
        .skip(start + 1)
        .find(|(_, line)| {
            let trimmed = line.trim();
            trimmed.starts_with('[') && trimmed != "[[tables.fields]]"
        })
        .map(|(i, _)| i)
        .unwrap_or(lines.len());

    // Keep blank lines that separate the entry from the next section after the insert
    let mut insert_at = end;
    while insert_at > start + 1 && lines[insert_at - 1].trim().is_empty() {
        insert_at -= 1;
    }

    let mut result: Vec<String> = lines[..insert_at].iter().map(|l| l.to_string()).collect();
    result.push(String::new());
    result.extend(block.trim_end().lines().map(str::to_string));
    result.extend(lines[insert_at..].iter().map(|l| l.to_string()));

    Some(format!("{}\n", result.join("\n")))
}

/// Append a `[[relationships]]` block with proper spacing.
pub fn append_relationship_block(content: &str, relationship: &Relationship) -> Result<String> {
    let section = render_relationship_block(relationship)?;
    Ok(format!("{}\n\n{}\n", content.trim_end(), section.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldType, Manifest, RelationType};

    const CONTENT: &str = r#"[module]
name = "Shop"

# Storefront products
[[tables]]
name = "products"

[[tables.fields]]
name = "name"
type = "string"

[[tables]]
name = "tags"

[[relationships]]
from = "products"
to = "tags"
type = "belongsToMany"
"#;

    #[test]
    fn test_append_field_block_inside_table() {
        let block = render_field_block(&Field::new("weight", FieldType::Decimal)).unwrap();
        let result = append_field_block(CONTENT, "products", &block).unwrap();

        let weight = result.find("name = \"weight\"").unwrap();
        let tags = result.find("name = \"tags\"").unwrap();
        assert!(weight < tags);
        assert!(result.contains("# Storefront products"));

        let manifest: Manifest = result.parse().unwrap();
        let fields: Vec<_> = manifest.tables[0]
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(fields, vec!["name", "weight"]);
        assert!(manifest.tables[1].fields.is_empty());
    }

    #[test]
    fn test_append_field_block_last_table() {
        let block = render_field_block(&Field::new("label", FieldType::String)).unwrap();
        let result = append_field_block(CONTENT, "tags", &block).unwrap();

        let manifest: Manifest = result.parse().unwrap();
        assert_eq!(manifest.tables[1].fields[0].name, "label");
        assert_eq!(manifest.relationships.len(), 1);
    }

    #[test]
    fn test_append_field_block_unknown_table() {
        assert!(append_field_block(CONTENT, "orders", "[[tables.fields]]").is_none());
    }

    #[test]
    fn test_field_name_is_not_a_table_name() {
        // "name" is a field of products, not a table
        assert!(append_field_block(CONTENT, "name", "[[tables.fields]]").is_none());
    }

    #[test]
    fn test_append_relationship_block() {
        let mut rel = Relationship::new("tags", RelationType::BelongsToMany, "products");
        rel.name = Some("products".into());
        let result = append_relationship_block(CONTENT, &rel).unwrap();

        let manifest: Manifest = result.parse().unwrap();
        assert_eq!(manifest.relationships.len(), 2);
        assert_eq!(manifest.relationships[1].from, "tags");
    }
}
