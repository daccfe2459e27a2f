//! Mermaid erDiagram exporter for introspected schemas.
//!
//! Output is one-way: diagrams drop nested field detail and unresolved
//! candidates, so metadata cannot be rebuilt from them.

use crate::graph::related_collections;
use crate::models::{Cardinality, CollectionSchema, DatabaseMetadata, FieldType, RelationshipEdge};
use std::collections::HashSet;

const INDENT: &str = "    ";
const ATTRIBUTE_INDENT: &str = "        ";

const COMPARISON_LEGEND: [&str; 4] = [
    "%% Legend",
    "%% \"Added\": present only in the second database",
    "%% \"Removed\": present only in the first database",
    "%% \"Changed from <type>\": field type differs, <type> is the first database's type",
];

/// Exporter for Mermaid ER diagram text.
pub struct MermaidExporter;

impl MermaidExporter {
    /// Render every collection and resolved relationship.
    ///
    /// Every resolved edge is drawn, even one whose target has no entity
    /// block in `metadata`; Mermaid then creates the target implicitly.
    pub fn export_database(metadata: &DatabaseMetadata) -> String {
        Self::export_collections(metadata.collections.iter(), false)
    }

    /// Render `focus` and the collections directly linked to it.
    ///
    /// Returns `None` when `focus` is not a collection in `metadata`.
    pub fn export_focused(metadata: &DatabaseMetadata, focus: &str) -> Option<String> {
        metadata.get_collection(focus)?;

        let related = related_collections(metadata, focus);
        let included = metadata
            .collections
            .iter()
            .filter(|c| c.name == focus || related.contains(&c.name));

        Some(Self::export_collections(included, true))
    }

    /// Render the union of two snapshots with diff annotations.
    ///
    /// Entity and edge markers are `%%` comment lines (`%% Added`,
    /// `%% Removed`). Mermaid has no inline `%%` comment, so per-field
    /// markers use the attribute comment slot instead:
    /// `int age "Added"`, `string name "Removed"`,
    /// `int name "Changed from string"`.
    pub fn export_comparison(before: &DatabaseMetadata, after: &DatabaseMetadata) -> String {
        let mut output = String::from("erDiagram\n");

        for collection in &before.collections {
            match after.get_collection(&collection.name) {
                Some(current) => Self::push_compared_entity(&mut output, collection, current),
                None => Self::push_entity(&mut output, collection, Some("Removed")),
            }
        }
        for collection in &after.collections {
            if before.get_collection(&collection.name).is_none() {
                Self::push_entity(&mut output, collection, Some("Added"));
            }
        }

        let before_edges = Self::edges(before.collections.iter());
        let after_edges = Self::edges(after.collections.iter());
        let known: HashSet<&RelationshipEdge> = before_edges.iter().map(|(edge, _)| edge).collect();

        let mut seen = HashSet::new();
        let mut lines = Vec::new();
        for (edge, cardinality) in before_edges.iter().chain(after_edges.iter()) {
            if !seen.insert(edge) {
                continue;
            }
            if !known.contains(edge) {
                lines.push(format!("{}%% Added", INDENT));
            }
            lines.push(Self::relationship_line(edge, *cardinality));
        }

        if !lines.is_empty() {
            output.push('\n');
            for line in lines {
                output.push_str(&line);
                output.push('\n');
            }
        }

        output.push('\n');
        for line in COMPARISON_LEGEND {
            output.push_str(INDENT);
            output.push_str(line);
            output.push('\n');
        }

        output
    }

    /// With `only_included`, edges pointing outside `collections` are dropped.
    fn export_collections<'a>(
        collections: impl Iterator<Item = &'a CollectionSchema> + Clone,
        only_included: bool,
    ) -> String {
        let mut output = String::from("erDiagram\n");

        for collection in collections.clone() {
            Self::push_entity(&mut output, collection, None);
        }

        let edges = Self::edges(collections.clone());
        let included: HashSet<&str> = collections.map(|c| c.name.as_str()).collect();
        let lines: Vec<String> = edges
            .iter()
            .filter(|(edge, _)| !only_included || included.contains(edge.to.as_str()))
            .map(|(edge, cardinality)| Self::relationship_line(edge, *cardinality))
            .collect();

        if !lines.is_empty() {
            output.push('\n');
            for line in lines {
                output.push_str(&line);
                output.push('\n');
            }
        }

        output
    }

    /// Resolved edges in collection order, deduplicated by (from, to, field).
    fn edges<'a>(
        collections: impl Iterator<Item = &'a CollectionSchema>,
    ) -> Vec<(RelationshipEdge, Cardinality)> {
        let mut seen = HashSet::new();
        collections
            .flat_map(|c| c.relationships.iter())
            .filter_map(|r| r.edge().map(|edge| (edge, r.cardinality)))
            .filter(|(edge, _)| seen.insert(edge.clone()))
            .collect()
    }

    fn push_entity(output: &mut String, collection: &CollectionSchema, marker: Option<&str>) {
        output.push_str(&format!("{}\"{}\" {{\n", INDENT, escape_label(&collection.name)));
        if let Some(marker) = marker {
            output.push_str(&format!("{}%% {}\n", ATTRIBUTE_INDENT, marker));
        }
        for (field, field_type) in &collection.schema {
            output.push_str(&Self::attribute_line(field, field_type, None));
        }
        output.push_str(&format!("{}}}\n", INDENT));
    }

    fn push_compared_entity(output: &mut String, before: &CollectionSchema, after: &CollectionSchema) {
        output.push_str(&format!("{}\"{}\" {{\n", INDENT, escape_label(&after.name)));

        for (field, after_type) in &after.schema {
            let comment = match before.schema.get(field) {
                None => Some("Added".to_string()),
                Some(before_type) if before_type != after_type => {
                    Some(format!("Changed from {}", before_type.type_name()))
                }
                Some(_) => None,
            };
            output.push_str(&Self::attribute_line(field, after_type, comment.as_deref()));
        }
        for (field, before_type) in &before.schema {
            if !after.schema.contains_key(field) {
                output.push_str(&Self::attribute_line(field, before_type, Some("Removed")));
            }
        }

        output.push_str(&format!("{}}}\n", INDENT));
    }

    fn attribute_line(field: &str, field_type: &FieldType, comment: Option<&str>) -> String {
        let mut line = format!(
            "{}{} {}",
            ATTRIBUTE_INDENT,
            field_type.type_name(),
            escape_attribute_name(field)
        );
        if let Some(comment) = comment {
            line.push_str(&format!(" \"{}\"", escape_label(comment)));
        }
        line.push('\n');
        line
    }

    fn relationship_line(edge: &RelationshipEdge, cardinality: Cardinality) -> String {
        format!(
            "{}\"{}\" {} \"{}\" : \"{}\"",
            INDENT,
            escape_label(&edge.from),
            cardinality.as_mermaid(),
            escape_label(&edge.to),
            escape_label(&edge.field)
        )
    }
}

/// Mermaid attribute names allow letters, digits, `_` and `-`.
fn escape_attribute_name(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Quoted labels cannot contain double quotes.
fn escape_label(s: &str) -> String {
    s.replace('"', "'")
}
