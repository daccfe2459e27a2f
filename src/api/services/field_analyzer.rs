//! Field analyzer: classifies a single BSON value into a [`FieldType`].
//!
//! The walk uses an explicit work stack instead of recursion so that
//! degenerate documents cannot overflow the call stack. Containers nested
//! deeper than `max_depth` are summarised without their contents, which keeps
//! the resulting `FieldType` tree shallow enough for the recursive passes that
//! run on it later (serde, equality, drop).

use crate::models::FieldType;
use indexmap::IndexMap;
use mongodb::bson::Bson;

/// MongoDB rejects documents nested deeper than this.
pub const DEFAULT_MAX_DEPTH: usize = 100;

enum Task<'a> {
    Visit(&'a Bson, usize),
    BuildArray,
    BuildObject(Vec<&'a str>),
}

/// Analyzer for individual document values.
#[derive(Debug, Clone, Copy)]
pub struct FieldAnalyzer {
    max_depth: usize,
}

impl Default for FieldAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl FieldAnalyzer {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Classify `value`. Total and deterministic for every BSON value.
    pub fn analyze(&self, value: &Bson) -> FieldType {
        let mut tasks = vec![Task::Visit(value, 0)];
        let mut results: Vec<FieldType> = Vec::new();

        while let Some(task) = tasks.pop() {
            match task {
                Task::Visit(value, depth) => match value {
                    Bson::Array(items) => match items.first() {
                        None => results.push(FieldType::array_of(FieldType::Unknown)),
                        Some(_) if depth >= self.max_depth => {
                            results.push(FieldType::array_of(FieldType::Unknown))
                        }
                        Some(first) => {
                            tasks.push(Task::BuildArray);
                            tasks.push(Task::Visit(first, depth + 1));
                        }
                    },
                    Bson::Document(doc) if depth >= self.max_depth || doc.is_empty() => {
                        results.push(FieldType::Object {
                            fields: IndexMap::new(),
                        });
                    }
                    Bson::Document(doc) => {
                        let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
                        tasks.push(Task::BuildObject(keys));
                        // Reverse so values are visited, and their results
                        // pushed, in document order.
                        let values: Vec<&Bson> = doc.values().collect();
                        for child in values.into_iter().rev() {
                            tasks.push(Task::Visit(child, depth + 1));
                        }
                    }
                    leaf => results.push(classify_leaf(leaf)),
                },
                Task::BuildArray => {
                    let item = results.pop().unwrap_or(FieldType::Unknown);
                    results.push(FieldType::array_of(item));
                }
                Task::BuildObject(keys) => {
                    let start = results.len().saturating_sub(keys.len());
                    let values = results.split_off(start);
                    let fields = keys
                        .into_iter()
                        .map(str::to_string)
                        .zip(values)
                        .collect();
                    results.push(FieldType::Object { fields });
                }
            }
        }

        results.pop().unwrap_or(FieldType::Unknown)
    }
}

/// Classify `value` with the default depth limit.
pub fn analyze_field(value: &Bson) -> FieldType {
    FieldAnalyzer::default().analyze(value)
}

fn classify_leaf(value: &Bson) -> FieldType {
    match value {
        Bson::Null | Bson::Undefined => FieldType::Null,
        Bson::ObjectId(_) => FieldType::object_id(),
        Bson::DateTime(_) => FieldType::primitive("date"),
        other => FieldType::primitive(runtime_type_name(other)),
    }
}

/// Runtime type name for scalar BSON values.
fn runtime_type_name(value: &Bson) -> &'static str {
    match value {
        Bson::String(_) => "string",
        Bson::Double(_) => "number",
        Bson::Int32(_) => "int",
        Bson::Int64(_) => "long",
        Bson::Decimal128(_) => "decimal",
        Bson::Boolean(_) => "boolean",
        Bson::DateTime(_) => "date",
        Bson::Timestamp(_) => "timestamp",
        Bson::Binary(_) => "binary",
        Bson::RegularExpression(_) => "regex",
        Bson::JavaScriptCode(_) | Bson::JavaScriptCodeWithScope(_) => "javascript",
        Bson::Symbol(_) => "symbol",
        Bson::MinKey => "minKey",
        Bson::MaxKey => "maxKey",
        Bson::DbPointer(_) => "dbPointer",
        Bson::ObjectId(_) => "objectId",
        Bson::Null | Bson::Undefined => "null",
        Bson::Array(_) => "array",
        Bson::Document(_) => "object",
    }
}
