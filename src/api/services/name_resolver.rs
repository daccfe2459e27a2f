//! Relationship target resolution strategies.
//!
//! A [`NameResolver`] maps a reference-like field name (`userId`, `tag_ids`)
//! to one of the collection names found in the database.

use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

static REFERENCE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(_ids|_id|ids|id|_refs|_ref|refs|ref)$").expect("valid suffix pattern")
});

/// Strategy for matching a field name to a collection name.
pub trait NameResolver: Send + Sync {
    /// Return the matching collection name, exactly as listed in `collections`.
    fn resolve(&self, field: &str, collections: &[String]) -> Option<String>;
}

/// Strip one relationship suffix (`_id`, `Ids`, `ref`, ...) from a field name.
pub fn strip_reference_suffix(field: &str) -> &str {
    match REFERENCE_SUFFIX.find(field) {
        Some(m) => &field[..m.start()],
        None => field,
    }
}

/// Default resolver: strip the reference suffix, then match case-insensitively.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuffixNameResolver {
    pluralize: bool,
}

impl SuffixNameResolver {
    pub fn new() -> Self {
        Self { pluralize: false }
    }

    /// Also accept `<base>s` and `<base>es` as matches (`userId` -> `users`).
    pub fn with_plurals() -> Self {
        Self { pluralize: true }
    }
}

impl NameResolver for SuffixNameResolver {
    fn resolve(&self, field: &str, collections: &[String]) -> Option<String> {
        let base = strip_reference_suffix(field).to_lowercase();
        if base.is_empty() {
            return None;
        }

        let mut accepted = vec![base.clone()];
        if self.pluralize {
            accepted.push(format!("{}s", base));
            accepted.push(format!("{}es", base));
        }

        // Earlier forms win, so an exact match beats a plural one.
        accepted.iter().find_map(|candidate| {
            collections
                .iter()
                .find(|name| name.to_lowercase() == *candidate)
                .cloned()
        })
    }
}

/// Explicit field-to-collection mapping supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct MappingNameResolver {
    mapping: HashMap<String, String>,
}

impl MappingNameResolver {
    pub fn new(mapping: HashMap<String, String>) -> Self {
        Self { mapping }
    }
}

impl NameResolver for MappingNameResolver {
    fn resolve(&self, field: &str, collections: &[String]) -> Option<String> {
        let target = self.mapping.get(field)?;
        collections.iter().find(|name| *name == target).cloned()
    }
}

/// Tries each resolver in turn; the first match wins.
#[derive(Clone, Default)]
pub struct ChainedNameResolver {
    resolvers: Vec<Arc<dyn NameResolver>>,
}

impl ChainedNameResolver {
    pub fn new(resolvers: Vec<Arc<dyn NameResolver>>) -> Self {
        Self { resolvers }
    }
}

impl NameResolver for ChainedNameResolver {
    fn resolve(&self, field: &str, collections: &[String]) -> Option<String> {
        self.resolvers
            .iter()
            .find_map(|resolver| resolver.resolve(field, collections))
    }
}
