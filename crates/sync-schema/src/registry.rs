//! The schema registry: every record type's place in the hierarchy.
//!
//! Built once at startup and read-only thereafter. Ancestry and
//! descendant orderings are precomputed at build time, so hierarchy
//! lookups are allocation-free.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use crate::error::SchemaError;
use crate::schema::RecordSchema;

/// Immutable registry of every indexable record type.
#[derive(Debug)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, RecordSchema>,
    /// Ancestors root-first, ending with the type itself.
    ancestors: HashMap<String, Vec<String>>,
    /// Ancestors root-first, the type itself, then every descendant.
    with_descendants: HashMap<String, Vec<String>>,
}

impl SchemaRegistry {
    /// Build a registry from schema declarations.
    ///
    /// Validates that type names are unique, parents and relation targets
    /// exist, and the parent chain is acyclic.
    pub fn build(schemas: impl IntoIterator<Item = RecordSchema>) -> Result<Self, SchemaError> {
        let mut by_name: BTreeMap<String, RecordSchema> = BTreeMap::new();
        for schema in schemas {
            if by_name.contains_key(&schema.name) {
                return Err(SchemaError::DuplicateType(schema.name));
            }
            by_name.insert(schema.name.clone(), schema);
        }

        // Validate relation targets before any traversal
        for schema in by_name.values() {
            for (relation, decl) in &schema.relations {
                if !by_name.contains_key(&decl.target) {
                    return Err(SchemaError::UnknownRelationTarget {
                        type_name: schema.name.clone(),
                        relation: relation.clone(),
                        target: decl.target.clone(),
                    });
                }
            }
        }

        let mut ancestors: HashMap<String, Vec<String>> = HashMap::new();
        for name in by_name.keys() {
            let mut chain = Vec::new();
            let mut seen: HashSet<&str> = HashSet::new();
            let mut current = name.as_str();
            loop {
                if !seen.insert(current) {
                    return Err(SchemaError::ParentCycle(current.to_string()));
                }
                chain.push(current.to_string());
                match &by_name[current].parent {
                    Some(parent) => {
                        current = by_name
                            .get(parent.as_str())
                            .map(|s| s.name.as_str())
                            .ok_or_else(|| SchemaError::UnknownParent {
                                type_name: current.to_string(),
                                parent: parent.clone(),
                            })?;
                    }
                    None => break,
                }
            }
            chain.reverse();
            ancestors.insert(name.clone(), chain);
        }

        // Children in name order keeps descendant traversal deterministic
        let mut children: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for schema in by_name.values() {
            if let Some(parent) = &schema.parent {
                children.entry(parent.as_str()).or_default().push(&schema.name);
            }
        }

        let mut with_descendants: HashMap<String, Vec<String>> = HashMap::new();
        for name in by_name.keys() {
            let mut hierarchy = ancestors[name].clone();
            let mut stack: Vec<&str> = children
                .get(name.as_str())
                .map(|c| c.iter().rev().copied().collect())
                .unwrap_or_default();
            while let Some(next) = stack.pop() {
                hierarchy.push(next.to_string());
                if let Some(grandchildren) = children.get(next) {
                    stack.extend(grandchildren.iter().rev().copied());
                }
            }
            with_descendants.insert(name.clone(), hierarchy);
        }

        debug!(types = by_name.len(), "Built schema registry");

        Ok(Self {
            schemas: by_name,
            ancestors,
            with_descendants,
        })
    }

    /// The schema for a type, if registered.
    pub fn schema(&self, name: &str) -> Option<&RecordSchema> {
        self.schemas.get(name)
    }

    /// Whether a type is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// All types in a type's hierarchy: ancestors root-first, the type
    /// itself, then (optionally) every descendant.
    pub fn hierarchy(&self, name: &str, include_descendants: bool) -> Option<&[String]> {
        if include_descendants {
            self.with_descendants.get(name).map(|v| v.as_slice())
        } else {
            self.ancestors.get(name).map(|v| v.as_slice())
        }
    }

    /// Ancestors of a type, root-first and ending with the type itself.
    pub fn ancestry(&self, name: &str) -> Option<&[String]> {
        self.hierarchy(name, false)
    }

    /// Whether `name` is `ancestor` or descends from it.
    pub fn is_a(&self, name: &str, ancestor: &str) -> bool {
        self.ancestors
            .get(name)
            .map(|chain| chain.iter().any(|t| t == ancestor))
            .unwrap_or(false)
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(|s| s.as_str())
    }
}
