//! Field resolution: logical field names to extraction recipes.
//!
//! A logical field is either a plain name (`Title`) or a dotted relation
//! path (`Author.Name`). Resolution walks the declared type hierarchy and
//! produces a [`FieldPath`]: an ordered chain of steps an interpreter can
//! apply to any record of the originating type. Resolution is pure given
//! a fixed registry, so every result is memoized for the life of the
//! resolver.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::registry::SchemaRegistry;
use crate::schema::{FieldKind, RelationKind};

/// One step of an extraction recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum PathStep {
    /// Read a property (stored field or accessor) off the current record.
    Property { name: String },
    /// Traverse a relation, replacing the current record set with the
    /// related records.
    Relation {
        name: String,
        kind: RelationKind,
        target: String,
    },
}

/// A resolved extraction recipe for one logical field on one record type.
///
/// Paths are cached by the resolver and treated as immutable; the type
/// model does not change at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPath {
    /// The logical field as configured, dots included.
    pub field: String,

    /// Document field name: origin type plus the underscored path.
    pub name: String,

    /// The hierarchy member that declared the final field. Records only
    /// receive this path's value when they are, or descend from, this
    /// type.
    pub origin: String,

    /// Declared value type of the final field.
    pub kind: FieldKind,

    /// Whether any traversed relation can yield multiple records.
    pub multi_valued: bool,

    /// Ordered steps to apply against a record.
    pub steps: Vec<PathStep>,
}

/// Resolves logical field names against the schema registry.
///
/// Owns its memoization cache; shareable across threads.
pub struct FieldResolver {
    registry: Arc<SchemaRegistry>,
    cache: RwLock<HashMap<(String, String), Option<FieldPath>>>,
}

impl FieldResolver {
    /// Create a resolver over a registry.
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self {
            registry,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The registry this resolver reads from.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Resolve a logical field for a record type.
    ///
    /// Returns `None` when no declaration matches anywhere in the
    /// hierarchy; absent fields are skipped, not errors, so index
    /// configurations may name fields ahead of the schema that defines
    /// them.
    pub fn resolve(&self, type_name: &str, field: &str) -> Option<FieldPath> {
        let key = (type_name.to_string(), field.to_string());
        if let Some(cached) = self.read_cache().get(&key) {
            return cached.clone();
        }

        let resolved = self.resolve_uncached(type_name, field);
        trace!(
            type_name = type_name,
            field = field,
            resolved = resolved.is_some(),
            "Resolved field"
        );
        self.cache
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key, resolved.clone());
        resolved
    }

    /// Number of memoized resolutions.
    pub fn cache_len(&self) -> usize {
        self.read_cache().len()
    }

    fn read_cache(&self) -> std::sync::RwLockReadGuard<'_, HashMap<(String, String), Option<FieldPath>>> {
        self.cache.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn resolve_uncached(&self, type_name: &str, field: &str) -> Option<FieldPath> {
        let mut segments: Vec<&str> = field.split('.').collect();
        let last = segments.pop()?;

        let mut steps = Vec::new();
        let mut multi_valued = false;
        let mut origin: Option<String> = None;
        let mut candidates: Vec<String> = vec![type_name.to_string()];

        // Each relation segment narrows the candidate set to the related
        // type. Only own declarations count: a relation matches on the
        // hierarchy member that declares it, never on an heir.
        for segment in segments {
            let (declarer, relation) = self.find_relation(&candidates, segment)?;
            multi_valued |= relation.0.is_multi_valued();
            origin.get_or_insert(declarer);
            candidates = vec![relation.1.clone()];
            steps.push(PathStep::Relation {
                name: segment.to_string(),
                kind: relation.0,
                target: relation.1,
            });
        }

        let (declarer, kind) = self.find_field(&candidates, last)?;
        origin.get_or_insert(declarer);
        steps.push(PathStep::Property {
            name: last.to_string(),
        });

        let origin = origin.unwrap_or_else(|| type_name.to_string());
        let name = format!("{}_{}", origin, field.replace('.', "_"));

        Some(FieldPath {
            field: field.to_string(),
            name,
            origin,
            kind,
            multi_valued,
            steps,
        })
    }

    /// First hierarchy member across the candidate set that declares the
    /// relation directly.
    fn find_relation(
        &self,
        candidates: &[String],
        relation: &str,
    ) -> Option<(String, (RelationKind, String))> {
        for candidate in candidates {
            for member in self.registry.hierarchy(candidate, true)? {
                let schema = self.registry.schema(member)?;
                if let Some(decl) = schema.own_relation(relation) {
                    return Some((member.clone(), (decl.kind, decl.target.clone())));
                }
            }
        }
        None
    }

    /// First hierarchy member across the candidate set that declares the
    /// field or an accessor for it. The first match fixes origin and
    /// declared kind; descendants of the matching type never override it.
    fn find_field(&self, candidates: &[String], field: &str) -> Option<(String, FieldKind)> {
        for candidate in candidates {
            for member in self.registry.hierarchy(candidate, true)? {
                if let Some(kind) = self.registry.schema(member)?.declared_kind(field) {
                    return Some((member.clone(), kind));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RecordSchema;

    fn resolver() -> FieldResolver {
        let registry = SchemaRegistry::build([
            RecordSchema::new("Page")
                .field("Title", FieldKind::Text)
                .field("Created", FieldKind::Date),
            RecordSchema::new("Article")
                .with_parent("Page")
                .field("Body", FieldKind::Text)
                .field("Rating", FieldKind::Float)
                .accessor("Summary", FieldKind::Text)
                .relation("Author", RelationKind::HasOne, "Member")
                .relation("Tags", RelationKind::ManyMany, "Tag"),
            RecordSchema::new("NewsArticle")
                .with_parent("Article")
                .field("Source", FieldKind::Text),
            RecordSchema::new("Member")
                .field("Name", FieldKind::Text)
                .relation("Groups", RelationKind::ManyMany, "Group"),
            RecordSchema::new("Group").field("Label", FieldKind::Text),
            RecordSchema::new("Tag").field("Label", FieldKind::Text),
        ])
        .unwrap();
        FieldResolver::new(Arc::new(registry))
    }

    #[test]
    fn test_resolve_own_field() {
        let path = resolver().resolve("Article", "Body").unwrap();
        assert_eq!(path.origin, "Article");
        assert_eq!(path.name, "Article_Body");
        assert_eq!(path.kind, FieldKind::Text);
        assert_eq!(
            path.steps,
            vec![PathStep::Property {
                name: "Body".to_string()
            }]
        );
        assert!(!path.multi_valued);
    }

    #[test]
    fn test_resolve_inherited_field_origin_is_ancestor() {
        let path = resolver().resolve("NewsArticle", "Title").unwrap();
        assert_eq!(path.origin, "Page");
        assert_eq!(path.name, "Page_Title");
    }

    #[test]
    fn test_resolve_descendant_declared_field() {
        // Declared on a subclass; resolvable from the base, gated later
        // by the origin check during document build.
        let path = resolver().resolve("Page", "Source").unwrap();
        assert_eq!(path.origin, "NewsArticle");
    }

    #[test]
    fn test_resolve_accessor() {
        let path = resolver().resolve("Article", "Summary").unwrap();
        assert_eq!(path.kind, FieldKind::Text);
        assert_eq!(
            path.steps,
            vec![PathStep::Property {
                name: "Summary".to_string()
            }]
        );
    }

    #[test]
    fn test_resolve_has_one_path() {
        let path = resolver().resolve("Article", "Author.Name").unwrap();
        assert_eq!(path.origin, "Article");
        assert_eq!(path.name, "Article_Author_Name");
        assert!(!path.multi_valued);
        assert_eq!(path.steps.len(), 2);
        assert_eq!(
            path.steps[0],
            PathStep::Relation {
                name: "Author".to_string(),
                kind: RelationKind::HasOne,
                target: "Member".to_string(),
            }
        );
    }

    #[test]
    fn test_resolve_many_many_path_is_multi_valued() {
        let path = resolver().resolve("Article", "Tags.Label").unwrap();
        assert!(path.multi_valued);
        assert_eq!(path.kind, FieldKind::Text);
    }

    #[test]
    fn test_resolve_nested_relation_path() {
        let path = resolver().resolve("Article", "Author.Groups.Label").unwrap();
        assert_eq!(path.steps.len(), 3);
        assert!(path.multi_valued);
    }

    #[test]
    fn test_relation_resolves_from_subclass() {
        // Declared on Article, reachable from NewsArticle through the
        // hierarchy scan.
        let path = resolver().resolve("NewsArticle", "Author.Name").unwrap();
        assert_eq!(path.origin, "Article");
    }

    #[test]
    fn test_unresolvable_field_is_none() {
        assert!(resolver().resolve("Article", "Nonexistent").is_none());
        assert!(resolver().resolve("Ghost", "Title").is_none());
    }

    #[test]
    fn test_unresolvable_relation_segment_short_circuits() {
        assert!(resolver().resolve("Article", "Publisher.Name").is_none());
        assert!(resolver().resolve("Article", "Author.Missing").is_none());
    }

    #[test]
    fn test_resolution_is_memoized_and_stable() {
        let resolver = resolver();
        let first = resolver.resolve("Article", "Author.Name").unwrap();
        assert_eq!(resolver.cache_len(), 1);

        let second = resolver.resolve("Article", "Author.Name").unwrap();
        assert_eq!(first, second);
        assert_eq!(resolver.cache_len(), 1);
    }

    #[test]
    fn test_path_serialization_tags_steps() {
        let path = resolver().resolve("Article", "Author.Name").unwrap();
        let json = serde_json::to_string(&path.steps).unwrap();
        assert!(json.contains("\"call\":\"relation\""));
        assert!(json.contains("\"call\":\"property\""));

        let decoded: Vec<PathStep> = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, path.steps);
    }

    #[test]
    fn test_negative_results_are_cached_too() {
        let resolver = resolver();
        assert!(resolver.resolve("Article", "Nonexistent").is_none());
        assert!(resolver.resolve("Article", "Nonexistent").is_none());
        assert_eq!(resolver.cache_len(), 1);
    }
}
