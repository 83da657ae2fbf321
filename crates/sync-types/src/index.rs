//! Index definitions: which record types an index covers and which
//! logical fields it indexes, filters, sorts, facets and boosts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Configuration for one search index.
///
/// Multiple indexes may cover overlapping or disjoint record types; the
/// synchronizer skips (type, index) pairs whose type is not covered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Index name, unique across the deployment.
    pub name: String,

    /// Record types covered by this index. Subtypes of a covered type are
    /// covered through hierarchy intersection.
    pub classes: Vec<String>,

    /// Logical fields indexed for full-text search.
    pub fulltext_fields: Vec<String>,

    /// Logical fields usable as query filters.
    pub filter_fields: Vec<String>,

    /// Logical fields usable for sorting.
    pub sort_fields: Vec<String>,

    /// Logical fields usable for faceting.
    pub facet_fields: Vec<String>,

    /// Boost weight per logical field.
    pub boosted_fields: BTreeMap<String, f32>,
}

impl IndexConfig {
    /// Create an empty index definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a covered record type.
    pub fn add_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    /// Add a full-text field.
    pub fn add_fulltext_field(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !self.fulltext_fields.contains(&field) {
            self.fulltext_fields.push(field);
        }
        self
    }

    /// Add a filterable field.
    pub fn add_filter_field(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !self.filter_fields.contains(&field) {
            self.filter_fields.push(field);
        }
        self
    }

    /// Add a sortable field.
    pub fn add_sort_field(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !self.sort_fields.contains(&field) {
            self.sort_fields.push(field);
        }
        self
    }

    /// Add a facetable field.
    pub fn add_facet_field(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !self.facet_fields.contains(&field) {
            self.facet_fields.push(field);
        }
        self
    }

    /// Boost a field. A boosted field is always also a full-text field.
    pub fn add_boosted_field(mut self, field: impl Into<String>, weight: f32) -> Self {
        let field = field.into();
        self.boosted_fields.insert(field.clone(), weight);
        self.add_fulltext_field(field)
    }

    /// Boost weight for a logical field, if configured.
    pub fn boost_for(&self, field: &str) -> Option<f32> {
        self.boosted_fields.get(field).copied()
    }

    /// Every logical field that needs a value in the document: the
    /// deduplicated union of fulltext, filter, sort and facet fields.
    pub fn fields_for_indexing(&self) -> Vec<String> {
        let mut fields: Vec<String> = Vec::new();
        for field in self
            .fulltext_fields
            .iter()
            .chain(&self.filter_fields)
            .chain(&self.sort_fields)
            .chain(&self.facet_fields)
        {
            if !fields.contains(field) {
                fields.push(field.clone());
            }
        }
        fields
    }

    /// Whether any of the given types is covered by this index.
    pub fn covers_any(&self, hierarchy: &[String]) -> bool {
        hierarchy.iter().any(|t| self.classes.contains(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> IndexConfig {
        IndexConfig::new("main")
            .add_class("Article")
            .add_fulltext_field("Title")
            .add_fulltext_field("Body")
            .add_filter_field("Title")
            .add_sort_field("Created")
            .add_facet_field("Author.Name")
    }

    #[test]
    fn test_fields_for_indexing_deduplicates() {
        let index = sample();
        let fields = index.fields_for_indexing();
        assert_eq!(fields, vec!["Title", "Body", "Created", "Author.Name"]);
    }

    #[test]
    fn test_boosted_field_joins_fulltext() {
        let index = IndexConfig::new("main").add_boosted_field("Title", 5.0);
        assert_eq!(index.boost_for("Title"), Some(5.0));
        assert!(index.fulltext_fields.contains(&"Title".to_string()));
    }

    #[test]
    fn test_boost_for_unboosted_field() {
        assert_eq!(sample().boost_for("Body"), None);
    }

    #[test]
    fn test_covers_any() {
        let index = sample();
        assert!(index.covers_any(&["Page".into(), "Article".into()]));
        assert!(!index.covers_any(&["Member".into()]));
    }

    #[test]
    fn test_add_class_deduplicates() {
        let index = IndexConfig::new("main").add_class("Article").add_class("Article");
        assert_eq!(index.classes.len(), 1);
    }
}
