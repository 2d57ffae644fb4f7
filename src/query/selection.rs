//! Builds query ASTs from entity metadata
//!
//! Walks entity metadata to produce a [`QueryNode`]: either every mapped
//! field recursively (with cycle detection over the possibly-cyclic metadata
//! graph) or only explicitly requested dot-separated field paths, always
//! force-including identifiers so hydration can deduplicate.

use crate::dialect::Dialect;
use crate::error::OrmResult;
use crate::metadata::{EntityMetadata, FieldMetadata, MetadataRegistry};
use crate::query::arguments::Arguments;
use crate::query::ast::{FieldNode, QueryNode, SelectionSetNode};
use crate::query::options::QueryOptions;
use indexmap::IndexMap;
use std::any::TypeId;
use std::collections::HashSet;

/// Intermediate nested-mapping form of explicitly requested field paths.
#[derive(Debug, Clone, Default)]
struct SelectionTree {
    children: IndexMap<String, SelectionTree>,
    /// A bare top-level segment ("user"): expands a relation to its full
    /// field set instead of an identifier-only selection.
    explicit: bool,
}

pub struct SelectionBuilder<'a> {
    registry: &'a MetadataRegistry,
    /// Type ids on the current recursion path. Path-scoped: entries are
    /// removed on exit so sibling branches do not interfere.
    visited: HashSet<TypeId>,
}

impl<'a> SelectionBuilder<'a> {
    pub fn new(registry: &'a MetadataRegistry) -> Self {
        Self {
            registry,
            visited: HashSet::new(),
        }
    }

    /// Build a query for the given entity.
    ///
    /// `fields` is `None` for "select all mapped fields recursively", or the
    /// explicit dot-separated paths to select. Criteria become root
    /// arguments, merged with the dialect's application of options and
    /// filter.
    pub fn build(
        &mut self,
        metadata: &EntityMetadata,
        fields: Option<&[String]>,
        criteria: Arguments,
        options: &QueryOptions,
        dialect: &dyn Dialect,
    ) -> OrmResult<QueryNode> {
        let selection = match fields {
            Some(paths) => {
                let tree = build_selection_tree(metadata, paths);
                self.build_from_tree(metadata, &tree)?
            }
            None => self.all_fields(metadata)?.unwrap_or_default(),
        };

        let mut arguments = criteria;
        dialect.apply_query_options(&mut arguments, options);
        if let Some(filter) = &options.filter {
            dialect.apply_filter(&mut arguments, filter);
        }

        let mut root = FieldNode::with_selection(metadata.graphql_root.clone(), selection);
        root.arguments = arguments;
        root.is_collection = true;

        let mut query = QueryNode::new();
        query.fields.push(root);
        Ok(query)
    }

    /// Select every mapped field, recursing into relations. Returns `None`
    /// when the entity type is already on the current path; the caller then
    /// emits the identifier-only fallback for the relation field.
    fn all_fields(&mut self, metadata: &EntityMetadata) -> OrmResult<Option<SelectionSetNode>> {
        if !self.visited.insert(metadata.type_id) {
            return Ok(None);
        }

        let result = self.all_fields_inner(metadata);
        self.visited.remove(&metadata.type_id);
        result
    }

    fn all_fields_inner(
        &mut self,
        metadata: &EntityMetadata,
    ) -> OrmResult<Option<SelectionSetNode>> {
        let mut selection = SelectionSetNode::new();

        for field in &metadata.fields {
            let Some(target) = &field.relation else {
                selection.add(FieldNode::new(field.mapped_from.clone()));
                continue;
            };

            let target_metadata = self.registry.metadata_of(target)?;
            match self.all_fields(&target_metadata)? {
                Some(nested) if !nested.is_empty() => {
                    selection.add(relation_node(field, nested));
                }
                _ => selection.add(fallback_node(field, &target_metadata)),
            }
        }

        Ok(Some(selection))
    }

    /// Build a selection from an explicit selection tree.
    fn build_from_tree(
        &mut self,
        metadata: &EntityMetadata,
        tree: &SelectionTree,
    ) -> OrmResult<SelectionSetNode> {
        let mut selection = SelectionSetNode::new();

        for (name, node) in &tree.children {
            let Some(field) = metadata.find_field(name) else {
                // Unknown to the static metadata: emit verbatim.
                selection.add(FieldNode::new(name.clone()));
                continue;
            };

            let Some(target) = &field.relation else {
                selection.add(FieldNode::new(field.mapped_from.clone()));
                continue;
            };

            let target_metadata = self.registry.metadata_of(target)?;

            // Identifier forced into every traversed relation level.
            let mut children = node.children.clone();
            if let Some(identifier) = target_metadata.identifier_field() {
                children.entry(identifier.mapped_from.clone()).or_default();
            }

            if node.explicit {
                match self.all_fields(&target_metadata)? {
                    Some(nested) if !nested.is_empty() => {
                        selection.add(relation_node(field, nested));
                    }
                    _ => selection.add(fallback_node(field, &target_metadata)),
                }
                continue;
            }

            if children.is_empty() {
                selection.add(fallback_node(field, &target_metadata));
                continue;
            }

            let subtree = SelectionTree {
                children,
                explicit: false,
            };
            let nested = self.build_from_tree(&target_metadata, &subtree)?;
            if nested.is_empty() {
                selection.add(fallback_node(field, &target_metadata));
            } else {
                selection.add(relation_node(field, nested));
            }
        }

        Ok(selection)
    }
}

fn relation_node(field: &FieldMetadata, nested: SelectionSetNode) -> FieldNode {
    let mut node = FieldNode::with_selection(field.mapped_from.clone(), nested);
    node.is_collection = field.is_collection;
    node
}

/// Identifier-only selection for a relation whose nested selection is not
/// usable: `relation { <identifier or "id"> }`, never an empty block.
fn fallback_node(field: &FieldMetadata, target_metadata: &EntityMetadata) -> FieldNode {
    let identifier = target_metadata
        .identifier_field()
        .map(|id_field| id_field.mapped_from.clone())
        .unwrap_or_else(|| "id".to_string());

    let mut selection = SelectionSetNode::new();
    selection.add(FieldNode::new(identifier));

    let mut node = FieldNode::with_selection(field.mapped_from.clone(), selection);
    node.is_collection = field.is_collection;
    node
}

/// Expand dot-separated paths into a nested tree, force-including the
/// entity's identifier first at the top level.
fn build_selection_tree(metadata: &EntityMetadata, paths: &[String]) -> SelectionTree {
    let mut tree = SelectionTree::default();

    if let Some(identifier) = metadata.identifier_field() {
        tree.children
            .entry(identifier.mapped_from.clone())
            .or_default();
    }

    for path in paths {
        let parts: Vec<&str> = path.split('.').collect();
        let mut current = &mut tree.children;

        for (index, part) in parts.iter().enumerate() {
            let node = current.entry((*part).to_string()).or_default();
            if index == parts.len() - 1 && parts.len() == 1 {
                node.explicit = true;
            }
            current = &mut node.children;
        }
    }

    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::DefaultDialect;
    use crate::entity::{EntityDef, FieldDef, FieldKind, GraphqlEntity, Value};
    use crate::error::{OrmError, OrmResult};

    #[derive(Debug, Default)]
    struct User {
        id: i64,
        name: Option<String>,
        manager: Option<crate::entity::EntityRef<User>>,
    }

    impl GraphqlEntity for User {
        fn definition() -> EntityDef {
            EntityDef::new("users")
                .field(FieldDef::scalar("id", FieldKind::Int).identifier())
                .field(FieldDef::scalar("name", FieldKind::String))
                .field(FieldDef::relation::<User>("manager"))
        }

        fn apply_field(&mut self, field: &str, value: Value) -> OrmResult<()> {
            match field {
                "id" => self.id = value.into_i64().unwrap_or_default(),
                "name" => self.name = value.into_string(),
                "manager" => self.manager = value.into_entity::<User>(),
                other => return Err(OrmError::unknown_field("User", other)),
            }
            Ok(())
        }
    }

    fn build(fields: Option<&[String]>) -> QueryNode {
        let registry = MetadataRegistry::new();
        let metadata = registry.metadata::<User>().unwrap();
        SelectionBuilder::new(&registry)
            .build(
                &metadata,
                fields,
                Arguments::new(),
                &QueryOptions::new(),
                &DefaultDialect::new(),
            )
            .unwrap()
    }

    fn field_names(selection: &SelectionSetNode) -> Vec<&str> {
        selection
            .fields
            .iter()
            .map(|field| field.name.as_str())
            .collect()
    }

    #[test]
    fn all_fields_emits_identifier_fallback_on_cycle() {
        let query = build(None);
        let root = &query.fields[0];
        let selection = root.selection_set.as_ref().unwrap();

        assert_eq!(field_names(selection), ["id", "name", "manager"]);

        let manager = &selection.fields[2];
        let nested = manager.selection_set.as_ref().unwrap();
        assert_eq!(field_names(nested), ["id"]);
    }

    #[test]
    fn explicit_selection_forces_identifier_first() {
        let fields = vec!["name".to_string()];
        let query = build(Some(&fields));
        let selection = query.fields[0].selection_set.as_ref().unwrap();

        assert_eq!(field_names(selection), ["id", "name"]);
    }

    #[test]
    fn nested_path_appends_relation_identifier() {
        let fields = vec!["manager.name".to_string()];
        let query = build(Some(&fields));
        let selection = query.fields[0].selection_set.as_ref().unwrap();

        assert_eq!(field_names(selection), ["id", "manager"]);
        let manager = &selection.fields[1];
        let nested = manager.selection_set.as_ref().unwrap();
        assert_eq!(field_names(nested), ["name", "id"]);
    }

    #[test]
    fn bare_relation_segment_expands_with_cycle_fallback() {
        let fields = vec!["manager".to_string()];
        let query = build(Some(&fields));
        let selection = query.fields[0].selection_set.as_ref().unwrap();

        let manager = &selection.fields[1];
        let nested = manager.selection_set.as_ref().unwrap();
        // Full expansion of the target; its own self-relation collapses to
        // the identifier fallback.
        assert_eq!(field_names(nested), ["id", "name", "manager"]);
        let inner = nested.fields[2].selection_set.as_ref().unwrap();
        assert_eq!(field_names(inner), ["id"]);
    }

    #[test]
    fn unknown_segment_is_emitted_verbatim() {
        let fields = vec!["customGraphqlField".to_string()];
        let query = build(Some(&fields));
        let selection = query.fields[0].selection_set.as_ref().unwrap();

        assert_eq!(field_names(selection), ["id", "customGraphqlField"]);
        assert!(selection.fields[1].selection_set.is_none());
    }

    #[test]
    fn builds_are_deterministic() {
        let fields = vec!["name".to_string(), "manager.name".to_string()];
        let first = serde_json::to_string(&build(Some(&fields))).unwrap();
        let second = serde_json::to_string(&build(Some(&fields))).unwrap();

        assert_eq!(first, second);
    }
}
