// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Shared registry of message definitions.
//!
//! Definitions are interned once per type name and handed out as
//! `Arc<MessageDefinition>`. Nested types are never embedded: fields name
//! them and the registry resolves the name when needed.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::core::registry::{Registration, TypeRegistry};
use crate::core::{BagError, Result};

use super::ast::{MessageDefinition, ParsedBundle};
use super::layout::{compute_layout, Layout};
use super::parser::msg_parser;

/// Interning arena of message definitions keyed by type name.
///
/// The first registration of a name wins. Layouts are memoized per type and
/// the memo is reset whenever a new type is registered, since a new type can
/// make a previously unresolvable reference static.
#[derive(Default)]
pub struct DefinitionRegistry {
    definitions: TypeRegistry<Arc<MessageDefinition>>,
    layouts: RwLock<HashMap<String, Option<Arc<Layout>>>>,
}

impl DefinitionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a definition. Returns the definition now registered under its name,
    /// which is the earlier one if the name was taken.
    pub fn register(&self, definition: MessageDefinition) -> Arc<MessageDefinition> {
        let name = definition.type_name.clone();
        match self.definitions.register(name, Arc::new(definition)) {
            Registration::Inserted(def) => {
                self.layouts
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .clear();
                def
            }
            Registration::Existing(def) => def,
        }
    }

    /// Intern a parsed bundle: dependencies first, then the root.
    pub fn intern_bundle(&self, bundle: ParsedBundle) -> Arc<MessageDefinition> {
        for dependency in bundle.dependencies {
            let name = dependency.type_name.clone();
            let kept = self.register(dependency);
            debug!(type_name = %name, fields = kept.fields.len(), "registered dependency type");
        }
        self.register(bundle.root)
    }

    /// Parse and intern a connection's definition text.
    ///
    /// If `type_name` is already registered the text is not parsed again.
    pub fn register_text(&self, type_name: &str, text: &str) -> Arc<MessageDefinition> {
        if let Some(existing) = self.definitions.get(type_name) {
            return existing;
        }
        self.intern_bundle(msg_parser::parse(type_name, text))
    }

    /// Get a definition by exact name.
    pub fn get(&self, type_name: &str) -> Option<Arc<MessageDefinition>> {
        self.definitions.get(type_name)
    }

    /// Get a definition by exact name, falling back to a suffix match.
    pub fn resolve(&self, type_name: &str) -> Option<Arc<MessageDefinition>> {
        self.definitions.resolve(type_name)
    }

    /// Like [`resolve`](Self::resolve), failing with `UnknownFieldType`.
    pub fn resolve_or_err(&self, type_name: &str) -> Result<Arc<MessageDefinition>> {
        self.resolve(type_name)
            .ok_or_else(|| BagError::unknown_field_type(type_name))
    }

    /// Check if a type is registered under exactly this name.
    pub fn contains(&self, type_name: &str) -> bool {
        self.definitions.contains(type_name)
    }

    /// All registered type names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.definitions.names()
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Check if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Static layout of a type, computed on first use.
    ///
    /// Returns `None` for unknown types and for types whose size depends on content.
    pub fn layout(&self, type_name: &str) -> Option<Arc<Layout>> {
        let definition = self.resolve(type_name)?;
        self.layout_with(&definition, &mut Vec::new())
    }

    /// Whether a type has a content-independent size.
    pub fn has_static_size(&self, type_name: &str) -> bool {
        self.layout(type_name).is_some()
    }

    /// Compute the layout of every registered type. Returns how many are static.
    pub fn precompute_layouts(&self) -> usize {
        let names = self.names();
        let total = names.len();
        let static_count = names
            .iter()
            .filter(|name| self.layout(name).is_some())
            .count();
        debug!(types = total, static_types = static_count, "precomputed message layouts");
        static_count
    }

    pub(crate) fn layout_with(
        &self,
        definition: &MessageDefinition,
        visiting: &mut Vec<String>,
    ) -> Option<Arc<Layout>> {
        if let Some(cached) = self
            .layouts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&definition.type_name)
        {
            return cached.clone();
        }

        let layout = compute_layout(self, definition, visiting).map(Arc::new);
        self.layouts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(definition.type_name.clone(), layout.clone());
        layout
    }
}

impl std::fmt::Debug for DefinitionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefinitionRegistry")
            .field("types", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEPARATOR: &str =
        "================================================================================";

    #[test]
    fn test_register_text_interns_dependencies() {
        let registry = DefinitionRegistry::new();
        let text = format!(
            "Header header\nstring text\n{SEPARATOR}\nMSG: std_msgs/Header\nuint32 seq\ntime stamp\nstring frame_id\n"
        );
        let def = registry.register_text("pkg/Stamped", &text);

        assert_eq!(def.type_name, "pkg/Stamped");
        assert!(registry.contains("std_msgs/Header"));
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.resolve("Header").map(|d| d.type_name.clone()),
            Some("std_msgs/Header".to_string())
        );
    }

    #[test]
    fn test_first_registration_wins() {
        let registry = DefinitionRegistry::new();
        let first = registry.register_text("pkg/A", "int32 a");
        let second = registry.register_text("pkg/A", "float64 b\nfloat64 c");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.field_names(), vec!["a"]);

        // A dependency block never replaces an existing type either
        let text = format!("pkg/A inner\n{SEPARATOR}\nMSG: pkg/A\nstring replaced\n");
        registry.register_text("pkg/B", &text);
        assert_eq!(registry.get("pkg/A").unwrap().field_names(), vec!["a"]);
    }

    #[test]
    fn test_resolve_or_err() {
        let registry = DefinitionRegistry::new();
        let err = registry.resolve_or_err("geometry_msgs/Point").unwrap_err();
        assert!(matches!(err, BagError::UnknownFieldType { .. }));
    }

    #[test]
    fn test_layout_memo_reset_on_register() {
        let registry = DefinitionRegistry::new();
        registry.register_text("pkg/Outer", "int32 a\nInner inner");
        assert!(registry.layout("pkg/Outer").is_none());

        registry.register_text("pkg/Inner", "float64 v");
        let layout = registry.layout("pkg/Outer").unwrap();
        assert_eq!(layout.static_size(), 12);
    }

    #[test]
    fn test_precompute_layouts() {
        let registry = DefinitionRegistry::new();
        registry.register_text("pkg/Fixed", "int32 a\nint32 b");
        registry.register_text("pkg/Dyn", "string s");
        assert_eq!(registry.precompute_layouts(), 1);
    }
}
