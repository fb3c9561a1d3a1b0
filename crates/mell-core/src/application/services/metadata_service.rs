//! Metadata Loader - resolves document names into one merged tree.
//!
//! ```text
//! "base,shop"
//!    │
//!    ├── base.json ────────────────┐
//!    │                             ├─ merge ─┐
//!    └── shop.json                 │         │
//!          __parent__: "common" ───┘         ▼
//!                                      merged metadata
//! ```
//!
//! Each document is merged over its parents, then over the documents
//! requested before it.

use tracing::{debug, instrument, warn};

use crate::application::invocation::split_names;
use crate::application::{ApplicationError, ports::MetadataSource};
use crate::domain::{Value, merge, type_name, value::empty_map};
use crate::error::MellResult;

/// Key naming the documents a document inherits from.
pub const PARENT_KEY: &str = "__parent__";

const PARENT_SEPARATORS: &[char] = &[',', ' ', '\t', '\n', '\r'];

/// Service resolving comma-joined document names with `__parent__` inheritance.
pub struct MetadataLoader {
    source: Box<dyn MetadataSource>,
}

impl MetadataLoader {
    pub fn new(source: Box<dyn MetadataSource>) -> Self {
        Self { source }
    }

    /// Load and merge the documents named in `names`, left to right.
    ///
    /// When the metadata store does not exist, an empty request yields an
    /// empty map and anything else is `MetadataNotFound`.
    #[instrument(skip(self), fields(location = %self.source.location()))]
    pub fn load(&self, names: &str) -> MellResult<Value> {
        let names = split_names(names, &[',']);

        if !self.source.is_available() {
            if let Some(first) = names.first() {
                return Err(ApplicationError::MetadataNotFound {
                    name: (*first).to_owned(),
                    location: self.source.location(),
                }
                .into());
            }
            warn!(
                "Metadata folder {} does not exist, starting from empty metadata",
                self.source.location()
            );
            return Ok(empty_map());
        }

        let mut tree = empty_map();
        for name in names {
            let document = self.resolve(name, &mut Vec::new())?;
            merge(&mut tree, document);
        }

        Ok(tree)
    }

    /// One document merged over its resolved parents.
    ///
    /// `chain` holds the documents currently being resolved, outermost first.
    fn resolve(&self, name: &str, chain: &mut Vec<String>) -> MellResult<Value> {
        if chain.iter().any(|seen| seen == name) {
            chain.push(name.to_owned());
            return Err(ApplicationError::InheritanceCycle {
                chain: chain.join(" -> "),
            }
            .into());
        }

        debug!(document = name, "Loading metadata document");
        let mut document = self.source.fetch(name)?;

        let parents = match &mut document {
            Value::Object(map) => map.shift_remove(PARENT_KEY),
            other => {
                return Err(ApplicationError::MetadataParse {
                    name: name.to_owned(),
                    reason: format!("top-level value is a {}, expected an object", type_name(other)),
                }
                .into());
            }
        };

        let parents = match parents {
            None => return Ok(document),
            Some(Value::String(parents)) => parents,
            Some(other) => {
                return Err(ApplicationError::MetadataParse {
                    name: name.to_owned(),
                    reason: format!("{PARENT_KEY} must be a string, found a {}", type_name(&other)),
                }
                .into());
            }
        };

        chain.push(name.to_owned());
        let mut base = empty_map();
        for parent in split_names(&parents, PARENT_SEPARATORS) {
            let resolved = self.resolve(parent, chain)?;
            merge(&mut base, resolved);
        }
        chain.pop();

        merge(&mut base, document);
        Ok(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::output::MockMetadataSource;
    use crate::error::MellError;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashMap;

    fn source_with(documents: HashMap<&'static str, Value>) -> MockMetadataSource {
        let mut source = MockMetadataSource::new();
        source.expect_is_available().return_const(true);
        source.expect_location().return_const("meta".to_string());
        source.expect_fetch().returning(move |name| {
            documents.get(name).cloned().ok_or_else(|| {
                ApplicationError::MetadataNotFound {
                    name: name.to_owned(),
                    location: "meta".into(),
                }
                .into()
            })
        });
        source
    }

    fn loader(documents: Vec<(&'static str, Value)>) -> MetadataLoader {
        MetadataLoader::new(Box::new(source_with(documents.into_iter().collect())))
    }

    #[test]
    fn later_documents_win() {
        let loader = loader(vec![
            ("a", json!({"name": "a", "only_a": 1, "shared": {"x": 1}})),
            ("b", json!({"name": "b", "shared": {"y": 2}})),
        ]);
        let tree = loader.load("a,b").unwrap();
        assert_eq!(
            tree,
            json!({"name": "b", "only_a": 1, "shared": {"x": 1, "y": 2}})
        );
    }

    #[test]
    fn document_wins_over_parent_and_parent_key_is_dropped() {
        let loader = loader(vec![
            ("base", json!({"color": "blue", "size": 1})),
            ("child", json!({"__parent__": "base", "color": "red"})),
        ]);
        let tree = loader.load("child").unwrap();
        assert_eq!(tree, json!({"color": "red", "size": 1}));
    }

    #[test]
    fn multiple_parents_merge_left_to_right() {
        let loader = loader(vec![
            ("one", json!({"v": 1, "one": true})),
            ("two", json!({"v": 2, "two": true})),
            ("leaf", json!({"__parent__": "one, two", "leaf": true})),
        ]);
        let tree = loader.load("leaf").unwrap();
        assert_eq!(tree, json!({"v": 2, "one": true, "two": true, "leaf": true}));
    }

    #[test]
    fn diamond_inheritance_is_not_a_cycle() {
        let loader = loader(vec![
            ("root", json!({"r": 1})),
            ("left", json!({"__parent__": "root", "l": 1})),
            ("right", json!({"__parent__": "root", "r2": 1})),
            ("tip", json!({"__parent__": "left right"})),
        ]);
        let tree = loader.load("tip").unwrap();
        assert_eq!(tree, json!({"r": 1, "l": 1, "r2": 1}));
    }

    #[test]
    fn inheritance_cycle_is_reported() {
        let loader = loader(vec![
            ("a", json!({"__parent__": "b"})),
            ("b", json!({"__parent__": "a"})),
        ]);
        let err = loader.load("a").unwrap_err();
        assert!(matches!(
            err,
            MellError::Application(ApplicationError::InheritanceCycle { ref chain }) if chain == "a -> b -> a"
        ));
    }

    #[test]
    fn missing_document_is_not_found() {
        let loader = loader(vec![("a", json!({}))]);
        let err = loader.load("a,ghost").unwrap_err();
        assert!(matches!(
            err,
            MellError::Application(ApplicationError::MetadataNotFound { ref name, .. }) if name == "ghost"
        ));
    }

    #[test]
    fn non_object_document_is_a_parse_error() {
        let loader = loader(vec![("list", json!([1, 2]))]);
        let err = loader.load("list").unwrap_err();
        assert!(matches!(
            err,
            MellError::Application(ApplicationError::MetadataParse { .. })
        ));
    }

    #[test]
    fn unavailable_source_with_no_names_is_empty() {
        let mut source = MockMetadataSource::new();
        source.expect_is_available().return_const(false);
        source.expect_location().return_const("nowhere".to_string());
        source.expect_fetch().never();

        let loader = MetadataLoader::new(Box::new(source));
        assert_eq!(loader.load("").unwrap(), json!({}));
        assert!(loader.load("a").is_err());
    }
}
