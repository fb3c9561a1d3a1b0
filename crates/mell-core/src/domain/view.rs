//! Script-facing view over a node of the metadata tree.
//!
//! Scripts never see `serde_json::Value` plumbing directly. They read and
//! write through a [`MetaView`], which keeps the two JSON container kinds
//! apart and turns "not there" into a null view instead of an error:
//!
//! ```text
//! meta.get_field("user")      -> Member::View   (map or sequence child)
//! meta.get_field("age")       -> Member::Leaf   (scalar child, read-only)
//! meta.get_field("nope")      -> Member::View   (missing: reads as null)
//! missing.get_field("deeper") -> Member::View   (still missing)
//! missing.iter()              -> Err(MissingValue)
//! ```
//!
//! Reads are forgiving, structural operations on a missing value are not:
//! indexing, key lookup, iteration, membership, length and writes through
//! a null view all fail with [`DomainError::MissingValue`].

use std::slice;

use serde_json::map;

use super::address::Address;
use super::error::{DomainError, PathError};
use super::path;
use super::value::{Value, is_truthy, type_name};

static NULL: Value = Value::Null;

/// Mutable view over one node, or over nothing at all.
#[derive(Debug)]
pub struct MetaView<'a> {
    node: Option<&'a mut Value>,
}

impl<'a> MetaView<'a> {
    pub fn new(node: &'a mut Value) -> Self {
        Self { node: Some(node) }
    }

    /// A view over an absent value. Reads as null.
    pub fn missing() -> Self {
        Self { node: None }
    }

    pub fn is_missing(&self) -> bool {
        self.node.is_none()
    }

    /// Shorter-lived view over the same node.
    pub fn reborrow(&mut self) -> MetaView<'_> {
        MetaView {
            node: self.node.as_deref_mut(),
        }
    }

    /// The viewed value; null when missing.
    pub fn value(&self) -> &Value {
        self.node.as_deref().unwrap_or(&NULL)
    }

    pub fn to_value(&self) -> Value {
        self.value().clone()
    }

    pub fn is_null(&self) -> bool {
        self.value().is_null()
    }

    pub fn is_truthy(&self) -> bool {
        is_truthy(self.value())
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value().as_str()
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.value().as_i64()
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.value().as_f64()
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.value().as_bool()
    }

    // ── reads ───────────────────────────────────────────────────────────

    /// Read a map field. Never fails: anything that is not a present key of
    /// a map yields a missing view.
    pub fn get_field(&mut self, name: &str) -> Member<'_> {
        self.reborrow().into_field(name)
    }

    pub fn into_field(self, name: &str) -> Member<'a> {
        match self.node {
            Some(Value::Object(map)) => match map.get_mut(name) {
                Some(child) => Member::from_node(child),
                None => Member::View(MetaView::missing()),
            },
            _ => Member::View(MetaView::missing()),
        }
    }

    /// Read a sequence element.
    pub fn get_index(&mut self, index: usize) -> Result<Member<'_>, DomainError> {
        self.reborrow().into_index(index)
    }

    pub fn into_index(self, index: usize) -> Result<Member<'a>, DomainError> {
        const OP: &str = "index";
        match self.node {
            Some(Value::Array(items)) => {
                let len = items.len();
                items
                    .get_mut(index)
                    .map(Member::from_node)
                    .ok_or(DomainError::Shape(PathError::IndexOutOfRange { index, len }))
            }
            Some(Value::Object(_)) => Err(PathError::ExpectedField {
                step: format!("[{index}]"),
            }
            .into()),
            None | Some(Value::Null) => Err(DomainError::MissingValue { operation: OP }),
            Some(other) => Err(DomainError::NotAContainer {
                operation: OP,
                found: type_name(other),
            }),
        }
    }

    /// Read a map entry by key. Unlike [`MetaView::get_field`], an absent key
    /// is an error.
    pub fn get_key(&mut self, key: &str) -> Result<Member<'_>, DomainError> {
        self.reborrow().into_key(key)
    }

    pub fn into_key(self, key: &str) -> Result<Member<'a>, DomainError> {
        const OP: &str = "look up a key in";
        match self.node {
            Some(Value::Object(map)) => map
                .get_mut(key)
                .map(Member::from_node)
                .ok_or_else(|| DomainError::KeyNotFound(key.to_owned())),
            Some(Value::Array(_)) => Err(PathError::ExpectedIndex {
                step: key.to_owned(),
            }
            .into()),
            None | Some(Value::Null) => Err(DomainError::MissingValue { operation: OP }),
            Some(other) => Err(DomainError::NotAContainer {
                operation: OP,
                found: type_name(other),
            }),
        }
    }

    /// View the node at a dotted/bracket address below this one.
    ///
    /// A path that does not exist gives a missing view.
    pub fn at(&mut self, address: &str) -> Result<MetaView<'_>, DomainError> {
        let address = Address::parse(address)?;
        Ok(self.reborrow().into_at(&address))
    }

    pub fn into_at(self, address: &Address) -> MetaView<'a> {
        MetaView {
            node: self.node.and_then(|node| path::lookup_mut(node, address)),
        }
    }

    // ── container queries ───────────────────────────────────────────────

    /// Number of entries, elements, or characters.
    pub fn len(&self) -> Result<usize, DomainError> {
        const OP: &str = "measure";
        match self.value() {
            Value::Object(map) => Ok(map.len()),
            Value::Array(items) => Ok(items.len()),
            Value::String(s) => Ok(s.chars().count()),
            Value::Null => Err(DomainError::MissingValue { operation: OP }),
            other => Err(DomainError::NotAContainer {
                operation: OP,
                found: type_name(other),
            }),
        }
    }

    pub fn is_empty(&self) -> Result<bool, DomainError> {
        self.len().map(|len| len == 0)
    }

    /// Key membership for maps, element membership for sequences, substring
    /// search for strings.
    pub fn contains(&self, needle: impl Into<Value>) -> Result<bool, DomainError> {
        const OP: &str = "search";
        let needle = needle.into();
        match self.value() {
            Value::Object(map) => Ok(needle.as_str().is_some_and(|key| map.contains_key(key))),
            Value::Array(items) => Ok(items.contains(&needle)),
            Value::String(s) => Ok(needle.as_str().is_some_and(|sub| s.contains(sub))),
            Value::Null => Err(DomainError::MissingValue { operation: OP }),
            other => Err(DomainError::NotAContainer {
                operation: OP,
                found: type_name(other),
            }),
        }
    }

    /// Iterate `(key, view)` pairs of a map or element views of a sequence.
    pub fn iter(&mut self) -> Result<Iter<'_>, DomainError> {
        self.reborrow().into_entries()
    }

    pub fn into_entries(self) -> Result<Iter<'a>, DomainError> {
        const OP: &str = "iterate";
        match self.node {
            Some(Value::Object(map)) => Ok(Iter {
                inner: IterInner::Map(map.iter_mut()),
            }),
            Some(Value::Array(items)) => Ok(Iter {
                inner: IterInner::Seq(items.iter_mut()),
            }),
            None | Some(Value::Null) => Err(DomainError::MissingValue { operation: OP }),
            Some(other) => Err(DomainError::NotAContainer {
                operation: OP,
                found: type_name(other),
            }),
        }
    }

    // ── writes ──────────────────────────────────────────────────────────

    /// Insert or replace a map field.
    pub fn set_field(&mut self, name: &str, value: impl Into<Value>) -> Result<(), DomainError> {
        const OP: &str = "set a field of";
        match self.node.as_deref_mut() {
            Some(Value::Object(map)) => {
                map.insert(name.to_owned(), value.into());
                Ok(())
            }
            Some(Value::Array(_)) => Err(PathError::ExpectedIndex {
                step: name.to_owned(),
            }
            .into()),
            None | Some(Value::Null) => Err(DomainError::MissingValue { operation: OP }),
            Some(other) => Err(DomainError::NotAContainer {
                operation: OP,
                found: type_name(other),
            }),
        }
    }

    /// Replace an existing sequence element. Does not grow the sequence.
    pub fn set_index(&mut self, index: usize, value: impl Into<Value>) -> Result<(), DomainError> {
        const OP: &str = "set an element of";
        match self.node.as_deref_mut() {
            Some(Value::Array(items)) => {
                let len = items.len();
                let slot = items
                    .get_mut(index)
                    .ok_or(DomainError::Shape(PathError::IndexOutOfRange { index, len }))?;
                *slot = value.into();
                Ok(())
            }
            Some(Value::Object(_)) => Err(PathError::ExpectedField {
                step: format!("[{index}]"),
            }
            .into()),
            None | Some(Value::Null) => Err(DomainError::MissingValue { operation: OP }),
            Some(other) => Err(DomainError::NotAContainer {
                operation: OP,
                found: type_name(other),
            }),
        }
    }

    /// Assign through an address, creating intermediate structure.
    pub fn set(&mut self, address: &str, value: impl Into<Value>) -> Result<(), DomainError> {
        let parsed = Address::parse(address)?;
        match self.node.as_deref_mut() {
            None | Some(Value::Null) => Err(DomainError::MissingValue {
                operation: "set a path in",
            }),
            Some(node) => path::set(node, &parsed, value.into())
                .map_err(|source| DomainError::at_address(address, source)),
        }
    }

    /// Append to a sequence.
    pub fn push(&mut self, value: impl Into<Value>) -> Result<(), DomainError> {
        const OP: &str = "append to";
        match self.node.as_deref_mut() {
            Some(Value::Array(items)) => {
                items.push(value.into());
                Ok(())
            }
            None | Some(Value::Null) => Err(DomainError::MissingValue { operation: OP }),
            Some(other) => Err(DomainError::NotAContainer {
                operation: OP,
                found: type_name(other),
            }),
        }
    }
}

impl PartialEq for MetaView<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value()
    }
}

impl PartialEq<Value> for MetaView<'_> {
    fn eq(&self, other: &Value) -> bool {
        self.value() == other
    }
}

impl PartialEq<MetaView<'_>> for Value {
    fn eq(&self, other: &MetaView<'_>) -> bool {
        self == other.value()
    }
}

/// Result of a field or index read: containers come back as views, scalars
/// as plain read-only values.
#[derive(Debug)]
pub enum Member<'a> {
    View(MetaView<'a>),
    Leaf(&'a Value),
}

impl<'a> Member<'a> {
    fn from_node(node: &'a mut Value) -> Self {
        if node.is_object() || node.is_array() {
            Self::View(MetaView::new(node))
        } else {
            Self::Leaf(node)
        }
    }

    pub fn value(&self) -> &Value {
        match self {
            Self::View(view) => view.value(),
            Self::Leaf(value) => value,
        }
    }

    pub fn to_value(&self) -> Value {
        self.value().clone()
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    pub fn is_null(&self) -> bool {
        self.value().is_null()
    }

    pub fn is_truthy(&self) -> bool {
        is_truthy(self.value())
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value().as_str()
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.value().as_i64()
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.value().as_f64()
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.value().as_bool()
    }

    /// Field read that keeps chaining through leaves (as missing views).
    pub fn get_field(&mut self, name: &str) -> Member<'_> {
        match self {
            Self::View(view) => view.get_field(name),
            Self::Leaf(_) => Member::View(MetaView::missing()),
        }
    }

    pub fn into_field(self, name: &str) -> Member<'a> {
        match self {
            Self::View(view) => view.into_field(name),
            Self::Leaf(_) => Member::View(MetaView::missing()),
        }
    }

    /// The container view, failing for scalar leaves.
    pub fn into_view(self) -> Result<MetaView<'a>, DomainError> {
        const OP: &str = "use as a container";
        match self {
            Self::View(view) => Ok(view),
            Self::Leaf(Value::Null) => Err(DomainError::MissingValue { operation: OP }),
            Self::Leaf(other) => Err(DomainError::NotAContainer {
                operation: OP,
                found: type_name(other),
            }),
        }
    }
}

impl PartialEq<Value> for Member<'_> {
    fn eq(&self, other: &Value) -> bool {
        self.value() == other
    }
}

/// Iterator returned by [`MetaView::iter`].
pub struct Iter<'a> {
    inner: IterInner<'a>,
}

enum IterInner<'a> {
    Map(map::IterMut<'a>),
    Seq(slice::IterMut<'a, Value>),
}

impl<'a> Iterator for Iter<'a> {
    type Item = Entry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IterInner::Map(entries) => entries
                .next()
                .map(|(key, value)| Entry::Pair(key.as_str(), MetaView::new(value))),
            IterInner::Seq(items) => items.next().map(|value| Entry::Element(MetaView::new(value))),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            IterInner::Map(entries) => entries.size_hint(),
            IterInner::Seq(items) => items.size_hint(),
        }
    }
}

/// One item of a map or sequence iteration.
#[derive(Debug)]
pub enum Entry<'a> {
    Pair(&'a str, MetaView<'a>),
    Element(MetaView<'a>),
}

impl<'a> Entry<'a> {
    /// The map key; `None` for sequence elements.
    pub fn key(&self) -> Option<&'a str> {
        match self {
            Self::Pair(key, _) => Some(*key),
            Self::Element(_) => None,
        }
    }

    pub fn view(&mut self) -> &mut MetaView<'a> {
        match self {
            Self::Pair(_, view) | Self::Element(view) => view,
        }
    }

    pub fn into_view(self) -> MetaView<'a> {
        match self {
            Self::Pair(_, view) | Self::Element(view) => view,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "name": "Root",
            "count": 0,
            "users": [
                {"name": "Ann", "admin": true},
                {"name": "Bob", "admin": false}
            ],
            "tags": {"a": 1, "b": 2}
        })
    }

    // ========================================================================
    // Reads
    // ========================================================================

    #[test]
    fn test_field_read_scalar_is_leaf() {
        let mut tree = sample();
        let mut view = MetaView::new(&mut tree);
        let name = view.get_field("name");
        assert!(name.is_leaf());
        assert_eq!(name.as_str(), Some("Root"));
    }

    #[test]
    fn test_field_read_container_is_view() {
        let mut tree = sample();
        let mut view = MetaView::new(&mut tree);
        assert!(matches!(view.get_field("users"), Member::View(_)));
    }

    #[test]
    fn test_absent_field_is_null_view_and_chains() {
        let mut tree = sample();
        let mut view = MetaView::new(&mut tree);
        let mut absent = view.get_field("nope");
        assert!(absent.is_null());
        assert_eq!(absent, Value::Null);
        assert!(absent.get_field("deeper").get_field("still").is_null());
    }

    #[test]
    fn test_missing_view_fails_structural_operations() {
        let mut missing = MetaView::missing();
        assert!(matches!(missing.get_index(0), Err(DomainError::MissingValue { .. })));
        assert!(matches!(missing.get_key("a"), Err(DomainError::MissingValue { .. })));
        assert!(matches!(missing.iter(), Err(DomainError::MissingValue { .. })));
        assert!(matches!(missing.contains("a"), Err(DomainError::MissingValue { .. })));
        assert!(matches!(missing.len(), Err(DomainError::MissingValue { .. })));
        assert!(matches!(
            missing.set_field("a", 1),
            Err(DomainError::MissingValue { .. })
        ));
        assert!(matches!(missing.set("a.b", 1), Err(DomainError::MissingValue { .. })));
    }

    #[test]
    fn test_index_reads() {
        let mut tree = sample();
        let mut view = MetaView::new(&mut tree);
        let mut users = view.get_field("users").into_view().unwrap();

        let first = users.get_index(0).unwrap().into_field("name");
        assert_eq!(first, json!("Ann"));

        assert!(matches!(
            users.get_index(5),
            Err(DomainError::Shape(PathError::IndexOutOfRange { index: 5, len: 2 }))
        ));
        assert!(matches!(
            view.get_index(0),
            Err(DomainError::Shape(PathError::ExpectedField { .. }))
        ));
    }

    #[test]
    fn test_get_key_is_strict() {
        let mut tree = sample();
        let mut view = MetaView::new(&mut tree);
        assert_eq!(view.get_key("count").unwrap(), json!(0));
        assert_eq!(
            view.get_key("nope").unwrap_err(),
            DomainError::KeyNotFound("nope".into())
        );
    }

    #[test]
    fn test_at_reads_by_address() {
        let mut tree = sample();
        let mut view = MetaView::new(&mut tree);
        assert_eq!(view.at("users[1].name").unwrap(), json!("Bob"));
        assert!(view.at("users[9].name").unwrap().is_missing());
        assert!(view.at("users[").is_err());
    }

    // ========================================================================
    // Iteration & queries
    // ========================================================================

    #[test]
    fn test_map_iteration_in_order() {
        let mut tree = sample();
        let mut view = MetaView::new(&mut tree);
        let keys: Vec<_> = view.iter().unwrap().filter_map(|e| e.key()).collect();
        assert_eq!(keys, vec!["name", "count", "users", "tags"]);
    }

    #[test]
    fn test_sequence_iteration_yields_views() {
        let mut tree = sample();
        let mut view = MetaView::new(&mut tree);
        let users = view.get_field("users").into_view().unwrap();
        let names: Vec<_> = users
            .into_entries()
            .unwrap()
            .map(|entry| {
                assert!(entry.key().is_none());
                entry.into_view().value()["name"].clone()
            })
            .collect();
        assert_eq!(names, vec![json!("Ann"), json!("Bob")]);
    }

    #[test]
    fn test_contains_and_len() {
        let mut tree = sample();
        let mut view = MetaView::new(&mut tree);
        assert!(view.contains("users").unwrap());
        assert!(!view.contains("Root").unwrap());
        assert_eq!(view.len().unwrap(), 4);

        let tags = view.get_field("tags").into_view().unwrap();
        assert!(tags.contains("a").unwrap());
        assert!(matches!(
            MetaView::new(&mut json!(3)).contains("a"),
            Err(DomainError::NotAContainer { .. })
        ));
        assert_eq!(MetaView::new(&mut json!("héllo")).len().unwrap(), 5);
        assert!(MetaView::new(&mut json!("héllo")).contains("éll").unwrap());
        assert!(MetaView::new(&mut json!([1, 2])).contains(2).unwrap());
    }

    #[test]
    fn test_truthiness() {
        let mut tree = sample();
        let mut view = MetaView::new(&mut tree);
        assert!(view.is_truthy());
        assert!(!view.get_field("count").is_truthy());
        assert!(!view.get_field("nope").is_truthy());
        assert!(MetaView::new(&mut json!([0])).is_truthy());
        assert!(!MetaView::new(&mut json!({})).is_truthy());
    }

    // ========================================================================
    // Writes
    // ========================================================================

    #[test]
    fn test_writes_mutate_the_tree() {
        let mut tree = sample();
        {
            let mut view = MetaView::new(&mut tree);
            view.set_field("extra", "x").unwrap();
            view.set("users[0].email", "ann@company.com").unwrap();
            let mut users = view.get_field("users").into_view().unwrap();
            users.set_index(1, json!({"name": "Cy"})).unwrap();
            users.push(json!({"name": "Di"})).unwrap();
        }
        assert_eq!(tree["extra"], json!("x"));
        assert_eq!(tree["users"][0]["email"], json!("ann@company.com"));
        assert_eq!(tree["users"][1], json!({"name": "Cy"}));
        assert_eq!(tree["users"][2], json!({"name": "Di"}));
    }

    #[test]
    fn test_write_errors() {
        let mut tree = sample();
        let mut view = MetaView::new(&mut tree);
        let mut users = view.get_field("users").into_view().unwrap();
        assert!(matches!(
            users.set_field("x", 1),
            Err(DomainError::Shape(PathError::ExpectedIndex { .. }))
        ));
        assert!(matches!(
            users.set_index(7, 1),
            Err(DomainError::Shape(PathError::IndexOutOfRange { index: 7, len: 2 }))
        ));
        assert!(matches!(
            view.set("name.first", 1),
            Err(DomainError::Path { .. })
        ));
    }

    #[test]
    fn test_iteration_writes_reach_every_element() {
        let mut tree = sample();
        let mut view = MetaView::new(&mut tree);
        let users = view.get_field("users").into_view().unwrap();
        for entry in users.into_entries().unwrap() {
            let mut user = entry.into_view();
            let name = user.get_field("name").as_str().unwrap_or_default().to_lowercase();
            user.set_field("email", format!("{name}@company.com")).unwrap();
        }
        assert_eq!(tree["users"][1]["email"], json!("bob@company.com"));
    }

    #[test]
    fn test_equality() {
        let mut a = json!({"k": [1, 2]});
        let mut b = json!({"k": [1, 2]});
        assert_eq!(MetaView::new(&mut a), MetaView::new(&mut b));
        assert_eq!(MetaView::missing(), Value::Null);
        assert_eq!(Value::Null, MetaView::missing());
    }
}
