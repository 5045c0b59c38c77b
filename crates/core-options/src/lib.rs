//! Typed option values resolved along a parent scope chain.
//!
//! Grounded on Kakoune's `option_manager.hh`/`option_types.hh` for the
//! typed-value enum and `scope.hh` for the parent-chain resolution model
//! (`Scope { parent, local_options }`, lookup walks up until an override is
//! found). The teacher's `core-config` crate is the precedent for "a small
//! typed-option crate lives next to the editor core"; its file-backed
//! defaults (`toml`, `dirs`) are not carried here -- loading option defaults
//! from disk is outer-CLI/file-I/O territory.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Int(i64),
    Bool(bool),
    Str(String),
    StrList(Vec<String>),
}

#[derive(Debug, thiserror::Error)]
pub enum OptionError {
    #[error("no such option: {0}")]
    NoSuchOption(String),
    #[error("option {name} is {actual:?}, not a {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        actual: OptionValue,
    },
}

pub type ScopeId = usize;

struct ScopeNode {
    parent: Option<ScopeId>,
    values: HashMap<String, OptionValue>,
}

/// A tree of option scopes (global -> buffer -> window, or similar);
/// `get` walks from a scope up to the root, returning the first override.
pub struct OptionTree {
    scopes: Vec<ScopeNode>,
}

impl Default for OptionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionTree {
    pub fn new() -> Self {
        OptionTree {
            scopes: vec![ScopeNode {
                parent: None,
                values: HashMap::new(),
            }],
        }
    }

    pub fn root(&self) -> ScopeId {
        0
    }

    pub fn create_child(&mut self, parent: ScopeId) -> ScopeId {
        let id = self.scopes.len();
        self.scopes.push(ScopeNode {
            parent: Some(parent),
            values: HashMap::new(),
        });
        id
    }

    pub fn set(&mut self, scope: ScopeId, name: impl Into<String>, value: OptionValue) {
        let name = name.into();
        tracing::trace!(scope, option = %name, "option set");
        self.scopes[scope].values.insert(name, value);
    }

    /// Walks `scope` up to the root, returning the first override found.
    pub fn get(&self, scope: ScopeId, name: &str) -> Option<&OptionValue> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(value) = self.scopes[id].values.get(name) {
                return Some(value);
            }
            current = self.scopes[id].parent;
        }
        None
    }

    pub fn get_int(&self, scope: ScopeId, name: &str) -> Result<i64, OptionError> {
        match self.get(scope, name) {
            Some(OptionValue::Int(v)) => Ok(*v),
            Some(other) => Err(OptionError::TypeMismatch {
                name: name.to_string(),
                expected: "Int",
                actual: other.clone(),
            }),
            None => Err(OptionError::NoSuchOption(name.to_string())),
        }
    }

    pub fn get_bool(&self, scope: ScopeId, name: &str) -> Result<bool, OptionError> {
        match self.get(scope, name) {
            Some(OptionValue::Bool(v)) => Ok(*v),
            Some(other) => Err(OptionError::TypeMismatch {
                name: name.to_string(),
                expected: "Bool",
                actual: other.clone(),
            }),
            None => Err(OptionError::NoSuchOption(name.to_string())),
        }
    }

    pub fn get_str(&self, scope: ScopeId, name: &str) -> Result<&str, OptionError> {
        match self.get(scope, name) {
            Some(OptionValue::Str(v)) => Ok(v.as_str()),
            Some(other) => Err(OptionError::TypeMismatch {
                name: name.to_string(),
                expected: "Str",
                actual: other.clone(),
            }),
            None => Err(OptionError::NoSuchOption(name.to_string())),
        }
    }

    pub fn get_str_list(&self, scope: ScopeId, name: &str) -> Result<&[String], OptionError> {
        match self.get(scope, name) {
            Some(OptionValue::StrList(v)) => Ok(v.as_slice()),
            Some(other) => Err(OptionError::TypeMismatch {
                name: name.to_string(),
                expected: "StrList",
                actual: other.clone(),
            }),
            None => Err(OptionError::NoSuchOption(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_scope_inherits_until_it_overrides() {
        let mut tree = OptionTree::new();
        let root = tree.root();
        tree.set(root, "tabstop", OptionValue::Int(8));
        let child = tree.create_child(root);
        assert_eq!(tree.get_int(child, "tabstop").unwrap(), 8);

        tree.set(child, "tabstop", OptionValue::Int(4));
        assert_eq!(tree.get_int(child, "tabstop").unwrap(), 4);
        assert_eq!(tree.get_int(root, "tabstop").unwrap(), 8, "parent scope is untouched");
    }

    #[test]
    fn missing_option_is_an_error_not_a_default() {
        let tree = OptionTree::new();
        let err = tree.get_int(tree.root(), "nope").unwrap_err();
        assert!(matches!(err, OptionError::NoSuchOption(_)));
    }

    #[test]
    fn reading_with_the_wrong_accessor_is_a_type_mismatch() {
        let mut tree = OptionTree::new();
        let root = tree.root();
        tree.set(root, "readonly", OptionValue::Bool(true));
        let err = tree.get_int(root, "readonly").unwrap_err();
        assert!(matches!(err, OptionError::TypeMismatch { .. }));
    }

    #[test]
    fn grandchild_resolves_through_two_parents() {
        let mut tree = OptionTree::new();
        let root = tree.root();
        let mid = tree.create_child(root);
        let leaf = tree.create_child(mid);
        tree.set(root, "extra_word_chars", OptionValue::StrList(vec!["_".into()]));
        assert_eq!(tree.get_str_list(leaf, "extra_word_chars").unwrap(), &["_".to_string()]);
    }
}
