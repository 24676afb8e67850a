//! # Attribute Tree
//!
//! String-keyed store of typed values that block entities persist
//! themselves into. The host owns the tree and its on-disk form; entities
//! only read and write keys.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{HearthError, HearthResult};

/// One stored value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// 32-bit integer.
    Int(i32),
    /// 32-bit float.
    Float(f32),
    /// Flag.
    Bool(bool),
    /// Text.
    String(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Integer list.
    IntArray(Vec<i32>),
    /// Text list.
    StringArray(Vec<String>),
    /// Nested tree.
    Tree(AttributeTree),
}

impl From<i32> for AttributeValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for AttributeValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<Vec<i32>> for AttributeValue {
    fn from(v: Vec<i32>) -> Self {
        Self::IntArray(v)
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(v: Vec<String>) -> Self {
        Self::StringArray(v)
    }
}

impl From<AttributeTree> for AttributeValue {
    fn from(v: AttributeTree) -> Self {
        Self::Tree(v)
    }
}

/// Ordered attribute map.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeTree {
    entries: BTreeMap<String, AttributeValue>,
}

impl AttributeTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value, replacing any previous one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Raw value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.entries.get(key)
    }

    /// Removes a key.
    pub fn remove(&mut self, key: &str) -> Option<AttributeValue> {
        self.entries.remove(key)
    }

    /// Returns true if the key is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no key is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Integer at `key`.
    #[must_use]
    pub fn get_int(&self, key: &str) -> Option<i32> {
        match self.get(key)? {
            AttributeValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Float at `key`.
    #[must_use]
    pub fn get_float(&self, key: &str) -> Option<f32> {
        match self.get(key)? {
            AttributeValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Flag at `key`.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            AttributeValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Text at `key`.
    #[must_use]
    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            AttributeValue::String(v) => Some(v),
            _ => None,
        }
    }

    /// Bytes at `key`.
    #[must_use]
    pub fn get_bytes(&self, key: &str) -> Option<&[u8]> {
        match self.get(key)? {
            AttributeValue::Bytes(v) => Some(v),
            _ => None,
        }
    }

    /// Integer list at `key`.
    #[must_use]
    pub fn get_int_array(&self, key: &str) -> Option<&[i32]> {
        match self.get(key)? {
            AttributeValue::IntArray(v) => Some(v),
            _ => None,
        }
    }

    /// Text list at `key`.
    #[must_use]
    pub fn get_string_array(&self, key: &str) -> Option<&[String]> {
        match self.get(key)? {
            AttributeValue::StringArray(v) => Some(v),
            _ => None,
        }
    }

    /// Nested tree at `key`.
    #[must_use]
    pub fn get_tree(&self, key: &str) -> Option<&AttributeTree> {
        match self.get(key)? {
            AttributeValue::Tree(v) => Some(v),
            _ => None,
        }
    }

    /// Integer list at `key`, required.
    ///
    /// # Errors
    ///
    /// Returns `Attribute` if missing or not an integer list.
    pub fn require_int_array(&self, key: &str) -> HearthResult<&[i32]> {
        self.get_int_array(key).ok_or_else(|| HearthError::Attribute {
            key: key.to_string(),
            expected: "int array",
        })
    }

    /// Text list at `key`, required.
    ///
    /// # Errors
    ///
    /// Returns `Attribute` if missing or not a text list.
    pub fn require_string_array(&self, key: &str) -> HearthResult<&[String]> {
        self.get_string_array(key).ok_or_else(|| HearthError::Attribute {
            key: key.to_string(),
            expected: "string array",
        })
    }
}
