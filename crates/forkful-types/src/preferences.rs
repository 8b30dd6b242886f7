//! Typed key/value bags for user preferences and response metadata.
//!
//! Both are open mappings keyed by string, but each value must fit a small
//! closed set of shapes. Payloads outside those shapes fail to deserialize,
//! so malformed data is rejected at the boundary rather than deep inside
//! the client.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Value shapes allowed in [`Preferences`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreferenceValue {
    Flag(bool),
    Number(f64),
    Text(String),
    TextList(Vec<String>),
}

impl From<&str> for PreferenceValue {
    fn from(value: &str) -> Self {
        PreferenceValue::Text(value.to_string())
    }
}

impl From<String> for PreferenceValue {
    fn from(value: String) -> Self {
        PreferenceValue::Text(value)
    }
}

impl From<bool> for PreferenceValue {
    fn from(value: bool) -> Self {
        PreferenceValue::Flag(value)
    }
}

impl From<f64> for PreferenceValue {
    fn from(value: f64) -> Self {
        PreferenceValue::Number(value)
    }
}

impl From<Vec<String>> for PreferenceValue {
    fn from(value: Vec<String>) -> Self {
        PreferenceValue::TextList(value)
    }
}

/// User preferences forwarded with chat requests.
///
/// Well-known keys (`cuisine`, `price_range`, `dietary`) have typed helpers;
/// any other key may be set through [`Preferences::insert`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Preferences(BTreeMap<String, PreferenceValue>);

impl Preferences {
    pub const CUISINE: &'static str = "cuisine";
    pub const PRICE_RANGE: &'static str = "price_range";
    pub const DIETARY: &'static str = "dietary";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.insert(Self::CUISINE, cuisine.into());
        self
    }

    pub fn with_price_range(mut self, price_range: impl Into<String>) -> Self {
        self.insert(Self::PRICE_RANGE, price_range.into());
        self
    }

    pub fn with_dietary(mut self, dietary: Vec<String>) -> Self {
        self.insert(Self::DIETARY, dietary);
        self
    }

    /// Set an arbitrary preference key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PreferenceValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&PreferenceValue> {
        self.0.get(key)
    }

    pub fn cuisine(&self) -> Option<&str> {
        match self.0.get(Self::CUISINE) {
            Some(PreferenceValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Value shapes allowed in backend [`Metadata`].
///
/// `Map` exists because the backend echoes the request location back as a
/// nested object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Null,
    Flag(bool),
    Number(f64),
    Text(String),
    List(Vec<MetadataValue>),
    Map(BTreeMap<String, MetadataValue>),
}

impl MetadataValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetadataValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// Extra information attached to a chat response.
pub type Metadata = BTreeMap<String, MetadataValue>;
