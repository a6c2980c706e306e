use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::flatten::Layer;

/// An annotated document: a base text and its layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Base text lines, without separators.
    pub base_text: Vec<String>,
    #[serde(default)]
    pub layers: Vec<TextLayer>,
}

/// A collection of fragments of one annotation type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextLayer {
    pub type_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,
    #[serde(default)]
    pub fragments: Vec<Fragment>,
}

/// One annotation anchored to the base text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// Token coordinate, e.g. `1.2@3-2`.
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Fragment {
    pub fn at(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            tag: None,
            text: None,
            attributes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

impl TextLayer {
    pub fn new(type_id: impl Into<String>, fragments: Vec<Fragment>) -> Self {
        Self {
            type_id: type_id.into(),
            role_id: None,
            fragments,
        }
    }

    #[must_use]
    pub fn with_role(mut self, role_id: impl Into<String>) -> Self {
        self.role_id = Some(role_id.into());
        self
    }
}

impl Layer for TextLayer {
    /// `type_id`, or `type_id|role_id` when a role is set.
    fn key(&self) -> String {
        match self.role_id.as_deref() {
            Some(role) if !role.is_empty() => format!("{}|{role}", self.type_id),
            _ => self.type_id.clone(),
        }
    }

    fn fragment_locations(&self) -> Vec<&str> {
        self.fragments.iter().map(|f| f.location.as_str()).collect()
    }
}
