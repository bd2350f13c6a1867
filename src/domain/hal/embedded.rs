// The `_embedded` section of a HAL resource

use std::collections::BTreeMap;

use serde_json::{Map, Value as JsonValue};
use url::Url;

use crate::error::HalError;

use super::{ReadOptions, Resource, WriteOptions};

#[derive(Debug, Clone, PartialEq)]
struct Embedded {
    resources: Vec<Resource>,
    is_array: bool,
}

/// Embedded resources keyed by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddedResources {
    entries: BTreeMap<String, Embedded>,
}

impl EmbeddedResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(
        value: &JsonValue,
        base_url: Option<&Url>,
        options: ReadOptions,
    ) -> Result<Self, HalError> {
        let object = value
            .as_object()
            .ok_or_else(|| HalError::NotAnObject("_embedded".to_string()))?;

        let mut entries = BTreeMap::new();
        for (name, value) in object {
            let embedded = match value {
                JsonValue::Array(items) => Embedded {
                    resources: items
                        .iter()
                        .map(|item| Resource::from_json(item, base_url, options))
                        .collect::<Result<_, _>>()?,
                    is_array: true,
                },
                single => Embedded {
                    resources: vec![Resource::from_json(single, base_url, options)?],
                    is_array: false,
                },
            };
            entries.insert(name.clone(), embedded);
        }

        Ok(Self { entries })
    }

    pub fn to_json(&self, options: WriteOptions) -> JsonValue {
        let mut object = Map::new();
        for (name, embedded) in &self.entries {
            let value = match embedded.resources.as_slice() {
                [single] if !embedded.is_array => single.to_json(options),
                resources => {
                    JsonValue::Array(resources.iter().map(|r| r.to_json(options)).collect())
                }
            };
            object.insert(name.clone(), value);
        }
        JsonValue::Object(object)
    }

    pub fn insert(&mut self, name: impl Into<String>, resource: Resource) {
        let embedded = self.entries.entry(name.into()).or_insert_with(|| Embedded {
            resources: Vec::new(),
            is_array: false,
        });
        embedded.resources.push(resource);
        if embedded.resources.len() > 1 {
            embedded.is_array = true;
        }
    }

    pub fn resource_names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources(name).first()
    }

    pub fn resources(&self, name: &str) -> &[Resource] {
        self.entries
            .get(name)
            .map(|embedded| embedded.resources.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
