// The `_links` section of a HAL resource

use std::collections::BTreeMap;

use serde_json::{Map, Value as JsonValue};
use url::Url;

use crate::error::HalError;

use super::{Link, ReadOptions, WriteOptions};

#[derive(Debug, Clone, PartialEq)]
struct Relation {
    links: Vec<Link>,
    /// Written back as an array even when it holds a single link
    is_array: bool,
}

/// Links keyed by relation name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Links {
    relations: BTreeMap<String, Relation>,
}

impl Links {
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
            .ok_or_else(|| HalError::NotAnObject("_links".to_string()))?;

        let mut relations = BTreeMap::new();
        for (rel, value) in object {
            let relation = match value {
                JsonValue::Array(items) => Relation {
                    links: items
                        .iter()
                        .map(|item| Link::from_json(rel, item, base_url, options))
                        .collect::<Result<_, _>>()?,
                    is_array: true,
                },
                single => Relation {
                    links: vec![Link::from_json(rel, single, base_url, options)?],
                    is_array: false,
                },
            };
            relations.insert(rel.clone(), relation);
        }

        Ok(Self { relations })
    }

    pub fn to_json(&self, options: WriteOptions) -> JsonValue {
        let mut object = Map::new();
        for (rel, relation) in &self.relations {
            let value = match relation.links.as_slice() {
                [single] if !relation.is_array => single.to_json(options),
                links => JsonValue::Array(links.iter().map(|l| l.to_json(options)).collect()),
            };
            object.insert(rel.clone(), value);
        }
        JsonValue::Object(object)
    }

    /// Append a link to a relation
    pub fn insert(&mut self, rel: impl Into<String>, link: Link) {
        let relation = self.relations.entry(rel.into()).or_insert_with(|| Relation {
            links: Vec::new(),
            is_array: false,
        });
        relation.links.push(link);
        if relation.links.len() > 1 {
            relation.is_array = true;
        }
    }

    /// Relation names in sorted order
    pub fn relation_names(&self) -> Vec<&str> {
        self.relations.keys().map(String::as_str).collect()
    }

    /// First link for a relation
    pub fn link(&self, rel: &str) -> Option<&Link> {
        self.links(rel).first()
    }

    pub fn links(&self, rel: &str) -> &[Link] {
        self.relations
            .get(rel)
            .map(|relation| relation.links.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, rel: &str) -> bool {
        self.relations.contains_key(rel)
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}
