// A HAL resource: payload, links and embedded resources

use serde_json::{Map, Value as JsonValue};
use url::Url;

use crate::error::HalError;

use super::{EmbeddedResources, Link, Links, ReadOptions, WriteOptions};

const LINKS_KEY: &str = "_links";
const EMBEDDED_KEY: &str = "_embedded";
const SELF_REL: &str = "self";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resource {
    payload: Map<String, JsonValue>,
    links: Links,
    embedded: EmbeddedResources,
    base_url: Option<Url>,
}

impl Resource {
    pub fn new(payload: Map<String, JsonValue>) -> Self {
        Self {
            payload,
            ..Self::default()
        }
    }

    /// Read a resource from a JSON object.
    ///
    /// Links and embedded resources resolve relative hrefs against `base_url`,
    /// or against the resource's own `self` link when
    /// [`ReadOptions::infer_base_url`] is set and that link is absolute.
    pub fn from_json(
        value: &JsonValue,
        base_url: Option<&Url>,
        options: ReadOptions,
    ) -> Result<Self, HalError> {
        let object = value
            .as_object()
            .ok_or_else(|| HalError::NotAnObject("resource".to_string()))?;

        let links_value = object.get(LINKS_KEY);
        let inferred = links_value
            .filter(|_| options.infer_base_url)
            .and_then(|links| infer_base_url(links, options));
        let base_url = match inferred {
            Some(inferred) => {
                tracing::trace!(base_url = %inferred, "inferred base URL from self link");
                Some(inferred)
            }
            None => base_url.cloned(),
        };

        let links = match links_value {
            Some(value) => Links::from_json(value, base_url.as_ref(), options)?,
            None => Links::new(),
        };
        let embedded = match object.get(EMBEDDED_KEY) {
            Some(value) => EmbeddedResources::from_json(value, base_url.as_ref(), options)?,
            None => EmbeddedResources::new(),
        };

        let payload = object
            .iter()
            .filter(|(key, _)| key.as_str() != LINKS_KEY && key.as_str() != EMBEDDED_KEY)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self {
            payload,
            links,
            embedded,
            base_url,
        })
    }

    pub fn to_json(&self, options: WriteOptions) -> JsonValue {
        let mut object = self.payload.clone();
        if !self.links.is_empty() {
            object.insert(LINKS_KEY.to_string(), self.links.to_json(options));
        }
        if !self.embedded.is_empty() {
            object.insert(EMBEDDED_KEY.to_string(), self.embedded.to_json(options));
        }
        JsonValue::Object(object)
    }

    pub fn payload(&self) -> &Map<String, JsonValue> {
        &self.payload
    }

    pub fn links(&self) -> &Links {
        &self.links
    }

    pub fn links_mut(&mut self) -> &mut Links {
        &mut self.links
    }

    pub fn embedded(&self) -> &EmbeddedResources {
        &self.embedded
    }

    pub fn embedded_mut(&mut self) -> &mut EmbeddedResources {
        &mut self.embedded
    }

    /// Base URL the resource's links resolve against
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }
}

/// URL of the first `self` link when it is absolute and needs no variables
fn infer_base_url(links: &JsonValue, options: ReadOptions) -> Option<Url> {
    let self_value = match links.get(SELF_REL)? {
        JsonValue::Array(items) => items.first()?,
        single => single,
    };
    let link = Link::from_json(SELF_REL, self_value, None, options).ok()?;
    if !link.template_variable_names().is_empty() {
        return None;
    }
    link.url().ok()
}
