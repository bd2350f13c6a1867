// Discovery service - resolves named entities to URLs

use std::collections::HashMap;

use serde_json::Value as JsonValue;
use url::Url;

use crate::{
    config::DiscoverySettings,
    domain::{
        hal::{Link, ReadOptions, Resource},
        template::{UriTemplate, VariableSource, Variables},
    },
    error::{ConfigError, DiscoveryError, TemplateError},
};

/// An entity to resolve into a URL
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    /// Looked up by name in the registry
    Named { name: String, variables: Variables },
    /// A URI template expanded directly
    Linked { uri: String, variables: Variables },
}

impl Entity {
    pub fn named(name: impl Into<String>) -> Self {
        Entity::Named {
            name: name.into(),
            variables: Variables::new(),
        }
    }

    pub fn linked(uri: impl Into<String>) -> Self {
        Entity::Linked {
            uri: uri.into(),
            variables: Variables::new(),
        }
    }

    pub fn with_variables(self, variables: Variables) -> Self {
        match self {
            Entity::Named { name, .. } => Entity::Named { name, variables },
            Entity::Linked { uri, .. } => Entity::Linked { uri, variables },
        }
    }

    /// Name used when reporting a failed resolution
    pub fn name(&self) -> &str {
        match self {
            Entity::Named { name, .. } => name,
            Entity::Linked { uri, .. } => uri,
        }
    }
}

/// Where a registry entry was found
#[derive(Debug, Clone, Copy)]
enum EntrySource<'a> {
    Overlay(&'a UriTemplate),
    Link(&'a Link),
    Underlay(&'a UriTemplate),
}

impl EntrySource<'_> {
    fn label(&self) -> &'static str {
        match self {
            EntrySource::Overlay(_) => "overlay",
            EntrySource::Link(_) => "root",
            EntrySource::Underlay(_) => "underlay",
        }
    }
}

/// Registry of named URI templates.
///
/// A name is looked up in the overlay first, then in the links of the root
/// HAL document, then in the underlay.
#[derive(Debug, Clone)]
pub struct ServiceDiscovery {
    api_root: Url,
    root: Option<Resource>,
    overlay: HashMap<String, UriTemplate>,
    underlay: HashMap<String, UriTemplate>,
}

impl ServiceDiscovery {
    pub fn new(api_root: Url) -> Self {
        Self {
            api_root,
            root: None,
            overlay: HashMap::new(),
            underlay: HashMap::new(),
        }
    }

    /// Build a registry from settings, rejecting invalid templates
    pub fn from_settings(settings: &DiscoverySettings) -> Result<Self, ConfigError> {
        let mut discovery = Self::new(settings.api_root_url()?);

        for entry in &settings.overlay {
            discovery
                .set_overlay(&entry.name, &entry.template)
                .map_err(|source| rejected_entry("overlay", &entry.name, source))?;
        }
        for entry in &settings.underlay {
            discovery
                .set_underlay(&entry.name, &entry.template)
                .map_err(|source| rejected_entry("underlay", &entry.name, source))?;
        }

        Ok(discovery)
    }

    pub fn api_root(&self) -> &Url {
        &self.api_root
    }

    /// Replace the root document. Simplified links are accepted and
    /// relative hrefs resolve against the API root.
    pub fn load_root(&mut self, document: &JsonValue) -> Result<(), DiscoveryError> {
        let options = ReadOptions::default().allow_simplified_links(true);
        let resource = Resource::from_json(document, Some(&self.api_root), options)?;
        tracing::debug!(
            relations = resource.links().len(),
            "loaded discovery root document"
        );
        self.root = Some(resource);
        Ok(())
    }

    pub fn root(&self) -> Option<&Resource> {
        self.root.as_ref()
    }

    pub fn set_overlay(&mut self, name: &str, uri_template: &str) -> Result<(), TemplateError> {
        let template = UriTemplate::parse(uri_template)?;
        self.overlay.insert(name.to_string(), template);
        Ok(())
    }

    pub fn remove_overlay(&mut self, name: &str) -> Option<UriTemplate> {
        self.overlay.remove(name)
    }

    pub fn set_underlay(&mut self, name: &str, uri_template: &str) -> Result<(), TemplateError> {
        let template = UriTemplate::parse(uri_template)?;
        self.underlay.insert(name.to_string(), template);
        Ok(())
    }

    pub fn remove_underlay(&mut self, name: &str) -> Option<UriTemplate> {
        self.underlay.remove(name)
    }

    fn entry(&self, name: &str) -> Option<EntrySource<'_>> {
        if let Some(template) = self.overlay.get(name) {
            return Some(EntrySource::Overlay(template));
        }
        if let Some(link) = self.root.as_ref().and_then(|root| root.links().link(name)) {
            return Some(EntrySource::Link(link));
        }
        self.underlay.get(name).map(EntrySource::Underlay)
    }

    pub fn has_url_for(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    pub fn variable_names_for(&self, name: &str) -> Option<Vec<String>> {
        let names = match self.entry(name)? {
            EntrySource::Overlay(template) | EntrySource::Underlay(template) => {
                template.variable_names().to_vec()
            }
            EntrySource::Link(link) => link.template_variable_names(),
        };
        Some(names)
    }

    pub fn url_for<S: VariableSource + ?Sized>(
        &self,
        name: &str,
        variables: &S,
    ) -> Result<Url, DiscoveryError> {
        let entry = self
            .entry(name)
            .ok_or_else(|| DiscoveryError::EntityNotFound(name.to_string()))?;
        tracing::debug!(name, source = entry.label(), "resolving discovery entry");

        let url = match entry {
            EntrySource::Overlay(template) | EntrySource::Underlay(template) => {
                template.expand_url(variables, Some(&self.api_root))?
            }
            EntrySource::Link(link) => link.url_with_variables(variables)?,
        };
        Ok(url)
    }

    /// Expand an ad-hoc URI template against the API root
    pub fn url_for_uri<S: VariableSource + ?Sized>(
        &self,
        uri: &str,
        variables: &S,
    ) -> Result<Url, DiscoveryError> {
        let template = UriTemplate::parse(uri)?;
        Ok(template.expand_url(variables, Some(&self.api_root))?)
    }

    pub fn resolve(&self, entity: &Entity) -> Result<Url, DiscoveryError> {
        match entity {
            Entity::Named { name, variables } => self.url_for(name, variables),
            Entity::Linked { uri, variables } => self.url_for_uri(uri, variables),
        }
    }
}

fn rejected_entry(list: &str, name: &str, source: TemplateError) -> ConfigError {
    tracing::warn!(list, name, error = %source, "rejecting discovery entry");
    ConfigError::Entry {
        name: name.to_string(),
        source,
    }
}
