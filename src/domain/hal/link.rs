// A single HAL link, optionally templated

use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use url::Url;

use crate::domain::template::{UriTemplate, VariableSource, Variables};
use crate::error::{HalError, TemplateError};

use super::{ReadOptions, WriteOptions};

/// Where a link points: a plain href or a URI template
#[derive(Debug, Clone, PartialEq)]
pub enum LinkTarget {
    Href(String),
    Template(UriTemplate),
}

/// Link object as it appears on the wire
#[derive(Deserialize, Debug)]
struct LinkObject {
    href: String,
    #[serde(default)]
    templated: bool,
    name: Option<String>,
    title: Option<String>,
    #[serde(rename = "type")]
    media_type: Option<String>,
    hreflang: Option<String>,
    deprecation: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    target: LinkTarget,
    base_url: Option<Url>,
    name: Option<String>,
    title: Option<String>,
    media_type: Option<String>,
    hreflang: Option<String>,
    deprecation: Option<String>,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self::with_target(LinkTarget::Href(href.into()))
    }

    pub fn templated(template: UriTemplate) -> Self {
        Self::with_target(LinkTarget::Template(template))
    }

    fn with_target(target: LinkTarget) -> Self {
        Self {
            target,
            base_url: None,
            name: None,
            title: None,
            media_type: None,
            hreflang: None,
            deprecation: None,
        }
    }

    pub fn with_base_url(mut self, base_url: Option<Url>) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub fn with_hreflang(mut self, hreflang: impl Into<String>) -> Self {
        self.hreflang = Some(hreflang.into());
        self
    }

    pub fn with_deprecation(mut self, deprecation: impl Into<String>) -> Self {
        self.deprecation = Some(deprecation.into());
        self
    }

    /// Read a link for relation `rel` from a link object, or from a bare
    /// string when simplified links are allowed
    pub fn from_json(
        rel: &str,
        value: &JsonValue,
        base_url: Option<&Url>,
        options: ReadOptions,
    ) -> Result<Self, HalError> {
        let link = match value {
            JsonValue::String(href) if options.allow_simplified_links => {
                let template = parse_template(rel, href)?;
                Link::templated(template)
            }
            JsonValue::String(_) => {
                return Err(HalError::InvalidLink {
                    rel: rel.to_string(),
                    reason: "simplified links are not allowed".to_string(),
                })
            }
            JsonValue::Object(_) => {
                let object = LinkObject::deserialize(value).map_err(|err| HalError::InvalidLink {
                    rel: rel.to_string(),
                    reason: err.to_string(),
                })?;
                let target = if object.templated {
                    LinkTarget::Template(parse_template(rel, &object.href)?)
                } else {
                    LinkTarget::Href(object.href)
                };
                Self {
                    target,
                    base_url: None,
                    name: object.name,
                    title: object.title,
                    media_type: object.media_type,
                    hreflang: object.hreflang,
                    deprecation: object.deprecation,
                }
            }
            _ => {
                return Err(HalError::InvalidLink {
                    rel: rel.to_string(),
                    reason: "expected a link object".to_string(),
                })
            }
        };

        Ok(link.with_base_url(base_url.cloned()))
    }

    pub fn to_json(&self, options: WriteOptions) -> JsonValue {
        if options.write_simplified_links && self.is_bare() && self.reads_back_as_string() {
            return JsonValue::String(self.href().to_string());
        }

        let mut object = Map::new();
        object.insert("href".to_string(), self.href().into());
        if self.is_templated() {
            object.insert("templated".to_string(), true.into());
        }
        let fields = [
            ("name", &self.name),
            ("title", &self.title),
            ("type", &self.media_type),
            ("hreflang", &self.hreflang),
            ("deprecation", &self.deprecation),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                object.insert(key.to_string(), value.as_str().into());
            }
        }
        JsonValue::Object(object)
    }

    /// True when the link carries nothing but its href
    fn is_bare(&self) -> bool {
        self.name.is_none()
            && self.title.is_none()
            && self.media_type.is_none()
            && self.hreflang.is_none()
            && self.deprecation.is_none()
    }

    /// A bare string is read back as a template, so a plain href with
    /// braces has to stay an object
    fn reads_back_as_string(&self) -> bool {
        match &self.target {
            LinkTarget::Template(_) => true,
            LinkTarget::Href(href) => !href.contains(['{', '}']),
        }
    }

    pub fn target(&self) -> &LinkTarget {
        &self.target
    }

    /// The raw href or template text
    pub fn href(&self) -> &str {
        match &self.target {
            LinkTarget::Href(href) => href,
            LinkTarget::Template(template) => template.as_str(),
        }
    }

    pub fn is_templated(&self) -> bool {
        matches!(self.target, LinkTarget::Template(_))
    }

    pub fn template_variable_names(&self) -> Vec<String> {
        match &self.target {
            LinkTarget::Href(_) => Vec::new(),
            LinkTarget::Template(template) => template.variable_names().to_vec(),
        }
    }

    pub fn url(&self) -> Result<Url, TemplateError> {
        self.url_with_variables(&Variables::new())
    }

    /// Expand the link (when templated) and resolve it against the base URL
    pub fn url_with_variables<S: VariableSource + ?Sized>(
        &self,
        variables: &S,
    ) -> Result<Url, TemplateError> {
        match &self.target {
            LinkTarget::Template(template) => {
                template.expand_url(variables, self.base_url.as_ref())
            }
            LinkTarget::Href(href) => {
                let parsed = match &self.base_url {
                    Some(base) => base.join(href),
                    None => Url::parse(href),
                };
                parsed.map_err(|err| TemplateError::invalid_url(href, err))
            }
        }
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    pub fn hreflang(&self) -> Option<&str> {
        self.hreflang.as_deref()
    }

    pub fn deprecation(&self) -> Option<&str> {
        self.deprecation.as_deref()
    }
}

fn parse_template(rel: &str, href: &str) -> Result<UriTemplate, HalError> {
    UriTemplate::parse(href).map_err(|source| HalError::Template {
        rel: rel.to_string(),
        source,
    })
}
