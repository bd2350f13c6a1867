// HAL (Hypertext Application Language) resource model
//
// Resources are read from JSON into a payload, named links and named
// embedded resources. Templated links expand through the URI template engine.

mod embedded;
mod link;
mod links;
mod resource;

pub use embedded::EmbeddedResources;
pub use link::{Link, LinkTarget};
pub use links::Links;
pub use resource::Resource;

/// Options applied while reading a HAL document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Accept a bare string as a link; it is read as a URI template
    pub allow_simplified_links: bool,
    /// Use the resource's absolute `self` link as the base URL
    pub infer_base_url: bool,
}

impl ReadOptions {
    pub fn allow_simplified_links(mut self, allow: bool) -> Self {
        self.allow_simplified_links = allow;
        self
    }

    pub fn infer_base_url(mut self, infer: bool) -> Self {
        self.infer_base_url = infer;
        self
    }
}

/// Options applied while writing a HAL document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Write links that carry only an href as a bare string
    pub write_simplified_links: bool,
}

impl WriteOptions {
    pub fn write_simplified_links(mut self, write: bool) -> Self {
        self.write_simplified_links = write;
        self
    }
}
