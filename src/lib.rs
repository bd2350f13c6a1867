//! RFC 6570 URI templates and a HAL resource model.
//!
//! [`UriTemplate`] parses a template once and expands it against any
//! [`VariableSource`]. The [`domain::hal`] module reads HAL documents whose
//! templated links expand through the same engine, and
//! [`ServiceDiscovery`] resolves named entries from a root document plus
//! overlay and underlay templates.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;

pub use domain::hal::{EmbeddedResources, Link, Links, ReadOptions, Resource, WriteOptions};
pub use domain::template::{UriTemplate, Value, VariableSource, Variables};
pub use error::{ConfigError, DiscoveryError, HalError, TemplateError};
pub use services::{Entity, ServiceDiscovery};
