// Error handling for halkit

use thiserror::Error;

/// Errors raised while parsing or expanding a URI template
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Malformed template at offset {offset}: {reason}")]
    MalformedTemplate { offset: usize, reason: String },

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl TemplateError {
    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        TemplateError::MalformedTemplate {
            offset,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_url(url: &str, err: url::ParseError) -> Self {
        TemplateError::InvalidUrl {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}

/// Errors raised while reading a HAL document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HalError {
    #[error("Expected a JSON object for {0}")]
    NotAnObject(String),

    #[error("Invalid link for relation '{rel}': {reason}")]
    InvalidLink { rel: String, reason: String },

    #[error("Invalid template for relation '{rel}': {source}")]
    Template {
        rel: String,
        #[source]
        source: TemplateError,
    },
}

/// Errors raised by the service discovery registry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiscoveryError {
    #[error("No entity named '{0}'")]
    EntityNotFound(String),

    #[error("Failed to parse discovery document: {0}")]
    Parsing(#[from] HalError),

    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Errors raised while loading settings
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid api_root '{url}': {source}")]
    ApiRoot {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Duplicate entry '{0}'")]
    DuplicateEntry(String),

    #[error("Invalid template for entry '{name}': {source}")]
    Entry {
        name: String,
        #[source]
        source: TemplateError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message_includes_offset() {
        let err = TemplateError::malformed(7, "empty expression");
        assert_eq!(
            err.to_string(),
            "Malformed template at offset 7: empty expression"
        );
    }

    #[test]
    fn test_discovery_wraps_template_error() {
        let err: DiscoveryError = TemplateError::malformed(0, "unmatched '{'").into();
        assert!(err.to_string().contains("unmatched '{'"));
    }

    #[test]
    fn test_entity_not_found_message() {
        let err = DiscoveryError::EntityNotFound("accounts".to_string());
        assert_eq!(err.to_string(), "No entity named 'accounts'");
    }
}
