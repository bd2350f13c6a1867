// Public URI template type

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::TemplateError;

use super::ast::Template;
use super::expander::TemplateExpander;
use super::parser::TemplateParser;
use super::value::VariableSource;

/// A parsed, immutable URI template.
///
/// Parsing happens once in [`UriTemplate::parse`]; the result can be expanded
/// any number of times, from any number of threads.
///
/// ```
/// use halkit::{UriTemplate, Variables};
///
/// let template = UriTemplate::parse("/orders{?page,size}").unwrap();
/// let vars = Variables::new().with("page", "2");
/// assert_eq!(template.expand(&vars), "/orders?page=2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UriTemplate {
    source: String,
    template: Template,
    variable_names: Vec<String>,
}

impl UriTemplate {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let template = TemplateParser::parse(source)?;
        let variable_names = template.variable_names();
        tracing::trace!(template = source, variables = ?variable_names, "parsed URI template");

        Ok(Self {
            source: source.to_string(),
            template,
            variable_names,
        })
    }

    /// Distinct variable names in first-occurrence order
    pub fn variable_names(&self) -> &[String] {
        &self.variable_names
    }

    /// True when the template has at least one expression
    pub fn is_templated(&self) -> bool {
        !self.template.expressions().is_empty()
    }

    pub fn expand<S: VariableSource + ?Sized>(&self, variables: &S) -> String {
        TemplateExpander::expand(&self.template, variables)
    }

    /// Expand and parse the result as a URL, resolving it against `base`
    /// when one is given.
    ///
    /// Without a base the expansion must be an absolute URL: a relative
    /// reference such as `/users/42` fails with
    /// [`TemplateError::InvalidUrl`], so pass a base to expand relative
    /// templates.
    pub fn expand_url<S: VariableSource + ?Sized>(
        &self,
        variables: &S,
        base: Option<&Url>,
    ) -> Result<Url, TemplateError> {
        let expanded = self.expand(variables);
        let parsed = match base {
            Some(base) => base.join(&expanded),
            None => Url::parse(&expanded),
        };
        parsed.map_err(|err| TemplateError::invalid_url(&expanded, err))
    }

    /// The original template text
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn template(&self) -> &Template {
        &self.template
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for UriTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for UriTemplate {
    type Error = TemplateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for UriTemplate {
    type Error = TemplateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<UriTemplate> for String {
    fn from(template: UriTemplate) -> Self {
        template.source
    }
}
