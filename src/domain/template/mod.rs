// Template module for RFC 6570 URI templates
//
// This module provides parsing, percent-encoding, and expansion of URI
// templates against string, list, and associative-array variables.

mod ast;
mod encoder;
mod expander;
mod parser;
mod uri_template;
mod value;

pub use ast::{Expression, Modifier, Operator, Segment, Template, VarSpec};
pub use encoder::encode;
pub use expander::TemplateExpander;
pub use parser::TemplateParser;
pub use uri_template::UriTemplate;
pub use value::{Value, VariableSource, Variables};
