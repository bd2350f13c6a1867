// Template expansion against a variable binding

use super::ast::{Expression, Modifier, Operator, Segment, Template, VarSpec};
use super::encoder::{encode, truncate};
use super::value::{Value, VariableSource};

/// Expands parsed templates into strings
pub struct TemplateExpander;

impl TemplateExpander {
    /// Expand template with provided variable values.
    ///
    /// Missing and undefined variables contribute nothing.
    pub fn expand<S: VariableSource + ?Sized>(template: &Template, variables: &S) -> String {
        let mut result = String::new();

        for segment in &template.segments {
            match segment {
                Segment::Literal(text) => result.push_str(text),
                Segment::Expression(expr) => Self::expand_expression(&mut result, expr, variables),
            }
        }

        result
    }

    fn expand_expression<S: VariableSource + ?Sized>(
        out: &mut String,
        expr: &Expression,
        variables: &S,
    ) {
        let op = expr.operator;
        let mut first = true;

        for spec in &expr.varspecs {
            let value = match variables.lookup(&spec.name) {
                Some(value) if value.is_defined() => value,
                _ => continue,
            };

            out.push_str(if first { op.first() } else { op.separator() });
            first = false;

            match value {
                Value::String(s) => Self::expand_string(out, op, spec, s),
                Value::List(items) => Self::expand_list(out, op, spec, items),
                Value::AssocArray(pairs) => Self::expand_pairs(out, op, spec, pairs),
                Value::Undefined => {}
            }
        }
    }

    fn expand_string(out: &mut String, op: Operator, spec: &VarSpec, value: &str) {
        let value = match spec.modifier {
            Modifier::Prefix(length) => truncate(value, length as usize),
            _ => value,
        };

        if op.named() {
            out.push_str(&spec.name);
            if value.is_empty() {
                out.push_str(op.if_empty());
                return;
            }
            out.push('=');
        }
        out.push_str(&encode(value, op.allow_reserved()));
    }

    fn expand_list(out: &mut String, op: Operator, spec: &VarSpec, items: &[String]) {
        let allow = op.allow_reserved();

        if spec.modifier == Modifier::Explode {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(op.separator());
                }
                if op.named() {
                    Self::push_pair(out, op, &spec.name, item, false);
                } else {
                    out.push_str(&encode(item, allow));
                }
            }
            return;
        }

        // Prefix is not defined for composites and falls back to the plain form
        if op.named() {
            out.push_str(&spec.name);
            out.push('=');
        }
        let joined: Vec<String> = items.iter().map(|item| encode(item, allow)).collect();
        out.push_str(&joined.join(","));
    }

    fn expand_pairs(out: &mut String, op: Operator, spec: &VarSpec, pairs: &[(String, String)]) {
        let allow = op.allow_reserved();

        if spec.modifier == Modifier::Explode {
            for (i, (key, value)) in pairs.iter().enumerate() {
                if i > 0 {
                    out.push_str(op.separator());
                }
                Self::push_pair(out, op, key, value, true);
            }
            return;
        }

        if op.named() {
            out.push_str(&spec.name);
            out.push('=');
        }
        let flattened: Vec<String> = pairs
            .iter()
            .flat_map(|(key, value)| [encode(key, allow), encode(value, allow)])
            .collect();
        out.push_str(&flattened.join(","));
    }

    /// Write `name=value`, or `name` plus the operator's empty marker when
    /// the value is empty. Names from map keys are encoded, varnames are not.
    fn push_pair(out: &mut String, op: Operator, name: &str, value: &str, encode_name: bool) {
        let allow = op.allow_reserved();
        if encode_name {
            out.push_str(&encode(name, allow));
        } else {
            out.push_str(name);
        }

        if value.is_empty() && op.named() {
            out.push_str(op.if_empty());
        } else {
            out.push('=');
            out.push_str(&encode(value, allow));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::template::parser::TemplateParser;
    use std::collections::HashMap;

    fn expand(template: &str, vars: &[(&str, Value)]) -> String {
        let template = TemplateParser::parse(template).unwrap();
        let vars: HashMap<String, Value> = vars
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
        TemplateExpander::expand(&template, &vars)
    }

    fn rfc_vars() -> Vec<(&'static str, Value)> {
        vec![
            ("var", Value::from("value")),
            ("hello", Value::from("Hello World!")),
            ("path", Value::from("/foo/bar")),
            ("empty", Value::from("")),
            ("x", Value::from("1024")),
            ("y", Value::from("768")),
            ("list", Value::from(vec!["red", "green", "blue"])),
            (
                "keys",
                Value::from(vec![("semi", ";"), ("dot", "."), ("comma", ",")]),
            ),
            ("undef", Value::Undefined),
        ]
    }

    #[test]
    fn test_expand_simple_string() {
        let vars = rfc_vars();
        assert_eq!(expand("{var}", &vars), "value");
        assert_eq!(expand("{hello}", &vars), "Hello%20World%21");
        assert_eq!(expand("{x,y}", &vars), "1024,768");
        assert_eq!(expand("{x,undef,y}", &vars), "1024,768");
        assert_eq!(expand("{var:3}", &vars), "val");
        assert_eq!(expand("{var:30}", &vars), "value");
    }

    #[test]
    fn test_expand_reserved_and_fragment() {
        let vars = rfc_vars();
        assert_eq!(expand("{+path}/here", &vars), "/foo/bar/here");
        assert_eq!(expand("{+hello}", &vars), "Hello%20World!");
        assert_eq!(expand("{#path:6}/here", &vars), "#/foo/b/here");
        assert_eq!(expand("{#x,hello,y}", &vars), "#1024,Hello%20World!,768");
        assert_eq!(expand("{+list*}", &vars), "red,green,blue");
        assert_eq!(expand("{#keys*}", &vars), "#semi=;,dot=.,comma=,");
    }

    #[test]
    fn test_expand_label_and_path() {
        let vars = rfc_vars();
        assert_eq!(expand("X{.var}", &vars), "X.value");
        assert_eq!(expand("X{.x,y}", &vars), "X.1024.768");
        assert_eq!(expand("X{.list*}", &vars), "X.red.green.blue");
        assert_eq!(expand("{/var,x}/here", &vars), "/value/1024/here");
        assert_eq!(expand("{/list*,path:4}", &vars), "/red/green/blue/%2Ffoo");
        assert_eq!(expand("{/keys*}", &vars), "/semi=%3B/dot=./comma=%2C");
    }

    #[test]
    fn test_expand_path_parameters() {
        let vars = rfc_vars();
        assert_eq!(expand("{;x,y}", &vars), ";x=1024;y=768");
        assert_eq!(expand("{;x,y,empty}", &vars), ";x=1024;y=768;empty");
        assert_eq!(expand("{;hello:5}", &vars), ";hello=Hello");
        assert_eq!(expand("{;list}", &vars), ";list=red,green,blue");
        assert_eq!(expand("{;list*}", &vars), ";list=red;list=green;list=blue");
        assert_eq!(
            expand("{;keys}", &vars),
            ";keys=semi,%3B,dot,.,comma,%2C"
        );
        assert_eq!(expand("{;keys*}", &vars), ";semi=%3B;dot=.;comma=%2C");
    }

    #[test]
    fn test_expand_form_query_and_continuation() {
        let vars = rfc_vars();
        assert_eq!(expand("{?x,y}", &vars), "?x=1024&y=768");
        assert_eq!(expand("{?x,y,empty}", &vars), "?x=1024&y=768&empty=");
        assert_eq!(expand("{?list}", &vars), "?list=red,green,blue");
        assert_eq!(expand("{?list*}", &vars), "?list=red&list=green&list=blue");
        assert_eq!(expand("{?keys*}", &vars), "?semi=%3B&dot=.&comma=%2C");
        assert_eq!(expand("?fixed=yes{&x}", &vars), "?fixed=yes&x=1024");
        assert_eq!(expand("{&x,y,empty}", &vars), "&x=1024&y=768&empty=");
    }

    #[test]
    fn test_expand_composite_without_modifier() {
        let vars = rfc_vars();
        assert_eq!(expand("{list}", &vars), "red,green,blue");
        assert_eq!(expand("{keys}", &vars), "semi,%3B,dot,.,comma,%2C");
        assert_eq!(expand("{+keys}", &vars), "semi,;,dot,.,comma,,");
    }

    #[test]
    fn test_expand_prefix_on_composite_falls_back() {
        let vars = rfc_vars();
        assert_eq!(expand("{list:2}", &vars), "red,green,blue");
        assert_eq!(expand("{?keys:1}", &vars), "?keys=semi,%3B,dot,.,comma,%2C");
    }

    #[test]
    fn test_expand_empty_values() {
        let vars = vec![
            ("empty", Value::from("")),
            ("nothing", Value::List(vec![])),
            ("nomap", Value::AssocArray(vec![])),
            ("blank_items", Value::from(vec!["", "b"])),
            ("blank_pairs", Value::from(vec![("k", "")])),
        ];
        assert_eq!(expand("{empty}", &vars), "");
        assert_eq!(expand("{.empty}", &vars), ".");
        assert_eq!(expand("{/nothing*}", &vars), "");
        assert_eq!(expand("{?nothing,nomap}", &vars), "");
        assert_eq!(expand("{?blank_items*}", &vars), "?blank_items=&blank_items=b");
        assert_eq!(expand("{;blank_items*}", &vars), ";blank_items;blank_items=b");
        assert_eq!(expand("{;blank_pairs*}", &vars), ";k");
        assert_eq!(expand("{?blank_pairs*}", &vars), "?k=");
        assert_eq!(expand("{/blank_pairs*}", &vars), "/k=");
    }

    #[test]
    fn test_expand_all_undefined_emits_nothing() {
        let vars = rfc_vars();
        assert_eq!(expand("/orders{?undef,missing}", &vars), "/orders");
        assert_eq!(expand("{#undef}", &vars), "");
    }

    #[test]
    fn test_expand_prefix_on_multibyte() {
        let vars = vec![("name", Value::from("Ünïcode"))];
        assert_eq!(expand("{name:2}", &vars), "%C3%9Cn");
    }
}
