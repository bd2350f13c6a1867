// Template parser using recursive descent

use crate::error::TemplateError;

use super::ast::{Expression, Modifier, Operator, Segment, Template, VarSpec};

/// Longest prefix modifier the grammar allows (`max-length = 1-4 DIGIT`)
const MAX_PREFIX_LENGTH: u16 = 9999;

type Result<T> = std::result::Result<T, TemplateError>;

pub struct TemplateParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> TemplateParser<'a> {
    pub fn parse(template: &'a str) -> Result<Template> {
        let mut parser = Self {
            input: template,
            pos: 0,
        };
        parser.parse_template()
    }

    fn parse_template(&mut self) -> Result<Template> {
        let mut segments = Vec::new();
        let mut literal_buf = String::new();

        while let Some(ch) = self.peek_char() {
            match ch {
                '{' => {
                    if !literal_buf.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal_buf)));
                    }
                    let expr = self.parse_expression()?;
                    segments.push(Segment::Expression(expr));
                }
                '}' => return Err(TemplateError::malformed(self.pos, "unmatched '}'")),
                _ => {
                    literal_buf.push(ch);
                    self.pos += ch.len_utf8();
                }
            }
        }

        if !literal_buf.is_empty() {
            segments.push(Segment::Literal(literal_buf));
        }

        Ok(Template::new(segments))
    }

    fn parse_expression(&mut self) -> Result<Expression> {
        let start = self.pos;
        self.expect_char('{')?;

        let operator = match self.peek_char() {
            None => return Err(TemplateError::malformed(start, "unmatched '{'")),
            Some('}') => return Err(TemplateError::malformed(self.pos, "empty expression")),
            Some(ch @ ('=' | ',' | '!' | '@' | '|')) => {
                return Err(TemplateError::malformed(
                    self.pos,
                    format!("reserved operator '{}'", ch),
                ))
            }
            Some(ch) => match Operator::from_char(ch) {
                Some(op) => {
                    self.pos += 1;
                    op
                }
                None => Operator::Simple,
            },
        };

        let mut varspecs = Vec::new();
        loop {
            varspecs.push(self.parse_varspec()?);

            match self.peek_char() {
                Some(',') => self.pos += 1,
                Some('}') => {
                    self.pos += 1;
                    break;
                }
                None => return Err(TemplateError::malformed(start, "unmatched '{'")),
                Some('{') => return Err(TemplateError::malformed(self.pos, "nested '{'")),
                Some(ch) => {
                    return Err(TemplateError::malformed(
                        self.pos,
                        format!("unexpected character '{}' in expression", ch),
                    ))
                }
            }
        }

        Ok(Expression {
            raw: self.input[start..self.pos].to_string(),
            operator,
            varspecs,
        })
    }

    fn parse_varspec(&mut self) -> Result<VarSpec> {
        let name = self.parse_variable_name()?;

        let modifier = match self.peek_char() {
            Some(':') => {
                self.pos += 1;
                Modifier::Prefix(self.parse_prefix_length()?)
            }
            Some('*') => {
                self.pos += 1;
                Modifier::Explode
            }
            _ => Modifier::None,
        };

        if modifier != Modifier::None && matches!(self.peek_char(), Some(':' | '*')) {
            return Err(TemplateError::malformed(
                self.pos,
                format!("multiple modifiers on variable '{}'", name),
            ));
        }

        Ok(VarSpec::new(name).with_modifier(modifier))
    }

    fn parse_variable_name(&mut self) -> Result<String> {
        let mut name = String::new();

        while let Some(ch) = self.peek_char() {
            match ch {
                'A'..='Z' | 'a'..='z' | '0'..='9' | '_' => {
                    name.push(ch);
                    self.pos += 1;
                }
                '%' => {
                    let triplet = self.input[self.pos..].get(..3).filter(|t| {
                        t.len() == 3 && t.bytes().skip(1).all(|b| b.is_ascii_hexdigit())
                    });
                    match triplet {
                        Some(triplet) => {
                            name.push_str(triplet);
                            self.pos += 3;
                        }
                        None => {
                            return Err(TemplateError::malformed(
                                self.pos,
                                "invalid percent-encoding in variable name",
                            ))
                        }
                    }
                }
                '.' => {
                    if name.is_empty() || name.ends_with('.') {
                        return Err(TemplateError::malformed(
                            self.pos,
                            "misplaced '.' in variable name",
                        ));
                    }
                    name.push(ch);
                    self.pos += 1;
                }
                ':' | '*' | ',' | '}' => break,
                '{' => return Err(TemplateError::malformed(self.pos, "nested '{'")),
                _ => {
                    return Err(TemplateError::malformed(
                        self.pos,
                        format!("invalid character '{}' in variable name", ch),
                    ))
                }
            }
        }

        if name.is_empty() {
            return Err(TemplateError::malformed(self.pos, "empty variable name"));
        }
        if name.ends_with('.') {
            return Err(TemplateError::malformed(
                self.pos - 1,
                "misplaced '.' in variable name",
            ));
        }

        Ok(name)
    }

    fn parse_prefix_length(&mut self) -> Result<u16> {
        let start = self.pos;
        while matches!(self.peek_char(), Some(ch) if ch.is_ascii_digit()) {
            self.pos += 1;
        }

        let digits = &self.input[start..self.pos];
        if digits.is_empty() {
            return Err(TemplateError::malformed(
                start,
                "expected prefix length after ':'",
            ));
        }

        match digits.parse::<u16>() {
            Ok(length)
                if !digits.starts_with('0') && (1..=MAX_PREFIX_LENGTH).contains(&length) =>
            {
                Ok(length)
            }
            _ => Err(TemplateError::malformed(
                start,
                format!(
                    "prefix length '{}' must be between 1 and {}",
                    digits, MAX_PREFIX_LENGTH
                ),
            )),
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn expect_char(&mut self, expected: char) -> Result<()> {
        match self.peek_char() {
            Some(ch) if ch == expected => {
                self.pos += ch.len_utf8();
                Ok(())
            }
            Some(ch) => Err(TemplateError::malformed(
                self.pos,
                format!("expected '{}' but found '{}'", expected, ch),
            )),
            None => Err(TemplateError::malformed(
                self.pos,
                format!("expected '{}' but found end of input", expected),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset_of(result: Result<Template>) -> usize {
        match result {
            Err(TemplateError::MalformedTemplate { offset, .. }) => offset,
            other => panic!("Expected malformed template, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_simple_variable() {
        let template = TemplateParser::parse("https://example.com/{query}").unwrap();
        assert_eq!(template.segments.len(), 2);

        match &template.segments[0] {
            Segment::Literal(s) => assert_eq!(s, "https://example.com/"),
            _ => panic!("Expected literal"),
        }

        match &template.segments[1] {
            Segment::Expression(expr) => {
                assert_eq!(expr.operator, Operator::Simple);
                assert_eq!(expr.raw, "{query}");
                assert_eq!(expr.varspecs, vec![VarSpec::new("query".to_string())]);
            }
            _ => panic!("Expected expression"),
        }
    }

    #[test]
    fn test_parse_operators() {
        let cases = [
            ("{+x}", Operator::Reserved),
            ("{#x}", Operator::Fragment),
            ("{.x}", Operator::Label),
            ("{/x}", Operator::PathSegment),
            ("{;x}", Operator::PathParameter),
            ("{?x}", Operator::FormQuery),
            ("{&x}", Operator::FormContinuation),
        ];
        for (input, expected) in cases {
            let template = TemplateParser::parse(input).unwrap();
            assert_eq!(template.expressions()[0].operator, expected, "{}", input);
        }
    }

    #[test]
    fn test_parse_multiple_varspecs_with_modifiers() {
        let template = TemplateParser::parse("{?q,lang:2,tags*}").unwrap();
        let expr = template.expressions()[0];
        assert_eq!(expr.operator, Operator::FormQuery);
        assert_eq!(
            expr.varspecs,
            vec![
                VarSpec::new("q".to_string()),
                VarSpec::new("lang".to_string()).with_modifier(Modifier::Prefix(2)),
                VarSpec::new("tags".to_string()).with_modifier(Modifier::Explode),
            ]
        );
    }

    #[test]
    fn test_parse_dotted_and_encoded_names() {
        let template = TemplateParser::parse("{user.name,caf%C3%A9}").unwrap();
        let names = template.variable_names();
        assert_eq!(names, vec!["user.name", "caf%C3%A9"]);
    }

    #[test]
    fn test_parse_keeps_non_ascii_literals() {
        let template = TemplateParser::parse("/café/{x}").unwrap();
        assert_eq!(template.segments[0], Segment::Literal("/café/".to_string()));
        assert_eq!(template.source(), "/café/{x}");
    }

    #[test]
    fn test_parse_max_prefix() {
        let template = TemplateParser::parse("{x:9999}").unwrap();
        assert_eq!(
            template.expressions()[0].varspecs[0].modifier,
            Modifier::Prefix(9999)
        );
    }

    #[test]
    fn test_parse_unmatched_open_brace_fails() {
        assert_eq!(offset_of(TemplateParser::parse("/users/{id")), 7);
    }

    #[test]
    fn test_parse_unmatched_close_brace_fails() {
        assert_eq!(offset_of(TemplateParser::parse("/users/id}")), 9);
    }

    #[test]
    fn test_parse_nested_brace_fails() {
        assert_eq!(offset_of(TemplateParser::parse("{a{b}}")), 2);
    }

    #[test]
    fn test_parse_empty_expression_fails() {
        let result = TemplateParser::parse("/x/{}");
        assert!(result.unwrap_err().to_string().contains("empty expression"));
    }

    #[test]
    fn test_parse_operator_without_name_fails() {
        let result = TemplateParser::parse("{?}");
        assert!(result.unwrap_err().to_string().contains("empty variable name"));
    }

    #[test]
    fn test_parse_prefix_out_of_range_fails() {
        for input in ["{x:0}", "{x:10000}", "{x:05}", "{x:}"] {
            assert!(TemplateParser::parse(input).is_err(), "{}", input);
        }
    }

    #[test]
    fn test_parse_multiple_modifiers_fails() {
        let result = TemplateParser::parse("{x:3*}");
        assert!(result.unwrap_err().to_string().contains("multiple modifiers"));

        let result = TemplateParser::parse("{x*:3}");
        assert!(result.unwrap_err().to_string().contains("multiple modifiers"));
    }

    #[test]
    fn test_parse_illegal_name_characters_fails() {
        let result = TemplateParser::parse("{user-id}");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("invalid character '-'"));

        assert!(TemplateParser::parse("{a b}").is_err());
        assert!(TemplateParser::parse("{.a..b}").is_err());
        assert!(TemplateParser::parse("{a.}").is_err());
        assert!(TemplateParser::parse("{%zz}").is_err());
    }

    #[test]
    fn test_parse_reserved_operator_fails() {
        for input in ["{=x}", "{,x}", "{!x}", "{@x}", "{|x}"] {
            let result = TemplateParser::parse(input);
            assert!(
                result.unwrap_err().to_string().contains("reserved operator"),
                "{}",
                input
            );
        }
    }

    #[test]
    fn test_parse_trailing_comma_fails() {
        assert!(TemplateParser::parse("{a,}").is_err());
    }
}
