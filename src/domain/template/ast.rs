// Abstract Syntax Tree types for URI templates

/// Represents a parsed template as a list of segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub segments: Vec<Segment>,
}

impl Template {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Get all expressions in this template
    pub fn expressions(&self) -> Vec<&Expression> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Expression(expr) => Some(expr),
                _ => None,
            })
            .collect()
    }

    /// Distinct variable names in first-occurrence order
    pub fn variable_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for expr in self.expressions() {
            for spec in &expr.varspecs {
                if !names.iter().any(|n| n == &spec.name) {
                    names.push(spec.name.clone());
                }
            }
        }
        names
    }

    /// Source text of the template, rebuilt from the segments
    pub fn source(&self) -> String {
        self.segments.iter().map(Segment::source).collect()
    }
}

/// A template consists of literal runs and bracketed expressions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Expression(Expression),
}

impl Segment {
    pub fn source(&self) -> &str {
        match self {
            Segment::Literal(text) => text,
            Segment::Expression(expr) => &expr.raw,
        }
    }
}

/// A `{...}` expression: operator plus one or more variable specs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    /// Source slice including the braces
    pub raw: String,
    pub operator: Operator,
    pub varspecs: Vec<VarSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Simple,
    Reserved,
    Fragment,
    Label,
    PathSegment,
    PathParameter,
    FormQuery,
    FormContinuation,
}

impl Operator {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '+' => Some(Operator::Reserved),
            '#' => Some(Operator::Fragment),
            '.' => Some(Operator::Label),
            '/' => Some(Operator::PathSegment),
            ';' => Some(Operator::PathParameter),
            '?' => Some(Operator::FormQuery),
            '&' => Some(Operator::FormContinuation),
            _ => None,
        }
    }

    /// Emitted once before the first defined variable
    pub fn first(self) -> &'static str {
        match self {
            Operator::Simple | Operator::Reserved => "",
            Operator::Fragment => "#",
            Operator::Label => ".",
            Operator::PathSegment => "/",
            Operator::PathParameter => ";",
            Operator::FormQuery => "?",
            Operator::FormContinuation => "&",
        }
    }

    /// Joins defined variables and exploded items
    pub fn separator(self) -> &'static str {
        match self {
            Operator::Simple | Operator::Reserved | Operator::Fragment => ",",
            Operator::Label => ".",
            Operator::PathSegment => "/",
            Operator::PathParameter => ";",
            Operator::FormQuery | Operator::FormContinuation => "&",
        }
    }

    /// Whether values are emitted as `name=value` pairs
    pub fn named(self) -> bool {
        matches!(
            self,
            Operator::PathParameter | Operator::FormQuery | Operator::FormContinuation
        )
    }

    /// Appended after the name when a named value is empty
    pub fn if_empty(self) -> &'static str {
        match self {
            Operator::FormQuery | Operator::FormContinuation => "=",
            _ => "",
        }
    }

    pub fn allow_reserved(self) -> bool {
        matches!(self, Operator::Reserved | Operator::Fragment)
    }
}

/// A variable reference with an optional modifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarSpec {
    pub name: String,
    pub modifier: Modifier,
}

impl VarSpec {
    pub fn new(name: String) -> Self {
        Self {
            name,
            modifier: Modifier::None,
        }
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifier = modifier;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    None,
    /// Truncate a string value to this many characters (1..=9999)
    Prefix(u16),
    Explode,
}
