//! Schema declaration and validation.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::report::{Issue, Issues};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

/// Value kind a field accepts, checked before any rule runs.
#[derive(Debug)]
enum Kind {
    String,
    Int,
    /// Nested object validated against its own schema; issue paths are
    /// dot-joined under the field name.
    Object(Schema),
}

/// A single field constraint carrying its client-facing message.
#[derive(Debug)]
enum Rule {
    MinLen(usize, &'static str),
    MaxLen(usize, &'static str),
    Pattern(Regex, &'static str),
    Email(&'static str),
    Uuid(&'static str),
    OneOf(&'static [&'static str], &'static str),
    MinInt(i64, &'static str),
    MaxInt(i64, &'static str),
}

impl Rule {
    fn violation_str(&self, s: &str) -> Option<&'static str> {
        match self {
            Self::MinLen(n, msg) if s.chars().count() < *n => Some(msg),
            Self::MaxLen(n, msg) if s.chars().count() > *n => Some(msg),
            Self::Pattern(re, msg) if !re.is_match(s) => Some(msg),
            Self::Email(msg) if !EMAIL_RE.is_match(s) => Some(msg),
            Self::Uuid(msg) if Uuid::parse_str(s).is_err() => Some(msg),
            Self::OneOf(allowed, msg) if !allowed.contains(&s) => Some(msg),
            _ => None,
        }
    }

    fn violation_int(&self, n: i64) -> Option<&'static str> {
        match self {
            Self::MinInt(min, msg) if n < *min => Some(msg),
            Self::MaxInt(max, msg) if n > *max => Some(msg),
            _ => None,
        }
    }
}

/// One declared field of a [`Schema`].
///
/// Constructed with [`Field::string`] / [`Field::int`] / [`Field::object`],
/// then refined with the builder methods. Fields are required by default;
/// `optional` and `default_value` lift that.
#[derive(Debug)]
pub struct Field {
    name: &'static str,
    kind: Kind,
    required: bool,
    coerce: bool,
    default: Option<Value>,
    rules: Vec<Rule>,
}

impl Field {
    pub fn string(name: &'static str) -> Self {
        Self::new(name, Kind::String)
    }

    pub fn int(name: &'static str) -> Self {
        Self::new(name, Kind::Int)
    }

    pub fn object(name: &'static str, schema: Schema) -> Self {
        Self::new(name, Kind::Object(schema))
    }

    fn new(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            required: true,
            coerce: false,
            default: None,
            rules: Vec::new(),
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Accept numeric strings for `Int` fields (query parameters arrive as
    /// strings).
    pub fn coerced(mut self) -> Self {
        self.coerce = true;
        self
    }

    /// Value substituted when the field is absent. Implies `optional`.
    pub fn default_value(mut self, v: Value) -> Self {
        self.default = Some(v);
        self.required = false;
        self
    }

    pub fn min_len(mut self, n: usize, msg: &'static str) -> Self {
        self.rules.push(Rule::MinLen(n, msg));
        self
    }

    pub fn max_len(mut self, n: usize, msg: &'static str) -> Self {
        self.rules.push(Rule::MaxLen(n, msg));
        self
    }

    /// Regex constraint. Panics at construction on an invalid pattern, which
    /// surfaces immediately in any test or at first use of the schema.
    pub fn pattern(mut self, re: &'static str, msg: &'static str) -> Self {
        self.rules
            .push(Rule::Pattern(Regex::new(re).expect("schema pattern"), msg));
        self
    }

    pub fn email(mut self, msg: &'static str) -> Self {
        self.rules.push(Rule::Email(msg));
        self
    }

    pub fn uuid(mut self, msg: &'static str) -> Self {
        self.rules.push(Rule::Uuid(msg));
        self
    }

    pub fn one_of(mut self, allowed: &'static [&'static str], msg: &'static str) -> Self {
        self.rules.push(Rule::OneOf(allowed, msg));
        self
    }

    pub fn min_int(mut self, n: i64, msg: &'static str) -> Self {
        self.rules.push(Rule::MinInt(n, msg));
        self
    }

    pub fn max_int(mut self, n: i64, msg: &'static str) -> Self {
        self.rules.push(Rule::MaxInt(n, msg));
        self
    }

    fn as_int(&self, v: &Value) -> Option<i64> {
        match v {
            Value::Number(n) => n.as_i64(),
            Value::String(s) if self.coerce => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Check a present value. Returns the coerced value or every rule
    /// violation, in declaration order.
    fn check(&self, given: &Value) -> Result<Value, Vec<Issue>> {
        let mut issues = Vec::new();
        let coerced = match &self.kind {
            Kind::String => match given.as_str() {
                Some(s) => {
                    for rule in &self.rules {
                        if let Some(msg) = rule.violation_str(s) {
                            issues.push(Issue::new(self.name, msg));
                        }
                    }
                    Value::String(s.to_owned())
                }
                None => {
                    issues.push(Issue::new(self.name, "Expected a string"));
                    Value::Null
                }
            },
            Kind::Int => match self.as_int(given) {
                Some(n) => {
                    for rule in &self.rules {
                        if let Some(msg) = rule.violation_int(n) {
                            issues.push(Issue::new(self.name, msg));
                        }
                    }
                    Value::from(n)
                }
                None => {
                    let msg = if self.coerce {
                        "Expected a number"
                    } else {
                        "Expected an integer"
                    };
                    issues.push(Issue::new(self.name, msg));
                    Value::Null
                }
            },
            Kind::Object(inner) => match inner.validate(given) {
                Ok(v) => v,
                Err(errs) => {
                    issues.extend(errs.0.into_iter().map(|i| i.under(self.name)));
                    Value::Null
                }
            },
        };
        if issues.is_empty() { Ok(coerced) } else { Err(issues) }
    }
}

/// Object-level rule, evaluated over the coerced output once every field
/// passed. Reported under an explicit path so issues always address a field.
#[derive(Debug)]
struct ObjectRule {
    path: &'static str,
    message: &'static str,
    check: fn(&Map<String, Value>) -> bool,
}

/// Top-level introspection result: every declared key and the required
/// subset (fields lacking an `optional`/`default_value` marker).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaShape {
    pub expected: Vec<&'static str>,
    pub required: Vec<&'static str>,
}

/// Immutable declarative description of an expected JSON object.
///
/// Declared once as a static and shared; validation never mutates it.
#[derive(Debug, Default)]
pub struct Schema {
    fields: Vec<Field>,
    object_rules: Vec<ObjectRule>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, f: Field) -> Self {
        self.fields.push(f);
        self
    }

    /// Add an object-level rule. `check` receives the coerced output map and
    /// returns `false` to fail; the issue is reported at `path`.
    pub fn rule(
        mut self,
        path: &'static str,
        message: &'static str,
        check: fn(&Map<String, Value>) -> bool,
    ) -> Self {
        self.object_rules.push(ObjectRule {
            path,
            message,
            check,
        });
        self
    }

    /// Declared top-level keys and the required subset, in declaration order.
    pub fn describe(&self) -> SchemaShape {
        SchemaShape {
            expected: self.fields.iter().map(|f| f.name).collect(),
            required: self
                .fields
                .iter()
                .filter(|f| f.required)
                .map(|f| f.name)
                .collect(),
        }
    }

    /// Validate `value` against this schema.
    ///
    /// On success, returns the coerced output: declared fields only
    /// (undeclared keys are stripped), defaults filled in, numeric strings
    /// converted where the field is `coerced`. On failure, returns every
    /// issue in field declaration order; a non-object root yields a single
    /// issue with an empty path, which callers re-key to the input source.
    pub fn validate(&self, value: &Value) -> Result<Value, Issues> {
        let Some(raw) = value.as_object() else {
            return Err(Issues(vec![Issue::new("", "Expected an object")]));
        };

        let mut out = Map::new();
        let mut issues = Vec::new();
        for field in &self.fields {
            match raw.get(field.name) {
                None => {
                    if let Some(default) = &field.default {
                        out.insert(field.name.to_owned(), default.clone());
                    } else if field.required {
                        issues.push(Issue::new(field.name, "Required"));
                    }
                }
                Some(given) => match field.check(given) {
                    Ok(coerced) => {
                        out.insert(field.name.to_owned(), coerced);
                    }
                    Err(errs) => issues.extend(errs),
                },
            }
        }

        // Object rules see the coerced output, so they only run once every
        // field-level check passed.
        if issues.is_empty() {
            for rule in &self.object_rules {
                if !(rule.check)(&out) {
                    issues.push(Issue::new(rule.path, rule.message));
                }
            }
        }

        if issues.is_empty() {
            Ok(Value::Object(out))
        } else {
            Err(Issues(issues))
        }
    }
}
