//! Argument decoding.
//!
//! Checks a raw `tools/call` payload against a [`ParamSchema`] in a single
//! pass and either returns the decoded record or every problem found.
//! Unknown fields are dropped. Values are never coerced across types.

use serde_json::{Map, Number, Value};
use std::fmt;

use crate::schema::{Param, ParamSchema, ParamType};

/// Decoded arguments for one call. Only declared fields survive, and an
/// omitted optional field without a default is simply absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Location of the field, e.g. `environmentVariables[1].key`.
    pub path: String,
    pub problem: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.path, self.problem)
    }
}

/// Every issue found while decoding, in schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationFailure {
    /// Whether any issue is located at `path`.
    pub fn mentions(&self, path: &str) -> bool {
        self.issues.iter().any(|issue| issue.path == path)
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid arguments: ")?;
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

/// Decode `raw` against `schema`.
///
/// A `null` payload is treated as `{}`. Any other non-object payload is a
/// single issue at the root.
pub fn decode(raw: &Value, schema: &ParamSchema) -> Result<Arguments, ValidationFailure> {
    let empty = Map::new();
    let object = match raw {
        Value::Null => &empty,
        Value::Object(map) => map,
        other => {
            return Err(ValidationFailure {
                issues: vec![ValidationIssue {
                    path: "arguments".to_string(),
                    problem: format!("must be an object (got {})", kind(other)),
                }],
            });
        }
    };

    let mut issues = Vec::new();
    let decoded = decode_fields(object, schema.params(), "", &mut issues);

    if issues.is_empty() {
        Ok(Arguments(decoded))
    } else {
        Err(ValidationFailure { issues })
    }
}

fn decode_fields(
    object: &Map<String, Value>,
    params: &[Param],
    prefix: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Map<String, Value> {
    let mut decoded = Map::new();

    for param in params {
        let path = if prefix.is_empty() {
            param.name.to_string()
        } else {
            format!("{}.{}", prefix, param.name)
        };

        match object.get(param.name) {
            // Explicit null means "not given"
            None | Some(Value::Null) => {
                if param.required {
                    issues.push(issue(path, "is required"));
                } else if let Some(default) = &param.default {
                    decoded.insert(param.name.to_string(), default.clone());
                }
            }
            Some(value) => {
                if let Some(value) = decode_value(value, &param.ty, &path, issues) {
                    decoded.insert(param.name.to_string(), value);
                }
            }
        }
    }

    decoded
}

fn decode_value(
    value: &Value,
    ty: &ParamType,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<Value> {
    match (ty, value) {
        (ParamType::String, Value::String(_))
        | (ParamType::Number, Value::Number(_))
        | (ParamType::Boolean, Value::Bool(_)) => Some(value.clone()),

        (ParamType::Integer, Value::Number(n)) if is_whole(n) => Some(value.clone()),

        (ParamType::Enum(allowed), Value::String(s)) => {
            if allowed.contains(&s.as_str()) {
                Some(value.clone())
            } else {
                issues.push(issue(
                    path.to_string(),
                    format!("must be one of: {} (got \"{}\")", allowed.join(", "), s),
                ));
                None
            }
        }

        (ParamType::Object(fields), Value::Object(map)) => {
            Some(Value::Object(decode_fields(map, fields, path, issues)))
        }

        (ParamType::Array(item), Value::Array(items)) => {
            let decoded = items
                .iter()
                .enumerate()
                .filter_map(|(i, v)| decode_value(v, item, &format!("{}[{}]", path, i), issues))
                .collect();
            Some(Value::Array(decoded))
        }

        (ty, other) => {
            let label = ty.label();
            let article = if matches!(ty, ParamType::Integer | ParamType::Object(_) | ParamType::Array(_)) {
                "an"
            } else {
                "a"
            };
            let got = match other {
                Value::Number(_) if matches!(ty, ParamType::Integer) => "fractional number",
                _ => kind(other),
            };
            issues.push(issue(
                path.to_string(),
                format!("must be {} {} (got {})", article, label, got),
            ));
            None
        }
    }
}

fn is_whole(n: &Number) -> bool {
    n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn issue(path: String, problem: impl Into<String>) -> ValidationIssue {
    ValidationIssue {
        path,
        problem: problem.into(),
    }
}
