//! Parameter schemas.
//!
//! A tool's parameters are declared as data: an ordered list of [`Param`]s,
//! each with a semantic type. The same declaration drives argument decoding
//! and the JSON Schema advertised in `tools/list`.

use serde_json::{json, Map, Value};
use switchboard::ToolSchema;

/// The semantic type of one parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamType {
    String,
    /// Any JSON number.
    Number,
    /// Whole numbers only.
    Integer,
    Boolean,
    /// A string restricted to the listed values.
    Enum(Vec<&'static str>),
    /// A nested object with its own fields.
    Object(Vec<Param>),
    /// A homogeneous array.
    Array(Box<ParamType>),
}

impl ParamType {
    pub fn one_of(values: &[&'static str]) -> Self {
        ParamType::Enum(values.to_vec())
    }

    pub fn array_of(item: ParamType) -> Self {
        ParamType::Array(Box::new(item))
    }

    pub fn object(fields: Vec<Param>) -> Self {
        ParamType::Object(fields)
    }

    /// Short name used in validation messages.
    pub fn label(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
            ParamType::Integer => "integer",
            ParamType::Boolean => "boolean",
            ParamType::Enum(_) => "string",
            ParamType::Object(_) => "object",
            ParamType::Array(_) => "array",
        }
    }

    fn json_schema(&self) -> Map<String, Value> {
        let mut schema = Map::new();
        schema.insert("type".to_string(), json!(self.label()));

        match self {
            ParamType::Enum(values) => {
                schema.insert("enum".to_string(), json!(values));
            }
            ParamType::Object(fields) => {
                let (properties, required) = properties_of(fields);
                schema.insert("properties".to_string(), Value::Object(properties));
                if !required.is_empty() {
                    schema.insert("required".to_string(), json!(required));
                }
            }
            ParamType::Array(item) => {
                schema.insert("items".to_string(), Value::Object(item.json_schema()));
            }
            _ => {}
        }

        schema
    }
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: &'static str,
    pub ty: ParamType,
    pub required: bool,
    /// Applied when an optional parameter is omitted.
    pub default: Option<Value>,
    pub description: &'static str,
}

impl Param {
    pub fn required(name: &'static str, ty: ParamType, description: &'static str) -> Self {
        Self {
            name,
            ty,
            required: true,
            default: None,
            description,
        }
    }

    pub fn optional(name: &'static str, ty: ParamType, description: &'static str) -> Self {
        Self {
            name,
            ty,
            required: false,
            default: None,
            description,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    fn json_schema(&self) -> Value {
        let mut schema = self.ty.json_schema();
        if !self.description.is_empty() {
            schema.insert("description".to_string(), json!(self.description));
        }
        if let Some(default) = &self.default {
            schema.insert("default".to_string(), default.clone());
        }
        Value::Object(schema)
    }
}

/// The ordered parameter list of one tool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamSchema {
    params: Vec<Param>,
}

impl ParamSchema {
    pub fn new(params: Vec<Param>) -> Self {
        Self { params }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn get(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }

    /// JSON Schema for `tools/list`.
    pub fn to_tool_schema(&self) -> ToolSchema {
        let (properties, required) = properties_of(&self.params);
        ToolSchema::object(properties, required)
    }
}

fn properties_of(params: &[Param]) -> (Map<String, Value>, Vec<String>) {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for param in params {
        properties.insert(param.name.to_string(), param.json_schema());
        if param.required {
            required.push(param.name.to_string());
        }
    }
    (properties, required)
}
