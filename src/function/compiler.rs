//! Template compilation.
//!
//! Evaluating templates is delegated to a [`TemplateCompiler`]. The bundled
//! [`YamlStreamCompiler`] reads the template as a YAML (or JSON) document
//! stream, which is enough to drive the function end to end.

use serde::Deserialize;

use super::input::{CueInput, OutputFormat};
use crate::error::{FunctionError, Result};
use crate::fieldpath::{self, Path};
use crate::resource::Composite;
use crate::value::{Map, Value};

/// CompileOptions carries everything derived from the request that a
/// compiler needs besides the input itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub format: OutputFormat,
    /// `name=value` pairs taken from the observed composite resource.
    pub tags: Vec<String>,
}

/// Compiled is the output of a compilation: the generated documents and
/// their rendered text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compiled {
    pub documents: Vec<Map>,
    pub text: String,
}

/// TemplateCompiler turns an input's template into documents.
pub trait TemplateCompiler: Send + Sync {
    fn compile(&self, input: &CueInput, opts: &CompileOptions) -> Result<Compiled>;
}

/// Builds `path=value` tags by reading each path from the observed composite.
pub fn build_tags(inject: &[String], observed: &Composite) -> Result<Vec<String>> {
    inject
        .iter()
        .map(|raw| {
            let path: Path = raw
                .parse()
                .map_err(|e: fieldpath::FieldPathError| FunctionError::lookup(e.to_string()))?;
            let value = observed.resource.get_value(&path).ok_or_else(|| {
                FunctionError::lookup(format!("cannot get {} from observed composite resource", raw))
            })?;
            Ok(format!("{}={}", raw, value))
        })
        .collect()
}

/// YamlStreamCompiler reads the template text as a stream of YAML documents.
///
/// - `@tag(name)` markers are replaced by the matching tag value.
/// - Each expression selects a field path of the template, which must then
///   be a single document; a `yaml.MarshalStream(...)`/`json.MarshalStream(...)`
///   wrapper is ignored.
/// - Null documents are skipped, top-level lists contribute their items.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlStreamCompiler;

impl YamlStreamCompiler {
    pub fn new() -> Self {
        YamlStreamCompiler
    }

    fn substitute_tags(template: &str, tags: &[String]) -> String {
        tags.iter().fold(template.to_string(), |text, tag| match tag.split_once('=') {
            Some((name, value)) => text.replace(&format!("@tag({})", name), value),
            None => text,
        })
    }

    fn parse_stream(text: &str) -> Result<Vec<Value>> {
        let mut values = Vec::new();
        for document in serde_yaml::Deserializer::from_str(text) {
            let value = Value::deserialize(document)
                .map_err(|e| FunctionError::template(format!("cannot parse template: {}", e)))?;
            if !value.is_null() {
                values.push(value);
            }
        }
        Ok(values)
    }

    fn select(values: Vec<Value>, expressions: &[String]) -> Result<Vec<Value>> {
        if expressions.is_empty() {
            return Ok(values);
        }
        if values.len() > 1 {
            return Err(FunctionError::template(format!(
                "cannot evaluate expressions on a stream of {} documents",
                values.len()
            )));
        }
        let root = match values.into_iter().next() {
            Some(Value::Map(root)) => root,
            Some(other) => {
                return Err(FunctionError::template(format!(
                    "cannot evaluate expressions on a {} document",
                    other.type_name()
                )))
            }
            None => Map::new(),
        };
        expressions
            .iter()
            .map(|expr| {
                let inner = strip_stream_call(expr);
                let path: Path = inner.parse().map_err(|e: fieldpath::FieldPathError| {
                    FunctionError::template(format!("invalid expression {:?}: {}", expr, e))
                })?;
                fieldpath::get_value(&root, &path)
                    .cloned()
                    .ok_or_else(|| FunctionError::template(format!("expression {:?} not found", expr)))
            })
            .collect()
    }

    fn into_documents(values: Vec<Value>) -> Result<Vec<Map>> {
        let mut documents = Vec::new();
        for value in values {
            let items = match value {
                Value::List(items) => items,
                other => vec![other],
            };
            for item in items {
                let found = item.type_name();
                let map = item.into_map().ok_or_else(|| {
                    FunctionError::template(format!("generated document is a {}, not an object", found))
                })?;
                documents.push(map);
            }
        }
        Ok(documents)
    }

    fn render(documents: &[Map], format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(documents)
                .map_err(|e| FunctionError::template(format!("cannot render output: {}", e))),
            OutputFormat::Text => documents
                .iter()
                .map(|d| serde_yaml::to_string(d))
                .collect::<Result<Vec<_>, _>>()
                .map(|docs| docs.join("---\n"))
                .map_err(|e| FunctionError::template(format!("cannot render output: {}", e))),
        }
    }
}

impl TemplateCompiler for YamlStreamCompiler {
    fn compile(&self, input: &CueInput, opts: &CompileOptions) -> Result<Compiled> {
        let text = Self::substitute_tags(&input.export.value, &opts.tags);
        let values = Self::select(Self::parse_stream(&text)?, &input.export.options.expressions)?;
        let documents = Self::into_documents(values)?;
        let text = Self::render(&documents, opts.format)?;
        Ok(Compiled { documents, text })
    }
}

fn strip_stream_call(expr: &str) -> &str {
    let expr = expr.trim();
    for prefix in ["yaml.MarshalStream(", "json.MarshalStream("] {
        if let Some(inner) = expr.strip_prefix(prefix).and_then(|e| e.strip_suffix(')')) {
            return inner.trim();
        }
    }
    expr
}
