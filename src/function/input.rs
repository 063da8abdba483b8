//! Function input.

use serde::{Deserialize, Serialize};

use crate::error::{FunctionError, Result};
use crate::merge::{DeclaredResource, TargetMode};

/// Expression marker that asks for a text stream instead of structured output.
const STREAM_MARKER: &str = "MarshalStream";

/// CueInput is the input a composition step passes to this function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CueInput {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub metadata: InputMetadata,
    #[serde(default)]
    pub export: Export,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputMetadata {
    #[serde(default)]
    pub name: String,
}

/// Export describes the template and where its output goes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Export {
    #[serde(default)]
    pub target: TargetMode,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<DeclaredResource>,
    #[serde(default)]
    pub options: ExportOptions,
}

/// ExportOptions tune how the template is evaluated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Expressions selecting what to export instead of the whole template.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expressions: Vec<String>,
    /// Field paths of the observed composite injected into the template as tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inject: Vec<String>,
}

/// OutputFormat is the shape the compiler should render its output in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Structured documents.
    #[default]
    Json,
    /// A text stream of documents.
    Text,
}

impl CueInput {
    /// The basename created resources are keyed by.
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Checks the input is usable before anything is compiled.
    pub fn validate(&self) -> Result<()> {
        if self.export.value.is_empty() {
            return Err(FunctionError::validation("value cannot be empty"));
        }
        if let Some(empty) = self.export.resources.iter().position(|r| r.name.is_empty()) {
            return Err(FunctionError::validation(format!(
                "resources[{}]: name cannot be empty",
                empty
            )));
        }
        Ok(())
    }
}

impl ExportOptions {
    /// Selects the output format from the expressions.
    ///
    /// A single expression that marshals a stream yields text; anything else
    /// is structured.
    pub fn output_format(&self) -> OutputFormat {
        match self.expressions.as_slice() {
            [only] if only.contains(STREAM_MARKER) => OutputFormat::Text,
            _ => OutputFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        let input: CueInput = serde_json::from_str(
            r#"{
                "apiVersion": "dummy.fn.crossplane.io",
                "kind": "dummy",
                "metadata": {"name": "expression"},
                "export": {
                    "target": "PatchResources",
                    "options": {"expressions": ["yaml.MarshalStream(output)"], "inject": ["spec.region"]},
                    "resources": [{"name": "bucket", "base": {"kind": "Bucket"}}],
                    "value": "output: []"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(input.name(), "expression");
        assert_eq!(input.export.target, TargetMode::PatchNamedResources);
        assert_eq!(input.export.options.inject, vec!["spec.region"]);
        assert_eq!(input.export.resources[0].name, "bucket");
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let input: CueInput = serde_json::from_str(r#"{"export":{"value":"a: 1"}}"#).unwrap();
        assert_eq!(input.export.target, TargetMode::CreateNamedResources);
        assert_eq!(input.export.options.output_format(), OutputFormat::Json);
    }

    #[test]
    fn test_validate_empty_value() {
        let err = CueInput::default().validate().unwrap_err();
        assert_eq!(err.to_string(), "invalid function input: value cannot be empty");
    }

    #[test]
    fn test_validate_whitespace_value() {
        let mut input = CueInput::default();
        input.export.value = " \n".to_string();
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_validate_declared_names() {
        let mut input = CueInput::default();
        input.export.value = "a: 1".to_string();
        input.export.resources.push(DeclaredResource::default());
        assert_eq!(
            input.validate().unwrap_err().to_string(),
            "invalid function input: resources[0]: name cannot be empty"
        );
    }

    #[test]
    fn test_output_format() {
        let opts = |exprs: &[&str]| ExportOptions {
            expressions: exprs.iter().map(|e| e.to_string()).collect(),
            inject: vec![],
        };
        assert_eq!(opts(&[]).output_format(), OutputFormat::Json);
        assert_eq!(opts(&["output"]).output_format(), OutputFormat::Json);
        assert_eq!(opts(&["yaml.MarshalStream(output)"]).output_format(), OutputFormat::Text);
        assert_eq!(
            opts(&["yaml.MarshalStream(a)", "yaml.MarshalStream(b)"]).output_format(),
            OutputFormat::Json
        );
    }
}
