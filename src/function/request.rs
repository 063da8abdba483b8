//! Request and response messages exchanged with the composition pipeline.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::FunctionError;
use crate::resource::{Composite, DesiredComposedResources, ObservedComposedResources};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestMeta {
    #[serde(default)]
    pub tag: String,
}

/// The state of the world the pipeline observed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservedState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite: Option<Composite>,
    #[serde(default, skip_serializing_if = "ObservedComposedResources::is_empty")]
    pub resources: ObservedComposedResources,
}

/// The state previous functions (and this one) want.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesiredState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite: Option<Composite>,
    #[serde(default, skip_serializing_if = "DesiredComposedResources::is_empty")]
    pub resources: DesiredComposedResources,
}

/// RunFunctionRequest is one invocation of the function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunFunctionRequest {
    #[serde(default)]
    pub meta: RequestMeta,
    /// Function input, decoded into [`super::CueInput`] on use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<serde_json::Value>,
    #[serde(default)]
    pub observed: ObservedState,
    #[serde(default)]
    pub desired: DesiredState,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMeta {
    #[serde(default)]
    pub tag: String,
    /// How long, in seconds, the response may be cached.
    pub ttl: u64,
}

/// Severity of a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Normal,
    Warning,
    Fatal,
}

/// A message reported back to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionResult {
    pub severity: Severity,
    pub message: String,
}

/// RunFunctionResponse is what the function hands back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunFunctionResponse {
    pub meta: ResponseMeta,
    #[serde(default)]
    pub desired: DesiredState,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<FunctionResult>,
}

impl RunFunctionResponse {
    /// Starts a response to `req`, carrying its desired state through unchanged.
    pub fn to(req: &RunFunctionRequest, ttl: Duration) -> Self {
        RunFunctionResponse {
            meta: ResponseMeta {
                tag: req.meta.tag.clone(),
                ttl: ttl.as_secs(),
            },
            desired: req.desired.clone(),
            results: Vec::new(),
        }
    }

    /// Appends a normal result.
    pub fn normal(&mut self, message: impl Into<String>) {
        self.results.push(FunctionResult {
            severity: Severity::Normal,
            message: message.into(),
        });
    }

    /// Appends a fatal result for `err`.
    pub fn fatal(&mut self, err: &FunctionError) {
        self.results.push(FunctionResult {
            severity: Severity::Fatal,
            message: err.to_string(),
        });
    }

    /// Returns true if any result is fatal.
    pub fn is_fatal(&self) -> bool {
        self.results.iter().any(|r| r.severity == Severity::Fatal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Name;

    #[test]
    fn test_parse_request() {
        let req: RunFunctionRequest = serde_json::from_str(
            r#"{
                "meta": {"tag": "abc"},
                "input": {"export": {"value": "a: 1"}},
                "observed": {"composite": {"resource": {"apiVersion": "example.org/v1", "kind": "XR"}}},
                "desired": {"resources": {"db": {"resource": {"kind": "Database"}, "ready": "True"}}}
            }"#,
        )
        .unwrap();
        assert_eq!(req.meta.tag, "abc");
        assert!(req.input.is_some());
        assert_eq!(req.observed.composite.unwrap().resource.kind(), "XR");
        assert_eq!(req.desired.resources[&Name::from("db")].resource.kind(), "Database");
    }

    #[test]
    fn test_response_carries_desired() {
        let mut req = RunFunctionRequest::default();
        req.meta.tag = "t".to_string();
        req.desired.resources.insert(Name::from("db"), Default::default());

        let mut rsp = RunFunctionResponse::to(&req, Duration::from_secs(60));
        assert_eq!(rsp.meta.ttl, 60);
        assert_eq!(rsp.meta.tag, "t");
        assert_eq!(rsp.desired, req.desired);
        assert!(!rsp.is_fatal());

        rsp.fatal(&FunctionError::validation("value cannot be empty"));
        assert!(rsp.is_fatal());
        assert_eq!(rsp.results[0].message, "invalid function input: value cannot be empty");
    }
}
