//! Function module - One invocation from request to response.
//!
//! ```text
//! request -> input -> observed/desired state -> compile -> write -> report -> response
//! ```
//!
//! Every failure ends the invocation with a single fatal result, and the
//! response then carries the request's desired state unchanged.

mod compiler;
mod input;
mod request;


pub use compiler::*;
pub use input::*;
pub use request::*;

use log::{debug, info, warn};

use crate::config::FunctionConfig;
use crate::error::{FunctionError, Result, ResultExt};
use crate::merge::{summarize, ResourceWriter, TargetMode};
use crate::resource::FieldTarget;

/// Function renders generated documents into the desired state.
pub struct Function {
    config: FunctionConfig,
    compiler: Box<dyn TemplateCompiler>,
}

impl Default for Function {
    fn default() -> Self {
        Function::new(FunctionConfig::default())
    }
}

impl Function {
    /// Creates a function that compiles templates with [`YamlStreamCompiler`].
    pub fn new(config: FunctionConfig) -> Self {
        Function::with_compiler(config, Box::new(YamlStreamCompiler::new()))
    }

    /// Creates a function with a custom compiler.
    pub fn with_compiler(config: FunctionConfig, compiler: Box<dyn TemplateCompiler>) -> Self {
        Function { config, compiler }
    }

    /// Runs the function.
    ///
    /// Failures are reported as a fatal result in the response, never as an
    /// error.
    pub fn run_function(&self, req: &RunFunctionRequest) -> RunFunctionResponse {
        info!("Running Function tag={:?}", req.meta.tag);
        let mut rsp = RunFunctionResponse::to(req, self.config.ttl);

        match self.render(req) {
            Ok((desired, msgs)) => {
                rsp.desired = desired;
                for msg in msgs {
                    rsp.normal(msg);
                }
            }
            Err(err) => {
                warn!("Function failed: {}", err);
                rsp.fatal(&err);
            }
        }
        rsp
    }

    fn render(&self, req: &RunFunctionRequest) -> Result<(DesiredState, Vec<String>)> {
        let input = get_input(req)?;
        input.validate()?;

        // The composite resource that actually exists.
        let oxr = req
            .observed
            .composite
            .as_ref()
            .ok_or_else(|| FunctionError::lookup("cannot get observed composite resource"))?;
        info!(
            "xr-version={} xr-kind={} xr-name={} target={}",
            oxr.resource.api_version(),
            oxr.resource.kind(),
            oxr.resource.name(),
            input.export.target
        );

        // The composite resource desired by previous functions in the pipeline.
        let mut dxr = req.desired.composite.clone().unwrap_or_default();
        dxr.set_api_version(oxr.resource.api_version());
        dxr.set_kind(oxr.resource.kind());

        // The composed resources desired by previous functions in the pipeline.
        let mut desired = req.desired.resources.clone();
        debug!("DesiredComposed resources: {}", desired.len());

        let opts = CompileOptions {
            format: input.export.options.output_format(),
            tags: build_tags(&input.export.options.inject, oxr).context("failed building tags")?,
        };

        info!("compiling template from input");
        let compiled = self
            .compiler
            .compile(&input, &opts)
            .context("failed compiling cue template")?;
        debug!("compile output:\n{}", compiled.text);

        info!("Setting output to target");
        let writer = ResourceWriter::builder()
            .basename(input.name())
            .declared(input.export.resources.clone())
            .build();
        let outcome = writer
            .write(input.export.target, &mut dxr, &mut desired, &compiled.documents)
            .context(write_context(input.export.target))?;
        debug!("Set {} resource(s) to the desired state", outcome.touched.len());

        let msgs = summarize(outcome.mode, &outcome.touched);
        info!("Successfully processed function-cue resources input={:?}", input.name());

        Ok((
            DesiredState {
                composite: Some(dxr),
                resources: desired,
            },
            msgs,
        ))
    }
}

fn get_input(req: &RunFunctionRequest) -> Result<CueInput> {
    match &req.input {
        None => Ok(CueInput::default()),
        Some(raw) => serde_json::from_value(raw.clone()).map_err(|e| FunctionError::Input {
            message: e.to_string(),
        }),
    }
}

fn write_context(mode: TargetMode) -> &'static str {
    match mode {
        TargetMode::CompositeResource => "cannot add resources to XR",
        TargetMode::CreateNamedResources => "cannot add resources to DesiredComposed",
        TargetMode::PatchDesiredResources => "cannot update existing DesiredComposed",
        TargetMode::PatchNamedResources => "cannot patch declared DesiredComposed",
    }
}
