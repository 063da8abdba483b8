//! function-cue - run the function once against a request file.
//!
//! Reads a `RunFunctionRequest` as JSON or YAML and writes the response.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::debug;

use function_cue::{Function, FunctionConfig, RunFunctionRequest, RunFunctionResponse};

/// function-cue - render generated documents into a composition's desired state
#[derive(Parser, Debug)]
#[command(name = "function-cue", version, about = "Render generated documents into a composition's desired state")]
struct Cli {
    /// Request file. Use '-' for stdin
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Output location. Use '-' for stdout
    #[arg(short, long, default_value = "-")]
    output: String,

    /// Response encoding
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Seconds the response may be cached
    #[arg(long, default_value_t = 60)]
    ttl: u64,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.debug {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    match run(&cli) {
        Ok(rsp) if rsp.is_fatal() => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<RunFunctionResponse> {
    let content = read_input(&cli.input)?;
    // YAML is a superset of JSON, so one parser covers both encodings.
    let req: RunFunctionRequest = serde_yaml::from_str(&content).context("Failed to parse request")?;
    debug!("Read request tag={:?}", req.meta.tag);

    let config = FunctionConfig::new().with_ttl(Duration::from_secs(cli.ttl));
    let rsp = Function::new(config).run_function(&req);

    let rendered = match cli.format {
        Format::Json => serde_json::to_string_pretty(&rsp).context("Failed to serialize response")? + "\n",
        Format::Yaml => serde_yaml::to_string(&rsp).context("Failed to serialize response")?,
    };
    write_output(&cli.output, &rendered)?;
    Ok(rsp)
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read request from stdin")?;
        return Ok(content);
    }
    let path = PathBuf::from(input);
    fs::read_to_string(&path).with_context(|| format!("Failed to read request file {:?}", path))
}

fn write_output(output: &str, rendered: &str) -> anyhow::Result<()> {
    let mut out: Box<dyn Write> = if output == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(fs::File::create(output).with_context(|| format!("Failed to create output file {:?}", output))?)
    };
    out.write_all(rendered.as_bytes())?;
    out.flush()?;
    Ok(())
}
