#![allow(clippy::print_stdout)]
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use jsonschema_engine::{Draft, Validator};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jsonschema-engine")]
struct Cli {
    /// A path to a JSON instance (i.e. filename.json) to validate (may be specified multiple times).
    #[arg(short = 'i', long = "instance")]
    instances: Option<Vec<PathBuf>>,

    /// The JSON Schema to validate with (i.e. schema.json).
    #[arg(value_parser, required_unless_present("version"))]
    schema: Option<PathBuf>,

    /// How to print the result of every instance.
    #[arg(short = 'o', long = "output", value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Draft used when the schema has no `$schema`.
    #[arg(short = 'd', long = "draft", value_enum)]
    draft: Option<DraftArg>,

    /// Stop at the first error of every instance.
    #[arg(long = "fail-fast")]
    fail_fast: bool,

    /// Make `format` assert regardless of the draft.
    #[arg(long = "assert-format")]
    assert_format: bool,

    /// Show program's version number and exit.
    #[arg(short = 'v', long = "version")]
    version: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Flag,
    List,
}

#[derive(Clone, Copy, ValueEnum)]
enum DraftArg {
    #[value(name = "4")]
    Draft4,
    #[value(name = "6")]
    Draft6,
    #[value(name = "7")]
    Draft7,
    #[value(name = "2019-09")]
    Draft201909,
    #[value(name = "2020-12")]
    Draft202012,
}

impl From<DraftArg> for Draft {
    fn from(value: DraftArg) -> Self {
        match value {
            DraftArg::Draft4 => Draft::Draft4,
            DraftArg::Draft6 => Draft::Draft6,
            DraftArg::Draft7 => Draft::Draft7,
            DraftArg::Draft201909 => Draft::Draft201909,
            DraftArg::Draft202012 => Draft::Draft202012,
        }
    }
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .with_context(|| format!("{} is not a valid JSON document", path.display()))
}

fn build_validator(cli: &Cli, schema: &Value) -> Result<Validator, jsonschema_engine::SchemaError> {
    let mut options = jsonschema_engine::options();
    if let Some(draft) = cli.draft {
        options.with_draft(draft.into());
    }
    if cli.assert_format {
        options.should_validate_formats(true);
    }
    options.fail_fast(cli.fail_fast).build(schema)
}

fn report(validator: &Validator, instance: &Value, filename: &str, format: OutputFormat) -> anyhow::Result<bool> {
    match format {
        OutputFormat::Text => match validator.validate(instance) {
            Ok(()) => {
                println!("{filename} - VALID");
                Ok(true)
            }
            Err(errors) => {
                println!("{filename} - INVALID. Errors:");
                for (i, error) in errors.enumerate() {
                    println!("{}. {} at '{}'", i + 1, error, error.instance_location);
                }
                Ok(false)
            }
        },
        OutputFormat::Flag => {
            let output = validator.apply(instance).flag();
            print_output(filename, serde_json::to_value(output)?);
            Ok(output.is_valid())
        }
        OutputFormat::List => {
            let output = validator.apply(instance).list();
            let valid = output.is_valid();
            print_output(filename, serde_json::to_value(output)?);
            Ok(valid)
        }
    }
}

fn print_output(filename: &str, mut output: Value) {
    if let Value::Object(object) = &mut output {
        object.insert("instance".to_string(), Value::String(filename.to_string()));
    }
    println!("{output}");
}

fn validate_instances(cli: &Cli, instances: &[PathBuf], schema_path: &Path) -> anyhow::Result<bool> {
    let schema = read_json(schema_path)?;
    let validator = match build_validator(cli, &schema) {
        Ok(validator) => validator,
        Err(error) => {
            println!("Schema is invalid. Error: {error}");
            return Ok(false);
        }
    };
    tracing::debug!(count = instances.len(), "validating instances");
    let mut success = true;
    for instance in instances {
        let instance_json = read_json(instance)?;
        let filename = instance.to_string_lossy();
        success &= report(&validator, &instance_json, &filename, cli.output)?;
    }
    Ok(success)
}

fn main() -> ExitCode {
    let config = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if config.version {
        println!(concat!("Version: ", env!("CARGO_PKG_VERSION")));
        return ExitCode::SUCCESS;
    }

    if let (Some(schema), Some(instances)) = (&config.schema, &config.instances) {
        return match validate_instances(&config, instances, schema) {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::FAILURE,
            Err(error) => {
                println!("Error: {error:#}");
                ExitCode::FAILURE
            }
        };
    }
    ExitCode::SUCCESS
}
