//! Machine-readable rendering of command results and failures.
//!
//! Human output is printed by each command. For `json` and `yaml` a result is
//! flattened next to a `status` tag, and a failure keeps the coded error's
//! code, context and hint so scripts can branch on them.

use cqlbridge_error::{CqlBridgeError, ErrorCode, ErrorContext};
use serde::Serialize;

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn is_machine_readable(&self) -> bool {
        !matches!(self, OutputFormat::Human)
    }

    /// Serialized form of `value`, or `None` for human output.
    fn render<T: Serialize>(self, value: &T) -> anyhow::Result<Option<String>> {
        Ok(match self {
            OutputFormat::Human => None,
            OutputFormat::Json => Some(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Some(serde_yaml::to_string(value)?),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum Status {
    Success,
    Error,
}

#[derive(Serialize)]
struct Success<'a, T> {
    status: Status,
    #[serde(flatten)]
    result: &'a T,
}

#[derive(Debug, Serialize)]
struct Failure<'a> {
    status: Status,
    exit_code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<ErrorCode>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a ErrorContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<&'a str>,
}

impl<'a> Failure<'a> {
    fn from_error(err: &'a anyhow::Error, exit_code: i32) -> Self {
        match err.downcast_ref::<CqlBridgeError>() {
            Some(bridge) => Self {
                status: Status::Error,
                exit_code,
                code: Some(bridge.code),
                message: bridge.message.clone(),
                context: bridge.context.as_ref(),
                hint: bridge.hint.as_deref(),
            },
            None => Self {
                status: Status::Error,
                exit_code,
                code: None,
                message: err.to_string(),
                context: None,
                hint: None,
            },
        }
    }
}

pub fn print_success<T: Serialize>(format: OutputFormat, result: &T) -> anyhow::Result<()> {
    let response = Success {
        status: Status::Success,
        result,
    };
    if let Some(text) = format.render(&response)? {
        println!("{}", text);
    }
    Ok(())
}

pub fn print_error(format: OutputFormat, err: &anyhow::Error, exit_code: i32) -> anyhow::Result<()> {
    if let Some(text) = format.render(&Failure::from_error(err, exit_code))? {
        println!("{}", text);
    }
    Ok(())
}
