// ktx/src/output.rs
//! Step outputs (`ok`, `error`, `build-id`, `build-url`) and the terminal
//! summary.
use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use colored::Colorize;
use ktx_common::error::{KtxError, Result};
use ktx_common::BuildOutcome;
use tracing::debug;
use uuid::Uuid;

const GITHUB_OUTPUT_ENV: &str = "GITHUB_OUTPUT";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutputs {
    pub ok: bool,
    pub error: Option<String>,
    pub build_id: Option<String>,
    pub build_url: Option<String>,
}

impl RunOutputs {
    pub fn from_outcome(outcome: &BuildOutcome, base_url: &str) -> Self {
        Self {
            ok: outcome.ok,
            error: outcome.error.clone(),
            build_id: outcome.build_id.clone(),
            build_url: outcome.build_url(base_url),
        }
    }

    pub fn failed(error: &KtxError) -> Self {
        Self {
            ok: false,
            error: Some(error.to_string()),
            ..Self::default()
        }
    }

    fn pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = vec![("ok", if self.ok { "true" } else { "false" })];
        if let Some(error) = &self.error {
            pairs.push(("error", error));
        }
        if let Some(build_id) = &self.build_id {
            pairs.push(("build-id", build_id));
        }
        if let Some(build_url) = &self.build_url {
            pairs.push(("build-url", build_url));
        }
        pairs
    }
}

/// Appends the outputs to the file named by `GITHUB_OUTPUT`, if any.
pub fn publish(outputs: &RunOutputs) -> Result<()> {
    match env::var_os(GITHUB_OUTPUT_ENV).filter(|v| !v.is_empty()) {
        Some(path) => write_output_file(Path::new(&path), outputs),
        None => {
            debug!("{} is not set; not publishing step outputs", GITHUB_OUTPUT_ENV);
            Ok(())
        }
    }
}

fn write_output_file(path: &Path, outputs: &RunOutputs) -> Result<()> {
    let mut buffer = String::new();
    for (name, value) in outputs.pairs() {
        buffer.push_str(&format_output(name, value));
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            KtxError::IoError(format!("Failed to open output file {}: {}", path.display(), e))
        })?;
    file.write_all(buffer.as_bytes()).map_err(|e| {
        KtxError::IoError(format!("Failed to write output file {}: {}", path.display(), e))
    })?;
    debug!("Published step outputs to {}", path.display());
    Ok(())
}

/// `name=value`, or the heredoc form when the value spans lines.
fn format_output(name: &str, value: &str) -> String {
    if value.contains('\n') || value.contains('\r') {
        let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());
        format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
    } else {
        format!("{name}={value}\n")
    }
}

pub fn print_summary(outputs: &RunOutputs) {
    if outputs.ok {
        println!("{} Build reported to Ketryx", "==>".blue().bold());
        if let Some(build_id) = &outputs.build_id {
            println!("  {} {}", "Build:".bold(), build_id);
        }
        if let Some(build_url) = &outputs.build_url {
            println!("  {} {}", "URL:".bold(), build_url.underline());
        }
    } else {
        report_failure(outputs.error.as_deref().unwrap_or("Build was not accepted"));
    }
}

/// Prints a failure for humans and, inside GitHub Actions, as an annotation.
pub fn report_failure(message: &str) {
    if in_github_actions() {
        println!("::error::{}", escape_command_data(message));
    }
    eprintln!("{}: {}", "Error".red().bold(), message);
}

fn in_github_actions() -> bool {
    env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

fn escape_command_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
