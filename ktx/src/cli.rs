// ktx/src/cli.rs
//! Defines the command-line argument structure using clap.
//!
//! Every input flag also reads the matching GitHub Actions input variable
//! (`INPUT_<NAME>`), so the same binary runs as an action step or by hand.
use std::env;
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use ktx_common::error::Result;

pub mod inputs;
pub mod report;

use crate::cli::inputs::InputArgs;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "ktx", bin_name = "ktx")]
pub struct CliArgs {
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Expand patterns and print the build manifest without contacting Ketryx
    #[arg(long)]
    pub dry_run: bool,

    /// Directory relative patterns are resolved against
    #[arg(long, value_name = "DIR")]
    pub working_directory: Option<PathBuf>,

    #[command(flatten)]
    pub inputs: InputArgs,
}

impl CliArgs {
    /// Runs the report (or preview) and returns whether the build was accepted.
    pub async fn run(&self) -> Result<bool> {
        let root = match &self.working_directory {
            Some(dir) => dir.clone(),
            None => env::current_dir()?,
        };
        if self.dry_run {
            report::run_dry_run(&self.inputs, root).await?;
            Ok(true)
        } else {
            report::run_report(&self.inputs, root).await
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn argument_definitions_are_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn parses_flags() {
        let args = CliArgs::try_parse_from([
            "ktx",
            "-vv",
            "--dry-run",
            "--working-directory",
            "/tmp/build",
            "--project",
            "KXPRJ",
        ])
        .unwrap();

        assert_eq!(args.verbose, 2);
        assert!(args.dry_run);
        assert_eq!(args.working_directory, Some(PathBuf::from("/tmp/build")));
        assert_eq!(args.inputs.project.as_deref(), Some("KXPRJ"));
    }
}
