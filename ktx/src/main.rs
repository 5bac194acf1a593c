// ktx/src/main.rs
use std::env;
use std::process;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod cli;
mod output;

use cli::CliArgs;

fn init_logging(verbose: u8) {
    let level_filter = match verbose {
        0 if runner_debug_enabled() => LevelFilter::DEBUG,
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("KTX_LOG")
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .without_time()
        .try_init();
}

// GitHub sets RUNNER_DEBUG=1 when step debug logging is enabled for a re-run.
fn runner_debug_enabled() -> bool {
    env::var("RUNNER_DEBUG").is_ok_and(|v| v == "1")
}

#[tokio::main]
async fn main() {
    let cli_args = CliArgs::parse();
    init_logging(cli_args.verbose);
    debug!("ktx {} starting", env!("CARGO_PKG_VERSION"));

    match cli_args.run().await {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            output::report_failure(&e.to_string());
            process::exit(1);
        }
    }
}
