use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use careorbit_check::cli::json::{self, JsonReporter};
use careorbit_check::cli::text::{self, TextReporter};
use careorbit_check::cli::{CliArgs, OutputFormat};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = CliArgs::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = args.harness_config();
    info!(base_url = %config.base_url, timeout_secs = config.timeout.as_secs(), "starting");

    if args.probe {
        let results = careorbit_check::probe(&config).await?;
        let mut stdout = io::stdout();
        match args.format {
            OutputFormat::Text => text::write_probe_report(&mut stdout, &config.base_url, &results)?,
            OutputFormat::Json => json::write_probe_report(&mut stdout, &results)?,
        }
        return Ok(ExitCode::SUCCESS);
    }

    let report = match args.format {
        OutputFormat::Text => careorbit_check::run(&config, &mut TextReporter::new(io::stdout())).await?,
        OutputFormat::Json => careorbit_check::run(&config, &mut JsonReporter::new(io::stdout())).await?,
    };

    info!(passed = report.passed, failed = report.failed, "run complete");
    Ok(ExitCode::from(report.exit_code()))
}
