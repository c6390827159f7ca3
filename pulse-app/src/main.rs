use anyhow::Context;
use clap::Parser;
use cli::Cli;
use pulse_common::observability::{LogConfig, LogFormat, init_logging};
use pulse_common::{PulseError, Result};
use pulse_config::{PulseConfig, PulseConfigLoader};
use pulse_feed::{Markers, Pipeline, PipelineOptions, RunReport};
use pulse_http::HttpClient;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
mod cli;

const DEFAULT_CONFIG_FILE: &str = "pulse.yaml";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let outcome = run(&cli).await;
    finish(outcome, cli.dry_run)
}

/// Report the run and map it to the process status: 0 on success, 1 otherwise.
fn finish(outcome: Result<RunReport>, dry_run: bool) -> ExitCode {
    match outcome {
        Ok(report) => {
            if dry_run {
                println!("{}", report.document);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "news update failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<RunReport> {
    // 1) Load config (env wins over file)
    let cfg = load_config(cli.config.as_deref())?;

    // 2) Logging, mirrored to stderr for whoever runs the job
    init_logging(LogConfig {
        app_name: "pulse",
        log_dir: cli.log_dir.clone().or_else(|| cfg.log.dir.clone()),
        emit_stderr: true,
        format: if cli.json_logs {
            LogFormat::Json
        } else {
            cfg.log.format
        },
        default_filter: cfg.log.filter.clone().unwrap_or_else(|| "info".into()),
    })
    .map_err(|e| PulseError::Setup(format!("{e:#}")))?;

    let page = cli.page.clone().unwrap_or_else(|| cfg.page.clone());

    let http = HttpClient::new(&cfg.http.user_agent)
        .map_err(|e| PulseError::Setup(e.to_string()))?
        .with_timeout(cfg.http.timeout_secs.map(Duration::from_secs));

    let pipeline = Pipeline::new(Arc::new(http), pipeline_options(cfg));
    tracing::info!(
        feeds = pipeline.options().feeds.len(),
        page = %page.display(),
        dry_run = cli.dry_run,
        "fetching AI news"
    );

    let report = pipeline
        .run(&page, cli.dry_run)
        .await
        .with_context(|| format!("updating {}", page.display()))?;

    tracing::info!(
        feeds_total = report.feeds_total,
        feeds_failed = report.feeds_failed,
        items_fetched = report.items_fetched,
        items_published = report.items_published,
        written = report.written,
        "news update finished"
    );
    Ok(report)
}

fn load_config(explicit: Option<&Path>) -> Result<PulseConfig> {
    let loader = match explicit {
        Some(path) => PulseConfigLoader::new().with_file(path),
        None => PulseConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE),
    };
    loader.load().map_err(|e| PulseError::Config(e.to_string()))
}

fn pipeline_options(cfg: PulseConfig) -> PipelineOptions {
    let defaults = PipelineOptions::default();
    let stock = Markers::default();
    PipelineOptions {
        feeds: cfg.feeds,
        max_items: cfg.max_items.unwrap_or(defaults.max_items),
        dedup_prefix_chars: cfg.dedup_prefix_chars.unwrap_or(defaults.dedup_prefix_chars),
        markers: Markers {
            start: cfg.markers.start.unwrap_or(stock.start),
            end: cfg.markers.end.unwrap_or(stock.end),
        },
    }
}
