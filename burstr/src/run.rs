use std::path::PathBuf;

use anyhow::Context as _;
use burstr_core::runner::{
    DEFAULT_CONCURRENCY, DEFAULT_CONNECT_TIMEOUT, DEFAULT_CYCLES, DEFAULT_FAN_OUT, DEFAULT_URL,
    RunConfig, Runner,
};

use crate::cli::{DEFAULT_REPORT_PATH, RunArgs};
use crate::config_file::{ConfigFile, YamlDuration};
use crate::exit_codes::ExitCode;
use crate::output;
use crate::report_file;
use crate::run_error::RunError;

/// Effective settings after layering defaults, the config file and CLI flags.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Settings {
    pub run: RunConfig,
    pub report: Option<PathBuf>,
}

pub(crate) fn resolve(args: &RunArgs, file: ConfigFile) -> Settings {
    let run = RunConfig {
        url: args
            .url
            .clone()
            .or(file.url)
            .unwrap_or_else(|| DEFAULT_URL.to_string()),
        fan_out: args.fan_out.or(file.fan_out).unwrap_or(DEFAULT_FAN_OUT),
        concurrency: args
            .concurrency
            .or(file.concurrency)
            .unwrap_or(DEFAULT_CONCURRENCY),
        cycles: args.cycles.or(file.cycles).unwrap_or(DEFAULT_CYCLES),
        request_timeout: args
            .timeout
            .or(file.timeout.map(YamlDuration::into_inner)),
        connect_timeout: Some(
            args.connect_timeout
                .or(file.connect_timeout.map(YamlDuration::into_inner))
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT),
        ),
    };

    let report = if args.no_report {
        None
    } else {
        Some(
            args.report
                .clone()
                .or(file.report)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_PATH)),
        )
    };

    Settings { run, report }
}

pub async fn run(args: RunArgs) -> Result<ExitCode, RunError> {
    let file = match &args.config {
        Some(path) => ConfigFile::load(path).await.map_err(RunError::InvalidInput)?,
        None => ConfigFile::default(),
    };
    let settings = resolve(&args, file);

    let runner = Runner::http(settings.run)
        .context("invalid run configuration")
        .map_err(RunError::InvalidInput)?;

    let out = output::formatter(args.output);
    out.print_header(runner.config());

    let report = runner
        .run(out.progress())
        .await
        .context("load run failed")
        .map_err(RunError::RuntimeError)?;

    out.print_summary(&report).map_err(RunError::RuntimeError)?;

    if let Some(path) = &settings.report {
        report_file::write(path, &report)
            .await
            .map_err(RunError::ReportError)?;
        out.print_report_written(path);
    }

    Ok(ExitCode::from_request_errors(
        args.fail_on_errors,
        report.error,
    ))
}
