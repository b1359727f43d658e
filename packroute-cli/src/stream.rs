//! `stream` command: run a request and print progress as JSON lines.

use std::io::Write;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use packroute_core::ConvergenceSample;
use packroute_jobs::{
    Deadline, DoneEvent, JobStatus, NeverCancel, ProgressEvent, ProgressSink, run_streaming,
};
use serde::{Deserialize, Serialize};

use crate::fs::require_existing;
use crate::request::{RunOverrides, load_request};
use crate::{
    ARG_MAX_ITERATIONS, ARG_POPULATION_SIZE, ARG_REPORT_EVERY, ARG_REQUEST, ARG_SEED,
    ARG_TIMEOUT_SECS, CliError, ENV_STREAM_REQUEST,
};

/// CLI arguments for the `stream` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Run the Grey Wolf Optimizer on a JSON request and print \
                 one JSON object per line: a progress event for every \
                 recorded convergence sample, then a single done event. A \
                 timeout stops the run early and reports the best routes \
                 found so far.",
    about = "Optimize a request, printing progress as JSON lines"
)]
#[ortho_config(prefix = "PACKROUTE")]
pub(crate) struct StreamArgs {
    /// Path to a JSON file containing `{ "instance": ..., "config": ... }`.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Stop after this many seconds and report the best-so-far result.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Number of wolves in the pack.
    #[arg(long = ARG_POPULATION_SIZE, value_name = "count")]
    #[serde(default)]
    pub(crate) population_size: Option<u32>,
    /// Number of iterations to run.
    #[arg(long = ARG_MAX_ITERATIONS, value_name = "count")]
    #[serde(default)]
    pub(crate) max_iterations: Option<u32>,
    /// Random seed for the pack.
    #[arg(long = ARG_SEED, value_name = "seed")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    /// Record a convergence sample every this many iterations.
    #[arg(long = ARG_REPORT_EVERY, value_name = "count")]
    #[serde(default)]
    pub(crate) report_every: Option<u32>,
}

impl StreamArgs {
    fn into_config(self) -> Result<StreamConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        StreamConfig::try_from(merged)
    }
}

/// Resolved `stream` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StreamConfig {
    pub(crate) request_path: Utf8PathBuf,
    pub(crate) timeout: Option<Duration>,
    pub(crate) overrides: RunOverrides,
}

impl TryFrom<StreamArgs> for StreamConfig {
    type Error = CliError;

    fn try_from(args: StreamArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: ENV_STREAM_REQUEST,
        })?;
        Ok(Self {
            request_path,
            timeout: args.timeout_secs.map(Duration::from_secs),
            overrides: RunOverrides {
                population_size: args.population_size,
                max_iterations: args.max_iterations,
                seed: args.seed,
                report_every: args.report_every,
            },
        })
    }
}

/// Writes each event as one line of JSON.
///
/// The first serialization or write failure is kept and later events are
/// dropped, since the run itself cannot be interrupted from a sink.
pub(crate) struct JsonLinesSink<'a> {
    writer: &'a mut dyn Write,
    failure: Option<CliError>,
}

impl<'a> JsonLinesSink<'a> {
    pub(crate) fn new(writer: &'a mut dyn Write) -> Self {
        Self {
            writer,
            failure: None,
        }
    }

    fn emit(&mut self, event: &ProgressEvent) {
        if self.failure.is_some() {
            return;
        }
        let written = serde_json::to_string(event)
            .map_err(CliError::SerializeOutput)
            .and_then(|encoded| {
                writeln!(self.writer, "{encoded}").map_err(CliError::WriteOutput)
            });
        self.failure = written.err();
    }

    pub(crate) fn finish(self) -> Result<(), CliError> {
        self.failure.map_or(Ok(()), Err)
    }
}

impl ProgressSink for JsonLinesSink<'_> {
    fn on_progress(&mut self, sample: ConvergenceSample) {
        self.emit(&ProgressEvent::Progress(sample));
    }

    fn on_done(&mut self, done: &DoneEvent) {
        self.emit(&ProgressEvent::Done(done.clone()));
    }
}

pub(crate) fn run_stream(args: StreamArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    run_stream_with(&config, writer).map(|_| ())
}

pub(crate) fn run_stream_with(
    config: &StreamConfig,
    writer: &mut dyn Write,
) -> Result<JobStatus, CliError> {
    require_existing(&config.request_path, ARG_REQUEST)?;
    let request = load_request(&config.request_path)?;
    let search = config.overrides.apply(request.config);
    let deadline = config
        .timeout
        .map(|budget| Deadline::new(NeverCancel, budget));

    let mut sink = JsonLinesSink::new(writer);
    let outcome = run_streaming(&request.instance, &search, &mut sink, &deadline)?;
    sink.finish()?;
    log::info!(
        "stream {} after {} iterations, fitness {:.3}",
        outcome.status,
        outcome.result.iterations_completed,
        outcome.result.best_fitness
    );
    Ok(outcome.status)
}
