//! Focused unit tests covering the `stream` command and its JSON-lines sink.

use std::time::Duration;

use super::helpers::{BrokenPipe, Workspace, json_lines, small_request};
use super::*;
use crate::request::RunOverrides;
use crate::stream::{JsonLinesSink, StreamArgs, StreamConfig, run_stream_with};
use camino::Utf8PathBuf;
use packroute_core::ConvergenceSample;
use packroute_jobs::{JobStatus, ProgressSink};
use rstest::rstest;

fn config_for(request_path: Utf8PathBuf, timeout: Option<Duration>) -> StreamConfig {
    StreamConfig {
        request_path,
        timeout,
        overrides: RunOverrides::default(),
    }
}

#[rstest]
fn converting_stream_without_request_errors() {
    let err = StreamConfig::try_from(StreamArgs::default()).expect_err("missing request");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_REQUEST);
            assert_eq!(env, ENV_STREAM_REQUEST);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn timeout_flag_becomes_a_duration() {
    let args = StreamArgs {
        request_path: Some(Utf8PathBuf::from("request.json")),
        timeout_secs: Some(30),
        ..StreamArgs::default()
    };
    let config = StreamConfig::try_from(args).expect("config should build");
    assert_eq!(config.timeout, Some(Duration::from_secs(30)));
}

#[rstest]
fn stream_prints_one_event_per_line_and_ends_with_done() {
    let workspace = Workspace::new();
    let path = workspace.write_request("request.json", &small_request());
    let mut output = Vec::new();
    let status = run_stream_with(&config_for(path, None), &mut output).expect("stream succeeds");
    assert_eq!(status, JobStatus::Completed);

    let events = json_lines(&output);
    assert_eq!(events.len(), 17);
    let (done, progress) = events.split_last().expect("at least one event");
    assert_eq!(done["event"], "done");
    assert_eq!(done["status"], "completed");
    assert!(progress.iter().all(|event| event["event"] == "progress"));
    let iterations: Vec<u64> = progress
        .iter()
        .filter_map(|event| event["iteration"].as_u64())
        .collect();
    assert_eq!(iterations, (0..=15).collect::<Vec<u64>>());
}

#[rstest]
fn spent_timeout_reports_the_initial_result() {
    let workspace = Workspace::new();
    let path = workspace.write_request("request.json", &small_request());
    let mut output = Vec::new();
    let status = run_stream_with(&config_for(path, Some(Duration::ZERO)), &mut output)
        .expect("stream succeeds");
    assert_eq!(status, JobStatus::Cancelled);

    let events = json_lines(&output);
    assert_eq!(events.len(), 2);
    let done = events.last().expect("done event");
    assert_eq!(done["status"], "cancelled");
    assert_eq!(done["iterations_completed"], 0);
}

#[rstest]
fn sink_keeps_the_first_write_failure() {
    let mut pipe = BrokenPipe;
    let mut sink = JsonLinesSink::new(&mut pipe);
    sink.on_progress(ConvergenceSample::new(0, 1.0));
    sink.on_progress(ConvergenceSample::new(1, 0.5));
    let err = sink.finish().expect_err("writes fail");
    assert!(matches!(err, CliError::WriteOutput(_)));
}
