//! `solve` command: run a request to completion and print the result.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::fs::require_existing;
use crate::request::{RunOverrides, load_request, write_pretty};
use crate::{
    ARG_MAX_ITERATIONS, ARG_POPULATION_SIZE, ARG_REPORT_EVERY, ARG_REQUEST, ARG_SEED, CliError,
    ENV_SOLVE_REQUEST,
};

/// CLI arguments for the `solve` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Run the Grey Wolf Optimizer on a JSON request holding an \
                 instance and optional search parameters, then print the \
                 best routes found as JSON. Search parameters can be \
                 overridden from CLI flags, configuration files, or \
                 environment variables.",
    about = "Optimize a request and print the final result"
)]
#[ortho_config(prefix = "PACKROUTE")]
pub(crate) struct SolveArgs {
    /// Path to a JSON file containing `{ "instance": ..., "config": ... }`.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
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

impl SolveArgs {
    fn into_config(self) -> Result<SolveConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SolveConfig::try_from(merged)
    }
}

/// Resolved `solve` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SolveConfig {
    pub(crate) request_path: Utf8PathBuf,
    pub(crate) overrides: RunOverrides,
}

impl TryFrom<SolveArgs> for SolveConfig {
    type Error = CliError;

    fn try_from(args: SolveArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: ENV_SOLVE_REQUEST,
        })?;
        Ok(Self {
            request_path,
            overrides: RunOverrides {
                population_size: args.population_size,
                max_iterations: args.max_iterations,
                seed: args.seed,
                report_every: args.report_every,
            },
        })
    }
}

pub(crate) fn run_solve(args: SolveArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    run_solve_with(&config, writer)
}

pub(crate) fn run_solve_with(config: &SolveConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    require_existing(&config.request_path, ARG_REQUEST)?;
    let request = load_request(&config.request_path)?;
    let search = config.overrides.apply(request.config);
    let result = packroute_jobs::run_sync(&request.instance, &search)?;
    log::info!(
        "solved {} customers with {} routes, fitness {:.3} in {:.3}s",
        request.instance.customer_count(),
        result.vehicle_count(),
        result.best_fitness,
        result.runtime_seconds
    );
    write_pretty(writer, &result)
}
