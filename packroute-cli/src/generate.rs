//! `generate` command: write a synthetic request file.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use packroute_core::OptimizationConfig;
use packroute_core::synthetic::{self, ClusteredSpec, UniformSpec};
use serde::{Deserialize, Serialize};

use crate::fs::create_utf8_file;
use crate::request::{SolveRequest, write_pretty};
use crate::{ARG_CAPACITY, ARG_CLUSTERS, ARG_CUSTOMERS, ARG_OUTPUT, ARG_SEED, CliError};

/// CLI arguments for the `generate` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Generate a reproducible synthetic instance around San \
                 Francisco and write it as a request file that `solve` and \
                 `stream` accept. Customers are scattered uniformly unless a \
                 cluster count is given.",
    about = "Write a synthetic request file"
)]
#[ortho_config(prefix = "PACKROUTE")]
pub(crate) struct GenerateArgs {
    /// Number of customers (default 20, or 30 when clustered).
    #[arg(long = ARG_CUSTOMERS, value_name = "count")]
    #[serde(default)]
    pub(crate) customers: Option<usize>,
    /// Group customers into this many clusters.
    #[arg(long = ARG_CLUSTERS, value_name = "count")]
    #[serde(default)]
    pub(crate) clusters: Option<usize>,
    /// Seed for coordinates and demands.
    #[arg(long = ARG_SEED, value_name = "seed")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    /// Vehicle capacity (default 50, or 100 when clustered).
    #[arg(long = ARG_CAPACITY, value_name = "units")]
    #[serde(default)]
    pub(crate) capacity: Option<u32>,
    /// Write the request here instead of standard output.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl GenerateArgs {
    fn into_config(self) -> Result<GenerateConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(GenerateConfig::from(merged))
    }
}

/// Which generator to run and with what parameters.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Layout {
    Uniform(UniformSpec),
    Clustered(ClusteredSpec),
}

/// Resolved `generate` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GenerateConfig {
    pub(crate) layout: Layout,
    pub(crate) output: Option<Utf8PathBuf>,
}

impl From<GenerateArgs> for GenerateConfig {
    fn from(args: GenerateArgs) -> Self {
        let layout = args.clusters.map_or_else(
            || Layout::Uniform(uniform_spec(&args)),
            |clusters| Layout::Clustered(clustered_spec(&args, clusters)),
        );
        Self {
            layout,
            output: args.output,
        }
    }
}

fn uniform_spec(args: &GenerateArgs) -> UniformSpec {
    let defaults = UniformSpec::default();
    UniformSpec {
        customers: args.customers.unwrap_or(defaults.customers),
        vehicle_capacity: args.capacity.unwrap_or(defaults.vehicle_capacity),
        seed: args.seed.unwrap_or(defaults.seed),
        ..defaults
    }
}

fn clustered_spec(args: &GenerateArgs, clusters: usize) -> ClusteredSpec {
    let defaults = ClusteredSpec::default();
    ClusteredSpec {
        customers: args.customers.unwrap_or(defaults.customers),
        clusters,
        vehicle_capacity: args.capacity.unwrap_or(defaults.vehicle_capacity),
        seed: args.seed.unwrap_or(defaults.seed),
        ..defaults
    }
}

impl GenerateConfig {
    pub(crate) fn build_request(&self) -> Result<SolveRequest, CliError> {
        let instance = match &self.layout {
            Layout::Uniform(spec) => synthetic::uniform(spec)?,
            Layout::Clustered(spec) => synthetic::clustered(spec)?,
        };
        Ok(SolveRequest {
            instance,
            config: OptimizationConfig::default(),
        })
    }
}

pub(crate) fn run_generate(args: GenerateArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    run_generate_with(&config, writer)
}

pub(crate) fn run_generate_with(
    config: &GenerateConfig,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let request = config.build_request()?;
    log::info!(
        "generated {} customers, total demand {}",
        request.instance.customer_count(),
        request.instance.total_demand()
    );
    let Some(path) = &config.output else {
        return write_pretty(writer, &request);
    };
    let mut file = create_utf8_file(path).map_err(|source| CliError::CreateOutput {
        path: path.clone(),
        source,
    })?;
    write_pretty(&mut file, &request)
}
