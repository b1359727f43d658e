//! Command-line interface for running packroute searches.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod fs;
mod generate;
mod request;
mod solve;
mod stream;

pub use error::CliError;
pub use request::SolveRequest;

use generate::GenerateArgs;
use solve::SolveArgs;
use stream::StreamArgs;

pub(crate) const ARG_REQUEST: &str = "request";
pub(crate) const ARG_POPULATION_SIZE: &str = "population-size";
pub(crate) const ARG_MAX_ITERATIONS: &str = "max-iterations";
pub(crate) const ARG_SEED: &str = "seed";
pub(crate) const ARG_REPORT_EVERY: &str = "report-every";
pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";
pub(crate) const ARG_CUSTOMERS: &str = "customers";
pub(crate) const ARG_CLUSTERS: &str = "clusters";
pub(crate) const ARG_CAPACITY: &str = "capacity";
pub(crate) const ARG_OUTPUT: &str = "output";
pub(crate) const ENV_SOLVE_REQUEST: &str = "PACKROUTE_CMDS_SOLVE_REQUEST_PATH";
pub(crate) const ENV_STREAM_REQUEST: &str = "PACKROUTE_CMDS_STREAM_REQUEST_PATH";

/// Run the packroute CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments, configuration, the request file or
/// the optimization itself fail.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Solve(args) => solve::run_solve(args, &mut stdout),
        Command::Stream(args) => stream::run_stream(args, &mut stdout),
        Command::Generate(args) => generate::run_generate(args, &mut stdout),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "packroute",
    about = "Grey Wolf Optimizer for capacitated vehicle routing",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Optimize a request and print the final result.
    Solve(SolveArgs),
    /// Optimize a request, printing progress as JSON lines.
    Stream(StreamArgs),
    /// Write a synthetic request file.
    Generate(GenerateArgs),
}

#[cfg(test)]
mod tests;
