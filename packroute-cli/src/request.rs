//! The JSON request file shared by `solve`, `stream` and `generate`.

use std::io::{BufReader, Write};

use camino::Utf8Path;
use packroute_core::{Instance, OptimizationConfig};
use serde::{Deserialize, Serialize};

use crate::CliError;
use crate::fs::open_utf8_file;

/// An instance plus the search parameters to run it with.
///
/// `config` may be omitted; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveRequest {
    /// The routing problem.
    pub instance: Instance,
    /// Search parameters.
    #[serde(default)]
    pub config: OptimizationConfig,
}

/// Search parameters supplied on the command line, env or config files.
///
/// Each present field replaces the value read from the request file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RunOverrides {
    pub(crate) population_size: Option<u32>,
    pub(crate) max_iterations: Option<u32>,
    pub(crate) seed: Option<u64>,
    pub(crate) report_every: Option<u32>,
}

impl RunOverrides {
    pub(crate) const fn apply(self, base: OptimizationConfig) -> OptimizationConfig {
        let mut config = base;
        if let Some(population_size) = self.population_size {
            config = config.with_population_size(population_size);
        }
        if let Some(max_iterations) = self.max_iterations {
            config = config.with_max_iterations(max_iterations);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(report_every) = self.report_every {
            config = config.with_report_every(report_every);
        }
        config
    }
}

/// Loads a JSON-encoded [`SolveRequest`] from disk.
///
/// Instance validation runs during decoding, so malformed instances surface
/// as [`CliError::ParseRequest`].
pub(crate) fn load_request(path: &Utf8Path) -> Result<SolveRequest, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenRequest {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseRequest {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `value` as pretty JSON followed by a newline.
pub(crate) fn write_pretty<T>(writer: &mut dyn Write, value: &T) -> Result<(), CliError>
where
    T: Serialize + ?Sized,
{
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
