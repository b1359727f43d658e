//! Test helpers for writing request files into a scratch directory.

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use packroute_core::OptimizationConfig;
use packroute_core::test_support::five_customer_instance;
use tempfile::TempDir;

use crate::SolveRequest;

#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root =
            Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn write_request(&self, name: &str, request: &SolveRequest) -> Utf8PathBuf {
        let payload = serde_json::to_vec(request).expect("request serializes");
        self.write_raw(name, &payload)
    }

    pub(super) fn write_raw(&self, name: &str, payload: &[u8]) -> Utf8PathBuf {
        let path = self.path(name);
        fs::write(&path, payload).expect("write request file");
        path
    }
}

/// The five-customer fixture with a small, fast search configuration.
pub(super) fn small_request() -> SolveRequest {
    SolveRequest {
        instance: five_customer_instance().expect("fixture instance is valid"),
        config: OptimizationConfig::default()
            .with_population_size(8)
            .with_max_iterations(15),
    }
}

/// Parse every line of `output` as JSON.
pub(super) fn json_lines(output: &[u8]) -> Vec<serde_json::Value> {
    std::str::from_utf8(output)
        .expect("utf-8 output")
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line is JSON"))
        .collect()
}

/// A writer that rejects every write.
pub(super) struct BrokenPipe;

impl io::Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
