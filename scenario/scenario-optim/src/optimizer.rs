//! Pose optimizer port and the external-process implementation.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

use scenario_types::{OptimizerParams, Pose};
use tracing::{debug, info};

use crate::error::{OptimError, Result};
use crate::protocol::{decode_response, encode_request, expand_escapes, OptimizationRequest};

/// Produces candidate poses for the manipulated object.
///
/// Calls are serialized through `&mut self`: a second request never starts
/// before the previous result has been returned.
pub trait PoseOptimizer {
    /// Return a batch of candidate poses for `request`.
    fn optimise(&mut self, request: &OptimizationRequest) -> Result<Vec<Pose>>;
}

impl<F> PoseOptimizer for F
where
    F: FnMut(&OptimizationRequest) -> Result<Vec<Pose>>,
{
    fn optimise(&mut self, request: &OptimizationRequest) -> Result<Vec<Pose>> {
        self(request)
    }
}

/// Runs an external optimizer script through request/response files.
///
/// Each call writes the request and hyperparameter files, runs the script to
/// completion and reads the response file. There is no timeout.
#[derive(Debug, Clone)]
pub struct ScriptOptimizer {
    params: OptimizerParams,
    calls: usize,
}

impl ScriptOptimizer {
    /// Create an optimizer bridge.
    #[must_use]
    pub const fn new(params: OptimizerParams) -> Self {
        Self { params, calls: 0 }
    }

    /// The configured files and command.
    #[must_use]
    pub const fn params(&self) -> &OptimizerParams {
        &self.params
    }

    /// Number of completed optimizer runs.
    #[must_use]
    pub const fn calls(&self) -> usize {
        self.calls
    }

    fn command(&self) -> Command {
        match &self.params.interpreter {
            Some(interpreter) => {
                let mut cmd = Command::new(interpreter);
                cmd.arg(&self.params.script);
                cmd
            }
            None => Command::new(&self.params.script),
        }
    }

    fn run(&self) -> Result<()> {
        let status = self
            .command()
            .status()
            .map_err(|e| OptimError::process_failed(format!("{}: {e}", self.params.script.display())))?;
        if status.success() {
            Ok(())
        } else {
            Err(OptimError::process_failed(format!(
                "{} exited with {status}",
                self.params.script.display()
            )))
        }
    }
}

impl PoseOptimizer for ScriptOptimizer {
    fn optimise(&mut self, request: &OptimizationRequest) -> Result<Vec<Pose>> {
        let params = &self.params;
        write_file(&params.request_file, &encode_request(request))?;
        write_file(&params.keys_file, &expand_escapes(&params.hyperparameters))?;
        remove_stale(&params.response_file)?;

        debug!(
            script = %params.script.display(),
            objects = request.object_count(),
            "Running pose optimizer"
        );
        self.run()?;

        let text = fs::read_to_string(&self.params.response_file)
            .map_err(|e| OptimError::io(&self.params.response_file, &e))?;
        let poses = decode_response(&text)?;
        if poses.is_empty() {
            return Err(OptimError::EmptyResponse);
        }
        self.calls += 1;

        info!(candidates = poses.len(), call = self.calls, "Optimizer returned poses");
        Ok(poses)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| OptimError::io(path, &e))
}

// A response left over from an earlier run must not be read as this run's.
fn remove_stale(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(OptimError::io(path, &e)),
        _ => Ok(()),
    }
}
