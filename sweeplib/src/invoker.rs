use std::process::Command;
use tracing::debug;
use crate::config::{ConfigurationPoint, SimulatorConfig};
use crate::error::InvocationFailure;

/// Something that can run the simulator for one configuration point
///
/// Implementations hand back the raw report text without interpreting it. Wrappers adding a
/// timeout or cancellation implement this trait around another invoker
pub trait Invoke {
    /// Runs the simulator once, blocking until it finishes
    ///
    /// # Arguments
    ///
    /// * `point`: The cache configuration to simulate
    ///
    /// returns: Result<String, InvocationFailure>, the combined output with standard error first
    fn invoke(&mut self, point: &ConfigurationPoint) -> Result<String, InvocationFailure>;
}

/// Runs the simulator as a child process
pub struct ExternalSimulator {
    config: SimulatorConfig,
}

impl ExternalSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// The arguments passed to the simulator program for a point, excluding the program itself
    pub fn command_line(&self, point: &ConfigurationPoint) -> Vec<String> {
        let mut args = self.config.tool_args.clone();
        args.extend([
            self.config.cache_size_flag.clone(),
            point.cache_size_kb.to_string(),
            self.config.block_size_flag.clone(),
            point.block_size_b.to_string(),
            self.config.associativity_flag.clone(),
            point.associativity.to_string(),
        ]);
        if !self.config.workload.is_empty() {
            args.push(String::from("--"));
            args.extend(self.config.workload.iter().cloned());
        }
        args
    }
}

impl Invoke for ExternalSimulator {
    fn invoke(&mut self, point: &ConfigurationPoint) -> Result<String, InvocationFailure> {
        let args = self.command_line(point);
        debug!(program = %self.config.program, ?args, "launching simulator");
        let output = Command::new(&self.config.program)
            .args(&args)
            .output()
            .map_err(|source| InvocationFailure::Spawn { program: self.config.program.clone(), source })?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(InvocationFailure::Exit { status: output.status.code(), stderr: stderr.into_owned() });
        }
        // Statistics are printed on stderr, but keep stdout too in case the tool routes them there
        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!(stderr_bytes = output.stderr.len(), stdout_bytes = output.stdout.len(), "simulator finished");
        Ok(format!("{stderr}{stdout}"))
    }
}
