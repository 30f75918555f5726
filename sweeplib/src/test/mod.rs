mod invocation;
mod parsing;

use std::collections::HashMap;
use crate::config::ConfigurationPoint;
use crate::error::InvocationFailure;
use crate::invoker::Invoke;
use crate::util::{format_report, synthetic_record};

/// Stands in for the simulator. Points listed in `failing` exit with status 1, points in
/// `garbled` print something that isn't a report, everything else prints a synthetic report
#[derive(Default)]
pub struct ScriptedSimulator {
    pub failing: Vec<ConfigurationPoint>,
    pub garbled: HashMap<ConfigurationPoint, String>,
    pub calls: Vec<ConfigurationPoint>,
}

impl Invoke for ScriptedSimulator {
    fn invoke(&mut self, point: &ConfigurationPoint) -> Result<String, InvocationFailure> {
        self.calls.push(*point);
        if self.failing.contains(point) {
            return Err(InvocationFailure::Exit { status: Some(1), stderr: String::from("pin: bad cache geometry") });
        }
        if let Some(text) = self.garbled.get(point) {
            return Ok(text.clone());
        }
        Ok(format_report(&synthetic_record(point)))
    }
}

pub fn point(cache_size_kb: u32, block_size_b: u32, associativity: u32) -> ConfigurationPoint {
    ConfigurationPoint { cache_size_kb, block_size_b, associativity }
}
