//! Test-only generator doubles that never spawn processes.

use std::sync::Mutex;

use crate::core::collector::GenFailure;
use crate::io::generator::{GenRequest, Generator};

/// Generator that replays a fixed script of outcomes, then keeps returning
/// the final entry (or `EmptyResponse` when the script is empty).
pub struct ScriptedGenerator {
    script: Mutex<Vec<Result<String, GenFailure>>>,
    fallback: Result<String, GenFailure>,
}

impl ScriptedGenerator {
    pub fn new(script: Vec<Result<String, GenFailure>>) -> Self {
        let fallback = script
            .last()
            .cloned()
            .unwrap_or(Err(GenFailure::EmptyResponse));
        Self {
            script: Mutex::new(script),
            fallback,
        }
    }

    /// Generator that returns the same outcome on every attempt.
    pub fn always(outcome: Result<String, GenFailure>) -> Self {
        Self {
            script: Mutex::new(Vec::new()),
            fallback: outcome,
        }
    }
}

impl Generator for ScriptedGenerator {
    fn generate(&self, _request: &GenRequest) -> Result<String, GenFailure> {
        let mut script = self.script.lock().expect("script lock");
        if script.is_empty() {
            self.fallback.clone()
        } else {
            script.remove(0)
        }
    }
}

/// Generator producing a unique valid candidate per call and recording every
/// request it receives.
pub struct CountingGenerator {
    prefix: String,
    calls: Mutex<u32>,
    requests: Mutex<Vec<GenRequest>>,
}

impl CountingGenerator {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            calls: Mutex::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// All requests seen so far, in call order.
    pub fn requests(&self) -> Vec<GenRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl Generator for CountingGenerator {
    fn generate(&self, request: &GenRequest) -> Result<String, GenFailure> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        let mut calls = self.calls.lock().expect("calls lock");
        *calls += 1;
        Ok(format!("{} {}", self.prefix, *calls))
    }
}
