//! Generator abstraction for fact acquisition.
//!
//! The [`Generator`] trait decouples the run loop from the actual LLM backend
//! (by default `ollama run <model>`). Tests use scripted generators that
//! return predetermined candidates without spawning processes.

use std::process::Command;
use std::time::Duration;

use tracing::{debug, warn};

use crate::core::clean::clean_fact;
use crate::core::collector::GenFailure;
use crate::io::process::run_with_deadline;
use crate::io::prompt::PromptBuilder;

/// Parameters for one generation attempt.
#[derive(Debug, Clone)]
pub struct GenRequest {
    /// Subject of the run.
    pub keyword: String,
    /// Already-accepted fact texts, oldest first, for prompting the model to
    /// avoid repeats. Uniqueness is still enforced by the collector.
    pub exclusions: Vec<String>,
    /// Target character range communicated to the model.
    pub min_length: usize,
    pub max_length: usize,
    /// Hard deadline for the backend process.
    pub timeout: Duration,
}

/// One blocking backend invocation per call; no retry inside the generator.
pub trait Generator {
    /// Produce one cleaned candidate fact, or a typed per-attempt failure.
    fn generate(&self, request: &GenRequest) -> Result<String, GenFailure>;
}

/// Generator that spawns a local model CLI (`ollama run <model>` by default)
/// and feeds the prompt on stdin.
pub struct SubprocessGenerator {
    command: Vec<String>,
    model: String,
    capture_limit_bytes: usize,
    prompts: PromptBuilder,
}

impl SubprocessGenerator {
    /// `command` must be non-empty; [`crate::io::config::RunConfig::validate`]
    /// enforces this before a generator is ever built.
    pub fn new(command: Vec<String>, model: String, capture_limit_bytes: usize) -> Self {
        debug_assert!(!command.is_empty());
        Self {
            command,
            model,
            capture_limit_bytes,
            prompts: PromptBuilder::new(),
        }
    }
}

impl Generator for SubprocessGenerator {
    fn generate(&self, request: &GenRequest) -> Result<String, GenFailure> {
        let prompt = self
            .prompts
            .render(
                &request.keyword,
                &request.exclusions,
                request.min_length,
                request.max_length,
            )
            .map_err(|err| GenFailure::Process(format!("render prompt: {err:#}")))?;

        let mut cmd = Command::new(&self.command[0]);
        cmd.args(&self.command[1..]).arg(&self.model);

        let output = run_with_deadline(
            cmd,
            prompt.as_bytes(),
            request.timeout,
            self.capture_limit_bytes,
        )
        .map_err(|err| GenFailure::Process(format!("{err:#}")))?;

        if output.timed_out {
            warn!(timeout_secs = request.timeout.as_secs(), "generation attempt timed out");
            return Err(GenFailure::Timeout);
        }
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(exit_code = ?output.status.code(), "backend exited non-zero");
            return Err(GenFailure::Process(format!(
                "exit status {:?}: {}",
                output.status.code(),
                stderr.trim()
            )));
        }

        let raw = String::from_utf8_lossy(&output.stdout);
        let cleaned = clean_fact(&raw);
        if cleaned.is_empty() {
            return Err(GenFailure::EmptyResponse);
        }
        debug!(chars = cleaned.chars().count(), "cleaned candidate");
        Ok(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenRequest {
        GenRequest {
            keyword: "venus".to_string(),
            exclusions: Vec::new(),
            min_length: 5,
            max_length: 200,
            timeout: Duration::from_secs(5),
        }
    }

    fn shell_generator(script: &str) -> SubprocessGenerator {
        SubprocessGenerator::new(
            vec!["sh".to_string(), "-c".to_string(), script.to_string()],
            "model".to_string(),
            10_000,
        )
    }

    #[test]
    fn returns_cleaned_first_line_of_stdout() {
        // The stub must drain stdin before exiting, like a real backend would.
        let generator =
            shell_generator("cat > /dev/null; printf '1. \"Venus spins backwards.\"\\nextra\\n'");
        let fact = generator.generate(&request()).expect("generate");
        assert_eq!(fact, "Venus spins backwards.");
    }

    #[test]
    fn non_zero_exit_is_a_process_failure() {
        let generator = shell_generator("cat > /dev/null; echo oops >&2; exit 2");
        let err = generator.generate(&request()).unwrap_err();
        match err {
            GenFailure::Process(message) => assert!(message.contains("oops")),
            other => panic!("expected process failure, got {other:?}"),
        }
    }

    #[test]
    fn blank_output_is_an_empty_response() {
        let generator = shell_generator("cat > /dev/null; printf '  \\n\\n'");
        assert_eq!(
            generator.generate(&request()).unwrap_err(),
            GenFailure::EmptyResponse
        );
    }

    #[test]
    fn deadline_overrun_is_a_timeout() {
        let mut req = request();
        req.timeout = Duration::from_millis(100);
        let generator = shell_generator("sleep 30");
        assert_eq!(generator.generate(&req).unwrap_err(), GenFailure::Timeout);
    }

    #[test]
    fn missing_backend_binary_is_a_process_failure() {
        let generator = SubprocessGenerator::new(
            vec!["definitely-not-ollama-5b1c".to_string(), "run".to_string()],
            "model".to_string(),
            10_000,
        );
        assert!(matches!(
            generator.generate(&request()).unwrap_err(),
            GenFailure::Process(_)
        ));
    }
}
