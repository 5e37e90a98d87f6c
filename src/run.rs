//! Orchestration of the fact-acquisition loop.
//!
//! Drives the [`Generator`] and [`Collector`] until a stop reason emerges,
//! reporting each attempt through a callback. Export is the caller's job and
//! happens exactly once regardless of how the loop ended.

use std::time::Duration;

use tracing::{debug, info};

use crate::core::collector::{AttemptOutcome, Collector, StopReason};
use crate::core::fact::Fact;
use crate::io::config::RunConfig;
use crate::io::generator::{GenRequest, Generator};
use crate::io::interrupt::InterruptFlag;
use crate::io::prompt::MAX_PROMPT_EXCLUSIONS;

/// Progress report for one attempt, passed to the `on_attempt` callback.
#[derive(Debug, Clone)]
pub struct AttemptReport {
    /// 1-based attempt counter (accepted + rejected + failed).
    pub attempt: u32,
    pub outcome: AttemptOutcome,
    /// Candidate text for accepted attempts.
    pub text: Option<String>,
    pub accepted_so_far: u32,
    pub target_count: u32,
}

/// Final result of a collection run.
#[derive(Debug)]
pub struct RunOutcome {
    pub stop: StopReason,
    pub attempts: u32,
    pub failures: u32,
    pub facts: Vec<Fact>,
}

impl RunOutcome {
    pub fn accepted_count(&self) -> usize {
        self.facts.len()
    }
}

/// Run the acquisition loop to completion.
///
/// The interrupt flag is polled once per iteration at the loop boundary;
/// a raised flag ends the run with [`StopReason::Interrupted`] and the
/// accumulated facts intact. Reaching the target between attempts takes
/// precedence over an interrupt delivered at the same moment.
pub fn run_collection<G: Generator, F: FnMut(&AttemptReport)>(
    config: &RunConfig,
    keyword: &str,
    generator: &G,
    interrupt: &InterruptFlag,
    mut on_attempt: F,
) -> RunOutcome {
    let mut collector = Collector::new(keyword, config.limits());
    info!(
        keyword,
        target = config.target_count,
        model = %config.model,
        "starting fact collection"
    );

    let stop = loop {
        if let Some(reason) = collector.stop_reason() {
            break reason;
        }
        if interrupt.is_raised() {
            break StopReason::Interrupted;
        }

        let request = GenRequest {
            keyword: keyword.to_string(),
            exclusions: collector.accepted().recent_texts(MAX_PROMPT_EXCLUSIONS),
            min_length: config.min_length,
            max_length: config.max_length,
            timeout: Duration::from_secs(config.timeout_secs),
        };
        let candidate = generator.generate(&request);
        let candidate_text = candidate.as_ref().ok().cloned();

        let outcome = collector.offer(candidate);
        debug!(attempt = collector.attempts(), ?outcome, "attempt finished");
        let text = match &outcome {
            AttemptOutcome::Accepted { .. } => candidate_text,
            _ => None,
        };
        on_attempt(&AttemptReport {
            attempt: collector.attempts(),
            outcome,
            text,
            accepted_so_far: collector.accepted().len() as u32,
            target_count: collector.target_count(),
        });
    };

    info!(
        stop = %stop.describe(),
        accepted = collector.accepted().len(),
        attempts = collector.attempts(),
        "collection finished"
    );
    RunOutcome {
        stop,
        attempts: collector.attempts(),
        failures: collector.failures(),
        facts: collector.into_facts(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::collector::GenFailure;
    use crate::test_support::{CountingGenerator, ScriptedGenerator};

    fn config(target: u32) -> RunConfig {
        RunConfig {
            target_count: target,
            min_length: 5,
            max_length: 100,
            max_attempts: 50,
            max_consecutive_failures: 3,
            ..RunConfig::default()
        }
    }

    #[test]
    fn reaches_target_with_exactly_target_attempts() {
        let generator = CountingGenerator::new("unique fact number");
        let outcome = run_collection(
            &config(5),
            "venus",
            &generator,
            &InterruptFlag::new(),
            |_| {},
        );

        assert_eq!(outcome.stop, StopReason::TargetReached);
        assert_eq!(outcome.attempts, 5);
        assert_eq!(outcome.accepted_count(), 5);
        let numbers: Vec<u32> = outcome.facts.iter().map(|f| f.sequence_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn persistent_failures_stop_with_backend_unavailable() {
        let generator = ScriptedGenerator::always(Err(GenFailure::Timeout));
        let outcome = run_collection(
            &config(5),
            "venus",
            &generator,
            &InterruptFlag::new(),
            |_| {},
        );

        assert_eq!(
            outcome.stop,
            StopReason::BackendUnavailable {
                consecutive_failures: 3
            }
        );
        assert!(outcome.facts.is_empty());
        assert_eq!(outcome.failures, 3);
    }

    #[test]
    fn interrupt_preserves_accepted_facts() {
        let generator = CountingGenerator::new("unique fact number");
        let interrupt = InterruptFlag::new();
        let trigger = interrupt.clone();
        let outcome = run_collection(&config(50), "venus", &generator, &interrupt, |report| {
            if report.accepted_so_far == 3 {
                trigger.raise();
            }
        });

        assert_eq!(outcome.stop, StopReason::Interrupted);
        assert_eq!(outcome.accepted_count(), 3);
    }

    #[test]
    fn exclusions_are_fed_back_to_the_generator() {
        let generator = CountingGenerator::new("unique fact number");
        run_collection(&config(3), "venus", &generator, &InterruptFlag::new(), |_| {});

        let requests = generator.requests();
        assert!(requests[0].exclusions.is_empty());
        assert_eq!(requests[2].exclusions.len(), 2);
    }
}
