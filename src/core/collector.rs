//! Acceptance filtering and loop bookkeeping for a fact-collection run.
//!
//! The collector is pure state: it never performs I/O. The run loop feeds it
//! one generator outcome per attempt via [`Collector::offer`] and consults
//! [`Collector::stop_reason`] at the loop boundary.

use std::fmt;

use crate::core::fact::{AcceptedSet, Fact};

/// Generator-level failure for a single attempt.
///
/// All variants are recovered locally by skipping the attempt; only repeated
/// consecutive failures end the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenFailure {
    /// The backend process exceeded the per-attempt deadline and was killed.
    Timeout,
    /// The backend could not be spawned or exited non-zero.
    Process(String),
    /// The backend produced nothing usable after cleaning.
    EmptyResponse,
}

impl fmt::Display for GenFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenFailure::Timeout => write!(f, "backend timed out"),
            GenFailure::Process(message) => write!(f, "backend process failed: {message}"),
            GenFailure::EmptyResponse => write!(f, "backend returned no usable text"),
        }
    }
}

impl std::error::Error for GenFailure {}

/// Why a candidate was rejected by the acceptance filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    TooShort { length: usize, min: usize },
    TooLong { length: usize, max: usize },
    Duplicate,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::TooShort { length, min } => {
                write!(f, "too short ({length} chars, minimum {min})")
            }
            RejectReason::TooLong { length, max } => {
                write!(f, "too long ({length} chars, maximum {max})")
            }
            RejectReason::Duplicate => write!(f, "duplicate of an accepted fact"),
        }
    }
}

/// Result of offering one attempt to the collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Candidate passed every filter and was appended to the accepted set.
    Accepted { sequence_number: u32 },
    /// Candidate was generated but failed a filter.
    Rejected(RejectReason),
    /// The generator itself failed; no candidate to filter.
    Failed(GenFailure),
}

/// Why the run loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The accepted set reached the target count.
    TargetReached,
    /// The attempt budget ran out before the target was reached.
    AttemptsExhausted { attempts: u32, max_attempts: u32 },
    /// Too many consecutive generator failures; the backend is treated as down.
    BackendUnavailable { consecutive_failures: u32 },
    /// The user interrupted the run; partial results are still exported.
    Interrupted,
}

impl StopReason {
    pub fn describe(&self) -> String {
        match self {
            StopReason::TargetReached => "target reached".to_string(),
            StopReason::AttemptsExhausted {
                attempts,
                max_attempts,
            } => format!("attempt budget exhausted ({attempts}/{max_attempts})"),
            StopReason::BackendUnavailable {
                consecutive_failures,
            } => format!("backend unavailable after {consecutive_failures} consecutive failures"),
            StopReason::Interrupted => "interrupted".to_string(),
        }
    }
}

/// Numeric bounds governing acceptance and termination.
#[derive(Debug, Clone, Copy)]
pub struct CollectorLimits {
    pub target_count: u32,
    pub min_length: usize,
    pub max_length: usize,
    pub max_attempts: u32,
    pub max_consecutive_failures: u32,
}

/// Drives acceptance of candidates until a stop reason emerges.
#[derive(Debug)]
pub struct Collector {
    keyword: String,
    limits: CollectorLimits,
    accepted: AcceptedSet,
    attempts: u32,
    failures: u32,
    consecutive_failures: u32,
}

impl Collector {
    pub fn new(keyword: &str, limits: CollectorLimits) -> Self {
        Self {
            keyword: keyword.to_string(),
            limits,
            accepted: AcceptedSet::new(),
            attempts: 0,
            failures: 0,
            consecutive_failures: 0,
        }
    }

    /// Apply the acceptance filters to one attempt's outcome, in order:
    /// generator failure, length bounds, duplicate check, then acceptance.
    pub fn offer(&mut self, candidate: Result<String, GenFailure>) -> AttemptOutcome {
        self.attempts += 1;
        let text = match candidate {
            Ok(text) => text,
            Err(failure) => {
                self.failures += 1;
                self.consecutive_failures += 1;
                return AttemptOutcome::Failed(failure);
            }
        };
        // Any attempt that produced text counts as the backend being alive.
        self.consecutive_failures = 0;

        let length = text.chars().count();
        if length < self.limits.min_length {
            return AttemptOutcome::Rejected(RejectReason::TooShort {
                length,
                min: self.limits.min_length,
            });
        }
        if length > self.limits.max_length {
            return AttemptOutcome::Rejected(RejectReason::TooLong {
                length,
                max: self.limits.max_length,
            });
        }
        if self.accepted.contains(&text) {
            return AttemptOutcome::Rejected(RejectReason::Duplicate);
        }

        let fact = self.accepted.accept(text, &self.keyword);
        AttemptOutcome::Accepted {
            sequence_number: fact.sequence_number,
        }
    }

    /// Terminal condition check, intended for the loop boundary before each
    /// attempt. Returns `None` while the run should continue.
    pub fn stop_reason(&self) -> Option<StopReason> {
        if self.accepted.len() as u32 >= self.limits.target_count {
            return Some(StopReason::TargetReached);
        }
        if self.consecutive_failures >= self.limits.max_consecutive_failures {
            return Some(StopReason::BackendUnavailable {
                consecutive_failures: self.consecutive_failures,
            });
        }
        if self.attempts >= self.limits.max_attempts {
            return Some(StopReason::AttemptsExhausted {
                attempts: self.attempts,
                max_attempts: self.limits.max_attempts,
            });
        }
        None
    }

    pub fn accepted(&self) -> &AcceptedSet {
        &self.accepted
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn target_count(&self) -> u32 {
        self.limits.target_count
    }

    pub fn into_facts(self) -> Vec<Fact> {
        self.accepted.into_facts()
    }
}
