use std::fmt;
use std::time::Duration;

use crate::game::extractor::Extraction;

/// Result of one prompt → completion → extraction round
#[derive(Debug)]
pub enum AttemptOutcome {
    Accepted(Extraction),
    Retryable(RetryReason),
    Fatal(FatalReason),
}

/// Model-side failures that cost one attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryReason {
    Timeout(Duration),
    ServiceError(String),
    NoLegalMove(String),
}

impl fmt::Display for RetryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryReason::Timeout(limit) => write!(f, "no reply within {:?}", limit),
            RetryReason::ServiceError(err) => write!(f, "completion failed: {}", err),
            RetryReason::NoLegalMove(reply) => write!(f, "no legal move in reply {:?}", reply),
        }
    }
}

/// Failures no amount of retrying fixes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FatalReason {
    Misconfigured(String),
}

impl fmt::Display for FatalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FatalReason::Misconfigured(err) => write!(f, "{}", err),
        }
    }
}

/// Consecutive rejected model replies since the last accepted move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureCounter {
    count: u32,
    max: u32,
}

impl FailureCounter {
    pub fn new(max: u32) -> Self {
        FailureCounter { count: 0, max }
    }

    pub fn get(&self) -> u32 {
        self.count
    }

    /// Count one more failure, never past the ceiling
    pub fn increment(&mut self) {
        self.count = (self.count + 1).min(self.max);
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}
