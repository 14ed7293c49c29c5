//! Decides whether a mock shot render succeeds.

use async_trait::async_trait;
use rand::Rng;
use vidu_core::storyboard::{SHOT_FAILURE_DETAIL, SHOT_FAILURE_MESSAGE};
use vidu_core::types::DbId;

/// Default probability of a simulated render failure.
pub const DEFAULT_FAILURE_RATE: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShotOutcome {
    Success,
    Failure { message: String, detail: String },
}

impl ShotOutcome {
    /// The canned render-node failure.
    pub fn render_failure() -> Self {
        Self::Failure {
            message: SHOT_FAILURE_MESSAGE.to_string(),
            detail: SHOT_FAILURE_DETAIL.to_string(),
        }
    }
}

/// Source of shot render results.
#[async_trait]
pub trait OutcomeProvider: Send + Sync {
    async fn shot_outcome(&self, shot_id: DbId) -> ShotOutcome;
}

/// Fails each render independently with probability `failure_rate`.
#[derive(Debug, Clone)]
pub struct SimulatedOutcome {
    failure_rate: f64,
}

impl SimulatedOutcome {
    /// `failure_rate` is clamped to `0.0..=1.0`; NaN counts as zero.
    pub fn new(failure_rate: f64) -> Self {
        let failure_rate = if failure_rate.is_nan() {
            0.0
        } else {
            failure_rate.clamp(0.0, 1.0)
        };
        Self { failure_rate }
    }

    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }
}

impl Default for SimulatedOutcome {
    fn default() -> Self {
        Self::new(DEFAULT_FAILURE_RATE)
    }
}

#[async_trait]
impl OutcomeProvider for SimulatedOutcome {
    async fn shot_outcome(&self, shot_id: DbId) -> ShotOutcome {
        if rand::rng().random_bool(self.failure_rate) {
            tracing::debug!(shot_id, "Simulated render failure");
            ShotOutcome::render_failure()
        } else {
            ShotOutcome::Success
        }
    }
}

/// Always returns the same outcome.
#[derive(Debug, Clone)]
pub struct FixedOutcome(pub ShotOutcome);

impl FixedOutcome {
    pub fn success() -> Self {
        Self(ShotOutcome::Success)
    }

    pub fn failure() -> Self {
        Self(ShotOutcome::render_failure())
    }
}

#[async_trait]
impl OutcomeProvider for FixedOutcome {
    async fn shot_outcome(&self, _shot_id: DbId) -> ShotOutcome {
        self.0.clone()
    }
}
