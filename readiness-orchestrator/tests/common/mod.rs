// Shared fixtures for orchestrator integration tests.
#![allow(dead_code)]

use readiness_common::InstanceStatusSnapshot;
use readiness_orchestrator::poller::ReadinessPoller;
use readiness_orchestrator::settings::PollerSettings;
use readiness_providers::mock::{MockProvider, MockRound};
use std::sync::Arc;
use std::time::Duration;

pub fn ids(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

pub fn healthy(id: &str) -> InstanceStatusSnapshot {
    InstanceStatusSnapshot::healthy(id)
}

pub fn booting(id: &str) -> InstanceStatusSnapshot {
    InstanceStatusSnapshot::new(id, "pending", "initializing", "initializing")
}

pub fn round(snapshots: Vec<InstanceStatusSnapshot>) -> MockRound {
    MockRound::Statuses(snapshots)
}

/// Poller over `provider` with the default 60 x 10 s settings.
pub fn default_poller(provider: Arc<MockProvider>) -> ReadinessPoller {
    ReadinessPoller::new(provider, PollerSettings::default())
}

pub fn poller(provider: Arc<MockProvider>, max_attempts: u32, poll_interval: Duration) -> ReadinessPoller {
    ReadinessPoller::new(
        provider,
        PollerSettings {
            max_attempts,
            poll_interval,
        },
    )
}

/// Virtual-time check: `elapsed` equals `expected` up to timer granularity.
pub fn assert_waited(elapsed: Duration, expected: Duration) {
    assert!(
        elapsed >= expected && elapsed < expected + Duration::from_millis(50),
        "expected ~{:?} of waiting, got {:?}",
        expected,
        elapsed
    );
}
