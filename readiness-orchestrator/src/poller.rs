// ============================================================================
// READINESS POLL LOOP
// ============================================================================

use std::sync::Arc;
use std::time::Instant;

use readiness_common::pending_instances;
use readiness_providers::CloudProvider;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::WaitError;
use crate::settings::PollerSettings;

/// Successful end of a wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOutcome {
    /// Status queries issued. Zero when there was nothing to wait for.
    pub rounds: u32,
}

/// Waits until every instance in a set is running with both status checks `ok`.
pub struct ReadinessPoller {
    provider: Arc<dyn CloudProvider>,
    settings: PollerSettings,
}

impl ReadinessPoller {
    pub fn new(provider: Arc<dyn CloudProvider>, settings: PollerSettings) -> Self {
        Self { provider, settings }
    }

    pub fn settings(&self) -> &PollerSettings {
        &self.settings
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Polls until ready, the attempt ceiling, or a provider error. Not cancellable.
    pub async fn await_ready(&self, instance_ids: &[String]) -> Result<PollOutcome, WaitError> {
        self.await_ready_until_cancelled(instance_ids, &CancellationToken::new())
            .await
    }

    /// Same loop; a cancelled `cancel` interrupts the wait between rounds.
    ///
    /// Each round issues one batched status query. The round passes when every
    /// returned instance is ready; otherwise the loop sleeps `poll_interval`
    /// and tries again, up to `max_attempts` rounds. There is no wait after
    /// the last round, so the worst case is `(max_attempts - 1) * poll_interval`
    /// (590 s with defaults) rather than the original Lambda's 600 s, which
    /// slept once more before raising its timeout.
    pub async fn await_ready_until_cancelled(
        &self,
        instance_ids: &[String],
        cancel: &CancellationToken,
    ) -> Result<PollOutcome, WaitError> {
        if instance_ids.is_empty() {
            info!("✅ No instances to wait for");
            return Ok(PollOutcome { rounds: 0 });
        }

        let max_attempts = self.settings.max_attempts;
        let started = Instant::now();
        let mut attempt: u32 = 0;
        let mut pending = Vec::new();

        while attempt < max_attempts {
            let round = attempt + 1;
            let snapshots = self
                .provider
                .describe_instance_status(instance_ids)
                .await
                .map_err(|source| {
                    warn!(
                        "❌ Status query failed on round {}/{}: {:#}",
                        round, max_attempts, source
                    );
                    WaitError::Upstream { round, source }
                })?;

            pending = pending_instances(&snapshots);
            if pending.is_empty() {
                info!(
                    "✅ {} instance(s) running and ready after {} round(s) ({}ms)",
                    instance_ids.len(),
                    round,
                    started.elapsed().as_millis()
                );
                return Ok(PollOutcome { rounds: round });
            }

            debug!(
                "⏳ Round {}/{}: {} of {} instance(s) not ready: {:?}",
                round,
                max_attempts,
                pending.len(),
                snapshots.len(),
                pending.iter().map(|p| p.summary()).collect::<Vec<_>>()
            );

            attempt = round;
            if attempt >= max_attempts {
                break;
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    warn!("🛑 Wait cancelled after {} round(s)", attempt);
                    return Err(WaitError::Cancelled { rounds: attempt });
                }
                _ = tokio::time::sleep(self.settings.poll_interval) => {}
            }
        }

        warn!(
            "⏱️  Timeout: {} instance(s) still not ready after {} round(s)",
            pending.len(),
            attempt
        );
        Err(WaitError::Timeout {
            rounds: attempt,
            pending,
        })
    }
}
