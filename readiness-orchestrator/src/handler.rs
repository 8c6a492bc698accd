use readiness_common::events::{WaitForInstancesEvent, WaitResponse};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::WaitError;
use crate::poller::ReadinessPoller;

/// Event entry point: waits for `event.instance_ids` and returns the fixed
/// confirmation on success. Timeouts and query failures come back as errors.
pub async fn handle_event(
    poller: &ReadinessPoller,
    event: WaitForInstancesEvent,
    cancel: &CancellationToken,
) -> Result<WaitResponse, WaitError> {
    let invocation_id = Uuid::new_v4();
    let span = tracing::info_span!(
        "wait_for_instances",
        %invocation_id,
        provider = poller.provider_name(),
        instances = event.instance_ids.len()
    );

    async move {
        tracing::info!(
            "📥 Waiting for instances {:?} (max {} rounds, every {:?})",
            event.instance_ids,
            poller.settings().max_attempts,
            poller.settings().poll_interval
        );
        match poller
            .await_ready_until_cancelled(&event.instance_ids, cancel)
            .await
        {
            Ok(_) => Ok(WaitResponse::ready()),
            Err(e) => {
                tracing::error!("❌ Wait failed ({}): {}", e.kind().as_str(), e);
                Err(e)
            }
        }
    }
    .instrument(span)
    .await
}
