use crate::CloudProvider;
use anyhow::Result;
use async_trait::async_trait;
use readiness_common::InstanceStatusSnapshot;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// One scripted provider answer.
#[derive(Clone, Debug)]
pub enum MockRound {
    Statuses(Vec<InstanceStatusSnapshot>),
    Fail(String),
}

enum Behavior {
    ReadyAfter(u32),
    Scripted(Vec<MockRound>),
}

pub struct MockProvider {
    behavior: Behavior,
    calls: AtomicU32,
    requests: Mutex<Vec<Vec<String>>>,
}

impl MockProvider {
    /// Every requested instance boots and passes its checks on call number `rounds`
    /// (1-based). `rounds <= 1` means healthy on the first call.
    pub fn ready_after(rounds: u32) -> Self {
        Self::with_behavior(Behavior::ReadyAfter(rounds))
    }

    /// Replays `rounds` in order; the last entry repeats once the script runs out.
    pub fn scripted(rounds: Vec<MockRound>) -> Self {
        Self::with_behavior(Behavior::Scripted(rounds))
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Number of describe calls served so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Instance ids passed on each call, in call order.
    pub fn requests(&self) -> Vec<Vec<String>> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn answer(&self, call: u32, instance_ids: &[String]) -> Result<Vec<InstanceStatusSnapshot>> {
        match &self.behavior {
            Behavior::ReadyAfter(rounds) => {
                let ready = call >= *rounds;
                Ok(instance_ids
                    .iter()
                    .map(|id| {
                        if ready {
                            InstanceStatusSnapshot::healthy(id.as_str())
                        } else {
                            InstanceStatusSnapshot::new(
                                id.as_str(),
                                "pending",
                                "initializing",
                                "initializing",
                            )
                        }
                    })
                    .collect())
            }
            Behavior::Scripted(script) => {
                let Some(last) = script.len().checked_sub(1) else {
                    return Ok(vec![]);
                };
                let idx = (call.saturating_sub(1) as usize).min(last);
                match &script[idx] {
                    MockRound::Statuses(statuses) => Ok(statuses.clone()),
                    MockRound::Fail(message) => Err(anyhow::anyhow!("{}", message)),
                }
            }
        }
    }
}

#[async_trait]
impl CloudProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn describe_instance_status(
        &self,
        instance_ids: &[String],
    ) -> Result<Vec<InstanceStatusSnapshot>> {
        if instance_ids.is_empty() {
            return Ok(vec![]);
        }
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(instance_ids.to_vec());
        tracing::debug!(
            "🧪 [Mock API] DescribeInstanceStatus call={} instance_ids={:?}",
            call,
            instance_ids
        );
        self.answer(call, instance_ids)
    }
}
