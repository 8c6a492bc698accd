use crate::CloudProvider;
use anyhow::Result;
use async_trait::async_trait;
use aws_config::timeout::TimeoutConfig;
use aws_config::BehaviorVersion;
use aws_sdk_ec2::config::Region;
use aws_sdk_ec2::error::DisplayErrorContext;
use aws_sdk_ec2::types::InstanceStatus;
use aws_sdk_ec2::Client;
use readiness_common::{InstanceStatusSnapshot, UNKNOWN};
use std::time::Duration;

pub struct Ec2Provider {
    client: Client,
}

impl Ec2Provider {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from the ambient AWS configuration (env, profile, instance role).
    pub async fn from_env(region_override: Option<String>) -> Self {
        // The SDK has no overall operation timeout by default; a stalled call would hang the round.
        let timeouts = TimeoutConfig::builder()
            .connect_timeout(Duration::from_secs(5))
            .operation_timeout(Duration::from_secs(20))
            .build();

        let mut loader = aws_config::defaults(BehaviorVersion::latest()).timeout_config(timeouts);
        if let Some(region) = region_override
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
        {
            loader = loader.region(Region::new(region));
        }
        let config = loader.load().await;
        Self::new(Client::new(&config))
    }
}

fn snapshot_from_sdk(status: &InstanceStatus) -> InstanceStatusSnapshot {
    let state = status
        .instance_state()
        .and_then(|s| s.name())
        .map(|n| n.as_str())
        .unwrap_or(UNKNOWN);
    let instance_status = status
        .instance_status()
        .and_then(|s| s.status())
        .map(|s| s.as_str())
        .unwrap_or(UNKNOWN);
    let system_status = status
        .system_status()
        .and_then(|s| s.status())
        .map(|s| s.as_str())
        .unwrap_or(UNKNOWN);

    InstanceStatusSnapshot::new(
        status.instance_id().unwrap_or(UNKNOWN),
        state,
        instance_status,
        system_status,
    )
}

#[async_trait]
impl CloudProvider for Ec2Provider {
    fn name(&self) -> &'static str {
        "aws"
    }

    async fn describe_instance_status(
        &self,
        instance_ids: &[String],
    ) -> Result<Vec<InstanceStatusSnapshot>> {
        if instance_ids.is_empty() {
            return Ok(vec![]);
        }

        tracing::debug!(
            "🔵 [EC2 API] DescribeInstanceStatus - instance_ids={:?}",
            instance_ids
        );

        let mut out = Vec::with_capacity(instance_ids.len());
        let mut next_token: Option<String> = None;
        loop {
            // IncludeAllInstances: without it, non-running instances are left out of the response.
            let resp = self
                .client
                .describe_instance_status()
                .set_instance_ids(Some(instance_ids.to_vec()))
                .include_all_instances(true)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| {
                    let detail = DisplayErrorContext(&e).to_string();
                    tracing::warn!("❌ [EC2 API] DescribeInstanceStatus failed: {}", detail);
                    anyhow::anyhow!("EC2 DescribeInstanceStatus failed: {}", detail)
                })?;

            out.extend(resp.instance_statuses().iter().map(snapshot_from_sdk));

            match resp.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        tracing::debug!(
            "✅ [EC2 API] DescribeInstanceStatus succeeded: {} status(es)",
            out.len()
        );
        Ok(out)
    }
}
