use anyhow::Result;
use async_trait::async_trait;
use readiness_common::InstanceStatusSnapshot;

#[async_trait]
pub trait CloudProvider: Send + Sync {
    /// Short code used in logs and provider selection ("aws", "mock").
    fn name(&self) -> &'static str;

    /// Batched status query for the given instances: one snapshot per instance
    /// the provider reports on. Order follows the provider's response.
    ///
    /// An empty `instance_ids` slice returns an empty list without calling the
    /// provider (an unfiltered query would enumerate the whole account).
    async fn describe_instance_status(
        &self,
        instance_ids: &[String],
    ) -> Result<Vec<InstanceStatusSnapshot>>;
}

#[cfg(feature = "mock")]
pub mod mock;

#[cfg(feature = "aws")]
pub mod aws;
