use readiness_providers::CloudProvider;
use std::sync::Arc;

use crate::settings::Settings;

pub struct ProviderManager;

impl ProviderManager {
    /// Providers compiled out (see the `provider-*` features) or unknown names give `None`.
    pub async fn get_provider(
        provider_name: &str,
        settings: &Settings,
    ) -> Option<Arc<dyn CloudProvider>> {
        let _ = settings; // unused when no provider feature is enabled
        match provider_name.to_lowercase().as_str() {
            #[cfg(feature = "provider-aws")]
            "aws" | "ec2" => {
                let provider = readiness_providers::aws::Ec2Provider::from_env(
                    settings.aws_region_override.clone(),
                )
                .await;
                Some(Arc::new(provider))
            }
            #[cfg(feature = "provider-mock")]
            "mock" => Some(Arc::new(readiness_providers::mock::MockProvider::ready_after(
                settings.mock_ready_after_rounds,
            ))),
            _ => None,
        }
    }
}
