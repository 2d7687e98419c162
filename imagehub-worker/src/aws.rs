//! Shared AWS SDK configuration.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use tracing::info;

use crate::config::Config;

/// Load one `SdkConfig` for every client: explicit region, default credential
/// chain, optional endpoint override.
pub async fn load_sdk_config(config: &Config) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.aws_region.clone()));

    if let Some(endpoint) = &config.aws_endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    let sdk_config = loader.load().await;

    info!(
        region = %config.aws_region,
        endpoint_override = config.aws_endpoint_url.is_some(),
        "aws_config_loaded"
    );

    sdk_config
}
