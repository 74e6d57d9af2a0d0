use super::notify::{sns_envelope, Notifier};
use crate::error::NotificationError;
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_sns::error::DisplayErrorContext;
use aws_sdk_sns::Client;
use tracing::{debug, info};

/// Publishes alerts to one SNS topic. Credentials come from the default AWS chain.
pub struct SnsNotifier {
    client: Client,
    topic:  String,
}

impl SnsNotifier {
    pub async fn new(region: &str, topic: &str) -> Self {
        debug!("Creating SNS client for region {}", region);
        let region_provider = RegionProviderChain::first_try(Region::new(region.to_string()));
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .load()
            .await;
        Self::with_client(Client::new(&config), topic)
    }

    pub fn with_client(client: Client, topic: &str) -> Self {
        Self { client, topic: topic.to_string() }
    }
}

#[async_trait]
impl Notifier for SnsNotifier {
    async fn publish(&self, message: &str) -> Result<(), NotificationError> {
        info!(">> Sending notification via SNS...");
        let envelope = sns_envelope(message)?;

        let response = self.client
            .publish()
            .target_arn(&self.topic)
            .message(envelope)
            .message_structure("json")
            .send()
            .await
            .map_err(|e| NotificationError::Publish {
                topic:  self.topic.clone(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        info!(
            ">> Notification sent (message id {})",
            response.message_id().unwrap_or("unknown")
        );
        Ok(())
    }
}
