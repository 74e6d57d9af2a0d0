use crate::error::NotificationError;
use async_trait::async_trait;
use serde_json::json;
use tracing::info;

/// Delivers one alert message to whoever is listening.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(&self, message: &str) -> Result<(), NotificationError>;
}

/// Wrap `message` in the per-protocol envelope used with `MessageStructure=json`.
///
/// The `default` value is itself a JSON-encoded string: `{"message": "<msg>"}`.
pub fn sns_envelope(message: &str) -> Result<String, NotificationError> {
    let inner = serde_json::to_string(&json!({ "message": message }))?;
    Ok(serde_json::to_string(&json!({ "default": inner }))?)
}

/// Logs what would have been published. Used by `--dry-run`.
pub struct DryRunNotifier {
    pub topic: String,
}

#[async_trait]
impl Notifier for DryRunNotifier {
    async fn publish(&self, message: &str) -> Result<(), NotificationError> {
        let envelope = sns_envelope(message)?;
        info!(">> [dry-run] would publish to {}: {}", self.topic, envelope);
        Ok(())
    }
}
