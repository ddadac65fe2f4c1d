//! Notification trigger client
//!
//! The service depends only on the `trigger(message) -> ack | error`
//! contract; delivery semantics belong to the remote notification
//! service. Dispatch after account creation is fire-and-forget: a
//! failed trigger is logged and never fails the create operation.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::message::Notification;
use crate::domain::{ServiceError, ServiceResult};

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn trigger(&self, notification: Notification) -> ServiceResult<()>;
}

/// Posts notifications as JSON to a remote webhook endpoint
pub struct WebhookNotifier {
    endpoint: String,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn trigger(&self, notification: Notification) -> ServiceResult<()> {
        self.client
            .post(&self.endpoint)
            .json(&notification)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| ServiceError::Internal(format!("notification trigger failed: {}", e)))?;

        Ok(())
    }
}

/// Used when no notification endpoint is configured
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn trigger(&self, notification: Notification) -> ServiceResult<()> {
        debug!(
            "notification dispatch disabled, dropping message {}",
            notification.id
        );
        Ok(())
    }
}

/// Fire-and-forget dispatch. Runs the trigger on a detached task so the
/// calling handler never waits on, or fails with, the notification leg.
pub fn dispatch(notifier: Arc<dyn Notifier>, notification: Notification) {
    tokio::spawn(async move {
        let id = notification.id.clone();
        if let Err(err) = notifier.trigger(notification).await {
            warn!("notification {} not delivered: {}", id, err);
        }
    });
}
