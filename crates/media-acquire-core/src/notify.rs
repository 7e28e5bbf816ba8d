use futures::future::join_all;
use media_acquire_models::NotificationEvent;
use media_acquire_sources::NotificationProvider;
use std::sync::Arc;
use tracing::{debug, error};

/// How a fan-out went; informational only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Delivers "item acquired" events to every provider independently.
///
/// Provider failures are logged here and never reach the caller.
#[derive(Clone, Default)]
pub struct NotificationDispatcher {
    providers: Vec<Arc<dyn NotificationProvider>>,
}

impl NotificationDispatcher {
    pub fn new(providers: Vec<Arc<dyn NotificationProvider>>) -> Self {
        Self { providers }
    }

    pub fn with_provider(mut self, provider: Arc<dyn NotificationProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub async fn fan_out(&self, event: &NotificationEvent) -> DeliveryReport {
        let sends = self.providers.iter().map(|provider| async move {
            let result = provider.send(event).await;
            (provider.provider_name().to_string(), result)
        });

        let mut report = DeliveryReport::default();
        for (provider, result) in join_all(sends).await {
            match result {
                Ok(()) => {
                    debug!(
                        operation = "notification_sent",
                        provider = %provider,
                        title = %event.title,
                        "Notification delivered"
                    );
                    report.delivered += 1;
                }
                Err(e) => {
                    error!(
                        operation = "notification_failed",
                        provider = %provider,
                        title = %event.title,
                        error = %e,
                        "Notification provider failed"
                    );
                    report.failed += 1;
                }
            }
        }
        report
    }
}
