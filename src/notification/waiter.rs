use std::thread;
use std::time::Duration;
use uuid::Uuid;

use crate::api::{CloudApi, Notification, NotificationStatus, OperationResponse};
use crate::config::ExtraConfig;
use crate::error::{AcquiaError, Result};

/// Blocks until a Cloud API task reaches a terminal state.
///
/// The notification is checked first and the deadline second, so a task that
/// completes on poll N returns after exactly N requests. Elapsed time is the
/// sum of the intervals slept, not wall-clock time.
pub struct NotificationWaiter<'a> {
    api: &'a dyn CloudApi,
    interval: Duration,
    timeout: Duration,
}

impl<'a> NotificationWaiter<'a> {
    pub fn new(api: &'a dyn CloudApi, interval: Duration, timeout: Duration) -> Self {
        Self {
            api,
            // A zero interval would never advance the deadline
            interval: interval.max(Duration::from_millis(1)),
            timeout,
        }
    }

    /// Use `taskwait`/`timeout` from the configuration
    pub fn from_config(api: &'a dyn CloudApi, config: &ExtraConfig) -> Self {
        Self::new(api, config.poll_interval(), config.wait_timeout())
    }

    /// Wait on the notification referenced by a mutating call's response
    pub fn wait(&self, response: &OperationResponse) -> Result<Notification> {
        if !response.message.is_empty() {
            println!("{}", response.message);
        }
        let uuid = response.notification_uuid()?;
        self.wait_for(&uuid)
    }

    pub fn wait_for(&self, uuid: &Uuid) -> Result<Notification> {
        tracing::info!(%uuid, interval = ?self.interval, timeout = ?self.timeout, "Waiting for task");

        let mut waited = Duration::ZERO;
        let mut polls = 0u32;

        loop {
            let notification = self.api.notification(uuid)?;
            polls += 1;
            tracing::debug!(%uuid, polls, status = %notification.status, "Polled notification");

            match notification.status {
                NotificationStatus::Completed => {
                    println!("✓ Task {} completed", uuid);
                    return Ok(notification);
                }
                NotificationStatus::Failed => {
                    println!("✗ Task {} failed", uuid);
                    return Err(AcquiaError::OperationFailed {
                        uuid: uuid.to_string(),
                    });
                }
                _ => {}
            }

            if waited >= self.timeout {
                tracing::warn!(%uuid, polls, "Task did not finish before the timeout");
                return Err(AcquiaError::OperationTimeout {
                    uuid: uuid.to_string(),
                    waited_secs: waited.as_secs(),
                });
            }

            match notification.progress {
                Some(progress) => println!(
                    "  Task {} is {} ({}%), checking again in {}s...",
                    uuid,
                    notification.status,
                    progress,
                    self.interval.as_secs()
                ),
                None => println!(
                    "  Task {} is {}, checking again in {}s...",
                    uuid,
                    notification.status,
                    self.interval.as_secs()
                ),
            }

            thread::sleep(self.interval);
            waited += self.interval;
        }
    }
}
