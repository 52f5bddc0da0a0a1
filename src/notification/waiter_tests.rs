use super::NotificationWaiter;
use crate::api::models::{Link, OperationLinks};
use crate::api::{NotificationStatus, OperationResponse};
use crate::config::ExtraConfig;
use crate::error::AcquiaError;
use crate::testing::{FakeApi, FAKE_NOTIFICATION};
use std::time::Duration;
use uuid::Uuid;

const INTERVAL: Duration = Duration::from_millis(1);

fn notification_uuid() -> Uuid {
    Uuid::parse_str(FAKE_NOTIFICATION).unwrap()
}

#[test]
fn test_completes_after_exactly_n_polls() {
    let api = FakeApi::new().with_statuses(&[
        NotificationStatus::Pending,
        NotificationStatus::InProgress,
        NotificationStatus::InProgress,
        NotificationStatus::Completed,
    ]);
    let waiter = NotificationWaiter::new(&api, INTERVAL, Duration::from_secs(5));

    let notification = waiter.wait_for(&notification_uuid()).unwrap();

    assert_eq!(notification.status, NotificationStatus::Completed);
    assert_eq!(api.count("GET notification"), 4);
}

#[test]
fn test_already_completed_polls_once() {
    let api = FakeApi::new().with_statuses(&[NotificationStatus::Completed]);
    let waiter = NotificationWaiter::new(&api, INTERVAL, Duration::ZERO);

    waiter.wait_for(&notification_uuid()).unwrap();

    assert_eq!(api.count("GET notification"), 1);
}

#[test]
fn test_failed_task() {
    let api = FakeApi::new().with_statuses(&[
        NotificationStatus::InProgress,
        NotificationStatus::Failed,
    ]);
    let waiter = NotificationWaiter::new(&api, INTERVAL, Duration::from_secs(5));

    let result = waiter.wait_for(&notification_uuid());

    match result {
        Err(AcquiaError::OperationFailed { uuid }) => assert_eq!(uuid, FAKE_NOTIFICATION),
        other => panic!("expected OperationFailed, got {:?}", other),
    }
    assert_eq!(api.count("GET notification"), 2);
}

#[test]
fn test_never_terminating_task_times_out() {
    let api = FakeApi::new().with_statuses(&[NotificationStatus::InProgress]);
    let waiter = NotificationWaiter::new(&api, INTERVAL, Duration::from_millis(5));

    let result = waiter.wait_for(&notification_uuid());

    assert!(matches!(result, Err(AcquiaError::OperationTimeout { .. })));
    // Polls at 0, 1, 2, 3, 4 and 5 ms of accumulated wait
    assert_eq!(api.count("GET notification"), 6);
}

#[test]
fn test_unknown_status_keeps_polling() {
    let api = FakeApi::new().with_statuses(&[
        NotificationStatus::Unknown,
        NotificationStatus::Completed,
    ]);
    let waiter = NotificationWaiter::new(&api, INTERVAL, Duration::from_secs(5));

    waiter.wait_for(&notification_uuid()).unwrap();

    assert_eq!(api.count("GET notification"), 2);
}

#[test]
fn test_wait_reads_uuid_from_response() {
    let api = FakeApi::new().with_statuses(&[NotificationStatus::Completed]);
    let waiter = NotificationWaiter::new(&api, INTERVAL, Duration::from_secs(1));
    let response = OperationResponse {
        message: "Creating the backup.".to_string(),
        links: OperationLinks {
            notification: Some(Link {
                href: format!("https://cloud.acquia.com/api/notifications/{}", FAKE_NOTIFICATION),
            }),
        },
    };

    let notification = waiter.wait(&response).unwrap();

    assert_eq!(notification.uuid, notification_uuid());
    assert_eq!(api.calls(), vec![format!("GET notification {}", FAKE_NOTIFICATION)]);
}

#[test]
fn test_wait_without_link_makes_no_request() {
    let api = FakeApi::new();
    let waiter = NotificationWaiter::from_config(&api, &ExtraConfig::default());
    let response = OperationResponse {
        message: String::new(),
        links: OperationLinks::default(),
    };

    let result = waiter.wait(&response);

    assert!(matches!(result, Err(AcquiaError::InvalidNotificationLink(_))));
    assert!(api.calls().is_empty());
}
