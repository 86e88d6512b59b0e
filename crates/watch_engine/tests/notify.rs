mod support;

use std::sync::Arc;

use pretty_assertions::assert_eq;
use support::RecordingPlatform;
use watch_core::Listing;
use watch_engine::{alert_body, Notifier, NotifyReport, PermissionState};

fn listing(token: &str, suitable: bool) -> Listing {
    Listing {
        token: token.to_string(),
        title: format!("flat {token}"),
        deposit: 100_000_000,
        rent: 2_000_000,
        suitable,
        ..Listing::default()
    }
}

#[test]
fn body_carries_both_amounts() {
    assert_eq!(
        alert_body(&listing("a", true)),
        "ودیعه: 100000000, اجاره: 2000000"
    );
}

#[tokio::test]
async fn unsuitable_listings_are_never_shown() {
    let platform = Arc::new(RecordingPlatform::granted());
    let notifier = Notifier::new(platform.clone());

    let report = notifier
        .notify_cycle(&[listing("a", false), listing("b", true)])
        .await;

    assert_eq!(
        report,
        NotifyReport {
            delivered: 1,
            unsuitable: 1,
            ..NotifyReport::default()
        }
    );
    assert_eq!(
        platform.shown(),
        vec![(
            "flat b".to_string(),
            "ودیعه: 100000000, اجاره: 2000000".to_string()
        )]
    );
}

#[tokio::test]
async fn duplicate_tokens_in_one_cycle_alert_once() {
    let platform = Arc::new(RecordingPlatform::granted());
    let notifier = Notifier::new(platform.clone());

    let report = notifier
        .notify_cycle(&[listing("a", true), listing("a", true), listing("b", true)])
        .await;

    assert_eq!(report.delivered, 2);
    assert_eq!(report.duplicates, 1);
    assert_eq!(platform.shown().len(), 2);

    // A fresh cycle has a fresh seen-set.
    let report = notifier.notify_cycle(&[listing("a", true)]).await;
    assert_eq!(report.delivered, 1);
}

#[tokio::test]
async fn undetermined_permission_is_requested_once_then_used() {
    let platform = Arc::new(RecordingPlatform::new(
        PermissionState::Undetermined,
        PermissionState::Granted,
    ));
    let notifier = Notifier::new(platform.clone());

    let report = notifier
        .notify_cycle(&[listing("a", true), listing("b", true)])
        .await;

    assert_eq!(report.delivered, 2);
    assert_eq!(platform.requests(), 1);
}

#[tokio::test]
async fn refused_permission_suppresses_silently() {
    let platform = Arc::new(RecordingPlatform::new(
        PermissionState::Undetermined,
        PermissionState::Denied,
    ));
    let notifier = Notifier::new(platform.clone());

    let report = notifier
        .notify_cycle(&[listing("a", true), listing("b", true)])
        .await;

    assert_eq!(report.delivered, 0);
    assert_eq!(report.suppressed, 2);
    assert_eq!(platform.requests(), 1);
    assert!(platform.shown().is_empty());
}

#[tokio::test]
async fn denied_permission_is_never_requested_again() {
    let platform = Arc::new(RecordingPlatform::new(
        PermissionState::Denied,
        PermissionState::Granted,
    ));
    let notifier = Notifier::new(platform.clone());

    let report = notifier.notify_cycle(&[listing("a", true)]).await;

    assert_eq!(report.suppressed, 1);
    assert_eq!(platform.requests(), 0);
}
