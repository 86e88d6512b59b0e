use std::collections::HashSet;
use std::sync::Arc;

use engine_logging::{engine_debug, engine_info};
use watch_core::Listing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
    Undetermined,
}

/// Host capability for surfacing alerts to the user.
#[async_trait::async_trait]
pub trait NotificationPlatform: Send + Sync {
    fn permission_state(&self) -> PermissionState;
    /// Asks the user; resolves to `Granted` or `Denied`.
    async fn request_permission(&self) -> PermissionState;
    fn show(&self, title: &str, body: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NotifyReport {
    pub delivered: usize,
    /// Suitable listings dropped because permission was denied.
    pub suppressed: usize,
    pub unsuitable: usize,
    /// Repeated tokens within the same cycle.
    pub duplicates: usize,
}

pub fn alert_body(listing: &Listing) -> String {
    format!("ودیعه: {}, اجاره: {}", listing.deposit, listing.rent)
}

pub struct Notifier {
    platform: Arc<dyn NotificationPlatform>,
}

impl Notifier {
    pub fn new(platform: Arc<dyn NotificationPlatform>) -> Self {
        Self { platform }
    }

    /// Alerts once per token for the suitable listings of one detection cycle.
    pub async fn notify_cycle(&self, listings: &[Listing]) -> NotifyReport {
        let mut report = NotifyReport::default();
        let mut seen = HashSet::new();
        for listing in listings {
            if !listing.suitable {
                report.unsuitable += 1;
                continue;
            }
            if !seen.insert(listing.token.as_str()) {
                report.duplicates += 1;
                continue;
            }
            if self.notify(listing).await {
                report.delivered += 1;
            } else {
                report.suppressed += 1;
            }
        }
        engine_info!(
            "notifications delivered={} suppressed={} unsuitable={} duplicates={}",
            report.delivered,
            report.suppressed,
            report.unsuitable,
            report.duplicates
        );
        report
    }

    async fn notify(&self, listing: &Listing) -> bool {
        let permission = match self.platform.permission_state() {
            PermissionState::Undetermined => self.platform.request_permission().await,
            state => state,
        };
        if permission != PermissionState::Granted {
            engine_debug!("alert for {} suppressed: {:?}", listing.token, permission);
            return false;
        }
        self.platform.show(&listing.title, &alert_body(listing));
        true
    }
}
