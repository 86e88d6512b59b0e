use std::io::Write;
use std::sync::Mutex;

use engine_logging::engine_info;
use watch_engine::{NotificationPlatform, PermissionState};

/// Alerts printed to stdout, with an optional terminal bell.
///
/// The permission prompt of a desktop host has no terminal counterpart; the
/// answer to a request is fixed by configuration.
pub struct TerminalPlatform {
    state: Mutex<PermissionState>,
    grant_when_asked: bool,
    bell: bool,
}

impl TerminalPlatform {
    pub fn new(initial: PermissionState, grant_when_asked: bool, bell: bool) -> Self {
        Self {
            state: Mutex::new(initial),
            grant_when_asked,
            bell,
        }
    }
}

#[async_trait::async_trait]
impl NotificationPlatform for TerminalPlatform {
    fn permission_state(&self) -> PermissionState {
        self.state
            .lock()
            .map(|state| *state)
            .unwrap_or(PermissionState::Denied)
    }

    async fn request_permission(&self) -> PermissionState {
        let answer = if self.grant_when_asked {
            PermissionState::Granted
        } else {
            PermissionState::Denied
        };
        if let Ok(mut state) = self.state.lock() {
            *state = answer;
        }
        engine_info!("notification permission resolved to {:?}", answer);
        answer
    }

    fn show(&self, title: &str, body: &str) {
        let bell = if self.bell { "\x07" } else { "" };
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{bell}[new] {title} | {body}");
        let _ = out.flush();
        engine_info!("alert shown: {}", title);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn request_resolves_from_configuration() {
        let platform = TerminalPlatform::new(PermissionState::Undetermined, false, false);
        assert_eq!(platform.request_permission().await, PermissionState::Denied);
        assert_eq!(platform.permission_state(), PermissionState::Denied);

        let platform = TerminalPlatform::new(PermissionState::Undetermined, true, false);
        assert_eq!(platform.request_permission().await, PermissionState::Granted);
        assert_eq!(platform.permission_state(), PermissionState::Granted);
    }
}
