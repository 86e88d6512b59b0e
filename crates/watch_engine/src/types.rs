use std::fmt;

use watch_core::{CycleId, Listing};

use crate::NotifyReport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A fetch finished; on success the page has already been extracted.
    PageFetched {
        cycle: CycleId,
        result: Result<Vec<Listing>, FetchError>,
    },
    /// The wait before the next cycle is over.
    TimerElapsed { cycle: CycleId },
    /// Alerts for a cycle were handed to the platform.
    NotificationsDispatched { cycle: CycleId, report: NotifyReport },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    /// Anything but `200 OK`.
    NonOkStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Transport,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::NonOkStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Transport => write!(f, "network error"),
        }
    }
}
