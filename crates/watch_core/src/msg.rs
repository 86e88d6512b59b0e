use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailureKind {
    /// The transport answered, but not with an OK status.
    NonOkStatus { status: u16 },
    /// Network-level failure, including timeouts and oversized bodies.
    TransportFailure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub kind: FetchFailureKind,
    pub message: String,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FetchFailureKind::NonOkStatus { status } => {
                write!(f, "non-ok status {status}: {}", self.message)
            }
            FetchFailureKind::TransportFailure => write!(f, "transport failure: {}", self.message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User asked to start monitoring a URL (or restart with it).
    StartRequested(String),
    /// User asked for an immediate poll of the current target.
    RefetchRequested,
    /// User edited the target URL; applied at the next cycle boundary.
    TargetUrlChanged(String),
    /// User asked to stop monitoring.
    StopRequested,
    /// Engine finished fetching and extracting the page of a cycle.
    FetchCompleted {
        cycle: crate::CycleId,
        result: Result<Vec<crate::Listing>, FetchFailure>,
    },
    /// Engine timer for a waiting cycle fired.
    TimerElapsed { cycle: crate::CycleId },
    /// Engine reports how many alerts reached the user for a cycle.
    NotificationsDelivered {
        cycle: crate::CycleId,
        delivered: usize,
    },
}
