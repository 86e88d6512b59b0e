use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch and extract `url` on behalf of `cycle`.
    Fetch { cycle: crate::CycleId, url: String },
    /// Deliver `TimerElapsed { cycle }` after `delay`.
    ScheduleNext {
        cycle: crate::CycleId,
        delay: Duration,
    },
    /// Drop any outstanding fetch or timer.
    CancelPending,
    /// Alert the user about new, suitable listings.
    Notify {
        cycle: crate::CycleId,
        listings: Vec<crate::Listing>,
    },
    /// Hand the current batch to the presentation layer.
    PublishBatch { listings: Vec<crate::Listing> },
}
