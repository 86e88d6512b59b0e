//! Listing watch engine: page fetching, listing extraction, alert delivery and
//! the timers that drive the poll loop.
mod engine;
mod extract;
mod fetch;
mod notify;
mod types;

pub use engine::{EngineCommand, EngineHandle};
pub use extract::{extract_number, CardSelectors, ExtractorError, ListingExtractor};
pub use fetch::{decode_body, FetchSettings, Fetcher, ReqwestFetcher};
pub use notify::{alert_body, NotificationPlatform, Notifier, NotifyReport, PermissionState};
pub use types::{EngineEvent, FailureKind, FetchError};
