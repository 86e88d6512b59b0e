//! Listing watch core: pure poll state machine, change detection and suitability rules.
mod diff;
mod effect;
mod listing;
mod msg;
mod state;
mod suitability;
mod update;
mod view_model;

pub use diff::diff;
pub use effect::Effect;
pub use listing::Listing;
pub use msg::{FetchFailure, FetchFailureKind, Msg};
pub use state::{AppState, CycleId, DedupScope, Phase, PollConfig};
pub use suitability::{CombinedBudget, SuitabilityRule, ZeroAmountPolicy};
pub use update::update;
pub use view_model::{format_amount, AppViewModel, ListingRow};
