use std::collections::HashSet;

use crate::Listing;

/// Returns the listings of `current` whose token is not in `previous`,
/// preserving the order of `current`.
pub fn diff(previous: &HashSet<String>, current: &[Listing]) -> Vec<Listing> {
    current
        .iter()
        .filter(|listing| !previous.contains(&listing.token))
        .cloned()
        .collect()
}
