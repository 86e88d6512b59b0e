use std::time::Duration;

use crate::{CycleId, Listing, Phase};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    pub target_url: String,
    pub pending_url: Option<String>,
    pub cycle: Option<CycleId>,
    pub listings: Vec<ListingRow>,
    pub seen_count: usize,
    pub last_new_count: usize,
    pub notified_total: usize,
    pub next_delay: Option<Duration>,
    pub consecutive_failures: u32,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    pub token: String,
    pub title: String,
    pub href: String,
    pub deposit: String,
    pub rent: String,
    pub suitable: bool,
}

impl From<&Listing> for ListingRow {
    fn from(listing: &Listing) -> Self {
        Self {
            token: listing.token.clone(),
            title: listing.title.clone(),
            href: listing.href.clone(),
            deposit: format_amount(listing.deposit),
            rent: format_amount(listing.rent),
            suitable: listing.suitable,
        }
    }
}

/// Formats an amount with `,` thousands separators.
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::format_amount;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(999), "999");
        assert_eq!(format_amount(1_000), "1,000");
        assert_eq!(format_amount(350_000_000), "350,000,000");
        assert_eq!(format_amount(12_345_678), "12,345,678");
    }
}
