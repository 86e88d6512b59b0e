/// How an amount of `0` (the page carried no parseable number) is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroAmountPolicy {
    /// An unknown amount makes the listing unsuitable.
    Excludes,
    /// An unknown amount is not checked against its bound.
    #[default]
    Includes,
}

/// Combined affordability: deposit converted to a monthly amount, plus rent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombinedBudget {
    /// Monthly rent equivalent of every 1,000,000 of deposit.
    pub rent_per_million_deposit: u64,
    /// Inclusive upper bound for `rent + converted deposit`.
    pub max_monthly: u64,
}

impl CombinedBudget {
    pub fn monthly_equivalent(&self, deposit: u64, rent: u64) -> u64 {
        let converted = (deposit / 1_000_000).saturating_mul(self.rent_per_million_deposit);
        rent.saturating_add(converted)
    }
}

/// Caller-configured acceptability rule for a listing.
///
/// All bounds are inclusive and optional; with nothing configured every
/// listing is suitable unless its title carries an excluded marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuitabilityRule {
    pub max_deposit: Option<u64>,
    pub max_rent: Option<u64>,
    pub combined: Option<CombinedBudget>,
    pub zero_amounts: ZeroAmountPolicy,
    /// Titles containing any of these are never suitable (shared-housing ads).
    pub excluded_title_markers: Vec<String>,
}

impl Default for SuitabilityRule {
    fn default() -> Self {
        Self {
            max_deposit: None,
            max_rent: None,
            combined: None,
            zero_amounts: ZeroAmountPolicy::default(),
            excluded_title_markers: vec!["همخانه".to_string(), "هم‌خانه".to_string()],
        }
    }
}

impl SuitabilityRule {
    /// Numeric part of the rule. Total over all inputs.
    pub fn is_suitable(&self, deposit: u64, rent: u64) -> bool {
        if self.zero_amounts == ZeroAmountPolicy::Excludes && (deposit == 0 || rent == 0) {
            return false;
        }

        let within = |amount: u64, bound: Option<u64>| match bound {
            // Zero here can only mean "unknown, included".
            Some(max) => amount == 0 || amount <= max,
            None => true,
        };
        if !within(deposit, self.max_deposit) || !within(rent, self.max_rent) {
            return false;
        }

        self.combined
            .map_or(true, |budget| budget.monthly_equivalent(deposit, rent) <= budget.max_monthly)
    }

    pub fn is_excluded_title(&self, title: &str) -> bool {
        self.excluded_title_markers
            .iter()
            .filter(|marker| !marker.is_empty())
            .any(|marker| title.contains(marker.as_str()))
    }

    /// Full rule: title exclusion first, then the numeric predicate.
    pub fn evaluate(&self, title: &str, deposit: u64, rent: u64) -> bool {
        !self.is_excluded_title(title) && self.is_suitable(deposit, rent)
    }
}
