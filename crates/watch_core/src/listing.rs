/// One classified-ad record extracted from a listing page.
///
/// `token` is the identity key: two listings with the same non-empty token are
/// the same real-world item, whatever their other fields say.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Listing {
    pub token: String,
    pub title: String,
    pub picture_url: String,
    pub href: String,
    /// Deposit amount, `0` when the page did not carry a parseable number.
    pub deposit: u64,
    /// Monthly rent amount, `0` when the page did not carry a parseable number.
    pub rent: u64,
    pub suitable: bool,
}
