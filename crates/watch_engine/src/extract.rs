use scraper::{ElementRef, Html, Selector};
use url::Url;
use watch_core::{Listing, SuitabilityRule};

/// CSS selectors describing one listing card and its parts.
///
/// Deposit and rent are read by position: the first description node is the
/// deposit, the second the rent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSelectors {
    pub card: String,
    /// Element carrying the token attribute, searched inside the card.
    pub token_element: String,
    pub token_attr: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub thumbnail_attr: String,
    pub link: String,
    /// Origin that relative detail links are resolved against.
    pub origin: String,
}

impl Default for CardSelectors {
    fn default() -> Self {
        Self {
            card: ".post-list__widget-col-c1444".to_string(),
            token_element: "article.kt-post-card".to_string(),
            token_attr: "token".to_string(),
            title: ".kt-post-card__info h2.kt-post-card__title".to_string(),
            description: ".kt-post-card__info div.kt-post-card__description".to_string(),
            thumbnail: ".kt-post-card-thumbnail img".to_string(),
            thumbnail_attr: "data-src".to_string(),
            link: "a".to_string(),
            origin: "https://divar.ir".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExtractorError {
    #[error("invalid {field} selector {selector:?}: {message}")]
    Selector {
        field: &'static str,
        selector: String,
        message: String,
    },
    #[error("invalid site origin {origin:?}: {message}")]
    Origin { origin: String, message: String },
}

/// Turns a listing-search results page into [`Listing`] records.
///
/// Extraction never fails: missing parts read as empty text or zero, and
/// cards without a token are skipped.
#[derive(Debug, Clone)]
pub struct ListingExtractor {
    card: Selector,
    token_element: Selector,
    token_attr: String,
    title: Selector,
    description: Selector,
    thumbnail: Selector,
    thumbnail_attr: String,
    link: Selector,
    origin: Url,
    rule: SuitabilityRule,
}

impl ListingExtractor {
    pub fn new(selectors: &CardSelectors, rule: SuitabilityRule) -> Result<Self, ExtractorError> {
        let origin = Url::parse(&selectors.origin).map_err(|err| ExtractorError::Origin {
            origin: selectors.origin.clone(),
            message: err.to_string(),
        })?;
        Ok(Self {
            card: parse_selector("card", &selectors.card)?,
            token_element: parse_selector("token", &selectors.token_element)?,
            token_attr: selectors.token_attr.clone(),
            title: parse_selector("title", &selectors.title)?,
            description: parse_selector("description", &selectors.description)?,
            thumbnail: parse_selector("thumbnail", &selectors.thumbnail)?,
            thumbnail_attr: selectors.thumbnail_attr.clone(),
            link: parse_selector("link", &selectors.link)?,
            origin,
            rule,
        })
    }

    pub fn with_defaults(rule: SuitabilityRule) -> Result<Self, ExtractorError> {
        Self::new(&CardSelectors::default(), rule)
    }

    pub fn extract(&self, markup: &str) -> Vec<Listing> {
        let doc = Html::parse_document(markup);
        doc.select(&self.card)
            .filter_map(|card| self.read_card(card))
            .collect()
    }

    fn read_card(&self, card: ElementRef<'_>) -> Option<Listing> {
        let token = card
            .select(&self.token_element)
            .next()
            .and_then(|el| el.value().attr(&self.token_attr))
            .map(str::trim)
            .unwrap_or_default();
        if token.is_empty() {
            return None;
        }

        let title = card
            .select(&self.title)
            .next()
            .map(text_of)
            .unwrap_or_default();
        let mut descriptions = card.select(&self.description).map(text_of);
        let deposit = extract_number(&descriptions.next().unwrap_or_default());
        let rent = extract_number(&descriptions.next().unwrap_or_default());

        let picture_url = card
            .select(&self.thumbnail)
            .next()
            .and_then(|el| el.value().attr(&self.thumbnail_attr))
            .unwrap_or_default()
            .to_string();
        let href = card
            .select(&self.link)
            .next()
            .and_then(|el| el.value().attr("href"))
            .and_then(|href| self.origin.join(href.trim()).ok())
            .map(String::from)
            .unwrap_or_default();

        let suitable = self.rule.evaluate(&title, deposit, rent);
        Some(Listing {
            token: token.to_string(),
            title,
            picture_url,
            href,
            deposit,
            rent,
            suitable,
        })
    }
}

fn parse_selector(field: &'static str, selector: &str) -> Result<Selector, ExtractorError> {
    Selector::parse(selector).map_err(|err| ExtractorError::Selector {
        field,
        selector: selector.to_string(),
        message: err.to_string(),
    })
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Concatenates every digit in `text` (ASCII, Persian or Arabic-Indic) and
/// parses the result. No digits, or a value too large for `u64`, gives `0`.
pub fn extract_number(text: &str) -> u64 {
    text.chars()
        .filter_map(digit_value)
        .try_fold(0u64, |acc, digit| acc.checked_mul(10)?.checked_add(digit))
        .unwrap_or(0)
}

fn digit_value(ch: char) -> Option<u64> {
    match ch {
        '0'..='9' => Some(ch as u64 - '0' as u64),
        '\u{06F0}'..='\u{06F9}' => Some(ch as u64 - 0x06F0),
        '\u{0660}'..='\u{0669}' => Some(ch as u64 - 0x0660),
        _ => None,
    }
}
