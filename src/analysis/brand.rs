//! Keyword-based brand identification.
//!
//! Matching is plain substring search over lowercased input. Lookalike
//! domains (`paypal-secure-login.xyz`, `correos-envio.info`) embed the
//! brand as a contiguous substring, so no word-boundary checks are made.

use serde::{Deserialize, Serialize};

use super::fetch::TitleFetcher;
use crate::reference::COMPANIES;

/// Which signal produced a [`BrandMatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchedVia {
    Url,
    Title,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandMatch {
    pub brand: Option<String>,
    pub matched_via: MatchedVia,
}

impl BrandMatch {
    pub fn none() -> Self {
        Self {
            brand: None,
            matched_via: MatchedVia::None,
        }
    }
}

/// Outcome of [`analyze_url`]: the first-match result plus the page title
/// if one had to be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlAnalysis {
    pub brand: BrandMatch,
    pub page_title: Option<String>,
}

fn first_in(haystack: &str) -> Option<&'static str> {
    let haystack = haystack.to_lowercase();
    COMPANIES
        .iter()
        .find(|c| haystack.contains(c.keyword))
        .map(|c| c.brand)
}

/// Return the brand of the first keyword (in reference order) found in the
/// URL, falling back to the title when the URL has no hit.
pub fn identify_first(url: &str, title: Option<&str>) -> BrandMatch {
    if let Some(brand) = first_in(url) {
        return BrandMatch {
            brand: Some(brand.to_string()),
            matched_via: MatchedVia::Url,
        };
    }

    if let Some(brand) = title.and_then(first_in) {
        return BrandMatch {
            brand: Some(brand.to_string()),
            matched_via: MatchedVia::Title,
        };
    }

    BrandMatch::none()
}

/// Every brand whose keyword appears in the URL or the title, deduplicated,
/// in reference order.
pub fn identify_all(url: &str, title: Option<&str>) -> Vec<String> {
    let url = url.to_lowercase();
    let title = title.map(str::to_lowercase);

    let mut brands: Vec<String> = Vec::new();
    for company in COMPANIES {
        let hit = url.contains(company.keyword)
            || title.as_deref().is_some_and(|t| t.contains(company.keyword));
        if hit && !brands.iter().any(|b| b == company.brand) {
            brands.push(company.brand.to_string());
        }
    }
    brands
}

/// URL first; the page is only fetched when the URL itself names no brand.
pub async fn analyze_url(url: &str, fetcher: &dyn TitleFetcher) -> UrlAnalysis {
    tracing::debug!(url, "analyzing url");

    let from_url = identify_first(url, None);
    if from_url.brand.is_some() {
        tracing::debug!(url, brand = ?from_url.brand, "brand identified from url");
        return UrlAnalysis {
            brand: from_url,
            page_title: None,
        };
    }

    let page_title = fetcher.fetch_title(url).await;
    let brand = identify_first(url, page_title.as_deref());
    match &brand.brand {
        Some(b) => tracing::debug!(url, brand = %b, "brand identified from page title"),
        None => tracing::debug!(url, "no brand identified"),
    }

    UrlAnalysis { brand, page_title }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedTitle(Option<&'static str>);

    #[async_trait::async_trait]
    impl TitleFetcher for FixedTitle {
        async fn fetch_title(&self, _url: &str) -> Option<String> {
            self.0.map(String::from)
        }
    }

    struct PanicFetcher;

    #[async_trait::async_trait]
    impl TitleFetcher for PanicFetcher {
        async fn fetch_title(&self, url: &str) -> Option<String> {
            panic!("title fetched for {url} although the url already matched");
        }
    }

    #[test]
    fn test_url_match_is_case_insensitive() {
        let m = identify_first("https://PayPal-Secure-Login.fake/verify", None);
        assert_eq!(m.brand.as_deref(), Some("PayPal"));
        assert_eq!(m.matched_via, MatchedVia::Url);
    }

    #[test]
    fn test_earliest_listed_keyword_wins() {
        // "correos" is listed before "paypal"
        let m = identify_first("http://paypal.correos-envios.top", None);
        assert_eq!(m.brand.as_deref(), Some("Correos"));
    }

    #[test]
    fn test_substring_inside_lookalike_domain() {
        let m = identify_first("http://xn--bbvaonline-secure.info", None);
        assert_eq!(m.brand.as_deref(), Some("BBVA"));
    }

    #[test]
    fn test_title_used_only_when_url_misses() {
        let m = identify_first("http://a1b2c3.top/x", Some("Acceso Clientes | Bankinter"));
        assert_eq!(m.brand.as_deref(), Some("Bankinter"));
        assert_eq!(m.matched_via, MatchedVia::Title);

        let m = identify_first("http://netflix-billing.top", Some("Amazon"));
        assert_eq!(m.brand.as_deref(), Some("Netflix"));
        assert_eq!(m.matched_via, MatchedVia::Url);
    }

    #[test]
    fn test_no_match_returns_none() {
        assert_eq!(identify_first("http://a1b2c3.top", None), BrandMatch::none());
        assert_eq!(
            identify_first("http://a1b2c3.top", Some("Welcome")),
            BrandMatch::none()
        );
    }

    #[test]
    fn test_identify_all_deduplicates_across_url_and_title() {
        let brands = identify_all(
            "http://paypal-amazon.fake",
            Some("PayPal | Sign in to your Amazon account"),
        );
        assert_eq!(brands, vec!["PayPal".to_string(), "Amazon".to_string()]);
    }

    #[test]
    fn test_identify_all_collapses_aliases_of_one_brand() {
        let brands = identify_all("http://icloud-apple-id.top", None);
        assert_eq!(brands, vec!["Apple".to_string()]);
    }

    #[test]
    fn test_identify_all_empty_without_hits() {
        assert!(identify_all("http://a1b2c3.top", Some("hello")).is_empty());
    }

    #[tokio::test]
    async fn test_analyze_url_skips_fetch_on_url_hit() {
        let a = analyze_url("http://dhl-parcel.top", &PanicFetcher).await;
        assert_eq!(a.brand.brand.as_deref(), Some("DHL"));
        assert_eq!(a.page_title, None);
    }

    #[tokio::test]
    async fn test_analyze_url_falls_back_to_title() {
        let fetcher = FixedTitle(Some("Movistar - Factura pendiente"));
        let a = analyze_url("http://a1b2c3.top", &fetcher).await;
        assert_eq!(a.brand.brand.as_deref(), Some("Movistar"));
        assert_eq!(a.brand.matched_via, MatchedVia::Title);
        assert_eq!(a.page_title.as_deref(), Some("Movistar - Factura pendiente"));
    }

    #[tokio::test]
    async fn test_analyze_url_without_title() {
        let a = analyze_url("http://a1b2c3.top", &FixedTitle(None)).await;
        assert_eq!(a.brand, BrandMatch::none());
        assert_eq!(a.page_title, None);
    }
}
