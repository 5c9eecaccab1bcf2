//! Report enrichment: brand impersonation and phone-number geolocation.

pub mod brand;
pub mod country;
pub mod fetch;

pub use brand::{analyze_url, identify_all, identify_first, BrandMatch, MatchedVia, UrlAnalysis};
pub use country::{resolve_country, CountryInfo};
pub use fetch::{extract_title, PageFetcher, TitleFetcher};
