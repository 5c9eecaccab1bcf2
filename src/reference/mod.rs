//! Static lookup tables used by the analysis layer.
//!
//! Both tables are ordered. Brand matching returns the first keyword hit,
//! so more specific or higher-value brands sit earlier in the list.

mod companies;
mod countries;

pub use companies::{CompanyEntry, COMPANIES};
pub use countries::{CountryEntry, COUNTRIES};
