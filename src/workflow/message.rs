//! Message copy for the moderator notification and the public warning.

use crate::analysis::CountryInfo;
use crate::models::report::Report;

/// Defang a link so chat clients do not render it as clickable.
pub fn obfuscate_link(link: &str) -> String {
    link.replace('.', "[dot]").replace('/', "[slash]")
}

pub fn approval_url(public_base_url: &str, token: &str) -> String {
    format!("{}/aprobar/{}", public_base_url.trim_end_matches('/'), token)
}

fn brand_list(brands: &[String]) -> String {
    if brands.is_empty() {
        "Unknown".to_string()
    } else {
        brands.join(", ")
    }
}

/// Moderator-facing approval request.
pub fn approval_request(report: &Report, country: &CountryInfo, approve_url: &str) -> String {
    format!(
        "New phishing attempt detected:\n\
         Link: {}\n\
         Phone: {} ({} {})\n\
         Impersonated brands: {}\n\
         Approve: {}",
        obfuscate_link(&report.link),
        report.phone,
        country.flag,
        country.country,
        brand_list(&report.impersonated_brands),
        approve_url,
    )
}

/// Public warning posted once a moderator approves the report.
pub fn public_warning(report: &Report, public_base_url: &str) -> String {
    let brand_line = match report.impersonated_brands.as_slice() {
        [] => String::new(),
        brands => format!("🎭 Impersonating: {}\n\n", brands.join(", ")),
    };

    format!(
        "🤖 Automated message\n\
         🚨 NEW PHISHING CAMPAIGN DETECTED 🚨\n\n\
         🔗 {}\n\n\
         {}\
         Tips:\n\n\
         ☎️ Block the sender: {}\n\n\
         🔁 Share this to warn others.\n\n\
         🔨 Report any malicious SMS you receive at\n\
         {}",
        obfuscate_link(&report.link),
        brand_line,
        report.phone,
        public_base_url,
    )
}
