/// Keyword → brand pair. Keywords are lowercase and matched as plain
/// substrings of the lowercased URL or page title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompanyEntry {
    pub keyword: &'static str,
    pub brand: &'static str,
}

const fn entry(keyword: &'static str, brand: &'static str) -> CompanyEntry {
    CompanyEntry { keyword, brand }
}

/// Brands most commonly impersonated in SMS phishing campaigns.
///
/// Order matters: the first matching keyword wins.
pub static COMPANIES: &[CompanyEntry] = &[
    // logistics
    entry("correos", "Correos"),
    entry("dhl", "DHL"),
    entry("fedex", "FedEx"),
    entry("seur", "SEUR"),
    entry("mrw", "MRW"),
    entry("inpost", "InPost"),
    // payments
    entry("paypal", "PayPal"),
    entry("bizum", "Bizum"),
    entry("revolut", "Revolut"),
    // banks
    entry("bbva", "BBVA"),
    entry("santander", "Banco Santander"),
    entry("caixabank", "CaixaBank"),
    entry("lacaixa", "CaixaBank"),
    entry("sabadell", "Banco Sabadell"),
    entry("bankinter", "Bankinter"),
    entry("unicaja", "Unicaja"),
    entry("kutxabank", "Kutxabank"),
    entry("abanca", "Abanca"),
    entry("openbank", "Openbank"),
    entry("ingdirect", "ING"),
    entry("cajamar", "Cajamar"),
    entry("ibercaja", "Ibercaja"),
    // public administration
    entry("agenciatributaria", "Agencia Tributaria"),
    entry("aeat", "Agencia Tributaria"),
    entry("seg-social", "Seguridad Social"),
    entry("dgt", "DGT"),
    // utilities and telecoms
    entry("movistar", "Movistar"),
    entry("vodafone", "Vodafone"),
    entry("orange", "Orange"),
    entry("endesa", "Endesa"),
    entry("iberdrola", "Iberdrola"),
    entry("naturgy", "Naturgy"),
    // consumer platforms
    entry("amazon", "Amazon"),
    entry("netflix", "Netflix"),
    entry("apple", "Apple"),
    entry("icloud", "Apple"),
    entry("microsoft", "Microsoft"),
    entry("outlook", "Microsoft"),
    entry("google", "Google"),
    entry("whatsapp", "WhatsApp"),
    entry("facebook", "Facebook"),
    entry("instagram", "Instagram"),
];
