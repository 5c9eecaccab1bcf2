/// International dialling prefix → country name and flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryEntry {
    /// Prefix including the leading `+`.
    pub prefix: &'static str,
    pub country: &'static str,
    pub flag: &'static str,
}

const fn entry(prefix: &'static str, country: &'static str, flag: &'static str) -> CountryEntry {
    CountryEntry { prefix, country, flag }
}

/// Prefixes have variable length (1 to 3 digits); resolution takes the
/// longest prefix that matches.
pub static COUNTRIES: &[CountryEntry] = &[
    entry("+1", "United States / Canada", "🇺🇸"),
    entry("+7", "Russia", "🇷🇺"),
    entry("+20", "Egypt", "🇪🇬"),
    entry("+27", "South Africa", "🇿🇦"),
    entry("+30", "Greece", "🇬🇷"),
    entry("+31", "Netherlands", "🇳🇱"),
    entry("+32", "Belgium", "🇧🇪"),
    entry("+33", "France", "🇫🇷"),
    entry("+34", "Spain", "🇪🇸"),
    entry("+36", "Hungary", "🇭🇺"),
    entry("+39", "Italy", "🇮🇹"),
    entry("+40", "Romania", "🇷🇴"),
    entry("+41", "Switzerland", "🇨🇭"),
    entry("+43", "Austria", "🇦🇹"),
    entry("+44", "United Kingdom", "🇬🇧"),
    entry("+45", "Denmark", "🇩🇰"),
    entry("+46", "Sweden", "🇸🇪"),
    entry("+47", "Norway", "🇳🇴"),
    entry("+48", "Poland", "🇵🇱"),
    entry("+49", "Germany", "🇩🇪"),
    entry("+51", "Peru", "🇵🇪"),
    entry("+52", "Mexico", "🇲🇽"),
    entry("+53", "Cuba", "🇨🇺"),
    entry("+54", "Argentina", "🇦🇷"),
    entry("+55", "Brazil", "🇧🇷"),
    entry("+56", "Chile", "🇨🇱"),
    entry("+57", "Colombia", "🇨🇴"),
    entry("+58", "Venezuela", "🇻🇪"),
    entry("+60", "Malaysia", "🇲🇾"),
    entry("+61", "Australia", "🇦🇺"),
    entry("+62", "Indonesia", "🇮🇩"),
    entry("+63", "Philippines", "🇵🇭"),
    entry("+64", "New Zealand", "🇳🇿"),
    entry("+65", "Singapore", "🇸🇬"),
    entry("+66", "Thailand", "🇹🇭"),
    entry("+81", "Japan", "🇯🇵"),
    entry("+82", "South Korea", "🇰🇷"),
    entry("+84", "Vietnam", "🇻🇳"),
    entry("+86", "China", "🇨🇳"),
    entry("+90", "Turkey", "🇹🇷"),
    entry("+91", "India", "🇮🇳"),
    entry("+92", "Pakistan", "🇵🇰"),
    entry("+212", "Morocco", "🇲🇦"),
    entry("+213", "Algeria", "🇩🇿"),
    entry("+216", "Tunisia", "🇹🇳"),
    entry("+234", "Nigeria", "🇳🇬"),
    entry("+351", "Portugal", "🇵🇹"),
    entry("+353", "Ireland", "🇮🇪"),
    entry("+355", "Albania", "🇦🇱"),
    entry("+358", "Finland", "🇫🇮"),
    entry("+359", "Bulgaria", "🇧🇬"),
    entry("+370", "Lithuania", "🇱🇹"),
    entry("+380", "Ukraine", "🇺🇦"),
    entry("+420", "Czech Republic", "🇨🇿"),
    entry("+591", "Bolivia", "🇧🇴"),
    entry("+593", "Ecuador", "🇪🇨"),
    entry("+595", "Paraguay", "🇵🇾"),
    entry("+598", "Uruguay", "🇺🇾"),
    entry("+971", "United Arab Emirates", "🇦🇪"),
    entry("+972", "Israel", "🇮🇱"),
];
