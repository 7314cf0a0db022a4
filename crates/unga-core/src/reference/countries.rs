//! ISO3 country code lookups.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Region label for codes missing from the region table.
pub const UNKNOWN_REGION: &str = "Unknown";

/// (ISO3, display name, region)
const COUNTRIES: &[(&str, &str, &str)] = &[
    ("AFG", "Afghanistan", "Asia"),
    ("ALB", "Albania", "Europe"),
    ("DZA", "Algeria", "Africa"),
    ("AND", "Andorra", "Europe"),
    ("AGO", "Angola", "Africa"),
    ("ATG", "Antigua and Barbuda", "Caribbean"),
    ("ARG", "Argentina", "South America"),
    ("ARM", "Armenia", "Europe"),
    ("AUS", "Australia", "Oceania"),
    ("AUT", "Austria", "Europe"),
    ("AZE", "Azerbaijan", "Europe"),
    ("BHS", "Bahamas", "Caribbean"),
    ("BHR", "Bahrain", "Asia"),
    ("BGD", "Bangladesh", "Asia"),
    ("BRB", "Barbados", "Caribbean"),
    ("BLR", "Belarus", "Europe"),
    ("BEL", "Belgium", "Europe"),
    ("BLZ", "Belize", "Caribbean"),
    ("BEN", "Benin", "Africa"),
    ("BTN", "Bhutan", "Asia"),
    ("BOL", "Bolivia", "South America"),
    ("BIH", "Bosnia and Herzegovina", "Europe"),
    ("BWA", "Botswana", "Africa"),
    ("BRA", "Brazil", "South America"),
    ("BRN", "Brunei", "Asia"),
    ("BGR", "Bulgaria", "Europe"),
    ("BFA", "Burkina Faso", "Africa"),
    ("BDI", "Burundi", "Africa"),
    ("CPV", "Cape Verde", "Africa"),
    ("KHM", "Cambodia", "Asia"),
    ("CMR", "Cameroon", "Africa"),
    ("CAN", "Canada", "North America"),
    ("CAF", "Central African Republic", "Africa"),
    ("TCD", "Chad", "Africa"),
    ("CHL", "Chile", "South America"),
    ("CHN", "China", "Asia"),
    ("COL", "Colombia", "South America"),
    ("COM", "Comoros", "Africa"),
    ("COG", "Republic of the Congo", "Africa"),
    ("COD", "Democratic Republic of the Congo", "Africa"),
    ("CRI", "Costa Rica", "North America"),
    ("CIV", "Côte d'Ivoire", "Africa"),
    ("HRV", "Croatia", "Europe"),
    ("CUB", "Cuba", "North America"),
    ("CYP", "Cyprus", "Europe"),
    ("CZE", "Czech Republic", "Europe"),
    ("DNK", "Denmark", "Europe"),
    ("DJI", "Djibouti", "Africa"),
    ("DMA", "Dominica", "Caribbean"),
    ("DOM", "Dominican Republic", "North America"),
    ("ECU", "Ecuador", "South America"),
    ("EGY", "Egypt", "Africa"),
    ("SLV", "El Salvador", "North America"),
    ("GNQ", "Equatorial Guinea", "Africa"),
    ("ERI", "Eritrea", "Africa"),
    ("EST", "Estonia", "Europe"),
    ("SWZ", "Eswatini", "Africa"),
    ("ETH", "Ethiopia", "Africa"),
    ("FJI", "Fiji", "Oceania"),
    ("FIN", "Finland", "Europe"),
    ("FRA", "France", "Europe"),
    ("GAB", "Gabon", "Africa"),
    ("GMB", "Gambia", "Africa"),
    ("GEO", "Georgia", "Europe"),
    ("DEU", "Germany", "Europe"),
    ("GHA", "Ghana", "Africa"),
    ("GRC", "Greece", "Europe"),
    ("GRD", "Grenada", "Caribbean"),
    ("GTM", "Guatemala", "North America"),
    ("GIN", "Guinea", "Africa"),
    ("GNB", "Guinea-Bissau", "Africa"),
    ("GUY", "Guyana", "South America"),
    ("HTI", "Haiti", "Caribbean"),
    ("HND", "Honduras", "North America"),
    ("HUN", "Hungary", "Europe"),
    ("ISL", "Iceland", "Europe"),
    ("IND", "India", "Asia"),
    ("IDN", "Indonesia", "Asia"),
    ("IRN", "Iran", "Asia"),
    ("IRQ", "Iraq", "Asia"),
    ("IRL", "Ireland", "Europe"),
    ("ISR", "Israel", "Asia"),
    ("ITA", "Italy", "Europe"),
    ("JAM", "Jamaica", "North America"),
    ("JPN", "Japan", "Asia"),
    ("JOR", "Jordan", "Asia"),
    ("KAZ", "Kazakhstan", "Asia"),
    ("KEN", "Kenya", "Africa"),
    ("KIR", "Kiribati", "Oceania"),
    ("PRK", "North Korea", "Asia"),
    ("KOR", "South Korea", "Asia"),
    ("KWT", "Kuwait", "Asia"),
    ("KGZ", "Kyrgyzstan", "Asia"),
    ("LAO", "Laos", "Asia"),
    ("LVA", "Latvia", "Europe"),
    ("LBN", "Lebanon", "Asia"),
    ("LSO", "Lesotho", "Africa"),
    ("LBR", "Liberia", "Africa"),
    ("LBY", "Libya", "Africa"),
    ("LIE", "Liechtenstein", "Europe"),
    ("LTU", "Lithuania", "Europe"),
    ("LUX", "Luxembourg", "Europe"),
    ("MKD", "North Macedonia", "Europe"),
    ("MDG", "Madagascar", "Africa"),
    ("MWI", "Malawi", "Africa"),
    ("MYS", "Malaysia", "Asia"),
    ("MDV", "Maldives", "Asia"),
    ("MLI", "Mali", "Africa"),
    ("MLT", "Malta", "Europe"),
    ("MHL", "Marshall Islands", "Oceania"),
    ("MRT", "Mauritania", "Africa"),
    ("MUS", "Mauritius", "Africa"),
    ("MEX", "Mexico", "North America"),
    ("FSM", "Micronesia", "Oceania"),
    ("MDA", "Moldova", "Europe"),
    ("MCO", "Monaco", "Europe"),
    ("MNG", "Mongolia", "Asia"),
    ("MNE", "Montenegro", "Europe"),
    ("MAR", "Morocco", "Africa"),
    ("MOZ", "Mozambique", "Africa"),
    ("MMR", "Myanmar", "Asia"),
    ("NAM", "Namibia", "Africa"),
    ("NRU", "Nauru", "Oceania"),
    ("NPL", "Nepal", "Asia"),
    ("NLD", "Netherlands", "Europe"),
    ("NZL", "New Zealand", "Oceania"),
    ("NIC", "Nicaragua", "North America"),
    ("NER", "Niger", "Africa"),
    ("NGA", "Nigeria", "Africa"),
    ("NOR", "Norway", "Europe"),
    ("OMN", "Oman", "Asia"),
    ("PAK", "Pakistan", "Asia"),
    ("PLW", "Palau", "Oceania"),
    ("PSE", "Palestine", "Asia"),
    ("PAN", "Panama", "North America"),
    ("PNG", "Papua New Guinea", "Oceania"),
    ("PRY", "Paraguay", "South America"),
    ("PER", "Peru", "South America"),
    ("PHL", "Philippines", "Asia"),
    ("POL", "Poland", "Europe"),
    ("PRT", "Portugal", "Europe"),
    ("QAT", "Qatar", "Asia"),
    ("ROU", "Romania", "Europe"),
    ("RUS", "Russia", "Europe"),
    ("RWA", "Rwanda", "Africa"),
    ("KNA", "Saint Kitts and Nevis", "Caribbean"),
    ("LCA", "Saint Lucia", "Caribbean"),
    ("VCT", "Saint Vincent and the Grenadines", "Caribbean"),
    ("WSM", "Samoa", "Oceania"),
    ("SMR", "San Marino", "Europe"),
    ("STP", "São Tomé and Príncipe", "Africa"),
    ("SAU", "Saudi Arabia", "Asia"),
    ("SEN", "Senegal", "Africa"),
    ("SRB", "Serbia", "Europe"),
    ("SYC", "Seychelles", "Africa"),
    ("SLE", "Sierra Leone", "Africa"),
    ("SGP", "Singapore", "Asia"),
    ("SVK", "Slovakia", "Europe"),
    ("SVN", "Slovenia", "Europe"),
    ("SLB", "Solomon Islands", "Oceania"),
    ("SOM", "Somalia", "Africa"),
    ("ZAF", "South Africa", "Africa"),
    ("SSD", "South Sudan", "Africa"),
    ("ESP", "Spain", "Europe"),
    ("LKA", "Sri Lanka", "Asia"),
    ("SDN", "Sudan", "Africa"),
    ("SUR", "Suriname", "South America"),
    ("SWE", "Sweden", "Europe"),
    ("CHE", "Switzerland", "Europe"),
    ("SYR", "Syria", "Asia"),
    ("TJK", "Tajikistan", "Asia"),
    ("TZA", "Tanzania", "Africa"),
    ("THA", "Thailand", "Asia"),
    ("TLS", "Timor-Leste", "Asia"),
    ("TGO", "Togo", "Africa"),
    ("TON", "Tonga", "Oceania"),
    ("TTO", "Trinidad and Tobago", "North America"),
    ("TUN", "Tunisia", "Africa"),
    ("TUR", "Turkey", "Europe"),
    ("TKM", "Turkmenistan", "Asia"),
    ("TUV", "Tuvalu", "Oceania"),
    ("UGA", "Uganda", "Africa"),
    ("UKR", "Ukraine", "Europe"),
    ("ARE", "United Arab Emirates", "Asia"),
    ("GBR", "United Kingdom", "Europe"),
    ("USA", "United States", "North America"),
    ("URY", "Uruguay", "South America"),
    ("UZB", "Uzbekistan", "Asia"),
    ("VUT", "Vanuatu", "Oceania"),
    ("VAT", "Vatican City", "Europe"),
    ("VEN", "Venezuela", "South America"),
    ("VNM", "Vietnam", "Asia"),
    ("YEM", "Yemen", "Asia"),
    ("ZMB", "Zambia", "Africa"),
    ("ZWE", "Zimbabwe", "Africa"),
];

/// Resolved details for an ISO3 code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub region: &'static str,
}

static BY_CODE: Lazy<HashMap<&'static str, CountryInfo>> = Lazy::new(|| {
    COUNTRIES
        .iter()
        .map(|&(code, name, region)| (code, CountryInfo { code, name, region }))
        .collect()
});

/// Look up a country by ISO3 code (case-insensitive).
pub fn country_info(code: &str) -> Option<CountryInfo> {
    BY_CODE.get(code.trim().to_uppercase().as_str()).copied()
}

/// Display name for a code, or the upper-cased code itself when unknown.
pub fn country_name(code: &str) -> String {
    country_info(code)
        .map(|c| c.name.to_string())
        .unwrap_or_else(|| code.trim().to_uppercase())
}

/// Region label for a code, or [`UNKNOWN_REGION`].
pub fn region_for_code(code: &str) -> &'static str {
    country_info(code).map(|c| c.region).unwrap_or(UNKNOWN_REGION)
}
