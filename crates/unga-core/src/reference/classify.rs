//! African Union membership and analysis classification.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

/// The 55 African Union member states, by canonical name.
const AU_MEMBERS: &[&str] = &[
    "Algeria", "Angola", "Benin", "Botswana", "Burkina Faso", "Burundi", "Cabo Verde",
    "Cameroon", "Central African Republic", "Chad", "Comoros", "Congo", "Côte d'Ivoire",
    "Democratic Republic of the Congo", "Djibouti", "Egypt", "Equatorial Guinea",
    "Eritrea", "Eswatini", "Ethiopia", "Gabon", "Gambia", "Ghana", "Guinea",
    "Guinea-Bissau", "Kenya", "Lesotho", "Liberia", "Libya", "Madagascar", "Malawi",
    "Mali", "Mauritania", "Mauritius", "Morocco", "Mozambique", "Namibia", "Niger",
    "Nigeria", "Rwanda", "Sahrawi Arab Democratic Republic", "São Tomé and Príncipe",
    "Senegal", "Seychelles", "Sierra Leone", "Somalia", "South Africa", "South Sudan",
    "Sudan", "Tanzania", "Togo", "Tunisia", "Uganda", "Zambia", "Zimbabwe",
];

/// Alternative spellings mapped onto canonical member names.
const ALIASES: &[(&str, &str)] = &[
    ("United Republic of Tanzania", "Tanzania"),
    ("DRC", "Democratic Republic of the Congo"),
    ("DR Congo", "Democratic Republic of the Congo"),
    ("Congo (Democratic Republic)", "Democratic Republic of the Congo"),
    ("Congo (DRC)", "Democratic Republic of the Congo"),
    ("Republic of the Congo", "Congo"),
    ("Congo (Republic)", "Congo"),
    ("Cape Verde", "Cabo Verde"),
    ("Ivory Coast", "Côte d'Ivoire"),
    ("Cote d'Ivoire", "Côte d'Ivoire"),
    ("Swaziland", "Eswatini"),
    ("Western Sahara", "Sahrawi Arab Democratic Republic"),
    ("Sao Tome and Principe", "São Tomé and Príncipe"),
];

/// Speakers that are never member states.
const NON_STATE_ENTITIES: &[&str] = &[
    "Secretary-General",
    "President of the General Assembly",
    "PGA",
    "UN Secretary-General",
    "UN SG",
    "SG",
];

static MEMBERS: Lazy<HashSet<String>> =
    Lazy::new(|| AU_MEMBERS.iter().map(|m| m.to_lowercase()).collect());

static ALIAS_MAP: Lazy<HashMap<String, &'static str>> = Lazy::new(|| {
    ALIASES
        .iter()
        .map(|&(alias, canonical)| (alias.to_lowercase(), canonical))
        .collect()
});

static ENTITIES: Lazy<HashSet<String>> =
    Lazy::new(|| NON_STATE_ENTITIES.iter().map(|e| e.to_lowercase()).collect());

/// Classification attached to every analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "African Member State")]
    AfricanMemberState,
    #[default]
    #[serde(rename = "Development Partner")]
    DevelopmentPartner,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AfricanMemberState => "African Member State",
            Self::DevelopmentPartner => "Development Partner",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Classification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "African Member State" => Ok(Self::AfricanMemberState),
            "Development Partner" => Ok(Self::DevelopmentPartner),
            other => Err(format!("unknown classification '{}'", other)),
        }
    }
}

/// Trim and map known aliases onto the canonical member name.
pub fn normalize_country_name(country: &str) -> String {
    let trimmed = country.trim();
    match ALIAS_MAP.get(&trimmed.to_lowercase()) {
        Some(canonical) => (*canonical).to_string(),
        None => trimmed.to_string(),
    }
}

/// Decide the classification for a country or entity name.
pub fn infer_classification(country: &str) -> Classification {
    let normalized = normalize_country_name(country).to_lowercase();
    if normalized.is_empty() || ENTITIES.contains(&normalized) {
        return Classification::DevelopmentPartner;
    }
    if MEMBERS.contains(&normalized) {
        Classification::AfricanMemberState
    } else {
        Classification::DevelopmentPartner
    }
}

pub fn is_african_member_state(country: &str) -> bool {
    infer_classification(country) == Classification::AfricanMemberState
}

/// Canonical AU member names, sorted.
pub fn au_members() -> BTreeSet<&'static str> {
    AU_MEMBERS.iter().copied().collect()
}
