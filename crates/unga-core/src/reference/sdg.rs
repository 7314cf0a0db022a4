//! Sustainable Development Goal keyword tagging.

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use std::collections::BTreeSet;

/// Number of UN Sustainable Development Goals.
pub const SDG_COUNT: u8 = 17;

const DESCRIPTIONS: [&str; SDG_COUNT as usize] = [
    "No Poverty",
    "Zero Hunger",
    "Good Health and Well-being",
    "Quality Education",
    "Gender Equality",
    "Clean Water and Sanitation",
    "Affordable and Clean Energy",
    "Decent Work and Economic Growth",
    "Industry, Innovation and Infrastructure",
    "Reduced Inequalities",
    "Sustainable Cities and Communities",
    "Responsible Consumption and Production",
    "Climate Action",
    "Life Below Water",
    "Life on Land",
    "Peace, Justice and Strong Institutions",
    "Partnerships for the Goals",
];

/// Topic keywords per goal; the numbered references ("sdg 4", "goal 4", ...) are generated.
const TOPICS: [&[&str]; SDG_COUNT as usize] = [
    &["no poverty", "poverty eradication", "poverty reduction", "ending poverty", "eradicate poverty"],
    &["zero hunger", "hunger", "food security", "malnutrition", "undernourishment", "famine"],
    &[
        "good health", "well-being", "wellbeing", "health care", "universal health",
        "maternal health", "child health", "hiv/aids", "tuberculosis", "malaria",
        "non-communicable diseases",
    ],
    &[
        "quality education", "education", "learning", "literacy", "primary education",
        "secondary education", "tertiary education",
    ],
    &[
        "gender equality", "gender equity", "women's empowerment", "women empowerment",
        "girls' education", "violence against women", "gender-based violence",
        "gender discrimination",
    ],
    &[
        "clean water", "sanitation", "water and sanitation", "safe drinking water",
        "water scarcity", "water management",
    ],
    &[
        "affordable energy", "clean energy", "renewable energy", "energy access",
        "energy poverty", "solar energy", "wind energy", "hydroelectric",
    ],
    &[
        "decent work", "economic growth", "employment", "unemployment", "labor rights",
        "worker rights", "economic productivity", "job creation",
    ],
    &[
        "industry", "innovation", "infrastructure", "manufacturing", "technological development",
        "research and development", "rd&d", "r&d",
    ],
    &[
        "reduced inequalities", "inequality", "inequalities", "income inequality",
        "social inclusion", "migration", "refugees", "displacement",
    ],
    &[
        "sustainable cities", "sustainable communities", "urban development", "urbanization",
        "slums", "urban planning", "smart cities",
    ],
    &[
        "responsible consumption", "responsible production", "sustainable consumption",
        "sustainable production", "waste management", "recycling", "circular economy",
    ],
    &[
        "climate action", "climate change", "global warming", "greenhouse gases",
        "carbon emissions", "climate adaptation", "climate mitigation", "paris agreement",
    ],
    &[
        "life below water", "ocean", "marine", "sea", "marine conservation",
        "ocean acidification", "marine pollution", "overfishing", "coral reefs",
    ],
    &[
        "life on land", "biodiversity", "ecosystems", "deforestation", "desertification",
        "land degradation", "wildlife conservation", "forests",
    ],
    &[
        "peace", "justice", "strong institutions", "rule of law", "corruption", "transparency",
        "accountability", "human rights", "access to justice",
    ],
    &[
        "partnerships", "global partnership", "south-south cooperation", "triangular cooperation",
        "technology transfer", "capacity building", "trade", "finance", "debt",
    ],
];

const AFRICA_KEYWORDS: &[&str] = &[
    "africa", "african", "sub-saharan", "subsaharan", "north africa", "west africa",
    "east africa", "southern africa", "central africa", "african union", "au",
    "african development bank", "african continent", "continent of africa",
];

/// Keyword automaton plus the goal number for each pattern index.
struct SdgMatcher {
    automaton: AhoCorasick,
    goals: Vec<u8>,
}

static SDG_MATCHER: Lazy<SdgMatcher> = Lazy::new(|| {
    let mut patterns = Vec::new();
    let mut goals = Vec::new();
    for (idx, topics) in TOPICS.iter().enumerate() {
        let goal = idx as u8 + 1;
        let numbered = [
            format!("sdg {}", goal),
            format!("goal {}", goal),
            format!("sustainable development goal {}", goal),
        ];
        for pattern in numbered
            .into_iter()
            .chain(topics.iter().map(|t| t.to_string()))
        {
            patterns.push(pattern);
            goals.push(goal);
        }
    }

    let automaton = AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(&patterns)
        .expect("Failed to build SDG keyword matcher");
    SdgMatcher { automaton, goals }
});

static AFRICA_MATCHER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(AFRICA_KEYWORDS)
        .expect("Failed to build Africa keyword matcher")
});

/// Goals referenced in `text`, sorted and deduplicated.
///
/// Matching is plain substring matching, so "sdg 1" also fires inside "sdg 10".
pub fn extract_sdgs(text: &str) -> Vec<u8> {
    if text.is_empty() {
        return Vec::new();
    }
    let found: BTreeSet<u8> = SDG_MATCHER
        .automaton
        .find_overlapping_iter(text)
        .map(|m| SDG_MATCHER.goals[m.pattern().as_usize()])
        .collect();
    found.into_iter().collect()
}

/// "SDG 1, SDG 13" or "None mentioned".
pub fn format_sdgs(sdgs: &[u8]) -> String {
    if sdgs.is_empty() {
        return "None mentioned".to_string();
    }
    sdgs.iter()
        .map(|n| format!("SDG {}", n))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Short title for goal `n` (1-based).
pub fn sdg_description(n: u8) -> Option<&'static str> {
    match n {
        1..=SDG_COUNT => Some(DESCRIPTIONS[(n - 1) as usize]),
        _ => None,
    }
}

/// Whether `text` mentions Africa as a whole word or phrase.
pub fn detect_africa_mention(text: &str) -> bool {
    AFRICA_MATCHER
        .find_overlapping_iter(text)
        .any(|m| is_word_boundary(text, m.start(), m.end()))
}

fn is_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.map_or(false, char::is_alphanumeric) && !after.map_or(false, char::is_alphanumeric)
}
