//! Static reference data: country tables, AU membership, SDG keywords.

mod classify;
mod countries;
mod sdg;

pub use classify::{
    au_members, infer_classification, is_african_member_state, normalize_country_name,
    Classification,
};
pub use countries::{country_info, country_name, region_for_code, CountryInfo, UNKNOWN_REGION};
pub use sdg::{detect_africa_mention, extract_sdgs, format_sdgs, sdg_description, SDG_COUNT};
