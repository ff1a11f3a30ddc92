// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod proximity;
pub mod scoring;
pub mod search;

pub use distance::{calculate_bounding_box, haversine_distance_m, is_within_bounding_box, meters_to_km};
pub use filters::{matches_gender, matches_text, SearchMode};
pub use proximity::nearby;
pub use scoring::match_score;
pub use search::SearchEngine;
