use crate::core::{
    distance::meters_to_km,
    filters::{matches_gender, matches_text, SearchMode},
    proximity::nearby,
    scoring::match_score,
};
use crate::models::{Gender, Listing, ScoredListing, ScoredSeeker, SeekerProfile};

/// Search orchestrator - applies the fixed filter composition and annotates
/// results with distance and match score.
///
/// # Pipeline
/// 1. Gender filter (exact enum match, applied first and independently)
/// 2. Exactly one of: proximity filter + ascending distance sort,
///    substring text match, or nothing
/// 3. Match-score annotation against the viewer's preference tags
#[derive(Debug, Clone)]
pub struct SearchEngine {
    radius_m: f64,
}

impl SearchEngine {
    /// Default proximity radius in kilometers.
    pub const DEFAULT_RADIUS_KM: f64 = 10.0;

    pub fn new(radius_km: f64) -> Self {
        Self { radius_m: radius_km * 1000.0 }
    }

    pub fn with_default_radius() -> Self {
        Self::new(Self::DEFAULT_RADIUS_KM)
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_m / 1000.0
    }

    /// Search room listings. Text mode matches the listing address; the
    /// match score compares the viewer's preference tags against the
    /// listing's highlight tags.
    pub fn search_listings(
        &self,
        listings: Vec<Listing>,
        gender: Gender,
        mode: &SearchMode,
        viewer_tags: &[String],
        radius_km_override: Option<f64>,
    ) -> Vec<ScoredListing> {
        let gendered: Vec<Listing> = listings
            .into_iter()
            .filter(|l| matches_gender(l.looking_for_gender, gender))
            .collect();

        let radius_m = radius_km_override.map_or(self.radius_m, |km| km * 1000.0);

        match mode {
            SearchMode::Proximity(origin) => nearby(*origin, radius_m, gendered)
                .into_iter()
                .map(|(listing, distance_m)| {
                    let score = match_score(viewer_tags, &listing.highlights);
                    ScoredListing {
                        listing,
                        distance_km: Some(meters_to_km(distance_m)),
                        match_score: score,
                    }
                })
                .collect(),
            SearchMode::Text(needle) => gendered
                .into_iter()
                .filter(|l| matches_text(&l.address, needle))
                .map(|listing| self.score_listing(listing, viewer_tags))
                .collect(),
            SearchMode::None => gendered
                .into_iter()
                .map(|listing| self.score_listing(listing, viewer_tags))
                .collect(),
        }
    }

    /// Search seeker profiles. Text mode matches the derived city; the
    /// match score compares the viewer's preference tags against the
    /// seeker's highlight tags.
    pub fn search_seekers(
        &self,
        seekers: Vec<SeekerProfile>,
        gender: Gender,
        mode: &SearchMode,
        viewer_tags: &[String],
        radius_km_override: Option<f64>,
    ) -> Vec<ScoredSeeker> {
        let gendered: Vec<SeekerProfile> = seekers
            .into_iter()
            .filter(|s| matches_gender(s.gender, gender))
            .collect();

        let radius_m = radius_km_override.map_or(self.radius_m, |km| km * 1000.0);

        match mode {
            SearchMode::Proximity(origin) => nearby(*origin, radius_m, gendered)
                .into_iter()
                .map(|(seeker, distance_m)| {
                    let score = match_score(viewer_tags, &seeker.highlights);
                    ScoredSeeker {
                        seeker,
                        distance_km: Some(meters_to_km(distance_m)),
                        match_score: score,
                    }
                })
                .collect(),
            SearchMode::Text(needle) => gendered
                .into_iter()
                .filter(|s| matches_text(&s.city, needle))
                .map(|seeker| self.score_seeker(seeker, viewer_tags))
                .collect(),
            SearchMode::None => gendered
                .into_iter()
                .map(|seeker| self.score_seeker(seeker, viewer_tags))
                .collect(),
        }
    }

    fn score_listing(&self, listing: Listing, viewer_tags: &[String]) -> ScoredListing {
        let score = match_score(viewer_tags, &listing.highlights);
        ScoredListing { listing, distance_km: None, match_score: score }
    }

    fn score_seeker(&self, seeker: SeekerProfile, viewer_tags: &[String]) -> ScoredSeeker {
        let score = match_score(viewer_tags, &seeker.highlights);
        ScoredSeeker { seeker, distance_km: None, match_score: score }
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::with_default_radius()
    }
}
