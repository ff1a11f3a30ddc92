use rand::Rng;

/// Calculate a match score (0-100) between a viewer's preference tags and a
/// target entity's tags.
///
/// Scoring formula:
/// ```text
/// score = round(100 * |viewer_tags ∩ target_tags| / |target_tags|)
/// ```
///
/// The denominator is the target's tag count: a sparsely-tagged target
/// whose tags are all covered by the viewer scores 100 even if the viewer
/// has many unrelated tags.
///
/// When either side has no tags there is nothing to compare, and the score
/// falls back to a filler drawn uniformly from [30, 50). The filler is a
/// cosmetic placeholder, not a compatibility signal.
pub fn match_score(viewer_tags: &[String], target_tags: &[String]) -> u8 {
    if viewer_tags.is_empty() || target_tags.is_empty() {
        return filler_score();
    }

    let common = target_tags
        .iter()
        .filter(|tag| viewer_tags.contains(tag))
        .count();

    ((common as f64 / target_tags.len() as f64) * 100.0).round() as u8
}

/// Filler score for entities with no comparable tags: uniform in [30, 50).
fn filler_score() -> u8 {
    rand::thread_rng().gen_range(30..50)
}
