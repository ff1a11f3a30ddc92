use crate::core::distance::{calculate_bounding_box, haversine_distance_m, is_within_bounding_box};
use crate::models::{Coordinates, Locatable};

/// Filter a collection down to entities with known coordinates within
/// `radius_m` of `origin`, ordered ascending by exact distance.
///
/// Entities without a valid coordinate pair are excluded outright, never
/// sorted to the end. A bounding-box pre-check skips the exact haversine
/// for obviously-distant entities. The sort is stable, so equidistant
/// entities keep their input order.
///
/// Returns each retained entity together with its distance in meters.
pub fn nearby<T: Locatable>(origin: Coordinates, radius_m: f64, items: Vec<T>) -> Vec<(T, f64)> {
    let bbox = calculate_bounding_box(origin, radius_m);

    let mut retained: Vec<(T, f64)> = items
        .into_iter()
        .filter_map(|item| {
            let coords = item.coordinates()?;
            if !is_within_bounding_box(coords, &bbox) {
                return None;
            }
            let distance_m = haversine_distance_m(origin, coords);
            (distance_m <= radius_m).then_some((item, distance_m))
        })
        .collect();

    retained.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    retained
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Spot {
        name: &'static str,
        lat: Option<f64>,
        lng: Option<f64>,
    }

    impl Locatable for Spot {
        fn coordinates(&self) -> Option<Coordinates> {
            Coordinates::from_pair(self.lat, self.lng)
        }
    }

    fn mumbai() -> Coordinates {
        Coordinates::new(19.0760, 72.8777)
    }

    #[test]
    fn excludes_entities_without_coordinates_at_any_radius() {
        let spots = vec![
            Spot { name: "no_coords", lat: None, lng: None },
            Spot { name: "half_coords", lat: Some(19.1), lng: None },
        ];
        let result = nearby(mumbai(), f64::MAX, spots);
        assert!(result.is_empty());
    }

    #[test]
    fn radius_cutoff_is_exact() {
        // (19.1000, 72.9000) is ~3.6km from (19.0760, 72.8777)
        let spots = vec![Spot { name: "andheri", lat: Some(19.1000), lng: Some(72.9000) }];
        let within = nearby(mumbai(), 10_000.0, spots);
        assert_eq!(within.len(), 1);
        assert_eq!(within[0].0.name, "andheri");

        let spots = vec![Spot { name: "andheri", lat: Some(19.1000), lng: Some(72.9000) }];
        let outside = nearby(mumbai(), 1_000.0, spots);
        assert!(outside.is_empty());
    }

    #[test]
    fn sorted_ascending_by_distance() {
        let spots = vec![
            Spot { name: "far", lat: Some(19.15), lng: Some(72.95) },
            Spot { name: "near", lat: Some(19.08), lng: Some(72.88) },
            Spot { name: "mid", lat: Some(19.10), lng: Some(72.90) },
        ];
        let result = nearby(mumbai(), 20_000.0, spots);
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].0.name, "near");
        assert_eq!(result[1].0.name, "mid");
        assert_eq!(result[2].0.name, "far");
        for pair in result.windows(2) {
            assert!(pair[0].1 <= pair[1].1, "distances must be non-decreasing");
        }
    }
}
