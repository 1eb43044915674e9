//! Weight-band animal labels for the two-leg pull overlays.

/// Bands in kilograms, upper bound inclusive.
const BANDS: [(f64, &str); 14] = [
    (66.2, "Koala"),
    (99.5, "Dog"),
    (132.8, "Kangaroo"),
    (166.2, "Gazelle"),
    (199.5, "Jaguar"),
    (232.8, "Panda"),
    (266.2, "Wild Hog"),
    (299.5, "Lion"),
    (332.8, "Tiger"),
    (366.2, "Gorilla"),
    (399.5, "Anaconda"),
    (432.8, "Alligator"),
    (466.2, "Grizzly"),
    (499.5, "Polar Bear"),
];

pub fn animal_for_weight(weight_kg: f64) -> &'static str {
    for (limit, name) in BANDS {
        if weight_kg <= limit {
            return name;
        }
    }
    "The Beast"
}

/// Overlay text shown under the chart; `None` hides the overlay.
pub fn overlay_text(weight_kg: f64) -> Option<String> {
    if weight_kg > 0.0 {
        Some(format!(
            "Du drar {weight_kg:.1} kg. Du är en {}!",
            animal_for_weight(weight_kg)
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_edges_are_inclusive() {
        assert_eq!(animal_for_weight(66.2), "Koala");
        assert_eq!(animal_for_weight(66.3), "Dog");
        assert_eq!(animal_for_weight(499.5), "Polar Bear");
        assert_eq!(animal_for_weight(499.6), "The Beast");
    }

    #[test]
    fn zero_weight_hides_the_overlay() {
        assert!(overlay_text(0.0).is_none());
        assert!(overlay_text(120.0).unwrap().contains("Kangaroo"));
    }
}
