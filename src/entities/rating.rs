const STAR: &str = "★";
const HALF_STAR: &str = " ½";

pub const MAX_RATING: f64 = 5.0;

/// Renders a rating as a run of stars, with a half-star suffix for any
/// fractional part. Ratings are clamped to `0..=5`; NaN renders as nothing.
pub fn format_stars(rating: f64) -> String {
    if rating.is_nan() {
        return String::new();
    }

    let rating = rating.clamp(0.0, MAX_RATING);
    let mut stars = STAR.repeat(rating.floor() as usize);

    if rating.fract() != 0.0 {
        stars.push_str(HALF_STAR);
    }

    stars
}

#[test]
fn formats_known_ratings() {
    let cases = [
        (0.0, ""),
        (1.0, "★"),
        (4.0, "★★★★"),
        (4.5, "★★★★ ½"),
        (0.5, " ½"),
    ];

    for (rating, expected) in cases {
        assert_eq!(format_stars(rating), expected, "rating {}", rating);
    }
}

#[test]
fn star_count_matches_whole_part() {
    for tenths in 0..=50 {
        let rating = tenths as f64 / 10.0;
        let stars = format_stars(rating);

        assert_eq!(stars.matches(STAR).count(), rating.floor() as usize);
        assert_eq!(stars.ends_with(HALF_STAR), rating.fract() != 0.0);
    }
}

#[test]
fn out_of_range_ratings_are_clamped() {
    assert_eq!(format_stars(1e19), "★★★★★");
    assert_eq!(format_stars(f64::INFINITY), "★★★★★");
    assert_eq!(format_stars(5.5), "★★★★★");
    assert_eq!(format_stars(-3.5), "");
    assert_eq!(format_stars(f64::NAN), "");
}
