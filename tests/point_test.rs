//! Tests for Point parsing and the truncated Euclidean distance

use proptest::prelude::*;
use rstest::rstest;

use tspdraw::domain::{distance, DomainError, Point};

// ============================================================
// Distance
// ============================================================

#[rstest]
#[case(Point::new(0, 0), Point::new(3, 4), 5)]
#[case(Point::new(0, 0), Point::new(10, 0), 10)]
#[case(Point::new(10, 0), Point::new(0, 10), 14)]
#[case(Point::new(-1, -1), Point::new(1, 1), 2)]
#[case(Point::new(7, 7), Point::new(7, 7), 0)]
fn given_two_points_when_measuring_then_distance_is_truncated(
    #[case] a: Point,
    #[case] b: Point,
    #[case] expected: u64,
) {
    assert_eq!(distance(a, b), expected);
    assert_eq!(a.distance(&b), expected);
}

proptest! {
    #[test]
    fn distance_is_symmetric(ax in -10_000i32..10_000, ay in -10_000i32..10_000,
                             bx in -10_000i32..10_000, by in -10_000i32..10_000) {
        let (a, b) = (Point::new(ax, ay), Point::new(bx, by));
        prop_assert_eq!(distance(a, b), distance(b, a));
    }

    #[test]
    fn distance_is_floor_of_sqrt(ax in -10_000i32..10_000, ay in -10_000i32..10_000,
                                 bx in -10_000i32..10_000, by in -10_000i32..10_000) {
        let d = distance(Point::new(ax, ay), Point::new(bx, by));
        let dx = i64::from(bx - ax);
        let dy = i64::from(by - ay);
        let squared = (dx * dx + dy * dy) as u64;
        prop_assert!(d * d <= squared);
        prop_assert!((d + 1) * (d + 1) > squared);
    }
}

// ============================================================
// Parsing
// ============================================================

#[rstest]
#[case("3,4", Point::new(3, 4))]
#[case(" -5 , 12 ", Point::new(-5, 12))]
#[case("0,0", Point::new(0, 0))]
fn given_valid_text_when_parsing_point_then_returns_point(
    #[case] text: &str,
    #[case] expected: Point,
) {
    assert_eq!(text.parse::<Point>().unwrap(), expected);
}

#[rstest]
#[case("3")]
#[case("3;4")]
#[case("a,4")]
#[case("3,4,5")]
fn given_malformed_text_when_parsing_point_then_invalid_point(#[case] text: &str) {
    let err = text.parse::<Point>().unwrap_err();
    assert_eq!(err, DomainError::InvalidPoint(text.to_string()));
}

#[test]
fn given_point_when_displayed_then_uses_parenthesized_pair() {
    assert_eq!(Point::new(-2, 9).to_string(), "(-2, 9)");
}
