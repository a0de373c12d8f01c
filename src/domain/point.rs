//! Points on the drawing plane and the integer distance between them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Immutable 2-D coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    x: i32,
    y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn x(&self) -> i32 {
        self.x
    }

    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Truncated Euclidean distance to `other`: `floor(sqrt(dx² + dy²))`.
    pub fn distance(&self, other: &Point) -> u64 {
        distance(*self, *other)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Parses `X,Y` (whitespace around either number is ignored).
impl FromStr for Point {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| DomainError::InvalidPoint(s.to_string()))?;
        let x = x
            .trim()
            .parse::<i32>()
            .map_err(|_| DomainError::InvalidPoint(s.to_string()))?;
        let y = y
            .trim()
            .parse::<i32>()
            .map_err(|_| DomainError::InvalidPoint(s.to_string()))?;
        Ok(Point::new(x, y))
    }
}

/// Truncated Euclidean distance between two points.
///
/// Squares are taken in 128-bit space so the full `i32` coordinate range is
/// exact; the square root is the integer floor, not a float rounding.
pub fn distance(a: Point, b: Point) -> u64 {
    let dx = i64::from(b.x) - i64::from(a.x);
    let dy = i64::from(b.y) - i64::from(a.y);
    let squared = (dx as i128 * dx as i128 + dy as i128 * dy as i128) as u128;
    isqrt(squared)
}

/// Integer square root: largest `r` with `r * r <= n`.
fn isqrt(n: u128) -> u64 {
    if n == 0 {
        return 0;
    }
    // float estimate, then correct the last few ulps
    let mut r = (n as f64).sqrt() as u128;
    while r * r > n {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= n {
        r += 1;
    }
    r as u64
}
