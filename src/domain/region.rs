//! Sampling rectangle for random point generation.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::point::Point;

/// Axis-aligned rectangle `[x, x + width) x [y, y + height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rejects empty or negative rectangles and ones whose far edge lies
    /// past `i32::MAX`.
    pub fn validate(&self) -> Result<(), DomainError> {
        let last_x = i64::from(self.x) + i64::from(self.width) - 1;
        let last_y = i64::from(self.y) + i64::from(self.height) - 1;
        let max = i64::from(i32::MAX);
        if self.width <= 0 || self.height <= 0 || last_x > max || last_y > max {
            return Err(DomainError::InvalidRegion {
                x: self.x,
                y: self.y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Number of distinct integer coordinates inside the rectangle.
    pub fn capacity(&self) -> u64 {
        if self.width <= 0 || self.height <= 0 {
            return 0;
        }
        self.width as u64 * self.height as u64
    }

    /// Uniform integer sample inside the rectangle. Caller validates first,
    /// so every sample is representable.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
        let x = i64::from(self.x) + rng.gen_range(0..i64::from(self.width));
        let y = i64::from(self.y) + rng.gen_range(0..i64::from(self.height));
        Point::new(to_coordinate(x), to_coordinate(y))
    }
}

fn to_coordinate(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x, self.y, self.width, self.height)
    }
}

/// Parses `X,Y,WIDTH,HEIGHT`. Size is not validated here.
impl FromStr for Region {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<i32> = s
            .split(',')
            .map(|p| p.trim().parse::<i32>())
            .collect::<Result<_, _>>()
            .map_err(|_| DomainError::InvalidRegionSpec(s.to_string()))?;
        match parts.as_slice() {
            [x, y, width, height] => Ok(Region::new(*x, *y, *width, *height)),
            _ => Err(DomainError::InvalidRegionSpec(s.to_string())),
        }
    }
}
