//! Points, rectangles and compass directions on the integer field.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseDirectionError;

/// A position on the field.
pub type Point = glam::IVec2;

/// Inclusive axis-aligned integer rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub const fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// The square `[0, extent] x [0, extent]`.
    pub const fn square(extent: i32) -> Self {
        Self::new(Point::ZERO, Point::new(extent, extent))
    }

    /// Normalized rectangle spanned by two opposite corners.
    #[inline]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::new(a.min(b), a.max(b))
    }

    /// Check if a point lies inside, boundaries included.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        (self.min.x..=self.max.x).contains(&point.x) && (self.min.y..=self.max.y).contains(&point.y)
    }

    /// Check if two rectangles share at least one point.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        !(other.min.x > self.max.x
            || other.max.x < self.min.x
            || other.min.y > self.max.y
            || other.max.y < self.min.y)
    }

    /// Floor midpoint of the rectangle.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(
            self.min.x + (self.max.x - self.min.x) / 2,
            self.min.y + (self.max.y - self.min.y) / 2,
        )
    }
}

/// Cardinal movement direction. North is towards smaller `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    North,
    South,
    East,
    West,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::North, Step::East, Step::South, Step::West];

    /// The opposite direction.
    pub fn reverse(self) -> Self {
        match self {
            Step::North => Step::South,
            Step::South => Step::North,
            Step::East => Step::West,
            Step::West => Step::East,
        }
    }

    /// `point` moved `steps` units this way, or `None` on coordinate overflow.
    pub fn offset(self, point: Point, steps: u32) -> Option<Point> {
        let steps = i32::try_from(steps).ok()?;
        match self {
            Step::North => point.y.checked_sub(steps).map(|y| Point::new(point.x, y)),
            Step::South => point.y.checked_add(steps).map(|y| Point::new(point.x, y)),
            Step::East => point.x.checked_add(steps).map(|x| Point::new(x, point.y)),
            Step::West => point.x.checked_sub(steps).map(|x| Point::new(x, point.y)),
        }
    }

    fn letter(self) -> &'static str {
        match self {
            Step::North => "N",
            Step::South => "S",
            Step::East => "E",
            Step::West => "W",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

impl FromStr for Step {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" => Ok(Step::North),
            "S" => Ok(Step::South),
            "E" => Ok(Step::East),
            "W" => Ok(Step::West),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// Diagonal direction used by range queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Diagonal {
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Diagonal {
    pub const ALL: [Diagonal; 4] = [
        Diagonal::NorthEast,
        Diagonal::NorthWest,
        Diagonal::SouthEast,
        Diagonal::SouthWest,
    ];

    /// Whether this diagonal leans towards `step` (NE leans north and east).
    pub fn leans(self, step: Step) -> bool {
        matches!(
            (self, step),
            (Diagonal::NorthEast, Step::North | Step::East)
                | (Diagonal::NorthWest, Step::North | Step::West)
                | (Diagonal::SouthEast, Step::South | Step::East)
                | (Diagonal::SouthWest, Step::South | Step::West)
        )
    }

    /// Box between `anchor` and `anchor` pushed `distance` units this way.
    pub fn range(self, anchor: Point, distance: u32) -> Rect {
        let d = i32::try_from(distance).unwrap_or(i32::MAX);
        let x = if self.leans(Step::East) {
            anchor.x.saturating_add(d)
        } else {
            anchor.x.saturating_sub(d)
        };
        let y = if self.leans(Step::South) {
            anchor.y.saturating_add(d)
        } else {
            anchor.y.saturating_sub(d)
        };
        Rect::from_corners(anchor, Point::new(x, y))
    }
}

impl fmt::Display for Diagonal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Diagonal::NorthEast => "NE",
            Diagonal::NorthWest => "NW",
            Diagonal::SouthEast => "SE",
            Diagonal::SouthWest => "SW",
        })
    }
}

impl FromStr for Diagonal {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NE" => Ok(Diagonal::NorthEast),
            "NW" => Ok(Diagonal::NorthWest),
            "SE" => Ok(Diagonal::SouthEast),
            "SW" => Ok(Diagonal::SouthWest),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}
