//! World coordinates and bounded scan regions.

use serde::{Deserialize, Serialize};

/// A tile in the simulation world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldPoint {
    /// West-east coordinate.
    pub x: i32,
    /// South-north coordinate.
    pub y: i32,
    /// Height level.
    pub plane: i32,
}

impl WorldPoint {
    /// Create a point.
    #[must_use]
    pub const fn new(x: i32, y: i32, plane: i32) -> Self {
        Self { x, y, plane }
    }

    /// Chebyshev distance to another point. Points on different planes are
    /// infinitely far apart (`i32::MAX`).
    #[must_use]
    pub fn distance_to(&self, other: &WorldPoint) -> i32 {
        if self.plane != other.plane {
            return i32::MAX;
        }
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Whether `other` is within `distance` tiles.
    #[must_use]
    pub fn is_within(&self, other: &WorldPoint, distance: i32) -> bool {
        self.distance_to(other) <= distance
    }
}

/// An inclusive rectangular region on one plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneBounds {
    /// Minimum x (inclusive).
    pub min_x: i32,
    /// Minimum y (inclusive).
    pub min_y: i32,
    /// Maximum x (inclusive).
    pub max_x: i32,
    /// Maximum y (inclusive).
    pub max_y: i32,
    /// Plane the region lies on.
    pub plane: i32,
}

impl SceneBounds {
    /// Square region of `radius` tiles around `center`.
    #[must_use]
    pub fn around(center: WorldPoint, radius: i32) -> Self {
        let radius = radius.max(0);
        Self {
            min_x: center.x - radius,
            min_y: center.y - radius,
            max_x: center.x + radius,
            max_y: center.y + radius,
            plane: center.plane,
        }
    }

    /// Whether the point lies inside the region.
    #[must_use]
    pub fn contains(&self, point: &WorldPoint) -> bool {
        point.plane == self.plane
            && (self.min_x..=self.max_x).contains(&point.x)
            && (self.min_y..=self.max_y).contains(&point.y)
    }
}
