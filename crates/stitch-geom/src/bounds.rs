// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Design bounds, used for framing and physical size.

use glam::Vec3;

/// Axis-aligned bounding box of a stitch design.
///
/// Invariants:
/// - `min` components are less than or equal to `max` components.
/// - Values are device units (0.1 mm) unless the box was [`scaled`](Self::scaled).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    min: Vec3,
    max: Vec3,
}

impl Aabb {
    /// Constructs a box from two opposite corners in any order.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self { min: a.min(b), max: a.max(b) }
    }

    /// Returns the minimum corner.
    pub fn min(&self) -> Vec3 {
        self.min
    }

    /// Returns the maximum corner.
    pub fn max(&self) -> Vec3 {
        self.max
    }

    /// Edge lengths.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Uniformly scales the box about the origin (e.g. by [`crate::MODEL_SCALE`]).
    pub fn scaled(&self, s: f32) -> Self {
        Self::new(self.min * s, self.max * s)
    }

    /// Builds the minimal box containing all `points`; `None` if empty.
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        Some(rest.iter().fold(Self { min: *first, max: *first }, |acc, p| Self {
            min: acc.min.min(*p),
            max: acc.max.max(*p),
        }))
    }
}
