//! Axis-aligned box overlap tests
//!
//! Every collidable in a run (runner, hazards, gems) is an unrotated box
//! described by its centre and half-extents. Two boxes overlap when they are
//! separated on no axis.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::RUNNER_HALF_EXTENT;

/// Half-extents of an axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxExtent {
    /// Half-size along x
    pub width: f32,
    /// Half-size along y
    pub height: f32,
    /// Half-size along z
    pub depth: f32,
}

impl BoxExtent {
    pub const fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Extent of the runner's body
    pub const fn runner() -> Self {
        Self::new(
            RUNNER_HALF_EXTENT[0],
            RUNNER_HALF_EXTENT[1],
            RUNNER_HALF_EXTENT[2],
        )
    }

    /// True if every half-extent is strictly positive and finite
    pub fn is_valid(&self) -> bool {
        [self.width, self.height, self.depth]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }

    #[inline]
    fn as_vec3(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth)
    }
}

/// Check whether two boxes overlap
///
/// On each axis the centre distance must be strictly less than the sum of
/// half-extents. Boxes that only touch at a face do not overlap.
pub fn overlaps(center_a: Vec3, extent_a: BoxExtent, center_b: Vec3, extent_b: BoxExtent) -> bool {
    let gap = (center_a - center_b).abs();
    let reach = extent_a.as_vec3() + extent_b.as_vec3();
    gap.x < reach.x && gap.y < reach.y && gap.z < reach.z
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIT: BoxExtent = BoxExtent::new(1.0, 1.0, 1.0);

    #[test]
    fn test_overlap_concentric() {
        assert!(overlaps(Vec3::ZERO, UNIT, Vec3::ZERO, UNIT));
    }

    #[test]
    fn test_edge_touch_is_not_overlap() {
        // Centres 2 apart on x, half-extents sum to exactly 2
        assert!(!overlaps(Vec3::ZERO, UNIT, Vec3::new(2.0, 0.0, 0.0), UNIT));
        assert!(overlaps(Vec3::ZERO, UNIT, Vec3::new(1.999, 0.0, 0.0), UNIT));
    }

    #[test]
    fn test_separated_on_single_axis() {
        // Aligned on x and y, apart on z
        assert!(!overlaps(
            Vec3::new(0.0, 0.0, 0.0),
            UNIT,
            Vec3::new(0.0, 0.0, -5.0),
            UNIT
        ));
    }

    #[test]
    fn test_runner_under_barrier_while_sliding() {
        // Barrier centred at 2.5 with half-height 1 spans 1.5..3.5
        let barrier = BoxExtent::new(1.5, 1.0, 0.5);
        let barrier_pos = Vec3::new(0.0, 2.5, -10.0);
        let standing = Vec3::new(0.0, 1.0, -10.0);
        let sliding = Vec3::new(0.0, 0.3, -10.0);
        assert!(overlaps(standing, BoxExtent::runner(), barrier_pos, barrier));
        assert!(!overlaps(sliding, BoxExtent::runner(), barrier_pos, barrier));
    }

    #[test]
    fn test_extent_validity() {
        assert!(UNIT.is_valid());
        assert!(!BoxExtent::new(0.0, 1.0, 1.0).is_valid());
        assert!(!BoxExtent::new(1.0, -1.0, 1.0).is_valid());
        assert!(!BoxExtent::new(1.0, 1.0, f32::NAN).is_valid());
    }
}
