//! SDF-based hit masks
//!
//! Sprites are not rectangles: a blade grazing the transparent corner of a
//! banana's bounding box must not cut it. Each cuttable shape is described by a
//! signed distance function in its own (unrotated) frame and the blade box is
//! tested against it.

use glam::Vec2;

use crate::rotate_degrees;

/// Share of the sprite box covered by the opaque part of the sprite
pub const MASK_FILL: f32 = 0.9;

/// Signed distance to a circle
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Approximate signed distance to an origin-centered ellipse.
///
/// Exact on the axes, slightly conservative elsewhere, which is plenty for
/// deciding whether a 10px blade touches a fruit.
pub fn sd_ellipse(p: Vec2, radii: Vec2) -> f32 {
    let k1 = (p / (radii * radii)).length();
    if k1 <= f32::EPSILON {
        return -radii.min_element();
    }
    let k0 = (p / radii).length();
    k0 * (k0 - 1.0) / k1
}

/// A sprite-shaped hit mask placed in the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitMask {
    /// Ellipse inscribed in the sprite box, rotated with the sprite
    Ellipse { center: Vec2, radii: Vec2, angle: f32 },
    /// Round pickups
    Circle { center: Vec2, radius: f32 },
}

impl HitMask {
    /// Mask for a rotated sprite of `size` centered at `center`
    pub fn for_sprite(center: Vec2, size: Vec2, angle: f32) -> Self {
        HitMask::Ellipse {
            center,
            radii: size * 0.5 * MASK_FILL,
            angle,
        }
    }

    /// Signed distance from a world point to the mask edge
    pub fn distance(&self, p: Vec2) -> f32 {
        match *self {
            HitMask::Ellipse {
                center,
                radii,
                angle,
            } => {
                let local = rotate_degrees(p - center, -angle);
                sd_ellipse(local, radii)
            }
            HitMask::Circle { center, radius } => sd_circle(p, center, radius),
        }
    }

    /// Whether an axis-aligned square (the blade) overlaps the mask.
    ///
    /// Uses the blade's inscribed radius past the corners and its box inside,
    /// so a touch along an edge counts but a near miss at a corner does not.
    pub fn overlaps_box(&self, box_center: Vec2, half: Vec2) -> bool {
        let d = self.distance(box_center);
        if d <= half.min_element() {
            return true;
        }
        // The center may be outside the mask while a blade corner is inside.
        [
            Vec2::new(-half.x, -half.y),
            Vec2::new(half.x, -half.y),
            Vec2::new(-half.x, half.y),
            Vec2::new(half.x, half.y),
        ]
        .iter()
        .any(|corner| self.distance(box_center + *corner) <= 0.0)
    }
}
