//! Circle geometry shared by every moving entity
//!
//! Everything in the arena is a circle: the player, enemies, plushies and
//! the trees. Collision response is "push the mover out along the line
//! between centers" and nothing more.

use glam::Vec2;

/// Anything with a circular collision footprint
pub trait Circle {
    fn center(&self) -> Vec2;
    fn radius(&self) -> f32;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// True iff the two circles strictly overlap
#[inline]
pub fn overlaps(a: &impl Circle, b: &impl Circle) -> bool {
    distance(a.center(), b.center()) < a.radius() + b.radius()
}

/// Push `pos` out to `min_dist` from `center` along the connecting line.
///
/// Returns `None` when `pos` is already far enough away, or when the two
/// points coincide (no direction to push in; left unresolved).
pub fn push_out(pos: Vec2, center: Vec2, min_dist: f32) -> Option<Vec2> {
    let offset = pos - center;
    let dist = offset.length();
    if dist < min_dist && dist > 0.0 {
        Some(center + offset / dist * min_dist)
    } else {
        None
    }
}

/// Resolve a mover of `radius` at `pos` against a solid circle.
///
/// The result sits on the obstacle's exclusion circle if the mover was
/// inside it, otherwise `pos` is returned unchanged.
#[inline]
pub fn resolve_circle_overlap(pos: Vec2, radius: f32, center: Vec2, obstacle_radius: f32) -> Vec2 {
    push_out(pos, center, radius + obstacle_radius).unwrap_or(pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct Disc(Vec2, f32);

    impl Circle for Disc {
        fn center(&self) -> Vec2 {
            self.0
        }
        fn radius(&self) -> f32 {
            self.1
        }
    }

    #[test]
    fn test_distance() {
        assert!((distance(Vec2::ZERO, Vec2::new(3.0, 4.0)) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_overlaps_is_strict() {
        let a = Disc(Vec2::ZERO, 10.0);
        let touching = Disc(Vec2::new(20.0, 0.0), 10.0);
        let inside = Disc(Vec2::new(19.0, 0.0), 10.0);
        assert!(!overlaps(&a, &touching));
        assert!(overlaps(&a, &inside));
    }

    #[test]
    fn test_resolve_pushes_to_exclusion_circle() {
        let resolved = resolve_circle_overlap(Vec2::new(10.0, 0.0), 22.0, Vec2::ZERO, 30.0);
        assert!((resolved.x - 52.0).abs() < 1e-4);
        assert!(resolved.y.abs() < 1e-4);
    }

    #[test]
    fn test_resolve_leaves_clear_mover_alone() {
        let pos = Vec2::new(100.0, 100.0);
        assert_eq!(resolve_circle_overlap(pos, 22.0, Vec2::ZERO, 30.0), pos);
    }

    #[test]
    fn test_coincident_centers_unresolved() {
        let pos = Vec2::new(5.0, 5.0);
        assert_eq!(resolve_circle_overlap(pos, 22.0, pos, 30.0), pos);
        assert!(push_out(pos, pos, 10.0).is_none());
    }

    proptest! {
        #[test]
        fn resolved_mover_never_penetrates(
            px in -200.0f32..200.0,
            py in -200.0f32..200.0,
            radius in 1.0f32..40.0,
            obstacle_radius in 1.0f32..40.0,
        ) {
            let pos = Vec2::new(px, py);
            prop_assume!(pos.length() > 1e-3);
            let resolved = resolve_circle_overlap(pos, radius, Vec2::ZERO, obstacle_radius);
            prop_assert!(resolved.length() >= radius + obstacle_radius - 1e-3);
        }
    }
}
