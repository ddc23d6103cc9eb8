use boid_shared::ArenaBounds;

use crate::Vector2D;

/// Direction pointing back into the arena, or `None` when `position` is inside.
pub fn boundary_avoidance(position: Vector2D, bounds: &ArenaBounds) -> Option<Vector2D> {
    boundary_avoidance_with_margin(position, bounds, 0.0)
}

/// Like [`boundary_avoidance`], but starts pushing `margin` units before the edge.
///
/// Each crossed side contributes a unit push along its axis, so a corner
/// yields a diagonal. If opposite sides cancel (an arena narrower than
/// twice the margin) there is no usable direction and `None` is returned.
pub fn boundary_avoidance_with_margin(
    position: Vector2D,
    bounds: &ArenaBounds,
    margin: f32,
) -> Option<Vector2D> {
    let mut push = Vector2D::zero();

    if position.x < bounds.left + margin {
        push.x += 1.0;
    }
    if position.x > bounds.right - margin {
        push.x -= 1.0;
    }
    if position.y < bounds.top + margin {
        push.y += 1.0;
    }
    if position.y > bounds.bottom - margin {
        push.y -= 1.0;
    }

    if push.magnitude() >= 1.0 {
        Some(push.normalize())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> ArenaBounds {
        ArenaBounds::new(100.0, 100.0, 500.0, 400.0)
    }

    #[test]
    fn test_inside_is_none() {
        assert_eq!(boundary_avoidance(Vector2D::new(300.0, 200.0), &bounds()), None);
        // exactly on the edge is still inside
        assert_eq!(boundary_avoidance(Vector2D::new(100.0, 400.0), &bounds()), None);
    }

    #[test]
    fn test_each_side_pushes_inward() {
        let b = bounds();
        assert_eq!(
            boundary_avoidance(Vector2D::new(50.0, 200.0), &b),
            Some(Vector2D::new(1.0, 0.0))
        );
        assert_eq!(
            boundary_avoidance(Vector2D::new(550.0, 200.0), &b),
            Some(Vector2D::new(-1.0, 0.0))
        );
        assert_eq!(
            boundary_avoidance(Vector2D::new(300.0, 50.0), &b),
            Some(Vector2D::new(0.0, 1.0))
        );
        assert_eq!(
            boundary_avoidance(Vector2D::new(300.0, 450.0), &b),
            Some(Vector2D::new(0.0, -1.0))
        );
    }

    #[test]
    fn test_corner_combines_both_axes() {
        let push = boundary_avoidance(Vector2D::new(50.0, 450.0), &bounds()).unwrap();
        let expected = core::f32::consts::FRAC_1_SQRT_2;
        assert!((push.x - expected).abs() < 1e-6);
        assert!((push.y + expected).abs() < 1e-6);
    }

    #[test]
    fn test_margin_starts_early() {
        let b = bounds();
        let near_left = Vector2D::new(110.0, 200.0);
        assert_eq!(boundary_avoidance(near_left, &b), None);
        assert_eq!(
            boundary_avoidance_with_margin(near_left, &b, 20.0),
            Some(Vector2D::new(1.0, 0.0))
        );
    }

    #[test]
    fn test_opposite_sides_cancel() {
        let narrow = ArenaBounds::new(0.0, 0.0, 10.0, 100.0);
        assert_eq!(
            boundary_avoidance_with_margin(Vector2D::new(5.0, 50.0), &narrow, 20.0),
            None
        );
    }
}
