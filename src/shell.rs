//! Radial-shell intersection: next crossing of a concentric sphere.

use nalgebra::Vector3;

/// How a radial hit changes the traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RadialCrossing {
    /// The ray crosses the voxel's inner shell; the radial index grows.
    Inward,
    /// The ray crosses the voxel's outer shell; the radial index shrinks.
    Outward,
    /// The ray grazes the inner shell; the radial direction reverses
    /// without an index change.
    Tangent,
}

/// The nearest radial shell crossing ahead of the current parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RadialHit {
    pub t: f64,
    pub crossing: RadialCrossing,
}

/// Solves `|rel_origin + t * direction|^2 = r_sq` for `t`.
///
/// Returns the two roots in ascending order, or `None` when the ray misses
/// the shell. Uses the half-b form of the quadratic, so a tangency shows up
/// as two equal (or nearly equal) roots.
pub(crate) fn shell_roots(
    rel_origin: &Vector3<f64>,
    direction: &Vector3<f64>,
    r_sq: f64,
) -> Option<(f64, f64)> {
    let a = direction.norm_squared();
    let h = -direction.dot(rel_origin);
    let c = rel_origin.norm_squared() - r_sq;

    let discriminant = h * h - a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();
    Some(((h - sqrtd) / a, (h + sqrtd) / a))
}

/// Finds the next radial shell crossing from inside a radial voxel.
///
/// The voxel is bounded by `inner_sq` (absent when the inner shell has zero
/// radius) and `outer_sq`. The inward/outward decision is re-derived from
/// the two quadratics each step instead of carrying a mutable direction
/// sign, which keeps tangencies from desynchronizing the walk. Roots not
/// strictly beyond `t_cur + epsilon` are discarded; an inner-shell double
/// root within `epsilon` is a grazing contact and reported as
/// [`RadialCrossing::Tangent`].
pub(crate) fn next_radial_hit(
    rel_origin: &Vector3<f64>,
    direction: &Vector3<f64>,
    inner_sq: Option<f64>,
    outer_sq: f64,
    t_cur: f64,
    epsilon: f64,
) -> Option<RadialHit> {
    let inner = inner_sq.and_then(|r_sq| {
        let (t0, t1) = shell_roots(rel_origin, direction, r_sq)?;
        if t0 <= t_cur + epsilon {
            // Either behind the ray, or the ray sits on (or numerically
            // within) the inner shell; the crossing belongs to another step.
            return None;
        }
        let crossing = if t1 - t0 <= epsilon {
            RadialCrossing::Tangent
        } else {
            RadialCrossing::Inward
        };
        Some(RadialHit { t: t0, crossing })
    });

    // From inside the outer shell, the only crossing ahead is the far root.
    let outer = shell_roots(rel_origin, direction, outer_sq).and_then(|(_, t1)| {
        (t1 > t_cur + epsilon).then_some(RadialHit {
            t: t1,
            crossing: RadialCrossing::Outward,
        })
    });

    match (inner, outer) {
        (Some(a), Some(b)) => Some(if a.t <= b.t { a } else { b }),
        (a, b) => a.or(b),
    }
}
