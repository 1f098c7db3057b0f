//! Angular half-plane intersection in a family's projection plane.
//!
//! Polar boundaries are half-planes through the Z axis, azimuthal
//! boundaries half-planes through the Y axis. Both reduce to 2D: project
//! the ray into the family's plane (XY for polar, XZ for azimuthal) and
//! intersect against the boundary's in-plane direction.

use nalgebra::Vector2;

use crate::grid::AngularPartition;

/// How an angular hit changes the traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AngularCrossing {
    /// The ray crosses into the adjacent wedge with this index.
    Step(usize),
    /// The hit lies on the family's central axis; the wedge on the far side
    /// is not adjacent and must be recomputed from the ray direction.
    ThroughAxis,
}

/// The nearest angular boundary crossing ahead of the current parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct AngularHit {
    pub t: f64,
    pub crossing: AngularCrossing,
}

/// Intersects the projected ray with one boundary half-plane.
///
/// `boundary` is the half-plane's in-plane direction `(cos θ, sin θ)`. The
/// hit must lie strictly beyond `t_cur` and on the boundary's own half of
/// the full plane (its antipode across the axis belongs to a different
/// wedge pair). Returns the parameter and whether the hit sits on the axis
/// itself.
fn half_plane_hit(
    rel_origin: &Vector2<f64>,
    direction: &Vector2<f64>,
    boundary: &Vector2<f64>,
    t_cur: f64,
    epsilon: f64,
) -> Option<(f64, bool)> {
    let normal = Vector2::new(-boundary.y, boundary.x);
    let denom = normal.dot(direction);
    if denom == 0.0 {
        // Parallel to the plane, or lying within it.
        return None;
    }
    let t = -normal.dot(rel_origin) / denom;
    if t <= t_cur + epsilon {
        return None;
    }
    let hit = rel_origin + direction * t;
    let side = boundary.dot(&hit);
    if side < -epsilon {
        return None;
    }
    Some((t, side <= epsilon))
}

/// Finds the next boundary crossing out of wedge `current`.
///
/// Only the wedge's own two boundaries can be crossed next; the lower
/// boundary leads to wedge `current - 1` and the upper to `current + 1`,
/// cyclically. A hit on the axis is reported as
/// [`AngularCrossing::ThroughAxis`] instead, since every boundary plane
/// meets there and the far-side wedge is determined by the ray direction.
pub(crate) fn next_angular_hit(
    rel_origin: &Vector2<f64>,
    direction: &Vector2<f64>,
    partition: &AngularPartition,
    current: usize,
    t_cur: f64,
    epsilon: f64,
) -> Option<AngularHit> {
    let sections = partition.sections();
    let upper = (current + 1) % sections;

    let classify = |hit: Option<(f64, bool)>, target: usize| {
        hit.map(|(t, on_axis)| AngularHit {
            t,
            crossing: if on_axis {
                AngularCrossing::ThroughAxis
            } else {
                AngularCrossing::Step(target)
            },
        })
    };

    let down = (current + sections - 1) % sections;
    let lower_hit = classify(
        half_plane_hit(
            rel_origin,
            direction,
            partition.boundary_dir(current),
            t_cur,
            epsilon,
        ),
        down,
    );
    let upper_hit = if upper == current {
        None
    } else {
        classify(
            half_plane_hit(
                rel_origin,
                direction,
                partition.boundary_dir(upper),
                t_cur,
                epsilon,
            ),
            upper,
        )
    };

    match (lower_hit, upper_hit) {
        (Some(a), Some(b)) => Some(if a.t <= b.t { a } else { b }),
        (a, b) => a.or(b),
    }
}
