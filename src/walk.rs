//! The traversal driver: walking a ray through a spherical voxel grid.

use nalgebra::{Vector2, Vector3};
use tracing::{trace, warn};

use crate::error::TraversalError;
use crate::grid::SphericalVoxelGrid;
use crate::plane::{next_angular_hit, AngularCrossing};
use crate::ray::Ray;
use crate::shell::{next_radial_hit, shell_roots, RadialCrossing};
use crate::voxel::{SphericalVoxel, VoxelIntersection};

/// Relative tolerance for ray-parameter comparisons, scaled by the walk's
/// parameter range. One shared value keeps tie detection symmetric across
/// the radial, polar, and azimuthal step functions.
const PARAMETER_EPSILON: f64 = 1e-12;

/// Walks a ray through a spherical voxel grid.
///
/// Returns the ordered sequence of voxels the ray enters within
/// `[0, max_t]`, each paired with the parametric span `[t_enter, t_exit]`
/// spent inside it. Spans of consecutive records share boundaries exactly,
/// and the sequence is deterministic for fixed inputs. An empty vector
/// means the ray misses the sphere (or `max_t` stops short of it); that is
/// not an error.
///
/// At each step the driver computes the parametric distance to the next
/// radial shell, polar half-plane, and azimuthal half-plane, advances to
/// the smallest, and updates the voxel. Candidates that tie within the
/// walk's tolerance are applied together in a single step, so a record can
/// differ from its predecessor in two indices but never gets zero extent.
///
/// # Errors
///
/// Returns [`TraversalError::InvalidRayDirection`] for a zero or non-finite
/// direction (rays built with [`Ray::try_new`] cannot trigger this), and
/// [`TraversalError::Diverged`] if the walk fails to terminate within
/// `8 * (radial + polar + azimuthal)` steps.
///
/// # Example
///
/// ```
/// use sphere_walk::{walk_spherical_volume, Ray, SphereBound, SphericalVoxelGrid};
/// use nalgebra::{Point3, Vector3};
///
/// let grid =
///     SphericalVoxelGrid::new(SphereBound::full(4.0), 4, 4, 4, Point3::origin()).unwrap();
///
/// // A ray along the Z axis crosses every shell twice.
/// let ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
/// let records = walk_spherical_volume(&ray, &grid, 100.0).unwrap();
///
/// let radial: Vec<usize> = records.iter().map(|r| r.voxel.radial).collect();
/// assert_eq!(radial, [1, 2, 3, 4, 4, 3, 2, 1]);
///
/// // A ray that misses the sphere produces the empty sequence.
/// let miss = Ray::new(Point3::new(9.0, 9.0, 0.0), Vector3::new(0.0, 0.0, 1.0));
/// assert!(walk_spherical_volume(&miss, &grid, 100.0).unwrap().is_empty());
/// ```
#[allow(clippy::too_many_lines)]
pub fn walk_spherical_volume(
    ray: &Ray,
    grid: &SphericalVoxelGrid,
    max_t: f64,
) -> Result<Vec<VoxelIntersection>, TraversalError> {
    let direction = ray.direction;
    let dir_norm_sq = direction.norm_squared();
    if !dir_norm_sq.is_finite() || dir_norm_sq == 0.0 {
        return Err(TraversalError::InvalidRayDirection);
    }
    if max_t.is_nan() || max_t <= 0.0 {
        return Ok(Vec::new());
    }

    let rel_origin: Vector3<f64> = ray.origin - grid.center();

    // Entry and exit of the bounding sphere.
    let Some((t0, t1)) = shell_roots(&rel_origin, &direction, grid.max_radius_squared()) else {
        return Ok(Vec::new());
    };
    if t1 <= 0.0 {
        return Ok(Vec::new());
    }
    let mut t_enter = t0.max(0.0);
    let t_end = t1.min(max_t);
    let epsilon = PARAMETER_EPSILON * t_end.max(1.0);
    if t_enter + epsilon >= t_end {
        return Ok(Vec::new());
    }

    // A hollow grid's cavity is not part of the volume: a ray starting
    // inside it enters where it crosses the innermost shell outward.
    if grid.min_radius() > 0.0 {
        let entry_sq = (rel_origin + direction * t_enter).norm_squared();
        if entry_sq < grid.min_radius_squared() - grid.radius_epsilon() {
            match shell_roots(&rel_origin, &direction, grid.min_radius_squared()) {
                Some((_, cavity_exit)) if cavity_exit + epsilon < t_end => t_enter = cavity_exit,
                _ => return Ok(Vec::new()),
            }
        }
    }

    // Projections of the ray into the two angular families' planes.
    let polar_origin = Vector2::new(rel_origin.x, rel_origin.y);
    let polar_dir = Vector2::new(direction.x, direction.y);
    let azimuthal_origin = Vector2::new(rel_origin.x, rel_origin.z);
    let azimuthal_dir = Vector2::new(direction.x, direction.z);

    // Initial voxel. On the axis of an angular family the position carries
    // no angle; the direction of motion decides the wedge there, matching
    // the through-axis transition rule.
    let entry_rel = rel_origin + direction * t_enter;
    let moving_inward = direction.dot(&entry_rel) < 0.0;
    let geom_eps = grid.radius_epsilon();
    let polar_entry = Vector2::new(entry_rel.x, entry_rel.y);
    let azimuthal_entry = Vector2::new(entry_rel.x, entry_rel.z);
    let mut voxel = SphericalVoxel::new(
        grid.radial_voxel_from_distance_sq(entry_rel.norm_squared(), moving_inward),
        grid.polar_partition().locate(if polar_entry.norm_squared() > geom_eps {
            polar_entry
        } else {
            polar_dir
        }),
        grid.azimuthal_partition()
            .locate(if azimuthal_entry.norm_squared() > geom_eps {
                azimuthal_entry
            } else {
                azimuthal_dir
            }),
    );

    trace!(t_enter, t_end, ?voxel, "entering spherical grid");

    let sections =
        grid.radial_sections() + grid.polar_sections() + grid.azimuthal_sections();
    let limit = 8 * sections;
    let mut records = Vec::with_capacity(sections);
    let mut t_cur = t_enter;
    let mut span_start = t_enter;

    for _ in 0..limit {
        let (inner_sq, outer_sq) = grid.shell_bounds_squared(voxel.radial);
        let radial_hit =
            next_radial_hit(&rel_origin, &direction, inner_sq, outer_sq, t_cur, epsilon);
        let polar_hit = next_angular_hit(
            &polar_origin,
            &polar_dir,
            grid.polar_partition(),
            voxel.polar,
            t_cur,
            epsilon,
        );
        let azimuthal_hit = next_angular_hit(
            &azimuthal_origin,
            &azimuthal_dir,
            grid.azimuthal_partition(),
            voxel.azimuthal,
            t_cur,
            epsilon,
        );

        let mut t_min = f64::INFINITY;
        if let Some(hit) = &radial_hit {
            t_min = t_min.min(hit.t);
        }
        if let Some(hit) = &polar_hit {
            t_min = t_min.min(hit.t);
        }
        if let Some(hit) = &azimuthal_hit {
            t_min = t_min.min(hit.t);
        }

        // No candidate ahead, or the nearest one lies past the end of the
        // walk: close the final span and stop.
        if t_min >= t_end {
            if span_start + epsilon < t_end {
                records.push(VoxelIntersection::new(voxel, span_start, t_end));
            }
            return Ok(records);
        }

        // Apply every candidate tied with the minimum in one step.
        let mut next = voxel;
        let mut leaves_grid = false;
        if let Some(hit) = radial_hit {
            if hit.t - t_min <= epsilon {
                match hit.crossing {
                    RadialCrossing::Inward => {
                        if next.radial == grid.radial_sections() {
                            // Crossing the innermost shell into the cavity.
                            leaves_grid = true;
                        } else {
                            next.radial += 1;
                        }
                    }
                    RadialCrossing::Outward => {
                        if next.radial == 1 {
                            leaves_grid = true;
                        } else {
                            next.radial -= 1;
                        }
                    }
                    RadialCrossing::Tangent => {}
                }
            }
        }
        if let Some(hit) = polar_hit {
            if hit.t - t_min <= epsilon {
                next.polar = match hit.crossing {
                    AngularCrossing::Step(index) => index,
                    AngularCrossing::ThroughAxis => grid.polar_partition().locate(polar_dir),
                };
            }
        }
        if let Some(hit) = azimuthal_hit {
            if hit.t - t_min <= epsilon {
                next.azimuthal = match hit.crossing {
                    AngularCrossing::Step(index) => index,
                    AngularCrossing::ThroughAxis => {
                        grid.azimuthal_partition().locate(azimuthal_dir)
                    }
                };
            }
        }

        if leaves_grid {
            if span_start + epsilon < t_min {
                records.push(VoxelIntersection::new(voxel, span_start, t_min));
            }
            return Ok(records);
        }

        if next != voxel {
            records.push(VoxelIntersection::new(voxel, span_start, t_min));
            voxel = next;
            span_start = t_min;
        }
        // An event that changes nothing (a grazing contact with no angular
        // tie) is absorbed into the current span.
        t_cur = t_min;
    }

    warn!(limit, "spherical traversal exceeded its safety bound");
    Err(TraversalError::Diverged { limit })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    use crate::bound::SphereBound;

    use super::*;

    fn grid(bound: SphereBound, nr: usize, np: usize, na: usize) -> SphericalVoxelGrid {
        SphericalVoxelGrid::new(bound, nr, np, na, Point3::origin()).unwrap()
    }

    fn radial_sequence(records: &[VoxelIntersection]) -> Vec<usize> {
        records.iter().map(|r| r.voxel.radial).collect()
    }

    #[test]
    fn test_miss_returns_empty() {
        let grid = grid(SphereBound::full(1.0), 4, 4, 4);
        let ray = Ray::new(Point3::new(2.0, 2.0, 0.0), Vector3::new(0.0, 0.0, 1.0));
        let records = walk_spherical_volume(&ray, &grid, 100.0).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_sphere_behind_origin_returns_empty() {
        let grid = grid(SphereBound::full(1.0), 4, 4, 4);
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, 1.0));
        let records = walk_spherical_volume(&ray, &grid, 100.0).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_zero_or_negative_max_t_returns_empty() {
        let grid = grid(SphereBound::full(1.0), 2, 2, 2);
        let ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(walk_spherical_volume(&ray, &grid, 0.0).unwrap().is_empty());
        assert!(walk_spherical_volume(&ray, &grid, -3.0).unwrap().is_empty());
    }

    #[test]
    fn test_zero_direction_rejected() {
        let grid = grid(SphereBound::full(1.0), 2, 2, 2);
        let ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vector3::zeros());
        let result = walk_spherical_volume(&ray, &grid, 100.0);
        assert!(matches!(result, Err(TraversalError::InvalidRayDirection)));
    }

    #[test]
    fn test_axial_ray_crosses_every_shell_twice() {
        let grid = grid(SphereBound::full(4.0), 4, 4, 4);
        let ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let records = walk_spherical_volume(&ray, &grid, 100.0).unwrap();

        assert_eq!(radial_sequence(&records), [1, 2, 3, 4, 4, 3, 2, 1]);
        // Shell crossings sit at integer distances from the entry at t = 1.
        assert_relative_eq!(records[0].t_enter, 1.0, epsilon = 1e-9);
        assert_relative_eq!(records[7].t_exit, 9.0, epsilon = 1e-9);
        // The polar projection is degenerate for an axial ray; the index
        // never moves. The azimuthal index flips across the center.
        assert!(records.iter().all(|r| r.voxel.polar == records[0].voxel.polar));
        assert_eq!(records[3].voxel.azimuthal, 3);
        assert_eq!(records[4].voxel.azimuthal, 1);
    }

    #[test]
    fn test_axial_ray_spans_are_contiguous() {
        let grid = grid(SphereBound::full(4.0), 4, 4, 4);
        let ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let records = walk_spherical_volume(&ray, &grid, 100.0).unwrap();
        for pair in records.windows(2) {
            assert_eq!(pair[0].t_exit, pair[1].t_enter);
        }
        for record in &records {
            assert!(record.t_enter < record.t_exit);
        }
    }

    #[test]
    fn test_max_t_truncates_mid_sphere() {
        let grid = grid(SphereBound::full(4.0), 4, 4, 4);
        let ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let records = walk_spherical_volume(&ray, &grid, 5.5).unwrap();
        assert_eq!(radial_sequence(&records), [1, 2, 3, 4, 4]);
        assert_eq!(records.last().unwrap().t_exit, 5.5);
    }

    #[test]
    fn test_tangent_ray_is_empty() {
        // Grazes the outer shell at a single parameter: a record there
        // would have zero extent.
        let grid = grid(SphereBound::full(1.0), 4, 4, 4);
        let ray = Ray::new(Point3::new(0.0, 1.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let records = walk_spherical_volume(&ray, &grid, 100.0).unwrap();
        assert!(records.len() <= 2);
        assert!(records.is_empty());
    }

    #[test]
    fn test_inside_origin_ray() {
        let grid = grid(SphereBound::full(10.0), 2, 4, 4);
        let ray = Ray::new(Point3::origin(), Vector3::new(1.0, 0.0, 0.0));
        let records = walk_spherical_volume(&ray, &grid, 100.0).unwrap();

        assert_eq!(radial_sequence(&records), [2, 1]);
        assert_eq!(records[0].t_enter, 0.0);
        assert_relative_eq!(records[0].t_exit, 5.0, epsilon = 1e-9);
        assert_relative_eq!(records[1].t_exit, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_inside_origin_respects_max_t() {
        let grid = grid(SphereBound::full(10.0), 2, 4, 4);
        let ray = Ray::new(Point3::origin(), Vector3::new(1.0, 0.0, 0.0));
        let records = walk_spherical_volume(&ray, &grid, 7.0).unwrap();
        assert_eq!(radial_sequence(&records), [2, 1]);
        assert_eq!(records.last().unwrap().t_exit, 7.0);
    }

    #[test]
    fn test_interior_tangency_is_absorbed() {
        // Grazes the shell at radius 1 inside a radius-2 sphere. With a
        // single wedge per angular family nothing else changes at the
        // grazing parameter, so one span covers the whole chord.
        let grid = grid(SphereBound::full(2.0), 2, 1, 1);
        let ray = Ray::new(Point3::new(0.0, 1.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let records = walk_spherical_volume(&ray, &grid, 100.0).unwrap();

        assert_eq!(radial_sequence(&records), [1]);
        let chord = 2.0 * 3.0_f64.sqrt();
        assert_relative_eq!(records[0].extent(), chord, epsilon = 1e-9);
    }

    #[test]
    fn test_interior_tangency_splits_on_tied_angular_crossing() {
        // Same geometry, but with azimuthal wedges the grazing parameter
        // coincides with an azimuthal boundary crossing.
        let grid = grid(SphereBound::full(2.0), 2, 1, 4);
        let ray = Ray::new(Point3::new(0.0, 1.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let records = walk_spherical_volume(&ray, &grid, 100.0).unwrap();

        assert_eq!(radial_sequence(&records), [1, 1]);
        assert_eq!(records[0].voxel.azimuthal, 3);
        assert_eq!(records[1].voxel.azimuthal, 1);
        assert_relative_eq!(records[0].t_exit, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_polar_through_axis_jumps_two() {
        // A ray through the polar (Z) axis: the far-side wedge is not
        // adjacent, so a single magnitude-2 jump is correct.
        let grid = grid(SphereBound::full(10.0), 1, 4, 1);
        let ray = Ray::new(Point3::new(5.0, 5.0, 3.0), Vector3::new(-1.0, -1.0, 0.0));
        let records = walk_spherical_volume(&ray, &grid, 100.0).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].voxel.polar, 0);
        assert_eq!(records[1].voxel.polar, 2);
        assert_relative_eq!(records[0].t_exit, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_hollow_grid_ray_from_cavity() {
        let grid = grid(SphereBound::hollow(2.0, 10.0), 2, 4, 4);
        let ray = Ray::new(Point3::origin(), Vector3::new(1.0, 0.0, 0.0));
        let records = walk_spherical_volume(&ray, &grid, 100.0).unwrap();

        assert_eq!(radial_sequence(&records), [2, 1]);
        assert_relative_eq!(records[0].t_enter, 2.0, epsilon = 1e-9);
        assert_relative_eq!(records[0].t_exit, 6.0, epsilon = 1e-9);
        assert_relative_eq!(records[1].t_exit, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_hollow_grid_terminates_at_cavity() {
        let grid = grid(SphereBound::hollow(2.0, 10.0), 2, 4, 4);
        let ray = Ray::new(Point3::new(-20.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        let records = walk_spherical_volume(&ray, &grid, 100.0).unwrap();

        assert_eq!(radial_sequence(&records), [1, 2]);
        assert_relative_eq!(records[0].t_enter, 10.0, epsilon = 1e-9);
        assert_relative_eq!(records[1].t_exit, 18.0, epsilon = 1e-9);
    }

    #[test]
    fn test_offset_center() {
        let center = Point3::new(100.0, -50.0, 25.0);
        let grid = SphericalVoxelGrid::new(SphereBound::full(4.0), 4, 4, 4, center).unwrap();
        let ray = Ray::new(
            Point3::new(100.0, -50.0, 20.0),
            Vector3::new(0.0, 0.0, 1.0),
        );
        let records = walk_spherical_volume(&ray, &grid, 100.0).unwrap();
        assert_eq!(radial_sequence(&records), [1, 2, 3, 4, 4, 3, 2, 1]);
    }

    #[test]
    fn test_idempotence() {
        let grid = grid(SphereBound::full(4.0), 4, 8, 8);
        let ray = Ray::new(
            Point3::new(-6.0, 0.7, -1.3),
            Vector3::new(1.0, -0.1, 0.25),
        );
        let first = walk_spherical_volume(&ray, &grid, 100.0).unwrap();
        let second = walk_spherical_volume(&ray, &grid, 100.0).unwrap();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_all_records_inside_valid_index_ranges() {
        let grid = grid(SphereBound::full(4.0), 4, 8, 8);
        let ray = Ray::new(
            Point3::new(-6.0, 0.7, -1.3),
            Vector3::new(1.0, -0.1, 0.25),
        );
        let records = walk_spherical_volume(&ray, &grid, 100.0).unwrap();
        for record in &records {
            assert!(record.voxel.radial >= 1 && record.voxel.radial <= 4);
            assert!(record.voxel.polar < 8);
            assert!(record.voxel.azimuthal < 8);
        }
    }
}
