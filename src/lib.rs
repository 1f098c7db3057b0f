//! Ray traversal over spherical voxel grids.
//!
//! This crate walks a ray through a sphere partitioned into radial shells,
//! polar wedges, and azimuthal wedges, producing the ordered sequence of
//! voxels the ray enters together with the parametric span spent in each.
//! It is the Amanatides & Woo fast voxel traversal (grid DDA) generalized
//! from Cartesian lattices to spherical coordinates.
//!
//! - [`SphericalVoxelGrid`] - immutable grid with precomputed shell radii
//!   and boundary trig tables
//! - [`SphereBound`] - radial and angular extent of the grid
//! - [`Ray`] - origin/direction primitive with validated construction
//! - [`walk_spherical_volume`] - the traversal itself
//! - [`SphericalVoxel`] and [`VoxelIntersection`] - the emitted records
//!
//! # Algorithm
//!
//! The walk starts at the ray's entry into the sphere (or at the ray origin
//! when it starts inside). Each step computes the parametric distance to
//! the next radial shell, the next polar half-plane, and the next azimuthal
//! half-plane, advances to the smallest, and updates the corresponding
//! index. Candidates that tie within tolerance are applied together in a
//! single step. The walk ends when the ray leaves the sphere, reaches the
//! caller's `max_t`, or would leave the valid radial range (hollow grids).
//!
//! # Coordinate Conventions
//!
//! Radial voxels are numbered from the outside in: index 1 touches the
//! outer bound, index `N_r` the inner bound. Polar wedges are bounded by
//! half-planes through the Z axis and indexed by angle in the XY plane;
//! azimuthal wedges are bounded by half-planes through the Y axis and
//! indexed by angle in the XZ plane. All angles are measured around the
//! grid center.
//!
//! # Example
//!
//! ```
//! use sphere_walk::{walk_spherical_volume, Ray, SphereBound, SphericalVoxelGrid};
//! use nalgebra::{Point3, Vector3};
//!
//! let grid = SphericalVoxelGrid::new(
//!     SphereBound::full(4.0),
//!     4, // radial sections
//!     8, // polar sections
//!     8, // azimuthal sections
//!     Point3::origin(),
//! )
//! .unwrap();
//!
//! let ray = Ray::try_new(
//!     Point3::new(-6.0, 0.5, 0.5),
//!     Vector3::new(1.0, 0.0, 0.0),
//! )
//! .unwrap();
//!
//! let records = walk_spherical_volume(&ray, &grid, 100.0).unwrap();
//! assert!(!records.is_empty());
//!
//! // A traversing ray enters and exits through the outermost shell.
//! assert_eq!(records.first().unwrap().voxel.radial, 1);
//! assert_eq!(records.last().unwrap().voxel.radial, 1);
//!
//! // Spans are contiguous and strictly increasing.
//! for pair in records.windows(2) {
//!     assert_eq!(pair[0].t_exit, pair[1].t_enter);
//! }
//! ```
//!
//! # Concurrency
//!
//! A walk is synchronous, allocation-bounded, and touches no shared mutable
//! state; a grid may be consulted by any number of concurrent walks. For a
//! fixed grid and ray the output is deterministic.

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod bound;
mod error;
mod grid;
mod plane;
mod ray;
mod shell;
mod voxel;
mod walk;

pub use bound::SphereBound;
pub use error::TraversalError;
pub use grid::SphericalVoxelGrid;
pub use ray::Ray;
pub use voxel::{SphericalVoxel, VoxelIntersection};
pub use walk::walk_spherical_volume;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
