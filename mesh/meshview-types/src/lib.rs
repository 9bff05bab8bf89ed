//! Core geometry types for the meshview viewer.
//!
//! This crate provides the foundational types the mesh loader produces and
//! the renderer consumes:
//!
//! - [`Mesh`] - A triangle mesh as flat, GPU-ready attribute buffers
//! - [`Aabb`] - Axis-aligned bounding box
//!
//! # Buffer Layout
//!
//! All attribute buffers are flat `f32` sequences with three components per
//! vertex (`[x0, y0, z0, x1, y1, z1, ...]`), and indices are a flat `u32`
//! sequence with three entries per triangle. This is the layout vertex and
//! index buffers are uploaded in, so no repacking happens downstream.
//!
//! # Coordinate System
//!
//! Uses a **right-handed coordinate system** with counter-clockwise (CCW)
//! face winding when viewed from outside. Normals point outward by the
//! right-hand rule.
//!
//! # Example
//!
//! ```
//! use meshview_types::{Aabb, Mesh, Point3};
//!
//! // A single triangle in the XY plane
//! let positions = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
//! let normals = vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0];
//! let indices = vec![0, 1, 2];
//! let bounds = Aabb::from_points(
//!     [
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!     ]
//!     .iter(),
//! );
//!
//! let mesh = Mesh::from_parts(positions, normals, None, indices, bounds);
//! assert_eq!(mesh.vertex_count(), 3);
//! assert_eq!(mesh.face_count(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod mesh;

// Re-export core types
pub use bounds::Aabb;
pub use mesh::Mesh;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
