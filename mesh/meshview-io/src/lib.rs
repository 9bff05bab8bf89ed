//! Mesh loading for the meshview viewer.
//!
//! This crate reads the viewer's ASCII PLY subset into [`meshview_types::Mesh`]
//! buffers ready for GPU upload. Two import modes are supported, sharing one
//! header parser:
//!
//! - [`ImportMode::Normals`] - per-vertex position + normal, read verbatim
//! - [`ImportMode::Colors`] - per-vertex position + color; normals are
//!   synthesized from face geometry under a selectable [`NormalPolicy`]
//!
//! Loading is a one-shot, synchronous, blocking operation. Every failure is
//! a typed [`IoError`], and a failed load always leaves the destination mesh
//! empty rather than partially populated.
//!
//! # Example
//!
//! ```no_run
//! use meshview_io::{load_ply, load_ply_into, LoadOptions};
//!
//! let mut mesh = load_ply("model.ply", LoadOptions::normals()).unwrap();
//!
//! // reload in place; previous buffers are fully replaced
//! load_ply_into(&mut mesh, "other.ply", LoadOptions::colors()).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod ply;

pub use error::{IoError, IoResult};
pub use ply::{
    load_ply, load_ply_into, ImportMode, LoadOptions, NormalPolicy, MAX_ELEMENT_COUNT,
    MAX_HEADER_LINES,
};
