//! Grid atlas construction.
//!
//! This module sizes a square grid for uniformly sized elements, composites
//! them into a shared canvas and derives the UV placement of each cell.

pub mod compositor;
pub mod layout;
pub mod sidecar;

pub use compositor::{compose, Canvas};
pub use layout::LayoutPlan;
pub use sidecar::{element_name, glyph_name, serialize_sidecar, sidecar_path};
