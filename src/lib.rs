//! One-dimensional grid generation with small-cell merging.
//!
//! A grid is laid out over `[left, right]` by one of several point
//! distributions ([`MeshType`]), its cell widths are derived ([`Cells`]),
//! and every cell thinner than the target spacing `dx` is merged with enough
//! neighbors to gather `dx / 2` of supporting length ([`Merger`]). The result
//! is a per-cell [`MergeMap`] of merge ranges and overlap counts, suitable
//! for finite-volume solvers that cannot tolerate arbitrarily small cells.
//!
//! ```
//! use gengrid::{Cells, MergeRange, MergeType, Merger};
//!
//! let cells = Cells::from_nodes(&[0.0, 1.0, 2.0, 2.1, 3.1, 4.1]).unwrap();
//! let map = Merger::new(cells.widths(), 1.0, MergeType::Lrnp).run().unwrap();
//! assert_eq!(map.range(2), MergeRange { start: 1, len: 3 });
//! assert_eq!(map.overlaps(), &[1, 2, 1, 2, 1]);
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod logger;
pub mod merge;
pub mod mesh;
pub mod persist;
pub mod pipeline;

pub use crate::config::GridConfig;
pub use crate::error::{GridError, GridResult};
pub use crate::geometry::Cells;
pub use crate::merge::{MergeMap, MergeRange, MergeType, Merger};
pub use crate::mesh::{generate, Grid, MeshType};
pub use crate::persist::{load_grid, GridFiles, LoadedGrid};
pub use crate::pipeline::{MergeReport, MergedGrid};
