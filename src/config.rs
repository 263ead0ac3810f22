//! Run configuration.

use std::path::{Path, PathBuf};

use crate::error::{GridError, GridResult};
use crate::merge::MergeType;
use crate::mesh::MeshType;

/// Everything needed to build, merge and save one grid.
#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    pub num_elem: usize,
    pub left: f64,
    pub right: f64,
    pub mesh_type: MeshType,
    pub merge_type: MergeType,
    /// Stem of a saved grid, required when `mesh_type` is `load`.
    pub load: Option<PathBuf>,
    /// Seed for the random layouts; drawn fresh when absent.
    pub seed: Option<u64>,
    pub output_dir: PathBuf,
}

impl GridConfig {
    pub fn new(
        num_elem: usize,
        left: f64,
        right: f64,
        mesh_type: MeshType,
        merge_type: MergeType,
    ) -> Self {
        Self {
            num_elem,
            left,
            right,
            mesh_type,
            merge_type,
            load: None,
            seed: None,
            output_dir: PathBuf::from("."),
        }
    }

    pub fn with_load(mut self, stem: impl Into<PathBuf>) -> Self {
        self.load = Some(stem.into());
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn load_stem(&self) -> Option<&Path> {
        match self.mesh_type {
            MeshType::Load => self.load.as_deref(),
            _ => None,
        }
    }

    pub fn validate(&self) -> GridResult<()> {
        if self.mesh_type == MeshType::Load {
            if self.load.is_none() {
                return Err(GridError::invalid_config(
                    "mesh type `load` needs a grid stem to load from",
                ));
            }
            return Ok(());
        }

        if !(self.left.is_finite() && self.right.is_finite()) {
            return Err(GridError::invalid_config(format!(
                "domain bounds must be finite, got [{}, {}]",
                self.left, self.right
            )));
        }
        if self.left >= self.right {
            return Err(GridError::invalid_config(format!(
                "left bound {} must be below right bound {}",
                self.left, self.right
            )));
        }
        let min = self.mesh_type.min_elements();
        if self.num_elem < min {
            return Err(GridError::invalid_config(format!(
                "{} needs at least {min} elements, got {}",
                self.mesh_type, self.num_elem
            )));
        }
        Ok(())
    }
}
