//! Grid construction end to end: layout or load, cell widths, merging.

use std::fmt;
use std::path::Path;

use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::GridConfig;
use crate::error::GridResult;
use crate::geometry::Cells;
use crate::merge::{MergeMap, MergeType, Merger};
use crate::mesh::{self, Grid};
use crate::persist::{self, GridFiles, Metadata};

#[derive(Clone, Debug)]
pub struct MergedGrid {
    grid: Grid,
    cells: Cells<f64>,
    merge_type: MergeType,
    tol: f64,
    map: MergeMap,
}

impl MergedGrid {
    /// Generate (or load) the grid described by `config` and merge it.
    pub fn build(config: &GridConfig) -> GridResult<Self> {
        config.validate()?;

        if let Some(stem) = config.load_stem() {
            let loaded = persist::load_grid(&GridFiles::new(stem))?;
            info!(
                "loaded {} grid with {} cells from {}",
                loaded.grid.mesh_type(),
                loaded.grid.num_elem(),
                stem.display()
            );
            if loaded.merge_type != config.merge_type {
                warn!(
                    "saved merge type {} overrides requested {}",
                    loaded.merge_type, config.merge_type
                );
            }
            let merged = Self::from_grid(loaded.grid, loaded.merge_type)?;
            if merged.tol.to_bits() != loaded.tol.to_bits() {
                warn!(
                    "saved tolerance {} ignored, using dx / 2 = {}",
                    loaded.tol, merged.tol
                );
            }
            return Ok(merged);
        }

        let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        if config.mesh_type.is_random() {
            info!("{} layout seeded with {seed}", config.mesh_type);
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let grid = mesh::generate(
            config.mesh_type,
            config.num_elem,
            config.left,
            config.right,
            &mut rng,
        )?;
        Self::from_grid(grid, config.merge_type)
    }

    /// Merge an existing grid with tolerance `dx / 2`.
    pub fn from_grid(grid: Grid, merge_type: MergeType) -> GridResult<Self> {
        let cells = Cells::from_nodes(grid.nodes())?;
        let merger = Merger::new(cells.widths(), grid.dx(), merge_type);
        let tol = merger.tolerance();
        let map = merger.run()?;
        info!(
            "merged {} of {} cells ({merge_type})",
            map.undersized(),
            map.num_elem()
        );

        Ok(Self {
            grid,
            cells,
            merge_type,
            tol,
            map,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cells(&self) -> &Cells<f64> {
        &self.cells
    }

    pub fn merge_type(&self) -> MergeType {
        self.merge_type
    }

    pub fn tolerance(&self) -> f64 {
        self.tol
    }

    pub fn map(&self) -> &MergeMap {
        &self.map
    }

    pub fn metadata(&self) -> Metadata {
        Metadata {
            dx: self.grid.dx(),
            merge_type: self.merge_type,
            tol: self.tol,
            mesh_type: self.grid.mesh_type(),
        }
    }

    /// Save as `grid_<num_elem>.{dat,mdat,pdat}` inside `dir`.
    pub fn save(&self, dir: &Path) -> GridResult<GridFiles> {
        let files = GridFiles::for_elements(dir, self.grid.num_elem());
        persist::save(&files, &self.grid, &self.metadata(), &self.map)?;
        Ok(files)
    }

    pub fn report(&self) -> MergeReport {
        MergeReport {
            min_volume_fraction: self.cells.min_volume_fraction(self.grid.dx()),
            merge_type: self.merge_type,
            tol_fraction: self.tol / self.grid.dx(),
            undersized: self.map.undersized(),
            num_elem: self.map.num_elem(),
        }
    }
}

/// Console summary of a merge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MergeReport {
    pub min_volume_fraction: f64,
    pub merge_type: MergeType,
    pub tol_fraction: f64,
    pub undersized: usize,
    pub num_elem: usize,
}

impl fmt::Display for MergeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "###### MERGING META DATA ######")?;
        writeln!(f)?;
        writeln!(f, "min volume fraction {:.16e}", self.min_volume_fraction)?;
        writeln!(f, "merging type = {}", self.merge_type.description())?;
        writeln!(f, "merging tolerance {:.6}", self.tol_fraction)?;
        writeln!(f, "undersized cells {} of {}", self.undersized, self.num_elem)?;
        write!(f, "###### ----------------- #######")
    }
}
