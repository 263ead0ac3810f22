//! Generate a one-dimensional grid, merge its small cells and save the result.
//!
//! ```text
//! gengrid -N 20 -L -1 -R 1 --meshtype paper --mergetype LRNP
//! gengrid -N 0 -L 0 -R 1 --meshtype load --mergetype LRNP --load grid_43
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use gengrid::logger::initialize_logger;
use gengrid::{GridConfig, MergeType, MergedGrid, MeshType};

/// Build a 1D grid and merge cells thinner than the target spacing.
#[derive(Parser, Debug)]
#[command(name = "gengrid")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Number of elements (layout dependent)
    #[arg(short = 'N', long = "num-elem")]
    num_elem: usize,

    /// Left endpoint
    #[arg(short = 'L', long, allow_negative_numbers = true)]
    left: f64,

    /// Right endpoint
    #[arg(short = 'R', long, allow_negative_numbers = true)]
    right: f64,

    /// Mesh type: uniform, rand, perturb, power, paper, bdry1, bdry2, bdry3 or load
    #[arg(long = "meshtype", alias = "MESHTYPE")]
    mesh_type: MeshType,

    /// Merge type: LRP (left/right periodic), LRNP (left/right non-periodic),
    /// LP (left periodic) or RP (right periodic)
    #[arg(long = "mergetype", alias = "MERGETYPE")]
    merge_type: MergeType,

    /// Stem of a saved grid to load (with --meshtype load)
    #[arg(long, alias = "LOAD", value_name = "STEM")]
    load: Option<PathBuf>,

    /// Seed for the random layouts
    #[arg(long)]
    seed: Option<u64>,

    /// Directory the grid files are written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Do not print the merge report
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn config(&self) -> GridConfig {
        let mut config = GridConfig::new(
            self.num_elem,
            self.left,
            self.right,
            self.mesh_type,
            self.merge_type,
        )
        .with_output_dir(&self.output_dir);
        if let Some(stem) = &self.load {
            config = config.with_load(stem);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

fn main() -> Result<()> {
    initialize_logger();
    let cli = Cli::parse();
    let config = cli.config();

    let merged = MergedGrid::build(&config).context("failed to build grid")?;
    if !cli.quiet {
        println!("{}\n", merged.report());
    }

    let files = merged
        .save(&config.output_dir)
        .context("failed to save grid")?;
    info!("done: {}", files.stem().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upper_case_flags() {
        let cli = Cli::try_parse_from([
            "gengrid", "-N", "0", "-L", "0", "-R", "1", "--MESHTYPE", "load", "--MERGETYPE",
            "LRP", "--LOAD", "grid_43",
        ])
        .unwrap();
        assert_eq!(cli.mesh_type, MeshType::Load);
        assert_eq!(cli.merge_type, MergeType::Lrp);
        assert_eq!(cli.config().load_stem(), Some(std::path::Path::new("grid_43")));
    }

    #[test]
    fn negative_endpoints() {
        let cli = Cli::try_parse_from([
            "gengrid", "-N", "20", "-L", "-1", "-R", "1", "--meshtype", "paper", "--mergetype",
            "LRNP",
        ])
        .unwrap();
        assert_eq!(cli.left, -1.0);
        assert_eq!(cli.mesh_type, MeshType::Paper);
        assert!(cli.load.is_none());
    }
}
