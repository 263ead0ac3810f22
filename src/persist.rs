//! Saving and loading grids.
//!
//! A saved grid is three plain text files sharing a stem:
//!
//! - `<stem>.dat`: node coordinates, one per line
//! - `<stem>.mdat`: `dx`, merge type, tolerance and mesh type, one per line
//! - `<stem>.pdat`: one `m M overlaps` row per cell
//!
//! Reals are written with the shortest representation that parses back to
//! the same bits.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{GridError, GridResult};
use crate::merge::{MergeMap, MergeType};
use crate::mesh::{Grid, MeshType};

/// Paths of the three files making up a saved grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridFiles {
    stem: PathBuf,
}

impl GridFiles {
    pub fn new(stem: impl Into<PathBuf>) -> Self {
        Self { stem: stem.into() }
    }

    /// `grid_<num_elem>` inside `dir`.
    pub fn for_elements(dir: impl AsRef<Path>, num_elem: usize) -> Self {
        Self::new(dir.as_ref().join(format!("grid_{num_elem}")))
    }

    pub fn stem(&self) -> &Path {
        &self.stem
    }

    pub fn nodes(&self) -> PathBuf {
        self.with_extension("dat")
    }

    pub fn metadata(&self) -> PathBuf {
        self.with_extension("mdat")
    }

    pub fn pairing(&self) -> PathBuf {
        self.with_extension("pdat")
    }

    // Appends rather than replaces, stems may contain dots.
    fn with_extension(&self, extension: &str) -> PathBuf {
        let mut path = self.stem.clone().into_os_string();
        path.push(".");
        path.push(extension);
        PathBuf::from(path)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metadata {
    pub dx: f64,
    pub merge_type: MergeType,
    pub tol: f64,
    pub mesh_type: MeshType,
}

/// A grid read back from disk together with its merge settings.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedGrid {
    pub grid: Grid,
    pub merge_type: MergeType,
    pub tol: f64,
}

pub fn write_nodes(path: &Path, nodes: &[f64]) -> GridResult<()> {
    let mut out = String::with_capacity(nodes.len() * 24);
    for x in nodes {
        // writing to a String cannot fail
        let _ = writeln!(out, "{x}");
    }
    write_file(path, &out)
}

pub fn write_metadata(path: &Path, metadata: &Metadata) -> GridResult<()> {
    let out = format!(
        "{}\n{}\n{}\n{}\n",
        metadata.dx, metadata.merge_type, metadata.tol, metadata.mesh_type
    );
    write_file(path, &out)
}

pub fn write_pairing(path: &Path, map: &MergeMap) -> GridResult<()> {
    let mut out = String::with_capacity(map.num_elem() * 12);
    for (lower, upper, overlaps) in map.rows() {
        let _ = writeln!(out, "{lower} {upper} {overlaps}");
    }
    write_file(path, &out)
}

pub fn save(
    files: &GridFiles,
    grid: &Grid,
    metadata: &Metadata,
    map: &MergeMap,
) -> GridResult<()> {
    write_metadata(&files.metadata(), metadata)?;
    write_nodes(&files.nodes(), grid.nodes())?;
    write_pairing(&files.pairing(), map)?;
    info!("saved grid to {}.{{dat,mdat,pdat}}", files.stem().display());
    Ok(())
}

pub fn read_nodes(path: &Path) -> GridResult<Vec<f64>> {
    let text = read_file(path)?;
    text.split_whitespace()
        .enumerate()
        .map(|(index, token)| {
            token.parse::<f64>().map_err(|err| {
                GridError::malformed(path, format!("token {index} `{token}`: {err}"))
            })
        })
        .collect()
}

pub fn read_metadata(path: &Path) -> GridResult<Metadata> {
    let text = read_file(path)?;
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() < 4 {
        return Err(GridError::malformed(
            path,
            format!("expected 4 tokens, found {}", tokens.len()),
        ));
    }

    let real = |index: usize, name: &str| {
        tokens[index]
            .parse::<f64>()
            .map_err(|err| GridError::malformed(path, format!("{name} `{}`: {err}", tokens[index])))
    };

    Ok(Metadata {
        dx: real(0, "dx")?,
        merge_type: tokens[1].parse()?,
        tol: real(2, "tolerance")?,
        mesh_type: tokens[3].parse()?,
    })
}

/// Read back a grid saved under `files`.
///
/// The pairing file is not needed; the loaded grid is merged afresh.
pub fn load_grid(files: &GridFiles) -> GridResult<LoadedGrid> {
    let metadata = read_metadata(&files.metadata())?;
    let nodes = read_nodes(&files.nodes())?;
    if nodes.len() < 2 {
        return Err(GridError::malformed(
            files.nodes(),
            format!("expected at least 2 nodes, found {}", nodes.len()),
        ));
    }
    debug!(
        "loaded {} nodes from {}",
        nodes.len(),
        files.nodes().display()
    );

    Ok(LoadedGrid {
        grid: Grid::new(nodes, metadata.dx, metadata.mesh_type)?,
        merge_type: metadata.merge_type,
        tol: metadata.tol,
    })
}

fn write_file(path: &Path, contents: &str) -> GridResult<()> {
    fs::write(path, contents).map_err(|err| GridError::io(path, err))
}

fn read_file(path: &Path) -> GridResult<String> {
    fs::read_to_string(path).map_err(|err| GridError::io(path, err))
}
