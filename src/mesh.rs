//! Grid point generation.
//!
//! Each [`MeshType`] lays out `num_elem + 1` node coordinates over
//! `[left, right]` together with the target spacing `dx` the layout is meant
//! to approximate. The boundary-layer layouts (`paper`, `bdry1`, `bdry2`,
//! `bdry3`) insert cells of width `ALPHA * dx` and derive both `dx` and the
//! cell count from the requested `n`.

use std::fmt;
use std::str::FromStr;

use log::debug;
use rand::Rng;

use crate::error::{GridError, GridResult};

/// Volume fraction of the deliberately thin boundary-layer cells.
pub const ALPHA: f64 = 1e-5;

/// Shape parameter of the `power` strategy's increment density `a x^(a-1)`.
pub const POWER_SHAPE: f64 = 0.25;

/// Point distribution strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeshType {
    Uniform,
    Rand,
    Perturb,
    Power,
    Paper,
    Bdry1,
    Bdry2,
    Bdry3,
    Load,
}

impl MeshType {
    pub const ALL: [MeshType; 9] = [
        Self::Uniform,
        Self::Rand,
        Self::Perturb,
        Self::Power,
        Self::Paper,
        Self::Bdry1,
        Self::Bdry2,
        Self::Bdry3,
        Self::Load,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::Rand => "rand",
            Self::Perturb => "perturb",
            Self::Power => "power",
            Self::Paper => "paper",
            Self::Bdry1 => "bdry1",
            Self::Bdry2 => "bdry2",
            Self::Bdry3 => "bdry3",
            Self::Load => "load",
        }
    }

    pub fn is_random(self) -> bool {
        matches!(self, Self::Rand | Self::Perturb | Self::Power)
    }

    /// Smallest `n` the layout accepts.
    pub fn min_elements(self) -> usize {
        match self {
            Self::Bdry1 | Self::Bdry2 => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for MeshType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MeshType {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mesh_type| mesh_type.name() == s)
            .ok_or_else(|| GridError::UnknownMeshType(s.to_string()))
    }
}

/// Node coordinates plus the spacing they approximate.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    nodes: Vec<f64>,
    dx: f64,
    mesh_type: MeshType,
}

impl Grid {
    pub fn new(nodes: Vec<f64>, dx: f64, mesh_type: MeshType) -> GridResult<Self> {
        if nodes.len() < 2 {
            return Err(GridError::TooFewNodes(nodes.len()));
        }
        if !(dx.is_finite() && dx > 0.0) {
            return Err(GridError::invalid_config(format!(
                "target spacing must be positive, got {dx}"
            )));
        }
        Ok(Self {
            nodes,
            dx,
            mesh_type,
        })
    }

    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    pub fn mesh_type(&self) -> MeshType {
        self.mesh_type
    }

    pub fn num_elem(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn left(&self) -> f64 {
        self.nodes[0]
    }

    pub fn right(&self) -> f64 {
        self.nodes[self.nodes.len() - 1]
    }
}

/// Lay out a grid of roughly `n` cells over `[left, right]`.
///
/// Random layouts draw from `rng`; pass a seeded generator for reproducible
/// grids. [`MeshType::Load`] is not a layout and is rejected.
pub fn generate<R: Rng + ?Sized>(
    mesh_type: MeshType,
    n: usize,
    left: f64,
    right: f64,
    rng: &mut R,
) -> GridResult<Grid> {
    if !(left.is_finite() && right.is_finite() && left < right) {
        return Err(GridError::invalid_config(format!(
            "domain bounds must be finite with left < right, got [{left}, {right}]"
        )));
    }
    if n < mesh_type.min_elements() {
        return Err(GridError::invalid_config(format!(
            "{mesh_type} needs at least {} elements, got {n}",
            mesh_type.min_elements()
        )));
    }

    let length = right - left;
    let (nodes, dx) = match mesh_type {
        MeshType::Uniform => {
            let dx = length / n as f64;
            (regular(left, dx, n + 1), dx)
        }
        // perturb shares the plain random draw
        MeshType::Rand | MeshType::Perturb => {
            let increments = (0..=n).map(|_| rng.gen::<f64>()).collect();
            (cumulative(increments, left, right), length / n as f64)
        }
        MeshType::Power => {
            let increments = (0..=n)
                .map(|_| rng.gen::<f64>().powf(1.0 / POWER_SHAPE))
                .collect();
            (cumulative(increments, left, right), length / n as f64)
        }
        MeshType::Paper => paper(n, left, right),
        MeshType::Bdry1 => {
            let dx = length / ((n - 1) as f64 + ALPHA);
            let mut nodes = Vec::with_capacity(n + 1);
            nodes.push(left);
            nodes.extend((0..n).map(|i| left + (i as f64 + ALPHA) * dx));
            (nodes, dx)
        }
        MeshType::Bdry2 => {
            let dx = length / ((n - 2) as f64 + 2.0 * ALPHA);
            let mut nodes = Vec::with_capacity(n + 1);
            nodes.push(left);
            nodes.extend((0..n - 1).map(|i| left + (i as f64 + ALPHA) * dx));
            nodes.push(right);
            (nodes, dx)
        }
        MeshType::Bdry3 => bdry3(n, left, right),
        MeshType::Load => {
            return Err(GridError::invalid_config(
                "load reads a saved grid and cannot generate one",
            ))
        }
    };

    let mut nodes = nodes;
    if let Some(last) = nodes.last_mut() {
        *last = right;
    }
    debug!(
        "generated {mesh_type} grid: {} cells, dx = {dx}",
        nodes.len() - 1
    );
    Grid::new(nodes, dx, mesh_type)
}

fn regular(start: f64, dx: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| start + i as f64 * dx).collect()
}

// First increment is dropped so the running sum starts at `left`.
fn cumulative(mut increments: Vec<f64>, left: f64, right: f64) -> Vec<f64> {
    increments[0] = 0.0;
    let mut sum = 0.0;
    for increment in increments.iter_mut() {
        sum += *increment;
        *increment = sum;
    }
    let total = sum;
    increments
        .into_iter()
        .map(|x| left + (right - left) * x / total)
        .collect()
}

// Two alpha cells flank a full cell centred on the midpoint.
fn paper(n: usize, left: f64, right: f64) -> (Vec<f64>, f64) {
    let dx = (right - left) / ((2 * n + 1) as f64 + 2.0 * ALPHA);
    let centre = 0.5 * (left + right);

    let mut nodes = Vec::with_capacity(2 * n + 4);
    nodes.extend(regular(left, dx, n + 1));
    nodes.push(centre - 0.5 * dx);
    nodes.push(centre + 0.5 * dx);
    nodes.extend(regular(centre + (ALPHA + 0.5) * dx, dx, n + 1));
    (nodes, dx)
}

// One alpha cell at the left wall and two inside the domain.
fn bdry3(n: usize, left: f64, right: f64) -> (Vec<f64>, f64) {
    let dx = (right - left) / ((2 * n + 1) as f64 + 3.0 * ALPHA);

    let mut nodes = Vec::with_capacity(2 * n + 5);
    nodes.push(left);
    nodes.extend(regular(left + ALPHA * dx, dx, n));

    let anchor = left + ALPHA * dx + n as f64 * dx;
    nodes.extend(
        [0.0, 1.0, 1.0 + ALPHA, 2.0 + ALPHA, 2.0 + 2.0 * ALPHA]
            .iter()
            .map(|offset| anchor + offset * dx),
    );

    let resume = anchor + (3.0 + 2.0 * ALPHA) * dx;
    nodes.extend(regular(resume, dx, n - 1));
    (nodes, dx)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::geometry::Cells;

    fn build(mesh_type: MeshType, n: usize, left: f64, right: f64) -> Grid {
        let mut rng = StdRng::seed_from_u64(7);
        generate(mesh_type, n, left, right, &mut rng).unwrap()
    }

    fn widths(grid: &Grid) -> Vec<f64> {
        Cells::from_nodes(grid.nodes()).unwrap().widths().to_vec()
    }

    #[test]
    fn parse_mesh_types() {
        for mesh_type in MeshType::ALL {
            assert_eq!(mesh_type.name().parse::<MeshType>().unwrap(), mesh_type);
        }
        assert!(matches!(
            "hex".parse::<MeshType>(),
            Err(GridError::UnknownMeshType(_))
        ));
    }

    #[test]
    fn uniform_grid() {
        let grid = build(MeshType::Uniform, 4, 0.0, 1.0);
        assert_eq!(grid.nodes(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(grid.dx(), 0.25);
        assert_eq!(grid.num_elem(), 4);
    }

    #[test]
    fn random_grids_span_domain() {
        for mesh_type in [MeshType::Rand, MeshType::Perturb, MeshType::Power] {
            let grid = build(mesh_type, 50, -2.0, 3.0);
            assert_eq!(grid.num_elem(), 50);
            assert_eq!(grid.left(), -2.0);
            assert_eq!(grid.right(), 3.0);
            assert_eq!(grid.dx(), 0.1);
            assert!(grid.nodes().windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn perturb_matches_rand() {
        let rand = build(MeshType::Rand, 20, 0.0, 1.0);
        let perturb = build(MeshType::Perturb, 20, 0.0, 1.0);
        assert_eq!(rand.nodes(), perturb.nodes());
    }

    #[test]
    fn paper_grid() {
        let grid = build(MeshType::Paper, 3, -1.0, 1.0);
        assert_eq!(grid.num_elem(), 9);
        let h = widths(&grid);
        let dx = grid.dx();
        assert!((dx - 2.0 / (7.0 + 2.0 * ALPHA)).abs() < 1e-15);
        for (i, width) in h.iter().enumerate() {
            let expected = if i == 3 || i == 5 { ALPHA * dx } else { dx };
            assert!((width - expected).abs() < 1e-12, "cell {i}: {width}");
        }
    }

    #[test]
    fn bdry1_grid() {
        let grid = build(MeshType::Bdry1, 5, 0.0, 1.0);
        assert_eq!(grid.num_elem(), 5);
        let h = widths(&grid);
        assert!((h[0] - ALPHA * grid.dx()).abs() < 1e-15);
        assert!(h[1..].iter().all(|w| (w - grid.dx()).abs() < 1e-12));
    }

    #[test]
    fn bdry2_grid() {
        let grid = build(MeshType::Bdry2, 5, 0.0, 1.0);
        assert_eq!(grid.num_elem(), 5);
        let h = widths(&grid);
        let dx = grid.dx();
        assert!((h[0] - ALPHA * dx).abs() < 1e-12);
        assert!((h[4] - ALPHA * dx).abs() < 1e-12);
        assert!(h[1..4].iter().all(|w| (w - dx).abs() < 1e-12));
    }

    #[test]
    fn bdry3_grid() {
        let grid = build(MeshType::Bdry3, 3, 0.0, 1.0);
        assert_eq!(grid.num_elem(), 10);
        let h = widths(&grid);
        let dx = grid.dx();
        let thin: Vec<usize> = (0..h.len()).filter(|&i| h[i] < 0.5 * dx).collect();
        assert_eq!(thin, vec![0, 5, 7]);
        assert!((h.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_configuration() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate(MeshType::Uniform, 4, 1.0, 1.0, &mut rng).is_err());
        assert!(generate(MeshType::Uniform, 0, 0.0, 1.0, &mut rng).is_err());
        assert!(generate(MeshType::Bdry2, 1, 0.0, 1.0, &mut rng).is_err());
        assert!(generate(MeshType::Load, 4, 0.0, 1.0, &mut rng).is_err());
        assert!(generate(MeshType::Uniform, 4, 0.0, f64::NAN, &mut rng).is_err());
    }

    #[test]
    fn grid_rejects_single_node() {
        assert!(matches!(
            Grid::new(vec![0.0], 1.0, MeshType::Uniform),
            Err(GridError::TooFewNodes(1))
        ));
        assert!(Grid::new(vec![0.0, 1.0], 0.0, MeshType::Uniform).is_err());
    }
}
