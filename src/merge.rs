//! Cell merging: every undersized cell claims enough neighbors to reach the
//! merging tolerance.
//!
//! A cell is *undersized* when `h[i] + 1e-10 < dx`. Its merge group is grown
//! outward one neighbor at a time, accumulating neighbor widths until the
//! accumulated length on a side reaches `tol` (`dx / 2` by default). Each
//! claimed neighbor has its overlap count bumped, so after a full pass
//! `overlaps[i]` is one plus the number of foreign groups containing `i`.
//!
//! Walks only read the widths, never the overlap counts, so the resulting
//! [`MergeMap`] does not depend on the order cells are merged in.

use std::fmt;
use std::str::FromStr;

use log::debug;
use num_traits::Float;

use crate::error::{GridError, GridResult};
use crate::geometry::to_f64;

/// Slack added to a cell width before comparing it against `dx`.
pub const SIZE_EPSILON: f64 = 1e-10;

/// Which neighbors an undersized cell may merge with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MergeType {
    Lrnp,
    Lrp,
    Lp,
    Rp,
}

impl MergeType {
    pub const ALL: [MergeType; 4] = [Self::Lrnp, Self::Lrp, Self::Lp, Self::Rp];

    pub fn name(self) -> &'static str {
        match self {
            Self::Lrnp => "LRNP",
            Self::Lrp => "LRP",
            Self::Lp => "LP",
            Self::Rp => "RP",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Lrnp => "left and right merging (not periodic)",
            Self::Lrp => "left and right merging (periodic)",
            Self::Lp => "left merging (periodic)",
            Self::Rp => "right merging (periodic)",
        }
    }

    pub fn is_periodic(self) -> bool {
        !matches!(self, Self::Lrnp)
    }

    fn walks_left(self) -> bool {
        !matches!(self, Self::Rp)
    }

    fn walks_right(self) -> bool {
        !matches!(self, Self::Lp)
    }
}

impl fmt::Display for MergeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MergeType {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|merge_type| merge_type.name() == s)
            .ok_or_else(|| GridError::UnknownMergeType(s.to_string()))
    }
}

/// Contiguous run of cells a cell merges across.
///
/// Stored as a start cell plus a cell count (self included) so a periodic
/// group that crosses the seam between the last and first cell stays
/// unambiguous. On tiny periodic grids the left and right walks may meet,
/// in which case `len` exceeds the number of cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MergeRange {
    pub start: usize,
    pub len: usize,
}

impl MergeRange {
    pub fn single(cell: usize) -> Self {
        Self {
            start: cell,
            len: 1,
        }
    }

    /// Last cell of the range, wrapped into `[0, num_elem)`.
    pub fn end(&self, num_elem: usize) -> usize {
        (self.start + self.len - 1) % num_elem
    }

    pub fn contains(&self, cell: usize, num_elem: usize) -> bool {
        let offset = (cell + num_elem - self.start % num_elem) % num_elem;
        offset < self.len
    }

    pub fn crosses_seam(&self, num_elem: usize) -> bool {
        self.start + self.len > num_elem
    }

    pub fn is_single(&self) -> bool {
        self.len == 1
    }
}

/// Per-cell merge ranges and overlap counts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeMap {
    ranges: Vec<MergeRange>,
    overlaps: Vec<usize>,
}

impl MergeMap {
    pub fn new(num_elem: usize) -> Self {
        Self {
            ranges: (0..num_elem).map(MergeRange::single).collect(),
            overlaps: vec![1; num_elem],
        }
    }

    pub fn num_elem(&self) -> usize {
        self.ranges.len()
    }

    pub fn ranges(&self) -> &[MergeRange] {
        &self.ranges
    }

    pub fn range(&self, cell: usize) -> MergeRange {
        self.ranges[cell]
    }

    pub fn overlaps(&self) -> &[usize] {
        &self.overlaps
    }

    /// Leftmost merged cell (`m[i]`).
    pub fn lower(&self, cell: usize) -> usize {
        self.ranges[cell].start
    }

    /// Rightmost merged cell (`M[i]`), wrapped for periodic groups.
    pub fn upper(&self, cell: usize) -> usize {
        self.ranges[cell].end(self.num_elem())
    }

    /// Number of cells that merged with at least one neighbor.
    pub fn undersized(&self) -> usize {
        self.ranges.iter().filter(|range| !range.is_single()).count()
    }

    pub fn total_overlaps(&self) -> usize {
        self.overlaps.iter().sum()
    }

    /// `(m[i], M[i], overlaps[i])` rows in ascending cell order.
    pub fn rows(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        (0..self.num_elem())
            .map(|cell| (self.lower(cell), self.upper(cell), self.overlaps[cell]))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

// One-sided neighbor walk starting next to `origin`.
#[derive(Debug)]
struct Walk<F> {
    side: Side,
    periodic: bool,
    num_elem: usize,
    next: Option<usize>,
    steps: usize,
    length: F,
}

impl<F: Float> Walk<F> {
    fn new(origin: usize, side: Side, periodic: bool, num_elem: usize) -> Self {
        let mut walk = Self {
            side,
            periodic,
            num_elem,
            next: None,
            steps: 0,
            length: F::zero(),
        };
        walk.next = walk.step_from(origin);
        walk
    }

    fn step_from(&self, cell: usize) -> Option<usize> {
        let n = self.num_elem;
        match (self.side, self.periodic) {
            (Side::Left, false) => cell.checked_sub(1),
            (Side::Right, false) => Some(cell + 1).filter(|&next| next < n),
            (Side::Left, true) => Some((cell + n - 1) % n),
            (Side::Right, true) => Some((cell + 1) % n),
        }
    }

    /// Claim neighbors until `length >= target`, the boundary is reached, or
    /// every other cell has been claimed.
    fn extend(&mut self, widths: &[F], target: F, overlaps: &mut [usize]) {
        while self.length < target && self.steps + 1 < self.num_elem {
            let Some(cell) = self.next else {
                break;
            };
            self.length = self.length + widths[cell];
            overlaps[cell] += 1;
            self.steps += 1;
            self.next = self.step_from(cell);
        }
    }
}

/// Merging engine over a fixed set of cell widths.
#[derive(Clone, Debug)]
pub struct Merger<'h, F> {
    widths: &'h [F],
    dx: F,
    tol: F,
    merge_type: MergeType,
}

impl<'h, F: Float> Merger<'h, F> {
    pub fn new(widths: &'h [F], dx: F, merge_type: MergeType) -> Self {
        let two = F::one() + F::one();
        Self {
            widths,
            dx,
            tol: dx / two,
            merge_type,
        }
    }

    pub fn with_tolerance(mut self, tol: F) -> Self {
        self.tol = tol;
        self
    }

    pub fn tolerance(&self) -> F {
        self.tol
    }

    pub fn merge_type(&self) -> MergeType {
        self.merge_type
    }

    pub fn num_elem(&self) -> usize {
        self.widths.len()
    }

    pub fn is_undersized(&self, cell: usize) -> bool {
        let epsilon: F = num_traits::cast(SIZE_EPSILON).unwrap_or_else(F::epsilon);
        self.widths[cell] + epsilon < self.dx
    }

    pub fn run(&self) -> GridResult<MergeMap> {
        self.check_convergence()?;

        let mut map = MergeMap::new(self.num_elem());
        for cell in 0..self.num_elem() {
            self.merge_cell(cell, &mut map)?;
        }
        Ok(map)
    }

    /// Reject periodic merges whose tolerance cannot be met without a walk
    /// wrapping back onto its own cell.
    pub fn check_convergence(&self) -> GridResult<()> {
        if !self.merge_type.is_periodic() {
            return Ok(());
        }

        let total = self.widths.iter().fold(F::zero(), |acc, &h| acc + h);
        for cell in (0..self.num_elem()).filter(|&cell| self.is_undersized(cell)) {
            let extent = total - self.widths[cell];
            if extent <= self.tol {
                return Err(GridError::ToleranceExceedsDomain {
                    cell,
                    tol: to_f64(self.tol),
                    extent: to_f64(extent),
                });
            }
        }
        Ok(())
    }

    /// Merge a single cell into `map`, bumping the overlap count of every
    /// neighbor it claims. Adequately sized cells are left untouched.
    ///
    /// A periodic walk that claims every other cell without reaching `tol`
    /// fails with `ToleranceExceedsDomain`; `map` is then left partially
    /// updated.
    pub fn merge_cell(&self, cell: usize, map: &mut MergeMap) -> GridResult<()> {
        let num_elem = self.num_elem();
        if map.num_elem() != num_elem {
            return Err(GridError::invalid_config(format!(
                "merge map has {} cells, grid has {num_elem}",
                map.num_elem()
            )));
        }
        if !self.is_undersized(cell) {
            return Ok(());
        }

        let periodic = self.merge_type.is_periodic();
        let mut left = Walk::new(cell, Side::Left, periodic, num_elem);
        let mut right = Walk::new(cell, Side::Right, periodic, num_elem);

        if self.merge_type.walks_left() {
            left.extend(self.widths, self.tol, &mut map.overlaps);
        }
        if self.merge_type.walks_right() {
            right.extend(self.widths, self.tol, &mut map.overlaps);
        }
        if !periodic {
            self.compensate(&mut left, &mut right, &mut map.overlaps);
        } else if let Some(short) = self.short_side(&left, &right) {
            // walk ran into the step cap
            return Err(GridError::ToleranceExceedsDomain {
                cell,
                tol: to_f64(self.tol),
                extent: to_f64(short.length),
            });
        }

        let start = (cell + num_elem - left.steps) % num_elem;
        map.ranges[cell] = MergeRange {
            start,
            len: left.steps + 1 + right.steps,
        };
        debug!(
            "merged cell {cell} ({} left, {} right) -> [{start}, {}]",
            left.steps,
            right.steps,
            map.ranges[cell].end(num_elem)
        );
        Ok(())
    }

    fn short_side<'w>(&self, left: &'w Walk<F>, right: &'w Walk<F>) -> Option<&'w Walk<F>> {
        if self.merge_type.walks_left() && left.length < self.tol {
            Some(left)
        } else if self.merge_type.walks_right() && right.length < self.tol {
            Some(right)
        } else {
            None
        }
    }

    // Second phase: when one side stopped at the boundary short of `tol`,
    // the other side resumes from its current bound under the same threshold.
    fn compensate(&self, left: &mut Walk<F>, right: &mut Walk<F>, overlaps: &mut [usize]) {
        if left.length < self.tol {
            right.extend(self.widths, self.tol, overlaps);
        }
        if right.length < self.tol {
            left.extend(self.widths, self.tol, overlaps);
        }
    }
}
