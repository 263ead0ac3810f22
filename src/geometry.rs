//! Cell geometry derived from grid nodes.

use num_traits::Float;

use crate::error::{GridError, GridResult};

/// Widths of the cells between consecutive grid nodes.
///
/// `widths[i] = x[i + 1] - x[i]`, so a grid of `n + 1` nodes yields `n`
/// cells whose widths sum to the domain length.
#[derive(Clone, Debug, PartialEq)]
pub struct Cells<F> {
    widths: Vec<F>,
}

impl<F: Float> Cells<F> {
    /// Derive cell widths from non-decreasing node coordinates.
    ///
    /// Zero-width cells are kept: random layouts can place two nodes on the
    /// same float, and such cells are simply undersized.
    pub fn from_nodes(nodes: &[F]) -> GridResult<Self> {
        if nodes.len() < 2 {
            return Err(GridError::TooFewNodes(nodes.len()));
        }

        let mut widths = Vec::with_capacity(nodes.len() - 1);
        for (index, pair) in nodes.windows(2).enumerate() {
            let width = pair[1] - pair[0];
            // also rejects NaN
            if !(width >= F::zero()) {
                return Err(GridError::Decreasing {
                    index,
                    prev: to_f64(pair[0]),
                    next: to_f64(pair[1]),
                });
            }
            widths.push(width);
        }

        Ok(Self { widths })
    }

    pub fn widths(&self) -> &[F] {
        &self.widths
    }

    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    pub fn total_length(&self) -> F {
        self.widths.iter().fold(F::zero(), |acc, &h| acc + h)
    }

    /// Smallest ratio `h[i] / dx` over all cells.
    ///
    /// Values near zero flag the thin cells that merging has to absorb.
    pub fn min_volume_fraction(&self, dx: F) -> F {
        self.widths
            .iter()
            .map(|&h| h / dx)
            .fold(F::infinity(), F::min)
    }

    pub fn thinnest(&self) -> Option<usize> {
        self.widths
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(index, _)| index)
    }
}

pub(crate) fn to_f64<F: Float>(value: F) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}
