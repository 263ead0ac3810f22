//! Error types for grid generation, merging and persistence.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for grid operations.
pub type GridResult<T> = Result<T, GridError>;

/// Errors that can occur while building, merging or persisting a grid.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("unrecognized mesh type `{0}`")]
    UnknownMeshType(String),

    #[error("unrecognized merge type `{0}`")]
    UnknownMergeType(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("grid needs at least two nodes, got {0}")]
    TooFewNodes(usize),

    #[error("grid nodes must not decrease: x[{index}] = {prev}, x[{}] = {next}", .index + 1)]
    Decreasing {
        index: usize,
        prev: f64,
        next: f64,
    },

    #[error("tolerance {tol} exceeds domain extent {extent} available to cell {cell}")]
    ToleranceExceedsDomain {
        cell: usize,
        tol: f64,
        extent: f64,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed {}: {reason}", .path.display())]
    Malformed {
        path: PathBuf,
        reason: String,
    },
}

impl GridError {
    #[must_use]
    pub fn invalid_config(details: impl Into<String>) -> Self {
        Self::InvalidConfig(details.into())
    }

    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error stems from configuration rather than I/O or geometry.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::UnknownMeshType(_)
                | Self::UnknownMergeType(_)
                | Self::InvalidConfig(_)
                | Self::ToleranceExceedsDomain { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = GridError::UnknownMergeType("LR".into());
        assert!(format!("{err}").contains("`LR`"));

        let err = GridError::invalid_config("left must be below right");
        assert!(format!("{err}").contains("left must be below right"));

        let err = GridError::Decreasing {
            index: 3,
            prev: 1.0,
            next: 0.5,
        };
        assert!(format!("{err}").contains("x[4] = 0.5"));

        let err = GridError::malformed("grid_4.mdat", "expected 4 tokens");
        assert!(format!("{err}").contains("grid_4.mdat"));
    }

    #[test]
    fn config_classification() {
        assert!(GridError::UnknownMeshType("hex".into()).is_config());
        assert!(GridError::ToleranceExceedsDomain {
            cell: 0,
            tol: 1.0,
            extent: 0.5
        }
        .is_config());
        assert!(!GridError::TooFewNodes(1).is_config());
        let io = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert!(!GridError::io("grid_4.dat", io).is_config());
    }
}
