use thiserror::Error;

use crate::geometry::Coordinate;
use crate::operations::overlay::Strategy;

/// Top-level error type for overlay operations.
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

impl OverlayError {
    /// Returns `true` if a different precision strategy may succeed where
    /// this error was raised.
    ///
    /// Topology inconsistencies and invalid results are recoverable;
    /// degenerate input and an exhausted ladder are not.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Geometry(_) => false,
            Self::Topology(_) => true,
            Self::Operation(err) => matches!(err, OperationError::InvalidResult { .. }),
        }
    }

    /// Returns the coordinate the error was detected at, if known.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Self::Geometry(err) => err.coordinate(),
            Self::Topology(err) => err.coordinate(),
            Self::Operation(err) => err.coordinate(),
        }
    }
}

/// Degenerate input: caller contract violations that no precision
/// strategy can repair.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("non-finite coordinate ({x}, {y})")]
    NonFiniteCoordinate { x: f64, y: f64 },

    #[error("zero-length segment at ({x}, {y})")]
    ZeroLengthSegment { x: f64, y: f64 },

    #[error("heterogeneous geometry collections are not supported as overlay input")]
    MixedCollection,

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

impl GeometryError {
    fn coordinate(&self) -> Option<Coordinate> {
        match *self {
            Self::NonFiniteCoordinate { x, y } | Self::ZeroLengthSegment { x, y } => {
                Some(Coordinate::new(x, y))
            }
            Self::MixedCollection | Self::Degenerate(_) => None,
        }
    }
}

/// Topology inconsistencies detected while building or labelling the
/// overlay graph.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("side location conflict for input {geom_index} at ({x}, {y})")]
    SideLocationConflict { geom_index: usize, x: f64, y: f64 },

    #[error("found single null side for input {geom_index} at ({x}, {y})")]
    SingleNullSide { geom_index: usize, x: f64, y: f64 },

    #[error("non-noded intersection at ({x}, {y})")]
    NotNoded { x: f64, y: f64 },

    #[error("unable to assign free hole to a shell at ({x}, {y})")]
    FreeHole { x: f64, y: f64 },

    #[error("result ring is not closed at ({x}, {y})")]
    OpenRing { x: f64, y: f64 },

    #[error("half-edge not found: {0}")]
    EntityNotFound(&'static str),
}

impl TopologyError {
    fn coordinate(&self) -> Option<Coordinate> {
        match *self {
            Self::SideLocationConflict { x, y, .. }
            | Self::SingleNullSide { x, y, .. }
            | Self::NotNoded { x, y }
            | Self::FreeHole { x, y }
            | Self::OpenRing { x, y } => Some(Coordinate::new(x, y)),
            Self::EntityNotFound(_) => None,
        }
    }
}

/// Errors raised by the overlay operation as a whole.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid result geometry: {reason}")]
    InvalidResult {
        reason: String,
        location: Option<Coordinate>,
    },

    #[error("overlay failed after {attempts} attempts (last strategy: {last_strategy})")]
    RobustnessExhausted {
        last_strategy: Strategy,
        attempts: usize,
        location: Option<Coordinate>,
        #[source]
        source: Box<OverlayError>,
    },
}

impl OperationError {
    fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Self::InvalidResult { location, .. } | Self::RobustnessExhausted { location, .. } => {
                *location
            }
        }
    }
}

/// Convenience type alias for results using [`OverlayError`].
pub type Result<T> = std::result::Result<T, OverlayError>;
