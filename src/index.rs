use static_aabb2d_index::{StaticAABB2DIndex, StaticAABB2DIndexBuildError, StaticAABB2DIndexBuilder};

use crate::error::{GeometryError, Result};
use crate::geometry::Envelope;

/// Read-only packed R-tree over segment (or pixel) envelopes.
///
/// Query results are the insertion positions of the matching boxes. The
/// index is immutable once built and safe to query from several threads.
#[derive(Debug, Clone)]
pub struct SegmentIndex {
    index: StaticAABB2DIndex<f64>,
}

impl SegmentIndex {
    /// Builds the index over `envelopes`, keyed by their position.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if the index cannot be built,
    /// which happens only for envelopes with NaN bounds.
    pub fn new(envelopes: &[Envelope]) -> Result<Self> {
        let mut builder = StaticAABB2DIndexBuilder::new(envelopes.len());
        for env in envelopes {
            builder.add(env.min_x, env.min_y, env.max_x, env.max_y);
        }
        let index = builder.build().map_err(|e| match e {
            StaticAABB2DIndexBuildError::ItemCountError { .. } => {
                GeometryError::Degenerate("segment index item count mismatch".to_owned())
            }
            StaticAABB2DIndexBuildError::NumericCastError => {
                GeometryError::Degenerate(format!("segment index: {e}"))
            }
        })?;
        Ok(Self { index })
    }

    /// Positions of all boxes intersecting `env`, in no particular order.
    #[must_use]
    pub fn query(&self, env: &Envelope) -> Vec<usize> {
        if env.is_empty() {
            return Vec::new();
        }
        self.index.query(env.min_x, env.min_y, env.max_x, env.max_y)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.index.count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
