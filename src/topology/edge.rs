use std::cmp::Ordering;
use std::collections::HashMap;

use super::label::{GeometryLabel, OverlayLabel};
use crate::error::{GeometryError, Result};
use crate::geometry::{CoordKey, Coordinate, Dimension};
use crate::noding::{EdgeSource, SegmentString};

/// A noded segment carrying the merged classification of every input
/// segment that coincides with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub orig: Coordinate,
    pub dest: Coordinate,
    pub label: OverlayLabel,
}

/// What one input geometry contributed to a merged edge.
#[derive(Debug, Clone, Copy, Default)]
struct Contribution {
    line: bool,
    /// Sum of depth deltas, relative to the merged edge's direction.
    depth_delta: i32,
    /// Some contributing ring was a shell.
    shell: bool,
}

/// Merges coincident noded segments into single edges.
///
/// Segments are matched by exact endpoint coordinates regardless of
/// direction. Contributions of different inputs are combined into one
/// label; contributions of the same input sum their depth deltas, and a
/// zero sum marks the edge as a collapse.
#[derive(Debug, Default)]
pub struct EdgeMerger {
    edges: Vec<(Coordinate, Coordinate, [Option<Contribution>; 2])>,
    index: HashMap<(CoordKey, CoordKey), usize>,
}

impl EdgeMerger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every segment of the noded strings.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroLengthSegment`] for a segment whose
    /// endpoints are equal.
    pub fn add_strings(&mut self, strings: &[SegmentString]) -> Result<()> {
        for s in strings {
            let source = s.source();
            for w in s.coords().windows(2) {
                self.add(w[0], w[1], &source)?;
            }
        }
        Ok(())
    }

    /// Adds one segment.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroLengthSegment`] if `a` equals `b`.
    pub fn add(&mut self, a: Coordinate, b: Coordinate, source: &EdgeSource) -> Result<()> {
        let (orig, dest, sign) = match a.compare_2d(&b) {
            Ordering::Less => (a, b, 1),
            Ordering::Greater => (b, a, -1),
            Ordering::Equal => {
                return Err(GeometryError::ZeroLengthSegment { x: a.x, y: a.y }.into());
            }
        };
        let key = (orig.key(), dest.key());
        let slot = match self.index.get(&key) {
            Some(&i) => i,
            None => {
                self.edges.push((orig, dest, [None, None]));
                self.index.insert(key, self.edges.len() - 1);
                self.edges.len() - 1
            }
        };
        let c = self.edges[slot].2[source.geom_index].get_or_insert_with(Contribution::default);
        match source.dimension {
            Dimension::Area => {
                c.depth_delta += sign * source.depth_delta;
                c.shell |= !source.is_hole;
            }
            Dimension::Line | Dimension::Point => c.line = true,
        }
        Ok(())
    }

    /// Number of distinct edges so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns the merged edges in first-seen order.
    #[must_use]
    pub fn into_edges(self) -> Vec<Edge> {
        self.edges
            .into_iter()
            .map(|(orig, dest, parts)| Edge {
                orig,
                dest,
                label: OverlayLabel::new(geometry_label(parts[0]), geometry_label(parts[1])),
            })
            .collect()
    }
}

fn geometry_label(part: Option<Contribution>) -> GeometryLabel {
    match part {
        None => GeometryLabel::default(),
        Some(c) if c.line => GeometryLabel::line(),
        Some(c) if c.depth_delta == 0 => GeometryLabel::collapse(!c.shell),
        Some(c) => GeometryLabel::boundary(c.depth_delta, !c.shell),
    }
}
