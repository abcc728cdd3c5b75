use tracing::trace;

use super::clip::{LineLimiter, RingClipper};
use crate::error::{GeometryError, Result};
use crate::geometry::{Coordinate, Dimension, Envelope, Geometry, LineString, LinearRing, Polygon};
use crate::noding::{push_distinct, EdgeSource, SegmentString};

/// Reads the boundaries of the overlay inputs into segment strings ready
/// for noding.
///
/// Rings are tagged with the side their polygon's interior lies on; lines
/// carry no side information. With a clip envelope, rings are clipped and
/// lines limited to it first.
#[derive(Debug, Default)]
pub struct EdgeSourceBuilder {
    clip_env: Option<Envelope>,
    strings: Vec<SegmentString>,
}

impl EdgeSourceBuilder {
    #[must_use]
    pub fn new(clip_env: Option<Envelope>) -> Self {
        Self {
            clip_env,
            strings: Vec::new(),
        }
    }

    /// Adds the polygons and lines of `geometry` as input `geom_index`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFiniteCoordinate`] if any vertex has a
    /// NaN or infinite ordinate.
    pub fn add(&mut self, geometry: &Geometry, geom_index: usize) -> Result<()> {
        check_finite(geometry)?;
        let before = self.strings.len();
        let mut component = 0;
        for poly in geometry.polygons() {
            self.add_polygon(poly, geom_index, &mut component);
        }
        for line in geometry.line_strings() {
            self.add_line(line, geom_index, &mut component);
        }
        trace!(
            geom_index,
            strings = self.strings.len() - before,
            "edge source read input"
        );
        Ok(())
    }

    #[must_use]
    pub fn into_strings(self) -> Vec<SegmentString> {
        self.strings
    }

    fn add_polygon(&mut self, poly: &Polygon, geom_index: usize, component: &mut usize) {
        if self
            .clip_env
            .is_some_and(|env| RingClipper::new(env).is_clipped_completely(&poly.envelope()))
        {
            return;
        }
        self.add_ring(poly.exterior(), false, geom_index, component);
        for hole in poly.interiors() {
            self.add_ring(hole, true, geom_index, component);
        }
    }

    fn add_ring(&mut self, ring: &LinearRing, is_hole: bool, geom_index: usize, component: &mut usize) {
        let coords = self.clip_ring(ring);
        let coords = without_repeats(&coords);
        if coords.len() < 4 {
            return;
        }
        // Interior side follows from the orientation of the input ring,
        // not of the clipped one.
        let interior_on_right = ring.is_ccw() == is_hole;
        let source = EdgeSource {
            geom_index,
            component: *component,
            dimension: Dimension::Area,
            depth_delta: if interior_on_right { 1 } else { -1 },
            is_hole,
        };
        *component += 1;
        self.strings.push(SegmentString::new(coords, source));
    }

    fn clip_ring(&self, ring: &LinearRing) -> Vec<Coordinate> {
        match self.clip_env {
            Some(env) if !env.contains(&ring.envelope()) => RingClipper::new(env).clip(ring.coords()),
            _ => ring.coords().to_vec(),
        }
    }

    fn add_line(&mut self, line: &LineString, geom_index: usize, component: &mut usize) {
        let sections = match self.clip_env {
            Some(env) if !env.contains(&line.envelope()) => LineLimiter::new(env).limit(line.coords()),
            _ => vec![line.coords().to_vec()],
        };
        for section in sections {
            let coords = without_repeats(&section);
            if coords.len() < 2 {
                continue;
            }
            let source = EdgeSource {
                geom_index,
                component: *component,
                dimension: Dimension::Line,
                depth_delta: 0,
                is_hole: false,
            };
            self.strings.push(SegmentString::new(coords, source));
        }
        *component += 1;
    }
}

fn without_repeats(coords: &[Coordinate]) -> Vec<Coordinate> {
    let mut out = Vec::with_capacity(coords.len());
    for c in coords {
        push_distinct(&mut out, *c);
    }
    out
}

pub(crate) fn check_finite(geometry: &Geometry) -> Result<()> {
    let mut bad = None;
    geometry.for_each_coord(&mut |c| {
        if bad.is_none() && !c.is_finite() {
            bad = Some(*c);
        }
    });
    match bad {
        Some(c) => Err(GeometryError::NonFiniteCoordinate { x: c.x, y: c.y }.into()),
        None => Ok(()),
    }
}
