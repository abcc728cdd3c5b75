// Shared helpers for the overlay integration tests.
#![allow(dead_code)]

use geolis_overlay::geometry::IsValid;
use geolis_overlay::{Geometry, LinearRing, Polygon};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Geometry {
    Geometry::Polygon(Polygon::rectangle(x0, y0, x1, y1))
}

pub fn polygon(shell: &[(f64, f64)], holes: &[&[(f64, f64)]]) -> Geometry {
    Geometry::Polygon(Polygon::new(
        LinearRing::from_xy(shell),
        holes.iter().map(|h| LinearRing::from_xy(h)).collect(),
    ))
}

/// A small corpus of valid polygonal inputs used by the property tests.
pub fn polygon_corpus() -> Vec<Geometry> {
    vec![
        square(0.0, 0.0, 10.0, 10.0),
        square(5.0, 5.0, 15.0, 15.0),
        square(10.0, 0.0, 20.0, 10.0),
        polygon(
            &[(0.0, 0.0), (12.0, 0.0), (12.0, 12.0), (0.0, 12.0)],
            &[&[(3.0, 3.0), (3.0, 9.0), (9.0, 9.0), (9.0, 3.0)]],
        ),
        polygon(&[(-2.0, 4.0), (6.0, -3.0), (14.0, 6.0), (4.0, 13.0)], &[]),
        Geometry::MultiPolygon(vec![
            Polygon::rectangle(-5.0, -5.0, -1.0, -1.0),
            Polygon::rectangle(2.0, 2.0, 4.0, 4.0),
        ]),
    ]
}

pub fn assert_valid(g: &Geometry, label: &str) {
    if let Err(err) = IsValid::new(g).execute() {
        panic!("{label}: invalid result: {err}");
    }
}
