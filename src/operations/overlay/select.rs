use std::fmt;

use crate::geometry::{Dimension, Location};

/// The type of overlay operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayOp {
    Intersection,
    Union,
    /// A minus B.
    Difference,
    SymDifference,
}

impl fmt::Display for OverlayOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Intersection => "intersection",
            Self::Union => "union",
            Self::Difference => "difference",
            Self::SymDifference => "symdifference",
        };
        f.write_str(name)
    }
}

/// Decides whether a region lies in the result, given its location with
/// respect to each input.
///
/// A boundary location counts as interior.
///
/// | A        | B        | Intersection | Union | Difference | SymDifference |
/// |----------|----------|--------------|-------|------------|---------------|
/// | interior | interior | keep         | keep  | discard    | discard       |
/// | interior | exterior | discard      | keep  | keep       | keep          |
/// | exterior | interior | discard      | keep  | discard    | keep          |
/// | exterior | exterior | discard      | discard | discard  | discard       |
#[must_use]
pub fn is_result_of_op(op: OverlayOp, loc0: Location, loc1: Location) -> bool {
    let in0 = loc0 != Location::Exterior;
    let in1 = loc1 != Location::Exterior;
    match op {
        OverlayOp::Intersection => in0 && in1,
        OverlayOp::Union => in0 || in1,
        OverlayOp::Difference => in0 && !in1,
        OverlayOp::SymDifference => in0 != in1,
    }
}

/// Dimension of the result of `op` on inputs of the given dimensions.
///
/// Used for empty results, which still carry a dimension.
#[must_use]
pub fn result_dimension(op: OverlayOp, dim0: Dimension, dim1: Dimension) -> Dimension {
    match op {
        OverlayOp::Intersection => dim0.min(dim1),
        OverlayOp::Union | OverlayOp::SymDifference => dim0.max(dim1),
        OverlayOp::Difference => dim0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use Location::{Boundary, Exterior, Interior};

    #[test]
    fn intersection_requires_both_inputs() {
        assert!(is_result_of_op(OverlayOp::Intersection, Interior, Interior));
        assert!(!is_result_of_op(OverlayOp::Intersection, Interior, Exterior));
        assert!(!is_result_of_op(OverlayOp::Intersection, Exterior, Interior));
    }

    #[test]
    fn union_keeps_either_input() {
        assert!(is_result_of_op(OverlayOp::Union, Exterior, Interior));
        assert!(is_result_of_op(OverlayOp::Union, Interior, Exterior));
        assert!(!is_result_of_op(OverlayOp::Union, Exterior, Exterior));
    }

    #[test]
    fn difference_keeps_a_outside_b() {
        assert!(is_result_of_op(OverlayOp::Difference, Interior, Exterior));
        assert!(!is_result_of_op(OverlayOp::Difference, Interior, Interior));
        assert!(!is_result_of_op(OverlayOp::Difference, Exterior, Interior));
    }

    #[test]
    fn symdifference_keeps_exactly_one() {
        assert!(is_result_of_op(OverlayOp::SymDifference, Interior, Exterior));
        assert!(is_result_of_op(OverlayOp::SymDifference, Exterior, Interior));
        assert!(!is_result_of_op(OverlayOp::SymDifference, Interior, Interior));
    }

    #[test]
    fn boundary_counts_as_interior() {
        assert!(is_result_of_op(OverlayOp::Intersection, Boundary, Interior));
        assert!(!is_result_of_op(OverlayOp::Difference, Interior, Boundary));
    }

    #[test]
    fn empty_result_dimension() {
        use Dimension::{Area, Line, Point};
        assert_eq!(result_dimension(OverlayOp::Intersection, Area, Line), Line);
        assert_eq!(result_dimension(OverlayOp::Union, Point, Area), Area);
        assert_eq!(result_dimension(OverlayOp::SymDifference, Line, Point), Line);
        assert_eq!(result_dimension(OverlayOp::Difference, Point, Area), Point);
    }
}
