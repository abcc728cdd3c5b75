use std::ops::{Add, Div, Mul, Neg, Sub};

/// Unevaluated sum `hi + lo` of two doubles, giving roughly 106 bits of
/// mantissa.
///
/// Differences of two doubles are exact in this representation, which is
/// what the orientation and intersection predicates rely on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleDouble {
    hi: f64,
    lo: f64,
}

impl DoubleDouble {
    /// Creates a value from a single double.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self { hi: value, lo: 0.0 }
    }

    /// Exact difference `a - b`.
    #[must_use]
    pub fn diff(a: f64, b: f64) -> Self {
        let (hi, lo) = two_sum(a, -b);
        Self { hi, lo }
    }

    /// Exact product `a * b`.
    #[must_use]
    pub fn product(a: f64, b: f64) -> Self {
        let (hi, lo) = two_prod(a, b);
        Self { hi, lo }
    }

    /// Returns -1, 0 or 1 according to the sign of the value.
    #[must_use]
    pub fn signum(self) -> i32 {
        if self.hi > 0.0 {
            1
        } else if self.hi < 0.0 {
            -1
        } else if self.lo > 0.0 {
            1
        } else if self.lo < 0.0 {
            -1
        } else {
            0
        }
    }

    /// Rounds to the nearest double.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.hi + self.lo
    }
}

impl Add for DoubleDouble {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let (s, e) = two_sum(self.hi, rhs.hi);
        let (t, f) = two_sum(self.lo, rhs.lo);
        let (s, e) = quick_two_sum(s, e + t);
        let (hi, lo) = quick_two_sum(s, e + f);
        Self { hi, lo }
    }
}

impl Neg for DoubleDouble {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            hi: -self.hi,
            lo: -self.lo,
        }
    }
}

impl Sub for DoubleDouble {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl Mul for DoubleDouble {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let (p, e) = two_prod(self.hi, rhs.hi);
        let e = e + (self.hi * rhs.lo + self.lo * rhs.hi);
        let (hi, lo) = quick_two_sum(p, e);
        Self { hi, lo }
    }
}

impl Div for DoubleDouble {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        let q1 = self.hi / rhs.hi;
        let r = self - rhs * Self::new(q1);
        let q2 = r.hi / rhs.hi;
        let r = r - rhs * Self::new(q2);
        let q3 = r.hi / rhs.hi;
        let (hi, lo) = quick_two_sum(q1, q2);
        Self { hi, lo } + Self::new(q3)
    }
}

fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let bb = s - a;
    let err = (a - (s - bb)) + (b - bb);
    (s, err)
}

/// Requires `|a| >= |b|`.
fn quick_two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let err = b - (s - a);
    (s, err)
}

fn two_prod(a: f64, b: f64) -> (f64, f64) {
    let p = a * b;
    let err = a.mul_add(b, -p);
    (p, err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_is_exact() {
        let a = 1.0e16 + 2.0;
        let b = 1.0e-3;
        let d = DoubleDouble::diff(a, b);
        assert_eq!(d.hi + d.lo, a - b);
        assert!(d.lo != 0.0);
    }

    #[test]
    fn product_recovers_rounding_error() {
        let a = 1.0 + f64::EPSILON;
        let p = DoubleDouble::product(a, a);
        // (1 + e)^2 = 1 + 2e + e^2; e^2 is lost in a plain double product.
        assert_eq!(p.hi, 1.0 + 2.0 * f64::EPSILON);
        assert_eq!(p.lo, f64::EPSILON * f64::EPSILON);
    }

    #[test]
    fn signum_uses_low_part() {
        let tiny = DoubleDouble::new(1.0) - DoubleDouble::diff(1.0, 1e-300);
        assert_eq!(tiny.signum(), 1);
        assert_eq!((-tiny).signum(), -1);
        assert_eq!((DoubleDouble::new(2.0) - DoubleDouble::new(2.0)).signum(), 0);
    }

    #[test]
    fn mul_and_sub_of_exact_products() {
        let x = DoubleDouble::product(3.0, 7.0);
        let y = DoubleDouble::product(7.0, 3.0);
        assert_eq!((x - y).signum(), 0);
        assert_eq!((x * DoubleDouble::new(2.0)).to_f64(), 42.0);
    }

    #[test]
    fn division_keeps_extra_precision() {
        let third = DoubleDouble::new(1.0) / DoubleDouble::new(3.0);
        let back = third * DoubleDouble::new(3.0) - DoubleDouble::new(1.0);
        assert!(back.to_f64().abs() < 1e-30);
        assert_eq!((DoubleDouble::new(42.0) / DoubleDouble::new(6.0)).to_f64(), 7.0);
    }
}
