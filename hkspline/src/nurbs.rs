//! Knot span search and basis evaluation for byte-valued knot vectors.
//!
//! Follows algorithms A2.1 and A2.2 of *The NURBS Book* (2nd ed.). Control points are
//! blended affinely; quaternion control points are summed component-wise.

use crate::Quaternion;

/// Highest degree the fixed basis buffer can represent.
pub const MAX_DEGREE: usize = 4;

const BASIS_LEN: usize = MAX_DEGREE + 1;

/// A value that can be blended by basis weights.
pub trait ControlPoint: Copy {
    const ZERO: Self;

    /// Returns `self + point * weight`.
    fn weighted_add(self, point: Self, weight: f32) -> Self;
}

impl ControlPoint for f32 {
    const ZERO: Self = 0.0;

    #[inline]
    fn weighted_add(self, point: Self, weight: f32) -> Self {
        self + point * weight
    }
}

impl ControlPoint for Quaternion {
    const ZERO: Self = Quaternion::ZERO;

    #[inline]
    fn weighted_add(self, point: Self, weight: f32) -> Self {
        self + point * weight
    }
}

/// Finds the span `i` with `knots[i] <= frame < knots[i + 1]`.
///
/// Frames at or past `knots[control_point_count]` clamp to the last span, frames below
/// `knots[degree]` to the first, which also keeps the search bounded.
///
/// Requires `knots.len() > control_point_count` and `control_point_count > degree`. Panics
/// on shorter slices.
pub fn find_knot_span(degree: usize, frame: f32, control_point_count: usize, knots: &[u8]) -> usize {
    let knot = |i: usize| knots[i] as f32;

    if frame >= knot(control_point_count) {
        return control_point_count - 1;
    }
    if frame < knot(degree) {
        return degree;
    }

    let mut low = degree;
    let mut high = control_point_count;
    let mut mid = (low + high) / 2;

    while frame < knot(mid) || frame >= knot(mid + 1) {
        if frame < knot(mid) {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2;
    }

    mid
}

/// Basis functions `N[span-degree..=span]` at `frame`, stored reversed (`N[i]` weights
/// control point `span - i`).
///
/// Requires `degree <= MAX_DEGREE`, `span >= degree` and `knots.len() > span + degree`; a
/// span returned by [`find_knot_span`] for a knot vector of `count + degree + 1` bytes
/// satisfies this. Panics on shorter slices.
pub fn basis_functions(span: usize, degree: usize, frame: f32, knots: &[u8]) -> [f32; BASIS_LEN] {
    debug_assert!(degree <= MAX_DEGREE);
    let mut n = [1.0f32, 0.0, 0.0, 0.0, 0.0];

    for i in 1..=degree {
        for j in (0..i).rev() {
            let lo = knots[span - j] as f32;
            let hi = knots[span + i - j] as f32;
            let a = (frame - lo) / (hi - lo);
            let tmp = n[j] * a;
            n[j + 1] += n[j] - tmp;
            n[j] = tmp;
        }
    }

    n
}

/// Blends `control_points[span-degree..=span]` by the basis at `frame`.
///
/// Same requirements as [`basis_functions`], plus `control_points.len() > span`. Panics on
/// shorter slices.
pub fn evaluate<T: ControlPoint>(
    span: usize,
    degree: usize,
    frame: f32,
    knots: &[u8],
    control_points: &[T],
) -> T {
    let n = basis_functions(span, degree, frame, knots);

    let mut out = T::ZERO;
    for (i, weight) in n.iter().copied().enumerate().take(degree + 1) {
        out = out.weighted_add(control_points[span - i], weight);
    }
    out
}
