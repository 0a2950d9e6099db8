//! Breakpoint samples and key canonicalization
//!
//! A curve is an ordered set of breakpoints, each holding the increment
//! `delta_y` the function gains exactly at `x`. Keys are canonicalized to a
//! fixed grid at construction so that tolerant equality reduces to exact
//! equality on the canonical value and the key order stays total.

use std::fmt;

/// Grid step used to canonicalize breakpoint keys.
///
/// Two keys closer than half a step land on the same grid point and denote
/// the same breakpoint.
pub const KEY_RESOLUTION: f64 = 1e-6;

/// Tolerance used for comparisons on function *values* (clamp tie-breaks,
/// dominance checks).
pub const VALUE_EPSILON: f64 = 1e-9;

/// Snap a raw key onto the canonical grid.
#[inline]
pub fn canonical_key(x: f64) -> f64 {
    (x / KEY_RESOLUTION).round() * KEY_RESOLUTION
}

/// Tolerant equality on canonical keys.
///
/// Canonical keys either coincide or differ by at least one grid step, so a
/// half-step tolerance is unambiguous.
#[inline]
pub fn keys_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < KEY_RESOLUTION / 2.0
}

/// A keyed sample: where and by how much the represented function rises.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Breakpoint {
    /// Canonical abscissa of the sample.
    pub x: f64,

    /// Increment of the function value at `x`, relative to the value just
    /// before `x`.
    pub delta_y: f64,
}

impl Breakpoint {
    /// Create a breakpoint with a canonicalized key.
    pub fn new(x: f64, delta_y: f64) -> Self {
        Self {
            x: canonical_key(x),
            delta_y,
        }
    }

    /// Whether this breakpoint sits on the same grid point as `x`.
    pub fn is_at(&self, x: f64) -> bool {
        keys_equal(self.x, canonical_key(x))
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {:+})", self.x, self.delta_y)
    }
}
