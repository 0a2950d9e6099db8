//! # Piecewise-linear curve algebra over balanced breakpoint trees
//!
//! A curve is stored as a red-black tree of breakpoints `(x, delta_y)`;
//! its value at x is the prefix sum of deltas at keys ≤ x, linearly
//! interpolated between neighboring breakpoints. On top of that index the
//! crate provides:
//!
//! 1. **Evaluation**: point values, local deltas, interval extrema
//! 2. **Algebra**: in-place `sum`/`minus`/`negate` and dominance testing,
//!    via a merge pass touching only the overlapping span
//! 3. **Clamping**: `min`/`max` against a constant, inserting interpolated
//!    crossing breakpoints
//! 4. **Profiles**: ramp and step factories plus incremental corrections
//!    folded in when a reservation window or capacity bound moves
//!
//! ## Usage Example
//!
//! ```
//! use deltacurve::Curve;
//!
//! let mut curve = Curve::new();
//! curve.insert(0.0, 2.0);
//! curve.insert(3.5, -1.0);
//! curve.insert(6.0, 2.5);
//! assert_eq!(curve.eval(3.5), 1.0);
//! assert!((curve.eval(4.0) - 1.5).abs() < 1e-12);
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

// Core modules - each implements one layer of the curve algebra
pub mod breakpoint; // Keyed deltas and the canonical key grid
pub mod tree;       // Balanced breakpoint index
pub mod eval;       // Point and interval evaluation
pub mod algebra;    // Merge-based sum/minus/negate and dominance
pub mod clamp;      // Constant min/max clamping
pub mod profile;    // Profile factories and incremental updates
pub mod io;         // Textual import/export

// Re-exports for convenience
pub use breakpoint::{Breakpoint, KEY_RESOLUTION, VALUE_EPSILON};
pub use io::{export_samples, read_breakpoints, write_breakpoints, CurveFileError};
pub use profile::{cba_profile, delta_profile};
pub use tree::Curve;
