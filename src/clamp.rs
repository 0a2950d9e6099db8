//! Constant clamping
//!
//! `min_assign(c)` replaces the curve with `min(f, c)` in place: one
//! forward pass over an ordered snapshot tracks the running value, inserts
//! interpolated crossing breakpoints where the curve passes through c,
//! truncates the delta that re-enters the kept side, and marks every
//! breakpoint stranded beyond c for removal. Structural changes are
//! deferred until after the pass: delta rewrites, then insertions, then
//! removals. `max_assign` is the mirror image, driven by the same pass
//! with the comparison sense flipped.
//!
//! Tie-break rule, applied everywhere including the first segment: a
//! running value exactly at c belongs to the kept side — the node stays,
//! its delta is zeroed, and the running value is pinned to c.

use crate::breakpoint::{canonical_key, keys_equal, Breakpoint, VALUE_EPSILON};
use crate::tree::Curve;

impl Curve {
    /// Replace the curve with `min(f, c)` in place.
    pub fn min_assign(&mut self, c: f64) {
        self.clamp_assign(c, 1.0);
    }

    /// Replace the curve with `max(f, c)` in place.
    pub fn max_assign(&mut self, c: f64) {
        self.clamp_assign(c, -1.0);
    }

    /// Non-destructive `min(f, c)`: deep-clone, clamp the clone, return it.
    #[must_use]
    pub fn min_with(&self, c: f64) -> Curve {
        let mut clone = self.clone();
        clone.min_assign(c);
        clone
    }

    /// Non-destructive `max(f, c)`: deep-clone, clamp the clone, return it.
    #[must_use]
    pub fn max_with(&self, c: f64) -> Curve {
        let mut clone = self.clone();
        clone.max_assign(c);
        clone
    }

    /// Shared clamp pass. `sign = 1.0` clips values above c (min-clamp),
    /// `sign = -1.0` clips values below c (max-clamp); every comparison
    /// goes through `sign` so both senses run the same code path.
    fn clamp_assign(&mut self, c: f64, sign: f64) {
        let clipped = |y: f64| sign * y > sign * c + VALUE_EPSILON;
        let kept = |y: f64| sign * y < sign * c - VALUE_EPSILON;

        // The curve's origin breakpoint anchors the clamp: its delta is the
        // value at x = 0.
        let y_before = match self.delta_at(0.0) {
            Some(delta) => {
                if clipped(delta) {
                    self.set_delta(0.0, c);
                }
                delta
            }
            None => {
                let origin_delta = if sign * c < 0.0 { c } else { 0.0 };
                self.insert(0.0, origin_delta);
                0.0
            }
        };
        let origin_delta = match self.delta_at(0.0) {
            Some(delta) => delta,
            None => return,
        };

        // First segment: the crossing check against the successor uses the
        // pre-clamp value at the origin.
        if let Some(succ_x) = self.strict_successor_key(0.0) {
            let succ_delta = self.delta_at(succ_x).unwrap_or(0.0);
            let y_current = y_before + succ_delta;
            if clipped(y_before) && kept(y_current) {
                let t = (c - y_before) / (y_current - y_before);
                let xi = canonical_key(t * succ_x);
                if !keys_equal(xi, 0.0) && !keys_equal(xi, succ_x) {
                    tracing::debug!(xi, c, "clamp: crossing in first segment");
                    self.insert(xi, 0.0);
                }
                self.set_delta(succ_x, y_current - c);
            } else {
                self.set_delta(succ_x, y_current - origin_delta);
            }
        }

        // Main pass over an ordered snapshot; the tree is not touched
        // until the pass is done.
        let snapshot = self.to_deltas();
        let mut rewrites: Vec<(f64, f64)> = Vec::new();
        let mut to_insert: Vec<Breakpoint> = Vec::new();
        let mut to_remove: Vec<f64> = Vec::new();

        let mut prev: Option<(f64, f64)> = None;
        let mut current_y = 0.0;
        for bp in &snapshot {
            current_y += bp.delta_y;

            if let Some((prev_x, prev_y)) = prev {
                let crossing = (clipped(prev_y) && kept(current_y))
                    || (kept(prev_y) && clipped(current_y));
                if crossing {
                    let t = (c - prev_y) / (current_y - prev_y);
                    let xi = canonical_key(prev_x + t * (bp.x - prev_x));
                    let delta_at_xi = if clipped(prev_y) { 0.0 } else { c - prev_y };
                    if !keys_equal(xi, prev_x) && !keys_equal(xi, bp.x) {
                        tracing::debug!(xi, c, "clamp: crossing breakpoint");
                        to_insert.push(Breakpoint {
                            x: xi,
                            delta_y: delta_at_xi,
                        });
                    }
                    if clipped(prev_y) && kept(current_y) {
                        // Re-entering the kept side: the node resumes from c.
                        rewrites.push((bp.x, current_y - c));
                    }
                }

                // Exact touch from the clipped side: the node belongs to
                // the kept side.
                if clipped(prev_y) && (current_y - c).abs() <= VALUE_EPSILON {
                    rewrites.push((bp.x, 0.0));
                    current_y = c;
                }
            }

            if clipped(current_y) {
                to_remove.push(bp.x);
            }
            prev = Some((bp.x, current_y));
        }

        for (x, delta_y) in rewrites {
            self.set_delta(x, delta_y);
        }
        for bp in to_insert {
            self.insert(bp.x, bp.delta_y);
        }
        for x in to_remove {
            self.remove(x);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(points: &[(f64, f64)]) -> Curve {
        let mut c = Curve::new();
        for &(x, delta_y) in points {
            c.insert(x, delta_y);
        }
        c
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_min_clamp_removes_every_exceeding_breakpoint() {
        let mut g = curve(&[
            (2.0, -1.0),
            (2.5, 1.0),
            (3.0, 1.5),
            (5.0, -1.5),
            (6.0, -6.5),
        ]);
        g.min_assign(-1.0);

        for (x, y) in g.to_points() {
            assert!(y <= -1.0 + 1e-9, "breakpoint ({x}, {y}) exceeds the clamp");
        }
        // The plateau holds until the curve genuinely dips below -1 again,
        // between x = 5 and x = 6 of the original.
        assert_close(g.eval(0.0), -1.0);
        assert_close(g.eval(4.0), -1.0);
        assert_close(g.eval(6.0), -6.5);
    }

    #[test]
    fn test_min_clamp_inserts_interpolated_crossing() {
        let mut f = curve(&[(0.0, 0.0), (10.0, 4.0)]);
        f.min_assign(2.0);

        // f crosses 2.0 halfway up the ramp.
        assert!(f.contains(5.0));
        assert_close(f.eval(5.0), 2.0);
        assert_close(f.eval(10.0), 2.0);
        assert_close(f.eval(2.5), 1.0);
    }

    #[test]
    fn test_max_clamp_mirrors_min_clamp() {
        let mut f = curve(&[(0.0, 0.0), (10.0, -4.0)]);
        f.max_assign(-2.0);

        assert!(f.contains(5.0));
        assert_close(f.eval(5.0), -2.0);
        assert_close(f.eval(10.0), -2.0);
        assert_close(f.eval(2.5), -1.0);
        for (x, y) in f.to_points() {
            assert!(y >= -2.0 - 1e-9, "breakpoint ({x}, {y}) under the clamp");
        }
    }

    #[test]
    fn test_clamp_on_empty_curve_anchors_origin() {
        let mut f = Curve::new();
        f.min_assign(-3.0);
        assert_close(f.eval(0.0), -3.0);
        assert_close(f.eval(7.0), -3.0);

        let mut g = Curve::new();
        g.min_assign(3.0);
        assert_close(g.eval(5.0), 0.0);
    }

    #[test]
    fn test_exact_touch_stays_on_kept_side() {
        // Rises to exactly c, then keeps going: the touching node is kept
        // with a zeroed delta, not treated as a crossing.
        let mut f = curve(&[(0.0, 3.0), (4.0, -1.0), (8.0, 2.0)]);
        f.min_assign(2.0);
        assert_close(f.eval(4.0), 2.0);
        assert_close(f.eval(8.0), 2.0);
        for (_, y) in f.to_points() {
            assert!(y <= 2.0 + 1e-9);
        }
    }

    #[test]
    fn test_clamp_is_idempotent() {
        let original = curve(&[
            (0.0, 1.0),
            (2.0, 3.0),
            (4.0, -5.0),
            (6.0, 4.0),
            (9.0, -2.0),
        ]);
        let once = original.min_with(2.5);
        let mut twice = once.clone();
        twice.min_assign(2.5);

        for x in [0.0, 0.7, 2.0, 3.1, 4.0, 5.5, 6.0, 8.0, 9.0, 12.0] {
            assert_close(twice.eval(x), once.eval(x));
        }
    }

    #[test]
    fn test_non_destructive_variants_leave_receiver_unchanged() {
        let f = curve(&[(0.0, 1.0), (2.0, 3.0), (4.0, -5.0)]);
        let samples: Vec<f64> = [0.0, 1.0, 2.0, 3.0, 4.0].iter().map(|&x| f.eval(x)).collect();

        let clamped = f.min_with(2.0);
        let raised = f.max_with(0.0);

        for (&x, &want) in [0.0, 1.0, 2.0, 3.0, 4.0].iter().zip(&samples) {
            assert_close(f.eval(x), want);
        }
        assert!(clamped.eval(2.0) <= 2.0 + 1e-9);
        assert!(raised.eval(4.0) >= -1e-9);
    }
}
