//! Point and interval evaluation
//!
//! The function value at x is the prefix sum of deltas over keys ≤ x, plus
//! a linearly interpolated share of the next breakpoint's delta when x
//! falls strictly between two keys. Interval extrema of a piecewise-linear
//! function are attained at an endpoint or at an internal breakpoint,
//! never strictly inside a linear segment, so a breakpoint scan suffices.

use crate::breakpoint::{canonical_key, keys_equal, KEY_RESOLUTION};
use crate::tree::{Curve, NodeId};

impl Curve {
    /// Evaluate the function at `x`.
    pub fn eval(&self, x: f64) -> f64 {
        if self.root.is_none() {
            return 0.0;
        }
        let key = canonical_key(x);

        let mut sum = 0.0;
        self.accumulate_up_to(self.root, key, &mut sum);

        let (left, right) = self.find_bounding(key);
        // No right neighbor: x sits on a breakpoint (its delta is already
        // in the sum) or lies at or past the last one.
        let right = match right {
            Some(right) => right,
            None => return sum,
        };
        if let Some(left) = left {
            let dx = self.nodes[right].x - self.nodes[left].x;
            if dx != 0.0 {
                sum += (key - self.nodes[left].x) / dx * self.nodes[right].delta_y;
            }
        }
        sum
    }

    /// Local delta of the function at `x`: the stored delta when a
    /// breakpoint exists there, otherwise `eval(x) - eval(pred.x)` (0.0
    /// before the first breakpoint).
    pub fn eval_delta(&self, x: f64) -> f64 {
        if let Some(id) = self.search(x) {
            return self.nodes[id].delta_y;
        }
        let (left, _) = self.find_bounding(canonical_key(x));
        let y = self.eval(x);
        let y_prev = match left {
            Some(left) => self.eval(self.nodes[left].x),
            None => 0.0,
        };
        y - y_prev
    }

    /// Maximum of the function over `[t_inf, t_sup]`.
    ///
    /// An empty curve or an inverted interval yields 0.0.
    pub fn evaluate_max(&self, t_inf: f64, t_sup: f64) -> f64 {
        if self.is_empty() || t_inf > t_sup {
            return 0.0;
        }
        let mut best = self.eval(t_inf).max(self.eval(t_sup));
        for bp in self.deltas_in(t_inf, t_sup) {
            best = best.max(self.eval(bp.x));
        }
        best
    }

    /// Minimum of the function over `[t_inf, t_sup]`; same conventions as
    /// [`Curve::evaluate_max`].
    pub fn evaluate_min(&self, t_inf: f64, t_sup: f64) -> f64 {
        if self.is_empty() || t_inf > t_sup {
            return 0.0;
        }
        let mut best = self.eval(t_inf).min(self.eval(t_sup));
        for bp in self.deltas_in(t_inf, t_sup) {
            best = best.min(self.eval(bp.x));
        }
        best
    }

    /// Accumulate deltas of every node with key ≤ `key`, pruning right
    /// subtrees that are provably past it.
    fn accumulate_up_to(&self, id: Option<NodeId>, key: f64, sum: &mut f64) {
        let id = match id {
            Some(id) => id,
            None => return,
        };
        if self.nodes[id].x > key + KEY_RESOLUTION / 2.0 {
            self.accumulate_up_to(self.nodes[id].left, key, sum);
        } else {
            self.accumulate_up_to(self.nodes[id].left, key, sum);
            *sum += self.nodes[id].delta_y;
            self.accumulate_up_to(self.nodes[id].right, key, sum);
        }
    }

    /// Locate the tight bounding pair for `key`: greatest node ≤ key and
    /// least node > key. A key sitting exactly on a breakpoint returns
    /// `(that node, None)`.
    pub(crate) fn find_bounding(&self, key: f64) -> (Option<NodeId>, Option<NodeId>) {
        let mut left = None;
        let mut right = None;
        let mut cursor = self.root;
        while let Some(cur) = cursor {
            if keys_equal(key, self.nodes[cur].x) {
                return (Some(cur), None);
            } else if key < self.nodes[cur].x {
                right = Some(cur);
                cursor = self.nodes[cur].left;
            } else {
                left = Some(cur);
                cursor = self.nodes[cur].right;
            }
        }
        (left, right)
    }

    /// Greatest key strictly below `x`, if any.
    pub(crate) fn predecessor_key(&self, x: f64) -> Option<f64> {
        let key = canonical_key(x);
        let (left, _) = self.find_bounding(key);
        let left = left?;
        if keys_equal(self.nodes[left].x, key) {
            // Exact hit: step to the in-order predecessor.
            let mut best = None;
            let mut cursor = self.root;
            while let Some(cur) = cursor {
                if self.nodes[cur].x < self.nodes[left].x {
                    best = Some(self.nodes[cur].x);
                    cursor = self.nodes[cur].right;
                } else {
                    cursor = self.nodes[cur].left;
                }
            }
            best
        } else {
            Some(self.nodes[left].x)
        }
    }

    /// Least key strictly above `x`, if any.
    pub(crate) fn strict_successor_key(&self, x: f64) -> Option<f64> {
        let key = canonical_key(x);
        let (left, right) = self.find_bounding(key);
        match (left, right) {
            (Some(hit), None) if keys_equal(self.nodes[hit].x, key) => {
                self.successor(hit).map(|s| self.nodes[s].x)
            }
            _ => right.map(|r| self.nodes[r].x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staircase() -> Curve {
        let mut curve = Curve::new();
        curve.insert(0.0, 2.0);
        curve.insert(3.5, -1.0);
        curve.insert(6.0, 2.5);
        curve.insert(7.0, 0.0);
        curve
    }

    #[test]
    fn test_eval_at_breakpoints() {
        let curve = staircase();
        assert_eq!(curve.eval(0.0), 2.0);
        assert_eq!(curve.eval(3.5), 1.0);
        assert_eq!(curve.eval(6.0), 3.5);
    }

    #[test]
    fn test_eval_interpolates_between_breakpoints() {
        let curve = staircase();
        // Between (3.5, value 1.0) and (6.0, value 3.5).
        let expected = 1.0 + (4.0 - 3.5) / (6.0 - 3.5) * 2.5;
        assert!((curve.eval(4.0) - expected).abs() < 1e-12);
        assert!((curve.eval(4.0) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_eval_past_last_breakpoint_is_total_sum() {
        let curve = staircase();
        assert_eq!(curve.eval(7.0), 3.5);
        assert_eq!(curve.eval(100.0), 3.5);
    }

    #[test]
    fn test_eval_before_first_breakpoint() {
        let mut curve = Curve::new();
        curve.insert(2.0, 0.0);
        curve.insert(3.5, -5.0);
        assert_eq!(curve.eval(-1.0), 0.0);
        assert_eq!(curve.eval(1.999), 0.0);
    }

    #[test]
    fn test_empty_curve_evaluates_to_zero() {
        let curve = Curve::new();
        assert_eq!(curve.eval(-10.0), 0.0);
        assert_eq!(curve.eval(10.0), 0.0);
        assert_eq!(curve.eval_delta(1.0), 0.0);
    }

    #[test]
    fn test_eval_is_continuous_between_breakpoints() {
        let curve = staircase();
        let mut prev = curve.eval(3.5);
        let mut x = 3.5;
        while x < 6.0 {
            x += 0.01;
            let y = curve.eval(x);
            assert!((y - prev).abs() < 0.02, "jump at x={x}: {prev} -> {y}");
            prev = y;
        }
    }

    #[test]
    fn test_eval_delta_on_and_off_breakpoints() {
        let curve = staircase();
        assert_eq!(curve.eval_delta(3.5), -1.0);
        // Off-key: eval(4.0) - eval(3.5).
        assert!((curve.eval_delta(4.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_interval_extrema_on_breakpoints_and_endpoints() {
        let curve = staircase();
        assert_eq!(curve.evaluate_max(0.0, 7.0), 3.5);
        assert_eq!(curve.evaluate_min(0.0, 7.0), 1.0);
        // Interior window whose extrema sit at its endpoints.
        assert!((curve.evaluate_max(4.0, 5.0) - curve.eval(5.0)).abs() < 1e-12);
        assert!((curve.evaluate_min(4.0, 5.0) - curve.eval(4.0)).abs() < 1e-12);
    }

    #[test]
    fn test_interval_extrema_degenerate_cases() {
        let curve = staircase();
        assert_eq!(curve.evaluate_max(5.0, 4.0), 0.0);
        assert_eq!(Curve::new().evaluate_min(0.0, 1.0), 0.0);
    }

    #[test]
    fn test_bounding_pair_and_neighbor_keys() {
        let curve = staircase();
        assert_eq!(curve.predecessor_key(6.0), Some(3.5));
        assert_eq!(curve.predecessor_key(0.0), None);
        assert_eq!(curve.strict_successor_key(6.0), Some(7.0));
        assert_eq!(curve.strict_successor_key(7.0), None);
        assert_eq!(curve.strict_successor_key(4.2), Some(6.0));
    }
}
