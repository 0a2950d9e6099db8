//! Merge-based function algebra
//!
//! `sum` and `minus` mutate the receiver so that its value at every x
//! becomes `f(x) ± g(x)`. Only the union of breakpoint keys inside the
//! other curve's span is touched, plus the receiver's first breakpoint
//! beyond it; the rest of the receiver is left alone. The pass never
//! mutates the tree while walking it: per-key result deltas are computed
//! from direct evaluation of both curves on an extracted snapshot, and the
//! structural inserts/updates are applied afterwards.

use crate::breakpoint::{keys_equal, VALUE_EPSILON};
use crate::tree::{Curve, NodeId};

/// Deferred structural change discovered during a merge pass.
#[derive(Debug)]
enum MergeOp {
    /// New breakpoint at a key the receiver did not have.
    Insert { x: f64, delta_y: f64 },
    /// Delta rewrite of an existing breakpoint.
    Update { x: f64, delta_y: f64 },
}

impl Curve {
    /// Mutate the receiver to `receiver + other`.
    pub fn sum(&mut self, other: &Curve) {
        self.merge(other, 1.0);
    }

    /// Mutate the receiver to `receiver - other`.
    pub fn minus(&mut self, other: &Curve) {
        self.merge(other, -1.0);
    }

    /// Flip the sign of every stored delta in place.
    pub fn negate(&mut self) {
        self.negate_subtree(self.root);
    }

    /// Whether `self(x) <= other(x) + ε` holds everywhere.
    ///
    /// Computed from the difference `other - self`: the predicate fails iff
    /// some breakpoint of the difference evaluates below `-ε`. The scan
    /// short-circuits on the first violation.
    pub fn is_less_or_equal(&self, other: &Curve) -> bool {
        let mut diff = other.clone();
        diff.minus(self);
        for x in diff.keys() {
            if diff.eval(x) < -VALUE_EPSILON {
                return false;
            }
        }
        true
    }

    fn merge(&mut self, other: &Curve, sign: f64) {
        let g_points = other.to_deltas();
        if g_points.is_empty() {
            return;
        }
        let span_lo = g_points[0].x;
        let span_hi = g_points[g_points.len() - 1].x;

        // Union of both curves' keys inside the other curve's span.
        let f_keys: Vec<f64> = self
            .deltas_in(span_lo, span_hi)
            .iter()
            .map(|bp| bp.x)
            .collect();
        let g_keys: Vec<f64> = g_points.iter().map(|bp| bp.x).collect();
        let merged = merge_key_lists(&f_keys, &g_keys);

        tracing::trace!(
            keys = merged.len(),
            span_lo,
            span_hi,
            "merging curves"
        );

        // Forward pass: the result value at each key is f(x) ± g(x)
        // evaluated on the pre-merge curves; consecutive differences give
        // the breakpoint deltas, telescoping to the correct cumulative
        // value everywhere.
        let mut ops = Vec::with_capacity(merged.len() + 1);
        let mut prev_value = match self.predecessor_key(span_lo) {
            Some(px) => self.eval(px) + sign * other.eval(px),
            None => 0.0,
        };
        for &x in &merged {
            let value = self.eval(x) + sign * other.eval(x);
            let delta_y = value - prev_value;
            if self.contains(x) {
                ops.push(MergeOp::Update { x, delta_y });
            } else {
                ops.push(MergeOp::Insert { x, delta_y });
            }
            prev_value = value;
        }

        // Repair the first receiver breakpoint past the merge region so the
        // cumulative value beyond it is unchanged except where the other
        // curve contributes.
        if let Some(sx) = self.strict_successor_key(span_hi) {
            let value = self.eval(sx) + sign * other.eval(sx);
            ops.push(MergeOp::Update {
                x: sx,
                delta_y: value - prev_value,
            });
        }

        for op in ops {
            match op {
                MergeOp::Insert { x, delta_y } => self.insert(x, delta_y),
                MergeOp::Update { x, delta_y } => {
                    self.set_delta(x, delta_y);
                }
            }
        }
    }

    fn negate_subtree(&mut self, id: Option<NodeId>) {
        if let Some(id) = id {
            let (left, right) = (self.nodes[id].left, self.nodes[id].right);
            self.negate_subtree(left);
            self.nodes[id].delta_y = -self.nodes[id].delta_y;
            self.negate_subtree(right);
        }
    }
}

/// Merge two ascending key lists, collapsing keys on the same grid point.
fn merge_key_lists(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut merged = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() || j < b.len() {
        let next = if i < a.len() && (j >= b.len() || a[i] < b[j]) {
            let x = a[i];
            i += 1;
            x
        } else {
            let x = b[j];
            j += 1;
            x
        };
        if i < a.len() && keys_equal(a[i], next) {
            i += 1;
        }
        if j < b.len() && keys_equal(b[j], next) {
            j += 1;
        }
        merged.push(next);
    }
    merged
}
