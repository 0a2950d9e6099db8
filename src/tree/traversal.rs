//! Ordered extraction of breakpoints
//!
//! The algebra and clamp passes never mutate the tree while walking it:
//! they extract an ordered snapshot first and defer structural changes
//! until the pass is done. These helpers produce those snapshots, whole
//! curve or restricted to a window (with subtree pruning for the windowed
//! delta variant).

use super::{Curve, NodeId};
use crate::breakpoint::Breakpoint;

impl Curve {
    /// Ordered `(x, cumulative value)` pairs, one per breakpoint.
    pub fn to_points(&self) -> Vec<(f64, f64)> {
        let mut result = Vec::with_capacity(self.len());
        let mut cumulative = 0.0;
        self.walk(self.root, &mut |curve: &Curve, id: NodeId| {
            cumulative += curve.nodes[id].delta_y;
            result.push((curve.nodes[id].x, cumulative));
        });
        result
    }

    /// Ordered breakpoints `(x, delta_y)`.
    pub fn to_deltas(&self) -> Vec<Breakpoint> {
        let mut result = Vec::with_capacity(self.len());
        self.walk(self.root, &mut |curve: &Curve, id: NodeId| {
            result.push(Breakpoint {
                x: curve.nodes[id].x,
                delta_y: curve.nodes[id].delta_y,
            });
        });
        result
    }

    /// Ordered `(x, cumulative value)` pairs restricted to `[a, b]`.
    ///
    /// The cumulative value needs the prefix outside the window, so every
    /// node is visited.
    pub fn points_in(&self, a: f64, b: f64) -> Vec<(f64, f64)> {
        let mut result = Vec::new();
        let mut cumulative = 0.0;
        self.walk(self.root, &mut |curve: &Curve, id: NodeId| {
            cumulative += curve.nodes[id].delta_y;
            let x = curve.nodes[id].x;
            if x >= a && x <= b {
                result.push((x, cumulative));
            }
        });
        result
    }

    /// Ordered breakpoints restricted to `[a, b]`, pruning subtrees whose
    /// keys are provably outside the window.
    pub fn deltas_in(&self, a: f64, b: f64) -> Vec<Breakpoint> {
        let mut result = Vec::new();
        self.walk_window(self.root, a, b, &mut result);
        result
    }

    /// Ordered keys of every breakpoint.
    pub(crate) fn keys(&self) -> Vec<f64> {
        let mut result = Vec::with_capacity(self.len());
        self.walk(self.root, &mut |curve: &Curve, id: NodeId| {
            result.push(curve.nodes[id].x);
        });
        result
    }

    fn walk(&self, id: Option<NodeId>, visit: &mut impl FnMut(&Curve, NodeId)) {
        if let Some(id) = id {
            self.walk(self.nodes[id].left, visit);
            visit(self, id);
            self.walk(self.nodes[id].right, visit);
        }
    }

    fn walk_window(&self, id: Option<NodeId>, a: f64, b: f64, out: &mut Vec<Breakpoint>) {
        let id = match id {
            Some(id) => id,
            None => return,
        };
        let x = self.nodes[id].x;
        if x > a {
            self.walk_window(self.nodes[id].left, a, b, out);
        }
        if x >= a && x <= b {
            out.push(Breakpoint {
                x,
                delta_y: self.nodes[id].delta_y,
            });
        }
        if x < b {
            self.walk_window(self.nodes[id].right, a, b, out);
        }
    }
}
