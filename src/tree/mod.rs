//! Balanced breakpoint index
//!
//! A curve owns its breakpoints in an arena of slots; the red-black links
//! (parent, left, right) are slot indices, so rotations rewire indices
//! instead of pointers and no back-reference can dangle. Lookup, insertion,
//! and removal are O(log n); the algebra built on top walks the index in
//! key order.

mod node;
mod traversal;

pub(crate) use node::Node;
pub use node::{Color, NodeId};

use crate::breakpoint::{canonical_key, keys_equal};

/// A continuous piecewise-linear function stored as breakpoint deltas in a
/// red-black tree.
///
/// The function value at any x is the running sum of `delta_y` over keys
/// ≤ x, with linear interpolation strictly between neighboring keys. An
/// empty curve evaluates to 0.0 everywhere. `Clone` performs a deep copy of
/// the whole arena: clones never share structure.
#[derive(Debug, Clone, Default)]
pub struct Curve {
    pub(crate) nodes: Vec<Node>,
    free: Vec<NodeId>,
    pub(crate) root: Option<NodeId>,
    len: usize,
}

impl Curve {
    /// Create an empty curve (0.0 everywhere).
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of breakpoints.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the curve has no breakpoints.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a breakpoint at the canonical grid point nearest `x`.
    ///
    /// Insertion does not deduplicate: inserting a key that already exists
    /// creates a second node. Callers that need insert-or-update semantics
    /// search first (the pattern the algebra and clamp code uses).
    pub fn insert(&mut self, x: f64, delta_y: f64) {
        let key = canonical_key(x);
        let id = self.alloc(Node::new(key, delta_y));

        let mut parent = None;
        let mut cursor = self.root;
        while let Some(cur) = cursor {
            parent = Some(cur);
            cursor = if key < self.nodes[cur].x {
                self.nodes[cur].left
            } else {
                self.nodes[cur].right
            };
        }

        self.nodes[id].parent = parent;
        match parent {
            None => self.root = Some(id),
            Some(p) => {
                if key < self.nodes[p].x {
                    self.nodes[p].left = Some(id);
                } else {
                    self.nodes[p].right = Some(id);
                }
            }
        }

        self.fix_insert(id);
    }

    /// Remove the breakpoint at `x`, if present.
    ///
    /// Returns `false` (and logs a debug event) when no breakpoint sits on
    /// the canonical grid point of `x`; an absent key is a reported no-op,
    /// not an error.
    pub fn remove(&mut self, x: f64) -> bool {
        match self.search(x) {
            Some(z) => {
                self.delete_node(z);
                true
            }
            None => {
                tracing::debug!(x, "remove: no breakpoint at key");
                false
            }
        }
    }

    /// Whether a breakpoint exists at the canonical grid point of `x`.
    pub fn contains(&self, x: f64) -> bool {
        self.search(x).is_some()
    }

    /// Stored delta at `x`, if a breakpoint exists there.
    pub fn delta_at(&self, x: f64) -> Option<f64> {
        self.search(x).map(|id| self.nodes[id].delta_y)
    }

    /// Overwrite the stored delta at `x`. Returns `false` if the key is
    /// absent.
    pub(crate) fn set_delta(&mut self, x: f64, delta_y: f64) -> bool {
        match self.search(x) {
            Some(id) => {
                self.nodes[id].delta_y = delta_y;
                true
            }
            None => false,
        }
    }

    /// Locate the unique node whose key equals the canonical grid point of
    /// `x`, descending by the key order.
    pub(crate) fn search(&self, x: f64) -> Option<NodeId> {
        let key = canonical_key(x);
        let mut cursor = self.root;
        while let Some(cur) = cursor {
            if keys_equal(key, self.nodes[cur].x) {
                return Some(cur);
            }
            cursor = if key < self.nodes[cur].x {
                self.nodes[cur].left
            } else {
                self.nodes[cur].right
            };
        }
        None
    }

    /// Leftmost descendant of `id`.
    pub(crate) fn minimum(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.nodes[id].left {
            id = left;
        }
        id
    }

    /// In-order successor: leftmost node of the right subtree, else the
    /// first ancestor for which `id` lies in the left subtree.
    pub(crate) fn successor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(right) = self.nodes[id].right {
            return Some(self.minimum(right));
        }
        let mut child = id;
        let mut parent = self.nodes[id].parent;
        while let Some(p) = parent {
            if self.nodes[p].left == Some(child) {
                return Some(p);
            }
            child = p;
            parent = self.nodes[p].parent;
        }
        None
    }

    // ---- arena management ----

    fn alloc(&mut self, node: Node) -> NodeId {
        self.len += 1;
        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = node;
                id
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        self.nodes[id].parent = None;
        self.nodes[id].left = None;
        self.nodes[id].right = None;
        self.free.push(id);
        self.len -= 1;
    }

    // ---- red-black machinery ----

    fn is_red(&self, id: Option<NodeId>) -> bool {
        matches!(id, Some(i) if self.nodes[i].color == Color::Red)
    }

    /// Left rotation around `x`. A node without a right child cannot
    /// rotate left; that call is a no-op guard.
    fn rotate_left(&mut self, x: NodeId) {
        let y = match self.nodes[x].right {
            Some(y) => y,
            None => return,
        };
        self.nodes[x].right = self.nodes[y].left;
        if let Some(yl) = self.nodes[y].left {
            self.nodes[yl].parent = Some(x);
        }
        self.nodes[y].parent = self.nodes[x].parent;
        match self.nodes[x].parent {
            None => self.root = Some(y),
            Some(p) => {
                if self.nodes[p].left == Some(x) {
                    self.nodes[p].left = Some(y);
                } else {
                    self.nodes[p].right = Some(y);
                }
            }
        }
        self.nodes[y].left = Some(x);
        self.nodes[x].parent = Some(y);
    }

    /// Right rotation around `y`; mirror of `rotate_left`.
    fn rotate_right(&mut self, y: NodeId) {
        let x = match self.nodes[y].left {
            Some(x) => x,
            None => return,
        };
        self.nodes[y].left = self.nodes[x].right;
        if let Some(xr) = self.nodes[x].right {
            self.nodes[xr].parent = Some(y);
        }
        self.nodes[x].parent = self.nodes[y].parent;
        match self.nodes[y].parent {
            None => self.root = Some(x),
            Some(p) => {
                if self.nodes[p].left == Some(y) {
                    self.nodes[p].left = Some(x);
                } else {
                    self.nodes[p].right = Some(x);
                }
            }
        }
        self.nodes[x].right = Some(y);
        self.nodes[y].parent = Some(x);
    }

    /// Restore the red-black invariants after inserting the red node `z`:
    /// recolor when the uncle is red, rotate-then-recolor otherwise,
    /// bubbling up through the grandparent.
    fn fix_insert(&mut self, mut z: NodeId) {
        while self.is_red(self.nodes[z].parent) {
            let p = match self.nodes[z].parent {
                Some(p) => p,
                None => break,
            };
            let g = match self.nodes[p].parent {
                Some(g) => g,
                None => break,
            };
            if self.nodes[g].left == Some(p) {
                let uncle = self.nodes[g].right;
                if self.is_red(uncle) {
                    self.nodes[p].color = Color::Black;
                    if let Some(u) = uncle {
                        self.nodes[u].color = Color::Black;
                    }
                    self.nodes[g].color = Color::Red;
                    z = g;
                } else {
                    if self.nodes[p].right == Some(z) {
                        z = p;
                        self.rotate_left(z);
                    }
                    if let Some(p2) = self.nodes[z].parent {
                        self.nodes[p2].color = Color::Black;
                        if let Some(g2) = self.nodes[p2].parent {
                            self.nodes[g2].color = Color::Red;
                            self.rotate_right(g2);
                        }
                    }
                }
            } else {
                let uncle = self.nodes[g].left;
                if self.is_red(uncle) {
                    self.nodes[p].color = Color::Black;
                    if let Some(u) = uncle {
                        self.nodes[u].color = Color::Black;
                    }
                    self.nodes[g].color = Color::Red;
                    z = g;
                } else {
                    if self.nodes[p].left == Some(z) {
                        z = p;
                        self.rotate_right(z);
                    }
                    if let Some(p2) = self.nodes[z].parent {
                        self.nodes[p2].color = Color::Black;
                        if let Some(g2) = self.nodes[p2].parent {
                            self.nodes[g2].color = Color::Red;
                            self.rotate_left(g2);
                        }
                    }
                }
            }
        }
        if let Some(root) = self.root {
            self.nodes[root].color = Color::Black;
        }
    }

    /// Replace the subtree rooted at `u` with the subtree rooted at `v`.
    fn transplant(&mut self, u: NodeId, v: Option<NodeId>) {
        match self.nodes[u].parent {
            None => self.root = v,
            Some(p) => {
                if self.nodes[p].left == Some(u) {
                    self.nodes[p].left = v;
                } else {
                    self.nodes[p].right = v;
                }
            }
        }
        if let Some(v) = v {
            self.nodes[v].parent = self.nodes[u].parent;
        }
    }

    /// Standard red-black deletion of `z`, then rebalance from the slot
    /// that physically replaced it.
    fn delete_node(&mut self, z: NodeId) {
        let mut removed_color = self.nodes[z].color;
        let fix_from: Option<NodeId>;
        let fix_parent: Option<NodeId>;

        if self.nodes[z].left.is_none() {
            fix_from = self.nodes[z].right;
            fix_parent = self.nodes[z].parent;
            self.transplant(z, self.nodes[z].right);
        } else if self.nodes[z].right.is_none() {
            fix_from = self.nodes[z].left;
            fix_parent = self.nodes[z].parent;
            self.transplant(z, self.nodes[z].left);
        } else {
            // Both children present: splice in the in-order successor.
            let zr = match self.nodes[z].right {
                Some(zr) => zr,
                None => return,
            };
            let y = self.minimum(zr);
            removed_color = self.nodes[y].color;
            fix_from = self.nodes[y].right;

            if self.nodes[y].parent == Some(z) {
                fix_parent = Some(y);
            } else {
                fix_parent = self.nodes[y].parent;
                self.transplant(y, self.nodes[y].right);
                self.nodes[y].right = self.nodes[z].right;
                if let Some(yr) = self.nodes[y].right {
                    self.nodes[yr].parent = Some(y);
                }
            }
            self.transplant(z, Some(y));
            self.nodes[y].left = self.nodes[z].left;
            if let Some(yl) = self.nodes[y].left {
                self.nodes[yl].parent = Some(y);
            }
            self.nodes[y].color = self.nodes[z].color;
        }

        self.release(z);
        if removed_color == Color::Black {
            self.fix_delete(fix_from, fix_parent);
        }
    }

    /// Rebalance after deleting a black node. `x` is the (possibly absent)
    /// node that took the removed node's place, `parent` its parent; the
    /// sibling recoloring/rotation cases walk up to the root.
    fn fix_delete(&mut self, mut x: Option<NodeId>, mut parent: Option<NodeId>) {
        while x != self.root && !self.is_red(x) {
            let p = match parent {
                Some(p) => p,
                None => break,
            };
            if self.nodes[p].left == x {
                let mut w = match self.nodes[p].right {
                    Some(w) => w,
                    None => break,
                };
                if self.nodes[w].color == Color::Red {
                    self.nodes[w].color = Color::Black;
                    self.nodes[p].color = Color::Red;
                    self.rotate_left(p);
                    w = match self.nodes[p].right {
                        Some(w) => w,
                        None => break,
                    };
                }
                if !self.is_red(self.nodes[w].left) && !self.is_red(self.nodes[w].right) {
                    self.nodes[w].color = Color::Red;
                    x = Some(p);
                    parent = self.nodes[p].parent;
                } else {
                    if !self.is_red(self.nodes[w].right) {
                        if let Some(wl) = self.nodes[w].left {
                            self.nodes[wl].color = Color::Black;
                        }
                        self.nodes[w].color = Color::Red;
                        self.rotate_right(w);
                        w = match self.nodes[p].right {
                            Some(w) => w,
                            None => break,
                        };
                    }
                    self.nodes[w].color = self.nodes[p].color;
                    self.nodes[p].color = Color::Black;
                    if let Some(wr) = self.nodes[w].right {
                        self.nodes[wr].color = Color::Black;
                    }
                    self.rotate_left(p);
                    x = self.root;
                    parent = None;
                }
            } else {
                let mut w = match self.nodes[p].left {
                    Some(w) => w,
                    None => break,
                };
                if self.nodes[w].color == Color::Red {
                    self.nodes[w].color = Color::Black;
                    self.nodes[p].color = Color::Red;
                    self.rotate_right(p);
                    w = match self.nodes[p].left {
                        Some(w) => w,
                        None => break,
                    };
                }
                if !self.is_red(self.nodes[w].left) && !self.is_red(self.nodes[w].right) {
                    self.nodes[w].color = Color::Red;
                    x = Some(p);
                    parent = self.nodes[p].parent;
                } else {
                    if !self.is_red(self.nodes[w].left) {
                        if let Some(wr) = self.nodes[w].right {
                            self.nodes[wr].color = Color::Black;
                        }
                        self.nodes[w].color = Color::Red;
                        self.rotate_left(w);
                        w = match self.nodes[p].left {
                            Some(w) => w,
                            None => break,
                        };
                    }
                    self.nodes[w].color = self.nodes[p].color;
                    self.nodes[p].color = Color::Black;
                    if let Some(wl) = self.nodes[w].left {
                        self.nodes[wl].color = Color::Black;
                    }
                    self.rotate_right(p);
                    x = self.root;
                    parent = None;
                }
            }
        }
        if let Some(x) = x {
            self.nodes[x].color = Color::Black;
        }
    }
}

#[cfg(test)]
impl Curve {
    /// Panic unless BST order, red-red absence, and equal black-height hold.
    pub(crate) fn check_rb_invariants(&self) {
        if let Some(root) = self.root {
            assert_eq!(
                self.nodes[root].color,
                Color::Black,
                "root must be black"
            );
            self.check_subtree(root, f64::NEG_INFINITY, f64::INFINITY);
        }
    }

    fn check_subtree(&self, id: NodeId, lo: f64, hi: f64) -> usize {
        let node = &self.nodes[id];
        assert!(
            node.x > lo && node.x < hi,
            "BST order violated at key {}",
            node.x
        );
        if node.color == Color::Red {
            assert!(
                !self.is_red(node.left) && !self.is_red(node.right),
                "red node {} has a red child",
                node.x
            );
        }
        let left_black = match node.left {
            Some(l) => self.check_subtree(l, lo, node.x),
            None => 1,
        };
        let right_black = match node.right {
            Some(r) => self.check_subtree(r, node.x, hi),
            None => 1,
        };
        assert_eq!(
            left_black, right_black,
            "black-height mismatch under key {}",
            node.x
        );
        left_black + usize::from(node.color == Color::Black)
    }

    fn height(&self) -> usize {
        fn depth(curve: &Curve, id: Option<NodeId>) -> usize {
            match id {
                None => 0,
                Some(id) => {
                    1 + depth(curve, curve.nodes[id].left).max(depth(curve, curve.nodes[id].right))
                }
            }
        }
        depth(self, self.root)
    }
}
