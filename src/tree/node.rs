//! Arena-backed tree node representation
//!
//! Nodes live in a slot vector owned by the curve; parent/child links are
//! slot indices, so rotations never invalidate a link. Freed slots are
//! recycled through a free list.

/// Index of a node slot inside the curve's arena.
pub type NodeId = usize;

/// Red-black node color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Freshly inserted nodes start red.
    Red,
    /// The root and absent children count as black.
    Black,
}

/// One breakpoint slot: key, delta, color, and structural links.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    /// Canonical key.
    pub x: f64,

    /// Increment of the function at `x`.
    pub delta_y: f64,

    /// Node color.
    pub color: Color,

    /// Parent slot, `None` for the root.
    pub parent: Option<NodeId>,

    /// Left child slot.
    pub left: Option<NodeId>,

    /// Right child slot.
    pub right: Option<NodeId>,
}

impl Node {
    /// Create a detached red node, the state every insertion starts from.
    pub fn new(x: f64, delta_y: f64) -> Self {
        Self {
            x,
            delta_y,
            color: Color::Red,
            parent: None,
            left: None,
            right: None,
        }
    }
}
