//! 2D layout via recursive space partitioning
//!
//! Node at level L owns the horizontal span [left, right)
//! x = (left + right) / 2
//! Left child:  [left, left + w/2)
//! Right child: [right - w/2, right)      where w = right - left
//! y = top_offset + L * level_height

use super::{NodeId, Side, TreeNode};

/// Canvas geometry for [`layout`] and [`empty_slots`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutConfig {
    /// Canvas width in pixels.
    pub width: f64,

    /// Canvas height in pixels.
    pub height: f64,

    /// Radius of a rendered node.
    pub node_radius: f64,

    /// Horizontal margin kept free on both sides.
    pub margin: f64,

    /// Vertical distance between consecutive levels.
    pub level_height: f64,

    /// y coordinate of the root.
    pub top_offset: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new(500.0, 350.0, 24.0)
    }
}

impl LayoutConfig {
    /// Geometry for a `width` × `height` canvas; the remaining fields use
    /// the standard spacing (40px margin, 70px levels, root 20px below its radius).
    pub fn new(width: f64, height: f64, node_radius: f64) -> Self {
        Self {
            width,
            height,
            node_radius,
            margin: 40.0,
            level_height: 70.0,
            top_offset: node_radius + 20.0,
        }
    }

    /// Set horizontal margin.
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Set vertical level spacing.
    pub fn with_level_height(mut self, level_height: f64) -> Self {
        self.level_height = level_height;
        self
    }

    /// Set the root's y coordinate.
    pub fn with_top_offset(mut self, top_offset: f64) -> Self {
        self.top_offset = top_offset;
        self
    }

    /// y coordinate of nodes at `level`.
    #[inline]
    pub fn level_y(&self, level: usize) -> f64 {
        self.top_offset + level as f64 * self.level_height
    }

    /// Whether a tree with `levels` levels fits vertically on the canvas.
    pub fn fits_levels(&self, levels: usize) -> bool {
        match levels {
            0 => true,
            n => self.level_y(n - 1) + self.node_radius <= self.height,
        }
    }
}

/// Placement of one node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NodePosition<'a, T> {
    /// The placed node.
    pub node: &'a TreeNode<T>,
    /// Level below the root (root = 0).
    pub level: usize,
    /// Horizontal centre.
    pub x: f64,
    /// Vertical centre.
    pub y: f64,
    /// Parent centre x, absent for the root.
    pub parent_x: Option<f64>,
    /// Parent centre y, absent for the root.
    pub parent_y: Option<f64>,
}

/// A free child position where the UI may offer insertion.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmptySlot {
    /// Node that would become the parent.
    pub parent_id: NodeId,
    /// Which of its children is missing.
    pub side: Side,
    /// Slot centre x.
    pub x: f64,
    /// Slot centre y.
    pub y: f64,
}

#[derive(Clone, Copy)]
struct Span {
    left: f64,
    right: f64,
}

impl Span {
    fn midpoint(self) -> f64 {
        (self.left + self.right) / 2.0
    }

    fn halves(self) -> (Span, Span) {
        let child_width = (self.right - self.left) / 2.0;
        (
            Span {
                left: self.left,
                right: self.left + child_width,
            },
            Span {
                left: self.right - child_width,
                right: self.right,
            },
        )
    }
}

fn root_span(config: &LayoutConfig) -> Span {
    Span {
        left: config.margin,
        right: config.width - config.margin,
    }
}

/// Compute positions for every node, in preorder (parent before children,
/// left before right). An empty tree yields an empty list.
pub fn layout<'a, T>(
    root: Option<&'a TreeNode<T>>,
    config: &LayoutConfig,
) -> Vec<NodePosition<'a, T>> {
    let mut positions = Vec::new();
    if let Some(root) = root {
        place(root, 0, root_span(config), None, config, &mut positions);
    }
    positions
}

fn place<'a, T>(
    node: &'a TreeNode<T>,
    level: usize,
    span: Span,
    parent: Option<(f64, f64)>,
    config: &LayoutConfig,
    out: &mut Vec<NodePosition<'a, T>>,
) {
    let x = span.midpoint();
    let y = config.level_y(level);
    out.push(NodePosition {
        node,
        level,
        x,
        y,
        parent_x: parent.map(|(px, _)| px),
        parent_y: parent.map(|(_, py)| py),
    });

    let (left_span, right_span) = span.halves();
    if let Some(left) = node.left.as_deref() {
        place(left, level + 1, left_span, Some((x, y)), config, out);
    }
    if let Some(right) = node.right.as_deref() {
        place(right, level + 1, right_span, Some((x, y)), config, out);
    }
}

/// Every missing child slot, positioned at the centre of the half-span the
/// child would occupy, one level below its parent.
pub fn empty_slots<T>(root: Option<&TreeNode<T>>, config: &LayoutConfig) -> Vec<EmptySlot> {
    let mut slots = Vec::new();
    if let Some(root) = root {
        collect_slots(root, 0, root_span(config), config, &mut slots);
    }
    slots
}

fn collect_slots<T>(
    node: &TreeNode<T>,
    level: usize,
    span: Span,
    config: &LayoutConfig,
    out: &mut Vec<EmptySlot>,
) {
    let (left_span, right_span) = span.halves();
    let child_y = config.level_y(level + 1);

    for (side, child_span) in [(Side::Left, left_span), (Side::Right, right_span)] {
        match node.child(side) {
            Some(child) => collect_slots(child, level + 1, child_span, config, out),
            None => out.push(EmptySlot {
                parent_id: node.id.clone(),
                side,
                x: child_span.midpoint(),
                y: child_y,
            }),
        }
    }
}
