// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the view tree: handles, flags, per-view geometry, and constraint endpoints.

use kurbo::{Affine, Point, Rect};

/// Identifier for a view in a [`ViewTree`](crate::ViewTree).
///
/// A small, copyable handle made of a slot index and a generation counter.
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed and every `ViewId` pointing at it becomes stale.
/// - On reuse of a freed slot, its generation is incremented.
///
/// Stale ids never alias a different live view because the generation must match.
/// Use [`ViewTree::is_alive`](crate::ViewTree::is_alive) to check liveness.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ViewId(pub(crate) u32, pub(crate) u32);

impl ViewId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Identifier for a layout constraint installed in a [`ViewTree`](crate::ViewTree).
///
/// Generational like [`ViewId`]; the tree drops constraints when their views are
/// detached, after which the id is stale.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ConstraintId(pub(crate) u32, pub(crate) u32);

impl ConstraintId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Per-view display flags.
    ///
    /// The default is empty: visible, not clipping.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ViewFlags: u8 {
        /// The view and its subtree are not displayed.
        const HIDDEN          = 0b0000_0001;
        /// Descendants are clipped to this view's bounds.
        const CLIPS_TO_BOUNDS = 0b0000_0010;
    }
}

/// Local state of a single view.
///
/// `frame` is expressed in the parent's content space, whose origin is the
/// parent's top-left corner. `transform` is applied on top of the frame, also in
/// parent space. A view without a parent is a root; its frame is in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewNode {
    /// Position and size in the parent's content space.
    pub frame: Rect,
    /// Additional transform applied in parent space after positioning.
    pub transform: Affine,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
    /// Display flags.
    pub flags: ViewFlags,
}

impl ViewNode {
    /// A visible view with the given frame and default everything else.
    #[must_use]
    pub fn with_frame(frame: Rect) -> Self {
        Self {
            frame,
            ..Self::default()
        }
    }

    /// Returns `true` if the view is hidden.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.flags.contains(ViewFlags::HIDDEN)
    }

    /// Returns `true` if the view paints at all: not hidden and with positive opacity.
    #[must_use]
    pub fn is_displayed(&self) -> bool {
        !self.is_hidden() && self.alpha > 0.0
    }

    /// The view's own bounds in its content space, anchored at the origin.
    ///
    /// Negative frame sizes are normalized.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.frame.abs().size())
    }
}

impl Default for ViewNode {
    fn default() -> Self {
        Self {
            frame: Rect::ZERO,
            transform: Affine::IDENTITY,
            alpha: 1.0,
            flags: ViewFlags::empty(),
        }
    }
}

/// Axis an attribute belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The x axis.
    Horizontal,
    /// The y axis.
    Vertical,
}

/// A named edge, center line, or dimension of a view usable as a constraint endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// Width of the frame.
    Width,
    /// Height of the frame.
    Height,
    /// Left edge.
    Leading,
    /// Right edge.
    Trailing,
    /// Top edge.
    Top,
    /// Bottom edge.
    Bottom,
    /// Horizontal center line.
    CenterX,
    /// Vertical center line.
    CenterY,
}

impl Attribute {
    /// The axis this attribute measures along.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Width | Self::Leading | Self::Trailing | Self::CenterX => Axis::Horizontal,
            Self::Height | Self::Top | Self::Bottom | Self::CenterY => Axis::Vertical,
        }
    }

    /// Returns `true` for [`Width`](Self::Width) and [`Height`](Self::Height).
    #[must_use]
    pub const fn is_dimension(self) -> bool {
        matches!(self, Self::Width | Self::Height)
    }

    /// Value of this attribute for `rect`.
    ///
    /// ```
    /// use kurbo::Rect;
    /// use understory_view::Attribute;
    ///
    /// let r = Rect::new(10.0, 20.0, 50.0, 40.0);
    /// assert_eq!(Attribute::Trailing.value_in(r), 50.0);
    /// assert_eq!(Attribute::CenterY.value_in(r), 30.0);
    /// assert_eq!(Attribute::Width.value_in(r), 40.0);
    /// ```
    #[must_use]
    pub fn value_in(self, rect: Rect) -> f64 {
        match self {
            Self::Width => rect.width(),
            Self::Height => rect.height(),
            Self::Leading => rect.x0,
            Self::Trailing => rect.x1,
            Self::Top => rect.y0,
            Self::Bottom => rect.y1,
            Self::CenterX => rect.center().x,
            Self::CenterY => rect.center().y,
        }
    }
}

/// One endpoint of a layout constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Anchor<V> {
    /// The view the attribute belongs to.
    pub view: V,
    /// The attribute.
    pub attribute: Attribute,
}

impl<V> Anchor<V> {
    /// Creates an anchor.
    pub const fn new(view: V, attribute: Attribute) -> Self {
        Self { view, attribute }
    }
}

/// An equality between two attributes, or between an attribute and a constant.
///
/// Reads as `first = second + constant`, or `first = constant` when `second` is `None`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConstraint<V> {
    /// The constrained endpoint.
    pub first: Anchor<V>,
    /// The reference endpoint, if any.
    pub second: Option<Anchor<V>>,
    /// Offset added to the reference value.
    pub constant: f64,
}

impl<V> LayoutConstraint<V> {
    /// `view.attribute = constant`.
    pub const fn fixed(view: V, attribute: Attribute, constant: f64) -> Self {
        Self {
            first: Anchor::new(view, attribute),
            second: None,
            constant,
        }
    }

    /// `first = second + constant`.
    pub const fn equal(first: Anchor<V>, second: Anchor<V>, constant: f64) -> Self {
        Self {
            first,
            second: Some(second),
            constant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_node_is_displayed_with_zero_frame() {
        let node = ViewNode::default();
        assert!(node.is_displayed());
        assert_eq!(node.frame, Rect::ZERO);
        assert_eq!(node.alpha, 1.0);
    }

    #[test]
    fn hidden_or_transparent_nodes_are_not_displayed() {
        let mut node = ViewNode::default();
        node.flags = ViewFlags::HIDDEN;
        assert!(!node.is_displayed());

        let mut node = ViewNode::default();
        node.alpha = 0.0;
        assert!(!node.is_displayed());
    }

    #[test]
    fn bounds_normalize_negative_sizes() {
        let node = ViewNode::with_frame(Rect::new(10.0, 10.0, 0.0, 5.0));
        assert_eq!(node.bounds(), Rect::new(0.0, 0.0, 10.0, 5.0));
    }

    #[test]
    fn attribute_axes() {
        assert_eq!(Attribute::Leading.axis(), Axis::Horizontal);
        assert_eq!(Attribute::CenterX.axis(), Axis::Horizontal);
        assert_eq!(Attribute::Bottom.axis(), Axis::Vertical);
        assert!(Attribute::Height.is_dimension());
        assert!(!Attribute::Top.is_dimension());
    }
}
