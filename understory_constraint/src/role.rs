// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Roles under which the manager tracks the constraints it installs.

use understory_view::{Attribute, Axis};

/// What a tracked constraint is for.
///
/// The registry holds at most one constraint per `(view, Role)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// `view.width = w` or `view.height = h`.
    FixedSize(Axis),
    /// `view.width = superview.width` or `view.height = superview.height`.
    MatchSuperviewSize(Axis),
    /// Horizontal alignment to the superview.
    AlignX,
    /// Vertical alignment to the superview.
    AlignY,
}

impl Role {
    /// Both per-axis [`FixedSize`](Self::FixedSize) roles, width first.
    pub const FIXED_SIZE: [Self; 2] = [
        Self::FixedSize(Axis::Horizontal),
        Self::FixedSize(Axis::Vertical),
    ];

    /// Both per-axis [`MatchSuperviewSize`](Self::MatchSuperviewSize) roles, width first.
    pub const MATCH_SUPERVIEW_SIZE: [Self; 2] = [
        Self::MatchSuperviewSize(Axis::Horizontal),
        Self::MatchSuperviewSize(Axis::Vertical),
    ];

    /// Both alignment roles, horizontal first.
    pub const ALIGNMENT: [Self; 2] = [Self::AlignX, Self::AlignY];

    /// Every role a view can carry.
    pub const ALL: [Self; 6] = [
        Self::FixedSize(Axis::Horizontal),
        Self::FixedSize(Axis::Vertical),
        Self::MatchSuperviewSize(Axis::Horizontal),
        Self::MatchSuperviewSize(Axis::Vertical),
        Self::AlignX,
        Self::AlignY,
    ];
}

/// The dimension attribute measured along `axis`.
pub(crate) const fn dimension(axis: Axis) -> Attribute {
    match axis {
        Axis::Horizontal => Attribute::Width,
        Axis::Vertical => Attribute::Height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_groups_cover_all_roles() {
        let grouped = Role::FIXED_SIZE
            .iter()
            .chain(&Role::MATCH_SUPERVIEW_SIZE)
            .chain(&Role::ALIGNMENT);
        for (a, b) in grouped.zip(Role::ALL.iter()) {
            assert_eq!(a, b, "groups list roles in the same order as ALL");
        }
    }

    #[test]
    fn dimension_matches_axis() {
        for axis in [Axis::Horizontal, Axis::Vertical] {
            assert_eq!(dimension(axis).axis(), axis);
            assert!(dimension(axis).is_dimension());
        }
    }
}
