// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transition styles and their sampling.

use kurbo::{Affine, Rect};

/// Appearance of a view at some point of a transition, relative to its resting state.
///
/// `alpha` multiplies the view's own opacity and `transform` is applied in parent space
/// after the view's own transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionSample {
    /// Opacity multiplier.
    pub alpha: f64,
    /// Extra transform in parent space.
    pub transform: Affine,
}

impl TransitionSample {
    /// The resting state: fully opaque, untransformed.
    pub const IDENTITY: Self = Self {
        alpha: 1.0,
        transform: Affine::IDENTITY,
    };
}

impl Default for TransitionSample {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// How a view appears and disappears.
///
/// `progress` runs from `0.0` (not presented) to `1.0` (fully presented). Dismissal
/// samples the same curve backwards. `frame` is the view's frame in parent space and
/// is the reference for scaling.
pub trait Transition {
    /// Appearance at `progress`.
    fn sample(&self, progress: f64, frame: Rect) -> TransitionSample;
}

/// Built-in transitions.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum TransitionStyle {
    /// Opacity goes from 0 to 1.
    #[default]
    Fade,
    /// Scale about the frame center goes from `from` to 1.
    Scale {
        /// Initial scale factor.
        from: f64,
    },
    /// Fade and scale together.
    FadeScale {
        /// Initial scale factor.
        from: f64,
    },
}

impl Transition for TransitionStyle {
    fn sample(&self, progress: f64, frame: Rect) -> TransitionSample {
        let t = progress.clamp(0.0, 1.0);
        match *self {
            Self::Fade => TransitionSample {
                alpha: t,
                transform: Affine::IDENTITY,
            },
            Self::Scale { from } => TransitionSample {
                alpha: 1.0,
                transform: scale_about_center(from + (1.0 - from) * t, frame),
            },
            Self::FadeScale { from } => TransitionSample {
                alpha: t,
                transform: scale_about_center(from + (1.0 - from) * t, frame),
            },
        }
    }
}

fn scale_about_center(scale: f64, frame: Rect) -> Affine {
    let center = frame.center().to_vec2();
    Affine::translate(center) * Affine::scale(scale) * Affine::translate(-center)
}

/// Default transition settings for a [`PresentationController`](crate::PresentationController).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionConfig {
    /// Length of a full transition, in the same units as the clock passed to
    /// [`advance`](crate::PresentationController::advance) (milliseconds by convention).
    pub duration: u64,
    /// Style used by animated presents and dismisses that do not supply their own.
    pub style: TransitionStyle,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration: 250,
            style: TransitionStyle::Fade,
        }
    }
}
