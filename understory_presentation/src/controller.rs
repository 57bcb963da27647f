// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Presentation links and their transitions.

use alloc::boxed::Box;
use core::fmt;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;
use kurbo::{Affine, Rect};
use smallvec::SmallVec;
use understory_view::PresentationHost;

use crate::transition::{Transition, TransitionConfig};

/// Callback run once when a present or dismiss settles.
///
/// The flag is `true` when the operation finished and `false` when it was cancelled
/// or could not take place.
pub type Completion = Box<dyn FnOnce(bool)>;

/// Direction of an in-flight transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionPhase {
    /// The view is appearing.
    Presenting,
    /// The view is disappearing and will be detached when the transition ends.
    Dismissing,
}

/// Appearance captured when the view was presented, restored when transitions end.
#[derive(Clone, Copy)]
struct Resting {
    alpha: f64,
    transform: Affine,
}

struct Active {
    phase: TransitionPhase,
    /// Clock value of the first `advance` after the transition was created.
    start: Option<u64>,
    /// Progress at `start`.
    from: f64,
    progress: f64,
    completion: Option<Completion>,
}

struct Link<V> {
    host: V,
    transition: Box<dyn Transition>,
    duration: u64,
    resting: Resting,
    active: Option<Active>,
}

/// Tracks which view is presented over which host, and drives their transitions.
///
/// A view is the presented view of at most one link. Transitions run on the caller's
/// clock: they start on the first [`advance`](Self::advance) after they are created and
/// settle (detaching dismissed views and running completions) inside a later `advance`.
/// Every completion runs exactly once, or is dropped without running when the call it
/// was passed to does nothing.
pub struct PresentationController<V> {
    links: HashMap<V, Link<V>>,
    config: TransitionConfig,
}

impl<V: Debug> Debug for PresentationController<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentationController")
            .field("presented", &self.links.keys().collect::<SmallVec<[&V; 8]>>())
            .field("config", &self.config)
            .finish()
    }
}

impl<V> Default for PresentationController<V>
where
    V: Copy + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V> PresentationController<V>
where
    V: Copy + Eq + Hash + Debug,
{
    /// Creates a controller with the default [`TransitionConfig`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TransitionConfig::default())
    }

    /// Creates a controller using `config` for animated presents and dismisses.
    #[must_use]
    pub fn with_config(config: TransitionConfig) -> Self {
        Self {
            links: HashMap::new(),
            config,
        }
    }

    /// Current transition settings.
    #[must_use]
    pub fn config(&self) -> TransitionConfig {
        self.config
    }

    /// Replace the transition settings. Existing links keep the settings they were created with.
    pub fn set_config(&mut self, config: TransitionConfig) {
        self.config = config;
    }

    /// Present `view` over `host`. See [`present_with`](Self::present_with).
    pub fn present<H>(&mut self, tree: &mut H, view: V, host: V, animated: bool) -> Result<(), H::Error>
    where
        H: PresentationHost<View = V> + ?Sized,
    {
        self.present_with(tree, view, host, animated, None)
    }

    /// Insert `view` as the top-most child of `host` and link them.
    ///
    /// With `animated` the configured transition starts on the next
    /// [`advance`](Self::advance) and `completion` runs when it ends. Otherwise
    /// `completion` runs with `true` before this returns.
    ///
    /// Presenting an already presented view moves it to the new host and replaces the
    /// old link; a transition still in flight for it is cancelled and its completion
    /// runs with `false`. If the tree rejects the insertion, `completion` runs with
    /// `false`, the error is returned, and any existing link is kept.
    ///
    /// The frame of `view` is not modified.
    pub fn present_with<H>(
        &mut self,
        tree: &mut H,
        view: V,
        host: V,
        animated: bool,
        completion: Option<Completion>,
    ) -> Result<(), H::Error>
    where
        H: PresentationHost<View = V> + ?Sized,
    {
        let transition = Box::new(self.config.style);
        let duration = self.config.duration;
        self.present_inner(tree, view, host, transition, duration, animated, completion)
    }

    /// Present `view` over `host` with a caller-supplied transition lasting `duration`.
    ///
    /// The transition is also used if the view is later dismissed with animation.
    pub fn present_with_transition<H>(
        &mut self,
        tree: &mut H,
        view: V,
        host: V,
        transition: Box<dyn Transition>,
        duration: u64,
        completion: Option<Completion>,
    ) -> Result<(), H::Error>
    where
        H: PresentationHost<View = V> + ?Sized,
    {
        self.present_inner(tree, view, host, transition, duration, true, completion)
    }

    fn present_inner<H>(
        &mut self,
        tree: &mut H,
        view: V,
        host: V,
        transition: Box<dyn Transition>,
        duration: u64,
        animated: bool,
        completion: Option<Completion>,
    ) -> Result<(), H::Error>
    where
        H: PresentationHost<View = V> + ?Sized,
    {
        if let Err(err) = tree.add_child(host, view) {
            tracing::debug!(?view, ?host, "host rejected presentation");
            if let Some(done) = completion {
                done(false);
            }
            return Err(err);
        }
        if let Some(old) = self.links.remove(&view) {
            tracing::debug!(?view, old_host = ?old.host, ?host, "replaced presentation link");
            cancel(tree, view, old);
        }

        let resting = tree.node(view).map_or(
            Resting {
                alpha: 1.0,
                transform: Affine::IDENTITY,
            },
            |n| Resting {
                alpha: n.alpha,
                transform: n.transform,
            },
        );
        let mut link = Link {
            host,
            transition,
            duration,
            resting,
            active: None,
        };

        if animated {
            apply(tree, view, &link, 0.0);
            link.active = Some(Active {
                phase: TransitionPhase::Presenting,
                start: None,
                from: 0.0,
                progress: 0.0,
                completion,
            });
            self.links.insert(view, link);
            tracing::debug!(?view, ?host, duration, "presenting");
        } else {
            self.links.insert(view, link);
            tracing::debug!(?view, ?host, "presented");
            if let Some(done) = completion {
                done(true);
            }
        }
        Ok(())
    }

    /// Dismiss `view`. See [`dismiss_with`](Self::dismiss_with).
    pub fn dismiss<H>(&mut self, tree: &mut H, view: V, animated: bool) -> bool
    where
        H: PresentationHost<View = V> + ?Sized,
    {
        self.dismiss_with(tree, view, animated, None)
    }

    /// Detach `view` from the host it was presented over and destroy the link.
    ///
    /// Returns `false` if `view` is not presented; `completion` is then dropped without
    /// running. With `animated` the link's transition runs backwards from the current
    /// progress and the view is detached when it ends. Otherwise the view is detached
    /// now and `completion` runs with `true` before this returns.
    ///
    /// A dismiss already in flight absorbs later dismisses: only one completion runs,
    /// the in-flight one, or this call's if the in-flight dismiss had none. A present
    /// in flight is cancelled (its completion runs with `false`).
    pub fn dismiss_with<H>(
        &mut self,
        tree: &mut H,
        view: V,
        animated: bool,
        completion: Option<Completion>,
    ) -> bool
    where
        H: PresentationHost<View = V> + ?Sized,
    {
        let Some(link) = self.links.get_mut(&view) else {
            tracing::trace!(?view, "dismiss without presentation link");
            return false;
        };

        let from = match link.active.take() {
            Some(mut active) if active.phase == TransitionPhase::Dismissing => {
                if active.completion.is_none() {
                    active.completion = completion;
                }
                link.active = Some(active);
                tracing::trace!(?view, "coalesced dismiss");
                return true;
            }
            Some(active) => {
                tracing::debug!(?view, progress = active.progress, "dismiss cancelled present");
                if let Some(done) = active.completion {
                    done(false);
                }
                active.progress
            }
            None => 1.0,
        };

        if animated {
            link.active = Some(Active {
                phase: TransitionPhase::Dismissing,
                start: None,
                from,
                progress: from,
                completion,
            });
            tracing::debug!(?view, from, "dismissing");
            return true;
        }

        if let Some(link) = self.links.remove(&view) {
            finish_dismiss(tree, view, &link);
        }
        if let Some(done) = completion {
            done(true);
        }
        true
    }

    /// Step every in-flight transition to clock value `now`.
    ///
    /// Transitions created since the last call start at `now`. Finished presents
    /// restore the view's resting appearance; finished dismisses also detach the view
    /// (if it is still a child of its host) and destroy the link. Links whose view no
    /// longer exists are destroyed and their pending completion runs with `false`.
    ///
    /// Completions run after all state is updated. Returns the number of transitions
    /// that finished.
    pub fn advance<H>(&mut self, tree: &mut H, now: u64) -> usize
    where
        H: PresentationHost<View = V> + ?Sized,
    {
        let mut finished: SmallVec<[(V, TransitionPhase); 4]> = SmallVec::new();
        let mut dead: SmallVec<[V; 4]> = SmallVec::new();

        for (&view, link) in &mut self.links {
            if tree.node(view).is_none() {
                dead.push(view);
                continue;
            }
            let Some(active) = link.active.as_mut() else {
                continue;
            };
            let start = *active.start.get_or_insert(now);
            let delta = if link.duration == 0 {
                1.0
            } else {
                now.saturating_sub(start) as f64 / link.duration as f64
            };
            let (progress, done) = match active.phase {
                TransitionPhase::Presenting => {
                    let p = (active.from + delta).min(1.0);
                    (p, p >= 1.0)
                }
                TransitionPhase::Dismissing => {
                    let p = (active.from - delta).max(0.0);
                    (p, p <= 0.0)
                }
            };
            active.progress = progress;
            let phase = active.phase;

            if done {
                finished.push((view, phase));
            } else {
                apply(tree, view, link, progress);
            }
        }

        let mut completions: SmallVec<[(Completion, bool); 4]> = SmallVec::new();
        for view in dead {
            if let Some(link) = self.links.remove(&view) {
                tracing::debug!(?view, host = ?link.host, "dropped link of removed view");
                if let Some(done) = link.active.and_then(|a| a.completion) {
                    completions.push((done, false));
                }
            }
        }
        for &(view, phase) in &finished {
            let active = match phase {
                TransitionPhase::Presenting => self.links.get_mut(&view).and_then(|link| {
                    restore(tree, view, link.resting);
                    tracing::debug!(?view, host = ?link.host, "presented");
                    link.active.take()
                }),
                TransitionPhase::Dismissing => self.links.remove(&view).and_then(|link| {
                    finish_dismiss(tree, view, &link);
                    link.active
                }),
            };
            if let Some(done) = active.and_then(|a| a.completion) {
                completions.push((done, true));
            }
        }

        for (done, ok) in completions {
            done(ok);
        }
        finished.len()
    }

    /// Destroy links that no longer describe the tree.
    ///
    /// A link is stale when its view or host no longer exists, or when it is settled and
    /// the view was moved away from the host by someone else. Pending completions run
    /// with `false`. Returns the number of links destroyed.
    pub fn prune<H>(&mut self, tree: &mut H) -> usize
    where
        H: PresentationHost<View = V> + ?Sized,
    {
        let stale: SmallVec<[V; 4]> = self
            .links
            .iter()
            .filter(|(view, link)| {
                tree.node(**view).is_none()
                    || tree.node(link.host).is_none()
                    || (link.active.is_none() && tree.parent(**view) != Some(link.host))
            })
            .map(|(view, _)| *view)
            .collect();
        for view in &stale {
            if let Some(link) = self.links.remove(view) {
                tracing::debug!(?view, host = ?link.host, "pruned presentation link");
                if tree.node(*view).is_some() {
                    cancel(tree, *view, link);
                } else if let Some(done) = link.active.and_then(|a| a.completion) {
                    done(false);
                }
            }
        }
        stale.len()
    }

    /// The host `view` is presented over.
    #[must_use]
    pub fn presenting_view(&self, view: V) -> Option<V> {
        self.links.get(&view).map(|link| link.host)
    }

    /// Returns `true` if `view` has an active link, including while it is being dismissed.
    #[must_use]
    pub fn is_presented(&self, view: V) -> bool {
        self.links.contains_key(&view)
    }

    /// Returns `true` if a present or dismiss transition is in flight for `view`.
    #[must_use]
    pub fn is_transitioning(&self, view: V) -> bool {
        self.transition_phase(view).is_some()
    }

    /// Direction of the transition in flight for `view`, if any.
    #[must_use]
    pub fn transition_phase(&self, view: V) -> Option<TransitionPhase> {
        self.links
            .get(&view)
            .and_then(|link| link.active.as_ref())
            .map(|a| a.phase)
    }

    /// Progress of the transition in flight for `view`, from `0.0` (hidden) to `1.0` (shown).
    #[must_use]
    pub fn transition_progress(&self, view: V) -> Option<f64> {
        self.links
            .get(&view)
            .and_then(|link| link.active.as_ref())
            .map(|a| a.progress)
    }

    /// Views presented over `host`, in no particular order.
    pub fn presented_views(&self, host: V) -> impl Iterator<Item = V> + '_ {
        self.links
            .iter()
            .filter(move |(_, link)| link.host == host)
            .map(|(view, _)| *view)
    }

    /// Number of active links.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns `true` if nothing is presented.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

fn apply<H, V>(tree: &mut H, view: V, link: &Link<V>, progress: f64)
where
    H: PresentationHost<View = V> + ?Sized,
    V: Copy,
{
    let frame = tree.node(view).map_or(Rect::ZERO, |n| n.frame);
    let sample = link.transition.sample(progress, frame);
    tree.set_alpha(view, link.resting.alpha * sample.alpha);
    tree.set_transform(view, sample.transform * link.resting.transform);
}

fn restore<H, V>(tree: &mut H, view: V, resting: Resting)
where
    H: PresentationHost<View = V> + ?Sized,
    V: Copy,
{
    tree.set_alpha(view, resting.alpha);
    tree.set_transform(view, resting.transform);
}

/// Restore `view` and run a pending completion with `false`.
fn cancel<H, V>(tree: &mut H, view: V, link: Link<V>)
where
    H: PresentationHost<View = V> + ?Sized,
    V: Copy + Debug,
{
    let Some(active) = link.active else {
        return;
    };
    restore(tree, view, link.resting);
    tracing::debug!(?view, phase = ?active.phase, "cancelled transition");
    if let Some(done) = active.completion {
        done(false);
    }
}

fn finish_dismiss<H, V>(tree: &mut H, view: V, link: &Link<V>)
where
    H: PresentationHost<View = V> + ?Sized,
    V: Copy + Eq + Debug,
{
    if tree.parent(view) == Some(link.host) {
        tree.remove_from_parent(view);
    }
    restore(tree, view, link.resting);
    tracing::debug!(?view, host = ?link.host, "dismissed");
}
