//! # Scroll-spy
//!
//! Keeps exactly one TOC entry marked active while the reader scrolls. The
//! host supplies a [`VisibilityObserver`] that reports which heading anchors
//! intersect the observed part of the viewport, and an [`ActiveMarkerSink`]
//! that draws the active marker. This module never touches the fragment or
//! the TOC.
//!
//! ```text
//!             attach                 on_visibility (some intersecting)
//!   Inactive ───────► Inactive* ─────────────────────────► Tracking(id)
//!      ▲                                                      │   ▲
//!      └──────────────────────── teardown ────────────────────┘   │
//!                                                                 └── on_visibility
//! ```
//!
//! `Inactive*` is inactive but observing.

use std::fmt;
use std::ops::Range;

use crate::toc::Toc;

/// Observation margins as percentages of the viewport height. Negative
/// values shrink the observed region, positive values grow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootMargin {
    pub top: i32,
    pub bottom: i32,
}

impl Default for RootMargin {
    /// Biased to the upper part of the viewport, so a heading becomes
    /// current a little before it reaches the very top.
    fn default() -> Self {
        Self { top: 0, bottom: -70 }
    }
}

impl RootMargin {
    /// The rows of content, in the same units as `viewport_top`, that count
    /// as intersecting for a viewport of `height` rows.
    pub fn observed_band(&self, viewport_top: usize, height: usize) -> Range<usize> {
        let h = height as i64;
        let top = viewport_top as i64 - h * i64::from(self.top) / 100;
        let bottom = viewport_top as i64 + h + h * i64::from(self.bottom) / 100;
        let start = top.max(0) as usize;
        let end = (bottom.max(0) as usize).max(start);
        start..end
    }
}

impl fmt::Display for RootMargin {
    /// CSS `rootMargin` form: top, right, bottom, left.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn side(v: i32) -> String {
            if v == 0 { "0px".into() } else { format!("{v}%") }
        }
        write!(f, "{} 0px {} 0px", side(self.top), side(self.bottom))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    pub root_margin: RootMargin,
    /// Fraction of the target that must be inside the band. `0.0` means any
    /// overlap.
    pub threshold: f32,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            root_margin: RootMargin::default(),
            threshold: 0.0,
        }
    }
}

/// Reports visibility changes of registered heading anchors.
pub trait VisibilityObserver {
    fn observe(&mut self, target: &str, options: &ObserverOptions);
    /// Stops all observation. Must be harmless when nothing is observed.
    fn disconnect(&mut self);
}

/// Draws or clears the "active" marker on a TOC entry.
pub trait ActiveMarkerSink {
    fn set_active(&mut self, id: &str, active: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityEntry<'a> {
    pub target: &'a str,
    pub is_intersecting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SpyState {
    #[default]
    Inactive,
    Tracking(String),
}

pub struct ScrollSpy<O: VisibilityObserver, S: ActiveMarkerSink> {
    observer: O,
    sink: S,
    /// Heading ids in document order.
    targets: Vec<String>,
    state: SpyState,
    observing: bool,
}

impl<O: VisibilityObserver, S: ActiveMarkerSink> ScrollSpy<O, S> {
    /// Registers every TOC heading with the observer.
    pub fn attach(toc: &Toc, mut observer: O, sink: S, options: &ObserverOptions) -> Self {
        let targets: Vec<String> = toc.ids().map(str::to_string).collect();
        for id in &targets {
            observer.observe(id, options);
        }
        log::trace!(
            "scroll-spy observing {} heading(s) with margin {}",
            targets.len(),
            options.root_margin
        );
        Self {
            observer,
            sink,
            observing: !targets.is_empty(),
            targets,
            state: SpyState::Inactive,
        }
    }

    /// Handles one visibility callback. The new active heading is the first
    /// intersecting one in document order; entries for unknown targets are
    /// ignored. With nothing intersecting the state is left as it was.
    pub fn on_visibility(&mut self, entries: &[VisibilityEntry<'_>]) {
        if !self.observing {
            return;
        }
        let next = self.targets.iter().find(|id| {
            entries
                .iter()
                .any(|e| e.is_intersecting && e.target == id.as_str())
        });
        let Some(next) = next else {
            return;
        };
        if self.active_id() == Some(next.as_str()) {
            return;
        }

        if let SpyState::Tracking(prev) = &self.state {
            self.sink.set_active(prev, false);
        }
        self.sink.set_active(next, true);
        log::trace!("scroll-spy {:?} -> Tracking({next})", self.state);
        self.state = SpyState::Tracking(next.clone());
    }

    /// Disconnects the observer and clears the active marker. Calling it
    /// again does nothing.
    pub fn teardown(&mut self) {
        if self.observing {
            self.observer.disconnect();
            self.observing = false;
        }
        if let SpyState::Tracking(prev) = std::mem::take(&mut self.state) {
            self.sink.set_active(&prev, false);
            log::trace!("scroll-spy Tracking({prev}) -> Inactive");
        }
    }

    pub fn active_id(&self) -> Option<&str> {
        match &self.state {
            SpyState::Tracking(id) => Some(id),
            SpyState::Inactive => None,
        }
    }

    pub fn state(&self) -> &SpyState {
        &self.state
    }

    pub fn is_observing(&self) -> bool {
        self.observing
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
