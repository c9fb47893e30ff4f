//! Step-by-step walkthrough driving the placement solver.
//!
//! Steps carry optional before/after effects of a host-defined type `E`
//! (for example "switch to the split layout so the notes tab exists").
//! The tour never runs them itself: every navigation call returns a
//! [`TourTransition`] listing the effects to apply, in order, and the host
//! applies them before the next measurement.

use floatkit_protocol::{PlacementResult, SharedStr, Side, Size, ViewportMetrics};
use serde::{Deserialize, Serialize};

use crate::error::PlacementError;
use crate::host::ElementRects;
use crate::placement::Solver;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourStep<E> {
    pub target_id: String,
    pub title: SharedStr,
    pub content: SharedStr,
    /// Preferred side; the solver may flip it.
    pub placement: Side,
    pub before: Option<E>,
    pub after: Option<E>,
}

impl<E> TourStep<E> {
    pub fn new(
        target_id: impl Into<String>,
        title: impl Into<SharedStr>,
        content: impl Into<SharedStr>,
        placement: Side,
    ) -> Self {
        Self {
            target_id: target_id.into(),
            title: title.into(),
            content: content.into(),
            placement,
            before: None,
            after: None,
        }
    }

    /// Effect the host applies before the step's target is measured.
    #[must_use]
    pub fn with_before(mut self, effect: E) -> Self {
        self.before = Some(effect);
        self
    }

    /// Effect the host applies when leaving the step, however it is left.
    #[must_use]
    pub fn with_after(mut self, effect: E) -> Self {
        self.after = Some(effect);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TourStatus {
    NotStarted,
    Active,
    /// Advanced past the last step.
    Completed,
    /// Ended early.
    Dismissed,
}

/// Where the overlay for the current step stands.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayState {
    /// No active step.
    Inactive,
    /// Step changed or viewport resized; waiting for the host to measure.
    Pending,
    Shown(PlacementResult),
    /// Target missing; the overlay stays hidden until a later measurement
    /// finds it.
    Hidden(PlacementError),
}

/// Outcome of one navigation call.
#[derive(Debug, Clone, PartialEq)]
pub struct TourTransition<E> {
    pub from: Option<usize>,
    pub to: Option<usize>,
    /// Exiting step's after-effect, then entering step's before-effect.
    pub effects: Vec<E>,
}

impl<E> TourTransition<E> {
    fn noop(at: Option<usize>) -> Self {
        Self {
            from: at,
            to: at,
            effects: Vec::new(),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.from == self.to && self.effects.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Tour<E> {
    steps: Vec<TourStep<E>>,
    current: Option<usize>,
    status: TourStatus,
    overlay: OverlayState,
}

impl<E: Clone> Tour<E> {
    pub fn new(steps: Vec<TourStep<E>>) -> Self {
        Self {
            steps,
            current: None,
            status: TourStatus::NotStarted,
            overlay: OverlayState::Inactive,
        }
    }

    pub fn steps(&self) -> &[TourStep<E>] {
        &self.steps
    }

    pub fn status(&self) -> TourStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == TourStatus::Active
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_step(&self) -> Option<&TourStep<E>> {
        self.current.and_then(|i| self.steps.get(i))
    }

    pub fn is_first(&self) -> bool {
        self.current == Some(0)
    }

    pub fn is_last(&self) -> bool {
        self.current.is_some_and(|i| i + 1 == self.steps.len())
    }

    /// `(1-based step, total)` for the step counter.
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.current.map(|i| (i + 1, self.steps.len()))
    }

    pub fn overlay(&self) -> &OverlayState {
        &self.overlay
    }

    pub fn needs_measure(&self) -> bool {
        self.overlay == OverlayState::Pending
    }

    pub fn current_placement(&self) -> Option<&PlacementResult> {
        match &self.overlay {
            OverlayState::Shown(result) => Some(result),
            _ => None,
        }
    }

    /// Enter the first step. Restarts a finished tour; no-op while active.
    /// A tour without steps completes immediately.
    pub fn start(&mut self) -> TourTransition<E> {
        if self.is_active() {
            return TourTransition::noop(self.current);
        }
        if self.steps.is_empty() {
            self.status = TourStatus::Completed;
            return TourTransition::noop(None);
        }
        self.status = TourStatus::Active;
        self.enter(None, 0, Vec::new())
    }

    pub fn advance(&mut self) -> TourTransition<E> {
        match self.current {
            Some(i) if self.is_active() && i + 1 < self.steps.len() => self.go_to(i + 1),
            Some(_) if self.is_active() => self.finish(TourStatus::Completed),
            _ => TourTransition::noop(self.current),
        }
    }

    pub fn retreat(&mut self) -> TourTransition<E> {
        match self.current {
            Some(i) if self.is_active() && i > 0 => self.go_to(i - 1),
            _ => TourTransition::noop(self.current),
        }
    }

    /// Dismiss the tour early. The active step's after-effect is still
    /// returned.
    pub fn end(&mut self) -> TourTransition<E> {
        if self.is_active() {
            self.finish(TourStatus::Dismissed)
        } else {
            TourTransition::noop(self.current)
        }
    }

    /// Jump to `index`. Out-of-range targets, the current step, and inactive
    /// tours are no-ops.
    pub fn go_to(&mut self, index: usize) -> TourTransition<E> {
        let from = self.current;
        if !self.is_active() || index >= self.steps.len() || from == Some(index) {
            return TourTransition::noop(from);
        }
        let effects = self.exit_effects();
        self.enter(from, index, effects)
    }

    /// Resolve the overlay for the current step against fresh host geometry.
    ///
    /// `tooltip` is the measured size of the tooltip box. Call after the
    /// settle delay following a transition, and on every viewport resize.
    pub fn measure<R>(
        &mut self,
        solver: &Solver,
        rects: &R,
        tooltip: Size,
        viewport: ViewportMetrics,
    ) -> &OverlayState
    where
        R: ElementRects + ?Sized,
    {
        let next = match self.current_step() {
            None => OverlayState::Inactive,
            Some(step) => {
                match solver.place(rects, &step.target_id, tooltip, step.placement, viewport) {
                    Ok(result) => OverlayState::Shown(result),
                    Err(err) => {
                        tracing::warn!(target_id = %step.target_id, "tour target missing, hiding overlay");
                        OverlayState::Hidden(err)
                    }
                }
            }
        };
        self.overlay = next;
        &self.overlay
    }

    /// Mark the overlay stale: the viewport resized or host layout moved the
    /// target. The next [`Tour::measure`] recomputes it.
    pub fn invalidate(&mut self) {
        if self.current.is_some() {
            self.overlay = OverlayState::Pending;
        }
    }

    fn exit_effects(&self) -> Vec<E> {
        self.current_step()
            .and_then(|step| step.after.clone())
            .into_iter()
            .collect()
    }

    fn enter(&mut self, from: Option<usize>, index: usize, mut effects: Vec<E>) -> TourTransition<E> {
        if let Some(before) = self.steps.get(index).and_then(|s| s.before.clone()) {
            effects.push(before);
        }
        self.current = Some(index);
        self.overlay = OverlayState::Pending;
        tracing::debug!(?from, to = index, effects = effects.len(), "tour step entered");
        TourTransition {
            from,
            to: Some(index),
            effects,
        }
    }

    fn finish(&mut self, status: TourStatus) -> TourTransition<E> {
        let from = self.current;
        let effects = self.exit_effects();
        self.current = None;
        self.status = status;
        self.overlay = OverlayState::Inactive;
        tracing::debug!(?from, ?status, "tour finished");
        TourTransition {
            from,
            to: None,
            effects,
        }
    }
}
