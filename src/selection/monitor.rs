//! Debounced selection state machine.
//!
//! Driven once per host poll tick. Each tick first applies the observed
//! selection, then fires any expired timer:
//!
//! ```text
//! Idle --select A--> ArmedShow(A) --delay--> Visible(A)
//! Visible(A) --deselect--> ArmedClose --delay--> Idle
//! ArmedClose --select A again--> Visible(A)   (close cancelled, no flicker)
//! ```

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use super::timer::DebounceTimer;
use crate::provider::{ElementId, SelectionSource};

/// What the host reports as selected, reduced to what the monitor needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSnapshot {
    /// Exactly one element, of a previewable kind.
    Previewable(ElementId),
    /// Exactly one element, but nothing to preview for it.
    NotPreviewable(ElementId),
    /// Zero or several elements selected.
    Ambiguous { count: usize },
}

impl SelectionSnapshot {
    pub fn read<S>(source: &S) -> Self
    where
        S: SelectionSource + ?Sized,
    {
        let ids = source.selected_ids();
        match ids.as_slice() {
            [id] if source.element_kind(*id).is_previewable() => Self::Previewable(*id),
            [id] => Self::NotPreviewable(*id),
            _ => Self::Ambiguous { count: ids.len() },
        }
    }
}

/// Instruction for the owner of the preview window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorAction {
    /// Show the preview for this element, or refresh it if already shown.
    Show(ElementId),
    Hide,
}

/// Observable state, derived from the timers and visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorPhase {
    Idle,
    ArmedShow(ElementId),
    Visible(ElementId),
    ArmedClose,
}

#[derive(Debug, Clone)]
pub struct SelectionMonitor {
    last_id: Option<ElementId>,
    /// The element on screen; `Some` exactly while the preview is visible.
    shown_id: Option<ElementId>,
    show_timer: DebounceTimer<ElementId>,
    close_timer: DebounceTimer<()>,
}

impl SelectionMonitor {
    pub fn new(show_delay: Duration, close_delay: Duration) -> Self {
        Self {
            last_id: None,
            shown_id: None,
            show_timer: DebounceTimer::new(show_delay),
            close_timer: DebounceTimer::new(close_delay),
        }
    }

    pub fn last_id(&self) -> Option<ElementId> {
        self.last_id
    }

    pub fn is_visible(&self) -> bool {
        self.shown_id.is_some()
    }

    pub fn phase(&self) -> MonitorPhase {
        if let Some(id) = self.show_timer.payload() {
            MonitorPhase::ArmedShow(*id)
        } else if self.close_timer.is_armed() {
            MonitorPhase::ArmedClose
        } else if let Some(id) = self.shown_id {
            MonitorPhase::Visible(id)
        } else {
            MonitorPhase::Idle
        }
    }

    /// Earliest pending deadline, for hosts that schedule wakeups.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.show_timer.deadline(), self.close_timer.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Advance the state machine by one poll tick.
    pub fn tick(&mut self, now: Instant, snapshot: &SelectionSnapshot) -> Vec<MonitorAction> {
        match *snapshot {
            SelectionSnapshot::Previewable(id) if self.last_id != Some(id) => {
                trace!(%id, "Selection changed, arming show timer");
                self.close_timer.cancel();
                self.last_id = Some(id);
                self.show_timer.arm(now, id);
            }
            SelectionSnapshot::Previewable(_) => {
                if self.is_visible() {
                    self.close_timer.cancel();
                }
            }
            SelectionSnapshot::NotPreviewable(_) | SelectionSnapshot::Ambiguous { .. } => {
                self.last_id = None;
                self.show_timer.cancel();
                if self.is_visible() && !self.close_timer.is_armed() {
                    trace!(?snapshot, "Nothing to preview, arming close timer");
                    self.close_timer.arm(now, ());
                }
            }
        }

        let mut actions = Vec::new();
        if let Some(id) = self.show_timer.poll(now) {
            debug!(%id, "Show timer fired");
            self.shown_id = Some(id);
            actions.push(MonitorAction::Show(id));
        }
        if self.close_timer.poll(now).is_some() {
            debug!("Close timer fired");
            self.shown_id = None;
            actions.push(MonitorAction::Hide);
        }
        actions
    }

    /// The user closed the preview. Pending timers are dropped; the current
    /// selection is remembered so it does not immediately reopen the window.
    pub fn window_closed(&mut self) {
        self.show_timer.cancel();
        self.close_timer.cancel();
        self.shown_id = None;
    }

    /// Forget everything and disarm both timers.
    pub fn reset(&mut self) {
        self.show_timer.cancel();
        self.close_timer.cancel();
        self.last_id = None;
        self.shown_id = None;
    }
}
