//! Drag session state machine.
//!
//! A session moves through `Idle -> Armed -> Active -> Idle`. Arming
//! records the pressed cell; activation happens once the configured
//! trigger fires (a long-press hold or the first pan sample). While
//! active, the running pointer offset, the absolute pointer and the
//! hovered drop target are published through [`Shared`] values so the
//! render side can follow them without owning the session. Ending,
//! cancelling and failing the gesture all go through [`DragSession::finish`].

use crate::config::DragTrigger;
use crate::error::{SwimlaneError, SwimlaneResult};
use crate::model::{CellAddress, ItemId};
use crate::shared::Shared;
use kurbo::{Point, Rect, Vec2};
use std::time::Duration;

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// The cell a drag started from.
#[derive(Debug, Clone, PartialEq)]
pub struct DragOrigin {
    pub cell: CellAddress,
    pub item: ItemId,
    /// Frame of the origin cell when the drag started.
    pub start_frame: Rect,
    /// Press position relative to the top-left of `start_frame`.
    pub grab: Vec2,
}

/// The cell currently hovered as drop target.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetPosition {
    pub cell: CellAddress,
    /// Item occupying the hovered cell, if any.
    pub id: Option<ItemId>,
}

/// Phase of the session.
#[derive(Debug, Clone, PartialEq)]
pub enum DragPhase {
    /// No drag in progress.
    Idle,
    /// A populated cell was pressed; waiting for the trigger.
    Armed { origin: DragOrigin, since: Instant },
    /// Dragging. `scroll_baseline` is the scroll offset at activation.
    Active {
        origin: DragOrigin,
        scroll_baseline: Vec2,
    },
}

/// What a finished drag hands to the reorder step.
#[derive(Debug, Clone, PartialEq)]
pub struct DragCommit {
    pub origin: DragOrigin,
    /// Last resolved drop target; `None` means the drag snaps back.
    pub target: Option<TargetPosition>,
}

/// State of the in-progress drag gesture.
#[derive(Debug)]
pub struct DragSession {
    phase: DragPhase,
    trigger: DragTrigger,
    long_press_delay: Duration,
    /// Translation of the dragged item since activation.
    offset: Shared<Vec2>,
    /// Absolute pointer position on screen.
    pointer: Shared<Point>,
    target: Shared<Option<TargetPosition>>,
    dragging: Shared<bool>,
}

impl DragSession {
    pub fn new(trigger: DragTrigger, long_press_delay: Duration) -> Self {
        Self {
            phase: DragPhase::Idle,
            trigger,
            long_press_delay,
            offset: Shared::new(Vec2::ZERO),
            pointer: Shared::new(Point::ZERO),
            target: Shared::new(None),
            dragging: Shared::new(false),
        }
    }

    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, DragPhase::Idle)
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.phase, DragPhase::Armed { .. })
    }

    /// Whether a drag is active.
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Active { .. })
    }

    /// Origin of the armed or active drag.
    pub fn origin(&self) -> Option<&DragOrigin> {
        match &self.phase {
            DragPhase::Idle => None,
            DragPhase::Armed { origin, .. } | DragPhase::Active { origin, .. } => Some(origin),
        }
    }

    pub fn scroll_baseline(&self) -> Option<Vec2> {
        match self.phase {
            DragPhase::Active { scroll_baseline, .. } => Some(scroll_baseline),
            _ => None,
        }
    }

    /// Record a press on a populated cell.
    ///
    /// Only one drag may exist at a time; pressing while armed or active is
    /// rejected.
    pub fn arm(&mut self, origin: DragOrigin, now: Instant) -> SwimlaneResult<()> {
        if !self.is_idle() {
            return Err(SwimlaneError::AlreadyDragging);
        }
        log::debug!("Drag armed on {:?} ({})", origin.cell, origin.item);
        self.phase = DragPhase::Armed { origin, since: now };
        Ok(())
    }

    /// Activate an armed long press once its delay has elapsed.
    /// Returns true if the session became active.
    pub fn poll(&mut self, now: Instant, scroll: Vec2) -> bool {
        let due = match &self.phase {
            DragPhase::Armed { since, .. } => {
                self.trigger == DragTrigger::LongPress
                    && now.saturating_duration_since(*since) >= self.long_press_delay
            }
            _ => false,
        };
        due && self.activate(scroll)
    }

    /// Handle the first pan sample of a gesture.
    ///
    /// With [`DragTrigger::PanStart`] this activates the drag. With a long
    /// press, panning before the hold completes means the user is scrolling,
    /// so the press is dropped.
    pub fn pan_start(&mut self, now: Instant, scroll: Vec2) -> bool {
        let DragPhase::Armed { since, .. } = &self.phase else {
            return false;
        };
        let held = now.saturating_duration_since(*since) >= self.long_press_delay;
        match self.trigger {
            DragTrigger::PanStart => self.activate(scroll),
            DragTrigger::LongPress if held => self.activate(scroll),
            DragTrigger::LongPress => {
                log::debug!("Pan before long press completed, dropping armed drag");
                self.phase = DragPhase::Idle;
                false
            }
        }
    }

    fn activate(&mut self, scroll: Vec2) -> bool {
        let phase = std::mem::replace(&mut self.phase, DragPhase::Idle);
        match phase {
            DragPhase::Armed { origin, .. } => {
                log::debug!("Drag active from {:?}", origin.cell);
                self.offset.set(Vec2::ZERO);
                self.target.set(None);
                self.phase = DragPhase::Active {
                    origin,
                    scroll_baseline: scroll,
                };
                self.dragging.set(true);
                true
            }
            other => {
                self.phase = other;
                false
            }
        }
    }

    /// Feed a gesture update. `translation` is the pointer travel since the
    /// gesture started; `absolute` is the pointer on screen.
    pub fn pointer_move(&mut self, translation: Vec2, absolute: Point) -> bool {
        if !self.is_dragging() {
            return false;
        }
        self.offset.set(translation);
        self.pointer.set(absolute);
        true
    }

    /// Replace the hovered drop target. Last hover wins.
    pub fn set_target(&mut self, target: Option<TargetPosition>) {
        if self.is_dragging() && self.target.set(target.clone()) {
            log::debug!("Drop target now {:?}", target.map(|t| t.cell));
        }
    }

    pub fn target(&self) -> Option<TargetPosition> {
        self.target.get()
    }

    pub fn offset(&self) -> Vec2 {
        self.offset.get()
    }

    pub fn pointer(&self) -> Point {
        self.pointer.get()
    }

    /// Handle to the running offset, for render-side subscribers.
    pub fn offset_handle(&self) -> Shared<Vec2> {
        self.offset.clone()
    }

    pub fn pointer_handle(&self) -> Shared<Point> {
        self.pointer.clone()
    }

    pub fn target_handle(&self) -> Shared<Option<TargetPosition>> {
        self.target.clone()
    }

    pub fn dragging_handle(&self) -> Shared<bool> {
        self.dragging.clone()
    }

    /// End the gesture. End, cancel and failure are all treated the same.
    ///
    /// An active drag yields its origin and last target; an armed press is
    /// simply dropped. Offsets and target are reset either way.
    pub fn finish(&mut self) -> Option<DragCommit> {
        let phase = std::mem::replace(&mut self.phase, DragPhase::Idle);
        let target = self.target.replace(None);
        self.offset.set(Vec2::ZERO);
        self.dragging.set(false);
        match phase {
            DragPhase::Active { origin, .. } => Some(DragCommit { origin, target }),
            _ => None,
        }
    }

    pub fn set_trigger(&mut self, trigger: DragTrigger, long_press_delay: Duration) {
        self.trigger = trigger;
        self.long_press_delay = long_press_delay;
    }
}

impl Default for DragSession {
    fn default() -> Self {
        Self::new(DragTrigger::default(), Duration::from_millis(500))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::frame;

    fn origin(key: &str) -> DragOrigin {
        DragOrigin {
            cell: CellAddress::new(0, 0, 0),
            item: ItemId::from_key(key),
            start_frame: frame(0.0, 0.0, 100.0, 50.0),
            grab: Vec2::new(50.0, 25.0),
        }
    }

    fn target(section: usize, column: usize, row: usize) -> TargetPosition {
        TargetPosition {
            cell: CellAddress::new(section, column, row),
            id: None,
        }
    }

    #[test]
    fn test_long_press_activates_after_delay() {
        let mut session = DragSession::new(DragTrigger::LongPress, Duration::from_millis(300));
        let t0 = Instant::now();
        session.arm(origin("a"), t0).unwrap();
        assert!(session.is_armed());

        assert!(!session.poll(t0 + Duration::from_millis(100), Vec2::ZERO));
        assert!(session.is_armed());

        assert!(session.poll(t0 + Duration::from_millis(300), Vec2::new(5.0, 7.0)));
        assert!(session.is_dragging());
        assert_eq!(session.scroll_baseline(), Some(Vec2::new(5.0, 7.0)));
        assert!(session.dragging_handle().get());
    }

    #[test]
    fn test_pan_trigger_activates_immediately() {
        let mut session = DragSession::new(DragTrigger::PanStart, Duration::from_millis(300));
        let t0 = Instant::now();
        session.arm(origin("a"), t0).unwrap();
        assert!(!session.poll(t0 + Duration::from_secs(5), Vec2::ZERO));
        assert!(session.pan_start(t0, Vec2::ZERO));
        assert!(session.is_dragging());
    }

    #[test]
    fn test_early_pan_drops_long_press() {
        let mut session = DragSession::new(DragTrigger::LongPress, Duration::from_millis(300));
        let t0 = Instant::now();
        session.arm(origin("a"), t0).unwrap();
        assert!(!session.pan_start(t0 + Duration::from_millis(50), Vec2::ZERO));
        assert!(session.is_idle());
    }

    #[test]
    fn test_second_drag_is_rejected() {
        let mut session = DragSession::new(DragTrigger::PanStart, Duration::ZERO);
        let t0 = Instant::now();
        session.arm(origin("a"), t0).unwrap();
        assert!(matches!(session.arm(origin("b"), t0), Err(SwimlaneError::AlreadyDragging)));

        session.pan_start(t0, Vec2::ZERO);
        assert!(matches!(session.arm(origin("b"), t0), Err(SwimlaneError::AlreadyDragging)));
        assert_eq!(session.origin().unwrap().item, ItemId::from_key("a"));
    }

    #[test]
    fn test_moves_are_ignored_unless_active() {
        let mut session = DragSession::default();
        assert!(!session.pointer_move(Vec2::new(10.0, 10.0), Point::new(10.0, 10.0)));
        assert_eq!(session.offset(), Vec2::ZERO);

        session.set_target(Some(target(0, 1, 0)));
        assert!(session.target().is_none());
    }

    #[test]
    fn test_last_hover_wins() {
        let mut session = DragSession::new(DragTrigger::PanStart, Duration::ZERO);
        let t0 = Instant::now();
        session.arm(origin("a"), t0).unwrap();
        session.pan_start(t0, Vec2::ZERO);

        session.set_target(Some(target(0, 1, 0)));
        session.set_target(None);
        session.set_target(Some(target(1, 2, 3)));

        let commit = session.finish().unwrap();
        assert_eq!(commit.target, Some(target(1, 2, 3)));
    }

    #[test]
    fn test_finish_resets_state() {
        let mut session = DragSession::new(DragTrigger::PanStart, Duration::ZERO);
        let t0 = Instant::now();
        session.arm(origin("a"), t0).unwrap();
        session.pan_start(t0, Vec2::ZERO);
        session.pointer_move(Vec2::new(40.0, 12.0), Point::new(140.0, 62.0));
        assert_eq!(session.offset(), Vec2::new(40.0, 12.0));

        let commit = session.finish().unwrap();
        assert_eq!(commit.origin, origin("a"));
        assert!(commit.target.is_none());
        assert!(session.is_idle());
        assert_eq!(session.offset(), Vec2::ZERO);
        assert!(!session.dragging_handle().get());
        assert!(session.finish().is_none());
    }

    #[test]
    fn test_release_while_armed_commits_nothing() {
        let mut session = DragSession::default();
        session.arm(origin("a"), Instant::now()).unwrap();
        assert!(session.finish().is_none());
        assert!(session.is_idle());
    }
}
