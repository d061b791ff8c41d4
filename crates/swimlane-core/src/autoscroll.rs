//! Edge autoscrolling while a drag is active.
//!
//! Each axis is handled on its own. When the pointer comes within the
//! threshold of an edge and there is room to scroll that way, the axis
//! starts a short fixed-length animation of its offset by one step. Only
//! one animation per axis runs at a time; a new trigger is ignored until
//! the running one completes. Offsets always stay within `[0, max]`.

use crate::config::{EdgeThresholds, SwimlaneConfig};
use crate::shared::Shared;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Scroll axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Imperative side of the scroll container.
pub trait ScrollSink {
    /// Move the container to `offset` on `axis`.
    fn scroll_to(&mut self, axis: Axis, offset: f64);
}

/// A running offset animation.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScrollAnimation {
    from: f64,
    to: f64,
    start: Instant,
    duration: Duration,
}

impl ScrollAnimation {
    fn value_at(&self, now: Instant) -> (f64, bool) {
        let elapsed = now.saturating_duration_since(self.start);
        if self.duration.is_zero() || elapsed >= self.duration {
            return (self.to, true);
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (self.from + (self.to - self.from) * t, false)
    }
}

/// Scroll state and edge detection for one axis.
#[derive(Debug)]
pub struct AxisScroller {
    offset: Shared<f64>,
    content: f64,
    viewport: f64,
    /// Threshold at the start edge (left or top).
    near_threshold: f64,
    /// Threshold at the end edge (right or bottom).
    far_threshold: f64,
    animation: Option<ScrollAnimation>,
}

impl AxisScroller {
    pub fn new(near_threshold: f64, far_threshold: f64) -> Self {
        Self {
            offset: Shared::new(0.0),
            content: 0.0,
            viewport: 0.0,
            near_threshold,
            far_threshold,
            animation: None,
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset.get()
    }

    pub fn offset_handle(&self) -> Shared<f64> {
        self.offset.clone()
    }

    /// Largest reachable offset.
    pub fn max_offset(&self) -> f64 {
        (self.content - self.viewport).max(0.0)
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Record a scroll event from the container.
    pub fn on_scroll(&mut self, offset: f64, content: f64, viewport: f64) {
        self.content = content.max(0.0);
        self.viewport = viewport.max(0.0);
        // While animating the controller owns the offset; the container
        // only echoes what it was told.
        if self.animation.is_none() {
            self.offset.set(offset.clamp(0.0, self.max_offset()));
        }
    }

    /// Record a new content size and re-clamp the offset.
    pub fn on_content_size_change(&mut self, content: f64) {
        self.content = content.max(0.0);
        let clamped = self.offset.get().clamp(0.0, self.max_offset());
        self.offset.set(clamped);
    }

    pub fn set_viewport(&mut self, viewport: f64) {
        self.viewport = viewport.max(0.0);
    }

    pub fn set_thresholds(&mut self, near: f64, far: f64) {
        self.near_threshold = near;
        self.far_threshold = far;
    }

    /// Check the pointer against both edges and start an animation if it
    /// is close to one. `pointer` is in viewport space. Returns whether an
    /// animation was started.
    pub fn evaluate(&mut self, pointer: f64, step: f64, duration: Duration, now: Instant) -> bool {
        if self.animation.is_some() || self.viewport <= 0.0 {
            return false;
        }
        let offset = self.offset.get();
        let max = self.max_offset();

        let to = if pointer >= self.viewport - self.far_threshold && offset < max {
            (offset + step).min(max)
        } else if pointer <= self.near_threshold && offset > 0.0 {
            (offset - step).max(0.0)
        } else {
            return false;
        };

        self.animation = Some(ScrollAnimation {
            from: offset,
            to,
            start: now,
            duration,
        });
        true
    }

    /// Advance the running animation. Returns the new offset if it moved.
    pub fn tick(&mut self, now: Instant) -> Option<f64> {
        let animation = self.animation?;
        let (value, done) = animation.value_at(now);
        if done {
            self.animation = None;
        }
        let value = value.clamp(0.0, self.max_offset());
        self.offset.set(value).then_some(value)
    }

    /// Stop any running animation where it is.
    pub fn stop(&mut self) {
        self.animation = None;
    }
}

/// Offsets that changed during a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollUpdate {
    pub horizontal: Option<f64>,
    pub vertical: Option<f64>,
}

impl ScrollUpdate {
    pub fn is_empty(&self) -> bool {
        self.horizontal.is_none() && self.vertical.is_none()
    }

    /// Push the changed offsets into the container.
    pub fn apply(&self, sink: &mut dyn ScrollSink) {
        if let Some(offset) = self.horizontal {
            sink.scroll_to(Axis::Horizontal, offset);
        }
        if let Some(offset) = self.vertical {
            sink.scroll_to(Axis::Vertical, offset);
        }
    }
}

/// Drives both scroll axes from the pointer position.
#[derive(Debug)]
pub struct AutoScroller {
    horizontal: AxisScroller,
    vertical: AxisScroller,
    step: f64,
    duration: Duration,
}

impl AutoScroller {
    pub fn new(thresholds: EdgeThresholds, step: f64, duration: Duration) -> Self {
        Self {
            horizontal: AxisScroller::new(thresholds.left, thresholds.right),
            vertical: AxisScroller::new(thresholds.top, thresholds.bottom),
            step,
            duration,
        }
    }

    pub fn from_config(config: &SwimlaneConfig) -> Self {
        Self::new(
            config.edge_thresholds,
            config.scroll_step,
            Duration::from_millis(config.scroll_duration_ms),
        )
    }

    pub fn axis(&self, axis: Axis) -> &AxisScroller {
        match axis {
            Axis::Horizontal => &self.horizontal,
            Axis::Vertical => &self.vertical,
        }
    }

    pub fn axis_mut(&mut self, axis: Axis) -> &mut AxisScroller {
        match axis {
            Axis::Horizontal => &mut self.horizontal,
            Axis::Vertical => &mut self.vertical,
        }
    }

    /// Current offsets as a vector (x = horizontal, y = vertical).
    pub fn offsets(&self) -> Vec2 {
        Vec2::new(self.horizontal.offset(), self.vertical.offset())
    }

    /// Evaluate both axes against a pointer in viewport space.
    pub fn evaluate(&mut self, pointer: Point, now: Instant) {
        if self.horizontal.evaluate(pointer.x, self.step, self.duration, now) {
            log::debug!("Autoscroll horizontal from {}", self.horizontal.offset());
        }
        if self.vertical.evaluate(pointer.y, self.step, self.duration, now) {
            log::debug!("Autoscroll vertical from {}", self.vertical.offset());
        }
    }

    /// Advance both animations.
    pub fn tick(&mut self, now: Instant) -> ScrollUpdate {
        ScrollUpdate {
            horizontal: self.horizontal.tick(now),
            vertical: self.vertical.tick(now),
        }
    }

    pub fn is_animating(&self) -> bool {
        self.horizontal.is_animating() || self.vertical.is_animating()
    }

    pub fn stop(&mut self) {
        self.horizontal.stop();
        self.vertical.stop();
    }

    pub fn configure(&mut self, config: &SwimlaneConfig) {
        let t = config.edge_thresholds;
        self.horizontal.set_thresholds(t.left, t.right);
        self.vertical.set_thresholds(t.top, t.bottom);
        self.step = config.scroll_step;
        self.duration = Duration::from_millis(config.scroll_duration_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: f64 = 100.0;
    const DURATION: Duration = Duration::from_millis(200);

    fn axis(offset: f64, content: f64, viewport: f64) -> AxisScroller {
        let mut axis = AxisScroller::new(100.0, 100.0);
        axis.on_scroll(offset, content, viewport);
        axis
    }

    #[test]
    fn test_far_edge_scrolls_forward() {
        let mut axis = axis(0.0, 1000.0, 400.0);
        let t0 = Instant::now();
        assert!(axis.evaluate(350.0, STEP, DURATION, t0));
        assert!(axis.is_animating());

        let mid = axis.tick(t0 + Duration::from_millis(100)).unwrap();
        assert!((mid - 50.0).abs() < 1e-9);

        let end = axis.tick(t0 + DURATION).unwrap();
        assert!((end - 100.0).abs() < f64::EPSILON);
        assert!(!axis.is_animating());
    }

    #[test]
    fn test_near_edge_scrolls_back() {
        let mut axis = axis(250.0, 1000.0, 400.0);
        let t0 = Instant::now();
        assert!(axis.evaluate(20.0, STEP, DURATION, t0));
        axis.tick(t0 + DURATION);
        assert!((axis.offset() - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_middle_of_viewport_does_nothing() {
        let mut axis = axis(100.0, 1000.0, 400.0);
        assert!(!axis.evaluate(200.0, STEP, DURATION, Instant::now()));
        assert!(!axis.is_animating());
    }

    #[test]
    fn test_at_max_never_scrolls_past() {
        let mut axis = axis(600.0, 1000.0, 400.0);
        let t0 = Instant::now();
        for i in 0..5 {
            assert!(!axis.evaluate(399.0, STEP, DURATION, t0 + Duration::from_millis(i * 50)));
            assert!(axis.tick(t0 + Duration::from_millis(i * 50)).is_none());
        }
        assert!((axis.offset() - axis.max_offset()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_step_is_clamped_to_max() {
        let mut axis = axis(550.0, 1000.0, 400.0);
        let t0 = Instant::now();
        assert!(axis.evaluate(399.0, STEP, DURATION, t0));
        axis.tick(t0 + DURATION);
        assert!((axis.offset() - 600.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_at_zero_never_scrolls_back() {
        let mut axis = axis(0.0, 1000.0, 400.0);
        assert!(!axis.evaluate(0.0, STEP, DURATION, Instant::now()));
    }

    #[test]
    fn test_one_animation_in_flight() {
        let mut axis = axis(0.0, 1000.0, 400.0);
        let t0 = Instant::now();
        assert!(axis.evaluate(390.0, STEP, DURATION, t0));
        assert!(!axis.evaluate(390.0, STEP, DURATION, t0 + Duration::from_millis(50)));

        axis.tick(t0 + DURATION);
        assert!(axis.evaluate(390.0, STEP, DURATION, t0 + DURATION));
        axis.tick(t0 + DURATION * 2);
        assert!((axis.offset() - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_external_scroll_is_clamped() {
        let mut axis = axis(0.0, 1000.0, 400.0);
        axis.on_scroll(900.0, 1000.0, 400.0);
        assert!((axis.offset() - 600.0).abs() < f64::EPSILON);
        axis.on_scroll(-30.0, 1000.0, 400.0);
        assert!(axis.offset().abs() < f64::EPSILON);
    }

    #[test]
    fn test_shrinking_content_reclamps() {
        let mut axis = axis(500.0, 1000.0, 400.0);
        axis.on_content_size_change(700.0);
        assert!((axis.offset() - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_axes_are_independent() {
        let mut scroller = AutoScroller::new(EdgeThresholds::default(), STEP, DURATION);
        scroller.axis_mut(Axis::Horizontal).on_scroll(0.0, 2000.0, 800.0);
        scroller.axis_mut(Axis::Vertical).on_scroll(0.0, 600.0, 600.0);

        let t0 = Instant::now();
        scroller.evaluate(Point::new(790.0, 590.0), t0);
        assert!(scroller.axis(Axis::Horizontal).is_animating());
        // No vertical room, so no vertical animation.
        assert!(!scroller.axis(Axis::Vertical).is_animating());

        let update = scroller.tick(t0 + DURATION);
        assert_eq!(update.horizontal, Some(100.0));
        assert_eq!(update.vertical, None);
        assert_eq!(scroller.offsets(), Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_update_applies_to_sink() {
        struct Recorder(Vec<(Axis, f64)>);
        impl ScrollSink for Recorder {
            fn scroll_to(&mut self, axis: Axis, offset: f64) {
                self.0.push((axis, offset));
            }
        }

        let mut sink = Recorder(Vec::new());
        ScrollUpdate {
            horizontal: None,
            vertical: Some(40.0),
        }
        .apply(&mut sink);
        assert_eq!(sink.0, vec![(Axis::Vertical, 40.0)]);
    }
}
